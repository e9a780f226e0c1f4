//! Statistics provider adapter.
//!
//! One call yields one internally consistent series: either everything comes
//! from the live source or everything comes from the bundled reference
//! dataset. Transport and payload failures are absorbed here; the only error a
//! caller sees is [`MyflationError::NoDataAvailable`].

pub mod fallback;
pub mod jsonstat;
#[cfg(feature = "scb")]
pub mod scb;
pub mod source;

pub use source::{FetchError, OfflineSource, StatisticsSource};

use crate::config::ProviderConfig;
use crate::error::{MyflationError, Result};
use crate::period::Period;
use crate::schema::{DataOrigin, FetchedSeries, PeriodObservation};
use chrono::{NaiveDate, Utc};
use log::{debug, error, info, warn};
use std::borrow::Cow;

pub struct StatisticsProvider<S> {
    source: S,
    config: ProviderConfig,
    fallback_dataset: Cow<'static, str>,
}

impl<S: StatisticsSource> StatisticsProvider<S> {
    pub fn new(source: S, config: ProviderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source,
            config,
            fallback_dataset: Cow::Borrowed(fallback::BUNDLED_DATASET),
        })
    }

    /// Replaces the bundled reference dataset, e.g. with a newer export.
    pub fn with_fallback_dataset(mut self, csv: impl Into<Cow<'static, str>>) -> Self {
        self.fallback_dataset = csv.into();
        self
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub async fn fetch_series(&self) -> Result<FetchedSeries> {
        self.fetch_series_as_of(Utc::now().date_naive()).await
    }

    /// Like [`fetch_series`](Self::fetch_series) with an explicit "today"; the
    /// backward search for a published period starts at the month containing it.
    pub async fn fetch_series_as_of(&self, today: NaiveDate) -> Result<FetchedSeries> {
        match self.fetch_remote(Period::from_date(today)).await {
            Ok(observations) => {
                info!(
                    "Loaded {} live periods ({} to {})",
                    observations.len(),
                    observations[0].period,
                    observations[observations.len() - 1].period
                );
                Ok(FetchedSeries {
                    observations,
                    origin: DataOrigin::Live,
                })
            }
            Err(reason) => {
                info!("Falling back to bundled reference data: {}", reason);
                self.load_fallback()
            }
        }
    }

    async fn fetch_remote(&self, current: Period) -> std::result::Result<Vec<PeriodObservation>, String> {
        let mut period = current;

        for _ in 0..self.config.max_lookback_months {
            debug!("Requesting remote series ending {}", period.to_remote_code());

            match self.source.attempt_fetch(period).await {
                Ok(payload) => match jsonstat::parse_payload(&payload, &self.config) {
                    Ok(observations) => return Ok(observations),
                    Err(e) => warn!("Remote payload for {} unusable: {}", period, e),
                },
                Err(e) if e.is_period_specific() => {
                    warn!("Remote source has nothing for {}: {}", period, e)
                }
                Err(e) => {
                    warn!("Remote fetch failed: {}", e);
                    return Err(e.to_string());
                }
            }

            period = period.previous();
        }

        Err(format!(
            "no usable remote data in the {} periods up to {}",
            self.config.max_lookback_months, current
        ))
    }

    fn load_fallback(&self) -> Result<FetchedSeries> {
        let observations = fallback::parse_dataset(self.fallback_dataset.as_bytes()).map_err(|e| {
            error!("Reference dataset unusable: {}", e);
            MyflationError::NoDataAvailable(e.to_string())
        })?;

        Ok(FetchedSeries {
            observations,
            origin: DataOrigin::Fallback,
        })
    }
}
