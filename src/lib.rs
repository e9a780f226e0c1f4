//! # Myflation
//!
//! A library for comparing a personally-weighted inflation rate with the
//! national headline CPI rate.
//!
//! ## Core Concepts
//!
//! - **Expenditure categories**: the thirteen COICOP divisions used as the key
//!   space for both spending weights and price changes
//! - **Weights**: the user's spending mix, typed either as percentages or as
//!   currency amounts, normalized to a distribution summing to 100
//! - **Series**: monthly year-over-year rates, national and per category,
//!   fetched once per session from the statistics provider or taken from the
//!   bundled reference dataset when the provider is unusable
//! - **Personal rate**: the weighted sum of category rates for a period,
//!   compared with the national rate in percentage points
//!
//! ## Example
//!
//! ```rust,ignore
//! use myflation::*;
//!
//! let provider = StatisticsProvider::new(OfflineSource, ProviderConfig::default())?;
//! let mut session = Session::start(&provider).await?;
//!
//! let mut weights = WeightDistribution::zeroed();
//! weights.set(ExpenditureCategory::Housing, 9_500.0);
//! weights.set(ExpenditureCategory::Food, 4_000.0);
//! weights.set(ExpenditureCategory::Transport, 1_500.0);
//! session.set_weights(weights, InputMode::Amount);
//!
//! let now = session.latest();
//! println!(
//!     "{} personal vs {} national ({})",
//!     format_percentage(now.personal_rate),
//!     format_percentage(now.national_rate),
//!     format_percentage_points(now.difference),
//! );
//! ```

pub mod calculator;
pub mod category;
pub mod config;
pub mod error;
pub mod metrics;
pub mod period;
pub mod provider;
pub mod schema;
pub mod share;
pub mod weights;

pub use calculator::compute_series;
pub use category::{ExpenditureCategory, CATEGORY_COUNT};
pub use config::ProviderConfig;
pub use error::{MyflationError, Result};
pub use metrics::*;
pub use period::Period;
pub use provider::{FetchError, OfflineSource, StatisticsProvider, StatisticsSource};
pub use schema::*;
pub use share::{decode_query, encode_query};
pub use weights::*;

use log::debug;

/// One user's session: the series fetched at start plus the weights being edited.
///
/// Every derived figure is recomputed from scratch on request; nothing is cached
/// and nothing outlives the session.
#[derive(Debug, Clone)]
pub struct Session {
    series: FetchedSeries,
    weights: WeightDistribution,
    mode: InputMode,
}

impl Session {
    /// Fetches the series once and starts from the national-average mix.
    pub async fn start<S: StatisticsSource>(provider: &StatisticsProvider<S>) -> Result<Self> {
        let series = provider.fetch_series().await?;
        Ok(Self::from_series(series))
    }

    pub fn from_series(series: FetchedSeries) -> Self {
        debug!(
            "Session started with {} periods ({:?})",
            series.observations.len(),
            series.origin
        );
        Self {
            series,
            weights: WeightDistribution::national_average(),
            mode: InputMode::Percentage,
        }
    }

    pub fn series(&self) -> &FetchedSeries {
        &self.series
    }

    /// True when the figures shown are the bundled illustrative data.
    pub fn is_fallback(&self) -> bool {
        self.series.is_fallback()
    }

    pub fn weights(&self) -> &WeightDistribution {
        &self.weights
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn set_weights(&mut self, weights: WeightDistribution, mode: InputMode) {
        self.weights = weights;
        self.mode = mode;
    }

    /// Reinterprets the current numbers in another unit; the values are kept.
    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
    }

    pub fn reset_to_national_average(&mut self) {
        self.set_weights(WeightDistribution::national_average(), InputMode::Percentage);
    }

    /// Applies weights from a share link. Returns false, leaving the session
    /// untouched, when the link carries no weights.
    pub fn apply_share_link(&mut self, query: &str) -> bool {
        match decode_query(query) {
            Some((weights, mode)) => {
                self.set_weights(weights, mode);
                true
            }
            None => false,
        }
    }

    pub fn share_query(&self) -> String {
        encode_query(&self.weights, self.mode)
    }

    pub fn warnings(&self) -> Vec<WeightWarning> {
        validate(&self.weights, self.mode)
    }

    pub fn normalized_weights(&self) -> WeightDistribution {
        normalize(&self.weights.filled(), self.mode)
    }

    pub fn results(&self) -> Vec<InflationResult> {
        compute_series(&self.series.observations, &self.normalized_weights())
    }

    pub fn latest(&self) -> LatestMetrics {
        latest(&self.results())
    }

    /// Category figures for the most recent period, heaviest weight first.
    pub fn breakdown(&self) -> Vec<CategoryFigure> {
        match self.series.observations.last() {
            Some(observation) => category_breakdown(observation, &self.normalized_weights()),
            None => Vec::new(),
        }
    }
}
