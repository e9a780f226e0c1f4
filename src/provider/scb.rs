use crate::category::ExpenditureCategory;
use crate::config::ProviderConfig;
use crate::error::{MyflationError, Result};
use crate::period::Period;
use crate::provider::source::{FetchError, StatisticsSource};
use futures::future::{BoxFuture, FutureExt};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::timeout;

/// PXWeb client for the Statistics Sweden CPI table.
#[derive(Clone)]
pub struct ScbClient {
    client: Client,
    base_url: String,
    contents_code: String,
    headline_code: String,
    category_dimension: String,
    contents_dimension: String,
    time_dimension: String,
    window_months: u32,
    timeout: Duration,
}

impl ScbClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| MyflationError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            contents_code: config.contents_code.clone(),
            headline_code: config.headline_code.clone(),
            category_dimension: config.category_dimension.clone(),
            contents_dimension: config.contents_dimension.clone(),
            time_dimension: config.time_dimension.clone(),
            window_months: config.window_months,
            timeout,
        })
    }

    /// PXWeb query for the headline aggregate and every division, over the
    /// `window_months` months ending at `period`.
    pub fn build_query(&self, period: Period) -> Value {
        let first = period.offset(1 - self.window_months as i32);
        let months: Vec<String> = (0..self.window_months as i32)
            .map(|i| first.offset(i).to_remote_code())
            .collect();

        let mut codes = vec![self.headline_code.clone()];
        codes.extend(ExpenditureCategory::ALL.iter().map(|c| c.code().to_string()));

        json!({
            "query": [
                {
                    "code": self.category_dimension,
                    "selection": { "filter": "item", "values": codes }
                },
                {
                    "code": self.contents_dimension,
                    "selection": { "filter": "item", "values": [self.contents_code] }
                },
                {
                    "code": self.time_dimension,
                    "selection": { "filter": "item", "values": months }
                }
            ],
            "response": { "format": "json-stat2" }
        })
    }

    async fn post(&self, period: Period) -> std::result::Result<String, FetchError> {
        let query = self.build_query(period);

        let res = self
            .client
            .post(&self.base_url)
            .json(&query)
            .send()
            .await
            .map_err(transport_error)?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        res.text().await.map_err(transport_error)
    }
}

fn transport_error(e: reqwest::Error) -> FetchError {
    FetchError::Transport(e.to_string())
}

impl StatisticsSource for ScbClient {
    fn attempt_fetch(&self, period: Period) -> BoxFuture<'_, std::result::Result<String, FetchError>> {
        async move {
            match timeout(self.timeout, self.post(period)).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(self.timeout)),
            }
        }
        .boxed()
    }
}
