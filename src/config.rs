use crate::category::CATEGORY_COUNT;
use crate::error::{MyflationError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str =
    "https://api.scb.se/OV0104/v1/doris/sv/ssd/START/PR/PR0101/PR0101A/KPI2020COICOP2M";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ProviderConfig {
    #[schemars(description = "Endpoint of the statistics table queried for CPI figures")]
    pub base_url: String,

    #[schemars(description = "Contents code selecting the year-over-year change series")]
    pub contents_code: String,

    #[schemars(description = "Classification code of the all-items (national headline) aggregate")]
    pub headline_code: String,

    #[schemars(description = "Name of the classification dimension in the remote payload")]
    pub category_dimension: String,

    #[schemars(description = "Name of the contents (measure) dimension in the remote payload")]
    pub contents_dimension: String,

    #[schemars(description = "Name of the time dimension in the remote payload")]
    pub time_dimension: String,

    #[schemars(description = "How many months of history to request, ending at the probed period")]
    pub window_months: u32,

    #[schemars(
        description = "How many periods to probe backward from the current month before giving up; the source usually lags one or two months"
    )]
    pub max_lookback_months: u32,

    #[schemars(
        description = "Minimum number of categories that must carry a numeric value in every period for a remote payload to be used"
    )]
    pub min_category_coverage: usize,

    #[schemars(description = "Per-request transport timeout, in seconds")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            contents_code: "PR0101N1".to_string(),
            headline_code: "00".to_string(),
            category_dimension: "VaruTjanstegrupp".to_string(),
            contents_dimension: "ContentsCode".to_string(),
            time_dimension: "Tid".to_string(),
            window_months: 36,
            max_lookback_months: 3,
            min_category_coverage: 10,
            timeout_secs: 10,
        }
    }
}

impl ProviderConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_category_coverage == 0 || self.min_category_coverage > CATEGORY_COUNT {
            return Err(MyflationError::InvalidConfig(format!(
                "min_category_coverage must be between 1 and {}, got {}",
                CATEGORY_COUNT, self.min_category_coverage
            )));
        }
        if self.window_months == 0 {
            return Err(MyflationError::InvalidConfig(
                "window_months must be at least 1".to_string(),
            ));
        }
        if self.max_lookback_months == 0 {
            return Err(MyflationError::InvalidConfig(
                "max_lookback_months must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ProviderConfig)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::generate_json_schema())
    }
}
