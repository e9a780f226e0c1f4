use crate::category::ExpenditureCategory;
use crate::period::Period;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PeriodObservation {
    #[schemars(description = "Reporting month in YYYY-MM format")]
    pub period: Period,

    #[schemars(description = "National headline CPI, year-over-year change in percent")]
    pub national_rate: f64,

    #[schemars(
        description = "Year-over-year change in percent per expenditure category. A category the source did not publish for this month is absent and contributes nothing."
    )]
    pub category_rates: BTreeMap<ExpenditureCategory, f64>,
}

impl PeriodObservation {
    pub fn category_rate(&self, category: ExpenditureCategory) -> Option<f64> {
        self.category_rates.get(&category).copied()
    }
}

/// Where a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    /// Published figures from the live statistics provider.
    Live,
    /// The bundled reference dataset; present as illustrative data only.
    Fallback,
}

/// Output of one provider call: a non-empty, chronologically ordered series
/// drawn entirely from a single origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FetchedSeries {
    pub observations: Vec<PeriodObservation>,
    pub origin: DataOrigin,
}

impl FetchedSeries {
    pub fn is_fallback(&self) -> bool {
        self.origin == DataOrigin::Fallback
    }

    pub fn first_period(&self) -> Option<Period> {
        self.observations.first().map(|o| o.period)
    }

    pub fn last_period(&self) -> Option<Period> {
        self.observations.last().map(|o| o.period)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(FetchedSeries)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InflationResult {
    pub period: Period,

    #[schemars(description = "Weighted sum of category rates under the user's spending mix, in percent")]
    pub personal_rate: f64,

    #[schemars(description = "National headline rate, copied from the observation")]
    pub national_rate: f64,

    #[schemars(description = "personal_rate - national_rate, in percentage points")]
    pub difference: f64,
}

/// Snapshot of the most recent period. Every field is `None` for an empty series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LatestMetrics {
    pub period: Option<Period>,
    pub personal_rate: Option<f64>,
    pub national_rate: Option<f64>,
    pub difference: Option<f64>,
}
