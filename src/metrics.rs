use crate::category::ExpenditureCategory;
use crate::schema::{InflationResult, LatestMetrics, PeriodObservation};
use crate::weights::WeightDistribution;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// The numbers for the current period: always the last element of the
/// already-ordered result series.
pub fn latest(results: &[InflationResult]) -> LatestMetrics {
    match results.last() {
        Some(last) => LatestMetrics {
            period: Some(last.period),
            personal_rate: Some(last.personal_rate),
            national_rate: Some(last.national_rate),
            difference: Some(last.difference),
        },
        None => LatestMetrics::default(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryFigure {
    pub category: ExpenditureCategory,

    #[schemars(description = "Share of the user's spending, in percent")]
    pub weight: f64,

    #[schemars(description = "Year-over-year rate for the category, if published")]
    pub rate: Option<f64>,

    #[schemars(description = "weight/100 * rate, in percentage points of the personal rate")]
    pub contribution: f64,
}

/// Per-category figures for one observation, heaviest weight first.
///
/// The contributions add up to that period's personal rate.
pub fn category_breakdown(
    observation: &PeriodObservation,
    normalized_weights: &WeightDistribution,
) -> Vec<CategoryFigure> {
    let mut figures: Vec<CategoryFigure> = ExpenditureCategory::ALL
        .into_iter()
        .map(|category| {
            let weight = normalized_weights.get(category);
            let rate = observation.category_rate(category);
            CategoryFigure {
                category,
                weight,
                rate,
                contribution: weight / 100.0 * rate.unwrap_or(0.0),
            }
        })
        .collect();

    // Stable sort keeps canonical order among equal weights.
    figures.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));
    figures
}

pub fn top_drivers(breakdown: &[CategoryFigure], n: usize) -> Vec<CategoryFigure> {
    breakdown.iter().take(n).cloned().collect()
}

pub fn format_percentage(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}{:.1}%", if v >= 0.0 { "+" } else { "" }, v),
        None => "N/A".to_string(),
    }
}

pub fn format_percentage_points(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}{:.1}pp", if v >= 0.0 { "+" } else { "" }, v),
        None => "N/A".to_string(),
    }
}
