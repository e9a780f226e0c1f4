//! Reader for the JSON-stat 2.0 datasets returned by the remote statistics table.
//!
//! A dataset is a dense cube: `id` names the dimensions, `size` gives their
//! lengths and `value` holds the cells in row-major order (or as a sparse
//! object keyed by flat position). This reader expects one classification
//! dimension, one time dimension and any number of single-valued dimensions.

use crate::category::ExpenditureCategory;
use crate::config::ProviderConfig;
use crate::error::{MyflationError, Result};
use crate::period::Period;
use crate::schema::PeriodObservation;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Deserialize)]
struct Dataset {
    id: Vec<String>,
    size: Vec<usize>,
    dimension: HashMap<String, Dimension>,
    value: Values,
}

#[derive(Debug, Deserialize)]
struct Dimension {
    category: DimensionCategory,
}

#[derive(Debug, Deserialize)]
struct DimensionCategory {
    index: Option<CategoryIndex>,
    label: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CategoryIndex {
    Positions(HashMap<String, usize>),
    Ordered(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Values {
    Dense(Vec<Option<f64>>),
    Sparse(HashMap<String, Option<f64>>),
}

impl DimensionCategory {
    /// `(code, position)` pairs for this dimension.
    fn positions(&self, name: &str) -> Result<Vec<(String, usize)>> {
        match (&self.index, &self.label) {
            (Some(CategoryIndex::Positions(map)), _) => {
                Ok(map.iter().map(|(code, pos)| (code.clone(), *pos)).collect())
            }
            (Some(CategoryIndex::Ordered(codes)), _) => Ok(codes
                .iter()
                .enumerate()
                .map(|(pos, code)| (code.clone(), pos))
                .collect()),
            // A single-valued dimension may omit its index.
            (None, Some(labels)) if labels.len() == 1 => {
                Ok(labels.keys().map(|code| (code.clone(), 0)).collect())
            }
            _ => Err(rejected(format!("dimension '{}' has no category index", name))),
        }
    }
}

impl Values {
    fn get(&self, flat: usize) -> Option<f64> {
        let value = match self {
            Values::Dense(cells) => cells.get(flat).copied().flatten(),
            Values::Sparse(cells) => cells.get(&flat.to_string()).copied().flatten(),
        };
        value.filter(|v| v.is_finite())
    }
}

fn rejected(reason: impl Into<String>) -> MyflationError {
    MyflationError::PayloadRejected(reason.into())
}

/// Parses a remote payload into chronologically ordered observations.
///
/// The payload is rejected as a whole when it carries a measure other than
/// `contents_code`, when the headline aggregate is missing,
/// when fewer than `min_category_coverage` canonical division codes are present
/// in the classification dimension, or when any single period lacks a national
/// rate or falls below that coverage.
pub fn parse_payload(payload: &str, config: &ProviderConfig) -> Result<Vec<PeriodObservation>> {
    let dataset: Dataset = serde_json::from_str(payload)?;

    if dataset.id.len() != dataset.size.len() {
        return Err(rejected(format!(
            "{} dimension ids but {} sizes",
            dataset.id.len(),
            dataset.size.len()
        )));
    }

    let cells = dataset
        .size
        .iter()
        .try_fold(1usize, |acc, &len| acc.checked_mul(len))
        .ok_or_else(|| rejected("dimension sizes overflow"))?;
    if let Values::Dense(values) = &dataset.value {
        if values.len() != cells {
            return Err(rejected(format!(
                "expected {} values, found {}",
                cells,
                values.len()
            )));
        }
    }

    let mut strides = vec![1usize; dataset.size.len()];
    for axis in (0..dataset.size.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1]
            .checked_mul(dataset.size[axis + 1])
            .ok_or_else(|| rejected("dimension sizes overflow"))?;
    }

    let axis_of = |name: &str| {
        dataset
            .id
            .iter()
            .position(|id| id == name)
            .ok_or_else(|| rejected(format!("missing dimension '{}'", name)))
    };
    let category_axis = axis_of(&config.category_dimension)?;
    let time_axis = axis_of(&config.time_dimension)?;
    let contents_axis = axis_of(&config.contents_dimension)?;

    for (axis, name) in dataset.id.iter().enumerate() {
        if axis != category_axis && axis != time_axis && dataset.size[axis] != 1 {
            return Err(rejected(format!(
                "dimension '{}' has {} values, expected a single selection",
                name, dataset.size[axis]
            )));
        }
    }

    let dimension = |axis: usize| {
        let name = &dataset.id[axis];
        dataset
            .dimension
            .get(name)
            .ok_or_else(|| rejected(format!("dimension '{}' is not described", name)))
            .and_then(|d| d.category.positions(name))
    };

    let contents = dimension(contents_axis)?;
    if contents.len() != 1 || contents[0].0 != config.contents_code {
        let codes: Vec<&str> = contents.iter().map(|(code, _)| code.as_str()).collect();
        return Err(rejected(format!(
            "measure {:?} does not match the configured '{}'",
            codes, config.contents_code
        )));
    }

    let mut headline_position = None;
    let mut category_positions: Vec<(ExpenditureCategory, usize)> = Vec::new();
    for (code, pos) in dimension(category_axis)? {
        if pos >= dataset.size[category_axis] {
            return Err(rejected(format!("code '{}' indexed out of range", code)));
        }
        if code == config.headline_code {
            headline_position = Some(pos);
        } else if let Some(category) = ExpenditureCategory::from_code(&code) {
            category_positions.push((category, pos));
        }
    }

    let headline_position = headline_position
        .ok_or_else(|| rejected(format!("headline code '{}' not present", config.headline_code)))?;

    if category_positions.len() < config.min_category_coverage {
        return Err(rejected(format!(
            "only {} of the expected division codes are present",
            category_positions.len()
        )));
    }

    let mut periods: Vec<(Period, usize)> = Vec::new();
    for (code, pos) in dimension(time_axis)? {
        if pos >= dataset.size[time_axis] {
            return Err(rejected(format!("period '{}' indexed out of range", code)));
        }
        let period = Period::parse(&code).map_err(|_| rejected(format!("unreadable period '{}'", code)))?;
        periods.push((period, pos));
    }
    periods.sort_by_key(|(period, _)| *period);

    if periods.is_empty() {
        return Err(rejected("payload contains no periods"));
    }
    if periods.windows(2).any(|w| w[0].0 == w[1].0) {
        return Err(rejected("payload repeats a period"));
    }

    let cell = |category_pos: usize, time_pos: usize| {
        let flat = category_pos
            .checked_mul(strides[category_axis])?
            .checked_add(time_pos.checked_mul(strides[time_axis])?)?;
        dataset.value.get(flat)
    };

    periods
        .into_iter()
        .map(|(period, time_pos)| {
            let national_rate = cell(headline_position, time_pos)
                .ok_or_else(|| rejected(format!("no national rate for {}", period)))?;

            let category_rates: BTreeMap<ExpenditureCategory, f64> = category_positions
                .iter()
                .filter_map(|(category, pos)| cell(*pos, time_pos).map(|rate| (*category, rate)))
                .collect();

            if category_rates.len() < config.min_category_coverage {
                return Err(MyflationError::InsufficientCoverage {
                    period: period.to_string(),
                    found: category_rates.len(),
                    required: config.min_category_coverage,
                });
            }

            Ok(PeriodObservation {
                period,
                national_rate,
                category_rates,
            })
        })
        .collect()
}
