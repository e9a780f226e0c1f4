use crate::category::ExpenditureCategory;
use crate::error::{MyflationError, Result};
use crate::period::Period;
use crate::schema::PeriodObservation;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::BTreeMap;
use std::io::Read;

/// Reference series shipped with the crate.
pub const BUNDLED_DATASET: &str = include_str!("../../data/fallback.csv");

const PERIOD_COLUMN: &str = "period";
const NATIONAL_COLUMN: &str = "national_rate";

/// The only header the dataset may carry: period, national rate, then one
/// column per category in canonical order.
pub fn expected_header() -> Vec<&'static str> {
    let mut header = vec![PERIOD_COLUMN, NATIONAL_COLUMN];
    header.extend(ExpenditureCategory::ALL.iter().map(|c| c.key()));
    header
}

pub fn load_bundled() -> Result<Vec<PeriodObservation>> {
    parse_dataset(BUNDLED_DATASET.as_bytes())
}

/// Strict positional parse of the reference dataset.
///
/// Fails on a header that does not match [`expected_header`], on rows of the
/// wrong width, on non-numeric rates, on periods that are not consecutive
/// ascending months and on a dataset with no rows. An empty category cell
/// means the figure was not published for that month.
pub fn parse_dataset<R: Read>(reader: R) -> Result<Vec<PeriodObservation>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let header = reader.headers()?.clone();
    check_header(&header)?;

    let mut observations: Vec<PeriodObservation> = Vec::new();

    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or_default();

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let observation = parse_row(&record, header.len(), line)?;

        if let Some(previous) = observations.last() {
            if observation.period != previous.period.next() {
                return Err(MyflationError::FallbackRow {
                    line,
                    details: format!(
                        "period {} does not follow {}",
                        observation.period, previous.period
                    ),
                });
            }
        }

        observations.push(observation);
    }

    if observations.is_empty() {
        return Err(MyflationError::FallbackSchema("dataset has no rows".to_string()));
    }

    Ok(observations)
}

fn check_header(header: &StringRecord) -> Result<()> {
    let expected = expected_header();

    if header.len() != expected.len() {
        return Err(MyflationError::FallbackSchema(format!(
            "expected {} columns ({} categories), found {}",
            expected.len(),
            ExpenditureCategory::ALL.len(),
            header.len()
        )));
    }

    for (position, (found, wanted)) in header.iter().zip(&expected).enumerate() {
        if found != *wanted {
            return Err(MyflationError::FallbackSchema(format!(
                "column {} is '{}', expected '{}'",
                position + 1,
                found,
                wanted
            )));
        }
    }

    Ok(())
}

fn parse_row(record: &StringRecord, width: usize, line: usize) -> Result<PeriodObservation> {
    let row_error = |details: String| MyflationError::FallbackRow { line, details };

    if record.len() != width {
        return Err(row_error(format!("{} fields, expected {}", record.len(), width)));
    }

    let period = Period::parse(&record[0]).map_err(|e| row_error(e.to_string()))?;

    let national_rate = parse_rate(&record[1])
        .ok_or_else(|| row_error(format!("national rate '{}' is not a number", &record[1])))?;

    let mut category_rates = BTreeMap::new();
    for (category, field) in ExpenditureCategory::ALL.iter().zip(record.iter().skip(2)) {
        if field.is_empty() {
            continue;
        }
        let rate = parse_rate(field)
            .ok_or_else(|| row_error(format!("{} rate '{}' is not a number", category, field)))?;
        category_rates.insert(*category, rate);
    }

    Ok(PeriodObservation {
        period,
        national_rate,
        category_rates,
    })
}

fn parse_rate(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}
