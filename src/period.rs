use crate::error::{MyflationError, Result};
use chrono::{Datelike, NaiveDate};
use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar month. Serialized as `YYYY-MM`; the statistics provider addresses
/// the same month as `YYYYMnn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(MyflationError::InvalidPeriod(format!("{}-{}", year, month)));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn next(self) -> Self {
        self.offset(1)
    }

    pub fn previous(self) -> Self {
        self.offset(-1)
    }

    /// Shifts by a signed number of months.
    pub fn offset(self, months: i32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + months;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// Number of months from `self` to `other`; negative when `other` is earlier.
    pub fn months_until(self, other: Period) -> i32 {
        let year_diff = other.year - self.year;
        let month_diff = other.month as i32 - self.month as i32;
        year_diff * 12 + month_diff
    }

    /// Identifier used by the remote statistics table, e.g. `2024M03`.
    pub fn to_remote_code(self) -> String {
        format!("{:04}M{:02}", self.year, self.month)
    }

    /// Accepts `YYYY-MM`, `YYYY-MM-DD` (day ignored) or `YYYYMnn`.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = || MyflationError::InvalidPeriod(input.to_string());

        let (year, month, day) = if let Some((year, month)) = trimmed.split_once('M') {
            (year, month, None)
        } else {
            let mut parts = trimmed.splitn(3, '-');
            let year = parts.next().ok_or_else(invalid)?;
            let month = parts.next().ok_or_else(invalid)?;
            (year, month, parts.next())
        };

        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        // A trailing day must name a real date in that month.
        if let Some(day) = day {
            let day: u32 = match day.len() {
                2 => day.parse().map_err(|_| invalid())?,
                _ => return Err(invalid()),
            };
            NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;
        }

        Self::new(year, month).map_err(|_| invalid())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = MyflationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Period {
    type Error = MyflationError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

impl JsonSchema for Period {
    fn schema_name() -> String {
        "Period".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(year: i32, month: u32) -> Period {
        Period::new(year, month).unwrap()
    }

    #[test]
    fn test_next_and_previous_cross_year() {
        assert_eq!(p(2023, 12).next(), p(2024, 1));
        assert_eq!(p(2024, 1).previous(), p(2023, 12));
        assert_eq!(p(2024, 6).next(), p(2024, 7));
    }

    #[test]
    fn test_offset() {
        assert_eq!(p(2024, 3).offset(-15), p(2022, 12));
        assert_eq!(p(2024, 3).offset(10), p(2025, 1));
        assert_eq!(p(2024, 3).offset(0), p(2024, 3));
    }

    #[test]
    fn test_months_until() {
        assert_eq!(p(2023, 1).months_until(p(2023, 12)), 11);
        assert_eq!(p(2023, 11).months_until(p(2024, 2)), 3);
        assert_eq!(p(2024, 2).months_until(p(2023, 11)), -3);
    }

    #[test]
    fn test_parse_both_forms() {
        assert_eq!(Period::parse("2024-03").unwrap(), p(2024, 3));
        assert_eq!(Period::parse("2024M03").unwrap(), p(2024, 3));
        assert_eq!(Period::parse(" 2024-03-31 ").unwrap(), p(2024, 3));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Period::parse("2024-13").is_err());
        assert!(Period::parse("2024M00").is_err());
        assert!(Period::parse("24-03").is_err());
        assert!(Period::parse("2024/03").is_err());
        assert!(Period::parse("").is_err());
        assert!(Period::parse("2024-03-garbage").is_err());
        assert!(Period::parse("2024-03-").is_err());
        assert!(Period::parse("2024-02-30").is_err());
        assert!(Period::parse("2024-03-31-01").is_err());
    }

    #[test]
    fn test_remote_code_and_display() {
        assert_eq!(p(2025, 7).to_remote_code(), "2025M07");
        assert_eq!(p(2025, 7).to_string(), "2025-07");
    }

    #[test]
    fn test_from_date() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(Period::from_date(date), p(2024, 2));
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&p(2024, 5)).unwrap();
        assert_eq!(json, "\"2024-05\"");
        let back: Period = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p(2024, 5));
        assert!(serde_json::from_str::<Period>("\"2024-5\"").is_err());
    }
}
