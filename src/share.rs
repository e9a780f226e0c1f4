//! Query-string form of a weight map, for share links.
//!
//! `mode=<percentage|amount>&<category key>=<value>&...`; categories at zero are
//! omitted and read back as zero.

use crate::category::ExpenditureCategory;
use crate::weights::{InputMode, WeightDistribution};

const MODE_PARAM: &str = "mode";

pub fn encode_query(weights: &WeightDistribution, mode: InputMode) -> String {
    let mut params = vec![format!("{}={}", MODE_PARAM, mode.as_str())];

    for (category, value) in weights.iter() {
        if value > 0.0 {
            params.push(format!(
                "{}={}",
                urlencoding::encode(category.key()),
                urlencoding::encode(&value.to_string())
            ));
        }
    }

    params.join("&")
}

/// Reads weights and mode back from a query string or a full link.
///
/// Returns `None` when no category parameter is present, so the caller keeps
/// whatever weights it already had. Unknown parameters are ignored, values that
/// do not parse count as zero and a missing or unknown mode means percentages.
pub fn decode_query(query: &str) -> Option<(WeightDistribution, InputMode)> {
    let query = match query.split_once('?') {
        Some((_, rest)) => rest,
        None => query,
    };

    let mut weights = WeightDistribution::new();
    let mut mode = InputMode::default();

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let (Ok(key), Ok(value)) = (urlencoding::decode(raw_key), urlencoding::decode(raw_value))
        else {
            continue;
        };

        if key == MODE_PARAM {
            mode = InputMode::parse(&value).unwrap_or_default();
        } else if let Some(category) = ExpenditureCategory::from_key(&key) {
            let parsed = value.trim().parse::<f64>().ok().filter(|v| v.is_finite());
            weights.set(category, parsed.unwrap_or(0.0));
        }
    }

    if weights.is_empty() {
        None
    } else {
        Some((weights, mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ExpenditureCategory::*;

    #[test]
    fn test_round_trip_preserves_weights() {
        let weights: WeightDistribution = [(Food, 12.8), (Housing, 28.5), (Education, 0.6), (Health, 1.0 / 3.0)]
            .into_iter()
            .collect();

        let query = encode_query(&weights, InputMode::Amount);
        let (decoded, mode) = decode_query(&query).unwrap();

        assert_eq!(mode, InputMode::Amount);
        for category in ExpenditureCategory::ALL {
            assert!((decoded.get(category) - weights.get(category)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_zero_weights_are_omitted() {
        let query = encode_query(&WeightDistribution::zeroed(), InputMode::Percentage);
        assert_eq!(query, "mode=percentage");
        assert_eq!(decode_query(&query), None);
    }

    #[test]
    fn test_decode_full_link() {
        let (weights, mode) =
            decode_query("https://example.org/simulator?food=40&transport=60&utm_source=x").unwrap();
        assert_eq!(mode, InputMode::Percentage);
        assert_eq!(weights.get(Food), 40.0);
        assert_eq!(weights.get(Transport), 60.0);
        assert_eq!(weights.len(), 2);
    }

    #[test]
    fn test_decode_tolerates_bad_values() {
        let (weights, mode) = decode_query("mode=bogus&food=abc&housing=&health=NaN&clothing=5").unwrap();
        assert_eq!(mode, InputMode::Percentage);
        assert_eq!(weights.get(Food), 0.0);
        assert_eq!(weights.get(Housing), 0.0);
        assert_eq!(weights.get(Health), 0.0);
        assert_eq!(weights.get(Clothing), 5.0);
    }

    #[test]
    fn test_decode_without_categories() {
        assert_eq!(decode_query(""), None);
        assert_eq!(decode_query("?mode=amount"), None);
    }
}
