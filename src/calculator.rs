use crate::schema::{InflationResult, PeriodObservation};
use crate::weights::{to_fractional, WeightDistribution};

/// Computes the personal rate for every observation, in order.
///
/// `normalized_weights` must already sum to 100 (see
/// [`normalize_to_percentage`](crate::weights::normalize_to_percentage)). A
/// category missing from an observation contributes zero.
pub fn compute_series(
    observations: &[PeriodObservation],
    normalized_weights: &WeightDistribution,
) -> Vec<InflationResult> {
    let fractions = to_fractional(normalized_weights);

    observations
        .iter()
        .map(|observation| {
            let personal_rate = personal_rate(observation, &fractions);
            let national_rate = observation.national_rate;

            InflationResult {
                period: observation.period,
                personal_rate,
                national_rate,
                difference: personal_rate - national_rate,
            }
        })
        .collect()
}

pub(crate) fn personal_rate(observation: &PeriodObservation, fractions: &WeightDistribution) -> f64 {
    fractions
        .iter()
        .map(|(category, fraction)| fraction * observation.category_rate(category).unwrap_or(0.0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::ExpenditureCategory::{self, *};
    use crate::period::Period;
    use crate::weights::normalize_to_percentage;

    fn observation(month: u32, national: f64, rates: &[(ExpenditureCategory, f64)]) -> PeriodObservation {
        PeriodObservation {
            period: Period::new(2024, month).unwrap(),
            national_rate: national,
            category_rates: rates.iter().copied().collect(),
        }
    }

    fn weights(entries: &[(ExpenditureCategory, f64)]) -> WeightDistribution {
        normalize_to_percentage(&entries.iter().copied().collect::<WeightDistribution>().filled())
    }

    #[test]
    fn test_single_category_concentration() {
        let obs = observation(1, 2.0, &[(Food, 5.0), (Housing, 1.0)]);
        let results = compute_series(&[obs], &weights(&[(Food, 100.0)]));

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].personal_rate, 5.0);
        assert_eq!(results[0].national_rate, 2.0);
        assert_eq!(results[0].difference, 3.0);
    }

    #[test]
    fn test_even_split() {
        let obs = observation(1, 2.0, &[(Food, 5.0), (Housing, 1.0)]);
        let results = compute_series(&[obs], &weights(&[(Food, 50.0), (Housing, 50.0)]));

        assert!((results[0].personal_rate - 3.0).abs() < 1e-12);
        assert!((results[0].difference - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_category_contributes_zero() {
        let obs = observation(1, 1.5, &[(Food, 4.0)]);
        let results = compute_series(&[obs], &weights(&[(Food, 50.0), (Transport, 50.0)]));
        assert!((results[0].personal_rate - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_concentration_tracks_category_every_period() {
        let series: Vec<_> = (1..=12)
            .map(|m| observation(m, 1.0, &[(Transport, m as f64 * 0.7 - 3.0), (Food, 9.9)]))
            .collect();
        let results = compute_series(&series, &weights(&[(Transport, 100.0)]));

        for (obs, result) in series.iter().zip(&results) {
            assert_eq!(result.period, obs.period);
            assert_eq!(result.personal_rate, obs.category_rate(Transport).unwrap());
        }
    }

    #[test]
    fn test_difference_is_exact_subtraction() {
        let series: Vec<_> = (1..=6)
            .map(|m| observation(m, 0.3 * m as f64, &[(Food, 1.1 * m as f64), (Health, -0.7), (Clothing, 2.2)]))
            .collect();
        let results = compute_series(&series, &WeightDistribution::national_average());

        for result in results {
            assert_eq!(result.difference, result.personal_rate - result.national_rate);
        }
    }

    #[test]
    fn test_empty_observations() {
        assert!(compute_series(&[], &WeightDistribution::national_average()).is_empty());
    }
}
