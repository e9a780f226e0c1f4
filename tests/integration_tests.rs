use futures::future::{self, BoxFuture, FutureExt};
use myflation::provider::fallback;
use myflation::*;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Serves a JSON-stat payload for any period at or before `published`,
/// and a 400 for anything newer.
struct PublishedUpTo {
    published: Period,
    calls: AtomicUsize,
}

impl PublishedUpTo {
    fn new(year: i32, month: u32) -> Self {
        Self {
            published: Period::new(year, month).unwrap(),
            calls: AtomicUsize::new(0),
        }
    }
}

fn rate_for(code: &str, period: Period) -> f64 {
    let base: f64 = code.parse().unwrap();
    if code == "00" {
        1.5 + period.month() as f64 * 0.1
    } else {
        base * 0.5 - period.month() as f64 * 0.05
    }
}

fn jsonstat_payload(last: Period, months: u32) -> String {
    let codes: Vec<String> = std::iter::once("00".to_string())
        .chain(ExpenditureCategory::ALL.iter().map(|c| c.code().to_string()))
        .collect();
    let periods: Vec<Period> = (0..months as i32)
        .map(|i| last.offset(i + 1 - months as i32))
        .collect();

    let mut values = Vec::new();
    for code in &codes {
        for period in &periods {
            values.push(json!(rate_for(code, *period)));
        }
    }

    let code_index: serde_json::Map<_, _> = codes
        .iter()
        .enumerate()
        .map(|(i, c)| (c.clone(), json!(i)))
        .collect();
    let time_index: serde_json::Map<_, _> = periods
        .iter()
        .enumerate()
        .map(|(i, p)| (p.to_remote_code(), json!(i)))
        .collect();

    json!({
        "version": "2.0",
        "class": "dataset",
        "id": ["VaruTjanstegrupp", "ContentsCode", "Tid"],
        "size": [codes.len(), 1, periods.len()],
        "dimension": {
            "VaruTjanstegrupp": { "category": { "index": code_index } },
            "ContentsCode": { "category": { "index": { "PR0101N1": 0 } } },
            "Tid": { "category": { "index": time_index } }
        },
        "value": values
    })
    .to_string()
}

impl StatisticsSource for PublishedUpTo {
    fn attempt_fetch(&self, period: Period) -> BoxFuture<'_, std::result::Result<String, FetchError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let answer = if period > self.published {
            Err(FetchError::Status(400))
        } else {
            Ok(jsonstat_payload(period, 13))
        };
        future::ready(answer).boxed()
    }
}

fn march_2025() -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
}

#[tokio::test]
async fn test_live_series_end_to_end() {
    let source = PublishedUpTo::new(2025, 1);
    let provider = StatisticsProvider::new(&source, ProviderConfig::default()).unwrap();

    let series = provider.fetch_series_as_of(march_2025()).await.unwrap();
    assert_eq!(series.origin, DataOrigin::Live);
    assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    assert_eq!(series.observations.len(), 13);
    assert_eq!(series.first_period(), Some(Period::new(2024, 1).unwrap()));
    assert_eq!(series.last_period(), Some(Period::new(2025, 1).unwrap()));

    let mut session = Session::from_series(series);
    session.set_weights(
        BTreeMap::from([(ExpenditureCategory::Transport, 100.0)]).into(),
        InputMode::Percentage,
    );

    for (observation, result) in session.series().observations.iter().zip(session.results()) {
        assert_eq!(result.period, observation.period);
        assert!((result.personal_rate - rate_for("07", observation.period)).abs() < 1e-12);
        assert!((result.national_rate - rate_for("00", observation.period)).abs() < 1e-12);
        assert_eq!(result.difference, result.personal_rate - result.national_rate);
    }

    let now = session.latest();
    assert_eq!(now.period, Some(Period::new(2025, 1).unwrap()));
    assert_eq!(format_percentage(now.national_rate), "+1.6%");
}

#[tokio::test]
async fn test_offline_session_uses_bundled_dataset() {
    let provider = StatisticsProvider::new(OfflineSource, ProviderConfig::default()).unwrap();
    let session = Session::start(&provider).await.unwrap();

    let bundled = fallback::load_bundled().unwrap();
    assert!(session.is_fallback());
    assert_eq!(session.series().observations, bundled);
    assert_eq!(session.results().len(), bundled.len());

    let now = session.latest();
    let last = bundled.last().unwrap();
    assert_eq!(now.period, Some(last.period));
    assert_eq!(now.national_rate, Some(last.national_rate));
}

#[tokio::test]
async fn test_nothing_published_in_lookback_falls_back() {
    let source = PublishedUpTo::new(2024, 6);
    let provider = StatisticsProvider::new(&source, ProviderConfig::default()).unwrap();

    let series = provider.fetch_series_as_of(march_2025()).await.unwrap();
    assert!(series.is_fallback());
    assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    assert!(!series.observations.is_empty());
}

#[tokio::test]
async fn test_abandoned_fetch_publishes_nothing() {
    struct NeverAnswers;
    impl StatisticsSource for NeverAnswers {
        fn attempt_fetch(&self, _period: Period) -> BoxFuture<'_, std::result::Result<String, FetchError>> {
            future::pending().boxed()
        }
    }

    let provider = StatisticsProvider::new(NeverAnswers, ProviderConfig::default()).unwrap();
    let attempt = tokio::time::timeout(
        std::time::Duration::from_millis(50),
        provider.fetch_series_as_of(march_2025()),
    )
    .await;
    assert!(attempt.is_err());
}

#[test]
fn test_spending_scenarios_against_fallback_data() {
    let observations = fallback::load_bundled().unwrap();
    let last = observations.last().unwrap();

    let all_zero = normalize_to_percentage(&WeightDistribution::zeroed());
    for (_, share) in all_zero.iter() {
        assert!((share - 100.0 / 13.0).abs() < 1e-12);
    }
    let even = compute_series(&observations, &all_zero);
    let mean: f64 = last.category_rates.values().sum::<f64>() / 13.0;
    assert!((even.last().unwrap().personal_rate - mean).abs() < 1e-9);

    let amounts: WeightDistribution = BTreeMap::from([
        (ExpenditureCategory::Housing, 12_000.0),
        (ExpenditureCategory::Food, 4_500.0),
        (ExpenditureCategory::Restaurants, 1_200.0),
    ])
    .into();
    let percentages = amounts_to_percentage(&amounts.filled());
    let results = compute_series(&observations, &percentages);
    let breakdown = category_breakdown(last, &percentages);

    let contribution_total: f64 = breakdown.iter().map(|f| f.contribution).sum();
    assert!((contribution_total - results.last().unwrap().personal_rate).abs() < 1e-9);

    let drivers = top_drivers(&breakdown, 3);
    assert_eq!(
        drivers.iter().map(|f| f.category).collect::<Vec<_>>(),
        vec![
            ExpenditureCategory::Housing,
            ExpenditureCategory::Food,
            ExpenditureCategory::Restaurants
        ]
    );
}

#[test]
fn test_series_serializes_for_presentation() {
    let observations = fallback::load_bundled().unwrap();
    let results = compute_series(&observations, &WeightDistribution::national_average());

    let json = serde_json::to_string(&results).unwrap();
    let back: Vec<InflationResult> = serde_json::from_str(&json).unwrap();
    assert_eq!(back.len(), results.len());
    assert_eq!(back[0].period, results[0].period);
}
