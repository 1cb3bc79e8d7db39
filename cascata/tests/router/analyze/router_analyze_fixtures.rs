use std::sync::Arc;
use std::time::Duration;

use cascata::{CascataError, Provenance};
use cascata_mock::{FAIL_SYMBOL, MockConnector as FixtureConnector, TIMEOUT_SYMBOL};

use crate::helpers::{fast_retry, memory_builder};

#[tokio::test]
async fn fixture_connector_serves_a_full_record() {
    let cascata = memory_builder()
        .with_connector(Arc::new(FixtureConnector::new()))
        .build()
        .unwrap();

    let record = cascata.analyze("aapl", "6mo").await.unwrap();
    let prov = record.provenance();
    assert_eq!(prov.price_history, Provenance::provider("mock"));
    assert_eq!(prov.news, Provenance::provider("mock"));
    assert!(!record.prices().is_empty());
    assert!(record.prices().windows(2).all(|w| w[0].date < w[1].date));
    assert_eq!(record.news_items()[0].title, "Apple unveils new silicon");
    assert_eq!(record.company().unwrap().display_name(), "Apple Inc.");
}

#[tokio::test]
async fn unknown_fixture_symbol_degrades_every_kind() {
    let cascata = memory_builder()
        .with_connector(Arc::new(FixtureConnector::new()))
        .synthetic_seed(5)
        .build()
        .unwrap();

    let record = cascata.analyze("ZZZZ", "1w").await.unwrap();
    let prov = record.provenance();
    assert_eq!(prov.price_history, Provenance::Synthetic);
    assert_eq!(prov.profile, Provenance::Fallback);
    assert_eq!(record.prices().len(), 7);
}

#[tokio::test]
async fn forced_failures_are_reported_per_connector() {
    let cascata = memory_builder()
        .with_connector(Arc::new(FixtureConnector::new().named("primary")))
        .with_connector(Arc::new(FixtureConnector::new().named("backup")))
        .retry(fast_retry(2))
        .synthetic_fallback(false)
        .build()
        .unwrap();

    let err = cascata.price_history(FAIL_SYMBOL, "1mo").await.unwrap_err();
    match err {
        CascataError::AllSourcesExhausted { errors, .. } => {
            let names: Vec<_> = errors.iter().filter_map(CascataError::connector).collect();
            assert_eq!(names, vec!["primary", "backup"]);
            assert!(errors.iter().all(CascataError::is_transient));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn slow_fixture_symbol_trips_the_provider_timeout() {
    let cascata = memory_builder()
        .with_connector(Arc::new(
            FixtureConnector::new().with_timeout_delay(Duration::from_millis(300)),
        ))
        .provider_timeout(Duration::from_millis(30))
        .retry(fast_retry(1))
        .synthetic_seed(9)
        .build()
        .unwrap();

    let r = cascata.price_history(TIMEOUT_SYMBOL, "1w").await.unwrap();
    assert_eq!(r.source, Provenance::Synthetic);
}
