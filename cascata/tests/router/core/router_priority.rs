use cascata::{CascataError, ConnectorKey, DataKind, Provenance};

use crate::helpers::{ACME, MockConnector, bars, fast_retry, headlines, memory_builder, profile};

#[tokio::test]
async fn falls_back_to_next_connector_in_registration_order() {
    let primary = MockConnector::builder()
        .name("primary")
        .with_price_fn(|_, _| Err(CascataError::unavailable("primary", "503")))
        .build();
    let secondary = MockConnector::builder()
        .name("secondary")
        .with_price_fn(|_, _| Ok(bars(5, 10)))
        .build();

    let cascata = memory_builder()
        .with_connector(primary.clone())
        .with_connector(secondary.clone())
        .retry(fast_retry(1))
        .build()
        .unwrap();

    let r = cascata.price_history(ACME, "1mo").await.unwrap();
    assert!(r.success);
    assert_eq!(r.source, Provenance::provider("secondary"));
    assert_eq!(r.payload.unwrap().len(), 5);
    assert_eq!(primary.calls.price(), 1);
    assert_eq!(secondary.calls.price(), 1);
}

#[tokio::test]
async fn first_success_stops_the_cascade() {
    let primary = MockConnector::builder()
        .name("primary")
        .with_price_fn(|_, _| Ok(bars(3, 10)))
        .build();
    let secondary = MockConnector::builder()
        .name("secondary")
        .with_price_fn(|_, _| Ok(bars(9, 10)))
        .build();

    let cascata = memory_builder()
        .with_connector(primary.clone())
        .with_connector(secondary.clone())
        .build()
        .unwrap();

    let r = cascata.price_history(ACME, "1mo").await.unwrap();
    assert_eq!(r.source, Provenance::provider("primary"));
    assert_eq!(secondary.calls.price(), 0);
}

#[tokio::test]
async fn per_kind_priority_is_applied_to_that_kind_only() {
    let low = MockConnector::builder()
        .name("low")
        .with_price_fn(|_, _| Ok(bars(3, 10)))
        .with_news_fn(|s, n| Ok(headlines(s, n)))
        .build();
    let high = MockConnector::builder()
        .name("high")
        .with_price_fn(|_, _| Ok(bars(4, 10)))
        .with_news_fn(|s, n| Ok(headlines(s, n)))
        .build();

    let cascata = memory_builder()
        .with_connector(low.clone())
        .with_connector(high.clone())
        .prefer_for_kind(DataKind::Price, &[ConnectorKey::new("high")])
        .build()
        .unwrap();

    let price = cascata.price_history(ACME, "1mo").await.unwrap();
    assert_eq!(price.source, Provenance::provider("high"));
    assert_eq!(low.calls.price(), 0);

    let news = cascata.news(ACME).await.unwrap();
    assert_eq!(news.source, Provenance::provider("low"));
    assert_eq!(high.calls.news(), 0);
}

#[tokio::test]
async fn connectors_without_the_capability_are_skipped() {
    let profile_only = MockConnector::builder()
        .name("profile_only")
        .with_profile_fn(|s| Ok(profile(s, "Acme Corp", 42.5, "profile_only")))
        .build();
    let prices = MockConnector::builder()
        .name("prices")
        .with_price_fn(|_, _| Ok(bars(3, 10)))
        .build();

    let cascata = memory_builder()
        .with_connector(profile_only.clone())
        .with_connector(prices)
        .build()
        .unwrap();

    let r = cascata.price_history(ACME, "1mo").await.unwrap();
    assert_eq!(r.source, Provenance::provider("prices"));
    assert_eq!(profile_only.calls.total(), 0);
}

#[tokio::test]
async fn kind_with_no_capable_connector_reports_unsupported() {
    let prices = MockConnector::builder()
        .name("prices")
        .with_price_fn(|_, _| Ok(bars(3, 10)))
        .build();
    let cascata = memory_builder().with_connector(prices).build().unwrap();

    let news = cascata.news(ACME).await.unwrap();
    assert!(!news.success);
    assert_eq!(news.source, Provenance::Fallback);
    assert_eq!(news.error.as_deref(), Some("unsupported capability: news"));
}
