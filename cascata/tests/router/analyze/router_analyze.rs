use std::time::Duration;

use cascata::{CacheKey, CascataError, DataKind, FetchResult, Period, PricePoint, Provenance};

use crate::helpers::{
    ACME, MockConnector, bars, fast_retry, headlines, income_only, init_tracing, memory_builder,
    profile,
};

#[tokio::test]
async fn single_primary_connector_fills_every_kind() {
    init_tracing();
    let primary = MockConnector::builder()
        .name("primary")
        .with_price_fn(|_, _| Ok(bars(22, 40)))
        .with_profile_fn(|s| Ok(profile(s, "Acme Corp", 42.5, "primary")))
        .with_news_fn(|s, n| Ok(headlines(s, n)))
        .with_fundamentals_fn(|_| Ok(income_only()))
        .build();

    let cascata = memory_builder()
        .with_connector(primary.clone())
        .build()
        .unwrap();

    let record = cascata.analyze(ACME, "1mo").await.unwrap();
    assert_eq!(record.symbol.as_str(), ACME);
    assert_eq!(record.period, Period::M1);
    assert_eq!(record.prices().len(), 22);

    let prov = record.provenance();
    for p in [&prov.price_history, &prov.profile, &prov.news, &prov.fundamentals] {
        assert_eq!(*p, Provenance::provider("primary"));
    }

    let key = CacheKey::new(ACME, "1mo", DataKind::Price);
    let cached: Option<FetchResult<Vec<PricePoint>>> =
        cascata.cache().get(&key, Duration::from_secs(3600)).await;
    assert_eq!(cached.unwrap().payload.unwrap().len(), 22);
}

#[tokio::test]
async fn repeated_analyze_hits_cache_for_every_kind() {
    let primary = MockConnector::builder()
        .name("primary")
        .with_price_fn(|_, _| Ok(bars(22, 40)))
        .with_profile_fn(|s| Ok(profile(s, "Acme Corp", 42.5, "primary")))
        .with_news_fn(|s, n| Ok(headlines(s, n)))
        .with_fundamentals_fn(|_| Ok(income_only()))
        .build();

    let cascata = memory_builder()
        .with_connector(primary.clone())
        .build()
        .unwrap();

    let a = cascata.analyze(ACME, "1mo").await.unwrap();
    assert_eq!(primary.calls.total(), 4);
    let b = cascata.analyze(ACME, "1mo").await.unwrap();
    assert_eq!(primary.calls.total(), 4);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[tokio::test]
async fn partial_record_keeps_successful_kinds() {
    let primary = MockConnector::builder()
        .name("primary")
        .with_price_fn(|_, _| Ok(bars(10, 40)))
        .with_profile_fn(|s| Ok(profile(s, "Acme Corp", 42.5, "primary")))
        .with_news_fn(|_, _| Err(CascataError::unavailable("primary", "news down")))
        .with_fundamentals_fn(|_| Err(CascataError::rejected("primary", "premium endpoint")))
        .build();

    let cascata = memory_builder()
        .with_connector(primary)
        .retry(fast_retry(1))
        .build()
        .unwrap();

    let record = cascata.analyze(ACME, "1mo").await.unwrap();
    assert_eq!(record.prices().len(), 10);
    assert!(record.news_items().is_empty());
    assert!(record.financials().is_none());
    assert!(!record.news.success);
    assert!(!record.fundamentals.success);

    let prov = record.provenance();
    assert_eq!(prov.price_history, Provenance::provider("primary"));
    assert_eq!(prov.profile, Provenance::provider("primary"));
    assert_eq!(prov.news, Provenance::Fallback);
    assert_eq!(prov.fundamentals, Provenance::Fallback);
}

#[tokio::test]
async fn everything_down_still_produces_a_degraded_record() {
    init_tracing();
    let down = MockConnector::builder()
        .name("down")
        .with_price_fn(|_, _| Err(CascataError::unavailable("down", "503")))
        .with_profile_fn(|_| Err(CascataError::unavailable("down", "503")))
        .with_news_fn(|_, _| Err(CascataError::unavailable("down", "503")))
        .with_fundamentals_fn(|_| Err(CascataError::unavailable("down", "503")))
        .build();

    let cascata = memory_builder()
        .with_connector(down)
        .retry(fast_retry(1))
        .synthetic_seed(3)
        .build()
        .unwrap();

    let record = cascata.analyze(ACME, "1mo").await.unwrap();
    let prov = record.provenance();
    assert_eq!(prov.price_history, Provenance::Synthetic);
    assert_eq!(prov.profile, Provenance::Fallback);
    assert_eq!(prov.news, Provenance::Fallback);
    assert_eq!(prov.fundamentals, Provenance::Fallback);
    assert_eq!(record.prices().len(), 30);
    assert!(record.prices().iter().all(|p| p.synthetic));
    assert_eq!(record.company().unwrap().display_name(), ACME);
}

#[tokio::test]
async fn unknown_period_is_substituted_before_fetching() {
    let primary = MockConnector::builder()
        .name("primary")
        .with_price_fn(|_, period| {
            assert_eq!(period, Period::Y1);
            Ok(bars(5, 40))
        })
        .build();

    let cascata = memory_builder()
        .with_connector(primary)
        .build()
        .unwrap();

    let record = cascata.analyze(ACME, "2w").await.unwrap();
    assert_eq!(record.period, Period::Y1);
    let key = CacheKey::new(ACME, "1y", DataKind::Price);
    let cached: Option<FetchResult<Vec<PricePoint>>> =
        cascata.cache().get(&key, Duration::from_secs(3600)).await;
    assert!(cached.is_some());
}

#[tokio::test]
async fn invalid_symbol_fails_before_any_call() {
    let primary = MockConnector::builder()
        .name("primary")
        .with_price_fn(|_, _| Ok(bars(5, 40)))
        .with_profile_fn(|s| Ok(profile(s, "Acme Corp", 42.5, "primary")))
        .build();

    let cascata = memory_builder()
        .with_connector(primary.clone())
        .build()
        .unwrap();

    let err = cascata.analyze("AC$ME", "1mo").await.unwrap_err();
    assert!(matches!(err, CascataError::InvalidInput(_)));
    assert_eq!(primary.calls.total(), 0);
}

#[tokio::test]
async fn price_exhaustion_without_synthetic_fails_the_record() {
    let down = MockConnector::builder()
        .name("down")
        .with_price_fn(|_, _| Err(CascataError::unavailable("down", "503")))
        .with_news_fn(|s, n| Ok(headlines(s, n)))
        .build();

    let cascata = memory_builder()
        .with_connector(down)
        .retry(fast_retry(1))
        .synthetic_fallback(false)
        .build()
        .unwrap();

    let err = cascata.analyze(ACME, "1mo").await.unwrap_err();
    assert!(matches!(
        err,
        CascataError::AllSourcesExhausted {
            kind: DataKind::Price,
            ..
        }
    ));
}

#[tokio::test]
async fn request_deadline_bounds_the_whole_call() {
    let slow = MockConnector::builder()
        .name("slow")
        .delay_ms(400)
        .with_price_fn(|_, _| Ok(bars(5, 40)))
        .build();

    let cascata = memory_builder()
        .with_connector(slow)
        .request_timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let err = cascata.analyze(ACME, "1mo").await.unwrap_err();
    assert!(matches!(err, CascataError::RequestTimeout { .. }));
}

#[tokio::test]
async fn kinds_are_fetched_concurrently() {
    let slow = MockConnector::builder()
        .name("slow")
        .delay_ms(150)
        .with_price_fn(|_, _| Ok(bars(5, 40)))
        .with_profile_fn(|s| Ok(profile(s, "Acme Corp", 42.5, "slow")))
        .with_news_fn(|s, n| Ok(headlines(s, n)))
        .with_fundamentals_fn(|_| Ok(income_only()))
        .build();

    let cascata = memory_builder()
        .with_connector(slow)
        .request_timeout(Duration::from_millis(450))
        .build()
        .unwrap();

    // Four sequential 150ms calls would blow the 450ms deadline.
    let record = cascata.analyze(ACME, "1mo").await.unwrap();
    assert_eq!(record.prices().len(), 5);
}
