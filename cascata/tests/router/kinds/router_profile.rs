use cascata::{CascataError, Provenance};

use crate::helpers::{ACME, MockConnector, fast_retry, memory_builder, profile};

#[tokio::test]
async fn profile_comes_from_first_working_connector() {
    let broken = MockConnector::builder()
        .name("broken")
        .with_profile_fn(|_| Err(CascataError::rejected("broken", "no data")))
        .build();
    let good = MockConnector::builder()
        .name("good")
        .with_profile_fn(|s| Ok(profile(s, "Acme Corp", 42.5, "good")))
        .build();

    let cascata = memory_builder()
        .with_connector(broken)
        .with_connector(good)
        .build()
        .unwrap();

    let r = cascata.profile("acme").await.unwrap();
    assert_eq!(r.source, Provenance::provider("good"));
    let p = r.payload.unwrap();
    assert_eq!(p.display_name(), "Acme Corp");
    assert_eq!(p.symbol.as_str(), ACME);
}

#[tokio::test]
async fn exhausted_profile_yields_stub() {
    let broken = MockConnector::builder()
        .name("broken")
        .with_profile_fn(|_| Err(CascataError::unavailable("broken", "503")))
        .build();

    let cascata = memory_builder()
        .with_connector(broken.clone())
        .retry(fast_retry(1))
        .build()
        .unwrap();

    let r = cascata.profile(ACME).await.unwrap();
    assert!(r.success);
    assert_eq!(r.source, Provenance::Fallback);
    let p = r.payload.unwrap();
    assert_eq!(p.long_name.as_deref(), Some(ACME));
    assert_eq!(p.short_name.as_deref(), Some(ACME));
    assert_eq!(p.data_source, Provenance::Fallback);
    assert!(p.sector.is_none());
    assert!(p.market_cap.is_none());

    // Stubs are not cached: the connector is asked again.
    cascata.profile(ACME).await.unwrap();
    assert_eq!(broken.calls.profile(), 2);
}

#[tokio::test]
async fn invalid_symbol_is_rejected_before_any_call() {
    let good = MockConnector::builder()
        .name("good")
        .with_profile_fn(|s| Ok(profile(s, "Acme Corp", 42.5, "good")))
        .build();
    let cascata = memory_builder()
        .with_connector(good.clone())
        .build()
        .unwrap();

    for bad in ["", "   ", "AC ME", "TOO-LONG-SYMBOL-NAME"] {
        let err = cascata.profile(bad).await.unwrap_err();
        assert!(matches!(err, CascataError::InvalidInput(_)), "{bad:?}");
    }
    assert_eq!(good.calls.total(), 0);
}
