use std::sync::Arc;

use cascata::{CascataError, DataKind, Period, PricePoint, Provenance};
use cascata_core::synthetic_len;
use proptest::prelude::*;

use crate::helpers::{ACME, MockConnector, fast_retry, memory_builder, profile};

fn dead_prices(name: &'static str) -> Arc<MockConnector> {
    MockConnector::builder()
        .name(name)
        .with_price_fn(move |_, _| Err(CascataError::unavailable(name, "down")))
        .build()
}

fn assert_well_formed(series: &[PricePoint]) {
    assert!(series.windows(2).all(|w| w[0].date < w[1].date));
    for p in series {
        assert!(p.synthetic);
        assert!(p.low > rust_decimal::Decimal::ZERO);
        assert!(p.high >= p.open.max(p.close));
        assert!(p.low <= p.open.min(p.close));
    }
}

#[tokio::test]
async fn exhausted_prices_fall_back_to_synthetic_series() {
    let cascata = memory_builder()
        .with_connector(dead_prices("p1"))
        .with_connector(dead_prices("p2"))
        .retry(fast_retry(1))
        .synthetic_seed(7)
        .build()
        .unwrap();

    let r = cascata.price_history(ACME, "1mo").await.unwrap();
    assert!(r.success);
    assert_eq!(r.source, Provenance::Synthetic);
    let series = r.payload.unwrap();
    assert_eq!(series.len(), 30);
    assert_well_formed(&series);
}

#[tokio::test]
async fn synthetic_length_is_capped_at_a_year() {
    let cascata = memory_builder()
        .with_connector(dead_prices("p1"))
        .retry(fast_retry(1))
        .build()
        .unwrap();

    let r = cascata.price_history(ACME, "5y").await.unwrap();
    assert_eq!(r.payload.unwrap().len(), 365);
}

#[tokio::test]
async fn profile_price_seeds_the_walk() {
    let prices = dead_prices("prices");
    let profiles = MockConnector::builder()
        .name("profiles")
        .with_profile_fn(|s| Ok(profile(s, "Acme Corp", 4_000.0, "profiles")))
        .build();
    let cascata = memory_builder()
        .with_connector(prices)
        .with_connector(profiles.clone())
        .retry(fast_retry(1))
        .synthetic_seed(11)
        .build()
        .unwrap();

    let r = cascata.price_history(ACME, "1w").await.unwrap();
    let first: f64 = r.payload.unwrap()[0].close.try_into().unwrap();
    // A week of 2% daily moves cannot get anywhere near the 100 default.
    assert!(first > 2_000.0, "walk should start near 4000, got {first}");
    assert_eq!(profiles.calls.profile(), 1);
}

#[tokio::test]
async fn synthetic_results_are_not_cached_by_default() {
    let prices = dead_prices("prices");
    let cascata = memory_builder()
        .with_connector(prices.clone())
        .retry(fast_retry(1))
        .build()
        .unwrap();

    cascata.price_history(ACME, "1mo").await.unwrap();
    cascata.price_history(ACME, "1mo").await.unwrap();
    assert_eq!(prices.calls.price(), 2);
}

#[tokio::test]
async fn synthetic_results_are_cached_when_asked() {
    let prices = dead_prices("prices");
    let cascata = memory_builder()
        .with_connector(prices.clone())
        .retry(fast_retry(1))
        .cache_degraded(true)
        .build()
        .unwrap();

    let a = cascata.price_history(ACME, "1mo").await.unwrap();
    let b = cascata.price_history(ACME, "1mo").await.unwrap();
    assert_eq!(prices.calls.price(), 1);
    assert_eq!(a, b);
}

#[tokio::test]
async fn disabled_synthetic_fallback_surfaces_exhaustion() {
    let cascata = memory_builder()
        .with_connector(dead_prices("p1"))
        .with_connector(dead_prices("p2"))
        .retry(fast_retry(1))
        .synthetic_fallback(false)
        .build()
        .unwrap();

    let err = cascata.price_history(ACME, "1mo").await.unwrap_err();
    match err {
        CascataError::AllSourcesExhausted { kind, errors } => {
            assert_eq!(kind, DataKind::Price);
            let names: Vec<_> = errors.iter().filter_map(CascataError::connector).collect();
            assert_eq!(names, vec!["p1", "p2"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn missing_base_price_surfaces_exhaustion() {
    let cascata = memory_builder()
        .with_connector(dead_prices("p1"))
        .retry(fast_retry(1))
        .default_base_price(None)
        .build()
        .unwrap();

    let err = cascata.price_history(ACME, "1mo").await.unwrap_err();
    assert!(matches!(
        err,
        CascataError::AllSourcesExhausted {
            kind: DataKind::Price,
            ..
        }
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn synthetic_series_is_well_formed(seed in any::<u64>(), idx in 0usize..Period::ALL.len()) {
        let period = Period::ALL[idx];
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let series = rt.block_on(async {
            let cascata = memory_builder()
                .with_connector(dead_prices("p1"))
                .retry(fast_retry(1))
                .synthetic_seed(seed)
                .build()
                .unwrap();
            cascata.price_history(ACME, period.code()).await.unwrap().payload.unwrap()
        });
        prop_assert_eq!(series.len(), synthetic_len(period) as usize);
        assert_well_formed(&series);
    }
}
