use std::sync::Arc;
use std::time::Duration;

use cascata::{
    CacheKey, CacheStore, Cascata, CascataConfig, DataKind, FetchResult, FileCacheStore, Period,
    PricePoint, Provenance,
};

use crate::helpers::{ACME, MockConnector, bars, memory_builder};

fn primary_with(n: usize) -> Arc<MockConnector> {
    MockConnector::builder()
        .name("primary")
        .with_price_fn(move |_, _| Ok(bars(n, 10)))
        .build()
}

#[tokio::test]
async fn second_call_is_served_from_cache_unchanged() {
    let primary = primary_with(22);
    let cascata = memory_builder()
        .with_connector(primary.clone())
        .build()
        .unwrap();

    let first = cascata.price_history(ACME, "1mo").await.unwrap();
    let second = cascata.price_history(ACME, "1mo").await.unwrap();

    assert_eq!(primary.calls.price(), 1);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(second.source, Provenance::provider("primary"));
}

#[tokio::test]
async fn symbols_are_case_insensitive_for_caching() {
    let primary = primary_with(5);
    let cascata = memory_builder()
        .with_connector(primary.clone())
        .build()
        .unwrap();

    cascata.price_history("acme", "1mo").await.unwrap();
    cascata.price_history(" ACME ", "1mo").await.unwrap();
    assert_eq!(primary.calls.price(), 1);
}

#[tokio::test]
async fn periods_are_cached_separately() {
    let primary = primary_with(5);
    let cascata = memory_builder()
        .with_connector(primary.clone())
        .build()
        .unwrap();

    cascata.price_history(ACME, "1mo").await.unwrap();
    cascata.price_history(ACME, "6mo").await.unwrap();
    assert_eq!(primary.calls.price(), 2);
}

#[tokio::test]
async fn expired_entries_are_refetched() {
    let primary = primary_with(5);
    let cascata = memory_builder()
        .with_connector(primary.clone())
        .cache_max_age(DataKind::Price, Duration::ZERO)
        .build()
        .unwrap();

    cascata.price_history(ACME, "1mo").await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    cascata.price_history(ACME, "1mo").await.unwrap();
    assert_eq!(primary.calls.price(), 2);
}

#[tokio::test]
async fn unknown_period_is_cached_under_one_year() {
    let primary = MockConnector::builder()
        .name("primary")
        .with_price_fn(|_, period| {
            assert_eq!(period, Period::Y1);
            Ok(bars(5, 10))
        })
        .build();
    let cascata = memory_builder()
        .with_connector(primary.clone())
        .build()
        .unwrap();

    cascata.price_history(ACME, "2w").await.unwrap();

    let key = CacheKey::new(ACME, "1y", DataKind::Price);
    let hit: Option<FetchResult<Vec<PricePoint>>> =
        cascata.cache().get(&key, Duration::from_secs(60)).await;
    assert!(hit.is_some());

    cascata.price_history(ACME, "1y").await.unwrap();
    assert_eq!(primary.calls.price(), 1);
}

#[tokio::test]
async fn file_cache_survives_a_new_orchestrator() {
    let dir = tempfile::tempdir().unwrap();

    let first = primary_with(7);
    let cascata = memory_builder()
        .with_connector(first.clone())
        .cache_dir(dir.path())
        .build()
        .unwrap();
    let original = cascata.price_history(ACME, "1mo").await.unwrap();
    assert_eq!(first.calls.price(), 1);

    let store = FileCacheStore::new(dir.path());
    let key = CacheKey::new(ACME, "1mo", DataKind::Price);
    assert!(store.path_for(&key).exists());

    let second = primary_with(7);
    let restarted = memory_builder()
        .with_connector(second.clone())
        .cache_store(Arc::new(store) as Arc<dyn CacheStore>)
        .build()
        .unwrap();
    let cached = restarted.price_history(ACME, "1mo").await.unwrap();

    assert_eq!(second.calls.price(), 0);
    assert_eq!(cached, original);
}

#[tokio::test]
async fn default_cache_is_durable_across_orchestrators() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = CascataConfig {
        cache_dir: dir.path().to_path_buf(),
        ..CascataConfig::default()
    };

    let first = primary_with(7);
    let cascata = Cascata::builder()
        .with_connector(first.clone())
        .config(cfg.clone())
        .build()
        .unwrap();
    let original = cascata.price_history(ACME, "1mo").await.unwrap();
    drop(cascata);

    let second = primary_with(7);
    let restarted = Cascata::builder()
        .with_connector(second.clone())
        .config(cfg)
        .build()
        .unwrap();
    let key = CacheKey::new(ACME, "1mo", DataKind::Price);
    let hit: Option<FetchResult<Vec<PricePoint>>> =
        restarted.cache().get(&key, Duration::from_secs(60)).await;
    assert!(hit.is_some());

    let cached = restarted.price_history(ACME, "1mo").await.unwrap();
    assert_eq!(second.calls.price(), 0);
    assert_eq!(cached, original);
}
