use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use cascata::{AttemptEvent, CascataError, DataKind};

use crate::helpers::{ACME, MockConnector, Recorder, bars, fast_retry, memory_builder};

#[tokio::test]
async fn observer_sees_every_attempt_in_order() {
    let down = MockConnector::builder()
        .name("down")
        .with_price_fn(|_, _| Err(CascataError::unavailable("down", "503")))
        .build();
    let up = MockConnector::builder()
        .name("up")
        .with_price_fn(|_, _| Ok(bars(3, 10)))
        .build();
    let rec = Recorder::new();

    let cascata = memory_builder()
        .with_connector(down)
        .with_connector(up)
        .retry(fast_retry(2))
        .observer(rec.clone())
        .build()
        .unwrap();

    cascata.price_history(ACME, "1mo").await.unwrap();

    let events = rec.snapshot();
    let summary: Vec<(&str, u32, &str)> = events
        .iter()
        .map(|e| (e.adapter, e.attempt, e.outcome))
        .collect();
    assert_eq!(
        summary,
        vec![("down", 1, "unavailable"), ("down", 2, "unavailable"), ("up", 1, "ok")]
    );
    assert!(events.iter().all(|e| e.kind == DataKind::Price));
    assert!(events.iter().all(|e| e.symbol.as_str() == ACME));
    assert!(events[0].error.as_deref().unwrap().contains("503"));
    assert!(events[2].error.is_none());
    assert!(events[2].is_ok());
}

#[tokio::test]
async fn timeouts_are_labelled() {
    let slow = MockConnector::builder()
        .name("slow")
        .delay_ms(300)
        .with_price_fn(|_, _| Ok(bars(3, 10)))
        .build();
    let rec = Recorder::new();

    let cascata = memory_builder()
        .with_connector(slow)
        .provider_timeout(Duration::from_millis(20))
        .retry(fast_retry(1))
        .synthetic_fallback(false)
        .observer(rec.clone())
        .build()
        .unwrap();

    assert!(cascata.price_history(ACME, "1mo").await.is_err());
    let events = rec.snapshot();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome, "timeout");
}

#[tokio::test]
async fn closures_can_observe() {
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    let observer = move |_: &AttemptEvent| {
        seen.fetch_add(1, Ordering::SeqCst);
    };
    let up = MockConnector::builder()
        .name("up")
        .with_price_fn(|_, _| Ok(bars(3, 10)))
        .build();

    let cascata = memory_builder()
        .with_connector(up)
        .observer(Arc::new(observer))
        .build()
        .unwrap();

    cascata.price_history(ACME, "1mo").await.unwrap();
    // Served from cache: no further attempts.
    cascata.price_history(ACME, "1mo").await.unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
}
