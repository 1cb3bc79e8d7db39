use std::time::Duration;

use cascata::{CascataError, DataKind, Provenance};

use crate::helpers::{ACME, MockConnector, bars, fast_retry, memory_builder};

#[tokio::test]
async fn transient_errors_are_retried_up_to_max_attempts() {
    let flaky = MockConnector::builder()
        .name("flaky")
        .with_price_fn(|_, _| Err(CascataError::unavailable("flaky", "connection reset")))
        .build();

    let cascata = memory_builder()
        .with_connector(flaky.clone())
        .retry(fast_retry(3))
        .synthetic_fallback(false)
        .build()
        .unwrap();

    let err = cascata.price_history(ACME, "1mo").await.unwrap_err();
    assert_eq!(flaky.calls.price(), 3);
    match err {
        CascataError::AllSourcesExhausted { kind, errors } => {
            assert_eq!(kind, DataKind::Price);
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].connector(), Some("flaky"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn recovery_on_a_later_attempt_keeps_the_same_connector() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    let seen = AtomicUsize::new(0);
    let flaky = MockConnector::builder()
        .name("flaky")
        .with_price_fn(move |_, _| {
            if seen.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(CascataError::unavailable("flaky", "429"))
            } else {
                Ok(bars(4, 10))
            }
        })
        .build();
    let backup = MockConnector::builder()
        .name("backup")
        .with_price_fn(|_, _| Ok(bars(2, 10)))
        .build();

    let cascata = memory_builder()
        .with_connector(flaky.clone())
        .with_connector(backup.clone())
        .retry(fast_retry(2))
        .build()
        .unwrap();

    let r = cascata.price_history(ACME, "1mo").await.unwrap();
    assert_eq!(r.source, Provenance::provider("flaky"));
    assert_eq!(flaky.calls.price(), 2);
    assert_eq!(backup.calls.price(), 0);
}

#[tokio::test]
async fn rejections_are_not_retried() {
    let picky = MockConnector::builder()
        .name("picky")
        .with_price_fn(|_, _| Err(CascataError::rejected("picky", "invalid symbol")))
        .build();
    let backup = MockConnector::builder()
        .name("backup")
        .with_price_fn(|_, _| Ok(bars(2, 10)))
        .build();

    let cascata = memory_builder()
        .with_connector(picky.clone())
        .with_connector(backup)
        .retry(fast_retry(3))
        .build()
        .unwrap();

    let r = cascata.price_history(ACME, "1mo").await.unwrap();
    assert_eq!(r.source, Provenance::provider("backup"));
    assert_eq!(picky.calls.price(), 1);
}

#[tokio::test]
async fn malformed_responses_are_not_retried() {
    let odd = MockConnector::builder()
        .name("odd")
        .with_price_fn(|_, _| {
            Err(CascataError::malformed(
                "odd",
                "missing chart",
                vec!["Information".to_string()],
            ))
        })
        .build();

    let cascata = memory_builder()
        .with_connector(odd.clone())
        .retry(fast_retry(3))
        .synthetic_fallback(false)
        .build()
        .unwrap();

    assert!(cascata.price_history(ACME, "1mo").await.is_err());
    assert_eq!(odd.calls.price(), 1);
}

#[tokio::test]
async fn elapsed_attempts_are_transient_and_retried() {
    let slow = MockConnector::builder()
        .name("slow")
        .delay_ms(500)
        .with_price_fn(|_, _| Ok(bars(3, 10)))
        .build();
    let fast = MockConnector::builder()
        .name("fast")
        .with_price_fn(|_, _| Ok(bars(2, 10)))
        .build();

    let cascata = memory_builder()
        .with_connector(slow.clone())
        .with_connector(fast)
        .provider_timeout(Duration::from_millis(30))
        .retry(fast_retry(2))
        .build()
        .unwrap();

    let r = cascata.price_history(ACME, "1mo").await.unwrap();
    assert_eq!(r.source, Provenance::provider("fast"));
    assert_eq!(slow.calls.price(), 2);
}

#[tokio::test]
async fn errors_without_a_connector_are_attributed_to_the_adapter() {
    let confused = MockConnector::builder()
        .name("confused")
        .with_price_fn(|_, _| Err(CascataError::invalid_input("bad request")))
        .build();

    let cascata = memory_builder()
        .with_connector(confused)
        .synthetic_fallback(false)
        .build()
        .unwrap();

    let err = cascata.price_history(ACME, "1mo").await.unwrap_err();
    let flat = err.flatten();
    assert_eq!(flat.len(), 1);
    assert_eq!(flat[0].connector(), Some("confused"));
}
