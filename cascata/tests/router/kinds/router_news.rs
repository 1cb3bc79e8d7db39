use cascata::{CascataError, Provenance};

use crate::helpers::{ACME, MockConnector, fast_retry, headlines, memory_builder};

#[tokio::test]
async fn news_is_capped_at_the_configured_limit() {
    let chatty = MockConnector::builder()
        .name("chatty")
        // Ignores the requested limit.
        .with_news_fn(|s, _| Ok(headlines(s, 12)))
        .build();

    let cascata = memory_builder()
        .with_connector(chatty)
        .news_limit(3)
        .build()
        .unwrap();

    let r = cascata.news(ACME).await.unwrap();
    let items = r.payload.unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].title, "ACME headline 0");
}

#[tokio::test]
async fn requested_limit_is_passed_to_the_connector() {
    let polite = MockConnector::builder()
        .name("polite")
        .with_news_fn(|s, limit| {
            assert_eq!(limit, 5);
            Ok(headlines(s, limit))
        })
        .build();

    let cascata = memory_builder().with_connector(polite).build().unwrap();
    let r = cascata.news(ACME).await.unwrap();
    assert_eq!(r.payload.unwrap().len(), 5);
}

#[tokio::test]
async fn exhausted_news_is_a_failed_fallback_envelope() {
    let a = MockConnector::builder()
        .name("a")
        .with_news_fn(|_, _| Err(CascataError::unavailable("a", "503")))
        .build();
    let b = MockConnector::builder()
        .name("b")
        .with_news_fn(|_, _| Err(CascataError::rejected("b", "no news")))
        .build();

    let cascata = memory_builder()
        .with_connector(a)
        .with_connector(b)
        .retry(fast_retry(1))
        .build()
        .unwrap();

    let r = cascata.news(ACME).await.unwrap();
    assert!(!r.success);
    assert!(r.payload.is_none());
    assert_eq!(r.source, Provenance::Fallback);
    assert_eq!(
        r.error.as_deref(),
        Some("all sources exhausted for news: a unavailable: 503; b rejected request: no news")
    );
}
