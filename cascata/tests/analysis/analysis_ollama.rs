use cascata::CascataError;
use cascata::analysis::{OllamaSummarizer, Summarizer};
use httpmock::prelude::*;
use serde_json::json;

#[tokio::test]
async fn posts_chat_request_and_reads_message_content() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/chat")
                .body_includes(r#""model":"tiny""#)
                .body_includes(r#""stream":false"#)
                .body_includes("\"role\":\"system\"")
                .body_includes("describe ACME");
            then.status(200).json_body(json!({
                "model": "tiny",
                "message": {"role": "assistant", "content": "RECOMMENDATION: HOLD (Confidence: LOW)"},
                "done": true
            }));
        })
        .await;

    let summarizer = OllamaSummarizer::builder()
        .host(server.base_url())
        .model("tiny")
        .build()
        .unwrap();
    let text = summarizer
        .summarize("describe ACME", "be brief")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(text, "RECOMMENDATION: HOLD (Confidence: LOW)");
}

#[tokio::test]
async fn missing_message_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat");
            then.status(200).json_body(json!({"error": "model not found"}));
        })
        .await;

    let summarizer = OllamaSummarizer::builder()
        .host(server.base_url())
        .build()
        .unwrap();
    let err = summarizer.summarize("p", "s").await.unwrap_err();
    match err {
        CascataError::MalformedResponse {
            connector, keys, ..
        } => {
            assert_eq!(connector, "ollama");
            assert_eq!(keys, vec!["error".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn server_errors_are_transient() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat");
            then.status(503);
        })
        .await;

    let summarizer = OllamaSummarizer::builder()
        .host(server.base_url())
        .build()
        .unwrap();
    let err = summarizer.summarize("p", "s").await.unwrap_err();
    assert!(err.is_transient());
}

#[test]
fn credentials_override_defaults() {
    let creds = cascata::ProviderCredentials {
        ollama_model: Some("llama3".to_string()),
        ..Default::default()
    };
    let s = OllamaSummarizer::from_credentials(&creds).unwrap();
    assert_eq!(s.model(), "llama3");
    let default = OllamaSummarizer::from_credentials(&cascata::ProviderCredentials::default()).unwrap();
    assert_eq!(default.model(), OllamaSummarizer::DEFAULT_MODEL);
}
