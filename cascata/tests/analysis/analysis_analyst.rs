use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cascata::CascataError;
use cascata::analysis::{
    Action, Analyst, Confidence, LocalSummarizer, SYSTEM_PROMPT, Summarizer,
};

use crate::record;

struct Canned {
    reply: Result<String, CascataError>,
    seen: Mutex<Vec<(String, String)>>,
}

impl Canned {
    fn new(reply: Result<String, CascataError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Summarizer for Canned {
    async fn summarize(&self, prompt: &str, system_prompt: &str) -> Result<String, CascataError> {
        self.seen
            .lock()
            .unwrap()
            .push((prompt.to_string(), system_prompt.to_string()));
        self.reply.clone()
    }
}

#[tokio::test]
async fn parses_the_summarizer_reply() {
    let canned = Canned::new(Ok(
        "Solid balance sheet.\n\nRECOMMENDATION: BUY (Confidence: MEDIUM)".to_string(),
    ));
    let analyst = Analyst::new(canned.clone());

    let rec = analyst.recommend(&record(60)).await;
    assert_eq!(rec.action, Action::Buy);
    assert_eq!(rec.confidence, Confidence::Medium);
    assert!(rec.analysis.starts_with("Solid balance sheet."));
    assert!(rec.technicals.is_some());

    let seen = canned.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].0.contains("ACME"));
    assert_eq!(seen[0].1, SYSTEM_PROMPT);
}

#[tokio::test]
async fn summarizer_failure_defaults_to_hold_low() {
    let canned = Canned::new(Err(CascataError::unavailable("ollama", "connection refused")));
    let analyst = Analyst::new(canned);

    let rec = analyst.recommend(&record(10)).await;
    assert_eq!(rec.action, Action::Hold);
    assert_eq!(rec.confidence, Confidence::Low);
    assert!(rec.analysis.is_empty());
    assert!(rec.technicals.is_none());
}

#[tokio::test]
async fn recommendation_serializes_with_wire_tokens() {
    let canned = Canned::new(Ok("RECOMMENDATION: SELL (Confidence: HIGH)".to_string()));
    let rec = Analyst::new(canned).recommend(&record(10)).await;
    let json = serde_json::to_value(&rec).unwrap();
    assert_eq!(json["action"], "SELL");
    assert_eq!(json["confidence"], "HIGH");
}

#[tokio::test]
async fn fallback_reads_an_uptrend_as_buy() {
    let down = Canned::new(Err(CascataError::unavailable("ollama", "connection refused")));
    let analyst = Analyst::new(down.clone()).with_fallback(Arc::new(LocalSummarizer));

    let rec = analyst.recommend(&record(60)).await;
    assert_eq!(down.seen.lock().unwrap().len(), 1);
    assert_eq!(rec.action, Action::Buy);
    assert_eq!(rec.confidence, Confidence::Medium);
    assert!(rec.analysis.contains("RECOMMENDATION: BUY (Confidence: MEDIUM)"));
}

#[tokio::test]
async fn fallback_without_signals_holds() {
    let down = Canned::new(Err(CascataError::unavailable("ollama", "connection refused")));
    let analyst = Analyst::new(down).with_fallback(Arc::new(LocalSummarizer));

    let rec = analyst.recommend(&record(10)).await;
    assert_eq!(rec.action, Action::Hold);
    assert_eq!(rec.confidence, Confidence::Low);
    assert!(!rec.analysis.is_empty());
}

#[tokio::test]
async fn fallback_is_skipped_when_the_summarizer_answers() {
    let up = Canned::new(Ok("RECOMMENDATION: SELL (Confidence: HIGH)".to_string()));
    let spare = Canned::new(Ok("RECOMMENDATION: BUY (Confidence: LOW)".to_string()));
    let analyst = Analyst::new(up).with_fallback(spare.clone());

    let rec = analyst.recommend(&record(60)).await;
    assert_eq!(rec.action, Action::Sell);
    assert!(spare.seen.lock().unwrap().is_empty());
}
