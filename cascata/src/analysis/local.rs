//! Offline keyword heuristic for when the language model is unreachable.

use async_trait::async_trait;
use cascata_core::CascataError;

use super::recommend::{Action, Confidence};
use super::summarizer::Summarizer;

const BULLISH: &[&str] = &["buy", "positive", "increase", "uptrend"];
const BEARISH: &[&str] = &["sell", "negative", "decrease", "downtrend"];

/// Rule-based [`Summarizer`] that needs no server.
///
/// Scans the prompt for bullish words, then bearish words, and answers
/// BUY/MEDIUM, SELL/MEDIUM or HOLD/LOW in the format
/// [`extract_recommendation`](super::extract_recommendation) parses. Lines
/// naming all of buy, sell and hold are instructions and are not scanned.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSummarizer;

fn is_instruction(line: &str) -> bool {
    ["buy", "sell", "hold"].iter().all(|w| line.contains(w))
}

fn mentions(lines: &[String], words: &[&str]) -> bool {
    lines.iter().any(|l| words.iter().any(|w| l.contains(w)))
}

impl LocalSummarizer {
    /// Action and confidence the heuristic assigns to `prompt`.
    #[must_use]
    pub fn classify(prompt: &str) -> (Action, Confidence) {
        let lines: Vec<String> = prompt
            .lines()
            .map(str::to_lowercase)
            .filter(|l| !is_instruction(l))
            .collect();
        if mentions(&lines, BULLISH) {
            (Action::Buy, Confidence::Medium)
        } else if mentions(&lines, BEARISH) {
            (Action::Sell, Confidence::Medium)
        } else {
            (Action::Hold, Confidence::Low)
        }
    }
}

#[async_trait]
impl Summarizer for LocalSummarizer {
    async fn summarize(&self, prompt: &str, _system_prompt: &str) -> Result<String, CascataError> {
        let (action, confidence) = Self::classify(prompt);
        Ok(format!(
            "Based on the available data, this is a simplified rule-based analysis; \
             the language model could not be reached.\n\n\
             RECOMMENDATION: {action} (Confidence: {confidence})\n\n\
             Start the model server for a detailed analysis."
        ))
    }
}
