use std::sync::Arc;

use cascata_core::{CascataError, NormalizedRecord};
use serde::Serialize;

use super::indicators::{Technicals, technicals};
use super::prompt::{SYSTEM_PROMPT, build_prompt};
use super::recommend::{Action, Confidence, extract_recommendation};
use super::summarizer::Summarizer;

/// Outcome of [`Analyst::recommend`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// Parsed action; HOLD when the text could not be produced or parsed.
    pub action: Action,
    /// Parsed confidence; LOW when the text could not be produced or parsed.
    pub confidence: Confidence,
    /// Raw text returned by the summarizer.
    pub analysis: String,
    /// Indicator snapshot included in the prompt, if the series was long enough.
    pub technicals: Option<Technicals>,
}

/// Turns a [`NormalizedRecord`] into a [`Recommendation`] via a [`Summarizer`].
#[derive(Clone)]
pub struct Analyst {
    summarizer: Arc<dyn Summarizer>,
    fallback: Option<Arc<dyn Summarizer>>,
}

impl std::fmt::Debug for Analyst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyst")
            .field("fallback", &self.fallback.is_some())
            .finish_non_exhaustive()
    }
}

impl Analyst {
    /// Wrap a summarizer.
    pub fn new(summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            summarizer,
            fallback: None,
        }
    }

    /// Ask `fallback` when the primary summarizer fails, e.g. a
    /// [`LocalSummarizer`](super::LocalSummarizer).
    #[must_use]
    pub fn with_fallback(mut self, fallback: Arc<dyn Summarizer>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    async fn ask(&self, prompt: &str) -> Result<String, CascataError> {
        match self.summarizer.summarize(prompt, SYSTEM_PROMPT).await {
            Ok(text) => Ok(text),
            Err(e) => {
                let Some(fallback) = &self.fallback else {
                    return Err(e);
                };
                tracing::warn!(target: "cascata::analysis", error = %e, "summarizer failed; using fallback");
                fallback.summarize(prompt, SYSTEM_PROMPT).await
            }
        }
    }

    /// Build the prompt, ask the summarizer, and parse its answer.
    ///
    /// Summarizer failures do not propagate. The fallback is asked if one is
    /// set; otherwise the result carries an empty analysis and HOLD/LOW.
    #[tracing::instrument(target = "cascata::analysis", skip_all, fields(symbol = %record.symbol))]
    pub async fn recommend(&self, record: &NormalizedRecord) -> Recommendation {
        let technicals = technicals(record.prices());
        let prompt = build_prompt(record, technicals.as_ref());
        match self.ask(&prompt).await {
            Ok(analysis) => {
                let (action, confidence) = extract_recommendation(&analysis);
                tracing::info!(target: "cascata::analysis", %action, %confidence, "recommendation parsed");
                Recommendation {
                    action,
                    confidence,
                    analysis,
                    technicals,
                }
            }
            Err(e) => {
                tracing::warn!(target: "cascata::analysis", error = %e, "summarizer failed; defaulting to HOLD");
                Recommendation {
                    action: Action::default(),
                    confidence: Confidence::default(),
                    analysis: String::new(),
                    technicals,
                }
            }
        }
    }
}
