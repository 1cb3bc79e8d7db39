use core::fmt;

use serde::{Deserialize, Serialize};

const MARKER: &str = "RECOMMENDATION:";
const CONFIDENCE_MARKER: &str = "Confidence:";
const ACTION_SPAN: usize = 20;
const CONFIDENCE_SPAN: usize = 10;

/// Suggested action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    /// Buy.
    Buy,
    /// Sell.
    Sell,
    /// Hold; also the default when nothing parses.
    #[default]
    Hold,
}

/// Confidence attached to an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    /// High.
    High,
    /// Medium.
    Medium,
    /// Low; also the default when nothing parses.
    #[default]
    Low,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        })
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        })
    }
}

fn head(s: &str, chars: usize) -> &str {
    s.char_indices().nth(chars).map_or(s, |(i, _)| &s[..i])
}

/// Pull the action and confidence out of free-form model output.
///
/// Looks for `RECOMMENDATION:` and searches the first 20 characters after
/// it for BUY, SELL or HOLD (in that order), then the 10 characters after
/// `Confidence:` for HIGH, MEDIUM or LOW. Anything missing stays HOLD/LOW.
#[must_use]
pub fn extract_recommendation(text: &str) -> (Action, Confidence) {
    let mut action = Action::default();
    let mut confidence = Confidence::default();

    let Some(rest) = text.split(MARKER).nth(1) else {
        return (action, confidence);
    };
    let rest = rest.trim();

    let span = head(rest, ACTION_SPAN);
    if span.contains("BUY") {
        action = Action::Buy;
    } else if span.contains("SELL") {
        action = Action::Sell;
    } else if span.contains("HOLD") {
        action = Action::Hold;
    }

    if let Some(conf) = rest.split(CONFIDENCE_MARKER).nth(1) {
        let span = head(conf.trim(), CONFIDENCE_SPAN);
        if span.contains("HIGH") {
            confidence = Confidence::High;
        } else if span.contains("MEDIUM") {
            confidence = Confidence::Medium;
        } else if span.contains("LOW") {
            confidence = Confidence::Low;
        }
    }
    (action, confidence)
}
