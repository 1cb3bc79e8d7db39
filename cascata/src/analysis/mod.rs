//! Record analysis: indicators, prompt assembly, and recommendation parsing.
//!
//! The text generator sits behind [`Summarizer`]; [`OllamaSummarizer`] talks
//! to a local Ollama server, [`LocalSummarizer`] is a keyword heuristic for
//! when no server is reachable, and tests can plug in anything else.

mod analyst;
pub mod indicators;
mod local;
pub mod prompt;
mod recommend;
mod summarizer;

pub use analyst::{Analyst, Recommendation};
pub use indicators::{
    MIN_POINTS_FOR_INDICATORS, Position, Technicals, Trend, moving_average_overlay, technicals,
};
pub use local::LocalSummarizer;
pub use prompt::{SYSTEM_PROMPT, build_prompt};
pub use recommend::{Action, Confidence, extract_recommendation};
pub use summarizer::{OllamaBuilder, OllamaSummarizer, Summarizer};
