//! Result envelopes produced by the orchestrator.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CascataError;
use crate::model::{CompanyProfile, FundamentalsBundle, NewsItem, PricePoint};
use crate::request::{Period, Symbol};

/// Which source produced a payload.
///
/// Serialized as a bare string: the connector name, `"fallback"`, or
/// `"synthetic"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Provenance {
    /// A real provider, identified by connector name.
    Provider(String),
    /// A degraded stand-in (stub profile, empty news or fundamentals).
    Fallback,
    /// Generated price data.
    Synthetic,
}

impl Provenance {
    /// Provenance for a named connector.
    pub fn provider(name: impl Into<String>) -> Self {
        Self::Provider(name.into())
    }

    /// Borrow the serialized tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Provider(name) => name,
            Self::Fallback => "fallback",
            Self::Synthetic => "synthetic",
        }
    }

    /// True for fallback and synthetic sources.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Fallback | Self::Synthetic)
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Provenance {
    fn from(s: String) -> Self {
        match s.as_str() {
            "fallback" => Self::Fallback,
            "synthetic" => Self::Synthetic,
            _ => Self::Provider(s),
        }
    }
}

impl From<Provenance> for String {
    fn from(p: Provenance) -> Self {
        match p {
            Provenance::Provider(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

/// Uniform success/failure envelope for one data kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResult<T> {
    /// Whether `payload` is present.
    pub success: bool,
    /// Payload when `success` is true.
    pub payload: Option<T>,
    /// Failure message when `success` is false.
    pub error: Option<String>,
    /// Which source produced this result.
    pub source: Provenance,
    /// When the payload was fetched (preserved across cache round trips).
    pub fetched_at: DateTime<Utc>,
}

impl<T> FetchResult<T> {
    /// Successful result stamped with the current time.
    pub fn ok(payload: T, source: Provenance) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            error: None,
            source,
            fetched_at: Utc::now(),
        }
    }

    /// Failed result carrying `err`'s message.
    pub fn failed(err: &CascataError, source: Provenance) -> Self {
        Self {
            success: false,
            payload: None,
            error: Some(err.to_string()),
            source,
            fetched_at: Utc::now(),
        }
    }

    /// Borrow the payload when present.
    pub const fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    /// True when the result came from a fallback or synthetic source.
    pub const fn is_degraded(&self) -> bool {
        self.source.is_degraded()
    }
}

/// Per-kind provenance tags of a [`NormalizedRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceReport {
    /// Source of the price series.
    pub price_history: Provenance,
    /// Source of the company profile.
    pub profile: Provenance,
    /// Source of the news list.
    pub news: Provenance,
    /// Source of the fundamentals bundle.
    pub fundamentals: Provenance,
}

/// Everything `analyze` knows about one symbol for one period.
///
/// Each field is independently tagged; a failed news or fundamentals fetch
/// leaves the rest of the record usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    /// Normalized ticker.
    pub symbol: Symbol,
    /// Effective period after default substitution.
    pub period: Period,
    /// Daily price series, oldest first.
    pub price_history: FetchResult<Vec<PricePoint>>,
    /// Company profile.
    pub profile: FetchResult<CompanyProfile>,
    /// Recent news.
    pub news: FetchResult<Vec<NewsItem>>,
    /// Financial statements.
    pub fundamentals: FetchResult<FundamentalsBundle>,
}

impl NormalizedRecord {
    /// Provenance of each data kind.
    #[must_use]
    pub fn provenance(&self) -> ProvenanceReport {
        ProvenanceReport {
            price_history: self.price_history.source.clone(),
            profile: self.profile.source.clone(),
            news: self.news.source.clone(),
            fundamentals: self.fundamentals.source.clone(),
        }
    }

    /// Price series, empty when unavailable.
    #[must_use]
    pub fn prices(&self) -> &[PricePoint] {
        self.price_history.payload().map_or(&[], Vec::as_slice)
    }

    /// News items, empty when every news source failed.
    #[must_use]
    pub fn news_items(&self) -> &[NewsItem] {
        self.news.payload().map_or(&[], Vec::as_slice)
    }

    /// Company profile, when one was resolved.
    #[must_use]
    pub const fn company(&self) -> Option<&CompanyProfile> {
        self.profile.payload()
    }

    /// Fundamentals bundle, when one was resolved.
    #[must_use]
    pub const fn financials(&self) -> Option<&FundamentalsBundle> {
        self.fundamentals.payload()
    }
}
