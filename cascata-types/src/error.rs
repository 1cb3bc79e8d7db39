use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kind::DataKind;

/// Unified error type for the cascata workspace.
///
/// Variants follow the cascade's failure taxonomy: input validation, transient
/// provider outages, well-formed rejections, schema surprises, and the
/// per-kind exhaustion aggregate.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CascataError {
    /// Missing or malformed request input. Raised before any network call.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Transient provider failure (timeout, refused connection, throttling, 5xx).
    #[error("{connector} unavailable: {msg}")]
    ProviderUnavailable {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The provider answered with a well-formed "no data" or "invalid symbol" envelope.
    #[error("{connector} rejected request: {msg}")]
    ProviderRejected {
        /// Connector name that rejected the request.
        connector: String,
        /// Provider-supplied reason.
        msg: String,
    },

    /// The provider answered with a shape the adapter does not understand.
    #[error("{connector} returned malformed response: {msg} (keys: {keys:?})")]
    MalformedResponse {
        /// Connector name that produced the response.
        connector: String,
        /// Parser diagnostic.
        msg: String,
        /// Top-level keys seen in the payload, for diagnosability.
        keys: Vec<String>,
    },

    /// Every adapter for a data kind failed; contains the individual failures.
    #[error("all sources exhausted for {kind}: {errors:?}")]
    AllSourcesExhausted {
        /// Data kind whose cascade was exhausted.
        kind: DataKind,
        /// Last error reported by each attempted adapter.
        errors: Vec<CascataError>,
    },

    /// No registered connector serves the requested capability.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// Capability label (e.g. "price", "news").
        capability: String,
    },

    /// The overall request exceeded the configured deadline.
    #[error("request timed out: {capability}")]
    RequestTimeout {
        /// Capability label for which the request timed out.
        capability: String,
    },

    /// Cache storage failure. Logged by the orchestrator, never surfaced as fatal.
    #[error("cache error: {0}")]
    Cache(String),
}

impl CascataError {
    /// Helper: build an `InvalidInput` error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Helper: build a `ProviderUnavailable` error.
    pub fn unavailable(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `ProviderRejected` error.
    pub fn rejected(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::ProviderRejected {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `MalformedResponse` error with the keys that were observed.
    pub fn malformed(
        connector: impl Into<String>,
        msg: impl Into<String>,
        keys: Vec<String>,
    ) -> Self {
        Self::MalformedResponse {
            connector: connector.into(),
            msg: msg.into(),
            keys,
        }
    }

    /// Helper: build a `ProviderUnavailable` error for an attempt that exceeded its timeout.
    pub fn provider_timeout(connector: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self::ProviderUnavailable {
            connector: connector.into(),
            msg: format!("timed out after {}ms", timeout.as_millis()),
        }
    }

    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `RequestTimeout` error.
    #[must_use]
    pub fn request_timeout(capability: impl Into<String>) -> Self {
        Self::RequestTimeout {
            capability: capability.into(),
        }
    }

    /// Returns true when the failure is worth retrying against the same adapter.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::ProviderUnavailable { .. })
    }

    /// Connector name carried by provider-tagged variants.
    #[must_use]
    pub fn connector(&self) -> Option<&str> {
        match self {
            Self::ProviderUnavailable { connector, .. }
            | Self::ProviderRejected { connector, .. }
            | Self::MalformedResponse { connector, .. } => Some(connector),
            _ => None,
        }
    }

    /// Short outcome label used in attempt events.
    #[must_use]
    pub const fn outcome_label(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::ProviderUnavailable { .. } => "unavailable",
            Self::ProviderRejected { .. } => "rejected",
            Self::MalformedResponse { .. } => "malformed",
            Self::AllSourcesExhausted { .. } => "exhausted",
            Self::Unsupported { .. } => "unsupported",
            Self::RequestTimeout { .. } => "request_timeout",
            Self::Cache(_) => "cache",
        }
    }

    /// Flatten nested `AllSourcesExhausted` structures into a plain vector.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::AllSourcesExhausted { errors, .. } => {
                errors.into_iter().flat_map(Self::flatten).collect()
            }
            other => vec![other],
        }
    }
}
