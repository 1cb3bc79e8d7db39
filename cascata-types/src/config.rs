//! Configuration types shared across the orchestrator and connectors.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::connector::ConnectorKey;
use crate::kind::DataKind;

/// Per-kind staleness thresholds for cached results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMaxAge {
    /// Price history.
    pub price: Duration,
    /// Company profile.
    pub profile: Duration,
    /// News; shorter because sentiment goes stale quickly.
    pub news: Duration,
    /// Fundamentals.
    pub fundamentals: Duration,
}

impl CacheMaxAge {
    /// Threshold for a given kind.
    #[must_use]
    pub const fn for_kind(&self, kind: DataKind) -> Duration {
        match kind {
            DataKind::Price => self.price,
            DataKind::Profile => self.profile,
            DataKind::News => self.news,
            DataKind::Fundamentals => self.fundamentals,
        }
    }

    /// Override the threshold for a given kind.
    pub const fn set(&mut self, kind: DataKind, max_age: Duration) {
        match kind {
            DataKind::Price => self.price = max_age,
            DataKind::Profile => self.profile = max_age,
            DataKind::News => self.news = max_age,
            DataKind::Fundamentals => self.fundamentals = max_age,
        }
    }
}

impl Default for CacheMaxAge {
    fn default() -> Self {
        let day = Duration::from_secs(24 * 60 * 60);
        Self {
            price: day,
            profile: day,
            news: Duration::from_secs(6 * 60 * 60),
            fundamentals: day,
        }
    }
}

/// Linear backoff retry policy applied per adapter to transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per adapter, including the first (>= 1).
    pub max_attempts: u32,
    /// Base delay; the wait after attempt `n` is `backoff_base * n`.
    pub backoff_base: Duration,
}

impl RetryConfig {
    /// Delay to wait after the given 1-based failed attempt.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(attempt)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: Duration::from_secs(2),
        }
    }
}

/// Directory the default file cache is rooted at, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "data/cache";

/// Global configuration for the `Cascata` orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascataConfig {
    /// Root of the default file cache. Created on first write.
    pub cache_dir: PathBuf,
    /// Per-kind cache staleness thresholds.
    pub cache_max_age: CacheMaxAge,
    /// Retry policy for transient adapter failures.
    pub retry: RetryConfig,
    /// Timeout for a single adapter attempt.
    pub provider_timeout: Duration,
    /// Optional deadline for a whole `analyze` call.
    pub request_timeout: Option<Duration>,
    /// Preferred connector order per kind. Unlisted connectors follow in
    /// registration order; unknown keys are dropped at build time.
    #[serde(skip)]
    pub per_kind_priority: HashMap<DataKind, Vec<ConnectorKey>>,
    /// Generate a synthetic price series when every price source failed.
    pub synthetic_fallback: bool,
    /// Seed price for the synthetic series when no profile price is known.
    /// `None` makes price exhaustion fatal in that case.
    pub default_base_price: Option<f64>,
    /// Fixed RNG seed for the synthetic generator (tests and demos).
    pub synthetic_seed: Option<u64>,
    /// Also cache stub and synthetic results.
    pub cache_degraded: bool,
    /// Maximum number of news items requested per symbol.
    pub news_limit: usize,
}

impl Default for CascataConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            cache_max_age: CacheMaxAge::default(),
            retry: RetryConfig::default(),
            provider_timeout: Duration::from_secs(30),
            request_timeout: None,
            per_kind_priority: HashMap::new(),
            synthetic_fallback: true,
            default_base_price: Some(100.0),
            synthetic_seed: None,
            cache_degraded: false,
            news_limit: 5,
        }
    }
}

/// Credentials and endpoints for the bundled connectors.
///
/// Connectors take these through their builders; nothing is hard-coded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProviderCredentials {
    /// Alpha Vantage API key.
    pub alpha_vantage_key: Option<String>,
    /// Financial Modeling Prep API key. Connectors fall back to `demo`.
    pub fmp_key: Option<String>,
    /// Base URL of an Ollama-compatible chat server.
    pub ollama_host: Option<String>,
    /// Model name passed to the chat server.
    pub ollama_model: Option<String>,
}

impl ProviderCredentials {
    /// Read `ALPHA_VANTAGE_API_KEY`, `FMP_API_KEY`, `OLLAMA_HOST` and `OLLAMA_MODEL`.
    ///
    /// Empty variables are treated as unset.
    #[must_use]
    pub fn from_env() -> Self {
        let var = |name: &str| {
            std::env::var(name)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            alpha_vantage_key: var("ALPHA_VANTAGE_API_KEY"),
            fmp_key: var("FMP_API_KEY"),
            ollama_host: var("OLLAMA_HOST"),
            ollama_model: var("OLLAMA_MODEL"),
        }
    }
}
