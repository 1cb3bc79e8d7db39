//! Cascata fetches stock data from several providers and falls back between them.
//!
//! Overview
//! - Cascades each data kind (price, profile, news, fundamentals) across the
//!   registered connectors in priority order, with per-attempt timeouts and
//!   bounded retries for transient failures.
//! - Caches successful results per `(symbol, period-or-kind, kind)` with
//!   per-kind freshness windows, as JSON files under `data/cache` by default
//!   or in any other [`CacheStore`].
//! - Degrades instead of failing where it can: a synthetic random-walk price
//!   series, a stub profile, and empty news/fundamentals envelopes tagged
//!   `fallback`.
//! - Reports where every part of a record came from via [`Provenance`].
//!
//! Key behaviors and trade-offs
//! - Cascade order: per-kind preferences first, then registration order.
//!   Sequential attempts keep provider load low at the cost of latency when
//!   the first choices are down.
//! - Retries: only transient failures (unavailable, timeout) are retried;
//!   rejections and malformed responses move on to the next connector.
//! - Caching: degraded results are not cached by default so a recovered
//!   provider is picked up on the next call.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use cascata::{Cascata, DataKind};
//! use cascata_yahoo::YahooConnector;
//! use cascata_mock::MockConnector;
//!
//! let yahoo = Arc::new(YahooConnector::builder().build()?);
//! let mock = Arc::new(MockConnector::new());
//!
//! let cascata = Cascata::builder()
//!     .with_connector(yahoo.clone())
//!     .with_connector(mock)
//!     .prefer_for_kind(DataKind::News, &[YahooConnector::KEY])
//!     .cache_dir("data/cache")
//!     .build()?;
//!
//! let record = cascata.analyze("AAPL", "6mo").await?;
//! println!("{}", record.provenance().price_history);
//! ```
//!
//! See `cascata/examples/` for a runnable end-to-end demonstration.
#![warn(missing_docs)]

pub mod analysis;
pub(crate) mod core;
mod observe;
mod router;

pub use core::{Cascata, CascataBuilder};
pub use observe::{AttemptEvent, AttemptObserver};
pub use router::util::{collapse_errors, resolve_period, with_request_deadline};

pub use cascata_cache::{CacheEntry, CacheKey, CacheStore, FileCacheStore, MemoryCacheStore};

// Re-export core types for convenience
pub use cascata_core::{
    CacheMaxAge, CascataConfig, CascataConnector, CascataError, CompanyProfile, ConnectorKey,
    DEFAULT_CACHE_DIR, DataKind, FetchResult, FundamentalsBundle, NewsItem, NormalizedRecord, Period, PricePoint,
    Provenance, ProvenanceReport, ProviderCredentials, RetryConfig, StatementKind,
    StatementRecord, StatementSeries, Symbol,
};
