//! cascata-core
//!
//! Core traits and utilities shared by the cascata connectors and orchestrator.
//!
//! - `connector`: the `CascataConnector` trait and per-kind provider traits.
//! - `timeseries`: window trimming and date normalization for price series.
//! - `synthetic`: the random-walk generator used as the last price fallback.
//! - `parse`: response parsing helpers (placeholder handling, status mapping).
//! - `http` (feature `http`): shared `reqwest` client and error classification.
//!
//! All canonical types from `cascata-types` are re-exported so connectors can
//! depend on this crate alone.
#![warn(missing_docs)]

/// Connector capability traits and the primary `CascataConnector` interface.
pub mod connector;
#[cfg(feature = "http")]
pub mod http;
/// Response parsing helpers shared by provider connectors.
pub mod parse;
pub mod synthetic;
/// Time-series utilities for trimming and normalizing price series.
pub mod timeseries;

pub use connector::{
    CascataConnector, FundamentalsProvider, NewsProvider, PriceHistoryProvider, ProfileProvider,
};
pub use synthetic::{SyntheticGenerator, synthetic_len};
pub use timeseries::{is_normalized, normalize_series, trim_to_window, window_start};

pub use cascata_types::*;
