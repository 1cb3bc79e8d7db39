//! Canonical data model, error taxonomy, and configuration primitives shared by
//! every cascata crate.
#![warn(missing_docs)]

mod config;
mod connector;
mod error;
mod fetch;
mod kind;
mod model;
mod request;

pub use config::{
    CacheMaxAge, CascataConfig, DEFAULT_CACHE_DIR, ProviderCredentials, RetryConfig,
};
pub use connector::ConnectorKey;
pub use error::CascataError;
pub use fetch::{FetchResult, NormalizedRecord, Provenance, ProvenanceReport};
pub use kind::DataKind;
pub use model::{
    CompanyProfile, FundamentalsBundle, NewsItem, PricePoint, StatementKind, StatementRecord,
    StatementSeries,
};
pub use request::{Period, Symbol};

pub use chrono::{DateTime, NaiveDate, Utc};
pub use rust_decimal::Decimal;
