//! cascata-mock
//!
//! Deterministic connector for tests and offline demos. It serves every data
//! kind from static fixtures and never touches the network.
//!
//! Reserved symbols script failures:
//! - `FAIL` answers every call with a transient `ProviderUnavailable`.
//! - `TIMEOUT` sleeps before answering, long enough to trip short
//!   per-attempt timeouts.
//! - Any symbol without a fixture is `ProviderRejected`, the same way a real
//!   provider reports an unknown ticker.
#![warn(missing_docs)]

mod fixtures;

use std::time::Duration;

use async_trait::async_trait;
use cascata_core::connector::{
    CascataConnector, ConnectorKey, FundamentalsProvider, NewsProvider, PriceHistoryProvider,
    ProfileProvider,
};
use cascata_core::{
    CascataError, CompanyProfile, FundamentalsBundle, NewsItem, Period, PricePoint, Symbol,
};
use chrono::Utc;

/// Default name of the mock connector.
pub const NAME: &str = "mock";

/// Symbol that always fails transiently.
pub const FAIL_SYMBOL: &str = "FAIL";
/// Symbol that answers only after [`MockConnector::timeout_delay`].
pub const TIMEOUT_SYMBOL: &str = "TIMEOUT";
/// Symbols with a full fixture set.
pub const FIXTURE_SYMBOLS: [&str; 4] = fixtures::SYMBOLS;

/// Mock connector for CI-safe examples. Provides deterministic data from static fixtures.
#[derive(Debug, Clone)]
pub struct MockConnector {
    name: &'static str,
    timeout_delay: Duration,
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Static connector key for priority configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new(NAME);

    /// Mock named `mock` with a 200ms scripted delay.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            name: NAME,
            timeout_delay: Duration::from_millis(200),
        }
    }

    /// Same fixtures under a different connector name.
    ///
    /// Useful to register the mock twice and observe which one a cascade picked.
    #[must_use]
    pub const fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Delay applied to the `TIMEOUT` symbol.
    #[must_use]
    pub const fn with_timeout_delay(mut self, delay: Duration) -> Self {
        self.timeout_delay = delay;
        self
    }

    /// Delay applied to the `TIMEOUT` symbol.
    #[must_use]
    pub const fn timeout_delay(&self) -> Duration {
        self.timeout_delay
    }

    fn not_found(&self, what: &str, symbol: &Symbol) -> CascataError {
        CascataError::rejected(self.name, format!("no {what} fixture for {symbol}"))
    }

    async fn script(&self, symbol: &Symbol, kind: &'static str) -> Result<(), CascataError> {
        match symbol.as_str() {
            FAIL_SYMBOL => Err(CascataError::unavailable(
                self.name,
                format!("forced failure: {kind}"),
            )),
            TIMEOUT_SYMBOL => {
                tokio::time::sleep(self.timeout_delay).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl PriceHistoryProvider for MockConnector {
    async fn price_history(
        &self,
        symbol: &Symbol,
        period: Period,
    ) -> Result<Vec<PricePoint>, CascataError> {
        self.script(symbol, "price").await?;
        let today = Utc::now().date_naive();
        fixtures::prices::series(symbol.as_str(), period, today)
            .ok_or_else(|| self.not_found("price", symbol))
    }
}

#[async_trait]
impl ProfileProvider for MockConnector {
    async fn profile(&self, symbol: &Symbol) -> Result<CompanyProfile, CascataError> {
        self.script(symbol, "profile").await?;
        fixtures::profiles::by_symbol(symbol, self.name)
            .ok_or_else(|| self.not_found("profile", symbol))
    }
}

#[async_trait]
impl NewsProvider for MockConnector {
    async fn news(&self, symbol: &Symbol, limit: usize) -> Result<Vec<NewsItem>, CascataError> {
        self.script(symbol, "news").await?;
        let mut items = fixtures::news::by_symbol(symbol.as_str())
            .ok_or_else(|| self.not_found("news", symbol))?;
        items.truncate(limit);
        Ok(items)
    }
}

#[async_trait]
impl FundamentalsProvider for MockConnector {
    async fn fundamentals(&self, symbol: &Symbol) -> Result<FundamentalsBundle, CascataError> {
        self.script(symbol, "fundamentals").await?;
        fixtures::fundamentals::by_symbol(symbol.as_str())
            .ok_or_else(|| self.not_found("fundamentals", symbol))
    }
}

impl CascataConnector for MockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn as_price_history_provider(&self) -> Option<&dyn PriceHistoryProvider> {
        Some(self as &dyn PriceHistoryProvider)
    }

    fn as_profile_provider(&self) -> Option<&dyn ProfileProvider> {
        Some(self as &dyn ProfileProvider)
    }

    fn as_news_provider(&self) -> Option<&dyn NewsProvider> {
        Some(self as &dyn NewsProvider)
    }

    fn as_fundamentals_provider(&self) -> Option<&dyn FundamentalsProvider> {
        Some(self as &dyn FundamentalsProvider)
    }
}
