use async_trait::async_trait;

pub use cascata_types::ConnectorKey;
use cascata_types::{
    CascataError, CompanyProfile, DataKind, FundamentalsBundle, NewsItem, Period, PricePoint,
    Symbol,
};

/// Focused role trait for connectors that provide daily price history.
///
/// Implementations trim the series to `period.lookback_days()` and return it
/// oldest first with unique dates.
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Fetch daily bars covering `period`.
    async fn price_history(
        &self,
        symbol: &Symbol,
        period: Period,
    ) -> Result<Vec<PricePoint>, CascataError>;
}

/// Focused role trait for connectors that provide company profiles.
#[async_trait]
pub trait ProfileProvider: Send + Sync {
    /// Fetch the company profile for `symbol`.
    async fn profile(&self, symbol: &Symbol) -> Result<CompanyProfile, CascataError>;
}

/// Focused role trait for connectors that provide news.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Fetch up to `limit` recent news items for `symbol`.
    async fn news(&self, symbol: &Symbol, limit: usize) -> Result<Vec<NewsItem>, CascataError>;
}

/// Focused role trait for connectors that provide financial statements.
#[async_trait]
pub trait FundamentalsProvider: Send + Sync {
    /// Fetch every statement the provider has for `symbol`.
    async fn fundamentals(&self, symbol: &Symbol) -> Result<FundamentalsBundle, CascataError>;
}

/// Main connector trait implemented by provider crates.
///
/// A connector advertises each capability it has by returning `Some` from
/// the matching `as_*_provider` accessor. The orchestrator skips connectors
/// that return `None` for a kind.
pub trait CascataConnector: Send + Sync {
    /// Stable identifier, used as the provenance tag and in priority lists.
    fn name(&self) -> &'static str;

    /// Typed key for priority configuration.
    fn key(&self) -> ConnectorKey {
        ConnectorKey::new(self.name())
    }

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Advertise price history capability.
    fn as_price_history_provider(&self) -> Option<&dyn PriceHistoryProvider> {
        None
    }

    /// Advertise profile capability.
    fn as_profile_provider(&self) -> Option<&dyn ProfileProvider> {
        None
    }

    /// Advertise news capability.
    fn as_news_provider(&self) -> Option<&dyn NewsProvider> {
        None
    }

    /// Advertise fundamentals capability.
    fn as_fundamentals_provider(&self) -> Option<&dyn FundamentalsProvider> {
        None
    }

    /// Whether this connector serves `kind` at all.
    fn supports(&self, kind: DataKind) -> bool {
        match kind {
            DataKind::Price => self.as_price_history_provider().is_some(),
            DataKind::Profile => self.as_profile_provider().is_some(),
            DataKind::News => self.as_news_provider().is_some(),
            DataKind::Fundamentals => self.as_fundamentals_provider().is_some(),
        }
    }
}
