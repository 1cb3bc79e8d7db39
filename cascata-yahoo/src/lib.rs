//! cascata-yahoo
//!
//! Secondary connector for cascata on top of Yahoo Finance's public JSON
//! endpoints:
//!
//! - price history from `v8/finance/chart`
//! - profile and statements from `v10/finance/quoteSummary`
//! - news from `v1/finance/search`
#![warn(missing_docs)]

mod builder;
mod wire;

pub use builder::YahooBuilder;

use async_trait::async_trait;
use cascata_core::connector::{
    CascataConnector, ConnectorKey, FundamentalsProvider, NewsProvider, PriceHistoryProvider,
    ProfileProvider,
};
use cascata_core::http::{self, Client};
use cascata_core::{
    CascataError, CompanyProfile, FundamentalsBundle, NewsItem, Period, PricePoint, Symbol,
};
use chrono::Utc;
use serde_json::Value;

pub(crate) const NAME: &str = "yahoo_finance";

const PROFILE_MODULES: &str = "assetProfile,summaryDetail,price";

/// Yahoo Finance connector. Construct with [`YahooConnector::builder`].
#[derive(Debug, Clone)]
pub struct YahooConnector {
    client: Client,
    base_url: String,
}

impl YahooConnector {
    /// Static connector key for priority configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new(NAME);

    /// Production API host.
    pub const DEFAULT_BASE_URL: &'static str = "https://query1.finance.yahoo.com";

    /// Start a builder with production defaults.
    #[must_use]
    pub fn builder() -> YahooBuilder {
        YahooBuilder::default()
    }

    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<String, CascataError> {
        let url = http::build_url(&self.base_url, path, params)?;
        http::get_text(&self.client, NAME, url).await
    }

    async fn quote_summary(&self, symbol: &Symbol, modules: &str) -> Result<Value, CascataError> {
        let path = format!("v10/finance/quoteSummary/{}", symbol.as_str());
        let body = self.get(&path, &[("modules", modules)]).await?;
        wire::summary_result(&body, symbol)
    }
}

#[async_trait]
impl PriceHistoryProvider for YahooConnector {
    async fn price_history(
        &self,
        symbol: &Symbol,
        period: Period,
    ) -> Result<Vec<PricePoint>, CascataError> {
        let now = Utc::now();
        let (start, end) = wire::chart_bounds(period, now.timestamp());
        let (start, end) = (start.to_string(), end.to_string());
        let path = format!("v8/finance/chart/{}", symbol.as_str());
        let body = self
            .get(
                &path,
                &[
                    ("period1", start.as_str()),
                    ("period2", end.as_str()),
                    ("interval", "1d"),
                ],
            )
            .await?;
        wire::parse_chart(&body, symbol, period, now.date_naive())
    }
}

#[async_trait]
impl ProfileProvider for YahooConnector {
    async fn profile(&self, symbol: &Symbol) -> Result<CompanyProfile, CascataError> {
        let result = self.quote_summary(symbol, PROFILE_MODULES).await?;
        wire::parse_profile(&result, symbol)
    }
}

#[async_trait]
impl NewsProvider for YahooConnector {
    async fn news(&self, symbol: &Symbol, limit: usize) -> Result<Vec<NewsItem>, CascataError> {
        let count = limit.to_string();
        let body = self
            .get(
                "v1/finance/search",
                &[
                    ("q", symbol.as_str()),
                    ("newsCount", count.as_str()),
                    ("quotesCount", "0"),
                ],
            )
            .await?;
        wire::parse_news(&body, symbol, limit)
    }
}

#[async_trait]
impl FundamentalsProvider for YahooConnector {
    async fn fundamentals(&self, symbol: &Symbol) -> Result<FundamentalsBundle, CascataError> {
        let result = self
            .quote_summary(symbol, wire::FUNDAMENTALS_MODULES)
            .await?;
        wire::parse_fundamentals(&result, symbol)
    }
}

impl CascataConnector for YahooConnector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn vendor(&self) -> &'static str {
        "Yahoo Finance"
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
