//! cascata-alphavantage
//!
//! Primary connector for cascata. Implements every data kind on top of the
//! Alpha Vantage query API:
//!
//! - price history via `TIME_SERIES_DAILY`
//! - company profile via `OVERVIEW`
//! - news via `NEWS_SENTIMENT`, filtered by per-ticker relevance
//! - fundamentals via `INCOME_STATEMENT`, `BALANCE_SHEET`, `CASH_FLOW`, `EARNINGS`
#![warn(missing_docs)]

mod builder;
mod wire;

pub use builder::AlphaVantageBuilder;

use async_trait::async_trait;
use cascata_core::connector::{
    CascataConnector, ConnectorKey, FundamentalsProvider, NewsProvider, PriceHistoryProvider,
    ProfileProvider,
};
use cascata_core::http::{self, Client};
use cascata_core::parse::parse_json;
use cascata_core::{
    CascataError, CompanyProfile, FundamentalsBundle, NewsItem, Period, PricePoint,
    StatementKind, StatementSeries, Symbol,
};
use chrono::Utc;
use serde_json::Value;

pub(crate) const NAME: &str = "alpha_vantage";

/// Alpha Vantage connector. Construct with [`AlphaVantageConnector::builder`].
#[derive(Debug, Clone)]
pub struct AlphaVantageConnector {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageConnector {
    /// Static connector key for priority configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new(NAME);

    /// Production query endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://www.alphavantage.co/query";

    /// Start a builder with production defaults.
    #[must_use]
    pub fn builder() -> AlphaVantageBuilder {
        AlphaVantageBuilder::default()
    }

    async fn query(&self, params: &[(&str, &str)]) -> Result<Value, CascataError> {
        let mut all = params.to_vec();
        all.push(("apikey", self.api_key.as_str()));
        let url = http::build_url(&self.base_url, "", &all)?;
        let body = http::get_text(&self.client, NAME, url).await?;
        let value: Value = parse_json(NAME, &body)?;
        wire::check_envelope(&value)?;
        Ok(value)
    }

    async fn statement(
        &self,
        function: &str,
        symbol: &Symbol,
        keys: (&str, &str),
    ) -> Result<StatementSeries, CascataError> {
        match self
            .query(&[("function", function), ("symbol", symbol.as_str())])
            .await
        {
            Ok(v) => Ok(wire::parse_statement(&v, keys.0, keys.1)),
            Err(CascataError::ProviderRejected { msg, .. }) => {
                tracing::debug!(connector = NAME, function, %msg, "statement unavailable");
                Ok(StatementSeries::default())
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl PriceHistoryProvider for AlphaVantageConnector {
    async fn price_history(
        &self,
        symbol: &Symbol,
        period: Period,
    ) -> Result<Vec<PricePoint>, CascataError> {
        let v = self
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol.as_str()),
                ("outputsize", wire::output_size(period)),
            ])
            .await?;
        wire::parse_daily(v, period, Utc::now().date_naive())
    }
}

#[async_trait]
impl ProfileProvider for AlphaVantageConnector {
    async fn profile(&self, symbol: &Symbol) -> Result<CompanyProfile, CascataError> {
        let v = self
            .query(&[("function", "OVERVIEW"), ("symbol", symbol.as_str())])
            .await?;
        wire::parse_overview(v, symbol)
    }
}

#[async_trait]
impl NewsProvider for AlphaVantageConnector {
    async fn news(&self, symbol: &Symbol, limit: usize) -> Result<Vec<NewsItem>, CascataError> {
        let request_limit = (limit.saturating_mul(3)).min(50).to_string();
        let v = self
            .query(&[
                ("function", "NEWS_SENTIMENT"),
                ("tickers", symbol.as_str()),
                ("limit", request_limit.as_str()),
            ])
            .await?;
        wire::parse_news(v, symbol, limit)
    }
}

const STATEMENTS: [(StatementKind, &str, &str, &str); 4] = [
    (StatementKind::Income, "INCOME_STATEMENT", "annualReports", "quarterlyReports"),
    (StatementKind::BalanceSheet, "BALANCE_SHEET", "annualReports", "quarterlyReports"),
    (StatementKind::CashFlow, "CASH_FLOW", "annualReports", "quarterlyReports"),
    (StatementKind::Earnings, "EARNINGS", "annualEarnings", "quarterlyEarnings"),
];

#[async_trait]
impl FundamentalsProvider for AlphaVantageConnector {
    async fn fundamentals(&self, symbol: &Symbol) -> Result<FundamentalsBundle, CascataError> {
        let mut bundle = FundamentalsBundle::default();
        for (kind, function, annual, quarterly) in STATEMENTS {
            *bundle.statement_mut(kind) = self.statement(function, symbol, (annual, quarterly)).await?;
        }
        if bundle.is_empty() {
            return Err(wire::empty_fundamentals(symbol));
        }
        Ok(bundle)
    }
}

impl CascataConnector for AlphaVantageConnector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn vendor(&self) -> &'static str {
        "Alpha Vantage"
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
