//! Canonical, provider-agnostic data model.
//!
//! Every connector emits these shapes; every downstream consumer reads them.
//! Unknown provider fields are represented as `None`, never as zero or an
//! empty string.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fetch::Provenance;
use crate::request::Symbol;

/// One daily OHLCV bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading (or calendar, for synthetic series) date.
    pub date: NaiveDate,
    /// Opening price.
    pub open: Decimal,
    /// Session high.
    pub high: Decimal,
    /// Session low.
    pub low: Decimal,
    /// Closing price.
    pub close: Decimal,
    /// Traded volume.
    pub volume: u64,
    /// True when the bar was generated rather than observed.
    #[serde(default)]
    pub synthetic: bool,
}

/// Company profile and headline valuation figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    /// Ticker the profile describes.
    pub symbol: Symbol,
    /// Short display name.
    pub short_name: Option<String>,
    /// Full legal name.
    pub long_name: Option<String>,
    /// Sector classification.
    pub sector: Option<String>,
    /// Industry classification.
    pub industry: Option<String>,
    /// Company website.
    pub website: Option<String>,
    /// Market capitalization in the listing currency.
    pub market_cap: Option<f64>,
    /// Trailing twelve-month price/earnings ratio.
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    /// Dividend yield as a fraction (0.0052 == 0.52%).
    pub dividend_yield: Option<f64>,
    /// 52-week high.
    pub fifty_two_week_high: Option<f64>,
    /// 52-week low.
    pub fifty_two_week_low: Option<f64>,
    /// Last traded price, when the provider reports one.
    #[serde(default)]
    pub current_price: Option<f64>,
    /// Business description.
    #[serde(default)]
    pub description: Option<String>,
    /// Listing exchange.
    #[serde(default)]
    pub exchange: Option<String>,
    /// Reporting currency.
    #[serde(default)]
    pub currency: Option<String>,
    /// Country of domicile.
    #[serde(default)]
    pub country: Option<String>,
    /// Which source produced this profile.
    pub data_source: Provenance,
}

impl CompanyProfile {
    /// An otherwise-empty profile for `symbol` attributed to `source`.
    #[must_use]
    pub const fn empty(symbol: Symbol, source: Provenance) -> Self {
        Self {
            symbol,
            short_name: None,
            long_name: None,
            sector: None,
            industry: None,
            website: None,
            market_cap: None,
            trailing_pe: None,
            dividend_yield: None,
            fifty_two_week_high: None,
            fifty_two_week_low: None,
            current_price: None,
            description: None,
            exchange: None,
            currency: None,
            country: None,
            data_source: source,
        }
    }

    /// Minimal placeholder used when every profile source failed.
    #[must_use]
    pub fn stub(symbol: Symbol) -> Self {
        let name = Some(symbol.to_string());
        Self {
            short_name: name.clone(),
            long_name: name,
            ..Self::empty(symbol, Provenance::Fallback)
        }
    }

    /// Best available display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.long_name
            .as_deref()
            .or(self.short_name.as_deref())
            .unwrap_or_else(|| self.symbol.as_str())
    }

    /// A reference price usable to seed a synthetic series.
    ///
    /// Prefers the last traded price, then the midpoint of the 52-week range.
    #[must_use]
    pub fn reference_price(&self) -> Option<f64> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if let Some(p) = self.current_price.filter(|v| positive(*v)) {
            return Some(p);
        }
        match (self.fifty_two_week_high, self.fifty_two_week_low) {
            (Some(h), Some(l)) if positive(h) && positive(l) => Some(f64::midpoint(h, l)),
            _ => None,
        }
    }
}

/// A single news article about the symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    /// Headline.
    pub title: String,
    /// Publishing outlet.
    pub publisher: Option<String>,
    /// Canonical article URL.
    pub link: Option<String>,
    /// Publication time.
    pub published_at: Option<DateTime<Utc>>,
    /// Short abstract.
    pub summary: Option<String>,
    /// Provider sentiment label (e.g. "Somewhat-Bullish").
    pub sentiment_label: Option<String>,
    /// Provider relevance score for this ticker in `[0, 1]`.
    #[serde(default)]
    pub relevance: Option<f64>,
}

/// Statement families carried by a [`FundamentalsBundle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Income statement.
    Income,
    /// Balance sheet.
    BalanceSheet,
    /// Cash flow statement.
    CashFlow,
    /// Earnings per share history.
    Earnings,
}

impl StatementKind {
    /// All statement kinds.
    pub const ALL: [Self; 4] = [Self::Income, Self::BalanceSheet, Self::CashFlow, Self::Earnings];
}

/// One reporting period of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementRecord {
    /// Fiscal period end date.
    pub period: NaiveDate,
    /// Reporting currency, when supplied.
    pub reported_currency: Option<String>,
    /// Numeric line items keyed by provider field name.
    pub values: BTreeMap<String, Decimal>,
}

/// Annual and quarterly records for one statement kind, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSeries {
    /// Annual records.
    pub annual: Vec<StatementRecord>,
    /// Quarterly records.
    pub quarterly: Vec<StatementRecord>,
}

impl StatementSeries {
    /// True when neither annual nor quarterly records are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.annual.is_empty() && self.quarterly.is_empty()
    }
}

/// Financial statements grouped by [`StatementKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundamentalsBundle {
    /// Income statements.
    pub income: StatementSeries,
    /// Balance sheets.
    pub balance_sheet: StatementSeries,
    /// Cash flow statements.
    pub cash_flow: StatementSeries,
    /// Earnings history.
    pub earnings: StatementSeries,
}

impl FundamentalsBundle {
    /// Borrow the series for a statement kind.
    #[must_use]
    pub const fn statement(&self, kind: StatementKind) -> &StatementSeries {
        match kind {
            StatementKind::Income => &self.income,
            StatementKind::BalanceSheet => &self.balance_sheet,
            StatementKind::CashFlow => &self.cash_flow,
            StatementKind::Earnings => &self.earnings,
        }
    }

    /// Mutably borrow the series for a statement kind.
    pub const fn statement_mut(&mut self, kind: StatementKind) -> &mut StatementSeries {
        match kind {
            StatementKind::Income => &mut self.income,
            StatementKind::BalanceSheet => &mut self.balance_sheet,
            StatementKind::CashFlow => &mut self.cash_flow,
            StatementKind::Earnings => &mut self.earnings,
        }
    }

    /// True when every statement is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        StatementKind::ALL
            .iter()
            .all(|k| self.statement(*k).is_empty())
    }
}
