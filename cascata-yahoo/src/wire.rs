//! Yahoo Finance JSON shapes and their canonical translations.

use cascata_core::parse::{json_decimal, json_f64, opt_string, parse_json, top_level_keys};
use cascata_core::{
    CascataError, CompanyProfile, Decimal, FundamentalsBundle, NaiveDate, NewsItem, Period,
    PricePoint, Provenance, StatementKind, StatementRecord, StatementSeries, Symbol,
    trim_to_window,
};
use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;

use crate::NAME;

/// `{result: [..], error: {..}}` wrapper used by chart and quoteSummary.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: Option<Vec<T>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: Option<String>,
    description: Option<String>,
}

impl<T> Envelope<T> {
    fn first(self, symbol: &Symbol) -> Result<T, CascataError> {
        if let Some(err) = self.error {
            let msg = err
                .description
                .or(err.code)
                .unwrap_or_else(|| "unspecified error".to_string());
            return Err(CascataError::rejected(NAME, msg));
        }
        self.result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| CascataError::rejected(NAME, format!("no result for {symbol}")))
    }
}

/// Unwrap a `{raw, fmt}` cell, or accept a bare scalar.
fn cell(v: &Value) -> Option<&Value> {
    match v {
        Value::Object(map) => map.get("raw"),
        Value::Null => None,
        other => Some(other),
    }
}

fn cell_f64(v: Option<&Value>) -> Option<f64> {
    cell(v?).and_then(json_f64)
}

fn cell_decimal(v: &Value) -> Option<Decimal> {
    cell(v).and_then(json_decimal)
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Envelope<ChartResult>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

fn price(v: Option<&Option<f64>>) -> Option<Decimal> {
    let v = (*v?)?;
    Decimal::try_from(v).ok().map(|d| d.round_dp(4))
}

fn bar_at(quote: &QuoteBlock, i: usize, local_ts: i64) -> Option<PricePoint> {
    Some(PricePoint {
        date: DateTime::from_timestamp(local_ts, 0)?.date_naive(),
        open: price(quote.open.get(i))?,
        high: price(quote.high.get(i))?,
        low: price(quote.low.get(i))?,
        close: price(quote.close.get(i))?,
        volume: quote.volume.get(i).copied().flatten()?,
        synthetic: false,
    })
}

/// The first `indicators.quote` block; a chart without one is malformed.
fn first_quote(indicators: &Value) -> Result<QuoteBlock, CascataError> {
    let keys = top_level_keys(indicators);
    let block = indicators
        .get("quote")
        .and_then(|q| q.get(0))
        .cloned()
        .ok_or_else(|| {
            CascataError::malformed(NAME, "chart without indicators.quote block", keys.clone())
        })?;
    serde_json::from_value(block)
        .map_err(|e| CascataError::malformed(NAME, format!("quote block: {e}"), keys))
}

pub(crate) fn parse_chart(
    body: &str,
    symbol: &Symbol,
    period: Period,
    today: NaiveDate,
) -> Result<Vec<PricePoint>, CascataError> {
    let resp: ChartResponse = parse_json(NAME, body)?;
    let result = resp.chart.first(symbol)?;
    let quote = first_quote(&result.indicators)?;
    let offset = result.meta.gmtoffset;

    let points: Vec<PricePoint> = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| bar_at(&quote, i, ts.saturating_add(offset)))
        .collect();
    if points.len() < result.timestamp.len() {
        tracing::debug!(
            connector = NAME,
            skipped = result.timestamp.len() - points.len(),
            "dropped bars with null fields"
        );
    }

    let series = trim_to_window(points, period, today);
    if series.is_empty() {
        return Err(CascataError::rejected(
            NAME,
            format!("no chart bars for {symbol} within {}", period.code()),
        ));
    }
    Ok(series)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    quote_summary: Envelope<Value>,
}

pub(crate) fn summary_result(body: &str, symbol: &Symbol) -> Result<Value, CascataError> {
    let resp: SummaryResponse = parse_json(NAME, body)?;
    resp.quote_summary.first(symbol)
}

fn text(v: &Value, module: &str, field: &str) -> Option<String> {
    opt_string(v.get(module)?.get(field)?.as_str())
}

fn number(v: &Value, module: &str, field: &str) -> Option<f64> {
    cell_f64(v.get(module)?.get(field))
}

pub(crate) fn parse_profile(result: &Value, symbol: &Symbol) -> Result<CompanyProfile, CascataError> {
    let short_name = text(result, "price", "shortName");
    let long_name = text(result, "price", "longName").or_else(|| short_name.clone());
    let sector = text(result, "assetProfile", "sector");
    if short_name.is_none() && long_name.is_none() && sector.is_none() {
        return Err(CascataError::rejected(
            NAME,
            format!("quote summary for {symbol} has no company data"),
        ));
    }
    Ok(CompanyProfile {
        short_name,
        long_name,
        sector,
        industry: text(result, "assetProfile", "industry"),
        website: text(result, "assetProfile", "website"),
        market_cap: number(result, "summaryDetail", "marketCap")
            .or_else(|| number(result, "price", "marketCap")),
        trailing_pe: number(result, "summaryDetail", "trailingPE"),
        dividend_yield: number(result, "summaryDetail", "dividendYield"),
        fifty_two_week_high: number(result, "summaryDetail", "fiftyTwoWeekHigh"),
        fifty_two_week_low: number(result, "summaryDetail", "fiftyTwoWeekLow"),
        current_price: number(result, "price", "regularMarketPrice"),
        description: text(result, "assetProfile", "longBusinessSummary"),
        exchange: text(result, "price", "exchangeName"),
        currency: text(result, "price", "currency")
            .or_else(|| text(result, "summaryDetail", "currency")),
        country: text(result, "assetProfile", "country"),
        ..CompanyProfile::empty(symbol.clone(), Provenance::provider(NAME))
    })
}

/// `(kind, annual module, quarterly module, row array field)`.
const STATEMENT_MODULES: [(StatementKind, &str, &str, &str); 3] = [
    (
        StatementKind::Income,
        "incomeStatementHistory",
        "incomeStatementHistoryQuarterly",
        "incomeStatementHistory",
    ),
    (
        StatementKind::BalanceSheet,
        "balanceSheetHistory",
        "balanceSheetHistoryQuarterly",
        "balanceSheetStatements",
    ),
    (
        StatementKind::CashFlow,
        "cashflowStatementHistory",
        "cashflowStatementHistoryQuarterly",
        "cashflowStatements",
    ),
];

/// Every module name requested for fundamentals.
pub(crate) const FUNDAMENTALS_MODULES: &str = "incomeStatementHistory,incomeStatementHistoryQuarterly,balanceSheetHistory,balanceSheetHistoryQuarterly,cashflowStatementHistory,cashflowStatementHistoryQuarterly,earnings";

fn statement_row(row: &Value) -> Option<StatementRecord> {
    let obj = row.as_object()?;
    let end = cell(obj.get("endDate")?)?.as_i64()?;
    let period = DateTime::from_timestamp(end, 0)?.date_naive();
    let values = obj
        .iter()
        .filter(|(k, _)| !matches!(k.as_str(), "endDate" | "maxAge"))
        .filter_map(|(k, v)| cell_decimal(v).map(|d| (k.clone(), d)))
        .collect();
    Some(StatementRecord {
        period,
        reported_currency: None,
        values,
    })
}

fn rows(result: &Value, module: &str, field: &str) -> Vec<StatementRecord> {
    let mut out: Vec<StatementRecord> = result
        .get(module)
        .and_then(|m| m.get(field))
        .and_then(Value::as_array)
        .map(|rows| rows.iter().filter_map(statement_row).collect())
        .unwrap_or_default();
    out.sort_by(|a, b| b.period.cmp(&a.period));
    out
}

/// `"3Q2024"` to the last day of that calendar quarter.
fn quarter_end(label: &str) -> Option<NaiveDate> {
    let (q, year) = label.split_once('Q')?;
    let q: u32 = q.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    let (month, day) = match q {
        1 => (3, 31),
        2 => (6, 30),
        3 => (9, 30),
        4 => (12, 31),
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn earnings_row(row: &Value, period: NaiveDate) -> StatementRecord {
    let values = ["revenue", "earnings", "actual", "estimate"]
        .into_iter()
        .filter_map(|k| row.get(k).and_then(cell_decimal).map(|d| (k.to_string(), d)))
        .collect();
    StatementRecord {
        period,
        reported_currency: None,
        values,
    }
}

fn earnings(result: &Value) -> StatementSeries {
    let Some(e) = result.get("earnings") else {
        return StatementSeries::default();
    };
    let mut annual: Vec<StatementRecord> = e
        .pointer("/financialsChart/yearly")
        .and_then(Value::as_array)
        .map(|rows| {
            rows.iter()
                .filter_map(|r| {
                    let year = i32::try_from(cell(r.get("date")?)?.as_i64()?).ok()?;
                    Some(earnings_row(r, NaiveDate::from_ymd_opt(year, 12, 31)?))
                })
                .collect()
        })
        .unwrap_or_default();

    let mut quarterly: Vec<StatementRecord> = Vec::new();
    let revenue_rows = e
        .pointer("/financialsChart/quarterly")
        .and_then(Value::as_array);
    let eps_rows = e.pointer("/earningsChart/quarterly").and_then(Value::as_array);
    for row in revenue_rows.into_iter().chain(eps_rows).flatten() {
        let Some(period) = row.get("date").and_then(Value::as_str).and_then(quarter_end) else {
            continue;
        };
        let rec = earnings_row(row, period);
        match quarterly.iter_mut().find(|q| q.period == period) {
            Some(existing) => existing.values.extend(rec.values),
            None => quarterly.push(rec),
        }
    }

    annual.sort_by(|a, b| b.period.cmp(&a.period));
    quarterly.sort_by(|a, b| b.period.cmp(&a.period));
    annual.retain(|r| !r.values.is_empty());
    quarterly.retain(|r| !r.values.is_empty());
    StatementSeries { annual, quarterly }
}

pub(crate) fn parse_fundamentals(
    result: &Value,
    symbol: &Symbol,
) -> Result<FundamentalsBundle, CascataError> {
    let mut bundle = FundamentalsBundle::default();
    for (kind, annual, quarterly, field) in STATEMENT_MODULES {
        *bundle.statement_mut(kind) = StatementSeries {
            annual: rows(result, annual, field),
            quarterly: rows(result, quarterly, field),
        };
    }
    bundle.earnings = earnings(result);
    if bundle.is_empty() {
        return Err(CascataError::rejected(
            NAME,
            format!("no statements for {symbol}"),
        ));
    }
    Ok(bundle)
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<SearchNews>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchNews {
    title: Option<String>,
    publisher: Option<String>,
    link: Option<String>,
    provider_publish_time: Option<i64>,
}

pub(crate) fn parse_news(
    body: &str,
    symbol: &Symbol,
    limit: usize,
) -> Result<Vec<NewsItem>, CascataError> {
    let resp: SearchResponse = parse_json(NAME, body)?;
    let items: Vec<NewsItem> = resp
        .news
        .into_iter()
        .filter_map(|n| {
            Some(NewsItem {
                title: opt_string(n.title.as_deref())?,
                publisher: opt_string(n.publisher.as_deref()),
                link: opt_string(n.link.as_deref()),
                published_at: n
                    .provider_publish_time
                    .and_then(|t| DateTime::from_timestamp(t, 0)),
                summary: None,
                sentiment_label: None,
                relevance: None,
            })
        })
        .take(limit)
        .collect();
    if items.is_empty() {
        return Err(CascataError::rejected(NAME, format!("no news for {symbol}")));
    }
    Ok(items)
}

/// Unix bounds for a chart request covering `period` up to `now`.
pub(crate) fn chart_bounds(period: Period, now: i64) -> (i64, i64) {
    let span = i64::from(period.lookback_days()) * 86_400;
    (now.saturating_sub(span), now)
}
