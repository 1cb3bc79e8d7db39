//! Alpha Vantage response shapes and their translation into the canonical model.

use std::collections::BTreeMap;

use cascata_core::parse::{json_decimal, json_f64, opt_decimal, opt_f64, opt_string, top_level_keys};
use cascata_core::{
    CascataError, CompanyProfile, DataKind, NaiveDate, NewsItem, Period, PricePoint, Provenance,
    StatementRecord, StatementSeries, Symbol, trim_to_window,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::NAME;

fn decode<T: DeserializeOwned>(v: Value, what: &str) -> Result<T, CascataError> {
    let keys = top_level_keys(&v);
    serde_json::from_value(v).map_err(|e| {
        tracing::warn!(connector = NAME, what, ?keys, error = %e, "unexpected response shape");
        CascataError::malformed(NAME, format!("{what}: {e}"), keys)
    })
}

fn mentions_throttling(msg: &str) -> bool {
    let m = msg.to_ascii_lowercase();
    m.contains("call frequency") || m.contains("rate limit")
}

/// Classify Alpha Vantage's in-band error envelopes.
///
/// `"Error Message"` is a rejection; a `"Note"` or `"Information"` about call
/// frequency is throttling. Other notes are logged and passed through.
pub(crate) fn check_envelope(v: &Value) -> Result<(), CascataError> {
    if let Some(msg) = v.get("Error Message").and_then(Value::as_str) {
        return Err(CascataError::rejected(NAME, msg));
    }
    for field in ["Note", "Information"] {
        if let Some(msg) = v.get(field).and_then(Value::as_str) {
            if mentions_throttling(msg) {
                return Err(CascataError::unavailable(NAME, format!("rate limited: {msg}")));
            }
            tracing::warn!(connector = NAME, field, note = msg, "provider note");
        }
    }
    Ok(())
}

/// `outputsize` for `TIME_SERIES_DAILY`: the compact window covers 100 sessions.
pub(crate) const fn output_size(period: Period) -> &'static str {
    match period {
        Period::W1 | Period::M1 => "compact",
        _ => "full",
    }
}

#[derive(Debug, Deserialize)]
struct DailyResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: BTreeMap<String, DailyBar>,
}

#[derive(Debug, Deserialize)]
struct DailyBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

impl DailyBar {
    fn to_point(&self, date: &str) -> Option<PricePoint> {
        Some(PricePoint {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?,
            open: opt_decimal(&self.open)?,
            high: opt_decimal(&self.high)?,
            low: opt_decimal(&self.low)?,
            close: opt_decimal(&self.close)?,
            volume: self.volume.trim().parse().ok()?,
            synthetic: false,
        })
    }
}

pub(crate) fn parse_daily(
    v: Value,
    period: Period,
    today: NaiveDate,
) -> Result<Vec<PricePoint>, CascataError> {
    let resp: DailyResponse = decode(v, "daily series")?;
    let total = resp.time_series.len();
    let points: Vec<PricePoint> = resp
        .time_series
        .iter()
        .filter_map(|(date, bar)| bar.to_point(date))
        .collect();
    if points.len() < total {
        tracing::debug!(
            connector = NAME,
            skipped = total - points.len(),
            "dropped unparseable bars"
        );
    }
    let series = trim_to_window(points, period, today);
    if series.is_empty() {
        return Err(CascataError::rejected(
            NAME,
            format!("no daily bars within {}", period.code()),
        ));
    }
    Ok(series)
}

#[derive(Debug, Deserialize)]
struct Overview {
    #[serde(rename = "Symbol")]
    symbol: Option<String>,
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Description")]
    description: Option<String>,
    #[serde(rename = "Exchange")]
    exchange: Option<String>,
    #[serde(rename = "Currency")]
    currency: Option<String>,
    #[serde(rename = "Country")]
    country: Option<String>,
    #[serde(rename = "Sector")]
    sector: Option<String>,
    #[serde(rename = "Industry")]
    industry: Option<String>,
    #[serde(rename = "OfficialSite")]
    official_site: Option<String>,
    #[serde(rename = "MarketCapitalization")]
    market_cap: Option<String>,
    #[serde(rename = "TrailingPE")]
    trailing_pe: Option<String>,
    #[serde(rename = "PERatio")]
    pe_ratio: Option<String>,
    #[serde(rename = "DividendYield")]
    dividend_yield: Option<String>,
    #[serde(rename = "52WeekHigh")]
    week52_high: Option<String>,
    #[serde(rename = "52WeekLow")]
    week52_low: Option<String>,
}

pub(crate) fn parse_overview(v: Value, symbol: &Symbol) -> Result<CompanyProfile, CascataError> {
    let o: Overview = decode(v, "overview")?;
    if opt_string(o.symbol.as_deref()).is_none() {
        return Err(CascataError::rejected(
            NAME,
            format!("no overview for {symbol}"),
        ));
    }
    let name = opt_string(o.name.as_deref());
    Ok(CompanyProfile {
        short_name: name.clone(),
        long_name: name,
        sector: opt_string(o.sector.as_deref()),
        industry: opt_string(o.industry.as_deref()),
        website: opt_string(o.official_site.as_deref()),
        market_cap: opt_f64(o.market_cap.as_deref()),
        trailing_pe: opt_f64(o.trailing_pe.as_deref()).or_else(|| opt_f64(o.pe_ratio.as_deref())),
        dividend_yield: opt_f64(o.dividend_yield.as_deref()),
        fifty_two_week_high: opt_f64(o.week52_high.as_deref()),
        fifty_two_week_low: opt_f64(o.week52_low.as_deref()),
        description: opt_string(o.description.as_deref()),
        exchange: opt_string(o.exchange.as_deref()),
        currency: opt_string(o.currency.as_deref()),
        country: opt_string(o.country.as_deref()),
        ..CompanyProfile::empty(symbol.clone(), Provenance::provider(NAME))
    })
}

/// Minimum per-ticker relevance for a feed item to count as news about the ticker.
pub(crate) const MIN_RELEVANCE: f64 = 0.5;

#[derive(Debug, Deserialize)]
struct NewsFeed {
    feed: Vec<FeedItem>,
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    title: Option<String>,
    url: Option<String>,
    time_published: Option<String>,
    summary: Option<String>,
    source: Option<String>,
    overall_sentiment_label: Option<String>,
    #[serde(default)]
    ticker_sentiment: Vec<TickerSentiment>,
}

#[derive(Debug, Deserialize)]
struct TickerSentiment {
    ticker: String,
    #[serde(default)]
    relevance_score: Value,
}

fn parse_published(s: Option<&str>) -> Option<chrono::DateTime<chrono::Utc>> {
    NaiveDateTime::parse_from_str(s?.trim(), "%Y%m%dT%H%M%S")
        .ok()
        .map(|dt| dt.and_utc())
}

pub(crate) fn parse_news(
    v: Value,
    symbol: &Symbol,
    limit: usize,
) -> Result<Vec<NewsItem>, CascataError> {
    let resp: NewsFeed = decode(v, "news feed")?;
    let mut relevant: Vec<(f64, FeedItem)> = resp
        .feed
        .into_iter()
        .filter_map(|item| {
            let score = item
                .ticker_sentiment
                .iter()
                .filter(|t| t.ticker.eq_ignore_ascii_case(symbol.as_str()))
                .filter_map(|t| json_f64(&t.relevance_score))
                .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.max(s))))?;
            (score > MIN_RELEVANCE).then_some((score, item))
        })
        .collect();
    relevant.sort_by(|a, b| b.0.total_cmp(&a.0));

    let items: Vec<NewsItem> = relevant
        .into_iter()
        .filter_map(|(score, item)| {
            Some(NewsItem {
                title: opt_string(item.title.as_deref())?,
                publisher: opt_string(item.source.as_deref()),
                link: opt_string(item.url.as_deref()),
                published_at: parse_published(item.time_published.as_deref()),
                summary: opt_string(item.summary.as_deref()),
                sentiment_label: opt_string(item.overall_sentiment_label.as_deref()),
                relevance: Some(score),
            })
        })
        .take(limit)
        .collect();

    if items.is_empty() {
        return Err(CascataError::rejected(
            NAME,
            format!("no relevant news for {symbol}"),
        ));
    }
    Ok(items)
}

const NON_VALUE_FIELDS: [&str; 3] = ["fiscalDateEnding", "reportedCurrency", "reportedDate"];

fn parse_record(raw: &Value) -> Option<StatementRecord> {
    let obj = raw.as_object()?;
    let period = obj
        .get("fiscalDateEnding")
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())?;
    let reported_currency = opt_string(obj.get("reportedCurrency").and_then(Value::as_str));
    let values = obj
        .iter()
        .filter(|(k, _)| !NON_VALUE_FIELDS.contains(&k.as_str()))
        .filter_map(|(k, v)| json_decimal(v).map(|d| (k.clone(), d)))
        .collect();
    Some(StatementRecord {
        period,
        reported_currency,
        values,
    })
}

fn parse_records(v: &Value, key: &str) -> Vec<StatementRecord> {
    let mut out: Vec<StatementRecord> = v
        .get(key)
        .and_then(Value::as_array)
        .map(|rows| rows.iter().filter_map(parse_record).collect())
        .unwrap_or_default();
    out.sort_by(|a, b| b.period.cmp(&a.period));
    out
}

/// Annual and quarterly records of one statement, newest first.
pub(crate) fn parse_statement(v: &Value, annual_key: &str, quarterly_key: &str) -> StatementSeries {
    StatementSeries {
        annual: parse_records(v, annual_key),
        quarterly: parse_records(v, quarterly_key),
    }
}

/// Error for an overview or statement set that carried nothing usable.
pub(crate) fn empty_fundamentals(symbol: &Symbol) -> CascataError {
    CascataError::rejected(
        NAME,
        format!("no {} statements for {symbol}", DataKind::Fundamentals),
    )
}
