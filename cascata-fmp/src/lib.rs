//! cascata-fmp
//!
//! Profile-only connector backed by Financial Modeling Prep's
//! `api/v3/profile/{symbol}` endpoint. Without a key it uses FMP's `demo`
//! key, which serves a handful of large caps.
#![warn(missing_docs)]

mod builder;

pub use builder::FmpBuilder;

use async_trait::async_trait;
use cascata_core::connector::{CascataConnector, ConnectorKey, ProfileProvider};
use cascata_core::http::{self, Client};
use cascata_core::parse::{json_f64, opt_string, parse_json, top_level_keys};
use cascata_core::{CascataError, CompanyProfile, Provenance, Symbol};
use serde::Deserialize;
use serde_json::Value;

const NAME: &str = "financial_modeling_prep";

/// Financial Modeling Prep connector. Construct with [`FmpConnector::builder`].
#[derive(Debug, Clone)]
pub struct FmpConnector {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpProfile {
    company_name: Option<String>,
    sector: Option<String>,
    industry: Option<String>,
    website: Option<String>,
    description: Option<String>,
    exchange_short_name: Option<String>,
    currency: Option<String>,
    country: Option<String>,
    range: Option<String>,
    #[serde(default)]
    price: Value,
    #[serde(default)]
    mkt_cap: Value,
    #[serde(default)]
    pe: Value,
    #[serde(default)]
    last_div: Value,
}

/// `"124.17-198.23"` into `(low, high)`.
fn parse_range(range: Option<&str>) -> (Option<f64>, Option<f64>) {
    let Some((lo, hi)) = range.and_then(|r| r.trim().split_once('-')) else {
        return (None, None);
    };
    (lo.trim().parse().ok(), hi.trim().parse().ok())
}

fn positive(v: &Value) -> Option<f64> {
    json_f64(v).filter(|x| *x > 0.0)
}

fn to_profile(raw: FmpProfile, symbol: &Symbol) -> CompanyProfile {
    let (low, high) = parse_range(raw.range.as_deref());
    let price = positive(&raw.price);
    let dividend_yield = match (positive(&raw.last_div), price) {
        (Some(div), Some(p)) => Some(div / p),
        _ => None,
    };
    let name = opt_string(raw.company_name.as_deref());
    CompanyProfile {
        short_name: Some(symbol.as_str().to_string()),
        long_name: name,
        sector: opt_string(raw.sector.as_deref()),
        industry: opt_string(raw.industry.as_deref()),
        website: opt_string(raw.website.as_deref()),
        market_cap: positive(&raw.mkt_cap),
        trailing_pe: positive(&raw.pe),
        dividend_yield,
        fifty_two_week_high: high,
        fifty_two_week_low: low,
        current_price: price,
        description: opt_string(raw.description.as_deref()),
        exchange: opt_string(raw.exchange_short_name.as_deref()),
        currency: opt_string(raw.currency.as_deref()),
        country: opt_string(raw.country.as_deref()),
        ..CompanyProfile::empty(symbol.clone(), Provenance::provider(NAME))
    }
}

pub(crate) fn parse_profile(body: &str, symbol: &Symbol) -> Result<CompanyProfile, CascataError> {
    let value: Value = parse_json(NAME, body)?;
    if let Some(msg) = value.get("Error Message").and_then(Value::as_str) {
        return Err(CascataError::rejected(NAME, msg));
    }
    let keys = top_level_keys(&value);
    let rows: Vec<FmpProfile> = serde_json::from_value(value).map_err(|e| {
        tracing::warn!(connector = NAME, ?keys, error = %e, "unexpected profile shape");
        CascataError::malformed(NAME, e.to_string(), keys)
    })?;
    let first = rows
        .into_iter()
        .next()
        .ok_or_else(|| CascataError::rejected(NAME, format!("no profile for {symbol}")))?;
    Ok(to_profile(first, symbol))
}

impl FmpConnector {
    /// Static connector key for priority configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new(NAME);

    /// Production API host.
    pub const DEFAULT_BASE_URL: &'static str = "https://financialmodelingprep.com";

    /// Start a builder with production defaults.
    #[must_use]
    pub fn builder() -> FmpBuilder {
        FmpBuilder::default()
    }
}

#[async_trait]
impl ProfileProvider for FmpConnector {
    async fn profile(&self, symbol: &Symbol) -> Result<CompanyProfile, CascataError> {
        let path = format!("api/v3/profile/{}", symbol.as_str());
        let url = http::build_url(&self.base_url, &path, &[("apikey", self.api_key.as_str())])?;
        let body = http::get_text(&self.client, NAME, url).await?;
        parse_profile(&body, symbol)
    }
}

impl CascataConnector for FmpConnector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn vendor(&self) -> &'static str {
        "Financial Modeling Prep"
    }

    fn as_profile_provider(&self) -> Option<&dyn ProfileProvider> {
        Some(self as &dyn ProfileProvider)
    }
}
