//! Quote-page scraping.
//!
//! `scraper::Html` is not `Send`, so everything here is synchronous and runs
//! after the body has been awaited.

use cascata_core::parse::opt_f64;
use cascata_core::{CascataError, CompanyProfile, Provenance, Symbol};
use scraper::{ElementRef, Html, Selector};

use crate::NAME;

fn selector(css: &str) -> Result<Selector, CascataError> {
    Selector::parse(css)
        .map_err(|e| CascataError::malformed(NAME, format!("selector {css}: {e}"), vec![]))
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `"$2.5T"`, `"812.4M"`, `"1,234"` into a plain number.
pub(crate) fn parse_scaled(raw: &str) -> Option<f64> {
    let s = raw.trim().trim_start_matches(['$', '€', '£']).replace(',', "");
    let (num, mult) = match s.chars().last()? {
        'K' | 'k' => (&s[..s.len() - 1], 1e3),
        'M' | 'm' => (&s[..s.len() - 1], 1e6),
        'B' | 'b' => (&s[..s.len() - 1], 1e9),
        'T' | 't' => (&s[..s.len() - 1], 1e12),
        _ => (s.as_str(), 1.0),
    };
    opt_f64(Some(num)).map(|v| v * mult)
}

/// `"0.45%"` into `0.0045`.
fn parse_percent(raw: &str) -> Option<f64> {
    opt_f64(Some(raw.trim().trim_end_matches('%'))).map(|v| v / 100.0)
}

/// `"164.08 - 237.23"` into `(low, high)`.
fn parse_range(raw: &str) -> (Option<f64>, Option<f64>) {
    match raw.split_once('-') {
        Some((lo, hi)) => (parse_scaled(lo), parse_scaled(hi)),
        None => (None, None),
    }
}

pub(crate) fn parse_page(html: &str, symbol: &Symbol) -> Result<CompanyProfile, CascataError> {
    let doc = Html::parse_document(html);
    let name_sel = selector("h1.company__name")?;
    let price_sel = selector(".intraday__price .value")?;
    let item_sel = selector(".key-stock-data .kv__item")?;
    let label_sel = selector(".label")?;
    let value_sel = selector(".primary")?;

    let name = doc
        .select(&name_sel)
        .next()
        .map(text_of)
        .filter(|s| !s.is_empty());
    let price = doc
        .select(&price_sel)
        .next()
        .map(text_of)
        .and_then(|s| parse_scaled(&s));

    if name.is_none() && price.is_none() {
        return Err(CascataError::rejected(
            NAME,
            format!("quote page for {symbol} has no name or price"),
        ));
    }

    let mut profile = CompanyProfile {
        short_name: Some(symbol.as_str().to_string()),
        long_name: name,
        current_price: price,
        ..CompanyProfile::empty(symbol.clone(), Provenance::provider(NAME))
    };

    for item in doc.select(&item_sel) {
        let (Some(label), Some(value)) = (
            item.select(&label_sel).next().map(text_of),
            item.select(&value_sel).next().map(text_of),
        ) else {
            continue;
        };
        match label.to_ascii_lowercase().as_str() {
            "market cap" => profile.market_cap = parse_scaled(&value),
            "p/e ratio" => profile.trailing_pe = parse_scaled(&value),
            "yield" => profile.dividend_yield = parse_percent(&value),
            "52 week range" => {
                let (lo, hi) = parse_range(&value);
                profile.fifty_two_week_low = lo;
                profile.fifty_two_week_high = hi;
            }
            other => tracing::trace!(connector = NAME, label = other, "ignored key stat"),
        }
    }
    Ok(profile)
}
