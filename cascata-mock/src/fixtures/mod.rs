pub mod fundamentals;
pub mod news;
pub mod prices;
pub mod profiles;

use chrono::NaiveDate;

/// Symbols with a full fixture set.
pub const SYMBOLS: [&str; 4] = ["AAPL", "MSFT", "GOOG", "ACME"];

/// Opening price of the fixture walk, in cents.
pub fn base_cents(symbol: &str) -> Option<i64> {
    match symbol {
        "AAPL" => Some(19_000),
        "MSFT" => Some(41_000),
        "GOOG" => Some(16_500),
        "ACME" => Some(4_250),
        _ => None,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}
