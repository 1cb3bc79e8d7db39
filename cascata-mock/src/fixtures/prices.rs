use cascata_core::timeseries::window_start;
use cascata_core::{Period, PricePoint};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use rust_decimal::Decimal;

use super::base_cents;

/// Weekday bars covering `period` up to `today`, oldest first.
///
/// Closes drift upward two cents a session with a ten-session saw-tooth on
/// top, so indicator code sees both trend and oscillation.
pub fn series(symbol: &str, period: Period, today: NaiveDate) -> Option<Vec<PricePoint>> {
    let base = base_cents(symbol)?;
    let mut out = Vec::new();
    let mut day = window_start(period, today);
    let mut i: i64 = 0;
    while day <= today {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            out.push(bar(day, base, i));
            i += 1;
        }
        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => break,
        }
    }
    Some(out)
}

fn bar(date: NaiveDate, base: i64, i: i64) -> PricePoint {
    let close = base + i * 2 + (i % 10 - 5) * 25;
    let open = close - 10;
    let cents = |c: i64| Decimal::new(c, 2);
    PricePoint {
        date,
        open: cents(open),
        high: cents(open.max(close) + 50),
        low: cents(open.min(close) - 50),
        close: cents(close),
        volume: 1_000_000 + u64::try_from(i % 5).unwrap_or(0) * 100_000,
        synthetic: false,
    }
}
