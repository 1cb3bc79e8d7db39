//! Series helpers shared by the time-series connectors.

use std::collections::{BTreeMap, btree_map::Entry};

use cascata_types::{NaiveDate, Period, PricePoint};
use chrono::Days;

/// First date inside the lookback window of `period` ending at `today`.
#[must_use]
pub fn window_start(period: Period, today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(period.lookback_days())))
        .unwrap_or(NaiveDate::MIN)
}

/// Sort bars oldest first and keep one bar per date.
///
/// When a provider repeats a date, the first occurrence in input order wins.
#[must_use]
pub fn normalize_series<I>(points: I) -> Vec<PricePoint>
where
    I: IntoIterator<Item = PricePoint>,
{
    let mut by_date: BTreeMap<NaiveDate, PricePoint> = BTreeMap::new();
    for p in points {
        if let Entry::Vacant(v) = by_date.entry(p.date) {
            v.insert(p);
        }
    }
    by_date.into_values().collect()
}

/// Drop bars before the window start of `period`, then normalize.
///
/// Bars dated after `today` are kept; providers in other time zones may
/// already report the next session.
#[must_use]
pub fn trim_to_window<I>(points: I, period: Period, today: NaiveDate) -> Vec<PricePoint>
where
    I: IntoIterator<Item = PricePoint>,
{
    let cutoff = window_start(period, today);
    normalize_series(points.into_iter().filter(|p| p.date >= cutoff))
}

/// True when `points` is strictly ascending by date.
#[must_use]
pub fn is_normalized(points: &[PricePoint]) -> bool {
    points.windows(2).all(|w| w[0].date < w[1].date)
}
