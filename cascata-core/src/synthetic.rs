//! Pseudo-random-walk price series used when every real price source failed.
//!
//! The walk draws daily returns from `N(0, DAILY_VOLATILITY)` and
//! derives open/high/low from the close with small bounded jitter. Every bar
//! is flagged `synthetic`.

use cascata_types::{Decimal, NaiveDate, Period, PricePoint};
use chrono::Days;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Upper bound on the number of generated bars.
pub const SYNTHETIC_MAX_DAYS: u32 = 365;
/// Standard deviation of the daily return.
pub const DAILY_VOLATILITY: f64 = 0.02;
/// Maximum intraday excursion of high/low away from the close.
pub const RANGE_JITTER: f64 = 0.015;
/// Maximum gap between the previous close and the next open.
pub const OPEN_JITTER: f64 = 0.01;
/// Fallback seed price for invalid base prices.
pub const DEFAULT_BASE_PRICE: f64 = 100.0;

const VOLUME_RANGE: core::ops::RangeInclusive<u64> = 500_000..=5_000_000;
const MAX_DAILY_MOVE: f64 = 0.5;

/// Number of bars generated for `period`.
#[must_use]
pub fn synthetic_len(period: Period) -> u32 {
    period.lookback_days().min(SYNTHETIC_MAX_DAYS)
}

/// Seedable generator for synthetic price series.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticGenerator {
    seed: Option<u64>,
}

impl SyntheticGenerator {
    /// Generator drawing from OS entropy.
    #[must_use]
    pub const fn new() -> Self {
        Self { seed: None }
    }

    /// Deterministic generator; the same seed yields the same series.
    #[must_use]
    pub const fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// Generator with an optional fixed seed.
    #[must_use]
    pub const fn with_seed(seed: Option<u64>) -> Self {
        Self { seed }
    }

    /// Generate `synthetic_len(period)` daily bars ending at `end`, oldest first.
    #[must_use]
    pub fn series(&self, base_price: f64, period: Period, end: NaiveDate) -> Vec<PricePoint> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        random_walk(&mut rng, base_price, synthetic_len(period), end)
    }
}

/// Generate `days` consecutive calendar-day bars ending at `end`.
pub fn random_walk<R: Rng + ?Sized>(
    rng: &mut R,
    base_price: f64,
    days: u32,
    end: NaiveDate,
) -> Vec<PricePoint> {
    let base = if base_price.is_finite() && base_price > 0.0 {
        base_price
    } else {
        DEFAULT_BASE_PRICE
    };

    let mut out = Vec::with_capacity(days as usize);
    let mut prev_close = base;
    for offset in (0..days).rev() {
        let Some(date) = end.checked_sub_days(Days::new(u64::from(offset))) else {
            continue;
        };

        let z: f64 = rng.sample(StandardNormal);
        let ret = (z * DAILY_VOLATILITY).clamp(-MAX_DAILY_MOVE, MAX_DAILY_MOVE);
        let close_f = prev_close * (1.0 + ret);
        let open_f = prev_close * (1.0 + rng.random_range(-OPEN_JITTER..=OPEN_JITTER));
        let high_f = close_f * (1.0 + rng.random_range(0.0..=RANGE_JITTER));
        let low_f = close_f * (1.0 - rng.random_range(0.0..=RANGE_JITTER));

        let open = to_price(open_f);
        let close = to_price(close_f);
        let high = to_price(high_f).max(open).max(close);
        let low = to_price(low_f).min(open).min(close);

        out.push(PricePoint {
            date,
            open,
            high,
            low,
            close,
            volume: rng.random_range(VOLUME_RANGE),
            synthetic: true,
        });
        prev_close = close_f;
    }
    out
}

fn to_price(v: f64) -> Decimal {
    let cent = Decimal::new(1, 2);
    Decimal::from_f64_retain(v)
        .map_or(cent, |d| d.round_dp(2))
        .max(cent)
}
