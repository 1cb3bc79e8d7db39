//! Minimal technical figures handed to the text collaborator.

use cascata_core::PricePoint;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Series shorter than this get no indicator block.
pub const MIN_POINTS_FOR_INDICATORS: usize = 50;

const RSI_WINDOW: usize = 14;
const TREND_WINDOW: usize = 10;

/// Where the last close sits relative to a moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Close strictly above the average.
    Above,
    /// Close at or below the average.
    Below,
}

/// Direction of the last ten sessions against the ten before them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Recent mean close is higher.
    Uptrend,
    /// Recent mean close is equal or lower.
    Downtrend,
}

/// Indicator snapshot at the last bar of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technicals {
    /// Last close.
    pub latest_close: f64,
    /// 20-session simple moving average.
    pub ma20: f64,
    /// 50-session simple moving average.
    pub ma50: f64,
    /// Close against MA20.
    pub ma20_signal: Position,
    /// Close against MA50.
    pub ma50_signal: Position,
    /// 14-session RSI; `None` when the window has no movement at all.
    pub rsi14: Option<f64>,
    /// Short-term direction.
    pub trend: Trend,
}

fn closes(series: &[PricePoint]) -> Vec<f64> {
    series
        .iter()
        .map(|p| p.close.to_f64().unwrap_or(f64::NAN))
        .collect()
}

fn mean(xs: &[f64]) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let n = xs.len() as f64;
    xs.iter().sum::<f64>() / n
}

fn position(close: f64, avg: f64) -> Position {
    if close > avg { Position::Above } else { Position::Below }
}

/// RSI over the last `RSI_WINDOW` close-to-close changes, using simple
/// averages of gains and losses.
fn rsi(closes: &[f64]) -> Option<f64> {
    if closes.len() <= RSI_WINDOW {
        return None;
    }
    let tail = &closes[closes.len() - RSI_WINDOW - 1..];
    let (mut gain, mut loss) = (0.0, 0.0);
    for w in tail.windows(2) {
        let d = w[1] - w[0];
        if d > 0.0 {
            gain += d;
        } else {
            loss -= d;
        }
    }
    match (gain > 0.0, loss > 0.0) {
        (false, false) => None,
        (_, false) => Some(100.0),
        _ => Some(100.0 - 100.0 / (1.0 + gain / loss)),
    }
}

/// Compute indicators at the last bar, or `None` below
/// [`MIN_POINTS_FOR_INDICATORS`].
#[must_use]
pub fn technicals(series: &[PricePoint]) -> Option<Technicals> {
    if series.len() < MIN_POINTS_FOR_INDICATORS {
        return None;
    }
    let c = closes(series);
    let n = c.len();
    let latest_close = c[n - 1];
    let ma20 = mean(&c[n - 20..]);
    let ma50 = mean(&c[n - 50..]);
    let recent = mean(&c[n - TREND_WINDOW..]);
    let prior = mean(&c[n - 2 * TREND_WINDOW..n - TREND_WINDOW]);
    Some(Technicals {
        latest_close,
        ma20,
        ma50,
        ma20_signal: position(latest_close, ma20),
        ma50_signal: position(latest_close, ma50),
        rsi14: rsi(&c),
        trend: if recent > prior { Trend::Uptrend } else { Trend::Downtrend },
    })
}

/// Trailing simple moving average aligned with `series`.
///
/// The first `window - 1` entries are `None`; a zero window yields all `None`.
#[must_use]
pub fn moving_average_overlay(series: &[PricePoint], window: usize) -> Vec<Option<Decimal>> {
    if window == 0 {
        return vec![None; series.len()];
    }
    let divisor = Decimal::from(window as u64);
    let mut sum = Decimal::ZERO;
    series
        .iter()
        .enumerate()
        .map(|(i, p)| {
            sum += p.close;
            if i >= window {
                sum -= series[i - window].close;
            }
            (i + 1 >= window).then(|| (sum / divisor).round_dp(4))
        })
        .collect()
}
