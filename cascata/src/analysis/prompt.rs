//! Plain-text summary of a [`NormalizedRecord`] for the text collaborator.

use std::fmt::Write as _;

use cascata_core::NormalizedRecord;
use rust_decimal::prelude::ToPrimitive;

use super::indicators::{Position, Technicals, Trend};

/// Headlines included in the prompt.
pub const PROMPT_HEADLINES: usize = 3;
/// Minimum series length for the one-month change line.
pub const MONTH_CHANGE_POINTS: usize = 30;

/// Standing instructions for the analysis model.
pub const SYSTEM_PROMPT: &str = "You are a sophisticated financial analysis agent. Your task is to \
analyze stock market data and provide insightful recommendations. Consider technical indicators, \
fundamental analysis, recent news sentiment, and market trends. Be balanced in your analysis, \
highlighting both potential risks and opportunities. Provide a clear buy, sell, or hold \
recommendation with supporting evidence and reasoning.";

const fn position_word(p: Position) -> &'static str {
    match p {
        Position::Above => "above",
        Position::Below => "below",
    }
}

const fn trend_word(t: Trend) -> &'static str {
    match t {
        Trend::Uptrend => "uptrend",
        Trend::Downtrend => "downtrend",
    }
}

fn pct_change(from: f64, to: f64) -> Option<f64> {
    (from != 0.0 && from.is_finite() && to.is_finite()).then(|| (to - from) / from * 100.0)
}

fn company_section(out: &mut String, record: &NormalizedRecord) {
    let Some(p) = record.company() else {
        let _ = writeln!(out, "Company: {}", record.symbol);
        return;
    };
    let _ = writeln!(out, "Company: {}", p.display_name());
    if let Some(s) = &p.sector {
        let _ = writeln!(out, "Sector: {s}");
    }
    if let Some(i) = &p.industry {
        let _ = writeln!(out, "Industry: {i}");
    }
}

fn technical_section(out: &mut String, technicals: Option<&Technicals>) {
    out.push_str("Technical Analysis:\n");
    let Some(t) = technicals else {
        out.push_str("- Not enough data points for technical analysis\n");
        return;
    };
    let _ = writeln!(out, "- Current Price: ${:.2}", t.latest_close);
    let _ = writeln!(
        out,
        "- Price is {} the 20-day moving average",
        position_word(t.ma20_signal)
    );
    let _ = writeln!(
        out,
        "- Price is {} the 50-day moving average",
        position_word(t.ma50_signal)
    );
    match t.rsi14 {
        Some(rsi) => {
            let _ = writeln!(out, "- RSI: {rsi:.2} (Oversold < 30, Overbought > 70)");
        }
        None => out.push_str("- RSI: n/a (no price movement)\n"),
    }
    let _ = writeln!(out, "- Recent Price Trend: {}", trend_word(t.trend));
}

fn fundamentals_section(out: &mut String, record: &NormalizedRecord) {
    out.push_str("Fundamental Analysis:\n");
    let Some(p) = record.company() else {
        return;
    };
    if let Some(cap) = p.market_cap.filter(|v| *v != 0.0) {
        let _ = writeln!(out, "- Market Cap: ${:.2} billion", cap / 1e9);
    }
    if let Some(pe) = p.trailing_pe.filter(|v| *v != 0.0) {
        let _ = writeln!(out, "- P/E Ratio: {pe:.2}");
    }
    if let Some(y) = p.dividend_yield.filter(|v| *v != 0.0) {
        let _ = writeln!(out, "- Dividend Yield: {:.2}%", y * 100.0);
    }
}

fn news_section(out: &mut String, record: &NormalizedRecord) {
    out.push_str("Recent News:\n");
    for item in record.news_items().iter().take(PROMPT_HEADLINES) {
        let _ = writeln!(out, "- {}", item.title);
    }
}

fn price_section(out: &mut String, record: &NormalizedRecord) {
    out.push_str("Price Performance:\n");
    let closes: Vec<f64> = record
        .prices()
        .iter()
        .filter_map(|p| p.close.to_f64())
        .collect();
    let (Some(first), Some(last)) = (closes.first(), closes.last()) else {
        return;
    };
    if let Some(change) = pct_change(*first, *last) {
        let _ = writeln!(out, "- {} Change: {change:.2}%", record.period.description());
    }
    if closes.len() >= MONTH_CHANGE_POINTS
        && let Some(change) = pct_change(closes[closes.len() - MONTH_CHANGE_POINTS], *last)
    {
        let _ = writeln!(out, "- 1 Month Change: {change:.2}%");
    }
}

/// Build the user prompt for `record`.
///
/// Sections: company, technicals (or a "not enough data points" line),
/// fundamentals, the top headlines, and price performance. The prompt ends
/// with the response format that
/// [`extract_recommendation`](super::extract_recommendation) parses.
#[must_use]
pub fn build_prompt(record: &NormalizedRecord, technicals: Option<&Technicals>) -> String {
    let symbol = &record.symbol;
    let mut out = format!(
        "I need to analyze the following stock data for {symbol} and provide a buy, sell, or hold recommendation.\n\n"
    );
    company_section(&mut out, record);
    out.push('\n');
    technical_section(&mut out, technicals);
    out.push('\n');
    fundamentals_section(&mut out, record);
    out.push('\n');
    news_section(&mut out, record);
    out.push('\n');
    price_section(&mut out, record);
    let _ = write!(
        out,
        "\nBased on the data above, provide a detailed analysis of {symbol} with the following:\n\
         1. A summary of key strengths and weaknesses\n\
         2. Evaluation of technical indicators\n\
         3. Assessment of fundamental factors\n\
         4. Analysis of recent news impact\n\
         5. Clear buy, sell, or hold recommendation with confidence level (high, medium, low)\n\
         6. Brief explanation of the reasoning behind the recommendation\n\n\
         Format your recommendation prominently at the end as \
         \"RECOMMENDATION: [BUY/SELL/HOLD] (Confidence: [HIGH/MEDIUM/LOW])\"\n"
    );
    out
}
