use std::collections::BTreeMap;

use cascata_core::{FundamentalsBundle, StatementRecord, StatementSeries};
use rust_decimal::Decimal;

use super::date;

/// Annual income figures in millions: (fiscal year, revenue, net income).
fn income_rows(symbol: &str) -> Option<&'static [(i32, i64, i64)]> {
    match symbol {
        "AAPL" => Some(&[(2023, 383_285, 96_995), (2022, 394_328, 99_803)]),
        "MSFT" => Some(&[(2023, 211_915, 72_361), (2022, 198_270, 72_738)]),
        "GOOG" => Some(&[(2023, 307_394, 73_795)]),
        "ACME" => Some(&[(2023, 1_840, 212), (2022, 1_702, 188)]),
        _ => None,
    }
}

fn record(year: i32, month: u32, day: u32, fields: &[(&str, Decimal)]) -> StatementRecord {
    StatementRecord {
        period: date(year, month, day),
        reported_currency: Some("USD".to_string()),
        values: fields
            .iter()
            .map(|(k, v)| ((*k).to_string(), *v))
            .collect::<BTreeMap<_, _>>(),
    }
}

fn millions(v: i64) -> Decimal {
    Decimal::from(v) * Decimal::from(1_000_000)
}

/// Statements newest first. Cash flow is empty, so the bundle is only
/// partially populated.
pub fn by_symbol(symbol: &str) -> Option<FundamentalsBundle> {
    let rows = income_rows(symbol)?;

    let income = StatementSeries {
        annual: rows
            .iter()
            .map(|(y, rev, net)| {
                record(
                    *y,
                    12,
                    31,
                    &[("totalRevenue", millions(*rev)), ("netIncome", millions(*net))],
                )
            })
            .collect(),
        quarterly: Vec::new(),
    };

    let balance_sheet = StatementSeries {
        annual: rows
            .first()
            .map(|(y, rev, _)| {
                record(
                    *y,
                    12,
                    31,
                    &[
                        ("totalAssets", millions(rev * 2)),
                        ("totalLiabilities", millions(*rev)),
                    ],
                )
            })
            .into_iter()
            .collect(),
        quarterly: Vec::new(),
    };

    let earnings = StatementSeries {
        annual: rows
            .iter()
            .map(|(y, _, net)| record(*y, 12, 31, &[("reportedEPS", Decimal::new(*net, 4))]))
            .collect(),
        quarterly: vec![
            record(2024, 3, 31, &[("reportedEPS", Decimal::new(153, 2))]),
            record(2023, 12, 31, &[("reportedEPS", Decimal::new(218, 2))]),
        ],
    };

    Some(FundamentalsBundle {
        income,
        balance_sheet,
        cash_flow: StatementSeries::default(),
        earnings,
    })
}
