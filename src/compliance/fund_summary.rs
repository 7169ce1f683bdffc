//! Fund classification summary for the compliance report

use bigdecimal::BigDecimal;
use std::collections::BTreeMap;

use crate::funds::FundTypeTotals;
use crate::types::{FundType, LedgerEntry};

/// Per-fund-type count and totals, accumulated in one pass over the entries
///
/// Produces the same figures as [`crate::funds::fund_type_totals`] by an
/// independent route; the two are cross-checked in tests.
pub fn fund_classification_summary(entries: &[LedgerEntry]) -> Vec<FundTypeTotals> {
    let mut summary: BTreeMap<FundType, FundTypeTotals> = FundType::ALL
        .iter()
        .map(|fund_type| {
            (
                *fund_type,
                FundTypeTotals {
                    fund_type: *fund_type,
                    count: 0,
                    total_cy: BigDecimal::from(0),
                    total_py: BigDecimal::from(0),
                },
            )
        })
        .collect();

    for entry in entries {
        if let Some(totals) = summary.get_mut(&entry.fund_type) {
            totals.count += 1;
            totals.total_cy += &entry.amount_cy;
            totals.total_py += &entry.amount_py;
        }
    }

    summary.into_values().collect()
}
