use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;

use super::summary::PREPAYMENT_RATE;
use crate::core::Transaction;
use crate::core::money::round_cents;

/// One calendar month of activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyRow {
    /// 1–12.
    pub month: u32,
    pub income: Decimal,
    /// All expenses, deductible or not.
    pub expense_base: Decimal,
    /// `max(0, (income - expense_base) × 20%)`.
    pub tax_provision: Decimal,
}

/// Twelve rows, January to December, for the given year. Rows are matched
/// by transaction date; undated rows are ignored.
pub fn monthly_breakdown(snapshot: &[Transaction], year: i32) -> Vec<MonthlyRow> {
    let mut income = [Decimal::ZERO; 12];
    let mut expense = [Decimal::ZERO; 12];

    for tx in snapshot {
        let Some(date) = tx.date.filter(|d| d.year() == year) else {
            continue;
        };
        let idx = date.month0() as usize;
        if tx.is_income() {
            income[idx] += tx.taxable_base;
        } else {
            expense[idx] += tx.taxable_base;
        }
    }

    (0..12)
        .map(|idx| MonthlyRow {
            month: idx as u32 + 1,
            income: income[idx],
            expense_base: expense[idx],
            tax_provision: round_cents((income[idx] - expense[idx]) * PREPAYMENT_RATE)
                .max(Decimal::ZERO),
        })
        .collect()
}
