use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::core::money::round_cents;
use crate::core::{FiscalQuarter, Transaction, VatRate, money};

/// Income-tax prepayment rate applied to net profit (Modelo 130).
pub const PREPAYMENT_RATE: Decimal = dec!(0.20);

/// Quarter or year-to-date totals derived from a ledger snapshot.
///
/// Never stored; recompute from the snapshot whenever it is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuarterSummary {
    /// Sum of income taxable bases.
    pub total_income: Decimal,
    /// Sum of expense taxable bases.
    pub total_expense_base: Decimal,
    /// Sum of taxable bases of deductible expenses only.
    pub total_deductible_expense_base: Decimal,
    /// IVA repercutido.
    pub vat_collected: Decimal,
    /// IVA soportado deducible.
    pub deductible_vat_paid: Decimal,
    /// `vat_collected - deductible_vat_paid`.
    pub vat_settlement: Decimal,
    /// `total_income - total_deductible_expense_base`.
    pub net_profit: Decimal,
    /// `net_profit × 20%`; negative when the period ran at a loss.
    pub income_tax_provision: Decimal,
    pub invoice_count: usize,
    pub expense_count: usize,
}

impl QuarterSummary {
    /// What-if projection: add income and deductible expenses, both
    /// assumed to carry 21% VAT, and recompute the derived figures.
    ///
    /// Only the deductible expense base grows; `total_expense_base` keeps
    /// the recorded figure.
    pub fn with_projection(
        &self,
        extra_income: Decimal,
        extra_deductible_expense: Decimal,
    ) -> Self {
        let rate = VatRate::General;
        let mut projected = Self {
            total_income: self.total_income + extra_income,
            total_deductible_expense_base: self.total_deductible_expense_base
                + extra_deductible_expense,
            vat_collected: self.vat_collected + money::vat_amount(extra_income, rate),
            deductible_vat_paid: self.deductible_vat_paid
                + money::vat_amount(extra_deductible_expense, rate),
            ..self.clone()
        };
        projected.derive();
        projected
    }

    /// Cash to set aside: the income-tax provision plus any VAT payable.
    pub fn cash_reserve(&self) -> Decimal {
        self.income_tax_provision.max(Decimal::ZERO) + self.vat_settlement.max(Decimal::ZERO)
    }

    fn derive(&mut self) {
        self.vat_settlement = self.vat_collected - self.deductible_vat_paid;
        self.net_profit = self.total_income - self.total_deductible_expense_base;
        self.income_tax_provision = round_cents(self.net_profit * PREPAYMENT_RATE);
    }
}

/// Totals for the rows filed under `quarter`.
///
/// An empty snapshot, or one without rows for the quarter, yields
/// [`QuarterSummary::default`] (all zero).
pub fn quarterly_summary(snapshot: &[Transaction], quarter: FiscalQuarter) -> QuarterSummary {
    summarize(snapshot.iter().filter(|tx| tx.in_quarter(quarter)))
}

/// Totals for quarters 1 through `through_quarter` of `year`, inclusive.
pub fn ytd_summary(snapshot: &[Transaction], year: i32, through_quarter: u8) -> QuarterSummary {
    let quarters = FiscalQuarter::year_to_date(year, through_quarter);
    summarize(
        snapshot
            .iter()
            .filter(|tx| tx.quarter.is_some_and(|q| quarters.contains(&q))),
    )
}

pub(crate) fn summarize<'a>(rows: impl Iterator<Item = &'a Transaction>) -> QuarterSummary {
    let mut s = QuarterSummary::default();
    for tx in rows {
        if tx.is_income() {
            s.total_income += tx.taxable_base;
            s.vat_collected += tx.vat_amount;
            s.invoice_count += 1;
        } else {
            s.total_expense_base += tx.taxable_base;
            s.expense_count += 1;
            if tx.deductible {
                s.total_deductible_expense_base += tx.taxable_base;
                s.deductible_vat_paid += tx.deductible_vat_amount;
            }
        }
    }
    s.derive();
    s
}

/// Headline accounts-receivable figures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReceivablesOverview {
    /// Sum of income totals (VAT included).
    pub total_invoiced: Decimal,
    /// Sum of totals of income not yet paid.
    pub pending_total: Decimal,
    pub invoice_count: usize,
    pub pending_count: usize,
}

pub fn receivables_overview(snapshot: &[Transaction]) -> ReceivablesOverview {
    snapshot
        .iter()
        .filter(|tx| tx.is_income())
        .fold(ReceivablesOverview::default(), |mut acc, tx| {
            acc.total_invoiced += tx.total;
            acc.invoice_count += 1;
            if !tx.is_paid() {
                acc.pending_total += tx.total;
                acc.pending_count += 1;
            }
            acc
        })
}
