use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::{FiscalQuarter, Transaction};

/// Quarterly VAT return figures (Modelo 303).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Modelo303 {
    /// IVA repercutido on income.
    pub vat_collected: Decimal,
    /// IVA soportado on all expenses, before deduction.
    pub vat_paid_total: Decimal,
    /// Deductible share of `vat_paid_total`.
    pub vat_paid_deductible: Decimal,
    /// `vat_collected - vat_paid_deductible`.
    pub result: Decimal,
    /// `max(0, result)`.
    pub amount_due: Decimal,
    /// `max(0, -result)`, carried to the next period.
    pub amount_to_carry_forward: Decimal,
}

impl Modelo303 {
    pub fn is_payable(&self) -> bool {
        self.amount_due > Decimal::ZERO
    }
}

/// VAT settlement for the rows given; pass the rows of one quarter.
pub fn vat_settlement<'a>(rows: impl IntoIterator<Item = &'a Transaction>) -> Modelo303 {
    let mut m = Modelo303::default();
    for tx in rows {
        if tx.is_income() {
            m.vat_collected += tx.vat_amount;
        } else {
            m.vat_paid_total += tx.vat_amount;
            m.vat_paid_deductible += tx.deductible_vat_amount;
        }
    }
    m.result = m.vat_collected - m.vat_paid_deductible;
    m.amount_due = m.result.max(Decimal::ZERO);
    if m.result.is_sign_negative() && !m.result.is_zero() {
        m.amount_to_carry_forward = -m.result;
    }
    m
}

/// [`vat_settlement`] over the rows filed under `quarter`.
pub fn modelo_303(snapshot: &[Transaction], quarter: FiscalQuarter) -> Modelo303 {
    vat_settlement(snapshot.iter().filter(|tx| tx.in_quarter(quarter)))
}
