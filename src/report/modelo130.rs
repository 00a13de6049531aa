use rust_decimal::Decimal;
use serde::Serialize;

use super::summary::PREPAYMENT_RATE;
use crate::core::money::round_cents;
use crate::core::{FiscalQuarter, Transaction};

/// Quarterly income-tax prepayment figures (Modelo 130), year to date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Modelo130 {
    pub income_ytd: Decimal,
    /// Taxable base of expenses flagged deductible.
    pub deductible_expenses_ytd: Decimal,
    /// `income_ytd - deductible_expenses_ytd`, may be negative.
    pub profit_ytd: Decimal,
    /// `max(0, profit_ytd × 20%)`.
    pub gross_prepayment: Decimal,
    /// IRPF already withheld by clients this year.
    pub withholding_ytd: Decimal,
    /// `max(0, gross_prepayment - withholding_ytd)`.
    pub net_prepayment: Decimal,
}

/// Prepayment over the year-to-date rows given.
pub fn income_tax_prepayment<'a>(
    rows_ytd: impl IntoIterator<Item = &'a Transaction>,
    withholding_ytd: Decimal,
) -> Modelo130 {
    let mut m = Modelo130 {
        withholding_ytd,
        ..Default::default()
    };
    for tx in rows_ytd {
        if tx.is_income() {
            m.income_ytd += tx.taxable_base;
        } else if tx.deductible {
            m.deductible_expenses_ytd += tx.taxable_base;
        }
    }
    m.profit_ytd = m.income_ytd - m.deductible_expenses_ytd;
    m.gross_prepayment = round_cents(m.profit_ytd * PREPAYMENT_RATE).max(Decimal::ZERO);
    m.net_prepayment = (m.gross_prepayment - withholding_ytd).max(Decimal::ZERO);
    m
}

/// [`income_tax_prepayment`] for quarters 1 through `through_quarter` of `year`.
pub fn modelo_130(
    snapshot: &[Transaction],
    year: i32,
    through_quarter: u8,
    withholding_ytd: Decimal,
) -> Modelo130 {
    let quarters = FiscalQuarter::year_to_date(year, through_quarter);
    income_tax_prepayment(
        snapshot
            .iter()
            .filter(|tx| tx.quarter.is_some_and(|q| quarters.contains(&q))),
        withholding_ytd,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TransactionBuilder;
    use rust_decimal_macros::dec;

    #[test]
    fn loss_means_no_prepayment() {
        let rows = [TransactionBuilder::expense("X", dec!(500))
            .deduction_pct(100)
            .quarter(FiscalQuarter::new(2025, 1).unwrap())
            .build()
            .unwrap()
            .into_transaction("x")];
        let m = modelo_130(&rows, 2025, 1, Decimal::ZERO);
        assert_eq!(m.profit_ytd, dec!(-500));
        assert_eq!(m.gross_prepayment, Decimal::ZERO);
        assert_eq!(m.net_prepayment, Decimal::ZERO);
    }

    #[test]
    fn withholding_cannot_go_negative() {
        let rows = [TransactionBuilder::income("C", dec!(100))
            .build()
            .unwrap()
            .into_transaction("x")];
        let m = income_tax_prepayment(&rows, dec!(50));
        assert_eq!(m.gross_prepayment, dec!(20.00));
        assert_eq!(m.net_prepayment, Decimal::ZERO);
        assert_eq!(m.withholding_ytd, dec!(50));
    }
}
