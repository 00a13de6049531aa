use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::AutonomoError;
use super::money;
use super::quarter::{FiscalQuarter, parse_iso_date};
use super::types::*;
use crate::rules::{DeductibilityClassification, VatClassification};

/// Builder for ledger drafts.
///
/// Derived amounts (VAT, total, deductible VAT) are always computed here,
/// never taken from the caller.
///
/// ```
/// use autonomo::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let entry = TransactionBuilder::expense("Iberdrola", dec!(89.99))
///     .date(NaiveDate::from_ymd_opt(2025, 4, 15).unwrap())
///     .description("Factura electricidad abril")
///     .vat_rate(VatRate::General)
///     .deduction_pct(30)
///     .build()
///     .unwrap();
///
/// assert_eq!(entry.vat_amount, dec!(18.90));
/// assert_eq!(entry.total, dec!(108.89));
/// assert_eq!(entry.deductible_vat_amount, dec!(5.67));
/// ```
pub struct TransactionBuilder {
    kind: TxKind,
    counterparty: String,
    taxable_base: Decimal,
    date: Option<NaiveDate>,
    tax_id: Option<String>,
    description: String,
    invoice_number: Option<String>,
    vat_rate: VatRate,
    deduction_pct: u8,
    legal_article: String,
    quarter: Option<FiscalQuarter>,
    status: Option<TxStatus>,
    origin: Origin,
}

impl TransactionBuilder {
    pub fn new(kind: TxKind, counterparty: impl Into<String>, taxable_base: Decimal) -> Self {
        Self {
            kind,
            counterparty: counterparty.into(),
            taxable_base,
            date: None,
            tax_id: None,
            description: String::new(),
            invoice_number: None,
            vat_rate: VatRate::General,
            deduction_pct: 0,
            legal_article: String::new(),
            quarter: None,
            status: None,
            origin: Origin::Manual,
        }
    }

    /// Issued invoice to a client.
    pub fn income(client: impl Into<String>, taxable_base: Decimal) -> Self {
        Self::new(TxKind::Income, client, taxable_base)
    }

    /// Received invoice or receipt from a supplier.
    pub fn expense(supplier: impl Into<String>, taxable_base: Decimal) -> Self {
        Self::new(TxKind::Expense, supplier, taxable_base)
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the date from upstream text. Unparseable text leaves the date
    /// unset, so the entry is filed under the current quarter.
    pub fn date_str(mut self, text: &str) -> Self {
        self.date = parse_iso_date(text);
        if self.date.is_none() && !text.trim().is_empty() {
            log::warn!("ignoring unparseable date '{text}'");
        }
        self
    }

    pub fn tax_id(mut self, tax_id: impl Into<String>) -> Self {
        let tax_id = tax_id.into();
        self.tax_id = (!tax_id.trim().is_empty()).then_some(tax_id);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn invoice_number(mut self, number: impl Into<String>) -> Self {
        let number = number.into();
        self.invoice_number = (!number.trim().is_empty()).then_some(number);
        self
    }

    pub fn vat_rate(mut self, rate: VatRate) -> Self {
        self.vat_rate = rate;
        self
    }

    /// Share of the VAT that may be reclaimed, 0–100. Expenses only.
    pub fn deduction_pct(mut self, pct: u8) -> Self {
        self.deduction_pct = pct;
        self
    }

    pub fn legal_article(mut self, article: impl Into<String>) -> Self {
        self.legal_article = article.into();
        self
    }

    /// File under an explicit quarter instead of deriving it from the date.
    pub fn quarter(mut self, quarter: FiscalQuarter) -> Self {
        self.quarter = Some(quarter);
        self
    }

    pub fn status(mut self, status: TxStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Apply both classifier outcomes: rate from the VAT classification,
    /// deduction and article from the deductibility classification.
    pub fn classified(
        mut self,
        vat: &VatClassification,
        deduction: &DeductibilityClassification,
    ) -> Self {
        self.vat_rate = vat.rate;
        self.deduction_pct = deduction.deduction_pct;
        self.legal_article = if deduction.article.is_empty() {
            vat.article.clone()
        } else {
            deduction.article.clone()
        };
        self
    }

    /// Validate the draft and compute derived amounts.
    pub fn build(self) -> Result<LedgerEntry, AutonomoError> {
        if self.taxable_base.is_sign_negative() && !self.taxable_base.is_zero() {
            return Err(AutonomoError::Builder(format!(
                "taxable base cannot be negative: {}",
                self.taxable_base
            )));
        }
        if self.taxable_base > money::MAX_AMOUNT {
            return Err(AutonomoError::Builder(format!(
                "taxable base {} exceeds {}",
                self.taxable_base,
                money::MAX_AMOUNT
            )));
        }
        if self.deduction_pct > 100 {
            return Err(AutonomoError::Builder(format!(
                "deduction percentage {} exceeds 100",
                self.deduction_pct
            )));
        }
        if self.kind == TxKind::Income && self.deduction_pct > 0 {
            return Err(AutonomoError::Builder(
                "income entries cannot carry a deduction".into(),
            ));
        }
        if self.counterparty.len() > 500 {
            return Err(AutonomoError::Builder(
                "counterparty cannot exceed 500 characters".into(),
            ));
        }

        let mut entry = LedgerEntry {
            date: self.date,
            kind: self.kind,
            counterparty: self.counterparty,
            tax_id: self.tax_id,
            description: self.description,
            invoice_number: self.invoice_number,
            taxable_base: self.taxable_base,
            vat_rate: self.vat_rate,
            vat_amount: Decimal::ZERO,
            total: Decimal::ZERO,
            deductible: self.deduction_pct > 0,
            deduction_pct: self.deduction_pct,
            deductible_vat_amount: Decimal::ZERO,
            legal_article: self.legal_article,
            quarter: self.quarter,
            status: self.status,
            origin: self.origin,
        };
        entry.recompute();
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn income_has_no_deduction() {
        let entry = TransactionBuilder::income("Cliente SL", dec!(1000))
            .date(NaiveDate::from_ymd_opt(2025, 2, 3).unwrap())
            .build()
            .unwrap();
        assert_eq!(entry.vat_amount, dec!(210.00));
        assert_eq!(entry.total, dec!(1210.00));
        assert!(!entry.deductible);
        assert_eq!(entry.deductible_vat_amount, dec!(0));
    }

    #[test]
    fn rejects_negative_base() {
        let err = TransactionBuilder::expense("X", dec!(-1)).build();
        assert!(matches!(err, Err(AutonomoError::Builder(_))));
    }

    #[test]
    fn rejects_absurd_base() {
        let err = TransactionBuilder::expense("X", Decimal::MAX).build();
        assert!(matches!(err, Err(AutonomoError::Builder(_))));
        assert!(TransactionBuilder::expense("X", money::MAX_AMOUNT).build().is_ok());
    }

    #[test]
    fn rejects_deduction_over_100() {
        let err = TransactionBuilder::expense("X", dec!(10))
            .deduction_pct(101)
            .build();
        assert!(err.is_err());
    }

    #[test]
    fn rejects_income_with_deduction() {
        let err = TransactionBuilder::income("X", dec!(10))
            .deduction_pct(50)
            .build();
        assert!(err.is_err());
    }

    #[test]
    fn zero_pct_expense_not_deductible() {
        let entry = TransactionBuilder::expense("Zara", dec!(50))
            .deduction_pct(0)
            .build()
            .unwrap();
        assert!(!entry.deductible);
        assert_eq!(entry.deductible_vat_amount, dec!(0));
    }

    #[test]
    fn lenient_date_text() {
        let entry = TransactionBuilder::expense("X", dec!(1))
            .date_str("15/04/2025")
            .build()
            .unwrap();
        assert_eq!(entry.date, None);

        let entry = TransactionBuilder::expense("X", dec!(1))
            .date_str("2025-04-15")
            .build()
            .unwrap();
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2025, 4, 15));
    }

    #[test]
    fn blank_optionals_are_none() {
        let entry = TransactionBuilder::expense("X", dec!(1))
            .tax_id("  ")
            .invoice_number("")
            .build()
            .unwrap();
        assert_eq!(entry.tax_id, None);
        assert_eq!(entry.invoice_number, None);
    }
}
