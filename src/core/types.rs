use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money;
use super::quarter::FiscalQuarter;

/// Spanish IVA rate (Ley 37/1992).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum VatRate {
    /// 0%, exempt operations (Art. 20).
    Exempt,
    /// 4%, tipo superreducido (Art. 91.Dos).
    SuperReduced,
    /// 10%, tipo reducido (Art. 91.Uno).
    Reduced,
    /// 21%, tipo general (Art. 90.Uno).
    General,
}

impl VatRate {
    /// All supported rates, lowest first.
    pub const ALL: [VatRate; 4] = [
        VatRate::Exempt,
        VatRate::SuperReduced,
        VatRate::Reduced,
        VatRate::General,
    ];

    /// Rate as a whole percentage.
    pub fn percent(&self) -> u8 {
        match self {
            Self::Exempt => 0,
            Self::SuperReduced => 4,
            Self::Reduced => 10,
            Self::General => 21,
        }
    }

    /// Rate as a decimal percentage (e.g. `21`).
    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.percent())
    }

    /// Parse from a whole percentage.
    pub fn from_percent(percent: u8) -> Option<Self> {
        match percent {
            0 => Some(Self::Exempt),
            4 => Some(Self::SuperReduced),
            10 => Some(Self::Reduced),
            21 => Some(Self::General),
            _ => None,
        }
    }

    /// Key of this rate in the rule table document (`"0"`, `"4"`, `"10"`, `"21"`).
    pub fn key(&self) -> &'static str {
        match self {
            Self::Exempt => "0",
            Self::SuperReduced => "4",
            Self::Reduced => "10",
            Self::General => "21",
        }
    }
}

impl fmt::Display for VatRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

impl From<VatRate> for u8 {
    fn from(rate: VatRate) -> Self {
        rate.percent()
    }
}

impl TryFrom<u8> for VatRate {
    type Error = String;

    fn try_from(percent: u8) -> Result<Self, Self::Error> {
        Self::from_percent(percent).ok_or_else(|| format!("unsupported VAT rate {percent}%"))
    }
}

/// How much a classification can be trusted.
///
/// `Low` marks a default guess (no rule matched) that needs manual review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Low,
}

impl Confidence {
    pub fn code(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
        }
    }
}

/// Direction of a ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    /// Issued invoice (ingreso).
    Income,
    /// Received invoice or receipt (gasto).
    Expense,
}

impl TxKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Parse from the ledger encoding. Legacy Spanish values are accepted.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "income" | "ingreso" => Some(Self::Income),
            "expense" | "gasto" => Some(Self::Expense),
            _ => None,
        }
    }
}

/// Payment status of a ledger row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    #[default]
    Pending,
    Paid,
    /// Only meaningful for income.
    Overdue,
}

impl TxStatus {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
        }
    }

    /// Parse from the ledger encoding. Legacy Spanish values are accepted.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "pending" | "pendiente" => Some(Self::Pending),
            "paid" | "pagado" => Some(Self::Paid),
            "overdue" | "vencido" => Some(Self::Overdue),
            _ => None,
        }
    }
}

/// Intake path a ledger row came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Scanned PDF or photo.
    Scanner,
    /// Invoice attachment found by the mailbox watcher.
    Gmail,
    /// Completed meeting from the scheduling calendar.
    Calendly,
    #[default]
    Manual,
}

impl Origin {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Scanner => "scanner",
            Self::Gmail => "gmail",
            Self::Calendly => "calendly",
            Self::Manual => "manual",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "scanner" => Some(Self::Scanner),
            "gmail" => Some(Self::Gmail),
            "calendly" => Some(Self::Calendly),
            "manual" => Some(Self::Manual),
            _ => None,
        }
    }
}

/// A ledger row ready to be appended: every field except the id.
///
/// Built by [`TransactionBuilder`](super::TransactionBuilder); the derived
/// amounts are recomputed again on append, so editing them by hand has no
/// lasting effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Invoice date. `None` when the source date was missing or unparseable.
    pub date: Option<NaiveDate>,
    pub kind: TxKind,
    /// Supplier (expense) or client (income).
    pub counterparty: String,
    /// NIF / CIF of the counterparty.
    pub tax_id: Option<String>,
    pub description: String,
    pub invoice_number: Option<String>,
    /// Base imponible.
    pub taxable_base: Decimal,
    pub vat_rate: VatRate,
    /// Derived: `round(base × rate / 100, 2)`.
    pub vat_amount: Decimal,
    /// Derived: `round(base + vat_amount, 2)`.
    pub total: Decimal,
    /// Expenses only.
    pub deductible: bool,
    /// Expenses only, 0–100.
    pub deduction_pct: u8,
    /// Derived: `round(vat_amount × deduction_pct / 100, 2)`.
    pub deductible_vat_amount: Decimal,
    /// Legal citation backing the classification.
    pub legal_article: String,
    /// Set explicitly or derived from `date` on append.
    pub quarter: Option<FiscalQuarter>,
    /// Defaults to `Pending` on append.
    pub status: Option<TxStatus>,
    pub origin: Origin,
}

impl LedgerEntry {
    /// Recompute VAT amount, total, and deductible VAT from base, rate,
    /// and deduction percentage. Income rows never carry a deduction.
    pub fn recompute(&mut self) {
        if self.kind == TxKind::Income {
            self.deductible = false;
            self.deduction_pct = 0;
        }
        self.vat_amount = money::vat_amount(self.taxable_base, self.vat_rate);
        self.total = money::gross_total(self.taxable_base, self.vat_amount);
        self.deductible_vat_amount = money::deductible_vat(self.vat_amount, self.deduction_pct);
    }

    /// Fiscal quarter this entry will be filed under: the explicit quarter,
    /// else the one containing `date`, else the current quarter.
    pub fn resolved_quarter(&self) -> FiscalQuarter {
        if let Some(q) = self.quarter {
            return q;
        }
        match self.date {
            Some(d) => FiscalQuarter::from_date(d),
            None => {
                log::warn!(
                    "entry for '{}' has no usable date; filing under the current quarter",
                    self.counterparty
                );
                FiscalQuarter::current()
            }
        }
    }

    /// Turn the draft into a persisted row with the given id.
    pub fn into_transaction(mut self, id: impl Into<String>) -> Transaction {
        self.recompute();
        let quarter = self.resolved_quarter();
        Transaction {
            id: id.into(),
            date: self.date,
            kind: self.kind,
            counterparty: self.counterparty,
            tax_id: self.tax_id,
            description: self.description,
            invoice_number: self.invoice_number,
            taxable_base: self.taxable_base,
            vat_rate: self.vat_rate,
            vat_amount: self.vat_amount,
            total: self.total,
            deductible: self.deductible,
            deduction_pct: self.deduction_pct,
            deductible_vat_amount: self.deductible_vat_amount,
            legal_article: self.legal_article,
            quarter: Some(quarter),
            status: self.status.unwrap_or_default(),
            origin: self.origin,
        }
    }
}

/// One persisted ledger row.
///
/// Rows read back from disk are taken as stored: corrupt numeric cells have
/// already been coerced to zero and are not recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque id assigned on append.
    pub id: String,
    pub date: Option<NaiveDate>,
    pub kind: TxKind,
    pub counterparty: String,
    pub tax_id: Option<String>,
    pub description: String,
    pub invoice_number: Option<String>,
    pub taxable_base: Decimal,
    pub vat_rate: VatRate,
    pub vat_amount: Decimal,
    pub total: Decimal,
    pub deductible: bool,
    pub deduction_pct: u8,
    pub deductible_vat_amount: Decimal,
    pub legal_article: String,
    /// `None` only when a stored quarter cell was unreadable.
    pub quarter: Option<FiscalQuarter>,
    pub status: TxStatus,
    pub origin: Origin,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TxKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TxKind::Expense
    }

    pub fn is_paid(&self) -> bool {
        self.status == TxStatus::Paid
    }

    pub fn in_quarter(&self, quarter: FiscalQuarter) -> bool {
        self.quarter == Some(quarter)
    }
}
