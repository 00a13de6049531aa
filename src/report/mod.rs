//! Filing-ready figures derived from a ledger snapshot.
//!
//! Every function here is a pure read over `&[Transaction]`.
//!
//! | Function | Figures |
//! |----------|---------|
//! | [`quarterly_summary`], [`ytd_summary`] | income, expenses, VAT, profit, 20% provision |
//! | [`monthly_breakdown`] | twelve calendar months |
//! | [`ar_aging`] | unpaid invoices by age bucket |
//! | [`vat_settlement`] | Modelo 303 |
//! | [`income_tax_prepayment`] | Modelo 130 |
//! | [`social_security_contribution`] | RETA monthly contribution |
//! | [`annual_income_tax`] | IRPF annual estimate |
//! | [`next_filing_deadline`] | quarterly due date |

mod aging;
mod deadlines;
mod irpf;
mod modelo130;
mod modelo303;
mod monthly;
mod social_security;
mod summary;

pub use aging::{
    AGING_CURRENT_DAYS, AGING_LATE_DAYS, AGING_VERY_LATE_DAYS, AgingBucket, AgingRow, ar_aging,
    ar_aging_at,
};
pub use deadlines::{FILING_DAY, FilingDeadline, filing_due_date, next_filing_deadline};
pub use irpf::{
    BracketTax, IRPF_2025_BRACKETS, IncomeTaxBracket, IncomeTaxEstimate, annual_income_tax,
};
pub use modelo130::{Modelo130, income_tax_prepayment, modelo_130};
pub use modelo303::{Modelo303, modelo_303, vat_settlement};
pub use monthly::{MonthlyRow, monthly_breakdown};
pub use social_security::{
    ContributionBracket, FLAT_RATE_MONTHLY, RETA_2025_BRACKETS, social_security_contribution,
};
pub use summary::{
    PREPAYMENT_RATE, QuarterSummary, ReceivablesOverview, quarterly_summary,
    receivables_overview, ytd_summary,
};
