use chrono::NaiveDate;
use serde::Serialize;

use crate::core::FiscalQuarter;

/// Day of the month on which quarterly returns fall due.
pub const FILING_DAY: u32 = 20;

/// Next quarterly filing date for Modelo 303 and 130.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilingDeadline {
    /// Quarter being declared.
    pub quarter: FiscalQuarter,
    pub due_date: NaiveDate,
    /// Days from the reference date to `due_date`.
    pub days_remaining: i64,
}

/// The 20th of the month following the quarter; Q4 is due on 20 January.
pub fn filing_due_date(quarter: FiscalQuarter) -> NaiveDate {
    let next = quarter.next();
    // Day 20 exists in every month.
    NaiveDate::from_ymd_opt(next.year(), next.first_month(), FILING_DAY)
        .unwrap_or(NaiveDate::MAX)
}

/// Deadline for `quarter`, or for the following quarter when that one has
/// already passed on `today`.
pub fn next_filing_deadline(quarter: FiscalQuarter, today: NaiveDate) -> FilingDeadline {
    let mut quarter = quarter;
    let mut due_date = filing_due_date(quarter);
    if due_date < today {
        quarter = quarter.next();
        due_date = filing_due_date(quarter);
    }
    FilingDeadline {
        quarter,
        due_date,
        days_remaining: (due_date - today).num_days(),
    }
}
