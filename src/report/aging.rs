use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::core::{Transaction, today};

/// Upper bound (inclusive) of the `0-30` bucket, in days.
pub const AGING_CURRENT_DAYS: i64 = 30;
/// Upper bound (inclusive) of the `31-60` bucket.
pub const AGING_LATE_DAYS: i64 = 60;
/// Upper bound (inclusive) of the `61-90` bucket.
pub const AGING_VERY_LATE_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AgingBucket {
    #[serde(rename = "0-30")]
    Current,
    #[serde(rename = "31-60")]
    Late,
    #[serde(rename = "61-90")]
    VeryLate,
    #[serde(rename = "90+")]
    Critical,
}

impl AgingBucket {
    /// Closed upper bounds: exactly 30 days is still `0-30`.
    pub fn from_days(days: i64) -> Self {
        if days <= AGING_CURRENT_DAYS {
            Self::Current
        } else if days <= AGING_LATE_DAYS {
            Self::Late
        } else if days <= AGING_VERY_LATE_DAYS {
            Self::VeryLate
        } else {
            Self::Critical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Current => "0-30",
            Self::Late => "31-60",
            Self::VeryLate => "61-90",
            Self::Critical => "90+",
        }
    }
}

impl fmt::Display for AgingBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An unpaid invoice with its age.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgingRow {
    pub transaction: Transaction,
    /// Days since the invoice date; 0 when undated, negative for future dates.
    pub days_outstanding: i64,
    pub bucket: AgingBucket,
}

/// Unpaid income as of today, oldest first.
pub fn ar_aging(snapshot: &[Transaction]) -> Vec<AgingRow> {
    ar_aging_at(snapshot, today())
}

/// Unpaid income as of `as_of`, oldest first. Undated rows sort first.
pub fn ar_aging_at(snapshot: &[Transaction], as_of: NaiveDate) -> Vec<AgingRow> {
    let mut rows: Vec<AgingRow> = snapshot
        .iter()
        .filter(|tx| tx.is_income() && !tx.is_paid())
        .map(|tx| {
            let days = tx.date.map_or(0, |d| (as_of - d).num_days());
            AgingRow {
                transaction: tx.clone(),
                days_outstanding: days,
                bucket: AgingBucket::from_days(days),
            }
        })
        .collect();
    rows.sort_by_key(|row| row.transaction.date);
    rows
}
