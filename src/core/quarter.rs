use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fiscal quarter, rendered as `YYYY-Qn` (e.g. `"2025-Q2"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct FiscalQuarter {
    year: i32,
    quarter: u8,
}

/// Error returned when a quarter key is not of the form `YYYY-Qn`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuarterParseError {
    /// The rejected input.
    pub value: String,
}

impl fmt::Display for QuarterParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid fiscal quarter '{}': expected YYYY-Qn", self.value)
    }
}

impl std::error::Error for QuarterParseError {}

impl FiscalQuarter {
    /// Create a quarter; `quarter` must be 1–4.
    pub fn new(year: i32, quarter: u8) -> Option<Self> {
        (1..=4).contains(&quarter).then_some(Self { year, quarter })
    }

    /// Quarter containing `date`: `(month - 1) / 3 + 1`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: ((date.month() - 1) / 3 + 1) as u8,
        }
    }

    /// Quarter containing today's local date.
    pub fn current() -> Self {
        Self::from_date(today())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    /// First calendar month of the quarter (1, 4, 7, or 10).
    pub fn first_month(&self) -> u32 {
        u32::from(self.quarter - 1) * 3 + 1
    }

    /// Whether `date` falls inside this quarter.
    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::from_date(date) == *self
    }

    pub fn previous(&self) -> Self {
        if self.quarter == 1 {
            Self {
                year: self.year - 1,
                quarter: 4,
            }
        } else {
            Self {
                year: self.year,
                quarter: self.quarter - 1,
            }
        }
    }

    pub fn next(&self) -> Self {
        if self.quarter == 4 {
            Self {
                year: self.year + 1,
                quarter: 1,
            }
        } else {
            Self {
                year: self.year,
                quarter: self.quarter + 1,
            }
        }
    }

    /// Quarters 1 through `through` of `year`, inclusive. `through` is capped at 4.
    pub fn year_to_date(year: i32, through: u8) -> Vec<Self> {
        (1..=through.min(4))
            .map(|quarter| Self { year, quarter })
            .collect()
    }
}

impl fmt::Display for FiscalQuarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-Q{}", self.year, self.quarter)
    }
}

impl FromStr for FiscalQuarter {
    type Err = QuarterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || QuarterParseError { value: s.into() };
        let (year, quarter) = s.trim().split_once("-Q").ok_or_else(err)?;
        let year: i32 = year.parse().map_err(|_| err())?;
        let quarter: u8 = quarter.parse().map_err(|_| err())?;
        Self::new(year, quarter).ok_or_else(err)
    }
}

impl From<FiscalQuarter> for String {
    fn from(q: FiscalQuarter) -> Self {
        q.to_string()
    }
}

impl TryFrom<String> for FiscalQuarter {
    type Error = QuarterParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Today's local calendar date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse an ISO `YYYY-MM-DD` date. A longer timestamp such as
/// `2025-04-15T10:00:00Z` is accepted by its date prefix.
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let prefix = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

/// Quarter for an ISO date string, falling back to the current quarter when
/// the date is missing or unparseable.
pub fn derive_quarter(date_text: &str) -> FiscalQuarter {
    match parse_iso_date(date_text) {
        Some(d) => FiscalQuarter::from_date(d),
        None => {
            if !date_text.trim().is_empty() {
                log::warn!("unparseable date '{date_text}'; using the current quarter");
            }
            FiscalQuarter::current()
        }
    }
}
