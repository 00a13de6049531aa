//! # autonomo
//!
//! Tax engine for Spanish self-employed workers (autónomos): classifies the
//! IVA rate and deductibility of each transaction, keeps an append-only
//! ledger, and derives the quarterly filing figures (Modelo 303, Modelo 130)
//! and Social Security contribution.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Figures are estimates for planning and require professional review
//! before filing.
//!
//! ## Quick Start
//!
//! ```rust
//! use autonomo::core::*;
//! use autonomo::report::{quarterly_summary, vat_settlement};
//! use autonomo::rules::{RuleTable, classify_deductibility, classify_vat};
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//!
//! let rules = RuleTable::spain_2025();
//! let profile = UserProfile::new(WorkLocation::Home, 30);
//!
//! let vat = classify_vat("Hosting anual", "Hetzner", &rules);
//! let ded = classify_deductibility("Hosting anual", vat.rate, vat.exempt, &profile, &rules);
//!
//! let expense = TransactionBuilder::expense("Hetzner", dec!(100))
//!     .date(NaiveDate::from_ymd_opt(2025, 5, 2).unwrap())
//!     .classified(&vat, &ded)
//!     .build()
//!     .unwrap();
//! let income = TransactionBuilder::income("Cliente SL", dec!(1000))
//!     .date(NaiveDate::from_ymd_opt(2025, 5, 30).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let snapshot = vec![expense.into_transaction("1"), income.into_transaction("2")];
//! let q2 = FiscalQuarter::new(2025, 2).unwrap();
//!
//! let summary = quarterly_summary(&snapshot, q2);
//! assert_eq!(summary.net_profit, dec!(900));
//! assert_eq!(vat_settlement(&snapshot).amount_due, dec!(189.00));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Types, rule table, classifiers, reports, configuration |
//! | `ledger` (default) | CSV ledger store |
//! | `intake` (default) | Extractor, mailbox and scheduler records to ledger drafts |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod config;

#[cfg(feature = "core")]
pub mod rules;

#[cfg(feature = "core")]
pub mod report;

#[cfg(feature = "ledger")]
pub mod ledger;

#[cfg(feature = "intake")]
pub mod intake;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
