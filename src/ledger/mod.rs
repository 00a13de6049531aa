//! Append-only CSV transaction ledger.
//!
//! ```no_run
//! use autonomo::core::TransactionBuilder;
//! use autonomo::ledger::LedgerStore;
//! use rust_decimal_macros::dec;
//!
//! let store = LedgerStore::new("data/ledger.csv");
//! let id = store
//!     .append(TransactionBuilder::income("Cliente SL", dec!(500)).date_str("2025-05-02").build()?)?;
//! let snapshot = store.load()?;
//! assert!(snapshot.iter().any(|tx| tx.id == id));
//! # Ok::<(), autonomo::core::AutonomoError>(())
//! ```
//!
//! The file has one header row with the columns in [`LEDGER_COLUMNS`];
//! ledgers written with the older Spanish headers ([`LEGACY_COLUMNS`]) and
//! Spanish codes (`ingreso`, `pagado`, ...) are read transparently. New
//! rows are always written in English.

mod schema;
mod store;

pub use schema::{
    HeaderMap, LEDGER_COLUMNS, LEGACY_COLUMNS, decode_row, encode_row, format_amount,
    format_flag, parse_flag, read_transactions,
};
pub use store::LedgerStore;
