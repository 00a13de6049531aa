//! Core ledger types, money helpers, fiscal quarters, and the user profile.
//!
//! Every other module builds on these: the classifiers fill a
//! [`TransactionBuilder`], the ledger persists [`Transaction`] rows, and the
//! report functions aggregate slices of them.

mod builder;
mod error;
pub mod money;
mod profile;
mod quarter;
mod types;

pub use builder::*;
pub use error::*;
pub use profile::*;
pub use quarter::*;
pub use types::*;
