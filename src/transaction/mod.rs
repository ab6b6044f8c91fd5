//! Transactions record money moving in or out of the user's accounts.
//!
//! This module contains the `Transaction` model, how it is stored and the
//! filtered, paged transaction list.

mod core;
mod query;

pub use core::{Transaction, TransactionType};
pub use query::list_transactions;
