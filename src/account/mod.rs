//! Accounts hold money and may be referenced by transactions.

mod core;

pub use core::Account;

#[cfg(test)]
pub use core::AccountType;
