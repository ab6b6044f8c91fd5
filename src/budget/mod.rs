//! Budgets limit spending over a period, optionally for a single category.

mod core;
mod endpoints;
mod period;

pub use core::Budget;
pub use endpoints::{get_budget, get_budget_progress, list_budgets};
pub use period::Period;
