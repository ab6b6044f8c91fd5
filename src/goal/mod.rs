//! Savings goals and their progress.

mod core;
mod endpoints;

pub use core::Goal;
pub use endpoints::{get_goal, get_goal_progress, list_goals};
