//! The ID type shared by every stored record.

/// The SQLite row ID of a transaction, account, category, budget or goal.
///
/// IDs are unique within a table, not across tables.
pub type DatabaseId = i64;
