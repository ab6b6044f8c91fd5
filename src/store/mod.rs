//! The repository interface for reading and writing user-owned records.
//!
//! Every operation takes the ID of the requesting user and only ever sees
//! that user's rows. A record owned by someone else behaves exactly as if it
//! did not exist.

mod sqlite;

pub use sqlite::SQLiteStore;

use rusqlite::types::Value;

use crate::{
    Error,
    auth::UserId,
    database_id::DatabaseId,
    resource::{Record, Resource},
};

/// Handles the creation, retrieval, update and deletion of records of type `R`.
pub trait Store<R: Resource> {
    /// Retrieve the records owned by `owner` that match `query`.
    fn find(&self, owner: &UserId, query: &Query) -> Result<Vec<Record<R>>, Error>;

    /// Count the records owned by `owner` that satisfy every condition.
    fn count(&self, owner: &UserId, conditions: &[Condition]) -> Result<u64, Error>;

    /// Retrieve a single record.
    ///
    /// Returns [Error::NotFound] if the record does not exist or is owned by
    /// another user.
    fn get(&self, owner: &UserId, id: DatabaseId) -> Result<Record<R>, Error>;

    /// Store a new record for `owner`.
    fn insert(&self, owner: &UserId, resource: R) -> Result<Record<R>, Error>;

    /// Overwrite the fields of an existing record.
    fn update(&self, owner: &UserId, id: DatabaseId, resource: R) -> Result<Record<R>, Error>;

    /// Delete a record.
    fn delete(&self, owner: &UserId, id: DatabaseId) -> Result<(), Error>;
}

/// Defines how records should be fetched from [Store::find].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Only include records that satisfy every condition.
    pub conditions: Vec<Condition>,
    /// Columns to sort by, in priority order. Empty sorts by ID.
    pub sort: Vec<(&'static str, SortOrder)>,
    /// Selects up to the first N (`limit`) records.
    pub limit: Option<u64>,
    /// Skip this many records before applying `limit`.
    pub offset: u64,
}

/// A filter on a single column.
///
/// Column names must be one of the resource's [Resource::FIELDS].
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// The column equals the value.
    Equals(&'static str, Value),
    /// The column is greater than or equal to the value.
    AtLeast(&'static str, Value),
    /// The column is less than or equal to the value.
    AtMost(&'static str, Value),
}

/// The order to sort records in a [Query].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    Descending,
}
