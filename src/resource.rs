//! The trait shared by every resource type and the envelope records are stored in.
//!
//! A resource (transaction, account, category, budget or goal) is a plain
//! struct holding the fields a client may write. The store wraps it in a
//! [Record] that adds the database ID, the owning user and the creation time.

use std::fmt::Debug;

use rusqlite::{Connection, Row, types::Value};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use time::OffsetDateTime;

use crate::{Error, auth::UserId, database_id::DatabaseId};

/// Envelope fields that clients may read but never write.
pub const READ_ONLY_FIELDS: &[&str] = &["id", "user_id", "created_at"];

/// A resource type that can be stored, validated and updated through the API.
pub trait Resource:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The lowercase singular name used in messages, e.g. "transaction".
    const NAME: &'static str;

    /// The capitalised singular name used in response messages.
    const LABEL: &'static str;

    /// The name of the table the resource is stored in.
    const TABLE: &'static str;

    /// The route for a single record, e.g. "/api/v1/goals/{goal_id}".
    const ITEM_ENDPOINT: &'static str;

    /// The writable fields in JSON and column order.
    ///
    /// Field names double as column names.
    const FIELDS: &'static [&'static str];

    /// The fields that must be present in a full record.
    const REQUIRED_FIELDS: &'static [&'static str];

    /// Create the table for the resource.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error>;

    /// Read the resource from `row`, starting at column `offset`.
    ///
    /// **Note:** The columns must appear in the order of [Resource::FIELDS].
    ///
    /// # Errors
    /// Returns an error if a column cannot be converted into the corresponding rust type.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error>;

    /// The SQL values for the fields in the order of [Resource::FIELDS].
    fn to_sql_values(&self) -> Vec<Value>;

    /// Check range and format constraints that the type system does not.
    ///
    /// # Errors
    /// Returns a validation error describing the first invalid field.
    fn validate(&self) -> Result<(), Error>;

    /// The records this resource refers to.
    ///
    /// Each must exist and be owned by the same user.
    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }

    /// The error to return when the resource violates a uniqueness constraint.
    fn conflict_error(&self) -> Error {
        Error::Conflict(format!("the {} conflicts with an existing record", Self::NAME))
    }
}

/// A reference from one resource to another, e.g. a transaction's category.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    /// The name of the reference field, e.g. "category_id".
    pub field: &'static str,
    /// The table the referenced record lives in.
    pub table: &'static str,
    /// The ID of the referenced record.
    pub id: DatabaseId,
}

/// A stored resource together with its ID, owner and creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<R> {
    /// The ID of the record.
    pub id: DatabaseId,
    /// The user who owns the record.
    pub user_id: UserId,
    /// The client-writable fields.
    #[serde(flatten)]
    pub fields: R,
    /// When the record was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Check that a name field is not blank.
///
/// # Errors
/// Returns [Error::Validation] if `name` is empty or only whitespace.
pub fn validate_name(field: &str, name: &str) -> Result<(), Error> {
    if name.trim().is_empty() {
        Err(Error::Validation(format!("{field} cannot be empty")))
    } else {
        Ok(())
    }
}

/// Check that an amount is a finite number.
///
/// # Errors
/// Returns [Error::Validation] if `amount` is NaN or infinite.
pub fn validate_finite(field: &str, amount: f64) -> Result<(), Error> {
    if amount.is_finite() {
        Ok(())
    } else {
        Err(Error::Validation(format!("{field} must be a finite number")))
    }
}

/// Check that an amount is strictly positive.
///
/// # Errors
/// Returns [Error::NonPositiveAmount] if `amount` is zero, negative or not finite.
pub fn validate_positive(field: &'static str, amount: f64) -> Result<(), Error> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(Error::NonPositiveAmount { field })
    }
}
