//! Database initialisation and helpers for converting between rows and domain types.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, Transaction as SqlTransaction, TransactionBehavior,
    types::{Type, Value},
};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    Error, account::Account, budget::Budget, category::Category, goal::Goal, resource::Resource,
    transaction::Transaction,
};

/// Create all application tables.
///
/// Foreign key enforcement is switched on for `connection` so that deleting
/// an account or category clears the references to it.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    // Referenced tables must exist before the tables that reference them.
    Account::create_table(&transaction)?;
    Category::create_table(&transaction)?;
    Transaction::create_table(&transaction)?;
    Budget::create_table(&transaction)?;
    Goal::create_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Read a text column and parse it with [FromStr], e.g. for enum columns.
pub fn get_parsed<T>(row: &Row, index: usize) -> Result<T, rusqlite::Error>
where
    T: FromStr,
    T::Err: Display,
{
    let text: String = row.get(index)?;

    text.parse().map_err(|error: T::Err| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, error.to_string().into())
    })
}

/// Read an RFC 3339 timestamp column.
pub fn get_timestamp(row: &Row, index: usize) -> Result<OffsetDateTime, rusqlite::Error> {
    let text: String = row.get(index)?;

    OffsetDateTime::parse(&text, &Rfc3339)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, error.into()))
}

/// Convert a timestamp to an RFC 3339 text value for storage.
pub fn timestamp_value(timestamp: OffsetDateTime) -> Result<Value, Error> {
    timestamp
        .format(&Rfc3339)
        .map(Value::Text)
        .map_err(|error| Error::SqlError(rusqlite::Error::ToSqlConversionFailure(error.into())))
}

/// Convert an optional value into an SQL value, mapping `None` to `NULL`.
pub fn optional_value<T: Into<Value>>(value: Option<T>) -> Value {
    value.map_or(Value::Null, Into::into)
}
