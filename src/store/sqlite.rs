//! Implements a SQLite backed store for every resource type.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Row, params, params_from_iter, types::Value};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::UserId,
    database_id::DatabaseId,
    db::{get_timestamp, timestamp_value},
    resource::{Record, Resource},
    store::{Condition, Query, SortOrder, Store},
};

/// Stores records in a SQLite database.
///
/// The tables must have been created with [crate::db::initialize].
#[derive(Debug, Clone)]
pub struct SQLiteStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

fn quote(identifier: &str) -> String {
    format!("\"{identifier}\"")
}

fn select_columns<R: Resource>() -> String {
    let fields: Vec<String> = R::FIELDS.iter().map(|field| quote(field)).collect();

    format!("id, user_id, {}, created_at", fields.join(", "))
}

fn map_record<R: Resource>(row: &Row) -> Result<Record<R>, rusqlite::Error> {
    Ok(Record {
        id: row.get(0)?,
        user_id: UserId::new_unchecked(row.get(1)?),
        fields: R::map_row_with_offset(row, 2)?,
        created_at: get_timestamp(row, 2 + R::FIELDS.len())?,
    })
}

/// Build the WHERE clause for `conditions`, always scoped to the owner.
///
/// The owner is bound as the first parameter.
fn where_clause(owner: &UserId, conditions: &[Condition]) -> (String, Vec<Value>) {
    let mut clause_parts = vec!["user_id = ?1".to_owned()];
    let mut parameters = vec![Value::Text(owner.as_str().to_owned())];

    for condition in conditions {
        let (column, operator, value) = match condition {
            Condition::Equals(column, value) => (column, "=", value),
            Condition::AtLeast(column, value) => (column, ">=", value),
            Condition::AtMost(column, value) => (column, "<=", value),
        };

        parameters.push(value.clone());
        clause_parts.push(format!(
            "{} {operator} ?{}",
            quote(column),
            parameters.len()
        ));
    }

    (format!("WHERE {}", clause_parts.join(" AND ")), parameters)
}

/// Check that every record `resource` refers to exists and is owned by `owner`.
fn check_references<R: Resource>(
    resource: &R,
    owner: &UserId,
    connection: &Connection,
) -> Result<(), Error> {
    for reference in resource.references() {
        let exists: bool = connection.query_row(
            &format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1 AND user_id = ?2)",
                quote(reference.table)
            ),
            params![reference.id, owner.as_str()],
            |row| row.get(0),
        )?;

        if !exists {
            return Err(Error::InvalidReference {
                field: reference.field,
                id: reference.id,
            });
        }
    }

    Ok(())
}

/// Map constraint violations on a write to the resource's conflict error.
fn map_write_error<R: Resource>(resource: &R, error: rusqlite::Error) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        ) => resource.conflict_error(),
        error => error.into(),
    }
}

impl<R: Resource> Store<R> for SQLiteStore {
    /// Query for records in the database.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is a SQL error.
    fn find(&self, owner: &UserId, query: &Query) -> Result<Vec<Record<R>>, Error> {
        let (where_clause, mut parameters) = where_clause(owner, &query.conditions);

        let order_clause = if query.sort.is_empty() {
            "ORDER BY id ASC".to_owned()
        } else {
            let order_parts: Vec<String> = query
                .sort
                .iter()
                .map(|(column, order)| match order {
                    SortOrder::Ascending => format!("{} ASC", quote(column)),
                    SortOrder::Descending => format!("{} DESC", quote(column)),
                })
                .collect();
            format!("ORDER BY {}", order_parts.join(", "))
        };

        let mut query_string = format!(
            "SELECT {} FROM {} {where_clause} {order_clause}",
            select_columns::<R>(),
            quote(R::TABLE),
        );

        if let Some(limit) = query.limit {
            parameters.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
            parameters.push(Value::Integer(
                i64::try_from(query.offset).unwrap_or(i64::MAX),
            ));
            query_string.push_str(&format!(
                " LIMIT ?{} OFFSET ?{}",
                parameters.len() - 1,
                parameters.len()
            ));
        }

        let connection = self.lock()?;
        let mut statement = connection.prepare(&query_string)?;
        let records = statement
            .query_map(params_from_iter(parameters.iter()), map_record::<R>)?
            .map(|maybe_record| maybe_record.map_err(Error::from))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Count records in the database.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is a SQL error.
    fn count(&self, owner: &UserId, conditions: &[Condition]) -> Result<u64, Error> {
        let (where_clause, parameters) = where_clause(owner, conditions);

        let count: i64 = self.lock()?.query_row(
            &format!("SELECT COUNT(id) FROM {} {where_clause}", quote(R::TABLE)),
            params_from_iter(parameters.iter()),
            |row| row.get(0),
        )?;

        Ok(count.max(0) as u64)
    }

    /// Retrieve a record in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a record owned by `owner`,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get(&self, owner: &UserId, id: DatabaseId) -> Result<Record<R>, Error> {
        let record = self.lock()?.query_row(
            &format!(
                "SELECT {} FROM {} WHERE id = ?1 AND user_id = ?2",
                select_columns::<R>(),
                quote(R::TABLE)
            ),
            params![id, owner.as_str()],
            map_record::<R>,
        )?;

        Ok(record)
    }

    /// Create a new record in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidReference] if a reference field does not name a record owned by `owner`,
    /// - [Error::Conflict] if the record violates a uniqueness constraint,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn insert(&self, owner: &UserId, resource: R) -> Result<Record<R>, Error> {
        let connection = self.lock()?;
        check_references(&resource, owner, &connection)?;

        let mut parameters = vec![Value::Text(owner.as_str().to_owned())];
        parameters.extend(resource.to_sql_values());
        parameters.push(timestamp_value(OffsetDateTime::now_utc())?);

        let columns: Vec<String> = R::FIELDS.iter().map(|field| quote(field)).collect();
        let placeholders: Vec<String> = (1..=parameters.len())
            .map(|index| format!("?{index}"))
            .collect();

        connection
            .query_row(
                &format!(
                    "INSERT INTO {} (user_id, {}, created_at) VALUES ({}) RETURNING {}",
                    quote(R::TABLE),
                    columns.join(", "),
                    placeholders.join(", "),
                    select_columns::<R>()
                ),
                params_from_iter(parameters.iter()),
                map_record::<R>,
            )
            .map_err(|error| map_write_error(&resource, error))
    }

    /// Overwrite every writable field of a record in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a record owned by `owner`,
    /// - [Error::InvalidReference] if a reference field does not name a record owned by `owner`,
    /// - [Error::Conflict] if the record violates a uniqueness constraint,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&self, owner: &UserId, id: DatabaseId, resource: R) -> Result<Record<R>, Error> {
        let connection = self.lock()?;
        check_references(&resource, owner, &connection)?;

        let mut parameters = resource.to_sql_values();
        let assignments: Vec<String> = R::FIELDS
            .iter()
            .enumerate()
            .map(|(index, field)| format!("{} = ?{}", quote(field), index + 1))
            .collect();
        parameters.push(Value::Integer(id));
        parameters.push(Value::Text(owner.as_str().to_owned()));

        connection
            .query_row(
                &format!(
                    "UPDATE {} SET {} WHERE id = ?{} AND user_id = ?{} RETURNING {}",
                    quote(R::TABLE),
                    assignments.join(", "),
                    parameters.len() - 1,
                    parameters.len(),
                    select_columns::<R>()
                ),
                params_from_iter(parameters.iter()),
                map_record::<R>,
            )
            .map_err(|error| map_write_error(&resource, error))
    }

    /// Delete a record from the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a record owned by `owner`,
    /// - or [Error::SqlError] there is some other SQL error.
    fn delete(&self, owner: &UserId, id: DatabaseId) -> Result<(), Error> {
        let rows_affected = self.lock()?.execute(
            &format!(
                "DELETE FROM {} WHERE id = ?1 AND user_id = ?2",
                quote(R::TABLE)
            ),
            params![id, owner.as_str()],
        )?;

        if rows_affected == 0 {
            Err(Error::NotFound)
        } else {
            Ok(())
        }
    }
}
