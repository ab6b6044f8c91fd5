//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error, auth::AuthState, db::initialize, pagination::PaginationConfig, store::SQLiteStore,
};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The store for every resource type, backed by the SQLite connection.
    pub store: SQLiteStore,

    /// The keys and settings for verifying bearer tokens.
    pub auth: AuthState,

    /// The config that controls how lists of data are paged.
    pub pagination_config: PaginationConfig,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// Bearer tokens must be signed with `jwt_secret` and, if `jwt_audience`
    /// is set, carry a matching `aud` claim.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        jwt_secret: &str,
        jwt_audience: Option<String>,
        pagination_config: PaginationConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            store: SQLiteStore::new(Arc::new(Mutex::new(db_connection))),
            auth: AuthState::new(jwt_secret, jwt_audience),
            pagination_config,
        })
    }
}
