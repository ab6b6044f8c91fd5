//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::database_id::DatabaseId;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request did not carry a bearer token in the `Authorization` header.
    #[error("missing bearer token")]
    MissingToken,

    /// The bearer token could not be decoded or its signature did not verify.
    #[error("invalid bearer token")]
    InvalidToken,

    /// The bearer token was valid but its `exp` claim is in the past.
    #[error("bearer token has expired")]
    ExpiredToken,

    /// A token could not be signed.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// The request could not be understood, e.g. malformed JSON or an invalid
    /// query parameter.
    #[error("{0}")]
    BadRequest(String),

    /// A PATCH request did not contain any fields to update.
    #[error("no valid fields provided for update")]
    EmptyPatch,

    /// A field had the wrong type or a value outside its allowed range.
    #[error("{0}")]
    Validation(String),

    /// A full record was submitted without some of its required fields.
    #[error("missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// The request body named fields that the resource does not have.
    ///
    /// These are rejected rather than ignored so that a typo in a field
    /// name is not silently dropped.
    #[error("unknown field(s): {}", .0.join(", "))]
    UnknownFields(Vec<String>),

    /// A reference field named a record that does not exist or belongs to
    /// another user.
    #[error("{field} {id} does not refer to a valid record")]
    InvalidReference {
        /// The name of the reference field, e.g. "category_id".
        field: &'static str,
        /// The ID that could not be resolved.
        id: DatabaseId,
    },

    /// An amount that must be strictly positive was zero, negative or not a
    /// finite number.
    #[error("{field} must be a positive number")]
    NonPositiveAmount {
        /// The name of the offending field, e.g. "target_amount".
        field: &'static str,
    },

    /// The requested resource was not found.
    ///
    /// This is also returned when the resource exists but is owned by
    /// another user, so that the response does not leak its existence.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The record clashes with an existing record, e.g. a duplicate name.
    #[error("{0}")]
    Conflict(String),

    /// A record could not be converted to or from JSON.
    #[error("could not serialize as JSON: {0}")]
    JsonSerialization(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl Error {
    /// The HTTP status code and machine readable error code for the error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Error::MissingToken | Error::InvalidToken | Error::ExpiredToken => {
                (StatusCode::UNAUTHORIZED, "AUTH_ERROR")
            }
            Error::BadRequest(_) | Error::EmptyPatch => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Error::Validation(_)
            | Error::MissingFields(_)
            | Error::UnknownFields(_)
            | Error::InvalidReference { .. }
            | Error::NonPositiveAmount { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
            }
            Error::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Error::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Error::TokenCreation(_)
            | Error::JsonSerialization(_)
            | Error::DatabaseLockError
            | Error::SqlError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal details are for the server logs only.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}
