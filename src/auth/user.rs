//! The authenticated user and the extractor that resolves them from a bearer token.

use std::fmt::Display;

use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::{AuthState, decode_token},
};

/// The ID of a user as issued by the identity provider.
///
/// Every record is owned by exactly one user and every query is filtered by
/// this ID.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserId(String);

impl UserId {
    /// Create a user ID.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidToken] if `id` is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, Error> {
        let id = id.into();

        if id.trim().is_empty() {
            Err(Error::InvalidToken)
        } else {
            Ok(Self(id))
        }
    }

    /// Create a user ID without validation, e.g. when reading from the database.
    pub fn new_unchecked(id: String) -> Self {
        Self(id)
    }

    /// The user ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The user who made a request, resolved from a verified bearer token.
///
/// Route handlers take this as an argument to require authentication.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    /// The ID of the user who owns the token.
    pub user_id: UserId,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|rejection| {
                if rejection.is_missing() {
                    Error::MissingToken
                } else {
                    Error::InvalidToken
                }
            })?;

        let auth_state = AuthState::from_ref(state);
        let claims = decode_token(bearer.token(), &auth_state)?;

        Ok(Self {
            user_id: UserId::new(claims.sub)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use serde_json::Value;
    use time::Duration;

    use crate::auth::{AuthState, UserId, create_encoding_key, encode_token};

    use super::AuthUser;

    const SECRET: &str = "nafstenoas";
    const TEST_PROTECTED_ROUTE: &str = "/protected";

    async fn whoami(user: AuthUser) -> String {
        user.user_id.to_string()
    }

    fn get_test_server() -> TestServer {
        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(whoami))
            .with_state(AuthState::new(SECRET, None));

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn token_for(user_id: &str, duration: Duration) -> String {
        encode_token(
            &UserId::new(user_id).unwrap(),
            None,
            duration,
            &create_encoding_key(SECRET),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn valid_token_resolves_user() {
        let server = get_test_server();

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .authorization_bearer(token_for("user-1", Duration::minutes(5)))
            .await;

        response.assert_status_ok();
        assert_eq!(response.text(), "user-1");
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let server = get_test_server();

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body = response.json::<Value>();
        assert_eq!(body["code"], "AUTH_ERROR");
        assert_eq!(body["error"], "missing bearer token");
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized() {
        let server = get_test_server();

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .authorization_bearer(token_for("user-1", Duration::hours(-2)))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>()["error"], "bearer token has expired");
    }

    #[tokio::test]
    async fn invalid_token_is_unauthorized() {
        let server = get_test_server();

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .authorization_bearer("FOOBAR")
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>()["error"], "invalid bearer token");
    }

    #[test]
    fn empty_user_id_is_rejected() {
        assert!(UserId::new("  ").is_err());
    }
}
