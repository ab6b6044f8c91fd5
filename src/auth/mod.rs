//! Bearer token authentication.
//!
//! Tokens are issued by an external identity provider and signed with a
//! shared HS256 secret. The token's `sub` claim identifies the user who owns
//! the records a request may touch.

mod token;
mod user;

use axum::extract::FromRef;
use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::AppState;

pub use token::{Claims, decode_token, encode_token};
pub use user::{AuthUser, UserId};

/// The state needed to verify bearer tokens.
#[derive(Clone)]
pub struct AuthState {
    /// The key used to verify token signatures.
    pub decoding_key: DecodingKey,
    /// The expected `aud` claim. Audience validation is skipped when `None`.
    pub audience: Option<String>,
}

impl AuthState {
    /// Create the auth state for tokens signed with `secret`.
    pub fn new(secret: &str, audience: Option<String>) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            audience,
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

/// Create the key for signing tokens with `secret`.
pub fn create_encoding_key(secret: &str) -> EncodingKey {
    EncodingKey::from_secret(secret.as_bytes())
}
