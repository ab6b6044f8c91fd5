//! Defines the claims carried in a bearer token and how to sign and verify them.

use jsonwebtoken::{
    Algorithm, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    auth::{AuthState, UserId},
};

/// The contents of a JSON Web Token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub sub: String,
    /// The expiry time of the token as a Unix timestamp.
    pub exp: i64,
    /// The time the token was issued as a Unix timestamp.
    pub iat: i64,
    /// The intended audience of the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Sign a token for `user_id` that expires after `duration`.
///
/// # Errors
/// Returns [Error::TokenCreation] if the token could not be signed.
pub fn encode_token(
    user_id: &UserId,
    audience: Option<&str>,
    duration: Duration,
    encoding_key: &EncodingKey,
) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        sub: user_id.as_str().to_owned(),
        exp: (now + duration).unix_timestamp(),
        iat: now.unix_timestamp(),
        aud: audience.map(ToOwned::to_owned),
    };

    encode(&Header::new(Algorithm::HS256), &claims, encoding_key)
        .map_err(|error| Error::TokenCreation(error.to_string()))
}

/// Verify `token` and return its claims.
///
/// # Errors
/// Returns [Error::ExpiredToken] if the token has expired, otherwise
/// [Error::InvalidToken] if the token is malformed, has a bad signature or
/// the wrong audience.
pub fn decode_token(token: &str, state: &AuthState) -> Result<Claims, Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["exp", "sub"]);

    match &state.audience {
        Some(audience) => validation.set_audience(&[audience]),
        None => validation.validate_aud = false,
    }

    decode::<Claims>(token, &state.decoding_key, &validation)
        .map(|token_data| token_data.claims)
        .map_err(|error| match error.kind() {
            ErrorKind::ExpiredSignature => Error::ExpiredToken,
            _ => {
                tracing::debug!("Rejected bearer token: {error}");
                Error::InvalidToken
            }
        })
}
