use std::env;
use std::sync::LazyLock;

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HMAC secret for signing tokens.
static JWT_SECRET: LazyLock<String> =
    LazyLock::new(|| env::var("JWT_SECRET").unwrap_or_else(|_| "your_jwt_secret".to_string()));

/// Token lifetime in seconds.
static TOKEN_TTL_SECONDS: LazyLock<i64> = LazyLock::new(|| {
    env::var("TOKEN_TTL_SECONDS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3600)
});

#[derive(Clone, Error, Debug, PartialEq)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Token not yet valid")]
    NotYetValid,

    #[error("Invalid token")]
    Malformed,
}

/// The signed identity carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub id: i64,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Sign a token for a freshly authenticated user
pub fn issue_token(user_id: i64, role: &str) -> Result<String, TokenError> {
    let now = Utc::now();
    let claims = Claims {
        id: user_id,
        role: role.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(*TOKEN_TTL_SECONDS)).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .map_err(|_| TokenError::Malformed)
}

/// Verify a bearer token and return its claims
pub fn verify_token(token: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_nbf = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(JWT_SECRET.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|err| match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::ImmatureSignature => TokenError::NotYetValid,
        _ => TokenError::Malformed,
    })
}
