use axum::Json;
use axum::extract::FromRequestParts;
use axum::response::{IntoResponse, Response};
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use http::StatusCode;
use http::request::Parts;
use serde_json::{Value, json};
use userhub::{LOGIN_SCHEMA, TokenError, verify_token};

use crate::error::{ApiError, validate};
use crate::response::ApiResponse;

/// The authenticated caller, extracted from a bearer token.
///
/// Mutating routes take this as an argument; a missing or bad token
/// rejects the request before the handler body runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub role: String,
}

pub struct AuthRejection(&'static str);

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": self.0 }))).into_response()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AuthRejection("Authorization header missing"))?;

        let claims = verify_token(bearer.token()).map_err(|e| {
            AuthRejection(match e {
                TokenError::Expired => "Token has expired",
                TokenError::NotYetValid => "Token not yet valid",
                TokenError::Malformed => "Invalid token",
            })
        })?;

        Ok(AuthUser {
            id: claims.id,
            role: claims.role,
        })
    }
}

/// POST /auth/login
pub(crate) async fn login(Json(body): Json<Value>) -> Result<Json<ApiResponse>, ApiError> {
    validate(&LOGIN_SCHEMA, &body)?;

    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let token = userhub::login(username, password).await?;

    Ok(Json(
        ApiResponse::success("Login successful").with_token(token),
    ))
}
