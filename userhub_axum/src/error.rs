use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::json;
use userhub::CoordinationError;

use crate::response::ApiResponse;

/// Response-side wrapper for [`CoordinationError`].
///
/// Handlers return `Result<_, ApiError>` and let `?` classify every
/// service failure into the documented status code and envelope.
#[derive(Debug)]
pub struct ApiError(pub CoordinationError);

impl From<CoordinationError> for ApiError {
    fn from(err: CoordinationError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.0.to_string();

        match self.0 {
            CoordinationError::ValidationFailed(violations) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": violations }))).into_response()
            }

            CoordinationError::InvalidCountry
            | CoordinationError::EmailExists
            | CoordinationError::UsernameExists
            | CoordinationError::UniquenessConflict
            | CoordinationError::ProfileExists => {
                (StatusCode::BAD_REQUEST, Json(ApiResponse::error(&message))).into_response()
            }

            CoordinationError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, Json(ApiResponse::error(&message))).into_response()
            }

            CoordinationError::UserNotFound
            | CoordinationError::ProfileNotFound
            | CoordinationError::CountryNotFound => {
                (StatusCode::NOT_FOUND, Json(ApiResponse::error(&message))).into_response()
            }

            CoordinationError::EmptyResult(_) => (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(&message).with_data::<Vec<()>>(&vec![])),
            )
                .into_response(),

            CoordinationError::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::error(
                    "Service Unavailable: Database connection was refused",
                )),
            )
                .into_response(),

            CoordinationError::TransactionFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    "Internal Server Error: Transaction error occurred",
                )),
            )
                .into_response(),

            CoordinationError::Internal(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(
                    ApiResponse::error(&format!("Internal Server Error: {detail}"))
                        .with_error_detail(&detail),
                ),
            )
                .into_response(),
        }
    }
}

/// Run a request payload through its schema, converting violations
/// into the 400 response.
pub(crate) fn validate(
    schema: &userhub::Schema,
    data: &serde_json::Value,
) -> Result<(), ApiError> {
    schema
        .validate(data)
        .map_err(|violations| ApiError(CoordinationError::ValidationFailed(violations)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: CoordinationError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn test_client_errors_are_bad_request() {
        assert_eq!(
            status_of(CoordinationError::EmailExists),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CoordinationError::UsernameExists),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CoordinationError::UniquenessConflict),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CoordinationError::ProfileExists),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CoordinationError::InvalidCountry),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CoordinationError::ValidationFailed(vec![])),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_not_found_family() {
        assert_eq!(
            status_of(CoordinationError::UserNotFound),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CoordinationError::ProfileNotFound),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CoordinationError::CountryNotFound),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CoordinationError::EmptyResult("No users found".to_string())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_credentials_are_unauthorized() {
        assert_eq!(
            status_of(CoordinationError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_infrastructure_failures() {
        assert_eq!(
            status_of(CoordinationError::Unavailable),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(CoordinationError::TransactionFailed),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(CoordinationError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
