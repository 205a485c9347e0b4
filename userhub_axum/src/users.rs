use axum::Json;
use axum::extract::Path;
use http::StatusCode;
use serde_json::{Value, json};
use userhub::{CREATE_USER_SCHEMA, UPDATE_PASSWORD_SCHEMA, UPDATE_USER_SCHEMA, USER_ID_SCHEMA};

use crate::auth::AuthUser;
use crate::error::{ApiError, validate};
use crate::response::ApiResponse;

/// Check and parse the path `user_id`. Identifiers too large for i64
/// cannot exist, they read as an unknown user.
pub(crate) fn parse_user_id(raw: &str) -> Result<i64, ApiError> {
    validate(&USER_ID_SCHEMA, &json!({ "userId": raw }))?;
    raw.parse()
        .map_err(|_| ApiError(userhub::CoordinationError::UserNotFound))
}

/// GET /users
pub(crate) async fn get_users() -> Result<Json<ApiResponse>, ApiError> {
    let users = userhub::get_users().await?;

    Ok(Json(
        ApiResponse::success("Users retrieved successfully").with_data(&users),
    ))
}

/// GET /users/{user_id}
pub(crate) async fn get_user_by_id(
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse>, ApiError> {
    let id = parse_user_id(&user_id)?;
    let user = userhub::get_user_by_id(id).await?;

    Ok(Json(
        ApiResponse::success("User retrieved successfully").with_data(&user),
    ))
}

/// POST /users
pub(crate) async fn create_user(
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<ApiResponse>), ApiError> {
    validate(&CREATE_USER_SCHEMA, &body)?;

    let username = body["username"].as_str().unwrap_or_default();
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let user = userhub::create_user(username, email, password).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("User created successfully").with_data(&user)),
    ))
}

/// PUT /users/{user_id}
pub(crate) async fn update_user(
    _auth: AuthUser,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<ApiResponse>, ApiError> {
    let id = parse_user_id(&user_id)?;
    validate(&UPDATE_USER_SCHEMA, &body)?;

    let username = body["username"].as_str().unwrap_or_default();
    let email = body["email"].as_str().unwrap_or_default();

    let user = userhub::update_user(id, username, email).await?;

    Ok(Json(
        ApiResponse::success("User updated successfully").with_data(&user),
    ))
}

/// PATCH /users/{user_id}
pub(crate) async fn patch_user_password(
    _auth: AuthUser,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<ApiResponse>, ApiError> {
    let id = parse_user_id(&user_id)?;
    validate(&UPDATE_PASSWORD_SCHEMA, &body)?;

    let password = body["password"].as_str().unwrap_or_default();

    let role = userhub::update_password(id, password).await?;

    Ok(Json(
        ApiResponse::success("User password updated successfully")
            .with_data(&json!({ "userId": id, "role": role })),
    ))
}

/// DELETE /users/{user_id}
pub(crate) async fn delete_user(
    _auth: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse>, ApiError> {
    let id = parse_user_id(&user_id)?;
    userhub::delete_user(id).await?;

    Ok(Json(ApiResponse::success("User deleted successfully")))
}
