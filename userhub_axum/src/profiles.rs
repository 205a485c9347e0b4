use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, Query};
use http::StatusCode;
use serde_json::{Map, Value, json};
use userhub::{
    CREATE_PROFILE_SCHEMA, PAGINATION_SCHEMA, ProfileFields, SEARCH_USER_PROFILES_SCHEMA,
    SORT_USER_PROFILES_SCHEMA, SortBy, SortOrder, UPDATE_PROFILE_SCHEMA,
};

use crate::auth::AuthUser;
use crate::error::{ApiError, validate};
use crate::response::{ApiResponse, Pagination};
use crate::users::parse_user_id;

fn profile_fields(body: &Value) -> ProfileFields {
    ProfileFields {
        first_name: body["firstName"].as_str().map(str::to_string),
        last_name: body["lastName"].as_str().map(str::to_string),
        bio: body["bio"].as_str().map(str::to_string),
        profile_picture: body["profilePicture"].as_str().map(str::to_string),
        age: body["age"].as_i64(),
    }
}

/// GET /users/profile
pub(crate) async fn get_users_profile() -> Result<Json<ApiResponse>, ApiError> {
    let records = userhub::get_users_profile().await?;

    Ok(Json(
        ApiResponse::success("Users profile retrieved successfully").with_data(&records),
    ))
}

/// GET /users/{user_id}/profile
pub(crate) async fn get_user_profile_by_id(
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse>, ApiError> {
    let id = parse_user_id(&user_id)?;
    let record = userhub::get_user_profile_by_id(id).await?;

    Ok(Json(
        ApiResponse::success("User profile retrieved successfully").with_data(&record),
    ))
}

/// POST /users/{user_id}/profile
pub(crate) async fn create_user_profile(
    _auth: AuthUser,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<ApiResponse>), ApiError> {
    let id = parse_user_id(&user_id)?;
    validate(&CREATE_PROFILE_SCHEMA, &body)?;

    let country = body["country"].as_str().unwrap_or_default();
    userhub::validate_country(country).await?;

    let profile = userhub::create_profile(id, &profile_fields(&body), country).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("User profile created successfully").with_data(&profile)),
    ))
}

/// PUT /users/{user_id}/profile
pub(crate) async fn update_user_profile(
    _auth: AuthUser,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<ApiResponse>, ApiError> {
    let id = parse_user_id(&user_id)?;
    validate(&UPDATE_PROFILE_SCHEMA, &body)?;

    // The country stays optional on update; the stored one is kept
    // when the field is absent
    let country = body["country"].as_str();
    if let Some(country) = country {
        userhub::validate_country(country).await?;
    }

    let profile = userhub::update_profile(id, &profile_fields(&body), country).await?;

    Ok(Json(
        ApiResponse::success("User profile updated successfully").with_data(&profile),
    ))
}

/// GET /users/search?query=
pub(crate) async fn search_user_profiles(
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ApiResponse>, ApiError> {
    let mut payload = Map::new();
    if let Some(query) = params.get("query") {
        payload.insert("query".to_string(), Value::String(query.clone()));
    }
    validate(&SEARCH_USER_PROFILES_SCHEMA, &Value::Object(payload))?;

    let term = params.get("query").map(String::as_str).unwrap_or_default();
    let records = userhub::search_user_profiles(term).await?;

    Ok(Json(
        ApiResponse::success("User profiles retrieved successfully").with_data(&records),
    ))
}

/// GET /users/sort?sortBy=&sortOrder=
pub(crate) async fn sort_user_profiles(
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ApiResponse>, ApiError> {
    let mut payload = Map::new();
    for key in ["sortBy", "sortOrder"] {
        if let Some(value) = params.get(key) {
            payload.insert(key.to_string(), Value::String(value.clone()));
        }
    }
    validate(&SORT_USER_PROFILES_SCHEMA, &Value::Object(payload))?;

    // The schema restricts both values to the enum keywords
    let sort_by: SortBy = params
        .get("sortBy")
        .and_then(|v| v.parse().ok())
        .unwrap_or(SortBy::Username);
    let sort_order: SortOrder = params
        .get("sortOrder")
        .and_then(|v| v.parse().ok())
        .unwrap_or(SortOrder::Asc);

    let records = userhub::sort_user_profiles(sort_by, sort_order).await?;

    Ok(Json(
        ApiResponse::success("User profiles retrieved successfully").with_data(&records),
    ))
}

/// GET /users/paginated?page=&limit=
///
/// Missing or non-numeric values fall back to the defaults; explicit
/// out-of-range values are rejected by the schema.
pub(crate) async fn get_paginated_users_profile(
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ApiResponse>, ApiError> {
    let page: i64 = params
        .get("page")
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);
    let limit: i64 = params
        .get("limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);
    validate(&PAGINATION_SCHEMA, &json!({ "page": page, "limit": limit }))?;

    let result = userhub::get_paginated_users_profile(page, limit).await?;

    Ok(Json(
        ApiResponse::success("Users with profiles and roles retrieved successfully")
            .with_data(&result.records)
            .with_pagination(Pagination {
                current_page: result.current_page,
                total_pages: result.total_pages,
                total_users: result.total_users,
            }),
    ))
}

/// GET /users/count-by-country
pub(crate) async fn count_users_by_country() -> Result<Json<ApiResponse>, ApiError> {
    let counts = userhub::count_users_by_country().await?;

    Ok(Json(
        ApiResponse::success("User counts by country retrieved successfully").with_data(&counts),
    ))
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;
    use serial_test::serial;

    use super::*;
    use crate::test_utils::{init_test_environment, test_auth_user, unique};

    async fn create_test_user(prefix: &str) -> i64 {
        let username = unique(prefix);
        let email = format!("{username}@example.com");
        userhub::create_user(&username, &email, "Passw0rd!x")
            .await
            .expect("Failed to create user")
            .id
    }

    #[tokio::test]
    #[serial]
    async fn test_create_profile_round_trip() {
        init_test_environment().await;

        let id = create_test_user("axprof").await;
        let body = json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "age": 36,
            "country": "France"
        });

        let (status, Json(response)) =
            create_user_profile(test_auth_user(), Path(id.to_string()), Json(body))
                .await
                .expect("Create profile failed");
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(response.message, "User profile created successfully");

        let Json(fetched) = get_user_profile_by_id(Path(id.to_string()))
            .await
            .expect("Fetch failed");
        let data = fetched.data.expect("Data should be present");
        assert_eq!(data["first_name"], "Ada");
        assert_eq!(data["country"], "France");
    }

    #[tokio::test]
    #[serial]
    async fn test_unknown_country_is_rejected_before_store() {
        init_test_environment().await;

        let id = create_test_user("axgeo").await;
        let body = json!({ "country": "Atlantis" });

        let err = create_user_profile(test_auth_user(), Path(id.to_string()), Json(body))
            .await
            .expect_err("Must fail");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn test_update_profile_without_country_succeeds() {
        init_test_environment().await;

        let id = create_test_user("axkeep").await;
        let body = json!({ "firstName": "Ada", "country": "France" });
        create_user_profile(test_auth_user(), Path(id.to_string()), Json(body))
            .await
            .expect("Create profile failed");

        let body = json!({ "firstName": "Grace" });
        let Json(response) =
            update_user_profile(test_auth_user(), Path(id.to_string()), Json(body))
                .await
                .expect("Update without country failed");
        assert_eq!(response.message, "User profile updated successfully");

        let Json(fetched) = get_user_profile_by_id(Path(id.to_string()))
            .await
            .expect("Fetch failed");
        let data = fetched.data.expect("Data should be present");
        assert_eq!(data["first_name"], "Grace");
        assert_eq!(data["country"], "France");
    }

    #[tokio::test]
    #[serial]
    async fn test_search_requires_min_length_query() {
        init_test_environment().await;

        let err = search_user_profiles(Query(HashMap::from([(
            "query".to_string(),
            "ab".to_string(),
        )])))
        .await
        .expect_err("Must fail");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err = search_user_profiles(Query(HashMap::new()))
            .await
            .expect_err("Must fail");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn test_sort_rejects_unknown_column() {
        init_test_environment().await;

        let err = sort_user_profiles(Query(HashMap::from([(
            "sortBy".to_string(),
            "password".to_string(),
        )])))
        .await
        .expect_err("Must fail");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn test_sorted_listing_succeeds() {
        init_test_environment().await;

        create_test_user("axsort").await;

        let Json(response) = sort_user_profiles(Query(HashMap::from([
            ("sortBy".to_string(), "username".to_string()),
            ("sortOrder".to_string(), "DESC".to_string()),
        ])))
        .await
        .expect("Sort failed");
        assert_eq!(response.message, "User profiles retrieved successfully");
    }

    #[tokio::test]
    #[serial]
    async fn test_pagination_defaults_and_bounds() {
        init_test_environment().await;

        create_test_user("axpage").await;

        let Json(response) = get_paginated_users_profile(Query(HashMap::new()))
            .await
            .expect("Pagination failed");
        let pagination = response.pagination.expect("Pagination should be present");
        assert_eq!(pagination.current_page, 1);
        assert!(pagination.total_users >= 1);

        let err = get_paginated_users_profile(Query(HashMap::from([(
            "limit".to_string(),
            "1000".to_string(),
        )])))
        .await
        .expect_err("Out-of-range limit must fail");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn test_count_by_country_envelope() {
        init_test_environment().await;

        let Json(response) = count_users_by_country().await.expect("Count failed");
        assert_eq!(
            response.message,
            "User counts by country retrieved successfully"
        );
        assert!(response.data.is_some());
    }
}
