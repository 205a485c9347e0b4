//! Combined router for the account, profile and health endpoints

use axum::Router;
use axum::routing::{get, post};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::{auth, health, profiles, users};

fn users_router() -> Router {
    // Literal segments before the {user_id} captures
    Router::new()
        .route("/", get(users::get_users).post(users::create_user))
        .route("/profile", get(profiles::get_users_profile))
        .route("/search", get(profiles::search_user_profiles))
        .route("/sort", get(profiles::sort_user_profiles))
        .route("/count-by-country", get(profiles::count_users_by_country))
        .route("/paginated", get(profiles::get_paginated_users_profile))
        .route(
            "/{user_id}",
            get(users::get_user_by_id)
                .put(users::update_user)
                .patch(users::patch_user_password)
                .delete(users::delete_user),
        )
        .route(
            "/{user_id}/profile",
            get(profiles::get_user_profile_by_id)
                .post(profiles::create_user_profile)
                .put(profiles::update_user_profile),
        )
}

fn auth_router() -> Router {
    Router::new().route("/login", post(auth::login))
}

fn health_router() -> Router {
    Router::new()
        .route("/server", get(health::health_server))
        .route("/db", get(health::health_db))
}

/// Create the combined API router.
///
/// Mount it under [`userhub::API_ROUTE_PREFIX`] so the endpoints are
/// available at:
/// - {API_ROUTE_PREFIX}/auth/login
/// - {API_ROUTE_PREFIX}/users/...
/// - {API_ROUTE_PREFIX}/health/...
pub fn userhub_router() -> Router {
    Router::new()
        .nest("/auth", auth_router())
        .nest("/users", users_router())
        .nest("/health", health_router())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
}

/// Same as [`userhub_router`] but without the HTTP tracing middleware
pub fn userhub_router_no_trace() -> Router {
    Router::new()
        .nest("/auth", auth_router())
        .nest("/users", users_router())
        .nest("/health", health_router())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routers_build() {
        let _ = userhub_router();
        let _ = userhub_router_no_trace();
    }
}
