use axum::Json;
use chrono::Utc;
use http::StatusCode;
use serde_json::{Value, json};

/// GET /health/server
pub(crate) async fn health_server() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "Server is healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// GET /health/db
pub(crate) async fn health_db() -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match userhub::ping().await {
        Ok(()) => Ok(Json(json!({
            "status": "OK",
            "message": "Database is healthy",
            "timestamp": Utc::now().to_rfc3339(),
        }))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": "ERROR",
                "message": "Database health check failed",
                "error": e.to_string(),
                "timestamp": Utc::now().to_rfc3339(),
            })),
        )),
    }
}
