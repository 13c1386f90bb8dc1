//! Liveness probe.

use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    service: String,
    timestamp: String,
    database: DatabaseHealth,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint.
///
/// Returns 200 OK when the store answers within 5 seconds, 503 otherwise.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let database = match tokio::time::timeout(
        std::time::Duration::from_secs(5),
        state.store.health_check(),
    )
    .await
    {
        Ok(true) => DatabaseHealth {
            status: "ok".to_string(),
            error: None,
        },
        Ok(false) => DatabaseHealth {
            status: "error".to_string(),
            error: Some("store health check failed".to_string()),
        },
        Err(_) => DatabaseHealth {
            status: "error".to_string(),
            error: Some("store health check timeout (>5s)".to_string()),
        },
    };

    let healthy = database.status == "ok";

    (
        if healthy {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        },
        Json(HealthResponse {
            status: if healthy { "ok" } else { "unhealthy" }.to_string(),
            service: "extractly-backend".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            database,
        }),
    )
}
