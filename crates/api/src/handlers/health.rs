//! Liveness probe.

use axum::response::IntoResponse;
use axum::Json;

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
