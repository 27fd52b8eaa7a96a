use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::utils::success_to_api_response;

#[derive(Serialize)]
pub struct PingResponse {
    pub status: String,
    /// Unix seconds on the server clock.
    pub timestamp: i64,
}

/// Liveness check. Touches neither Postgres nor Redis.
pub async fn ping() -> impl IntoResponse {
    (
        StatusCode::OK,
        success_to_api_response(PingResponse {
            status: "ok".to_string(),
            timestamp: chrono::Utc::now().timestamp(),
        }),
    )
}
