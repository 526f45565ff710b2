// ============================================================================
// Health Route
// ============================================================================

use axum::{http::StatusCode, response::IntoResponse};

/// GET /health
///
/// Liveness only; the gateway has no external collaborators to probe.
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
