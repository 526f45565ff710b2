// ============================================================================
// Admin Routes
// ============================================================================
//
// Endpoints (all behind the Admin role guard):
// - GET /api/admin/rate-limits - Rate governor occupancy
//
// ============================================================================

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::context::AppContext;
use crate::error::AppError;

/// GET /api/admin/rate-limits
///
/// Reports how many distinct client keys the governor is tracking, for
/// operators watching store growth between sweeps.
pub async fn rate_limits(
    State(ctx): State<Arc<AppContext>>,
) -> Result<impl IntoResponse, AppError> {
    let active = ctx.rate_store.active_keys().await;
    Ok(Json(json!({
        "activeClients": active,
        "sweepIntervalSecs": ctx.config.rate.sweep_interval_secs,
    })))
}
