/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "ok",
///   "timestamp": "2026-08-07T12:00:00Z"
/// }
/// ```
///
/// `status` degrades to `"degraded"` when the database probe fails; the
/// endpoint itself still answers 200 so load balancers can see the
/// process is alive.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status: "ok" or "degraded"
    pub status: String,

    /// Server time at the probe
    pub timestamp: DateTime<Utc>,
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let database_ok = sqlx::query("SELECT 1").fetch_one(&state.db).await.is_ok();

    Ok(Json(HealthResponse {
        status: if database_ok { "ok" } else { "degraded" }.to_string(),
        timestamp: Utc::now(),
    }))
}
