//! Liveness and readiness probe.

use std::time::Instant;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database did not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub db_latency_ms: Option<u128>,
    pub aging_scan_running: bool,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let started = Instant::now();
    let db_latency_ms = match pathway_db::health_check(&state.pool).await {
        Ok(()) => Some(started.elapsed().as_millis()),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            None
        }
    };

    Json(HealthResponse {
        status: if db_latency_ms.is_some() { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy: db_latency_ms.is_some(),
        db_latency_ms,
        aging_scan_running: state.aging_guard.is_running(),
    })
}

/// Mounted at the root, outside `/api/v1`, and unauthenticated.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
