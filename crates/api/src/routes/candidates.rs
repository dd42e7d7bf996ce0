//! Route definitions for the `/candidates` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::candidates;
use crate::state::AppState;

/// Routes mounted at `/candidates`.
///
/// ```text
/// GET  /                          -> list_candidates
/// GET  /active                    -> list_active
/// GET  /at-risk?threshold=        -> list_at_risk
/// GET  /by-location?city=&state=  -> list_by_location
/// GET  /stats                     -> stats
/// POST /onboard                   -> onboard (public)
/// GET  /{id}                      -> get_candidate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(candidates::list_candidates))
        .route("/active", get(candidates::list_active))
        .route("/at-risk", get(candidates::list_at_risk))
        .route("/by-location", get(candidates::list_by_location))
        .route("/stats", get(candidates::stats))
        .route("/onboard", post(candidates::onboard))
        .route("/{id}", get(candidates::get_candidate))
}
