//! Route definitions for the `/screening` resource (candidate workflows).

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::screening;
use crate::state::AppState;

/// Routes mounted at `/screening`.
///
/// ```text
/// GET  /pending                   -> pending_screening
/// GET  /pending-orientation       -> pending_orientation
/// GET  /pending-enroll            -> pending_enroll
/// GET  /enrolled                  -> enrolled
/// GET  /stats                     -> stats
/// POST /workflows                 -> create_workflow
/// PUT  /complete-screening        -> complete_screening
/// PUT  /complete-orientation      -> complete_orientation
/// PUT  /enroll                    -> enroll
/// GET  /candidate/{candidate_id}  -> get_by_candidate
/// GET  /{id}                      -> get_workflow
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pending", get(screening::pending_screening))
        .route("/pending-orientation", get(screening::pending_orientation))
        .route("/pending-enroll", get(screening::pending_enroll))
        .route("/enrolled", get(screening::enrolled))
        .route("/stats", get(screening::stats))
        .route("/workflows", post(screening::create_workflow))
        .route("/complete-screening", put(screening::complete_screening))
        .route("/complete-orientation", put(screening::complete_orientation))
        .route("/enroll", put(screening::enroll))
        .route("/candidate/{candidate_id}", get(screening::get_by_candidate))
        .route("/{id}", get(screening::get_workflow))
}
