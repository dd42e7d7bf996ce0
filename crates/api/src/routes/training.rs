//! Route definitions for the `/training` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::training;
use crate::state::AppState;

/// Routes mounted at `/training`.
///
/// Reads require `TRAINING_VIEW`, writes `TRAINING_MANAGE`.
///
/// ```text
/// GET    /masters                    -> list_masters
/// POST   /masters                    -> create_master
/// GET    /masters/active             -> list_active_masters
/// GET    /masters/{id}               -> get_master
/// PUT    /masters/{id}               -> update_master
/// DELETE /masters/{id}               -> delete_master
/// PUT    /masters/{id}/toggle-active -> toggle_master
/// GET    /masters/{id}/batches       -> list_master_batches
/// GET    /skill-categories           -> skill_categories
///
/// GET    /batches                    -> list_batches
/// POST   /batches                    -> create_batch
/// GET    /batches/available          -> list_available_batches
/// GET    /batches/upcoming           -> list_upcoming_batches
/// GET    /batches/{id}               -> get_batch
/// PUT    /batches/{id}               -> update_batch
/// DELETE /batches/{id}               -> delete_batch
/// PUT    /batches/{id}/toggle-active -> toggle_batch
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/masters",
            get(training::list_masters).post(training::create_master),
        )
        .route("/masters/active", get(training::list_active_masters))
        .route(
            "/masters/{id}",
            get(training::get_master)
                .put(training::update_master)
                .delete(training::delete_master),
        )
        .route("/masters/{id}/toggle-active", put(training::toggle_master))
        .route("/masters/{id}/batches", get(training::list_master_batches))
        .route("/skill-categories", get(training::skill_categories))
        .route(
            "/batches",
            get(training::list_batches).post(training::create_batch),
        )
        .route("/batches/available", get(training::list_available_batches))
        .route("/batches/upcoming", get(training::list_upcoming_batches))
        .route(
            "/batches/{id}",
            get(training::get_batch)
                .put(training::update_batch)
                .delete(training::delete_batch),
        )
        .route("/batches/{id}/toggle-active", put(training::toggle_batch))
}
