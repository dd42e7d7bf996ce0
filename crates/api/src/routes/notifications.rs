//! Route definitions for the `/notifications` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::notifications;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET  /                    -> list_active
/// GET  /unread-count        -> unread_count
/// GET  /summary             -> summary
/// GET  /by-color/{color}    -> list_by_color
/// GET  /by-status/{status}  -> list_by_status
/// PUT  /mark-all-read       -> mark_all_read
/// POST /calculate           -> calculate
/// PUT  /{id}/mark-read      -> mark_read
/// PUT  /{id}/dismiss        -> dismiss
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::list_active))
        .route("/unread-count", get(notifications::unread_count))
        .route("/summary", get(notifications::summary))
        .route("/by-color/{color}", get(notifications::list_by_color))
        .route("/by-status/{status}", get(notifications::list_by_status))
        .route("/mark-all-read", put(notifications::mark_all_read))
        .route("/calculate", post(notifications::calculate))
        .route("/{id}/mark-read", put(notifications::mark_read))
        .route("/{id}/dismiss", put(notifications::dismiss))
}
