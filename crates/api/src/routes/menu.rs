//! Route definitions for the `/menu` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::menu;
use crate::state::AppState;

/// Routes mounted at `/menu`.
///
/// ```text
/// GET /          -> my_menu (caller's visible tree)
/// GET /grouped   -> grouped_menu
/// GET /groups    -> list_groups
/// GET /all       -> all_items (super admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(menu::my_menu))
        .route("/grouped", get(menu::grouped_menu))
        .route("/groups", get(menu::list_groups))
        .route("/all", get(menu::all_items))
}
