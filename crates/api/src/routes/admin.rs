//! Route definitions for the `/admin` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// Reads require `ADMIN_VIEW`, writes `ADMIN_MANAGE` (enforced by handlers).
///
/// ```text
/// GET    /users                       -> list_users
/// POST   /users                       -> create_user
/// GET    /users/state/{state_id}      -> list_by_state
/// GET    /users/city/{city_id}        -> list_by_city
/// GET    /users/{id}                  -> get_user
/// PUT    /users/{id}                  -> update_user
/// DELETE /users/{id}                  -> delete_user
/// PUT    /users/{id}/toggle-active    -> toggle_active
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route("/users/state/{state_id}", get(admin::list_by_state))
        .route("/users/city/{city_id}", get(admin::list_by_city))
        .route(
            "/users/{id}",
            get(admin::get_user)
                .put(admin::update_user)
                .delete(admin::delete_user),
        )
        .route("/users/{id}/toggle-active", put(admin::toggle_active))
}
