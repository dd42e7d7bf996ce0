//! Route definitions for the `/roles` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::roles;
use crate::state::AppState;

/// Routes mounted at `/roles`.
///
/// ```text
/// GET    /                        -> list_roles
/// POST   /                        -> create_role
/// GET    /active                  -> list_active_roles
/// GET    /permissions             -> list_permissions
/// GET    /permissions/active      -> list_active_permissions
/// GET    /permissions/grouped     -> grouped_permissions
/// GET    /{id}                    -> get_role
/// PUT    /{id}                    -> update_role
/// DELETE /{id}                    -> delete_role
/// PUT    /{id}/permissions        -> set_permissions
/// PUT    /{id}/toggle-active      -> toggle_active
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(roles::list_roles).post(roles::create_role))
        .route("/active", get(roles::list_active_roles))
        .route("/permissions", get(roles::list_permissions))
        .route("/permissions/active", get(roles::list_active_permissions))
        .route("/permissions/grouped", get(roles::grouped_permissions))
        .route(
            "/{id}",
            get(roles::get_role)
                .put(roles::update_role)
                .delete(roles::delete_role),
        )
        .route("/{id}/permissions", put(roles::set_permissions))
        .route("/{id}/toggle-active", put(roles::toggle_active))
}
