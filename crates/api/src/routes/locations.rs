//! Route definitions for the `/locations` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::locations;
use crate::state::AppState;

/// Routes mounted at `/locations`.
///
/// ```text
/// GET    /states                  -> list_states
/// POST   /states                  -> create_state
/// GET    /states/active           -> list_active_states
/// GET    /states/search?q=        -> search_states
/// GET    /states/code/{code}      -> get_state_by_code
/// GET    /states/{id}             -> get_state
/// PUT    /states/{id}             -> update_state
/// DELETE /states/{id}             -> delete_state
/// GET    /states/{id}/cities      -> list_state_cities
///
/// GET    /cities                  -> list_cities
/// POST   /cities                  -> create_city
/// GET    /cities/active           -> list_active_cities
/// GET    /cities/search?q=        -> search_cities
/// GET    /cities/{id}             -> get_city
/// PUT    /cities/{id}             -> update_city
/// DELETE /cities/{id}             -> delete_city
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/states",
            get(locations::list_states).post(locations::create_state),
        )
        .route("/states/active", get(locations::list_active_states))
        .route("/states/search", get(locations::search_states))
        .route("/states/code/{code}", get(locations::get_state_by_code))
        .route(
            "/states/{id}",
            get(locations::get_state)
                .put(locations::update_state)
                .delete(locations::delete_state),
        )
        .route("/states/{id}/cities", get(locations::list_state_cities))
        .route(
            "/cities",
            get(locations::list_cities).post(locations::create_city),
        )
        .route("/cities/active", get(locations::list_active_cities))
        .route("/cities/search", get(locations::search_cities))
        .route(
            "/cities/{id}",
            get(locations::get_city)
                .put(locations::update_city)
                .delete(locations::delete_city),
        )
}
