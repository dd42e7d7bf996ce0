//! Route definitions for the `/training-calendar` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::training_calendar;
use crate::state::AppState;

/// Routes mounted at `/training-calendar`.
///
/// ```text
/// GET /                       -> calendar
/// GET /month/{year}/{month}   -> month
/// GET /summary                -> summary
/// GET /batch/{id}             -> batch_detail
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(training_calendar::calendar))
        .route("/month/{year}/{month}", get(training_calendar::month))
        .route("/summary", get(training_calendar::summary))
        .route("/batch/{id}", get(training_calendar::batch_detail))
}
