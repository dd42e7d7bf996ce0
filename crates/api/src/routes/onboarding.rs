//! Route definitions for the `/onboarding` questionnaire. Public.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::onboarding;
use crate::state::AppState;

/// Routes mounted at `/onboarding`.
///
/// ```text
/// GET  /questions                      -> list_questions
/// GET  /questions/categories           -> list_categories
/// GET  /questions/category/{category}  -> list_by_category
/// POST /answers                        -> submit_answers
/// GET  /answers/{candidate_id}         -> list_answers
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/questions", get(onboarding::list_questions))
        .route("/questions/categories", get(onboarding::list_categories))
        .route(
            "/questions/category/{category}",
            get(onboarding::list_by_category),
        )
        .route("/answers", post(onboarding::submit_answers))
        .route("/answers/{candidate_id}", get(onboarding::list_answers))
}
