//! Route definitions for the `/signup` resource. All routes are public.

use axum::routing::post;
use axum::Router;

use crate::handlers::signup;
use crate::state::AppState;

/// Routes mounted at `/signup`.
///
/// ```text
/// POST /send-otp           -> send_otp
/// POST /verify-otp         -> verify_otp
/// POST /profile-details    -> profile_details
/// POST /personal-details   -> personal_details
/// POST /education-details  -> education_details
/// POST /skills             -> skills
/// POST /complete           -> complete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/send-otp", post(signup::send_otp))
        .route("/verify-otp", post(signup::verify_otp))
        .route("/profile-details", post(signup::profile_details))
        .route("/personal-details", post(signup::personal_details))
        .route("/education-details", post(signup::education_details))
        .route("/skills", post(signup::skills))
        .route("/complete", post(signup::complete))
}
