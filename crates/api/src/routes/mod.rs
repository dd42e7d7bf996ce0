pub mod admin;
pub mod auth;
pub mod candidates;
pub mod dashboard;
pub mod health;
pub mod locations;
pub mod menu;
pub mod notifications;
pub mod onboarding;
pub mod roles;
pub mod screening;
pub mod signup;
pub mod training;
pub mod training_calendar;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login, /auth/refresh                 public
/// /auth/logout, /auth/validate               authenticated
///
/// /admin/users[...]                          ADMIN_VIEW / ADMIN_MANAGE
/// /roles[...]                                ROLE_VIEW / ROLE_MANAGE / PERMISSION_VIEW
/// /menu[...]                                 authenticated, /menu/all super admin
/// /locations/states[...], /locations/cities  LOCATION_VIEW / LOCATION_MANAGE
///
/// /candidates[...]                           ONBOARDING_VIEW
/// /candidates/onboard                        public intake
/// /signup/*                                  public, OTP-gated
/// /onboarding/*                              public questionnaire
///
/// /screening[...]                            SCREENING_VIEW / SCREENING_MANAGE
/// /training/masters[...], /training/batches  TRAINING_VIEW / TRAINING_MANAGE
/// /training-calendar[...]                    TRAINING_VIEW
///
/// /dashboard/stats[...]                      DASHBOARD_VIEW
/// /notifications[...]                        NOTIFICATION_VIEW
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication (login, refresh, logout, validate).
        .nest("/auth", auth::router())
        // Admin users, roles and the navigation menu.
        .nest("/admin", admin::router())
        .nest("/roles", roles::router())
        .nest("/menu", menu::router())
        // Location registry.
        .nest("/locations", locations::router())
        // Candidate profiles and the public intake paths.
        .nest("/candidates", candidates::router())
        .nest("/signup", signup::router())
        .nest("/onboarding", onboarding::router())
        // Workflow state machine.
        .nest("/screening", screening::router())
        // Training catalog, batches and calendar.
        .nest("/training", training::router())
        .nest("/training-calendar", training_calendar::router())
        // Rollups and aging alerts.
        .nest("/dashboard", dashboard::router())
        .nest("/notifications", notifications::router())
}
