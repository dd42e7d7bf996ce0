//! Request handlers, one submodule per resource.
//!
//! Handlers check permissions through [`AuthUser`](crate::middleware::auth::AuthUser),
//! delegate to the repositories in `pathway_db` or the engines in
//! [`crate::engine`], and map failures via [`AppError`](crate::error::AppError).

pub mod admin;
pub mod auth;
pub mod candidates;
pub mod dashboard;
pub mod locations;
pub mod menu;
pub mod notifications;
pub mod onboarding;
pub mod roles;
pub mod screening;
pub mod signup;
pub mod training;
pub mod training_calendar;
