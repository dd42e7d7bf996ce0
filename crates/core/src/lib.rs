//! Domain logic for the candidate onboarding and training backend.
//!
//! Everything in this crate is pure: no database, no HTTP. The `db` and
//! `api` crates call into these modules to validate input and decide state
//! changes before persisting them.

pub mod aging;
pub mod calendar;
pub mod capacity;
pub mod dashboard;
pub mod error;
pub mod location;
pub mod menu;
pub mod otp;
pub mod roles;
pub mod scoring;
pub mod signup;
pub mod types;
pub mod workflow;
