//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated admin from a JWT Bearer token.
//! - [`rbac::RequireSuperAdmin`] -- Requires the `SUPER_ADMIN` role.
//! - [`actor::ActorHeader`] -- Optional acting-admin override for workflow transitions.

pub mod actor;
pub mod auth;
pub mod rbac;
