//! Pathway API server library.
//!
//! Exposes config, state, error handling, routes and the background engines
//! so integration tests and the binary entrypoint share them.

pub mod auth;
pub mod background;
pub mod bootstrap;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
