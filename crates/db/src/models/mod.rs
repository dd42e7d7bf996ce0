//! Entity models and DTOs, one module per aggregate.

pub mod admin;
pub mod candidate;
pub mod dashboard;
pub mod location;
pub mod menu;
pub mod notification;
pub mod otp;
pub mod question;
pub mod role;
pub mod session;
pub mod training;
pub mod workflow;
