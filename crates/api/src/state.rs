use std::sync::Arc;

use pathway_core::otp::OtpGenerator;
use pathway_core::scoring::ScoringStrategy;

use crate::config::ServerConfig;
use crate::engine::aging::ScanGuard;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: pathway_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Assigns engagement and dropout-risk scores to new candidates.
    pub scoring: Arc<dyn ScoringStrategy>,
    /// Produces signup OTP codes.
    pub otp: Arc<dyn OtpGenerator>,
    /// Single-flight guard shared by the aging job and the manual trigger.
    pub aging_guard: ScanGuard,
}
