//! Dashboard aggregate rows.

use serde::Serialize;
use sqlx::FromRow;

/// Candidate and workflow totals. `dropped` counts ON_HOLD workflows.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct DashboardTotals {
    pub total_candidates: i64,
    pub completed_onboarding: i64,
    pub incomplete_onboarding: i64,
    pub pending_screening: i64,
    pub pending_orientation: i64,
    pub pending_enroll: i64,
    pub enrolled: i64,
    pub dropped: i64,
}

/// Onboarding counts for one month (1-based).
#[derive(Debug, Clone, Default, FromRow)]
pub struct MonthlyOnboardingRow {
    pub month: i32,
    pub completed: i64,
    pub incomplete: i64,
}

/// Workflow status counts for one month (1-based).
#[derive(Debug, Clone, Default, FromRow)]
pub struct MonthlyWorkflowRow {
    pub month: i32,
    pub pending_screening: i64,
    pub pending_orientation: i64,
    pub pending_enroll: i64,
    pub enrolled: i64,
    pub dropped: i64,
}
