//! Onboarding aging notification model.

use pathway_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `onboarding_aging_notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AgingNotification {
    pub id: DbId,
    pub candidate_id: DbId,
    pub candidate_name: String,
    pub phone_number: Option<String>,
    pub onboarding_status: Option<String>,
    pub days_since_created: i32,
    pub aging_level: String,
    pub aging_color: String,
    pub message: String,
    pub is_read: bool,
    pub is_dismissed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload produced by the aging scan.
#[derive(Debug, Clone)]
pub struct CreateAgingNotification {
    pub candidate_id: DbId,
    pub candidate_name: String,
    pub phone_number: Option<String>,
    pub onboarding_status: Option<String>,
    pub days_since_created: i32,
    pub aging_level: String,
    pub aging_color: String,
    pub message: String,
}

/// Minimal candidate projection read by the aging scan.
#[derive(Debug, Clone, FromRow)]
pub struct AgingCandidate {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub onboarding_status: String,
    pub created_at: Timestamp,
}

/// `(label, count)` pair from a GROUP BY.
#[derive(Debug, Clone, FromRow)]
pub struct LabelCount {
    pub label: String,
    pub count: i64,
}
