//! Candidate workflow rows and the joined view used by the screening screens.

use pathway_core::types::{Date, DbId, Timestamp};
use pathway_core::workflow::WorkflowStatus;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `candidate_workflows` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CandidateWorkflow {
    pub id: DbId,
    pub candidate_id: DbId,
    #[sqlx(try_from = "String")]
    pub status: WorkflowStatus,
    pub screening_completed_at: Option<Timestamp>,
    pub screening_completed_by: Option<DbId>,
    pub screening_notes: Option<String>,
    pub orientation_completed_at: Option<Timestamp>,
    pub orientation_completed_by: Option<DbId>,
    pub orientation_notes: Option<String>,
    pub enrolled_at: Option<Timestamp>,
    pub enrolled_by: Option<DbId>,
    pub training_batch_id: Option<DbId>,
    pub enrollment_notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Workflow joined with candidate, actor and batch details.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkflowView {
    pub id: DbId,
    pub candidate_id: DbId,
    pub candidate_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<Date>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub gender: Option<String>,
    pub engagement_score: f64,
    pub dropout_risk_score: f64,
    #[sqlx(try_from = "String")]
    pub status: WorkflowStatus,
    pub screening_completed_at: Option<Timestamp>,
    pub screening_completed_by: Option<DbId>,
    pub screening_completed_by_name: Option<String>,
    pub screening_notes: Option<String>,
    pub orientation_completed_at: Option<Timestamp>,
    pub orientation_completed_by: Option<DbId>,
    pub orientation_completed_by_name: Option<String>,
    pub orientation_notes: Option<String>,
    pub enrolled_at: Option<Timestamp>,
    pub enrolled_by: Option<DbId>,
    pub enrolled_by_name: Option<String>,
    pub enrollment_notes: Option<String>,
    pub training_batch_id: Option<DbId>,
    pub batch_code: Option<String>,
    pub training_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields written when a stage completes.
#[derive(Debug, Clone)]
pub struct StageCompletion {
    pub status: WorkflowStatus,
    pub actor_id: DbId,
    pub notes: Option<String>,
    pub at: Timestamp,
}

/// Workflow counts per status.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct WorkflowStats {
    pub pending_screening: i64,
    pub pending_orientation: i64,
    pub pending_enroll: i64,
    pub enrolled: i64,
    pub on_hold: i64,
    pub dropped: i64,
}
