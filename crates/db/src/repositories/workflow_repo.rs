//! Repository for the `candidate_workflows` table.

use pathway_core::types::DbId;
use pathway_core::workflow::WorkflowStatus;
use sqlx::PgPool;

use crate::models::workflow::{CandidateWorkflow, StageCompletion, WorkflowStats, WorkflowView};

const COLUMNS: &str = "id, candidate_id, status, screening_completed_at, screening_completed_by, \
                        screening_notes, orientation_completed_at, orientation_completed_by, \
                        orientation_notes, enrolled_at, enrolled_by, training_batch_id, \
                        enrollment_notes, created_at, updated_at";

const VIEW_SELECT: &str = "SELECT w.id, w.candidate_id, \
            c.first_name || ' ' || c.last_name AS candidate_name, \
            c.email, c.phone_number, c.date_of_birth, c.city, c.state, c.gender, \
            c.engagement_score, c.dropout_risk_score, w.status, \
            w.screening_completed_at, w.screening_completed_by, \
            NULLIF(TRIM(CONCAT_WS(' ', sa.first_name, sa.last_name)), '') AS screening_completed_by_name, \
            w.screening_notes, \
            w.orientation_completed_at, w.orientation_completed_by, \
            NULLIF(TRIM(CONCAT_WS(' ', oa.first_name, oa.last_name)), '') AS orientation_completed_by_name, \
            w.orientation_notes, \
            w.enrolled_at, w.enrolled_by, \
            NULLIF(TRIM(CONCAT_WS(' ', ea.first_name, ea.last_name)), '') AS enrolled_by_name, \
            w.enrollment_notes, w.training_batch_id, b.batch_code, t.name AS training_name, \
            w.created_at, w.updated_at \
     FROM candidate_workflows w \
     JOIN candidates c ON c.id = w.candidate_id \
     LEFT JOIN admin_users sa ON sa.id = w.screening_completed_by \
     LEFT JOIN admin_users oa ON oa.id = w.orientation_completed_by \
     LEFT JOIN admin_users ea ON ea.id = w.enrolled_by \
     LEFT JOIN training_batches b ON b.id = w.training_batch_id \
     LEFT JOIN training_masters t ON t.id = b.training_id";

pub struct WorkflowRepo;

impl WorkflowRepo {
    /// Return the candidate's workflow, creating a PENDING_SCREENING one if
    /// none exists.
    pub async fn ensure_for_candidate(
        pool: &PgPool,
        candidate_id: DbId,
    ) -> Result<CandidateWorkflow, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let workflow = Self::ensure_for_candidate_in_tx(&mut tx, candidate_id).await?;
        tx.commit().await?;
        Ok(workflow)
    }

    /// [`WorkflowRepo::ensure_for_candidate`] within an existing transaction.
    ///
    /// The unique `candidate_id` makes concurrent calls converge on one row.
    pub async fn ensure_for_candidate_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        candidate_id: DbId,
    ) -> Result<CandidateWorkflow, sqlx::Error> {
        sqlx::query(
            "INSERT INTO candidate_workflows (candidate_id, status)
             VALUES ($1, $2)
             ON CONFLICT (candidate_id) DO NOTHING",
        )
        .bind(candidate_id)
        .bind(WorkflowStatus::PendingScreening.as_str())
        .execute(&mut **tx)
        .await?;
        let query = format!("SELECT {COLUMNS} FROM candidate_workflows WHERE candidate_id = $1");
        sqlx::query_as::<_, CandidateWorkflow>(&query)
            .bind(candidate_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Insert a PENDING_SCREENING workflow. `None` when the candidate
    /// already has one.
    pub async fn insert_if_absent(
        pool: &PgPool,
        candidate_id: DbId,
    ) -> Result<Option<CandidateWorkflow>, sqlx::Error> {
        let query = format!(
            "INSERT INTO candidate_workflows (candidate_id, status)
             VALUES ($1, $2)
             ON CONFLICT (candidate_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CandidateWorkflow>(&query)
            .bind(candidate_id)
            .bind(WorkflowStatus::PendingScreening.as_str())
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CandidateWorkflow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM candidate_workflows WHERE id = $1");
        sqlx::query_as::<_, CandidateWorkflow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_view(pool: &PgPool, id: DbId) -> Result<Option<WorkflowView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE w.id = $1");
        sqlx::query_as::<_, WorkflowView>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_view_by_candidate(
        pool: &PgPool,
        candidate_id: DbId,
    ) -> Result<Option<WorkflowView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE w.candidate_id = $1");
        sqlx::query_as::<_, WorkflowView>(&query)
            .bind(candidate_id)
            .fetch_optional(pool)
            .await
    }

    /// Workflows in `status`, most recently created first.
    pub async fn list_by_status(
        pool: &PgPool,
        status: WorkflowStatus,
    ) -> Result<Vec<WorkflowView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE w.status = $1 ORDER BY w.created_at DESC, w.id DESC");
        sqlx::query_as::<_, WorkflowView>(&query)
            .bind(status.as_str())
            .fetch_all(pool)
            .await
    }

    /// Workflows enrolled into a batch, in enrolment order.
    pub async fn list_by_batch(
        pool: &PgPool,
        batch_id: DbId,
    ) -> Result<Vec<WorkflowView>, sqlx::Error> {
        let query = format!(
            "{VIEW_SELECT} WHERE w.training_batch_id = $1 ORDER BY w.enrolled_at ASC, w.id ASC"
        );
        sqlx::query_as::<_, WorkflowView>(&query)
            .bind(batch_id)
            .fetch_all(pool)
            .await
    }

    pub async fn stats(pool: &PgPool) -> Result<WorkflowStats, sqlx::Error> {
        sqlx::query_as::<_, WorkflowStats>(
            "SELECT COUNT(*) FILTER (WHERE status = 'PENDING_SCREENING') AS pending_screening,
                    COUNT(*) FILTER (WHERE status = 'PENDING_ORIENTATION') AS pending_orientation,
                    COUNT(*) FILTER (WHERE status = 'PENDING_ENROLL') AS pending_enroll,
                    COUNT(*) FILTER (WHERE status = 'ENROLLED') AS enrolled,
                    COUNT(*) FILTER (WHERE status = 'ON_HOLD') AS on_hold,
                    COUNT(*) FILTER (WHERE status = 'DROPPED') AS dropped
             FROM candidate_workflows",
        )
        .fetch_one(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Transition writes (run inside the caller's transaction)
    // -----------------------------------------------------------------------

    /// Load and row-lock a workflow. Concurrent transitions on the same row
    /// queue here until the holder commits.
    pub async fn lock(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<Option<CandidateWorkflow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM candidate_workflows WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, CandidateWorkflow>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    pub async fn record_screening(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        stage: &StageCompletion,
    ) -> Result<CandidateWorkflow, sqlx::Error> {
        let query = format!(
            "UPDATE candidate_workflows SET
                status = $2,
                screening_completed_at = $3,
                screening_completed_by = $4,
                screening_notes = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CandidateWorkflow>(&query)
            .bind(id)
            .bind(stage.status.as_str())
            .bind(stage.at)
            .bind(stage.actor_id)
            .bind(&stage.notes)
            .fetch_one(&mut **tx)
            .await
    }

    pub async fn record_orientation(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        stage: &StageCompletion,
    ) -> Result<CandidateWorkflow, sqlx::Error> {
        let query = format!(
            "UPDATE candidate_workflows SET
                status = $2,
                orientation_completed_at = $3,
                orientation_completed_by = $4,
                orientation_notes = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CandidateWorkflow>(&query)
            .bind(id)
            .bind(stage.status.as_str())
            .bind(stage.at)
            .bind(stage.actor_id)
            .bind(&stage.notes)
            .fetch_one(&mut **tx)
            .await
    }

    pub async fn record_enrollment(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        batch_id: DbId,
        stage: &StageCompletion,
    ) -> Result<CandidateWorkflow, sqlx::Error> {
        let query = format!(
            "UPDATE candidate_workflows SET
                status = $2,
                enrolled_at = $3,
                enrolled_by = $4,
                enrollment_notes = $5,
                training_batch_id = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CandidateWorkflow>(&query)
            .bind(id)
            .bind(stage.status.as_str())
            .bind(stage.at)
            .bind(stage.actor_id)
            .bind(&stage.notes)
            .bind(batch_id)
            .fetch_one(&mut **tx)
            .await
    }
}
