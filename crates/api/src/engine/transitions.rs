//! Workflow stage completions.
//!
//! Each operation runs in one transaction: lock the workflow row, check the
//! actor, decide the next status with the pure state machine, apply side
//! effects, write, commit. Any error drops the transaction, which rolls
//! everything back.

use chrono::Utc;
use pathway_core::error::CoreError;
use pathway_core::types::DbId;
use pathway_core::workflow::{enrollment_outcome, orientation_outcome, screening_outcome};
use pathway_db::models::workflow::{CandidateWorkflow, StageCompletion};
use pathway_db::repositories::{AdminUserRepo, TrainingBatchRepo, WorkflowRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

type Tx<'a> = sqlx::Transaction<'a, sqlx::Postgres>;

/// Record screening. Approved candidates move to orientation, rejected ones
/// are put on hold.
pub async fn complete_screening(
    pool: &PgPool,
    workflow_id: DbId,
    actor_id: DbId,
    notes: Option<String>,
    approved: bool,
) -> AppResult<CandidateWorkflow> {
    let mut tx = pool.begin().await?;
    let workflow = lock_workflow(&mut tx, workflow_id).await?;
    ensure_actor(pool, actor_id).await?;

    let next = screening_outcome(workflow.status, approved)?;
    let stage = StageCompletion {
        status: next,
        actor_id,
        notes,
        at: Utc::now(),
    };
    let updated = WorkflowRepo::record_screening(&mut tx, workflow_id, &stage).await?;
    tx.commit().await?;

    tracing::info!(
        workflow_id,
        candidate_id = updated.candidate_id,
        actor_id,
        approved,
        status = %updated.status,
        "Screening completed",
    );
    Ok(updated)
}

/// Record orientation. Only `completed = true` advances the status; otherwise
/// the notes and timestamp are stored as a progress note.
pub async fn complete_orientation(
    pool: &PgPool,
    workflow_id: DbId,
    actor_id: DbId,
    notes: Option<String>,
    completed: bool,
) -> AppResult<CandidateWorkflow> {
    let mut tx = pool.begin().await?;
    let workflow = lock_workflow(&mut tx, workflow_id).await?;
    ensure_actor(pool, actor_id).await?;

    let next = orientation_outcome(workflow.status, completed)?;
    let stage = StageCompletion {
        status: next,
        actor_id,
        notes,
        at: Utc::now(),
    };
    let updated = WorkflowRepo::record_orientation(&mut tx, workflow_id, &stage).await?;
    tx.commit().await?;

    tracing::info!(
        workflow_id,
        candidate_id = updated.candidate_id,
        actor_id,
        completed,
        status = %updated.status,
        "Orientation recorded",
    );
    Ok(updated)
}

/// Enroll into a batch, taking one seat in the same transaction.
pub async fn enroll_candidate(
    pool: &PgPool,
    workflow_id: DbId,
    batch_id: DbId,
    actor_id: DbId,
    notes: Option<String>,
) -> AppResult<CandidateWorkflow> {
    let mut tx = pool.begin().await?;
    let workflow = lock_workflow(&mut tx, workflow_id).await?;
    ensure_actor(pool, actor_id).await?;

    let next = enrollment_outcome(workflow.status)?;

    let batch = TrainingBatchRepo::lock(&mut tx, batch_id)
        .await?
        .ok_or_else(|| AppError::not_found("TrainingBatch", batch_id))?;
    if !batch.is_active {
        return Err(CoreError::Validation(format!(
            "Training batch {} is not active",
            batch.batch_code
        ))
        .into());
    }
    batch.ledger().reserve()?;
    // Conditional on current_enrolled < max_capacity.
    if !TrainingBatchRepo::try_reserve_seat(&mut tx, batch_id).await? {
        return Err(CoreError::CapacityExceeded(format!(
            "Training batch {} is full",
            batch.batch_code
        ))
        .into());
    }

    let stage = StageCompletion {
        status: next,
        actor_id,
        notes,
        at: Utc::now(),
    };
    let updated = WorkflowRepo::record_enrollment(&mut tx, workflow_id, batch_id, &stage).await?;
    tx.commit().await?;

    tracing::info!(
        workflow_id,
        candidate_id = updated.candidate_id,
        batch_id,
        actor_id,
        "Candidate enrolled",
    );
    Ok(updated)
}

async fn lock_workflow(tx: &mut Tx<'_>, workflow_id: DbId) -> AppResult<CandidateWorkflow> {
    WorkflowRepo::lock(tx, workflow_id)
        .await?
        .ok_or_else(|| AppError::not_found("CandidateWorkflow", workflow_id))
}

async fn ensure_actor(pool: &PgPool, actor_id: DbId) -> AppResult<()> {
    AdminUserRepo::find_by_id(pool, actor_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::not_found("AdminUser", actor_id))
}
