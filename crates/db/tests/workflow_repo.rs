//! Integration tests for candidate workflow persistence.

use chrono::Utc;
use pathway_core::workflow::WorkflowStatus;
use pathway_db::models::admin::CreateAdminUser;
use pathway_db::models::candidate::CreateCandidate;
use pathway_db::models::workflow::StageCompletion;
use pathway_db::repositories::{AdminUserRepo, CandidateRepo, RoleRepo, WorkflowRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_candidate(pool: &PgPool, email: &str) -> i64 {
    let mut tx = pool.begin().await.unwrap();
    let candidate = CandidateRepo::create(
        &mut tx,
        &CreateCandidate {
            first_name: "Asha".to_string(),
            last_name: "Patil".to_string(),
            email: Some(email.to_string()),
            onboarding_status: "INCOMPLETE".to_string(),
            engagement_score: 60.0,
            dropout_risk_score: 20.0,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();
    candidate.id
}

async fn seed_admin(pool: &PgPool) -> i64 {
    let role = RoleRepo::find_by_name(pool, "STATE_ADMIN").await.unwrap().unwrap();
    AdminUserRepo::create(
        pool,
        &CreateAdminUser {
            username: "screener".to_string(),
            password_hash: "not-a-real-hash".to_string(),
            first_name: Some("Ravi".to_string()),
            last_name: Some("Kulkarni".to_string()),
            email: None,
            phone: None,
            role_id: role.id,
            state_id: None,
            city_id: None,
            created_by: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn stage(status: WorkflowStatus, actor_id: i64, notes: &str) -> StageCompletion {
    StageCompletion {
        status,
        actor_id,
        notes: Some(notes.to_string()),
        at: Utc::now(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ensure_is_idempotent(pool: PgPool) {
    let candidate_id = seed_candidate(&pool, "asha@example.com").await;

    let first = WorkflowRepo::ensure_for_candidate(&pool, candidate_id).await.unwrap();
    let second = WorkflowRepo::ensure_for_candidate(&pool, candidate_id).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.status, WorkflowStatus::PendingScreening);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM candidate_workflows")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_screening_record_stamps_actor(pool: PgPool) {
    let candidate_id = seed_candidate(&pool, "asha@example.com").await;
    let admin_id = seed_admin(&pool).await;
    let workflow = WorkflowRepo::ensure_for_candidate(&pool, candidate_id).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    let locked = WorkflowRepo::lock(&mut tx, workflow.id).await.unwrap().unwrap();
    assert_eq!(locked.status, WorkflowStatus::PendingScreening);
    WorkflowRepo::record_screening(
        &mut tx,
        workflow.id,
        &stage(WorkflowStatus::PendingOrientation, admin_id, "looks good"),
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    let view = WorkflowRepo::find_view(&pool, workflow.id).await.unwrap().unwrap();
    assert_eq!(view.status, WorkflowStatus::PendingOrientation);
    assert_eq!(view.candidate_name, "Asha Patil");
    assert_eq!(view.screening_completed_by, Some(admin_id));
    assert_eq!(view.screening_completed_by_name.as_deref(), Some("Ravi Kulkarni"));
    assert_eq!(view.screening_notes.as_deref(), Some("looks good"));
    assert!(view.orientation_completed_at.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_by_status_newest_first(pool: PgPool) {
    let older = seed_candidate(&pool, "one@example.com").await;
    let newer = seed_candidate(&pool, "two@example.com").await;
    WorkflowRepo::ensure_for_candidate(&pool, older).await.unwrap();
    WorkflowRepo::ensure_for_candidate(&pool, newer).await.unwrap();

    let pending = WorkflowRepo::list_by_status(&pool, WorkflowStatus::PendingScreening)
        .await
        .unwrap();
    let ids: Vec<i64> = pending.iter().map(|w| w.candidate_id).collect();
    assert_eq!(ids, vec![newer, older]);

    let enrolled = WorkflowRepo::list_by_status(&pool, WorkflowStatus::Enrolled).await.unwrap();
    assert!(enrolled.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stats_count_each_status(pool: PgPool) {
    let admin_id = seed_admin(&pool).await;
    let a = seed_candidate(&pool, "a@example.com").await;
    let b = seed_candidate(&pool, "b@example.com").await;
    WorkflowRepo::ensure_for_candidate(&pool, a).await.unwrap();
    let held = WorkflowRepo::ensure_for_candidate(&pool, b).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    WorkflowRepo::record_screening(&mut tx, held.id, &stage(WorkflowStatus::OnHold, admin_id, "no"))
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let stats = WorkflowRepo::stats(&pool).await.unwrap();
    assert_eq!(stats.pending_screening, 1);
    assert_eq!(stats.on_hold, 1);
    assert_eq!(stats.enrolled, 0);
    assert_eq!(stats.dropped, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_status_rejected_by_check(pool: PgPool) {
    let candidate_id = seed_candidate(&pool, "asha@example.com").await;
    let workflow = WorkflowRepo::ensure_for_candidate(&pool, candidate_id).await.unwrap();

    let result = sqlx::query("UPDATE candidate_workflows SET status = 'WAITLISTED' WHERE id = $1")
        .bind(workflow.id)
        .execute(&pool)
        .await;
    assert!(result.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_workflow_lock_returns_none(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    assert!(WorkflowRepo::lock(&mut tx, 9999).await.unwrap().is_none());
}
