//! Integration tests for training batch seat accounting.
//!
//! `current_enrolled` must stay within `0..=max_capacity` under every
//! repository operation, and occupied batches cannot be deleted.

use chrono::NaiveDate;
use pathway_db::models::training::{
    CreateTrainingBatch, CreateTrainingMaster, TrainingBatch, UpdateTrainingBatch,
};
use pathway_db::repositories::{TrainingBatchRepo, TrainingMasterRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

async fn seed_batch(pool: &PgPool, code: &str, max_capacity: i32) -> TrainingBatch {
    let training = match TrainingMasterRepo::list(pool).await.unwrap().into_iter().next() {
        Some(t) => t.id,
        None => {
            TrainingMasterRepo::create(
                pool,
                &CreateTrainingMaster {
                    name: "Data Entry".to_string(),
                    description: None,
                    skill_category: Some("IT".to_string()),
                    duration_days: Some(10),
                    is_active: None,
                },
            )
            .await
            .unwrap()
            .id
        }
    };
    TrainingBatchRepo::create(
        pool,
        &CreateTrainingBatch {
            training_id: training,
            batch_code: code.to_string(),
            start_date: date("2026-06-01"),
            end_date: date("2026-06-10"),
            max_capacity,
            location: Some("Pune".to_string()),
            trainer_name: None,
            is_active: true,
        },
    )
    .await
    .unwrap()
}

async fn reserve(pool: &PgPool, id: i64) -> bool {
    let mut tx = pool.begin().await.unwrap();
    let ok = TrainingBatchRepo::try_reserve_seat(&mut tx, id).await.unwrap();
    tx.commit().await.unwrap();
    ok
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reserve_until_full(pool: PgPool) {
    let batch = seed_batch(&pool, "B1", 2).await;

    assert!(reserve(&pool, batch.id).await);
    assert!(reserve(&pool, batch.id).await);
    assert!(!reserve(&pool, batch.id).await, "third seat must be refused");

    let view = TrainingBatchRepo::find_view(&pool, batch.id).await.unwrap().unwrap();
    assert_eq!(view.current_enrolled, 2);
    assert_eq!(view.available_slots, 0);
    assert!(!view.has_capacity);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_reservations_for_last_seat(pool: PgPool) {
    let batch = seed_batch(&pool, "B1C", 1).await;

    let (a, b) = tokio::join!(reserve(&pool, batch.id), reserve(&pool, batch.id));
    assert!(a ^ b, "exactly one reservation must win the last seat");

    let row = TrainingBatchRepo::find_by_id(&pool, batch.id).await.unwrap().unwrap();
    assert_eq!(row.current_enrolled, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_release_is_guarded_at_zero(pool: PgPool) {
    let batch = seed_batch(&pool, "B2", 3).await;

    assert!(!TrainingBatchRepo::release_seat(&pool, batch.id).await.unwrap());

    assert!(reserve(&pool, batch.id).await);
    assert!(TrainingBatchRepo::release_seat(&pool, batch.id).await.unwrap());

    let row = TrainingBatchRepo::find_by_id(&pool, batch.id).await.unwrap().unwrap();
    assert_eq!(row.current_enrolled, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rolled_back_reservation_leaves_count(pool: PgPool) {
    let batch = seed_batch(&pool, "B3", 5).await;

    let mut tx = pool.begin().await.unwrap();
    assert!(TrainingBatchRepo::try_reserve_seat(&mut tx, batch.id).await.unwrap());
    tx.rollback().await.unwrap();

    let row = TrainingBatchRepo::find_by_id(&pool, batch.id).await.unwrap().unwrap();
    assert_eq!(row.current_enrolled, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_capacity_cannot_drop_below_enrolled(pool: PgPool) {
    let batch = seed_batch(&pool, "B4", 3).await;
    assert!(reserve(&pool, batch.id).await);
    assert!(reserve(&pool, batch.id).await);

    let shrink = UpdateTrainingBatch {
        max_capacity: Some(1),
        ..Default::default()
    };
    let updated = TrainingBatchRepo::update(&pool, batch.id, &shrink).await.unwrap();
    assert!(updated.is_none());

    let row = TrainingBatchRepo::find_by_id(&pool, batch.id).await.unwrap().unwrap();
    assert_eq!(row.max_capacity, 3);

    let to_exact = UpdateTrainingBatch {
        max_capacity: Some(2),
        ..Default::default()
    };
    let updated = TrainingBatchRepo::update(&pool, batch.id, &to_exact).await.unwrap().unwrap();
    assert_eq!(updated.max_capacity, 2);
    assert!(!updated.ledger().has_capacity());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_only_when_empty(pool: PgPool) {
    let batch = seed_batch(&pool, "B5", 3).await;
    assert!(reserve(&pool, batch.id).await);

    assert!(!TrainingBatchRepo::delete_if_empty(&pool, batch.id).await.unwrap());
    assert!(TrainingBatchRepo::release_seat(&pool, batch.id).await.unwrap());
    assert!(TrainingBatchRepo::delete_if_empty(&pool, batch.id).await.unwrap());
    assert!(TrainingBatchRepo::find_by_id(&pool, batch.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_check_constraint_rejects_overfill(pool: PgPool) {
    let batch = seed_batch(&pool, "B6", 1).await;
    let result = sqlx::query("UPDATE training_batches SET current_enrolled = 2 WHERE id = $1")
        .bind(batch.id)
        .execute(&pool)
        .await;
    assert!(result.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_batch_code_violates_unique(pool: PgPool) {
    seed_batch(&pool, "DUP", 3).await;
    assert!(TrainingBatchRepo::code_exists(&pool, "dup", None).await.unwrap());

    let training_id = TrainingMasterRepo::list(&pool).await.unwrap()[0].id;
    let err = TrainingBatchRepo::create(
        &pool,
        &CreateTrainingBatch {
            training_id,
            batch_code: "DUP".to_string(),
            start_date: date("2026-07-01"),
            end_date: date("2026-07-02"),
            max_capacity: 3,
            location: None,
            trainer_name: None,
            is_active: true,
        },
    )
    .await
    .unwrap_err();
    let db_err = err.as_database_error().unwrap();
    assert_eq!(db_err.constraint(), Some("uq_training_batches_batch_code"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_available_excludes_full_and_ended(pool: PgPool) {
    let open = seed_batch(&pool, "OPEN", 2).await;
    let full = seed_batch(&pool, "FULL", 1).await;
    assert!(reserve(&pool, full.id).await);

    let today = date("2026-06-05");
    let ids: Vec<i64> = TrainingBatchRepo::list_available(&pool, today)
        .await
        .unwrap()
        .iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(ids, vec![open.id]);

    let after_end = date("2026-06-11");
    assert!(TrainingBatchRepo::list_available(&pool, after_end).await.unwrap().is_empty());
}
