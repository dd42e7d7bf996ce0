//! Integration tests for aging notification idempotency and cleanup.

use chrono::{Duration, Utc};
use pathway_db::models::candidate::CreateCandidate;
use pathway_db::models::notification::CreateAgingNotification;
use pathway_db::repositories::{AgingNotificationRepo, CandidateRepo};
use sqlx::PgPool;

async fn seed_candidate(pool: &PgPool, phone: &str) -> i64 {
    let mut tx = pool.begin().await.unwrap();
    let candidate = CandidateRepo::create(
        &mut tx,
        &CreateCandidate {
            first_name: "Meera".to_string(),
            last_name: "Joshi".to_string(),
            phone_number: Some(phone.to_string()),
            onboarding_status: "INCOMPLETE".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();
    candidate.id
}

fn critical(candidate_id: i64) -> CreateAgingNotification {
    CreateAgingNotification {
        candidate_id,
        candidate_name: "Meera Joshi".to_string(),
        phone_number: Some("9800000001".to_string()),
        onboarding_status: Some("INCOMPLETE".to_string()),
        days_since_created: 6,
        aging_level: "CRITICAL".to_string(),
        aging_color: "RED".to_string(),
        message: "Onboarding incomplete for 6 days - URGENT ACTION REQUIRED".to_string(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_insert_if_absent_is_idempotent(pool: PgPool) {
    let id = seed_candidate(&pool, "9800000001").await;

    assert!(AgingNotificationRepo::insert_if_absent(&pool, &critical(id)).await.unwrap());
    assert!(!AgingNotificationRepo::insert_if_absent(&pool, &critical(id)).await.unwrap());

    assert_eq!(AgingNotificationRepo::active_count(&pool).await.unwrap(), 1);
    assert_eq!(AgingNotificationRepo::unread_count(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_different_level_is_separate(pool: PgPool) {
    let id = seed_candidate(&pool, "9800000001").await;
    let mut warning = critical(id);
    warning.aging_level = "WARNING".to_string();
    warning.aging_color = "AMBER".to_string();

    assert!(AgingNotificationRepo::insert_if_absent(&pool, &warning).await.unwrap());
    assert!(AgingNotificationRepo::insert_if_absent(&pool, &critical(id)).await.unwrap());

    let by_color = AgingNotificationRepo::count_by_color(&pool).await.unwrap();
    assert_eq!(by_color.len(), 2);
    assert!(by_color.iter().all(|c| c.count == 1));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dismissed_level_can_be_raised_again(pool: PgPool) {
    let id = seed_candidate(&pool, "9800000001").await;
    AgingNotificationRepo::insert_if_absent(&pool, &critical(id)).await.unwrap();
    let first = AgingNotificationRepo::list_active(&pool).await.unwrap().remove(0);

    let dismissed = AgingNotificationRepo::dismiss(&pool, first.id).await.unwrap().unwrap();
    assert!(dismissed.is_dismissed);
    assert_eq!(AgingNotificationRepo::active_count(&pool).await.unwrap(), 0);

    assert!(AgingNotificationRepo::insert_if_absent(&pool, &critical(id)).await.unwrap());
    assert_eq!(AgingNotificationRepo::active_count(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_read_and_mark_all(pool: PgPool) {
    let a = seed_candidate(&pool, "9800000001").await;
    let b = seed_candidate(&pool, "9800000002").await;
    AgingNotificationRepo::insert_if_absent(&pool, &critical(a)).await.unwrap();
    AgingNotificationRepo::insert_if_absent(&pool, &critical(b)).await.unwrap();

    let first = AgingNotificationRepo::list_active(&pool).await.unwrap().remove(0);
    let read = AgingNotificationRepo::mark_read(&pool, first.id).await.unwrap().unwrap();
    assert!(read.is_read);
    assert_eq!(AgingNotificationRepo::unread_count(&pool).await.unwrap(), 1);

    assert_eq!(AgingNotificationRepo::mark_all_read(&pool).await.unwrap(), 1);
    assert_eq!(AgingNotificationRepo::unread_count(&pool).await.unwrap(), 0);

    assert!(AgingNotificationRepo::mark_read(&pool, 9999).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_purge_only_old_dismissed(pool: PgPool) {
    let a = seed_candidate(&pool, "9800000001").await;
    let b = seed_candidate(&pool, "9800000002").await;
    AgingNotificationRepo::insert_if_absent(&pool, &critical(a)).await.unwrap();
    AgingNotificationRepo::insert_if_absent(&pool, &critical(b)).await.unwrap();
    let rows = AgingNotificationRepo::list_active(&pool).await.unwrap();
    for row in &rows {
        AgingNotificationRepo::dismiss(&pool, row.id).await.unwrap();
    }

    // The updated_at trigger would overwrite a backdated value.
    sqlx::query("ALTER TABLE onboarding_aging_notifications DISABLE TRIGGER trg_aging_notifications_updated_at")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("UPDATE onboarding_aging_notifications SET updated_at = NOW() - INTERVAL '40 days' WHERE candidate_id = $1")
        .bind(a)
        .execute(&pool)
        .await
        .unwrap();

    let cutoff = Utc::now() - Duration::days(30);
    assert_eq!(AgingNotificationRepo::purge_dismissed_before(&pool, cutoff).await.unwrap(), 1);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM onboarding_aging_notifications")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_scan_candidates_in_id_order(pool: PgPool) {
    let a = seed_candidate(&pool, "9800000001").await;
    let b = seed_candidate(&pool, "9800000002").await;
    let rows = AgingNotificationRepo::scan_candidates(&pool).await.unwrap();
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![a, b]);
    assert_eq!(rows[0].onboarding_status, "INCOMPLETE");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_active_list_puts_most_severe_and_oldest_first(pool: PgPool) {
    let a = seed_candidate(&pool, "9800000001").await;
    let b = seed_candidate(&pool, "9800000002").await;
    let c = seed_candidate(&pool, "9800000003").await;

    let mut amber = critical(a);
    amber.days_since_created = 4;
    amber.aging_level = "WARNING".to_string();
    amber.aging_color = "AMBER".to_string();
    let mut recent_red = critical(b);
    recent_red.days_since_created = 5;
    let mut old_red = critical(c);
    old_red.days_since_created = 12;

    // Inserted in the reverse of the expected order.
    for n in [&amber, &recent_red, &old_red] {
        assert!(AgingNotificationRepo::insert_if_absent(&pool, n).await.unwrap());
    }

    let active = AgingNotificationRepo::list_active(&pool).await.unwrap();
    let order: Vec<(&str, i32)> = active
        .iter()
        .map(|n| (n.aging_color.as_str(), n.days_since_created))
        .collect();
    assert_eq!(order, vec![("RED", 12), ("RED", 5), ("AMBER", 4)]);

    let red = AgingNotificationRepo::list_by_color(&pool, "RED").await.unwrap();
    let candidates: Vec<i64> = red.iter().map(|n| n.candidate_id).collect();
    assert_eq!(candidates, vec![c, b]);

    let incomplete = AgingNotificationRepo::list_by_status(&pool, "INCOMPLETE").await.unwrap();
    let days: Vec<i32> = incomplete.iter().map(|n| n.days_since_created).collect();
    assert_eq!(days, vec![12, 5, 4]);
}
