//! HTTP-level tests for aging notifications and the on-demand scan.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, onboard, post_json_auth, put_auth, super_admin_token};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn calculate(pool: &PgPool, token: &str) -> Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/notifications/calculate", json!({}), token).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

async fn get_data(pool: &PgPool, uri: &str, token: &str) -> Value {
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, uri, token).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn scan_creates_one_notification_per_level(pool: PgPool) {
    let token = super_admin_token(&pool).await;
    onboard(&pool, "Asha").await;
    onboard(&pool, "Ravi").await;
    sqlx::query("UPDATE candidates SET created_at = NOW() - INTERVAL '6 days' WHERE first_name = 'Ravi'")
        .execute(&pool)
        .await
        .unwrap();

    let outcome = calculate(&pool, &token).await;
    assert_eq!(outcome["scanned"], 2);
    assert_eq!(outcome["created"], 2);
    assert_eq!(outcome["skipped"], false);

    let outcome = calculate(&pool, &token).await;
    assert_eq!(outcome["created"], 0, "existing notifications are not duplicated");

    let red = get_data(&pool, "/api/v1/notifications/by-color/red", &token).await;
    let red = red.as_array().unwrap();
    assert_eq!(red.len(), 1);
    assert_eq!(red[0]["candidate_name"], "Ravi Candidate");
    assert_eq!(red[0]["aging_level"], "CRITICAL");
    assert_eq!(red[0]["days_since_created"], 6);

    let summary = get_data(&pool, "/api/v1/notifications/summary", &token).await;
    assert_eq!(summary["by_color"]["RED"], 1);
    assert_eq!(summary["by_color"]["AMBER"], 0);
    assert_eq!(summary["by_color"]["GREEN"], 1);
    assert_eq!(summary["by_status"]["INCOMPLETE"], 2);
    assert_eq!(summary["total_active"], 2);
    assert_eq!(summary["unread_count"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn read_and_dismiss_update_counts(pool: PgPool) {
    let token = super_admin_token(&pool).await;
    onboard(&pool, "Meera").await;
    onboard(&pool, "Kiran").await;
    calculate(&pool, &token).await;

    let active = get_data(&pool, "/api/v1/notifications", &token).await;
    let ids: Vec<i64> = active
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);

    let app = common::build_test_app(pool.clone());
    let response = put_auth(app, &format!("/api/v1/notifications/{}/mark-read", ids[0]), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_read"], true);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/notifications/unread-count", &token).await;
    assert_eq!(body_json(response).await["count"], 1);

    let app = common::build_test_app(pool.clone());
    let response = put_auth(app, &format!("/api/v1/notifications/{}/dismiss", ids[1]), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let active = get_data(&pool, "/api/v1/notifications", &token).await;
    assert_eq!(active.as_array().unwrap().len(), 1);

    let app = common::build_test_app(pool.clone());
    let response = put_auth(app, "/api/v1/notifications/mark-all-read", &token).await;
    assert_eq!(body_json(response).await["data"]["updated"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_notification_is_404(pool: PgPool) {
    let token = super_admin_token(&pool).await;

    let app = common::build_test_app(pool);
    let response = put_auth(app, "/api/v1/notifications/555555/dismiss", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_summary_lists_every_color(pool: PgPool) {
    let token = super_admin_token(&pool).await;

    let summary = get_data(&pool, "/api/v1/notifications/summary", &token).await;
    for color in ["RED", "AMBER", "GREEN"] {
        assert_eq!(summary["by_color"][color], 0);
    }
    assert_eq!(summary["total_active"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dashboard_counts_onboarded_candidates(pool: PgPool) {
    let token = super_admin_token(&pool).await;
    onboard(&pool, "Divya").await;

    let stats = get_data(&pool, "/api/v1/dashboard/stats", &token).await;
    assert_eq!(stats["monthly_onboarding_data"].as_array().unwrap().len(), 12);
    assert_eq!(stats["monthly_workflow_data"].as_array().unwrap().len(), 12);

    let summary = get_data(&pool, "/api/v1/dashboard/stats/summary", &token).await;
    assert_eq!(summary["total_candidates"], 1);
}
