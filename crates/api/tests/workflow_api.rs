//! End-to-end tests for the onboarding workflow: onboard, screen, orient,
//! enroll, and the capacity limit on the final step.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{
    body_json, create_batch, create_training, get_auth, onboard, post_json_auth, put_auth,
    put_json_auth, super_admin_token,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

async fn put(pool: &PgPool, uri: &str, body: Value, token: &str) -> (StatusCode, Value) {
    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(app, uri, body, token).await;
    let status = response.status();
    (status, body_json(response).await)
}

async fn screen(pool: &PgPool, token: &str, workflow_id: i64, approved: bool) -> (StatusCode, Value) {
    let body = json!({ "workflow_id": workflow_id, "approved": approved, "notes": "Phone screen" });
    put(pool, "/api/v1/screening/complete-screening", body, token).await
}

async fn orient(pool: &PgPool, token: &str, workflow_id: i64) -> (StatusCode, Value) {
    let body = json!({ "workflow_id": workflow_id, "completed": true });
    put(pool, "/api/v1/screening/complete-orientation", body, token).await
}

async fn enroll(pool: &PgPool, token: &str, workflow_id: i64, batch_id: i64) -> (StatusCode, Value) {
    let body = json!({ "workflow_id": workflow_id, "batch_id": batch_id });
    put(pool, "/api/v1/screening/enroll", body, token).await
}

/// Onboard, screen and orient a candidate. Returns the PENDING_ENROLL workflow id.
async fn ready_to_enroll(pool: &PgPool, token: &str, first_name: &str) -> i64 {
    let workflow_id = onboard(pool, first_name).await;
    let (status, _) = screen(pool, token, workflow_id, true).await;
    assert_eq!(status, StatusCode::OK);
    let (status, json) = orient(pool, token, workflow_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "PENDING_ENROLL");
    workflow_id
}

async fn fetch(pool: &PgPool, token: &str, uri: &str) -> Value {
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, uri, token).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn full_pipeline_respects_batch_capacity(pool: PgPool) {
    let token = super_admin_token(&pool).await;
    let training_id = create_training(&pool, &token).await;
    let batch_id = create_batch(&pool, &token, training_id, "FL-001", 1).await;

    let first = onboard(&pool, "Asha").await;
    let second = onboard(&pool, "Ravi").await;

    for workflow_id in [first, second] {
        let (status, json) = screen(&pool, &token, workflow_id, true).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "PENDING_ORIENTATION");
        assert_eq!(json["data"]["status_display_name"], "Pending Orientation");
        assert!(json["data"]["screening_completed_at"].is_string());

        let (status, json) = orient(&pool, &token, workflow_id).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "PENDING_ENROLL");
    }

    let (status, json) = enroll(&pool, &token, first, batch_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "ENROLLED");
    assert_eq!(json["data"]["training_batch_id"], batch_id);
    assert_eq!(json["data"]["batch_code"], "FL-001");

    let (status, json) = enroll(&pool, &token, second, batch_id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CAPACITY_EXCEEDED");

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/training/batches/{batch_id}"), &token).await;
    let batch = body_json(response).await;
    assert_eq!(batch["data"]["current_enrolled"], 1);
    assert_eq!(batch["data"]["available_slots"], 0);
    assert_eq!(batch["data"]["has_capacity"], false);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/screening/stats", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let stats = body_json(response).await;
    assert_eq!(stats["data"]["enrolled"], 1);
    assert_eq!(stats["data"]["pending_enroll"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeating_a_stage_is_an_invalid_transition(pool: PgPool) {
    let token = super_admin_token(&pool).await;
    let workflow_id = onboard(&pool, "Meera").await;

    let (status, _) = screen(&pool, &token, workflow_id, true).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = screen(&pool, &token, workflow_id, true).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "INVALID_TRANSITION");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rejected_screening_puts_workflow_on_hold(pool: PgPool) {
    let token = super_admin_token(&pool).await;
    let workflow_id = onboard(&pool, "Kiran").await;

    let (status, json) = screen(&pool, &token, workflow_id, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "ON_HOLD");
    assert_eq!(json["data"]["status_display_name"], "On Hold");

    let (status, json) = orient(&pool, &token, workflow_id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "INVALID_TRANSITION");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn workflow_is_listed_in_its_queue(pool: PgPool) {
    let token = super_admin_token(&pool).await;
    let workflow_id = onboard(&pool, "Divya").await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/screening/pending", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let ids: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["id"].as_i64().unwrap())
        .collect();
    assert!(ids.contains(&workflow_id));

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/screening/{workflow_id}"), &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["candidate_name"], "Divya Candidate");
    assert_eq!(json["data"]["status_display_name"], "Pending Screening");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_actor_header_is_404(pool: PgPool) {
    let token = super_admin_token(&pool).await;
    let workflow_id = onboard(&pool, "Sanjay").await;

    let app = common::build_test_app(pool.clone());
    let body = json!({ "workflow_id": workflow_id, "approved": true });
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/api/v1/screening/complete-screening")
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "application/json")
        .header("X-Admin-User-Id", "999999")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_workflow_is_404(pool: PgPool) {
    let token = super_admin_token(&pool).await;

    let (status, json) = screen(&pool, &token, 424242, true).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missed_orientation_keeps_status_but_records_notes(pool: PgPool) {
    let token = super_admin_token(&pool).await;
    let workflow_id = onboard(&pool, "Pooja").await;
    let (status, _) = screen(&pool, &token, workflow_id, true).await;
    assert_eq!(status, StatusCode::OK);

    let body = json!({ "workflow_id": workflow_id, "completed": false, "notes": "Missed session" });
    let (status, json) = put(&pool, "/api/v1/screening/complete-orientation", body, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "PENDING_ORIENTATION");
    assert_eq!(json["data"]["orientation_notes"], "Missed session");
    assert!(json["data"]["orientation_completed_at"].is_string());

    let stored = fetch(&pool, &token, &format!("/api/v1/screening/{workflow_id}")).await;
    assert_eq!(stored["status"], "PENDING_ORIENTATION");
    assert_eq!(stored["orientation_notes"], "Missed session");

    // Still eligible to complete orientation later.
    let (status, json) = orient(&pool, &token, workflow_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "PENDING_ENROLL");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn enrolling_from_the_wrong_status_takes_no_seat(pool: PgPool) {
    let token = super_admin_token(&pool).await;
    let training_id = create_training(&pool, &token).await;
    let batch_id = create_batch(&pool, &token, training_id, "WS-001", 2).await;
    let workflow_id = onboard(&pool, "Farah").await;

    let (status, json) = enroll(&pool, &token, workflow_id, batch_id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "INVALID_TRANSITION");

    let batch = fetch(&pool, &token, &format!("/api/v1/training/batches/{batch_id}")).await;
    assert_eq!(batch["current_enrolled"], 0);
    let workflow = fetch(&pool, &token, &format!("/api/v1/screening/{workflow_id}")).await;
    assert_eq!(workflow["status"], "PENDING_SCREENING");
    assert!(workflow["training_batch_id"].is_null());
    assert!(workflow["enrolled_at"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn enrolling_into_an_inactive_batch_changes_nothing(pool: PgPool) {
    let token = super_admin_token(&pool).await;
    let training_id = create_training(&pool, &token).await;
    let batch_id = create_batch(&pool, &token, training_id, "IN-001", 2).await;
    let workflow_id = ready_to_enroll(&pool, &token, "Gopal").await;

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/training/batches/{batch_id}/toggle-active");
    let response = put_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_active"], false);

    let (status, json) = enroll(&pool, &token, workflow_id, batch_id).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let batch = fetch(&pool, &token, &format!("/api/v1/training/batches/{batch_id}")).await;
    assert_eq!(batch["current_enrolled"], 0);
    let workflow = fetch(&pool, &token, &format!("/api/v1/screening/{workflow_id}")).await;
    assert_eq!(workflow["status"], "PENDING_ENROLL");
    assert!(workflow["training_batch_id"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_enrollments_race_for_the_last_seat(pool: PgPool) {
    let token = super_admin_token(&pool).await;
    let training_id = create_training(&pool, &token).await;
    let batch_id = create_batch(&pool, &token, training_id, "LS-001", 1).await;
    let first = ready_to_enroll(&pool, &token, "Hema").await;
    let second = ready_to_enroll(&pool, &token, "Irfan").await;

    let (a, b) = tokio::join!(
        enroll(&pool, &token, first, batch_id),
        enroll(&pool, &token, second, batch_id),
    );
    let outcomes = [a, b];
    let winners = outcomes.iter().filter(|(s, _)| *s == StatusCode::OK).count();
    assert_eq!(winners, 1);
    let (status, json) = outcomes
        .iter()
        .find(|(s, _)| *s != StatusCode::OK)
        .unwrap();
    assert_eq!(*status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CAPACITY_EXCEEDED");

    let batch = fetch(&pool, &token, &format!("/api/v1/training/batches/{batch_id}")).await;
    assert_eq!(batch["current_enrolled"], 1);
    let enrolled = fetch(&pool, &token, "/api/v1/screening/enrolled").await;
    assert_eq!(enrolled.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn creating_a_workflow_is_idempotent(pool: PgPool) {
    let token = super_admin_token(&pool).await;
    let candidate_id: i64 = sqlx::query_scalar(
        "INSERT INTO candidates (first_name, last_name, email)
         VALUES ('Jaya', 'Rao', 'jaya@example.com') RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    let body = json!({ "candidate_id": candidate_id });
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/screening/workflows", body.clone(), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["status"], "PENDING_SCREENING");

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/screening/workflows", body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let existing = body_json(response).await;
    assert_eq!(existing["data"]["id"], created["data"]["id"]);

    // Onboarding already created one.
    let workflow_id = onboard(&pool, "Kavya").await;
    let onboarded = fetch(&pool, &token, &format!("/api/v1/screening/{workflow_id}")).await;
    let body = json!({ "candidate_id": onboarded["candidate_id"] });
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/screening/workflows", body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["id"], workflow_id);
}
