//! HTTP-level tests for the OTP-gated self-signup flow.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, super_admin_token, TEST_OTP};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn post(pool: &PgPool, uri: &str, body: Value) -> (StatusCode, Value) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, uri, body).await;
    let status = response.status();
    (status, body_json(response).await)
}

/// Send and verify an OTP for `contact`. Returns the candidate id.
async fn verified_candidate(pool: &PgPool, contact: &str) -> i64 {
    let (status, _) = post(pool, "/api/v1/signup/send-otp", json!({ "contact": contact })).await;
    assert_eq!(status, StatusCode::OK);
    let body = json!({ "contact": contact, "otp_code": TEST_OTP });
    let (status, json) = post(pool, "/api/v1/signup/verify-otp", body).await;
    assert_eq!(status, StatusCode::OK);
    json["candidate_id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn send_otp_reveals_static_code(pool: PgPool) {
    let body = json!({ "contact": "asha@example.com", "contact_type": "email" });
    let (status, json) = post(&pool, "/api/v1/signup/send-otp", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["otp_code"], TEST_OTP);
    assert_eq!(json["expiry_minutes"], 10);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_contact_is_400(pool: PgPool) {
    let body = json!({ "contact": "not-an-email", "contact_type": "EMAIL" });
    let (status, json) = post(&pool, "/api/v1/signup/send-otp", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_otp_is_rejected(pool: PgPool) {
    let contact = "ravi@example.com";
    post(&pool, "/api/v1/signup/send-otp", json!({ "contact": contact })).await;

    let body = json!({ "contact": contact, "otp_code": "000000" });
    let (status, json) = post(&pool, "/api/v1/signup/verify-otp", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let body = json!({ "contact": "nobody@example.com", "otp_code": TEST_OTP });
    let (status, _) = post(&pool, "/api/v1/signup/verify-otp", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn verifying_twice_reuses_the_candidate(pool: PgPool) {
    let first = verified_candidate(&pool, "meera@example.com").await;
    let second = verified_candidate(&pool, "meera@example.com").await;
    assert_eq!(first, second);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_steps_advance_to_completion(pool: PgPool) {
    let candidate_id = verified_candidate(&pool, "kiran@example.com").await;

    let body = json!({
        "candidate_id": candidate_id,
        "first_name": "Kiran",
        "last_name": "Rao",
        "date_of_birth": "2001-04-12",
    });
    let (status, json) = post(&pool, "/api/v1/signup/profile-details", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["next_step"], "personal-details");

    let body = json!({
        "candidate_id": candidate_id,
        "city": "Pune",
        "state": "Maharashtra",
        "employment_status": "Unemployed",
    });
    let (status, json) = post(&pool, "/api/v1/signup/personal-details", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["next_step"], "education-details");
    assert_eq!(json["progress_percentage"], 33);

    let body = json!({
        "candidate_id": candidate_id,
        "tenth_board": "SSC",
        "tenth_percentage": "82.5%",
        "graduation_degree": "B.Com",
        "graduation_percentage": "not a number",
    });
    let (status, json) = post(&pool, "/api/v1/signup/education-details", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["next_step"], "skills");
    assert_eq!(json["progress_percentage"], 66);

    let body = json!({
        "candidate_id": candidate_id,
        "skills": [{ "skill_name": "Excel", "proficiency_level": "Intermediate" }],
        "languages": [{ "language_name": "Marathi" }, { "language_name": "  " }],
    });
    let (status, json) = post(&pool, "/api/v1/signup/skills", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["next_step"], "review");
    assert_eq!(json["progress_percentage"], 99);

    let body = json!({ "candidate_id": candidate_id });
    let (status, json) = post(&pool, "/api/v1/signup/complete", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "COMPLETE");
    assert_eq!(json["progress_percentage"], 100);

    let token = super_admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/candidates/{candidate_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["first_name"], "Kiran");
    assert_eq!(json["data"]["status"], "ACTIVE");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn steps_for_unknown_candidate_are_404(pool: PgPool) {
    let body = json!({ "candidate_id": 987654, "skills": [] });
    let (status, json) = post(&pool, "/api/v1/signup/skills", body).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_verifications_consume_the_otp_once(pool: PgPool) {
    let contact = "latha@example.com";
    let (status, _) = post(&pool, "/api/v1/signup/send-otp", json!({ "contact": contact })).await;
    assert_eq!(status, StatusCode::OK);

    let body = json!({ "contact": contact, "otp_code": TEST_OTP });
    let (first, second) = tokio::join!(
        post(&pool, "/api/v1/signup/verify-otp", body.clone()),
        post(&pool, "/api/v1/signup/verify-otp", body.clone()),
    );
    let mut statuses = vec![first.0, second.0];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::BAD_REQUEST]);

    let rejected = if first.0 == StatusCode::OK { second.1 } else { first.1 };
    assert_eq!(rejected["code"], "VALIDATION_ERROR");

    let verified: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM otp_verifications WHERE is_verified")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(verified, 1);
}
