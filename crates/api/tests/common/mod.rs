#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use pathway_api::auth::jwt::JwtConfig;
use pathway_api::auth::password::hash_password;
use pathway_api::bootstrap::{ensure_super_admin, SUPERADMIN_USERNAME};
use pathway_api::config::{AgingConfig, ServerConfig, SignupConfig};
use pathway_api::engine::aging::ScanGuard;
use pathway_api::router::build_app_router;
use pathway_api::state::AppState;
use pathway_core::otp::StaticOtp;
use pathway_core::scoring::FixedScoring;
use pathway_core::types::DbId;
use pathway_db::models::admin::CreateAdminUser;
use pathway_db::repositories::{AdminUserRepo, RoleRepo};
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_OTP: &str = "123456";
pub const SUPERADMIN_PASSWORD: &str = "superadmin-pass";
pub const USER_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 1,
        },
        signup: SignupConfig {
            otp_static_code: Some(TEST_OTP.to_string()),
        },
        aging: AgingConfig::default(),
    }
}

/// The production router over `pool`, with deterministic scoring and OTPs.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        scoring: Arc::new(FixedScoring {
            engagement: 60.0,
            dropout_risk: 20.0,
        }),
        otp: Arc::new(StaticOtp(TEST_OTP.to_string())),
        aging_guard: ScanGuard::default(),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Create an admin with the given seeded role. Returns the user id.
pub async fn create_admin(pool: &PgPool, username: &str, role: &str) -> DbId {
    let role = RoleRepo::find_by_name(pool, role)
        .await
        .unwrap()
        .expect("seeded role must exist");
    let user = AdminUserRepo::create(
        pool,
        &CreateAdminUser {
            username: username.to_string(),
            password_hash: hash_password(USER_PASSWORD).unwrap(),
            first_name: Some("Test".to_string()),
            last_name: Some(username.to_string()),
            email: Some(format!("{username}@test.com")),
            phone: None,
            role_id: role.id,
            state_id: None,
            city_id: None,
            created_by: None,
        },
    )
    .await
    .unwrap();
    user.id
}

/// Log in through the API and return the access token.
pub async fn login_for_token(pool: &PgPool, username: &str, password: &str) -> String {
    let app = build_test_app(pool.clone());
    let body = serde_json::json!({ "username": username, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK, "login for {username} failed");
    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

/// Bootstrap the `superadmin` account and return its access token.
pub async fn super_admin_token(pool: &PgPool) -> String {
    ensure_super_admin(pool, Some(SUPERADMIN_PASSWORD))
        .await
        .unwrap();
    login_for_token(pool, SUPERADMIN_USERNAME, SUPERADMIN_PASSWORD).await
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, Some(token)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), Some(token)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body), Some(token)).await
}

pub async fn put_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, None, Some(token)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, Some(token)).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a training through the API. Returns its id.
pub async fn create_training(pool: &PgPool, token: &str) -> DbId {
    let app = build_test_app(pool.clone());
    let body = serde_json::json!({
        "name": "Forklift Operation",
        "skill_category": "Logistics",
        "duration_days": 10,
    });
    let response = post_json_auth(app, "/api/v1/training/masters", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a ten-day batch starting ten days from now. Returns its id.
pub async fn create_batch(
    pool: &PgPool,
    token: &str,
    training_id: DbId,
    code: &str,
    capacity: i32,
) -> DbId {
    let start = Utc::now().date_naive() + Duration::days(10);
    let app = build_test_app(pool.clone());
    let body = serde_json::json!({
        "training_id": training_id,
        "batch_code": code,
        "start_date": start,
        "end_date": start + Duration::days(9),
        "max_capacity": capacity,
    });
    let response = post_json_auth(app, "/api/v1/training/batches", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Onboard a candidate through the public endpoint. Returns the workflow id.
pub async fn onboard(pool: &PgPool, first_name: &str) -> DbId {
    let app = build_test_app(pool.clone());
    let body = serde_json::json!({
        "first_name": first_name,
        "last_name": "Candidate",
        "email": format!("{}@example.com", first_name.to_lowercase()),
        "city": "Pune",
        "state": "Maharashtra",
        "skills": ["Driving"],
    });
    let response = post_json(app, "/api/v1/candidates/onboard", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    json["workflow_id"].as_i64().unwrap()
}

/// Drive a fresh workflow through screening and orientation, then enroll it.
pub async fn enroll_new_candidate(pool: &PgPool, token: &str, first_name: &str, batch_id: DbId) {
    let workflow_id = onboard(pool, first_name).await;
    let steps = [
        (
            "/api/v1/screening/complete-screening",
            serde_json::json!({ "workflow_id": workflow_id, "approved": true }),
        ),
        (
            "/api/v1/screening/complete-orientation",
            serde_json::json!({ "workflow_id": workflow_id, "completed": true }),
        ),
        (
            "/api/v1/screening/enroll",
            serde_json::json!({ "workflow_id": workflow_id, "batch_id": batch_id }),
        ),
    ];
    for (uri, body) in steps {
        let app = build_test_app(pool.clone());
        let response = put_json_auth(app, uri, body, token).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri} failed");
    }
}
