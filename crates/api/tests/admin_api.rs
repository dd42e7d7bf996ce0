//! HTTP-level tests for locations, admin users and roles.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_admin, delete_auth, get_auth, login_for_token, post_json_auth, put_auth,
    put_json_auth, super_admin_token, USER_PASSWORD,
};
use pathway_core::roles::ROLE_CITY_ADMIN;
use pathway_db::repositories::RoleRepo;
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create(pool: &PgPool, uri: &str, body: Value, token: &str) -> (StatusCode, Value) {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, uri, body, token).await;
    let status = response.status();
    (status, body_json(response).await)
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn state_codes_are_normalized_and_unique(pool: PgPool) {
    let token = super_admin_token(&pool).await;

    let body = json!({ "code": " mh ", "name": "Maharashtra" });
    let (status, json) = create(&pool, "/api/v1/locations/states", body, &token).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["code"], "MH");
    assert_eq!(json["data"]["city_count"], 0);

    let body = json!({ "code": "MH", "name": "Another" });
    let (status, _) = create(&pool, "/api/v1/locations/states", body, &token).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/locations/states/code/mh", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "Maharashtra");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn state_with_cities_cannot_be_deleted(pool: PgPool) {
    let token = super_admin_token(&pool).await;
    let body = json!({ "code": "KA", "name": "Karnataka" });
    let (_, json) = create(&pool, "/api/v1/locations/states", body, &token).await;
    let state_id = json["data"]["id"].as_i64().unwrap();

    let body = json!({ "name": "Mysuru", "state_id": state_id, "pincode": "570001" });
    let (status, json) = create(&pool, "/api/v1/locations/cities", body, &token).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["state_name"], "Karnataka");

    let body = json!({ "name": "Hubli", "state_id": state_id, "pincode": "58A" });
    let (status, _) = create(&pool, "/api/v1/locations/cities", body, &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/locations/states/{state_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/locations/states/{state_id}/cities"), &token).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Admin users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_user_lifecycle(pool: PgPool) {
    let token = super_admin_token(&pool).await;
    let role = RoleRepo::find_by_name(&pool, ROLE_CITY_ADMIN).await.unwrap().unwrap();

    let body = json!({
        "username": "city.ops",
        "password": "strong-password-1",
        "email": "ops@example.com",
        "role_id": role.id,
    });
    let (status, json) = create(&pool, "/api/v1/admin/users", body.clone(), &token).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["role_name"], ROLE_CITY_ADMIN);
    assert!(json["data"].get("password_hash").is_none());
    let user_id = json["data"]["id"].as_i64().unwrap();

    let (status, json) = create(&pool, "/api/v1/admin/users", body, &token).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");

    let app = common::build_test_app(pool.clone());
    let response = put_auth(app, &format!("/api/v1/admin/users/{user_id}/toggle-active"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_active"], false);

    let app = common::build_test_app(pool);
    let body = json!({ "username": "city.ops", "password": "strong-password-1" });
    let response = common::post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_user_with_unknown_role_is_404(pool: PgPool) {
    let token = super_admin_token(&pool).await;
    let body = json!({ "username": "ghost.role", "password": "strong-password-1", "role_id": 9999 });
    let (status, _) = create(&pool, "/api/v1/admin/users", body, &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn seeded_roles_and_permissions_are_listed(pool: PgPool) {
    let token = super_admin_token(&pool).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/roles", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let names: Vec<String> = body_json(response).await["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect();
    assert!(names.iter().any(|n| n == "SUPER_ADMIN"));
    assert!(names.iter().any(|n| n == "VIEWER"));

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/roles/permissions", &token).await;
    assert!(!body_json(response).await["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn granting_permissions_needs_permission_manage(pool: PgPool) {
    let token = super_admin_token(&pool).await;
    let body = json!({
        "name": "role_editor",
        "description": "Edits roles",
        "permission_codes": ["ROLE_VIEW", "ROLE_MANAGE"],
    });
    let (status, json) = create(&pool, "/api/v1/roles", body, &token).await;
    assert_eq!(status, StatusCode::CREATED);
    let role_id = json["data"]["id"].as_i64().unwrap();

    create_admin(&pool, "role.editor", "ROLE_EDITOR").await;
    let editor = login_for_token(&pool, "role.editor", USER_PASSWORD).await;

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/roles/{role_id}");
    let response = put_json_auth(app, &uri, json!({ "description": "Renamed" }), &editor).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let body = json!({ "permission_codes": ["ADMIN_MANAGE"] });
    let response = put_json_auth(app, &uri, body, &editor).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let body = json!({ "permission_codes": ["ADMIN_MANAGE"] });
    let response = put_json_auth(app, &format!("{uri}/permissions"), body.clone(), &editor).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");

    let app = common::build_test_app(pool);
    let response = put_json_auth(app, &format!("{uri}/permissions"), body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let granted: Vec<&str> = json["data"]["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["code"].as_str().unwrap())
        .collect();
    assert_eq!(granted, vec!["ADMIN_MANAGE"]);
}
