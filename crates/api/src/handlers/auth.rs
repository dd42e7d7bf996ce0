//! Handlers for the `/auth` resource (login, refresh, logout, validate).

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use chrono::{Duration, Utc};
use pathway_core::error::CoreError;
use pathway_core::types::{DbId, Timestamp};
use pathway_db::models::admin::AdminUser;
use pathway_db::models::session::CreateSession;
use pathway_db::repositories::{AdminUserRepo, RoleRepo, SessionRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_access_token, hash_refresh_token, RefreshToken};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Consecutive failures that lock an account.
const MAX_FAILED_ATTEMPTS: i32 = 5;
const LOCK_DURATION_MINS: i64 = 15;
const MAX_USER_AGENT_LEN: usize = 255;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds until `access_token` expires.
    pub expires_in: i64,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: String,
    pub state_id: Option<DbId>,
    pub state_name: Option<String>,
    pub city_id: Option<DbId>,
    pub city_name: Option<String>,
    pub permissions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub user_id: DbId,
    pub role: String,
    pub permissions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Unknown users and wrong passwords get the same 401. Deactivated or
/// locked accounts get 403 before the password is checked.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = AdminUserRepo::find_by_username(&state.pool, input.username.trim())
        .await?
        .ok_or_else(invalid_credentials)?;
    ensure_may_sign_in(&user, Utc::now())?;

    let password_ok = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_ok {
        let failures = AdminUserRepo::increment_failed_login(&state.pool, user.id).await?;
        if let Some(until) = lockout_after(failures, Utc::now()) {
            AdminUserRepo::lock_account(&state.pool, user.id, until).await?;
            tracing::warn!(user_id = user.id, failures, %until, "Account locked");
        }
        return Err(invalid_credentials());
    }

    AdminUserRepo::record_successful_login(&state.pool, user.id).await?;
    let response = start_session(&state, &user, user_agent(&headers)).await?;
    tracing::info!(user_id = user.id, role = %response.user.role, "Admin logged in");
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// The presented refresh token is spent; the response carries its
/// replacement.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let session = SessionRepo::consume(&state.pool, &hash_refresh_token(&input.refresh_token))
        .await?
        .ok_or_else(|| unauthorized("Invalid or expired refresh token"))?;

    let user = AdminUserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| unauthorized("User no longer exists"))?;
    if !user.is_active {
        return Err(forbidden("Account is deactivated"));
    }

    let response = start_session(&state, &user, user_agent(&headers)).await?;
    tracing::debug!(user_id = user.id, session_id = session.id, "Refresh token rotated");
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revokes every refresh session of the caller.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, revoked, "Admin logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/validate
pub async fn validate(auth: AuthUser) -> Json<ValidateResponse> {
    Json(ValidateResponse {
        valid: true,
        user_id: auth.user_id,
        role: auth.role,
        permissions: auth.permissions,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_credentials() -> AppError {
    unauthorized("Invalid username or password")
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.to_string()))
}

fn forbidden(msg: &str) -> AppError {
    AppError::Core(CoreError::Forbidden(msg.to_string()))
}

fn ensure_may_sign_in(user: &AdminUser, now: Timestamp) -> AppResult<()> {
    if !user.is_active {
        return Err(forbidden("Account is deactivated"));
    }
    match user.locked_until {
        Some(until) if until > now => Err(forbidden(
            "Account is temporarily locked. Try again later.",
        )),
        _ => Ok(()),
    }
}

/// Lock expiry to set after the `failures`-th consecutive bad password.
fn lockout_after(failures: i32, now: Timestamp) -> Option<Timestamp> {
    (failures >= MAX_FAILED_ATTEMPTS).then(|| now + Duration::minutes(LOCK_DURATION_MINS))
}

fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|ua| ua.chars().take(MAX_USER_AGENT_LEN).collect())
}

/// Mint an access token and a persisted refresh session for `user`.
async fn start_session(
    state: &AppState,
    user: &AdminUser,
    user_agent: Option<String>,
) -> AppResult<AuthResponse> {
    let view = AdminUserRepo::find_view(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::not_found("AdminUser", user.id))?;
    let permissions = RoleRepo::permission_codes(&state.pool, user.role_id).await?;
    let jwt = &state.config.jwt;

    let access_token = generate_access_token(user.id, &view.role_name, &permissions, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let refresh = RefreshToken::generate();
    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh.hash,
            expires_at: Utc::now() + jwt.refresh_ttl(),
            user_agent,
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh.plaintext,
        expires_in: jwt.access_ttl().num_seconds(),
        user: UserInfo {
            id: view.id,
            username: view.username,
            first_name: view.first_name,
            last_name: view.last_name,
            email: view.email,
            role: view.role_name,
            state_id: view.state_id,
            state_name: view.state_name,
            city_id: view.city_id,
            city_name: view.city_name,
            permissions,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifth_failure_locks_for_fifteen_minutes() {
        let now = Utc::now();
        assert_eq!(lockout_after(4, now), None);
        assert_eq!(lockout_after(5, now), Some(now + Duration::minutes(15)));
        assert_eq!(lockout_after(9, now), Some(now + Duration::minutes(15)));
    }

    #[test]
    fn long_user_agent_is_truncated() {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, "x".repeat(400).parse().unwrap());
        assert_eq!(user_agent(&headers).unwrap().len(), MAX_USER_AGENT_LEN);
        assert_eq!(user_agent(&HeaderMap::new()), None);
    }
}
