//! Handlers for the `/admin` resource (admin user management).
//!
//! Reads require `ADMIN_VIEW`, writes require `ADMIN_MANAGE`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pathway_core::error::CoreError;
use pathway_core::roles::{PERM_ADMIN_MANAGE, PERM_ADMIN_VIEW};
use pathway_core::types::DbId;
use pathway_db::models::admin::{AdminUserView, CreateAdminUser, UpdateAdminUser};
use pathway_db::repositories::{AdminUserRepo, CityRepo, RoleRepo, StateRepo};
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAdminRequest {
    #[validate(length(min = 3, max = 50, message = "must be 3 to 50 characters"))]
    pub username: String,
    pub password: String,
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub role_id: DbId,
    pub state_id: Option<DbId>,
    pub city_id: Option<DbId>,
}

/// Request body for `PUT /admin/users/{id}`. Absent fields are unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAdminRequest {
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub role_id: Option<DbId>,
    pub state_id: Option<DbId>,
    pub city_id: Option<DbId>,
    pub is_active: Option<bool>,
    /// New password, re-hashed when present.
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateAdminRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AdminUserView>>)> {
    auth.require_permission(PERM_ADMIN_MANAGE)?;
    input.validate()?;
    validate_password_strength(&input.password)?;

    ensure_references(&state, Some(input.role_id), input.state_id, input.city_id).await?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = AdminUserRepo::create(
        &state.pool,
        &CreateAdminUser {
            username: input.username.trim().to_string(),
            password_hash,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            role_id: input.role_id,
            state_id: input.state_id,
            city_id: input.city_id,
            created_by: Some(auth.user_id),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, created_by = auth.user_id, "Admin user created");
    let view = load_view(&state, user.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<AdminUserView>>>> {
    auth.require_permission(PERM_ADMIN_VIEW)?;
    let users = AdminUserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AdminUserView>>> {
    auth.require_permission(PERM_ADMIN_VIEW)?;
    let view = load_view(&state, id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// GET /api/v1/admin/users/state/{state_id}
pub async fn list_by_state(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(state_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AdminUserView>>>> {
    auth.require_permission(PERM_ADMIN_VIEW)?;
    let users = AdminUserRepo::list_by_state(&state.pool, state_id).await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/admin/users/city/{city_id}
pub async fn list_by_city(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(city_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AdminUserView>>>> {
    auth.require_permission(PERM_ADMIN_VIEW)?;
    let users = AdminUserRepo::list_by_city(&state.pool, city_id).await?;
    Ok(Json(DataResponse { data: users }))
}

/// PUT /api/v1/admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAdminRequest>,
) -> AppResult<Json<DataResponse<AdminUserView>>> {
    auth.require_permission(PERM_ADMIN_MANAGE)?;
    input.validate()?;
    if let Some(password) = input.password.as_deref() {
        validate_password_strength(password)?;
    }
    ensure_references(&state, input.role_id, input.state_id, input.city_id).await?;

    let update = UpdateAdminUser {
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email,
        phone: input.phone,
        role_id: input.role_id,
        state_id: input.state_id,
        city_id: input.city_id,
        is_active: input.is_active,
    };
    AdminUserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| AppError::not_found("AdminUser", id))?;

    if let Some(password) = input.password.as_deref() {
        let hash = hash_password(password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
        AdminUserRepo::update_password(&state.pool, id, &hash).await?;
        tracing::info!(user_id = id, updated_by = auth.user_id, "Admin password changed");
    }

    let view = load_view(&state, id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// PUT /api/v1/admin/users/{id}/toggle-active
pub async fn toggle_active(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AdminUserView>>> {
    auth.require_permission(PERM_ADMIN_MANAGE)?;
    if id == auth.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot deactivate your own account".into(),
        )));
    }
    let user = AdminUserRepo::toggle_active(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("AdminUser", id))?;
    tracing::info!(user_id = id, is_active = user.is_active, "Admin user toggled");
    let view = load_view(&state, id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/v1/admin/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    auth.require_permission(PERM_ADMIN_MANAGE)?;
    if id == auth.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot delete your own account".into(),
        )));
    }
    if !AdminUserRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("AdminUser", id));
    }
    tracing::info!(user_id = id, deleted_by = auth.user_id, "Admin user deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_view(state: &AppState, id: DbId) -> AppResult<AdminUserView> {
    AdminUserRepo::find_view(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("AdminUser", id))
}

/// 404 for any referenced role, state or city that does not exist.
async fn ensure_references(
    state: &AppState,
    role_id: Option<DbId>,
    state_id: Option<DbId>,
    city_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(role_id) = role_id {
        RoleRepo::find_by_id(&state.pool, role_id)
            .await?
            .ok_or_else(|| AppError::not_found("Role", role_id))?;
    }
    if let Some(state_id) = state_id {
        StateRepo::find_by_id(&state.pool, state_id)
            .await?
            .ok_or_else(|| AppError::not_found("State", state_id))?;
    }
    if let Some(city_id) = city_id {
        CityRepo::find_by_id(&state.pool, city_id)
            .await?
            .ok_or_else(|| AppError::not_found("City", city_id))?;
    }
    Ok(())
}
