//! Handlers for the `/roles` resource (roles and their permissions).

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pathway_core::error::CoreError;
use pathway_core::roles::{
    is_protected_role, PERM_PERMISSION_MANAGE, PERM_PERMISSION_VIEW, PERM_ROLE_MANAGE, PERM_ROLE_VIEW,
};
use pathway_core::types::DbId;
use pathway_db::models::role::{Permission, PermissionGroup, Role, RoleWithPermissions};
use pathway_db::repositories::{AdminUserRepo, PermissionRepo, RoleRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, max = 50, message = "must be 1 to 50 characters"))]
    pub name: String,
    #[validate(length(max = 255))]
    pub description: Option<String>,
    #[serde(default)]
    pub permission_codes: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    #[validate(length(max = 255))]
    pub description: Option<String>,
    pub permission_codes: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct SetPermissionsRequest {
    pub permission_codes: Vec<String>,
}

// ---------------------------------------------------------------------------
// Role handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/roles
pub async fn list_roles(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Role>>>> {
    auth.require_permission(PERM_ROLE_VIEW)?;
    let roles = RoleRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: roles }))
}

/// GET /api/v1/roles/active
pub async fn list_active_roles(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Role>>>> {
    auth.require_permission(PERM_ROLE_VIEW)?;
    let roles = RoleRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: roles }))
}

/// GET /api/v1/roles/{id}
pub async fn get_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RoleWithPermissions>>> {
    auth.require_permission(PERM_ROLE_VIEW)?;
    let role = load_role(&state, id).await?;
    let data = with_permissions(&state, role).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/roles
pub async fn create_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateRoleRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<RoleWithPermissions>>)> {
    auth.require_permission(PERM_ROLE_MANAGE)?;
    if !input.permission_codes.is_empty() {
        auth.require_permission(PERM_PERMISSION_MANAGE)?;
    }
    input.validate()?;

    let name = input.name.trim().to_uppercase();
    if RoleRepo::find_by_name(&state.pool, &name).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Role '{name}' already exists"
        ))));
    }

    let permission_ids = resolve_codes(&state, &input.permission_codes).await?;
    let role = RoleRepo::create(
        &state.pool,
        &name,
        input.description.as_deref(),
        &permission_ids,
    )
    .await?;

    tracing::info!(role_id = role.id, role = %role.name, "Role created");
    let data = with_permissions(&state, role).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// PUT /api/v1/roles/{id}
pub async fn update_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRoleRequest>,
) -> AppResult<Json<DataResponse<RoleWithPermissions>>> {
    auth.require_permission(PERM_ROLE_MANAGE)?;
    if input.permission_codes.is_some() {
        auth.require_permission(PERM_PERMISSION_MANAGE)?;
    }
    input.validate()?;

    let permission_ids = match input.permission_codes.as_deref() {
        Some(codes) => Some(resolve_codes(&state, codes).await?),
        None => None,
    };
    let role = RoleRepo::update(
        &state.pool,
        id,
        input.description.as_deref(),
        permission_ids.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::not_found("Role", id))?;

    let data = with_permissions(&state, role).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/roles/{id}/permissions
///
/// Replace the role's permission set. Unknown codes are rejected.
pub async fn set_permissions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<SetPermissionsRequest>,
) -> AppResult<Json<DataResponse<RoleWithPermissions>>> {
    auth.require_permission(PERM_PERMISSION_MANAGE)?;
    let role = load_role(&state, id).await?;
    let permission_ids = resolve_codes(&state, &input.permission_codes).await?;
    RoleRepo::set_permissions(&state.pool, id, &permission_ids).await?;

    tracing::info!(role_id = id, count = permission_ids.len(), "Role permissions replaced");
    let data = with_permissions(&state, role).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/roles/{id}/toggle-active
pub async fn toggle_active(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Role>>> {
    auth.require_permission(PERM_ROLE_MANAGE)?;
    let role = load_role(&state, id).await?;
    if is_protected_role(&role.name) {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Role {} cannot be deactivated",
            role.name
        ))));
    }
    let role = RoleRepo::toggle_active(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Role", id))?;
    Ok(Json(DataResponse { data: role }))
}

/// DELETE /api/v1/roles/{id}
pub async fn delete_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    auth.require_permission(PERM_ROLE_MANAGE)?;
    let role = load_role(&state, id).await?;
    if is_protected_role(&role.name) {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Role {} cannot be deleted",
            role.name
        ))));
    }

    let assigned = AdminUserRepo::count_by_role(&state.pool, id).await?;
    if assigned > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Role {} is assigned to {assigned} user(s)",
            role.name
        ))));
    }

    RoleRepo::delete(&state.pool, id).await?;
    tracing::info!(role_id = id, role = %role.name, "Role deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Permission handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/roles/permissions
pub async fn list_permissions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Permission>>>> {
    auth.require_permission(PERM_PERMISSION_VIEW)?;
    let permissions = PermissionRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: permissions }))
}

/// GET /api/v1/roles/permissions/active
pub async fn list_active_permissions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Permission>>>> {
    auth.require_permission(PERM_PERMISSION_VIEW)?;
    let permissions = PermissionRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: permissions }))
}

/// GET /api/v1/roles/permissions/grouped
pub async fn grouped_permissions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<PermissionGroup>>>> {
    auth.require_permission(PERM_PERMISSION_VIEW)?;
    let permissions = PermissionRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse {
        data: group_by_module(permissions),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_role(state: &AppState, id: DbId) -> AppResult<Role> {
    RoleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Role", id))
}

async fn with_permissions(state: &AppState, role: Role) -> AppResult<RoleWithPermissions> {
    let permissions = RoleRepo::permissions_for_role(&state.pool, role.id).await?;
    Ok(RoleWithPermissions { role, permissions })
}

/// Map permission codes to ids, rejecting any code that does not exist.
async fn resolve_codes(state: &AppState, codes: &[String]) -> AppResult<Vec<DbId>> {
    if codes.is_empty() {
        return Ok(Vec::new());
    }
    let found = PermissionRepo::find_by_codes(&state.pool, codes).await?;
    let unknown: Vec<&str> = codes
        .iter()
        .filter(|code| !found.iter().any(|p| &p.code == *code))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown permission codes: {}",
            unknown.join(", ")
        ))));
    }
    Ok(found.into_iter().map(|p| p.id).collect())
}

/// Bucket permissions by module, modules in name order.
fn group_by_module(permissions: Vec<Permission>) -> Vec<PermissionGroup> {
    let mut modules: BTreeMap<String, Vec<Permission>> = BTreeMap::new();
    for permission in permissions {
        modules
            .entry(permission.module.clone())
            .or_default()
            .push(permission);
    }
    modules
        .into_iter()
        .map(|(module, permissions)| PermissionGroup {
            module,
            permissions,
        })
        .collect()
}
