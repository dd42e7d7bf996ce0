//! First-run provisioning of the `superadmin` account.

use pathway_core::roles::ROLE_SUPER_ADMIN;
use pathway_db::models::admin::CreateAdminUser;
use pathway_db::repositories::{AdminUserRepo, RoleRepo};
use sqlx::PgPool;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};

pub const SUPERADMIN_USERNAME: &str = "superadmin";

/// Create the `superadmin` user when a password is configured and the
/// account does not exist yet. Returns whether a user was created.
pub async fn ensure_super_admin(pool: &PgPool, password: Option<&str>) -> AppResult<bool> {
    let Some(password) = password.filter(|p| !p.is_empty()) else {
        tracing::debug!("SUPERADMIN_PASSWORD not set, skipping super admin bootstrap");
        return Ok(false);
    };

    if AdminUserRepo::find_by_username(pool, SUPERADMIN_USERNAME)
        .await?
        .is_some()
    {
        return Ok(false);
    }

    validate_password_strength(password)?;

    let role = RoleRepo::find_by_name(pool, ROLE_SUPER_ADMIN)
        .await?
        .ok_or_else(|| {
            AppError::InternalError(format!("Seed role {ROLE_SUPER_ADMIN} is missing"))
        })?;

    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = AdminUserRepo::create(
        pool,
        &CreateAdminUser {
            username: SUPERADMIN_USERNAME.to_string(),
            password_hash,
            first_name: Some("Super".to_string()),
            last_name: Some("Admin".to_string()),
            email: None,
            phone: None,
            role_id: role.id,
            state_id: None,
            city_id: None,
            created_by: None,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Super admin account created");
    Ok(true)
}
