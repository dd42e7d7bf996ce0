//! Repository for `roles`, `permissions` and their join table.

use pathway_core::types::DbId;
use sqlx::PgPool;

use crate::models::role::{Permission, Role};

const COLUMNS: &str = "id, name, description, is_active, created_at, updated_at";

const PERMISSION_COLUMNS: &str =
    "p.id, p.code, p.name, p.description, p.module, p.is_active, p.created_at, p.updated_at";

/// Provides CRUD for roles and their permission sets.
pub struct RoleRepo;

impl RoleRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE id = $1");
        sqlx::query_as::<_, Role>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a role by name (case-sensitive).
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE name = $1");
        sqlx::query_as::<_, Role>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all roles ordered by ID ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles ORDER BY id ASC");
        sqlx::query_as::<_, Role>(&query).fetch_all(pool).await
    }

    pub async fn list_active(pool: &PgPool) -> Result<Vec<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE is_active = true ORDER BY id ASC");
        sqlx::query_as::<_, Role>(&query).fetch_all(pool).await
    }

    /// Insert a role and attach the given permissions in one transaction.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        description: Option<&str>,
        permission_ids: &[DbId],
    ) -> Result<Role, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "INSERT INTO roles (name, description) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let role = sqlx::query_as::<_, Role>(&query)
            .bind(name)
            .bind(description)
            .fetch_one(&mut *tx)
            .await?;
        Self::set_permissions_inner(&mut tx, role.id, permission_ids).await?;
        tx.commit().await?;
        Ok(role)
    }

    /// Update the description and, when given, replace the permission set.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        description: Option<&str>,
        permission_ids: Option<&[DbId]>,
    ) -> Result<Option<Role>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "UPDATE roles SET description = COALESCE($2, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let role = sqlx::query_as::<_, Role>(&query)
            .bind(id)
            .bind(description)
            .fetch_optional(&mut *tx)
            .await?;
        if role.is_some() {
            if let Some(ids) = permission_ids {
                Self::set_permissions_inner(&mut tx, id, ids).await?;
            }
        }
        tx.commit().await?;
        Ok(role)
    }

    /// Replace a role's permission set.
    pub async fn set_permissions(
        pool: &PgPool,
        role_id: DbId,
        permission_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::set_permissions_inner(&mut tx, role_id, permission_ids).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn toggle_active(pool: &PgPool, id: DbId) -> Result<Option<Role>, sqlx::Error> {
        let query = format!(
            "UPDATE roles SET is_active = NOT is_active WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Role>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permissions attached to a role, by code.
    pub async fn permissions_for_role(
        pool: &PgPool,
        role_id: DbId,
    ) -> Result<Vec<Permission>, sqlx::Error> {
        let query = format!(
            "SELECT {PERMISSION_COLUMNS} FROM permissions p
             JOIN role_permissions rp ON rp.permission_id = p.id
             WHERE rp.role_id = $1
             ORDER BY p.code ASC"
        );
        sqlx::query_as::<_, Permission>(&query)
            .bind(role_id)
            .fetch_all(pool)
            .await
    }

    /// Active permission codes granted to a role. Used to build JWT claims.
    pub async fn permission_codes(pool: &PgPool, role_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT p.code FROM permissions p
             JOIN role_permissions rp ON rp.permission_id = p.id
             WHERE rp.role_id = $1 AND p.is_active = true
             ORDER BY p.code ASC",
        )
        .bind(role_id)
        .fetch_all(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn set_permissions_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        role_id: DbId,
        permission_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(role_id)
            .execute(&mut **tx)
            .await?;
        sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING",
        )
        .bind(role_id)
        .bind(permission_ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

/// Read access to the `permissions` table.
pub struct PermissionRepo;

impl PermissionRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<Permission>, sqlx::Error> {
        let query = format!("SELECT {PERMISSION_COLUMNS} FROM permissions p ORDER BY p.module, p.code");
        sqlx::query_as::<_, Permission>(&query).fetch_all(pool).await
    }

    pub async fn list_active(pool: &PgPool) -> Result<Vec<Permission>, sqlx::Error> {
        let query = format!(
            "SELECT {PERMISSION_COLUMNS} FROM permissions p
             WHERE p.is_active = true
             ORDER BY p.module, p.code"
        );
        sqlx::query_as::<_, Permission>(&query).fetch_all(pool).await
    }

    /// Resolve permission codes to rows. Unknown codes are simply absent.
    pub async fn find_by_codes(
        pool: &PgPool,
        codes: &[String],
    ) -> Result<Vec<Permission>, sqlx::Error> {
        let query = format!(
            "SELECT {PERMISSION_COLUMNS} FROM permissions p WHERE p.code = ANY($1) ORDER BY p.code"
        );
        sqlx::query_as::<_, Permission>(&query)
            .bind(codes)
            .fetch_all(pool)
            .await
    }
}
