//! Repository for the `admin_users` table.

use pathway_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::admin::{AdminUser, AdminUserView, CreateAdminUser, UpdateAdminUser};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, password_hash, first_name, last_name, email, phone, \
                        role_id, state_id, city_id, is_active, last_login, failed_login_count, \
                        locked_until, created_by, created_at, updated_at";

const VIEW_SELECT: &str = "SELECT u.id, u.username, u.first_name, u.last_name, u.email, u.phone, \
            u.role_id, r.name AS role_name, u.state_id, s.name AS state_name, \
            u.city_id, c.name AS city_name, u.is_active, u.last_login, u.created_by, \
            u.created_at, u.updated_at \
     FROM admin_users u \
     JOIN roles r ON r.id = u.role_id \
     LEFT JOIN states s ON s.id = u.state_id \
     LEFT JOIN cities c ON c.id = u.city_id";

/// Provides CRUD and login bookkeeping for admin users.
pub struct AdminUserRepo;

impl AdminUserRepo {
    /// Insert a new admin user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAdminUser) -> Result<AdminUser, sqlx::Error> {
        let query = format!(
            "INSERT INTO admin_users
                (username, password_hash, first_name, last_name, email, phone,
                 role_id, state_id, city_id, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdminUser>(&query)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.role_id)
            .bind(input.state_id)
            .bind(input.city_id)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AdminUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admin_users WHERE id = $1");
        sqlx::query_as::<_, AdminUser>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<AdminUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admin_users WHERE username = $1");
        sqlx::query_as::<_, AdminUser>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_view(pool: &PgPool, id: DbId) -> Result<Option<AdminUserView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE u.id = $1");
        sqlx::query_as::<_, AdminUserView>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all admin users, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<AdminUserView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} ORDER BY u.created_at DESC");
        sqlx::query_as::<_, AdminUserView>(&query).fetch_all(pool).await
    }

    pub async fn list_by_state(
        pool: &PgPool,
        state_id: DbId,
    ) -> Result<Vec<AdminUserView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE u.state_id = $1 ORDER BY u.created_at DESC");
        sqlx::query_as::<_, AdminUserView>(&query)
            .bind(state_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_city(
        pool: &PgPool,
        city_id: DbId,
    ) -> Result<Vec<AdminUserView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE u.city_id = $1 ORDER BY u.created_at DESC");
        sqlx::query_as::<_, AdminUserView>(&query)
            .bind(city_id)
            .fetch_all(pool)
            .await
    }

    /// Update an admin user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAdminUser,
    ) -> Result<Option<AdminUser>, sqlx::Error> {
        let query = format!(
            "UPDATE admin_users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                role_id = COALESCE($6, role_id),
                state_id = COALESCE($7, state_id),
                city_id = COALESCE($8, city_id),
                is_active = COALESCE($9, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdminUser>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.role_id)
            .bind(input.state_id)
            .bind(input.city_id)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Flip `is_active`, returning the updated row.
    pub async fn toggle_active(pool: &PgPool, id: DbId) -> Result<Option<AdminUser>, sqlx::Error> {
        let query = format!(
            "UPDATE admin_users SET is_active = NOT is_active WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdminUser>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM admin_users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of users assigned to a role.
    pub async fn count_by_role(pool: &PgPool, role_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM admin_users WHERE role_id = $1")
            .bind(role_id)
            .fetch_one(pool)
            .await
    }

    /// Increment the failed login counter, returning the new count.
    pub async fn increment_failed_login(pool: &PgPool, id: DbId) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE admin_users SET failed_login_count = failed_login_count + 1
             WHERE id = $1
             RETURNING failed_login_count",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Lock a user account until the specified timestamp.
    pub async fn lock_account(pool: &PgPool, id: DbId, until: Timestamp) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE admin_users SET locked_until = $2 WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Reset the failure counter, clear any lock and stamp `last_login`.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE admin_users SET
                failed_login_count = 0,
                locked_until = NULL,
                last_login = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Replace a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE admin_users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
