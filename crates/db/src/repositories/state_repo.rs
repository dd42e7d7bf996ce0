//! Repository for the `states` table.

use pathway_core::types::DbId;
use sqlx::PgPool;

use crate::models::location::{CreateState, State, StateView, UpdateState};

const COLUMNS: &str = "id, code, name, is_active, created_at, updated_at";

/// View columns, selected from `states s`.
const VIEW_COLUMNS: &str = "s.id, s.code, s.name, s.is_active, \
     (SELECT COUNT(*) FROM cities c WHERE c.state_id = s.id) AS city_count, \
     s.created_at, s.updated_at";

pub struct StateRepo;

impl StateRepo {
    /// Insert a state. `code` must already be normalised.
    pub async fn create(pool: &PgPool, input: &CreateState) -> Result<State, sqlx::Error> {
        let query = format!(
            "INSERT INTO states (code, name, is_active)
             VALUES ($1, $2, COALESCE($3, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, State>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<StateView>, sqlx::Error> {
        let query = format!("SELECT {VIEW_COLUMNS} FROM states s WHERE s.id = $1");
        sqlx::query_as::<_, StateView>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Case-insensitive lookup by code.
    pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<StateView>, sqlx::Error> {
        let query = format!("SELECT {VIEW_COLUMNS} FROM states s WHERE UPPER(s.code) = UPPER($1)");
        sqlx::query_as::<_, StateView>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// All states by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<StateView>, sqlx::Error> {
        let query = format!("SELECT {VIEW_COLUMNS} FROM states s ORDER BY s.name ASC");
        sqlx::query_as::<_, StateView>(&query).fetch_all(pool).await
    }

    pub async fn list_active(pool: &PgPool) -> Result<Vec<StateView>, sqlx::Error> {
        let query = format!(
            "SELECT {VIEW_COLUMNS} FROM states s WHERE s.is_active = true ORDER BY s.name ASC"
        );
        sqlx::query_as::<_, StateView>(&query).fetch_all(pool).await
    }

    /// Substring match on name or code.
    pub async fn search(pool: &PgPool, term: &str) -> Result<Vec<StateView>, sqlx::Error> {
        let query = format!(
            "SELECT {VIEW_COLUMNS} FROM states s
             WHERE s.name ILIKE '%' || $1 || '%' OR s.code ILIKE '%' || $1 || '%'
             ORDER BY s.name ASC"
        );
        sqlx::query_as::<_, StateView>(&query)
            .bind(term)
            .fetch_all(pool)
            .await
    }

    /// Whether another state (excluding `exclude_id`) already uses the code or name.
    pub async fn exists_code_or_name(
        pool: &PgPool,
        code: Option<&str>,
        name: Option<&str>,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM states
                WHERE (UPPER(code) = UPPER($1) OR LOWER(name) = LOWER($2))
                  AND ($3::BIGINT IS NULL OR id <> $3)
             )",
        )
        .bind(code)
        .bind(name)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateState,
    ) -> Result<Option<State>, sqlx::Error> {
        let query = format!(
            "UPDATE states SET
                code = COALESCE($2, code),
                name = COALESCE($3, name),
                is_active = COALESCE($4, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, State>(&query)
            .bind(id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn count_cities(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM cities WHERE state_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM states WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
