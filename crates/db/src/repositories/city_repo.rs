//! Repository for the `cities` table.

use pathway_core::types::DbId;
use sqlx::PgPool;

use crate::models::location::{City, CityView, CreateCity, UpdateCity};

const COLUMNS: &str = "id, name, state_id, pincode, is_active, created_at, updated_at";

const VIEW_SELECT: &str = "SELECT c.id, c.name, c.state_id, s.name AS state_name, s.code AS state_code, \
            c.pincode, c.is_active, c.created_at, c.updated_at \
     FROM cities c JOIN states s ON s.id = c.state_id";

pub struct CityRepo;

impl CityRepo {
    pub async fn create(pool: &PgPool, input: &CreateCity) -> Result<City, sqlx::Error> {
        let query = format!(
            "INSERT INTO cities (name, state_id, pincode, is_active)
             VALUES ($1, $2, $3, COALESCE($4, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, City>(&query)
            .bind(&input.name)
            .bind(input.state_id)
            .bind(&input.pincode)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CityView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE c.id = $1");
        sqlx::query_as::<_, CityView>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<CityView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} ORDER BY c.name ASC");
        sqlx::query_as::<_, CityView>(&query).fetch_all(pool).await
    }

    pub async fn list_active(pool: &PgPool) -> Result<Vec<CityView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE c.is_active = true ORDER BY c.name ASC");
        sqlx::query_as::<_, CityView>(&query).fetch_all(pool).await
    }

    /// Cities of one state, optionally only the active ones.
    pub async fn list_by_state(
        pool: &PgPool,
        state_id: DbId,
        active_only: bool,
    ) -> Result<Vec<CityView>, sqlx::Error> {
        let query = format!(
            "{VIEW_SELECT} WHERE c.state_id = $1 AND ($2 = false OR c.is_active = true)
             ORDER BY c.name ASC"
        );
        sqlx::query_as::<_, CityView>(&query)
            .bind(state_id)
            .bind(active_only)
            .fetch_all(pool)
            .await
    }

    pub async fn search(pool: &PgPool, term: &str) -> Result<Vec<CityView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE c.name ILIKE '%' || $1 || '%' ORDER BY c.name ASC");
        sqlx::query_as::<_, CityView>(&query)
            .bind(term)
            .fetch_all(pool)
            .await
    }

    /// Whether the state already has a city with this name (case-insensitive).
    pub async fn exists_in_state(
        pool: &PgPool,
        name: &str,
        state_id: DbId,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM cities
                WHERE LOWER(name) = LOWER($1) AND state_id = $2
                  AND ($3::BIGINT IS NULL OR id <> $3)
             )",
        )
        .bind(name)
        .bind(state_id)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCity,
    ) -> Result<Option<City>, sqlx::Error> {
        let query = format!(
            "UPDATE cities SET
                name = COALESCE($2, name),
                state_id = COALESCE($3, state_id),
                pincode = COALESCE($4, pincode),
                is_active = COALESCE($5, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, City>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.state_id)
            .bind(&input.pincode)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cities WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
