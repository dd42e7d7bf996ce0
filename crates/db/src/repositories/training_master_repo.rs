//! Repository for the `training_masters` table.

use pathway_core::types::DbId;
use sqlx::PgPool;

use crate::models::training::{
    CreateTrainingMaster, TrainingMaster, TrainingMasterView, UpdateTrainingMaster,
};

const COLUMNS: &str =
    "id, name, description, skill_category, duration_days, is_active, created_at, updated_at";

const VIEW_SELECT: &str = "SELECT t.id, t.name, t.description, t.skill_category, t.duration_days, \
            t.is_active, \
            (SELECT COUNT(*) FROM training_batches b WHERE b.training_id = t.id) AS total_batches, \
            (SELECT COUNT(*) FROM training_batches b \
              WHERE b.training_id = t.id AND b.is_active = true) AS active_batches, \
            t.created_at, t.updated_at \
     FROM training_masters t";

pub struct TrainingMasterRepo;

impl TrainingMasterRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateTrainingMaster,
    ) -> Result<TrainingMaster, sqlx::Error> {
        let query = format!(
            "INSERT INTO training_masters (name, description, skill_category, duration_days, is_active)
             VALUES ($1, $2, $3, $4, COALESCE($5, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TrainingMaster>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.skill_category)
            .bind(input.duration_days)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TrainingMaster>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM training_masters WHERE id = $1");
        sqlx::query_as::<_, TrainingMaster>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_view(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TrainingMasterView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE t.id = $1");
        sqlx::query_as::<_, TrainingMasterView>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All trainings, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<TrainingMasterView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} ORDER BY t.created_at DESC, t.id DESC");
        sqlx::query_as::<_, TrainingMasterView>(&query).fetch_all(pool).await
    }

    /// Active trainings by name.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<TrainingMasterView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE t.is_active = true ORDER BY t.name ASC");
        sqlx::query_as::<_, TrainingMasterView>(&query).fetch_all(pool).await
    }

    /// Case-insensitive name clash check, optionally ignoring one row.
    pub async fn name_exists(
        pool: &PgPool,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM training_masters
                WHERE LOWER(name) = LOWER($1) AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    pub async fn skill_categories(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT DISTINCT skill_category FROM training_masters
             WHERE skill_category IS NOT NULL
             ORDER BY skill_category ASC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTrainingMaster,
    ) -> Result<Option<TrainingMaster>, sqlx::Error> {
        let query = format!(
            "UPDATE training_masters SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                skill_category = COALESCE($4, skill_category),
                duration_days = COALESCE($5, duration_days),
                is_active = COALESCE($6, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TrainingMaster>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.skill_category)
            .bind(input.duration_days)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn toggle_active(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TrainingMaster>, sqlx::Error> {
        let query = format!(
            "UPDATE training_masters SET is_active = NOT is_active WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TrainingMaster>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn count_batches(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM training_batches WHERE training_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM training_masters WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
