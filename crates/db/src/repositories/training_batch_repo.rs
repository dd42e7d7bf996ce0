//! Repository for the `training_batches` table.
//!
//! `current_enrolled` only moves through [`TrainingBatchRepo::try_reserve_seat`]
//! and [`TrainingBatchRepo::release_seat`], both guarded so the row never
//! leaves `0..=max_capacity`.

use pathway_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::training::{
    BatchTotals, CalendarFilter, CreateTrainingBatch, TrainingBatch, TrainingBatchView,
    UpdateTrainingBatch,
};

const COLUMNS: &str = "id, training_id, batch_code, start_date, end_date, max_capacity, \
                        current_enrolled, location, trainer_name, is_active, created_at, updated_at";

const VIEW_SELECT: &str = "SELECT b.id, b.training_id, t.name AS training_name, b.batch_code, \
            b.start_date, b.end_date, b.max_capacity, b.current_enrolled, \
            (b.max_capacity - b.current_enrolled) AS available_slots, \
            (b.current_enrolled < b.max_capacity) AS has_capacity, \
            b.location, b.trainer_name, b.is_active, b.created_at, b.updated_at \
     FROM training_batches b \
     JOIN training_masters t ON t.id = b.training_id";

pub struct TrainingBatchRepo;

impl TrainingBatchRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateTrainingBatch,
    ) -> Result<TrainingBatch, sqlx::Error> {
        let query = format!(
            "INSERT INTO training_batches
                (training_id, batch_code, start_date, end_date, max_capacity,
                 location, trainer_name, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TrainingBatch>(&query)
            .bind(input.training_id)
            .bind(&input.batch_code)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.max_capacity)
            .bind(&input.location)
            .bind(&input.trainer_name)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TrainingBatch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM training_batches WHERE id = $1");
        sqlx::query_as::<_, TrainingBatch>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_view(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TrainingBatchView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE b.id = $1");
        sqlx::query_as::<_, TrainingBatchView>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All batches, latest start first.
    pub async fn list(pool: &PgPool) -> Result<Vec<TrainingBatchView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} ORDER BY b.start_date DESC, b.id DESC");
        sqlx::query_as::<_, TrainingBatchView>(&query).fetch_all(pool).await
    }

    /// Active batches with free seats that have not ended by `today`.
    pub async fn list_available(
        pool: &PgPool,
        today: Date,
    ) -> Result<Vec<TrainingBatchView>, sqlx::Error> {
        let query = format!(
            "{VIEW_SELECT}
             WHERE b.is_active = true
               AND b.current_enrolled < b.max_capacity
               AND b.end_date >= $1
             ORDER BY b.start_date ASC, b.id ASC"
        );
        sqlx::query_as::<_, TrainingBatchView>(&query)
            .bind(today)
            .fetch_all(pool)
            .await
    }

    /// Active batches starting on or after `today`.
    pub async fn list_upcoming(
        pool: &PgPool,
        today: Date,
    ) -> Result<Vec<TrainingBatchView>, sqlx::Error> {
        let query = format!(
            "{VIEW_SELECT}
             WHERE b.is_active = true AND b.start_date >= $1
             ORDER BY b.start_date ASC, b.id ASC"
        );
        sqlx::query_as::<_, TrainingBatchView>(&query)
            .bind(today)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_training(
        pool: &PgPool,
        training_id: DbId,
    ) -> Result<Vec<TrainingBatchView>, sqlx::Error> {
        let query = format!(
            "{VIEW_SELECT} WHERE b.training_id = $1 ORDER BY b.start_date DESC, b.id DESC"
        );
        sqlx::query_as::<_, TrainingBatchView>(&query)
            .bind(training_id)
            .fetch_all(pool)
            .await
    }

    /// Batches overlapping the filter window, earliest start first.
    pub async fn list_calendar(
        pool: &PgPool,
        filter: &CalendarFilter,
    ) -> Result<Vec<TrainingBatchView>, sqlx::Error> {
        let query = format!(
            "{VIEW_SELECT}
             WHERE ($1::DATE IS NULL OR b.end_date >= $1)
               AND ($2::DATE IS NULL OR b.start_date <= $2)
               AND ($3::BIGINT IS NULL OR b.training_id = $3)
               AND ($4 = false OR b.is_active = true)
             ORDER BY b.start_date ASC, b.id ASC"
        );
        sqlx::query_as::<_, TrainingBatchView>(&query)
            .bind(filter.from)
            .bind(filter.to)
            .bind(filter.training_id)
            .bind(filter.active_only)
            .fetch_all(pool)
            .await
    }

    /// Seat and schedule totals over active batches, relative to `today`.
    pub async fn totals(pool: &PgPool, today: Date) -> Result<BatchTotals, sqlx::Error> {
        sqlx::query_as::<_, BatchTotals>(
            "SELECT COUNT(*) AS total_active_batches,
                    COUNT(*) FILTER (WHERE start_date > $1) AS upcoming_batches,
                    COUNT(*) FILTER (WHERE start_date <= $1 AND end_date >= $1) AS ongoing_batches,
                    COALESCE(SUM(max_capacity), 0)::BIGINT AS total_capacity,
                    COALESCE(SUM(current_enrolled), 0)::BIGINT AS total_enrolled
             FROM training_batches
             WHERE is_active = true",
        )
        .bind(today)
        .fetch_one(pool)
        .await
    }

    /// Case-insensitive batch code clash check, optionally ignoring one row.
    pub async fn code_exists(
        pool: &PgPool,
        batch_code: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM training_batches
                WHERE LOWER(batch_code) = LOWER($1) AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(batch_code)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// Apply a partial update.
    ///
    /// A capacity below the current enrolment matches no row and returns
    /// `None`; callers validate first so this only triggers under a race.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTrainingBatch,
    ) -> Result<Option<TrainingBatch>, sqlx::Error> {
        let query = format!(
            "UPDATE training_batches SET
                training_id = COALESCE($2, training_id),
                batch_code = COALESCE($3, batch_code),
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date),
                max_capacity = COALESCE($6, max_capacity),
                location = COALESCE($7, location),
                trainer_name = COALESCE($8, trainer_name),
                is_active = COALESCE($9, is_active)
             WHERE id = $1 AND ($6::INTEGER IS NULL OR $6 >= current_enrolled)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TrainingBatch>(&query)
            .bind(id)
            .bind(input.training_id)
            .bind(&input.batch_code)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.max_capacity)
            .bind(&input.location)
            .bind(&input.trainer_name)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn toggle_active(pool: &PgPool, id: DbId) -> Result<Option<TrainingBatch>, sqlx::Error> {
        let query = format!(
            "UPDATE training_batches SET is_active = NOT is_active WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TrainingBatch>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a batch with no enrolled candidates. Returns `false` when the
    /// row is missing or occupied.
    pub async fn delete_if_empty(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM training_batches WHERE id = $1 AND current_enrolled = 0")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Seat accounting
    // -----------------------------------------------------------------------

    /// Load and row-lock a batch for the rest of the transaction.
    pub async fn lock(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<Option<TrainingBatch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM training_batches WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, TrainingBatch>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Take one seat if any remain. Returns `false` when the batch is full.
    pub async fn try_reserve_seat(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE training_batches SET current_enrolled = current_enrolled + 1
             WHERE id = $1 AND current_enrolled < max_capacity",
        )
        .bind(id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Give back one seat. Returns `false` when nothing is enrolled.
    ///
    /// No request path withdraws a candidate yet; this keeps the guard in
    /// place for when one does.
    pub async fn release_seat(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE training_batches SET current_enrolled = current_enrolled - 1
             WHERE id = $1 AND current_enrolled > 0",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
