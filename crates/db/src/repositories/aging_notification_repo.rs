//! Repository for the `onboarding_aging_notifications` table.

use pathway_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::notification::{
    AgingCandidate, AgingNotification, CreateAgingNotification, LabelCount,
};

const COLUMNS: &str = "id, candidate_id, candidate_name, phone_number, onboarding_status, \
                        days_since_created, aging_level, aging_color, message, is_read, \
                        is_dismissed, created_at, updated_at";

pub struct AgingNotificationRepo;

impl AgingNotificationRepo {
    /// Every candidate, in id order, with the fields the scan classifies.
    pub async fn scan_candidates(pool: &PgPool) -> Result<Vec<AgingCandidate>, sqlx::Error> {
        sqlx::query_as::<_, AgingCandidate>(
            "SELECT id, first_name, last_name, phone_number, onboarding_status, created_at
             FROM candidates
             ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Insert unless a live notification already exists for the same
    /// candidate and level. Returns `true` when a row was written.
    pub async fn insert_if_absent(
        pool: &PgPool,
        input: &CreateAgingNotification,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO onboarding_aging_notifications
                (candidate_id, candidate_name, phone_number, onboarding_status,
                 days_since_created, aging_level, aging_color, message)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (candidate_id, aging_level) WHERE NOT is_dismissed DO NOTHING",
        )
        .bind(input.candidate_id)
        .bind(&input.candidate_name)
        .bind(&input.phone_number)
        .bind(&input.onboarding_status)
        .bind(input.days_since_created)
        .bind(&input.aging_level)
        .bind(&input.aging_color)
        .bind(&input.message)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Non-dismissed notifications, RED before AMBER before the rest, oldest
    /// candidates first within a colour.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<AgingNotification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM onboarding_aging_notifications
             WHERE is_dismissed = false
             ORDER BY CASE aging_color WHEN 'RED' THEN 1 WHEN 'AMBER' THEN 2 ELSE 3 END,
                      days_since_created DESC, id DESC"
        );
        sqlx::query_as::<_, AgingNotification>(&query).fetch_all(pool).await
    }

    pub async fn list_by_color(
        pool: &PgPool,
        color: &str,
    ) -> Result<Vec<AgingNotification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM onboarding_aging_notifications
             WHERE is_dismissed = false AND aging_color = $1
             ORDER BY days_since_created DESC, id DESC"
        );
        sqlx::query_as::<_, AgingNotification>(&query)
            .bind(color)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_status(
        pool: &PgPool,
        onboarding_status: &str,
    ) -> Result<Vec<AgingNotification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM onboarding_aging_notifications
             WHERE is_dismissed = false AND onboarding_status = $1
             ORDER BY days_since_created DESC, id DESC"
        );
        sqlx::query_as::<_, AgingNotification>(&query)
            .bind(onboarding_status)
            .fetch_all(pool)
            .await
    }

    pub async fn unread_count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM onboarding_aging_notifications
             WHERE is_dismissed = false AND is_read = false",
        )
        .fetch_one(pool)
        .await
    }

    pub async fn active_count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM onboarding_aging_notifications WHERE is_dismissed = false",
        )
        .fetch_one(pool)
        .await
    }

    /// Live notification counts per colour.
    pub async fn count_by_color(pool: &PgPool) -> Result<Vec<LabelCount>, sqlx::Error> {
        sqlx::query_as::<_, LabelCount>(
            "SELECT aging_color AS label, COUNT(*) AS count
             FROM onboarding_aging_notifications
             WHERE is_dismissed = false
             GROUP BY aging_color",
        )
        .fetch_all(pool)
        .await
    }

    /// Live notification counts per onboarding status.
    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<LabelCount>, sqlx::Error> {
        sqlx::query_as::<_, LabelCount>(
            "SELECT COALESCE(onboarding_status, 'UNKNOWN') AS label, COUNT(*) AS count
             FROM onboarding_aging_notifications
             WHERE is_dismissed = false
             GROUP BY COALESCE(onboarding_status, 'UNKNOWN')",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn mark_read(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AgingNotification>, sqlx::Error> {
        let query = format!(
            "UPDATE onboarding_aging_notifications SET is_read = true
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AgingNotification>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Mark every unread live notification read, returning how many changed.
    pub async fn mark_all_read(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE onboarding_aging_notifications SET is_read = true
             WHERE is_dismissed = false AND is_read = false",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn dismiss(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AgingNotification>, sqlx::Error> {
        let query = format!(
            "UPDATE onboarding_aging_notifications SET is_dismissed = true
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AgingNotification>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete dismissed notifications last touched before `cutoff`.
    pub async fn purge_dismissed_before(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM onboarding_aging_notifications
             WHERE is_dismissed = true AND updated_at < $1",
        )
        .bind(cutoff)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
