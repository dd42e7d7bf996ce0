//! Repository for the `otp_verifications` table.

use pathway_core::types::DbId;
use sqlx::PgPool;

use crate::models::otp::{CreateOtp, OtpVerification};

const COLUMNS: &str = "id, contact, contact_type, otp_code, is_verified, attempts, max_attempts, \
                        expires_at, verified_at, created_at, updated_at";

pub struct OtpRepo;

impl OtpRepo {
    /// Drop any outstanding unverified codes for the contact and store a new one.
    pub async fn replace(pool: &PgPool, input: &CreateOtp) -> Result<OtpVerification, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM otp_verifications WHERE contact = $1 AND is_verified = false")
            .bind(&input.contact)
            .execute(&mut *tx)
            .await?;
        let query = format!(
            "INSERT INTO otp_verifications (contact, contact_type, otp_code, max_attempts, expires_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let otp = sqlx::query_as::<_, OtpVerification>(&query)
            .bind(&input.contact)
            .bind(&input.contact_type)
            .bind(&input.otp_code)
            .bind(input.max_attempts)
            .bind(input.expires_at)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(otp)
    }

    /// Newest unverified code for the contact.
    pub async fn latest_unverified(
        pool: &PgPool,
        contact: &str,
    ) -> Result<Option<OtpVerification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM otp_verifications
             WHERE contact = $1 AND is_verified = false
             ORDER BY created_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, OtpVerification>(&query)
            .bind(contact)
            .fetch_optional(pool)
            .await
    }

    pub async fn increment_attempts(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE otp_verifications SET attempts = attempts + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Mark a code verified. Returns `false` if it was already used.
    pub async fn mark_verified(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE otp_verifications SET is_verified = true, verified_at = NOW()
             WHERE id = $1 AND is_verified = false",
        )
        .bind(id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
