//! Repository for the `candidates` table.

use pathway_core::types::DbId;
use sqlx::PgPool;

use crate::models::candidate::{Candidate, CandidateStats, CreateCandidate, UpdateCandidate};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, middle_name, last_name, email, phone_number, date_of_birth, \
                        gender, address_line1, city, state, pincode, aadhar_number, pan_number, \
                        status, onboarding_status, engagement_score, dropout_risk_score, \
                        created_at, updated_at";

pub struct CandidateRepo;

impl CandidateRepo {
    /// Insert a candidate within an existing transaction.
    pub async fn create(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &CreateCandidate,
    ) -> Result<Candidate, sqlx::Error> {
        let query = format!(
            "INSERT INTO candidates
                (first_name, middle_name, last_name, email, phone_number, date_of_birth, gender,
                 address_line1, city, state, pincode, onboarding_status,
                 engagement_score, dropout_risk_score)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Candidate>(&query)
            .bind(&input.first_name)
            .bind(&input.middle_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone_number)
            .bind(input.date_of_birth)
            .bind(&input.gender)
            .bind(&input.address_line1)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.pincode)
            .bind(&input.onboarding_status)
            .bind(input.engagement_score)
            .bind(input.dropout_risk_score)
            .fetch_one(&mut **tx)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Candidate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM candidates WHERE id = $1");
        sqlx::query_as::<_, Candidate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lock a candidate row for the rest of the transaction.
    pub async fn lock(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<Option<Candidate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM candidates WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Candidate>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Look up a candidate by email (case-insensitive) or exact phone number,
    /// locking the row for the rest of the transaction.
    pub async fn find_by_contact_for_update(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        email: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<Option<Candidate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM candidates
             WHERE ($1::TEXT IS NOT NULL AND LOWER(email) = LOWER($1))
                OR ($2::TEXT IS NOT NULL AND phone_number = $2)
             LIMIT 1
             FOR UPDATE"
        );
        sqlx::query_as::<_, Candidate>(&query)
            .bind(email)
            .bind(phone_number)
            .fetch_optional(&mut **tx)
            .await
    }

    /// List all candidates, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Candidate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM candidates ORDER BY created_at DESC");
        sqlx::query_as::<_, Candidate>(&query).fetch_all(pool).await
    }

    pub async fn list_by_status(pool: &PgPool, status: &str) -> Result<Vec<Candidate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM candidates WHERE status = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Candidate>(&query)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Candidates whose dropout risk is at or above `threshold`, riskiest first.
    pub async fn list_at_risk(pool: &PgPool, threshold: f64) -> Result<Vec<Candidate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM candidates
             WHERE dropout_risk_score >= $1
             ORDER BY dropout_risk_score DESC, created_at DESC"
        );
        sqlx::query_as::<_, Candidate>(&query)
            .bind(threshold)
            .fetch_all(pool)
            .await
    }

    /// Filter by city and/or state name (case-insensitive). `None` matches all.
    pub async fn list_by_location(
        pool: &PgPool,
        city: Option<&str>,
        state: Option<&str>,
    ) -> Result<Vec<Candidate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM candidates
             WHERE ($1::TEXT IS NULL OR LOWER(city) = LOWER($1))
               AND ($2::TEXT IS NULL OR LOWER(state) = LOWER($2))
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Candidate>(&query)
            .bind(city)
            .bind(state)
            .fetch_all(pool)
            .await
    }

    pub async fn stats(
        pool: &PgPool,
        active_status: &str,
        risk_threshold: f64,
    ) -> Result<CandidateStats, sqlx::Error> {
        sqlx::query_as::<_, CandidateStats>(
            "SELECT COUNT(*) AS total_candidates,
                    COUNT(*) FILTER (WHERE status = $1) AS active_candidates,
                    COUNT(*) FILTER (WHERE dropout_risk_score >= $2) AS at_risk_candidates
             FROM candidates",
        )
        .bind(active_status)
        .bind(risk_threshold)
        .fetch_one(pool)
        .await
    }

    /// Update a candidate. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCandidate,
    ) -> Result<Option<Candidate>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let candidate = Self::update_in_tx(&mut tx, id, input).await?;
        tx.commit().await?;
        Ok(candidate)
    }

    /// [`CandidateRepo::update`] within an existing transaction.
    pub async fn update_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        input: &UpdateCandidate,
    ) -> Result<Option<Candidate>, sqlx::Error> {
        let query = format!(
            "UPDATE candidates SET
                first_name = COALESCE($2, first_name),
                middle_name = COALESCE($3, middle_name),
                last_name = COALESCE($4, last_name),
                email = COALESCE($5, email),
                phone_number = COALESCE($6, phone_number),
                date_of_birth = COALESCE($7, date_of_birth),
                gender = COALESCE($8, gender),
                address_line1 = COALESCE($9, address_line1),
                city = COALESCE($10, city),
                state = COALESCE($11, state),
                pincode = COALESCE($12, pincode),
                aadhar_number = COALESCE($13, aadhar_number),
                pan_number = COALESCE($14, pan_number),
                status = COALESCE($15, status),
                onboarding_status = COALESCE($16, onboarding_status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Candidate>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.middle_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone_number)
            .bind(input.date_of_birth)
            .bind(&input.gender)
            .bind(&input.address_line1)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.pincode)
            .bind(&input.aadhar_number)
            .bind(&input.pan_number)
            .bind(&input.status)
            .bind(&input.onboarding_status)
            .fetch_optional(&mut **tx)
            .await
    }
}
