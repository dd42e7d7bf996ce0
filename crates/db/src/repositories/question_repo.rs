//! Repository for onboarding questions and candidate answers.

use pathway_core::types::DbId;
use sqlx::PgPool;

use crate::models::question::{CandidateAnswer, OnboardingQuestion, UpsertAnswer};

const COLUMNS: &str = "id, question_text, question_type, question_category, description, options, \
                        is_mandatory, is_active, display_order, help_text, placeholder_text, \
                        created_at, updated_at";

pub struct QuestionRepo;

impl QuestionRepo {
    /// Active questions in display order.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<OnboardingQuestion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM onboarding_questions
             WHERE is_active = true
             ORDER BY display_order ASC, id ASC"
        );
        sqlx::query_as::<_, OnboardingQuestion>(&query).fetch_all(pool).await
    }

    pub async fn list_by_category(
        pool: &PgPool,
        category: &str,
    ) -> Result<Vec<OnboardingQuestion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM onboarding_questions
             WHERE is_active = true AND question_category = $1
             ORDER BY display_order ASC, id ASC"
        );
        sqlx::query_as::<_, OnboardingQuestion>(&query)
            .bind(category)
            .fetch_all(pool)
            .await
    }

    /// Distinct categories of active questions.
    pub async fn categories(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT DISTINCT question_category FROM onboarding_questions
             WHERE is_active = true AND question_category IS NOT NULL
             ORDER BY question_category ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// The subset of `ids` that exist.
    pub async fn existing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM onboarding_questions WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}

pub struct AnswerRepo;

impl AnswerRepo {
    pub async fn list_for_candidate(
        pool: &PgPool,
        candidate_id: DbId,
    ) -> Result<Vec<CandidateAnswer>, sqlx::Error> {
        sqlx::query_as::<_, CandidateAnswer>(
            "SELECT a.id, a.candidate_id, a.question_id, q.question_text, a.answer_text,
                    a.answer_array, a.rating_score, a.created_at, a.updated_at
             FROM candidate_answers a
             JOIN onboarding_questions q ON q.id = a.question_id
             WHERE a.candidate_id = $1
             ORDER BY q.display_order ASC, q.id ASC",
        )
        .bind(candidate_id)
        .fetch_all(pool)
        .await
    }

    /// One answer per (candidate, question); a resubmission overwrites.
    pub async fn upsert(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        candidate_id: DbId,
        answer: &UpsertAnswer,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO candidate_answers
                (candidate_id, question_id, answer_text, answer_array, rating_score)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (candidate_id, question_id) DO UPDATE SET
                answer_text = EXCLUDED.answer_text,
                answer_array = EXCLUDED.answer_array,
                rating_score = EXCLUDED.rating_score",
        )
        .bind(candidate_id)
        .bind(answer.question_id)
        .bind(&answer.answer_text)
        .bind(&answer.answer_array)
        .bind(answer.rating_score)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
