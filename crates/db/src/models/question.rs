//! Onboarding questionnaire models.

use pathway_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `onboarding_questions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OnboardingQuestion {
    pub id: DbId,
    pub question_text: String,
    pub question_type: String,
    pub question_category: Option<String>,
    pub description: Option<String>,
    pub options: Option<serde_json::Value>,
    pub is_mandatory: bool,
    pub is_active: bool,
    pub display_order: i32,
    pub help_text: Option<String>,
    pub placeholder_text: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from `candidate_answers` joined with the question text.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CandidateAnswer {
    pub id: DbId,
    pub candidate_id: DbId,
    pub question_id: DbId,
    pub question_text: String,
    pub answer_text: Option<String>,
    pub answer_array: Option<serde_json::Value>,
    pub rating_score: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One submitted answer.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertAnswer {
    pub question_id: DbId,
    pub answer_text: Option<String>,
    pub answer_array: Option<serde_json::Value>,
    pub rating_score: Option<i32>,
}
