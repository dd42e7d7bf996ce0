//! Handlers for the `/onboarding` questionnaire.

use axum::extract::{Path, State};
use axum::Json;
use pathway_core::signup::ONBOARDING_COMPLETED;
use pathway_core::types::DbId;
use pathway_db::models::candidate::{ProgressFlag, UpdateCandidate};
use pathway_db::models::question::{CandidateAnswer, OnboardingQuestion, UpsertAnswer};
use pathway_db::repositories::{AnswerRepo, CandidateRepo, ProfileRepo, QuestionRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitAnswersRequest {
    pub candidate_id: DbId,
    pub answers: Vec<UpsertAnswer>,
}

/// GET /api/v1/onboarding/questions
pub async fn list_questions(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<OnboardingQuestion>>>> {
    let questions = QuestionRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: questions }))
}

/// GET /api/v1/onboarding/questions/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let categories = QuestionRepo::categories(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/onboarding/questions/category/{category}
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<Json<DataResponse<Vec<OnboardingQuestion>>>> {
    let questions = QuestionRepo::list_by_category(&state.pool, &category).await?;
    Ok(Json(DataResponse { data: questions }))
}

/// GET /api/v1/onboarding/answers/{candidate_id}
pub async fn list_answers(
    State(state): State<AppState>,
    Path(candidate_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<CandidateAnswer>>>> {
    CandidateRepo::find_by_id(&state.pool, candidate_id)
        .await?
        .ok_or_else(|| AppError::not_found("Candidate", candidate_id))?;
    let answers = AnswerRepo::list_for_candidate(&state.pool, candidate_id).await?;
    Ok(Json(DataResponse { data: answers }))
}

/// POST /api/v1/onboarding/answers
///
/// Upsert one answer per question and mark the questionnaire complete.
pub async fn submit_answers(
    State(state): State<AppState>,
    Json(input): Json<SubmitAnswersRequest>,
) -> AppResult<Json<DataResponse<Vec<CandidateAnswer>>>> {
    let candidate_id = input.candidate_id;

    let question_ids: Vec<DbId> = input.answers.iter().map(|a| a.question_id).collect();
    let known = QuestionRepo::existing_ids(&state.pool, &question_ids).await?;
    if let Some(missing) = question_ids.iter().find(|id| !known.contains(id)) {
        return Err(AppError::not_found("OnboardingQuestion", *missing));
    }

    let mut tx = state.pool.begin().await?;
    CandidateRepo::lock(&mut tx, candidate_id)
        .await?
        .ok_or_else(|| AppError::not_found("Candidate", candidate_id))?;

    for answer in &input.answers {
        AnswerRepo::upsert(&mut tx, candidate_id, answer).await?;
    }
    CandidateRepo::update_in_tx(
        &mut tx,
        candidate_id,
        &UpdateCandidate {
            onboarding_status: Some(ONBOARDING_COMPLETED.to_string()),
            ..Default::default()
        },
    )
    .await?;
    ProfileRepo::mark_step(&mut tx, candidate_id, ProgressFlag::Questions, "questions").await?;
    tx.commit().await?;

    tracing::info!(candidate_id, answers = input.answers.len(), "Onboarding answers saved");
    let answers = AnswerRepo::list_for_candidate(&state.pool, candidate_id).await?;
    Ok(Json(DataResponse { data: answers }))
}
