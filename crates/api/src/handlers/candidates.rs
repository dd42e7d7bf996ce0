//! Handlers for the `/candidates` resource.
//!
//! Reads require `ONBOARDING_VIEW`. `POST /candidates/onboard` is the public
//! single-form intake that creates a complete candidate in one transaction.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pathway_core::roles::PERM_ONBOARDING_VIEW;
use pathway_core::scoring::DEFAULT_RISK_THRESHOLD;
use pathway_core::signup::{non_blank, parse_score, CANDIDATE_ACTIVE, ONBOARDING_INCOMPLETE};
use pathway_core::types::{Date, DbId};
use pathway_db::models::candidate::{
    Candidate, CandidateDetail, CandidateStats, CreateCandidate, NamedProficiency,
    UpdateCandidate, UpsertEducationDetails, UpsertPersonalDetails,
};
use pathway_db::repositories::{CandidateRepo, ProfileRepo, WorkflowRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Proficiency recorded for skills submitted through the single-form intake.
const DEFAULT_PROFICIENCY: &str = "INTERMEDIATE";

/// Employment status recorded for candidates onboarded through the intake.
const DEFAULT_EMPLOYMENT_STATUS: &str = "UNEMPLOYED";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AtRiskParams {
    pub threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct LocationParams {
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Request body for `POST /candidates/onboard`.
#[derive(Debug, Deserialize, Validate)]
pub struct OnboardRequest {
    #[validate(length(min = 1, max = 100, message = "is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "is required"))]
    pub last_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone_number: Option<String>,
    pub date_of_birth: Option<Date>,
    pub gender: Option<String>,
    pub address_line1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[validate(length(max = 10))]
    pub pincode: Option<String>,
    pub aadhar_number: Option<String>,
    pub pan_number: Option<String>,
    pub bank_account_number: Option<String>,
    pub tenth_board: Option<String>,
    pub tenth_score: Option<String>,
    pub twelfth_board: Option<String>,
    pub twelfth_score: Option<String>,
    pub graduation_degree: Option<String>,
    pub graduation_specialization: Option<String>,
    pub graduation_score: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct OnboardResponse {
    pub success: bool,
    pub message: String,
    pub candidate_id: DbId,
    pub workflow_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/candidates
pub async fn list_candidates(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Candidate>>>> {
    auth.require_permission(PERM_ONBOARDING_VIEW)?;
    let candidates = CandidateRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: candidates }))
}

/// GET /api/v1/candidates/{id}
///
/// The candidate together with every detail row it owns.
pub async fn get_candidate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CandidateDetail>>> {
    auth.require_permission(PERM_ONBOARDING_VIEW)?;
    let candidate = CandidateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Candidate", id))?;

    let (personal_details, education_details, skills, languages, progress) = tokio::try_join!(
        ProfileRepo::find_personal(&state.pool, id),
        ProfileRepo::find_education(&state.pool, id),
        ProfileRepo::list_skills(&state.pool, id),
        ProfileRepo::list_languages(&state.pool, id),
        ProfileRepo::find_progress(&state.pool, id),
    )?;

    Ok(Json(DataResponse {
        data: CandidateDetail {
            candidate,
            personal_details,
            education_details,
            skills,
            languages,
            progress,
        },
    }))
}

/// GET /api/v1/candidates/active
pub async fn list_active(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Candidate>>>> {
    auth.require_permission(PERM_ONBOARDING_VIEW)?;
    let candidates = CandidateRepo::list_by_status(&state.pool, CANDIDATE_ACTIVE).await?;
    Ok(Json(DataResponse { data: candidates }))
}

/// GET /api/v1/candidates/at-risk?threshold=
pub async fn list_at_risk(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<AtRiskParams>,
) -> AppResult<Json<DataResponse<Vec<Candidate>>>> {
    auth.require_permission(PERM_ONBOARDING_VIEW)?;
    let threshold = params.threshold.unwrap_or(DEFAULT_RISK_THRESHOLD);
    let candidates = CandidateRepo::list_at_risk(&state.pool, threshold).await?;
    Ok(Json(DataResponse { data: candidates }))
}

/// GET /api/v1/candidates/by-location?city=&state=
pub async fn list_by_location(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<LocationParams>,
) -> AppResult<Json<DataResponse<Vec<Candidate>>>> {
    auth.require_permission(PERM_ONBOARDING_VIEW)?;
    let candidates = CandidateRepo::list_by_location(
        &state.pool,
        non_blank(params.city.as_deref()),
        non_blank(params.state.as_deref()),
    )
    .await?;
    Ok(Json(DataResponse { data: candidates }))
}

/// GET /api/v1/candidates/stats
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<CandidateStats>>> {
    auth.require_permission(PERM_ONBOARDING_VIEW)?;
    let stats =
        CandidateRepo::stats(&state.pool, CANDIDATE_ACTIVE, DEFAULT_RISK_THRESHOLD).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// POST /api/v1/candidates/onboard
///
/// Public intake. Candidate, personal and education rows, skills, languages
/// and the workflow are written in one transaction.
pub async fn onboard(
    State(state): State<AppState>,
    Json(input): Json<OnboardRequest>,
) -> AppResult<(StatusCode, Json<OnboardResponse>)> {
    input.validate()?;

    let mut tx = state.pool.begin().await?;

    let candidate = CandidateRepo::create(
        &mut tx,
        &CreateCandidate {
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email: input.email.clone(),
            phone_number: input.phone_number.clone(),
            date_of_birth: input.date_of_birth,
            gender: input.gender.clone(),
            address_line1: input.address_line1.clone(),
            city: input.city.clone(),
            state: input.state.clone(),
            pincode: input.pincode.clone(),
            onboarding_status: ONBOARDING_INCOMPLETE.to_string(),
            engagement_score: state.scoring.engagement_score(),
            dropout_risk_score: state.scoring.dropout_risk_score(),
            ..Default::default()
        },
    )
    .await?;

    if input.aadhar_number.is_some() || input.pan_number.is_some() {
        CandidateRepo::update_in_tx(
            &mut tx,
            candidate.id,
            &UpdateCandidate {
                aadhar_number: input.aadhar_number.clone(),
                pan_number: input.pan_number.clone(),
                ..Default::default()
            },
        )
        .await?;
    }

    ProfileRepo::upsert_personal(
        &mut tx,
        candidate.id,
        &UpsertPersonalDetails {
            employment_status: Some(DEFAULT_EMPLOYMENT_STATUS.to_string()),
            bank_account_number: input.bank_account_number.clone(),
            ..Default::default()
        },
    )
    .await?;

    if input.tenth_board.is_some() || input.graduation_degree.is_some() {
        let certifications = (!input.certifications.is_empty())
            .then(|| input.certifications.join(", "));
        ProfileRepo::upsert_education(
            &mut tx,
            candidate.id,
            &UpsertEducationDetails {
                tenth_board: input.tenth_board.clone(),
                tenth_percentage: score(candidate.id, "tenth_score", &input.tenth_score),
                twelfth_board: input.twelfth_board.clone(),
                twelfth_percentage: score(candidate.id, "twelfth_score", &input.twelfth_score),
                graduation_degree: input.graduation_degree.clone(),
                graduation_specialization: input.graduation_specialization.clone(),
                graduation_percentage: score(
                    candidate.id,
                    "graduation_score",
                    &input.graduation_score,
                ),
                certifications,
                ..Default::default()
            },
        )
        .await?;
    }

    ProfileRepo::replace_skills(&mut tx, candidate.id, &with_default_level(&input.skills)).await?;
    ProfileRepo::replace_languages(&mut tx, candidate.id, &with_default_level(&input.languages))
        .await?;

    let workflow = WorkflowRepo::ensure_for_candidate_in_tx(&mut tx, candidate.id).await?;
    tx.commit().await?;

    tracing::info!(
        candidate_id = candidate.id,
        workflow_id = workflow.id,
        skills = input.skills.len(),
        "Candidate onboarded",
    );

    Ok((
        StatusCode::CREATED,
        Json(OnboardResponse {
            success: true,
            message: format!(
                "Candidate {} onboarded successfully",
                candidate.full_name()
            ),
            candidate_id: candidate.id,
            workflow_id: workflow.id,
            first_name: candidate.first_name,
            last_name: candidate.last_name,
            email: candidate.email,
        }),
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn with_default_level(names: &[String]) -> Vec<NamedProficiency> {
    names
        .iter()
        .filter_map(|n| non_blank(Some(n.as_str())))
        .map(|n| NamedProficiency {
            name: n.trim().to_string(),
            proficiency_level: Some(DEFAULT_PROFICIENCY.to_string()),
        })
        .collect()
}

/// Parse a free-text score, logging and dropping values that do not parse.
pub(crate) fn score(candidate_id: DbId, field: &str, raw: &Option<String>) -> Option<f64> {
    let raw = non_blank(raw.as_deref())?;
    let parsed = parse_score(raw);
    if parsed.is_none() {
        tracing::warn!(candidate_id, field, value = raw, "Ignoring unparseable score");
    }
    parsed
}
