//! Handlers for the `/screening` resource: workflow queues, stage
//! completions and enrollment.
//!
//! Reads require `SCREENING_VIEW`, mutations `SCREENING_MANAGE`. The acting
//! admin is the `X-Admin-User-Id` header when present, else the token subject.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pathway_core::roles::{PERM_SCREENING_MANAGE, PERM_SCREENING_VIEW};
use pathway_core::types::DbId;
use pathway_core::workflow::WorkflowStatus;
use pathway_db::models::workflow::{WorkflowStats, WorkflowView};
use pathway_db::repositories::{CandidateRepo, WorkflowRepo};
use serde::{Deserialize, Serialize};

use crate::engine::transitions;
use crate::error::{AppError, AppResult};
use crate::middleware::actor::ActorHeader;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateWorkflowRequest {
    pub candidate_id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct CompleteScreeningRequest {
    pub workflow_id: DbId,
    pub notes: Option<String>,
    pub approved: bool,
}

#[derive(Debug, Deserialize)]
pub struct CompleteOrientationRequest {
    pub workflow_id: DbId,
    pub notes: Option<String>,
    pub completed: bool,
}

#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    pub workflow_id: DbId,
    pub batch_id: DbId,
    pub notes: Option<String>,
}

/// A workflow view with the human-readable status label.
#[derive(Debug, Serialize)]
pub struct WorkflowResponse {
    #[serde(flatten)]
    pub workflow: WorkflowView,
    pub status_display_name: &'static str,
}

impl From<WorkflowView> for WorkflowResponse {
    fn from(workflow: WorkflowView) -> Self {
        let status_display_name = workflow.status.display_name();
        Self {
            workflow,
            status_display_name,
        }
    }
}

// ---------------------------------------------------------------------------
// Queues
// ---------------------------------------------------------------------------

/// GET /api/v1/screening/pending
pub async fn pending_screening(
    state: State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<WorkflowResponse>>>> {
    list_status(state, auth, WorkflowStatus::PendingScreening).await
}

/// GET /api/v1/screening/pending-orientation
pub async fn pending_orientation(
    state: State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<WorkflowResponse>>>> {
    list_status(state, auth, WorkflowStatus::PendingOrientation).await
}

/// GET /api/v1/screening/pending-enroll
pub async fn pending_enroll(
    state: State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<WorkflowResponse>>>> {
    list_status(state, auth, WorkflowStatus::PendingEnroll).await
}

/// GET /api/v1/screening/enrolled
pub async fn enrolled(
    state: State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<WorkflowResponse>>>> {
    list_status(state, auth, WorkflowStatus::Enrolled).await
}

async fn list_status(
    State(state): State<AppState>,
    auth: AuthUser,
    status: WorkflowStatus,
) -> AppResult<Json<DataResponse<Vec<WorkflowResponse>>>> {
    auth.require_permission(PERM_SCREENING_VIEW)?;
    let views = WorkflowRepo::list_by_status(&state.pool, status).await?;
    Ok(Json(DataResponse {
        data: views.into_iter().map(WorkflowResponse::from).collect(),
    }))
}

// ---------------------------------------------------------------------------
// Single workflows
// ---------------------------------------------------------------------------

/// POST /api/v1/screening/workflows
///
/// Idempotent: 201 with a new workflow, or 200 with the candidate's
/// existing one.
pub async fn create_workflow(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateWorkflowRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<WorkflowResponse>>)> {
    auth.require_permission(PERM_SCREENING_MANAGE)?;
    let candidate_id = input.candidate_id;
    CandidateRepo::find_by_id(&state.pool, candidate_id)
        .await?
        .ok_or_else(|| AppError::not_found("Candidate", candidate_id))?;

    if let Some(workflow) = WorkflowRepo::insert_if_absent(&state.pool, candidate_id).await? {
        tracing::info!(workflow_id = workflow.id, candidate_id, "Workflow created");
        let view = load_view(&state, workflow.id).await?;
        return Ok((StatusCode::CREATED, Json(DataResponse { data: view })));
    }

    let view = WorkflowRepo::find_view_by_candidate(&state.pool, candidate_id)
        .await?
        .ok_or_else(|| AppError::not_found("CandidateWorkflow for candidate", candidate_id))?;
    Ok((StatusCode::OK, Json(DataResponse { data: view.into() })))
}

/// GET /api/v1/screening/{id}
pub async fn get_workflow(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<WorkflowResponse>>> {
    auth.require_permission(PERM_SCREENING_VIEW)?;
    let view = load_view(&state, id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// GET /api/v1/screening/candidate/{candidate_id}
pub async fn get_by_candidate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(candidate_id): Path<DbId>,
) -> AppResult<Json<DataResponse<WorkflowResponse>>> {
    auth.require_permission(PERM_SCREENING_VIEW)?;
    let view = WorkflowRepo::find_view_by_candidate(&state.pool, candidate_id)
        .await?
        .ok_or_else(|| AppError::not_found("CandidateWorkflow for candidate", candidate_id))?;
    Ok(Json(DataResponse { data: view.into() }))
}

/// GET /api/v1/screening/stats
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<WorkflowStats>>> {
    auth.require_permission(PERM_SCREENING_VIEW)?;
    let stats = WorkflowRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// PUT /api/v1/screening/complete-screening
pub async fn complete_screening(
    State(state): State<AppState>,
    auth: AuthUser,
    actor: ActorHeader,
    Json(input): Json<CompleteScreeningRequest>,
) -> AppResult<Json<DataResponse<WorkflowResponse>>> {
    auth.require_permission(PERM_SCREENING_MANAGE)?;
    let workflow = transitions::complete_screening(
        &state.pool,
        input.workflow_id,
        actor.or(auth.user_id),
        input.notes,
        input.approved,
    )
    .await?;
    let view = load_view(&state, workflow.id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// PUT /api/v1/screening/complete-orientation
pub async fn complete_orientation(
    State(state): State<AppState>,
    auth: AuthUser,
    actor: ActorHeader,
    Json(input): Json<CompleteOrientationRequest>,
) -> AppResult<Json<DataResponse<WorkflowResponse>>> {
    auth.require_permission(PERM_SCREENING_MANAGE)?;
    let workflow = transitions::complete_orientation(
        &state.pool,
        input.workflow_id,
        actor.or(auth.user_id),
        input.notes,
        input.completed,
    )
    .await?;
    let view = load_view(&state, workflow.id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// PUT /api/v1/screening/enroll
pub async fn enroll(
    State(state): State<AppState>,
    auth: AuthUser,
    actor: ActorHeader,
    Json(input): Json<EnrollRequest>,
) -> AppResult<Json<DataResponse<WorkflowResponse>>> {
    auth.require_permission(PERM_SCREENING_MANAGE)?;
    let workflow = transitions::enroll_candidate(
        &state.pool,
        input.workflow_id,
        input.batch_id,
        actor.or(auth.user_id),
        input.notes,
    )
    .await?;
    let view = load_view(&state, workflow.id).await?;
    Ok(Json(DataResponse { data: view }))
}

async fn load_view(state: &AppState, id: DbId) -> AppResult<WorkflowResponse> {
    WorkflowRepo::find_view(&state.pool, id)
        .await?
        .map(WorkflowResponse::from)
        .ok_or_else(|| AppError::not_found("CandidateWorkflow", id))
}
