//! Handlers for the `/training` resource: training masters and their batches.
//!
//! Seat counts are never written here. `current_enrolled` only changes
//! through enrollment, so batch edits are checked against the seat ledger.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use pathway_core::capacity::{
    validate_date_range, validate_max_capacity, DEFAULT_MAX_CAPACITY,
};
use pathway_core::error::CoreError;
use pathway_core::location::normalize_name;
use pathway_core::roles::{PERM_TRAINING_MANAGE, PERM_TRAINING_VIEW};
use pathway_core::types::{Date, DbId};
use pathway_db::models::training::{
    CreateTrainingBatch, CreateTrainingMaster, TrainingBatchView, TrainingMasterView,
    UpdateTrainingBatch, UpdateTrainingMaster,
};
use pathway_db::repositories::{TrainingBatchRepo, TrainingMasterRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const MAX_SKILL_CATEGORY_LEN: usize = 50;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBatchRequest {
    pub training_id: DbId,
    #[validate(length(min = 1, max = 50, message = "must be 1 to 50 characters"))]
    pub batch_code: String,
    pub start_date: Date,
    pub end_date: Date,
    pub max_capacity: Option<i32>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    #[validate(length(max = 100))]
    pub trainer_name: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBatchRequest {
    pub training_id: Option<DbId>,
    #[validate(length(min = 1, max = 50, message = "must be 1 to 50 characters"))]
    pub batch_code: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub max_capacity: Option<i32>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    #[validate(length(max = 100))]
    pub trainer_name: Option<String>,
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Training masters
// ---------------------------------------------------------------------------

/// GET /api/v1/training/masters
pub async fn list_masters(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<TrainingMasterView>>>> {
    auth.require_permission(PERM_TRAINING_VIEW)?;
    let masters = TrainingMasterRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: masters }))
}

/// GET /api/v1/training/masters/active
pub async fn list_active_masters(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<TrainingMasterView>>>> {
    auth.require_permission(PERM_TRAINING_VIEW)?;
    let masters = TrainingMasterRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: masters }))
}

/// GET /api/v1/training/masters/{id}
pub async fn get_master(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TrainingMasterView>>> {
    auth.require_permission(PERM_TRAINING_VIEW)?;
    let view = load_master(&state, id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// GET /api/v1/training/skill-categories
pub async fn skill_categories(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    auth.require_permission(PERM_TRAINING_VIEW)?;
    let categories = TrainingMasterRepo::skill_categories(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/training/masters
pub async fn create_master(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateTrainingMaster>,
) -> AppResult<(StatusCode, Json<DataResponse<TrainingMasterView>>)> {
    auth.require_permission(PERM_TRAINING_MANAGE)?;
    let name = normalize_name("Training name", &input.name)?;
    check_skill_category(input.skill_category.as_deref())?;
    check_duration(input.duration_days)?;

    if TrainingMasterRepo::name_exists(&state.pool, &name, None).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Training {name} already exists"
        ))));
    }

    let created = TrainingMasterRepo::create(
        &state.pool,
        &CreateTrainingMaster {
            name,
            ..input
        },
    )
    .await?;
    tracing::info!(training_id = created.id, name = %created.name, "Training created");
    let view = load_master(&state, created.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// PUT /api/v1/training/masters/{id}
pub async fn update_master(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTrainingMaster>,
) -> AppResult<Json<DataResponse<TrainingMasterView>>> {
    auth.require_permission(PERM_TRAINING_MANAGE)?;
    let name = input
        .name
        .as_deref()
        .map(|n| normalize_name("Training name", n))
        .transpose()?;
    check_skill_category(input.skill_category.as_deref())?;
    check_duration(input.duration_days)?;

    if let Some(name) = name.as_deref() {
        if TrainingMasterRepo::name_exists(&state.pool, name, Some(id)).await? {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Training {name} already exists"
            ))));
        }
    }

    TrainingMasterRepo::update(&state.pool, id, &UpdateTrainingMaster { name, ..input })
        .await?
        .ok_or_else(|| AppError::not_found("TrainingMaster", id))?;
    let view = load_master(&state, id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// PUT /api/v1/training/masters/{id}/toggle-active
pub async fn toggle_master(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TrainingMasterView>>> {
    auth.require_permission(PERM_TRAINING_MANAGE)?;
    let master = TrainingMasterRepo::toggle_active(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("TrainingMaster", id))?;
    tracing::info!(training_id = id, is_active = master.is_active, "Training toggled");
    let view = load_master(&state, id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/v1/training/masters/{id}
pub async fn delete_master(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    auth.require_permission(PERM_TRAINING_MANAGE)?;
    let view = load_master(&state, id).await?;
    let batches = TrainingMasterRepo::count_batches(&state.pool, id).await?;
    if batches > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Training {} still has {batches} batch(es)",
            view.name
        ))));
    }
    TrainingMasterRepo::delete(&state.pool, id).await?;
    tracing::info!(training_id = id, "Training deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/training/masters/{training_id}/batches
pub async fn list_master_batches(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(training_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TrainingBatchView>>>> {
    auth.require_permission(PERM_TRAINING_VIEW)?;
    load_master(&state, training_id).await?;
    let batches = TrainingBatchRepo::list_by_training(&state.pool, training_id).await?;
    Ok(Json(DataResponse { data: batches }))
}

// ---------------------------------------------------------------------------
// Batches
// ---------------------------------------------------------------------------

/// GET /api/v1/training/batches
pub async fn list_batches(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<TrainingBatchView>>>> {
    auth.require_permission(PERM_TRAINING_VIEW)?;
    let batches = TrainingBatchRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: batches }))
}

/// GET /api/v1/training/batches/available
pub async fn list_available_batches(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<TrainingBatchView>>>> {
    auth.require_permission(PERM_TRAINING_VIEW)?;
    let batches = TrainingBatchRepo::list_available(&state.pool, today()).await?;
    Ok(Json(DataResponse { data: batches }))
}

/// GET /api/v1/training/batches/upcoming
pub async fn list_upcoming_batches(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<TrainingBatchView>>>> {
    auth.require_permission(PERM_TRAINING_VIEW)?;
    let batches = TrainingBatchRepo::list_upcoming(&state.pool, today()).await?;
    Ok(Json(DataResponse { data: batches }))
}

/// GET /api/v1/training/batches/{id}
pub async fn get_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TrainingBatchView>>> {
    auth.require_permission(PERM_TRAINING_VIEW)?;
    let view = load_batch(&state, id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/training/batches
///
/// The training must exist and be active. `max_capacity` defaults to 30.
pub async fn create_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateBatchRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<TrainingBatchView>>)> {
    auth.require_permission(PERM_TRAINING_MANAGE)?;
    input.validate()?;

    let training = TrainingMasterRepo::find_by_id(&state.pool, input.training_id)
        .await?
        .ok_or_else(|| AppError::not_found("TrainingMaster", input.training_id))?;
    if !training.is_active {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Training {} is not active",
            training.name
        ))));
    }

    validate_date_range(input.start_date, input.end_date)?;
    let max_capacity = input.max_capacity.unwrap_or(DEFAULT_MAX_CAPACITY);
    validate_max_capacity(max_capacity)?;

    let batch_code = input.batch_code.trim().to_string();
    ensure_code_free(&state, &batch_code, None).await?;

    let created = TrainingBatchRepo::create(
        &state.pool,
        &CreateTrainingBatch {
            training_id: training.id,
            batch_code,
            start_date: input.start_date,
            end_date: input.end_date,
            max_capacity,
            location: input.location,
            trainer_name: input.trainer_name,
            is_active: input.is_active.unwrap_or(true),
        },
    )
    .await?;
    tracing::info!(
        batch_id = created.id,
        training_id = created.training_id,
        max_capacity = created.max_capacity,
        "Batch created",
    );
    let view = load_batch(&state, created.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// PUT /api/v1/training/batches/{id}
pub async fn update_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBatchRequest>,
) -> AppResult<Json<DataResponse<TrainingBatchView>>> {
    auth.require_permission(PERM_TRAINING_MANAGE)?;
    input.validate()?;
    let current = TrainingBatchRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("TrainingBatch", id))?;

    if let Some(training_id) = input.training_id {
        TrainingMasterRepo::find_by_id(&state.pool, training_id)
            .await?
            .ok_or_else(|| AppError::not_found("TrainingMaster", training_id))?;
    }
    validate_date_range(
        input.start_date.unwrap_or(current.start_date),
        input.end_date.unwrap_or(current.end_date),
    )?;
    if let Some(max_capacity) = input.max_capacity {
        current.ledger().validate_capacity_change(max_capacity)?;
    }

    let batch_code = input.batch_code.map(|c| c.trim().to_string());
    if let Some(code) = batch_code.as_deref() {
        ensure_code_free(&state, code, Some(id)).await?;
    }

    let update = UpdateTrainingBatch {
        training_id: input.training_id,
        batch_code,
        start_date: input.start_date,
        end_date: input.end_date,
        max_capacity: input.max_capacity,
        location: input.location,
        trainer_name: input.trainer_name,
        is_active: input.is_active,
    };
    // `None` here means an enrollment raced the capacity check above.
    TrainingBatchRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Enrolment changed during the update; retry with a larger capacity".into(),
            ))
        })?;
    tracing::info!(batch_id = id, "Batch updated");
    let view = load_batch(&state, id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// PUT /api/v1/training/batches/{id}/toggle-active
pub async fn toggle_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TrainingBatchView>>> {
    auth.require_permission(PERM_TRAINING_MANAGE)?;
    let batch = TrainingBatchRepo::toggle_active(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("TrainingBatch", id))?;
    tracing::info!(batch_id = id, is_active = batch.is_active, "Batch toggled");
    let view = load_batch(&state, id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/v1/training/batches/{id}
///
/// Only empty batches can be deleted.
pub async fn delete_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    auth.require_permission(PERM_TRAINING_MANAGE)?;
    let batch = TrainingBatchRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("TrainingBatch", id))?;
    batch.ledger().validate_deletable()?;

    // An enrollment can land between the check and the delete.
    if !TrainingBatchRepo::delete_if_empty(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Batch gained enrolled candidates; deactivate it instead".into(),
        )));
    }
    tracing::info!(batch_id = id, "Batch deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn today() -> Date {
    Utc::now().date_naive()
}

async fn load_master(state: &AppState, id: DbId) -> AppResult<TrainingMasterView> {
    TrainingMasterRepo::find_view(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("TrainingMaster", id))
}

pub(crate) async fn load_batch(state: &AppState, id: DbId) -> AppResult<TrainingBatchView> {
    TrainingBatchRepo::find_view(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("TrainingBatch", id))
}

async fn ensure_code_free(state: &AppState, code: &str, exclude: Option<DbId>) -> AppResult<()> {
    if TrainingBatchRepo::code_exists(&state.pool, code, exclude).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Batch code {code} already exists"
        ))));
    }
    Ok(())
}

fn check_skill_category(category: Option<&str>) -> Result<(), CoreError> {
    match category {
        Some(c) if c.len() > MAX_SKILL_CATEGORY_LEN => Err(CoreError::Validation(format!(
            "Skill category must be at most {MAX_SKILL_CATEGORY_LEN} characters"
        ))),
        _ => Ok(()),
    }
}

fn check_duration(days: Option<i32>) -> Result<(), CoreError> {
    match days {
        Some(d) if d < 1 => Err(CoreError::Validation(
            "Duration must be at least 1 day".into(),
        )),
        _ => Ok(()),
    }
}
