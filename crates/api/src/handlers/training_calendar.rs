//! Handlers for the `/training-calendar` resource.
//!
//! Calendar entries are batch views annotated with their schedule status
//! relative to today and their occupancy.

use axum::extract::{Path, Query, State};
use axum::Json;
use pathway_core::calendar::{month_bounds, schedule_status, validate_window, ScheduleStatus};
use pathway_core::capacity::occupancy_rate;
use pathway_core::roles::PERM_TRAINING_VIEW;
use pathway_core::types::{Date, DbId};
use pathway_db::models::training::{BatchTotals, CalendarFilter, TrainingBatchView};
use pathway_db::repositories::{TrainingBatchRepo, WorkflowRepo};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::screening::WorkflowResponse;
use crate::handlers::training::{load_batch, today};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CalendarParams {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub training_id: Option<DbId>,
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Debug, Serialize)]
pub struct CalendarEntry {
    #[serde(flatten)]
    pub batch: TrainingBatchView,
    pub schedule_status: ScheduleStatus,
    pub occupancy_rate: f64,
}

impl CalendarEntry {
    fn new(batch: TrainingBatchView, today: Date) -> Self {
        let schedule_status = schedule_status(batch.start_date, batch.end_date, today);
        let occupancy_rate = batch.ledger().occupancy_rate();
        Self {
            batch,
            schedule_status,
            occupancy_rate,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CalendarSummary {
    #[serde(flatten)]
    pub totals: BatchTotals,
    pub total_available_slots: i64,
    pub occupancy_rate: f64,
}

#[derive(Debug, Serialize)]
pub struct BatchCalendarDetail {
    #[serde(flatten)]
    pub entry: CalendarEntry,
    pub enrolled_candidates: Vec<WorkflowResponse>,
}

/// GET /api/v1/training-calendar?start_date=&end_date=&training_id=&active_only=
pub async fn calendar(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<CalendarParams>,
) -> AppResult<Json<DataResponse<Vec<CalendarEntry>>>> {
    auth.require_permission(PERM_TRAINING_VIEW)?;
    validate_window(params.start_date, params.end_date)?;
    let filter = CalendarFilter {
        from: params.start_date,
        to: params.end_date,
        training_id: params.training_id,
        active_only: params.active_only,
    };
    let entries = entries(&state, &filter).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/training-calendar/month/{year}/{month}
pub async fn month(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((year, month)): Path<(i32, u32)>,
) -> AppResult<Json<DataResponse<Vec<CalendarEntry>>>> {
    auth.require_permission(PERM_TRAINING_VIEW)?;
    let (first, last) = month_bounds(year, month)?;
    let filter = CalendarFilter {
        from: Some(first),
        to: Some(last),
        ..Default::default()
    };
    let entries = entries(&state, &filter).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/training-calendar/summary
pub async fn summary(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<CalendarSummary>>> {
    auth.require_permission(PERM_TRAINING_VIEW)?;
    let totals = TrainingBatchRepo::totals(&state.pool, today()).await?;
    let summary = CalendarSummary {
        total_available_slots: (totals.total_capacity - totals.total_enrolled).max(0),
        occupancy_rate: occupancy_rate(totals.total_enrolled, totals.total_capacity),
        totals,
    };
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/training-calendar/batch/{id}
pub async fn batch_detail(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<BatchCalendarDetail>>> {
    auth.require_permission(PERM_TRAINING_VIEW)?;
    let batch = load_batch(&state, id).await?;
    let enrolled = WorkflowRepo::list_by_batch(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: BatchCalendarDetail {
            entry: CalendarEntry::new(batch, today()),
            enrolled_candidates: enrolled.into_iter().map(WorkflowResponse::from).collect(),
        },
    }))
}

async fn entries(state: &AppState, filter: &CalendarFilter) -> AppResult<Vec<CalendarEntry>> {
    let today = today();
    let batches = TrainingBatchRepo::list_calendar(&state.pool, filter).await?;
    Ok(batches
        .into_iter()
        .map(|b| CalendarEntry::new(b, today))
        .collect())
}
