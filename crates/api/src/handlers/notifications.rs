//! Handlers for the `/notifications` resource (onboarding aging alerts).

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use pathway_core::aging::COLORS;
use pathway_core::roles::PERM_NOTIFICATION_VIEW;
use pathway_core::types::DbId;
use pathway_db::models::notification::AgingNotification;
use pathway_db::repositories::AgingNotificationRepo;
use serde::Serialize;

use crate::engine::aging::{run_guarded, ScanOutcome};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{CountResponse, DataResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct NotificationSummary {
    /// Every colour is present, zero when there are no live alerts of it.
    pub by_color: BTreeMap<String, i64>,
    pub by_status: BTreeMap<String, i64>,
    pub unread_count: i64,
    pub total_active: i64,
}

#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

/// GET /api/v1/notifications
pub async fn list_active(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<AgingNotification>>>> {
    auth.require_permission(PERM_NOTIFICATION_VIEW)?;
    let notifications = AgingNotificationRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<CountResponse>> {
    auth.require_permission(PERM_NOTIFICATION_VIEW)?;
    let count = AgingNotificationRepo::unread_count(&state.pool).await?;
    Ok(Json(CountResponse { count }))
}

/// GET /api/v1/notifications/by-color/{color}
pub async fn list_by_color(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(color): Path<String>,
) -> AppResult<Json<DataResponse<Vec<AgingNotification>>>> {
    auth.require_permission(PERM_NOTIFICATION_VIEW)?;
    let notifications =
        AgingNotificationRepo::list_by_color(&state.pool, &color.to_uppercase()).await?;
    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// GET /api/v1/notifications/by-status/{status}
pub async fn list_by_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(status): Path<String>,
) -> AppResult<Json<DataResponse<Vec<AgingNotification>>>> {
    auth.require_permission(PERM_NOTIFICATION_VIEW)?;
    let notifications =
        AgingNotificationRepo::list_by_status(&state.pool, &status.to_uppercase()).await?;
    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// GET /api/v1/notifications/summary
pub async fn summary(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<NotificationSummary>>> {
    auth.require_permission(PERM_NOTIFICATION_VIEW)?;
    let (colors, statuses, unread_count, total_active) = tokio::try_join!(
        AgingNotificationRepo::count_by_color(&state.pool),
        AgingNotificationRepo::count_by_status(&state.pool),
        AgingNotificationRepo::unread_count(&state.pool),
        AgingNotificationRepo::active_count(&state.pool),
    )?;

    let mut by_color: BTreeMap<String, i64> =
        COLORS.iter().map(|c| (c.to_string(), 0)).collect();
    by_color.extend(colors.into_iter().map(|c| (c.label, c.count)));
    let by_status = statuses.into_iter().map(|s| (s.label, s.count)).collect();

    Ok(Json(DataResponse {
        data: NotificationSummary {
            by_color,
            by_status,
            unread_count,
            total_active,
        },
    }))
}

/// PUT /api/v1/notifications/mark-all-read
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<MarkAllReadResponse>>> {
    auth.require_permission(PERM_NOTIFICATION_VIEW)?;
    let updated = AgingNotificationRepo::mark_all_read(&state.pool).await?;
    tracing::info!(updated, user_id = auth.user_id, "Notifications marked read");
    Ok(Json(DataResponse {
        data: MarkAllReadResponse { updated },
    }))
}

/// PUT /api/v1/notifications/{id}/mark-read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AgingNotification>>> {
    auth.require_permission(PERM_NOTIFICATION_VIEW)?;
    let notification = AgingNotificationRepo::mark_read(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("AgingNotification", id))?;
    Ok(Json(DataResponse { data: notification }))
}

/// PUT /api/v1/notifications/{id}/dismiss
pub async fn dismiss(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AgingNotification>>> {
    auth.require_permission(PERM_NOTIFICATION_VIEW)?;
    let notification = AgingNotificationRepo::dismiss(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("AgingNotification", id))?;
    tracing::info!(notification_id = id, "Notification dismissed");
    Ok(Json(DataResponse { data: notification }))
}

/// POST /api/v1/notifications/calculate
///
/// Runs an aging scan now. Reports `skipped` when the scheduled scan is
/// already in flight.
pub async fn calculate(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<ScanOutcome>>> {
    auth.require_permission(PERM_NOTIFICATION_VIEW)?;
    let outcome = run_guarded(&state.pool, &state.aging_guard, Utc::now()).await?;
    tracing::info!(
        scanned = outcome.scanned,
        created = outcome.created,
        skipped = outcome.skipped,
        "Manual aging scan finished",
    );
    Ok(Json(DataResponse { data: outcome }))
}
