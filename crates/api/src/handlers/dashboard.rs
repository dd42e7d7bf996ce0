//! Handlers for the `/dashboard` resource.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Datelike, Utc};
use pathway_core::dashboard::{fill_months, month_name};
use pathway_core::roles::PERM_DASHBOARD_VIEW;
use pathway_db::models::dashboard::{DashboardTotals, MonthlyOnboardingRow, MonthlyWorkflowRow};
use pathway_db::repositories::DashboardRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::YearParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MonthlyOnboarding {
    pub month: u32,
    pub month_name: &'static str,
    pub completed: i64,
    pub incomplete: i64,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct MonthlyWorkflow {
    pub month: u32,
    pub month_name: &'static str,
    pub pending_screening: i64,
    pub pending_orientation: i64,
    pub pending_enroll: i64,
    pub enrolled: i64,
    pub dropped: i64,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub year: i32,
    #[serde(flatten)]
    pub totals: DashboardTotals,
    pub monthly_onboarding_data: Vec<MonthlyOnboarding>,
    pub monthly_workflow_data: Vec<MonthlyWorkflow>,
}

/// GET /api/v1/dashboard/stats?year=
///
/// Totals and twelve-month series for rows created in `year`.
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<YearParams>,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    auth.require_permission(PERM_DASHBOARD_VIEW)?;
    let year = params.year.unwrap_or_else(|| Utc::now().year());

    let (totals, onboarding, workflow) = tokio::try_join!(
        DashboardRepo::totals(&state.pool, Some(year)),
        DashboardRepo::monthly_onboarding(&state.pool, year),
        DashboardRepo::monthly_workflow(&state.pool, year),
    )?;

    Ok(Json(DataResponse {
        data: DashboardStats {
            year,
            totals,
            monthly_onboarding_data: onboarding_series(onboarding),
            monthly_workflow_data: workflow_series(workflow),
        },
    }))
}

/// GET /api/v1/dashboard/stats/summary
pub async fn summary(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<DashboardTotals>>> {
    auth.require_permission(PERM_DASHBOARD_VIEW)?;
    let totals = DashboardRepo::totals(&state.pool, None).await?;
    Ok(Json(DataResponse { data: totals }))
}

fn month_key(month: i32) -> u32 {
    u32::try_from(month).unwrap_or(0)
}

fn onboarding_series(rows: Vec<MonthlyOnboardingRow>) -> Vec<MonthlyOnboarding> {
    fill_months(rows.into_iter().map(|r| (month_key(r.month), r)))
        .into_iter()
        .zip(1u32..)
        .map(|(row, month)| MonthlyOnboarding {
            month,
            month_name: month_name(month).unwrap_or_default(),
            completed: row.completed,
            incomplete: row.incomplete,
            total: row.completed + row.incomplete,
        })
        .collect()
}

fn workflow_series(rows: Vec<MonthlyWorkflowRow>) -> Vec<MonthlyWorkflow> {
    fill_months(rows.into_iter().map(|r| (month_key(r.month), r)))
        .into_iter()
        .zip(1u32..)
        .map(|(row, month)| MonthlyWorkflow {
            month,
            month_name: month_name(month).unwrap_or_default(),
            total: row.pending_screening
                + row.pending_orientation
                + row.pending_enroll
                + row.enrolled
                + row.dropped,
            pending_screening: row.pending_screening,
            pending_orientation: row.pending_orientation,
            pending_enroll: row.pending_enroll,
            enrolled: row.enrolled,
            dropped: row.dropped,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn onboarding_series_fills_twelve_months() {
        let series = onboarding_series(vec![MonthlyOnboardingRow {
            month: 3,
            completed: 2,
            incomplete: 1,
        }]);
        assert_eq!(series.len(), 12);
        assert_eq!(series[0].month_name, "Jan");
        assert_eq!(series[0].total, 0);
        assert_eq!(series[2].month, 3);
        assert_eq!(series[2].month_name, "Mar");
        assert_eq!(series[2].total, 3);
    }

    #[test]
    fn workflow_series_totals_every_status() {
        let series = workflow_series(vec![MonthlyWorkflowRow {
            month: 12,
            pending_screening: 1,
            pending_orientation: 2,
            pending_enroll: 3,
            enrolled: 4,
            dropped: 5,
        }]);
        assert_eq!(series[11].month_name, "Dec");
        assert_eq!(series[11].total, 15);
        assert!(series[..11].iter().all(|m| m.total == 0));
    }
}
