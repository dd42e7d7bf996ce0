//! Read-only rollups for the admin dashboard.
//!
//! Every query takes an optional year; `None` aggregates over all rows.

use sqlx::PgPool;

use crate::models::dashboard::{DashboardTotals, MonthlyOnboardingRow, MonthlyWorkflowRow};

pub struct DashboardRepo;

impl DashboardRepo {
    /// Candidate and workflow totals for rows created in `year`.
    pub async fn totals(pool: &PgPool, year: Option<i32>) -> Result<DashboardTotals, sqlx::Error> {
        sqlx::query_as::<_, DashboardTotals>(
            "SELECT c.total_candidates, c.completed_onboarding, c.incomplete_onboarding,
                    w.pending_screening, w.pending_orientation, w.pending_enroll,
                    w.enrolled, w.dropped
             FROM (
                SELECT COUNT(*) AS total_candidates,
                       COUNT(*) FILTER (WHERE UPPER(onboarding_status) IN ('COMPLETE', 'COMPLETED'))
                           AS completed_onboarding,
                       COUNT(*) FILTER (WHERE UPPER(onboarding_status) NOT IN ('COMPLETE', 'COMPLETED'))
                           AS incomplete_onboarding
                FROM candidates
                WHERE $1::INTEGER IS NULL OR EXTRACT(YEAR FROM created_at)::INTEGER = $1
             ) c
             CROSS JOIN (
                SELECT COUNT(*) FILTER (WHERE status = 'PENDING_SCREENING') AS pending_screening,
                       COUNT(*) FILTER (WHERE status = 'PENDING_ORIENTATION') AS pending_orientation,
                       COUNT(*) FILTER (WHERE status = 'PENDING_ENROLL') AS pending_enroll,
                       COUNT(*) FILTER (WHERE status = 'ENROLLED') AS enrolled,
                       COUNT(*) FILTER (WHERE status = 'ON_HOLD') AS dropped
                FROM candidate_workflows
                WHERE $1::INTEGER IS NULL OR EXTRACT(YEAR FROM created_at)::INTEGER = $1
             ) w",
        )
        .bind(year)
        .fetch_one(pool)
        .await
    }

    /// Completed/incomplete candidate counts per month of `year`. Months
    /// without candidates are absent.
    pub async fn monthly_onboarding(
        pool: &PgPool,
        year: i32,
    ) -> Result<Vec<MonthlyOnboardingRow>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyOnboardingRow>(
            "SELECT EXTRACT(MONTH FROM created_at)::INTEGER AS month,
                    COUNT(*) FILTER (WHERE UPPER(onboarding_status) IN ('COMPLETE', 'COMPLETED'))
                        AS completed,
                    COUNT(*) FILTER (WHERE UPPER(onboarding_status) NOT IN ('COMPLETE', 'COMPLETED'))
                        AS incomplete
             FROM candidates
             WHERE EXTRACT(YEAR FROM created_at)::INTEGER = $1
             GROUP BY 1
             ORDER BY 1",
        )
        .bind(year)
        .fetch_all(pool)
        .await
    }

    /// Workflow status counts per month of `year`.
    pub async fn monthly_workflow(
        pool: &PgPool,
        year: i32,
    ) -> Result<Vec<MonthlyWorkflowRow>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyWorkflowRow>(
            "SELECT EXTRACT(MONTH FROM created_at)::INTEGER AS month,
                    COUNT(*) FILTER (WHERE status = 'PENDING_SCREENING') AS pending_screening,
                    COUNT(*) FILTER (WHERE status = 'PENDING_ORIENTATION') AS pending_orientation,
                    COUNT(*) FILTER (WHERE status = 'PENDING_ENROLL') AS pending_enroll,
                    COUNT(*) FILTER (WHERE status = 'ENROLLED') AS enrolled,
                    COUNT(*) FILTER (WHERE status = 'ON_HOLD') AS dropped
             FROM candidate_workflows
             WHERE EXTRACT(YEAR FROM created_at)::INTEGER = $1
             GROUP BY 1
             ORDER BY 1",
        )
        .bind(year)
        .fetch_all(pool)
        .await
    }
}
