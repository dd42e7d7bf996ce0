//! Onboarding aging scan.
//!
//! Classifies every candidate by days since registration and writes a
//! notification for each (candidate, level) pair that has no live one yet.
//! The partial unique index makes the insert idempotent; [`ScanGuard`]
//! additionally keeps two scans in this process from running at once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pathway_core::aging::assess;
use pathway_core::types::Timestamp;
use pathway_db::models::notification::CreateAgingNotification;
use pathway_db::repositories::AgingNotificationRepo;
use serde::Serialize;
use sqlx::PgPool;

/// Single-flight flag. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct ScanGuard(Arc<AtomicBool>);

/// Held while a scan runs; releases the guard on drop.
#[derive(Debug)]
pub struct ScanPermit(Arc<AtomicBool>);

impl ScanGuard {
    /// `None` when another scan holds the guard.
    pub fn try_acquire(&self) -> Option<ScanPermit> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ScanPermit(Arc::clone(&self.0)))
    }

    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Drop for ScanPermit {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub scanned: usize,
    pub created: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanOutcome {
    pub scanned: usize,
    pub created: usize,
    /// `true` when another scan was already running and this one did nothing.
    pub skipped: bool,
}

/// Classify every candidate as of `now` and insert missing notifications.
pub async fn run_aging_scan(pool: &PgPool, now: Timestamp) -> Result<ScanReport, sqlx::Error> {
    let candidates = AgingNotificationRepo::scan_candidates(pool).await?;
    let mut report = ScanReport {
        scanned: candidates.len(),
        created: 0,
    };

    for candidate in candidates {
        let assessment = assess(candidate.created_at, now, Some(&candidate.onboarding_status));
        let input = CreateAgingNotification {
            candidate_id: candidate.id,
            candidate_name: format!("{} {}", candidate.first_name, candidate.last_name),
            phone_number: candidate.phone_number,
            onboarding_status: Some(candidate.onboarding_status),
            days_since_created: i32::try_from(assessment.days).unwrap_or(i32::MAX),
            aging_level: assessment.level.as_str().to_string(),
            aging_color: assessment.level.color().to_string(),
            message: assessment.message,
        };
        if AgingNotificationRepo::insert_if_absent(pool, &input).await? {
            tracing::debug!(
                candidate_id = input.candidate_id,
                level = %input.aging_level,
                "Aging notification created",
            );
            report.created += 1;
        }
    }

    Ok(report)
}

/// Run a scan unless one is already in flight.
pub async fn run_guarded(
    pool: &PgPool,
    guard: &ScanGuard,
    now: Timestamp,
) -> Result<ScanOutcome, sqlx::Error> {
    let Some(_permit) = guard.try_acquire() else {
        tracing::info!("Aging scan already running, skipping");
        return Ok(ScanOutcome {
            scanned: 0,
            created: 0,
            skipped: true,
        });
    };
    let report = run_aging_scan(pool, now).await?;
    Ok(ScanOutcome {
        scanned: report.scanned,
        created: report.created,
        skipped: false,
    })
}
