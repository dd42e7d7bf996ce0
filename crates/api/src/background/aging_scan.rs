//! Periodic onboarding aging scan.
//!
//! Ticks every `AGING_SCAN_INTERVAL_SECS` and runs the guarded scan from
//! [`crate::engine::aging`]. Errors are logged and the next tick retries.

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::engine::aging::{run_guarded, ScanGuard};

/// Run the aging scan loop until `cancel` is triggered.
pub async fn run(pool: PgPool, guard: ScanGuard, interval_secs: u64, cancel: CancellationToken) {
    let period = Duration::from_secs(interval_secs.max(1));
    tracing::info!(interval_secs = period.as_secs(), "Aging scan job started");

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Aging scan job stopping");
                break;
            }
            _ = interval.tick() => {
                match run_guarded(&pool, &guard, Utc::now()).await {
                    Ok(outcome) if outcome.skipped => {}
                    Ok(outcome) if outcome.created > 0 => {
                        tracing::info!(
                            scanned = outcome.scanned,
                            created = outcome.created,
                            "Aging scan: notifications created"
                        );
                    }
                    Ok(outcome) => {
                        tracing::debug!(scanned = outcome.scanned, "Aging scan: nothing new");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Aging scan failed");
                    }
                }
            }
        }
    }
}
