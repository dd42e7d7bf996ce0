//! Daily purge of dismissed aging notifications and dead refresh sessions.
//!
//! Wakes hourly and acts once per UTC day, in the configured hour. Rows
//! dismissed and untouched for longer than the retention period are deleted,
//! as are revoked or expired `user_sessions` rows.

use std::time::Duration;

use chrono::{NaiveDate, Timelike, Utc};
use pathway_db::repositories::{AgingNotificationRepo, SessionRepo};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::config::AgingConfig;

const CHECK_INTERVAL: Duration = Duration::from_secs(3600);

/// Run the cleanup loop until `cancel` is triggered.
pub async fn run(pool: PgPool, config: AgingConfig, cancel: CancellationToken) {
    tracing::info!(
        retention_days = config.retention_days,
        cleanup_hour_utc = config.cleanup_hour_utc,
        "Notification cleanup job started"
    );

    let mut interval = tokio::time::interval(CHECK_INTERVAL);
    let mut last_run: Option<NaiveDate> = None;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Notification cleanup job stopping");
                break;
            }
            _ = interval.tick() => {
                let now = Utc::now();
                if !is_due(now.hour(), now.date_naive(), config.cleanup_hour_utc, last_run) {
                    continue;
                }
                last_run = Some(now.date_naive());

                let cutoff = now - chrono::Duration::days(config.retention_days);
                match AgingNotificationRepo::purge_dismissed_before(&pool, cutoff).await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "Notification cleanup: purged dismissed rows");
                    }
                    Ok(_) => {
                        tracing::debug!("Notification cleanup: no rows to purge");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Notification cleanup failed");
                    }
                }
                match SessionRepo::purge_stale(&pool).await {
                    Ok(deleted) => tracing::debug!(deleted, "Stale sessions purged"),
                    Err(e) => tracing::error!(error = %e, "Session purge failed"),
                }
            }
        }
    }
}

/// Whether the cleanup should act now: in the configured hour, at most once
/// per day.
fn is_due(hour: u32, today: NaiveDate, cleanup_hour: u32, last_run: Option<NaiveDate>) -> bool {
    hour == cleanup_hour && last_run != Some(today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn runs_once_in_configured_hour() {
        let today = day("2026-10-19");
        assert!(is_due(2, today, 2, None));
        assert!(is_due(2, today, 2, Some(day("2026-10-18"))));
        assert!(!is_due(2, today, 2, Some(today)));
        assert!(!is_due(3, today, 2, None));
    }
}
