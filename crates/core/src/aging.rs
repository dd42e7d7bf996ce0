//! Onboarding aging classification.
//!
//! Candidates are bucketed by whole days since registration. The scan job
//! stores one notification per (candidate, level) until it is dismissed.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Days at or above which a candidate is critical (red).
pub const CRITICAL_DAYS: i64 = 5;
/// Days at or above which a candidate needs follow-up (amber).
pub const WARNING_DAYS: i64 = 3;

/// Onboarding statuses that count as finished.
const COMPLETED_STATUSES: &[&str] = &["COMPLETE", "COMPLETED"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgingLevel {
    Normal,
    Warning,
    Critical,
}

impl AgingLevel {
    pub const ALL: [AgingLevel; 3] = [AgingLevel::Normal, AgingLevel::Warning, AgingLevel::Critical];

    pub fn as_str(self) -> &'static str {
        match self {
            AgingLevel::Normal => "NORMAL",
            AgingLevel::Warning => "WARNING",
            AgingLevel::Critical => "CRITICAL",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            AgingLevel::Normal => "GREEN",
            AgingLevel::Warning => "AMBER",
            AgingLevel::Critical => "RED",
        }
    }
}

/// Valid `aging_color` values, most severe first.
pub const COLORS: [&str; 3] = ["RED", "AMBER", "GREEN"];

/// Whole days elapsed from `created_at` to `now`. Never negative.
pub fn days_since(created_at: Timestamp, now: Timestamp) -> i64 {
    (now - created_at).num_days().max(0)
}

pub fn classify(days: i64) -> AgingLevel {
    if days >= CRITICAL_DAYS {
        AgingLevel::Critical
    } else if days >= WARNING_DAYS {
        AgingLevel::Warning
    } else {
        AgingLevel::Normal
    }
}

pub fn is_completed(onboarding_status: Option<&str>) -> bool {
    onboarding_status.is_some_and(|s| {
        COMPLETED_STATUSES
            .iter()
            .any(|done| s.trim().eq_ignore_ascii_case(done))
    })
}

/// Notification text for a candidate at `level` after `days`.
pub fn message(level: AgingLevel, days: i64, completed: bool) -> String {
    match (level, completed) {
        (AgingLevel::Critical, false) => {
            format!("Onboarding incomplete for {days} days - URGENT ACTION REQUIRED")
        }
        (AgingLevel::Warning, false) => {
            format!("Onboarding incomplete for {days} days - needs follow-up")
        }
        (AgingLevel::Critical | AgingLevel::Warning, true) => {
            format!("Onboarding completed {days} days ago")
        }
        (AgingLevel::Normal, true) => format!("Onboarding completed {days} day(s) ago"),
        (AgingLevel::Normal, false) => {
            format!("Onboarding in progress - {days} day(s) since registration")
        }
    }
}

/// Everything the scan needs to write for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub days: i64,
    pub level: AgingLevel,
    pub message: String,
}

pub fn assess(created_at: Timestamp, now: Timestamp, onboarding_status: Option<&str>) -> Assessment {
    let days = days_since(created_at, now);
    let level = classify(days);
    Assessment {
        days,
        level,
        message: message(level, days, is_completed(onboarding_status)),
    }
}
