//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?active_only=true` filter for list endpoints.
#[derive(Debug, Deserialize)]
pub struct ActiveOnlyParams {
    #[serde(default)]
    pub active_only: bool,
}

/// `?q=` search term.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// `?year=` for yearly rollups. Absent means the current year.
#[derive(Debug, Deserialize)]
pub struct YearParams {
    pub year: Option<i32>,
}
