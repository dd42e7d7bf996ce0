//! Acting admin for workflow transitions.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use pathway_core::error::CoreError;
use pathway_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

pub const ACTOR_HEADER: &str = "x-admin-user-id";

/// Optional `X-Admin-User-Id` header value.
///
/// Absent means "use the token subject". A present but non-numeric value is
/// a 400.
#[derive(Debug, Clone, Copy)]
pub struct ActorHeader(pub Option<DbId>);

impl ActorHeader {
    /// The header value, or `fallback` when the header was not sent.
    pub fn or(self, fallback: DbId) -> DbId {
        self.0.unwrap_or(fallback)
    }
}

impl FromRequestParts<AppState> for ActorHeader {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts.headers.get(ACTOR_HEADER) else {
            return Ok(ActorHeader(None));
        };
        let id = raw
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<DbId>().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Validation(
                    "X-Admin-User-Id must be a numeric admin user id".into(),
                ))
            })?;
        Ok(ActorHeader(Some(id)))
    }
}
