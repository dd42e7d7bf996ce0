//! Role gates that sit in front of the per-permission checks.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use pathway_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An [`AuthUser`] whose role is `SUPER_ADMIN`; anyone else gets 403.
///
/// For endpoints that bypass permission filtering altogether, such as the
/// unfiltered menu listing.
#[derive(Debug)]
pub struct RequireSuperAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireSuperAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.is_super_admin() {
            Ok(Self(user))
        } else {
            tracing::debug!(user_id = user.user_id, role = %user.role, "Super admin gate refused");
            Err(CoreError::Forbidden("Super admin role required".into()).into())
        }
    }
}
