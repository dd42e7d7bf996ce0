//! Bearer-token authentication for admin endpoints.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use pathway_core::error::CoreError;
use pathway_core::roles::{has_permission, ROLE_SUPER_ADMIN};
use pathway_core::types::DbId;

use crate::auth::jwt::{validate_token, Claims};
use crate::error::AppError;
use crate::state::AppState;

/// The signed-in admin, taken from the access token.
///
/// Handlers gate themselves with [`AuthUser::require_permission`]:
///
/// ```ignore
/// async fn list(auth: AuthUser) -> AppResult<Json<()>> {
///     auth.require_permission(PERM_TRAINING_VIEW)?;
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: String,
    /// Permission codes resolved when the token was issued.
    pub permissions: Vec<String>,
}

impl AuthUser {
    pub fn is_super_admin(&self) -> bool {
        self.role == ROLE_SUPER_ADMIN
    }

    pub fn has_permission(&self, code: &str) -> bool {
        has_permission(&self.role, &self.permissions, code)
    }

    /// 403 unless the caller holds `code`. Super admins hold every code.
    pub fn require_permission(&self, code: &str) -> Result<(), AppError> {
        if self.has_permission(code) {
            return Ok(());
        }
        tracing::debug!(user_id = self.user_id, permission = code, "Permission denied");
        Err(AppError::Core(CoreError::Forbidden(format!(
            "Permission {code} required"
        ))))
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
            permissions: claims.permissions,
        }
    }
}

/// The token from `Authorization: Bearer <token>`. The scheme is matched
/// case-insensitively.
fn bearer_token(headers: &HeaderMap) -> Result<&str, CoreError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| CoreError::Unauthorized("Missing Authorization header".into()))?
        .to_str()
        .map_err(|_| CoreError::Unauthorized("Malformed Authorization header".into()))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(CoreError::Unauthorized(
            "Invalid Authorization format. Expected: Bearer <token>".into(),
        )),
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            CoreError::Unauthorized("Invalid or expired token".into())
        })?;
        Ok(claims.into())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(bearer_token(&headers("Bearer abc")).unwrap(), "abc");
        assert_eq!(bearer_token(&headers("bearer abc")).unwrap(), "abc");
    }

    #[test]
    fn other_schemes_and_blank_tokens_are_rejected() {
        assert_matches!(bearer_token(&headers("Basic abc")), Err(CoreError::Unauthorized(_)));
        assert_matches!(bearer_token(&headers("Bearer ")), Err(CoreError::Unauthorized(_)));
        assert_matches!(bearer_token(&HeaderMap::new()), Err(CoreError::Unauthorized(_)));
    }

    #[test]
    fn super_admin_holds_every_permission() {
        let user = AuthUser {
            user_id: 1,
            role: ROLE_SUPER_ADMIN.to_string(),
            permissions: vec![],
        };
        assert!(user.require_permission("TRAINING_MANAGE").is_ok());

        let viewer = AuthUser {
            role: "VIEWER".to_string(),
            permissions: vec!["DASHBOARD_VIEW".to_string()],
            ..user
        };
        assert!(viewer.require_permission("DASHBOARD_VIEW").is_ok());
        assert_matches!(
            viewer.require_permission("TRAINING_MANAGE"),
            Err(AppError::Core(CoreError::Forbidden(_)))
        );
    }
}
