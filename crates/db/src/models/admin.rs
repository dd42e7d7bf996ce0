//! Admin user entity model and DTOs.

use pathway_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full row from the `admin_users` table.
///
/// Carries the password hash, so it is never serialized. Use
/// [`AdminUserView`] for responses.
#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role_id: DbId,
    pub state_id: Option<DbId>,
    pub city_id: Option<DbId>,
    pub is_active: bool,
    pub last_login: Option<Timestamp>,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AdminUser {
    /// "First Last", falling back to the username when both are blank.
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            self.username.clone()
        } else {
            name
        }
    }
}

/// Admin user joined with role and location names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminUserView {
    pub id: DbId,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role_id: DbId,
    pub role_name: String,
    pub state_id: Option<DbId>,
    pub state_name: Option<String>,
    pub city_id: Option<DbId>,
    pub city_name: Option<String>,
    pub is_active: bool,
    pub last_login: Option<Timestamp>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateAdminUser {
    pub username: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role_id: DbId,
    pub state_id: Option<DbId>,
    pub city_id: Option<DbId>,
    pub created_by: Option<DbId>,
}

/// Partial update. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAdminUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role_id: Option<DbId>,
    pub state_id: Option<DbId>,
    pub city_id: Option<DbId>,
    pub is_active: Option<bool>,
}
