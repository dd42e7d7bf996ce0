//! One-time password rows.

use pathway_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `otp_verifications` table.
#[derive(Debug, Clone, FromRow)]
pub struct OtpVerification {
    pub id: DbId,
    pub contact: String,
    pub contact_type: String,
    pub otp_code: String,
    pub is_verified: bool,
    pub attempts: i32,
    pub max_attempts: i32,
    pub expires_at: Timestamp,
    pub verified_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

pub struct CreateOtp {
    pub contact: String,
    pub contact_type: String,
    pub otp_code: String,
    pub max_attempts: i32,
    pub expires_at: Timestamp,
}
