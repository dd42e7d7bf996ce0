//! One-time passcode rules for signup contact verification.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Minutes an issued code stays valid.
pub const OTP_VALIDITY_MINUTES: i64 = 10;
/// Wrong guesses allowed before the code is burned.
pub const OTP_MAX_ATTEMPTS: i32 = 5;
/// Digits in a generated code.
pub const OTP_LENGTH: usize = 6;

pub const CONTACT_EMAIL: &str = "EMAIL";
pub const CONTACT_PHONE: &str = "PHONE";

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("valid phone regex"));

/// Normalise a client-supplied contact type.
///
/// Absent means email; `MOBILE` is an alias for `PHONE`.
pub fn normalize_contact_type(contact_type: Option<&str>) -> String {
    match contact_type.map(|t| t.trim().to_uppercase()) {
        None => CONTACT_EMAIL.to_string(),
        Some(t) if t.is_empty() => CONTACT_EMAIL.to_string(),
        Some(t) if t == "MOBILE" => CONTACT_PHONE.to_string(),
        Some(t) => t,
    }
}

/// Infer the kind of contact from its shape: anything with `@` is an email.
pub fn contact_kind(contact: &str) -> &'static str {
    if contact.contains('@') {
        CONTACT_EMAIL
    } else {
        CONTACT_PHONE
    }
}

/// Check that `contact` is plausible for `contact_type`.
pub fn validate_contact(contact: &str, contact_type: &str) -> Result<(), CoreError> {
    let contact = contact.trim();
    if contact.is_empty() {
        return Err(CoreError::Validation("Contact is required".into()));
    }
    match contact_type {
        CONTACT_EMAIL if !contact.contains('@') => Err(CoreError::Validation(format!(
            "'{contact}' is not a valid email address"
        ))),
        CONTACT_PHONE if !PHONE_RE.is_match(contact) => Err(CoreError::Validation(format!(
            "'{contact}' is not a valid phone number"
        ))),
        CONTACT_EMAIL | CONTACT_PHONE => Ok(()),
        other => Err(CoreError::Validation(format!(
            "Unsupported contact type '{other}'"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Code generation
// ---------------------------------------------------------------------------

pub trait OtpGenerator: Send + Sync {
    fn generate(&self) -> String;

    /// Whether the issued code may be echoed back to the client.
    fn reveals_code(&self) -> bool {
        false
    }
}

/// Random numeric code of [`OTP_LENGTH`] digits.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomOtp;

impl OtpGenerator for RandomOtp {
    fn generate(&self) -> String {
        let mut rng = rand::rng();
        (0..OTP_LENGTH)
            .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
            .collect()
    }
}

/// Fixed code for development and tests. Echoed in the send response.
#[derive(Debug, Clone)]
pub struct StaticOtp(pub String);

impl OtpGenerator for StaticOtp {
    fn generate(&self) -> String {
        self.0.clone()
    }

    fn reveals_code(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// The stored state of an issued code, as read from the database.
#[derive(Debug, Clone)]
pub struct IssuedOtp<'a> {
    pub code: &'a str,
    pub expires_at: Timestamp,
    pub attempts: i32,
    pub max_attempts: i32,
}

/// Why a submitted code was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpRejection {
    Expired,
    AttemptsExhausted,
    /// The caller must record one more failed attempt.
    WrongCode,
}

impl OtpRejection {
    pub fn message(self) -> &'static str {
        match self {
            OtpRejection::Expired => "OTP expired",
            OtpRejection::AttemptsExhausted => "Maximum OTP attempts exceeded",
            OtpRejection::WrongCode => "Invalid OTP code",
        }
    }
}

impl From<OtpRejection> for CoreError {
    fn from(value: OtpRejection) -> Self {
        CoreError::Validation(value.message().to_string())
    }
}

/// Check a submitted code. Expiry and exhaustion are checked before the
/// code itself so a burned code cannot be brute-forced.
pub fn check(issued: &IssuedOtp<'_>, submitted: &str, now: Timestamp) -> Result<(), OtpRejection> {
    if now > issued.expires_at {
        return Err(OtpRejection::Expired);
    }
    if issued.attempts >= issued.max_attempts {
        return Err(OtpRejection::AttemptsExhausted);
    }
    if issued.code != submitted.trim() {
        return Err(OtpRejection::WrongCode);
    }
    Ok(())
}
