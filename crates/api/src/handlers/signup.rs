//! Handlers for the public `/signup` flow.
//!
//! A candidate verifies a contact with an OTP, which creates (or finds) their
//! candidate record, then fills the profile in steps. Every response uses
//! the `{success, message, candidate_id?, next_step?}` envelope.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use pathway_core::error::CoreError;
use pathway_core::otp::{
    check, contact_kind, normalize_contact_type, validate_contact, IssuedOtp, OtpRejection,
    CONTACT_EMAIL, OTP_MAX_ATTEMPTS, OTP_VALIDITY_MINUTES,
};
use pathway_core::signup::{
    non_blank, SignupStep, StepFlags, CANDIDATE_ACTIVE, ONBOARDING_INCOMPLETE, PLACEHOLDER,
};
use pathway_core::types::{Date, DbId};
use pathway_db::models::candidate::{
    Candidate, CreateCandidate, NamedProficiency, OnboardingProgress, ProgressFlag,
    UpdateCandidate, UpsertEducationDetails, UpsertPersonalDetails,
};
use pathway_db::models::otp::CreateOtp;
use pathway_db::repositories::{CandidateRepo, OtpRepo, ProfileRepo, WorkflowRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::candidates::score;
use crate::state::AppState;

type Tx<'a> = sqlx::Transaction<'a, sqlx::Postgres>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub contact: String,
    pub contact_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub contact: String,
    pub otp_code: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileDetailsRequest {
    pub candidate_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<Date>,
}

/// Candidate columns plus the `personal_details` row.
#[derive(Debug, Deserialize)]
pub struct PersonalDetailsRequest {
    pub candidate_id: DbId,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<Date>,
    pub gender: Option<String>,
    pub address_line1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub aadhar_number: Option<String>,
    pub pan_number: Option<String>,
    #[serde(flatten)]
    pub details: UpsertPersonalDetails,
}

/// Scores arrive as free text such as `"85%"`.
#[derive(Debug, Deserialize)]
pub struct EducationDetailsRequest {
    pub candidate_id: DbId,
    pub tenth_board: Option<String>,
    pub tenth_percentage: Option<String>,
    pub tenth_year_of_passing: Option<i32>,
    pub tenth_stream: Option<String>,
    pub tenth_school_name: Option<String>,
    pub twelfth_board: Option<String>,
    pub twelfth_percentage: Option<String>,
    pub twelfth_year_of_passing: Option<i32>,
    pub twelfth_stream: Option<String>,
    pub twelfth_college_name: Option<String>,
    pub graduation_degree: Option<String>,
    pub graduation_specialization: Option<String>,
    pub graduation_percentage: Option<String>,
    pub graduation_year: Option<i32>,
    pub graduation_university: Option<String>,
    pub certifications: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SkillEntry {
    pub skill_name: String,
    pub proficiency_level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LanguageEntry {
    pub language_name: String,
    pub proficiency_level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SkillsRequest {
    pub candidate_id: DbId,
    #[serde(default)]
    pub skills: Vec<SkillEntry>,
    #[serde(default)]
    pub languages: Vec<LanguageEntry>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    pub candidate_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_step: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_minutes: Option<i64>,
    /// Only present when a static development code is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_percentage: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
}

impl SignupResponse {
    fn step(message: impl Into<String>, candidate_id: DbId, step: SignupStep) -> Self {
        Self {
            success: true,
            message: message.into(),
            candidate_id: Some(candidate_id),
            next_step: Some(step.next_step()),
            expiry_minutes: None,
            otp_code: None,
            progress_percentage: None,
            status: None,
        }
    }

    fn with_progress(mut self, progress: &OnboardingProgress) -> Self {
        self.progress_percentage = Some(progress.progress_percentage);
        self
    }
}

// ---------------------------------------------------------------------------
// OTP
// ---------------------------------------------------------------------------

/// POST /api/v1/signup/send-otp
///
/// Issue a fresh code for the contact, replacing any unverified one.
pub async fn send_otp(
    State(state): State<AppState>,
    Json(input): Json<SendOtpRequest>,
) -> AppResult<Json<SignupResponse>> {
    let contact = input.contact.trim().to_string();
    let contact_type = normalize_contact_type(input.contact_type.as_deref());
    validate_contact(&contact, &contact_type)?;

    let code = state.otp.generate();
    let otp = OtpRepo::replace(
        &state.pool,
        &CreateOtp {
            contact: contact.clone(),
            contact_type: contact_type.clone(),
            otp_code: code.clone(),
            max_attempts: OTP_MAX_ATTEMPTS,
            expires_at: Utc::now() + chrono::Duration::minutes(OTP_VALIDITY_MINUTES),
        },
    )
    .await?;

    tracing::info!(otp_id = otp.id, contact_type = %contact_type, "OTP issued");

    Ok(Json(SignupResponse {
        success: true,
        message: format!("OTP sent to {contact}"),
        candidate_id: None,
        next_step: None,
        expiry_minutes: Some(OTP_VALIDITY_MINUTES),
        otp_code: state.otp.reveals_code().then_some(code),
        progress_percentage: None,
        status: None,
    }))
}

/// POST /api/v1/signup/verify-otp
///
/// Check the code. On success the candidate is found or created and gets a
/// workflow and a progress row.
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(input): Json<VerifyOtpRequest>,
) -> AppResult<Json<SignupResponse>> {
    let contact = input.contact.trim();
    let otp = OtpRepo::latest_unverified(&state.pool, contact)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Validation("Invalid OTP".into())))?;

    let issued = IssuedOtp {
        code: &otp.otp_code,
        expires_at: otp.expires_at,
        attempts: otp.attempts,
        max_attempts: otp.max_attempts,
    };
    if let Err(rejection) = check(&issued, &input.otp_code, Utc::now()) {
        if rejection == OtpRejection::WrongCode {
            OtpRepo::increment_attempts(&state.pool, otp.id).await?;
        }
        tracing::warn!(otp_id = otp.id, reason = rejection.message(), "OTP rejected");
        return Err(CoreError::from(rejection).into());
    }

    let mut tx = state.pool.begin().await?;
    if !OtpRepo::mark_verified(&mut tx, otp.id).await? {
        tracing::warn!(otp_id = otp.id, "OTP already used by a concurrent verification");
        return Err(CoreError::Validation("Invalid OTP".into()).into());
    }

    let (email, phone) = if contact_kind(contact) == CONTACT_EMAIL {
        (Some(contact), None)
    } else {
        (None, Some(contact))
    };
    let candidate = match CandidateRepo::find_by_contact_for_update(&mut tx, email, phone).await? {
        Some(existing) => existing,
        None => {
            let created = CandidateRepo::create(
                &mut tx,
                &CreateCandidate {
                    first_name: PLACEHOLDER.to_string(),
                    last_name: PLACEHOLDER.to_string(),
                    email: email.map(str::to_string),
                    phone_number: phone.map(str::to_string),
                    onboarding_status: ONBOARDING_INCOMPLETE.to_string(),
                    engagement_score: state.scoring.engagement_score(),
                    dropout_risk_score: state.scoring.dropout_risk_score(),
                    ..Default::default()
                },
            )
            .await?;
            tracing::info!(candidate_id = created.id, "Candidate registered from OTP");
            created
        }
    };

    WorkflowRepo::ensure_for_candidate_in_tx(&mut tx, candidate.id).await?;
    ProfileRepo::ensure_progress(&mut tx, candidate.id, SignupStep::Verified.progress_key())
        .await?;
    tx.commit().await?;

    Ok(Json(SignupResponse::step(
        "OTP verified successfully",
        candidate.id,
        SignupStep::Verified,
    )))
}

// ---------------------------------------------------------------------------
// Profile steps
// ---------------------------------------------------------------------------

/// POST /api/v1/signup/profile-details
pub async fn profile_details(
    State(state): State<AppState>,
    Json(input): Json<ProfileDetailsRequest>,
) -> AppResult<Json<SignupResponse>> {
    let first_name = required("first_name", &input.first_name)?;
    let last_name = required("last_name", &input.last_name)?;
    let date_of_birth = input.date_of_birth.ok_or_else(|| {
        AppError::Core(CoreError::Validation("date_of_birth is required".into()))
    })?;

    let candidate = CandidateRepo::update(
        &state.pool,
        input.candidate_id,
        &UpdateCandidate {
            first_name: Some(first_name),
            last_name: Some(last_name),
            date_of_birth: Some(date_of_birth),
            ..Default::default()
        },
    )
    .await?
    .ok_or_else(|| AppError::not_found("Candidate", input.candidate_id))?;

    Ok(Json(SignupResponse::step(
        "Profile details saved",
        candidate.id,
        SignupStep::Profile,
    )))
}

/// POST /api/v1/signup/personal-details
pub async fn personal_details(
    State(state): State<AppState>,
    Json(input): Json<PersonalDetailsRequest>,
) -> AppResult<Json<SignupResponse>> {
    let candidate_id = input.candidate_id;
    let mut tx = state.pool.begin().await?;
    lock_candidate(&mut tx, candidate_id).await?;

    let update = UpdateCandidate {
        first_name: filled(&input.first_name),
        middle_name: filled(&input.middle_name),
        last_name: filled(&input.last_name),
        email: filled(&input.email),
        phone_number: filled(&input.phone_number),
        date_of_birth: input.date_of_birth,
        gender: filled(&input.gender),
        address_line1: filled(&input.address_line1),
        city: filled(&input.city),
        state: filled(&input.state),
        pincode: filled(&input.pincode),
        aadhar_number: filled(&input.aadhar_number),
        pan_number: filled(&input.pan_number),
        ..Default::default()
    };
    CandidateRepo::update_in_tx(&mut tx, candidate_id, &update).await?;
    ProfileRepo::upsert_personal(&mut tx, candidate_id, &input.details).await?;

    let progress = advance(
        &mut tx,
        candidate_id,
        ProgressFlag::PersonalDetails,
        SignupStep::PersonalDetails,
    )
    .await?;
    tx.commit().await?;

    tracing::info!(candidate_id, "Personal details saved");
    Ok(Json(
        SignupResponse::step(
            "Personal details saved",
            candidate_id,
            SignupStep::PersonalDetails,
        )
        .with_progress(&progress),
    ))
}

/// POST /api/v1/signup/education-details
pub async fn education_details(
    State(state): State<AppState>,
    Json(input): Json<EducationDetailsRequest>,
) -> AppResult<Json<SignupResponse>> {
    let candidate_id = input.candidate_id;
    let details = UpsertEducationDetails {
        tenth_board: input.tenth_board,
        tenth_percentage: score(candidate_id, "tenth_percentage", &input.tenth_percentage),
        tenth_year_of_passing: input.tenth_year_of_passing,
        tenth_stream: input.tenth_stream,
        tenth_school_name: input.tenth_school_name,
        twelfth_board: input.twelfth_board,
        twelfth_percentage: score(candidate_id, "twelfth_percentage", &input.twelfth_percentage),
        twelfth_year_of_passing: input.twelfth_year_of_passing,
        twelfth_stream: input.twelfth_stream,
        twelfth_college_name: input.twelfth_college_name,
        graduation_degree: input.graduation_degree,
        graduation_specialization: input.graduation_specialization,
        graduation_percentage: score(
            candidate_id,
            "graduation_percentage",
            &input.graduation_percentage,
        ),
        graduation_year: input.graduation_year,
        graduation_university: input.graduation_university,
        certifications: input.certifications,
    };

    let mut tx = state.pool.begin().await?;
    lock_candidate(&mut tx, candidate_id).await?;
    ProfileRepo::upsert_education(&mut tx, candidate_id, &details).await?;
    let progress = advance(
        &mut tx,
        candidate_id,
        ProgressFlag::EducationDetails,
        SignupStep::EducationDetails,
    )
    .await?;
    tx.commit().await?;

    tracing::info!(candidate_id, "Education details saved");
    Ok(Json(
        SignupResponse::step(
            "Education details saved",
            candidate_id,
            SignupStep::EducationDetails,
        )
        .with_progress(&progress),
    ))
}

/// POST /api/v1/signup/skills
///
/// Replaces both the skill and the language sets.
pub async fn skills(
    State(state): State<AppState>,
    Json(input): Json<SkillsRequest>,
) -> AppResult<Json<SignupResponse>> {
    let candidate_id = input.candidate_id;
    let skills = named(input.skills.into_iter().map(|s| (s.skill_name, s.proficiency_level)));
    let languages = named(
        input
            .languages
            .into_iter()
            .map(|l| (l.language_name, l.proficiency_level)),
    );

    let mut tx = state.pool.begin().await?;
    lock_candidate(&mut tx, candidate_id).await?;
    ProfileRepo::replace_skills(&mut tx, candidate_id, &skills).await?;
    ProfileRepo::replace_languages(&mut tx, candidate_id, &languages).await?;
    let progress = advance(&mut tx, candidate_id, ProgressFlag::Skills, SignupStep::Skills).await?;
    tx.commit().await?;

    tracing::info!(
        candidate_id,
        skills = skills.len(),
        languages = languages.len(),
        "Skills saved",
    );
    Ok(Json(
        SignupResponse::step("Skills saved", candidate_id, SignupStep::Skills)
            .with_progress(&progress),
    ))
}

/// POST /api/v1/signup/complete
pub async fn complete(
    State(state): State<AppState>,
    Json(input): Json<CompleteRequest>,
) -> AppResult<Json<SignupResponse>> {
    let candidate_id = input.candidate_id;
    let mut tx = state.pool.begin().await?;
    lock_candidate(&mut tx, candidate_id).await?;

    CandidateRepo::update_in_tx(
        &mut tx,
        candidate_id,
        &UpdateCandidate {
            status: Some(CANDIDATE_ACTIVE.to_string()),
            ..Default::default()
        },
    )
    .await?;
    let progress = ProfileRepo::complete_signup(&mut tx, candidate_id, "complete").await?;
    tx.commit().await?;

    tracing::info!(candidate_id, "Signup completed");
    Ok(Json(SignupResponse {
        success: true,
        message: "Signup completed successfully".into(),
        candidate_id: Some(candidate_id),
        next_step: None,
        expiry_minutes: None,
        otp_code: None,
        progress_percentage: Some(progress.progress_percentage),
        status: Some("COMPLETE"),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Lock the candidate row for the rest of the step, 404 when absent.
async fn lock_candidate(tx: &mut Tx<'_>, candidate_id: DbId) -> AppResult<Candidate> {
    CandidateRepo::lock(tx, candidate_id)
        .await?
        .ok_or_else(|| AppError::not_found("Candidate", candidate_id))
}

/// Mark a step and store the recomputed percentage.
async fn advance(
    tx: &mut Tx<'_>,
    candidate_id: DbId,
    flag: ProgressFlag,
    step: SignupStep,
) -> AppResult<OnboardingProgress> {
    let mut progress = ProfileRepo::mark_step(tx, candidate_id, flag, step.progress_key()).await?;
    let flags = StepFlags {
        personal: progress.personal_details_completed,
        education: progress.education_details_completed,
        skills: progress.skills_completed,
    };
    if !progress.overall_completed {
        ProfileRepo::set_percentage(tx, candidate_id, flags.percentage()).await?;
        progress.progress_percentage = flags.percentage();
    }
    Ok(progress)
}

fn required(field: &str, value: &str) -> AppResult<String> {
    non_blank(Some(value))
        .map(|v| v.trim().to_string())
        .ok_or_else(|| AppError::Core(CoreError::Validation(format!("{field} is required"))))
}

/// Non-blank values overwrite; blank or absent leave the column alone.
fn filled(value: &Option<String>) -> Option<String> {
    non_blank(value.as_deref()).map(|v| v.trim().to_string())
}

fn named(entries: impl Iterator<Item = (String, Option<String>)>) -> Vec<NamedProficiency> {
    entries
        .filter(|(name, _)| !name.trim().is_empty())
        .map(|(name, proficiency_level)| NamedProficiency {
            name: name.trim().to_string(),
            proficiency_level,
        })
        .collect()
}
