//! Candidate aggregate: the candidate row plus its owned detail rows.

use pathway_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `candidates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Candidate {
    pub id: DbId,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
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
    pub status: String,
    pub onboarding_status: String,
    pub engagement_score: f64,
    pub dropout_risk_score: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Candidate {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Insert payload for a new candidate.
#[derive(Debug, Clone, Default)]
pub struct CreateCandidate {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<Date>,
    pub gender: Option<String>,
    pub address_line1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub onboarding_status: String,
    pub engagement_score: f64,
    pub dropout_risk_score: f64,
}

/// Partial update of candidate columns. `None` leaves a column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateCandidate {
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
    pub status: Option<String>,
    pub onboarding_status: Option<String>,
}

/// A row from the `personal_details` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PersonalDetails {
    pub id: DbId,
    pub candidate_id: DbId,
    pub employment_status: Option<String>,
    pub current_job_title: Option<String>,
    pub current_company_name: Option<String>,
    pub years_of_experience: Option<f64>,
    pub bank_account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub bank_name: Option<String>,
    pub account_holder_name: Option<String>,
    pub career_interests: Option<String>,
    pub preferred_job_roles: Option<String>,
    pub preferred_locations: Option<String>,
    pub has_disability: bool,
    pub disability_type: Option<String>,
    pub is_first_generation_learner: bool,
    pub availability_to_relocate: bool,
    pub availability_for_internship: bool,
    pub earliest_join_date: Option<Date>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Upsert payload for `personal_details`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertPersonalDetails {
    pub employment_status: Option<String>,
    pub current_job_title: Option<String>,
    pub current_company_name: Option<String>,
    pub years_of_experience: Option<f64>,
    pub bank_account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub bank_name: Option<String>,
    pub account_holder_name: Option<String>,
    pub career_interests: Option<String>,
    pub preferred_job_roles: Option<String>,
    pub preferred_locations: Option<String>,
    pub has_disability: Option<bool>,
    pub disability_type: Option<String>,
    pub is_first_generation_learner: Option<bool>,
    pub availability_to_relocate: Option<bool>,
    pub availability_for_internship: Option<bool>,
    pub earliest_join_date: Option<Date>,
}

/// A row from the `education_details` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EducationDetails {
    pub id: DbId,
    pub candidate_id: DbId,
    pub tenth_board: Option<String>,
    pub tenth_percentage: Option<f64>,
    pub tenth_year_of_passing: Option<i32>,
    pub tenth_stream: Option<String>,
    pub tenth_school_name: Option<String>,
    pub twelfth_board: Option<String>,
    pub twelfth_percentage: Option<f64>,
    pub twelfth_year_of_passing: Option<i32>,
    pub twelfth_stream: Option<String>,
    pub twelfth_college_name: Option<String>,
    pub graduation_degree: Option<String>,
    pub graduation_specialization: Option<String>,
    pub graduation_percentage: Option<f64>,
    pub graduation_year: Option<i32>,
    pub graduation_university: Option<String>,
    pub certifications: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Upsert payload for `education_details`. Percentages are already parsed.
#[derive(Debug, Clone, Default)]
pub struct UpsertEducationDetails {
    pub tenth_board: Option<String>,
    pub tenth_percentage: Option<f64>,
    pub tenth_year_of_passing: Option<i32>,
    pub tenth_stream: Option<String>,
    pub tenth_school_name: Option<String>,
    pub twelfth_board: Option<String>,
    pub twelfth_percentage: Option<f64>,
    pub twelfth_year_of_passing: Option<i32>,
    pub twelfth_stream: Option<String>,
    pub twelfth_college_name: Option<String>,
    pub graduation_degree: Option<String>,
    pub graduation_specialization: Option<String>,
    pub graduation_percentage: Option<f64>,
    pub graduation_year: Option<i32>,
    pub graduation_university: Option<String>,
    pub certifications: Option<String>,
}

/// A row from `candidate_skills`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CandidateSkill {
    pub id: DbId,
    pub candidate_id: DbId,
    pub skill_name: String,
    pub proficiency_level: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from `candidate_languages`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CandidateLanguage {
    pub id: DbId,
    pub candidate_id: DbId,
    pub language_name: String,
    pub proficiency_level: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A named entry with an optional proficiency, used for skills and languages.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedProficiency {
    pub name: String,
    pub proficiency_level: Option<String>,
}

/// A row from `onboarding_progress`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OnboardingProgress {
    pub id: DbId,
    pub candidate_id: DbId,
    pub signup_completed: bool,
    pub signup_completed_at: Option<Timestamp>,
    pub personal_details_completed: bool,
    pub personal_details_completed_at: Option<Timestamp>,
    pub education_details_completed: bool,
    pub education_details_completed_at: Option<Timestamp>,
    pub skills_completed: bool,
    pub skills_completed_at: Option<Timestamp>,
    pub questions_completed: bool,
    pub questions_completed_at: Option<Timestamp>,
    pub overall_completed: bool,
    pub overall_completed_at: Option<Timestamp>,
    pub current_step: Option<String>,
    pub progress_percentage: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Progress flags that a signup step can mark complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressFlag {
    PersonalDetails,
    EducationDetails,
    Skills,
    Questions,
}

impl ProgressFlag {
    /// Column prefix in `onboarding_progress`.
    pub fn column(self) -> &'static str {
        match self {
            ProgressFlag::PersonalDetails => "personal_details_completed",
            ProgressFlag::EducationDetails => "education_details_completed",
            ProgressFlag::Skills => "skills_completed",
            ProgressFlag::Questions => "questions_completed",
        }
    }
}

/// Candidate with every owned row, as returned by the detail endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateDetail {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub personal_details: Option<PersonalDetails>,
    pub education_details: Option<EducationDetails>,
    pub skills: Vec<CandidateSkill>,
    pub languages: Vec<CandidateLanguage>,
    pub progress: Option<OnboardingProgress>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CandidateStats {
    pub total_candidates: i64,
    pub active_candidates: i64,
    pub at_risk_candidates: i64,
}
