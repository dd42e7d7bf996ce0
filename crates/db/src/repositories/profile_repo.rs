//! Repository for the rows a candidate owns: personal and education
//! details, skills, languages and onboarding progress.

use pathway_core::types::DbId;
use sqlx::PgPool;

use crate::models::candidate::{
    CandidateLanguage, CandidateSkill, EducationDetails, NamedProficiency, OnboardingProgress,
    PersonalDetails, ProgressFlag, UpsertEducationDetails, UpsertPersonalDetails,
};

const PERSONAL_COLUMNS: &str = "id, candidate_id, employment_status, current_job_title, \
     current_company_name, years_of_experience, bank_account_number, ifsc_code, bank_name, \
     account_holder_name, career_interests, preferred_job_roles, preferred_locations, \
     has_disability, disability_type, is_first_generation_learner, availability_to_relocate, \
     availability_for_internship, earliest_join_date, created_at, updated_at";

const EDUCATION_COLUMNS: &str = "id, candidate_id, tenth_board, tenth_percentage, \
     tenth_year_of_passing, tenth_stream, tenth_school_name, twelfth_board, twelfth_percentage, \
     twelfth_year_of_passing, twelfth_stream, twelfth_college_name, graduation_degree, \
     graduation_specialization, graduation_percentage, graduation_year, graduation_university, \
     certifications, created_at, updated_at";

const PROGRESS_COLUMNS: &str = "id, candidate_id, signup_completed, signup_completed_at, \
     personal_details_completed, personal_details_completed_at, education_details_completed, \
     education_details_completed_at, skills_completed, skills_completed_at, questions_completed, \
     questions_completed_at, overall_completed, overall_completed_at, current_step, \
     progress_percentage, created_at, updated_at";

pub struct ProfileRepo;

impl ProfileRepo {
    // -----------------------------------------------------------------------
    // Personal details
    // -----------------------------------------------------------------------

    pub async fn find_personal(
        pool: &PgPool,
        candidate_id: DbId,
    ) -> Result<Option<PersonalDetails>, sqlx::Error> {
        let query = format!("SELECT {PERSONAL_COLUMNS} FROM personal_details WHERE candidate_id = $1");
        sqlx::query_as::<_, PersonalDetails>(&query)
            .bind(candidate_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or merge the candidate's personal details. `None` fields keep
    /// their stored value.
    pub async fn upsert_personal(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        candidate_id: DbId,
        input: &UpsertPersonalDetails,
    ) -> Result<PersonalDetails, sqlx::Error> {
        let query = format!(
            "INSERT INTO personal_details
                (candidate_id, employment_status, current_job_title, current_company_name,
                 years_of_experience, bank_account_number, ifsc_code, bank_name,
                 account_holder_name, career_interests, preferred_job_roles, preferred_locations,
                 has_disability, disability_type, is_first_generation_learner,
                 availability_to_relocate, availability_for_internship, earliest_join_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                     COALESCE($13, false), $14, COALESCE($15, false),
                     COALESCE($16, false), COALESCE($17, true), $18)
             ON CONFLICT (candidate_id) DO UPDATE SET
                employment_status = COALESCE($2, personal_details.employment_status),
                current_job_title = COALESCE($3, personal_details.current_job_title),
                current_company_name = COALESCE($4, personal_details.current_company_name),
                years_of_experience = COALESCE($5, personal_details.years_of_experience),
                bank_account_number = COALESCE($6, personal_details.bank_account_number),
                ifsc_code = COALESCE($7, personal_details.ifsc_code),
                bank_name = COALESCE($8, personal_details.bank_name),
                account_holder_name = COALESCE($9, personal_details.account_holder_name),
                career_interests = COALESCE($10, personal_details.career_interests),
                preferred_job_roles = COALESCE($11, personal_details.preferred_job_roles),
                preferred_locations = COALESCE($12, personal_details.preferred_locations),
                has_disability = COALESCE($13, personal_details.has_disability),
                disability_type = COALESCE($14, personal_details.disability_type),
                is_first_generation_learner =
                    COALESCE($15, personal_details.is_first_generation_learner),
                availability_to_relocate =
                    COALESCE($16, personal_details.availability_to_relocate),
                availability_for_internship =
                    COALESCE($17, personal_details.availability_for_internship),
                earliest_join_date = COALESCE($18, personal_details.earliest_join_date)
             RETURNING {PERSONAL_COLUMNS}"
        );
        sqlx::query_as::<_, PersonalDetails>(&query)
            .bind(candidate_id)
            .bind(&input.employment_status)
            .bind(&input.current_job_title)
            .bind(&input.current_company_name)
            .bind(input.years_of_experience)
            .bind(&input.bank_account_number)
            .bind(&input.ifsc_code)
            .bind(&input.bank_name)
            .bind(&input.account_holder_name)
            .bind(&input.career_interests)
            .bind(&input.preferred_job_roles)
            .bind(&input.preferred_locations)
            .bind(input.has_disability)
            .bind(&input.disability_type)
            .bind(input.is_first_generation_learner)
            .bind(input.availability_to_relocate)
            .bind(input.availability_for_internship)
            .bind(input.earliest_join_date)
            .fetch_one(&mut **tx)
            .await
    }

    // -----------------------------------------------------------------------
    // Education details
    // -----------------------------------------------------------------------

    pub async fn find_education(
        pool: &PgPool,
        candidate_id: DbId,
    ) -> Result<Option<EducationDetails>, sqlx::Error> {
        let query =
            format!("SELECT {EDUCATION_COLUMNS} FROM education_details WHERE candidate_id = $1");
        sqlx::query_as::<_, EducationDetails>(&query)
            .bind(candidate_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or merge the candidate's education details.
    pub async fn upsert_education(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        candidate_id: DbId,
        input: &UpsertEducationDetails,
    ) -> Result<EducationDetails, sqlx::Error> {
        let query = format!(
            "INSERT INTO education_details
                (candidate_id, tenth_board, tenth_percentage, tenth_year_of_passing, tenth_stream,
                 tenth_school_name, twelfth_board, twelfth_percentage, twelfth_year_of_passing,
                 twelfth_stream, twelfth_college_name, graduation_degree,
                 graduation_specialization, graduation_percentage, graduation_year,
                 graduation_university, certifications)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
             ON CONFLICT (candidate_id) DO UPDATE SET
                tenth_board = COALESCE($2, education_details.tenth_board),
                tenth_percentage = COALESCE($3, education_details.tenth_percentage),
                tenth_year_of_passing = COALESCE($4, education_details.tenth_year_of_passing),
                tenth_stream = COALESCE($5, education_details.tenth_stream),
                tenth_school_name = COALESCE($6, education_details.tenth_school_name),
                twelfth_board = COALESCE($7, education_details.twelfth_board),
                twelfth_percentage = COALESCE($8, education_details.twelfth_percentage),
                twelfth_year_of_passing = COALESCE($9, education_details.twelfth_year_of_passing),
                twelfth_stream = COALESCE($10, education_details.twelfth_stream),
                twelfth_college_name = COALESCE($11, education_details.twelfth_college_name),
                graduation_degree = COALESCE($12, education_details.graduation_degree),
                graduation_specialization =
                    COALESCE($13, education_details.graduation_specialization),
                graduation_percentage = COALESCE($14, education_details.graduation_percentage),
                graduation_year = COALESCE($15, education_details.graduation_year),
                graduation_university = COALESCE($16, education_details.graduation_university),
                certifications = COALESCE($17, education_details.certifications)
             RETURNING {EDUCATION_COLUMNS}"
        );
        sqlx::query_as::<_, EducationDetails>(&query)
            .bind(candidate_id)
            .bind(&input.tenth_board)
            .bind(input.tenth_percentage)
            .bind(input.tenth_year_of_passing)
            .bind(&input.tenth_stream)
            .bind(&input.tenth_school_name)
            .bind(&input.twelfth_board)
            .bind(input.twelfth_percentage)
            .bind(input.twelfth_year_of_passing)
            .bind(&input.twelfth_stream)
            .bind(&input.twelfth_college_name)
            .bind(&input.graduation_degree)
            .bind(&input.graduation_specialization)
            .bind(input.graduation_percentage)
            .bind(input.graduation_year)
            .bind(&input.graduation_university)
            .bind(&input.certifications)
            .fetch_one(&mut **tx)
            .await
    }

    // -----------------------------------------------------------------------
    // Skills and languages
    // -----------------------------------------------------------------------

    pub async fn list_skills(
        pool: &PgPool,
        candidate_id: DbId,
    ) -> Result<Vec<CandidateSkill>, sqlx::Error> {
        sqlx::query_as::<_, CandidateSkill>(
            "SELECT id, candidate_id, skill_name, proficiency_level, created_at, updated_at
             FROM candidate_skills WHERE candidate_id = $1 ORDER BY id ASC",
        )
        .bind(candidate_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_languages(
        pool: &PgPool,
        candidate_id: DbId,
    ) -> Result<Vec<CandidateLanguage>, sqlx::Error> {
        sqlx::query_as::<_, CandidateLanguage>(
            "SELECT id, candidate_id, language_name, proficiency_level, created_at, updated_at
             FROM candidate_languages WHERE candidate_id = $1 ORDER BY id ASC",
        )
        .bind(candidate_id)
        .fetch_all(pool)
        .await
    }

    /// Replace the candidate's skills. Duplicate names keep the last entry.
    pub async fn replace_skills(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        candidate_id: DbId,
        skills: &[NamedProficiency],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM candidate_skills WHERE candidate_id = $1")
            .bind(candidate_id)
            .execute(&mut **tx)
            .await?;
        for skill in skills {
            sqlx::query(
                "INSERT INTO candidate_skills (candidate_id, skill_name, proficiency_level)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (candidate_id, skill_name)
                 DO UPDATE SET proficiency_level = EXCLUDED.proficiency_level",
            )
            .bind(candidate_id)
            .bind(&skill.name)
            .bind(&skill.proficiency_level)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    /// Replace the candidate's languages. Duplicate names keep the last entry.
    pub async fn replace_languages(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        candidate_id: DbId,
        languages: &[NamedProficiency],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM candidate_languages WHERE candidate_id = $1")
            .bind(candidate_id)
            .execute(&mut **tx)
            .await?;
        for language in languages {
            sqlx::query(
                "INSERT INTO candidate_languages (candidate_id, language_name, proficiency_level)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (candidate_id, language_name)
                 DO UPDATE SET proficiency_level = EXCLUDED.proficiency_level",
            )
            .bind(candidate_id)
            .bind(&language.name)
            .bind(&language.proficiency_level)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Onboarding progress
    // -----------------------------------------------------------------------

    pub async fn find_progress(
        pool: &PgPool,
        candidate_id: DbId,
    ) -> Result<Option<OnboardingProgress>, sqlx::Error> {
        let query =
            format!("SELECT {PROGRESS_COLUMNS} FROM onboarding_progress WHERE candidate_id = $1");
        sqlx::query_as::<_, OnboardingProgress>(&query)
            .bind(candidate_id)
            .fetch_optional(pool)
            .await
    }

    /// Create the progress row if missing (idempotent).
    pub async fn ensure_progress(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        candidate_id: DbId,
        current_step: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO onboarding_progress (candidate_id, current_step)
             VALUES ($1, $2)
             ON CONFLICT (candidate_id) DO NOTHING",
        )
        .bind(candidate_id)
        .bind(current_step)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Set one completion flag (keeping its first completion time) and the
    /// current step. Creates the progress row if needed.
    pub async fn mark_step(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        candidate_id: DbId,
        flag: ProgressFlag,
        current_step: &str,
    ) -> Result<OnboardingProgress, sqlx::Error> {
        Self::ensure_progress(tx, candidate_id, current_step).await?;
        let col = flag.column();
        let query = format!(
            "UPDATE onboarding_progress SET
                {col} = true,
                {col}_at = COALESCE({col}_at, NOW()),
                current_step = $2
             WHERE candidate_id = $1
             RETURNING {PROGRESS_COLUMNS}"
        );
        sqlx::query_as::<_, OnboardingProgress>(&query)
            .bind(candidate_id)
            .bind(current_step)
            .fetch_one(&mut **tx)
            .await
    }

    /// Store the progress percentage unless the signup is already complete.
    pub async fn set_percentage(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        candidate_id: DbId,
        percentage: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE onboarding_progress SET progress_percentage = $2
             WHERE candidate_id = $1 AND overall_completed = false",
        )
        .bind(candidate_id)
        .bind(percentage)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Mark signup and overall completion, setting the percentage to 100.
    pub async fn complete_signup(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        candidate_id: DbId,
        current_step: &str,
    ) -> Result<OnboardingProgress, sqlx::Error> {
        Self::ensure_progress(tx, candidate_id, current_step).await?;
        let query = format!(
            "UPDATE onboarding_progress SET
                signup_completed = true,
                signup_completed_at = COALESCE(signup_completed_at, NOW()),
                overall_completed = true,
                overall_completed_at = COALESCE(overall_completed_at, NOW()),
                current_step = $2,
                progress_percentage = 100
             WHERE candidate_id = $1
             RETURNING {PROGRESS_COLUMNS}"
        );
        sqlx::query_as::<_, OnboardingProgress>(&query)
            .bind(candidate_id)
            .bind(current_step)
            .fetch_one(&mut **tx)
            .await
    }
}
