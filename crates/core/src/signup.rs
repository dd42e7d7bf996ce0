//! Multi-step signup rules: step ordering, progress percentage, and the
//! lenient parsing applied to free-text form fields.

/// Value stored in required candidate columns until the candidate fills them.
pub const PLACEHOLDER: &str = "PENDING";

/// `candidates.status` for candidates who may proceed through onboarding.
pub const CANDIDATE_ACTIVE: &str = "ACTIVE";

/// `candidates.onboarding_status` values.
pub const ONBOARDING_INCOMPLETE: &str = "INCOMPLETE";
pub const ONBOARDING_COMPLETED: &str = "COMPLETED";

/// Percentage credited per completed profile step.
pub const PERCENT_PER_STEP: i32 = 33;

/// A form step the candidate submits after verifying their contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupStep {
    Verified,
    Profile,
    PersonalDetails,
    EducationDetails,
    Skills,
}

impl SignupStep {
    /// Client route the candidate should visit next.
    pub fn next_step(self) -> &'static str {
        match self {
            SignupStep::Verified | SignupStep::Profile => "personal-details",
            SignupStep::PersonalDetails => "education-details",
            SignupStep::EducationDetails => "skills",
            SignupStep::Skills => "review",
        }
    }

    /// Value recorded in `onboarding_progress.current_step`.
    pub fn progress_key(self) -> &'static str {
        match self {
            SignupStep::Verified | SignupStep::Profile => "signup",
            SignupStep::PersonalDetails => "personal",
            SignupStep::EducationDetails => "education",
            SignupStep::Skills => "skills",
        }
    }
}

/// Completion flags for the three counted profile steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepFlags {
    pub personal: bool,
    pub education: bool,
    pub skills: bool,
}

impl StepFlags {
    pub fn completed_steps(&self) -> i32 {
        [self.personal, self.education, self.skills]
            .into_iter()
            .filter(|done| *done)
            .count() as i32
    }

    /// Progress shown while the signup is still open; finishing the signup
    /// sets 100 explicitly.
    pub fn percentage(&self) -> i32 {
        self.completed_steps() * PERCENT_PER_STEP
    }
}

/// Parse a score typed as `"85"`, `"85.5%"` or `" 72 % "`.
///
/// Returns `None` for anything that is not a finite number in `0..=100`.
pub fn parse_score(raw: &str) -> Option<f64> {
    let cleaned = raw.replace('%', "");
    let value: f64 = cleaned.trim().parse().ok()?;
    (value.is_finite() && (0.0..=100.0).contains(&value)).then_some(value)
}

/// `Some(s)` when `s` carries non-blank text.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_steps_follow_form_order() {
        assert_eq!(SignupStep::Verified.next_step(), "personal-details");
        assert_eq!(SignupStep::PersonalDetails.next_step(), "education-details");
        assert_eq!(SignupStep::EducationDetails.next_step(), "skills");
        assert_eq!(SignupStep::Skills.next_step(), "review");
    }

    #[test]
    fn percentage_counts_steps() {
        let mut flags = StepFlags::default();
        assert_eq!(flags.percentage(), 0);
        flags.personal = true;
        assert_eq!(flags.percentage(), 33);
        flags.skills = true;
        flags.education = true;
        assert_eq!(flags.percentage(), 99);
    }

    #[test]
    fn scores_with_percent_sign() {
        assert_eq!(parse_score("85%"), Some(85.0));
        assert_eq!(parse_score(" 72.5 % "), Some(72.5));
        assert_eq!(parse_score("90"), Some(90.0));
    }

    #[test]
    fn bad_scores_are_ignored() {
        assert_eq!(parse_score("first class"), None);
        assert_eq!(parse_score(""), None);
        assert_eq!(parse_score("120"), None);
        assert_eq!(parse_score("NaN"), None);
    }

    #[test]
    fn blank_strings_are_treated_as_absent() {
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(Some("Pune")), Some("Pune"));
        assert_eq!(non_blank(None), None);
    }
}
