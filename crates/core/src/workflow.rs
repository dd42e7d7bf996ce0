//! Candidate workflow statuses and the screening -> orientation -> enrollment
//! state machine.
//!
//! The functions here decide the next status for each stage-completion
//! operation. Persistence (row locking, stamping actor/notes, seat
//! bookkeeping) happens in the caller inside a single transaction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle status of a candidate workflow, stored as its `as_str` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowStatus {
    PendingScreening,
    PendingOrientation,
    PendingEnroll,
    Enrolled,
    /// Defined for reporting; no operation currently moves a workflow here.
    Dropped,
    OnHold,
}

impl WorkflowStatus {
    pub const ALL: [WorkflowStatus; 6] = [
        WorkflowStatus::PendingScreening,
        WorkflowStatus::PendingOrientation,
        WorkflowStatus::PendingEnroll,
        WorkflowStatus::Enrolled,
        WorkflowStatus::Dropped,
        WorkflowStatus::OnHold,
    ];

    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowStatus::PendingScreening => "PENDING_SCREENING",
            WorkflowStatus::PendingOrientation => "PENDING_ORIENTATION",
            WorkflowStatus::PendingEnroll => "PENDING_ENROLL",
            WorkflowStatus::Enrolled => "ENROLLED",
            WorkflowStatus::Dropped => "DROPPED",
            WorkflowStatus::OnHold => "ON_HOLD",
        }
    }

    /// Human-readable label shown in admin screens.
    pub fn display_name(self) -> &'static str {
        match self {
            WorkflowStatus::PendingScreening => "Pending Screening",
            WorkflowStatus::PendingOrientation => "Pending Orientation",
            WorkflowStatus::PendingEnroll => "Pending Enrollment",
            WorkflowStatus::Enrolled => "Enrolled",
            WorkflowStatus::Dropped => "Dropped",
            WorkflowStatus::OnHold => "On Hold",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkflowStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown workflow status '{s}'")))
    }
}

/// Lets row decoders read the TEXT column straight into the enum.
impl TryFrom<String> for WorkflowStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

pub mod state_machine {
    use super::WorkflowStatus;
    use crate::error::CoreError;

    /// Returns the statuses reachable from `from`.
    ///
    /// `Enrolled`, `OnHold` and `Dropped` are terminal.
    pub fn valid_transitions(from: WorkflowStatus) -> &'static [WorkflowStatus] {
        match from {
            WorkflowStatus::PendingScreening => &[
                WorkflowStatus::PendingOrientation,
                WorkflowStatus::OnHold,
            ],
            WorkflowStatus::PendingOrientation => &[WorkflowStatus::PendingEnroll],
            WorkflowStatus::PendingEnroll => &[WorkflowStatus::Enrolled],
            WorkflowStatus::Enrolled | WorkflowStatus::OnHold | WorkflowStatus::Dropped => &[],
        }
    }

    /// Check whether a transition from `from` to `to` is valid.
    pub fn can_transition(from: WorkflowStatus, to: WorkflowStatus) -> bool {
        valid_transitions(from).contains(&to)
    }

    /// Validate a state transition, returning an error for invalid ones.
    pub fn validate_transition(from: WorkflowStatus, to: WorkflowStatus) -> Result<(), CoreError> {
        if can_transition(from, to) {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition(format!(
                "Cannot move workflow from {} to {}",
                from.display_name(),
                to.display_name()
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// Stage completion
// ---------------------------------------------------------------------------

/// One of the three recorded stages of a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Screening,
    Orientation,
    Enrollment,
}

impl Stage {
    /// The only status from which this stage may be completed.
    pub fn required_status(self) -> WorkflowStatus {
        match self {
            Stage::Screening => WorkflowStatus::PendingScreening,
            Stage::Orientation => WorkflowStatus::PendingOrientation,
            Stage::Enrollment => WorkflowStatus::PendingEnroll,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Stage::Screening => "screening",
            Stage::Orientation => "orientation",
            Stage::Enrollment => "enrollment",
        }
    }

    /// Fail unless `current` is the status this stage starts from.
    pub fn ensure_ready(self, current: WorkflowStatus) -> Result<(), CoreError> {
        let required = self.required_status();
        if current == required {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition(format!(
                "Cannot complete {} while workflow is {} (expected {})",
                self.label(),
                current.display_name(),
                required.display_name()
            )))
        }
    }
}

/// Next status after screening: approved candidates move on to orientation,
/// rejected ones are put on hold.
pub fn screening_outcome(current: WorkflowStatus, approved: bool) -> Result<WorkflowStatus, CoreError> {
    Stage::Screening.ensure_ready(current)?;
    let next = if approved {
        WorkflowStatus::PendingOrientation
    } else {
        WorkflowStatus::OnHold
    };
    state_machine::validate_transition(current, next)?;
    Ok(next)
}

/// Next status after an orientation update.
///
/// An update with `completed = false` is a progress note: the fields are
/// recorded but the status stays `PendingOrientation`.
pub fn orientation_outcome(
    current: WorkflowStatus,
    completed: bool,
) -> Result<WorkflowStatus, CoreError> {
    Stage::Orientation.ensure_ready(current)?;
    if !completed {
        return Ok(current);
    }
    let next = WorkflowStatus::PendingEnroll;
    state_machine::validate_transition(current, next)?;
    Ok(next)
}

/// Next status after enrollment into a batch.
pub fn enrollment_outcome(current: WorkflowStatus) -> Result<WorkflowStatus, CoreError> {
    Stage::Enrollment.ensure_ready(current)?;
    let next = WorkflowStatus::Enrolled;
    state_machine::validate_transition(current, next)?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::state_machine::*;
    use super::*;

    // -----------------------------------------------------------------------
    // Status encoding
    // -----------------------------------------------------------------------

    #[test]
    fn status_round_trips_through_str() {
        for status in WorkflowStatus::ALL {
            assert_eq!(status.as_str().parse::<WorkflowStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_validation_error() {
        assert_matches!(
            "WAITLISTED".parse::<WorkflowStatus>(),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn pending_enroll_display_name() {
        assert_eq!(WorkflowStatus::PendingEnroll.display_name(), "Pending Enrollment");
    }

    #[test]
    fn serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&WorkflowStatus::OnHold).unwrap();
        assert_eq!(json, "\"ON_HOLD\"");
    }

    // -----------------------------------------------------------------------
    // Transition table
    // -----------------------------------------------------------------------

    #[test]
    fn screening_can_advance_or_hold() {
        assert!(can_transition(WorkflowStatus::PendingScreening, WorkflowStatus::PendingOrientation));
        assert!(can_transition(WorkflowStatus::PendingScreening, WorkflowStatus::OnHold));
    }

    #[test]
    fn screening_cannot_skip_to_enrolled() {
        assert!(!can_transition(WorkflowStatus::PendingScreening, WorkflowStatus::Enrolled));
    }

    #[test]
    fn nothing_reaches_dropped() {
        for status in WorkflowStatus::ALL {
            assert!(!can_transition(status, WorkflowStatus::Dropped));
        }
    }

    #[test]
    fn invalid_transition_error_names_both_states() {
        let err = validate_transition(WorkflowStatus::Enrolled, WorkflowStatus::PendingEnroll)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Enrolled"));
        assert!(msg.contains("Pending Enrollment"));
    }

    // -----------------------------------------------------------------------
    // Stage outcomes
    // -----------------------------------------------------------------------

    #[test]
    fn approved_screening_moves_to_orientation() {
        let next = screening_outcome(WorkflowStatus::PendingScreening, true).unwrap();
        assert_eq!(next, WorkflowStatus::PendingOrientation);
    }

    #[test]
    fn rejected_screening_moves_to_on_hold() {
        let next = screening_outcome(WorkflowStatus::PendingScreening, false).unwrap();
        assert_eq!(next, WorkflowStatus::OnHold);
    }

    #[test]
    fn second_screening_is_rejected() {
        let after_first = screening_outcome(WorkflowStatus::PendingScreening, true).unwrap();
        assert_matches!(
            screening_outcome(after_first, true),
            Err(CoreError::InvalidTransition(_))
        );
    }

    #[test]
    fn incomplete_orientation_keeps_status() {
        let next = orientation_outcome(WorkflowStatus::PendingOrientation, false).unwrap();
        assert_eq!(next, WorkflowStatus::PendingOrientation);
    }

    #[test]
    fn completed_orientation_moves_to_pending_enroll() {
        let next = orientation_outcome(WorkflowStatus::PendingOrientation, true).unwrap();
        assert_eq!(next, WorkflowStatus::PendingEnroll);
    }

    #[test]
    fn orientation_requires_pending_orientation() {
        assert_matches!(
            orientation_outcome(WorkflowStatus::PendingScreening, true),
            Err(CoreError::InvalidTransition(_))
        );
        assert_matches!(
            orientation_outcome(WorkflowStatus::OnHold, false),
            Err(CoreError::InvalidTransition(_))
        );
    }

    #[test]
    fn enrollment_only_from_pending_enroll() {
        assert_eq!(
            enrollment_outcome(WorkflowStatus::PendingEnroll).unwrap(),
            WorkflowStatus::Enrolled
        );
        for status in [
            WorkflowStatus::PendingScreening,
            WorkflowStatus::PendingOrientation,
            WorkflowStatus::Enrolled,
            WorkflowStatus::OnHold,
            WorkflowStatus::Dropped,
        ] {
            assert_matches!(enrollment_outcome(status), Err(CoreError::InvalidTransition(_)));
        }
    }
}
