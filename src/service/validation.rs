//! Milestone payload validation.

use crate::error::AppError;
use crate::models::Milestone;

pub const NAME_MAX_LENGTH: usize = 255;

/// Milestone kinds reported by provider platforms.
pub const MILESTONE_TYPES: &[&str] = &[
    "enrollment",
    "quiz_submission",
    "assignment_submission",
    "grade_received",
    "discussion_post",
];

pub struct MilestoneValidator;

impl MilestoneValidator {
    /// Validate a milestone about to be created. `name` is required.
    pub fn validate(milestone: &Milestone) -> Result<(), AppError> {
        if milestone.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".into()));
        }
        Self::validate_partial(milestone)
    }

    /// Validate only what a partial update can set; zero / empty fields are skipped.
    pub fn validate_partial(milestone: &Milestone) -> Result<(), AppError> {
        if milestone.name.chars().count() > NAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "name must be at most {} characters",
                NAME_MAX_LENGTH
            )));
        }
        if milestone.program_id < 0 {
            return Err(AppError::Validation("program_id must not be negative".into()));
        }
        if milestone.user_id < 0 {
            return Err(AppError::Validation("user_id must not be negative".into()));
        }
        if !milestone.milestone_type.is_empty()
            && !MILESTONE_TYPES.contains(&milestone.milestone_type.as_str())
        {
            return Err(AppError::Validation(format!(
                "milestone_type must be one of: {:?}",
                MILESTONE_TYPES
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milestone(name: &str) -> Milestone {
        Milestone {
            name: name.into(),
            program_id: 3,
            ..Default::default()
        }
    }

    #[test]
    fn accepts_minimal_create() {
        assert!(MilestoneValidator::validate(&milestone("Finish Module 1")).is_ok());
    }

    #[test]
    fn create_requires_name() {
        let err = MilestoneValidator::validate(&milestone("  ")).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "name is required"));
    }

    #[test]
    fn partial_allows_empty_name() {
        assert!(MilestoneValidator::validate_partial(&milestone("")).is_ok());
    }

    #[test]
    fn rejects_long_name_negative_ids_and_unknown_type() {
        let long = milestone(&"x".repeat(NAME_MAX_LENGTH + 1));
        assert!(MilestoneValidator::validate_partial(&long).is_err());

        let negative = Milestone { program_id: -1, ..milestone("a") };
        assert!(MilestoneValidator::validate_partial(&negative).is_err());

        let typed = Milestone { milestone_type: "graduation".into(), ..milestone("a") };
        assert!(MilestoneValidator::validate_partial(&typed).is_err());

        let known = Milestone { milestone_type: "quiz_submission".into(), ..milestone("a") };
        assert!(MilestoneValidator::validate_partial(&known).is_ok());
    }
}
