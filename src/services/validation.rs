use uuid::Uuid;

use crate::errors::WorkflowError;

/// Character bounds for source text submitted to generation
pub const GENERATION_SOURCE_MIN: usize = 1000;
pub const SOURCE_MAX: usize = 10000;
/// The review save accepts shorter excerpts than generation requires
pub const REVIEW_SOURCE_MIN: usize = 100;
pub const TITLE_MAX: usize = 255;

/// Input validation for the generation and review endpoints
pub struct ValidationService;

impl ValidationService {
    /// Source text bound check for generation; the message names the
    /// violated bound and the current length.
    pub fn validate_generation_source(source_text: &str) -> Result<(), WorkflowError> {
        Self::validate_source_bounds(source_text, GENERATION_SOURCE_MIN)
    }

    /// Source text bound check for the review save
    pub fn validate_review_source(source_text: &str) -> Result<(), WorkflowError> {
        Self::validate_source_bounds(source_text, REVIEW_SOURCE_MIN)
    }

    fn validate_source_bounds(source_text: &str, min: usize) -> Result<(), WorkflowError> {
        let length = source_text.chars().count();

        if length < min {
            return Err(WorkflowError::Validation(format!(
                "Source text must be at least {} characters (current: {})",
                min, length
            )));
        }

        if length > SOURCE_MAX {
            return Err(WorkflowError::Validation(format!(
                "Source text must be no more than {} characters (current: {})",
                SOURCE_MAX, length
            )));
        }

        Ok(())
    }

    pub fn validate_title(title: &str) -> Result<(), WorkflowError> {
        let trimmed = title.trim();

        if trimmed.is_empty() {
            return Err(WorkflowError::Validation(
                "Title cannot be empty".to_string(),
            ));
        }

        if trimmed.chars().count() > TITLE_MAX {
            return Err(WorkflowError::Validation(format!(
                "Title must be {} characters or less",
                TITLE_MAX
            )));
        }

        Ok(())
    }

    /// Parse a uuid, naming the offending field on failure
    pub fn parse_uuid(field: &str, value: &str) -> Result<Uuid, WorkflowError> {
        Uuid::parse_str(value).map_err(|_| {
            WorkflowError::Validation(format!("{} must be a valid UUID (got \"{}\")", field, value))
        })
    }
}
