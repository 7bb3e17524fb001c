//! Error taxonomy for the generate/review/save workflow
//!
//! Validation and limit errors surface verbatim to the caller; generation and
//! critical persistence errors surface a generic message while the real cause
//! goes to the server log. Non-critical persistence failures (source text,
//! generation log, limit counter) are never raised as errors at all — the
//! services swallow them with a warning.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::completion::CompletionError;
use super::review::ReviewError;

#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Bad input shape or length; user-correctable
    #[error("{0}")]
    Validation(String),

    /// Daily generation cap reached; user must wait for the reset
    #[error("Daily generation limit reached ({used}/{max}). Try again after {reset_at}.")]
    LimitExceeded {
        used: i32,
        max: i32,
        reset_at: DateTime<Utc>,
    },

    /// Upstream completion call failed or returned non-conforming output
    #[error("Flashcard generation failed: {0}")]
    Generation(String),

    /// Critical persistence failure (set/card insert)
    #[error("Persistence failed: {0}")]
    Persistence(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Completion-service boundary failure
    #[error(transparent)]
    Completion(#[from] CompletionError),

    /// Review state machine rejected an operation
    #[error(transparent)]
    Review(#[from] ReviewError),
}

impl WorkflowError {
    /// Check if this is a client error (400-series)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            WorkflowError::Validation(_)
                | WorkflowError::LimitExceeded { .. }
                | WorkflowError::Review(_)
        )
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            WorkflowError::Validation(_) | WorkflowError::Review(_) => "VALIDATION_FAILED",
            WorkflowError::LimitExceeded { .. } => "LIMIT_EXCEEDED",
            WorkflowError::Generation(_) | WorkflowError::Completion(_) => "GENERATION_FAILED",
            WorkflowError::Persistence(_) => "PERSISTENCE_FAILED",
            WorkflowError::Database(_) => "DATABASE_ERROR",
        }
    }
}
