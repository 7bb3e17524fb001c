//! HTTP handlers and the error-to-response mapping

pub mod flashcard_sets;
pub mod generation;
pub mod health;

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::errors::WorkflowError;

/// Handler-level error: either field-level request validation collected by
/// the handler itself, or a workflow error bubbled up from a service.
#[derive(Debug)]
pub enum ApiError {
    Validation { details: BTreeMap<String, String> },
    Workflow(WorkflowError),
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        ApiError::Workflow(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation { details } => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "VALIDATION_FAILED",
                    "message": "Invalid request",
                    "details": details,
                })),
            )
                .into_response(),
            ApiError::Workflow(err) => workflow_response(err),
        }
    }
}

fn workflow_response(err: WorkflowError) -> Response {
    if let WorkflowError::LimitExceeded { used, max, reset_at } = &err {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": err.error_code(),
                "message": err.to_string(),
                "used_count": used,
                "max_daily_limit": max,
                "reset_at": reset_at,
            })),
        )
            .into_response();
    }

    if err.is_client_error() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": err.error_code(),
                "message": err.to_string(),
            })),
        )
            .into_response();
    }

    // Internal failures get a generic body; the detail goes to the log
    tracing::error!(error = %err, "request failed");
    let message = match &err {
        WorkflowError::Generation(_) | WorkflowError::Completion(_) => {
            "Failed to generate flashcards"
        }
        WorkflowError::Persistence(_) => "Failed to save flashcard set",
        _ => "Internal server error",
    };
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": err.error_code(),
            "message": message,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn limit_errors_map_to_429() {
        let err = ApiError::from(WorkflowError::LimitExceeded {
            used: 5,
            max: 5,
            reset_at: Utc::now(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn validation_errors_map_to_400() {
        let err = ApiError::from(WorkflowError::Validation("too short".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let mut details = BTreeMap::new();
        details.insert("accept[0]".to_string(), "must be a valid UUID".to_string());
        let err = ApiError::Validation { details };
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn generation_failures_map_to_500() {
        let err = ApiError::from(WorkflowError::Generation("model exploded".to_string()));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
