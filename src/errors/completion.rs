//! Errors from the chat-completion service boundary

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("OpenRouter API key is not configured")]
    MissingApiKey,

    #[error("Request to the completion service timed out")]
    Timeout,

    #[error("Authentication failed with the completion service")]
    Authentication,

    #[error("Completion service quota exceeded; try again later")]
    QuotaExceeded,

    #[error("Bad request to the completion service: {0}")]
    BadRequest(String),

    #[error("Completion service is currently unavailable (status {0})")]
    Unavailable(u16),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),
}

impl CompletionError {
    /// Whether resubmitting the same request can reasonably succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CompletionError::Timeout
                | CompletionError::QuotaExceeded
                | CompletionError::Unavailable(_)
                | CompletionError::Transport(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(CompletionError::Timeout.is_retryable());
        assert!(CompletionError::Unavailable(503).is_retryable());
        assert!(!CompletionError::MissingApiKey.is_retryable());
        assert!(!CompletionError::Authentication.is_retryable());
        assert!(!CompletionError::MalformedResponse("not json".to_string()).is_retryable());
    }
}
