//! Chat-completion service boundary (OpenRouter)

pub mod client;
pub mod types;

pub use client::{parse_sse_line, OpenRouterClient, SseEvent};
pub use types::{
    ChatCompletionChunk, ChatCompletionResponse, ChatMessage, ChatRole, CompletionOptions,
    ResponseFormat,
};

use async_trait::async_trait;

use crate::errors::CompletionError;

/// Seam for the completion call so services can be tested with a stub
/// provider instead of the live API.
#[async_trait]
pub trait ChatCompletionProvider: Send + Sync {
    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<ChatCompletionResponse, CompletionError>;
}
