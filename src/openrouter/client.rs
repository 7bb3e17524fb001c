//! Reqwest-based OpenRouter client
//!
//! Non-streaming requests use the configured timeout and map HTTP status
//! classes onto [`CompletionError`]. Streaming requests parse the
//! server-sent-event body line by line until the `[DONE]` sentinel.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::StatusCode;

use crate::config::AppConfig;
use crate::errors::CompletionError;

use super::types::{
    ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
    CompletionOptions,
};
use super::ChatCompletionProvider;

pub struct OpenRouterClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenRouterClient {
    pub fn new(config: &AppConfig) -> Result<Self, CompletionError> {
        if config.api_key.is_empty() {
            return Err(CompletionError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Send a non-streaming chat completion request
    pub async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<ChatCompletionResponse, CompletionError> {
        let request = ChatCompletionRequest {
            model: &options.model,
            messages,
            response_format: options.response_format.as_ref(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            stream: false,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("X-Title", "flashgen")
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, body));
        }

        response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|err| CompletionError::MalformedResponse(err.to_string()))
    }

    /// Stream a chat completion, invoking `on_chunk` per incremental delta.
    /// Returns when the `[DONE]` sentinel arrives or the stream ends.
    pub async fn stream_chat_completion(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
        mut on_chunk: impl FnMut(ChatCompletionChunk),
    ) -> Result<(), CompletionError> {
        let request = ChatCompletionRequest {
            model: &options.model,
            messages,
            response_format: options.response_format.as_ref(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            stream: true,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("X-Title", "flashgen")
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, body));
        }

        let mut stream = response.bytes_stream();
        let mut buffer = String::new();

        while let Some(bytes) = stream.next().await {
            let bytes = bytes.map_err(map_transport_error)?;
            buffer.push_str(&String::from_utf8_lossy(&bytes));

            while let Some(newline) = buffer.find('\n') {
                let line: String = buffer.drain(..=newline).collect();
                match parse_sse_line(&line) {
                    Some(SseEvent::Done) => return Ok(()),
                    Some(SseEvent::Chunk(chunk)) => on_chunk(chunk),
                    None => {}
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl ChatCompletionProvider for OpenRouterClient {
    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<ChatCompletionResponse, CompletionError> {
        OpenRouterClient::chat_completion(self, messages, options).await
    }
}

/// One parsed server-sent-event line
#[derive(Debug)]
pub enum SseEvent {
    Chunk(ChatCompletionChunk),
    Done,
}

/// Parse a single SSE line. Blank lines, comments, and unparsable payloads
/// yield `None`; `data: [DONE]` is the stream terminator.
pub fn parse_sse_line(line: &str) -> Option<SseEvent> {
    let line = line.trim();
    let payload = line.strip_prefix("data: ")?;
    if payload == "[DONE]" {
        return Some(SseEvent::Done);
    }
    serde_json::from_str::<ChatCompletionChunk>(payload)
        .ok()
        .map(SseEvent::Chunk)
}

fn map_transport_error(err: reqwest::Error) -> CompletionError {
    if err.is_timeout() {
        CompletionError::Timeout
    } else {
        CompletionError::Transport(err)
    }
}

fn error_for_status(status: StatusCode, body: String) -> CompletionError {
    match status.as_u16() {
        401 | 403 => CompletionError::Authentication,
        429 => CompletionError::QuotaExceeded,
        400..=499 => CompletionError::BadRequest(body),
        code => CompletionError::Unavailable(code),
    }
}
