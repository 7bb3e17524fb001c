//! Flashcard generation workflow
//!
//! validate → quota check → title → structured completion → parse →
//! record usage. Nothing is persisted here; the caller holds the batch
//! until the review is saved.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::WorkflowError;
use crate::openrouter::{ChatCompletionProvider, ChatMessage, CompletionOptions, ResponseFormat};
use crate::review::{CreationMode, GeneratedCard};
use crate::services::{GenerationLimitService, ValidationService};

/// Cards asked of the model per generation call
const MIN_CARDS_REQUESTED: usize = 5;
const MAX_CARDS_REQUESTED: usize = 8;
/// Suggested titles are capped harder than the 255-char column bound
const SUGGESTED_TITLE_MAX: usize = 50;

/// Generated proposals returned to the caller for review
#[derive(Clone, Debug, Serialize)]
pub struct GeneratedBatch {
    pub set_id: Uuid,
    pub title: String,
    pub flashcards: Vec<GeneratedCard>,
    pub created_at: DateTime<Utc>,
    pub total_cards_count: usize,
}

#[derive(Clone)]
pub struct FlashcardGenerationService {
    provider: Arc<dyn ChatCompletionProvider>,
    limits: GenerationLimitService,
    model: String,
    temperature: f32,
    max_title_tokens: u32,
}

impl FlashcardGenerationService {
    pub fn new(
        provider: Arc<dyn ChatCompletionProvider>,
        limits: GenerationLimitService,
        config: &AppConfig,
    ) -> Self {
        Self {
            provider,
            limits,
            model: config.model.clone(),
            temperature: config.temperature,
            max_title_tokens: config.max_title_tokens,
        }
    }

    pub async fn generate(
        &self,
        user_id: &str,
        source_text: &str,
        title: Option<&str>,
    ) -> Result<GeneratedBatch, WorkflowError> {
        ValidationService::validate_generation_source(source_text)?;
        if let Some(title) = title {
            ValidationService::validate_title(title)?;
        }

        let status = self.limits.check_limit(user_id).await?;
        if status.has_reached_limit {
            return Err(WorkflowError::LimitExceeded {
                used: status.used_count,
                max: status.max_daily_limit,
                reset_at: status.reset_at,
            });
        }

        let set_title = match title {
            Some(title) => title.trim().to_string(),
            None => self.suggest_title(source_text).await,
        };

        let flashcards = self.generate_cards(source_text).await?;

        // Usage is counted once per successful completion call; a counter
        // failure must not lose the generated batch
        if let Err(err) = self.limits.record_usage(user_id).await {
            tracing::warn!(user_id, error = %err, "failed to record generation usage");
        }

        let total_cards_count = flashcards.len();
        Ok(GeneratedBatch {
            set_id: Uuid::new_v4(),
            title: set_title,
            flashcards,
            created_at: Utc::now(),
            total_cards_count,
        })
    }

    /// Ask the model for a short title; any failure falls back to a
    /// deterministic excerpt title rather than failing the generation.
    async fn suggest_title(&self, source_text: &str) -> String {
        let options = CompletionOptions {
            model: self.model.clone(),
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_title_tokens),
            response_format: None,
        };

        match self
            .provider
            .chat_completion(&build_title_messages(source_text), &options)
            .await
        {
            Ok(response) => match response.first_content() {
                Some(content) if !content.trim().is_empty() => normalize_title(content),
                _ => fallback_title(source_text),
            },
            Err(err) => {
                tracing::warn!(error = %err, "title suggestion failed, using excerpt title");
                fallback_title(source_text)
            }
        }
    }

    async fn generate_cards(&self, source_text: &str) -> Result<Vec<GeneratedCard>, WorkflowError> {
        let options = CompletionOptions {
            model: self.model.clone(),
            temperature: Some(self.temperature),
            max_tokens: None,
            response_format: Some(ResponseFormat::json_schema(
                "flashcards",
                flashcard_response_schema(),
                true,
            )),
        };

        let response = self
            .provider
            .chat_completion(&build_generation_messages(source_text), &options)
            .await?;

        let content = response
            .first_content()
            .ok_or_else(|| WorkflowError::Generation("Model returned no choices".to_string()))?;

        parse_flashcard_payload(content)
    }
}

/// JSON schema the model's structured output must satisfy
fn flashcard_response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "flashcards": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "front_content": { "type": "string" },
                        "back_content": { "type": "string" }
                    },
                    "required": ["front_content", "back_content"]
                }
            }
        },
        "required": ["flashcards"]
    })
}

fn build_generation_messages(source_text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(format!(
            "You are an expert educator specializing in creating effective flashcards \
             for learning. Create {MIN_CARDS_REQUESTED}-{MAX_CARDS_REQUESTED} high-quality \
             flashcards based on the provided text. For each flashcard: the front should \
             contain a clear question, prompt, or key term; the back should contain a \
             concise answer or explanation. Cover the most important concepts from the \
             text, create a mix of definition cards, fill-in-the-blank, and contextual \
             questions, keep both sides focused on a single concept, and ensure the cards \
             test understanding rather than memorization."
        )),
        ChatMessage::user(format!(
            "Generate flashcards based on the following text: {source_text}"
        )),
    ]
}

fn build_title_messages(source_text: &str) -> Vec<ChatMessage> {
    let excerpt = char_prefix(source_text, 1000);
    let ellipsis = if source_text.chars().count() > 1000 { "..." } else { "" };
    vec![
        ChatMessage::system(format!(
            "You are a helpful AI assistant that creates concise, descriptive titles \
             for educational content. Create a short, relevant title (maximum \
             {SUGGESTED_TITLE_MAX} characters) based on the provided text content. \
             The title should capture the main subject matter."
        )),
        ChatMessage::user(format!(
            "Create a title for flashcards based on this text: {excerpt}{ellipsis}"
        )),
    ]
}

/// Strip wrapping quotes and cap at the suggested-title bound
fn normalize_title(raw: &str) -> String {
    let mut title = raw.trim();
    if title.len() >= 2 && title.starts_with('"') && title.ends_with('"') {
        title = title[1..title.len() - 1].trim();
    }

    if title.chars().count() > SUGGESTED_TITLE_MAX {
        format!("{}...", char_prefix(title, SUGGESTED_TITLE_MAX - 3))
    } else {
        title.to_string()
    }
}

fn fallback_title(source_text: &str) -> String {
    format!("Flashcards: {}...", char_prefix(source_text.trim(), 30))
}

fn char_prefix(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[derive(Deserialize)]
struct FlashcardPayload {
    flashcards: Vec<PayloadCard>,
}

#[derive(Deserialize)]
struct PayloadCard {
    front_content: String,
    back_content: String,
}

/// Parse the structured-output payload into review candidates. Malformed
/// or empty output is a generation failure; nothing is fabricated.
fn parse_flashcard_payload(content: &str) -> Result<Vec<GeneratedCard>, WorkflowError> {
    let payload: FlashcardPayload = serde_json::from_str(content).map_err(|err| {
        WorkflowError::Generation(format!("Model returned malformed flashcard JSON: {err}"))
    })?;

    if payload.flashcards.is_empty() {
        return Err(WorkflowError::Generation(
            "Model returned no flashcards".to_string(),
        ));
    }

    Ok(payload
        .flashcards
        .into_iter()
        .map(|card| GeneratedCard {
            id: Uuid::new_v4(),
            front_content: card.front_content,
            back_content: card.back_content,
            creation_mode: CreationMode::Ai,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::migrations::{Migrator, MigratorTrait};
    use crate::errors::CompletionError;
    use crate::openrouter::types::{ChatCompletionResponse, CompletionChoice};
    use crate::openrouter::ChatRole;
    use async_trait::async_trait;
    use sea_orm::Database;

    struct StubProvider {
        content: String,
    }

    #[async_trait]
    impl ChatCompletionProvider for StubProvider {
        async fn chat_completion(
            &self,
            _messages: &[ChatMessage],
            _options: &CompletionOptions,
        ) -> Result<ChatCompletionResponse, CompletionError> {
            Ok(ChatCompletionResponse {
                id: None,
                model: None,
                choices: vec![CompletionChoice {
                    message: crate::openrouter::ChatMessage {
                        role: ChatRole::Assistant,
                        content: self.content.clone(),
                    },
                    finish_reason: Some("stop".to_string()),
                }],
                usage: None,
            })
        }
    }

    fn cards_json(n: usize) -> String {
        let cards: Vec<Value> = (0..n)
            .map(|i| json!({"front_content": format!("q{i}"), "back_content": format!("a{i}")}))
            .collect();
        json!({ "flashcards": cards }).to_string()
    }

    async fn service_with(content: String, max_daily: i32) -> FlashcardGenerationService {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let config = AppConfig::from_map(&std::collections::HashMap::from([(
            "OPENROUTER_API_KEY".to_string(),
            "test-key".to_string(),
        )]));
        FlashcardGenerationService::new(
            Arc::new(StubProvider { content }),
            GenerationLimitService::new(db, max_daily),
            &config,
        )
    }

    #[tokio::test]
    async fn generate_returns_ai_cards_with_fresh_ids() {
        let service = service_with(cards_json(6), 5).await;
        let source = "x".repeat(1000);

        let batch = service
            .generate("user-1", &source, Some("My title"))
            .await
            .unwrap();

        assert_eq!(batch.title, "My title");
        assert_eq!(batch.total_cards_count, 6);
        assert_eq!(batch.flashcards.len(), 6);
        for card in &batch.flashcards {
            assert_eq!(card.creation_mode, CreationMode::Ai);
        }
        let mut ids: Vec<Uuid> = batch.flashcards.iter().map(|c| c.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }

    #[tokio::test]
    async fn generation_counts_against_the_daily_limit() {
        let service = service_with(cards_json(5), 1).await;
        let source = "x".repeat(1000);

        service.generate("user-1", &source, Some("t")).await.unwrap();

        let err = service
            .generate("user-1", &source, Some("t"))
            .await
            .unwrap_err();
        match err {
            WorkflowError::LimitExceeded { used, max, .. } => {
                assert_eq!(used, 1);
                assert_eq!(max, 1);
            }
            other => panic!("expected limit error, got {other}"),
        }
    }

    #[tokio::test]
    async fn short_source_is_rejected_before_any_call() {
        let service = service_with(cards_json(5), 5).await;
        let err = service
            .generate("user-1", &"x".repeat(999), None)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
    }

    #[tokio::test]
    async fn malformed_model_output_is_a_generation_failure() {
        let service = service_with("not json at all".to_string(), 5).await;
        let err = service
            .generate("user-1", &"x".repeat(1000), Some("t"))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Generation(_)));
    }

    #[tokio::test]
    async fn empty_card_list_is_a_generation_failure() {
        let service = service_with(cards_json(0), 5).await;
        let err = service
            .generate("user-1", &"x".repeat(1000), Some("t"))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Generation(_)));
    }

    #[test]
    fn normalize_title_strips_quotes_and_caps_length() {
        assert_eq!(normalize_title("\"Rust Ownership\""), "Rust Ownership");
        assert_eq!(normalize_title("  Plain title  "), "Plain title");

        let long = "A very long title that keeps going well past fifty characters total";
        let capped = normalize_title(long);
        assert_eq!(capped.chars().count(), 50);
        assert!(capped.ends_with("..."));
    }

    #[test]
    fn fallback_title_is_a_deterministic_excerpt() {
        let text = "Ownership is Rust's most distinctive feature and it changes everything";
        let title = fallback_title(text);
        assert!(title.starts_with("Flashcards: Ownership is Rust's"));
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), "Flashcards: ...".chars().count() + 30);
    }

    #[test]
    fn payload_parser_rejects_missing_fields() {
        assert!(parse_flashcard_payload(r#"{"flashcards":[{"front_content":"q"}]}"#).is_err());
        assert!(parse_flashcard_payload(r#"{"cards":[]}"#).is_err());
    }

    #[test]
    fn schema_requires_both_card_faces() {
        let schema = flashcard_response_schema();
        let required = &schema["properties"]["flashcards"]["items"]["required"];
        assert_eq!(*required, json!(["front_content", "back_content"]));
    }
}
