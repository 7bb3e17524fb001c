//! Generation and review-save endpoints

use std::collections::BTreeMap;

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::review::CreationMode;
use crate::server::app::AppState;
use crate::services::{GeneratedBatch, ReviewOutcome, ReviewedCard, SaveReviewCommand};

use super::ApiError;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub source_text: String,
    #[serde(default)]
    pub title: Option<String>,
}

pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GeneratedBatch>, ApiError> {
    let batch = state
        .generation
        .generate(&state.user_id, &request.source_text, request.title.as_deref())
        .await?;
    Ok(Json(batch))
}

/// Review request as sent by the client. Ids arrive as strings so the
/// handler can report non-UUID values with field-level detail instead of
/// a bare deserialization failure.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub set_id: String,
    pub title: String,
    pub source_text: String,
    pub flashcards: Vec<ReviewCardPayload>,
    #[serde(default)]
    pub accept: Vec<String>,
    #[serde(default)]
    pub reject: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewCardPayload {
    pub id: String,
    pub front_content: String,
    pub back_content: String,
    pub creation_mode: String,
}

pub async fn review(
    State(state): State<AppState>,
    Json(request): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<ReviewOutcome>), ApiError> {
    let command = build_review_command(request)?;
    let outcome = state.review.save_review(&state.user_id, command).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Parse every id in the request, collecting all failures so the client
/// gets one response naming each bad field.
fn build_review_command(request: ReviewRequest) -> Result<SaveReviewCommand, ApiError> {
    let mut details = BTreeMap::new();

    let set_id = parse_uuid_field(&mut details, "set_id", &request.set_id);

    let mut flashcards = Vec::with_capacity(request.flashcards.len());
    for (i, card) in request.flashcards.iter().enumerate() {
        let id = parse_uuid_field(&mut details, &format!("flashcards[{i}].id"), &card.id);
        let creation_mode = match CreationMode::parse(&card.creation_mode) {
            Some(mode) => mode,
            None => {
                details.insert(
                    format!("flashcards[{i}].creation_mode"),
                    format!("must be one of manual, ai, ai_edited (got \"{}\")", card.creation_mode),
                );
                CreationMode::Ai
            }
        };
        flashcards.push(ReviewedCard {
            id,
            front_content: card.front_content.clone(),
            back_content: card.back_content.clone(),
            creation_mode,
        });
    }

    let accept = parse_uuid_list(&mut details, "accept", &request.accept);
    let reject = parse_uuid_list(&mut details, "reject", &request.reject);

    if !details.is_empty() {
        return Err(ApiError::Validation { details });
    }

    Ok(SaveReviewCommand {
        set_id,
        title: request.title,
        source_text: request.source_text,
        flashcards,
        accept,
        reject,
    })
}

fn parse_uuid_field(details: &mut BTreeMap<String, String>, field: &str, value: &str) -> Uuid {
    match Uuid::parse_str(value) {
        Ok(id) => id,
        Err(_) => {
            details.insert(
                field.to_string(),
                format!("must be a valid UUID (got \"{}\")", value),
            );
            Uuid::nil()
        }
    }
}

fn parse_uuid_list(
    details: &mut BTreeMap<String, String>,
    field: &str,
    values: &[String],
) -> Vec<Uuid> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| parse_uuid_field(details, &format!("{field}[{i}]"), value))
        .collect()
}
