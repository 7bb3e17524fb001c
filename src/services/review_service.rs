//! Review save step
//!
//! Persists the outcome of a reviewed generation batch: the accepted cards
//! become a permanent flashcard set, the source text is kept alongside it,
//! and a generation log row records the decision counts either way.
//! The set and its cards are one transaction; the source text and the log
//! are best-effort.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};
use serde::Serialize;
use uuid::Uuid;

use crate::database::entities::{flashcard_sets, flashcards, generation_logs, source_texts};
use crate::errors::{ReviewError, WorkflowError};
use crate::review::CreationMode;
use crate::services::ValidationService;

/// A reviewed card as submitted by the client, content included so edits
/// made during review survive the save without server-side session state.
#[derive(Clone, Debug)]
pub struct ReviewedCard {
    pub id: Uuid,
    pub front_content: String,
    pub back_content: String,
    pub creation_mode: CreationMode,
}

#[derive(Clone, Debug)]
pub struct SaveReviewCommand {
    pub set_id: Uuid,
    pub title: String,
    pub source_text: String,
    pub flashcards: Vec<ReviewedCard>,
    pub accept: Vec<Uuid>,
    pub reject: Vec<Uuid>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ReviewOutcome {
    pub set_id: String,
    pub accepted_count: i32,
    pub rejected_count: i32,
    pub status: String,
    pub message: String,
}

#[derive(Clone)]
pub struct FlashcardReviewService {
    db: DatabaseConnection,
}

impl FlashcardReviewService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn save_review(
        &self,
        user_id: &str,
        command: SaveReviewCommand,
    ) -> Result<ReviewOutcome, WorkflowError> {
        ValidationService::validate_title(&command.title)?;
        ValidationService::validate_review_source(&command.source_text)?;
        validate_decisions(&command)?;

        // clients may resubmit a decision; the duplicate must not count
        // twice or collide on the card primary key
        let accept = dedup_ids(&command.accept);
        let reject = dedup_ids(&command.reject);

        let accepted_count = accept.len() as i32;
        let rejected_count = reject.len() as i32;
        let now = Utc::now();

        let submitted: BTreeMap<Uuid, &ReviewedCard> =
            command.flashcards.iter().map(|card| (card.id, card)).collect();

        // Set + cards are critical; everything after is best-effort
        let permanent_set_id = if accept.is_empty() {
            None
        } else {
            let set_id = Uuid::new_v4().to_string();
            let txn = self.db.begin().await?;

            flashcard_sets::ActiveModel {
                id: Set(set_id.clone()),
                user_id: Set(user_id.to_string()),
                title: Set(command.title.trim().to_string()),
                total_cards_count: Set(accepted_count),
                created_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(persistence_error)?;

            for card_id in &accept {
                // validated above, every accepted id has a submitted card
                if let Some(card) = submitted.get(card_id) {
                    flashcards::ActiveModel {
                        id: Set(card_id.to_string()),
                        set_id: Set(set_id.clone()),
                        front_content: Set(card.front_content.clone()),
                        back_content: Set(card.back_content.clone()),
                        creation_mode: Set(card.creation_mode.as_str().to_string()),
                        created_at: Set(now),
                    }
                    .insert(&txn)
                    .await
                    .map_err(persistence_error)?;
                }
            }

            txn.commit().await.map_err(persistence_error)?;
            Some(set_id)
        };

        if let Some(set_id) = &permanent_set_id {
            let source_row = source_texts::ActiveModel {
                set_id: Set(set_id.clone()),
                content: Set(command.source_text.clone()),
                created_at: Set(now),
            };
            if let Err(err) = source_row.insert(&self.db).await {
                tracing::warn!(set_id, error = %err, "failed to save source text");
            }
        }

        let log_id = Uuid::new_v4().to_string();
        let log_row = generation_logs::ActiveModel {
            id: Set(log_id.clone()),
            user_id: Set(user_id.to_string()),
            set_id: Set(permanent_set_id.clone()),
            set_title: Set(command.title.trim().to_string()),
            generated_count: Set(accepted_count + rejected_count),
            accepted_count: Set(accepted_count),
            rejected_count: Set(rejected_count),
            generated_at: Set(now),
        };
        if let Err(err) = log_row.insert(&self.db).await {
            tracing::warn!(user_id, error = %err, "failed to save generation log");
        }

        let (set_id, message) = match permanent_set_id {
            Some(set_id) => (set_id, "Flashcard set saved successfully".to_string()),
            None => (
                log_id,
                "Generation log saved successfully (no cards accepted)".to_string(),
            ),
        };

        Ok(ReviewOutcome {
            set_id,
            accepted_count,
            rejected_count,
            status: "success".to_string(),
            message,
        })
    }
}

/// First occurrence wins, input order preserved.
fn dedup_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = BTreeSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Every decision id must reference a submitted card, and no card may be
/// both accepted and rejected.
fn validate_decisions(command: &SaveReviewCommand) -> Result<(), WorkflowError> {
    let known: BTreeSet<Uuid> = command.flashcards.iter().map(|card| card.id).collect();

    for id in command.accept.iter().chain(command.reject.iter()) {
        if !known.contains(id) {
            return Err(ReviewError::UnknownCard(*id).into());
        }
    }

    let accepted: BTreeSet<Uuid> = command.accept.iter().copied().collect();
    for id in &command.reject {
        if accepted.contains(id) {
            return Err(WorkflowError::Validation(format!(
                "Flashcard {} cannot be both accepted and rejected",
                id
            )));
        }
    }

    Ok(())
}

fn persistence_error(err: sea_orm::DbErr) -> WorkflowError {
    WorkflowError::Persistence(format!("Failed to save flashcard set: {err}"))
}
