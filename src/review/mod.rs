//! Client-held review state machine
//!
//! One generation call produces a [`ReviewBatch`]: the candidate cards plus
//! per-card accept/reject decisions and in-place edits. The batch lives until
//! the review is saved or explicitly restarted; [`snapshot`] serializes it so
//! a page reload can recover an in-progress review.
//!
//! Invariants:
//! - a card is never simultaneously accepted and rejected
//! - every id in either decision set references a card in the batch
//! - editing an `ai` card flips it to `ai_edited` exactly once

pub mod snapshot;

pub use snapshot::{ReviewSnapshot, SNAPSHOT_SCHEMA_VERSION};

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ReviewError;

/// Provenance tag on a flashcard
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreationMode {
    Manual,
    Ai,
    AiEdited,
}

impl CreationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreationMode::Manual => "manual",
            CreationMode::Ai => "ai",
            CreationMode::AiEdited => "ai_edited",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "manual" => Some(CreationMode::Manual),
            "ai" => Some(CreationMode::Ai),
            "ai_edited" => Some(CreationMode::AiEdited),
            _ => None,
        }
    }
}

impl fmt::Display for CreationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One candidate flashcard from a generation call
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratedCard {
    pub id: Uuid,
    pub front_content: String,
    pub back_content: String,
    pub creation_mode: CreationMode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewDecision {
    Pending,
    Accepted,
    Rejected,
}

/// Candidate cards plus decisions for one generation call
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReviewBatch {
    pub temp_set_id: Uuid,
    pub source_text: String,
    pub suggested_title: String,
    pub edited_title: Option<String>,
    cards: Vec<GeneratedCard>,
    accepted: BTreeSet<Uuid>,
    rejected: BTreeSet<Uuid>,
}

impl ReviewBatch {
    pub fn new(
        temp_set_id: Uuid,
        source_text: impl Into<String>,
        suggested_title: impl Into<String>,
        cards: Vec<GeneratedCard>,
    ) -> Self {
        Self {
            temp_set_id,
            source_text: source_text.into(),
            suggested_title: suggested_title.into(),
            edited_title: None,
            cards,
            accepted: BTreeSet::new(),
            rejected: BTreeSet::new(),
        }
    }

    pub fn cards(&self) -> &[GeneratedCard] {
        &self.cards
    }

    pub fn card(&self, id: Uuid) -> Option<&GeneratedCard> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn total_count(&self) -> usize {
        self.cards.len()
    }

    /// Effective title: the user's edit wins over the AI suggestion
    pub fn title(&self) -> &str {
        match &self.edited_title {
            Some(title) if !title.trim().is_empty() => title,
            _ => &self.suggested_title,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.edited_title = Some(title.into());
    }

    /// Accept a card. A previously rejected card flips to accepted.
    pub fn accept(&mut self, id: Uuid) -> Result<(), ReviewError> {
        self.ensure_known(id)?;
        self.rejected.remove(&id);
        self.accepted.insert(id);
        Ok(())
    }

    /// Reject a card. A previously accepted card flips to rejected.
    pub fn reject(&mut self, id: Uuid) -> Result<(), ReviewError> {
        self.ensure_known(id)?;
        self.accepted.remove(&id);
        self.rejected.insert(id);
        Ok(())
    }

    pub fn accept_all(&mut self) {
        self.rejected.clear();
        self.accepted = self.cards.iter().map(|card| card.id).collect();
    }

    pub fn reject_all(&mut self) {
        self.accepted.clear();
        self.rejected = self.cards.iter().map(|card| card.id).collect();
    }

    pub fn decision(&self, id: Uuid) -> ReviewDecision {
        if self.accepted.contains(&id) {
            ReviewDecision::Accepted
        } else if self.rejected.contains(&id) {
            ReviewDecision::Rejected
        } else {
            ReviewDecision::Pending
        }
    }

    /// Apply an in-place edit. Independent of the card's decision state;
    /// an `ai` card becomes `ai_edited`, and stays that way on later edits.
    pub fn edit_card(
        &mut self,
        id: Uuid,
        front_content: Option<&str>,
        back_content: Option<&str>,
    ) -> Result<&GeneratedCard, ReviewError> {
        let card = self
            .cards
            .iter_mut()
            .find(|card| card.id == id)
            .ok_or(ReviewError::UnknownCard(id))?;

        if let Some(front) = front_content {
            card.front_content = front.to_string();
        }
        if let Some(back) = back_content {
            card.back_content = back.to_string();
        }
        if card.creation_mode == CreationMode::Ai {
            card.creation_mode = CreationMode::AiEdited;
        }

        Ok(card)
    }

    pub fn accepted_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.accepted.iter().copied()
    }

    pub fn rejected_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.rejected.iter().copied()
    }

    pub fn accepted_cards(&self) -> Vec<&GeneratedCard> {
        self.cards
            .iter()
            .filter(|card| self.accepted.contains(&card.id))
            .collect()
    }

    /// Cards with a decision, accepted or rejected
    pub fn reviewed_count(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }

    /// Review is complete when every card has a decision
    pub fn is_complete(&self) -> bool {
        self.reviewed_count() == self.cards.len()
    }

    fn ensure_known(&self, id: Uuid) -> Result<(), ReviewError> {
        if self.card(id).is_none() {
            return Err(ReviewError::UnknownCard(id));
        }
        Ok(())
    }
}

/// Sequential position over the ordered batch; bounds-checked, no wraparound
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReviewCursor {
    index: usize,
}

impl ReviewCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(index: usize) -> Self {
        Self { index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current<'a>(&self, batch: &'a ReviewBatch) -> Option<&'a GeneratedCard> {
        batch.cards.get(self.index)
    }

    /// Advance to the next card; returns false at the end of the batch
    pub fn next(&mut self, batch: &ReviewBatch) -> bool {
        if self.index + 1 < batch.total_count() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Step back; returns false at the start of the batch
    pub fn previous(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Advancing past the last card finishes the review, but only once
    /// every card has a decision
    pub fn can_finish(&self, batch: &ReviewBatch) -> bool {
        self.index + 1 >= batch.total_count() && batch.is_complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(front: &str, back: &str) -> GeneratedCard {
        GeneratedCard {
            id: Uuid::new_v4(),
            front_content: front.to_string(),
            back_content: back.to_string(),
            creation_mode: CreationMode::Ai,
        }
    }

    fn batch_of(n: usize) -> ReviewBatch {
        let cards = (0..n).map(|i| card(&format!("q{i}"), &format!("a{i}"))).collect();
        ReviewBatch::new(Uuid::new_v4(), "source", "Suggested", cards)
    }

    #[test]
    fn decisions_stay_disjoint_under_flips() {
        let mut batch = batch_of(3);
        let id = batch.cards()[0].id;

        batch.accept(id).unwrap();
        assert_eq!(batch.decision(id), ReviewDecision::Accepted);

        batch.reject(id).unwrap();
        assert_eq!(batch.decision(id), ReviewDecision::Rejected);
        assert_eq!(batch.accepted_ids().count(), 0);

        batch.accept(id).unwrap();
        assert_eq!(batch.decision(id), ReviewDecision::Accepted);
        assert_eq!(batch.rejected_ids().count(), 0);
        assert_eq!(batch.reviewed_count(), 1);
    }

    #[test]
    fn unknown_card_is_rejected() {
        let mut batch = batch_of(2);
        let stranger = Uuid::new_v4();
        assert_eq!(batch.accept(stranger), Err(ReviewError::UnknownCard(stranger)));
        assert_eq!(batch.reject(stranger), Err(ReviewError::UnknownCard(stranger)));
    }

    #[test]
    fn editing_flips_creation_mode_exactly_once() {
        let mut batch = batch_of(1);
        let id = batch.cards()[0].id;

        let edited = batch.edit_card(id, Some("new front"), None).unwrap();
        assert_eq!(edited.front_content, "new front");
        assert_eq!(edited.creation_mode, CreationMode::AiEdited);

        let edited = batch.edit_card(id, None, Some("new back")).unwrap();
        assert_eq!(edited.back_content, "new back");
        assert_eq!(edited.creation_mode, CreationMode::AiEdited);
    }

    #[test]
    fn edit_is_independent_of_decision_state() {
        let mut batch = batch_of(1);
        let id = batch.cards()[0].id;
        batch.reject(id).unwrap();
        batch.edit_card(id, Some("fixed"), None).unwrap();
        assert_eq!(batch.decision(id), ReviewDecision::Rejected);
        assert_eq!(batch.accepted_cards().len(), 0);
    }

    #[test]
    fn accept_all_and_reject_all_complete_the_review() {
        let mut batch = batch_of(4);
        let first = batch.cards()[0].id;
        batch.reject(first).unwrap();

        batch.accept_all();
        assert!(batch.is_complete());
        assert_eq!(batch.accepted_ids().count(), 4);
        assert_eq!(batch.rejected_ids().count(), 0);

        batch.reject_all();
        assert!(batch.is_complete());
        assert_eq!(batch.accepted_ids().count(), 0);
        assert_eq!(batch.rejected_ids().count(), 4);
    }

    #[test]
    fn edited_title_wins_over_suggestion() {
        let mut batch = batch_of(1);
        assert_eq!(batch.title(), "Suggested");
        batch.set_title("My deck");
        assert_eq!(batch.title(), "My deck");
        batch.set_title("   ");
        assert_eq!(batch.title(), "Suggested");
    }

    #[test]
    fn cursor_is_bounds_checked() {
        let batch = batch_of(2);
        let mut cursor = ReviewCursor::new();

        assert!(!cursor.previous());
        assert!(cursor.next(&batch));
        assert_eq!(cursor.index(), 1);
        assert!(!cursor.next(&batch));
        assert_eq!(cursor.index(), 1);
        assert!(cursor.previous());
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn finishing_requires_full_review() {
        let mut batch = batch_of(2);
        let mut cursor = ReviewCursor::new();
        cursor.next(&batch);

        assert!(!cursor.can_finish(&batch));

        let ids: Vec<Uuid> = batch.cards().iter().map(|c| c.id).collect();
        batch.accept(ids[0]).unwrap();
        batch.reject(ids[1]).unwrap();
        assert!(cursor.can_finish(&batch));
    }

    #[test]
    fn creation_mode_round_trips_through_strings() {
        for mode in [CreationMode::Manual, CreationMode::Ai, CreationMode::AiEdited] {
            assert_eq!(CreationMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(CreationMode::parse("robot"), None);
    }
}
