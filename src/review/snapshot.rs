//! Versioned serialization of an in-progress review
//!
//! A snapshot captures the batch and the cursor position so a review can
//! survive a page reload. The schema version is checked on restore; unknown
//! versions are rejected rather than guessed at.

use serde::{Deserialize, Serialize};

use crate::errors::SnapshotError;

use super::{ReviewBatch, ReviewCursor};

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReviewSnapshot {
    pub schema_version: u32,
    pub batch: ReviewBatch,
    pub cursor_index: usize,
}

impl ReviewSnapshot {
    pub fn capture(batch: &ReviewBatch, cursor: &ReviewCursor) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            batch: batch.clone(),
            cursor_index: cursor.index(),
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: ReviewSnapshot = serde_json::from_str(json)?;
        if snapshot.schema_version != SNAPSHOT_SCHEMA_VERSION {
            return Err(SnapshotError::UnsupportedVersion(snapshot.schema_version));
        }
        Ok(snapshot)
    }

    /// Rebuild the live state, clamping the cursor into the batch bounds
    pub fn restore(self) -> (ReviewBatch, ReviewCursor) {
        let max_index = self.batch.total_count().saturating_sub(1);
        let cursor = ReviewCursor::at(self.cursor_index.min(max_index));
        (self.batch, cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::{CreationMode, GeneratedCard, ReviewDecision};
    use uuid::Uuid;

    fn sample_batch() -> ReviewBatch {
        let cards = vec![
            GeneratedCard {
                id: Uuid::new_v4(),
                front_content: "What is ownership?".to_string(),
                back_content: "A compile-time memory discipline".to_string(),
                creation_mode: CreationMode::Ai,
            },
            GeneratedCard {
                id: Uuid::new_v4(),
                front_content: "What is borrowing?".to_string(),
                back_content: "Temporary access without ownership".to_string(),
                creation_mode: CreationMode::Ai,
            },
        ];
        ReviewBatch::new(Uuid::new_v4(), "source", "Rust basics", cards)
    }

    #[test]
    fn snapshot_round_trips_decisions_and_cursor() {
        let mut batch = sample_batch();
        let ids: Vec<Uuid> = batch.cards().iter().map(|c| c.id).collect();
        batch.accept(ids[0]).unwrap();
        batch.edit_card(ids[1], Some("edited"), None).unwrap();
        let mut cursor = ReviewCursor::new();
        cursor.next(&batch);

        let json = ReviewSnapshot::capture(&batch, &cursor).to_json().unwrap();
        let (restored, restored_cursor) = ReviewSnapshot::from_json(&json).unwrap().restore();

        assert_eq!(restored.decision(ids[0]), ReviewDecision::Accepted);
        assert_eq!(restored.decision(ids[1]), ReviewDecision::Pending);
        assert_eq!(restored.cards()[1].front_content, "edited");
        assert_eq!(restored.cards()[1].creation_mode, CreationMode::AiEdited);
        assert_eq!(restored_cursor.index(), 1);
    }

    #[test]
    fn unknown_schema_version_is_rejected() {
        let batch = sample_batch();
        let mut snapshot = ReviewSnapshot::capture(&batch, &ReviewCursor::new());
        snapshot.schema_version = 2;
        let json = snapshot.to_json().unwrap();

        match ReviewSnapshot::from_json(&json) {
            Err(SnapshotError::UnsupportedVersion(2)) => {}
            other => panic!("expected version error, got {other:?}"),
        }
    }

    #[test]
    fn garbage_is_a_corrupt_snapshot() {
        assert!(matches!(
            ReviewSnapshot::from_json("{not json"),
            Err(SnapshotError::Corrupt(_))
        ));
    }

    #[test]
    fn restore_clamps_out_of_range_cursor() {
        let batch = sample_batch();
        let mut snapshot = ReviewSnapshot::capture(&batch, &ReviewCursor::new());
        snapshot.cursor_index = 99;
        let (_, cursor) = snapshot.restore();
        assert_eq!(cursor.index(), 1);
    }
}
