//! Errors from the review state machine and its snapshots

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReviewError {
    /// The id does not reference a card in the generation batch
    #[error("Flashcard {0} is not part of this generation batch")]
    UnknownCard(Uuid),
}

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Unsupported snapshot schema version {0}")]
    UnsupportedVersion(u32),

    #[error("Corrupt snapshot: {0}")]
    Corrupt(#[from] serde_json::Error),
}
