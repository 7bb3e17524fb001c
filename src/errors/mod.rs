//! Domain-specific error types for the flashcard workflow
//!
//! - **WorkflowError**: generation/review/save business rules and persistence
//! - **CompletionError**: the chat-completion service boundary
//! - **ReviewError** / **SnapshotError**: the client-held review state machine

pub mod completion;
pub mod review;
pub mod workflow;

pub use completion::CompletionError;
pub use review::{ReviewError, SnapshotError};
pub use workflow::WorkflowError;
