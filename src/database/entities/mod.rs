pub mod flashcard_sets;
pub mod flashcards;
pub mod generation_limits;
pub mod generation_logs;
pub mod source_texts;
