pub mod generation_limit_service;
pub mod generation_log_service;
pub mod generation_service;
pub mod review_service;
pub mod validation;

pub use generation_limit_service::{GenerationLimitService, LimitStatus};
pub use generation_log_service::{GenerationLogService, LogPage, Pagination};
pub use generation_service::{FlashcardGenerationService, GeneratedBatch};
pub use review_service::{FlashcardReviewService, ReviewOutcome, ReviewedCard, SaveReviewCommand};
pub use validation::ValidationService;
