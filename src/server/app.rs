use std::sync::Arc;

use anyhow::{anyhow, Result};
use axum::{
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::openrouter::ChatCompletionProvider;
use crate::services::{
    FlashcardGenerationService, FlashcardReviewService, GenerationLimitService,
    GenerationLogService,
};

use super::handlers::{flashcard_sets, generation, health};

#[derive(Clone)]
pub struct AppState {
    pub generation: FlashcardGenerationService,
    pub review: FlashcardReviewService,
    pub logs: GenerationLogService,
    /// Authentication is out of scope; every request runs as this user
    pub user_id: String,
}

pub fn create_app(
    db: DatabaseConnection,
    provider: Arc<dyn ChatCompletionProvider>,
    config: &AppConfig,
    cors_origin: Option<&str>,
) -> Result<Router> {
    let limits = GenerationLimitService::new(db.clone(), config.max_daily_generations);

    let state = AppState {
        generation: FlashcardGenerationService::new(provider, limits, config),
        review: FlashcardReviewService::new(db.clone()),
        logs: GenerationLogService::new(db),
        user_id: config.default_user_id.clone(),
    };

    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<axum::http::HeaderValue>()
                    .map_err(|e| anyhow!("Invalid CORS origin: {}", e))?,
            )
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any)
            .allow_credentials(false),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any)
            .allow_credentials(false),
    };

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route("/flashcard-sets/generate", post(flashcard_sets::generate))
        .route("/flashcard-sets/review", post(flashcard_sets::review))
        .route("/generation/logs", get(generation::list_logs))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}
