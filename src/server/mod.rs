pub mod app;
pub mod handlers;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::config::AppConfig;
use crate::database::connection::{establish_connection, get_database_url};
use crate::database::migrations::{Migrator, MigratorTrait};
use crate::openrouter::OpenRouterClient;

pub async fn start_server(
    port: u16,
    database_path: &str,
    cors_origin: Option<&str>,
    config: AppConfig,
) -> Result<()> {
    let database_url = get_database_url(Some(database_path));
    let db = establish_connection(&database_url).await?;

    // Run migrations
    Migrator::up(&db, None).await?;
    info!("Database migrations completed");

    let provider = Arc::new(OpenRouterClient::new(&config)?);
    let app = app::create_app(db, provider, &config, cors_origin)?;

    log_routes();

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_routes() {
    info!("API Endpoints:");
    info!("  GET  /health                     - Health check");
    info!("  POST /flashcard-sets/generate    - Generate flashcard proposals");
    info!("  POST /flashcard-sets/review      - Save a reviewed batch");
    info!("  GET  /generation/logs            - Paginated generation history");
}
