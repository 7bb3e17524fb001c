//! Generation history endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::server::app::AppState;
use crate::services::LogPage;

use super::ApiError;

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    10
}

pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<LogPage>, ApiError> {
    let page = state
        .logs
        .list_for_user(&state.user_id, query.page, query.limit)
        .await?;
    Ok(Json(page))
}
