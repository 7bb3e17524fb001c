//! Paginated history of generation runs

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::Serialize;

use crate::database::entities::generation_logs;
use crate::errors::WorkflowError;

pub const MAX_PAGE_SIZE: u64 = 50;

#[derive(Clone, Debug, Serialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct LogPage {
    pub data: Vec<generation_logs::Model>,
    pub pagination: Pagination,
}

#[derive(Clone)]
pub struct GenerationLogService {
    db: DatabaseConnection,
}

impl GenerationLogService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Most recent runs first. `page` is 1-based.
    pub async fn list_for_user(
        &self,
        user_id: &str,
        page: u64,
        limit: u64,
    ) -> Result<LogPage, WorkflowError> {
        if page < 1 {
            return Err(WorkflowError::Validation(
                "Page must be a positive integer".to_string(),
            ));
        }
        if limit < 1 || limit > MAX_PAGE_SIZE {
            return Err(WorkflowError::Validation(format!(
                "Limit must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        let offset = (page - 1).checked_mul(limit).ok_or_else(|| {
            WorkflowError::Validation("Page is out of range".to_string())
        })?;

        let filter = generation_logs::Column::UserId.eq(user_id);

        let total = generation_logs::Entity::find()
            .filter(filter.clone())
            .count(&self.db)
            .await?;

        let data = generation_logs::Entity::find()
            .filter(filter)
            .order_by_desc(generation_logs::Column::GeneratedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(LogPage {
            data,
            pagination: Pagination {
                total,
                page,
                limit,
                total_pages: (total + limit - 1) / limit,
            },
        })
    }
}
