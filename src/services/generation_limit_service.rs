//! Daily generation quota, one counter row per user per UTC day

use chrono::{DateTime, Days, NaiveTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::Serialize;

use crate::database::entities::generation_limits;
use crate::errors::WorkflowError;

#[derive(Clone, Debug, Serialize)]
pub struct LimitStatus {
    pub has_reached_limit: bool,
    pub used_count: i32,
    pub max_daily_limit: i32,
    pub reset_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct GenerationLimitService {
    db: DatabaseConnection,
    max_daily_limit: i32,
}

impl GenerationLimitService {
    pub fn new(db: DatabaseConnection, max_daily_limit: i32) -> Self {
        Self { db, max_daily_limit }
    }

    /// Read the day's counter. A missing row means no usage yet.
    pub async fn check_limit(&self, user_id: &str) -> Result<LimitStatus, WorkflowError> {
        let now = Utc::now();
        let row = generation_limits::Entity::find_by_id((user_id.to_string(), day_key(now)))
            .one(&self.db)
            .await?;

        let used_count = row.map(|r| r.used_count).unwrap_or(0);

        Ok(LimitStatus {
            has_reached_limit: used_count >= self.max_daily_limit,
            used_count,
            max_daily_limit: self.max_daily_limit,
            reset_at: next_reset(now),
        })
    }

    /// Upsert the day's counter, returning the new count
    pub async fn record_usage(&self, user_id: &str) -> Result<i32, WorkflowError> {
        let now = Utc::now();
        let key = (user_id.to_string(), day_key(now));
        let existing = generation_limits::Entity::find_by_id(key)
            .one(&self.db)
            .await?;

        match existing {
            Some(row) => {
                let used_count = row.used_count + 1;
                let mut active: generation_limits::ActiveModel = row.into();
                active.used_count = Set(used_count);
                active.update(&self.db).await?;
                Ok(used_count)
            }
            None => {
                let row = generation_limits::ActiveModel {
                    user_id: Set(user_id.to_string()),
                    date: Set(day_key(now)),
                    used_count: Set(1),
                };
                row.insert(&self.db).await?;
                Ok(1)
            }
        }
    }
}

fn day_key(now: DateTime<Utc>) -> String {
    now.date_naive().format("%Y-%m-%d").to_string()
}

/// The quota resets at the next UTC midnight
fn next_reset(now: DateTime<Utc>) -> DateTime<Utc> {
    let tomorrow = now
        .date_naive()
        .checked_add_days(Days::new(1))
        .unwrap_or_else(|| now.date_naive());
    tomorrow.and_time(NaiveTime::MIN).and_utc()
}
