use crate::domain::{models::activity::ActivityEntry, ports::ActivityStore};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteActivityStore {
    pool: SqlitePool,
}

impl SqliteActivityStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityStore for SqliteActivityStore {
    async fn append(&self, entry: &ActivityEntry) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO activity_log (id, actor_uid, action, target, detail, created_date) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&entry.id)
        .bind(&entry.actor_uid)
        .bind(&entry.action)
        .bind(&entry.target)
        .bind(&entry.detail)
        .bind(entry.created_date)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;
        Ok(())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<ActivityEntry>, AppError> {
        sqlx::query_as::<_, ActivityEntry>(
            "SELECT id, actor_uid, action, target, detail, created_date FROM activity_log ORDER BY created_date DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
