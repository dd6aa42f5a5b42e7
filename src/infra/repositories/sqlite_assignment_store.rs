use crate::domain::{models::assignment::Assignment, ports::AssignmentStore};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

const COLUMNS: &str =
    "id, student_id, tutor_uid, title, subject, due_date, completed, created_date";

pub struct SqliteAssignmentStore {
    pool: SqlitePool,
}

impl SqliteAssignmentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentStore for SqliteAssignmentStore {
    async fn insert(&self, assignment: &Assignment) -> Result<Assignment, AppError> {
        sqlx::query_as::<_, Assignment>(&format!(
            "INSERT INTO assignments ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(&assignment.id)
        .bind(&assignment.student_id)
        .bind(&assignment.tutor_uid)
        .bind(&assignment.title)
        .bind(&assignment.subject)
        .bind(assignment.due_date)
        .bind(assignment.completed)
        .bind(assignment.created_date)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn get(&self, id: &str) -> Result<Option<Assignment>, AppError> {
        sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {COLUMNS} FROM assignments WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn save(&self, assignment: &Assignment) -> Result<Assignment, AppError> {
        let row = sqlx::query_as::<_, Assignment>(&format!(
            "UPDATE assignments SET title = ?, subject = ?, due_date = ?, completed = ? \
             WHERE id = ? RETURNING {COLUMNS}"
        ))
        .bind(&assignment.title)
        .bind(&assignment.subject)
        .bind(assignment.due_date)
        .bind(assignment.completed)
        .bind(&assignment.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;
        row.ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))
    }

    async fn list_by_student(&self, student_id: &str) -> Result<Vec<Assignment>, AppError> {
        sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {COLUMNS} FROM assignments WHERE student_id = ? ORDER BY created_date DESC"
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Assignment>, AppError> {
        sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {COLUMNS} FROM assignments ORDER BY created_date DESC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
