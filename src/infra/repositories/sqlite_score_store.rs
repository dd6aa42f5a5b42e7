use crate::domain::{models::score::TestScore, ports::ScoreStore};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;

const COLUMNS: &str =
    "id, student_id, kind, test_date, sections_json, composite, recorded_by, created_date";

pub struct SqliteScoreStore {
    pool: SqlitePool,
}

impl SqliteScoreStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ScoreRow {
    id: String,
    student_id: String,
    kind: String,
    test_date: NaiveDate,
    sections_json: String,
    composite: u16,
    recorded_by: String,
    created_date: DateTime<Utc>,
}

impl TryFrom<ScoreRow> for TestScore {
    type Error = AppError;

    fn try_from(row: ScoreRow) -> Result<Self, AppError> {
        let kind = row
            .kind
            .parse()
            .map_err(|_| AppError::InternalWithMsg(format!("corrupt test kind: {}", row.kind)))?;
        let sections = serde_json::from_str(&row.sections_json).map_err(|e| {
            AppError::InternalWithMsg(format!("corrupt sections column for {}: {}", row.id, e))
        })?;
        Ok(TestScore {
            id: row.id,
            student_id: row.student_id,
            kind,
            test_date: row.test_date,
            sections,
            composite: row.composite,
            recorded_by: row.recorded_by,
            created_date: row.created_date,
        })
    }
}

#[async_trait]
impl ScoreStore for SqliteScoreStore {
    async fn insert(&self, score: &TestScore) -> Result<TestScore, AppError> {
        let sections = serde_json::to_string(&score.sections)
            .map_err(|e| AppError::InternalWithMsg(format!("failed to encode sections: {}", e)))?;
        let row = sqlx::query_as::<_, ScoreRow>(&format!(
            "INSERT INTO test_scores ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(&score.id)
        .bind(&score.student_id)
        .bind(score.kind.as_str())
        .bind(score.test_date)
        .bind(&sections)
        .bind(score.composite)
        .bind(&score.recorded_by)
        .bind(score.created_date)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;
        row.try_into()
    }

    async fn list_by_student(&self, student_id: &str) -> Result<Vec<TestScore>, AppError> {
        let rows = sqlx::query_as::<_, ScoreRow>(&format!(
            "SELECT {COLUMNS} FROM test_scores WHERE student_id = ? ORDER BY test_date DESC"
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;
        rows.into_iter().map(TestScore::try_from).collect()
    }
}
