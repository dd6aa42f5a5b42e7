use crate::domain::{models::student::Student, ports::StudentStore};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

const COLUMNS: &str =
    "id, name, email, grade, subjects_json, tutor_uid, is_active, created_by, created_date";

pub struct SqliteStudentStore {
    pool: SqlitePool,
}

impl SqliteStudentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct StudentRow {
    id: String,
    name: String,
    email: Option<String>,
    grade: Option<String>,
    subjects_json: String,
    tutor_uid: String,
    is_active: bool,
    created_by: String,
    created_date: DateTime<Utc>,
}

impl TryFrom<StudentRow> for Student {
    type Error = AppError;

    fn try_from(row: StudentRow) -> Result<Self, AppError> {
        let subjects = serde_json::from_str(&row.subjects_json).map_err(|e| {
            AppError::InternalWithMsg(format!("corrupt subjects column for {}: {}", row.id, e))
        })?;
        Ok(Student {
            id: row.id,
            name: row.name,
            email: row.email,
            grade: row.grade,
            subjects,
            tutor_uid: row.tutor_uid,
            is_active: row.is_active,
            created_by: row.created_by,
            created_date: row.created_date,
        })
    }
}

fn subjects_json(student: &Student) -> Result<String, AppError> {
    serde_json::to_string(&student.subjects)
        .map_err(|e| AppError::InternalWithMsg(format!("failed to encode subjects: {}", e)))
}

#[async_trait]
impl StudentStore for SqliteStudentStore {
    async fn insert(&self, student: &Student) -> Result<Student, AppError> {
        let subjects = subjects_json(student)?;
        let row = sqlx::query_as::<_, StudentRow>(&format!(
            "INSERT INTO students ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(&student.id)
        .bind(&student.name)
        .bind(&student.email)
        .bind(&student.grade)
        .bind(&subjects)
        .bind(&student.tutor_uid)
        .bind(student.is_active)
        .bind(&student.created_by)
        .bind(student.created_date)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;
        row.try_into()
    }

    async fn get(&self, id: &str) -> Result<Option<Student>, AppError> {
        let row = sqlx::query_as::<_, StudentRow>(&format!(
            "SELECT {COLUMNS} FROM students WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;
        row.map(Student::try_from).transpose()
    }

    async fn save(&self, student: &Student) -> Result<Student, AppError> {
        let subjects = subjects_json(student)?;
        let row = sqlx::query_as::<_, StudentRow>(&format!(
            "UPDATE students SET name = ?, email = ?, grade = ?, subjects_json = ?, \
             tutor_uid = ?, is_active = ? WHERE id = ? RETURNING {COLUMNS}"
        ))
        .bind(&student.name)
        .bind(&student.email)
        .bind(&student.grade)
        .bind(&subjects)
        .bind(&student.tutor_uid)
        .bind(student.is_active)
        .bind(&student.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;
        match row {
            Some(row) => row.try_into(),
            None => Err(AppError::NotFound("Student not found".to_string())),
        }
    }

    async fn list(&self, include_archived: bool) -> Result<Vec<Student>, AppError> {
        let sql = if include_archived {
            format!("SELECT {COLUMNS} FROM students ORDER BY name ASC")
        } else {
            format!("SELECT {COLUMNS} FROM students WHERE is_active = 1 ORDER BY name ASC")
        };
        let rows = sqlx::query_as::<_, StudentRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;
        rows.into_iter().map(Student::try_from).collect()
    }

    async fn list_by_tutor(
        &self,
        tutor_uid: &str,
        include_archived: bool,
    ) -> Result<Vec<Student>, AppError> {
        let sql = if include_archived {
            format!("SELECT {COLUMNS} FROM students WHERE tutor_uid = ? ORDER BY name ASC")
        } else {
            format!(
                "SELECT {COLUMNS} FROM students WHERE tutor_uid = ? AND is_active = 1 ORDER BY name ASC"
            )
        };
        let rows = sqlx::query_as::<_, StudentRow>(&sql)
            .bind(tutor_uid)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;
        rows.into_iter().map(Student::try_from).collect()
    }
}
