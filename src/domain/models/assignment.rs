use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Assignment {
    pub id: String,
    pub student_id: String,
    pub tutor_uid: String,
    pub title: String,
    pub subject: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub created_date: DateTime<Utc>,
}

impl Assignment {
    pub fn new(student_id: String, tutor_uid: String, title: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            student_id,
            tutor_uid,
            title,
            subject: None,
            due_date: None,
            completed: false,
            created_date: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAssignment {
    pub title: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}
