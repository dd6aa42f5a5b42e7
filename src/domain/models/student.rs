use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub grade: Option<String>,
    pub subjects: Vec<String>,
    pub tutor_uid: String,
    pub is_active: bool,
    pub created_by: String,
    pub created_date: DateTime<Utc>,
}

impl Student {
    pub fn new(name: String, tutor_uid: String, created_by: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email: None,
            grade: None,
            subjects: Vec::new(),
            tutor_uid,
            is_active: true,
            created_by: created_by.to_string(),
            created_date: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStudent {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    /// Defaults to the acting principal when absent.
    #[serde(default)]
    pub tutor_uid: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub grade: Option<String>,
    pub subjects: Option<Vec<String>>,
}
