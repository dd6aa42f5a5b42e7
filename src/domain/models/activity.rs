use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Append-only audit trail entry. Actions use dotted verbs such as
/// `account.role_changed` or `student.archived`.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct ActivityEntry {
    pub id: String,
    pub actor_uid: String,
    pub action: String,
    pub target: String,
    pub detail: Option<String>,
    pub created_date: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn new(actor_uid: &str, action: &str, target: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            actor_uid: actor_uid.to_string(),
            action: action.to_string(),
            target: target.to_string(),
            detail: None,
            created_date: Utc::now(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
