use crate::domain::models::{
    activity::ActivityEntry, assignment::Assignment, score::TestScore, student::Student,
    user::UserRecord,
};
use crate::error::AppError;
use async_trait::async_trait;
use tokio::sync::watch;

/// Key-value style store for user records. Role validation happens at this
/// boundary: an adapter must surface `AppError::InvalidRole` for a stored
/// role outside the catalog rather than coerce it.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, record: &UserRecord) -> Result<UserRecord, AppError>;
    async fn get(&self, uid: &str) -> Result<Option<UserRecord>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError>;
    /// Whole-record replacement keyed by uid.
    async fn save(&self, record: &UserRecord) -> Result<UserRecord, AppError>;
    async fn list(&self, include_archived: bool) -> Result<Vec<UserRecord>, AppError>;
    async fn is_empty(&self) -> Result<bool, AppError>;
}

#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn insert(&self, student: &Student) -> Result<Student, AppError>;
    async fn get(&self, id: &str) -> Result<Option<Student>, AppError>;
    async fn save(&self, student: &Student) -> Result<Student, AppError>;
    async fn list(&self, include_archived: bool) -> Result<Vec<Student>, AppError>;
    async fn list_by_tutor(
        &self,
        tutor_uid: &str,
        include_archived: bool,
    ) -> Result<Vec<Student>, AppError>;
}

#[async_trait]
pub trait AssignmentStore: Send + Sync {
    async fn insert(&self, assignment: &Assignment) -> Result<Assignment, AppError>;
    async fn get(&self, id: &str) -> Result<Option<Assignment>, AppError>;
    async fn save(&self, assignment: &Assignment) -> Result<Assignment, AppError>;
    async fn list_by_student(&self, student_id: &str) -> Result<Vec<Assignment>, AppError>;
    async fn list_recent(&self, limit: i64) -> Result<Vec<Assignment>, AppError>;
}

#[async_trait]
pub trait ScoreStore: Send + Sync {
    async fn insert(&self, score: &TestScore) -> Result<TestScore, AppError>;
    async fn list_by_student(&self, student_id: &str) -> Result<Vec<TestScore>, AppError>;
}

#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn append(&self, entry: &ActivityEntry) -> Result<(), AppError>;
    async fn list_recent(&self, limit: i64) -> Result<Vec<ActivityEntry>, AppError>;
}

/// Source of the currently signed-in identity key. The provider only says
/// WHO is authenticated; whether they get a session is decided against the
/// user store.
pub trait IdentityProvider: Send + Sync {
    fn current_identity(&self) -> Option<String>;
    fn subscribe(&self) -> watch::Receiver<Option<String>>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str)
    -> Result<(), AppError>;
}

#[async_trait]
pub trait LlmService: Send + Sync {
    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        system_instruction: &str,
    ) -> Result<String, AppError>;
}
