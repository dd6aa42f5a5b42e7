//! In-memory store adapters. Useful for tests and for embedding the
//! domain services without a database; behavior mirrors the SQLite
//! adapters, including duplicate detection and list ordering.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::models::{
    activity::ActivityEntry, assignment::Assignment, score::TestScore, student::Student,
    user::UserRecord,
};
use crate::domain::ports::{ActivityStore, AssignmentStore, ScoreStore, StudentStore, UserStore};
use crate::error::AppError;

#[derive(Default)]
pub struct MemoryUserStore {
    records: Mutex<Vec<UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, record: &UserRecord) -> Result<UserRecord, AppError> {
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.uid == record.uid) {
            return Err(AppError::Conflict(
                "An account already exists for this identity".to_string(),
            ));
        }
        if records.iter().any(|r| r.email == record.email) {
            return Err(AppError::Conflict(
                "An account already exists for this email".to_string(),
            ));
        }
        records.push(record.clone());
        Ok(record.clone())
    }

    async fn get(&self, uid: &str) -> Result<Option<UserRecord>, AppError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.uid == uid).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.email == email).cloned())
    }

    async fn save(&self, record: &UserRecord) -> Result<UserRecord, AppError> {
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|r| r.uid == record.uid) {
            Some(existing) => {
                *existing = record.clone();
                Ok(record.clone())
            }
            None => Err(AppError::NotFound("Account not found".to_string())),
        }
    }

    async fn list(&self, include_archived: bool) -> Result<Vec<UserRecord>, AppError> {
        let records = self.records.lock().unwrap();
        let mut out: Vec<UserRecord> = records
            .iter()
            .filter(|r| include_archived || r.is_active)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(out)
    }

    async fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.records.lock().unwrap().is_empty())
    }
}

#[derive(Default)]
pub struct MemoryStudentStore {
    records: Mutex<Vec<Student>>,
}

impl MemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn insert(&self, student: &Student) -> Result<Student, AppError> {
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|s| s.id == student.id) {
            return Err(AppError::Conflict("Student already exists".to_string()));
        }
        records.push(student.clone());
        Ok(student.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Student>, AppError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|s| s.id == id).cloned())
    }

    async fn save(&self, student: &Student) -> Result<Student, AppError> {
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|s| s.id == student.id) {
            Some(existing) => {
                *existing = student.clone();
                Ok(student.clone())
            }
            None => Err(AppError::NotFound("Student not found".to_string())),
        }
    }

    async fn list(&self, include_archived: bool) -> Result<Vec<Student>, AppError> {
        let records = self.records.lock().unwrap();
        let mut out: Vec<Student> = records
            .iter()
            .filter(|s| include_archived || s.is_active)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn list_by_tutor(
        &self,
        tutor_uid: &str,
        include_archived: bool,
    ) -> Result<Vec<Student>, AppError> {
        let records = self.records.lock().unwrap();
        let mut out: Vec<Student> = records
            .iter()
            .filter(|s| s.tutor_uid == tutor_uid && (include_archived || s.is_active))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }
}

#[derive(Default)]
pub struct MemoryAssignmentStore {
    records: Mutex<Vec<Assignment>>,
}

impl MemoryAssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssignmentStore for MemoryAssignmentStore {
    async fn insert(&self, assignment: &Assignment) -> Result<Assignment, AppError> {
        let mut records = self.records.lock().unwrap();
        records.push(assignment.clone());
        Ok(assignment.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Assignment>, AppError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|a| a.id == id).cloned())
    }

    async fn save(&self, assignment: &Assignment) -> Result<Assignment, AppError> {
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|a| a.id == assignment.id) {
            Some(existing) => {
                *existing = assignment.clone();
                Ok(assignment.clone())
            }
            None => Err(AppError::NotFound("Assignment not found".to_string())),
        }
    }

    async fn list_by_student(&self, student_id: &str) -> Result<Vec<Assignment>, AppError> {
        let records = self.records.lock().unwrap();
        let mut out: Vec<Assignment> = records
            .iter()
            .filter(|a| a.student_id == student_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_date.cmp(&a.created_date));
        Ok(out)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Assignment>, AppError> {
        let records = self.records.lock().unwrap();
        let mut out: Vec<Assignment> = records.iter().cloned().collect();
        out.sort_by(|a, b| b.created_date.cmp(&a.created_date));
        out.truncate(limit.max(0) as usize);
        Ok(out)
    }
}

#[derive(Default)]
pub struct MemoryScoreStore {
    records: Mutex<Vec<TestScore>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn insert(&self, score: &TestScore) -> Result<TestScore, AppError> {
        let mut records = self.records.lock().unwrap();
        records.push(score.clone());
        Ok(score.clone())
    }

    async fn list_by_student(&self, student_id: &str) -> Result<Vec<TestScore>, AppError> {
        let records = self.records.lock().unwrap();
        let mut out: Vec<TestScore> = records
            .iter()
            .filter(|s| s.student_id == student_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.test_date.cmp(&a.test_date));
        Ok(out)
    }
}

#[derive(Default)]
pub struct MemoryActivityStore {
    records: Mutex<Vec<ActivityEntry>>,
}

impl MemoryActivityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActivityStore for MemoryActivityStore {
    async fn append(&self, entry: &ActivityEntry) -> Result<(), AppError> {
        self.records.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<ActivityEntry>, AppError> {
        let records = self.records.lock().unwrap();
        let mut out: Vec<ActivityEntry> = records.iter().cloned().collect();
        out.sort_by(|a, b| b.created_date.cmp(&a.created_date));
        out.truncate(limit.max(0) as usize);
        Ok(out)
    }
}
