use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::domain::models::activity::ActivityEntry;
use crate::domain::models::assignment::{Assignment, NewAssignment};
use crate::domain::models::role::Permission;
use crate::domain::models::session::ResolvedSession;
use crate::domain::ports::{ActivityStore, AssignmentStore, StudentStore};
use crate::domain::services::students::ensure_can_view;
use crate::domain::services::{normalized, require, required_text};
use crate::error::AppError;

pub struct AssignmentService {
    assignments: Arc<dyn AssignmentStore>,
    students: Arc<dyn StudentStore>,
    activity: Arc<dyn ActivityStore>,
}

impl AssignmentService {
    pub fn new(
        assignments: Arc<dyn AssignmentStore>,
        students: Arc<dyn StudentStore>,
        activity: Arc<dyn ActivityStore>,
    ) -> Self {
        Self { assignments, students, activity }
    }

    #[instrument(skip(self, acting, data), fields(acting_uid = %acting.user.uid))]
    pub async fn create_assignment(
        &self,
        acting: &ResolvedSession,
        student_id: &str,
        data: NewAssignment,
    ) -> Result<Assignment, AppError> {
        require(acting, Permission::CreateAssignments)?;

        let student = self
            .students
            .get(student_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;
        ensure_can_view(acting, &student)?;
        if !student.is_active {
            return Err(AppError::Validation(
                "Cannot assign work to an archived student".to_string(),
            ));
        }

        let title = required_text(data.title, "title")?;
        let mut assignment =
            Assignment::new(student.id.clone(), student.tutor_uid.clone(), title);
        assignment.subject = data.subject.and_then(normalized);
        assignment.due_date = data.due_date;

        let created = self.assignments.insert(&assignment).await?;
        info!(assignment_id = %created.id, student_id, "assignment created");
        self.log(&acting.user.uid, "assignment.created", &created.id, Some(student.id)).await;
        Ok(created)
    }

    pub async fn list_for_student(
        &self,
        acting: &ResolvedSession,
        student_id: &str,
    ) -> Result<Vec<Assignment>, AppError> {
        let student = self
            .students
            .get(student_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;
        ensure_can_view(acting, &student)?;
        self.assignments.list_by_student(student_id).await
    }

    #[instrument(skip(self, acting), fields(acting_uid = %acting.user.uid))]
    pub async fn set_completed(
        &self,
        acting: &ResolvedSession,
        id: &str,
        completed: bool,
    ) -> Result<Assignment, AppError> {
        let mut assignment = self
            .assignments
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;

        if assignment.tutor_uid != acting.user.uid && !acting.role.is_admin() {
            return Err(AppError::PermissionDenied(
                "only the owning tutor or an admin may update this assignment".to_string(),
            ));
        }

        if assignment.completed == completed {
            return Ok(assignment);
        }

        assignment.completed = completed;
        let saved = self.assignments.save(&assignment).await?;
        let action = if completed {
            "assignment.completed"
        } else {
            "assignment.reopened"
        };
        self.log(&acting.user.uid, action, id, None).await;
        Ok(saved)
    }

    /// Cross-roster feed for admins.
    pub async fn assignment_log(
        &self,
        acting: &ResolvedSession,
        limit: i64,
    ) -> Result<Vec<Assignment>, AppError> {
        require(acting, Permission::ViewAssignmentLogs)?;
        self.assignments.list_recent(limit).await
    }

    async fn log(&self, actor: &str, action: &str, target: &str, detail: Option<String>) {
        let mut entry = ActivityEntry::new(actor, action, target);
        if let Some(detail) = detail {
            entry = entry.with_detail(detail);
        }
        if let Err(err) = self.activity.append(&entry).await {
            warn!(action, error = %err, "failed to record activity entry");
        }
    }
}
