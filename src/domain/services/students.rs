use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::domain::models::activity::ActivityEntry;
use crate::domain::models::role::Permission;
use crate::domain::models::session::ResolvedSession;
use crate::domain::models::student::{NewStudent, Student, StudentUpdate};
use crate::domain::ports::{ActivityStore, StudentStore, UserStore};
use crate::domain::services::{normalized, require, required_text};
use crate::error::AppError;

pub struct StudentService {
    students: Arc<dyn StudentStore>,
    users: Arc<dyn UserStore>,
    activity: Arc<dyn ActivityStore>,
}

impl StudentService {
    pub fn new(
        students: Arc<dyn StudentStore>,
        users: Arc<dyn UserStore>,
        activity: Arc<dyn ActivityStore>,
    ) -> Self {
        Self { students, users, activity }
    }

    /// Creation lands on the acting tutor's own roster unless an explicit
    /// tutor is named, which additionally needs the assignment grant.
    #[instrument(skip(self, acting, data), fields(acting_uid = %acting.user.uid))]
    pub async fn create_student(
        &self,
        acting: &ResolvedSession,
        data: NewStudent,
    ) -> Result<Student, AppError> {
        require(acting, Permission::CreateStudents)?;

        let tutor_uid = match data.tutor_uid {
            Some(uid) if uid != acting.user.uid => {
                require(acting, Permission::AssignStudents)?;
                self.ensure_assignable(&uid).await?;
                uid
            }
            _ => acting.user.uid.clone(),
        };

        let name = required_text(data.name, "name")?;
        let mut student = Student::new(name, tutor_uid, &acting.user.uid);
        student.email = data.email.and_then(normalized);
        student.grade = data.grade.and_then(normalized);
        student.subjects = data.subjects.into_iter().filter_map(normalized).collect();

        let created = self.students.insert(&student).await?;
        info!(student_id = %created.id, tutor_uid = %created.tutor_uid, "student created");
        self.log(&acting.user.uid, "student.created", &created.id, None).await;
        Ok(created)
    }

    pub async fn get_student(
        &self,
        acting: &ResolvedSession,
        id: &str,
    ) -> Result<Student, AppError> {
        let student = self.fetch(id).await?;
        ensure_can_view(acting, &student)?;
        Ok(student)
    }

    /// Tutors get their own roster; the view-all grant widens it to
    /// everyone's.
    pub async fn list_students(
        &self,
        acting: &ResolvedSession,
        include_archived: bool,
    ) -> Result<Vec<Student>, AppError> {
        if acting.permissions.can_view_all_students {
            self.students.list(include_archived).await
        } else {
            self.students
                .list_by_tutor(&acting.user.uid, include_archived)
                .await
        }
    }

    #[instrument(skip(self, acting, update), fields(acting_uid = %acting.user.uid))]
    pub async fn update_student(
        &self,
        acting: &ResolvedSession,
        id: &str,
        update: StudentUpdate,
    ) -> Result<Student, AppError> {
        let mut student = self.fetch(id).await?;
        if student.tutor_uid != acting.user.uid && !acting.role.is_admin() {
            return Err(AppError::PermissionDenied(
                "only the owning tutor or an admin may edit this student".to_string(),
            ));
        }

        if let Some(name) = update.name {
            student.name = required_text(name, "name")?;
        }
        if let Some(value) = update.email {
            student.email = normalized(value);
        }
        if let Some(value) = update.grade {
            student.grade = normalized(value);
        }
        if let Some(list) = update.subjects {
            student.subjects = list.into_iter().filter_map(normalized).collect();
        }

        let saved = self.students.save(&student).await?;
        self.log(&acting.user.uid, "student.updated", id, None).await;
        Ok(saved)
    }

    #[instrument(skip(self, acting), fields(acting_uid = %acting.user.uid))]
    pub async fn reassign_tutor(
        &self,
        acting: &ResolvedSession,
        id: &str,
        new_tutor_uid: &str,
    ) -> Result<Student, AppError> {
        require(acting, Permission::AssignStudents)?;
        self.ensure_assignable(new_tutor_uid).await?;

        let mut student = self.fetch(id).await?;
        if student.tutor_uid == new_tutor_uid {
            return Ok(student);
        }

        let previous = std::mem::replace(&mut student.tutor_uid, new_tutor_uid.to_string());
        let saved = self.students.save(&student).await?;
        info!(student_id = %id, from = %previous, to = %new_tutor_uid, "student reassigned");
        self.log(
            &acting.user.uid,
            "student.reassigned",
            id,
            Some(format!("{} -> {}", previous, new_tutor_uid)),
        )
        .await;
        Ok(saved)
    }

    /// Idempotent soft delete, mirroring account archival.
    #[instrument(skip(self, acting), fields(acting_uid = %acting.user.uid))]
    pub async fn archive_student(
        &self,
        acting: &ResolvedSession,
        id: &str,
    ) -> Result<Student, AppError> {
        require(acting, Permission::ArchiveStudents)?;

        let mut student = self.fetch(id).await?;
        if !student.is_active {
            return Ok(student);
        }

        student.is_active = false;
        let saved = self.students.save(&student).await?;
        info!(student_id = %id, "student archived");
        self.log(&acting.user.uid, "student.archived", id, None).await;
        Ok(saved)
    }

    #[instrument(skip(self, acting), fields(acting_uid = %acting.user.uid))]
    pub async fn reactivate_student(
        &self,
        acting: &ResolvedSession,
        id: &str,
    ) -> Result<Student, AppError> {
        require(acting, Permission::ArchiveStudents)?;

        let mut student = self.fetch(id).await?;
        if student.is_active {
            return Ok(student);
        }

        student.is_active = true;
        let saved = self.students.save(&student).await?;
        info!(student_id = %id, "student reactivated");
        self.log(&acting.user.uid, "student.reactivated", id, None).await;
        Ok(saved)
    }

    async fn fetch(&self, id: &str) -> Result<Student, AppError> {
        self.students
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))
    }

    async fn ensure_assignable(&self, uid: &str) -> Result<(), AppError> {
        let account = self
            .users
            .get(uid)
            .await?
            .ok_or_else(|| AppError::Validation("Assigned tutor does not exist".to_string()))?;
        if !account.is_active {
            return Err(AppError::Validation("Assigned tutor is archived".to_string()));
        }
        Ok(())
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

pub(crate) fn ensure_can_view(acting: &ResolvedSession, student: &Student) -> Result<(), AppError> {
    if student.tutor_uid == acting.user.uid || acting.permissions.can_view_all_students {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(
            "this student belongs to another tutor".to_string(),
        ))
    }
}

