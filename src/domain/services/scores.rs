use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::domain::models::activity::ActivityEntry;
use crate::domain::models::score::{self, NewTestScore, TestScore};
use crate::domain::models::session::ResolvedSession;
use crate::domain::ports::{ActivityStore, ScoreStore, StudentStore};
use crate::domain::services::students::ensure_can_view;
use crate::error::AppError;

pub struct ScoreService {
    scores: Arc<dyn ScoreStore>,
    students: Arc<dyn StudentStore>,
    activity: Arc<dyn ActivityStore>,
}

impl ScoreService {
    pub fn new(
        scores: Arc<dyn ScoreStore>,
        students: Arc<dyn StudentStore>,
        activity: Arc<dyn ActivityStore>,
    ) -> Self {
        Self { scores, students, activity }
    }

    #[instrument(skip(self, acting, data), fields(acting_uid = %acting.user.uid))]
    pub async fn record_score(
        &self,
        acting: &ResolvedSession,
        student_id: &str,
        data: NewTestScore,
    ) -> Result<TestScore, AppError> {
        let student = self
            .students
            .get(student_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

        if student.tutor_uid != acting.user.uid && !acting.role.is_admin() {
            return Err(AppError::PermissionDenied(
                "only the owning tutor or an admin may record scores".to_string(),
            ));
        }

        score::validate_submission(data.kind, &data.sections, data.composite)?;

        let score = TestScore::new(
            student.id.clone(),
            data.kind,
            data.test_date,
            data.sections,
            data.composite,
            &acting.user.uid,
        );
        let created = self.scores.insert(&score).await?;
        info!(score_id = %created.id, student_id, kind = %created.kind, "test score recorded");
        self.log(&acting.user.uid, "score.recorded", &created.id, Some(student.id)).await;
        Ok(created)
    }

    pub async fn list_for_student(
        &self,
        acting: &ResolvedSession,
        student_id: &str,
    ) -> Result<Vec<TestScore>, AppError> {
        let student = self
            .students
            .get(student_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;
        ensure_can_view(acting, &student)?;
        self.scores.list_by_student(student_id).await
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
