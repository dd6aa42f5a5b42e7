use std::sync::Arc;

use tera::Tera;

use crate::config::Config;
use crate::domain::ports::{
    ActivityStore, AssignmentStore, EmailService, LlmService, ScoreStore, StudentStore, UserStore,
};
use crate::domain::services::accounts::AccountService;
use crate::domain::services::assignments::AssignmentService;
use crate::domain::services::scores::ScoreService;
use crate::domain::services::students::StudentService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_store: Arc<dyn UserStore>,
    pub student_store: Arc<dyn StudentStore>,
    pub assignment_store: Arc<dyn AssignmentStore>,
    pub score_store: Arc<dyn ScoreStore>,
    pub activity_store: Arc<dyn ActivityStore>,
    pub accounts: Arc<AccountService>,
    pub students: Arc<StudentService>,
    pub assignments: Arc<AssignmentService>,
    pub scores: Arc<ScoreService>,
    pub email_service: Arc<dyn EmailService>,
    pub llm_service: Arc<dyn LlmService>,
    pub templates: Arc<Tera>,
}
