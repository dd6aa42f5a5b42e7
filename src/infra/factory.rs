use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use tera::Tera;
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::ports::{EmailService, LlmService};
use crate::domain::services::accounts::AccountService;
use crate::domain::services::assignments::AssignmentService;
use crate::domain::services::scores::ScoreService;
use crate::domain::services::students::StudentService;
use crate::infra::ai::gemini_service::GeminiService;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::repositories::{
    sqlite_activity_store::SqliteActivityStore, sqlite_assignment_store::SqliteAssignmentStore,
    sqlite_score_store::SqliteScoreStore, sqlite_student_store::SqliteStudentStore,
    sqlite_user_store::SqliteUserStore,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ));

    let llm_service = Arc::new(GeminiService::new());

    let mut tera = Tera::default();
    tera.add_raw_template("email_layout.html", include_str!("../templates/email_layout.html"))
        .expect("Failed to load email layout template");
    let templates = Arc::new(tera);

    info!("Initializing SQLite connection with WAL Mode...");

    let opts = SqliteConnectOptions::from_str(&config.database_url)
        .expect("Invalid SQLite connection string")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .expect("Failed to connect to SQLite");

    run_sqlite_migrations(&pool).await;

    build_state(config, &pool, email_service, llm_service, templates)
}

/// State assembly shared with the test harness, which brings its own pool
/// and service doubles.
pub fn build_state(
    config: &Config,
    pool: &SqlitePool,
    email_service: Arc<dyn EmailService>,
    llm_service: Arc<dyn LlmService>,
    templates: Arc<Tera>,
) -> AppState {
    let user_store = Arc::new(SqliteUserStore::new(pool.clone()));
    let student_store = Arc::new(SqliteStudentStore::new(pool.clone()));
    let assignment_store = Arc::new(SqliteAssignmentStore::new(pool.clone()));
    let score_store = Arc::new(SqliteScoreStore::new(pool.clone()));
    let activity_store = Arc::new(SqliteActivityStore::new(pool.clone()));

    let accounts = Arc::new(AccountService::new(user_store.clone(), activity_store.clone()));
    let students = Arc::new(StudentService::new(
        student_store.clone(),
        user_store.clone(),
        activity_store.clone(),
    ));
    let assignments = Arc::new(AssignmentService::new(
        assignment_store.clone(),
        student_store.clone(),
        activity_store.clone(),
    ));
    let scores = Arc::new(ScoreService::new(
        score_store.clone(),
        student_store.clone(),
        activity_store.clone(),
    ));

    AppState {
        config: config.clone(),
        user_store,
        student_store,
        assignment_store,
        score_store,
        activity_store,
        accounts,
        students,
        assignments,
        scores,
        email_service,
        llm_service,
        templates,
    }
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
