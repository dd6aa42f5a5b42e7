use tutoring_backend::{
    api::router::create_router,
    config::Config,
    domain::models::{role::Role, user::UserRecord},
    domain::ports::{EmailService, LlmService},
    error::AppError,
    infra::factory::{build_state, run_sqlite_migrations},
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::Router;
use std::str::FromStr;
use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use tera::Tera;

pub struct MockEmailService;

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(
        &self,
        _recipient: &str,
        _subject: &str,
        _html_body: &str,
    ) -> Result<(), AppError> {
        Ok(())
    }
}

pub struct MockLlmService;

#[async_trait]
impl LlmService for MockLlmService {
    async fn generate(
        &self,
        _api_key: &str,
        _prompt: &str,
        _system_instruction: &str,
    ) -> Result<String, AppError> {
        Ok("Mock subject line".to_string())
    }
}

#[derive(Serialize)]
struct TestClaims {
    iss: String,
    sub: String,
    aud: String,
    exp: usize,
    iat: usize,
    email: Option<String>,
    name: Option<String>,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::build(Some("test-api-key".to_string())).await
    }

    /// Same app without an AI key, for exercising the unconfigured path.
    pub async fn new_without_ai() -> Self {
        Self::build(None).await
    }

    async fn build(gemini_api_key: Option<String>) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool).await;

        let mut tera = Tera::default();
        tera.add_raw_template(
            "email_layout.html",
            "<html>{{ body }} -- sent by {{ sender_name }}</html>",
        )
        .unwrap();
        let templates = Arc::new(tera);

        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            auth_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            auth_audience: "test-audience".to_string(),
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            gemini_api_key,
        };

        let state = Arc::new(build_state(
            &config,
            &pool,
            Arc::new(MockEmailService),
            Arc::new(MockLlmService),
            templates,
        ));

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Signs a token the way the identity provider would. The claims only
    /// prove identity; role and activation always come from the database.
    pub fn mint_token(&self, uid: &str) -> String {
        self.mint_token_with_profile(uid, &format!("{}@example.com", uid), uid)
    }

    pub fn mint_token_with_profile(&self, uid: &str, email: &str, name: &str) -> String {
        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let encoding_key = EncodingKey::from_ed_pem(priv_key_pem.as_bytes())
            .expect("Invalid test signing key");

        let now = chrono::Utc::now().timestamp() as usize;
        let claims = TestClaims {
            iss: "test-issuer".to_string(),
            sub: uid.to_string(),
            aud: "test-audience".to_string(),
            exp: now + 3600,
            iat: now,
            email: Some(email.to_string()),
            name: Some(name.to_string()),
        };

        encode(&Header::new(Algorithm::EdDSA), &claims, &encoding_key).unwrap()
    }

    /// Inserts an account directly, bypassing the permission checks that
    /// guard the HTTP surface.
    pub async fn seed_account(&self, uid: &str, role: Role) -> UserRecord {
        let record = UserRecord::new(
            uid.to_string(),
            format!("{}@example.com", uid),
            uid.to_string(),
            role,
            "seed",
        );
        self.state.user_store.insert(&record).await.unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
