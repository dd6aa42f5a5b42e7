use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub auth_public_key: String, // Identity provider's Ed25519 public key (PEM)
    pub auth_issuer: String,
    pub auth_audience: String,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub gemini_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            auth_public_key: env::var("AUTH_PUBLIC_KEY").expect("AUTH_PUBLIC_KEY must be set (Ed25519 Public Key PEM)"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://auth.tutoring.local".to_string()),
            auth_audience: env::var("AUTH_AUDIENCE").unwrap_or_else(|_| "tutoring-app".to_string()),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            gemini_api_key: env::var("GEMINI_API_KEY").ok(),
        }
    }
}
