use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use tera::Context;
use tracing::{info, warn};

use crate::api::dtos::requests::{SendEmailRequest, SuggestSubjectRequest};
use crate::api::dtos::responses::SubjectSuggestionResponse;
use crate::api::extractors::auth::Principal;
use crate::domain::models::activity::ActivityEntry;
use crate::domain::models::role::Permission;
use crate::domain::services::require;
use crate::error::AppError;
use crate::state::AppState;

pub async fn send_email(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
    Json(payload): Json<SendEmailRequest>,
) -> Result<impl IntoResponse, AppError> {
    require(&acting, Permission::SendEmails)?;

    if !payload.to.contains('@') {
        return Err(AppError::Validation("Recipient address is invalid".into()));
    }
    if payload.subject.trim().is_empty() {
        return Err(AppError::Validation("subject is required".into()));
    }

    let mut context = Context::new();
    context.insert("body", &payload.body);
    context.insert("sender_name", &acting.user.display_name);
    let html_body = state
        .templates
        .render("email_layout.html", &context)
        .map_err(|_| AppError::Internal)?;

    state
        .email_service
        .send(&payload.to, &payload.subject, &html_body)
        .await?;

    info!("Email sent to {} by {}", payload.to, acting.user.uid);

    let entry = ActivityEntry::new(&acting.user.uid, "email.sent", &payload.to)
        .with_detail(payload.subject.clone());
    if let Err(err) = state.activity_store.append(&entry).await {
        warn!("Failed to record activity entry: {}", err);
    }

    Ok(Json(serde_json::json!({"status": "sent"})))
}

pub async fn suggest_subject(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
    Json(payload): Json<SuggestSubjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    require(&acting, Permission::SendEmails)?;

    let api_key = state
        .config
        .gemini_api_key
        .clone()
        .ok_or(AppError::Validation(
            "AI subject generation is not configured".into(),
        ))?;

    let system_prompt = r#"You write email subject lines for a tutoring business.
        Your task is to propose one subject line for the described email.

        RULES:
        1. Output ONLY the subject line. No markdown, no quotes, no explanations.
        2. Keep it under 80 characters.
        3. Keep the tone warm and professional.
        "#
    .to_string();

    let mut user_prompt = format!("Purpose of the email: {}", payload.purpose);
    if let Some(student_name) = &payload.student_name {
        user_prompt.push_str(&format!("\nIt concerns the student: {}", student_name));
    }
    if let Some(details) = &payload.details {
        user_prompt.push_str(&format!("\nAdditional context: {}", details));
    }

    let subject = state
        .llm_service
        .generate(&api_key, &user_prompt, &system_prompt)
        .await?;

    Ok(Json(SubjectSuggestionResponse { subject }))
}
