use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::SetupRequest;
use crate::api::extractors::auth::VerifiedIdentity;
use crate::error::AppError;
use crate::state::AppState;

/// One-time bootstrap: the first signed-in identity claims the super admin
/// seat. Only needs a verified token, not a profile, since no profiles
/// exist yet. The service refuses once any account is on record.
pub async fn create_initial_admin(
    State(state): State<Arc<AppState>>,
    VerifiedIdentity(claims): VerifiedIdentity,
    Json(payload): Json<SetupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = payload
        .email
        .or(claims.email)
        .ok_or(AppError::Validation("email is required".into()))?;
    let display_name = payload
        .display_name
        .or(claims.name)
        .unwrap_or_else(|| email.clone());

    let created = state
        .accounts
        .create_initial_admin(&claims.sub, &email, &display_name)
        .await?;

    info!("Initial admin account created: {}", created.uid);
    Ok(Json(created))
}
