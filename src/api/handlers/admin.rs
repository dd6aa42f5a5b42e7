use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::dtos::responses::OverviewResponse;
use crate::api::extractors::auth::Principal;
use crate::domain::models::role::{Permission, Role};
use crate::domain::services::require;
use crate::error::AppError;
use crate::state::AppState;

/// Dashboard numbers for the admin landing page: headcounts plus the
/// latest activity entries.
pub async fn overview(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
) -> Result<impl IntoResponse, AppError> {
    require(&acting, Permission::AccessAdminPanel)?;

    let accounts = state.user_store.list(false).await?;
    let active_tutors = accounts
        .iter()
        .filter(|account| account.role == Role::Tutor)
        .count();
    let active_students = state.student_store.list(false).await?.len();
    let recent_activity = state.activity_store.list_recent(20).await?;

    Ok(Json(OverviewResponse {
        active_tutors,
        active_students,
        recent_activity,
    }))
}
