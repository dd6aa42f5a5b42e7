use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CompleteAssignmentRequest, LimitQuery};
use crate::api::extractors::auth::Principal;
use crate::domain::models::assignment::NewAssignment;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_assignment(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
    Path(student_id): Path<String>,
    Json(payload): Json<NewAssignment>,
) -> Result<impl IntoResponse, AppError> {
    let created = state
        .assignments
        .create_assignment(&acting, &student_id, payload)
        .await?;
    info!("Created assignment {} for student {}", created.id, student_id);
    Ok(Json(created))
}

pub async fn list_for_student(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
    Path(student_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let assignments = state
        .assignments
        .list_for_student(&acting, &student_id)
        .await?;
    Ok(Json(assignments))
}

pub async fn set_completed(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
    Path(id): Path<String>,
    Json(payload): Json<CompleteAssignmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state
        .assignments
        .set_completed(&acting, &id, payload.completed)
        .await?;
    Ok(Json(updated))
}

pub async fn assignment_log(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
    Query(params): Query<LimitQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit.unwrap_or(50);
    let assignments = state.assignments.assignment_log(&acting, limit).await?;
    Ok(Json(assignments))
}
