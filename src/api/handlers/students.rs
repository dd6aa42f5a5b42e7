use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{ListQuery, ReassignTutorRequest};
use crate::api::extractors::auth::Principal;
use crate::domain::models::student::{NewStudent, StudentUpdate};
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_student(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
    Json(payload): Json<NewStudent>,
) -> Result<impl IntoResponse, AppError> {
    let created = state.students.create_student(&acting, payload).await?;
    info!("Created student {} for tutor {}", created.id, created.tutor_uid);
    Ok(Json(created))
}

pub async fn list_students(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
    Query(params): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let students = state
        .students
        .list_students(&acting, params.include_archived)
        .await?;
    Ok(Json(students))
}

pub async fn get_student(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let student = state.students.get_student(&acting, &id).await?;
    Ok(Json(student))
}

pub async fn update_student(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
    Path(id): Path<String>,
    Json(payload): Json<StudentUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.students.update_student(&acting, &id, payload).await?;
    Ok(Json(updated))
}

pub async fn reassign_tutor(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
    Path(id): Path<String>,
    Json(payload): Json<ReassignTutorRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state
        .students
        .reassign_tutor(&acting, &id, &payload.tutor_uid)
        .await?;
    info!("Student {} reassigned to tutor {}", updated.id, updated.tutor_uid);
    Ok(Json(updated))
}

pub async fn archive_student(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let archived = state.students.archive_student(&acting, &id).await?;
    info!("Archived student {}", archived.id);
    Ok(Json(archived))
}

pub async fn reactivate_student(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reactivated = state.students.reactivate_student(&acting, &id).await?;
    info!("Reactivated student {}", reactivated.id);
    Ok(Json(reactivated))
}
