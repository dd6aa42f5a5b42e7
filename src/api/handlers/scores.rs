use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::responses::ScoreTableResponse;
use crate::api::extractors::auth::Principal;
use crate::domain::models::score::{NewTestScore, TestKind};
use crate::error::AppError;
use crate::state::AppState;

pub async fn record_score(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
    Path(student_id): Path<String>,
    Json(payload): Json<NewTestScore>,
) -> Result<impl IntoResponse, AppError> {
    let recorded = state.scores.record_score(&acting, &student_id, payload).await?;
    info!(
        "Recorded {} score {} for student {}",
        recorded.kind, recorded.composite, student_id
    );
    Ok(Json(recorded))
}

pub async fn list_for_student(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
    Path(student_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let scores = state.scores.list_for_student(&acting, &student_id).await?;
    Ok(Json(scores))
}

/// Static scoring tables so the frontend can validate entry forms without
/// hardcoding section names or ranges.
pub async fn score_tables() -> impl IntoResponse {
    let tables: Vec<ScoreTableResponse> = TestKind::ALL
        .iter()
        .map(|kind| ScoreTableResponse::for_kind(*kind))
        .collect();
    Json(tables)
}
