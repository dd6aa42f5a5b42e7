use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::api::dtos::requests::LimitQuery;
use crate::api::extractors::auth::Principal;
use crate::domain::models::role::Permission;
use crate::domain::services::require;
use crate::error::AppError;
use crate::state::AppState;

pub async fn list_activity(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
    Query(params): Query<LimitQuery>,
) -> Result<impl IntoResponse, AppError> {
    require(&acting, Permission::ViewTutorActivity)?;
    let limit = params.limit.unwrap_or(100);
    let entries = state.activity_store.list_recent(limit).await?;
    Ok(Json(entries))
}
