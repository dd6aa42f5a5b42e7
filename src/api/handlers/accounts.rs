use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{ChangeRoleRequest, ListQuery};
use crate::api::extractors::auth::Principal;
use crate::domain::models::user::{NewAccount, ProfileUpdate};
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
    Json(payload): Json<NewAccount>,
) -> Result<impl IntoResponse, AppError> {
    let created = state.accounts.create_account(&acting, payload).await?;
    info!("Created account {} ({})", created.uid, created.role);
    Ok(Json(created))
}

pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
    Query(params): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let accounts = state
        .accounts
        .list_accounts(&acting, params.include_archived)
        .await?;
    Ok(Json(accounts))
}

pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let account = state.accounts.get_account(&acting, &uid).await?;
    Ok(Json(account))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
    Path(uid): Path<String>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.accounts.update_profile(&acting, &uid, payload).await?;
    Ok(Json(updated))
}

pub async fn change_role(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
    Path(uid): Path<String>,
    Json(payload): Json<ChangeRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.accounts.change_role(&acting, &uid, payload.role).await?;
    info!("Account {} role set to {}", updated.uid, updated.role);
    Ok(Json(updated))
}

pub async fn archive_account(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let archived = state.accounts.archive_account(&acting, &uid).await?;
    info!("Archived account {}", archived.uid);
    Ok(Json(archived))
}

pub async fn reactivate_account(
    State(state): State<Arc<AppState>>,
    Principal(acting): Principal,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reactivated = state.accounts.reactivate_account(&acting, &uid).await?;
    info!("Reactivated account {}", reactivated.uid);
    Ok(Json(reactivated))
}
