use axum::{response::IntoResponse, Json};

use crate::api::dtos::responses::SessionResponse;
use crate::api::extractors::maybe_auth::MaybePrincipal;

/// Reports the caller's session as the frontend sees it. Guests get a
/// `signed_out` body rather than a 401 so the page can render either way.
pub async fn current_session(MaybePrincipal(session): MaybePrincipal) -> impl IntoResponse {
    Json(SessionResponse::from(session))
}
