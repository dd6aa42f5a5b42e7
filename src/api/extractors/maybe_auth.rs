use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::sync::Arc;

use crate::api::extractors::auth::{bearer_token, decode_claims};
use crate::domain::models::session::SessionState;
use crate::domain::services::resolver::resolve_profile;
use crate::error::AppError;
use crate::state::AppState;

/// Session view that never rejects. No token or an invalid one is simply
/// the signed-out state; a valid token yields whatever the resolver says,
/// including its failure states.
pub struct MaybePrincipal(pub SessionState);

impl<S> FromRequestParts<S> for MaybePrincipal
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let Some(token) = bearer_token(parts) else {
            return Ok(MaybePrincipal(SessionState::SignedOut));
        };

        let claims = match decode_claims(&app_state, &token) {
            Ok(claims) => claims,
            // Expired or malformed tokens are guests, not errors.
            Err(_) => return Ok(MaybePrincipal(SessionState::SignedOut)),
        };

        let resolved = resolve_profile(app_state.user_store.as_ref(), &claims.sub).await;
        Ok(MaybePrincipal(resolved))
    }
}
