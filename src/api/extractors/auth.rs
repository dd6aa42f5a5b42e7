use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use std::sync::Arc;
use tracing::Span;

use crate::domain::models::session::{ResolvedSession, SessionError, SessionState};
use crate::domain::services::resolver::resolve_profile;
use crate::error::AppError;
use crate::state::AppState;

/// Claims minted by the external identity provider. The token proves WHO
/// the caller is; role and profile are always read from the user store.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

pub(crate) fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

pub(crate) fn decode_claims(state: &AppState, token: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_ed_pem(state.config.auth_public_key.as_bytes())
        .map_err(|_| AppError::Internal)?;

    let mut validation = Validation::new(Algorithm::EdDSA);
    validation.set_audience(&[state.config.auth_audience.as_str()]);
    validation.set_issuer(&[state.config.auth_issuer.as_str()]);

    let token_data =
        decode::<Claims>(token, &decoding_key, &validation).map_err(|_| AppError::Unauthorized)?;
    Ok(token_data.claims)
}

/// A verified identity that may not have a profile yet. Used by the
/// bootstrap endpoint, which runs before any user record exists.
pub struct VerifiedIdentity(pub Claims);

impl<S> FromRequestParts<S> for VerifiedIdentity
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let token = bearer_token(parts).ok_or(AppError::Unauthorized)?;
        let claims = decode_claims(&app_state, &token)?;
        Ok(VerifiedIdentity(claims))
    }
}

/// An authenticated principal with a resolved, active session. Rejection
/// reasons stay distinct: no/bad token is 401, while a missing profile,
/// an archived account or a corrupt role each surface their own error.
pub struct Principal(pub ResolvedSession);

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let token = bearer_token(parts).ok_or(AppError::Unauthorized)?;
        let claims = decode_claims(&app_state, &token)?;

        match resolve_profile(app_state.user_store.as_ref(), &claims.sub).await {
            SessionState::Active(session) => {
                Span::current().record("user_id", session.user.uid.as_str());
                Span::current().record("role", session.role.as_str());
                Ok(Principal(session))
            }
            SessionState::Failed(SessionError::ProfileNotFound) => Err(AppError::ProfileNotFound),
            SessionState::Failed(SessionError::AccountDeactivated) => {
                Err(AppError::AccountDeactivated)
            }
            SessionState::Failed(SessionError::InvalidRole(value)) => {
                Err(AppError::InvalidRole(value))
            }
            SessionState::Failed(SessionError::StoreFailure) => {
                Err(AppError::InternalWithMsg("failed to load profile".to_string()))
            }
            SessionState::SignedOut | SessionState::Pending => Err(AppError::Unauthorized),
        }
    }
}
