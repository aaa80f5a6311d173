//! Bearer-token extraction.

use super::{ApiError, AppState};
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use strictly_tictactoe::Participant;
use tracing::debug;

/// The caller, resolved from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct Identity(pub Participant);

impl FromRequestParts<AppState> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or_else(|| {
                debug!("Missing bearer token");
                ApiError::Unauthorized
            })?;
        state
            .service()
            .authenticate(token)
            .map(Identity)
            .ok_or(ApiError::Unauthorized)
    }
}
