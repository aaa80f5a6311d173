//! HTTP error responses.

use crate::{ErrorKind, RoomError, UserError};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::Display;
use serde_json::json;
use tracing::{debug, warn};

/// Error returned by HTTP handlers, rendered as `{"detail": "..."}`.
#[derive(Debug, Display)]
pub enum ApiError {
    /// Registry rejection.
    #[display("{_0}")]
    Room(RoomError),
    /// Registration rejection.
    #[display("{_0}")]
    User(UserError),
    /// Missing or unknown bearer token.
    #[display("Not authenticated")]
    Unauthorized,
    /// Malformed request.
    #[display("{_0}")]
    BadRequest(String),
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Room(err) => match err.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Conflict | ErrorKind::AlreadyTerminal => StatusCode::CONFLICT,
                ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
                ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            },
            Self::User(UserError::InvalidUsername(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::User(UserError::UsernameTaken(_)) => StatusCode::CONFLICT,
            Self::User(UserError::UnknownUser(_)) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<RoomError> for ApiError {
    fn from(err: RoomError) -> Self {
        Self::Room(err)
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        Self::User(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::NOT_FOUND {
            debug!(%status, error = %self, "Request failed");
        } else {
            warn!(%status, error = %self, "Request rejected");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
