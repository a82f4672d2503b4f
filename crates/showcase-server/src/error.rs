//! HTTP error mapping
//!
//! Every failure leaves the server as `{"error": "<message>"}` with a status
//! chosen from the error kind. Storage failures are logged and reported as a
//! bare "Server error".

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid project ID")]
    InvalidProjectId,

    #[error("Malformed payload")]
    MalformedPayload,

    /// A required field was absent or blank; carries the client-facing message
    #[error("{0}")]
    MissingField(&'static str),

    #[error("Not logged in")]
    Unauthorized,

    #[error("Project not found")]
    ProjectNotFound,

    #[error(transparent)]
    Core(#[from] showcase_core::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        use showcase_core::Error as Core;

        match self {
            Self::InvalidProjectId | Self::MalformedPayload | Self::MissingField(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::ProjectNotFound => StatusCode::NOT_FOUND,
            Self::Core(err) => match err {
                Core::UserNotFound | Core::IncorrectPassword | Core::UsernameTaken => {
                    StatusCode::BAD_REQUEST
                }
                Core::NotOwner(_) => StatusCode::FORBIDDEN,
                Core::ProjectNotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Message placed in the response body
    pub fn message(&self) -> String {
        use showcase_core::Error as Core;

        match self {
            Self::Core(Core::NotOwner(_)) => "Forbidden".to_string(),
            Self::Core(Core::ProjectNotFound(_)) => "Project not found".to_string(),
            _ if self.status().is_server_error() => "Server error".to_string(),
            other => other.to_string(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Core(err) => err.code(),
            _ => "HTTP",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        Self::MalformedPayload
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "Request failed");
        }

        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

/// Parse a project id taken from the path
pub fn parse_project_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim().parse().map_err(|_| ApiError::InvalidProjectId)
}

/// Fail with `MissingField(message)` when any value is blank
pub fn require_fields(values: &[&str], message: &'static str) -> Result<(), ApiError> {
    if values.iter().any(|value| value.trim().is_empty()) {
        return Err(ApiError::MissingField(message));
    }
    Ok(())
}
