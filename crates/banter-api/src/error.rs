use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use banter_genai::GenerationError;
use banter_types::api::ErrorResponse;

/// Every failure a handler can report. Rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid field: {0}")]
    InvalidField(&'static str),

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Empty message")]
    EmptyMessage,

    #[error("Prompt required")]
    PromptRequired,

    #[error("No file uploaded")]
    NoFile,

    #[error("Image too large")]
    ImageTooLarge,

    /// The body is not JSON of the expected shape.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    UpstreamGenerationFailure(#[from] GenerationError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_)
            | ApiError::InvalidField(_)
            | ApiError::DuplicateUsername
            | ApiError::EmptyMessage
            | ApiError::PromptRequired
            | ApiError::NoFile
            | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::UserNotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidPassword => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized => StatusCode::FORBIDDEN,
            ApiError::ImageTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::UpstreamGenerationFailure(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(e) => error!("Internal error: {:#}", e),
            ApiError::UpstreamGenerationFailure(e) => error!("Generation failed: {}", e),
            _ => {}
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
