//! Unified relay error type.
//!
//! Every handler returns `Result<T, RelayError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted
//! to a JSON-body HTTP response with an appropriate status code.
//!
//! Validation errors carry their message to the caller directly. Unexpected
//! failures (network errors towards the provider, malformed bodies) are
//! logged with full detail and returned as a structured 500 — the relay
//! never lets an exception escape as an unhandled crash.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// All errors that can occur in the relay request lifecycle.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The send route was hit with anything other than POST.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// `apiKey` absent or empty.
    #[error("API key is required")]
    MissingApiKey,

    /// `apiKey` present but not a usable credential (whitespace only).
    #[error("Invalid API key format")]
    InvalidApiKeyFormat,

    /// `to` absent or empty in send mode.
    #[error("Recipient phone number is required")]
    MissingRecipient,

    /// Neither `text` nor `fileUrl` present in send mode.
    #[error("Either message text or file URL is required")]
    MissingContent,

    /// Anything caught at the boundary: malformed request body, provider
    /// network failure, malformed provider response.
    #[error("{0}")]
    Unexpected(String),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match &self {
            RelayError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),

            RelayError::MissingApiKey
            | RelayError::InvalidApiKeyFormat
            | RelayError::MissingRecipient
            | RelayError::MissingContent => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),

            RelayError::Unexpected(details) => {
                error!(details = %details, "unexpected error in relay request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "An unexpected error occurred",
                        "details": details,
                    })),
                )
                    .into_response()
            }
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(e: reqwest::Error) -> Self {
        RelayError::Unexpected(e.to_string())
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(e: serde_json::Error) -> Self {
        RelayError::Unexpected(e.to_string())
    }
}
