//! Client pipeline error type.

use thiserror::Error;

/// All errors the client send pipeline can surface.
///
/// The two validation variants are raised before any record is created;
/// everything else happens after submission and is captured into the
/// record's `error` field rather than propagated further.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Recipient phone number is required")]
    MissingRecipient,

    #[error("Either message text or file is required")]
    MissingContent,

    /// The relay answered with a non-success status; carries the relay's
    /// own error message verbatim.
    #[error("{0}")]
    Relay(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("history store I/O failed: {0}")]
    Store(#[from] std::io::Error),

    #[error("history store encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}
