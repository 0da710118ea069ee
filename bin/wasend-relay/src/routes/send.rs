//! The send/verify route (`POST /send`).
//!
//! Validation order (first failure wins): body parses as JSON → credential
//! present and usable → verify mode short-circuits → recipient present →
//! some content present. Only then is the provider called, and its status
//! and body are relayed back merged with a normalized `success` flag.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use wasend_types::{FileKind, SendRequest, VerifyResponse};

use crate::error::RelayError;
use crate::state::AppState;

/// Register the send route.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/send", post(send))
}

/// Relay one send (or credential-verification) request to the provider.
pub async fn send(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, RelayError> {
    // Malformed bodies are caught generically, not surfaced as a 4xx:
    // the contract treats them as an unexpected failure.
    let req: SendRequest = serde_json::from_slice(&body)?;

    let api_key = match req.api_key.as_deref() {
        None | Some("") => return Err(RelayError::MissingApiKey),
        Some(k) if k.trim().is_empty() => return Err(RelayError::InvalidApiKeyFormat),
        Some(k) => k.to_owned(),
    };

    if req.action.as_deref() == Some("verify") {
        let verification = verify_api_key(&state, &api_key).await;
        let status = if verification.is_valid {
            StatusCode::OK
        } else {
            StatusCode::BAD_REQUEST
        };
        return Ok((status, Json(verification)).into_response());
    }

    let to = match req.to.as_deref().map(str::trim) {
        None | Some("") => return Err(RelayError::MissingRecipient),
        Some(t) => t.to_owned(),
    };

    let text = req.text.filter(|t| !t.is_empty());
    if text.is_none() && req.file_url.is_none() {
        return Err(RelayError::MissingContent);
    }

    let payload = build_payload(&to, text, req.file_url, req.file_type);
    debug!(to = %to, "forwarding send request to provider");

    let (status, provider_body) = state.provider.send_message(&api_key, &payload).await?;

    // Merge `success` into the provider's body and mirror its status code.
    let mut merged = match provider_body {
        Value::Object(map) => map,
        other => {
            warn!(body = %other, "provider returned a non-object body");
            Map::new()
        }
    };
    let ok = (200..300).contains(&status);
    merged.insert("success".to_owned(), Value::Bool(ok));

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, Json(Value::Object(merged))).into_response())
}

/// Build the outbound provider payload. The attachment URL goes under the
/// kind-specific key; an unspecified kind defaults to document.
fn build_payload(
    to: &str,
    text: Option<String>,
    file_url: Option<String>,
    file_type: Option<FileKind>,
) -> Value {
    let mut payload = Map::new();
    payload.insert("to".to_owned(), Value::String(to.to_owned()));
    if let Some(text) = text {
        payload.insert("text".to_owned(), Value::String(text));
    }
    if let Some(url) = file_url {
        let key = file_type.unwrap_or(FileKind::Document).payload_key();
        payload.insert(key.to_owned(), Value::String(url));
    }
    Value::Object(payload)
}

/// Check the credential against the provider's account-info endpoint.
/// Transport or parse failures are reported as an unsuccessful
/// verification, never as an unhandled fault.
async fn verify_api_key(state: &AppState, api_key: &str) -> VerifyResponse {
    match state.provider.account_info(api_key).await {
        Ok((status, body)) => {
            let is_valid = (200..300).contains(&status);
            let message = if is_valid {
                "API key is valid".to_owned()
            } else {
                body.get("error")
                    .or_else(|| body.get("message"))
                    .and_then(Value::as_str)
                    .unwrap_or("Invalid API key")
                    .to_owned()
            };
            VerifyResponse {
                is_valid,
                message: Some(message),
            }
        }
        Err(e) => VerifyResponse {
            is_valid: false,
            message: Some(format!("API key verification failed: {e}")),
        },
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
