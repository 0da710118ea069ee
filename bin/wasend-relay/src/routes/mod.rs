//! Axum router construction.
//!
//! [`build`] assembles the complete application router:
//! - Health / heartbeat route
//! - The send/verify route
//! - A 405 fallback matching the wire contract (`{"error": "Method not allowed"}`)
//! - Middleware layers (per-request tracing, CORS outermost so preflights
//!   never reach the router)

mod health;
mod send;

use std::sync::Arc;

use axum::{middleware, Router};

use crate::error::RelayError;
use crate::middleware::{cors, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::router())
        .merge(send::router())
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state.clone())
        .layer(middleware::from_fn(trace::trace_middleware))
        .layer(middleware::from_fn_with_state(state, cors::cors_middleware))
}

/// Wrong method on a known route, e.g. GET on the send endpoint.
async fn method_not_allowed() -> RelayError {
    RelayError::MethodNotAllowed
}
