//! CORS middleware.
//!
//! Short-circuits any OPTIONS request to an empty 204 carrying permissive
//! CORS headers, without authenticating, and stamps the same headers onto
//! every other response on the way out.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE,
};
use axum::http::{HeaderValue, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

const ALLOW_METHODS: &str = "POST, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";
const MAX_AGE: &str = "86400";

pub async fn cors_middleware(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let origin = allowed_origin(&state);

    // Preflight: answer before routing, regardless of path or body.
    if req.method() == Method::OPTIONS {
        let mut resp = StatusCode::NO_CONTENT.into_response();
        apply_headers(&mut resp, origin);
        return resp;
    }

    let mut resp = next.run(req).await;
    apply_headers(&mut resp, origin);
    resp
}

fn allowed_origin(state: &AppState) -> HeaderValue {
    state
        .config
        .cors_allowed_origin
        .as_deref()
        .and_then(|o| o.parse().ok())
        .unwrap_or_else(|| HeaderValue::from_static("*"))
}

fn apply_headers(resp: &mut Response, origin: HeaderValue) {
    let headers = resp.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE));
}
