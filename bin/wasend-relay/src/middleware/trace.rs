//! Per-request tracing middleware.
//!
//! Assigns (or adopts) an `x-request-id`, spans the request with method and
//! path, and logs status plus latency when the response is written.

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

pub static X_REQUEST_ID: &str = "x-request-id";

pub async fn trace_middleware(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();

    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let span = info_span!(
        "http_request",
        request_id = %request_id,
        method = %method,
        path = %path,
    );

    async move {
        info!("→ request started");

        let mut response = next.run(req).await;

        if let Ok(value) = request_id.to_string().parse() {
            response.headers_mut().insert(X_REQUEST_ID, value);
        }

        info!(
            status = response.status().as_u16(),
            latency_ms = start.elapsed().as_millis() as u64,
            "← response finished"
        );

        response
    }
    .instrument(span)
    .await
}
