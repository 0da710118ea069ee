//! End-to-end tests for the relay router, with a throwaway in-process HTTP
//! server standing in for the upstream provider.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, Request, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower::ServiceExt;

use wasend_relay::config::Config;
use wasend_relay::routes;
use wasend_relay::state::AppState;

/// What the fake provider answers, plus a capture slot for the payload the
/// relay forwarded to `send-message`.
#[derive(Clone)]
struct FakeProvider {
    account_status: StatusCode,
    account_body: Value,
    send_status: StatusCode,
    send_body: Value,
    captured: Arc<Mutex<Option<Value>>>,
}

impl FakeProvider {
    fn ok() -> Self {
        Self {
            account_status: StatusCode::OK,
            account_body: json!({"name": "test account"}),
            send_status: StatusCode::OK,
            send_body: json!({"message": "ok"}),
            captured: Arc::new(Mutex::new(None)),
        }
    }

    fn rejecting(status: StatusCode, body: Value) -> Self {
        Self {
            account_status: status,
            account_body: body.clone(),
            send_status: status,
            send_body: body,
            captured: Arc::new(Mutex::new(None)),
        }
    }

    /// Bind on an ephemeral port and serve until the test ends.
    async fn spawn(self) -> SocketAddr {
        let router = Router::new()
            .route(
                "/account-info",
                get(|State(p): State<FakeProvider>| async move {
                    (p.account_status, Json(p.account_body.clone())).into_response()
                }),
            )
            .route(
                "/send-message",
                post(|State(p): State<FakeProvider>, Json(body): Json<Value>| async move {
                    *p.captured.lock().unwrap() = Some(body);
                    (p.send_status, Json(p.send_body.clone())).into_response()
                }),
            )
            .with_state(self);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }
}

fn app(upstream_url: &str) -> Router {
    let cfg = Config {
        bind_address: "127.0.0.1:0".into(),
        upstream_url: upstream_url.into(),
        log_level: "info".into(),
        log_json: false,
        cors_allowed_origin: None,
    };
    routes::build(Arc::new(AppState::new(cfg)))
}

/// App whose provider is unreachable; fine for tests that never get that far.
fn app_without_provider() -> Router {
    app("http://127.0.0.1:9")
}

async fn request(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let body = match body {
        Some(v) => Body::from(v.to_string()),
        None => Body::empty(),
    };
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

// ── CORS & method handling ────────────────────────────────────────────────────

#[tokio::test]
async fn options_returns_204_with_cors_headers() {
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/send")
        .body(Body::from("ignored"))
        .unwrap();
    let resp = app_without_provider().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let headers = resp.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
    assert_eq!(
        headers["access-control-allow-headers"],
        "Content-Type, Authorization"
    );
}

#[tokio::test]
async fn cors_headers_are_stamped_on_normal_responses() {
    let req = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let resp = app_without_provider().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn wrong_method_is_405_with_error_body() {
    let (status, body) = request(app_without_provider(), Method::GET, "/send", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");
}

// ── Validation ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_api_key_is_400() {
    let (status, body) = request(
        app_without_provider(),
        Method::POST,
        "/send",
        Some(json!({"to": "+15551234567", "text": "Hello"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "API key is required");
}

#[tokio::test]
async fn blank_api_key_is_invalid_format() {
    let (status, body) = request(
        app_without_provider(),
        Method::POST,
        "/send",
        Some(json!({"apiKey": "   ", "to": "+15551234567", "text": "Hello"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid API key format");
}

#[tokio::test]
async fn missing_recipient_is_400() {
    let (status, body) = request(
        app_without_provider(),
        Method::POST,
        "/send",
        Some(json!({"apiKey": "k", "text": "Hello"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Recipient phone number is required");
}

#[tokio::test]
async fn missing_content_is_400() {
    let (status, body) = request(
        app_without_provider(),
        Method::POST,
        "/send",
        Some(json!({"apiKey": "k", "to": "+15551234567"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Either message text or file URL is required");
}

#[tokio::test]
async fn malformed_body_is_caught_as_500() {
    let req = Request::builder()
        .method(Method::POST)
        .uri("/send")
        .header("content-type", "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let resp = app_without_provider().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "An unexpected error occurred");
    assert!(!body["details"].as_str().unwrap().is_empty());
}

// ── Forwarding ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn send_success_merges_success_flag() {
    let addr = FakeProvider::ok().spawn().await;
    let (status, body) = request(
        app(&format!("http://{addr}")),
        Method::POST,
        "/send",
        Some(json!({"apiKey": "k", "to": "+15551234567", "text": "Hello"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "ok");
}

#[tokio::test]
async fn provider_error_passes_through_with_success_false() {
    let provider = FakeProvider::rejecting(StatusCode::UNAUTHORIZED, json!({"error": "bad token"}));
    let addr = provider.spawn().await;
    let (status, body) = request(
        app(&format!("http://{addr}")),
        Method::POST,
        "/send",
        Some(json!({"apiKey": "k", "to": "+15551234567", "text": "Hello"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "bad token");
}

#[tokio::test]
async fn video_attachment_is_forwarded_under_the_video_key() {
    let provider = FakeProvider::ok();
    let captured = Arc::clone(&provider.captured);
    let addr = provider.spawn().await;

    let (status, _) = request(
        app(&format!("http://{addr}")),
        Method::POST,
        "/send",
        Some(json!({
            "apiKey": "k",
            "to": "+15551234567",
            "fileUrl": "https://cdn.example/clip.mp4",
            "fileType": "video",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let payload = captured.lock().unwrap().clone().unwrap();
    assert_eq!(payload["videoUrl"], "https://cdn.example/clip.mp4");
    assert!(payload.get("documentUrl").is_none());
    assert_eq!(payload["to"], "+15551234567");
}

#[tokio::test]
async fn attachment_without_kind_defaults_to_document() {
    let provider = FakeProvider::ok();
    let captured = Arc::clone(&provider.captured);
    let addr = provider.spawn().await;

    let (status, _) = request(
        app(&format!("http://{addr}")),
        Method::POST,
        "/send",
        Some(json!({
            "apiKey": "k",
            "to": "+15551234567",
            "fileUrl": "https://cdn.example/file.bin",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let payload = captured.lock().unwrap().clone().unwrap();
    assert_eq!(payload["documentUrl"], "https://cdn.example/file.bin");
}

#[tokio::test]
async fn unreachable_provider_is_a_structured_500() {
    let (status, body) = request(
        app_without_provider(),
        Method::POST,
        "/send",
        Some(json!({"apiKey": "k", "to": "+15551234567", "text": "Hello"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "An unexpected error occurred");
}

// ── Verify mode ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn verify_with_valid_credential_is_200() {
    let addr = FakeProvider::ok().spawn().await;
    let (status, body) = request(
        app(&format!("http://{addr}")),
        Method::POST,
        "/send",
        Some(json!({"apiKey": "k", "action": "verify"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isValid"], true);
    assert_eq!(body["message"], "API key is valid");
}

#[tokio::test]
async fn verify_with_rejected_credential_is_400() {
    let provider =
        FakeProvider::rejecting(StatusCode::UNAUTHORIZED, json!({"error": "Invalid API key"}));
    let addr = provider.spawn().await;
    let (status, body) = request(
        app(&format!("http://{addr}")),
        Method::POST,
        "/send",
        Some(json!({"apiKey": "k", "action": "verify"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["isValid"], false);
    assert_eq!(body["message"], "Invalid API key");
}

#[tokio::test]
async fn verify_against_unreachable_provider_reports_diagnostic() {
    let (status, body) = request(
        app_without_provider(),
        Method::POST,
        "/send",
        Some(json!({"apiKey": "k", "action": "verify"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["isValid"], false);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("API key verification failed"));
}
