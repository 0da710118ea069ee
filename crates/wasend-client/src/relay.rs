//! HTTP client for the wasend-relay endpoint.

use async_trait::async_trait;
use wasend_types::{RelayResponse, SendRequest, VerifyResponse};

use crate::error::ClientError;

/// Interface to the relay. The pipeline only ever talks to the relay
/// through this trait, so tests can substitute a stub.
#[async_trait]
pub trait RelayApi: Send + Sync + 'static {
    /// Relay one message. A non-success relay status becomes
    /// [`ClientError::Relay`] carrying the relay's error message.
    async fn send(&self, req: SendRequest) -> Result<RelayResponse, ClientError>;

    /// Ask the relay to verify a credential against the provider.
    async fn verify(&self, api_key: &str) -> Result<VerifyResponse, ClientError>;
}

/// Production [`RelayApi`] implementation: POSTs the JSON envelope to a
/// wasend-relay send endpoint.
#[derive(Debug, Clone)]
pub struct HttpRelay {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpRelay {
    /// `endpoint` is the full URL of the relay's send route,
    /// e.g. `"http://127.0.0.1:8787/send"`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl RelayApi for HttpRelay {
    async fn send(&self, req: SendRequest) -> Result<RelayResponse, ClientError> {
        let resp = self.http.post(&self.endpoint).json(&req).send().await?;
        let ok = resp.status().is_success();
        let body: RelayResponse = resp.json().await?;

        let RelayResponse {
            message,
            error,
            details,
            ..
        } = body;

        if ok {
            Ok(RelayResponse {
                success: Some(true),
                message: message.or_else(|| Some("Message sent successfully".to_owned())),
                error,
                details,
            })
        } else {
            let msg = error
                .or(message)
                .unwrap_or_else(|| "Failed to send message".to_owned());
            Err(ClientError::Relay(msg))
        }
    }

    async fn verify(&self, api_key: &str) -> Result<VerifyResponse, ClientError> {
        let req = SendRequest {
            api_key: Some(api_key.to_owned()),
            action: Some("verify".to_owned()),
            ..SendRequest::default()
        };
        // The relay answers 200 or 400, either way with a VerifyResponse
        // body, so the status code itself is not an error here.
        let resp = self.http.post(&self.endpoint).json(&req).send().await?;
        Ok(resp.json().await?)
    }
}
