//! Upstream messaging-provider client.
//!
//! Thin reqwest wrapper over the two provider endpoints the relay consumes:
//! `GET /account-info` (credential check) and `POST /send-message`. Both
//! authenticate with the caller's credential as a bearer token; the relay
//! itself holds no credential.

use serde_json::Value;

/// Client for the WasenderAPI-shaped provider endpoints.
#[derive(Clone, Debug)]
pub struct ProviderClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProviderClient {
    /// `base_url` is the provider API root, e.g. `"https://wasenderapi.com/api"`.
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /account-info` with bearer auth. Returns the provider's status
    /// code and parsed JSON body; any transport or parse failure surfaces
    /// as the error.
    pub async fn account_info(&self, api_key: &str) -> Result<(u16, Value), reqwest::Error> {
        let resp = self
            .http
            .get(self.url("/account-info"))
            .bearer_auth(api_key)
            .send()
            .await?;
        let status = resp.status().as_u16();
        let body = resp.json().await?;
        Ok((status, body))
    }

    /// `POST /send-message` with bearer auth and a JSON payload. One call,
    /// no retries; the provider's status code and body are relayed as-is.
    pub async fn send_message(
        &self,
        api_key: &str,
        payload: &Value,
    ) -> Result<(u16, Value), reqwest::Error> {
        let resp = self
            .http
            .post(self.url("/send-message"))
            .bearer_auth(api_key)
            .json(payload)
            .send()
            .await?;
        let status = resp.status().as_u16();
        let body = resp.json().await?;
        Ok((status, body))
    }
}
