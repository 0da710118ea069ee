//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::provider::ProviderClient;

/// State shared across all HTTP handlers. The relay holds no mutable state;
/// this is configuration plus the reusable upstream HTTP client.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Client for the upstream messaging provider.
    pub provider: ProviderClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let provider = ProviderClient::new(&config.upstream_url);
        Self {
            config: Arc::new(config),
            provider,
        }
    }
}
