//! Server configuration, loaded from environment variables at startup.

/// Runtime configuration for wasend-relay.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:8787"`).
    pub bind_address: String,

    /// Base URL of the upstream provider API
    /// (default: `"https://wasenderapi.com/api"`).
    pub upstream_url: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,hyper=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Value for the `Access-Control-Allow-Origin` header.
    /// Wildcard by default – set WASEND_CORS_ORIGIN in production.
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("WASEND_BIND", "0.0.0.0:8787"),
            upstream_url: env_or("WASEND_UPSTREAM_URL", "https://wasenderapi.com/api"),
            log_level: env_or("WASEND_LOG", "info"),
            log_json: std::env::var("WASEND_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            cors_allowed_origin: std::env::var("WASEND_CORS_ORIGIN").ok(),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
