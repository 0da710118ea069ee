//! HTTP middleware stack: CORS handling and per-request tracing.

pub mod cors;
pub mod trace;
