//! wasend-relay: stateless HTTP proxy in front of the WasenderAPI-shaped
//! messaging provider.
//!
//! The relay accepts a JSON envelope (credential + message fields) on its
//! send route, validates it, forwards an equivalent payload to the provider
//! with a bearer authorization header, and hands the provider's response
//! back verbatim plus a normalized `success` flag. It keeps no state, so
//! concurrent invocations share nothing and the process can be replicated
//! freely.

pub mod config;
pub mod error;
pub mod middleware;
pub mod provider;
pub mod routes;
pub mod state;
