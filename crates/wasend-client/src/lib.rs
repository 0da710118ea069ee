//! Client-side send pipeline.
//!
//! [`SendPipeline`] gathers a recipient, text, and an optional attachment,
//! tracks the submission as a [`wasend_types::MessageRecord`] in a local
//! history list, and relays the message through a wasend-relay endpoint.
//!
//! The two seams — [`HistoryStore`] and [`RelayApi`] — are traits so tests
//! (and alternative frontends) can swap the JSON-file store or the HTTP
//! relay client without touching the pipeline itself.

mod error;
pub mod history;
pub mod pipeline;
pub mod relay;

pub use error::ClientError;
pub use history::{HistoryStore, JsonFileStore, HISTORY_KEY};
pub use pipeline::{SendPipeline, Submission};
pub use relay::{HttpRelay, RelayApi};
