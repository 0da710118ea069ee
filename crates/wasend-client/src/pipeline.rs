//! The message-submission pipeline.
//!
//! [`SendPipeline::submit`] validates the input, persists a `pending`
//! record, and relays the message in a background task. The returned
//! [`Submission`] holds the pending record and a completion handle that
//! resolves to the final record once the relay call has settled — the
//! pipeline's only externally visible completion signal.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::oneshot;
use tracing::{debug, warn};
use uuid::Uuid;
use wasend_types::{Attachment, MessageRecord, MessageStatus, SendRequest, VerifyResponse};

use crate::error::ClientError;
use crate::history::HistoryStore;
use crate::relay::RelayApi;

/// One accepted submission: the `pending` record as persisted, plus the
/// channel on which the final record arrives.
#[derive(Debug)]
pub struct Submission {
    pub record: MessageRecord,
    completion: oneshot::Receiver<MessageRecord>,
}

impl Submission {
    /// Wait for the relay call to settle and return the final record
    /// (`sent` or `failed`). `None` only if the relay task was torn down
    /// before completing, e.g. at runtime shutdown.
    pub async fn finished(self) -> Option<MessageRecord> {
        self.completion.await.ok()
    }
}

/// Client send pipeline: validation, history bookkeeping, and the relay
/// round trip for a single credential.
pub struct SendPipeline {
    store: Arc<dyn HistoryStore>,
    relay: Arc<dyn RelayApi>,
    api_key: String,
}

impl SendPipeline {
    pub fn new(
        store: Arc<dyn HistoryStore>,
        relay: Arc<dyn RelayApi>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            relay,
            api_key: api_key.into(),
        }
    }

    /// Submit a message for delivery.
    ///
    /// Validation failures (empty recipient, or neither text nor
    /// attachment) are returned immediately and create no record. On
    /// success the record is persisted in `pending` status and the relay
    /// call runs on the async runtime; the record transitions exactly once
    /// to `sent` or `failed` when that call resolves.
    pub async fn submit(
        &self,
        to: &str,
        text: &str,
        attachment: Option<Attachment>,
    ) -> Result<Submission, ClientError> {
        let to = to.trim();
        if to.is_empty() {
            return Err(ClientError::MissingRecipient);
        }
        if text.trim().is_empty() && attachment.is_none() {
            return Err(ClientError::MissingContent);
        }

        let record = MessageRecord {
            id: Uuid::new_v4(),
            to: to.to_owned(),
            text: text.to_owned(),
            attachment,
            status: MessageStatus::Pending,
            timestamp: Utc::now().timestamp_millis(),
            error: None,
        };
        self.store.upsert(record.clone()).await?;

        let req = SendRequest {
            api_key: Some(self.api_key.clone()),
            to: Some(record.to.clone()),
            text: (!record.text.is_empty()).then(|| record.text.clone()),
            file_url: record.attachment.as_ref().map(|a| a.url().to_owned()),
            file_type: record.attachment.as_ref().map(|a| a.kind()),
            action: None,
        };

        let (tx, rx) = oneshot::channel();
        let store = Arc::clone(&self.store);
        let relay = Arc::clone(&self.relay);
        let mut finished = record.clone();
        tokio::spawn(async move {
            match relay.send(req).await {
                Ok(resp) => {
                    debug!(id = %finished.id, message = ?resp.message, "message relayed");
                    finished.status = MessageStatus::Sent;
                    finished.error = None;
                }
                Err(e) => {
                    warn!(id = %finished.id, error = %e, "relay call failed");
                    finished.status = MessageStatus::Failed;
                    finished.error = Some(e.to_string());
                }
            }
            if let Err(e) = store.upsert(finished.clone()).await {
                warn!(id = %finished.id, error = %e, "failed to persist final record");
            }
            let _ = tx.send(finished);
        });

        Ok(Submission {
            record,
            completion: rx,
        })
    }

    /// Verify the configured credential against the provider, via the relay.
    pub async fn verify(&self) -> Result<VerifyResponse, ClientError> {
        self.relay.verify(&self.api_key).await
    }

    /// The history list, most recent first.
    pub async fn history(&self) -> Result<Vec<MessageRecord>, ClientError> {
        self.store.list().await
    }

    /// Drop the whole history list. Idempotent.
    pub async fn clear_history(&self) -> Result<(), ClientError> {
        self.store.clear().await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
