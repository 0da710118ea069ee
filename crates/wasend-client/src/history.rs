//! Local message history.
//!
//! [`HistoryStore`] defines the interface for the shared history list.
//! The default implementation is [`JsonFileStore`], which keeps the whole
//! list as one JSON document on disk, most recent record first. To swap to
//! another backend, implement [`HistoryStore`] for your new type and hand
//! it to [`crate::SendPipeline`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;
use wasend_types::MessageRecord;

use crate::error::ClientError;

/// Storage key the history list lives under. The file store appends a
/// `.json` extension to it.
pub const HISTORY_KEY: &str = "whatsapp_message_history";

/// Interface for persisting the ordered message history.
#[async_trait]
pub trait HistoryStore: Send + Sync + 'static {
    /// All records, most recent first.
    async fn list(&self) -> Result<Vec<MessageRecord>, ClientError>;

    /// Insert or replace by identifier: an existing record with the same id
    /// is replaced in place, otherwise the record is prepended. An id never
    /// appears twice in the stored list.
    async fn upsert(&self, record: MessageRecord) -> Result<(), ClientError>;

    /// Drop all records. Idempotent: clearing an already-empty store is a
    /// no-op, not an error.
    async fn clear(&self) -> Result<(), ClientError>;
}

/// JSON-file-backed history store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles; there is one writer context at
    /// a time, last writer wins per identifier.
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Store the history list under `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{HISTORY_KEY}.json")),
            lock: Mutex::new(()),
        }
    }

    /// Platform data directory for wasend, falling back to the current
    /// directory when the platform reports none.
    pub fn default_dir() -> PathBuf {
        dirs_next::data_dir()
            .map(|d| d.join("wasend"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    async fn read_all(&self) -> Result<Vec<MessageRecord>, ClientError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            // Absent file means an empty history.
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice(&bytes) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e,
                    "history file holds invalid JSON; treating as empty");
                Ok(Vec::new())
            }
        }
    }

    async fn write_all(&self, records: &[MessageRecord]) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec(records)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for JsonFileStore {
    async fn list(&self) -> Result<Vec<MessageRecord>, ClientError> {
        let _guard = self.lock.lock().await;
        self.read_all().await
    }

    async fn upsert(&self, record: MessageRecord) -> Result<(), ClientError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;
        match records.iter().position(|r| r.id == record.id) {
            Some(i) => records[i] = record,
            None => records.insert(0, record),
        }
        self.write_all(&records).await
    }

    async fn clear(&self) -> Result<(), ClientError> {
        let _guard = self.lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
