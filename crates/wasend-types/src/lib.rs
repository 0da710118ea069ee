//! Shared data model and wire types for the wasend workspace.
//!
//! The relay server and the client pipeline both speak the envelope defined
//! here, so the field names (`apiKey`, `fileUrl`, …) live in exactly one
//! place. Everything on the wire is camelCase.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Attachments ───────────────────────────────────────────────────────────────

/// Classification of an attached file, governing which provider payload
/// field carries its URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Video,
    Document,
}

impl FileKind {
    /// Classify a MIME content type. Total: every input maps to exactly one
    /// kind, with `document` as the catch-all.
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.starts_with("image/") {
            FileKind::Image
        } else if content_type.starts_with("video/") {
            FileKind::Video
        } else {
            FileKind::Document
        }
    }

    /// Provider-side payload field that carries the attachment URL.
    pub fn payload_key(self) -> &'static str {
        match self {
            FileKind::Image => "imageUrl",
            FileKind::Video => "videoUrl",
            FileKind::Document => "documentUrl",
        }
    }
}

/// A media attachment. The kind and the URL travel together, so a kind can
/// never exist without a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "url", rename_all = "lowercase")]
pub enum Attachment {
    Image(String),
    Video(String),
    Document(String),
}

impl Attachment {
    /// Build an attachment from a URL and an already-classified kind.
    pub fn new(url: impl Into<String>, kind: FileKind) -> Self {
        let url = url.into();
        match kind {
            FileKind::Image => Attachment::Image(url),
            FileKind::Video => Attachment::Video(url),
            FileKind::Document => Attachment::Document(url),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Attachment::Image(u) | Attachment::Video(u) | Attachment::Document(u) => u,
        }
    }

    pub fn kind(&self) -> FileKind {
        match self {
            Attachment::Image(_) => FileKind::Image,
            Attachment::Video(_) => FileKind::Video,
            Attachment::Document(_) => FileKind::Document,
        }
    }
}

// ── Message records ───────────────────────────────────────────────────────────

/// Lifecycle status of a tracked submission.
///
/// A record is created `pending` and transitions exactly once to `sent` or
/// `failed`; it never transitions again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Pending,
    Sent,
    Failed,
}

/// One tracked message submission in the local history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub id: Uuid,
    /// Recipient phone number; never empty once a record exists.
    pub to: String,
    /// Body text; may be empty when an attachment is present.
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    pub status: MessageStatus,
    /// Unix milliseconds at submission time.
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ── Relay wire types ──────────────────────────────────────────────────────────

/// JSON envelope accepted by the relay's send route.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<FileKind>,
    /// `"verify"` selects credential verification instead of a send.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

/// Normalized superset of the provider's response shape, as relayed back to
/// the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Response of the relay's credential-verification mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn classification_is_total_and_deterministic() {
        assert_eq!(FileKind::from_content_type("image/png"), FileKind::Image);
        assert_eq!(FileKind::from_content_type("video/mp4"), FileKind::Video);
        assert_eq!(
            FileKind::from_content_type("application/pdf"),
            FileKind::Document
        );
        // Catch-all: anything unrecognized is a document.
        assert_eq!(FileKind::from_content_type(""), FileKind::Document);
        assert_eq!(
            FileKind::from_content_type("image/png"),
            FileKind::from_content_type("image/png")
        );
    }

    #[test]
    fn payload_keys_match_provider_fields() {
        assert_eq!(FileKind::Image.payload_key(), "imageUrl");
        assert_eq!(FileKind::Video.payload_key(), "videoUrl");
        assert_eq!(FileKind::Document.payload_key(), "documentUrl");
    }

    #[test]
    fn attachment_carries_kind_and_url_together() {
        let a = Attachment::new("https://cdn.example/x.mp4", FileKind::Video);
        assert_eq!(a.kind(), FileKind::Video);
        assert_eq!(a.url(), "https://cdn.example/x.mp4");

        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["kind"], "video");
        assert_eq!(json["url"], "https://cdn.example/x.mp4");
    }

    #[test]
    fn send_request_uses_camel_case_wire_names() {
        let req = SendRequest {
            api_key: Some("k".into()),
            to: Some("+15551234567".into()),
            text: None,
            file_url: Some("https://cdn.example/a.pdf".into()),
            file_type: Some(FileKind::Document),
            action: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["apiKey"], "k");
        assert_eq!(json["fileUrl"], "https://cdn.example/a.pdf");
        assert_eq!(json["fileType"], "document");
        assert!(json.get("text").is_none());
    }

    #[test]
    fn verify_response_uses_is_valid_wire_name() {
        let v = VerifyResponse {
            is_valid: true,
            message: Some("API key is valid".into()),
        };
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["isValid"], true);
    }

    #[test]
    fn record_round_trips_through_json() {
        let rec = MessageRecord {
            id: Uuid::new_v4(),
            to: "+15551234567".into(),
            text: "Hello".into(),
            attachment: Some(Attachment::new("https://cdn.example/p.png", FileKind::Image)),
            status: MessageStatus::Pending,
            timestamp: chrono::Utc::now().timestamp_millis(),
            error: None,
        };
        let json = serde_json::to_string(&rec).unwrap();
        let back: MessageRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }
}
