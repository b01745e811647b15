//! Types for Lumen documents API requests and responses.

use crate::error::{ClientError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backend address used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Configuration for connecting to a Lumen documents backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend (e.g., "http://localhost:3000")
    pub url: String,
    /// Per-request timeout. `None` lets requests run to completion.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a new config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: None,
        }
    }

    /// Set a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

// =============================================================================
// Document Types
// =============================================================================

/// Processing state of a document on the backend.
///
/// Every document the backend lists has already been embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Embedded,
}

/// Client-side projection of a backend document record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    /// Always 0; the backend does not store sizes.
    pub size: u64,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub status: DocumentStatus,
}

// =============================================================================
// Upload Types
// =============================================================================

/// A file queued for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// File name, also sent as the document title
    pub name: String,
    pub contents: Vec<u8>,
    pub mime_type: &'static str,
}

impl UploadFile {
    /// Build an upload from in-memory bytes, guessing the MIME type from the name.
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        let name = name.into();
        let mime_type = crate::upload::mime_type_for_name(&name);
        Self {
            name,
            contents: contents.into(),
            mime_type,
        }
    }
}

// =============================================================================
// Wire Types
// =============================================================================

/// Raw records as the backend sends them. Every field is optional so that
/// decoding never depends on field presence.
pub(crate) mod wire {
    use serde::Deserialize;

    /// Envelope shared by the upload and delete endpoints.
    #[derive(Debug, Default, Deserialize)]
    pub struct ApiResponse {
        #[serde(default)]
        pub success: bool,
        pub error: Option<String>,
        pub message: Option<String>,
    }

    impl ApiResponse {
        /// Server-supplied failure reason, `error` first, then `message`.
        pub fn reason(self) -> Option<String> {
            non_empty(self.error).or_else(|| non_empty(self.message))
        }
    }

    /// Response of `GET /api/documents/list`.
    #[derive(Debug, Default, Deserialize)]
    pub struct ListResponse {
        #[serde(default)]
        pub success: bool,
        pub documents: Option<Vec<RawDocument>>,
        pub error: Option<String>,
        pub message: Option<String>,
    }

    /// Fields are kept as raw JSON so that one record with an odd field
    /// type cannot fail the whole listing.
    #[derive(Debug, Deserialize)]
    pub struct RawDocument {
        #[serde(default)]
        pub id: serde_json::Value,
        #[serde(default)]
        pub metadata: serde_json::Value,
        #[serde(default)]
        pub created_at: serde_json::Value,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct RawMetadata {
        #[serde(default)]
        pub filename: serde_json::Value,
        #[serde(default)]
        pub title: serde_json::Value,
        #[serde(default)]
        pub file_type: serde_json::Value,
        #[serde(default)]
        pub upload_date: serde_json::Value,
    }

    impl RawDocument {
        /// Metadata object, or all-absent metadata when it is not an object.
        pub fn metadata(&self) -> RawMetadata {
            match &self.metadata {
                serde_json::Value::Object(_) => {
                    serde_json::from_value(self.metadata.clone()).unwrap_or_default()
                }
                _ => RawMetadata::default(),
            }
        }
    }

    /// Empty strings count as absent.
    pub fn non_empty(value: Option<String>) -> Option<String> {
        value.filter(|s| !s.is_empty())
    }

    /// A non-empty string field; any other JSON type counts as absent.
    pub fn text(value: &serde_json::Value) -> Option<String> {
        match value {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}

impl TryFrom<wire::RawDocument> for DocumentSummary {
    type Error = ClientError;

    fn try_from(raw: wire::RawDocument) -> Result<Self> {
        let id = stringify_id(&raw.id)?;
        let metadata = raw.metadata();

        let name = wire::text(&metadata.filename)
            .or_else(|| wire::text(&metadata.title))
            .unwrap_or_else(|| format!("Document {}", id));

        let doc_type = wire::text(&metadata.file_type).unwrap_or_else(|| "unknown".to_string());

        let uploaded_at =
            timestamp_value(&raw.created_at).or_else(|| timestamp_value(&metadata.upload_date));

        Ok(Self {
            id,
            name,
            doc_type,
            size: 0,
            uploaded_at,
            status: DocumentStatus::Embedded,
        })
    }
}

/// Render a backend id as an opaque string.
fn stringify_id(id: &serde_json::Value) -> Result<String> {
    match id {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        other => Err(ClientError::ParseError(format!(
            "Document id must be a string or number, got {}",
            other
        ))),
    }
}

/// Read a timestamp field: a date string, or epoch milliseconds.
fn timestamp_value(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => parse_timestamp(s),
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|ms| ms.trunc() as i64))
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

/// Parse the timestamp forms the backend is known to emit.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
