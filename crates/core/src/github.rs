//! GitHub contents API payloads and response classification
//!
//! Pure half of the publisher: building the conditional write request,
//! the transport encoding, and turning HTTP statuses into per-file
//! outcomes. The requests themselves are sent by the shell.

use base64::Engine;
use serde::{Deserialize, Serialize};

/// Repository directory every generated file is published under.
pub const PUBLISH_PREFIX: &str = "generated";

// =============================================================================
// API Types
// =============================================================================

/// The slice of a `GET .../contents/{path}` response the publisher needs:
/// the revision token to echo back on update.
#[derive(Debug, Deserialize, Clone)]
pub struct ContentsFileResponse {
    pub sha: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// Body of a `PUT .../contents/{path}` request. `sha` is present only when
/// updating; the API rejects the write if it no longer matches the remote
/// file.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct UpsertRequest {
    pub message: String,
    pub content: String,
    pub branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

// =============================================================================
// Outcome Types
// =============================================================================

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum PublishStatus {
    Created,
    Updated,
    Failed,
}

/// Result of publishing one file. Failures carry a detail string; they are
/// recorded, not raised.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub filename: String,
    pub status: PublishStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

// =============================================================================
// Pure Transformation Functions
// =============================================================================

/// Repository path a generated file is published at.
pub fn publish_path(filename: &str) -> String {
    format!("{PUBLISH_PREFIX}/{filename}")
}

/// Encode file content for the contents API transport.
pub fn encode_content(content: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(content.as_bytes())
}

/// Decode errors for [`decode_content`].
#[derive(thiserror::Error, Debug)]
pub enum ContentDecodeError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("decoded content is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Decode transport-encoded content back to text. The contents API returns
/// base64 wrapped with newlines, so ASCII whitespace is stripped first.
pub fn decode_content(encoded: &str) -> Result<String, ContentDecodeError> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = base64::engine::general_purpose::STANDARD.decode(compact.as_bytes())?;

    Ok(String::from_utf8(bytes)?)
}

/// Build the conditional write request for one file.
pub fn build_upsert_request(
    filename: &str,
    content: &str,
    branch: &str,
    sha: Option<String>,
) -> UpsertRequest {
    UpsertRequest {
        message: format!("Add {filename}"),
        content: encode_content(content),
        branch: branch.to_string(),
        sha,
    }
}

/// Classify the status of a conditional write.
///
/// `had_sha` records the write's intent: without a revision token the write
/// was a create, with one an update. 409 and 422 both signal a stale token
/// depending on API version, so both classify as a conflict.
pub fn classify_upsert_status(status: u16, had_sha: bool) -> (PublishStatus, Option<String>) {
    match status {
        200..=299 if had_sha => (PublishStatus::Updated, None),
        200..=299 => (PublishStatus::Created, None),
        409 | 422 => (PublishStatus::Failed, Some("conflict".to_string())),
        other => (PublishStatus::Failed, Some(format!("HTTP {other}"))),
    }
}

// =============================================================================
// Tests
// =============================================================================
