//! JSON codec for relay envelopes and their embedded payloads.
//!
//! Two layers of JSON are involved in every exchange:
//!
//! ```text
//! WebSocket frame bytes
//!   └─ envelope JSON       decode_request / encode_response
//!        └─ payload string decode_inner_request / encode_inner_response
//! ```
//!
//! All functions here are pure.  Failures come back as [`DecodeError`] or
//! [`EncodeError`]; deciding whether a failure ends the session or becomes a
//! failure response is the caller's job.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::protocol::frames::{SkillRequestFrame, SkillResponseFrame};

/// Errors produced while decoding inbound data.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The frame bytes are not a JSON request envelope (bad JSON, wrong
    /// shape, or a required field is missing).
    #[error("malformed request frame: {source}")]
    Frame {
        #[source]
        source: serde_json::Error,
    },

    /// The envelope parsed, but its `requestPayload` string is not valid JSON
    /// for the skill's request type.
    #[error("malformed request payload: {source}")]
    Payload {
        #[source]
        source: serde_json::Error,
    },
}

/// The skill's response could not be serialized into a payload string.
#[derive(Debug, Error)]
#[error("response payload could not be serialized: {source}")]
pub struct EncodeError {
    #[source]
    source: serde_json::Error,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Decodes one inbound WebSocket frame into a [`SkillRequestFrame`].
///
/// # Errors
///
/// Returns [`DecodeError::Frame`] if `bytes` is not a JSON object with the
/// four required envelope fields.
///
/// # Examples
///
/// ```rust
/// use skill_relay_core::decode_request;
///
/// let bytes = br#"{"version":"1.0","type":"req","requestId":"abc","requestPayload":"{}"}"#;
/// let frame = decode_request(bytes).unwrap();
/// assert_eq!(frame.request_id, "abc");
/// ```
pub fn decode_request(bytes: &[u8]) -> Result<SkillRequestFrame, DecodeError> {
    serde_json::from_slice(bytes).map_err(|source| DecodeError::Frame { source })
}

/// Decodes the JSON embedded in a request envelope's `requestPayload`.
///
/// # Errors
///
/// Returns [`DecodeError::Payload`] if the string is not valid JSON for `T`.
pub fn decode_inner_request<T: DeserializeOwned>(payload: &str) -> Result<T, DecodeError> {
    serde_json::from_str(payload).map_err(|source| DecodeError::Payload { source })
}

/// Serializes a skill response into the string carried in `responsePayload`.
///
/// # Errors
///
/// Returns [`EncodeError`] if `response` cannot be represented as JSON, for
/// example a map whose keys are not strings.
pub fn encode_inner_response<T: Serialize + ?Sized>(response: &T) -> Result<String, EncodeError> {
    serde_json::to_string(response).map_err(|source| EncodeError { source })
}

/// Encodes a response envelope as JSON bytes.
///
/// This never fails: every field of [`SkillResponseFrame`] is a plain string
/// or a unit enum variant.
pub fn encode_response(frame: &SkillResponseFrame) -> Vec<u8> {
    encode_response_text(frame).into_bytes()
}

/// Encodes a response envelope as a JSON string, ready for a text frame.
pub fn encode_response_text(frame: &SkillResponseFrame) -> String {
    // Serializing a struct of strings and unit variants cannot fail.
    serde_json::to_string(frame).expect("response envelope is always serializable")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
