//! JSON envelope types exchanged with the debug relay.
//!
//! Every WebSocket text frame on the relay connection carries exactly one
//! envelope.  The relay sends [`SkillRequestFrame`]s; the skill answers each
//! one with a [`SkillResponseFrame`].
//!
//! # Message flow
//!
//! ```text
//! Relay → Skill:  {"version","type","requestId","requestPayload"}
//! Skill → Relay:  {"version","type","originalRequestId","responsePayload"}
//! ```
//!
//! The `requestPayload` and `responsePayload` fields are *strings* that
//! themselves contain serialized JSON: the assistant's request and the skill's
//! response.  The envelope layer never looks inside them; see
//! [`crate::protocol::codec`] for the functions that do.
//!
//! # Correlation
//!
//! A response is matched to its request by `originalRequestId`, and it must
//! speak the same protocol `version` as the request.  The intended constructors
//! are [`SkillResponseFrame::success`] and [`SkillResponseFrame::failure`],
//! which copy those two fields from the request.  The fields stay public for
//! decoding and tests, so a frame built by hand carries no such guarantee.

use serde::{Deserialize, Serialize};

// ── Relay → Skill ─────────────────────────────────────────────────────────────

/// One request forwarded by the relay.
///
/// # Serde representation
///
/// ```json
/// {"version":"1.0","type":"SkillRequestMessage","requestId":"abc","requestPayload":"{...}"}
/// ```
///
/// All four fields are required.  Unknown extra fields are ignored so that a
/// newer relay can add fields without breaking older skills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRequestFrame {
    /// Envelope protocol version; echoed back in the response.
    pub version: String,

    /// Relay message type.  Informational; the bridge answers every request
    /// frame the same way regardless of its type.
    #[serde(rename = "type")]
    pub frame_type: String,

    /// Correlation id; echoed back as `originalRequestId`.
    pub request_id: String,

    /// The assistant's request, serialized as a JSON string.
    pub request_payload: String,
}

impl SkillRequestFrame {
    /// Builds a request frame.  Mostly useful for tests and local relays.
    pub fn new(
        version: impl Into<String>,
        frame_type: impl Into<String>,
        request_id: impl Into<String>,
        request_payload: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            frame_type: frame_type.into(),
            request_id: request_id.into(),
            request_payload: request_payload.into(),
        }
    }
}

// ── Skill → Relay ─────────────────────────────────────────────────────────────

/// Whether the skill produced a usable response for a request.
///
/// Serialized into the response envelope's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseOutcome {
    /// The handler succeeded and its response was serialized.
    #[serde(rename = "SkillResponseSuccessMessage")]
    Success,
    /// The handler failed, or its response could not be serialized.
    #[serde(rename = "SkillResponseFailureMessage")]
    Failure,
}

impl ResponseOutcome {
    /// Returns the wire name used in the envelope's `type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseOutcome::Success => "SkillResponseSuccessMessage",
            ResponseOutcome::Failure => "SkillResponseFailureMessage",
        }
    }
}

/// One response sent back to the relay.
///
/// # Serde representation
///
/// ```json
/// {"version":"1.0","type":"SkillResponseSuccessMessage","originalRequestId":"abc","responsePayload":"{...}"}
/// {"version":"1.0","type":"SkillResponseFailureMessage","originalRequestId":"abc","responsePayload":""}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillResponseFrame {
    /// Protocol version copied from the request.
    pub version: String,

    /// Success or failure.
    #[serde(rename = "type")]
    pub outcome: ResponseOutcome,

    /// Correlation id copied from the request's `requestId`.
    pub original_request_id: String,

    /// The skill's response serialized as a JSON string; empty on failure.
    pub response_payload: String,
}

impl SkillResponseFrame {
    /// Builds a success response for `request` carrying `response_payload`.
    pub fn success(request: &SkillRequestFrame, response_payload: String) -> Self {
        Self {
            version: request.version.clone(),
            outcome: ResponseOutcome::Success,
            original_request_id: request.request_id.clone(),
            response_payload,
        }
    }

    /// Builds a failure response for `request` with an empty payload.
    pub fn failure(request: &SkillRequestFrame) -> Self {
        Self {
            version: request.version.clone(),
            outcome: ResponseOutcome::Failure,
            original_request_id: request.request_id.clone(),
            response_payload: String::new(),
        }
    }

    /// Returns `true` for a success response.
    pub fn is_success(&self) -> bool {
        self.outcome == ResponseOutcome::Success
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
