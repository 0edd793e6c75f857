//! # skill-relay-core
//!
//! Shared library for the skill debug relay containing the frame envelopes,
//! the JSON envelope codec, and the region-to-relay-host table.
//!
//! This crate is used by the `skill-relay` dispatcher.  It has zero
//! dependencies on async runtimes, network sockets, or the process
//! environment, so everything in it can be tested as plain functions.
//!
//! # Architecture overview (for beginners)
//!
//! A voice-assistant skill normally runs inside a serverless host.  During
//! development the assistant service can instead forward live traffic to a
//! developer's machine over a WebSocket "debug relay".  Each request arrives
//! wrapped in a small JSON envelope whose `requestPayload` field is itself a
//! JSON document serialized into a string.
//!
//! This crate defines:
//!
//! - **`protocol`** – The two envelope shapes on the wire
//!   ([`SkillRequestFrame`] and [`SkillResponseFrame`]) and the pure codec
//!   functions that move between bytes, envelopes, and the embedded payload.
//!
//! - **`domain`** – The relay region table: which relay host serves which
//!   region code.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `skill_relay_core::SkillRequestFrame` instead of the full module path.
pub use domain::region::{resolve, Region, RegionError, RegionTable};
pub use protocol::codec::{
    decode_inner_request, decode_request, encode_inner_response, encode_response,
    encode_response_text, DecodeError, EncodeError,
};
pub use protocol::frames::{ResponseOutcome, SkillRequestFrame, SkillResponseFrame};
