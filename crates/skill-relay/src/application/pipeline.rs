//! Turns one relay request frame into its response frame.
//!
//! ```text
//! SkillRequestFrame
//!   → decode requestPayload into H::Request
//!   → handler.handle(ctx, request)
//!   → encode H::Response into responsePayload
//!   → SkillResponseFrame (Success or Failure)
//! ```
//!
//! Everything that can go wrong inside this pipeline is answered in-band with
//! a failure frame so the session can carry on with the next request.  The
//! single exception is an undecodable payload under
//! [`PayloadPolicy::Strict`], which is handed back to the caller as an error.
//!
//! This module performs no I/O; the session owns the transport.

use skill_relay_core::{
    decode_inner_request, encode_inner_response, DecodeError, SkillRequestFrame,
    SkillResponseFrame,
};
use tracing::{debug, warn};

use crate::application::handler::{HandlerContext, SkillHandler};
use crate::domain::PayloadPolicy;

/// Produces the response frame for `request`.
///
/// The returned frame always carries `request.version` and
/// `request.request_id`.
///
/// # Errors
///
/// Returns [`DecodeError::Payload`] only when the payload does not decode and
/// `policy` is [`PayloadPolicy::Strict`].
pub async fn answer_request<H>(
    handler: &H,
    ctx: &HandlerContext,
    request: &SkillRequestFrame,
    policy: PayloadPolicy,
) -> Result<SkillResponseFrame, DecodeError>
where
    H: SkillHandler + ?Sized,
{
    let domain_request: H::Request = match decode_inner_request(&request.request_payload) {
        Ok(decoded) => decoded,
        Err(e) if policy == PayloadPolicy::Strict => return Err(e),
        Err(e) => {
            warn!(request_id = %request.request_id, "failed to decode request payload: {e}");
            return Ok(SkillResponseFrame::failure(request));
        }
    };

    let domain_response = match handler.handle(ctx, domain_request).await {
        Ok(response) => response,
        Err(e) => {
            warn!(request_id = %request.request_id, "failed to handle skill request: {e:#}");
            return Ok(SkillResponseFrame::failure(request));
        }
    };

    match encode_inner_response(&domain_response) {
        Ok(payload) => {
            debug!(
                request_id = %request.request_id,
                bytes = payload.len(),
                "skill response encoded"
            );
            Ok(SkillResponseFrame::success(request, payload))
        }
        Err(e) => {
            warn!(request_id = %request.request_id, "failed to marshal skill response: {e}");
            Ok(SkillResponseFrame::failure(request))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
