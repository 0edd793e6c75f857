//! One debug relay session: connect, then read → dispatch → write until
//! cancelled or broken.
//!
//! # Lifecycle
//!
//! ```text
//! connect()  Disconnected → Connecting → Authenticated
//! run()      Authenticated → Looping ─┬─ cancelled ─→ Closing → Closed   (Ok)
//!                                     └─ fatal error ────────→ Failed   (Err)
//! ```
//!
//! Frames are processed strictly one at a time: the next read starts only
//! after the previous response has been written.  The session's
//! [`CancellationToken`] is raced against every read, every handler call and
//! every write, so cancellation takes effect promptly even while the relay is
//! idle.
//!
//! The transport is closed exactly once on the way out of [`DebugSession::run`]:
//! with status 1000 after cancellation, or 1011 after a fatal error.  A failure
//! of that close is logged and otherwise ignored; the error that ended the
//! session is what gets reported.
//!
//! # For beginners: why `biased;` in `select!`?
//!
//! `tokio::select!` normally picks a random ready branch.  With `biased;` it
//! checks branches top to bottom, so when the token is already cancelled the
//! session stops before starting another read or write.

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use skill_relay_core::{decode_request, encode_response_text, DecodeError, SkillResponseFrame};

use crate::application::{answer_request, HandlerContext, SkillHandler};
use crate::domain::{DebugConfig, PayloadPolicy, SessionState, SessionSummary};
use crate::infrastructure::relay_conn::{
    CloseStatus, RelayTransport, TransportError, WsRelayTransport,
};

/// Errors that end a debug session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The cancellation token fired before the session was established.
    #[error("session cancelled")]
    Cancelled,

    /// Dialing or upgrading the relay connection failed.
    #[error("failed to connect to debug relay: {0}")]
    Connect(#[source] TransportError),

    /// The relay closed the connection while the session was running.
    #[error("debug relay closed the connection: {reason}")]
    RemoteClosed { reason: String },

    /// Reading from the relay failed.
    #[error("failed to read from debug relay: {0}")]
    Read(#[source] TransportError),

    /// A frame arrived that is not a request envelope.
    #[error("received malformed request frame: {0}")]
    MalformedFrame(#[source] DecodeError),

    /// A request payload did not decode under the strict payload policy.
    #[error("received undecodable request payload: {0}")]
    MalformedPayload(#[source] DecodeError),

    /// Writing a response to the relay failed.
    #[error("failed to write to debug relay: {0}")]
    Write(#[source] TransportError),

    /// `run` was called on a session that can no longer run.
    #[error("session cannot run from state {0}")]
    Finished(SessionState),
}

/// A single connection to the debug relay, processed sequentially.
pub struct DebugSession<T> {
    id: Uuid,
    transport: T,
    state: SessionState,
    cancel: CancellationToken,
    payload_policy: PayloadPolicy,
    frames_received: u64,
    successes: u64,
    failures: u64,
}

impl DebugSession<WsRelayTransport> {
    /// Dials the relay described by `config` and authenticates.
    ///
    /// Cancelling `cancel` while the handshake is in flight abandons it.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Connect`] if the relay cannot be reached or rejects
    ///   the upgrade.  There is no retry.
    /// - [`SessionError::Cancelled`] if `cancel` fires first.
    pub async fn connect(
        config: &DebugConfig,
        cancel: CancellationToken,
    ) -> Result<Self, SessionError> {
        let id = Uuid::new_v4();
        info!(
            session_id = %id,
            skill_id = %config.skill_id,
            "Starting debug session: {}",
            config.endpoint
        );
        debug!(session_id = %id, "session state: {} -> {}", SessionState::Disconnected, SessionState::Connecting);

        let transport = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(session_id = %id, "cancelled while connecting to debug relay");
                return Err(SessionError::Cancelled);
            }
            result = WsRelayTransport::connect(config) => match result {
                Ok(transport) => transport,
                Err(e) => {
                    debug!(session_id = %id, "session state: {} -> {}", SessionState::Connecting, SessionState::Failed);
                    return Err(SessionError::Connect(e));
                }
            },
        };

        debug!(session_id = %id, "session state: {} -> {}", SessionState::Connecting, SessionState::Authenticated);
        info!(session_id = %id, skill_id = %config.skill_id, "Debug session successfully started");
        info!(session_id = %id, "This session is authorized for 1 hour");

        let mut session = Self::from_transport(transport, cancel, config.payload_policy);
        session.id = id;
        Ok(session)
    }
}

impl<T: RelayTransport> DebugSession<T> {
    /// Wraps an already-authenticated transport.
    pub fn from_transport(transport: T, cancel: CancellationToken, payload_policy: PayloadPolicy) -> Self {
        Self {
            id: Uuid::new_v4(),
            transport,
            state: SessionState::Authenticated,
            cancel,
            payload_policy,
            frames_received: 0,
            successes: 0,
            failures: 0,
        }
    }

    /// Unique id used to correlate this session's log lines.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Counters so far, plus the current state.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            frames_received: self.frames_received,
            successes: self.successes,
            failures: self.failures,
            state: self.state,
        }
    }

    /// Serves requests with `handler` until the session is cancelled or fails.
    ///
    /// Returns the summary after a cancellation-driven close.  Can only be
    /// called once; a second call returns [`SessionError::Finished`].
    ///
    /// # Errors
    ///
    /// Any fatal transport or protocol error.  The session is `Failed` and the
    /// transport has been closed by the time the error is returned.
    pub async fn run<H>(&mut self, handler: &H) -> Result<SessionSummary, SessionError>
    where
        H: SkillHandler + ?Sized,
    {
        if self.state != SessionState::Authenticated {
            return Err(SessionError::Finished(self.state));
        }
        self.transition(SessionState::Looping);

        match self.serve(handler).await {
            SessionError::Cancelled => {
                self.transition(SessionState::Closing);
                if let Err(e) = self.transport.close(CloseStatus::Normal).await {
                    debug!(session_id = %self.id, "close handshake failed: {e}");
                }
                self.transition(SessionState::Closed);

                let summary = self.summary();
                info!(
                    session_id = %self.id,
                    frames = summary.frames_received,
                    successes = summary.successes,
                    failures = summary.failures,
                    "debug session closed"
                );
                Ok(summary)
            }
            fatal => {
                error!(session_id = %self.id, "debug session failed: {fatal}");
                self.transition(SessionState::Failed);
                if let Err(e) = self.transport.close(CloseStatus::Failure).await {
                    debug!(session_id = %self.id, "close after failure did not complete: {e}");
                }
                Err(fatal)
            }
        }
    }

    /// The read → dispatch → write loop.  Only returns to report why it
    /// stopped; [`SessionError::Cancelled`] means a requested shutdown.
    async fn serve<H>(&mut self, handler: &H) -> SessionError
    where
        H: SkillHandler + ?Sized,
    {
        loop {
            let bytes = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return SessionError::Cancelled,
                read = self.transport.read_frame() => match read {
                    Ok(bytes) => bytes,
                    Err(TransportError::Closed { reason }) => {
                        return SessionError::RemoteClosed { reason }
                    }
                    Err(e) => return SessionError::Read(e),
                },
            };

            let request = match decode_request(&bytes) {
                Ok(request) => request,
                Err(e) => return SessionError::MalformedFrame(e),
            };
            self.frames_received += 1;
            info!(
                session_id = %self.id,
                request_id = %request.request_id,
                frame_type = %request.frame_type,
                "Received request frame"
            );

            let ctx = HandlerContext::new(self.cancel.clone(), request.request_id.clone());
            let response = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return SessionError::Cancelled,
                answered = answer_request(handler, &ctx, &request, self.payload_policy) => {
                    match answered {
                        Ok(response) => response,
                        Err(e) => return SessionError::MalformedPayload(e),
                    }
                }
            };

            if let Err(e) = self.send(response).await {
                return e;
            }
        }
    }

    async fn send(&mut self, response: SkillResponseFrame) -> Result<(), SessionError> {
        let outcome = response.outcome;
        let request_id = response.original_request_id.clone();
        let text = encode_response_text(&response);

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(SessionError::Cancelled),
            written = self.transport.write_frame(text) => written.map_err(SessionError::Write)?,
        }

        if response.is_success() {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
        info!(
            session_id = %self.id,
            request_id = %request_id,
            outcome = outcome.as_str(),
            "Sent response frame"
        );
        Ok(())
    }

    fn transition(&mut self, next: SessionState) {
        if !self.state.can_transition_to(next) {
            warn!(session_id = %self.id, "unexpected session state change: {} -> {next}", self.state);
        }
        debug!(session_id = %self.id, "session state: {} -> {next}", self.state);
        self.state = next;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
