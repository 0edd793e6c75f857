//! Lifecycle states of a debug relay session.
//!
//! ```text
//! Disconnected → Connecting → Authenticated → Looping → Closing → Closed
//!       └────────────┴──────────────┴────────────┴──────────→ Failed
//! ```
//!
//! `Closed` and `Failed` are terminal.  A session that reaches either one has
//! already released its transport.

use std::fmt;

/// Where a debug session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No transport yet.
    Disconnected,
    /// Dialing the relay and performing the WebSocket upgrade.
    Connecting,
    /// The relay accepted the upgrade and the access token.
    Authenticated,
    /// Reading, dispatching, and answering request frames.
    Looping,
    /// Cancellation was requested; the close handshake is in progress.
    Closing,
    /// The session ended normally.
    Closed,
    /// The session ended because of an unrecoverable error.
    Failed,
}

impl SessionState {
    /// Returns `true` for `Closed` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Closed | SessionState::Failed)
    }

    /// Returns `true` if the state machine allows moving from `self` to `next`.
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;

        if next == Failed {
            return !self.is_terminal();
        }
        matches!(
            (self, next),
            (Disconnected, Connecting)
                | (Connecting, Authenticated)
                | (Authenticated, Looping)
                | (Looping, Closing)
                | (Closing, Closed)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Connecting => "connecting",
            SessionState::Authenticated => "authenticated",
            SessionState::Looping => "looping",
            SessionState::Closing => "closing",
            SessionState::Closed => "closed",
            SessionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Counters describing what a session did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// Request frames read and decoded.
    pub frames_received: u64,
    /// Success responses written.
    pub successes: u64,
    /// Failure responses written.
    pub failures: u64,
    /// State the session was in when the summary was taken.
    pub state: SessionState,
}

impl SessionSummary {
    /// Total responses written to the relay.
    pub fn responses_sent(&self) -> u64 {
        self.successes + self.failures
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
