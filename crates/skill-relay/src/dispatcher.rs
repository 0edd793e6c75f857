//! Mode selection: debug relay session or serverless host runtime.
//!
//! ```text
//! dispatch(options)
//!   ├── options.debug_server  → DebugConfig::resolve → DebugSession::connect → run
//!   └── otherwise             → host.serve(handler)
//! ```
//!
//! The dispatcher holds no business logic.  The same handler value serves
//! both modes.

use skill_relay_core::RegionTable;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::application::SkillHandler;
use crate::domain::{ConfigError, DebugConfig, RelayOptions, SessionSummary};
use crate::infrastructure::{DebugSession, HostRuntime, SessionError};

/// How a dispatch finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A debug session ran and was closed after cancellation.
    Debug(SessionSummary),
    /// The host runtime returned.
    Hosted,
}

/// Errors that end a dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Debug mode was requested with unusable settings.  Nothing was dialed.
    #[error("invalid debug configuration: {0}")]
    Config(#[from] ConfigError),

    /// The debug session could not start or failed while running.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The host runtime failed.
    #[error(transparent)]
    Host(anyhow::Error),
}

/// Runs `handler` in the mode `options` selects.
///
/// In debug mode exactly one session is opened; there is no reconnect.  In
/// production mode `host` is served until it returns.
///
/// # Errors
///
/// See [`DispatchError`].
pub async fn dispatch<H, R>(
    options: &RelayOptions,
    regions: &RegionTable,
    handler: &H,
    host: &mut R,
    cancel: CancellationToken,
) -> Result<DispatchOutcome, DispatchError>
where
    H: SkillHandler + ?Sized,
    R: HostRuntime,
{
    if !options.debug_server {
        info!("production mode: handing the skill to the host runtime");
        host.serve(handler, cancel).await.map_err(DispatchError::Host)?;
        return Ok(DispatchOutcome::Hosted);
    }

    let config = DebugConfig::resolve(options, regions)?;
    info!(skill_id = %config.skill_id, "debug mode: connecting to the skill debug relay");

    let mut session = DebugSession::connect(&config, cancel).await?;
    let summary = session.run(handler).await?;
    Ok(DispatchOutcome::Debug(summary))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
