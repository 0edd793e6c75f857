//! skill-relay library crate.
//!
//! A dual-mode dispatcher for a voice-assistant skill backend.  In production
//! the skill handler is handed to a serverless host runtime; in development
//! the same handler is served over a persistent WebSocket to the assistant's
//! debug relay, so live traffic reaches code running on a developer machine.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Assistant service ── debug relay (wss://, JSON envelopes)
//!         ↕
//! [skill-relay]
//!   ├── domain/            Pure types: RelayOptions, DebugConfig, SessionState
//!   ├── application/       SkillHandler seam, request → response pipeline
//!   ├── infrastructure/
//!   │     ├── relay_conn/   WebSocket transport (tokio-tungstenite)
//!   │     ├── session/      Debug session state machine
//!   │     └── host_runtime/ Production host runtime adapter
//!   └── dispatcher         Mode selection
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `skill-relay-core` only.
//! - `infrastructure` depends on all other layers plus `tokio` and `tungstenite`.
//!
//! # Example
//!
//! ```rust,no_run
//! use skill_relay::application::{handler_fn, HandlerContext};
//! use skill_relay::domain::RelayOptions;
//! use skill_relay::infrastructure::StdioHostRuntime;
//! use skill_relay::{dispatch, RegionTable};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), skill_relay::DispatchError> {
//! let handler = handler_fn(|_ctx: &HandlerContext, request: serde_json::Value| Ok(request));
//! let options = RelayOptions {
//!     debug_server: true,
//!     access_token: "Atza|...".to_string(),
//!     skill_id: "amzn1.ask.skill.0000".to_string(),
//!     ..RelayOptions::default()
//! };
//! let mut host = StdioHostRuntime::stdio();
//! dispatch(&options, &RegionTable::standard(), &handler, &mut host, CancellationToken::new()).await?;
//! # Ok(())
//! # }
//! ```

/// Domain layer: configuration and session state types (no I/O).
pub mod domain;

/// Application layer: the handler seam and the per-request pipeline.
pub mod application;

/// Infrastructure layer: relay WebSocket, debug session, host runtime.
pub mod infrastructure;

/// Mode selection between debug relay and host runtime.
pub mod dispatcher;

pub use dispatcher::{dispatch, DispatchError, DispatchOutcome};
pub use skill_relay_core::{Region, RegionTable};
