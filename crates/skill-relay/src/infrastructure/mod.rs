//! Infrastructure layer for skill-relay.
//!
//! The infrastructure layer handles all I/O: the WebSocket connection to the
//! debug relay in development mode and the invocation stream of the function
//! host in production mode.
//!
//! # Responsibilities
//!
//! - Building the relay handshake request and dialing the relay
//! - Reading and writing relay frames over the WebSocket
//! - Driving the debug session state machine and its cancellation
//! - Serving host-runtime invocations over a byte stream
//!
//! # What does NOT belong here?
//!
//! - Envelope types and the JSON codec (that is `skill-relay-core`)
//! - Turning a request into a response (that is the application layer)
//! - Configuration parsing (that is done in `main.rs`)

pub mod host_runtime;
pub mod relay_conn;
pub mod session;

// Re-export the primary entry points so callers can use them concisely.
pub use host_runtime::{HostRuntime, StdioHostRuntime, StreamHostRuntime};
pub use relay_conn::{handshake_request, CloseStatus, RelayTransport, TransportError, WsRelayTransport};
pub use session::{DebugSession, SessionError};
