//! Domain layer for skill-relay.
//!
//! The domain layer contains pure types that have no dependencies on I/O,
//! networking, or async runtimes.  This makes them easy to test in isolation.
//!
//! # What belongs in the domain layer?
//!
//! - Configuration structures and their validation rules
//! - The debug session's state machine and summary
//!
//! # What does NOT belong here?
//!
//! - Any `tokio`, `TcpStream`, or `WebSocket` types
//! - Environment variable or command-line reading
//! - Anything that could block or fail due to external state

pub mod config;
pub mod session_state;

// Re-export the most commonly needed types at the domain module boundary
// so callers can write `domain::DebugConfig` instead of the longer path.
pub use config::{ConfigError, DebugConfig, PayloadPolicy, RelayEndpoint, RelayOptions};
pub use session_state::{SessionState, SessionSummary};
