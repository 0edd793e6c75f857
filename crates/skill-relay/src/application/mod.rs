//! Application layer for skill-relay.
//!
//! The application layer knows *what* to do with a request, but delegates
//! *how* bytes move to the infrastructure layer.
//!
//! # Responsibilities
//!
//! - Defining the [`SkillHandler`] seam the skill's business logic plugs into
//! - Turning one request frame into one response frame ([`answer_request`])
//!
//! # What does NOT belong here?
//!
//! - Opening sockets or reading stdin (that is infrastructure)
//! - Deciding whether an error ends the session (that is the session loop)
//! - Parsing command-line flags (that is done in `main.rs`)

pub mod handler;
pub mod pipeline;

// Re-export so callers can write `application::SkillHandler`.
pub use handler::{handler_fn, FnHandler, HandlerContext, HandlerError, SkillHandler};
pub use pipeline::answer_request;
