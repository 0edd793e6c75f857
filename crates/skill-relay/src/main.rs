//! skill-relay entry point.
//!
//! Serves a skill handler either to the serverless host runtime (production)
//! or to the assistant's debug relay over a persistent WebSocket
//! (development).
//!
//! # Usage
//!
//! ```text
//! skill-relay [OPTIONS]
//!
//! Options:
//!   --debugServer            Connect to the debug relay instead of the host runtime
//!   --accessToken <TOKEN>    Developer access token for the relay
//!   --skillId     <ID>       Skill identifier
//!   --region      <CODE>     Relay region: NA, FE or EU [default: NA]
//!   --relay-url   <URL>      Full relay URL (overrides --region)
//!   --lenient-payloads       Answer an undecodable request payload with a failure
//!                            response instead of ending the session
//! ```
//!
//! Kebab-case spellings (`--debug-server`, `--access-token`, `--skill-id`) are
//! accepted as well.
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable                     | Default | Description                 |
//! |------------------------------|---------|-----------------------------|
//! | `SKILL_RELAY_DEBUG_SERVER`   | `false` | Debug mode switch           |
//! | `SKILL_RELAY_ACCESS_TOKEN`   | (none)  | Relay access token          |
//! | `SKILL_RELAY_SKILL_ID`       | (none)  | Skill identifier            |
//! | `SKILL_RELAY_REGION`         | `NA`    | Relay region code           |
//! | `SKILL_RELAY_URL`            | (none)  | Relay URL override          |
//! | `SKILL_RELAY_LENIENT_PAYLOADS`| `false`| Lenient payload policy      |
//!
//! # Exit status
//!
//! Ctrl+C closes the debug session with a normal close frame and exits with
//! status 0.  Configuration errors and fatal session errors are logged and
//! exit non-zero.

use anyhow::Context;
use clap::Parser;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use skill_relay::application::{handler_fn, HandlerContext, HandlerError};
use skill_relay::domain::{config::DEFAULT_REGION, PayloadPolicy, RelayOptions};
use skill_relay::infrastructure::{SessionError, StdioHostRuntime};
use skill_relay::{dispatch, DispatchError, DispatchOutcome, RegionTable};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Skill request dispatcher.
///
/// Serves the skill to the function host, or with `--debugServer` to the
/// assistant's debug relay.
#[derive(Debug, Parser)]
#[command(
    name = "skill-relay",
    about = "Dual-mode skill dispatcher: serverless host runtime or live debug relay",
    version
)]
struct Cli {
    /// Connect to the debug relay instead of serving the host runtime.
    #[arg(long = "debugServer", alias = "debug-server", env = "SKILL_RELAY_DEBUG_SERVER")]
    debug_server: bool,

    /// Developer access token, sent as the relay handshake's `authorization`
    /// header.
    #[arg(
        long = "accessToken",
        alias = "access-token",
        env = "SKILL_RELAY_ACCESS_TOKEN",
        hide_env_values = true
    )]
    access_token: Option<String>,

    /// Skill identifier, e.g. `amzn1.ask.skill.<uuid>`.
    #[arg(long = "skillId", alias = "skill-id", env = "SKILL_RELAY_SKILL_ID")]
    skill_id: Option<String>,

    /// Relay region code.
    #[arg(long, default_value = DEFAULT_REGION, env = "SKILL_RELAY_REGION")]
    region: String,

    /// Full `ws://` or `wss://` relay URL, replacing the one derived from
    /// `--region` and `--skillId`.
    ///
    /// Useful against a local relay.
    #[arg(long, env = "SKILL_RELAY_URL")]
    relay_url: Option<String>,

    /// Answer a request payload that does not decode with a failure response
    /// and keep the session open.  By default the session ends.
    #[arg(long, env = "SKILL_RELAY_LENIENT_PAYLOADS")]
    lenient_payloads: bool,
}

impl Cli {
    /// Converts the parsed CLI arguments into [`RelayOptions`].
    ///
    /// Values are validated later, by `DebugConfig::resolve`, and only in
    /// debug mode.
    fn into_relay_options(self) -> RelayOptions {
        RelayOptions {
            debug_server: self.debug_server,
            access_token: self.access_token.unwrap_or_default(),
            skill_id: self.skill_id.unwrap_or_default(),
            region: self.region,
            relay_url: self.relay_url,
            payload_policy: if self.lenient_payloads {
                PayloadPolicy::Lenient
            } else {
                PayloadPolicy::Strict
            },
        }
    }
}

// ── Skill handler ─────────────────────────────────────────────────────────────

/// Replies to every request with a short plain-text speech response.
fn reply(_ctx: &HandlerContext, request: Value) -> Result<Value, HandlerError> {
    let request_type = request
        .pointer("/request/type")
        .and_then(Value::as_str)
        .context("request envelope has no request.type")?;

    let (speech, end_session) = match request_type {
        "LaunchRequest" => ("Welcome. The skill relay is connected.", false),
        "SessionEndedRequest" => ("Goodbye.", true),
        _ => ("Hello from the skill relay.", false),
    };

    Ok(json!({
        "version": "1.0",
        "response": {
            "outputSpeech": { "type": "PlainText", "text": speech },
            "shouldEndSession": end_session
        }
    }))
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// # What happens at startup
///
/// 1. `tracing_subscriber` is initialised; `RUST_LOG` controls the level.
/// 2. CLI arguments are parsed into [`RelayOptions`].
/// 3. A Ctrl+C handler is spawned that cancels the session's
///    [`CancellationToken`].
/// 4. [`dispatch`] runs the skill in the selected mode until it ends.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging setup ─────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // ── Parse CLI arguments ───────────────────────────────────────────────────
    let options = Cli::parse().into_relay_options();

    // ── Cancellation ──────────────────────────────────────────────────────────
    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, closing the session");
                ctrl_c.cancel();
            }
            Err(e) => {
                error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    // ── Dispatch ──────────────────────────────────────────────────────────────
    let handler = handler_fn(reply);
    let mut host = StdioHostRuntime::stdio();

    match dispatch(&options, &RegionTable::standard(), &handler, &mut host, cancel).await {
        Ok(DispatchOutcome::Debug(summary)) => {
            info!(
                frames = summary.frames_received,
                responses = summary.responses_sent(),
                failures = summary.failures,
                "debug session ended"
            );
        }
        Ok(DispatchOutcome::Hosted) => info!("host runtime stopped"),
        Err(DispatchError::Session(SessionError::Cancelled)) => {
            info!("cancelled before the debug session started");
        }
        Err(e) => {
            error!("{e}");
            return Err(e).context("skill-relay stopped");
        }
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use skill_relay::application::SkillHandler;

    #[test]
    fn test_cli_defaults_select_production_mode() {
        // Arrange: parse with no arguments (all defaults apply)
        let cli = Cli::parse_from(["skill-relay"]);

        // Assert
        assert!(!cli.debug_server);
        assert_eq!(cli.region, "NA");
        assert!(cli.relay_url.is_none());
        assert!(!cli.lenient_payloads);
    }

    #[test]
    fn test_cli_accepts_camel_case_flags() {
        let cli = Cli::parse_from([
            "skill-relay",
            "--debugServer",
            "--accessToken",
            "Atza|token",
            "--skillId",
            "amzn1.ask.skill.1",
            "--region",
            "EU",
        ]);

        assert!(cli.debug_server);
        assert_eq!(cli.access_token.as_deref(), Some("Atza|token"));
        assert_eq!(cli.skill_id.as_deref(), Some("amzn1.ask.skill.1"));
        assert_eq!(cli.region, "EU");
    }

    #[test]
    fn test_cli_accepts_kebab_case_aliases() {
        let cli = Cli::parse_from([
            "skill-relay",
            "--debug-server",
            "--access-token",
            "t",
            "--skill-id",
            "s",
        ]);

        assert!(cli.debug_server);
        assert_eq!(cli.access_token.as_deref(), Some("t"));
        assert_eq!(cli.skill_id.as_deref(), Some("s"));
    }

    #[test]
    fn test_into_relay_options_defaults() {
        // Act
        let options = Cli::parse_from(["skill-relay"]).into_relay_options();

        // Assert
        assert_eq!(options, RelayOptions::default());
    }

    #[test]
    fn test_into_relay_options_strict_payloads_by_default() {
        let options = Cli::parse_from(["skill-relay"]).into_relay_options();
        assert_eq!(options.payload_policy, PayloadPolicy::Strict);
    }

    #[test]
    fn test_into_relay_options_lenient_payloads() {
        let options = Cli::parse_from(["skill-relay", "--lenient-payloads"]).into_relay_options();
        assert_eq!(options.payload_policy, PayloadPolicy::Lenient);
    }

    #[test]
    fn test_into_relay_options_relay_url() {
        let options =
            Cli::parse_from(["skill-relay", "--relay-url", "ws://127.0.0.1:9000/relay"])
                .into_relay_options();
        assert_eq!(options.relay_url.as_deref(), Some("ws://127.0.0.1:9000/relay"));
    }

    #[tokio::test]
    async fn test_reply_to_launch_request() {
        // Arrange
        let handler = handler_fn(reply);
        let ctx = HandlerContext::new(CancellationToken::new(), "r");
        let request = json!({ "request": { "type": "LaunchRequest" } });

        // Act
        let response = handler.handle(&ctx, request).await.unwrap();

        // Assert
        assert_eq!(response["response"]["outputSpeech"]["type"], "PlainText");
        assert_eq!(response["response"]["shouldEndSession"], false);
    }

    #[tokio::test]
    async fn test_reply_rejects_request_without_type() {
        let handler = handler_fn(reply);
        let ctx = HandlerContext::new(CancellationToken::new(), "r");

        let result = handler.handle(&ctx, json!({ "session": {} })).await;

        assert!(result.is_err());
    }
}
