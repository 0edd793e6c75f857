//! Dispatcher configuration types.
//!
//! Configuration arrives in two stages:
//!
//! 1. [`RelayOptions`] holds the raw values exactly as the command line (or an
//!    embedding program) supplied them: the debug-mode switch, the access
//!    token, the skill id, and the region code.  Nothing is checked yet.
//! 2. [`DebugConfig::resolve`] validates those values against a
//!    [`RegionTable`] and produces everything the debug session needs to dial
//!    the relay.  It fails fast with a [`ConfigError`] instead of letting a bad
//!    region or an empty token surface later as a confusing handshake failure.
//!
//! # Design rationale
//!
//! Keeping configuration as plain structs (no global state, no environment
//! variable reads inside the domain) makes the dispatcher easy to embed in
//! tests.  `main.rs` is responsible for populating [`RelayOptions`].

use std::fmt;

use skill_relay_core::{RegionError, RegionTable};
use thiserror::Error;

/// Region used when none is given on the command line.
pub const DEFAULT_REGION: &str = "NA";

/// Errors found while validating [`RelayOptions`] for debug mode.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The region code is not in the region table.
    #[error(transparent)]
    Region(#[from] RegionError),

    /// No access token was supplied.
    #[error("an access token is required in debug mode (--accessToken)")]
    MissingAccessToken,

    /// The access token contains characters that cannot travel in an HTTP
    /// header value (control characters or non-ASCII text).
    #[error("the access token contains characters that are not allowed in an HTTP header")]
    InvalidAccessToken,

    /// No skill id was supplied.
    #[error("a skill id is required in debug mode (--skillId)")]
    MissingSkillId,

    /// A relay URL override does not use a WebSocket scheme.
    #[error("relay URL must start with ws:// or wss://, got '{0}'")]
    InvalidRelayUrl(String),
}

/// What to do with a request whose envelope parsed but whose embedded
/// payload does not decode into the skill's request type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadPolicy {
    /// End the session, treating the bad payload as a fatal protocol error.
    #[default]
    Strict,
    /// Answer that request with a failure response and keep the session open.
    Lenient,
}

/// Raw dispatcher options, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayOptions {
    /// Run against the debug relay instead of the serverless host.
    pub debug_server: bool,

    /// Developer access token presented to the relay.
    pub access_token: String,

    /// Skill identifier; part of the relay URL.
    pub skill_id: String,

    /// Relay region code (`NA`, `FE`, or `EU`).
    pub region: String,

    /// Full relay URL overriding the one derived from `region` and
    /// `skill_id`.  Used for local or staging relays.
    pub relay_url: Option<String>,

    /// Handling of undecodable request payloads.
    pub payload_policy: PayloadPolicy,
}

impl Default for RelayOptions {
    fn default() -> Self {
        Self {
            debug_server: false,
            access_token: String::new(),
            skill_id: String::new(),
            region: DEFAULT_REGION.to_string(),
            relay_url: None,
            payload_policy: PayloadPolicy::default(),
        }
    }
}

/// The WebSocket URL of a skill's development-stage debug endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayEndpoint {
    url: String,
}

impl RelayEndpoint {
    /// Builds the standard endpoint URL for `skill_id` on the relay at
    /// `hostname`.
    ///
    /// ```rust
    /// use skill_relay::domain::RelayEndpoint;
    ///
    /// let endpoint = RelayEndpoint::for_skill("relay.example.com", "amzn1.ask.skill.1");
    /// assert_eq!(
    ///     endpoint.url(),
    ///     "wss://relay.example.com/v1/skills/amzn1.ask.skill.1/stages/development/connectCustomDebugEndpoint"
    /// );
    /// ```
    pub fn for_skill(hostname: &str, skill_id: &str) -> Self {
        Self {
            url: format!(
                "wss://{hostname}/v1/skills/{skill_id}/stages/development/connectCustomDebugEndpoint"
            ),
        }
    }

    /// Uses `url` verbatim.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Returns the full URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for RelayEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Validated settings for one debug session.
#[derive(Clone, PartialEq, Eq)]
pub struct DebugConfig {
    /// Where to connect.
    pub endpoint: RelayEndpoint,

    /// Skill the session serves; used for log context.
    pub skill_id: String,

    /// Handling of undecodable request payloads.
    pub payload_policy: PayloadPolicy,

    access_token: String,
}

impl DebugConfig {
    /// Validates `options` and resolves the relay endpoint through `regions`.
    ///
    /// When `options.relay_url` is set, the region is not consulted.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingAccessToken`] / [`ConfigError::MissingSkillId`]
    ///   when either value is empty or whitespace.
    /// - [`ConfigError::InvalidAccessToken`] when the token cannot be sent as a
    ///   header value.
    /// - [`ConfigError::Region`] for a region code not in `regions`.
    /// - [`ConfigError::InvalidRelayUrl`] for an override without a `ws://` or
    ///   `wss://` scheme.
    pub fn resolve(options: &RelayOptions, regions: &RegionTable) -> Result<Self, ConfigError> {
        // Checked for blankness, but sent exactly as given.
        let access_token = options.access_token.as_str();
        if access_token.trim().is_empty() {
            return Err(ConfigError::MissingAccessToken);
        }
        if !is_header_safe(access_token) {
            return Err(ConfigError::InvalidAccessToken);
        }

        let skill_id = options.skill_id.trim();
        if skill_id.is_empty() {
            return Err(ConfigError::MissingSkillId);
        }

        let endpoint = match &options.relay_url {
            Some(url) if url.starts_with("ws://") || url.starts_with("wss://") => {
                RelayEndpoint::from_url(url.clone())
            }
            Some(url) => return Err(ConfigError::InvalidRelayUrl(url.clone())),
            None => {
                let hostname = regions.hostname_for(options.region.trim())?;
                RelayEndpoint::for_skill(hostname, skill_id)
            }
        };

        Ok(Self {
            endpoint,
            skill_id: skill_id.to_string(),
            payload_policy: options.payload_policy,
            access_token: access_token.to_string(),
        })
    }

    /// The raw access token, sent verbatim as the `authorization` header.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

// The token is a credential; keep it out of `{:?}` output and therefore out
// of logs.
impl fmt::Debug for DebugConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugConfig")
            .field("endpoint", &self.endpoint)
            .field("skill_id", &self.skill_id)
            .field("payload_policy", &self.payload_policy)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Visible ASCII, space, and tab are the only bytes an HTTP/1.1 client will
/// put in a header value.
fn is_header_safe(value: &str) -> bool {
    value.chars().all(|c| c == '\t' || (' '..='~').contains(&c))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn debug_options() -> RelayOptions {
        RelayOptions {
            debug_server: true,
            access_token: "Atza|token".to_string(),
            skill_id: "amzn1.ask.skill.1234".to_string(),
            ..RelayOptions::default()
        }
    }

    #[test]
    fn test_default_options_use_na_region() {
        let options = RelayOptions::default();
        assert_eq!(options.region, "NA");
        assert!(!options.debug_server);
        assert_eq!(options.payload_policy, PayloadPolicy::Strict);
    }

    #[test]
    fn test_resolve_keeps_access_token_verbatim() {
        // Arrange: surrounding whitespace is part of the credential
        let options = RelayOptions {
            access_token: " Atza|tok ".to_string(),
            ..debug_options()
        };

        // Act
        let config = DebugConfig::resolve(&options, &RegionTable::standard()).unwrap();

        // Assert
        assert_eq!(config.access_token(), " Atza|tok ");
    }

    #[test]
    fn test_resolve_builds_standard_endpoint() {
        // Arrange
        let options = debug_options();

        // Act
        let config = DebugConfig::resolve(&options, &RegionTable::standard()).unwrap();

        // Assert
        assert_eq!(
            config.endpoint.url(),
            "wss://bob-dispatch-prod-na.amazon.com/v1/skills/amzn1.ask.skill.1234/stages/development/connectCustomDebugEndpoint"
        );
        assert_eq!(config.access_token(), "Atza|token");
        assert_eq!(config.skill_id, "amzn1.ask.skill.1234");
    }

    #[test]
    fn test_resolve_uses_selected_region() {
        let options = RelayOptions {
            region: "eu".to_string(),
            ..debug_options()
        };
        let config = DebugConfig::resolve(&options, &RegionTable::standard()).unwrap();
        assert!(config.endpoint.url().starts_with("wss://bob-dispatch-prod-eu.amazon.com/"));
    }

    #[test]
    fn test_resolve_unknown_region_fails_fast() {
        // Arrange
        let options = RelayOptions {
            region: "zz".to_string(),
            ..debug_options()
        };

        // Act
        let err = DebugConfig::resolve(&options, &RegionTable::standard()).unwrap_err();

        // Assert
        assert!(matches!(err, ConfigError::Region(RegionError::UnknownRegion { .. })));
    }

    #[test]
    fn test_resolve_uses_injected_region_table() {
        let table = RegionTable::from_entries([("LAB", "relay.lab.internal")]);
        let options = RelayOptions {
            region: "LAB".to_string(),
            ..debug_options()
        };
        let config = DebugConfig::resolve(&options, &table).unwrap();
        assert!(config.endpoint.url().starts_with("wss://relay.lab.internal/"));
    }

    #[test]
    fn test_resolve_missing_token_fails() {
        let options = RelayOptions {
            access_token: "   ".to_string(),
            ..debug_options()
        };
        assert_eq!(
            DebugConfig::resolve(&options, &RegionTable::standard()),
            Err(ConfigError::MissingAccessToken)
        );
    }

    #[test]
    fn test_resolve_token_with_newline_fails() {
        let options = RelayOptions {
            access_token: "abc\r\nX-Injected: 1".to_string(),
            ..debug_options()
        };
        assert_eq!(
            DebugConfig::resolve(&options, &RegionTable::standard()),
            Err(ConfigError::InvalidAccessToken)
        );
    }

    #[test]
    fn test_resolve_missing_skill_id_fails() {
        let options = RelayOptions {
            skill_id: String::new(),
            ..debug_options()
        };
        assert_eq!(
            DebugConfig::resolve(&options, &RegionTable::standard()),
            Err(ConfigError::MissingSkillId)
        );
    }

    #[test]
    fn test_relay_url_override_skips_region_lookup() {
        // Arrange: an unknown region would normally fail
        let options = RelayOptions {
            region: "zz".to_string(),
            relay_url: Some("ws://127.0.0.1:9000/debug".to_string()),
            ..debug_options()
        };

        // Act
        let config = DebugConfig::resolve(&options, &RegionTable::standard()).unwrap();

        // Assert
        assert_eq!(config.endpoint.url(), "ws://127.0.0.1:9000/debug");
    }

    #[test]
    fn test_relay_url_override_requires_websocket_scheme() {
        let options = RelayOptions {
            relay_url: Some("https://relay.example.com".to_string()),
            ..debug_options()
        };
        assert_eq!(
            DebugConfig::resolve(&options, &RegionTable::standard()),
            Err(ConfigError::InvalidRelayUrl("https://relay.example.com".to_string()))
        );
    }

    #[test]
    fn test_payload_policy_is_carried_through() {
        let options = RelayOptions {
            payload_policy: PayloadPolicy::Lenient,
            ..debug_options()
        };
        let config = DebugConfig::resolve(&options, &RegionTable::standard()).unwrap();
        assert_eq!(config.payload_policy, PayloadPolicy::Lenient);
    }

    #[test]
    fn test_debug_output_redacts_access_token() {
        let config = DebugConfig::resolve(&debug_options(), &RegionTable::standard()).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("Atza|token"));
        assert!(rendered.contains("<redacted>"));
    }
}
