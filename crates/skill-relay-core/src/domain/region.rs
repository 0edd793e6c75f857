//! Region code to debug-relay hostname table.
//!
//! The assistant service runs a separate debug relay per region.  A developer
//! selects one with a two-letter region code (`NA`, `FE`, or `EU`).  Lookups
//! ignore ASCII case, so `eu` and `EU` resolve to the same host.
//!
//! The table is an immutable value.  [`RegionTable::standard`] is the built-in
//! table; callers that need a different mapping (a staging relay, a local test
//! relay) build their own with [`RegionTable::from_entries`] and pass it in at
//! construction time.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors produced by fail-fast region lookups.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegionError {
    /// The region code is not present in the table.
    #[error("unknown region code '{code}' (expected one of: {known})")]
    UnknownRegion {
        /// The code the caller asked for.
        code: String,
        /// Comma-separated list of the codes the table does contain.
        known: String,
    },
}

/// The regions served by the standard relay table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// North America.
    Na,
    /// Far East.
    Fe,
    /// Europe.
    Eu,
}

impl Region {
    /// Every standard region, in table order.
    pub const ALL: [Region; 3] = [Region::Na, Region::Fe, Region::Eu];

    /// Returns the wire code for this region (`"NA"`, `"FE"`, `"EU"`).
    pub fn code(self) -> &'static str {
        match self {
            Region::Na => "NA",
            Region::Fe => "FE",
            Region::Eu => "EU",
        }
    }

    /// Returns the debug-relay hostname for this region.
    pub fn hostname(self) -> &'static str {
        match self {
            Region::Na => "bob-dispatch-prod-na.amazon.com",
            Region::Fe => "bob-dispatch-prod-fe.amazon.com",
            Region::Eu => "bob-dispatch-prod-eu.amazon.com",
        }
    }

    /// Looks up a region by code, ignoring ASCII case.
    pub fn from_code(code: &str) -> Option<Region> {
        Region::ALL
            .into_iter()
            .find(|region| region.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Region {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::from_code(s).ok_or_else(|| RegionError::UnknownRegion {
            code: s.to_string(),
            known: Region::ALL.map(Region::code).join(", "),
        })
    }
}

/// Resolves a region code against the standard table.
///
/// Unknown codes resolve to the empty string rather than failing.  Callers
/// must treat an empty hostname as a configuration error before dialing; use
/// [`RegionTable::hostname_for`] when a typed error is wanted instead.
///
/// # Examples
///
/// ```rust
/// use skill_relay_core::resolve;
///
/// assert_eq!(resolve("EU"), "bob-dispatch-prod-eu.amazon.com");
/// assert_eq!(resolve("zz"), "");
/// ```
pub fn resolve(code: &str) -> &'static str {
    Region::from_code(code).map(Region::hostname).unwrap_or("")
}

/// An immutable mapping from region codes to relay hostnames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTable {
    entries: Vec<(String, String)>,
}

impl RegionTable {
    /// Returns the built-in table covering [`Region::ALL`].
    pub fn standard() -> Self {
        Self::from_entries(Region::ALL.map(|r| (r.code(), r.hostname())))
    }

    /// Builds a table from `(code, hostname)` pairs.
    ///
    /// When a code appears twice, the first entry wins.
    pub fn from_entries<I, C, H>(entries: I) -> Self
    where
        I: IntoIterator<Item = (C, H)>,
        C: Into<String>,
        H: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(code, host)| (code.into(), host.into()))
                .collect(),
        }
    }

    /// Resolves `code` to a hostname, or the empty string when absent.
    pub fn resolve(&self, code: &str) -> &str {
        self.lookup(code).unwrap_or("")
    }

    /// Resolves `code` to a hostname, failing when the code is absent.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::UnknownRegion`] listing the known codes.
    pub fn hostname_for(&self, code: &str) -> Result<&str, RegionError> {
        self.lookup(code).ok_or_else(|| RegionError::UnknownRegion {
            code: code.to_string(),
            known: self.codes().collect::<Vec<_>>().join(", "),
        })
    }

    /// Iterates over the region codes in table order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(code, _)| code.as_str())
    }

    fn lookup(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(code))
            .map(|(_, host)| host.as_str())
    }
}

impl Default for RegionTable {
    fn default() -> Self {
        Self::standard()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
