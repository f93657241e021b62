// crates/frontline-core/src/core/identifiers.rs
// ============================================================================
// Module: Frontline Identifiers
// Description: Probe identities and validated fingerprint targets.
// Purpose: Provide strongly typed identifiers with stable wire forms.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Probe identities form a small closed set and serialize as stable labels
//! (`HTTP`, `HTTP_1_0`, `CNAME`, `RDNS`). Targets are opaque hostnames: they are
//! trimmed and must be non-empty, but DNS syntax is deliberately not validated
//! so malformed names reach the probes and fail there.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Probe Identity
// ============================================================================

/// Identity of a probe and the evidence key it owns.
///
/// # Invariants
/// - Variants are stable for aggregate keys and serialized reports.
/// - Ordering follows the canonical probe order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProbeId {
    /// HTTPS request with HTTP/1.1 negotiation.
    #[serde(rename = "HTTP")]
    Http,
    /// Raw HTTP/1.0 request without a `Host` header.
    #[serde(rename = "HTTP_1_0")]
    Http10,
    /// Canonical-name resolution.
    #[serde(rename = "CNAME")]
    Cname,
    /// Forward then reverse DNS resolution.
    #[serde(rename = "RDNS")]
    Rdns,
}

impl ProbeId {
    /// All probe identities in canonical order.
    pub const ALL: [Self; 4] = [Self::Http, Self::Http10, Self::Cname, Self::Rdns];

    /// Returns the stable label for the probe.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "HTTP",
            Self::Http10 => "HTTP_1_0",
            Self::Cname => "CNAME",
            Self::Rdns => "RDNS",
        }
    }
}

impl fmt::Display for ProbeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a probe label is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown probe id: {0}")]
pub struct UnknownProbeId(pub String);

impl FromStr for ProbeId {
    type Err = UnknownProbeId;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownProbeId(value.to_string()))
    }
}

// ============================================================================
// SECTION: Target
// ============================================================================

/// Target hostname for a single fingerprint run.
///
/// # Invariants
/// - Never empty and carries no surrounding whitespace.
/// - Not validated as a DNS name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Target(String);

/// Error returned when a target hostname is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    /// The hostname was empty after trimming.
    #[error("target hostname must not be empty")]
    Empty,
}

impl Target {
    /// Creates a target from a user-supplied hostname.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::Empty`] when the hostname is blank.
    pub fn new(hostname: impl AsRef<str>) -> Result<Self, TargetError> {
        let trimmed = hostname.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TargetError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the hostname as a string slice.
    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
