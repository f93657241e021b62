// crates/frontline-core/src/core/evidence.rs
// ============================================================================
// Module: Frontline Evidence Model
// Description: Typed evidence records and the per-run evidence aggregate.
// Purpose: Represent probe results as a closed variant set keyed by probe.
// Dependencies: crate::core::identifiers, serde, thiserror
// ============================================================================

//! ## Overview
//! Each probe yields exactly one [`Evidence`] variant. The
//! [`EvidenceAggregate`] keys records by the probe identity that owns them, so
//! a record can never land under a foreign key. Rules read the aggregate via
//! typed accessors that return `None` for both a missing key and a mismatched
//! variant; neither case is an error.
//!
//! Header names are stored in canonical MIME form (`X-Amz-Cf-Pop`) so lookups
//! are exact string matches.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::net::Ipv6Addr;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::ProbeId;

// ============================================================================
// SECTION: Header Names
// ============================================================================

/// Canonicalizes an HTTP header name to MIME form.
///
/// The first letter and every letter following a hyphen are upper-cased; all
/// other letters are lower-cased. Names containing bytes outside the token
/// alphabet (spaces, colons, non-ASCII) are returned unchanged.
#[must_use]
pub fn canonical_header_name(name: &str) -> String {
    if !name.bytes().all(is_token_byte) {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for ch in name.chars() {
        if upper {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch.to_ascii_lowercase());
        }
        upper = ch == '-';
    }
    out
}

/// Returns true for bytes permitted in an HTTP header field name.
const fn is_token_byte(byte: u8) -> bool {
    matches!(
        byte,
        b'a' ..= b'z'
            | b'A' ..= b'Z'
            | b'0' ..= b'9'
            | b'!'
            | b'#'
            | b'$'
            | b'%'
            | b'&'
            | b'\''
            | b'*'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~'
    )
}

/// Looks up a header value, treating empty values as absent.
fn non_empty_header<'a>(headers: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    headers.get(name).map(String::as_str).filter(|value| !value.trim().is_empty())
}

// ============================================================================
// SECTION: HTTP Evidence
// ============================================================================

/// Issuer classification of the leaf certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CertIssuer {
    /// Subject common name carries the Amazon domain suffix.
    #[serde(rename = "Amazon")]
    Amazon,
    /// Any other certificate.
    #[serde(rename = "Non-Amazon")]
    NonAmazon,
}

impl CertIssuer {
    /// Returns the display label for the issuer classification.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Amazon => "Amazon",
            Self::NonAmazon => "Non-Amazon",
        }
    }
}

/// Subject and issuer of one peer certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateSummary {
    /// Distinguished name of the certificate subject.
    pub subject: String,
    /// Distinguished name of the certificate issuer.
    pub issuer: String,
}

/// Negotiated TLS session details, kept for diagnostics only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsDetails {
    /// Negotiated protocol version label (for example `TLS 1.3`).
    pub protocol_version: String,
    /// Negotiated cipher suite label.
    pub cipher_suite: String,
    /// Peer certificate chain, leaf first.
    pub certificates: Vec<CertificateSummary>,
}

/// Evidence gathered by the HTTPS probe.
///
/// # Invariants
/// - `headers` holds the first value of each response header.
/// - Header keys are canonical MIME names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpEvidence {
    /// Hostname of the final response URL after redirects.
    pub final_host: String,
    /// Resolved IPv4 addresses for `final_host`.
    pub ipv4: Vec<Ipv4Addr>,
    /// Resolved IPv6 addresses for `final_host`.
    pub ipv6: Vec<Ipv6Addr>,
    /// Leaf certificate issuer classification.
    pub cert_issuer: CertIssuer,
    /// Response headers keyed by canonical name.
    pub headers: BTreeMap<String, String>,
    /// TLS session details from the certificate inspection connection.
    pub tls: TlsDetails,
}

impl HttpEvidence {
    /// Returns the header value when present and non-empty.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        non_empty_header(&self.headers, name)
    }

    /// Returns true when the header is present with a non-empty value.
    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }
}

// ============================================================================
// SECTION: HTTP/1.0 Evidence
// ============================================================================

/// Evidence gathered by the minimal HTTP/1.0 probe.
///
/// # Invariants
/// - Repeated headers are joined with `", "` in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Http10Evidence {
    /// Response status code.
    pub status: u16,
    /// Response headers keyed by canonical name.
    pub headers: BTreeMap<String, String>,
}

impl Http10Evidence {
    /// Returns the header value when present and non-empty.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        non_empty_header(&self.headers, name)
    }

    /// Returns true when any comma-separated value of `name` equals `expected`.
    #[must_use]
    pub fn header_has_value(&self, name: &str, expected: &str) -> bool {
        self.header(name).is_some_and(|value| value.split(',').any(|part| part.trim() == expected))
    }
}

// ============================================================================
// SECTION: DNS Evidence
// ============================================================================

/// Evidence gathered by the CNAME probe.
///
/// # Invariants
/// - `resolved_domain` carries no trailing root dot.
/// - `resolved_domain` equals the target hostname when `was_cname` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CnameEvidence {
    /// Whether a CNAME record existed for the target.
    pub was_cname: bool,
    /// Canonical resolved hostname.
    pub resolved_domain: String,
}

/// Evidence gathered by the reverse DNS probe.
///
/// # Invariants
/// - `resolved_hosts` carry no trailing root dots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RdnsEvidence {
    /// First IPv4 address of the target, the one reverse-resolved.
    pub address: Ipv4Addr,
    /// Hostnames returned by the reverse lookup.
    pub resolved_hosts: Vec<String>,
    /// Wall-clock duration of the forward and reverse lookups combined.
    #[serde(rename = "elapsed_ms", with = "duration_ms")]
    pub elapsed: Duration,
}

/// Serializes durations as whole milliseconds.
mod duration_ms {
    use std::time::Duration;

    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    /// Writes the duration as a millisecond count.
    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    /// Reads a millisecond count into a duration.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

// ============================================================================
// SECTION: Evidence Union
// ============================================================================

/// Evidence record produced by one probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Evidence {
    /// HTTPS probe evidence.
    Http(HttpEvidence),
    /// HTTP/1.0 probe evidence.
    Http10(Http10Evidence),
    /// CNAME probe evidence.
    Cname(CnameEvidence),
    /// Reverse DNS probe evidence.
    Rdns(RdnsEvidence),
}

impl Evidence {
    /// Returns the probe identity that owns this record.
    #[must_use]
    pub const fn probe_id(&self) -> ProbeId {
        match self {
            Self::Http(_) => ProbeId::Http,
            Self::Http10(_) => ProbeId::Http10,
            Self::Cname(_) => ProbeId::Cname,
            Self::Rdns(_) => ProbeId::Rdns,
        }
    }
}

// ============================================================================
// SECTION: Evidence Aggregate
// ============================================================================

/// Errors raised while populating an aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    /// A record for the probe was already present.
    #[error("evidence already recorded for probe {0}")]
    Duplicate(ProbeId),
}

/// Per-run evidence keyed by probe identity.
///
/// # Invariants
/// - At most one record per probe identity.
/// - A record's key always equals its [`Evidence::probe_id`].
/// - A missing key means the probe did not complete for this run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvidenceAggregate {
    /// Evidence records keyed by owning probe.
    records: BTreeMap<ProbeId, Evidence>,
}

impl EvidenceAggregate {
    /// Creates an empty aggregate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Inserts a record under its owning probe identity.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::Duplicate`] when the probe already has a record.
    pub fn insert(&mut self, evidence: Evidence) -> Result<(), AggregateError> {
        let probe_id = evidence.probe_id();
        if self.records.contains_key(&probe_id) {
            return Err(AggregateError::Duplicate(probe_id));
        }
        self.records.insert(probe_id, evidence);
        Ok(())
    }

    /// Returns the record for a probe, if present.
    #[must_use]
    pub fn get(&self, probe_id: ProbeId) -> Option<&Evidence> {
        self.records.get(&probe_id)
    }

    /// Returns true when the probe has a record.
    #[must_use]
    pub fn contains(&self, probe_id: ProbeId) -> bool {
        self.records.contains_key(&probe_id)
    }

    /// Returns the number of recorded probes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when no probe produced evidence.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in canonical probe order.
    pub fn iter(&self) -> impl Iterator<Item = (ProbeId, &Evidence)> {
        self.records.iter().map(|(id, evidence)| (*id, evidence))
    }

    /// Returns HTTPS evidence when present.
    #[must_use]
    pub fn http(&self) -> Option<&HttpEvidence> {
        match self.get(ProbeId::Http) {
            Some(Evidence::Http(evidence)) => Some(evidence),
            _ => None,
        }
    }

    /// Returns HTTP/1.0 evidence when present.
    #[must_use]
    pub fn http10(&self) -> Option<&Http10Evidence> {
        match self.get(ProbeId::Http10) {
            Some(Evidence::Http10(evidence)) => Some(evidence),
            _ => None,
        }
    }

    /// Returns CNAME evidence when present.
    #[must_use]
    pub fn cname(&self) -> Option<&CnameEvidence> {
        match self.get(ProbeId::Cname) {
            Some(Evidence::Cname(evidence)) => Some(evidence),
            _ => None,
        }
    }

    /// Returns reverse DNS evidence when present.
    #[must_use]
    pub fn rdns(&self) -> Option<&RdnsEvidence> {
        match self.get(ProbeId::Rdns) {
            Some(Evidence::Rdns(evidence)) => Some(evidence),
            _ => None,
        }
    }
}
