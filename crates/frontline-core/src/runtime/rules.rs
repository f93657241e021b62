// crates/frontline-core/src/runtime/rules.rs
// ============================================================================
// Module: Signature Rules
// Description: Built-in predicates recognizing managed front-end signatures.
// Purpose: Map an evidence aggregate to a classification or a non-match.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Each rule is a pure function of the [`EvidenceAggregate`]. Rules declare the
//! evidence records they depend on; when any is absent (or holds the wrong
//! variant) the rule reports [`RuleOutcome::InsufficientEvidence`] and never
//! partially applies. Header names, host patterns, and thresholds come from a
//! [`SignatureTable`] and are resolved once at construction.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::Classification;
use crate::core::CnameEvidence;
use crate::core::EvidenceAggregate;
use crate::core::HostPattern;
use crate::core::Http10Evidence;
use crate::core::HttpEvidence;
use crate::core::ProbeId;
use crate::core::RuleOutcome;
use crate::core::SignatureError;
use crate::core::SignatureTable;
use crate::core::canonical_header_name;

// ============================================================================
// SECTION: Rule Trait
// ============================================================================

/// Predicate recognizing one infrastructure signature.
pub trait SignatureRule: Send + Sync {
    /// Returns a stable rule name for traces.
    fn name(&self) -> &'static str;

    /// Evaluates the rule against the evidence aggregate.
    fn evaluate(&self, evidence: &EvidenceAggregate) -> RuleOutcome;
}

// ============================================================================
// SECTION: Evidence Requirements
// ============================================================================

/// Evidence shared by the API Gateway rules.
struct ApiEvidence<'a> {
    /// CNAME probe record.
    cname: &'a CnameEvidence,
    /// HTTPS probe record.
    http: &'a HttpEvidence,
    /// HTTP/1.0 probe record.
    http10: &'a Http10Evidence,
}

/// Resolves CNAME, HTTPS, and HTTP/1.0 evidence in dependency order.
fn api_evidence(evidence: &EvidenceAggregate) -> Result<ApiEvidence<'_>, RuleOutcome> {
    let cname = evidence.cname().ok_or(RuleOutcome::InsufficientEvidence {
        missing: ProbeId::Cname,
    })?;
    let http = evidence.http().ok_or(RuleOutcome::InsufficientEvidence {
        missing: ProbeId::Http,
    })?;
    let http10 = evidence.http10().ok_or(RuleOutcome::InsufficientEvidence {
        missing: ProbeId::Http10,
    })?;
    Ok(ApiEvidence {
        cname,
        http,
        http10,
    })
}

/// Resolves CNAME and HTTPS evidence in dependency order.
fn balancer_evidence(
    evidence: &EvidenceAggregate,
) -> Result<(&CnameEvidence, &HttpEvidence), RuleOutcome> {
    let cname = evidence.cname().ok_or(RuleOutcome::InsufficientEvidence {
        missing: ProbeId::Cname,
    })?;
    let http = evidence.http().ok_or(RuleOutcome::InsufficientEvidence {
        missing: ProbeId::Http,
    })?;
    Ok((cname, http))
}

/// Converts a predicate result into a rule outcome.
const fn outcome(matched: bool, classification: Classification) -> RuleOutcome {
    if matched {
        RuleOutcome::Matched {
            classification,
        }
    } else {
        RuleOutcome::NoMatch
    }
}

// ============================================================================
// SECTION: API Gateway Rules
// ============================================================================

/// Regional API Gateway endpoint: direct regional IPs, no CDN in front.
#[derive(Debug, Clone)]
pub struct RegionalApiRule {
    /// `<id>.execute-api.<region>.amazonaws.com` convention.
    host: HostPattern,
    /// Request identifier header on the HTTP/1.1 response.
    request_id_header: String,
    /// CDN headers that must be absent.
    cdn_headers: Vec<String>,
    /// Server header inspected on the HTTP/1.0 response.
    server_header: String,
    /// Server value identifying the CDN.
    server_value: String,
    /// Maximum resolved IPv4 addresses.
    max_ipv4: usize,
}

impl RegionalApiRule {
    /// Builds the rule from a signature table.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError`] when the host pattern is unusable.
    pub fn new(table: &SignatureTable) -> Result<Self, SignatureError> {
        Ok(Self {
            host: table.api_gateway_pattern()?,
            request_id_header: canonical_header_name(table.regional_request_id_header.trim()),
            cdn_headers: table.canonical_cdn_headers(),
            server_header: canonical_header_name(table.cdn_server_header.trim()),
            server_value: table.cdn_server_value.trim().to_string(),
            max_ipv4: table.regional_max_ipv4,
        })
    }
}

impl SignatureRule for RegionalApiRule {
    fn name(&self) -> &'static str {
        "regional_api"
    }

    fn evaluate(&self, evidence: &EvidenceAggregate) -> RuleOutcome {
        let api = match api_evidence(evidence) {
            Ok(api) => api,
            Err(outcome) => return outcome,
        };
        let matched = self.host.matches(&api.cname.resolved_domain)
            && api.http.has_header(&self.request_id_header)
            && !api.http10.header_has_value(&self.server_header, &self.server_value)
            && api.http.ipv4.len() <= self.max_ipv4
            && self.cdn_headers.iter().all(|header| !api.http.has_header(header));
        outcome(matched, Classification::RegionalApi)
    }
}

/// Edge-optimized API Gateway endpoint fronted by the CDN.
#[derive(Debug, Clone)]
pub struct EdgeApiRule {
    /// `<id>.execute-api.<region>.amazonaws.com` convention.
    host: HostPattern,
    /// API identifier header on the HTTP/1.1 response.
    api_id_header: String,
    /// CDN headers that must all be present.
    cdn_headers: Vec<String>,
    /// Server header inspected on the HTTP/1.0 response.
    server_header: String,
    /// Server value identifying the CDN.
    server_value: String,
    /// Minimum resolved IPv4 addresses.
    min_ipv4: usize,
}

impl EdgeApiRule {
    /// Builds the rule from a signature table.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError`] when the host pattern is unusable.
    pub fn new(table: &SignatureTable) -> Result<Self, SignatureError> {
        Ok(Self {
            host: table.api_gateway_pattern()?,
            api_id_header: canonical_header_name(table.edge_api_id_header.trim()),
            cdn_headers: table.canonical_cdn_headers(),
            server_header: canonical_header_name(table.cdn_server_header.trim()),
            server_value: table.cdn_server_value.trim().to_string(),
            min_ipv4: table.edge_min_ipv4,
        })
    }
}

impl SignatureRule for EdgeApiRule {
    fn name(&self) -> &'static str {
        "edge_api"
    }

    fn evaluate(&self, evidence: &EvidenceAggregate) -> RuleOutcome {
        let api = match api_evidence(evidence) {
            Ok(api) => api,
            Err(outcome) => return outcome,
        };
        let matched = self.host.matches(&api.cname.resolved_domain)
            && api.http.has_header(&self.api_id_header)
            && api.http10.header_has_value(&self.server_header, &self.server_value)
            && api.http.ipv4.len() >= self.min_ipv4
            && self.cdn_headers.iter().all(|header| api.http.has_header(header));
        outcome(matched, Classification::EdgeApi)
    }
}

// ============================================================================
// SECTION: Load Balancer Rules
// ============================================================================

/// Application Load Balancer: `<name>.<region>.elb.amazonaws.com`.
#[derive(Debug, Clone)]
pub struct AlbRule {
    /// ALB hostname convention.
    host: HostPattern,
}

impl AlbRule {
    /// Builds the rule from a signature table.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError`] when the host pattern is unusable.
    pub fn new(table: &SignatureTable) -> Result<Self, SignatureError> {
        Ok(Self {
            host: table.alb_pattern()?,
        })
    }
}

impl SignatureRule for AlbRule {
    fn name(&self) -> &'static str {
        "alb"
    }

    fn evaluate(&self, evidence: &EvidenceAggregate) -> RuleOutcome {
        let (cname, http) = match balancer_evidence(evidence) {
            Ok(found) => found,
            Err(outcome) => return outcome,
        };
        outcome(
            self.host.matches(&cname.resolved_domain),
            Classification::Alb {
                ipv6: !http.ipv6.is_empty(),
            },
        )
    }
}

/// Network Load Balancer: `<name>.elb.<region>.amazonaws.com`.
#[derive(Debug, Clone)]
pub struct NlbRule {
    /// NLB hostname convention.
    host: HostPattern,
}

impl NlbRule {
    /// Builds the rule from a signature table.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError`] when the host pattern is unusable.
    pub fn new(table: &SignatureTable) -> Result<Self, SignatureError> {
        Ok(Self {
            host: table.nlb_pattern()?,
        })
    }
}

impl SignatureRule for NlbRule {
    fn name(&self) -> &'static str {
        "nlb"
    }

    fn evaluate(&self, evidence: &EvidenceAggregate) -> RuleOutcome {
        let (cname, http) = match balancer_evidence(evidence) {
            Ok(found) => found,
            Err(outcome) => return outcome,
        };
        outcome(
            self.host.matches(&cname.resolved_domain),
            Classification::Nlb {
                ipv6: !http.ipv6.is_empty(),
            },
        )
    }
}
