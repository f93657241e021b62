// crates/frontline-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Evidence builders and scripted probes for core tests.
// Purpose: Provide deterministic evidence and probe behavior without network.
// Dependencies: frontline-core, async-trait, tokio
// ============================================================================

//! ## Overview
//! Builders produce evidence records matching well-known endpoint shapes, and
//! scripted probes return fixed results, sleep past their timeout, or panic.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::net::Ipv6Addr;
use std::time::Duration;

use async_trait::async_trait;
use frontline_core::CertIssuer;
use frontline_core::CnameEvidence;
use frontline_core::Evidence;
use frontline_core::EvidenceAggregate;
use frontline_core::Http10Evidence;
use frontline_core::HttpEvidence;
use frontline_core::Probe;
use frontline_core::ProbeError;
use frontline_core::ProbeId;
use frontline_core::RdnsEvidence;
use frontline_core::Target;
use frontline_core::TlsDetails;

// ============================================================================
// SECTION: Evidence Builders
// ============================================================================

/// Hostname following the API Gateway convention.
pub const API_HOST: &str = "myhost.execute-api.us-east-2.amazonaws.com";
/// Hostname following the ALB convention.
pub const ALB_HOST: &str = "my-lb-123.us-east-1.elb.amazonaws.com";
/// Hostname following the NLB convention.
pub const NLB_HOST: &str = "my-lb-123.elb.us-east-1.amazonaws.com";

/// CNAME evidence for an aliased hostname.
#[must_use]
pub fn cname(resolved: &str) -> Evidence {
    Evidence::Cname(CnameEvidence {
        was_cname: true,
        resolved_domain: resolved.to_string(),
    })
}

/// CNAME evidence for a hostname without an alias.
#[must_use]
pub fn no_cname(host: &str) -> Evidence {
    Evidence::Cname(CnameEvidence {
        was_cname: false,
        resolved_domain: host.to_string(),
    })
}

/// HTTPS evidence with `ipv4_count` addresses and the given headers.
#[must_use]
pub fn http(ipv4_count: u8, ipv6: bool, headers: &[(&str, &str)]) -> Evidence {
    let ipv4 = (0 .. ipv4_count).map(|idx| Ipv4Addr::new(10, 0, 0, idx)).collect();
    let ipv6 = if ipv6 { vec![Ipv6Addr::LOCALHOST] } else { Vec::new() };
    Evidence::Http(HttpEvidence {
        final_host: API_HOST.to_string(),
        ipv4,
        ipv6,
        cert_issuer: CertIssuer::Amazon,
        headers: header_map(headers),
        tls: TlsDetails::default(),
    })
}

/// HTTP/1.0 evidence with the given headers.
#[must_use]
pub fn http10(headers: &[(&str, &str)]) -> Evidence {
    Evidence::Http10(Http10Evidence {
        status: 403,
        headers: header_map(headers),
    })
}

/// Reverse DNS evidence for a single host.
#[must_use]
pub fn rdns(host: &str) -> Evidence {
    Evidence::Rdns(RdnsEvidence {
        address: Ipv4Addr::new(10, 0, 0, 1),
        resolved_hosts: vec![host.to_string()],
        elapsed: Duration::from_millis(12),
    })
}

/// Builds a header map from pairs.
#[must_use]
pub fn header_map(headers: &[(&str, &str)]) -> BTreeMap<String, String> {
    headers.iter().map(|(name, value)| ((*name).to_string(), (*value).to_string())).collect()
}

/// Builds an aggregate from records.
#[must_use]
pub fn aggregate(records: Vec<Evidence>) -> EvidenceAggregate {
    let mut aggregate = EvidenceAggregate::new();
    for record in records {
        aggregate.insert(record).unwrap();
    }
    aggregate
}

/// Evidence matching every regional API condition.
#[must_use]
pub fn regional_evidence() -> EvidenceAggregate {
    aggregate(vec![
        cname(API_HOST),
        http(2, false, &[("Apigw-Requestid", "abc123")]),
        http10(&[("Server", "awselb/2.0")]),
    ])
}

/// Evidence matching every edge API condition.
#[must_use]
pub fn edge_evidence() -> EvidenceAggregate {
    aggregate(vec![
        cname(API_HOST),
        http(
            4,
            false,
            &[
                ("X-Amz-Apigw-Id", "id-1"),
                ("X-Amz-Cf-Pop", "IAD89-C1"),
                ("Via", "1.1 abc.cloudfront.net (CloudFront)"),
            ],
        ),
        http10(&[("Server", "CloudFront")]),
    ])
}

// ============================================================================
// SECTION: Scripted Probes
// ============================================================================

/// Probe returning a fixed result after an optional delay.
pub struct ScriptedProbe {
    pub id: ProbeId,
    pub result: Result<Evidence, ProbeError>,
    pub delay: Duration,
}

impl ScriptedProbe {
    pub fn ok(id: ProbeId, evidence: Evidence) -> Self {
        Self {
            id,
            result: Ok(evidence),
            delay: Duration::ZERO,
        }
    }

    pub fn err(id: ProbeId, error: ProbeError) -> Self {
        Self {
            id,
            result: Err(error),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl Probe for ScriptedProbe {
    fn id(&self) -> ProbeId {
        self.id
    }

    async fn collect(&self, _target: &Target) -> Result<Evidence, ProbeError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result.clone()
    }
}

/// Probe that panics while collecting.
pub struct PanickingProbe(pub ProbeId);

#[async_trait]
impl Probe for PanickingProbe {
    fn id(&self) -> ProbeId {
        self.0
    }

    async fn collect(&self, _target: &Target) -> Result<Evidence, ProbeError> {
        panic!("probe exploded")
    }
}

/// Parses a target, panicking on invalid input.
#[must_use]
pub fn target(host: &str) -> Target {
    Target::new(host).unwrap()
}
