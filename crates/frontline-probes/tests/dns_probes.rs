// crates/frontline-probes/tests/dns_probes.rs
// ============================================================================
// Module: DNS Probe Tests
// Description: CNAME and reverse DNS probe behavior against a fixed resolver.
// Purpose: Pin benign-miss handling, IPv4 selection, and failure mapping.
// ============================================================================

//! DNS probe tests.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use std::net::IpAddr;
use std::net::Ipv4Addr;
use std::net::Ipv6Addr;

use frontline_core::Evidence;
use frontline_core::Probe;
use frontline_core::ProbeError;
use frontline_core::ProbeId;
use frontline_probes::CnameProbe;
use frontline_probes::DnsError;
use frontline_probes::RdnsProbe;

use crate::common::FakeResolver;
use crate::common::target;

const HOST: &str = "api.example.com";
const EDGE: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7));

// ============================================================================
// SECTION: CNAME
// ============================================================================

async fn cname_for(resolver: FakeResolver, host: &str) -> Result<Evidence, ProbeError> {
    CnameProbe::new(resolver.shared()).collect(&target(host)).await
}

#[tokio::test]
async fn cname_reports_resolved_alias() {
    let resolver = FakeResolver::default()
        .with_cname(HOST, Ok(Some("d-abc.execute-api.us-east-1.amazonaws.com.".to_string())));
    let Evidence::Cname(evidence) = cname_for(resolver, HOST).await.unwrap() else {
        panic!("expected CNAME evidence");
    };
    assert!(evidence.was_cname);
    assert_eq!(evidence.resolved_domain, "d-abc.execute-api.us-east-1.amazonaws.com");
}

#[tokio::test]
async fn cname_without_alias_is_benign_miss() {
    let Evidence::Cname(evidence) = cname_for(FakeResolver::default(), HOST).await.unwrap() else {
        panic!("expected CNAME evidence");
    };
    assert!(!evidence.was_cname);
    assert_eq!(evidence.resolved_domain, HOST);
}

#[tokio::test]
async fn cname_no_records_is_benign_miss() {
    let resolver =
        FakeResolver::default().with_cname(HOST, Err(DnsError::NoRecords(HOST.to_string())));
    let Evidence::Cname(evidence) = cname_for(resolver, HOST).await.unwrap() else {
        panic!("expected CNAME evidence");
    };
    assert!(!evidence.was_cname);
    assert_eq!(evidence.resolved_domain, HOST);
}

#[tokio::test]
async fn cname_alias_to_itself_is_not_an_alias() {
    let resolver = FakeResolver::default().with_cname(HOST, Ok(Some("API.example.com.".to_string())));
    let Evidence::Cname(evidence) = cname_for(resolver, HOST).await.unwrap() else {
        panic!("expected CNAME evidence");
    };
    assert!(!evidence.was_cname);
}

#[tokio::test]
async fn cname_strips_root_dot_from_target() {
    let resolver = FakeResolver::default().with_cname(HOST, Ok(None));
    let Evidence::Cname(evidence) = cname_for(resolver, "api.example.com.").await.unwrap() else {
        panic!("expected CNAME evidence");
    };
    assert_eq!(evidence.resolved_domain, HOST);
}

#[tokio::test]
async fn cname_transport_error_fails_probe() {
    let resolver = FakeResolver::default()
        .with_cname(HOST, Err(DnsError::Lookup("connection refused".to_string())));
    let err = cname_for(resolver, HOST).await.unwrap_err();
    assert!(matches!(err, ProbeError::Dns(message) if message.contains("connection refused")));
}

#[test]
fn probe_ids_match_variants() {
    let resolver = FakeResolver::default().shared();
    assert_eq!(CnameProbe::new(resolver.clone()).id(), ProbeId::Cname);
    assert_eq!(RdnsProbe::new(resolver).id(), ProbeId::Rdns);
}

// ============================================================================
// SECTION: Reverse DNS
// ============================================================================

async fn rdns_for(resolver: FakeResolver) -> Result<Evidence, ProbeError> {
    RdnsProbe::new(resolver.shared()).collect(&target(HOST)).await
}

#[tokio::test]
async fn rdns_uses_first_ipv4_address() {
    let resolver = FakeResolver::default()
        .with_addresses(
            HOST,
            vec![
                IpAddr::V6(Ipv6Addr::LOCALHOST),
                EDGE,
                IpAddr::V4(Ipv4Addr::new(203, 0, 113, 8)),
            ],
        )
        .with_ptr(EDGE, Ok(vec!["server-203-0-113-7.iad89.r.cloudfront.net.".to_string()]));
    let Evidence::Rdns(evidence) = rdns_for(resolver).await.unwrap() else {
        panic!("expected RDNS evidence");
    };
    assert_eq!(IpAddr::V4(evidence.address), EDGE);
    assert_eq!(evidence.resolved_hosts, vec!["server-203-0-113-7.iad89.r.cloudfront.net"]);
}

#[tokio::test]
async fn rdns_without_ipv4_fails() {
    let resolver =
        FakeResolver::default().with_addresses(HOST, vec![IpAddr::V6(Ipv6Addr::LOCALHOST)]);
    let err = rdns_for(resolver).await.unwrap_err();
    assert_eq!(err, ProbeError::NoIpv4(HOST.to_string()));
}

#[tokio::test]
async fn rdns_forward_failure_fails() {
    let err = rdns_for(FakeResolver::default()).await.unwrap_err();
    assert!(matches!(err, ProbeError::Dns(_)));
}

#[tokio::test]
async fn rdns_reverse_failure_fails() {
    let resolver = FakeResolver::default().with_addresses(HOST, vec![EDGE]);
    let err = rdns_for(resolver).await.unwrap_err();
    assert!(matches!(err, ProbeError::Dns(_)));
}

#[tokio::test]
async fn rdns_empty_ptr_names_fail() {
    let resolver = FakeResolver::default()
        .with_addresses(HOST, vec![EDGE])
        .with_ptr(EDGE, Ok(vec![".".to_string()]));
    let err = rdns_for(resolver).await.unwrap_err();
    assert!(matches!(err, ProbeError::Dns(message) if message.contains("203.0.113.7")));
}
