// crates/frontline-probes/src/dns.rs
// ============================================================================
// Module: DNS Resolver Boundary
// Description: Resolver interface and the system resolver implementation.
// Purpose: Isolate forward, reverse, and canonical-name lookups behind a trait.
// Dependencies: async-trait, hickory-resolver, thiserror
// ============================================================================

//! ## Overview
//! Probes resolve names through [`DnsResolver`] so tests can inject fixed
//! answers. [`SystemResolver`] reads the host resolver configuration and falls
//! back to default public upstreams when none is available.
//! Invariants:
//! - Returned hostnames carry no trailing root dot.
//! - A "no records" answer for a canonical-name query is a benign miss.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::IpAddr;

use async_trait::async_trait;
use hickory_resolver::Name;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::ResolverConfig;
use hickory_resolver::config::ResolverOpts;
use hickory_resolver::error::ResolveError;
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::proto::rr::RData;
use hickory_resolver::proto::rr::RecordType;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum CNAME hops followed before the chain is considered resolved.
pub const MAX_CNAME_HOPS: usize = 8;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// DNS resolution errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DnsError {
    /// The name exists but has no records of the requested type, or does not exist.
    #[error("no records found for {0}")]
    NoRecords(String),
    /// The lookup failed in transport or protocol handling.
    #[error("lookup failed: {0}")]
    Lookup(String),
}

// ============================================================================
// SECTION: Resolver Interface
// ============================================================================

/// Name resolution used by the built-in probes.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    /// Resolves the canonical name of `host`.
    ///
    /// Returns `Ok(None)` when the host has no CNAME record.
    ///
    /// # Errors
    ///
    /// Returns [`DnsError::Lookup`] on transport failure.
    async fn canonical_name(&self, host: &str) -> Result<Option<String>, DnsError>;

    /// Resolves `host` to IPv4 and IPv6 addresses.
    ///
    /// # Errors
    ///
    /// Returns [`DnsError`] when no address can be resolved.
    async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>, DnsError>;

    /// Resolves PTR names for `address`.
    ///
    /// # Errors
    ///
    /// Returns [`DnsError`] when no PTR record can be resolved.
    async fn reverse_lookup(&self, address: IpAddr) -> Result<Vec<String>, DnsError>;
}

/// Resolves a host to a deduplicated, non-empty address list.
///
/// IP literals resolve to themselves without a lookup.
///
/// # Errors
///
/// Returns [`DnsError`] when resolution fails or yields no addresses.
pub async fn resolve_addresses(
    resolver: &dyn DnsResolver,
    host: &str,
) -> Result<Vec<IpAddr>, DnsError> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(vec![ip]);
    }
    let mut addresses = resolver.lookup_ip(host).await?;
    dedupe_ips(&mut addresses);
    if addresses.is_empty() {
        return Err(DnsError::NoRecords(host.to_string()));
    }
    Ok(addresses)
}

/// Deduplicates IP addresses while preserving resolver order.
fn dedupe_ips(ips: &mut Vec<IpAddr>) {
    let mut unique = Vec::with_capacity(ips.len());
    for ip in ips.drain(..) {
        if !unique.contains(&ip) {
            unique.push(ip);
        }
    }
    *ips = unique;
}

/// Strips trailing root-zone dots from a resolved name.
#[must_use]
pub fn strip_root_dot(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}

// ============================================================================
// SECTION: System Resolver
// ============================================================================

/// Resolver backed by the host DNS configuration.
pub struct SystemResolver {
    /// Async resolver handle.
    inner: TokioAsyncResolver,
}

impl SystemResolver {
    /// Builds a resolver from the system configuration.
    ///
    /// Falls back to default upstreams when the system configuration cannot
    /// be read.
    #[must_use]
    pub fn from_system_conf() -> Self {
        let inner = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|_| {
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        });
        Self {
            inner,
        }
    }
}

#[async_trait]
impl DnsResolver for SystemResolver {
    async fn canonical_name(&self, host: &str) -> Result<Option<String>, DnsError> {
        let mut current = strip_root_dot(host);
        let mut aliased = false;
        for _ in 0 .. MAX_CNAME_HOPS {
            let lookup = match self.inner.lookup(current.as_str(), RecordType::CNAME).await {
                Ok(lookup) => lookup,
                Err(err) if is_no_records(&err) => break,
                Err(err) => return Err(DnsError::Lookup(err.to_string())),
            };
            let next = lookup.iter().find_map(|rdata| match rdata {
                RData::CNAME(target) => Some(strip_root_dot(&target.0.to_utf8())),
                _ => None,
            });
            match next {
                Some(next) if !next.eq_ignore_ascii_case(&current) => {
                    aliased = true;
                    current = next;
                }
                _ => break,
            }
        }
        Ok(aliased.then_some(current))
    }

    async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>, DnsError> {
        let lookup = self.inner.lookup_ip(host).await.map_err(|err| map_error(host, &err))?;
        Ok(lookup.iter().collect())
    }

    async fn reverse_lookup(&self, address: IpAddr) -> Result<Vec<String>, DnsError> {
        let label = address.to_string();
        let lookup = self
            .inner
            .lookup(Name::from(address), RecordType::PTR)
            .await
            .map_err(|err| map_error(&label, &err))?;
        let hosts: Vec<String> = lookup
            .iter()
            .filter_map(|rdata| match rdata {
                RData::PTR(ptr) => Some(strip_root_dot(&ptr.0.to_utf8())),
                _ => None,
            })
            .collect();
        if hosts.is_empty() {
            return Err(DnsError::NoRecords(label));
        }
        Ok(hosts)
    }
}

/// Returns true for "no records" and NXDOMAIN answers.
fn is_no_records(err: &ResolveError) -> bool {
    matches!(
        err.kind(),
        ResolveErrorKind::NoRecordsFound {
            ..
        }
    )
}

/// Maps a resolver error onto [`DnsError`].
fn map_error(name: &str, err: &ResolveError) -> DnsError {
    if is_no_records(err) {
        DnsError::NoRecords(name.to_string())
    } else {
        DnsError::Lookup(err.to_string())
    }
}
