// crates/frontline-probes/src/rdns.rs
// ============================================================================
// Module: Reverse DNS Probe
// Description: Forward then reverse resolution of the target's first IPv4.
// Purpose: Record PTR names and the combined lookup time as a coarse signal.
// Dependencies: frontline-core, async-trait
// ============================================================================

//! ## Overview
//! The probe resolves the target, selects the first IPv4 address, and
//! reverse-resolves it. Forward failure, a missing IPv4 address, and reverse
//! failure all fail the probe; there is no partial result.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use frontline_core::Evidence;
use frontline_core::Probe;
use frontline_core::ProbeError;
use frontline_core::ProbeId;
use frontline_core::RdnsEvidence;
use frontline_core::Target;

use crate::dns::DnsResolver;
use crate::dns::resolve_addresses;
use crate::dns::strip_root_dot;

// ============================================================================
// SECTION: Probe
// ============================================================================

/// Reverse DNS probe.
pub struct RdnsProbe {
    /// Resolver used for both lookups.
    resolver: Arc<dyn DnsResolver>,
}

impl RdnsProbe {
    /// Creates a reverse DNS probe.
    #[must_use]
    pub fn new(resolver: Arc<dyn DnsResolver>) -> Self {
        Self {
            resolver,
        }
    }
}

#[async_trait]
impl Probe for RdnsProbe {
    fn id(&self) -> ProbeId {
        ProbeId::Rdns
    }

    async fn collect(&self, target: &Target) -> Result<Evidence, ProbeError> {
        let started = Instant::now();
        let host = target.hostname();
        let addresses = resolve_addresses(self.resolver.as_ref(), host)
            .await
            .map_err(|err| ProbeError::Dns(err.to_string()))?;
        let address = addresses
            .iter()
            .find_map(|ip| match ip {
                IpAddr::V4(v4) => Some(*v4),
                IpAddr::V6(_) => None,
            })
            .ok_or_else(|| ProbeError::NoIpv4(host.to_string()))?;
        let names = self
            .resolver
            .reverse_lookup(IpAddr::V4(address))
            .await
            .map_err(|err| ProbeError::Dns(err.to_string()))?;
        let resolved_hosts: Vec<String> = names
            .iter()
            .map(|name| strip_root_dot(name))
            .filter(|name| !name.is_empty())
            .collect();
        if resolved_hosts.is_empty() {
            return Err(ProbeError::Dns(format!("no PTR records for {address}")));
        }
        Ok(Evidence::Rdns(RdnsEvidence {
            address,
            resolved_hosts,
            elapsed: started.elapsed(),
        }))
    }
}
