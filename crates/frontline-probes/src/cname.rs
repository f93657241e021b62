// crates/frontline-probes/src/cname.rs
// ============================================================================
// Module: CNAME Probe
// Description: Canonical-name resolution for the target hostname.
// Purpose: Provide the resolved name every host pattern is matched against.
// Dependencies: frontline-core, async-trait
// ============================================================================

//! ## Overview
//! A missing CNAME is a benign miss: the probe succeeds with `was_cname` false
//! and the target itself as the resolved name. Only resolver transport errors
//! fail the probe.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use frontline_core::CnameEvidence;
use frontline_core::Evidence;
use frontline_core::Probe;
use frontline_core::ProbeError;
use frontline_core::ProbeId;
use frontline_core::Target;

use crate::dns::DnsError;
use crate::dns::DnsResolver;
use crate::dns::strip_root_dot;

// ============================================================================
// SECTION: Probe
// ============================================================================

/// Canonical-name probe.
pub struct CnameProbe {
    /// Resolver used for the lookup.
    resolver: Arc<dyn DnsResolver>,
}

impl CnameProbe {
    /// Creates a CNAME probe.
    #[must_use]
    pub fn new(resolver: Arc<dyn DnsResolver>) -> Self {
        Self {
            resolver,
        }
    }
}

#[async_trait]
impl Probe for CnameProbe {
    fn id(&self) -> ProbeId {
        ProbeId::Cname
    }

    async fn collect(&self, target: &Target) -> Result<Evidence, ProbeError> {
        let host = strip_root_dot(target.hostname());
        let resolved = match self.resolver.canonical_name(&host).await {
            Ok(resolved) => resolved.map(|name| strip_root_dot(&name)),
            Err(DnsError::NoRecords(_)) => None,
            Err(err @ DnsError::Lookup(_)) => return Err(ProbeError::Dns(err.to_string())),
        };
        let evidence = match resolved {
            Some(name) if !name.is_empty() && !name.eq_ignore_ascii_case(&host) => CnameEvidence {
                was_cname: true,
                resolved_domain: name,
            },
            _ => CnameEvidence {
                was_cname: false,
                resolved_domain: host,
            },
        };
        Ok(Evidence::Cname(evidence))
    }
}
