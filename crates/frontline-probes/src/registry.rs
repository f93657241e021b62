// crates/frontline-probes/src/registry.rs
// ============================================================================
// Module: Built-in Probe Registry
// Description: Construction of the built-in probe descriptors.
// Purpose: Turn configuration into an ordered, orchestrator-ready probe set.
// Dependencies: frontline-core
// ============================================================================

//! ## Overview
//! The registry replaces process-wide probe registration with an explicit
//! configuration bundle. Descriptors are returned in canonical probe order
//! regardless of the order of the enabled list, and every probe shares one
//! resolver.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use frontline_core::Probe;
use frontline_core::ProbeDescriptor;
use frontline_core::ProbeError;
use frontline_core::ProbeId;

use crate::CnameProbe;
use crate::DnsResolver;
use crate::Http10Probe;
use crate::HttpProbe;
use crate::ProbeNetworkConfig;
use crate::RdnsProbe;

// ============================================================================
// SECTION: Built-in Config
// ============================================================================

/// Default per-probe timeout in milliseconds.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 5_000;
/// Default per-probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS);

/// Configuration bundle for built-in probes.
///
/// # Invariants
/// - `timeout` applies to each probe independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinProbeConfigs {
    /// Per-probe timeout enforced by the orchestrator.
    pub timeout: Duration,
    /// Socket limits shared by the network probes.
    pub network: ProbeNetworkConfig,
}

impl Default for BuiltinProbeConfigs {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_PROBE_TIMEOUT,
            network: ProbeNetworkConfig::default(),
        }
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Builds descriptors for the enabled built-in probes in canonical order.
///
/// # Errors
///
/// Returns [`ProbeError`] when a probe cannot be initialized.
pub fn builtin_probes(
    configs: &BuiltinProbeConfigs,
    enabled: &[ProbeId],
    resolver: &Arc<dyn DnsResolver>,
) -> Result<Vec<ProbeDescriptor>, ProbeError> {
    let mut descriptors = Vec::with_capacity(enabled.len());
    for id in ProbeId::ALL.into_iter().filter(|id| enabled.contains(id)) {
        let probe: Arc<dyn Probe> = match id {
            ProbeId::Http => {
                Arc::new(HttpProbe::new(Arc::clone(resolver), configs.network.clone())?)
            }
            ProbeId::Http10 => {
                Arc::new(Http10Probe::new(Arc::clone(resolver), configs.network.clone())?)
            }
            ProbeId::Cname => Arc::new(CnameProbe::new(Arc::clone(resolver))),
            ProbeId::Rdns => Arc::new(RdnsProbe::new(Arc::clone(resolver))),
        };
        descriptors.push(ProbeDescriptor::new(probe, configs.timeout));
    }
    Ok(descriptors)
}
