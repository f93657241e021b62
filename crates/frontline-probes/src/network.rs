// crates/frontline-probes/src/network.rs
// ============================================================================
// Module: Probe Network Settings
// Description: Ports, timeouts, and size limits shared by network probes.
// Purpose: Bound every socket operation a probe performs.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`ProbeNetworkConfig`] is deserialized from the `[probes.network]` table and
//! shared by every built-in probe. Timeouts bound individual socket operations;
//! the orchestrator's per-probe timeout bounds the probe as a whole.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Network limits for the built-in probes.
///
/// # Invariants
/// - `max_response_head_bytes` bounds the raw HTTP/1.0 response head.
/// - Timeouts apply per socket operation, not per probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeNetworkConfig {
    /// TLS port used by the HTTPS and HTTP/1.0 probes.
    pub https_port: u16,
    /// TCP connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Socket read and write timeout in milliseconds.
    pub io_timeout_ms: u64,
    /// Maximum bytes read for a raw response head.
    pub max_response_head_bytes: usize,
    /// User agent sent by the HTTPS probe.
    pub user_agent: String,
}

impl Default for ProbeNetworkConfig {
    fn default() -> Self {
        Self {
            https_port: 443,
            connect_timeout_ms: 3_000,
            io_timeout_ms: 3_000,
            max_response_head_bytes: 64 * 1024,
            user_agent: concat!("frontline/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ProbeNetworkConfig {
    /// Returns the TCP connect timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Returns the socket read and write timeout.
    #[must_use]
    pub const fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }
}
