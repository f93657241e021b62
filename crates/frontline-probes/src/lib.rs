// crates/frontline-probes/src/lib.rs
// ============================================================================
// Module: Frontline Probes
// Description: Built-in network probes and the probe registry.
// Purpose: Collect DNS, TLS, and HTTP evidence about a target hostname.
// Dependencies: frontline-core, hickory-resolver, reqwest, rustls, x509-parser
// ============================================================================

//! ## Overview
//! This crate ships the four built-in probes (CNAME, HTTPS, raw HTTP/1.0, and
//! reverse DNS), the [`DnsResolver`] boundary they share, and a registry that
//! builds orchestrator descriptors from configuration. Every probe resolves the
//! target on its own and never depends on another probe's result.
//! Invariants:
//! - TLS certificate validation is disabled for every probe connection.
//! - Raw response reads are bounded by [`ProbeNetworkConfig`].
//!
//! Security posture: targets and their responses are untrusted input.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod certificate;
pub mod cname;
pub mod dns;
pub mod headers;
pub mod http;
pub mod http10;
pub mod network;
pub mod rdns;
pub mod registry;
pub mod tls;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use cname::CnameProbe;
pub use dns::DnsError;
pub use dns::DnsResolver;
pub use dns::SystemResolver;
pub use http::HttpProbe;
pub use http10::Http10Probe;
pub use network::ProbeNetworkConfig;
pub use rdns::RdnsProbe;
pub use registry::BuiltinProbeConfigs;
pub use registry::DEFAULT_PROBE_TIMEOUT;
pub use registry::DEFAULT_PROBE_TIMEOUT_MS;
pub use registry::builtin_probes;
