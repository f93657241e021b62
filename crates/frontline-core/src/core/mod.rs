// crates/frontline-core/src/core/mod.rs
// ============================================================================
// Module: Frontline Core Types
// Description: Identifiers, evidence records, labels, and signature tables.
// Purpose: Provide stable, serializable types shared by probes and rules.
// Dependencies: regex, serde
// ============================================================================

//! ## Overview
//! Core types are plain data: they perform no I/O and carry the invariants the
//! orchestrator and classification policy rely on.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod classification;
pub mod evidence;
pub mod identifiers;
pub mod signatures;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use classification::ALB_IPV6_LABEL;
pub use classification::ALB_LABEL;
pub use classification::Classification;
pub use classification::EDGE_API_LABEL;
pub use classification::NLB_IPV6_LABEL;
pub use classification::NLB_LABEL;
pub use classification::REGIONAL_API_LABEL;
pub use classification::RuleOutcome;
pub use classification::UNKNOWN_LABEL;
pub use evidence::AggregateError;
pub use evidence::CertIssuer;
pub use evidence::CertificateSummary;
pub use evidence::CnameEvidence;
pub use evidence::Evidence;
pub use evidence::EvidenceAggregate;
pub use evidence::Http10Evidence;
pub use evidence::HttpEvidence;
pub use evidence::RdnsEvidence;
pub use evidence::TlsDetails;
pub use evidence::canonical_header_name;
pub use identifiers::ProbeId;
pub use identifiers::Target;
pub use identifiers::TargetError;
pub use identifiers::UnknownProbeId;
pub use signatures::DEFAULT_ALB_HOST_PATTERN;
pub use signatures::DEFAULT_API_GATEWAY_HOST_PATTERN;
pub use signatures::DEFAULT_NLB_HOST_PATTERN;
pub use signatures::HostPattern;
pub use signatures::SignatureError;
pub use signatures::SignatureTable;
