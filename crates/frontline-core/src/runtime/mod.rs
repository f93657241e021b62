// crates/frontline-core/src/runtime/mod.rs
// ============================================================================
// Module: Frontline Runtime
// Description: Orchestration, signature rules, policy, and the engine.
// Purpose: Turn a target hostname into a classification with evidence.
// Dependencies: crate::{core, interfaces}, tokio
// ============================================================================

//! ## Overview
//! Runtime components execute probes concurrently, then evaluate rules
//! synchronously after the join point.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod engine;
pub mod orchestrator;
pub mod policy;
pub mod rules;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use engine::FingerprintReport;
pub use engine::Fingerprinter;
pub use orchestrator::OrchestratorError;
pub use orchestrator::ProbeDescriptor;
pub use orchestrator::ProbeOrchestrator;
pub use policy::ClassificationPolicy;
pub use policy::Decision;
pub use policy::RuleTrace;
pub use rules::AlbRule;
pub use rules::EdgeApiRule;
pub use rules::NlbRule;
pub use rules::RegionalApiRule;
pub use rules::SignatureRule;
