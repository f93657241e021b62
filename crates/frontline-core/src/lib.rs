// crates/frontline-core/src/lib.rs
// ============================================================================
// Module: Frontline Core Library
// Description: Public API surface for the Frontline fingerprinting engine.
// Purpose: Expose evidence types, probe interfaces, and the classification runtime.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Frontline infers which managed cloud front-end serves a hostname from
//! externally observable signals. Independent probes collect typed evidence,
//! the orchestrator merges it into an [`EvidenceAggregate`], and an ordered
//! [`ClassificationPolicy`] maps the aggregate to one [`Classification`].
//!
//! This crate performs no network I/O itself; probes are supplied through the
//! [`Probe`] interface.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::NoopObserver;
pub use interfaces::Probe;
pub use interfaces::ProbeError;
pub use interfaces::ProbeEvent;
pub use interfaces::ProbeEventKind;
pub use interfaces::ProbeObserver;
pub use interfaces::RecordingObserver;
pub use interfaces::duration_millis;
pub use runtime::AlbRule;
pub use runtime::ClassificationPolicy;
pub use runtime::Decision;
pub use runtime::EdgeApiRule;
pub use runtime::FingerprintReport;
pub use runtime::Fingerprinter;
pub use runtime::NlbRule;
pub use runtime::OrchestratorError;
pub use runtime::ProbeDescriptor;
pub use runtime::ProbeOrchestrator;
pub use runtime::RegionalApiRule;
pub use runtime::RuleTrace;
pub use runtime::SignatureRule;
