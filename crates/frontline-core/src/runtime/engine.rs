// crates/frontline-core/src/runtime/engine.rs
// ============================================================================
// Module: Fingerprint Engine
// Description: Collect-then-classify pipeline for one target.
// Purpose: Combine the orchestrator and policy behind a single entry point.
// Dependencies: crate::{core, runtime}, serde
// ============================================================================

//! ## Overview
//! [`Fingerprinter::fingerprint`] runs every probe, waits for all of them to
//! finish or time out, then classifies the merged evidence. Once constructed
//! it never fails: a run where every probe fails reports `Unknown`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::Classification;
use crate::core::EvidenceAggregate;
use crate::core::Target;
use crate::runtime::orchestrator::ProbeOrchestrator;
use crate::runtime::policy::ClassificationPolicy;
use crate::runtime::policy::RuleTrace;

// ============================================================================
// SECTION: Report
// ============================================================================

/// Result of one fingerprinting run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FingerprintReport {
    /// Target that was probed.
    pub target: Target,
    /// Selected classification.
    pub classification: Classification,
    /// Fixed display label for `classification`.
    pub label: &'static str,
    /// Evidence collected during the run.
    pub evidence: EvidenceAggregate,
    /// Rule evaluation trace.
    pub trace: Vec<RuleTrace>,
}

// ============================================================================
// SECTION: Fingerprinter
// ============================================================================

/// Probe orchestrator paired with a classification policy.
pub struct Fingerprinter {
    /// Evidence collection.
    orchestrator: ProbeOrchestrator,
    /// Evidence classification.
    policy: ClassificationPolicy,
}

impl Fingerprinter {
    /// Creates a fingerprinter.
    #[must_use]
    pub const fn new(orchestrator: ProbeOrchestrator, policy: ClassificationPolicy) -> Self {
        Self {
            orchestrator,
            policy,
        }
    }

    /// Returns the configured policy.
    #[must_use]
    pub const fn policy(&self) -> &ClassificationPolicy {
        &self.policy
    }

    /// Probes the target and classifies the collected evidence.
    pub async fn fingerprint(&self, target: &Target) -> FingerprintReport {
        let evidence = self.orchestrator.collect(target).await;
        let decision = self.policy.evaluate(&evidence);
        FingerprintReport {
            target: target.clone(),
            classification: decision.classification,
            label: decision.classification.label(),
            evidence,
            trace: decision.trace,
        }
    }
}
