// crates/frontline-core/src/runtime/orchestrator.rs
// ============================================================================
// Module: Probe Orchestrator
// Description: Concurrent execution of registered probes against one target.
// Purpose: Isolate per-probe failure and assemble the evidence aggregate.
// Dependencies: crate::{core, interfaces}, thiserror, tokio
// ============================================================================

//! ## Overview
//! The orchestrator spawns every registered probe as its own task with its own
//! timeout. Failures, timeouts, panics, and mismatched evidence variants are
//! reported to the observer and leave the probe's key absent; they never abort
//! sibling probes. Results are inserted into the aggregate at a single join
//! point, so the aggregate is never written concurrently.
//! Invariants:
//! - Probe identities are unique within an orchestrator.
//! - [`ProbeOrchestrator::collect`] always returns an aggregate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::core::Evidence;
use crate::core::EvidenceAggregate;
use crate::core::ProbeId;
use crate::core::Target;
use crate::interfaces::Probe;
use crate::interfaces::ProbeError;
use crate::interfaces::ProbeEvent;
use crate::interfaces::ProbeEventKind;
use crate::interfaces::ProbeObserver;
use crate::interfaces::duration_millis;

// ============================================================================
// SECTION: Descriptors
// ============================================================================

/// Registered probe with its time budget.
#[derive(Clone)]
pub struct ProbeDescriptor {
    /// Probe implementation.
    pub probe: Arc<dyn Probe>,
    /// Maximum time the probe may run.
    pub timeout: Duration,
}

impl ProbeDescriptor {
    /// Creates a descriptor for a probe.
    #[must_use]
    pub fn new(probe: Arc<dyn Probe>, timeout: Duration) -> Self {
        Self {
            probe,
            timeout,
        }
    }

    /// Returns the probe identity.
    #[must_use]
    pub fn id(&self) -> ProbeId {
        self.probe.id()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Orchestrator setup errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    /// No probes were registered.
    #[error("at least one probe must be registered")]
    Empty,
    /// Two descriptors share a probe identity.
    #[error("probe registered more than once: {0}")]
    Duplicate(ProbeId),
    /// A probe was given a zero timeout.
    #[error("probe timeout must be non-zero: {0}")]
    ZeroTimeout(ProbeId),
}

// ============================================================================
// SECTION: Orchestrator
// ============================================================================

/// Runs registered probes concurrently and merges their evidence.
pub struct ProbeOrchestrator {
    /// Probes in registration order.
    descriptors: Vec<ProbeDescriptor>,
    /// Sink for lifecycle events.
    observer: Arc<dyn ProbeObserver>,
}

impl ProbeOrchestrator {
    /// Creates an orchestrator over the given probes.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError`] when the probe set is empty, contains a
    /// duplicate identity, or carries a zero timeout.
    pub fn new(
        descriptors: Vec<ProbeDescriptor>,
        observer: Arc<dyn ProbeObserver>,
    ) -> Result<Self, OrchestratorError> {
        if descriptors.is_empty() {
            return Err(OrchestratorError::Empty);
        }
        let mut seen = Vec::with_capacity(descriptors.len());
        for descriptor in &descriptors {
            let id = descriptor.id();
            if seen.contains(&id) {
                return Err(OrchestratorError::Duplicate(id));
            }
            if descriptor.timeout.is_zero() {
                return Err(OrchestratorError::ZeroTimeout(id));
            }
            seen.push(id);
        }
        Ok(Self {
            descriptors,
            observer,
        })
    }

    /// Returns the registered probe identities in registration order.
    #[must_use]
    pub fn probe_ids(&self) -> Vec<ProbeId> {
        self.descriptors.iter().map(ProbeDescriptor::id).collect()
    }

    /// Runs every probe against the target and returns the merged evidence.
    ///
    /// Must be called within a Tokio runtime. Probe failures are absorbed; the
    /// aggregate is empty when every probe fails.
    pub async fn collect(&self, target: &Target) -> EvidenceAggregate {
        let handles: Vec<(ProbeId, JoinHandle<Option<Evidence>>)> = self
            .descriptors
            .iter()
            .map(|descriptor| {
                let id = descriptor.id();
                let handle = tokio::spawn(supervise(
                    id,
                    Arc::clone(&descriptor.probe),
                    descriptor.timeout,
                    target.clone(),
                    Arc::clone(&self.observer),
                ));
                (id, handle)
            })
            .collect();

        let mut aggregate = EvidenceAggregate::new();
        for (id, handle) in handles {
            match handle.await {
                Ok(Some(evidence)) => {
                    if let Err(err) = aggregate.insert(evidence) {
                        self.report_failure(id, target, &ProbeError::Internal(err.to_string()));
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    self.report_failure(id, target, &ProbeError::Internal(err.to_string()));
                }
            }
        }
        aggregate
    }

    /// Reports a failure detected at the join point.
    fn report_failure(&self, id: ProbeId, target: &Target, error: &ProbeError) {
        self.observer.on_event(&ProbeEvent::new(
            id,
            target,
            ProbeEventKind::Failed {
                elapsed_ms: 0,
                error: error.to_string(),
            },
        ));
    }
}

// ============================================================================
// SECTION: Probe Supervision
// ============================================================================

/// Runs one probe under its timeout and reports its lifecycle.
async fn supervise(
    id: ProbeId,
    probe: Arc<dyn Probe>,
    timeout: Duration,
    target: Target,
    observer: Arc<dyn ProbeObserver>,
) -> Option<Evidence> {
    observer.on_event(&ProbeEvent::new(id, &target, ProbeEventKind::Started));
    let started = Instant::now();

    let probe_target = target.clone();
    let mut task = tokio::spawn(async move { probe.collect(&probe_target).await });
    let outcome = match tokio::time::timeout(timeout, &mut task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(ProbeError::Internal(join_err.to_string())),
        Err(_) => {
            task.abort();
            observer.on_event(&ProbeEvent::new(
                id,
                &target,
                ProbeEventKind::TimedOut {
                    timeout_ms: duration_millis(timeout),
                },
            ));
            return None;
        }
    };

    let elapsed_ms = duration_millis(started.elapsed());
    let outcome = outcome.and_then(|evidence| {
        if evidence.probe_id() == id {
            Ok(evidence)
        } else {
            Err(ProbeError::Internal(format!(
                "probe {id} returned {} evidence",
                evidence.probe_id()
            )))
        }
    });
    match outcome {
        Ok(evidence) => {
            observer.on_event(&ProbeEvent::new(
                id,
                &target,
                ProbeEventKind::Completed {
                    elapsed_ms,
                    evidence: evidence.clone(),
                },
            ));
            Some(evidence)
        }
        Err(err) => {
            observer.on_event(&ProbeEvent::new(
                id,
                &target,
                ProbeEventKind::Failed {
                    elapsed_ms,
                    error: err.to_string(),
                },
            ));
            None
        }
    }
}
