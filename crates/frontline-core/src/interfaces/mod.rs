// crates/frontline-core/src/interfaces/mod.rs
// ============================================================================
// Module: Frontline Interfaces
// Description: Probe and observer contracts used by the orchestrator.
// Purpose: Define the seams between evidence collection and its consumers.
// Dependencies: crate::core, async-trait, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`Probe`] performs one kind of network interaction against a target and
//! returns a single typed evidence record. A [`ProbeObserver`] receives
//! structured lifecycle events from the orchestrator; probes themselves never
//! print or log.
//!
//! Security posture: probe targets and responses are untrusted network input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::core::Evidence;
use crate::core::ProbeId;
use crate::core::Target;

// ============================================================================
// SECTION: Probe
// ============================================================================

/// Probe failures. Every variant is recoverable at the orchestrator boundary.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// DNS resolution failed.
    #[error("dns error: {0}")]
    Dns(String),
    /// TCP connection could not be established.
    #[error("connect error: {0}")]
    Connect(String),
    /// TLS handshake or session failure.
    #[error("tls error: {0}")]
    Tls(String),
    /// HTTP request or response failure.
    #[error("http error: {0}")]
    Http(String),
    /// Peer response violated the expected protocol.
    #[error("protocol error: {0}")]
    Protocol(String),
    /// Forward lookup produced no IPv4 address.
    #[error("no IPv4 addresses found for {0}")]
    NoIpv4(String),
    /// Probe exceeded its time budget.
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),
    /// Internal failure such as a panicked or mismatched probe.
    #[error("internal probe error: {0}")]
    Internal(String),
}

/// Independent unit of evidence collection.
///
/// Implementations must be self-contained: each probe resolves the target on
/// its own and never depends on another probe's result.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Returns the probe identity and evidence key.
    fn id(&self) -> ProbeId;

    /// Collects evidence about the target.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when evidence cannot be collected.
    async fn collect(&self, target: &Target) -> Result<Evidence, ProbeError>;
}

// ============================================================================
// SECTION: Observer Events
// ============================================================================

/// Lifecycle stage reported for a probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProbeEventKind {
    /// Probe task started.
    #[serde(rename = "probe_started")]
    Started,
    /// Probe produced evidence.
    #[serde(rename = "probe_completed")]
    Completed {
        /// Elapsed wall-clock time in milliseconds.
        elapsed_ms: u64,
        /// Evidence recorded for the probe.
        evidence: Evidence,
    },
    /// Probe failed; its evidence key stays absent.
    #[serde(rename = "probe_failed")]
    Failed {
        /// Elapsed wall-clock time in milliseconds.
        elapsed_ms: u64,
        /// Failure description.
        error: String,
    },
    /// Probe exceeded its timeout; its evidence key stays absent.
    #[serde(rename = "probe_timed_out")]
    TimedOut {
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },
}

/// Structured probe lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeEvent {
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Probe the event refers to.
    pub probe: ProbeId,
    /// Target hostname.
    pub target: String,
    /// Lifecycle stage and payload.
    #[serde(flatten)]
    pub kind: ProbeEventKind,
}

impl ProbeEvent {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn new(probe: ProbeId, target: &Target, kind: ProbeEventKind) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            timestamp_ms,
            probe,
            target: target.hostname().to_string(),
            kind,
        }
    }

    /// Returns true for failure and timeout events.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(
            self.kind,
            ProbeEventKind::Failed {
                ..
            } | ProbeEventKind::TimedOut {
                ..
            }
        )
    }
}

/// Converts a duration into whole milliseconds, saturating.
#[must_use]
pub fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// ============================================================================
// SECTION: Observer Trait
// ============================================================================

/// Sink for probe lifecycle events.
pub trait ProbeObserver: Send + Sync {
    /// Records a probe event.
    fn on_event(&self, event: &ProbeEvent);
}

/// Observer that discards events.
///
/// # Invariants
/// - Events are intentionally dropped.
pub struct NoopObserver;

impl ProbeObserver for NoopObserver {
    fn on_event(&self, _event: &ProbeEvent) {}
}

/// Observer that keeps every event in memory.
#[derive(Default)]
pub struct RecordingObserver {
    /// Events in arrival order.
    events: Mutex<Vec<ProbeEvent>>,
}

impl RecordingObserver {
    /// Creates an empty recording observer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<ProbeEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl ProbeObserver for RecordingObserver {
    fn on_event(&self, event: &ProbeEvent) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event.clone());
    }
}
