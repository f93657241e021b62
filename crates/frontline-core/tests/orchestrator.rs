// crates/frontline-core/tests/orchestrator.rs
// ============================================================================
// Module: Probe Orchestrator Tests
// Description: Failure isolation, timeouts, setup validation, and events.
// Purpose: Ensure probe failures leave keys absent without aborting the run.
// ============================================================================

//! Orchestrator and fingerprint engine tests using scripted probes.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use frontline_core::Classification;
use frontline_core::ClassificationPolicy;
use frontline_core::Fingerprinter;
use frontline_core::NoopObserver;
use frontline_core::OrchestratorError;
use frontline_core::ProbeDescriptor;
use frontline_core::ProbeError;
use frontline_core::ProbeEventKind;
use frontline_core::ProbeId;
use frontline_core::ProbeOrchestrator;
use frontline_core::RecordingObserver;
use frontline_core::SignatureTable;

mod common;
use crate::common::API_HOST;
use crate::common::PanickingProbe;
use crate::common::ScriptedProbe;
use crate::common::cname;
use crate::common::http;
use crate::common::http10;
use crate::common::rdns;
use crate::common::target;

const TIMEOUT: Duration = Duration::from_secs(2);

fn descriptor(probe: impl frontline_core::Probe + 'static) -> ProbeDescriptor {
    ProbeDescriptor::new(Arc::new(probe), TIMEOUT)
}

// ============================================================================
// SECTION: Setup Validation
// ============================================================================

#[test]
fn new_rejects_empty_probe_set() {
    let result = ProbeOrchestrator::new(Vec::new(), Arc::new(NoopObserver));
    assert!(matches!(result, Err(OrchestratorError::Empty)));
}

#[test]
fn new_rejects_duplicate_probe_ids() {
    let result = ProbeOrchestrator::new(
        vec![
            descriptor(ScriptedProbe::ok(ProbeId::Cname, cname(API_HOST))),
            descriptor(ScriptedProbe::ok(ProbeId::Cname, cname(API_HOST))),
        ],
        Arc::new(NoopObserver),
    );
    assert!(matches!(result, Err(OrchestratorError::Duplicate(ProbeId::Cname))));
}

#[test]
fn new_rejects_zero_timeout() {
    let result = ProbeOrchestrator::new(
        vec![ProbeDescriptor::new(
            Arc::new(ScriptedProbe::ok(ProbeId::Rdns, rdns("host"))),
            Duration::ZERO,
        )],
        Arc::new(NoopObserver),
    );
    assert!(matches!(result, Err(OrchestratorError::ZeroTimeout(ProbeId::Rdns))));
}

// ============================================================================
// SECTION: Collection
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn collect_merges_successful_probes() {
    let orchestrator = ProbeOrchestrator::new(
        vec![
            descriptor(ScriptedProbe::ok(ProbeId::Cname, cname(API_HOST))),
            descriptor(ScriptedProbe::ok(ProbeId::Http, http(2, false, &[]))),
            descriptor(ScriptedProbe::ok(ProbeId::Http10, http10(&[]))),
            descriptor(ScriptedProbe::ok(ProbeId::Rdns, rdns("host"))),
        ],
        Arc::new(NoopObserver),
    )
    .unwrap();
    let evidence = orchestrator.collect(&target("api.example.com")).await;
    assert_eq!(evidence.len(), 4);
    assert_eq!(evidence.cname().unwrap().resolved_domain, API_HOST);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_probe_leaves_key_absent() {
    let observer = Arc::new(RecordingObserver::new());
    let orchestrator = ProbeOrchestrator::new(
        vec![
            descriptor(ScriptedProbe::ok(ProbeId::Cname, cname(API_HOST))),
            descriptor(ScriptedProbe::err(
                ProbeId::Http,
                ProbeError::Tls("handshake failure".to_string()),
            )),
        ],
        observer.clone(),
    )
    .unwrap();
    let evidence = orchestrator.collect(&target("api.example.com")).await;
    assert!(evidence.contains(ProbeId::Cname));
    assert!(!evidence.contains(ProbeId::Http));

    let failures: Vec<_> = observer.events().into_iter().filter(|event| event.is_failure()).collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].probe, ProbeId::Http);
    match &failures[0].kind {
        ProbeEventKind::Failed {
            error, ..
        } => assert!(error.contains("handshake failure")),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn slow_probe_times_out_without_blocking_siblings() {
    let observer = Arc::new(RecordingObserver::new());
    let orchestrator = ProbeOrchestrator::new(
        vec![
            ProbeDescriptor::new(
                Arc::new(
                    ScriptedProbe::ok(ProbeId::Rdns, rdns("host")).delayed(Duration::from_secs(30)),
                ),
                Duration::from_millis(50),
            ),
            descriptor(ScriptedProbe::ok(ProbeId::Cname, cname(API_HOST))),
        ],
        observer.clone(),
    )
    .unwrap();
    let started = Instant::now();
    let evidence = orchestrator.collect(&target("api.example.com")).await;
    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(!evidence.contains(ProbeId::Rdns));
    assert!(evidence.contains(ProbeId::Cname));
    assert!(observer.events().iter().any(|event| {
        event.probe == ProbeId::Rdns
            && event.kind
                == ProbeEventKind::TimedOut {
                    timeout_ms: 50,
                }
    }));
}

#[tokio::test(flavor = "multi_thread")]
async fn collection_runs_descriptors_concurrently() {
    let delay = Duration::from_millis(300);
    let orchestrator = ProbeOrchestrator::new(
        vec![
            descriptor(ScriptedProbe::ok(ProbeId::Cname, cname(API_HOST)).delayed(delay)),
            descriptor(ScriptedProbe::ok(ProbeId::Http10, http10(&[])).delayed(delay)),
            descriptor(ScriptedProbe::ok(ProbeId::Rdns, rdns("host")).delayed(delay)),
        ],
        Arc::new(NoopObserver),
    )
    .unwrap();
    let started = Instant::now();
    let evidence = orchestrator.collect(&target("api.example.com")).await;
    let elapsed = started.elapsed();
    assert_eq!(evidence.len(), 3);
    assert!(elapsed >= delay, "finished before any probe could: {elapsed:?}");
    assert!(elapsed < Duration::from_millis(600), "probes ran sequentially: {elapsed:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn panicking_probe_is_a_failure() {
    let observer = Arc::new(RecordingObserver::new());
    let orchestrator = ProbeOrchestrator::new(
        vec![
            descriptor(PanickingProbe(ProbeId::Http10)),
            descriptor(ScriptedProbe::ok(ProbeId::Cname, cname(API_HOST))),
        ],
        observer.clone(),
    )
    .unwrap();
    let evidence = orchestrator.collect(&target("api.example.com")).await;
    assert_eq!(evidence.len(), 1);
    assert!(
        observer.events().iter().any(|event| event.probe == ProbeId::Http10 && event.is_failure())
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn mismatched_variant_is_dropped() {
    let observer = Arc::new(RecordingObserver::new());
    let orchestrator = ProbeOrchestrator::new(
        vec![descriptor(ScriptedProbe::ok(ProbeId::Http, cname(API_HOST)))],
        observer.clone(),
    )
    .unwrap();
    let evidence = orchestrator.collect(&target("api.example.com")).await;
    assert!(evidence.is_empty());
    assert!(observer.events().iter().any(|event| event.is_failure()));
}

#[tokio::test(flavor = "multi_thread")]
async fn observer_sees_start_and_completion() {
    let observer = Arc::new(RecordingObserver::new());
    let orchestrator = ProbeOrchestrator::new(
        vec![descriptor(ScriptedProbe::ok(ProbeId::Cname, cname(API_HOST)))],
        observer.clone(),
    )
    .unwrap();
    orchestrator.collect(&target("api.example.com")).await;
    let events = observer.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, ProbeEventKind::Started);
    assert!(matches!(events[1].kind, ProbeEventKind::Completed { .. }));
    assert_eq!(events[1].target, "api.example.com");

    let json = serde_json::to_value(&events[1]).unwrap();
    assert_eq!(json["event"], "probe_completed");
    assert_eq!(json["probe"], "CNAME");
}

// ============================================================================
// SECTION: Fingerprinter
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn all_probes_failing_reports_unknown() {
    let partition = || ProbeError::Connect("network unreachable".to_string());
    let orchestrator = ProbeOrchestrator::new(
        ProbeId::ALL
            .into_iter()
            .map(|id| descriptor(ScriptedProbe::err(id, partition())))
            .collect(),
        Arc::new(NoopObserver),
    )
    .unwrap();
    let policy = ClassificationPolicy::standard(&SignatureTable::default()).unwrap();
    let fingerprinter = Fingerprinter::new(orchestrator, policy);
    let report = fingerprinter.fingerprint(&target("unreachable.example.com")).await;
    assert_eq!(report.classification, Classification::Unknown);
    assert_eq!(report.label, "Unknown");
    assert!(report.evidence.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn fingerprint_classifies_edge_api() {
    let orchestrator = ProbeOrchestrator::new(
        vec![
            descriptor(ScriptedProbe::ok(ProbeId::Cname, cname(API_HOST))),
            descriptor(ScriptedProbe::ok(
                ProbeId::Http,
                http(
                    4,
                    false,
                    &[("X-Amz-Apigw-Id", "id"), ("X-Amz-Cf-Pop", "IAD89"), ("Via", "1.1 x")],
                ),
            )),
            descriptor(ScriptedProbe::ok(ProbeId::Http10, http10(&[("Server", "CloudFront")]))),
        ],
        Arc::new(NoopObserver),
    )
    .unwrap();
    let policy = ClassificationPolicy::standard(&SignatureTable::default()).unwrap();
    let report = Fingerprinter::new(orchestrator, policy)
        .fingerprint(&target("api.example.com"))
        .await;
    assert_eq!(report.classification, Classification::EdgeApi);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["label"], "API Gateway: Edge API");
    assert_eq!(json["evidence"]["CNAME"]["kind"], "cname");
}
