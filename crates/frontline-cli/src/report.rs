// crates/frontline-cli/src/report.rs
// ============================================================================
// Module: Report Rendering
// Description: Text and JSON renderings of a fingerprint report.
// Purpose: Produce the stdout output of the `classify` command.
// Dependencies: frontline-core, serde_json
// ============================================================================

//! ## Overview
//! The text form prints the target, its addresses and certificate issuer, the
//! resolved name, and the classification label. Debug mode appends the raw evidence of every probe that produced
//! any, followed by the rule trace. Absent evidence is reported as such
//! rather than omitted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use frontline_core::FingerprintReport;
use frontline_core::ProbeId;
use frontline_core::RuleOutcome;

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders the report as human-readable text.
#[must_use]
pub fn render_text(report: &FingerprintReport, debug: bool) -> String {
    let mut out = String::new();
    let resolved = report
        .evidence
        .cname()
        .map_or("unavailable", |cname| cname.resolved_domain.as_str());
    push_line(&mut out, &format!("Target: {}", report.target.hostname()));
    match report.evidence.http() {
        Some(http) => {
            push_line(&mut out, &format!("IPv4: {}", join_addresses(&http.ipv4)));
            push_line(&mut out, &format!("IPv6: {}", join_addresses(&http.ipv6)));
            push_line(&mut out, &format!("Cert Issuer: {}", http.cert_issuer.as_str()));
        }
        None => {
            push_line(&mut out, "IPv4: unavailable");
            push_line(&mut out, "IPv6: unavailable");
            push_line(&mut out, "Cert Issuer: unavailable");
        }
    }
    push_line(&mut out, &format!("Resolved Domain: {resolved}"));
    push_line(&mut out, &format!("Classification: {}", report.label));
    if debug {
        render_evidence(&mut out, report);
        render_trace(&mut out, report);
    }
    out
}

/// Renders the full report as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`serde_json::Error`] when serialization fails.
pub fn render_json(report: &FingerprintReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

// ============================================================================
// SECTION: Debug Sections
// ============================================================================

/// Appends per-probe evidence in canonical probe order.
fn render_evidence(out: &mut String, report: &FingerprintReport) {
    let evidence = &report.evidence;
    for id in ProbeId::ALL {
        push_line(out, &format!("=== {} ===", id.as_str()));
        if !evidence.contains(id) {
            push_line(out, "no evidence");
            continue;
        }
        match id {
            ProbeId::Http => {
                if let Some(http) = evidence.http() {
                    push_line(out, &format!("Final Host: {}", http.final_host));
                    push_line(out, &format!("TLS Version: {}", http.tls.protocol_version));
                    push_line(out, &format!("Cipher Suite: {}", http.tls.cipher_suite));
                    for cert in &http.tls.certificates {
                        push_line(out, &format!("Certificate Subject: {}", cert.subject));
                        push_line(out, &format!("Certificate Issuer: {}", cert.issuer));
                    }
                    for (name, value) in &http.headers {
                        push_line(out, &format!("{name}: {value}"));
                    }
                }
            }
            ProbeId::Http10 => {
                if let Some(http10) = evidence.http10() {
                    push_line(out, &format!("Status: {}", http10.status));
                    for (name, value) in &http10.headers {
                        push_line(out, &format!("{name}: {value}"));
                    }
                }
            }
            ProbeId::Cname => {
                if let Some(cname) = evidence.cname() {
                    push_line(out, &format!("Was CNAME: {}", cname.was_cname));
                    push_line(out, &format!("Resolved Domain: {}", cname.resolved_domain));
                }
            }
            ProbeId::Rdns => {
                if let Some(rdns) = evidence.rdns() {
                    push_line(out, &format!("Address: {}", rdns.address));
                    push_line(out, &format!("Hosts: {}", rdns.resolved_hosts.join(", ")));
                    push_line(out, &format!("Elapsed: {} ms", rdns.elapsed.as_millis()));
                }
            }
        }
    }
}

/// Appends the rule evaluation trace.
fn render_trace(out: &mut String, report: &FingerprintReport) {
    push_line(out, "=== RULES ===");
    for entry in &report.trace {
        let outcome = match &entry.outcome {
            RuleOutcome::Matched {
                classification,
            } => format!("matched ({})", classification.label()),
            RuleOutcome::NoMatch => "no match".to_string(),
            RuleOutcome::InsufficientEvidence {
                missing,
            } => format!("missing {} evidence", missing.as_str()),
        };
        push_line(out, &format!("{}: {outcome}", entry.rule));
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Appends `line` and a newline.
fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

/// Joins addresses with commas, or `none`.
fn join_addresses<T: ToString>(addresses: &[T]) -> String {
    if addresses.is_empty() {
        return "none".to_string();
    }
    addresses.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
