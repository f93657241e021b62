// crates/frontline-cli/src/lib.rs
// ============================================================================
// Module: Frontline CLI Library
// Description: Shared helpers for the `classify` command-line interface.
// Purpose: Keep report rendering and event logging testable outside main.
// Dependencies: frontline-core, serde_json
// ============================================================================

//! ## Overview
//! The binary entry point (`src/main.rs`) parses arguments, loads
//! configuration, and runs one fingerprint. This library holds the pieces it
//! writes output with: the JSON-line probe event logger and the text and JSON
//! report renderers.
//!
//! Security posture: everything rendered here comes from untrusted targets.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod observer;
pub mod report;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use observer::JsonLineObserver;
pub use observer::LogLevel;
pub use observer::StderrLogObserver;
pub use report::render_json;
pub use report::render_text;
