// crates/frontline-config/src/lib.rs
// ============================================================================
// Module: Frontline Config Library
// Description: Configuration model, loading, and validation.
// Purpose: Single source of truth for frontline.toml semantics.
// Dependencies: frontline-core, frontline-probes, serde, toml
// ============================================================================

//! ## Overview
//! `frontline-config` defines the configuration model for the classifier:
//! which probes run, how long each may take, the socket limits they share,
//! and the signature table the rules are built from. Loading is strict and
//! fails closed on unknown keys or out-of-range values.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
