// crates/frontline-cli/src/observer.rs
// ============================================================================
// Module: JSON-Line Event Logger
// Description: Probe observer that writes one JSON object per event.
// Purpose: Structured diagnostics on stderr, kept apart from report output.
// Dependencies: frontline-core, serde_json
// ============================================================================

//! ## Overview
//! Failure and timeout events are always written. Start and completion events
//! are written only at [`LogLevel::Debug`]. Write errors are swallowed so a
//! closed stderr never aborts a run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Stderr;
use std::io::Write;
use std::sync::Mutex;
use std::sync::PoisonError;

use frontline_core::ProbeEvent;
use frontline_core::ProbeObserver;

// ============================================================================
// SECTION: Observer
// ============================================================================

/// Event verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Failures and timeouts only.
    Failures,
    /// Every lifecycle event.
    Debug,
}

/// Observer writing newline-delimited JSON events.
pub struct JsonLineObserver<W: Write + Send> {
    /// Output sink.
    writer: Mutex<W>,
    /// Which events are written.
    level: LogLevel,
}

impl<W: Write + Send> JsonLineObserver<W> {
    /// Creates an observer over `writer`.
    pub const fn new(writer: W, level: LogLevel) -> Self {
        Self {
            writer: Mutex::new(writer),
            level,
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns true when `event` passes the level filter.
    const fn enabled(&self, event: &ProbeEvent) -> bool {
        matches!(self.level, LogLevel::Debug) || event.is_failure()
    }
}

/// Observer writing to stderr.
pub type StderrLogObserver = JsonLineObserver<Stderr>;

impl StderrLogObserver {
    /// Creates an observer writing to stderr.
    #[must_use]
    pub fn stderr(level: LogLevel) -> Self {
        Self::new(std::io::stderr(), level)
    }
}

impl<W: Write + Send> ProbeObserver for JsonLineObserver<W> {
    fn on_event(&self, event: &ProbeEvent) {
        if !self.enabled(event) {
            return;
        }
        let Ok(line) = serde_json::to_string(event) else {
            return;
        };
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(writer, "{line}");
        let _ = writer.flush();
    }
}
