// crates/hieracheck-core/src/audit.rs
// ============================================================================
// Module: Validation Audit Logging
// Description: Structured audit events for load and validate calls.
// Purpose: Emit JSON-line audit logs without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Validators report each installed load cycle and each `validate` call to a
//! [`ValidationAuditSink`]. Sinks are best-effort: serialization or I/O
//! failures are dropped and never change a validation outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome classification for a validate call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidateOutcome {
    /// Every match passed and every required file matched.
    Passed,
    /// Load errors, missing matches, or predicate failures.
    Failed,
    /// Malformed arguments or no data loaded.
    Rejected,
}

/// Audit event emitted when a load cycle is installed.
#[derive(Debug, Clone, Serialize)]
pub struct LoadAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Number of data sets installed.
    pub data_sets: usize,
    /// Load errors recorded by the loader.
    pub load_errors: Vec<String>,
}

impl LoadAuditEvent {
    /// Creates a new load audit event with a consistent timestamp.
    #[must_use]
    pub fn new(data_sets: usize, load_errors: Vec<String>) -> Self {
        Self {
            event: "data_loaded",
            timestamp_ms: now_ms(),
            data_sets,
            load_errors,
        }
    }
}

/// Audit event emitted for every validate call.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Rendered search key, when the key was accepted.
    pub key: Option<String>,
    /// Call outcome.
    pub outcome: ValidateOutcome,
    /// Number of matched entries checked.
    pub matches: usize,
    /// Number of predicate failures.
    pub failures: usize,
    /// Failure message, when the call failed.
    pub message: Option<String>,
}

/// Inputs required to construct a validate audit event.
pub struct ValidateAuditEventParams {
    /// Rendered search key, when the key was accepted.
    pub key: Option<String>,
    /// Call outcome.
    pub outcome: ValidateOutcome,
    /// Number of matched entries checked.
    pub matches: usize,
    /// Number of predicate failures.
    pub failures: usize,
    /// Failure message, when the call failed.
    pub message: Option<String>,
}

impl ValidateAuditEvent {
    /// Creates a new validate audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: ValidateAuditEventParams) -> Self {
        Self {
            event: "validate",
            timestamp_ms: now_ms(),
            key: params.key,
            outcome: params.outcome,
            matches: params.matches,
            failures: params.failures,
            message: params.message,
        }
    }
}

/// Returns the current time in milliseconds since the Unix epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for validator events.
pub trait ValidationAuditSink: Send + Sync {
    /// Record a load audit event.
    fn record_load(&self, event: &LoadAuditEvent);

    /// Record a validate audit event.
    fn record_validate(&self, event: &ValidateAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl ValidationAuditSink for StderrAuditSink {
    fn record_load(&self, event: &LoadAuditEvent) {
        write_stderr_line(event);
    }

    fn record_validate(&self, event: &ValidateAuditEvent) {
        write_stderr_line(event);
    }
}

/// Writes one JSON line to stderr, dropping failures.
fn write_stderr_line<T: Serialize>(event: &T) {
    if let Ok(payload) = serde_json::to_string(event) {
        let _ = writeln!(std::io::stderr(), "{payload}");
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one JSON line, dropping failures.
    fn write_line<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl ValidationAuditSink for FileAuditSink {
    fn record_load(&self, event: &LoadAuditEvent) {
        self.write_line(event);
    }

    fn record_validate(&self, event: &ValidateAuditEvent) {
        self.write_line(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl ValidationAuditSink for NoopAuditSink {
    fn record_load(&self, _event: &LoadAuditEvent) {}

    fn record_validate(&self, _event: &ValidateAuditEvent) {}
}
