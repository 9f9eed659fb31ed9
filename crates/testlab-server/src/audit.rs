// crates/testlab-server/src/audit.rs
// ============================================================================
// Module: Lab Audit Logging
// Description: Structured audit events for lab request handling.
// Purpose: Emit JSON-line request logs without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines audit event payloads and sinks for lab request logging.
//! It is intentionally lightweight so deployments can route events to their
//! preferred logging pipeline without redesign.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::telemetry::LabKind;
use crate::telemetry::LabOutcome;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Lab request audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct LabAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Lab that handled the request.
    pub lab: LabKind,
    /// Request outcome.
    pub outcome: LabOutcome,
    /// Normalized error kind label when the request failed.
    pub error_kind: Option<&'static str>,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Response body size in bytes.
    pub response_bytes: usize,
    /// Handler latency in milliseconds.
    pub latency_ms: u64,
}

impl LabAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(
        lab: LabKind,
        outcome: LabOutcome,
        error_kind: Option<&'static str>,
        request_bytes: usize,
        response_bytes: usize,
        latency_ms: u64,
    ) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "lab_request",
            timestamp_ms,
            lab,
            outcome,
            error_kind,
            request_bytes,
            response_bytes,
            latency_ms,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for lab request events.
pub trait LabAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &LabAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl LabAuditSink for StderrAuditSink {
    fn record(&self, event: &LabAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that discards events.
pub struct NoopAuditSink;

impl LabAuditSink for NoopAuditSink {
    fn record(&self, _event: &LabAuditEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================
