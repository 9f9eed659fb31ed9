// crates/testlab-server/src/envelope.rs
// ============================================================================
// Module: Failure Envelopes
// Description: Handler-boundary error taxonomy and failure payloads.
// Purpose: Turn any lab failure into one uniform, hint-carrying envelope.
// Dependencies: serde, serde_json, testlab-probe, thiserror
// ============================================================================

//! ## Overview
//! Every lab handler catches all errors at its boundary and returns HTTP 500
//! with a uniform failure envelope: a machine-usable error kind, the
//! human-readable message, and a lab-specific list of troubleshooting hints.
//! No error propagates out of a handler and nothing else maps to any other
//! error status.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;
use testlab_core::UnknownShapeError;
use testlab_probe::ProbeError;
use testlab_probe::api::classify_error;
use testlab_probe::api::troubleshooting_for;
use thiserror::Error;

use crate::clock::now_unix_ms;
use crate::clock::rfc3339_from_unix_ms;
use crate::telemetry::LabKind;

// ============================================================================
// SECTION: Error Taxonomy
// ============================================================================

/// Handler-boundary error taxonomy.
#[derive(Debug, Error)]
pub enum LabError {
    /// A required request field is absent or empty.
    #[error("Missing required parameters: {0}")]
    MissingParameters(&'static str),
    /// The request body is not valid JSON for the lab.
    #[error("invalid request body")]
    MalformedBody,
    /// The request body exceeds the configured size limit.
    #[error("request body too large")]
    BodyTooLarge,
    /// The test shape is not a known enumeration value.
    #[error(transparent)]
    UnknownShape(#[from] UnknownShapeError),
    /// An outbound probe failed.
    #[error(transparent)]
    Probe(#[from] ProbeError),
}

impl LabError {
    /// Returns the machine-usable error kind label.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingParameters(_) => "MissingParameter",
            Self::MalformedBody => "InvalidRequestBody",
            Self::BodyTooLarge => "PayloadTooLarge",
            Self::UnknownShape(_) => "InvalidParameter",
            Self::Probe(err) => match err {
                ProbeError::InvalidUrl => "InvalidURLFormat",
                ProbeError::Timeout => "Timeout",
                ProbeError::Network(_) | ProbeError::ResponseTooLarge => "NetworkFailure",
                ProbeError::UnsupportedMethod(_) => "InvalidParameter",
                ProbeError::Build(_) => "Internal",
            },
        }
    }
}

// ============================================================================
// SECTION: Envelopes
// ============================================================================

/// Uniform failure payload returned with HTTP 500.
#[derive(Debug, Serialize)]
struct FailureEnvelope {
    /// Always false.
    success: bool,
    /// Human-readable failure detail.
    error: String,
    /// Machine-usable error kind.
    #[serde(rename = "errorType")]
    error_type: &'static str,
    /// Lab-specific failure message.
    message: &'static str,
    /// Remediation hints for the caller.
    troubleshooting: Vec<String>,
}

/// Per-request performance block echoed on API lab failures.
#[derive(Debug, Serialize)]
struct NullPerformance {
    /// Always null on failure.
    #[serde(rename = "responseTime")]
    response_time: Option<u64>,
    /// Failure timestamp, RFC 3339.
    timestamp: String,
}

/// API lab failure payload with its extra timing block.
#[derive(Debug, Serialize)]
struct ApiFailureEnvelope {
    /// Uniform failure fields.
    #[serde(flatten)]
    base: FailureEnvelope,
    /// Timing block with a null response time.
    performance: NullPerformance,
}

/// Builds the failure payload for a lab and error.
#[must_use]
pub fn failure_payload(lab: LabKind, err: &LabError) -> Value {
    let base = FailureEnvelope {
        success: false,
        error: err.to_string(),
        error_type: err.kind(),
        message: failure_message(lab),
        troubleshooting: troubleshooting_hints(lab, err),
    };
    let payload = match lab {
        LabKind::Api => serde_json::to_value(ApiFailureEnvelope {
            base,
            performance: NullPerformance {
                response_time: None,
                timestamp: rfc3339_from_unix_ms(now_unix_ms()),
            },
        }),
        LabKind::Performance | LabKind::Browser | LabKind::SecurityScan => {
            serde_json::to_value(base)
        }
    };
    payload.unwrap_or_else(|_| {
        Value::String("failure envelope serialization failed".to_string())
    })
}

/// Returns the lab-specific failure message.
const fn failure_message(lab: LabKind) -> &'static str {
    match lab {
        LabKind::Performance => "Performance test execution failed",
        LabKind::Browser => "Test execution failed",
        LabKind::SecurityScan => "Security scan failed",
        LabKind::Api => "API test execution failed",
    }
}

/// Returns the lab-specific troubleshooting hints for an error.
fn troubleshooting_hints(lab: LabKind, err: &LabError) -> Vec<String> {
    match lab {
        LabKind::Performance => to_owned(&[
            "Ensure the target URL is accessible and responds to HTTP requests",
            "Check if the URL supports CORS if testing from browser",
            "Try one of the suggested reliable test URLs",
            "Verify the URL format is correct (include https://)",
        ]),
        LabKind::SecurityScan => to_owned(&[
            "Ensure the target URL is accessible and valid",
            "Check if the URL supports HTTPS for SSL analysis",
            "Verify the URL format includes protocol (https://)",
            "Some security checks may not work with localhost URLs",
        ]),
        LabKind::Browser => to_owned(&[
            "Verify the scenario name is one of the published demos",
            "Retry the run - external demo pages may be temporarily unavailable",
        ]),
        LabKind::Api => match err {
            LabError::Probe(probe_err) => troubleshooting_for(classify_error(probe_err)),
            _ => to_owned(&[
                "Check the API documentation for correct usage",
                "Verify authentication credentials if required",
                "Ensure request method and parameters are correct",
            ]),
        },
    }
}

/// Copies a static hint list into owned strings.
fn to_owned(hints: &[&str]) -> Vec<String> {
    hints.iter().map(|hint| (*hint).to_string()).collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions are permitted."
    )]

    use testlab_probe::ProbeError;

    use super::LabError;
    use super::failure_payload;
    use crate::telemetry::LabKind;

    #[test]
    fn invalid_url_failures_carry_the_url_kind() {
        let err = LabError::from(ProbeError::InvalidUrl);
        assert_eq!(err.kind(), "InvalidURLFormat");
        let payload = failure_payload(LabKind::Performance, &err);
        assert_eq!(payload["success"], false);
        assert_eq!(payload["errorType"], "InvalidURLFormat");
        assert_eq!(payload["error"], "invalid URL format");
        assert_eq!(payload["troubleshooting"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn api_failures_include_a_null_timing_block() {
        let err = LabError::from(ProbeError::Timeout);
        let payload = failure_payload(LabKind::Api, &err);
        assert_eq!(payload["errorType"], "Timeout");
        assert!(payload["performance"]["responseTime"].is_null());
        assert!(
            payload["troubleshooting"]
                .as_array()
                .unwrap()
                .iter()
                .any(|tip| tip.as_str().unwrap().contains("timed out"))
        );
    }

    #[test]
    fn missing_parameters_read_like_the_original_message() {
        let err = LabError::MissingParameters("testType and targetUrl");
        let payload = failure_payload(LabKind::Performance, &err);
        assert_eq!(payload["error"], "Missing required parameters: testType and targetUrl");
        assert_eq!(payload["errorType"], "MissingParameter");
    }
}
