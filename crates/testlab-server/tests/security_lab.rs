// crates/testlab-server/tests/security_lab.rs
// ============================================================================
// Module: Security Lab Tests
// Description: End-to-end tests for the security scan endpoint.
// Purpose: Verify header grading, depth gating, and the failure envelope.
// Dependencies: axum, reqwest, serde_json, testlab-server, tokio
// ============================================================================

//! End-to-end tests for `POST /security-scan`.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions are permitted."
)]

mod common;

use serde_json::Value;
use serde_json::json;

use crate::common::spawn_lab_server;
use crate::common::spawn_stub_target;

/// Posts a JSON body to the scan endpoint and returns status + body.
async fn post_scan(base: &str, body: &Value) -> (u16, Value) {
    let client = reqwest::Client::new();
    let response =
        client.post(format!("{base}/security-scan")).json(body).send().await.expect("request");
    let status = response.status().as_u16();
    let payload: Value = response.json().await.expect("json body");
    (status, payload)
}

#[tokio::test]
async fn quick_scan_grades_the_fetched_headers() {
    let base = spawn_lab_server().await;
    let target = spawn_stub_target(&[
        ("content-security-policy", "default-src 'self'"),
        ("x-frame-options", "DENY"),
    ])
    .await;

    let (status, payload) =
        post_scan(&base, &json!({"targetUrl": target, "scanType": "quick"})).await;

    assert_eq!(status, 200);
    assert_eq!(payload["success"], true);
    assert_eq!(payload["message"], "Quick scan completed successfully");

    let results = &payload["results"];
    assert_eq!(results["scanType"], "quick");
    let headers = &results["securityHeaders"];
    assert_eq!(headers["present"], 2);
    assert_eq!(headers["missing"], 2);
    assert_eq!(headers["score"], 50);
    // http target: no SSL section, and quick scans skip the full-only blocks
    assert!(results.get("sslAnalysis").is_none());
    assert!(results.get("advancedChecks").is_none());
    assert!(results.get("complianceCheck").is_none());
    assert_eq!(results["vulnerabilityChecks"]["summary"]["totalTests"], 4);
    assert!(!results["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn full_scan_includes_the_extended_blocks() {
    let base = spawn_lab_server().await;
    let target = spawn_stub_target(&[("strict-transport-security", "max-age=63072000")]).await;

    let (status, payload) =
        post_scan(&base, &json!({"targetUrl": target, "scanType": "full"})).await;

    assert_eq!(status, 200);
    assert_eq!(payload["message"], "Full security audit completed successfully");
    let results = &payload["results"];
    assert_eq!(results["securityHeaders"]["headers"].as_object().unwrap().len(), 9);
    assert_eq!(results["vulnerabilityChecks"]["summary"]["totalTests"], 8);
    assert!(results["advancedChecks"].is_object());
    assert!(results["complianceCheck"]["owaspCompliance"]["score"].as_u64().unwrap() >= 80);
    assert!(payload["scanTypeDetails"]["checks"].as_array().unwrap().len() >= 4);
}

#[tokio::test]
async fn unreachable_targets_degrade_the_header_section() {
    let base = spawn_lab_server().await;
    // nothing listens on this port; the fetch fails but the scan still completes
    let (status, payload) = post_scan(
        &base,
        &json!({"targetUrl": "http://127.0.0.1:9", "scanType": "quick"}),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(payload["success"], true);
    let headers = &payload["results"]["securityHeaders"];
    assert_eq!(headers["score"], 0);
    assert!(headers["error"].as_str().unwrap().contains("Failed to analyze security headers"));
}

#[tokio::test]
async fn missing_target_yields_the_failure_envelope() {
    let base = spawn_lab_server().await;
    let (status, payload) = post_scan(&base, &json!({"scanType": "quick"})).await;
    assert_eq!(status, 500);
    assert_eq!(payload["success"], false);
    assert_eq!(payload["errorType"], "MissingParameter");
    assert_eq!(payload["message"], "Security scan failed");
    assert_eq!(payload["troubleshooting"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn malformed_target_yields_the_invalid_url_kind() {
    let base = spawn_lab_server().await;
    let (status, payload) = post_scan(&base, &json!({"targetUrl": "not a url"})).await;
    assert_eq!(status, 500);
    assert_eq!(payload["errorType"], "InvalidURLFormat");
}
