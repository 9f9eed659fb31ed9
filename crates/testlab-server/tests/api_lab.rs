// crates/testlab-server/tests/api_lab.rs
// ============================================================================
// Module: API Lab Tests
// Description: End-to-end tests for the live API probe endpoint.
// Purpose: Verify the exchange capture, analysis, and failure envelope.
// Dependencies: axum, reqwest, serde_json, testlab-server, tokio
// ============================================================================

//! End-to-end tests for `POST /test-api`.

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

/// Posts a JSON body to the API lab endpoint and returns status + body.
async fn post_test_api(base: &str, body: &Value) -> (u16, Value) {
    let client = reqwest::Client::new();
    let response =
        client.post(format!("{base}/test-api")).json(body).send().await.expect("request");
    let status = response.status().as_u16();
    let payload: Value = response.json().await.expect("json body");
    (status, payload)
}

#[tokio::test]
async fn live_get_captures_the_exchange_and_analysis() {
    let base = spawn_lab_server().await;
    let target = spawn_stub_target(&[("content-security-policy", "default-src 'self'")]).await;

    let (status, payload) = post_test_api(
        &base,
        &json!({"method": "get", "url": target, "testName": "stub check"}),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(payload["success"], true);
    assert_eq!(payload["testName"], "stub check");
    assert_eq!(payload["request"]["method"], "GET");
    assert_eq!(payload["response"]["status"], 200);
    assert_eq!(payload["response"]["data"]["ok"], true);
    assert_eq!(payload["analysis"]["statusAnalysis"]["category"], "Success");
    assert!(payload["analysis"]["securityAnalysis"]["presentHeaders"]
        .as_array()
        .unwrap()
        .iter()
        .any(|name| name == "CSP"));
    assert!(payload["performance"]["responseTime"].is_u64());
    assert!(!payload["analysis"]["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn default_headers_are_merged_into_the_echo() {
    let base = spawn_lab_server().await;
    let target = spawn_stub_target(&[]).await;
    let (_, payload) = post_test_api(
        &base,
        &json!({"method": "GET", "url": target, "headers": {"X-Custom": "yes"}}),
    )
    .await;
    let sent = payload["request"]["headers"].as_object().unwrap();
    assert_eq!(sent["content-type"], "application/json");
    assert_eq!(sent["x-custom"], "yes");
    assert!(sent.contains_key("user-agent"));
}

#[tokio::test]
async fn unreachable_targets_yield_a_network_failure_envelope() {
    let base = spawn_lab_server().await;
    let (status, payload) = post_test_api(
        &base,
        &json!({"method": "GET", "url": "http://127.0.0.1:9/"}),
    )
    .await;

    assert_eq!(status, 500);
    assert_eq!(payload["success"], false);
    assert_eq!(payload["errorType"], "NetworkFailure");
    assert_eq!(payload["message"], "API test execution failed");
    assert!(payload["performance"]["responseTime"].is_null());
    assert!(!payload["troubleshooting"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_url_yields_the_invalid_url_kind() {
    let base = spawn_lab_server().await;
    let (status, payload) =
        post_test_api(&base, &json!({"method": "GET", "url": "not a url"})).await;
    assert_eq!(status, 500);
    assert_eq!(payload["errorType"], "InvalidURLFormat");
    assert_eq!(payload["error"], "invalid URL format");
}

#[tokio::test]
async fn missing_method_and_url_yield_the_failure_envelope() {
    let base = spawn_lab_server().await;
    let (status, payload) = post_test_api(&base, &json!({"testName": "incomplete"})).await;
    assert_eq!(status, 500);
    assert_eq!(payload["errorType"], "MissingParameter");
    assert!(payload["error"].as_str().unwrap().contains("method and url"));
}
