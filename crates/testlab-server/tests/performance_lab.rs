// crates/testlab-server/tests/performance_lab.rs
// ============================================================================
// Module: Performance Lab Tests
// Description: End-to-end tests for the synthetic performance endpoint.
// Purpose: Verify the response contract, series bounds, and failure envelope.
// Dependencies: reqwest, serde_json, testlab-server, tokio
// ============================================================================

//! End-to-end tests for `POST /run-performance-test`.

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

/// Posts a JSON body to the performance endpoint and returns status + body.
async fn post_performance(base: &str, body: &Value) -> (u16, Value) {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/run-performance-test"))
        .json(body)
        .send()
        .await
        .expect("request");
    let status = response.status().as_u16();
    let payload: Value = response.json().await.expect("json body");
    (status, payload)
}

#[tokio::test]
async fn steady_run_returns_the_documented_contract() {
    let base = spawn_lab_server().await;
    let (status, payload) = post_performance(
        &base,
        &json!({
            "testType": "steady",
            "targetUrl": "https://example.com",
            "virtualUsers": 10,
            "duration": 30
        }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(payload["success"], true);
    assert_eq!(payload["testType"], "steady");
    assert_eq!(payload["metrics"]["timeSeriesData"].as_array().unwrap().len(), 30);

    let percentiles = &payload["metrics"]["summary"]["percentiles"];
    let p50 = percentiles["p50"].as_u64().unwrap();
    let p90 = percentiles["p90"].as_u64().unwrap();
    let p95 = percentiles["p95"].as_u64().unwrap();
    let p99 = percentiles["p99"].as_u64().unwrap();
    assert!(p50 <= p90 && p90 <= p95 && p95 <= p99);

    assert!(payload["summary"]["recommendations"].as_array().unwrap().len() >= 1);
    assert!(payload["testScript"].as_str().unwrap().contains("k6"));
    assert!(!payload["timestamp"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn burst_script_ramps_to_five_times_the_concurrency() {
    let base = spawn_lab_server().await;
    let (status, payload) = post_performance(
        &base,
        &json!({
            "testType": "burst",
            "targetUrl": "https://example.com",
            "virtualUsers": 8,
            "duration": 20
        }),
    )
    .await;

    assert_eq!(status, 200);
    let script = payload["testScript"].as_str().unwrap();
    assert!(script.contains("target: 40"), "script should stage 5x concurrency: {script}");
}

#[tokio::test]
async fn series_is_capped_at_sixty_samples() {
    let base = spawn_lab_server().await;
    let (_, payload) = post_performance(
        &base,
        &json!({
            "testType": "escalating",
            "targetUrl": "https://example.com",
            "virtualUsers": 5,
            "duration": 300
        }),
    )
    .await;
    assert_eq!(payload["metrics"]["timeSeriesData"].as_array().unwrap().len(), 60);
}

#[tokio::test]
async fn malformed_target_url_yields_the_failure_envelope() {
    let base = spawn_lab_server().await;
    let (status, payload) = post_performance(
        &base,
        &json!({
            "testType": "steady",
            "targetUrl": "not a url",
            "virtualUsers": 10,
            "duration": 30
        }),
    )
    .await;

    assert_eq!(status, 500);
    assert_eq!(payload["success"], false);
    assert_eq!(payload["errorType"], "InvalidURLFormat");
    assert_eq!(payload["error"], "invalid URL format");
    assert_eq!(payload["message"], "Performance test execution failed");
    assert_eq!(payload["troubleshooting"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn missing_parameters_yield_the_failure_envelope() {
    let base = spawn_lab_server().await;
    let (status, payload) =
        post_performance(&base, &json!({"targetUrl": "https://example.com"})).await;
    assert_eq!(status, 500);
    assert_eq!(payload["errorType"], "MissingParameter");
    assert!(payload["error"].as_str().unwrap().contains("testType and targetUrl"));
}

#[tokio::test]
async fn coerced_and_defaulted_inputs_still_run() {
    let base = spawn_lab_server().await;
    let (status, payload) = post_performance(
        &base,
        &json!({
            "testType": "steady",
            "targetUrl": "https://example.com",
            "virtualUsers": "25",
            "duration": "oops"
        }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(payload["testConfig"]["virtualUsers"], 25);
    assert_eq!(payload["testConfig"]["duration"], 30);
}
