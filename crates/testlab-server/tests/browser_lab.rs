// crates/testlab-server/tests/browser_lab.rs
// ============================================================================
// Module: Browser Lab Tests
// Description: End-to-end tests for the scripted browser endpoint.
// Purpose: Verify the step log, screenshot, and scenario fallback behavior.
// Dependencies: reqwest, serde_json, testlab-server, tokio
// ============================================================================

//! End-to-end tests for `POST /run-test`.

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

/// Posts a JSON body to the browser endpoint and returns status + body.
async fn post_run_test(base: &str, body: &Value) -> (u16, Value) {
    let client = reqwest::Client::new();
    let response =
        client.post(format!("{base}/run-test")).json(body).send().await.expect("request");
    let status = response.status().as_u16();
    let payload: Value = response.json().await.expect("json body");
    (status, payload)
}

#[tokio::test]
async fn login_demo_returns_an_ordered_step_log() {
    let base = spawn_lab_server().await;
    let (status, payload) = post_run_test(&base, &json!({"testType": "login-demo"})).await;

    assert_eq!(status, 200);
    assert_eq!(payload["success"], true);
    assert_eq!(payload["testType"], "login-demo");
    assert!(payload["error"].is_null());

    let steps = payload["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 6);
    for (index, step) in steps.iter().enumerate() {
        assert_eq!(step["step"].as_u64().unwrap(), index as u64 + 1);
        assert_eq!(step["status"], "passed");
    }
    assert!(
        payload["screenshot"].as_str().unwrap().starts_with("data:image/png;base64,")
    );
}

#[tokio::test]
async fn unknown_scenarios_fall_back_to_the_page_demo() {
    let base = spawn_lab_server().await;
    let (status, payload) = post_run_test(&base, &json!({"testType": "mystery-demo"})).await;
    assert_eq!(status, 200);
    assert_eq!(payload["testType"], "page-demo");
    assert_eq!(payload["success"], true);
}

#[tokio::test]
async fn every_catalog_scenario_completes() {
    let base = spawn_lab_server().await;
    for kind in ["login-demo", "search-demo", "form-demo", "page-demo"] {
        let (status, payload) = post_run_test(&base, &json!({"testType": kind})).await;
        assert_eq!(status, 200, "{kind} should respond OK");
        assert_eq!(payload["success"], true, "{kind} should pass");
        assert!(!payload["steps"].as_array().unwrap().is_empty());
    }
}

#[tokio::test]
async fn malformed_body_yields_the_failure_envelope() {
    let base = spawn_lab_server().await;
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/run-test"))
        .header("content-type", "application/json")
        .body("this is not json")
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 500);
    let payload: Value = response.json().await.expect("json body");
    assert_eq!(payload["success"], false);
    assert_eq!(payload["message"], "Test execution failed");
}
