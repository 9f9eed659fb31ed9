// crates/testlab-server/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared helpers for lab endpoint integration tests.
// Purpose: Spin up the lab server and stub targets on ephemeral ports.
// Dependencies: axum, testlab-config, testlab-server, tokio
// ============================================================================

//! ## Overview
//! This module provides the in-process lab server and a configurable stub
//! target server so probe-backed labs can be exercised without leaving the
//! host.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::routing::get;
use testlab_config::LimitsConfig;
use testlab_config::ProbeConfig;
use testlab_config::ServerConfig;
use testlab_config::TestLabConfig;
use testlab_server::NoopAuditSink;
use testlab_server::NoopMetrics;
use testlab_server::TestLabServer;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Creates a lab configuration tuned for tests: no pacing, short timeouts.
#[must_use]
pub fn test_config() -> TestLabConfig {
    TestLabConfig {
        server: ServerConfig {
            bind: "127.0.0.1:0".to_string(),
            ..ServerConfig::default()
        },
        probe: ProbeConfig {
            timeout_ms: 2_000,
            ..ProbeConfig::default()
        },
        limits: LimitsConfig {
            pacing_cap_ms: 0,
            ..LimitsConfig::default()
        },
    }
}

/// Spawns the lab server on an ephemeral port and returns its base URL.
pub async fn spawn_lab_server() -> String {
    let server =
        TestLabServer::with_sinks(test_config(), Arc::new(NoopAuditSink), Arc::new(NoopMetrics))
            .expect("server build");
    let router = server.router();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

/// Spawns a stub target that answers with the given headers and a JSON body.
pub async fn spawn_stub_target(headers: &[(&'static str, &'static str)]) -> String {
    let pairs: Vec<(&'static str, &'static str)> = headers.to_vec();
    let app = Router::new().route(
        "/",
        get(move || {
            let pairs = pairs.clone();
            async move {
                let mut map = HeaderMap::new();
                for (name, value) in pairs {
                    map.insert(name, HeaderValue::from_static(value));
                }
                (StatusCode::OK, map, axum::Json(serde_json::json!({"ok": true})))
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/")
}
