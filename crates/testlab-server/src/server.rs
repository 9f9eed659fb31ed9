// crates/testlab-server/src/server.rs
// ============================================================================
// Module: Lab Server
// Description: HTTP server exposing the four lab endpoints.
// Purpose: Bind, route, and guard lab requests behind one failure envelope.
// Dependencies: axum, testlab-config, testlab-probe, tokio
// ============================================================================

//! ## Overview
//! The lab server routes four POST endpoints through a shared state holding
//! the configuration, outbound probes, and observability sinks. Every handler
//! runs to completion within one request's control flow: a body-size guard,
//! the lab implementation, and a uniform success-or-envelope response. No
//! error escapes a handler.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::post;
use serde::Serialize;
use testlab_config::TestLabConfig;
use testlab_probe::ApiProbe;
use testlab_probe::HeaderProbe;

use crate::audit::LabAuditEvent;
use crate::audit::LabAuditSink;
use crate::audit::StderrAuditSink;
use crate::envelope::LabError;
use crate::envelope::failure_payload;
use crate::labs;
use crate::telemetry::LabKind;
use crate::telemetry::LabMetricEvent;
use crate::telemetry::LabMetrics;
use crate::telemetry::LabOutcome;
use crate::telemetry::NoopMetrics;

// ============================================================================
// SECTION: Server
// ============================================================================

/// Lab server instance.
pub struct TestLabServer {
    /// Shared handler state.
    state: Arc<ServerState>,
}

/// Shared state for lab handlers.
pub struct ServerState {
    /// Service configuration.
    pub config: TestLabConfig,
    /// Audit sink for request events.
    pub audit: Arc<dyn LabAuditSink>,
    /// Metrics sink for counters and latencies.
    pub metrics: Arc<dyn LabMetrics>,
    /// Outbound HEAD probe for the scan lab.
    pub header_probe: HeaderProbe,
    /// Outbound request executor for the API lab.
    pub api_probe: ApiProbe,
}

impl TestLabServer {
    /// Builds a server from configuration with default sinks.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when configuration is invalid or the probes
    /// cannot be constructed.
    pub fn from_config(config: TestLabConfig) -> Result<Self, ServerError> {
        Self::with_sinks(config, Arc::new(StderrAuditSink), Arc::new(NoopMetrics))
    }

    /// Builds a server with explicit audit and metrics sinks.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when configuration is invalid or the probes
    /// cannot be constructed.
    pub fn with_sinks(
        config: TestLabConfig,
        audit: Arc<dyn LabAuditSink>,
        metrics: Arc<dyn LabMetrics>,
    ) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let header_probe =
            HeaderProbe::new(&config.probe).map_err(|err| ServerError::Init(err.to_string()))?;
        let api_probe =
            ApiProbe::new(&config.probe).map_err(|err| ServerError::Init(err.to_string()))?;
        Ok(Self {
            state: Arc::new(ServerState {
                config,
                audit,
                metrics,
                header_probe,
                api_probe,
            }),
        })
    }

    /// Builds the axum router over the shared state.
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .route("/run-performance-test", post(run_performance_test))
            .route("/run-test", post(run_test))
            .route("/security-scan", post(security_scan))
            .route("/test-api", post(test_api))
            .with_state(Arc::clone(&self.state))
    }

    /// Binds the configured address and serves requests until shutdown.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let addr: SocketAddr = self
            .state
            .config
            .server
            .bind
            .parse()
            .map_err(|_| ServerError::Config("invalid bind address".to_string()))?;
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|_| ServerError::Transport("http bind failed".to_string()))?;
        axum::serve(listener, app)
            .await
            .map_err(|_| ServerError::Transport("http server failed".to_string()))
    }
}

// ============================================================================
// SECTION: Route Handlers
// ============================================================================

/// Handles `POST /run-performance-test`.
async fn run_performance_test(State(state): State<Arc<ServerState>>, bytes: Bytes) -> Response {
    let started = Instant::now();
    let result = match guard_body(&state, &bytes) {
        Ok(()) => labs::performance_lab(&state, &bytes).await,
        Err(err) => Err(err),
    };
    complete(&state, LabKind::Performance, started, bytes.len(), result)
}

/// Handles `POST /run-test`.
async fn run_test(State(state): State<Arc<ServerState>>, bytes: Bytes) -> Response {
    let started = Instant::now();
    let result = match guard_body(&state, &bytes) {
        Ok(()) => labs::browser_lab(&bytes).await,
        Err(err) => Err(err),
    };
    complete(&state, LabKind::Browser, started, bytes.len(), result)
}

/// Handles `POST /security-scan`.
async fn security_scan(State(state): State<Arc<ServerState>>, bytes: Bytes) -> Response {
    let started = Instant::now();
    let result = match guard_body(&state, &bytes) {
        Ok(()) => labs::security_lab(&state, &bytes).await,
        Err(err) => Err(err),
    };
    complete(&state, LabKind::SecurityScan, started, bytes.len(), result)
}

/// Handles `POST /test-api`.
async fn test_api(State(state): State<Arc<ServerState>>, bytes: Bytes) -> Response {
    let started = Instant::now();
    let result = match guard_body(&state, &bytes) {
        Ok(()) => labs::api_lab(&state, &bytes).await,
        Err(err) => Err(err),
    };
    complete(&state, LabKind::Api, started, bytes.len(), result)
}

// ============================================================================
// SECTION: Handler Plumbing
// ============================================================================

/// Rejects bodies over the configured size limit.
fn guard_body(state: &ServerState, bytes: &Bytes) -> Result<(), LabError> {
    if bytes.len() > state.config.server.max_body_bytes {
        return Err(LabError::BodyTooLarge);
    }
    Ok(())
}

/// Serializes the lab result, records observability events, and responds.
fn complete<T: Serialize>(
    state: &ServerState,
    lab: LabKind,
    started: Instant,
    request_bytes: usize,
    result: Result<T, LabError>,
) -> Response {
    let (status, body, outcome, error_kind) = match result {
        Ok(payload) => (StatusCode::OK, serialize_payload(&payload), LabOutcome::Ok, None),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            serialize_payload(&failure_payload(lab, &err)),
            LabOutcome::Error,
            Some(err.kind()),
        ),
    };

    let latency = started.elapsed();
    let event = LabMetricEvent {
        lab,
        outcome,
        error_kind,
        request_bytes,
        response_bytes: body.len(),
    };
    state.metrics.record_request(event.clone());
    state.metrics.record_latency(event, latency);
    state.audit.record(&LabAuditEvent::new(
        lab,
        outcome,
        error_kind,
        request_bytes,
        body.len(),
        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
    ));

    (status, [(CONTENT_TYPE, "application/json")], body).into_response()
}

/// Serializes a payload, degrading to a fixed envelope on failure.
fn serialize_payload<T: Serialize>(payload: &T) -> Vec<u8> {
    serde_json::to_vec(payload).unwrap_or_else(|_| {
        br#"{"success":false,"error":"serialization failed","message":"internal error"}"#.to_vec()
    })
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Lab server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}
