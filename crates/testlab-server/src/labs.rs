// crates/testlab-server/src/labs.rs
// ============================================================================
// Module: Lab Implementations
// Description: Request parsing, validation, and response assembly per lab.
// Purpose: Drive the core generators and probes into one response per lab.
// Dependencies: rand, serde, serde_json, testlab-core, testlab-probe
// ============================================================================

//! ## Overview
//! Each lab follows the same sequence: parse the JSON body, validate required
//! fields and URL shape, run the generators and probes, and assemble the
//! response object. Failures are returned as [`LabError`] and converted to the
//! uniform envelope at the handler boundary; nothing here panics or retries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::Duration;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use testlab_config::LimitsConfig;
use testlab_core::Assessment;
use testlab_core::MetricSample;
use testlab_core::ScanType;
use testlab_core::ScenarioKind;
use testlab_core::SummaryStatistics;
use testlab_core::TestPlan;
use testlab_core::TestShape;
use testlab_core::assess;
use testlab_core::generate_series;
use testlab_core::render_script;
use testlab_core::scan::AdvancedChecks;
use testlab_core::scan::ComplianceCheck;
use testlab_core::scan::HeaderAnalysis;
use testlab_core::scan::RiskLevel;
use testlab_core::scan::SIMULATED_CERT_DAYS;
use testlab_core::scan::ScanFinding;
use testlab_core::scan::ScanTypeDetails;
use testlab_core::scan::SslAnalysis;
use testlab_core::scan::VulnerabilityReport;
use testlab_core::scan::analyze_headers;
use testlab_core::scan::assess_scan;
use testlab_core::scan::scan_type_details;
use testlab_core::scan::synthesize_advanced;
use testlab_core::scan::synthesize_compliance;
use testlab_core::scan::synthesize_ssl;
use testlab_core::scan::synthesize_vulnerabilities;
use testlab_core::summarize;
use testlab_probe::ApiRequestSpec;
use testlab_probe::ResponseAnalysis;
use testlab_probe::ScenarioOutcome;
use testlab_probe::ScriptedBrowser;
use testlab_probe::analyze_exchange;
use testlab_probe::parse_target_url;
use testlab_probe::run_scenario;

use crate::clock::DAY_MS;
use crate::clock::now_unix_ms;
use crate::clock::rfc3339_from_unix_ms;
use crate::envelope::LabError;
use crate::server::ServerState;

// ============================================================================
// SECTION: Shared Helpers
// ============================================================================

/// Parses a JSON request body for a lab.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, LabError> {
    serde_json::from_slice(body).map_err(|_| LabError::MalformedBody)
}

/// Returns a field value when present and non-empty.
fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

/// Coerces a loosely typed numeric field to a positive integer.
fn coerce_u32(value: Option<&Value>) -> Option<u32> {
    match value {
        Some(Value::Number(number)) => number.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(Value::String(text)) => text.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// Elapsed milliseconds since an instant, saturating.
fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Sleeps for the pacing delay, bounded by the configured cap.
async fn pacing_delay(requested_ms: u64, cap_ms: u64) {
    let delay = requested_ms.min(cap_ms);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
}

// ============================================================================
// SECTION: Performance Lab
// ============================================================================

/// Request body for the performance lab.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PerformanceRequest {
    /// Requested test shape wire name.
    #[serde(default)]
    test_type: Option<String>,
    /// Target URL for the simulated run.
    #[serde(default)]
    target_url: Option<String>,
    /// Requested concurrency; loosely typed and coerced.
    #[serde(default)]
    virtual_users: Option<Value>,
    /// Requested duration in seconds; loosely typed and coerced.
    #[serde(default)]
    duration: Option<Value>,
}

/// Echoed configuration block in the performance response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoedConfig {
    /// Shape that ran.
    test_type: TestShape,
    /// Target URL as submitted.
    target_url: String,
    /// Effective concurrency after coercion and clamping.
    virtual_users: u32,
    /// Effective duration after coercion and clamping.
    duration: u32,
    /// Wall-clock handler time in milliseconds.
    actual_duration: u64,
}

/// Metric payload in the performance response.
#[derive(Debug, Serialize)]
pub struct MetricsBlock {
    /// Generated sample series for charting.
    #[serde(rename = "timeSeriesData")]
    time_series_data: Vec<MetricSample>,
    /// Aggregate statistics over the series.
    summary: SummaryStatistics,
}

/// Success payload for the performance lab.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceResponse {
    /// Always true on this path.
    success: bool,
    /// Shape that ran.
    test_type: TestShape,
    /// Echoed configuration.
    test_config: EchoedConfig,
    /// Series and summary metrics.
    metrics: MetricsBlock,
    /// Qualitative verdict.
    summary: Assessment,
    /// Rendered load script mirroring the shape.
    test_script: String,
    /// Run timestamp, RFC 3339.
    timestamp: String,
    /// Completion message.
    message: &'static str,
}

/// Runs the synthetic performance lab.
pub(crate) async fn performance_lab(
    state: &ServerState,
    body: &[u8],
) -> Result<PerformanceResponse, LabError> {
    let request: PerformanceRequest = parse_body(body)?;
    let target = non_empty(request.target_url);
    let shape_name = non_empty(request.test_type);
    let (Some(target), Some(shape_name)) = (target, shape_name) else {
        return Err(LabError::MissingParameters("testType and targetUrl"));
    };
    parse_target_url(&target)?;
    let shape = TestShape::from_wire(&shape_name)?;

    let limits = &state.config.limits;
    let plan = clamp_plan(
        TestPlan::new(
            shape,
            target,
            coerce_u32(request.virtual_users.as_ref()),
            coerce_u32(request.duration.as_ref()),
        ),
        limits,
    );

    let started = Instant::now();
    pacing_delay(u64::from(plan.duration_secs) * 100, limits.pacing_cap_ms).await;

    let start_ms = now_unix_ms();
    let mut rng = StdRng::from_entropy();
    let series = generate_series(&plan, start_ms, &mut rng);
    let stats = summarize(&series, plan.duration_secs);
    let verdict = assess(&stats);
    let script = render_script(&plan);

    Ok(PerformanceResponse {
        success: true,
        test_type: shape,
        test_config: EchoedConfig {
            test_type: shape,
            target_url: plan.target_url.clone(),
            virtual_users: plan.virtual_users,
            duration: plan.duration_secs,
            actual_duration: elapsed_ms(started),
        },
        metrics: MetricsBlock {
            time_series_data: series,
            summary: stats,
        },
        summary: verdict,
        test_script: script,
        timestamp: rfc3339_from_unix_ms(start_ms),
        message: "Performance test completed successfully",
    })
}

/// Clamps plan values to the configured ceilings.
fn clamp_plan(plan: TestPlan, limits: &LimitsConfig) -> TestPlan {
    TestPlan {
        virtual_users: plan.virtual_users.min(limits.max_virtual_users),
        duration_secs: plan.duration_secs.min(limits.max_duration_secs),
        ..plan
    }
}

// ============================================================================
// SECTION: Browser Lab
// ============================================================================

/// Request body for the browser lab.
#[derive(Debug, Deserialize)]
struct BrowserRequest {
    /// Scenario wire name; unknown names fall back to the page demo.
    #[serde(rename = "testType", default)]
    test_type: Option<String>,
}

/// Success payload for the browser lab.
#[derive(Debug, Serialize)]
pub struct BrowserResponse {
    /// Step log, screenshot, and outcome fields.
    #[serde(flatten)]
    outcome: ScenarioOutcome,
    /// Run timestamp, RFC 3339.
    timestamp: String,
    /// Completion message.
    message: &'static str,
}

/// Runs the scripted browser scenario lab.
pub(crate) async fn browser_lab(body: &[u8]) -> Result<BrowserResponse, LabError> {
    let request: BrowserRequest = parse_body(body)?;
    let kind = ScenarioKind::from_wire(request.test_type.as_deref().unwrap_or_default());
    let mut driver = ScriptedBrowser::new();
    let outcome = run_scenario(&mut driver, kind).await;
    Ok(BrowserResponse {
        outcome,
        timestamp: rfc3339_from_unix_ms(now_unix_ms()),
        message: "Test execution completed",
    })
}

// ============================================================================
// SECTION: Security Lab
// ============================================================================

/// Request body for the security scan lab.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecurityRequest {
    /// Target URL to scan.
    #[serde(default)]
    target_url: Option<String>,
    /// Scan type wire name; defaults to a full audit.
    #[serde(default)]
    scan_type: Option<String>,
}

/// Nested scan result block.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    /// Target URL as submitted.
    target_url: String,
    /// Scan type that ran.
    scan_type: ScanType,
    /// Scan timestamp, RFC 3339.
    timestamp: String,
    /// Wall-clock scan duration in milliseconds.
    #[serde(rename = "scanDuration")]
    scan_duration_ms: u64,
    /// Overall risk verdict.
    overall_risk: RiskLevel,
    /// Overall security score.
    security_score: u32,
    /// Flagged issues across sections.
    findings: Vec<ScanFinding>,
    /// Guidance across sections; never empty.
    recommendations: Vec<String>,
    /// Header checklist verdict (real fetch).
    security_headers: HeaderAnalysis,
    /// Simulated SSL analysis; present for https targets only.
    #[serde(skip_serializing_if = "Option::is_none")]
    ssl_analysis: Option<SslAnalysis>,
    /// Simulated vulnerability probes.
    vulnerability_checks: VulnerabilityReport,
    /// Extra checks; full scans only.
    #[serde(skip_serializing_if = "Option::is_none")]
    advanced_checks: Option<AdvancedChecks>,
    /// Compliance block; full scans only.
    #[serde(skip_serializing_if = "Option::is_none")]
    compliance_check: Option<ComplianceCheck>,
}

/// Success payload for the security scan lab.
#[derive(Debug, Serialize)]
pub struct SecurityResponse {
    /// Always true on this path.
    success: bool,
    /// Scan-type-specific completion message.
    message: &'static str,
    /// Nested scan result block.
    results: ScanReport,
    /// Coverage description for the scan type.
    #[serde(rename = "scanTypeDetails")]
    scan_type_details: ScanTypeDetails,
}

/// Runs the security scan lab.
pub(crate) async fn security_lab(
    state: &ServerState,
    body: &[u8],
) -> Result<SecurityResponse, LabError> {
    let request: SecurityRequest = parse_body(body)?;
    let target =
        non_empty(request.target_url).ok_or(LabError::MissingParameters("targetUrl"))?;
    let url = parse_target_url(&target)?;
    let scan = ScanType::from_wire(request.scan_type.as_deref().unwrap_or("full"));

    let started = Instant::now();
    let now_ms = now_unix_ms();
    let mut rng = StdRng::from_entropy();

    let security_headers = match state.header_probe.fetch_headers(&url).await {
        Ok(fetched) => analyze_headers(&fetched, scan),
        Err(err) => {
            HeaderAnalysis::unavailable(format!("Failed to analyze security headers: {err}"), scan)
        }
    };
    let ssl_analysis = (url.scheme() == "https").then(|| {
        let expires_at =
            rfc3339_from_unix_ms(now_ms + i64::from(SIMULATED_CERT_DAYS) * DAY_MS);
        synthesize_ssl(expires_at, scan)
    });
    let vulnerability_checks = synthesize_vulnerabilities(scan, &mut rng);
    let advanced_checks = (scan == ScanType::Full).then(|| synthesize_advanced(&mut rng));
    let compliance_check = (scan == ScanType::Full).then(|| synthesize_compliance(&mut rng));

    let assessment = assess_scan(
        Some(security_headers.score),
        ssl_analysis.as_ref().map(|analysis| analysis.score),
        Some(&vulnerability_checks.summary),
        scan,
    );

    let message = match scan {
        ScanType::Quick => "Quick scan completed successfully",
        ScanType::Full => "Full security audit completed successfully",
    };

    Ok(SecurityResponse {
        success: true,
        message,
        results: ScanReport {
            target_url: target,
            scan_type: scan,
            timestamp: rfc3339_from_unix_ms(now_ms),
            scan_duration_ms: elapsed_ms(started),
            overall_risk: assessment.risk,
            security_score: assessment.score,
            findings: assessment.findings,
            recommendations: assessment.recommendations,
            security_headers,
            ssl_analysis,
            vulnerability_checks,
            advanced_checks,
            compliance_check,
        },
        scan_type_details: scan_type_details(scan),
    })
}

// ============================================================================
// SECTION: API Lab
// ============================================================================

/// Request body for the API lab.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest {
    /// HTTP method to send.
    #[serde(default)]
    method: Option<String>,
    /// Absolute target URL.
    #[serde(default)]
    url: Option<String>,
    /// Extra request headers.
    #[serde(default)]
    headers: Option<BTreeMap<String, String>>,
    /// Request body; strings pass through, other JSON is re-serialized.
    #[serde(default)]
    body: Option<Value>,
    /// Timeout override in milliseconds.
    #[serde(default)]
    timeout: Option<u64>,
    /// Display name for the test.
    #[serde(default)]
    test_name: Option<String>,
}

/// Echo of the request actually sent.
#[derive(Debug, Serialize)]
pub struct RequestEcho {
    /// Method sent, uppercased.
    method: String,
    /// Target URL as submitted.
    url: String,
    /// Headers sent after merging defaults.
    headers: BTreeMap<String, String>,
    /// Body sent, when the method carries one.
    body: Option<String>,
}

/// Captured response block.
#[derive(Debug, Serialize)]
pub struct ResponseEcho {
    /// Response status code.
    status: u16,
    /// Canonical reason phrase.
    #[serde(rename = "statusText")]
    status_text: String,
    /// Response headers, lowercase names.
    headers: BTreeMap<String, String>,
    /// Decoded payload.
    data: Value,
    /// Declared content type.
    #[serde(rename = "contentType")]
    content_type: String,
    /// Payload size in bytes.
    size: usize,
}

/// Timing block for the exchange.
#[derive(Debug, Serialize)]
pub struct PerformanceBlock {
    /// Exchange latency in milliseconds.
    #[serde(rename = "responseTime")]
    response_time: u64,
    /// Exchange timestamp, RFC 3339.
    timestamp: String,
}

/// Success payload for the API lab.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    /// Always true on this path.
    success: bool,
    /// Display name for the test.
    test_name: String,
    /// Echo of the request sent.
    request: RequestEcho,
    /// Captured response.
    response: ResponseEcho,
    /// Timing block.
    performance: PerformanceBlock,
    /// Derived analysis of the exchange.
    analysis: ResponseAnalysis,
    /// Completion message.
    message: &'static str,
}

/// Runs the live API probe lab.
pub(crate) async fn api_lab(state: &ServerState, body: &[u8]) -> Result<ApiResponse, LabError> {
    let request: ApiRequest = parse_body(body)?;
    let method = non_empty(request.method);
    let url_raw = non_empty(request.url);
    let (Some(method), Some(url_raw)) = (method, url_raw) else {
        return Err(LabError::MissingParameters("method and url"));
    };
    let url = parse_target_url(&url_raw)?;

    let body_text = request.body.map(|value| match value {
        Value::String(text) => text,
        other => other.to_string(),
    });
    let spec = ApiRequestSpec {
        method,
        url,
        headers: request.headers.unwrap_or_default(),
        body: body_text,
        timeout_ms: request.timeout,
    };

    let exchange = state.api_probe.execute(&spec).await?;
    let analysis = analyze_exchange(&exchange);

    Ok(ApiResponse {
        success: true,
        test_name: request.test_name.unwrap_or_else(|| "API Test".to_string()),
        request: RequestEcho {
            method: exchange.method.clone(),
            url: url_raw,
            headers: exchange.sent_headers.clone(),
            body: exchange.sent_body.clone(),
        },
        response: ResponseEcho {
            status: exchange.status,
            status_text: exchange.status_text.clone(),
            headers: exchange.headers.clone(),
            data: exchange.data.clone(),
            content_type: exchange.content_type.clone(),
            size: exchange.body_bytes,
        },
        performance: PerformanceBlock {
            response_time: exchange.latency_ms,
            timestamp: rfc3339_from_unix_ms(now_unix_ms()),
        },
        analysis,
        message: "API test completed successfully",
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
