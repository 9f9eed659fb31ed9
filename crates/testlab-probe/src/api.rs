// crates/testlab-probe/src/api.rs
// ============================================================================
// Module: API Probe
// Description: Live request execution and response analysis for the API lab.
// Purpose: Run one configured outbound request and grade what came back.
// Dependencies: reqwest, serde, serde_json, testlab-config
// ============================================================================

//! ## Overview
//! The API lab performs exactly one real outbound request. The executor
//! applies the caller's method, headers, body, and timeout (bounded by the
//! configured ceiling), then captures status, headers, and the decoded body.
//! Analysis of the captured exchange is pure: status category, latency
//! rating, security-header presence score, and payload shape validation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;
use std::time::Instant;

use reqwest::Client;
use reqwest::Method;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::redirect::Policy;
use serde::Serialize;
use serde_json::Value;
use testlab_config::ProbeConfig;
use url::Url;

use crate::headers::classify_transport_error;
use crate::headers::lowercase_header_map;
use crate::target::ProbeError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default per-request timeout when the caller omits one, in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Security headers graded by the API lab, with display names.
const GRADED_HEADERS: &[(&str, &str)] = &[
    ("content-security-policy", "CSP"),
    ("x-frame-options", "X-Frame-Options"),
    ("x-content-type-options", "X-Content-Type-Options"),
    ("strict-transport-security", "HSTS"),
    ("x-xss-protection", "XSS Protection"),
];

// ============================================================================
// SECTION: Request and Exchange
// ============================================================================

/// One configured outbound request.
#[derive(Debug, Clone)]
pub struct ApiRequestSpec {
    /// HTTP method name; uppercased before use.
    pub method: String,
    /// Absolute target URL.
    pub url: Url,
    /// Caller-supplied headers merged over the defaults.
    pub headers: BTreeMap<String, String>,
    /// Optional request body for methods that carry one.
    pub body: Option<String>,
    /// Optional timeout override in milliseconds.
    pub timeout_ms: Option<u64>,
}

/// Captured response data from one executed request.
#[derive(Debug, Clone)]
pub struct ApiExchange {
    /// Method actually sent, uppercased.
    pub method: String,
    /// Headers actually sent.
    pub sent_headers: BTreeMap<String, String>,
    /// Body actually sent, when the method carries one.
    pub sent_body: Option<String>,
    /// Response status code.
    pub status: u16,
    /// Canonical reason phrase for the status.
    pub status_text: String,
    /// Response headers, lowercase names.
    pub headers: BTreeMap<String, String>,
    /// Decoded response payload: JSON when declared, text otherwise.
    pub data: Value,
    /// Declared response content type, empty when absent.
    pub content_type: String,
    /// Response body size in bytes.
    pub body_bytes: usize,
    /// Wall-clock latency of the exchange in milliseconds.
    pub latency_ms: u64,
}

// ============================================================================
// SECTION: Executor
// ============================================================================

/// Outbound request executor for the API lab.
///
/// # Invariants
/// - One outbound request per call; no retries.
/// - The caller's timeout never exceeds the configured ceiling.
/// - Response bodies beyond the configured limit fail closed.
pub struct ApiProbe {
    /// HTTP client used for outbound requests.
    client: Client,
    /// Ceiling for per-request timeouts in milliseconds.
    timeout_ceiling_ms: u64,
    /// Maximum response size read into memory.
    max_response_bytes: usize,
    /// User agent echoed into the sent-header capture.
    user_agent: String,
}

impl ApiProbe {
    /// Creates an API probe from probe configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Build`] when the HTTP client cannot be created.
    pub fn new(config: &ProbeConfig) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|err| ProbeError::Build(err.to_string()))?;
        Ok(Self {
            client,
            timeout_ceiling_ms: config.timeout_ms,
            max_response_bytes: config.max_response_bytes,
            user_agent: config.user_agent.clone(),
        })
    }

    /// Executes the configured request and captures the exchange.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] for invalid methods, transport failures,
    /// timeouts, and oversized responses.
    pub async fn execute(&self, spec: &ApiRequestSpec) -> Result<ApiExchange, ProbeError> {
        let method_name = spec.method.to_uppercase();
        let method = Method::from_str(&method_name)
            .map_err(|_| ProbeError::UnsupportedMethod(spec.method.clone()))?;
        let timeout_ms =
            spec.timeout_ms.unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS).min(self.timeout_ceiling_ms);

        let sent_headers = self.merged_headers(&spec.headers);
        let header_map = to_header_map(&sent_headers)?;
        let carries_body = matches!(method, Method::POST | Method::PUT | Method::PATCH);
        let sent_body = if carries_body { spec.body.clone() } else { None };

        let mut request = self
            .client
            .request(method, spec.url.clone())
            .headers(header_map)
            .timeout(Duration::from_millis(timeout_ms));
        if let Some(body) = &sent_body {
            request = request.body(body.clone());
        }

        let started = Instant::now();
        let response = request.send().await.map_err(classify_transport_error)?;
        let status = response.status();
        let headers = lowercase_header_map(response.headers());
        let bytes = response.bytes().await.map_err(classify_transport_error)?;
        let latency_ms = elapsed_ms(started);

        if bytes.len() > self.max_response_bytes {
            return Err(ProbeError::ResponseTooLarge);
        }

        let content_type = headers.get("content-type").cloned().unwrap_or_default();
        let text = String::from_utf8_lossy(&bytes).to_string();
        let data = if content_type.contains("application/json") {
            serde_json::from_slice(&bytes).unwrap_or(Value::String(text))
        } else {
            Value::String(text)
        };

        Ok(ApiExchange {
            method: method_name,
            sent_headers,
            sent_body,
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            headers,
            data,
            content_type,
            body_bytes: bytes.len(),
            latency_ms,
        })
    }

    /// Merges caller headers over the default content type and user agent.
    fn merged_headers(&self, extra: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        let mut merged = BTreeMap::new();
        merged.insert("content-type".to_string(), "application/json".to_string());
        merged.insert("user-agent".to_string(), self.user_agent.clone());
        for (name, value) in extra {
            merged.insert(name.to_ascii_lowercase(), value.clone());
        }
        merged
    }
}

/// Builds a reqwest header map from a name/value map.
fn to_header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, ProbeError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_str(name)
            .map_err(|_| ProbeError::Network(format!("invalid header name: {name}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ProbeError::Network("invalid header value".to_string()))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Elapsed milliseconds since an instant, saturating.
fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

// ============================================================================
// SECTION: Analysis
// ============================================================================

/// Status code classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusAnalysis {
    /// Status family label.
    pub category: &'static str,
    /// What the family means.
    pub description: &'static str,
    /// Display color hint.
    pub color: &'static str,
}

/// Latency rating bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PerformanceAnalysis {
    /// Qualitative latency rating.
    pub rating: &'static str,
    /// What the rating means.
    pub description: &'static str,
    /// Display color hint.
    pub color: &'static str,
}

/// Security-header presence grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityAnalysis {
    /// Display names of graded headers that are present.
    #[serde(rename = "presentHeaders")]
    pub present_headers: Vec<&'static str>,
    /// Display names of graded headers that are missing.
    #[serde(rename = "missingHeaders")]
    pub missing_headers: Vec<&'static str>,
    /// Present/total percentage score.
    pub score: u32,
}

/// Payload shape validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataValidation {
    /// Whether the payload matched its declared type.
    #[serde(rename = "isValid")]
    pub is_valid: bool,
    /// Payload type label.
    #[serde(rename = "dataType")]
    pub data_type: &'static str,
    /// Payload structure label.
    pub structure: &'static str,
    /// Payload size in bytes.
    pub size: usize,
}

/// Combined analysis of one exchange.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseAnalysis {
    /// Status code classification.
    #[serde(rename = "statusAnalysis")]
    pub status_analysis: StatusAnalysis,
    /// Latency rating.
    #[serde(rename = "performanceAnalysis")]
    pub performance_analysis: PerformanceAnalysis,
    /// Security-header grade.
    #[serde(rename = "securityAnalysis")]
    pub security_analysis: SecurityAnalysis,
    /// Payload shape validation.
    #[serde(rename = "dataValidation")]
    pub data_validation: DataValidation,
    /// Derived guidance; never empty.
    pub recommendations: Vec<String>,
}

/// Analyzes a captured exchange.
///
/// Pure and deterministic; the recommendation list is never empty.
#[must_use]
pub fn analyze_exchange(exchange: &ApiExchange) -> ResponseAnalysis {
    let mut recommendations = Vec::new();
    if exchange.latency_ms > 2_000 {
        recommendations.push(
            "Response time is high (>2s) - consider optimizing API performance".to_string(),
        );
    }
    if exchange.status >= 400 {
        recommendations.push(
            "Request failed - verify endpoint URL, method, and required parameters".to_string(),
        );
    }
    if !exchange.headers.contains_key("content-security-policy") {
        recommendations
            .push("Consider implementing Content Security Policy headers".to_string());
    }
    if recommendations.is_empty() {
        recommendations
            .push("API response looks healthy - good performance and status".to_string());
    }

    ResponseAnalysis {
        status_analysis: status_analysis(exchange.status),
        performance_analysis: performance_analysis(exchange.latency_ms),
        security_analysis: security_analysis(&exchange.headers),
        data_validation: data_validation(&exchange.data, &exchange.content_type, exchange.body_bytes),
        recommendations,
    }
}

/// Classifies a status code into its family.
#[must_use]
pub const fn status_analysis(status: u16) -> StatusAnalysis {
    match status {
        200..=299 => StatusAnalysis {
            category: "Success",
            description: "Request completed successfully",
            color: "green",
        },
        300..=399 => StatusAnalysis {
            category: "Redirect",
            description: "Request redirected",
            color: "yellow",
        },
        400..=499 => StatusAnalysis {
            category: "Client Error",
            description: "Client-side error occurred",
            color: "red",
        },
        500..=599 => StatusAnalysis {
            category: "Server Error",
            description: "Server-side error occurred",
            color: "red",
        },
        _ => StatusAnalysis {
            category: "Unknown",
            description: "Unexpected status code",
            color: "gray",
        },
    }
}

/// Rates an exchange latency.
#[must_use]
pub const fn performance_analysis(latency_ms: u64) -> PerformanceAnalysis {
    match latency_ms {
        0..200 => PerformanceAnalysis {
            rating: "Excellent",
            description: "Very fast response time",
            color: "green",
        },
        200..500 => PerformanceAnalysis {
            rating: "Good",
            description: "Acceptable response time",
            color: "green",
        },
        500..1_000 => PerformanceAnalysis {
            rating: "Fair",
            description: "Slow response time",
            color: "yellow",
        },
        1_000..2_000 => PerformanceAnalysis {
            rating: "Poor",
            description: "Very slow response time",
            color: "orange",
        },
        _ => PerformanceAnalysis {
            rating: "Critical",
            description: "Extremely slow response time",
            color: "red",
        },
    }
}

/// Grades security-header presence on the response.
#[must_use]
pub fn security_analysis(headers: &BTreeMap<String, String>) -> SecurityAnalysis {
    let mut present = Vec::new();
    let mut missing = Vec::new();
    for (name, display) in GRADED_HEADERS {
        if headers.contains_key(*name) {
            present.push(*display);
        } else {
            missing.push(*display);
        }
    }
    let score = percentage(present.len(), GRADED_HEADERS.len());
    SecurityAnalysis {
        present_headers: present,
        missing_headers: missing,
        score,
    }
}

/// Validates the payload against its declared content type.
#[must_use]
pub fn data_validation(data: &Value, content_type: &str, body_bytes: usize) -> DataValidation {
    if content_type.contains("application/json") {
        let structure = match data {
            Value::Array(_) => "array",
            _ => "object",
        };
        DataValidation {
            is_valid: matches!(data, Value::Object(_) | Value::Array(_)),
            data_type: "JSON",
            structure,
            size: body_bytes,
        }
    } else if content_type.contains("text/") {
        DataValidation {
            is_valid: true,
            data_type: "Text",
            structure: "string",
            size: body_bytes,
        }
    } else {
        DataValidation {
            is_valid: true,
            data_type: "Binary/Other",
            structure: "unknown",
            size: body_bytes,
        }
    }
}

/// Integer percentage of `part` over `whole`.
#[allow(clippy::cast_possible_truncation, reason = "Checklist sizes are single digits.")]
const fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 { 0 } else { (part * 100 / whole) as u32 }
}

// ============================================================================
// SECTION: Error Classification
// ============================================================================

/// Error taxonomy surfaced to API lab clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ApiErrorKind {
    /// The request exceeded its timeout.
    Timeout,
    /// The request failed below the HTTP layer.
    #[serde(rename = "Network Error")]
    Network,
    /// The target URL did not parse.
    #[serde(rename = "Invalid URL")]
    InvalidUrl,
    /// Anything else.
    #[serde(rename = "Unknown Error")]
    Unknown,
}

impl ApiErrorKind {
    /// Returns the stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "Timeout",
            Self::Network => "Network Error",
            Self::InvalidUrl => "Invalid URL",
            Self::Unknown => "Unknown Error",
        }
    }
}

/// Classifies a probe error into the client-facing taxonomy.
#[must_use]
pub fn classify_error(err: &ProbeError) -> ApiErrorKind {
    match err {
        ProbeError::Timeout => ApiErrorKind::Timeout,
        ProbeError::Network(_) | ProbeError::ResponseTooLarge => ApiErrorKind::Network,
        ProbeError::InvalidUrl => ApiErrorKind::InvalidUrl,
        ProbeError::UnsupportedMethod(_) | ProbeError::Build(_) => ApiErrorKind::Unknown,
    }
}

/// Returns remediation tips for an error kind.
#[must_use]
pub fn troubleshooting_for(kind: ApiErrorKind) -> Vec<String> {
    let tips: &[&str] = match kind {
        ApiErrorKind::Timeout => &[
            "Request timed out - try increasing timeout or check if the API is responsive",
            "Verify the target server is accessible and not overloaded",
        ],
        ApiErrorKind::Network => &[
            "Network connectivity issue - check your internet connection",
            "Verify the API endpoint URL is correct and accessible",
            "Check if CORS is properly configured on the target API",
        ],
        ApiErrorKind::InvalidUrl => &[
            "Ensure the URL includes the protocol (http:// or https://)",
            "Verify the URL format is correct and properly encoded",
        ],
        ApiErrorKind::Unknown => &[
            "Check the API documentation for correct usage",
            "Verify authentication credentials if required",
            "Ensure request method and parameters are correct",
        ],
    };
    tips.iter().map(|tip| (*tip).to_string()).collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
