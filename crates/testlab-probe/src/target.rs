// crates/testlab-probe/src/target.rs
// ============================================================================
// Module: Target Validation
// Description: URL parsing shared by the probe-backed labs.
// Purpose: Reject malformed targets before any outbound request is built.
// Dependencies: thiserror, url
// ============================================================================

//! ## Overview
//! Every probe-backed lab validates its target before touching the network.
//! Validation accepts only absolute `http`/`https` URLs; anything else is an
//! invalid-URL failure surfaced through the handler's error envelope.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Outbound probe errors.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The target is not an absolute http(s) URL.
    #[error("invalid URL format")]
    InvalidUrl,
    /// The outbound request exceeded its timeout.
    #[error("request timed out")]
    Timeout,
    /// The outbound request failed below the HTTP layer.
    #[error("network error: {0}")]
    Network(String),
    /// The response body exceeded the configured size limit.
    #[error("response exceeds size limit")]
    ResponseTooLarge,
    /// The request method is not a valid HTTP method.
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),
    /// The probe client could not be constructed.
    #[error("probe client build failed: {0}")]
    Build(String),
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses and validates a target URL string.
///
/// # Errors
///
/// Returns [`ProbeError::InvalidUrl`] when the string is not an absolute
/// `http` or `https` URL.
pub fn parse_target_url(raw: &str) -> Result<Url, ProbeError> {
    let url = Url::parse(raw).map_err(|_| ProbeError::InvalidUrl)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ProbeError::InvalidUrl),
    }
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

    use super::parse_target_url;

    #[test]
    fn absolute_http_urls_are_accepted() {
        assert!(parse_target_url("https://example.com/path").is_ok());
        assert!(parse_target_url("http://localhost:8080").is_ok());
    }

    #[test]
    fn malformed_targets_are_rejected() {
        assert!(parse_target_url("not a url").is_err());
        assert!(parse_target_url("ftp://example.com").is_err());
        assert!(parse_target_url("/relative/path").is_err());
        assert!(parse_target_url("").is_err());
    }
}
