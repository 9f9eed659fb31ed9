// crates/testlab-core/src/scan.rs
// ============================================================================
// Module: Security Scan Synthesis
// Description: Simulated security analysis blocks for the scan lab.
// Purpose: Fabricate header, SSL, vulnerability, and compliance verdicts.
// Dependencies: rand, serde
// ============================================================================

//! ## Overview
//! The scan lab combines one real artifact (the fetched response headers) with
//! synthetic analysis blocks. Everything here is pure: the header analysis is
//! a deterministic checklist over the fetched map, and the synthetic blocks
//! draw from an injected random source. Scan depth is a closed enumeration so
//! quick and full scans diverge by match arm, not string comparison.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use rand::Rng;
use serde::Serialize;

// ============================================================================
// SECTION: Scan Types
// ============================================================================

/// Requested scan depth.
///
/// # Invariants
/// - Wire names are stable: `quick`, `full`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanType {
    /// Essential checks only.
    Quick,
    /// Comprehensive audit.
    Full,
}

impl ScanType {
    /// Returns the stable wire name for the scan type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Full => "full",
        }
    }

    /// Resolves a wire name, defaulting to a full audit.
    #[must_use]
    pub fn from_wire(name: &str) -> Self {
        match name {
            "quick" => Self::Quick,
            _ => Self::Full,
        }
    }

    /// Returns the depth label recorded in analysis blocks.
    #[must_use]
    pub const fn depth_label(self) -> &'static str {
        match self {
            Self::Quick => "basic",
            Self::Full => "comprehensive",
        }
    }
}

/// Ordered qualitative risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    /// No significant findings.
    Low,
    /// Findings worth scheduling.
    Medium,
    /// Findings needing prompt attention.
    High,
}

impl RiskLevel {
    /// Returns the stable label for the risk level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

// ============================================================================
// SECTION: Header Analysis
// ============================================================================

/// Headers checked by a quick scan.
pub const ESSENTIAL_SECURITY_HEADERS: &[&str] = &[
    "content-security-policy",
    "strict-transport-security",
    "x-frame-options",
    "x-content-type-options",
];

/// Additional headers checked by a full scan.
pub const EXTENDED_SECURITY_HEADERS: &[&str] = &[
    "x-xss-protection",
    "referrer-policy",
    "permissions-policy",
    "cross-origin-embedder-policy",
    "cross-origin-opener-policy",
];

/// Checklist verdict over the fetched response headers.
#[derive(Debug, Clone, Serialize)]
pub struct HeaderAnalysis {
    /// Checked header names mapped to their observed values.
    pub headers: BTreeMap<String, Option<String>>,
    /// Number of checked headers present.
    pub present: u32,
    /// Number of checked headers missing.
    pub missing: u32,
    /// Present/total percentage score.
    pub score: u32,
    /// Header-specific remediation recommendations.
    pub recommendations: Vec<String>,
    /// Depth label for the analysis.
    #[serde(rename = "scanDepth")]
    pub scan_depth: &'static str,
    /// Failure detail when the fetch did not complete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HeaderAnalysis {
    /// Builds the zero-score analysis used when the header fetch fails.
    #[must_use]
    pub fn unavailable(detail: impl Into<String>, scan: ScanType) -> Self {
        Self {
            headers: BTreeMap::new(),
            present: 0,
            missing: 0,
            score: 0,
            recommendations: Vec::new(),
            scan_depth: scan.depth_label(),
            error: Some(detail.into()),
        }
    }
}

/// Evaluates the security-header checklist against fetched headers.
///
/// `fetched` maps lowercase header names to their values.
#[must_use]
pub fn analyze_headers(fetched: &BTreeMap<String, String>, scan: ScanType) -> HeaderAnalysis {
    let mut checked: Vec<&str> = ESSENTIAL_SECURITY_HEADERS.to_vec();
    if scan == ScanType::Full {
        checked.extend_from_slice(EXTENDED_SECURITY_HEADERS);
    }

    let headers: BTreeMap<String, Option<String>> = checked
        .iter()
        .map(|name| ((*name).to_string(), fetched.get(*name).cloned()))
        .collect();
    let total = to_u32(headers.len());
    let present = to_u32(headers.values().filter(|value| value.is_some()).count());

    let mut recommendations = Vec::new();
    if fetched.get("content-security-policy").is_none() {
        recommendations
            .push("Implement Content Security Policy (CSP) to prevent XSS attacks".to_string());
    }
    if fetched.get("strict-transport-security").is_none() {
        recommendations.push("Add HTTP Strict Transport Security (HSTS) header".to_string());
    }
    if scan == ScanType::Full {
        if fetched.get("permissions-policy").is_none() {
            recommendations.push(
                "Consider implementing Permissions Policy for fine-grained feature control"
                    .to_string(),
            );
        }
        if fetched.get("cross-origin-embedder-policy").is_none() {
            recommendations
                .push("Add Cross-Origin-Embedder-Policy for additional security".to_string());
        }
    }

    HeaderAnalysis {
        headers,
        present,
        missing: total - present,
        score: percentage(present, total),
        recommendations,
        scan_depth: scan.depth_label(),
        error: None,
    }
}

// ============================================================================
// SECTION: SSL Analysis
// ============================================================================

/// Days of certificate validity reported by the simulated analysis.
pub const SIMULATED_CERT_DAYS: u32 = 90;

/// Synthetic certificate block.
#[derive(Debug, Clone, Serialize)]
pub struct CertificateInfo {
    /// Whether the certificate chain validated.
    pub valid: bool,
    /// Issuing authority name.
    pub issuer: String,
    /// Expiry timestamp, RFC 3339.
    pub expires: String,
    /// Days until the certificate expires.
    #[serde(rename = "daysUntilExpiry")]
    pub days_until_expiry: u32,
    /// Whether the certificate is a wildcard.
    #[serde(rename = "wildcardCert")]
    pub wildcard_cert: bool,
}

/// Synthetic TLS protocol support matrix.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TlsProtocols {
    /// TLS 1.3 offered.
    #[serde(rename = "TLS 1.3")]
    pub tls13: bool,
    /// TLS 1.2 offered.
    #[serde(rename = "TLS 1.2")]
    pub tls12: bool,
    /// TLS 1.1 offered.
    #[serde(rename = "TLS 1.1")]
    pub tls11: bool,
    /// TLS 1.0 offered.
    #[serde(rename = "TLS 1.0")]
    pub tls10: bool,
}

/// Synthetic cipher suite tally, full scans only.
#[derive(Debug, Clone, Serialize)]
pub struct CipherSuites {
    /// Count of strong suites.
    pub strong: u32,
    /// Count of weak suites.
    pub weak: u32,
    /// Count of insecure suites.
    pub insecure: u32,
    /// Named suites offered.
    pub details: Vec<&'static str>,
}

/// Known TLS attack exposure matrix, full scans only.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TlsVulnerabilities {
    /// Heartbleed exposure.
    pub heartbleed: bool,
    /// POODLE exposure.
    pub poodle: bool,
    /// BEAST exposure.
    pub beast: bool,
    /// CRIME exposure.
    pub crime: bool,
    /// BREACH exposure.
    pub breach: bool,
    /// Logjam exposure.
    pub logjam: bool,
}

/// Key exchange summary, full scans only.
#[derive(Debug, Clone, Serialize)]
pub struct KeyExchange {
    /// Key size in bits.
    #[serde(rename = "keySize")]
    pub key_size: u32,
    /// Signature algorithm label.
    #[serde(rename = "signatureAlgorithm")]
    pub signature_algorithm: &'static str,
    /// Qualitative exchange strength.
    #[serde(rename = "keyExchangeStrength")]
    pub key_exchange_strength: &'static str,
}

/// Simulated SSL/TLS analysis block.
#[derive(Debug, Clone, Serialize)]
pub struct SslAnalysis {
    /// Certificate details.
    pub certificate: CertificateInfo,
    /// Protocol support matrix.
    pub protocols: TlsProtocols,
    /// Letter grade.
    pub grade: &'static str,
    /// Numeric score.
    pub score: u32,
    /// Depth label for the analysis.
    #[serde(rename = "scanDepth")]
    pub scan_depth: &'static str,
    /// Cipher suite tally (full scans only).
    #[serde(rename = "cipherSuites", skip_serializing_if = "Option::is_none")]
    pub cipher_suites: Option<CipherSuites>,
    /// Known TLS attack exposure (full scans only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vulnerabilities: Option<TlsVulnerabilities>,
    /// Key exchange summary (full scans only).
    #[serde(rename = "keyExchange", skip_serializing_if = "Option::is_none")]
    pub key_exchange: Option<KeyExchange>,
    /// Depth-specific recommendations.
    pub recommendations: Vec<String>,
}

/// Builds the simulated SSL/TLS analysis for an https target.
///
/// `expires_at` is the pre-formatted expiry timestamp; core code never reads
/// the clock, so the caller supplies it.
#[must_use]
pub fn synthesize_ssl(expires_at: String, scan: ScanType) -> SslAnalysis {
    let certificate = CertificateInfo {
        valid: true,
        issuer: "Let's Encrypt Authority X3".to_string(),
        expires: expires_at,
        days_until_expiry: SIMULATED_CERT_DAYS,
        wildcard_cert: false,
    };

    let mut recommendations = Vec::new();
    if certificate.days_until_expiry < 30 {
        recommendations.push("SSL certificate expires soon - plan for renewal".to_string());
    }
    match scan {
        ScanType::Full => {
            recommendations
                .push("SSL/TLS configuration follows current best practices".to_string());
            recommendations
                .push("Consider implementing Certificate Transparency monitoring".to_string());
        }
        ScanType::Quick => {
            recommendations.push("SSL/TLS configuration appears secure".to_string());
        }
    }

    SslAnalysis {
        certificate,
        protocols: TlsProtocols {
            tls13: true,
            tls12: true,
            tls11: false,
            tls10: false,
        },
        grade: "A",
        score: 95,
        scan_depth: scan.depth_label(),
        cipher_suites: (scan == ScanType::Full).then(|| CipherSuites {
            strong: 12,
            weak: 0,
            insecure: 0,
            details: vec![
                "TLS_AES_256_GCM_SHA384",
                "TLS_CHACHA20_POLY1305_SHA256",
                "TLS_AES_128_GCM_SHA256",
            ],
        }),
        vulnerabilities: (scan == ScanType::Full).then_some(TlsVulnerabilities {
            heartbleed: false,
            poodle: false,
            beast: false,
            crime: false,
            breach: false,
            logjam: false,
        }),
        key_exchange: (scan == ScanType::Full).then_some(KeyExchange {
            key_size: 2048,
            signature_algorithm: "SHA256withRSA",
            key_exchange_strength: "Strong",
        }),
        recommendations,
    }
}

// ============================================================================
// SECTION: Vulnerability Checks
// ============================================================================

/// One simulated vulnerability probe result.
#[derive(Debug, Clone, Serialize)]
pub struct VulnerabilityCheck {
    /// Whether the check ran.
    pub tested: bool,
    /// Simulated verdict.
    pub vulnerable: bool,
    /// Risk level assigned to the check.
    pub risk: RiskLevel,
    /// What the check covers.
    pub description: &'static str,
    /// Remediation guidance.
    pub recommendation: &'static str,
    /// OWASP category label (full scans only).
    #[serde(rename = "owaspCategory", skip_serializing_if = "Option::is_none")]
    pub owasp_category: Option<&'static str>,
}

/// Simulated vulnerability probe set.
///
/// # Invariants
/// - The four critical checks always run; the remaining four are present only
///   for full scans.
#[derive(Debug, Clone, Serialize)]
pub struct VulnerabilityChecks {
    /// SQL injection probing.
    #[serde(rename = "sqlInjection")]
    pub sql_injection: VulnerabilityCheck,
    /// Cross-site scripting probing.
    pub xss: VulnerabilityCheck,
    /// Cross-site request forgery analysis.
    pub csrf: VulnerabilityCheck,
    /// Path traversal probing.
    #[serde(rename = "directoryTraversal")]
    pub directory_traversal: VulnerabilityCheck,
    /// Authentication bypass analysis (full scans only).
    #[serde(rename = "brokenAuthentication", skip_serializing_if = "Option::is_none")]
    pub broken_authentication: Option<VulnerabilityCheck>,
    /// Sensitive data disclosure analysis (full scans only).
    #[serde(rename = "sensitiveDataExposure", skip_serializing_if = "Option::is_none")]
    pub sensitive_data_exposure: Option<VulnerabilityCheck>,
    /// Hardening assessment (full scans only).
    #[serde(rename = "securityMisconfiguration", skip_serializing_if = "Option::is_none")]
    pub security_misconfiguration: Option<VulnerabilityCheck>,
    /// Deserialization probing (full scans only).
    #[serde(rename = "insecureDeserialization", skip_serializing_if = "Option::is_none")]
    pub insecure_deserialization: Option<VulnerabilityCheck>,
}

impl VulnerabilityChecks {
    /// Iterates over the checks that ran.
    fn iter(&self) -> impl Iterator<Item = &VulnerabilityCheck> {
        [
            Some(&self.sql_injection),
            Some(&self.xss),
            Some(&self.csrf),
            Some(&self.directory_traversal),
            self.broken_authentication.as_ref(),
            self.sensitive_data_exposure.as_ref(),
            self.security_misconfiguration.as_ref(),
            self.insecure_deserialization.as_ref(),
        ]
        .into_iter()
        .flatten()
    }
}

/// Tally over the vulnerability checks.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VulnerabilitySummary {
    /// Number of checks that ran.
    #[serde(rename = "totalTests")]
    pub total_tests: u32,
    /// Number of checks flagged vulnerable.
    pub vulnerabilities: u32,
    /// Clean/total percentage score.
    pub score: u32,
    /// Depth label for the analysis.
    #[serde(rename = "scanDepth")]
    pub scan_depth: &'static str,
}

/// Vulnerability checks plus their tally.
#[derive(Debug, Clone, Serialize)]
pub struct VulnerabilityReport {
    /// Individual check results.
    pub checks: VulnerabilityChecks,
    /// Aggregate tally.
    pub summary: VulnerabilitySummary,
}

/// Fabricates the vulnerability probe set for a scan.
///
/// Verdicts for the contested checks are drawn from the injected random
/// source, so repeated scans of the same target may disagree; the scan lab is
/// explicitly a simulation.
#[must_use]
pub fn synthesize_vulnerabilities<R: Rng + ?Sized>(
    scan: ScanType,
    rng: &mut R,
) -> VulnerabilityReport {
    let checks = match scan {
        ScanType::Quick => VulnerabilityChecks {
            sql_injection: VulnerabilityCheck {
                tested: true,
                vulnerable: false,
                risk: RiskLevel::Low,
                description: "Basic SQL injection pattern testing",
                recommendation: "Use parameterized queries and input validation",
                owasp_category: None,
            },
            xss: VulnerabilityCheck {
                tested: true,
                vulnerable: false,
                risk: RiskLevel::Low,
                description: "Cross-Site Scripting vulnerability check",
                recommendation: "Implement proper input sanitization",
                owasp_category: None,
            },
            csrf: VulnerabilityCheck {
                tested: true,
                vulnerable: rng.r#gen::<f64>() > 0.8,
                risk: RiskLevel::Medium,
                description: "CSRF protection analysis",
                recommendation: "Implement CSRF tokens for state-changing operations",
                owasp_category: None,
            },
            directory_traversal: VulnerabilityCheck {
                tested: true,
                vulnerable: false,
                risk: RiskLevel::Low,
                description: "Directory traversal vulnerability test",
                recommendation: "Path validation appears properly implemented",
                owasp_category: None,
            },
            broken_authentication: None,
            sensitive_data_exposure: None,
            security_misconfiguration: None,
            insecure_deserialization: None,
        },
        ScanType::Full => VulnerabilityChecks {
            sql_injection: VulnerabilityCheck {
                tested: true,
                vulnerable: false,
                risk: RiskLevel::Low,
                description: "Comprehensive SQL injection testing including blind and time-based \
                              attacks",
                recommendation: "Continue using parameterized queries and input validation",
                owasp_category: Some("A03:2021 - Injection"),
            },
            xss: VulnerabilityCheck {
                tested: true,
                vulnerable: false,
                risk: RiskLevel::Low,
                description: "XSS testing including stored, reflected, and DOM-based XSS",
                recommendation: "Maintain proper input sanitization and CSP implementation",
                owasp_category: Some("A03:2021 - Injection"),
            },
            csrf: VulnerabilityCheck {
                tested: true,
                vulnerable: rng.r#gen::<f64>() > 0.7,
                risk: RiskLevel::Medium,
                description: "Cross-Site Request Forgery protection comprehensive analysis",
                recommendation: "Ensure CSRF tokens are implemented for all state-changing \
                                 operations",
                owasp_category: Some("A01:2021 - Broken Access Control"),
            },
            directory_traversal: VulnerabilityCheck {
                tested: true,
                vulnerable: false,
                risk: RiskLevel::Low,
                description: "Path traversal and local file inclusion testing",
                recommendation: "Path validation and access controls properly implemented",
                owasp_category: Some("A01:2021 - Broken Access Control"),
            },
            broken_authentication: Some(VulnerabilityCheck {
                tested: true,
                vulnerable: rng.r#gen::<f64>() > 0.9,
                risk: RiskLevel::High,
                description: "Authentication bypass and session management testing",
                recommendation: "Implement strong authentication mechanisms and session security",
                owasp_category: Some("A07:2021 - Identification and Authentication Failures"),
            }),
            sensitive_data_exposure: Some(VulnerabilityCheck {
                tested: true,
                vulnerable: rng.r#gen::<f64>() > 0.8,
                risk: RiskLevel::Medium,
                description: "Sensitive information disclosure analysis",
                recommendation: "Review error messages and ensure sensitive data protection",
                owasp_category: Some("A02:2021 - Cryptographic Failures"),
            }),
            security_misconfiguration: Some(VulnerabilityCheck {
                tested: true,
                vulnerable: rng.r#gen::<f64>() > 0.6,
                risk: RiskLevel::Medium,
                description: "Security configuration and hardening assessment",
                recommendation: "Review server configuration and security settings",
                owasp_category: Some("A05:2021 - Security Misconfiguration"),
            }),
            insecure_deserialization: Some(VulnerabilityCheck {
                tested: true,
                vulnerable: false,
                risk: RiskLevel::Low,
                description: "Deserialization vulnerability testing",
                recommendation: "Avoid deserializing untrusted data when possible",
                owasp_category: Some("A08:2021 - Software and Data Integrity Failures"),
            }),
        },
    };

    let total = to_u32(checks.iter().count());
    let vulnerable = to_u32(checks.iter().filter(|check| check.vulnerable).count());
    VulnerabilityReport {
        summary: VulnerabilitySummary {
            total_tests: total,
            vulnerabilities: vulnerable,
            score: percentage(total - vulnerable, total),
            scan_depth: scan.depth_label(),
        },
        checks,
    }
}

// ============================================================================
// SECTION: Advanced Checks and Compliance
// ============================================================================

/// Clickjacking protection verdict.
#[derive(Debug, Clone, Serialize)]
pub struct ClickjackingCheck {
    /// Whether framing protection was detected.
    pub protected: bool,
    /// Mechanism that provides the protection.
    pub method: &'static str,
    /// Remediation guidance.
    pub recommendation: &'static str,
}

/// CORS policy verdict.
#[derive(Debug, Clone, Serialize)]
pub struct CorsCheck {
    /// Whether a CORS policy is configured.
    pub configured: bool,
    /// Issues detected with the policy.
    pub issues: Vec<&'static str>,
    /// Remediation guidance.
    pub recommendation: &'static str,
}

/// Content-type validation verdict.
#[derive(Debug, Clone, Serialize)]
pub struct ContentTypeCheck {
    /// Whether validation was detected.
    pub validated: bool,
    /// Remediation guidance.
    pub recommendation: &'static str,
}

/// Rate limiting verdict.
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitCheck {
    /// Whether rate limiting was detected.
    pub implemented: bool,
    /// Remediation guidance.
    pub recommendation: &'static str,
}

/// Extra checks performed only by full scans.
#[derive(Debug, Clone, Serialize)]
pub struct AdvancedChecks {
    /// Clickjacking protection verdict.
    #[serde(rename = "clickjackingProtection")]
    pub clickjacking_protection: ClickjackingCheck,
    /// CORS policy verdict.
    #[serde(rename = "corsConfiguration")]
    pub cors_configuration: CorsCheck,
    /// Content-type validation verdict.
    #[serde(rename = "contentTypeValidation")]
    pub content_type_validation: ContentTypeCheck,
    /// Rate limiting verdict.
    #[serde(rename = "rateLimiting")]
    pub rate_limiting: RateLimitCheck,
}

/// Fabricates the full-scan advanced check block.
#[must_use]
pub fn synthesize_advanced<R: Rng + ?Sized>(rng: &mut R) -> AdvancedChecks {
    AdvancedChecks {
        clickjacking_protection: ClickjackingCheck {
            protected: rng.r#gen::<f64>() > 0.3,
            method: "X-Frame-Options",
            recommendation: "Ensure proper clickjacking protection is implemented",
        },
        cors_configuration: CorsCheck {
            configured: true,
            issues: if rng.r#gen::<f64>() > 0.7 {
                vec!["Overly permissive CORS policy"]
            } else {
                Vec::new()
            },
            recommendation: "Review CORS policy for security implications",
        },
        content_type_validation: ContentTypeCheck {
            validated: rng.r#gen::<f64>() > 0.2,
            recommendation: "Implement proper content type validation",
        },
        rate_limiting: RateLimitCheck {
            implemented: rng.r#gen::<f64>() > 0.5,
            recommendation: "Consider implementing rate limiting for API endpoints",
        },
    }
}

/// One compliance area score.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceScore {
    /// Percentage score for the area.
    pub score: u32,
    /// Guidance for the area.
    pub recommendation: &'static str,
}

/// Compliance assessment block, full scans only.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceCheck {
    /// OWASP guideline alignment.
    #[serde(rename = "owaspCompliance")]
    pub owasp_compliance: ComplianceScore,
    /// Data-protection readiness.
    #[serde(rename = "gdprReadiness")]
    pub gdpr_readiness: ComplianceScore,
    /// General industry standard alignment.
    #[serde(rename = "industryStandards")]
    pub industry_standards: ComplianceScore,
}

/// Fabricates the full-scan compliance block.
#[must_use]
pub fn synthesize_compliance<R: Rng + ?Sized>(rng: &mut R) -> ComplianceCheck {
    ComplianceCheck {
        owasp_compliance: ComplianceScore {
            score: rng.gen_range(80..100),
            recommendation: "Continue following OWASP security guidelines",
        },
        gdpr_readiness: ComplianceScore {
            score: rng.gen_range(70..100),
            recommendation: "Review data protection and privacy measures",
        },
        industry_standards: ComplianceScore {
            score: rng.gen_range(75..100),
            recommendation: "Maintain alignment with industry security standards",
        },
    }
}

// ============================================================================
// SECTION: Overall Assessment
// ============================================================================

/// Score assumed when no section produced a score.
const DEFAULT_SECURITY_SCORE: u32 = 85;

/// One flagged issue in the overall assessment.
#[derive(Debug, Clone, Serialize)]
pub struct ScanFinding {
    /// Section the finding belongs to.
    pub category: &'static str,
    /// Severity of the finding.
    pub severity: RiskLevel,
    /// What was observed.
    pub issue: String,
    /// Why it matters.
    pub impact: &'static str,
}

/// Overall verdict across the scan sections.
#[derive(Debug, Clone, Serialize)]
pub struct ScanAssessment {
    /// Mean of the available section scores.
    pub score: u32,
    /// Risk level derived from the score.
    pub risk: RiskLevel,
    /// Flagged issues across sections.
    pub findings: Vec<ScanFinding>,
    /// Scan-type-specific guidance; never empty.
    pub recommendations: Vec<String>,
}

/// Combines section scores into the overall scan verdict.
#[must_use]
pub fn assess_scan(
    header_score: Option<u32>,
    ssl_score: Option<u32>,
    vulnerabilities: Option<&VulnerabilitySummary>,
    scan: ScanType,
) -> ScanAssessment {
    let mut findings = Vec::new();
    let mut total = 0;
    let mut count = 0;

    if let Some(score) = header_score {
        total += score;
        count += 1;
        if score < 50 {
            findings.push(ScanFinding {
                category: "Security Headers",
                severity: RiskLevel::High,
                issue: "Critical security headers missing".to_string(),
                impact: "Increased risk of XSS, clickjacking, and other client-side attacks",
            });
        } else if score < 80 {
            findings.push(ScanFinding {
                category: "Security Headers",
                severity: RiskLevel::Medium,
                issue: "Some security headers missing".to_string(),
                impact: "Moderate security risk",
            });
        }
    }

    if let Some(score) = ssl_score {
        total += score;
        count += 1;
        if score < 70 {
            findings.push(ScanFinding {
                category: "SSL/TLS",
                severity: RiskLevel::High,
                issue: "SSL/TLS configuration issues detected".to_string(),
                impact: "Data transmission may be compromised",
            });
        }
    }

    if let Some(summary) = vulnerabilities {
        total += summary.score;
        count += 1;
        if summary.vulnerabilities > 0 {
            let severity =
                if summary.vulnerabilities > 2 { RiskLevel::High } else { RiskLevel::Medium };
            findings.push(ScanFinding {
                category: "Application Security",
                severity,
                issue: format!("{} potential vulnerabilities detected", summary.vulnerabilities),
                impact: "Application may be vulnerable to exploitation",
            });
        }
    }

    let score = if count == 0 { DEFAULT_SECURITY_SCORE } else { (total + count / 2) / count };
    let risk = if score < 60 {
        RiskLevel::High
    } else if score < 80 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    let mut recommendations = Vec::new();
    match scan {
        ScanType::Quick => {
            recommendations
                .push("Consider running a full security audit for comprehensive analysis".into());
            if findings.is_empty() {
                recommendations.push("Basic security posture appears adequate".into());
            }
        }
        ScanType::Full => {
            recommendations.push("Implement regular automated security scanning".into());
            recommendations
                .push("Consider penetration testing for comprehensive assessment".into());
            if findings.is_empty() {
                recommendations
                    .push("Security posture appears strong - maintain current practices".into());
            }
        }
    }
    if !findings.is_empty() {
        recommendations.push("Address identified security findings based on severity".into());
        recommendations.push("Implement security training for development team".into());
    }

    ScanAssessment {
        score,
        risk,
        findings,
        recommendations,
    }
}

// ============================================================================
// SECTION: Scan Type Details
// ============================================================================

/// Human-readable description of what a scan type covers.
#[derive(Debug, Clone, Serialize)]
pub struct ScanTypeDetails {
    /// One-line focus statement.
    pub focus: &'static str,
    /// Expected wall-clock duration range.
    pub duration: &'static str,
    /// Checks included in the scan.
    pub checks: Vec<&'static str>,
}

/// Returns the coverage description for a scan type.
#[must_use]
pub fn scan_type_details(scan: ScanType) -> ScanTypeDetails {
    match scan {
        ScanType::Quick => ScanTypeDetails {
            focus: "Essential security basics",
            duration: "5-10 seconds",
            checks: vec![
                "Core security headers (CSP, HSTS, X-Frame-Options)",
                "Basic SSL/TLS validation",
                "Top 4 critical vulnerabilities (SQL Injection, XSS, CSRF, Directory Traversal)",
                "Basic risk assessment",
            ],
        },
        ScanType::Full => ScanTypeDetails {
            focus: "Comprehensive security analysis",
            duration: "15-30 seconds",
            checks: vec![
                "All security headers with detailed analysis",
                "Complete SSL/TLS assessment with cipher analysis",
                "Full OWASP Top 10 vulnerability testing",
                "Advanced security checks (clickjacking, CORS, etc.)",
                "Compliance assessment (PCI DSS, OWASP guidelines)",
                "Detailed remediation recommendations",
            ],
        },
    }
}

/// Converts a small count to `u32`.
#[allow(clippy::cast_possible_truncation, reason = "Checklist sizes are single digits.")]
const fn to_u32(value: usize) -> u32 {
    value as u32
}

/// Rounded integer percentage of `part` over `whole`.
const fn percentage(part: u32, whole: u32) -> u32 {
    if whole == 0 { 0 } else { (part * 100 + whole / 2) / whole }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
