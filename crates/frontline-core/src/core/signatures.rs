// crates/frontline-core/src/core/signatures.rs
// ============================================================================
// Module: Frontline Signature Table
// Description: Tunable fingerprints consumed by the built-in signature rules.
// Purpose: Keep header names, thresholds, and host patterns out of rule code.
// Dependencies: regex, serde, thiserror
// ============================================================================

//! ## Overview
//! Providers change observable fingerprints over time, so header names, IP
//! thresholds, and hostname conventions live in a [`SignatureTable`] that can be
//! overridden from configuration. Defaults track the current provider
//! behavior.
//!
//! Host patterns must be anchored (`^...$`). They are matched against the
//! CNAME-resolved name after stripping trailing root dots and lower-casing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::evidence::canonical_header_name;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default API Gateway hostname convention: `<id>.execute-api.<region>.amazonaws.com`.
pub const DEFAULT_API_GATEWAY_HOST_PATTERN: &str =
    r"^[^.]+\.execute-api\.[^.]+\.amazonaws\.com$";
/// Default ALB hostname convention: `<name>.<region>.elb.amazonaws.com`.
pub const DEFAULT_ALB_HOST_PATTERN: &str = r"^[^.]+\.[^.]+\.elb\.amazonaws\.com$";
/// Default NLB hostname convention: `<name>.elb.<region>.amazonaws.com`.
pub const DEFAULT_NLB_HOST_PATTERN: &str = r"^[^.]+\.elb\.[^.]+\.amazonaws\.com$";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Signature table validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// A host pattern failed to compile.
    #[error("invalid host pattern {field}: {message}")]
    InvalidPattern {
        /// Table field holding the pattern.
        field: &'static str,
        /// Compiler message.
        message: String,
    },
    /// A host pattern is not anchored at both ends.
    #[error("host pattern {field} must be anchored with ^ and $")]
    Unanchored {
        /// Table field holding the pattern.
        field: &'static str,
    },
    /// A table entry is empty or inconsistent.
    #[error("invalid signature table: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Host Pattern
// ============================================================================

/// Compiled, anchored hostname pattern.
#[derive(Debug, Clone)]
pub struct HostPattern {
    /// Compiled expression.
    regex: Regex,
}

impl HostPattern {
    /// Compiles an anchored pattern.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError`] when the pattern is unanchored or invalid.
    pub fn new(field: &'static str, pattern: &str) -> Result<Self, SignatureError> {
        if !pattern.starts_with('^') || !pattern.ends_with('$') {
            return Err(SignatureError::Unanchored {
                field,
            });
        }
        let regex = Regex::new(pattern).map_err(|err| SignatureError::InvalidPattern {
            field,
            message: err.to_string(),
        })?;
        Ok(Self {
            regex,
        })
    }

    /// Returns true when the normalized hostname matches the pattern.
    #[must_use]
    pub fn matches(&self, hostname: &str) -> bool {
        let normalized = hostname.trim_end_matches('.').to_ascii_lowercase();
        self.regex.is_match(&normalized)
    }

    /// Returns the source pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

// ============================================================================
// SECTION: Signature Table
// ============================================================================

/// Tunable fingerprints for the built-in rules.
///
/// # Invariants
/// - Host patterns are anchored regular expressions.
/// - `regional_max_ipv4 < edge_min_ipv4`, keeping the API rules disjoint.
/// - Header names are compared in canonical MIME form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignatureTable {
    /// API Gateway hostname convention.
    pub api_gateway_host_pattern: String,
    /// Application Load Balancer hostname convention.
    pub alb_host_pattern: String,
    /// Network Load Balancer hostname convention.
    pub nlb_host_pattern: String,
    /// Header carrying the regional API request identifier.
    pub regional_request_id_header: String,
    /// Header carrying the edge API identifier.
    pub edge_api_id_header: String,
    /// Headers added by the CDN on HTTP/1.1 responses.
    pub cdn_headers: Vec<String>,
    /// Header inspected on the HTTP/1.0 response.
    pub cdn_server_header: String,
    /// Value of `cdn_server_header` identifying the CDN.
    pub cdn_server_value: String,
    /// Maximum IPv4 addresses for a regional endpoint.
    pub regional_max_ipv4: usize,
    /// Minimum IPv4 addresses for an edge endpoint.
    pub edge_min_ipv4: usize,
}

impl Default for SignatureTable {
    fn default() -> Self {
        Self {
            api_gateway_host_pattern: DEFAULT_API_GATEWAY_HOST_PATTERN.to_string(),
            alb_host_pattern: DEFAULT_ALB_HOST_PATTERN.to_string(),
            nlb_host_pattern: DEFAULT_NLB_HOST_PATTERN.to_string(),
            regional_request_id_header: "Apigw-Requestid".to_string(),
            edge_api_id_header: "X-Amz-Apigw-Id".to_string(),
            cdn_headers: vec!["X-Amz-Cf-Pop".to_string(), "Via".to_string()],
            cdn_server_header: "Server".to_string(),
            cdn_server_value: "CloudFront".to_string(),
            regional_max_ipv4: 2,
            edge_min_ipv4: 4,
        }
    }
}

impl SignatureTable {
    /// Validates patterns, header names, and thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError`] when any entry is unusable.
    pub fn validate(&self) -> Result<(), SignatureError> {
        self.api_gateway_pattern()?;
        self.alb_pattern()?;
        self.nlb_pattern()?;
        let named = [
            ("regional_request_id_header", &self.regional_request_id_header),
            ("edge_api_id_header", &self.edge_api_id_header),
            ("cdn_server_header", &self.cdn_server_header),
            ("cdn_server_value", &self.cdn_server_value),
        ];
        for (field, value) in named {
            if value.trim().is_empty() {
                return Err(SignatureError::Invalid(format!("{field} must not be empty")));
            }
        }
        if self.cdn_headers.is_empty() {
            return Err(SignatureError::Invalid("cdn_headers must not be empty".to_string()));
        }
        if self.cdn_headers.iter().any(|header| header.trim().is_empty()) {
            return Err(SignatureError::Invalid(
                "cdn_headers entries must not be empty".to_string(),
            ));
        }
        if self.regional_max_ipv4 >= self.edge_min_ipv4 {
            return Err(SignatureError::Invalid(
                "regional_max_ipv4 must be below edge_min_ipv4".to_string(),
            ));
        }
        Ok(())
    }

    /// Compiles the API Gateway host pattern.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError`] when the pattern is unusable.
    pub fn api_gateway_pattern(&self) -> Result<HostPattern, SignatureError> {
        HostPattern::new("api_gateway_host_pattern", &self.api_gateway_host_pattern)
    }

    /// Compiles the ALB host pattern.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError`] when the pattern is unusable.
    pub fn alb_pattern(&self) -> Result<HostPattern, SignatureError> {
        HostPattern::new("alb_host_pattern", &self.alb_host_pattern)
    }

    /// Compiles the NLB host pattern.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError`] when the pattern is unusable.
    pub fn nlb_pattern(&self) -> Result<HostPattern, SignatureError> {
        HostPattern::new("nlb_host_pattern", &self.nlb_host_pattern)
    }

    /// Returns the CDN header names in canonical form.
    #[must_use]
    pub fn canonical_cdn_headers(&self) -> Vec<String> {
        self.cdn_headers.iter().map(|header| canonical_header_name(header.trim())).collect()
    }
}
