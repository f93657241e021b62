// crates/frontline-core/src/core/classification.rs
// ============================================================================
// Module: Frontline Classification Labels
// Description: Classification results and per-rule outcomes.
// Purpose: Provide a closed label set with stable display strings.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! A fingerprint run yields exactly one [`Classification`]. Rules report a
//! [`RuleOutcome`], which separates "evidence present but no match" from
//! "required evidence missing" for diagnostics; the policy treats both as a
//! non-match.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ProbeId;

// ============================================================================
// SECTION: Labels
// ============================================================================

/// Label for a regional API Gateway endpoint.
pub const REGIONAL_API_LABEL: &str = "API Gateway: Regional API";
/// Label for an edge-optimized API Gateway endpoint.
pub const EDGE_API_LABEL: &str = "API Gateway: Edge API";
/// Label for an Application Load Balancer.
pub const ALB_LABEL: &str = "ALB";
/// Label for an IPv6-enabled Application Load Balancer.
pub const ALB_IPV6_LABEL: &str = "ALB (IPv6-enabled)";
/// Label for a Network Load Balancer.
pub const NLB_LABEL: &str = "NLB";
/// Label for an IPv6-enabled Network Load Balancer.
pub const NLB_IPV6_LABEL: &str = "NLB (IPv6-enabled)";
/// Fallback label when no signature matched.
pub const UNKNOWN_LABEL: &str = "Unknown";

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Inferred front-end technology for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Classification {
    /// Regional API Gateway endpoint.
    RegionalApi,
    /// Edge-optimized API Gateway endpoint fronted by the CDN.
    EdgeApi,
    /// Application Load Balancer.
    Alb {
        /// Whether IPv6 addresses were resolved.
        ipv6: bool,
    },
    /// Network Load Balancer.
    Nlb {
        /// Whether IPv6 addresses were resolved.
        ipv6: bool,
    },
    /// No signature matched.
    Unknown,
}

impl Classification {
    /// Returns the fixed display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RegionalApi => REGIONAL_API_LABEL,
            Self::EdgeApi => EDGE_API_LABEL,
            Self::Alb {
                ipv6: false,
            } => ALB_LABEL,
            Self::Alb {
                ipv6: true,
            } => ALB_IPV6_LABEL,
            Self::Nlb {
                ipv6: false,
            } => NLB_LABEL,
            Self::Nlb {
                ipv6: true,
            } => NLB_IPV6_LABEL,
            Self::Unknown => UNKNOWN_LABEL,
        }
    }

    /// Returns true for the fallback classification.
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SECTION: Rule Outcome
// ============================================================================

/// Result of evaluating one signature rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RuleOutcome {
    /// The signature matched.
    Matched {
        /// Classification produced by the rule.
        classification: Classification,
    },
    /// Evidence was sufficient but the signature did not match.
    NoMatch,
    /// A required evidence record was absent.
    InsufficientEvidence {
        /// First missing probe in the rule's dependency order.
        missing: ProbeId,
    },
}

impl RuleOutcome {
    /// Returns the classification when the rule matched.
    #[must_use]
    pub const fn classification(self) -> Option<Classification> {
        match self {
            Self::Matched {
                classification,
            } => Some(classification),
            Self::NoMatch | Self::InsufficientEvidence {
                ..
            } => None,
        }
    }
}
