// crates/frontline-core/src/runtime/policy.rs
// ============================================================================
// Module: Classification Policy
// Description: Ordered signature rules with a terminal fallback.
// Purpose: Produce exactly one classification per evidence aggregate.
// Dependencies: crate::{core, runtime::rules}, serde
// ============================================================================

//! ## Overview
//! The policy evaluates rules in priority order and stops at the first match.
//! API Gateway rules precede load balancer rules, and the regional rule
//! precedes the edge rule. Evaluation is synchronous, single-pass, and free of
//! side effects; it never fails.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::Classification;
use crate::core::EvidenceAggregate;
use crate::core::RuleOutcome;
use crate::core::SignatureError;
use crate::core::SignatureTable;
use crate::runtime::rules::AlbRule;
use crate::runtime::rules::EdgeApiRule;
use crate::runtime::rules::NlbRule;
use crate::runtime::rules::RegionalApiRule;
use crate::runtime::rules::SignatureRule;

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Outcome of one evaluated rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTrace {
    /// Rule name.
    pub rule: String,
    /// Rule outcome.
    pub outcome: RuleOutcome,
}

/// Policy decision with its evaluation trace.
///
/// # Invariants
/// - `trace` ends at the first matching rule, or covers every rule when the
///   classification is the fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Selected classification.
    pub classification: Classification,
    /// Rules evaluated, in order.
    pub trace: Vec<RuleTrace>,
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Ordered rule list plus the `Unknown` fallback.
pub struct ClassificationPolicy {
    /// Rules in priority order.
    rules: Vec<Box<dyn SignatureRule>>,
}

impl ClassificationPolicy {
    /// Builds the built-in priority list: regional API, edge API, ALB, NLB.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError`] when the table is invalid.
    pub fn standard(table: &SignatureTable) -> Result<Self, SignatureError> {
        table.validate()?;
        Ok(Self::from_rules(vec![
            Box::new(RegionalApiRule::new(table)?),
            Box::new(EdgeApiRule::new(table)?),
            Box::new(AlbRule::new(table)?),
            Box::new(NlbRule::new(table)?),
        ]))
    }

    /// Builds a policy from an explicit rule list, evaluated in order.
    #[must_use]
    pub fn from_rules(rules: Vec<Box<dyn SignatureRule>>) -> Self {
        Self {
            rules,
        }
    }

    /// Returns the rule names in priority order.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Returns the first matching classification, or `Unknown`.
    #[must_use]
    pub fn classify(&self, evidence: &EvidenceAggregate) -> Classification {
        self.rules
            .iter()
            .find_map(|rule| rule.evaluate(evidence).classification())
            .unwrap_or(Classification::Unknown)
    }

    /// Evaluates rules in order and records each outcome up to the first match.
    #[must_use]
    pub fn evaluate(&self, evidence: &EvidenceAggregate) -> Decision {
        let mut trace = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            let outcome = rule.evaluate(evidence);
            trace.push(RuleTrace {
                rule: rule.name().to_string(),
                outcome,
            });
            if let Some(classification) = outcome.classification() {
                return Decision {
                    classification,
                    trace,
                };
            }
        }
        Decision {
            classification: Classification::Unknown,
            trace,
        }
    }
}
