//! Rule-based priority classification for software requests.
//!
//! Maps an [`ImpactAnalysis`] to a [`PriorityTier`] using fixed boolean rules,
//! not a score:
//!
//! | Tier   | Regulatory | Financial impact (USD) | Customer impact | Urgent |
//! |--------|------------|------------------------|-----------------|--------|
//! | high   | yes        | >= 100,000             | both            | yes    |
//! | medium | yes        | 50,000 ..< 100,000     | both            | yes    |
//! | low    | every other combination                                      |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::impact::{CustomerImpact, ImpactAnalysis};

/// Lower bound (inclusive) of the high-tier financial impact.
pub const HIGH_IMPACT_USD: f64 = 100_000.0;

/// Lower bound (inclusive) of the medium-tier financial impact.
pub const MEDIUM_IMPACT_USD: f64 = 50_000.0;

/// System-computed priority of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    Low,
    Medium,
    High,
}

impl PriorityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriorityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("unknown priority: {s}")),
        }
    }
}

/// One of the four criteria shared by the high and medium rules.
///
/// Declared in the order they are reported by [`explain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Criterion {
    RegulatoryRequirement,
    FinancialImpact,
    CustomerImpact,
    OperationalUrgency,
}

impl Criterion {
    pub const ALL: [Criterion; 4] = [
        Self::RegulatoryRequirement,
        Self::FinancialImpact,
        Self::CustomerImpact,
        Self::OperationalUrgency,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            Self::RegulatoryRequirement => "regulatory requirement",
            Self::FinancialImpact => "minimum financial impact ($50k)",
            Self::CustomerImpact => "both internal and external customer impact",
            Self::OperationalUrgency => "operational urgency",
        }
    }

    /// Whether `impact` satisfies this criterion at the medium-tier threshold.
    fn is_met(&self, impact: &ImpactAnalysis) -> bool {
        match self {
            Self::RegulatoryRequirement => impact.is_regulatory_requirement,
            Self::FinancialImpact => impact.financial_impact_usd >= MEDIUM_IMPACT_USD,
            Self::CustomerImpact => impact.customer_impact == CustomerImpact::Both,
            Self::OperationalUrgency => impact.operational_urgency,
        }
    }
}

/// Tier and justification, as displayed next to the user-perceived priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub tier: PriorityTier,
    pub explanation: String,
}

impl Classification {
    pub fn of(impact: &ImpactAnalysis) -> Self {
        Self {
            tier: classify(impact),
            explanation: explain(impact),
        }
    }
}

/// Classify an impact analysis.
///
/// Total over every value; a negative amount is a caller precondition
/// violation and simply falls through to `Low`.
pub fn classify(impact: &ImpactAnalysis) -> PriorityTier {
    let qualifies = impact.is_regulatory_requirement
        && impact.customer_impact == CustomerImpact::Both
        && impact.operational_urgency;

    if qualifies && impact.financial_impact_usd >= HIGH_IMPACT_USD {
        PriorityTier::High
    } else if qualifies
        && impact.financial_impact_usd >= MEDIUM_IMPACT_USD
        && impact.financial_impact_usd < HIGH_IMPACT_USD
    {
        PriorityTier::Medium
    } else {
        PriorityTier::Low
    }
}

/// Criteria not met by `impact`, in reporting order.
pub fn missing_criteria(impact: &ImpactAnalysis) -> Vec<Criterion> {
    Criterion::ALL
        .into_iter()
        .filter(|c| !c.is_met(impact))
        .collect()
}

/// Human-readable justification of the computed tier.
pub fn explain(impact: &ImpactAnalysis) -> String {
    match classify(impact) {
        PriorityTier::High => "High priority: Meets all criteria (Regulatory requirement, \
             Financial impact ≥$100k, Both customer impact, Operational urgency)"
            .to_string(),
        PriorityTier::Medium => "Medium priority: Regulatory requirement with financial impact \
             $50k-$100k, both customer impact, and operational urgency"
            .to_string(),
        PriorityTier::Low => {
            let missing: Vec<&str> = missing_criteria(impact)
                .iter()
                .map(Criterion::description)
                .collect();
            format!(
                "Low priority: Does not meet high/medium criteria. Missing: {}",
                missing.join(", ")
            )
        }
    }
}
