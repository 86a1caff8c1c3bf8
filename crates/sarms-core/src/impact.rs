//! Impact analysis attached to every request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ImpactError;

/// Who is affected by the requested solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerImpact {
    Internal,
    External,
    Both,
}

impl CustomerImpact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::External => "external",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for CustomerImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerImpact {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "internal" => Ok(Self::Internal),
            "external" => Ok(Self::External),
            "both" => Ok(Self::Both),
            _ => Err(format!("unknown customer impact: {s}")),
        }
    }
}

/// Structured justification data that drives priority classification.
///
/// Field names on the wire follow the UI layer (`isRegulatoryRequirement`,
/// `financialImpactUSD`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactAnalysis {
    pub is_regulatory_requirement: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulatory_explanation: Option<String>,
    #[serde(rename = "financialImpactUSD")]
    pub financial_impact_usd: f64,
    pub customer_impact: CustomerImpact,
    pub operational_urgency: bool,
    #[serde(default)]
    pub existing_systems: String,
}

impl Default for ImpactAnalysis {
    fn default() -> Self {
        Self {
            is_regulatory_requirement: false,
            regulatory_explanation: None,
            financial_impact_usd: 0.0,
            customer_impact: CustomerImpact::Internal,
            operational_urgency: false,
            existing_systems: String::new(),
        }
    }
}

impl ImpactAnalysis {
    /// Form-boundary validation.
    ///
    /// The classifier accepts any value of this type; call this before a
    /// record is submitted so a negative amount or a regulatory requirement
    /// without an explanation never reaches it.
    pub fn check(&self) -> Result<(), ImpactError> {
        if !self.financial_impact_usd.is_finite() || self.financial_impact_usd < 0.0 {
            return Err(ImpactError::InvalidFinancialImpact(self.financial_impact_usd));
        }
        if self.is_regulatory_requirement
            && self
                .regulatory_explanation
                .as_deref()
                .is_none_or(|s| s.trim().is_empty())
        {
            return Err(ImpactError::MissingRegulatoryExplanation);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_field_names() {
        let json = r#"{
            "isRegulatoryRequirement": true,
            "regulatoryExplanation": "SOX reporting",
            "financialImpactUSD": 120000,
            "customerImpact": "both",
            "operationalUrgency": true,
            "existingSystems": "SAP"
        }"#;
        let impact: ImpactAnalysis = serde_json::from_str(json).unwrap();
        assert!(impact.is_regulatory_requirement);
        assert_eq!(impact.financial_impact_usd, 120_000.0);
        assert_eq!(impact.customer_impact, CustomerImpact::Both);
        assert_eq!(impact.existing_systems, "SAP");

        let out = serde_json::to_value(&impact).unwrap();
        assert_eq!(out["financialImpactUSD"], 120000.0);
        assert_eq!(out["customerImpact"], "both");
    }

    #[test]
    fn optional_fields_default() {
        let json = r#"{
            "isRegulatoryRequirement": false,
            "financialImpactUSD": 0,
            "customerImpact": "internal",
            "operationalUrgency": false
        }"#;
        let impact: ImpactAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(impact.regulatory_explanation, None);
        assert!(impact.existing_systems.is_empty());
    }

    #[test]
    fn customer_impact_parses_case_insensitively() {
        assert_eq!("Both".parse::<CustomerImpact>(), Ok(CustomerImpact::Both));
        assert_eq!(" external ".parse::<CustomerImpact>(), Ok(CustomerImpact::External));
        assert!("everyone".parse::<CustomerImpact>().is_err());
    }

    #[test]
    fn check_rejects_negative_amount() {
        let impact = ImpactAnalysis {
            financial_impact_usd: -1.0,
            ..Default::default()
        };
        assert_eq!(impact.check(), Err(ImpactError::InvalidFinancialImpact(-1.0)));
    }

    #[test]
    fn check_rejects_nan_amount() {
        let impact = ImpactAnalysis {
            financial_impact_usd: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            impact.check(),
            Err(ImpactError::InvalidFinancialImpact(_))
        ));
    }

    #[test]
    fn check_requires_regulatory_explanation() {
        let mut impact = ImpactAnalysis {
            is_regulatory_requirement: true,
            regulatory_explanation: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(impact.check(), Err(ImpactError::MissingRegulatoryExplanation));

        impact.regulatory_explanation = Some("GDPR data retention".into());
        assert_eq!(impact.check(), Ok(()));
    }

    #[test]
    fn check_accepts_plain_internal_request() {
        assert_eq!(ImpactAnalysis::default().check(), Ok(()));
    }
}
