use serde::{Deserialize, Serialize};

use crate::domain::{
    BillPredictability, DelayFrequency, DisputeHistory, EmploymentType, EvidenceCategory,
    GroupParticipation, IncomeRange, IncomeStability, LoanExperience, OnTimePayment, Purpose,
    RechargeRegularity, SharedResponsibility, SimDuration, TrustBand, UsageConsistency,
};

pub const FALLBACK_INTERPRETATION: &str = "Analysis completed with baseline metrics.";
pub const FALLBACK_ALIGNMENT: &str = "650-699";
pub const FALLBACK_REASONING: [&str; 3] = [
    "Consistent utility payments noted.",
    "Solid community participation.",
    "Verification of evidence required.",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileSignals {
    pub sim_duration: Option<SimDuration>,
    pub recharge_regularity: Option<RechargeRegularity>,
    pub usage_consistency: Option<UsageConsistency>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilitySignals {
    pub on_time_payment: Option<OnTimePayment>,
    pub delay_frequency: Option<DelayFrequency>,
    pub bill_predictability: Option<BillPredictability>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunitySignals {
    pub group_participation: Option<GroupParticipation>,
    pub shared_responsibility: Option<SharedResponsibility>,
    pub dispute_history: Option<DisputeHistory>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialCapacity {
    pub employment_type: Option<EmploymentType>,
    pub income_range: Option<IncomeRange>,
    pub income_stability: Option<IncomeStability>,
}

impl FinancialCapacity {
    pub fn is_complete(&self) -> bool {
        self.employment_type.is_some() && self.income_range.is_some() && self.income_stability.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSignals {
    pub property: bool,
    pub fixed_deposits: bool,
    pub collateral_willingness: bool,
}

/// Metadata for one supporting document. Contents are never read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceFile {
    pub name: String,
    pub category: EvidenceCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub months_covered: u32,
}

/// Everything the applicant has answered so far in the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentDraft {
    pub purpose: Option<Purpose>,
    pub mobile: MobileSignals,
    pub utility: UtilitySignals,
    pub community: CommunitySignals,
    pub evidence: Vec<EvidenceFile>,
    pub loan_experience: Option<LoanExperience>,
    pub financial: FinancialCapacity,
    pub assets: AssetSignals,
}

impl AssessmentDraft {
    /// Raw month total across all evidence, before any cap is applied.
    pub fn evidence_months(&self) -> u32 {
        self.evidence.iter().map(|file| file.months_covered).sum()
    }
}

/// The reasoning service's verdict. Fields are read-only after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    trust_band: TrustBand,
    interpretation: String,
    traditional_alignment: String,
    #[serde(default)]
    reasoning: Vec<String>,
}

impl AssessmentResult {
    pub fn new(
        trust_band: TrustBand,
        interpretation: impl Into<String>,
        traditional_alignment: impl Into<String>,
        reasoning: Vec<String>,
    ) -> Self {
        Self {
            trust_band,
            interpretation: interpretation.into(),
            traditional_alignment: traditional_alignment.into(),
            reasoning,
        }
    }

    /// Fixed result shown whenever the reasoning service cannot answer. None of
    /// it is derived from the draft.
    pub fn fallback() -> Self {
        Self::new(
            TrustBand::T3,
            FALLBACK_INTERPRETATION,
            FALLBACK_ALIGNMENT,
            FALLBACK_REASONING.iter().map(|line| line.to_string()).collect(),
        )
    }

    pub fn trust_band(&self) -> TrustBand {
        self.trust_band
    }

    pub fn interpretation(&self) -> &str {
        &self.interpretation
    }

    pub fn traditional_alignment(&self) -> &str {
        &self.traditional_alignment
    }

    pub fn reasoning(&self) -> &[String] {
        &self.reasoning
    }
}
