//! Step routing and the single owner of the in-progress draft.

use shared::{
    assessment::{
        AssetSignals, AssessmentDraft, AssessmentResult, CommunitySignals, EvidenceFile,
        FinancialCapacity, MobileSignals, UtilitySignals,
    },
    domain::{
        BillPredictability, DelayFrequency, DisputeHistory, EmploymentType, GroupParticipation,
        IncomeRange, IncomeStability, LoanExperience, OnTimePayment, Purpose, RechargeRegularity,
        SharedResponsibility, SimDuration, StepId, UsageConsistency,
    },
    error::WizardError,
};
use tracing::debug;
use uuid::Uuid;

/// Number of answer-collecting steps shown in the "Step n of N" header.
pub const QUESTIONNAIRE_STEPS: u8 = 5;

/// Successor of `current` for a session whose purpose is `purpose`.
///
/// Daily-expense credit goes straight from loan experience to processing, and
/// asset support is only asked for large loans and credit upgrades. Processing
/// and the report have no successor: the report is reached through
/// [`WizardController::finish`].
pub fn next_step(current: StepId, purpose: Option<Purpose>) -> Option<StepId> {
    let mut next = match current {
        StepId::Landing => StepId::PurposeSelect,
        StepId::PurposeSelect => StepId::CoreTrustForm,
        StepId::CoreTrustForm => StepId::LoanExperience,
        StepId::LoanExperience => StepId::FinancialCapacity,
        StepId::FinancialCapacity => StepId::AssetSupport,
        StepId::AssetSupport => StepId::Processing,
        StepId::Processing | StepId::Report => return None,
    };

    if next == StepId::FinancialCapacity && purpose == Some(Purpose::Small) {
        next = StepId::Processing;
    }

    if next == StepId::AssetSupport && !purpose.is_some_and(Purpose::asks_asset_support) {
        next = StepId::Processing;
    }

    Some(next)
}

macro_rules! slice_patch {
    ($(#[$meta:meta])* $patch:ident => $target:ty { $($field:ident: $ty:ty),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $patch {
            $(pub $field: Option<$ty>,)+
        }

        impl $patch {
            $(
                pub fn $field(value: $ty) -> Self {
                    Self {
                        $field: Some(value),
                        ..Self::default()
                    }
                }
            )+

            /// Writes only the fields this patch carries.
            pub fn apply_to(self, target: &mut $target) {
                $(
                    if let Some(value) = self.$field {
                        target.$field = Some(value);
                    }
                )+
            }
        }
    };
}

slice_patch!(MobilePatch => MobileSignals {
    sim_duration: SimDuration,
    recharge_regularity: RechargeRegularity,
    usage_consistency: UsageConsistency,
});

slice_patch!(UtilityPatch => UtilitySignals {
    on_time_payment: OnTimePayment,
    delay_frequency: DelayFrequency,
    bill_predictability: BillPredictability,
});

slice_patch!(CommunityPatch => CommunitySignals {
    group_participation: GroupParticipation,
    shared_responsibility: SharedResponsibility,
    dispute_history: DisputeHistory,
});

slice_patch!(FinancialPatch => FinancialCapacity {
    employment_type: EmploymentType,
    income_range: IncomeRange,
    income_stability: IncomeStability,
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetPatch {
    pub property: Option<bool>,
    pub fixed_deposits: Option<bool>,
    pub collateral_willingness: Option<bool>,
}

impl AssetPatch {
    pub fn apply_to(self, target: &mut AssetSignals) {
        if let Some(value) = self.property {
            target.property = value;
        }
        if let Some(value) = self.fixed_deposits {
            target.fixed_deposits = value;
        }
        if let Some(value) = self.collateral_willingness {
            target.collateral_willingness = value;
        }
    }
}

/// Field-level change to one slice of the draft. Sibling fields are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftPatch {
    Purpose(Purpose),
    Mobile(MobilePatch),
    Utility(UtilityPatch),
    Community(CommunityPatch),
    /// Appended; evidence is never removed within a session.
    Evidence(Vec<EvidenceFile>),
    LoanExperience(LoanExperience),
    Financial(FinancialPatch),
    Assets(AssetPatch),
}

/// Shallow merge of top-level draft fields.
///
/// A `Some` nested slice replaces the draft's slice wholesale, so callers must
/// carry over sibling fields they want to keep. Evidence is only ever appended
/// through [`DraftPatch::Evidence`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftUpdate {
    pub purpose: Option<Purpose>,
    pub mobile: Option<MobileSignals>,
    pub utility: Option<UtilitySignals>,
    pub community: Option<CommunitySignals>,
    pub loan_experience: Option<LoanExperience>,
    pub financial: Option<FinancialCapacity>,
    pub assets: Option<AssetSignals>,
}

#[derive(Debug, Clone)]
pub struct WizardController {
    session_id: Uuid,
    step: StepId,
    draft: AssessmentDraft,
    result: Option<AssessmentResult>,
    visited: Vec<StepId>,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardController {
    pub fn new() -> Self {
        let session_id = Uuid::new_v4();
        debug!(%session_id, "assessment session started");
        Self {
            session_id,
            step: StepId::Landing,
            draft: AssessmentDraft::default(),
            result: None,
            visited: vec![StepId::Landing],
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn step(&self) -> StepId {
        self.step
    }

    pub fn draft(&self) -> &AssessmentDraft {
        &self.draft
    }

    pub fn result(&self) -> Option<&AssessmentResult> {
        self.result.as_ref()
    }

    /// Steps entered this session, in order.
    pub fn visited(&self) -> &[StepId] {
        &self.visited
    }

    /// `(position, total)` while a questionnaire step is active.
    pub fn progress(&self) -> Option<(u8, u8)> {
        self.step
            .questionnaire_position()
            .map(|position| (position, QUESTIONNAIRE_STEPS))
    }

    /// The draft is frozen from the moment processing starts.
    pub fn is_sealed(&self) -> bool {
        matches!(self.step, StepId::Processing | StepId::Report)
    }

    pub fn expect_step(&self, expected: StepId) -> Result<(), WizardError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WizardError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }

    pub fn advance(&mut self) -> Result<StepId, WizardError> {
        let next = next_step(self.step, self.draft.purpose)
            .ok_or(WizardError::NoSuccessor(self.step))?;
        debug!(
            session_id = %self.session_id,
            from = self.step.code(),
            to = next.code(),
            "wizard advanced"
        );
        self.enter(next);
        Ok(next)
    }

    pub fn update(&mut self, update: DraftUpdate) -> Result<(), WizardError> {
        self.ensure_open()?;
        let draft = &mut self.draft;
        if let Some(purpose) = update.purpose {
            draft.purpose = Some(purpose);
        }
        if let Some(mobile) = update.mobile {
            draft.mobile = mobile;
        }
        if let Some(utility) = update.utility {
            draft.utility = utility;
        }
        if let Some(community) = update.community {
            draft.community = community;
        }
        if let Some(loan_experience) = update.loan_experience {
            draft.loan_experience = Some(loan_experience);
        }
        if let Some(financial) = update.financial {
            draft.financial = financial;
        }
        if let Some(assets) = update.assets {
            draft.assets = assets;
        }
        Ok(())
    }

    pub fn apply(&mut self, patch: DraftPatch) -> Result<(), WizardError> {
        self.ensure_open()?;
        let draft = &mut self.draft;
        match patch {
            DraftPatch::Purpose(purpose) => draft.purpose = Some(purpose),
            DraftPatch::Mobile(patch) => patch.apply_to(&mut draft.mobile),
            DraftPatch::Utility(patch) => patch.apply_to(&mut draft.utility),
            DraftPatch::Community(patch) => patch.apply_to(&mut draft.community),
            DraftPatch::Evidence(files) => draft.evidence.extend(files),
            DraftPatch::LoanExperience(value) => draft.loan_experience = Some(value),
            DraftPatch::Financial(patch) => patch.apply_to(&mut draft.financial),
            DraftPatch::Assets(patch) => patch.apply_to(&mut draft.assets),
        }
        Ok(())
    }

    /// Stores the result and jumps to the report, whatever the current step.
    pub fn finish(&mut self, result: AssessmentResult) {
        debug!(
            session_id = %self.session_id,
            from = self.step.code(),
            band = result.trust_band().code(),
            "wizard finished"
        );
        self.result = Some(result);
        self.enter(StepId::Report);
    }

    /// Discards the session and starts over at the landing step.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn enter(&mut self, step: StepId) {
        self.step = step;
        if self.visited.last() != Some(&step) {
            self.visited.push(step);
        }
    }

    fn ensure_open(&self) -> Result<(), WizardError> {
        if self.is_sealed() {
            Err(WizardError::DraftSealed(self.step))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "tests/wizard_tests.rs"]
mod tests;
