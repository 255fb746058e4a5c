//! Per-step editing state and the completion gates in front of `advance`.

use std::fmt;

use shared::{
    assessment::{
        AssetSignals, AssessmentDraft, CommunitySignals, FinancialCapacity, MobileSignals,
        UtilitySignals,
    },
    domain::{EvidenceCategory, LoanExperience, Purpose, StepId},
    error::WizardError,
};

use crate::{
    evidence::{coverage_complete, coverage_months, record_upload, UploadedFile},
    wizard::{
        CommunityPatch, DraftPatch, DraftUpdate, FinancialPatch, MobilePatch, UtilityPatch,
        WizardController,
    },
};

pub trait StepView {
    fn step(&self) -> StepId;

    fn is_complete(&self, draft: &AssessmentDraft) -> bool;

    fn title(&self) -> &'static str {
        self.step().title()
    }
}

/// The core trust form needs one answer per signal section plus six months of
/// evidence.
pub fn core_trust_complete(draft: &AssessmentDraft) -> bool {
    draft.mobile.sim_duration.is_some()
        && draft.utility.on_time_payment.is_some()
        && draft.community.group_participation.is_some()
        && coverage_complete(&draft.evidence)
}

fn submit(
    view: &impl StepView,
    wizard: &mut WizardController,
    complete: bool,
) -> Result<StepId, WizardError> {
    wizard.expect_step(view.step())?;
    if !complete {
        return Err(WizardError::Incomplete(view.step()));
    }
    wizard.advance()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Landing;

impl Landing {
    pub fn start(&self, wizard: &mut WizardController) -> Result<StepId, WizardError> {
        submit(self, wizard, true)
    }
}

impl StepView for Landing {
    fn step(&self) -> StepId {
        StepId::Landing
    }

    fn is_complete(&self, _draft: &AssessmentDraft) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PurposeSelect;

impl PurposeSelect {
    /// Picking a purpose commits it and moves on in one go.
    pub fn select(
        &self,
        wizard: &mut WizardController,
        purpose: Purpose,
    ) -> Result<StepId, WizardError> {
        wizard.expect_step(self.step())?;
        wizard.apply(DraftPatch::Purpose(purpose))?;
        wizard.advance()
    }
}

impl StepView for PurposeSelect {
    fn step(&self) -> StepId {
        StepId::PurposeSelect
    }

    fn is_complete(&self, draft: &AssessmentDraft) -> bool {
        draft.purpose.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CoreTrustForm {
    mobile: MobileSignals,
    utility: UtilitySignals,
    community: CommunitySignals,
}

impl CoreTrustForm {
    pub fn from_draft(draft: &AssessmentDraft) -> Self {
        Self {
            mobile: draft.mobile.clone(),
            utility: draft.utility.clone(),
            community: draft.community.clone(),
        }
    }

    pub fn mobile(&self) -> &MobileSignals {
        &self.mobile
    }

    pub fn utility(&self) -> &UtilitySignals {
        &self.utility
    }

    pub fn community(&self) -> &CommunitySignals {
        &self.community
    }

    pub fn update_mobile(
        &mut self,
        wizard: &mut WizardController,
        patch: MobilePatch,
    ) -> Result<(), WizardError> {
        wizard.expect_step(self.step())?;
        wizard.apply(DraftPatch::Mobile(patch))?;
        patch.apply_to(&mut self.mobile);
        Ok(())
    }

    pub fn update_utility(
        &mut self,
        wizard: &mut WizardController,
        patch: UtilityPatch,
    ) -> Result<(), WizardError> {
        wizard.expect_step(self.step())?;
        wizard.apply(DraftPatch::Utility(patch))?;
        patch.apply_to(&mut self.utility);
        Ok(())
    }

    pub fn update_community(
        &mut self,
        wizard: &mut WizardController,
        patch: CommunityPatch,
    ) -> Result<(), WizardError> {
        wizard.expect_step(self.step())?;
        wizard.apply(DraftPatch::Community(patch))?;
        patch.apply_to(&mut self.community);
        Ok(())
    }

    /// Records the files as evidence and returns the resulting coverage.
    pub fn upload<I>(
        &self,
        wizard: &mut WizardController,
        files: I,
        category: EvidenceCategory,
    ) -> Result<u32, WizardError>
    where
        I: IntoIterator<Item = UploadedFile>,
    {
        wizard.expect_step(self.step())?;
        wizard.apply(DraftPatch::Evidence(record_upload(files, category)))?;
        Ok(coverage_months(&wizard.draft().evidence))
    }

    pub fn submit(&self, wizard: &mut WizardController) -> Result<StepId, WizardError> {
        let complete = self.is_complete(wizard.draft());
        submit(self, wizard, complete)
    }
}

impl StepView for CoreTrustForm {
    fn step(&self) -> StepId {
        StepId::CoreTrustForm
    }

    fn is_complete(&self, draft: &AssessmentDraft) -> bool {
        core_trust_complete(draft)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoanExperienceView;

impl LoanExperienceView {
    pub fn select(
        &self,
        wizard: &mut WizardController,
        value: LoanExperience,
    ) -> Result<StepId, WizardError> {
        wizard.expect_step(self.step())?;
        wizard.apply(DraftPatch::LoanExperience(value))?;
        wizard.advance()
    }
}

impl StepView for LoanExperienceView {
    fn step(&self) -> StepId {
        StepId::LoanExperience
    }

    fn is_complete(&self, draft: &AssessmentDraft) -> bool {
        draft.loan_experience.is_some()
    }
}

/// Starts empty and pushes the whole slice upward on every change.
#[derive(Debug, Clone, Default)]
pub struct FinancialCapacityView {
    local: FinancialCapacity,
}

impl FinancialCapacityView {
    pub fn local(&self) -> &FinancialCapacity {
        &self.local
    }

    pub fn set(
        &mut self,
        wizard: &mut WizardController,
        patch: FinancialPatch,
    ) -> Result<(), WizardError> {
        wizard.expect_step(self.step())?;
        let mut next = self.local.clone();
        patch.apply_to(&mut next);
        wizard.update(DraftUpdate {
            financial: Some(next.clone()),
            ..DraftUpdate::default()
        })?;
        self.local = next;
        Ok(())
    }

    pub fn submit(&self, wizard: &mut WizardController) -> Result<StepId, WizardError> {
        let complete = self.local.is_complete();
        submit(self, wizard, complete)
    }
}

impl StepView for FinancialCapacityView {
    fn step(&self) -> StepId {
        StepId::FinancialCapacity
    }

    fn is_complete(&self, _draft: &AssessmentDraft) -> bool {
        self.local.is_complete()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKey {
    Property,
    FixedDeposits,
    CollateralWillingness,
}

impl AssetKey {
    pub const ALL: [AssetKey; 3] = [
        AssetKey::Property,
        AssetKey::FixedDeposits,
        AssetKey::CollateralWillingness,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AssetKey::Property => "property",
            AssetKey::FixedDeposits => "fixed deposits",
            AssetKey::CollateralWillingness => "collateral willingness",
        }
    }

    pub fn get(self, assets: &AssetSignals) -> bool {
        match self {
            AssetKey::Property => assets.property,
            AssetKey::FixedDeposits => assets.fixed_deposits,
            AssetKey::CollateralWillingness => assets.collateral_willingness,
        }
    }

    fn flip(self, assets: &mut AssetSignals) {
        match self {
            AssetKey::Property => assets.property = !assets.property,
            AssetKey::FixedDeposits => assets.fixed_deposits = !assets.fixed_deposits,
            AssetKey::CollateralWillingness => {
                assets.collateral_willingness = !assets.collateral_willingness
            }
        }
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Optional checkboxes; finalizing always moves on.
#[derive(Debug, Clone, Default)]
pub struct AssetSupportView {
    local: AssetSignals,
}

impl AssetSupportView {
    pub fn local(&self) -> &AssetSignals {
        &self.local
    }

    pub fn toggle(
        &mut self,
        wizard: &mut WizardController,
        key: AssetKey,
    ) -> Result<bool, WizardError> {
        wizard.expect_step(self.step())?;
        let mut next = self.local;
        key.flip(&mut next);
        wizard.update(DraftUpdate {
            assets: Some(next),
            ..DraftUpdate::default()
        })?;
        self.local = next;
        Ok(key.get(&self.local))
    }

    pub fn finalize(&self, wizard: &mut WizardController) -> Result<StepId, WizardError> {
        submit(self, wizard, true)
    }
}

impl StepView for AssetSupportView {
    fn step(&self) -> StepId {
        StepId::AssetSupport
    }

    fn is_complete(&self, _draft: &AssessmentDraft) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "tests/steps_tests.rs"]
mod tests;
