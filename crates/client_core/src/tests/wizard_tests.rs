use super::*;
use shared::{
    assessment::AssessmentResult,
    domain::{EvidenceCategory, TrustBand},
};

const ALL_PURPOSES: [Option<Purpose>; 5] = [
    None,
    Some(Purpose::Small),
    Some(Purpose::Medium),
    Some(Purpose::Large),
    Some(Purpose::Upgrade),
];

fn walk_to_processing(purpose: Purpose) -> WizardController {
    let mut wizard = WizardController::new();
    wizard.advance().expect("landing");
    wizard.apply(DraftPatch::Purpose(purpose)).expect("purpose");
    while wizard.step() != StepId::Processing {
        wizard.advance().expect("advance");
    }
    wizard
}

fn codes(steps: &[StepId]) -> Vec<u8> {
    steps.iter().map(|step| step.code()).collect()
}

#[test]
fn small_purpose_skips_financial_capacity_and_assets() {
    assert_eq!(
        next_step(StepId::LoanExperience, Some(Purpose::Small)),
        Some(StepId::Processing)
    );
}

#[test]
fn asset_support_only_for_large_or_upgrade() {
    for purpose in ALL_PURPOSES {
        let expected = match purpose {
            Some(Purpose::Large) | Some(Purpose::Upgrade) => StepId::AssetSupport,
            _ => StepId::Processing,
        };
        assert_eq!(
            next_step(StepId::FinancialCapacity, purpose),
            Some(expected),
            "purpose {purpose:?}"
        );
    }
}

#[test]
fn non_small_purposes_reach_financial_capacity() {
    for purpose in [None, Some(Purpose::Medium), Some(Purpose::Large), Some(Purpose::Upgrade)] {
        assert_eq!(
            next_step(StepId::LoanExperience, purpose),
            Some(StepId::FinancialCapacity)
        );
    }
}

#[test]
fn asset_support_moves_on_to_processing() {
    assert_eq!(
        next_step(StepId::AssetSupport, Some(Purpose::Large)),
        Some(StepId::Processing)
    );
}

#[test]
fn processing_and_report_have_no_successor() {
    for purpose in ALL_PURPOSES {
        assert_eq!(next_step(StepId::Processing, purpose), None);
        assert_eq!(next_step(StepId::Report, purpose), None);
    }

    let mut wizard = walk_to_processing(Purpose::Medium);
    assert_eq!(
        wizard.advance(),
        Err(WizardError::NoSuccessor(StepId::Processing))
    );
}

#[test]
fn scenario_small_visits_expected_steps() {
    let mut wizard = walk_to_processing(Purpose::Small);
    wizard.finish(AssessmentResult::fallback());
    assert_eq!(codes(wizard.visited()), vec![0, 1, 2, 3, 7, 8]);
}

#[test]
fn scenario_large_visits_every_step() {
    let mut wizard = walk_to_processing(Purpose::Large);
    wizard.finish(AssessmentResult::fallback());
    assert_eq!(codes(wizard.visited()), vec![0, 1, 2, 3, 4, 5, 7, 8]);
}

#[test]
fn scenario_medium_skips_only_assets() {
    let mut wizard = walk_to_processing(Purpose::Medium);
    wizard.finish(AssessmentResult::fallback());
    assert_eq!(codes(wizard.visited()), vec![0, 1, 2, 3, 4, 7, 8]);
}

#[test]
fn finish_jumps_to_report_from_any_step() {
    let mut wizard = WizardController::new();
    wizard.advance().expect("landing");
    assert_eq!(wizard.step(), StepId::PurposeSelect);

    let result = AssessmentResult::new(
        TrustBand::T5,
        "Exceptional consistency.",
        "800-850",
        vec!["Pays every bill early.".to_string()],
    );
    wizard.finish(result.clone());

    assert_eq!(wizard.step(), StepId::Report);
    assert_eq!(wizard.result(), Some(&result));
}

#[test]
fn shallow_update_replaces_nested_slice_wholesale() {
    let mut wizard = WizardController::new();
    wizard
        .apply(DraftPatch::Mobile(MobilePatch::recharge_regularity(
            RechargeRegularity::Monthly,
        )))
        .expect("seed");

    wizard
        .update(DraftUpdate {
            mobile: Some(MobileSignals {
                sim_duration: Some(SimDuration::OverThreeYears),
                ..MobileSignals::default()
            }),
            ..DraftUpdate::default()
        })
        .expect("update without spread");
    assert_eq!(wizard.draft().mobile.recharge_regularity, None);

    let prior = wizard.draft().mobile.clone();
    wizard
        .update(DraftUpdate {
            mobile: Some(MobileSignals {
                recharge_regularity: Some(RechargeRegularity::Quarterly),
                ..prior
            }),
            ..DraftUpdate::default()
        })
        .expect("update with spread");
    assert_eq!(
        wizard.draft().mobile.sim_duration,
        Some(SimDuration::OverThreeYears)
    );
    assert_eq!(
        wizard.draft().mobile.recharge_regularity,
        Some(RechargeRegularity::Quarterly)
    );
}

#[test]
fn update_leaves_absent_fields_untouched() {
    let mut wizard = WizardController::new();
    wizard.apply(DraftPatch::Purpose(Purpose::Upgrade)).expect("purpose");
    wizard
        .update(DraftUpdate {
            loan_experience: Some(LoanExperience::Repaid),
            ..DraftUpdate::default()
        })
        .expect("update");

    assert_eq!(wizard.draft().purpose, Some(Purpose::Upgrade));
    assert_eq!(wizard.draft().loan_experience, Some(LoanExperience::Repaid));
}

#[test]
fn typed_patch_keeps_sibling_fields() {
    let mut wizard = WizardController::new();
    wizard
        .apply(DraftPatch::Utility(UtilityPatch::on_time_payment(
            OnTimePayment::Always,
        )))
        .expect("first");
    wizard
        .apply(DraftPatch::Utility(UtilityPatch::delay_frequency(
            DelayFrequency::Rare,
        )))
        .expect("second");

    let utility = &wizard.draft().utility;
    assert_eq!(utility.on_time_payment, Some(OnTimePayment::Always));
    assert_eq!(utility.delay_frequency, Some(DelayFrequency::Rare));
    assert_eq!(utility.bill_predictability, None);
}

#[test]
fn evidence_patch_appends() {
    let mut wizard = WizardController::new();
    let file = EvidenceFile {
        name: "bill.pdf".to_string(),
        category: EvidenceCategory::Utility,
        mime_type: None,
        months_covered: 1,
    };
    wizard
        .apply(DraftPatch::Evidence(vec![file.clone()]))
        .expect("first");
    wizard
        .apply(DraftPatch::Evidence(vec![file.clone()]))
        .expect("second");
    assert_eq!(wizard.draft().evidence, vec![file.clone(), file]);
}

#[test]
fn draft_is_sealed_once_processing_starts() {
    let mut wizard = walk_to_processing(Purpose::Small);
    let before = wizard.draft().clone();

    assert_eq!(
        wizard.apply(DraftPatch::Purpose(Purpose::Large)),
        Err(WizardError::DraftSealed(StepId::Processing))
    );
    assert_eq!(
        wizard.update(DraftUpdate {
            assets: Some(AssetSignals {
                property: true,
                ..AssetSignals::default()
            }),
            ..DraftUpdate::default()
        }),
        Err(WizardError::DraftSealed(StepId::Processing))
    );
    assert_eq!(wizard.draft(), &before);
}

#[test]
fn progress_counts_questionnaire_steps_only() {
    let mut wizard = WizardController::new();
    assert_eq!(wizard.progress(), None);
    wizard.advance().expect("landing");
    assert_eq!(wizard.progress(), Some((1, QUESTIONNAIRE_STEPS)));
    wizard.finish(AssessmentResult::fallback());
    assert_eq!(wizard.progress(), None);
}

#[test]
fn reset_starts_a_fresh_session() {
    let mut wizard = walk_to_processing(Purpose::Large);
    let old_session = wizard.session_id();
    wizard.finish(AssessmentResult::fallback());

    wizard.reset();

    assert_ne!(wizard.session_id(), old_session);
    assert_eq!(wizard.step(), StepId::Landing);
    assert_eq!(wizard.draft(), &AssessmentDraft::default());
    assert!(wizard.result().is_none());
    assert_eq!(wizard.visited(), &[StepId::Landing]);
}
