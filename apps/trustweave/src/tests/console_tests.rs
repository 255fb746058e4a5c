use std::{io::Cursor, time::Duration};

use async_trait::async_trait;
use client_core::GatewayError;
use shared::{
    assessment::{AssessmentDraft, FALLBACK_REASONING},
    domain::TrustBand,
};

use super::*;

struct StubGateway {
    result: Option<AssessmentResult>,
}

#[async_trait]
impl ReasoningGateway for StubGateway {
    async fn assess(&self, _draft: &AssessmentDraft) -> Result<AssessmentResult, GatewayError> {
        self.result
            .clone()
            .ok_or_else(|| GatewayError::Parse("stub failure".to_string()))
    }
}

fn strong_result() -> AssessmentResult {
    AssessmentResult::new(
        TrustBand::T4,
        "Reliable bill payer with long SIM tenure.",
        "700-749",
        vec!["Utilities always on time".to_string()],
    )
}

fn fast() -> ProcessingConfig {
    ProcessingConfig {
        phase_interval: Duration::from_millis(1),
        min_display: Duration::ZERO,
    }
}

// Required answers plus two evidence batches totalling six documents.
const CORE_TRUST: &str = "4\n\nstable\n1\n\n\n1\n\n\n2\na.pdf b.pdf c.pdf\n1\nd.png e.png f.png\n";

async fn run(
    script: &str,
    result: Option<AssessmentResult>,
) -> (anyhow::Result<AssessmentResult>, WizardController, String) {
    let mut console = Console::new(Cursor::new(script.as_bytes()), Vec::new());
    let mut wizard = WizardController::new();
    let gateway: Arc<dyn ReasoningGateway> = Arc::new(StubGateway { result });
    let outcome = console.run_session(&mut wizard, gateway, fast()).await;
    let output = String::from_utf8(console.into_output()).expect("utf8 output");
    (outcome, wizard, output)
}

fn codes(steps: &[StepId]) -> Vec<u8> {
    steps.iter().map(|step| step.code()).collect()
}

#[tokio::test]
async fn small_purpose_skips_capacity_and_assets() {
    let script = format!("\n1\n{CORE_TRUST}2\n");
    let (outcome, wizard, output) = run(&script, Some(strong_result())).await;

    let result = outcome.expect("session");
    assert_eq!(result.trust_band(), TrustBand::T4);
    assert_eq!(codes(wizard.visited()), vec![0, 1, 2, 3, 7, 8]);

    let draft = wizard.draft();
    assert_eq!(draft.purpose, Some(Purpose::Small));
    assert_eq!(draft.mobile.sim_duration, Some(SimDuration::OverThreeYears));
    assert_eq!(draft.mobile.recharge_regularity, None);
    assert_eq!(draft.mobile.usage_consistency, Some(UsageConsistency::Stable));
    assert_eq!(draft.evidence.len(), 6);
    assert_eq!(draft.evidence[0].category, EvidenceCategory::Utility);
    assert_eq!(draft.evidence[5].category, EvidenceCategory::Mobile);
    assert_eq!(draft.loan_experience, Some(LoanExperience::Current));

    assert!(output.contains("Step 1 of 5: Credit Purpose"));
    assert!(output.contains("Step 3 of 5: Loan Experience"));
    assert!(!output.contains("Financial Capacity"));
    assert!(output.contains("[1/5] Interpreting behavior..."));
    assert!(output.contains("T4  Strong Trust"));
    assert!(output.contains("Evidence: 6 file(s), 6 of 6 months"));
}

#[tokio::test]
async fn large_purpose_visits_every_questionnaire_step() {
    let script = format!("\n3\n{CORE_TRUST}3\n1\n2\n1\ny\nn\nyes\n");
    let (outcome, wizard, output) = run(&script, Some(strong_result())).await;

    outcome.expect("session");
    assert_eq!(codes(wizard.visited()), vec![0, 1, 2, 3, 4, 5, 7, 8]);

    let draft = wizard.draft();
    assert_eq!(draft.financial.employment_type, Some(EmploymentType::Salaried));
    assert_eq!(draft.financial.income_range, Some(IncomeRange::From20kTo50k));
    assert_eq!(draft.financial.income_stability, Some(IncomeStability::Very));
    assert!(draft.assets.property);
    assert!(!draft.assets.fixed_deposits);
    assert!(draft.assets.collateral_willingness);
    assert!(output.contains("Step 5 of 5: Asset Support"));
    assert!(output.contains("Credit purpose: Large Loan"));
}

#[tokio::test]
async fn medium_purpose_skips_assets_only() {
    let script = format!("\n2\n{CORE_TRUST}1\nself\n<20k\nvariable\n");
    let (outcome, wizard, output) = run(&script, Some(strong_result())).await;

    outcome.expect("session");
    assert_eq!(codes(wizard.visited()), vec![0, 1, 2, 3, 4, 7, 8]);
    assert_eq!(
        wizard.draft().financial.employment_type,
        Some(EmploymentType::SelfEmployed)
    );
    assert!(!output.contains("Asset Support"));
}

#[tokio::test]
async fn gateway_failure_shows_the_fallback_report() {
    let script = format!("\n1\n{CORE_TRUST}1\n");
    let (outcome, wizard, output) = run(&script, None).await;

    let result = outcome.expect("session");
    assert_eq!(result, AssessmentResult::fallback());
    assert_eq!(wizard.step(), StepId::Report);
    assert!(output.contains("T3  Developing Trust"));
    assert!(output.contains("Traditional credit alignment: 650-699"));
    for reason in FALLBACK_REASONING {
        assert!(output.contains(reason));
    }
}

#[tokio::test]
async fn invalid_answers_are_asked_again() {
    let script = format!("\n9\nbogus\n1\n{CORE_TRUST}1\n");
    let (outcome, wizard, output) = run(&script, Some(strong_result())).await;

    outcome.expect("session");
    assert_eq!(wizard.draft().purpose, Some(Purpose::Small));
    assert_eq!(
        output.matches("Please enter a number from 1 to 4.").count(),
        2
    );
}

#[tokio::test]
async fn evidence_is_requested_until_six_months_are_covered() {
    let core = "1\n\n\n1\n\n\n1\n\n\n4\n\n4\nreceipt.jpg\n2\nb1.pdf b2.pdf b3.pdf b4.pdf b5.pdf b6.pdf\n";
    let script = format!("\n1\n{core}4\n");
    let (outcome, wizard, output) = run(&script, Some(strong_result())).await;

    outcome.expect("session");
    assert!(output.contains("No files given."));
    assert!(output.contains("coverage is now 1 of 6 months"));
    assert!(output.contains("coverage is now 6 of 6 months"));
    assert_eq!(wizard.draft().evidence.len(), 7);
    assert_eq!(
        wizard.draft().evidence[0].mime_type.as_deref(),
        Some("image/jpeg")
    );
    assert!(output.contains("Evidence: 7 file(s), 6 of 6 months"));
}

#[tokio::test]
async fn closed_input_stops_the_session() {
    let (outcome, wizard, _) = run("\n1\n4\n", Some(strong_result())).await;

    let err = outcome.expect_err("input ran out");
    assert!(err.is::<InputClosed>());
    assert_eq!(wizard.step(), StepId::CoreTrustForm);
    assert!(wizard.result().is_none());
}

#[tokio::test]
async fn restart_prompt_and_json_output() {
    let mut console = Console::new(Cursor::new("y\nn\n".as_bytes()), Vec::new());

    assert!(console.ask_restart().expect("first answer"));
    assert!(!console.ask_restart().expect("second answer"));
    console.print_json(&strong_result()).expect("json");

    let output = String::from_utf8(console.into_output()).expect("utf8 output");
    assert!(output.contains("\"trustBand\": \"T4 - Strong Trust\""));
    assert!(output.contains("\"traditionalAlignment\": \"700-749\""));
}

#[test]
fn choices_parse_by_number_or_id() {
    assert_eq!(parse_choice::<Purpose>("2"), Some(Purpose::Medium));
    assert_eq!(parse_choice::<Purpose>("UPGRADE"), Some(Purpose::Upgrade));
    assert_eq!(parse_choice::<Purpose>("0"), None);
    assert_eq!(parse_choice::<Purpose>("5"), None);
    assert_eq!(parse_choice::<GroupParticipation>("none"), Some(GroupParticipation::NoGroup));
}
