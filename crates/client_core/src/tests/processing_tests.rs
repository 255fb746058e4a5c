use super::*;
use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Instant,
};

use async_trait::async_trait;
use shared::{
    assessment::FALLBACK_REASONING,
    domain::{Purpose, StepId},
};

use crate::{
    gateway::GatewayError,
    wizard::{DraftPatch, WizardController},
};

#[derive(Clone)]
enum StubOutcome {
    Succeed(AssessmentResult),
    Fail,
    Panic,
}

struct StubGateway {
    delay: Duration,
    outcome: StubOutcome,
    calls: Arc<AtomicUsize>,
}

impl StubGateway {
    fn new(delay: Duration, outcome: StubOutcome) -> Self {
        Self {
            delay,
            outcome,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl ReasoningGateway for StubGateway {
    async fn assess(&self, _draft: &AssessmentDraft) -> Result<AssessmentResult, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        sleep(self.delay).await;
        match &self.outcome {
            StubOutcome::Succeed(result) => Ok(result.clone()),
            StubOutcome::Fail => Err(GatewayError::Parse("stub failure".to_string())),
            StubOutcome::Panic => panic!("stub gateway panicked"),
        }
    }
}

fn strong_result() -> AssessmentResult {
    AssessmentResult::new(
        TrustBand::T4,
        "Reliable and consistent.",
        "700-749",
        vec!["Pays on time".to_string(), "Stable SIM".to_string()],
    )
}

fn config(phase_ms: u64, min_display_ms: u64) -> ProcessingConfig {
    ProcessingConfig {
        phase_interval: Duration::from_millis(phase_ms),
        min_display: Duration::from_millis(min_display_ms),
    }
}

async fn drain(task: &mut ProcessingTask) -> Vec<ProcessingEvent> {
    let mut events = Vec::new();
    while let Some(event) = task.next_event().await {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn waits_for_minimum_display_when_gateway_is_fast() {
    let gateway = Arc::new(StubGateway::new(
        Duration::ZERO,
        StubOutcome::Succeed(strong_result()),
    ));
    let started = Instant::now();
    let mut task = ProcessingTask::spawn(gateway, AssessmentDraft::default(), config(10, 120));

    let events = drain(&mut task).await;
    let result = task.outcome().await.expect("result");

    assert!(started.elapsed() >= Duration::from_millis(120));
    assert_eq!(result, strong_result());
    assert_eq!(
        events.first(),
        Some(&ProcessingEvent::PhaseAdvanced {
            index: 0,
            label: PROCESSING_PHASES[0],
        })
    );
    assert_eq!(
        events.last(),
        Some(&ProcessingEvent::Completed {
            band: TrustBand::T4
        })
    );
}

#[tokio::test]
async fn phases_advance_monotonically_and_stop_at_the_last() {
    let gateway = Arc::new(StubGateway::new(
        Duration::ZERO,
        StubOutcome::Succeed(strong_result()),
    ));
    let mut task = ProcessingTask::spawn(gateway, AssessmentDraft::default(), config(5, 150));

    let indices: Vec<usize> = drain(&mut task)
        .await
        .into_iter()
        .filter_map(|event| match event {
            ProcessingEvent::PhaseAdvanced { index, .. } => Some(index),
            ProcessingEvent::Completed { .. } => None,
        })
        .collect();

    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn waits_for_gateway_when_it_is_slower_than_the_display() {
    let gateway = Arc::new(StubGateway::new(
        Duration::from_millis(150),
        StubOutcome::Succeed(strong_result()),
    ));
    let started = Instant::now();
    let task = ProcessingTask::spawn(gateway, AssessmentDraft::default(), config(10, 20));

    let result = task.outcome().await.expect("result");

    assert!(started.elapsed() >= Duration::from_millis(150));
    assert_eq!(result.trust_band(), TrustBand::T4);
}

#[tokio::test]
async fn gateway_failure_still_reaches_the_report_with_fallback() {
    let gateway = Arc::new(StubGateway::new(Duration::ZERO, StubOutcome::Fail));
    let mut wizard = WizardController::new();
    wizard.advance().expect("landing");
    wizard.apply(DraftPatch::Purpose(Purpose::Small)).expect("purpose");
    while wizard.step() != StepId::Processing {
        wizard.advance().expect("advance");
    }

    let started = Instant::now();
    let task = ProcessingTask::spawn(gateway, wizard.draft().clone(), config(10, 50));
    let result = task.outcome().await.expect("result");
    wizard.finish(result);

    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(wizard.step(), StepId::Report);
    let report = wizard.result().expect("stored result");
    assert_eq!(report.trust_band(), TrustBand::T3);
    assert_eq!(report.reasoning(), FALLBACK_REASONING);
}

#[tokio::test]
async fn panicking_gateway_falls_back() {
    let gateway = Arc::new(StubGateway::new(Duration::ZERO, StubOutcome::Panic));
    let task = ProcessingTask::spawn(gateway, AssessmentDraft::default(), config(10, 20));

    let result = task.outcome().await.expect("result");
    assert_eq!(result, AssessmentResult::fallback());
}

#[tokio::test]
async fn gateway_is_called_exactly_once() {
    let gateway = Arc::new(StubGateway::new(Duration::ZERO, StubOutcome::Fail));
    let calls = gateway.calls.clone();
    let task = ProcessingTask::spawn(gateway, AssessmentDraft::default(), config(10, 30));

    task.outcome().await.expect("result");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cancelled_task_discards_the_result() {
    let gateway = Arc::new(StubGateway::new(
        Duration::from_millis(300),
        StubOutcome::Succeed(strong_result()),
    ));
    let task = ProcessingTask::spawn(gateway, AssessmentDraft::default(), config(10, 20));

    sleep(Duration::from_millis(20)).await;
    task.cancel();

    assert_eq!(task.outcome().await, None);
}

#[tokio::test]
async fn dropping_the_task_leaves_the_wizard_untouched() {
    let gateway = Arc::new(StubGateway::new(
        Duration::from_millis(50),
        StubOutcome::Succeed(strong_result()),
    ));
    let mut wizard = WizardController::new();
    wizard.advance().expect("landing");
    wizard.apply(DraftPatch::Purpose(Purpose::Medium)).expect("purpose");
    while wizard.step() != StepId::Processing {
        wizard.advance().expect("advance");
    }

    let task = ProcessingTask::spawn(gateway, wizard.draft().clone(), config(10, 20));
    drop(task);
    sleep(Duration::from_millis(100)).await;

    assert_eq!(wizard.step(), StepId::Processing);
    assert!(wizard.result().is_none());
}
