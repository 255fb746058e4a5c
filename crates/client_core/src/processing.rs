//! Runs the single reasoning request behind a decorative phase display.
//!
//! The result is released only after both the gateway call and a minimum
//! display time have elapsed. Cancelling or dropping the task discards the
//! result so a torn-down front end is never written to.

use std::{sync::Arc, time::Duration};

use shared::{
    assessment::{AssessmentDraft, AssessmentResult},
    domain::TrustBand,
};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{interval, sleep, MissedTickBehavior},
};
use tracing::{debug, warn};

use crate::gateway::{assess_or_fallback, ReasoningGateway};

pub const PROCESSING_PHASES: [&str; 5] = [
    "Interpreting behavior...",
    "Analyzing payment evidence...",
    "Applying purpose-based rules...",
    "Bias & fairness checks...",
    "Finalizing Trust Band...",
];

pub const DEFAULT_PHASE_INTERVAL: Duration = Duration::from_millis(1500);
pub const DEFAULT_MIN_DISPLAY: Duration = Duration::from_millis(8000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingConfig {
    pub phase_interval: Duration,
    pub min_display: Duration,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            phase_interval: DEFAULT_PHASE_INTERVAL,
            min_display: DEFAULT_MIN_DISPLAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingEvent {
    PhaseAdvanced { index: usize, label: &'static str },
    Completed { band: TrustBand },
}

pub struct ProcessingTask {
    events: mpsc::UnboundedReceiver<ProcessingEvent>,
    cancel: watch::Sender<bool>,
    handle: Option<JoinHandle<Option<AssessmentResult>>>,
}

impl ProcessingTask {
    pub fn spawn(
        gateway: Arc<dyn ReasoningGateway>,
        draft: AssessmentDraft,
        config: ProcessingConfig,
    ) -> Self {
        let (events_tx, events) = mpsc::unbounded_channel();
        let (cancel, cancel_rx) = watch::channel(false);
        let handle = tokio::spawn(run(gateway, draft, config, events_tx, cancel_rx));
        Self {
            events,
            cancel,
            handle: Some(handle),
        }
    }

    /// Next display event; `None` once the task has stopped.
    pub async fn next_event(&mut self) -> Option<ProcessingEvent> {
        self.events.recv().await
    }

    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    /// The assessment, or `None` if the task was cancelled first.
    pub async fn outcome(mut self) -> Option<AssessmentResult> {
        let handle = self.handle.take()?;
        match handle.await {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "processing task ended abnormally");
                None
            }
        }
    }
}

impl Drop for ProcessingTask {
    fn drop(&mut self) {
        if self.handle.is_some() {
            let _ = self.cancel.send(true);
        }
    }
}

async fn run(
    gateway: Arc<dyn ReasoningGateway>,
    draft: AssessmentDraft,
    config: ProcessingConfig,
    events: mpsc::UnboundedSender<ProcessingEvent>,
    mut cancel: watch::Receiver<bool>,
) -> Option<AssessmentResult> {
    if *cancel.borrow() {
        return None;
    }

    // The gateway runs on its own task so that a panic inside it still ends in
    // the fallback result.
    let call = tokio::spawn(async move { assess_or_fallback(gateway.as_ref(), &draft).await });
    let assessment = async move {
        match call.await {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "reasoning task failed; using fallback assessment");
                AssessmentResult::fallback()
            }
        }
    };
    let work = async move {
        let (result, ()) = tokio::join!(assessment, sleep(config.min_display));
        result
    };
    tokio::pin!(work);

    let mut ticker = interval(config.phase_interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    let mut phase = 0;
    let _ = events.send(ProcessingEvent::PhaseAdvanced {
        index: phase,
        label: PROCESSING_PHASES[phase],
    });

    loop {
        tokio::select! {
            result = &mut work => {
                let _ = events.send(ProcessingEvent::Completed { band: result.trust_band() });
                return Some(result);
            }
            _ = ticker.tick() => {
                if phase + 1 < PROCESSING_PHASES.len() {
                    phase += 1;
                    let _ = events.send(ProcessingEvent::PhaseAdvanced {
                        index: phase,
                        label: PROCESSING_PHASES[phase],
                    });
                }
            }
            _ = cancel.changed() => {
                debug!("processing cancelled; discarding assessment");
                return None;
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/processing_tests.rs"]
mod tests;
