//! Line-oriented front end that walks an applicant through the wizard.
//!
//! Menus accept either the option number or its id. Reaching the end of the
//! input stream aborts the session with [`InputClosed`].

use std::{
    io::{BufRead, Write},
    path::Path,
    sync::Arc,
};

use anyhow::bail;
use client_core::{
    evidence::{coverage_months, coverage_complete, UploadedFile, REQUIRED_COVERAGE_MONTHS},
    steps::{
        AssetKey, AssetSupportView, CoreTrustForm, FinancialCapacityView, Landing,
        LoanExperienceView, PurposeSelect,
    },
    wizard::{CommunityPatch, FinancialPatch, MobilePatch, UtilityPatch},
    ProcessingConfig, ProcessingEvent, ProcessingTask, ReasoningGateway, ReportView,
    WizardController, PROCESSING_PHASES,
};
use shared::{
    assessment::AssessmentResult,
    domain::{
        BillPredictability, Choice, DelayFrequency, DisputeHistory, EmploymentType,
        EvidenceCategory, GroupParticipation, IncomeRange, IncomeStability, LoanExperience,
        OnTimePayment, Purpose, RechargeRegularity, SharedResponsibility, SimDuration, StepId,
        UsageConsistency,
    },
};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
#[error("input closed before the assessment finished")]
pub struct InputClosed;

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Drives the wizard from its current step until a report is shown.
    pub async fn run_session(
        &mut self,
        wizard: &mut WizardController,
        gateway: Arc<dyn ReasoningGateway>,
        processing: ProcessingConfig,
    ) -> anyhow::Result<AssessmentResult> {
        info!(
            session_id = %wizard.session_id(),
            step = wizard.step().code(),
            "driving assessment wizard"
        );
        loop {
            match wizard.step() {
                StepId::Landing => self.landing(wizard)?,
                StepId::PurposeSelect => self.purpose(wizard)?,
                StepId::CoreTrustForm => self.core_trust(wizard)?,
                StepId::LoanExperience => self.loan_experience(wizard)?,
                StepId::FinancialCapacity => self.financial_capacity(wizard)?,
                StepId::AssetSupport => self.asset_support(wizard)?,
                StepId::Processing => {
                    self.processing(wizard, gateway.clone(), processing).await?
                }
                StepId::Report => {
                    let Some(result) = wizard.result().cloned() else {
                        bail!("report step reached without an assessment");
                    };
                    self.report(wizard, &result)?;
                    return Ok(result);
                }
            }
        }
    }

    pub fn print_json(&mut self, result: &AssessmentResult) -> anyhow::Result<()> {
        writeln!(self.output, "{}", serde_json::to_string_pretty(result)?)?;
        Ok(())
    }

    pub fn ask_restart(&mut self) -> anyhow::Result<bool> {
        self.confirm("Close the report and start a new assessment?")
    }

    fn landing(&mut self, wizard: &mut WizardController) -> anyhow::Result<()> {
        writeln!(self.output, "TrustWeave")?;
        writeln!(
            self.output,
            "Credit assessment built on everyday behavior, not just bank history."
        )?;
        writeln!(
            self.output,
            "Answer a few questions about your mobile, utility and community track record."
        )?;
        self.ask("Press Enter to start.")?;
        Landing.start(wizard)?;
        Ok(())
    }

    fn purpose(&mut self, wizard: &mut WizardController) -> anyhow::Result<()> {
        self.header(wizard)?;
        let purpose = self.choose_described(
            "What do you need credit for?",
            |purpose: Purpose| Some(purpose.description()),
        )?;
        PurposeSelect.select(wizard, purpose)?;
        Ok(())
    }

    fn core_trust(&mut self, wizard: &mut WizardController) -> anyhow::Result<()> {
        self.header(wizard)?;
        let mut form = CoreTrustForm::from_draft(wizard.draft());

        writeln!(self.output, "Mobile usage")?;
        let sim: SimDuration = self.choose("How long have you used your current SIM?")?;
        form.update_mobile(wizard, MobilePatch::sim_duration(sim))?;
        if let Some(value) =
            self.choose_optional::<RechargeRegularity>("How often do you recharge?")?
        {
            form.update_mobile(wizard, MobilePatch::recharge_regularity(value))?;
        }
        if let Some(value) =
            self.choose_optional::<UsageConsistency>("How consistent is your usage?")?
        {
            form.update_mobile(wizard, MobilePatch::usage_consistency(value))?;
        }

        writeln!(self.output, "Utility bills")?;
        let on_time: OnTimePayment = self.choose("Do you pay your utility bills on time?")?;
        form.update_utility(wizard, UtilityPatch::on_time_payment(on_time))?;
        if let Some(value) =
            self.choose_optional::<DelayFrequency>("How often are payments delayed?")?
        {
            form.update_utility(wizard, UtilityPatch::delay_frequency(value))?;
        }
        if let Some(value) =
            self.choose_optional::<BillPredictability>("How predictable are your bills?")?
        {
            form.update_utility(wizard, UtilityPatch::bill_predictability(value))?;
        }

        writeln!(self.output, "Community groups")?;
        let group: GroupParticipation =
            self.choose("Do you take part in a savings or community group?")?;
        form.update_community(wizard, CommunityPatch::group_participation(group))?;
        if let Some(value) = self
            .choose_optional::<SharedResponsibility>("What responsibility do you hold in it?")?
        {
            form.update_community(wizard, CommunityPatch::shared_responsibility(value))?;
        }
        if let Some(value) =
            self.choose_optional::<DisputeHistory>("Any disputes on record?")?
        {
            form.update_community(wizard, CommunityPatch::dispute_history(value))?;
        }

        while !coverage_complete(&wizard.draft().evidence) {
            writeln!(
                self.output,
                "Evidence: {} of {} months covered. Each document counts as one month.",
                coverage_months(&wizard.draft().evidence),
                REQUIRED_COVERAGE_MONTHS
            )?;
            let category: EvidenceCategory = self.choose("What do the documents show?")?;
            let line = self.ask("File paths, separated by spaces:")?;
            let files: Vec<UploadedFile> = line
                .split_whitespace()
                .map(|path| UploadedFile::from_path(Path::new(path)))
                .collect();
            if files.is_empty() {
                writeln!(self.output, "No files given.")?;
                continue;
            }
            let count = files.len();
            let coverage = form.upload(wizard, files, category)?;
            writeln!(
                self.output,
                "Added {count} file(s); coverage is now {coverage} of {REQUIRED_COVERAGE_MONTHS} months."
            )?;
        }

        form.submit(wizard)?;
        Ok(())
    }

    fn loan_experience(&mut self, wizard: &mut WizardController) -> anyhow::Result<()> {
        self.header(wizard)?;
        let value: LoanExperience = self.choose("Have you taken a loan before?")?;
        LoanExperienceView.select(wizard, value)?;
        Ok(())
    }

    fn financial_capacity(&mut self, wizard: &mut WizardController) -> anyhow::Result<()> {
        self.header(wizard)?;
        let mut view = FinancialCapacityView::default();
        let employment: EmploymentType = self.choose("How are you employed?")?;
        view.set(wizard, FinancialPatch::employment_type(employment))?;
        let income: IncomeRange = self.choose("What is your monthly income?")?;
        view.set(wizard, FinancialPatch::income_range(income))?;
        let stability: IncomeStability = self.choose("How stable is that income?")?;
        view.set(wizard, FinancialPatch::income_stability(stability))?;
        view.submit(wizard)?;
        Ok(())
    }

    fn asset_support(&mut self, wizard: &mut WizardController) -> anyhow::Result<()> {
        self.header(wizard)?;
        writeln!(self.output, "These are optional and only strengthen the profile.")?;
        let mut view = AssetSupportView::default();
        for key in AssetKey::ALL {
            if self.confirm(&format!("Declare {key}?"))? {
                view.toggle(wizard, key)?;
            }
        }
        view.finalize(wizard)?;
        Ok(())
    }

    async fn processing(
        &mut self,
        wizard: &mut WizardController,
        gateway: Arc<dyn ReasoningGateway>,
        config: ProcessingConfig,
    ) -> anyhow::Result<()> {
        self.header(wizard)?;
        let mut task = ProcessingTask::spawn(gateway, wizard.draft().clone(), config);
        while let Some(event) = task.next_event().await {
            match event {
                ProcessingEvent::PhaseAdvanced { index, label } => writeln!(
                    self.output,
                    "  [{}/{}] {label}",
                    index + 1,
                    PROCESSING_PHASES.len()
                )?,
                ProcessingEvent::Completed { band } => {
                    writeln!(self.output, "  Assessment ready: {}", band.label())?
                }
            }
            self.output.flush()?;
        }
        let Some(result) = task.outcome().await else {
            bail!("assessment was cancelled before it finished");
        };
        wizard.finish(result);
        Ok(())
    }

    fn report(
        &mut self,
        wizard: &WizardController,
        result: &AssessmentResult,
    ) -> anyhow::Result<()> {
        writeln!(self.output)?;
        writeln!(
            self.output,
            "{}",
            ReportView::new(result, wizard.draft()).render_text()
        )?;
        Ok(())
    }

    fn header(&mut self, wizard: &WizardController) -> anyhow::Result<()> {
        let title = wizard.step().title();
        writeln!(self.output)?;
        match wizard.progress() {
            Some((position, total)) => {
                writeln!(self.output, "Step {position} of {total}: {title}")?
            }
            None => writeln!(self.output, "{title}")?,
        }
        Ok(())
    }

    fn read_line(&mut self) -> anyhow::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(InputClosed.into());
        }
        Ok(line.trim().to_string())
    }

    fn ask(&mut self, prompt: &str) -> anyhow::Result<String> {
        write!(self.output, "{prompt} ")?;
        self.output.flush()?;
        self.read_line()
    }

    fn confirm(&mut self, question: &str) -> anyhow::Result<bool> {
        let answer = self.ask(&format!("{question} [y/N]"))?;
        Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    fn choose<T: Choice>(&mut self, question: &str) -> anyhow::Result<T> {
        self.choose_described(question, no_detail::<T>)
    }

    fn choose_described<T: Choice>(
        &mut self,
        question: &str,
        detail: impl Fn(T) -> Option<&'static str>,
    ) -> anyhow::Result<T> {
        self.menu(question, &detail)?;
        loop {
            let answer = self.ask("Choose:")?;
            if let Some(choice) = parse_choice(&answer) {
                return Ok(choice);
            }
            self.reprompt::<T>()?;
        }
    }

    fn choose_optional<T: Choice>(&mut self, question: &str) -> anyhow::Result<Option<T>> {
        self.menu(question, &no_detail::<T>)?;
        loop {
            let answer = self.ask("Choose (Enter to skip):")?;
            if answer.is_empty() {
                return Ok(None);
            }
            if let Some(choice) = parse_choice(&answer) {
                return Ok(Some(choice));
            }
            self.reprompt::<T>()?;
        }
    }

    fn menu<T: Choice>(
        &mut self,
        question: &str,
        detail: &dyn Fn(T) -> Option<&'static str>,
    ) -> anyhow::Result<()> {
        writeln!(self.output, "{question}")?;
        for (idx, choice) in T::all().iter().copied().enumerate() {
            match detail(choice) {
                Some(text) => writeln!(self.output, "  {}) {} - {text}", idx + 1, choice.label())?,
                None => writeln!(self.output, "  {}) {}", idx + 1, choice.label())?,
            }
        }
        Ok(())
    }

    fn reprompt<T: Choice>(&mut self) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "Please enter a number from 1 to {}.",
            T::all().len()
        )?;
        Ok(())
    }
}

fn no_detail<T>(_: T) -> Option<&'static str> {
    None
}

/// A 1-based menu number or the option's id.
fn parse_choice<T: Choice>(answer: &str) -> Option<T> {
    let answer = answer.trim();
    if let Ok(number) = answer.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|idx| T::all().get(idx))
            .copied();
    }
    T::all()
        .iter()
        .copied()
        .find(|choice| choice.id().eq_ignore_ascii_case(answer))
}

#[cfg(test)]
#[path = "tests/console_tests.rs"]
mod tests;
