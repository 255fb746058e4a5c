mod config;
mod console;

use std::{io, path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use client_core::{
    GatewayError, GeminiGateway, MissingReasoningGateway, ReasoningGateway, WizardController,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    config::Settings,
    console::{Console, InputClosed},
};

/// Behavior-based credit trust assessment in the terminal.
#[derive(Parser, Debug)]
#[command(name = "trustweave", version)]
struct Args {
    /// Settings file; defaults to ./trustweave.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_key: Option<String>,
    #[arg(long)]
    model: Option<String>,
    #[arg(long)]
    api_base: Option<String>,
    #[arg(long)]
    min_display_ms: Option<u64>,
    #[arg(long)]
    phase_interval_ms: Option<u64>,
    /// Print the assessment as JSON after the report.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn apply_to(&self, settings: &mut Settings) {
        if let Some(v) = &self.api_key {
            settings.api_key = Some(v.clone());
        }
        if let Some(v) = &self.model {
            settings.model = v.clone();
        }
        if let Some(v) = &self.api_base {
            settings.api_base = v.clone();
        }
        if let Some(v) = self.min_display_ms {
            settings.min_display_ms = v;
        }
        if let Some(v) = self.phase_interval_ms {
            settings.phase_interval_ms = v;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(args.config.as_deref())?;
    args.apply_to(&mut settings);
    settings.validate()?;

    let gateway_settings = settings.gateway();
    let key_problem = gateway_settings.api_key().err();
    let gateway: Arc<dyn ReasoningGateway> = match key_problem {
        Some(GatewayError::MissingApiKey) => {
            warn!("no API key configured; assessments will use the baseline result");
            Arc::new(MissingReasoningGateway)
        }
        key_problem => {
            if let Some(err) = key_problem {
                warn!(error = %err, "assessments will fall back to the baseline result");
            }
            info!(
                model = %gateway_settings.model,
                api_base = %gateway_settings.api_base,
                "reasoning gateway configured"
            );
            Arc::new(GeminiGateway::new(gateway_settings)?)
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock());
    let mut wizard = WizardController::new();

    loop {
        let result = match console
            .run_session(&mut wizard, gateway.clone(), settings.processing())
            .await
        {
            Ok(result) => result,
            Err(err) if err.is::<InputClosed>() => {
                info!("input closed; exiting");
                return Ok(());
            }
            Err(err) => return Err(err),
        };
        if args.json {
            console.print_json(&result)?;
        }

        match console.ask_restart() {
            Ok(true) => wizard.reset(),
            Ok(false) => break,
            Err(err) if err.is::<InputClosed>() => break,
            Err(err) => return Err(err),
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
