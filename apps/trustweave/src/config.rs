use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use client_core::{
    gateway::{DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT},
    processing::{DEFAULT_MIN_DISPLAY, DEFAULT_PHASE_INTERVAL},
    GatewaySettings, ProcessingConfig,
};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "trustweave.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub request_timeout_secs: u64,
    pub phase_interval_ms: u64,
    pub min_display_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            api_base: DEFAULT_API_BASE.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            phase_interval_ms: DEFAULT_PHASE_INTERVAL.as_millis() as u64,
            min_display_ms: DEFAULT_MIN_DISPLAY.as_millis() as u64,
        }
    }
}

/// Keys accepted in `trustweave.toml`. Anything left out keeps its default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_key: Option<String>,
    model: Option<String>,
    api_base: Option<String>,
    request_timeout_secs: Option<u64>,
    phase_interval_ms: Option<u64>,
    min_display_ms: Option<u64>,
}

/// Defaults, then the settings file, then the process environment.
///
/// An explicit `config_path` must exist; the default file is optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    if required || path.exists() {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?;
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

pub(crate) fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.api_key {
        settings.api_key = Some(v);
    }
    if let Some(v) = file_cfg.model {
        settings.model = v;
    }
    if let Some(v) = file_cfg.api_base {
        settings.api_base = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = file_cfg.phase_interval_ms {
        settings.phase_interval_ms = v;
    }
    if let Some(v) = file_cfg.min_display_ms {
        settings.min_display_ms = v;
    }
    Ok(())
}

/// Later keys win: `GEMINI_API_KEY`, then `API_KEY`, then `APP__API_KEY`.
pub(crate) fn apply_env(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    for key in ["GEMINI_API_KEY", "API_KEY", "APP__API_KEY"] {
        if let Some(v) = lookup(key) {
            settings.api_key = Some(v);
        }
    }
    if let Some(v) = lookup("APP__MODEL") {
        settings.model = v;
    }
    if let Some(v) = lookup("APP__API_BASE") {
        settings.api_base = v;
    }
    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = parse_number("APP__REQUEST_TIMEOUT_SECS", &v)?;
    }
    if let Some(v) = lookup("APP__PHASE_INTERVAL_MS") {
        settings.phase_interval_ms = parse_number("APP__PHASE_INTERVAL_MS", &v)?;
    }
    if let Some(v) = lookup("APP__MIN_DISPLAY_MS") {
        settings.min_display_ms = parse_number("APP__MIN_DISPLAY_MS", &v)?;
    }
    Ok(())
}

fn parse_number(key: &str, raw: &str) -> anyhow::Result<u64> {
    raw.trim()
        .parse()
        .with_context(|| format!("{key} must be a whole number, got '{raw}'"))
}

impl Settings {
    pub fn validate(&self) -> anyhow::Result<()> {
        let base = Url::parse(&self.api_base)
            .with_context(|| format!("api_base '{}' is not a valid URL", self.api_base))?;
        if !matches!(base.scheme(), "http" | "https") {
            bail!("api_base must use http or https, got '{}'", base.scheme());
        }
        if self.model.trim().is_empty() {
            bail!("model must not be empty");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }
        if self.phase_interval_ms == 0 {
            bail!("phase_interval_ms must be greater than zero");
        }
        Ok(())
    }

    pub fn gateway(&self) -> GatewaySettings {
        GatewaySettings {
            api_key: self.api_key.clone(),
            model: self.model.trim().to_string(),
            api_base: self.api_base.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn processing(&self) -> ProcessingConfig {
        ProcessingConfig {
            phase_interval: Duration::from_millis(self.phase_interval_ms),
            min_display: Duration::from_millis(self.min_display_ms),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
