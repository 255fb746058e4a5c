//! Boundary to the external reasoning service that turns a draft into a trust
//! assessment.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    assessment::{AssessmentDraft, AssessmentResult},
    error::ErrorCode,
    protocol::{GenerateContentRequest, GenerateContentResponse},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{prompt::build_prompt, response::parse_assessment};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const PLACEHOLDER_API_KEYS: &[&str] = &["PLACEHOLDER_API_KEY", "YOUR_API_KEY", "your-api-key"];
const MAX_ERROR_BODY_CHARS: usize = 2048;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("reasoning service API key is not configured")]
    MissingApiKey,
    #[error("reasoning service API key is a placeholder value")]
    PlaceholderApiKey,
    #[error("failed to reach reasoning service: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("reasoning service returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("reasoning service returned no text")]
    EmptyResponse,
    #[error("failed to parse reasoning response: {0}")]
    Parse(String),
}

impl GatewayError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GatewayError::MissingApiKey | GatewayError::PlaceholderApiKey => {
                ErrorCode::Configuration
            }
            GatewayError::Transport(_) | GatewayError::Status { .. } => ErrorCode::Transport,
            GatewayError::EmptyResponse | GatewayError::Parse(_) => ErrorCode::Parse,
        }
    }
}

#[async_trait]
pub trait ReasoningGateway: Send + Sync {
    async fn assess(&self, draft: &AssessmentDraft) -> Result<AssessmentResult, GatewayError>;
}

/// Stand-in used when no API key was configured at startup.
pub struct MissingReasoningGateway;

#[async_trait]
impl ReasoningGateway for MissingReasoningGateway {
    async fn assess(&self, _draft: &AssessmentDraft) -> Result<AssessmentResult, GatewayError> {
        Err(GatewayError::MissingApiKey)
    }
}

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub request_timeout: Duration,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl GatewaySettings {
    /// The configured key, refusing empty and placeholder values.
    pub fn api_key(&self) -> Result<&str, GatewayError> {
        let key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(GatewayError::MissingApiKey)?;
        if PLACEHOLDER_API_KEYS
            .iter()
            .any(|placeholder| key.eq_ignore_ascii_case(placeholder))
        {
            return Err(GatewayError::PlaceholderApiKey);
        }
        Ok(key)
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

/// Gemini `generateContent` client asking for a JSON answer.
pub struct GeminiGateway {
    http: Client,
    settings: GatewaySettings,
}

impl GeminiGateway {
    pub fn new(settings: GatewaySettings) -> Result<Self, GatewayError> {
        let http = Client::builder().timeout(settings.request_timeout).build()?;
        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }
}

#[async_trait]
impl ReasoningGateway for GeminiGateway {
    async fn assess(&self, draft: &AssessmentDraft) -> Result<AssessmentResult, GatewayError> {
        let api_key = self.settings.api_key()?;
        let request = GenerateContentRequest::assessment(build_prompt(draft));

        info!(model = %self.settings.model, "requesting trust assessment");
        let response = self
            .http
            .post(self.settings.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GatewayError::Status {
                status,
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let envelope: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|err| GatewayError::Parse(err.to_string()))?;
        let text = envelope.text().ok_or(GatewayError::EmptyResponse)?;
        parse_assessment(&text)
    }
}

/// Never fails: any gateway error is logged and replaced by the fixed fallback
/// result.
pub async fn assess_or_fallback(
    gateway: &dyn ReasoningGateway,
    draft: &AssessmentDraft,
) -> AssessmentResult {
    match gateway.assess(draft).await {
        Ok(result) => {
            info!(band = result.trust_band().code(), "trust assessment received");
            result
        }
        Err(err) => {
            warn!(
                error = %err,
                code = err.code().as_str(),
                "reasoning gateway failed; using fallback assessment"
            );
            AssessmentResult::fallback()
        }
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
