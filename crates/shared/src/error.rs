use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::StepId;

/// Coarse classification of why a reasoning request did not produce a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Configuration,
    Transport,
    Parse,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Configuration => "configuration",
            ErrorCode::Transport => "transport",
            ErrorCode::Parse => "parse",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("{0} has no successor step")]
    NoSuccessor(StepId),
    #[error("draft is sealed once {0} is reached")]
    DraftSealed(StepId),
    #[error("{0} is not complete yet")]
    Incomplete(StepId),
    #[error("expected wizard at {expected}, found {actual}")]
    WrongStep { expected: StepId, actual: StepId },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownChoice {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
