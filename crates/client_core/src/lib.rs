pub mod evidence;
pub mod gateway;
pub mod processing;
pub mod prompt;
pub mod report;
pub mod response;
pub mod steps;
pub mod wizard;

pub use gateway::{
    assess_or_fallback, GatewayError, GatewaySettings, GeminiGateway, MissingReasoningGateway,
    ReasoningGateway,
};
pub use processing::{ProcessingConfig, ProcessingEvent, ProcessingTask, PROCESSING_PHASES};
pub use report::{BandTone, ReportView};
pub use wizard::{next_step, DraftPatch, DraftUpdate, WizardController};
