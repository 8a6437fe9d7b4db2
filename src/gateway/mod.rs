//! Validation Gateway - advisory review of form inputs by a text-generation
//! service.
//!
//! - `contract` - request/response shapes
//! - `client` - the `InputValidator` seam and its Gemini implementation
//! - `service` - outcome normalization
//! - `gate` - one call in flight at a time

pub mod client;
pub mod contract;
pub mod gate;
pub mod service;

pub use client::{GeminiValidator, InputValidator, UnconfiguredValidator};
pub use contract::{CorrectedFields, ValidateInputsInput, ValidateInputsOutput};
pub use gate::{SubmissionGate, SubmissionPermit};
pub use service::{GatewayOutcome, GatewayOutcomeBody, ValidationGateway, ValidationResult};

use thiserror::Error;

/// Errors raised while talking to the validation service.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Transport(String),
    #[error("validation service returned status {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("validation service returned an unreadable response: {0}")]
    MalformedResponse(String),
    #[error("validation service output does not match the expected schema: {0}")]
    Schema(#[source] serde_json::Error),
    #[error("validation service returned no output")]
    EmptyResponse,
    #[error("AI validation is not configured (set GEMINI_API_KEY)")]
    NotConfigured,
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::MalformedResponse(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}
