//! Validation Gateway: one request, one normalized outcome.

use futures::FutureExt;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use utoipa::ToSchema;

use super::client::InputValidator;
use super::contract::{CorrectedFields, ValidateInputsInput};
use crate::cover::CoverPage;

pub const NO_ISSUES_MESSAGE: &str = "All inputs look good!";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// Corrected fields plus suggestions from one successful call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub corrected_fields: CorrectedFields,
    /// Never empty: an upstream list with no entries becomes
    /// [`NO_ISSUES_MESSAGE`].
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOutcome {
    Success(ValidationResult),
    Failure { message: String },
}

/// Wire shape: `{success: true, correctedFields, suggestions}` or
/// `{success: false, message}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GatewayOutcomeBody {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrected_fields: Option<CorrectedFields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GatewayOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::Failure {
                message: UNKNOWN_ERROR_MESSAGE.to_string(),
            }
        } else {
            Self::Failure { message }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn to_body(&self) -> GatewayOutcomeBody {
        match self {
            Self::Success(result) => GatewayOutcomeBody {
                success: true,
                corrected_fields: Some(result.corrected_fields.clone()),
                suggestions: Some(result.suggestions.clone()),
                message: None,
            },
            Self::Failure { message } => GatewayOutcomeBody {
                success: false,
                corrected_fields: None,
                suggestions: None,
                message: Some(message.clone()),
            },
        }
    }
}

impl Serialize for GatewayOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_body().serialize(serializer)
    }
}

/// Sends validated records to the injected [`InputValidator`].
#[derive(Clone)]
pub struct ValidationGateway {
    validator: Arc<dyn InputValidator>,
    institution: String,
}

impl ValidationGateway {
    pub fn new(validator: Arc<dyn InputValidator>, institution: impl Into<String>) -> Self {
        Self {
            validator,
            institution: institution.into(),
        }
    }

    /// Run one review. Never fails: every error, including a panic inside
    /// the validator, is folded into [`GatewayOutcome::Failure`].
    pub async fn validate(&self, page: &CoverPage) -> GatewayOutcome {
        let input = ValidateInputsInput::from_page(page, &self.institution);
        log::info!(
            "requesting AI validation for {} ({})",
            input.student_id,
            input.document_type
        );

        let call = AssertUnwindSafe(self.validator.validate_inputs(&input)).catch_unwind();
        match call.await {
            Ok(Ok(output)) => {
                let (corrected_fields, mut suggestions) = output.split();
                if suggestions.is_empty() {
                    suggestions.push(NO_ISSUES_MESSAGE.to_string());
                }
                log::info!("AI validation returned {} suggestion(s)", suggestions.len());
                GatewayOutcome::Success(ValidationResult {
                    corrected_fields,
                    suggestions,
                })
            }
            Ok(Err(err)) => {
                log::error!("AI validation failed: {}", err);
                GatewayOutcome::failure(err.to_string())
            }
            Err(_) => {
                log::error!("AI validation panicked");
                GatewayOutcome::failure(UNKNOWN_ERROR_MESSAGE)
            }
        }
    }
}
