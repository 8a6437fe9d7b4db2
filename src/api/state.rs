//! Shared application state for the HTTP handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::cover::TypstPrinter;
use crate::gateway::{
    GatewayError, GeminiValidator, InputValidator, UnconfiguredValidator, ValidationGateway,
};
use crate::session::SessionStore;
use crate::topics::TopicStore;

#[derive(Clone)]
pub struct AppState {
    pub institution: String,
    pub sessions: SessionStore,
    pub gateway: ValidationGateway,
    pub topics: Arc<TopicStore>,
    pub printer: TypstPrinter,
}

impl AppState {
    /// Wire the state from configuration, choosing the Gemini validator when
    /// an API key is present.
    pub fn from_config(config: &AppConfig) -> Result<Self, GatewayError> {
        let validator: Arc<dyn InputValidator> = match &config.gemini {
            Some(gemini) => {
                log::info!("AI validation enabled with model {}", gemini.model);
                Arc::new(GeminiValidator::new(
                    gemini.endpoint.clone(),
                    gemini.api_key.clone(),
                    gemini.model.clone(),
                    gemini.timeout,
                )?)
            }
            None => {
                log::warn!("GEMINI_API_KEY is not set; AI validation is disabled");
                Arc::new(UnconfiguredValidator)
            }
        };

        Ok(Self::with_validator(config, validator))
    }

    /// Same as [`AppState::from_config`] with an explicit validator.
    pub fn with_validator(config: &AppConfig, validator: Arc<dyn InputValidator>) -> Self {
        Self {
            institution: config.institution.clone(),
            sessions: SessionStore::new(config.session_idle, config.max_sessions),
            gateway: ValidationGateway::new(validator, config.institution.clone()),
            topics: Arc::new(TopicStore::load(config.topics_file.clone())),
            printer: TypstPrinter::new(config.typst_bin.clone()),
        }
    }
}
