//! Environment configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::gateway::client::{DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL};

pub const DEFAULT_INSTITUTION: &str = "Chandpur Science and Technology";
const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_TOPICS_FILE: &str = "./data/saved_topics.json";
const DEFAULT_SESSION_IDLE_SECS: u64 = 60 * 60;
const DEFAULT_MAX_SESSIONS: u64 = 10_000;
const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub institution: String,
    pub topics_file: PathBuf,
    pub session_idle: Duration,
    pub max_sessions: u64,
    pub typst_bin: PathBuf,
    /// `None` when GEMINI_API_KEY is unset; AI validation then reports that
    /// it is not configured.
    pub gemini: Option<GeminiConfig>,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn positive_u64(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConfigError::InvalidNumber { name, value }),
        _ => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let gemini = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(|api_key| -> Result<GeminiConfig, ConfigError> {
                Ok(GeminiConfig {
                    api_key,
                    model: var_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
                    endpoint: var_or("GEMINI_ENDPOINT", DEFAULT_GEMINI_ENDPOINT),
                    timeout: Duration::from_secs(positive_u64(
                        "GEMINI_TIMEOUT_SECS",
                        DEFAULT_GEMINI_TIMEOUT_SECS,
                    )?),
                })
            })
            .transpose()?;

        Ok(Self {
            bind_addr: var_or("COVERIE_BIND", DEFAULT_BIND),
            institution: var_or("COVERIE_INSTITUTION", DEFAULT_INSTITUTION),
            topics_file: PathBuf::from(var_or("COVERIE_TOPICS_FILE", DEFAULT_TOPICS_FILE)),
            session_idle: Duration::from_secs(positive_u64(
                "COVERIE_SESSION_IDLE_SECS",
                DEFAULT_SESSION_IDLE_SECS,
            )?),
            max_sessions: positive_u64("COVERIE_MAX_SESSIONS", DEFAULT_MAX_SESSIONS)?,
            typst_bin: PathBuf::from(var_or("COVERIE_TYPST_BIN", "typst")),
            gemini,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND.to_string(),
            institution: DEFAULT_INSTITUTION.to_string(),
            topics_file: PathBuf::from(DEFAULT_TOPICS_FILE),
            session_idle: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            max_sessions: DEFAULT_MAX_SESSIONS,
            typst_bin: PathBuf::from("typst"),
            gemini: None,
        }
    }
}
