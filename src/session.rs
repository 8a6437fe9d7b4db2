//! Per-user form sessions.
//!
//! A session is the lifetime of one form record: created with defaults,
//! edited in place, and dropped when it has been idle long enough.

use moka::future::Cache;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::cover::model::FieldUpdateError;
use crate::cover::{
    render, validate, CoverPageData, CoverPagePreview, FieldUpdate, FormState, ValidationError,
    ValidationErrors,
};
use crate::gateway::{GatewayOutcome, SubmissionGate, ValidationGateway, ValidationResult};

/// Why an AI validation request was not sent.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("a validation request is already in progress")]
    InFlight,
    #[error("{0}")]
    Invalid(ValidationErrors),
}

/// Everything a client needs to draw the form and the preview.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub data: CoverPageData,
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub preview: CoverPagePreview,
    pub suggestions: Vec<String>,
    pub validation_result: Option<ValidationResult>,
    pub validating: bool,
}

pub struct Session {
    id: Uuid,
    form: FormState,
    errors: Arc<RwLock<ValidationErrors>>,
    gate: Arc<SubmissionGate>,
    result: RwLock<Option<ValidationResult>>,
}

impl Session {
    pub fn new(id: Uuid, data: CoverPageData) -> Self {
        let initial_errors = validate(&data).err().unwrap_or_default();
        let errors = Arc::new(RwLock::new(initial_errors));
        let form = FormState::new(data);

        let sink = errors.clone();
        form.subscribe(Arc::new(move |data: &CoverPageData| {
            *sink.write() = validate(data).err().unwrap_or_default();
        }));

        Self {
            id,
            form,
            errors,
            gate: SubmissionGate::new(),
            result: RwLock::new(None),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn errors(&self) -> ValidationErrors {
        self.errors.read().clone()
    }

    pub fn is_validating(&self) -> bool {
        self.gate.is_in_flight()
    }

    pub fn validation_result(&self) -> Option<ValidationResult> {
        self.result.read().clone()
    }

    /// Apply edits in order. A rejected edit discards the whole batch.
    pub fn apply(&self, updates: &[FieldUpdate]) -> Result<(), FieldUpdateError> {
        self.form.apply_all(updates)
    }

    pub fn view(&self, institution: &str) -> SessionView {
        let data = self.form.snapshot();
        let errors = self.errors();
        let validation_result = self.validation_result();
        SessionView {
            id: self.id,
            preview: render(&data, institution),
            data,
            valid: errors.is_empty(),
            errors: errors.into_vec(),
            suggestions: validation_result
                .as_ref()
                .map(|result| result.suggestions.clone())
                .unwrap_or_default(),
            validation_result,
            validating: self.is_validating(),
        }
    }

    /// Send the current record to the gateway.
    ///
    /// The record must pass schema validation and no other call may be
    /// outstanding. Previous suggestions are cleared before the call; a
    /// failure leaves them cleared and the form untouched.
    pub async fn run_ai_validation(
        &self,
        gateway: &ValidationGateway,
    ) -> Result<GatewayOutcome, SubmitError> {
        let page = validate(&self.form.snapshot()).map_err(SubmitError::Invalid)?;
        let _permit = self.gate.try_acquire().ok_or(SubmitError::InFlight)?;

        *self.result.write() = None;
        let outcome = gateway.validate(&page).await;
        if let GatewayOutcome::Success(result) = &outcome {
            *self.result.write() = Some(result.clone());
        }
        Ok(outcome)
    }
}

/// Live sessions, expiring after a period of inactivity.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<Uuid, Arc<Session>>,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration, max_sessions: u64) -> Self {
        let sessions = Cache::builder()
            .time_to_idle(idle_timeout)
            .max_capacity(max_sessions)
            .eviction_listener(|id: Arc<Uuid>, _session: Arc<Session>, cause| {
                log::debug!("Session {} ended ({:?})", id, cause);
            })
            .build();
        Self { sessions }
    }

    pub async fn create(&self, data: CoverPageData) -> Arc<Session> {
        let session = Arc::new(Session::new(Uuid::new_v4(), data));
        self.sessions.insert(session.id(), session.clone()).await;
        log::debug!("Session {} started", session.id());
        session
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<Session>> {
        self.sessions.get(id).await
    }

    pub async fn remove(&self, id: &Uuid) -> bool {
        self.sessions.remove(id).await.is_some()
    }
}
