//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use coverie::cover::{CoverPageData, Field, FieldUpdate};
use coverie::gateway::client::InputValidator;
use coverie::gateway::contract::{ValidateInputsInput, ValidateInputsOutput};
use coverie::gateway::GatewayError;

pub const INSTITUTION: &str = "Chandpur Science and Technology";

/// Upstream answer that echoes the input back.
pub fn echo_output(input: &ValidateInputsInput, suggestions: Vec<String>) -> ValidateInputsOutput {
    ValidateInputsOutput {
        validated_university_name: input.university_name.clone(),
        validated_department: input.department.clone(),
        validated_session: input.session.clone(),
        validated_course_code: input.course_code.clone(),
        validated_teacher_name: input.teacher_name.clone(),
        validated_designation: input.designation.clone(),
        validated_student_name: input.student_name.clone(),
        validated_student_id: input.student_id.clone(),
        validated_submission_date: input.submission_date.clone(),
        validated_topic: input.topic.clone(),
        suggestions,
    }
}

/// A record that passes schema validation.
pub fn complete_record() -> CoverPageData {
    CoverPageData {
        department: "CSE".into(),
        session: "Fall 2024".into(),
        course_code: "CSE-101".into(),
        teacher_name: "Dr. Alan Turing".into(),
        designation: "Professor".into(),
        student_name: "Ada Lovelace".into(),
        student_id: "20240001".into(),
        submission_date: NaiveDate::from_ymd_opt(2024, 3, 15),
        topic: Some("Data Structures".into()),
        document_type: "assignment".into(),
    }
}

/// Edits that turn the default record into [`complete_record`] (date aside).
pub fn complete_updates() -> Vec<FieldUpdate> {
    vec![
        FieldUpdate::new(Field::Session, "Fall 2024"),
        FieldUpdate::new(Field::CourseCode, "CSE-101"),
        FieldUpdate::new(Field::TeacherName, "Dr. Alan Turing"),
        FieldUpdate::new(Field::Designation, "Professor"),
        FieldUpdate::new(Field::StudentName, "Ada Lovelace"),
        FieldUpdate::new(Field::StudentId, "20240001"),
        FieldUpdate::new(Field::Topic, "Data Structures"),
        FieldUpdate::new(Field::SubmissionDate, "2024-03-15"),
    ]
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Returns a fixed list of suggestions and counts calls.
pub struct ScriptedValidator {
    pub suggestions: Vec<String>,
    pub calls: AtomicUsize,
}

impl ScriptedValidator {
    pub fn new(suggestions: Vec<&str>) -> Arc<Self> {
        Arc::new(Self {
            suggestions: suggestions.into_iter().map(str::to_string).collect(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InputValidator for ScriptedValidator {
    async fn validate_inputs(
        &self,
        input: &ValidateInputsInput,
    ) -> Result<ValidateInputsOutput, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(echo_output(input, self.suggestions.clone()))
    }
}

/// Always fails with a transport error.
pub struct FailingValidator {
    pub message: String,
}

#[async_trait]
impl InputValidator for FailingValidator {
    async fn validate_inputs(
        &self,
        _input: &ValidateInputsInput,
    ) -> Result<ValidateInputsOutput, GatewayError> {
        Err(GatewayError::Transport(self.message.clone()))
    }
}

/// Panics inside the call.
pub struct PanickingValidator;

#[async_trait]
impl InputValidator for PanickingValidator {
    async fn validate_inputs(
        &self,
        _input: &ValidateInputsInput,
    ) -> Result<ValidateInputsOutput, GatewayError> {
        panic!("validator bug")
    }
}

/// Waits until released, then echoes the input.
pub struct BlockingValidator {
    pub release: Arc<Notify>,
}

#[async_trait]
impl InputValidator for BlockingValidator {
    async fn validate_inputs(
        &self,
        input: &ValidateInputsInput,
    ) -> Result<ValidateInputsOutput, GatewayError> {
        self.release.notified().await;
        Ok(echo_output(input, Vec::new()))
    }
}
