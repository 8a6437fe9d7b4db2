//! Upstream validators.
//!
//! [`InputValidator`] is the seam the gateway calls through. The production
//! implementation talks to the Gemini `generateContent` endpoint; tests swap
//! in fakes.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use super::contract::{ValidateInputsInput, ValidateInputsOutput};
use super::GatewayError;

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// External service that reviews form inputs.
#[async_trait]
pub trait InputValidator: Send + Sync {
    async fn validate_inputs(
        &self,
        input: &ValidateInputsInput,
    ) -> Result<ValidateInputsOutput, GatewayError>;
}

/// Build the review prompt for one request.
pub fn build_prompt(input: &ValidateInputsInput) -> String {
    let topic_line = match &input.topic {
        Some(topic) => format!("Topic: {topic}\n"),
        None => String::new(),
    };

    format!(
        r#"You check the inputs of an academic cover page generator.

Look for problems such as wrong date formats, unusual student ID lengths or
titles that are too long, and suggest improvements.

University Name: {university}
Department: {department}
Session: {session}
Course Code: {course}
Teacher Name: {teacher}
Designation: {designation}
Student Name: {student}
Student ID: {student_id}
Submission Date: {date}
{topic_line}Document Type: {document_type}

Return a validated version of every input and a list of suggestions for any
corrections. If the topic is missing respond with 'Topic: N/A'. Focus on
format and length. Return an input unchanged when it is valid.

Respond with a single JSON object with these keys: validatedUniversityName,
validatedDepartment, validatedSession, validatedCourseCode,
validatedTeacherName, validatedDesignation, validatedStudentName,
validatedStudentId, validatedSubmissionDate, validatedTopic (optional) and
suggestions (array of strings)."#,
        university = input.university_name,
        department = input.department,
        session = input.session,
        course = input.course_code,
        teacher = input.teacher_name,
        designation = input.designation,
        student = input.student_name,
        student_id = input.student_id,
        date = input.submission_date,
        topic_line = topic_line,
        document_type = input.document_type,
    )
}

lazy_static! {
    static ref CODE_FENCE: Regex =
        Regex::new(r"(?s)^\s*```(?:json)?\s*(.*?)\s*```\s*$").expect("valid fence pattern");
}

/// Strip a surrounding markdown code fence, if the model added one.
pub fn strip_code_fence(text: &str) -> &str {
    match CODE_FENCE.captures(text).and_then(|caps| caps.get(1)) {
        Some(body) => body.as_str(),
        None => text.trim(),
    }
}

/// Parse the model's text answer into the output contract.
pub fn parse_output(text: &str) -> Result<ValidateInputsOutput, GatewayError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(GatewayError::EmptyResponse);
    }
    serde_json::from_str(body).map_err(GatewayError::Schema)
}

// ============================================================================
// Gemini wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    error: UpstreamErrorDetail,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorDetail {
    message: String,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .filter_map(|part| part.text)
            .find(|text| !text.trim().is_empty())
    }
}

/// Gemini-backed validator.
#[derive(Debug, Clone)]
pub struct GeminiValidator {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl GeminiValidator {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("coverie/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, endpoint, api_key, model))
    }

    pub fn with_client(
        client: Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl InputValidator for GeminiValidator {
    async fn validate_inputs(
        &self,
        input: &ValidateInputsInput,
    ) -> Result<ValidateInputsOutput, GatewayError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(build_prompt(input)),
                }],
            }],
            generation_config: json!({ "responseMimeType": "application/json" }),
        };

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<UpstreamErrorBody>(&body)
                .map(|parsed| parsed.error.message)
                .unwrap_or(body);
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let payload: GenerateContentResponse = response.json().await?;
        let text = payload.first_text().ok_or(GatewayError::EmptyResponse)?;
        parse_output(&text)
    }
}

/// Stand-in used when no API key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredValidator;

#[async_trait]
impl InputValidator for UnconfiguredValidator {
    async fn validate_inputs(
        &self,
        _input: &ValidateInputsInput,
    ) -> Result<ValidateInputsOutput, GatewayError> {
        Err(GatewayError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(topic: Option<&str>) -> ValidateInputsInput {
        ValidateInputsInput {
            university_name: "Chandpur Science and Technology".into(),
            department: "CSE".into(),
            session: "Fall 2024".into(),
            course_code: "CSE-101".into(),
            teacher_name: "Dr. Alan Turing".into(),
            designation: "Professor".into(),
            student_name: "Ada Lovelace".into(),
            student_id: "20240001".into(),
            submission_date: "2024-03-15".into(),
            topic: topic.map(str::to_string),
            document_type: "assignment".into(),
        }
    }

    #[test]
    fn test_prompt_includes_topic_only_when_present() {
        assert!(build_prompt(&input(Some("Graphs"))).contains("Topic: Graphs\nDocument Type: assignment"));
        let without = build_prompt(&input(None));
        assert!(!without.contains("Topic: Graphs"));
        assert!(without.contains("Submission Date: 2024-03-15\nDocument Type: assignment"));
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fence("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_output_errors() {
        assert!(matches!(parse_output("   "), Err(GatewayError::EmptyResponse)));
        assert!(matches!(parse_output("{\"suggestions\": []}"), Err(GatewayError::Schema(_))));
    }

    #[test]
    fn test_first_text_skips_empty_parts() {
        let payload: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": " "}, {"text": "{}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(payload.first_text().as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_unconfigured_validator_fails() {
        let err = UnconfiguredValidator
            .validate_inputs(&input(None))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::NotConfigured));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let validator = GeminiValidator::new(
            "http://127.0.0.1:9",
            "test-key",
            DEFAULT_GEMINI_MODEL,
            Duration::from_secs(2),
        )
        .unwrap();
        let err = validator.validate_inputs(&input(None)).await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }
}
