//! Data contracts exchanged with the text-generation service.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::cover::dates::format_transmission_date;
use crate::cover::CoverPage;

/// Request sent upstream. The submission date travels as "YYYY-MM-DD".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateInputsInput {
    pub university_name: String,
    pub department: String,
    pub session: String,
    pub course_code: String,
    pub teacher_name: String,
    pub designation: String,
    pub student_name: String,
    pub student_id: String,
    pub submission_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub document_type: String,
}

impl ValidateInputsInput {
    pub fn from_page(page: &CoverPage, university_name: &str) -> Self {
        Self {
            university_name: university_name.to_string(),
            department: page.department.code().to_string(),
            session: page.session.clone(),
            course_code: page.course_code.clone(),
            teacher_name: page.teacher_name.clone(),
            designation: page.designation.clone(),
            student_name: page.student_name.clone(),
            student_id: page.student_id.clone(),
            submission_date: format_transmission_date(page.submission_date),
            topic: page.topic.clone().filter(|topic| !topic.is_empty()),
            document_type: page.document_type.as_str().to_string(),
        }
    }
}

/// Output returned upstream, keyed the way the prompt asks for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateInputsOutput {
    pub validated_university_name: String,
    pub validated_department: String,
    pub validated_session: String,
    pub validated_course_code: String,
    pub validated_teacher_name: String,
    pub validated_designation: String,
    pub validated_student_name: String,
    pub validated_student_id: String,
    pub validated_submission_date: String,
    #[serde(default)]
    pub validated_topic: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Corrected copy of every input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CorrectedFields {
    pub university_name: String,
    pub department: String,
    pub session: String,
    pub course_code: String,
    pub teacher_name: String,
    pub designation: String,
    pub student_name: String,
    pub student_id: String,
    pub submission_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl ValidateInputsOutput {
    pub fn split(self) -> (CorrectedFields, Vec<String>) {
        let fields = CorrectedFields {
            university_name: self.validated_university_name,
            department: self.validated_department,
            session: self.validated_session,
            course_code: self.validated_course_code,
            teacher_name: self.validated_teacher_name,
            designation: self.validated_designation,
            student_name: self.validated_student_name,
            student_id: self.validated_student_id,
            submission_date: self.validated_submission_date,
            topic: self.validated_topic,
        };
        (fields, self.suggestions)
    }
}
