//! Cover page form record and its validated counterpart.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Departments offered on the cover page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Department {
    #[serde(rename = "CSE")]
    Cse,
    #[serde(rename = "ICT")]
    Ict,
    #[serde(rename = "BBA")]
    Bba,
}

impl Department {
    pub const ALL: [Department; 3] = [Department::Cse, Department::Ict, Department::Bba];

    pub fn code(&self) -> &'static str {
        match self {
            Department::Cse => "CSE",
            Department::Ict => "ICT",
            Department::Bba => "BBA",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.code() == code.trim())
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Kind of academic document the cover page is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum DocumentType {
    #[serde(rename = "assignment")]
    Assignment,
    #[serde(rename = "lab report")]
    LabReport,
    #[serde(rename = "general note")]
    GeneralNote,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [
        DocumentType::Assignment,
        DocumentType::LabReport,
        DocumentType::GeneralNote,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Assignment => "assignment",
            DocumentType::LabReport => "lab report",
            DocumentType::GeneralNote => "general note",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value.trim())
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw form record as the user is editing it.
///
/// Department and document type are kept as free strings so a partially
/// invalid record can still be previewed; `validation::validate` turns it
/// into a [`CoverPage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoverPageData {
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub session: String,
    #[serde(default)]
    pub course_code: String,
    #[serde(default)]
    pub teacher_name: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub submission_date: Option<NaiveDate>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub document_type: String,
}

impl Default for CoverPageData {
    fn default() -> Self {
        Self::with_date(Local::now().date_naive())
    }
}

impl CoverPageData {
    /// Session-start defaults with an explicit submission date.
    pub fn with_date(submission_date: NaiveDate) -> Self {
        Self {
            department: Department::Cse.code().to_string(),
            session: String::new(),
            course_code: String::new(),
            teacher_name: String::new(),
            designation: String::new(),
            student_name: String::new(),
            student_id: String::new(),
            submission_date: Some(submission_date),
            topic: Some(String::new()),
            document_type: DocumentType::Assignment.as_str().to_string(),
        }
    }

    /// Topic text with surrounding whitespace removed, `None` when blank.
    pub fn trimmed_topic(&self) -> Option<&str> {
        self.topic
            .as_deref()
            .map(str::trim)
            .filter(|topic| !topic.is_empty())
    }
}

/// A record that passed schema validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoverPage {
    pub department: Department,
    pub session: String,
    pub course_code: String,
    pub teacher_name: String,
    pub designation: String,
    pub student_name: String,
    pub student_id: String,
    pub submission_date: NaiveDate,
    /// Always `None` for document types that take no topic.
    pub topic: Option<String>,
    pub document_type: DocumentType,
}

/// Editable form fields, addressed by their wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Department,
    Session,
    CourseCode,
    TeacherName,
    Designation,
    StudentName,
    StudentId,
    SubmissionDate,
    Topic,
    DocumentType,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Department => "department",
            Field::Session => "session",
            Field::CourseCode => "courseCode",
            Field::TeacherName => "teacherName",
            Field::Designation => "designation",
            Field::StudentName => "studentName",
            Field::StudentId => "studentId",
            Field::SubmissionDate => "submissionDate",
            Field::Topic => "topic",
            Field::DocumentType => "documentType",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised while applying a single field edit.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FieldUpdateError {
    #[error("submission date '{0}' is not a calendar date (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

/// One edit coming from the form: a field and its new text value.
///
/// An empty value clears the submission date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldUpdate {
    pub field: Field,
    pub value: String,
}

impl FieldUpdate {
    pub fn new(field: Field, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    pub fn apply_to(&self, data: &mut CoverPageData) -> Result<(), FieldUpdateError> {
        let value = self.value.clone();
        match self.field {
            Field::Department => data.department = value,
            Field::Session => data.session = value,
            Field::CourseCode => data.course_code = value,
            Field::TeacherName => data.teacher_name = value,
            Field::Designation => data.designation = value,
            Field::StudentName => data.student_name = value,
            Field::StudentId => data.student_id = value,
            Field::Topic => data.topic = Some(value),
            Field::DocumentType => data.document_type = value,
            Field::SubmissionDate => {
                data.submission_date = if value.trim().is_empty() {
                    None
                } else {
                    Some(super::dates::parse_transmission_date(&value).ok_or_else(|| {
                        FieldUpdateError::InvalidDate(value.clone())
                    })?)
                };
            }
        }
        Ok(())
    }
}
