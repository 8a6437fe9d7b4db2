//! Schema validation for the cover page form.
//!
//! Each field has one rule. Errors are collected rather than returned on the
//! first failure so the form can show every message inline.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

use super::dates::{earliest_submission_date, format_display_date};
use super::model::{CoverPage, CoverPageData, Department, DocumentType, Field};

/// Minimum length for the department code.
pub const DEPARTMENT_MIN_LEN: usize = 2;
/// Minimum length for every other free-text field.
pub const TEXT_MIN_LEN: usize = 3;

/// Which document types carry a topic.
const TOPIC_RULES: [(DocumentType, bool); 3] = [
    (DocumentType::Assignment, true),
    (DocumentType::LabReport, true),
    (DocumentType::GeneralNote, false),
];

pub fn requires_topic(document_type: DocumentType) -> bool {
    TOPIC_RULES
        .iter()
        .find(|(kind, _)| *kind == document_type)
        .map(|(_, required)| *required)
        .unwrap_or(false)
}

/// A single field that failed its rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationError {
    pub field: Field,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of field errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.errors
    }

    /// First message reported for a field, if any.
    pub fn message_for(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn to_message(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!(
            "Validation failed: {} field(s) need attention",
            self.errors.len()
        )];
        for (i, error) in self.errors.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }
        parts.join("\n")
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_message())
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// Rules
// ============================================================================

/// Validate that a trimmed text value has at least `min` characters.
pub fn validate_min_len(
    value: &str,
    min: usize,
    field: Field,
    message: &str,
    errors: &mut ValidationErrors,
) {
    if value.trim().chars().count() < min {
        errors.add(ValidationError::new(field, message));
    }
}

/// Validate the submission date against [1900-01-01, today].
pub fn validate_submission_date(
    value: Option<NaiveDate>,
    today: NaiveDate,
    errors: &mut ValidationErrors,
) -> Option<NaiveDate> {
    let Some(date) = value else {
        errors.add(ValidationError::new(
            Field::SubmissionDate,
            "Submission date is required.",
        ));
        return None;
    };

    let earliest = earliest_submission_date();
    if date > today {
        errors.add(ValidationError::new(
            Field::SubmissionDate,
            format!(
                "Submission date cannot be later than today ({}).",
                format_display_date(today)
            ),
        ));
        None
    } else if date < earliest {
        errors.add(ValidationError::new(
            Field::SubmissionDate,
            format!(
                "Submission date cannot be earlier than {}.",
                format_display_date(earliest)
            ),
        ));
        None
    } else {
        Some(date)
    }
}

/// Validate against today's local date.
pub fn validate(data: &CoverPageData) -> Result<CoverPage, ValidationErrors> {
    validate_on(data, Local::now().date_naive())
}

/// Validate a candidate record using `today` as the upper date bound.
pub fn validate_on(data: &CoverPageData, today: NaiveDate) -> Result<CoverPage, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let department = if data.department.trim().chars().count() < DEPARTMENT_MIN_LEN {
        errors.add(ValidationError::new(
            Field::Department,
            "Department is required.",
        ));
        None
    } else {
        let parsed = Department::from_code(&data.department);
        if parsed.is_none() {
            errors.add(ValidationError::new(
                Field::Department,
                format!(
                    "Department must be one of: {}.",
                    Department::ALL.map(|d| d.code()).join(", ")
                ),
            ));
        }
        parsed
    };

    let text_rules: [(&str, Field, &str); 6] = [
        (data.session.as_str(), Field::Session, "Session is required."),
        (data.course_code.as_str(), Field::CourseCode, "Course code is required."),
        (data.teacher_name.as_str(), Field::TeacherName, "Teacher's name is required."),
        (data.designation.as_str(), Field::Designation, "Designation is required."),
        (data.student_name.as_str(), Field::StudentName, "Your name is required."),
        (data.student_id.as_str(), Field::StudentId, "Your ID is required."),
    ];
    for (value, field, message) in text_rules {
        validate_min_len(value, TEXT_MIN_LEN, field, message, &mut errors);
    }

    let submission_date = validate_submission_date(data.submission_date, today, &mut errors);

    let document_type = DocumentType::parse(&data.document_type);
    if document_type.is_none() {
        errors.add(ValidationError::new(
            Field::DocumentType,
            format!(
                "Document type must be one of: {}.",
                DocumentType::ALL.map(|t| t.as_str()).join(", ")
            ),
        ));
    }

    let topic = match document_type {
        Some(kind) if requires_topic(kind) => {
            let topic = data.topic.as_deref().unwrap_or_default();
            validate_min_len(
                topic,
                TEXT_MIN_LEN,
                Field::Topic,
                &format!("Topic is required for a {}.", kind),
                &mut errors,
            );
            Some(topic.trim().to_string())
        }
        _ => None,
    };

    match (department, submission_date, document_type) {
        (Some(department), Some(submission_date), Some(document_type)) if errors.is_empty() => {
            Ok(CoverPage {
                department,
                session: data.session.trim().to_string(),
                course_code: data.course_code.trim().to_string(),
                teacher_name: data.teacher_name.trim().to_string(),
                designation: data.designation.trim().to_string(),
                student_name: data.student_name.trim().to_string(),
                student_id: data.student_id.trim().to_string(),
                submission_date,
                topic,
                document_type,
            })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn valid_record() -> CoverPageData {
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

    #[test]
    fn test_rule_table() {
        assert!(requires_topic(DocumentType::Assignment));
        assert!(requires_topic(DocumentType::LabReport));
        assert!(!requires_topic(DocumentType::GeneralNote));
    }

    #[test]
    fn test_valid_record() {
        let page = validate_on(&valid_record(), today()).unwrap();
        assert_eq!(page.department, Department::Cse);
        assert_eq!(page.document_type, DocumentType::Assignment);
        assert_eq!(page.topic.as_deref(), Some("Data Structures"));
    }

    #[test]
    fn test_short_text_fields_rejected() {
        let mut record = valid_record();
        record.session = "F1".into();
        record.student_id = "  ".into();

        let errors = validate_on(&record, today()).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.message_for(Field::Session), Some("Session is required."));
        assert_eq!(errors.message_for(Field::StudentId), Some("Your ID is required."));
    }

    #[test]
    fn test_unknown_department_rejected() {
        let mut record = valid_record();
        record.department = "EEE".into();
        let errors = validate_on(&record, today()).unwrap_err();
        assert!(errors
            .message_for(Field::Department)
            .unwrap()
            .contains("CSE, ICT, BBA"));
    }

    #[test]
    fn test_date_bounds() {
        let mut record = valid_record();

        record.submission_date = today().succ_opt();
        assert!(validate_on(&record, today()).is_err());

        record.submission_date = Some(today());
        assert!(validate_on(&record, today()).is_ok());

        record.submission_date = NaiveDate::from_ymd_opt(1899, 12, 31);
        assert!(validate_on(&record, today()).is_err());

        record.submission_date = NaiveDate::from_ymd_opt(1900, 1, 1);
        assert!(validate_on(&record, today()).is_ok());

        record.submission_date = None;
        let errors = validate_on(&record, today()).unwrap_err();
        assert_eq!(
            errors.message_for(Field::SubmissionDate),
            Some("Submission date is required.")
        );
    }

    #[test]
    fn test_topic_required_for_lab_report() {
        let mut record = valid_record();
        record.document_type = "lab report".into();
        record.topic = None;
        let errors = validate_on(&record, today()).unwrap_err();
        assert_eq!(
            errors.message_for(Field::Topic),
            Some("Topic is required for a lab report.")
        );
    }

    #[test]
    fn test_topic_ignored_for_general_note() {
        let mut record = valid_record();
        record.document_type = "general note".into();
        record.topic = Some("x".into());
        let page = validate_on(&record, today()).unwrap();
        assert_eq!(page.topic, None);
    }

    #[test]
    fn test_error_message_lists_fields() {
        let errors = validate_on(&CoverPageData::with_date(today()), today()).unwrap_err();
        let message = errors.to_message();
        assert!(message.contains("7 field(s)"));
        assert!(message.contains("[teacherName] Teacher's name is required."));
    }
}
