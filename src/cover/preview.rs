//! Preview renderer.
//!
//! [`render`] is a pure projection of the current form record onto the text
//! of the printed page. It never fails: blank fields show placeholders.

use serde::Serialize;
use utoipa::ToSchema;

use super::dates::format_display_date;
use super::model::{CoverPageData, DocumentType};
use super::validation::requires_topic;

pub const PLACEHOLDER: &str = "...";
pub const TEACHER_NAME_PLACEHOLDER: &str = "Teacher Name";
pub const DESIGNATION_PLACEHOLDER: &str = "Designation";
pub const STUDENT_NAME_PLACEHOLDER: &str = "Student Name";
pub const STUDENT_ID_PLACEHOLDER: &str = "Student ID";
const FALLBACK_DOCUMENT_TYPE: &str = "document";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignatureBlock {
    pub heading: String,
    pub name: String,
    pub detail: String,
}

/// Text of every region of the printed cover page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoverPagePreview {
    pub institution: String,
    pub department_line: String,
    pub title: String,
    pub course_line: String,
    pub session_line: String,
    pub submitted_to: SignatureBlock,
    pub submitted_by: SignatureBlock,
    pub submission_date_heading: String,
    pub submission_date_line: String,
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value.trim()
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Title line: the capitalized document type, followed by `on "<topic>"`
/// when the type takes a topic and one was entered. The topic is printed
/// trimmed, so stray spaces typed around it never reach the quotes.
pub fn title_for(data: &CoverPageData) -> String {
    let raw_type = data.document_type.trim();
    let doc_type = if raw_type.is_empty() {
        FALLBACK_DOCUMENT_TYPE
    } else {
        raw_type
    };
    let capitalized = capitalize(doc_type);

    let takes_topic = DocumentType::parse(doc_type)
        .map(requires_topic)
        .unwrap_or(false);
    match data.trimmed_topic() {
        Some(topic) if takes_topic => format!("{capitalized} on \"{topic}\""),
        _ => capitalized,
    }
}

pub fn render(data: &CoverPageData, institution: &str) -> CoverPagePreview {
    CoverPagePreview {
        institution: institution.to_string(),
        department_line: format!(
            "Department of {}",
            or_placeholder(&data.department, PLACEHOLDER)
        ),
        title: title_for(data),
        course_line: format!(
            "Course Code: {}",
            or_placeholder(&data.course_code, PLACEHOLDER)
        ),
        session_line: format!("Session: {}", or_placeholder(&data.session, PLACEHOLDER)),
        submitted_to: SignatureBlock {
            heading: "Submitted To".to_string(),
            name: or_placeholder(&data.teacher_name, TEACHER_NAME_PLACEHOLDER).to_string(),
            detail: or_placeholder(&data.designation, DESIGNATION_PLACEHOLDER).to_string(),
        },
        submitted_by: SignatureBlock {
            heading: "Submitted By".to_string(),
            name: or_placeholder(&data.student_name, STUDENT_NAME_PLACEHOLDER).to_string(),
            detail: format!(
                "ID: {}",
                or_placeholder(&data.student_id, STUDENT_ID_PLACEHOLDER)
            ),
        },
        submission_date_heading: "Submission Date".to_string(),
        submission_date_line: data
            .submission_date
            .map(format_display_date)
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
    }
}

/// Escape special characters for Typst strings.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\n', r"\n")
}

impl CoverPagePreview {
    /// Printable plain-text layout.
    pub fn to_plain_text(&self) -> String {
        let rule = "-".repeat(48);
        [
            self.institution.clone(),
            self.department_line.clone(),
            String::new(),
            self.title.clone(),
            self.course_line.clone(),
            self.session_line.clone(),
            String::new(),
            self.submitted_to.heading.to_uppercase(),
            self.submitted_to.name.clone(),
            self.submitted_to.detail.clone(),
            String::new(),
            self.submitted_by.heading.to_uppercase(),
            self.submitted_by.name.clone(),
            self.submitted_by.detail.clone(),
            rule,
            self.submission_date_heading.to_uppercase(),
            self.submission_date_line.clone(),
        ]
        .join("\n")
    }

    /// Typst source for an A4 page.
    pub fn to_typst(&self) -> String {
        format!(
            r#"#set page(paper: "a4", margin: 2.5cm)
#set text(size: 12pt)
#set align(center)

#text(size: 20pt, weight: "bold", "{institution}")
#v(0.2cm)
#text(size: 14pt, "{department}")

#v(1fr)
#text(size: 24pt, weight: "bold", "{title}")
#v(0.6cm)
#text(size: 14pt, "{course}")

#text(fill: gray, "{session}")
#v(1fr)

#grid(
  columns: (1fr, 1fr),
  gutter: 1cm,
  align(left)[
    #text(size: 10pt, weight: "bold", "{to_heading}")

    #text(size: 14pt, weight: "bold", "{to_name}")

    #text("{to_detail}")
  ],
  align(left)[
    #text(size: 10pt, weight: "bold", "{by_heading}")

    #text(size: 14pt, weight: "bold", "{by_name}")

    #text("{by_detail}")
  ],
)

#v(1cm)
#line(length: 100%, stroke: (dash: "dashed"))
#text(size: 10pt, weight: "bold", "{date_heading}")

#text(size: 14pt, "{date}")
"#,
            institution = escape_typst_string(&self.institution),
            department = escape_typst_string(&self.department_line),
            title = escape_typst_string(&self.title),
            course = escape_typst_string(&self.course_line),
            session = escape_typst_string(&self.session_line),
            to_heading = escape_typst_string(&self.submitted_to.heading.to_uppercase()),
            to_name = escape_typst_string(&self.submitted_to.name),
            to_detail = escape_typst_string(&self.submitted_to.detail),
            by_heading = escape_typst_string(&self.submitted_by.heading.to_uppercase()),
            by_name = escape_typst_string(&self.submitted_by.name),
            by_detail = escape_typst_string(&self.submitted_by.detail),
            date_heading = escape_typst_string(&self.submission_date_heading.to_uppercase()),
            date = escape_typst_string(&self.submission_date_line),
        )
    }
}
