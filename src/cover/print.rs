//! Print/export through the host Typst compiler.
//!
//! The preview is written as Typst source into a temporary directory and the
//! `typst` CLI turns it into a PDF. No document format is produced in-process.

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

use super::preview::CoverPagePreview;

const SOURCE_FILE: &str = "cover.typ";
const OUTPUT_FILE: &str = "cover.pdf";

#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteTypst(#[source] std::io::Error),
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {0}")]
    TypstExit(i32),
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
}

/// A compiled cover page.
#[derive(Debug)]
pub struct PrintedDocument {
    pub filename: String,
    pub pdf: Vec<u8>,
}

/// Sanitize a string for use in filenames.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let mut result = String::new();
    let mut last_dash = false;

    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || ch == '-' || ch == '_') && !last_dash && !result.is_empty() {
            result.push('-');
            last_dash = true;
        }
    }

    let trimmed = result.trim_matches('-');
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Download name for a student's cover page, e.g. "cover-ada-lovelace.pdf".
pub fn output_filename(student_name: &str) -> String {
    format!("cover-{}.pdf", sanitize_filename(student_name, "page"))
}

/// Compiles previews with a configurable `typst` binary.
#[derive(Debug, Clone)]
pub struct TypstPrinter {
    binary: PathBuf,
}

impl TypstPrinter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Render the preview to a PDF. `student_name` only picks the filename.
    pub fn print(
        &self,
        preview: &CoverPagePreview,
        student_name: &str,
    ) -> Result<PrintedDocument, PrintError> {
        let temp_dir = tempdir().map_err(PrintError::TempDir)?;
        let source_path = temp_dir.path().join(SOURCE_FILE);
        let output_path = temp_dir.path().join(OUTPUT_FILE);

        fs::write(&source_path, preview.to_typst()).map_err(PrintError::WriteTypst)?;

        log::debug!(
            "compiling cover page with {} in {}",
            self.binary.display(),
            temp_dir.path().display()
        );
        let status = Command::new(&self.binary)
            .arg("compile")
            .arg(&source_path)
            .arg(&output_path)
            .current_dir(temp_dir.path())
            .status()
            .map_err(PrintError::TypstIo)?;

        if !status.success() {
            return Err(PrintError::TypstExit(status.code().unwrap_or(-1)));
        }

        let pdf = fs::read(&output_path).map_err(PrintError::ReadPdf)?;
        Ok(PrintedDocument {
            filename: output_filename(student_name),
            pdf,
        })
    }
}

impl Default for TypstPrinter {
    fn default() -> Self {
        Self::new("typst")
    }
}
