//! Cover page form model, preview rendering and printing.
//!
//! - `model` - the form record, its validated form and field edits
//! - `validation` - schema rules and collected field errors
//! - `state` - observable holder the UI reads from
//! - `preview` - pure record-to-page text projection
//! - `print` - PDF export through the Typst CLI

pub mod dates;
pub mod model;
pub mod preview;
pub mod print;
pub mod state;
pub mod validation;

pub use model::{CoverPage, CoverPageData, Department, DocumentType, Field, FieldUpdate};
pub use preview::{render, CoverPagePreview};
pub use print::{PrintError, PrintedDocument, TypstPrinter};
pub use state::FormState;
pub use validation::{validate, validate_on, ValidationError, ValidationErrors};
