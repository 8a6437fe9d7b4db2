//! Date helpers for the cover page.
//!
//! Two fixed formats are used: the display form printed on the page
//! ("15th March, 2024") and the locale-stable transmission form sent to the
//! validation service ("2024-03-15").

use chrono::{Datelike, NaiveDate};

const TRANSMISSION_FORMAT: &str = "%Y-%m-%d";

/// Earliest submission date the form accepts.
pub fn earliest_submission_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// English ordinal suffix for a day of month.
pub fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Format a date for display, e.g. "15th March, 2024".
pub fn format_display_date(date: NaiveDate) -> String {
    let day = date.day();
    format!("{day}{} {}", ordinal_suffix(day), date.format("%B, %Y"))
}

/// Format a date for transmission, e.g. "2024-03-15".
pub fn format_transmission_date(date: NaiveDate) -> String {
    date.format(TRANSMISSION_FORMAT).to_string()
}

pub fn parse_transmission_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), TRANSMISSION_FORMAT).ok()
}
