//! Field normalization and display-title synthesis.
//!
//! Turns a raw [`MetadataRecord`] into the text fields of a catalog row and a
//! length-bounded, filesystem-safe display title used as the output filename
//! stem.
//!
//! # Display title
//!
//! Built from the sanitized title, authors and year:
//! - all three: `Title, Authors (Year)`
//! - title and year: `Title, (Year)`
//! - title and authors: `Title, Authors`
//! - title only: `Title`

mod email;
mod language;
mod sanitize;

pub use email::uploader_email;
pub use language::{iso_639_2, language_code};
pub use sanitize::{INVALID_FILE_NAME_CHARS, sanitize_file_name, sanitize_with_placeholder};

use crate::metadata::{FieldValue, MetadataRecord};

/// Total filename budget in characters.
pub const MAX_FILE_NAME_LEN: usize = 127;

/// Characters reserved for display-title punctuation.
pub const PUNCTUATION_RESERVE: usize = 6;

/// Characters reserved for the disambiguator and extension.
pub const SUFFIX_RESERVE: usize = 7;

/// Normalized text fields of one item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedFields {
    /// Raw title text as stored in the catalog.
    pub title: String,
    /// Raw creator text as stored in the catalog.
    pub creator: String,
    /// Raw year text as stored in the catalog.
    pub year: String,
    pub uploader: String,
    pub uploader_email: String,
    /// ISO 639-2 code, or empty when unknown.
    pub language: String,
    /// Sanitized author surnames joined with `", "`, capped by [`fit_authors`].
    pub authors: String,
    /// Filename stem synthesized from title, authors and year.
    pub display_title: String,
}

/// Normalizes a metadata record.
///
/// Returns `None` when the record has no title, in which case the item
/// produces no catalog rows.
#[must_use]
pub fn normalize_record(record: &MetadataRecord) -> Option<NormalizedFields> {
    let raw_title = record.title.as_ref().map(FieldValue::display)?;
    if raw_title.is_empty() {
        return None;
    }

    let year = year(record.year.as_ref());
    let authors = fit_authors(&authors(record.creator.as_ref()), &year);
    let title_text = record
        .title
        .as_ref()
        .and_then(FieldValue::first)
        .unwrap_or_default();
    let title = truncate_title(&sanitize_file_name(title_text), &authors, &year);
    let display_title = display_title(&title, &authors, &year);

    let uploader = display_or_empty(record.uploader.as_ref());
    let uploader_email = uploader_email(&uploader);

    Some(NormalizedFields {
        title: raw_title,
        creator: display_or_empty(record.creator.as_ref()),
        year: display_or_empty(record.year.as_ref()),
        uploader_email,
        uploader,
        language: language_code(record.language.as_ref()),
        authors,
        display_title,
    })
}

fn display_or_empty(value: Option<&FieldValue>) -> String {
    value.map(FieldValue::display).unwrap_or_default()
}

/// Derives the sanitized author string from a creator value.
///
/// Each creator contributes the text before its first comma, so
/// `["Smith, J.", "Doe, A."]` becomes `Smith, Doe`.
#[must_use]
pub fn authors(creator: Option<&FieldValue>) -> String {
    let Some(creator) = creator else {
        return String::new();
    };
    let surnames: Vec<&str> = creator
        .values()
        .into_iter()
        .map(|name| name.split(',').next().unwrap_or_default())
        .collect();
    sanitize_file_name(&surnames.join(", "))
}

/// Derives the sanitized year; list values use their last element.
#[must_use]
pub fn year(year: Option<&FieldValue>) -> String {
    year.and_then(FieldValue::last)
        .map(sanitize_file_name)
        .unwrap_or_default()
}

/// Characters shared by title and authors once the year is accounted for.
fn title_and_authors_budget(year: &str) -> usize {
    (MAX_FILE_NAME_LEN - PUNCTUATION_RESERVE - SUFFIX_RESERVE).saturating_sub(year.chars().count())
}

fn truncate_chars(value: &str, max: usize) -> String {
    let truncated: String = value.chars().take(max).collect();
    truncated.trim_matches(' ').to_string()
}

/// Caps the author string at half of the space left after the year, so a
/// long creator list never crowds out the title.
///
/// Whole surnames are dropped from the end; a first surname that alone is too
/// long is cut.
#[must_use]
pub fn fit_authors(authors: &str, year: &str) -> String {
    let budget = title_and_authors_budget(year) / 2;
    if authors.chars().count() <= budget {
        return authors.to_string();
    }

    let mut kept = String::new();
    let mut kept_len = 0;
    for surname in authors.split(", ") {
        let separator = if kept.is_empty() { 0 } else { 2 };
        let surname_len = surname.chars().count();
        if kept_len + separator + surname_len > budget {
            break;
        }
        if separator > 0 {
            kept.push_str(", ");
        }
        kept.push_str(surname);
        kept_len += separator + surname_len;
    }

    if kept.is_empty() {
        let first = authors.split(", ").next().unwrap_or_default();
        return truncate_chars(first, budget);
    }
    kept
}

/// Truncates an already sanitized title so the whole display title fits the
/// filename budget.
///
/// The allowed length is `127 - 6 - 7 - len(authors) - len(year)` characters,
/// saturating at zero.
#[must_use]
pub fn truncate_title(title: &str, authors: &str, year: &str) -> String {
    let budget = title_and_authors_budget(year).saturating_sub(authors.chars().count());
    if title.chars().count() <= budget {
        return title.to_string();
    }
    truncate_chars(title, budget)
}

/// Assembles the display title from sanitized parts.
///
/// An empty part drops its punctuation too, so the result never starts with
/// `", "`.
#[must_use]
pub fn display_title(title: &str, authors: &str, year: &str) -> String {
    let credit = match (authors.is_empty(), year.is_empty()) {
        (false, false) => format!("{authors} ({year})"),
        (true, false) => format!("({year})"),
        (false, true) => authors.to_string(),
        (true, true) => String::new(),
    };
    match (title.is_empty(), credit.is_empty()) {
        (_, true) => title.to_string(),
        (true, false) => credit,
        (false, false) => format!("{title}, {credit}"),
    }
}
