//! Language name to ISO 639-2 code mapping.

use crate::metadata::FieldValue;

/// Full language names (as the archive spells them) and their ISO 639-2 codes.
///
/// Greek, Armenian and French use the bibliographic (B) codes; Georgian and
/// German use the terminologic (T) codes, matching what the catalog has
/// always carried.
const LANGUAGE_CODES: &[(&str, &str)] = &[
    ("Russian", "rus"),
    ("Greek", "gre"),
    ("Greek, Ancient", "grc"),
    ("Ancient Greek", "grc"),
    ("Latin", "lat"),
    ("Slavic languages", "sla"),
    ("Church Slavic", "chu"),
    ("Georgian", "kat"),
    ("Bulgarian", "bul"),
    ("Armenian", "arm"),
    ("Serbian", "srp"),
    ("English", "eng"),
    ("German", "deu"),
    ("Spanish", "spa"),
    ("Italian", "ita"),
    ("Portuguese", "por"),
    ("French", "fre"),
];

/// Maps a language name to its three-letter ISO 639-2 code.
///
/// A value that is already one of the known codes passes through unchanged.
/// Anything else maps to an empty string.
#[must_use]
pub fn iso_639_2(language: &str) -> String {
    if LANGUAGE_CODES.iter().any(|(_, code)| *code == language) {
        return language.to_string();
    }
    LANGUAGE_CODES
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, code)| (*code).to_string())
        .unwrap_or_default()
}

/// Maps a raw metadata language value to its ISO 639-2 code.
///
/// List values are coded by their first element.
#[must_use]
pub fn language_code(language: Option<&FieldValue>) -> String {
    language
        .and_then(FieldValue::first)
        .map(iso_639_2)
        .unwrap_or_default()
}
