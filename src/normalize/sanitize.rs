//! Filesystem-safety sanitizer for free text destined for filenames.

use std::sync::LazyLock;

use regex::Regex;

/// Characters removed from any text that ends up in a filename or directory name.
pub const INVALID_FILE_NAME_CHARS: [char; 16] = [
    '<', '>', '^', ':', ';', '"', '/', '\\', '|', '?', '*', '+', '@', '#', '$', '.',
];

/// Matches runs of two or more spaces.
#[allow(clippy::expect_used)]
static SPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(" {2,}").expect("space run regex is valid")); // Static pattern, safe to panic

/// Sanitizes text for use in a filename, dropping invalid characters entirely.
///
/// See [`sanitize_with_placeholder`] for the full rule set.
#[must_use]
pub fn sanitize_file_name(value: &str) -> String {
    sanitize_with_placeholder(value, "")
}

/// Sanitizes text for use in a filename.
///
/// Every character in [`INVALID_FILE_NAME_CHARS`] is replaced with
/// `placeholder`, leading and trailing spaces are stripped, and interior runs
/// of spaces collapse to a single space. Input is already valid UTF-8, so any
/// non-ASCII text passes through untouched and the function never fails.
#[must_use]
pub fn sanitize_with_placeholder(value: &str, placeholder: &str) -> String {
    let mut replaced = String::with_capacity(value.len());
    for ch in value.chars() {
        if INVALID_FILE_NAME_CHARS.contains(&ch) {
            replaced.push_str(placeholder);
        } else {
            replaced.push(ch);
        }
    }

    let trimmed = replaced.trim_matches(' ');
    SPACE_RUN.replace_all(trimmed, " ").into_owned()
}
