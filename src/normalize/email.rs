//! Uploader address extraction from display-name address strings.

use std::sync::LazyLock;

use regex::Regex;

/// Address enclosed in angle brackets, as in `Jane Doe <jane@example.org>`.
#[allow(clippy::expect_used)]
static ANGLE_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<\s*([^<>\s]*)\s*>").expect("angle address regex is valid")); // Static pattern, safe to panic

/// Bare `local@domain` token.
#[allow(clippy::expect_used)]
static BARE_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[^\s<>()",;:@]+@[^\s<>()",;:@]+"#).expect("bare address regex is valid") // Static pattern, safe to panic
});

/// Returns the bare address part of an uploader string.
///
/// Accepts `Display Name <addr@host>`, `"Quoted, Name" <addr@host>`,
/// `addr@host (comment)` and a plain `addr@host`. Returns an empty string when
/// no address can be found.
#[must_use]
pub fn uploader_email(uploader: &str) -> String {
    if let Some(captures) = ANGLE_ADDRESS.captures(uploader)
        && let Some(address) = captures.get(1)
    {
        return address.as_str().to_string();
    }

    BARE_ADDRESS
        .find(uploader)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
