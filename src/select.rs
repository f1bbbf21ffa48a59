//! File selection and output filename disambiguation.
//!
//! Every entry in an item's file list yields a [`FileOutcome`]: either a
//! catalog row for a download candidate or an inspectable skip reason. A bad
//! entry never aborts processing of the remaining entries.

use std::collections::HashSet;
use std::fmt;

use crate::catalog::CatalogRow;
use crate::metadata::FileEntry;
use crate::normalize::{MAX_FILE_NAME_LEN, NormalizedFields};

/// Which files of an item become download candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionRules {
    /// Allowed extensions; empty means every extension is allowed.
    pub extensions: Vec<String>,
    /// Base-name fragments that exclude a file (e.g. `_bw`); empty by default.
    pub excluded_suffixes: Vec<String>,
}

impl SelectionRules {
    /// Creates rules from an extension allow-list and an exclusion list.
    #[must_use]
    pub fn new(extensions: Vec<String>, excluded_suffixes: Vec<String>) -> Self {
        Self {
            extensions,
            excluded_suffixes,
        }
    }

    fn check(&self, base_name: &str, extension: &str) -> Result<(), FileSkip> {
        if let Some(suffix) = self
            .excluded_suffixes
            .iter()
            .find(|suffix| base_name.contains(suffix.as_str()))
        {
            return Err(FileSkip::ExcludedSuffix(suffix.clone()));
        }
        if !self.extensions.is_empty() && !self.extensions.iter().any(|ext| ext == extension) {
            return Err(FileSkip::ExtensionNotAllowed(extension.to_string()));
        }
        Ok(())
    }
}

/// Why a file entry produced no row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSkip {
    /// The entry has no textual `name`.
    MissingName,
    /// The name has fewer than two dot-separated segments.
    MalformedName,
    /// The name ends with a dot.
    EmptyExtension,
    /// The base name contains an excluded suffix.
    ExcludedSuffix(String),
    /// The extension is not in the allow-list.
    ExtensionNotAllowed(String),
}

impl fmt::Display for FileSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => write!(f, "file entry has no name"),
            Self::MalformedName => write!(f, "file name has no extension"),
            Self::EmptyExtension => write!(f, "file name has an empty extension"),
            Self::ExcludedSuffix(suffix) => write!(f, "base name contains excluded suffix '{suffix}'"),
            Self::ExtensionNotAllowed(ext) => write!(f, "extension '{ext}' is not selected"),
        }
    }
}

/// Result of processing one file entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file is a download candidate.
    Selected(CatalogRow),
    /// The file was skipped.
    Skipped {
        /// Entry name when one was present.
        name: Option<String>,
        reason: FileSkip,
    },
}

/// Item-level values shared by every row of one item.
#[derive(Debug, Clone, Copy)]
pub struct ItemContext<'a> {
    pub query: &'a str,
    pub identifier: &'a str,
    /// Target directory of the query.
    pub out_file_path: &'a str,
    /// Server-side storage directory of the item.
    pub in_file_path: &'a str,
    pub fields: &'a NormalizedFields,
}

/// Splits a file name into base name and extension.
///
/// The base name is the second-to-last dot-separated segment and the extension
/// the last one, so `book.djvu.txt` yields `("djvu", "txt")`.
///
/// # Errors
///
/// Returns [`FileSkip::MalformedName`] when the name has no dot and
/// [`FileSkip::EmptyExtension`] when it ends with one.
pub fn split_file_name(name: &str) -> Result<(&str, &str), FileSkip> {
    let mut segments = name.rsplit('.');
    let extension = segments.next().unwrap_or_default();
    let base_name = segments.next().ok_or(FileSkip::MalformedName)?;
    if extension.is_empty() {
        return Err(FileSkip::EmptyExtension);
    }
    Ok((base_name, extension))
}

/// Processes one file entry of an item.
///
/// `accumulated` holds the rows already selected for this item and `taken`
/// every output filename already present in the catalog. The output filename
/// is `{display_title}.{ext}` for the first file of an extension and
/// `{display_title} ({n}).{ext}` afterwards, where `n` counts this item's rows
/// with that extension and is bumped past names taken elsewhere in the
/// catalog. The display title is cut when needed so the whole name stays
/// within [`MAX_FILE_NAME_LEN`] characters.
#[must_use]
pub fn select_file(
    entry: &FileEntry,
    item: &ItemContext<'_>,
    rules: &SelectionRules,
    accumulated: &[CatalogRow],
    taken: &HashSet<String>,
) -> FileOutcome {
    let Some(name) = entry.name.as_deref() else {
        return FileOutcome::Skipped {
            name: None,
            reason: FileSkip::MissingName,
        };
    };

    let checked = split_file_name(name)
        .and_then(|(base_name, extension)| rules.check(base_name, extension).map(|()| extension));
    let extension = match checked {
        Ok(extension) => extension,
        Err(reason) => {
            return FileOutcome::Skipped {
                name: Some(name.to_string()),
                reason,
            };
        }
    };

    let out_file_name = out_file_name(&item.fields.display_title, extension, accumulated, taken);
    let fields = item.fields;
    FileOutcome::Selected(CatalogRow {
        query: item.query.to_string(),
        identifier: item.identifier.to_string(),
        title: fields.title.clone(),
        creator: fields.creator.clone(),
        year: fields.year.clone(),
        uploader: fields.uploader.clone(),
        uploader_email: fields.uploader_email.clone(),
        language: fields.language.clone(),
        in_file_path: item.in_file_path.to_string(),
        in_file_name: name.to_string(),
        out_file_path: item.out_file_path.to_string(),
        out_file_name,
    })
}

fn out_file_name(
    display_title: &str,
    extension: &str,
    accumulated: &[CatalogRow],
    taken: &HashSet<String>,
) -> String {
    let dotted = format!(".{extension}");
    let mut count = accumulated
        .iter()
        .filter(|row| row.out_file_name.ends_with(&dotted))
        .count();

    loop {
        let disambiguator = if count > 0 {
            format!(" ({count})")
        } else {
            String::new()
        };
        let reserved = disambiguator.chars().count() + dotted.chars().count();
        let stem = bounded_stem(display_title, reserved);
        let candidate = format!("{stem}{disambiguator}{dotted}");
        let in_item = accumulated.iter().any(|row| row.out_file_name == candidate);
        if !in_item && !taken.contains(&candidate) {
            return candidate;
        }
        count += 1;
    }
}

/// Cuts the display title so that, with `reserved` trailing characters, the
/// name stays within [`MAX_FILE_NAME_LEN`].
fn bounded_stem(display_title: &str, reserved: usize) -> String {
    let max = MAX_FILE_NAME_LEN.saturating_sub(reserved);
    if display_title.chars().count() <= max {
        return display_title.to_string();
    }
    let cut: String = display_title.chars().take(max).collect();
    cut.trim_end_matches([' ', ',']).to_string()
}
