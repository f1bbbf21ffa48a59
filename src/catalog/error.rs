//! Error types for catalog storage.
//!
//! Follows the What/Why/Suggestion message pattern used across the project.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while reading or writing the catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Filesystem failure opening, creating or flushing the catalog.
    #[error("cannot {action} catalog '{}': {source}\n  Suggestion: Check that the file is not open in another program and the directory is writable", path.display())]
    Io {
        /// What was being attempted (e.g. "create", "append to").
        action: &'static str,
        /// Catalog path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV layer failed to read or write a record.
    #[error("malformed catalog '{}': {source}\n  Suggestion: Repair the file or rerun with --overwrite to start a fresh catalog", path.display())]
    Csv {
        /// Catalog path.
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The existing file does not carry the catalog column schema.
    #[error("catalog '{}' has unexpected columns [{found}]\n  Suggestion: Point --output at a catalog file or rerun with --overwrite", path.display())]
    SchemaMismatch {
        /// Catalog path.
        path: PathBuf,
        /// Header found in the file, comma-joined.
        found: String,
    },
}

impl CatalogError {
    /// Creates an `Io` error.
    #[must_use]
    pub fn io(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Creates a `Csv` error.
    #[must_use]
    pub fn csv(path: &Path, source: csv::Error) -> Self {
        Self::Csv {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Creates a `SchemaMismatch` error.
    #[must_use]
    pub fn schema_mismatch(path: &Path, found: &[String]) -> Self {
        Self::SchemaMismatch {
            path: path.to_path_buf(),
            found: found.join(","),
        }
    }
}
