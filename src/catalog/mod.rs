//! Catalog rows and their persistence.
//!
//! The catalog is the tool's only durable output: an ordered sequence of
//! [`CatalogRow`] with the fixed column order of [`CATALOG_COLUMNS`].
//!
//! # Architecture
//!
//! - [`CatalogStore`] - storage contract (header, load, append, rewrite)
//! - [`CsvCatalog`] - CSV implementation that opens and closes the file per operation
//! - [`RowBuffer`] - bounded in-memory buffer holding one item's rows until flushed
//!
//! Every append happens as soon as an item's files are processed, and the
//! whole file is rewritten in sorted order once per query. That rewrite is
//! O(total rows) per query, which only stays cheap while the number of
//! queries is small compared to the number of rows.

mod buffer;
mod csv_store;
mod error;

pub use buffer::RowBuffer;
pub use csv_store::CsvCatalog;
pub use error::CatalogError;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Column order of the catalog file.
pub const CATALOG_COLUMNS: [&str; 12] = [
    "query",
    "identifier",
    "title",
    "creator",
    "year",
    "uploader",
    "uploader_email",
    "language",
    "in_file_path",
    "in_file_name",
    "out_file_path",
    "out_file_name",
];

/// One planned download: a selected file of an archived item.
///
/// Field order matches [`CATALOG_COLUMNS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub query: String,
    pub identifier: String,
    pub title: String,
    pub creator: String,
    pub year: String,
    pub uploader: String,
    pub uploader_email: String,
    pub language: String,
    pub in_file_path: String,
    pub in_file_name: String,
    pub out_file_path: String,
    pub out_file_name: String,
}

/// Storage contract for the catalog file.
///
/// Implementations must not hold the file open between calls.
pub trait CatalogStore {
    /// Truncates the catalog and writes the header row.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the file cannot be written.
    fn write_header(&self) -> Result<(), CatalogError>;

    /// Prepares the catalog for a run.
    ///
    /// With `overwrite` the catalog is always reset. Otherwise an existing
    /// catalog is kept, and a missing or empty one gets its header.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the file cannot be written or an existing
    /// file has a different column schema.
    fn prepare(&self, overwrite: bool) -> Result<(), CatalogError>;

    /// Loads every row in file order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the file cannot be read or parsed.
    fn load(&self) -> Result<Vec<CatalogRow>, CatalogError>;

    /// Appends rows after the existing ones without rewriting the header.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the file cannot be written.
    fn append(&self, rows: &[CatalogRow]) -> Result<(), CatalogError>;

    /// Replaces the whole catalog with `rows` (header included).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the file cannot be written.
    fn save(&self, rows: &[CatalogRow]) -> Result<(), CatalogError>;

    /// Identifiers already present in the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the catalog cannot be loaded.
    fn identifiers(&self) -> Result<HashSet<String>, CatalogError> {
        Ok(self
            .load()?
            .into_iter()
            .map(|row| row.identifier)
            .collect())
    }

    /// Reloads the catalog, sorts it by `(query, out_file_name)` and rewrites it.
    ///
    /// Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the catalog cannot be read or rewritten.
    fn sort(&self) -> Result<usize, CatalogError> {
        let mut rows = self.load()?;
        sort_rows(&mut rows);
        self.save(&rows)?;
        Ok(rows.len())
    }
}

/// Stable sort by `(query, out_file_name)` ascending.
pub fn sort_rows(rows: &mut [CatalogRow]) {
    rows.sort_by(|a, b| {
        a.query
            .cmp(&b.query)
            .then_with(|| a.out_file_name.cmp(&b.out_file_name))
    });
}
