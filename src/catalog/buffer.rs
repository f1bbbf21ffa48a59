//! Bounded row buffer between file selection and catalog storage.

use super::{CatalogError, CatalogRow, CatalogStore};

/// Holds the rows of the item currently being processed.
///
/// Rows are collected with [`RowBuffer::append`] and written in one batch by
/// [`RowBuffer::flush`], which empties the buffer. Memory use is bounded by one
/// item's file list no matter how large the catalog grows.
#[derive(Debug, Default)]
pub struct RowBuffer {
    rows: Vec<CatalogRow>,
}

impl RowBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a row.
    pub fn append(&mut self, row: CatalogRow) {
        self.rows.push(row);
    }

    /// Rows buffered since the last flush.
    #[must_use]
    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends buffered rows to `store` and clears the buffer.
    ///
    /// An empty buffer touches nothing. Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the store rejects the batch; the rows
    /// stay buffered in that case.
    pub fn flush(&mut self, store: &dyn CatalogStore) -> Result<usize, CatalogError> {
        if self.rows.is_empty() {
            return Ok(0);
        }
        store.append(&self.rows)?;
        let written = self.rows.len();
        self.rows.clear();
        Ok(written)
    }
}
