//! CSV-backed catalog store.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use tracing::debug;

use super::{CATALOG_COLUMNS, CatalogError, CatalogRow, CatalogStore};

/// Catalog stored as a CSV file with a header row.
///
/// Every operation opens the file, does its work, flushes and closes it again,
/// so rows appended before a crash stay on disk.
#[derive(Debug, Clone)]
pub struct CsvCatalog {
    path: PathBuf,
}

impl CsvCatalog {
    /// Creates a store for the catalog at `path`. Nothing is touched on disk.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the catalog file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_missing_or_empty(&self) -> Result<bool, CatalogError> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() == 0),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(error) => Err(CatalogError::io("inspect", &self.path, error)),
        }
    }

    fn check_header(&self, header: &csv::StringRecord) -> Result<(), CatalogError> {
        if header.iter().eq(CATALOG_COLUMNS.iter().copied()) {
            return Ok(());
        }
        let found: Vec<String> = header.iter().map(ToString::to_string).collect();
        Err(CatalogError::schema_mismatch(&self.path, &found))
    }

    fn write_rows(&self, rows: &[CatalogRow]) -> Result<(), CatalogError> {
        let file =
            File::create(&self.path).map_err(|e| CatalogError::io("create", &self.path, e))?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer
            .write_record(CATALOG_COLUMNS)
            .map_err(|e| CatalogError::csv(&self.path, e))?;
        for row in rows {
            writer
                .serialize(row)
                .map_err(|e| CatalogError::csv(&self.path, e))?;
        }
        writer
            .flush()
            .map_err(|e| CatalogError::io("flush", &self.path, e))
    }
}

impl CatalogStore for CsvCatalog {
    fn write_header(&self) -> Result<(), CatalogError> {
        debug!(path = %self.path.display(), "Writing catalog header");
        self.write_rows(&[])
    }

    fn prepare(&self, overwrite: bool) -> Result<(), CatalogError> {
        if overwrite || self.is_missing_or_empty()? {
            return self.write_header();
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .map_err(|e| CatalogError::csv(&self.path, e))?;
        let header = reader
            .headers()
            .map_err(|e| CatalogError::csv(&self.path, e))?;
        self.check_header(header)?;
        debug!(path = %self.path.display(), "Continuing existing catalog");
        Ok(())
    }

    fn load(&self) -> Result<Vec<CatalogRow>, CatalogError> {
        if self.is_missing_or_empty()? {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .map_err(|e| CatalogError::csv(&self.path, e))?;
        let header = reader
            .headers()
            .map_err(|e| CatalogError::csv(&self.path, e))?
            .clone();
        self.check_header(&header)?;

        reader
            .deserialize::<CatalogRow>()
            .map(|row| row.map_err(|e| CatalogError::csv(&self.path, e)))
            .collect()
    }

    fn append(&self, rows: &[CatalogRow]) -> Result<(), CatalogError> {
        if rows.is_empty() {
            return Ok(());
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| CatalogError::io("append to", &self.path, e))?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        for row in rows {
            writer
                .serialize(row)
                .map_err(|e| CatalogError::csv(&self.path, e))?;
        }
        writer
            .flush()
            .map_err(|e| CatalogError::io("flush", &self.path, e))?;
        debug!(path = %self.path.display(), rows = rows.len(), "Appended catalog rows");
        Ok(())
    }

    fn save(&self, rows: &[CatalogRow]) -> Result<(), CatalogError> {
        self.write_rows(rows)?;
        debug!(path = %self.path.display(), rows = rows.len(), "Rewrote catalog");
        Ok(())
    }
}
