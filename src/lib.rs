//! Archive Catalog Core Library
//!
//! This library provides the core functionality for the iacatalog tool,
//! which turns a set of search queries against a remote digital archive into
//! a download-planning catalog: one row per candidate file, with a clean
//! human-readable output filename per item.
//!
//! # Architecture
//!
//! The library is organized into the following modules, in pipeline order:
//! - [`query`] - Query set loading and merging
//! - [`archive`] - Search and metadata service contract plus HTTP client
//! - [`metadata`] - Item metadata record model
//! - [`normalize`] - Field normalization and display-title synthesis
//! - [`select`] - File selection and output filename disambiguation
//! - [`catalog`] - Catalog rows, CSV storage, and the bounded row buffer
//! - [`harvest`] - Pipeline driver tying the stages together

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod archive;
pub mod catalog;
pub mod harvest;
pub mod metadata;
pub mod normalize;
pub mod query;
pub mod select;
mod user_agent;

// Re-export commonly used types
pub use archive::{ArchiveClient, ArchiveError, ArchiveService, DEFAULT_ARCHIVE_URL, HttpTimeouts};
pub use catalog::{CATALOG_COLUMNS, CatalogError, CatalogRow, CatalogStore, CsvCatalog, RowBuffer};
pub use harvest::{HarvestStats, Harvester, IdentifierOutcome, IdentifierSkip};
pub use metadata::{FieldValue, FileEntry, MetadataRecord};
pub use normalize::{NormalizedFields, iso_639_2, normalize_record, sanitize_file_name};
pub use query::{Query, QuerySet};
pub use select::{FileOutcome, FileSkip, SelectionRules};
