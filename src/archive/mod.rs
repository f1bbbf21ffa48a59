//! Archive search and metadata service contract.
//!
//! The harvest pipeline only sees the [`ArchiveService`] trait: one call to
//! list the identifiers matching a query, one call to fetch an item's
//! metadata. [`ArchiveClient`] implements it over the archive's HTTP API.
//!
//! # Example
//!
//! ```no_run
//! use iacatalog_core::archive::{ArchiveClient, ArchiveService, HttpTimeouts};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ArchiveClient::new(HttpTimeouts::default())?;
//! for identifier in client.search("Edward Pusey").await? {
//!     if let Some(record) = client.metadata(&identifier).await? {
//!         println!("{identifier}: {} files", record.files.len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod http_client;

pub use client::{ArchiveClient, DEFAULT_ARCHIVE_URL};
pub use error::ArchiveError;
pub use http_client::HttpTimeouts;

use async_trait::async_trait;

use crate::metadata::MetadataRecord;

/// Remote archive operations used by the harvest pipeline.
///
/// # Object Safety
///
/// This trait uses `async_trait` so the pipeline can hold a
/// `&dyn ArchiveService`; tests substitute in-memory implementations.
#[async_trait]
pub trait ArchiveService: Send + Sync {
    /// Lists identifiers matching `query` in service order.
    ///
    /// An empty list is a valid answer.
    async fn search(&self, query: &str) -> Result<Vec<String>, ArchiveError>;

    /// Fetches an item's metadata.
    ///
    /// Returns `Ok(None)` when the item has no metadata section.
    async fn metadata(&self, identifier: &str) -> Result<Option<MetadataRecord>, ArchiveError>;
}
