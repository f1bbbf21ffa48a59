//! Harvest pipeline: queries in, catalog rows out.
//!
//! For each query, in order:
//! 1. search the archive and drop identifiers the catalog already holds
//! 2. fetch each remaining identifier's metadata
//! 3. normalize fields and synthesize the display title
//! 4. select files and buffer one row per candidate
//! 5. append the item's rows to the catalog
//!
//! After each query the catalog is re-sorted by `(query, out_file_name)`.
//! The harvester keeps every output filename of the catalog in memory for the
//! whole run to keep names unique across items; pending rows are bounded by
//! one item.
//! Everything runs sequentially; each service call is awaited before the next
//! one starts.

mod stats;

pub use stats::HarvestStats;

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::archive::{ArchiveError, ArchiveService};
use crate::catalog::{CatalogError, CatalogStore, RowBuffer};
use crate::normalize::normalize_record;
use crate::query::{Query, QuerySet};
use crate::select::{FileOutcome, ItemContext, SelectionRules, select_file};

/// Why an identifier produced no rows.
#[derive(Debug, Clone)]
pub enum IdentifierSkip {
    /// The metadata response has no `metadata` section.
    NoMetadata,
    /// The metadata has no title.
    EmptyTitle,
    /// The metadata call failed.
    FetchFailed(ArchiveError),
}

/// Result of processing one identifier.
#[derive(Debug, Clone)]
pub enum IdentifierOutcome {
    /// Rows were appended for the item (possibly zero if no file qualified).
    Catalogued {
        rows: usize,
        files_skipped: usize,
    },
    Skipped(IdentifierSkip),
}

/// Position of the current identifier within the run, for progress logging.
#[derive(Debug, Clone, Copy)]
struct Progress {
    query_index: usize,
    query_count: usize,
    item_index: usize,
    item_count: usize,
}

/// Drives the pipeline against a service and a catalog store.
pub struct Harvester<'a> {
    service: &'a dyn ArchiveService,
    store: &'a dyn CatalogStore,
    rules: SelectionRules,
    overwrite: bool,
    buffer: RowBuffer,
    taken_names: HashSet<String>,
}

impl<'a> Harvester<'a> {
    /// Creates a harvester that extends an existing catalog.
    #[must_use]
    pub fn new(
        service: &'a dyn ArchiveService,
        store: &'a dyn CatalogStore,
        rules: SelectionRules,
    ) -> Self {
        Self {
            service,
            store,
            rules,
            overwrite: false,
            buffer: RowBuffer::new(),
            taken_names: HashSet::new(),
        }
    }

    /// Starts from an empty catalog instead of extending the existing one.
    #[must_use]
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Runs every query and returns the run statistics.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the catalog cannot be read or written.
    /// Rows appended before the failure stay in the catalog.
    pub async fn run(&mut self, queries: &QuerySet) -> Result<HarvestStats, CatalogError> {
        self.store.prepare(self.overwrite)?;
        self.taken_names = self
            .store
            .load()?
            .into_iter()
            .map(|row| row.out_file_name)
            .collect();

        let mut stats = HarvestStats::default();
        let query_count = queries.len();
        for (index, query) in queries.iter().enumerate() {
            self.run_query(query, index, query_count, &mut stats).await?;
            let total = self.store.sort()?;
            debug!(query = %query.text, rows = total, "Catalog sorted");
            stats.queries += 1;
        }
        Ok(stats)
    }

    async fn run_query(
        &mut self,
        query: &Query,
        query_index: usize,
        query_count: usize,
        stats: &mut HarvestStats,
    ) -> Result<(), CatalogError> {
        let found = match self.service.search(&query.text).await {
            Ok(found) => found,
            Err(error) => {
                warn!(query = %query.text, error = %error, "Search failed; skipping query");
                stats.search_failures += 1;
                return Ok(());
            }
        };
        let found_count = found.len();
        stats.identifiers_found += found_count;

        let identifiers = self.resolve(found)?;
        stats.identifiers_already_catalogued += found_count - identifiers.len();
        info!(
            query = %query.text,
            identifiers = identifiers.len(),
            "[{}/{}] Resolved query",
            query_index + 1,
            query_count
        );

        let item_count = identifiers.len();
        for (item_index, identifier) in identifiers.iter().enumerate() {
            let progress = Progress {
                query_index,
                query_count,
                item_index,
                item_count,
            };
            let outcome = self.process_identifier(query, identifier, progress).await?;
            if let IdentifierOutcome::Skipped(reason) = &outcome {
                debug!(identifier = %identifier, ?reason, "Identifier produced no rows");
            }
            stats.record(&outcome);
        }
        Ok(())
    }

    /// Drops identifiers already in the catalog and repeats within `found`,
    /// keeping service order.
    fn resolve(&self, found: Vec<String>) -> Result<Vec<String>, CatalogError> {
        let catalogued = self.store.identifiers()?;
        let mut seen = HashSet::new();
        Ok(found
            .into_iter()
            .filter(|identifier| !catalogued.contains(identifier))
            .filter(|identifier| seen.insert(identifier.clone()))
            .collect())
    }

    async fn process_identifier(
        &mut self,
        query: &Query,
        identifier: &str,
        progress: Progress,
    ) -> Result<IdentifierOutcome, CatalogError> {
        let record = match self.service.metadata(identifier).await {
            Ok(Some(record)) => record,
            Ok(None) => return Ok(IdentifierOutcome::Skipped(IdentifierSkip::NoMetadata)),
            Err(error) => {
                warn!(identifier, error = %error, "Metadata fetch failed; skipping identifier");
                return Ok(IdentifierOutcome::Skipped(IdentifierSkip::FetchFailed(error)));
            }
        };

        let Some(fields) = normalize_record(&record) else {
            return Ok(IdentifierOutcome::Skipped(IdentifierSkip::EmptyTitle));
        };

        let item = ItemContext {
            query: &query.text,
            identifier,
            out_file_path: &query.target_directory,
            in_file_path: record.storage_dir.as_deref().unwrap_or_default(),
            fields: &fields,
        };

        let mut files_skipped = 0;
        for entry in &record.files {
            match select_file(entry, &item, &self.rules, self.buffer.rows(), &self.taken_names) {
                FileOutcome::Selected(row) => {
                    info!(
                        "[{}/{}] {} [{}/{}] {}",
                        progress.query_index + 1,
                        progress.query_count,
                        query.text,
                        progress.item_index + 1,
                        progress.item_count,
                        row.out_file_name
                    );
                    self.taken_names.insert(row.out_file_name.clone());
                    self.buffer.append(row);
                }
                FileOutcome::Skipped { name, reason } => {
                    debug!(identifier, file = ?name, %reason, "File skipped");
                    files_skipped += 1;
                }
            }
        }

        let rows = self.buffer.flush(self.store)?;
        Ok(IdentifierOutcome::Catalogued {
            rows,
            files_skipped,
        })
    }
}
