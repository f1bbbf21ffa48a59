//! Run statistics for a harvest.

use super::{IdentifierOutcome, IdentifierSkip};

/// Counters collected over one harvest run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestStats {
    /// Queries processed.
    pub queries: usize,
    /// Queries whose search call failed.
    pub search_failures: usize,
    /// Identifiers returned by search, before filtering.
    pub identifiers_found: usize,
    /// Identifiers dropped because the catalog already has them or they
    /// repeat within one search result.
    pub identifiers_already_catalogued: usize,
    /// Identifiers whose metadata was requested.
    pub identifiers_scanned: usize,
    pub skipped_no_metadata: usize,
    pub skipped_empty_title: usize,
    /// Identifiers whose metadata call failed.
    pub fetch_failures: usize,
    /// Catalog rows appended.
    pub rows_written: usize,
    /// File entries that produced no row.
    pub files_skipped: usize,
}

impl HarvestStats {
    /// Folds one identifier's outcome into the counters.
    pub fn record(&mut self, outcome: &IdentifierOutcome) {
        self.identifiers_scanned += 1;
        match outcome {
            IdentifierOutcome::Catalogued {
                rows,
                files_skipped,
            } => {
                self.rows_written += rows;
                self.files_skipped += files_skipped;
            }
            IdentifierOutcome::Skipped(IdentifierSkip::NoMetadata) => self.skipped_no_metadata += 1,
            IdentifierOutcome::Skipped(IdentifierSkip::EmptyTitle) => self.skipped_empty_title += 1,
            IdentifierOutcome::Skipped(IdentifierSkip::FetchFailed(_)) => self.fetch_failures += 1,
        }
    }

    /// Identifiers that produced no rows for any reason.
    #[must_use]
    pub fn identifiers_skipped(&self) -> usize {
        self.skipped_no_metadata + self.skipped_empty_title + self.fetch_failures
    }
}
