//! Query set loading.
//!
//! Merges queries given on the command line with queries read from a queries
//! file into one ordered set of query text to target directory.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::normalize::sanitize_with_placeholder;

/// A search query and the directory its files are planned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Query text sent to the search service; unique within a [`QuerySet`].
    pub text: String,
    /// Free-form target directory carried into `out_file_path`.
    pub target_directory: String,
}

impl Query {
    /// Creates a query whose directory is the sanitized query text.
    #[must_use]
    pub fn with_default_directory(text: impl Into<String>) -> Self {
        let text = text.into();
        let target_directory = default_directory(&text);
        Self {
            text,
            target_directory,
        }
    }
}

/// Directory name derived from query text; invalid characters become spaces.
#[must_use]
pub fn default_directory(text: &str) -> String {
    sanitize_with_placeholder(text, " ")
}

#[derive(Debug, Deserialize)]
struct QueryFileRow {
    query: Option<String>,
    dir_name: Option<String>,
}

/// Ordered set of queries keyed by query text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySet {
    queries: Vec<Query>,
}

impl QuerySet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the run's query set: queries file first, command-line queries
    /// merged on top so they win on identical text.
    #[must_use]
    pub fn load(direct: &[String], queries_file: Option<&Path>) -> Self {
        let mut set = queries_file.map(Self::from_file).unwrap_or_default();
        set.merge(Self::from_direct(direct));
        set
    }

    /// Builds a set from command-line query strings.
    ///
    /// One trailing comma is stripped from each query so `"A", "B"` style
    /// lists work; empty queries are ignored.
    #[must_use]
    pub fn from_direct(raw: &[String]) -> Self {
        let mut set = Self::new();
        for query in raw {
            let text = query.strip_suffix(',').unwrap_or(query.as_str());
            if text.trim().is_empty() {
                continue;
            }
            set.insert(Query::with_default_directory(text));
        }
        set
    }

    /// Reads a CSV queries file with `query` and `dir_name` columns.
    ///
    /// A missing or unparsable file contributes nothing. Rows with an empty
    /// `dir_name` use the sanitized query text as their directory.
    #[must_use]
    pub fn from_file(path: &Path) -> Self {
        match read_queries_file(path) {
            Ok(set) => {
                debug!(path = %path.display(), queries = set.len(), "Loaded queries file");
                set
            }
            Err(error) => {
                warn!(path = %path.display(), error = %error, "Queries file unavailable; ignoring it");
                Self::new()
            }
        }
    }

    /// Inserts a query; an existing query with the same text keeps its
    /// position but takes the new directory.
    pub fn insert(&mut self, query: Query) {
        if let Some(existing) = self.queries.iter_mut().find(|q| q.text == query.text) {
            existing.target_directory = query.target_directory;
        } else {
            self.queries.push(query);
        }
    }

    /// Merges `other` into this set; `other` wins on identical text.
    pub fn merge(&mut self, other: Self) {
        for query in other.queries {
            self.insert(query);
        }
    }

    /// Queries in processing order.
    pub fn iter(&self) -> impl Iterator<Item = &Query> {
        self.queries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

fn read_queries_file(path: &Path) -> Result<QuerySet, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut set = QuerySet::new();
    for row in reader.deserialize::<QueryFileRow>() {
        let row = row?;
        let Some(text) = row.query.filter(|text| !text.trim().is_empty()) else {
            continue;
        };
        let query = match row.dir_name.filter(|dir| !dir.is_empty()) {
            Some(target_directory) => Query {
                text,
                target_directory,
            },
            None => Query::with_default_directory(text),
        };
        set.insert(query);
    }
    Ok(set)
}
