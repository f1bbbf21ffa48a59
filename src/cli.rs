//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Queries file used when `--input` is given without a value.
pub const DEFAULT_QUERIES_FILE: &str = "query.csv";

/// Catalog file used when `--output` is absent or given without a value.
pub const DEFAULT_CATALOG_FILE: &str = "download.csv";

/// Build a download catalog from archive.org searches.
///
/// Each query is searched, every matching item's metadata is fetched, and one
/// catalog row is written per selected file with a readable output name.
/// Nothing is downloaded.
#[derive(Parser, Debug)]
#[command(name = "iacatalog")]
#[command(author, version, about)]
pub struct Args {
    /// Search mode: queries to run (one trailing comma per query is ignored)
    #[arg(short, long, num_args = 0.., value_name = "QUERY")]
    pub search: Option<Vec<String>>,

    /// CSV queries file with `query` and `dir_name` columns
    #[arg(
        short,
        long,
        num_args = 0..=1,
        default_missing_value = DEFAULT_QUERIES_FILE,
        value_name = "FILE"
    )]
    pub input: Option<PathBuf>,

    /// Catalog file to write [default: download.csv]
    #[arg(
        short,
        long,
        num_args = 0..=1,
        default_missing_value = DEFAULT_CATALOG_FILE,
        value_name = "FILE"
    )]
    pub output: Option<PathBuf>,

    /// File extensions to keep, separated by spaces or commas (default: all)
    #[arg(short, long, num_args = 1.., value_name = "EXT")]
    pub types: Vec<String>,

    /// Skip files whose base name contains this suffix (repeatable)
    #[arg(short = 'x', long = "exclude-suffix", value_name = "SUFFIX")]
    pub exclude_suffixes: Vec<String>,

    /// Start a fresh catalog instead of extending the existing one
    #[arg(long)]
    pub overwrite: bool,

    /// Archive API base URL
    #[arg(long, value_name = "URL")]
    pub archive_url: Option<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored log output
    #[arg(long)]
    pub no_color: bool,
}

/// Splits values that may each hold several entries separated by spaces or
/// commas, dropping empty entries.
#[must_use]
pub fn split_list<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.as_ref().split([' ', ',']))
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Like [`split_list`], with one leading dot removed from each extension.
#[must_use]
pub fn split_extensions<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    split_list(values)
        .into_iter()
        .map(|ext| ext.strip_prefix('.').map(ToString::to_string).unwrap_or(ext))
        .filter(|ext| !ext.is_empty())
        .collect()
}
