//! CLI entry point for the archive catalog builder.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use iacatalog_core::{
    ArchiveClient, CsvCatalog, DEFAULT_ARCHIVE_URL, HarvestStats, Harvester, HttpTimeouts,
    QuerySet, SelectionRules,
};
use tracing::{debug, info};

mod app_config;
mod cli;
mod terminal;

use app_config::FileConfig;
use cli::{Args, DEFAULT_CATALOG_FILE, split_extensions, split_list};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    let loaded = app_config::load_default_file_config()?;
    let config = loaded.config.clone().unwrap_or_default();

    let no_color = terminal::should_disable_color(
        args.no_color,
        terminal::no_color_env_requested(),
        terminal::is_dumb_terminal(),
    );
    terminal::init_tracing(
        terminal::default_log_level(args.quiet, args.verbose, config.verbosity),
        no_color,
    );

    debug!(?args, "CLI arguments parsed");
    if let (Some(path), Some(_)) = (&loaded.path, &loaded.config) {
        debug!(path = %path.display(), "Loaded config file");
    }

    let Some(search) = args.search.as_deref() else {
        Args::command().print_help()?;
        println!();
        return Ok(());
    };

    let input = args.input.clone().or_else(|| config.input.clone());
    let queries = QuerySet::load(search, input.as_deref());
    if queries.is_empty() {
        info!("No queries given. Pass queries after --search or a queries file with --input.");
        return Ok(());
    }

    let output = args
        .output
        .clone()
        .or_else(|| config.output.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_FILE));
    let client = archive_client(&args, &config)?;
    let catalog = CsvCatalog::new(output.clone());
    let rules = selection_rules(&args, &config);

    info!(
        queries = queries.len(),
        catalog = %output.display(),
        archive = client.base_url(),
        "Catalog run starting"
    );

    let stats = Harvester::new(&client, &catalog, rules)
        .overwrite(args.overwrite)
        .run(&queries)
        .await
        .with_context(|| format!("Catalog run failed writing '{}'", output.display()))?;

    log_summary(&stats);
    Ok(())
}

fn archive_client(args: &Args, config: &FileConfig) -> Result<ArchiveClient> {
    let defaults = HttpTimeouts::default();
    let timeouts = HttpTimeouts {
        connect_secs: config.connect_timeout_secs.unwrap_or(defaults.connect_secs),
        read_secs: config.read_timeout_secs.unwrap_or(defaults.read_secs),
    };
    let base_url = args
        .archive_url
        .as_deref()
        .or(config.archive_url.as_deref())
        .unwrap_or(DEFAULT_ARCHIVE_URL);
    ArchiveClient::with_base_url(base_url, timeouts).context("Failed to create archive client")
}

fn selection_rules(args: &Args, config: &FileConfig) -> SelectionRules {
    let extensions = if args.types.is_empty() {
        config
            .types
            .as_deref()
            .map(|types| split_extensions(&[types]))
            .unwrap_or_default()
    } else {
        split_extensions(&args.types)
    };
    let excluded_suffixes = if args.exclude_suffixes.is_empty() {
        config
            .exclude_suffixes
            .as_deref()
            .map(|suffixes| split_list(&[suffixes]))
            .unwrap_or_default()
    } else {
        args.exclude_suffixes.clone()
    };
    debug!(?extensions, ?excluded_suffixes, "File selection rules");
    SelectionRules::new(extensions, excluded_suffixes)
}

fn log_summary(stats: &HarvestStats) {
    info!(
        queries = stats.queries,
        search_failures = stats.search_failures,
        identifiers_found = stats.identifiers_found,
        already_catalogued = stats.identifiers_already_catalogued,
        scanned = stats.identifiers_scanned,
        "Search summary"
    );
    info!(
        no_metadata = stats.skipped_no_metadata,
        empty_title = stats.skipped_empty_title,
        fetch_failures = stats.fetch_failures,
        "Identifiers skipped: {}",
        stats.identifiers_skipped()
    );
    info!(
        rows = stats.rows_written,
        files_skipped = stats.files_skipped,
        "Catalog complete"
    );
}
