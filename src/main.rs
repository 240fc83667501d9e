//! Paged-Aggregator main entry point
//!
//! This is the command-line interface for the paginated article aggregator.

use anyhow::{bail, Context};
use clap::Parser;
use paged_aggregator::config::{load_config_with_hash, Config, SourceConfig};
use paged_aggregator::output::{print_statistics, JsonLinesWriter};
use paged_aggregator::url::normalize_address;
use paged_aggregator::{AggregatorError, HttpFetcher, SelectorSource, Traversal};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Paged-Aggregator: collects articles from paginated listing pages
///
/// Every configured source is traversed page by page; each extracted
/// article is written to stdout as one JSON object per line.
#[derive(Parser, Debug)]
#[command(name = "paged-aggregator")]
#[command(version)]
#[command(about = "Paginated article listing aggregator", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Only aggregate the named source (repeatable)
    #[arg(short, long = "source", value_name = "NAME")]
    sources: Vec<String>,

    /// Follow next-page links until the listing is exhausted
    #[arg(short, long)]
    all: bool,

    /// Start address overriding the source's default (one source only)
    #[arg(long, value_name = "URL")]
    start: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and report selector problems without fetching
    #[arg(long, conflicts_with = "list_sources")]
    dry_run: bool,

    /// List configured sources and exit
    #[arg(long, conflicts_with = "dry_run")]
    list_sources: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.list_sources {
        handle_list_sources(&config);
        return Ok(());
    }

    let selected = select_sources(&config, &cli.sources)?;

    if let Some(start) = &cli.start {
        if selected.len() != 1 {
            bail!(
                "--start requires exactly one source, {} selected",
                selected.len()
            );
        }
        normalize_address(start).map_err(AggregatorError::from)?;
    }

    if cli.dry_run {
        handle_dry_run(&config, &selected);
        return Ok(());
    }

    handle_aggregate(&config, &selected, cli.all, cli.start.as_deref()).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout is reserved for article lines.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("paged_aggregator=info,warn"),
            1 => EnvFilter::new("paged_aggregator=debug,info"),
            2 => EnvFilter::new("paged_aggregator=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Resolves `--source` names; every source when none are given
fn select_sources<'a>(
    config: &'a Config,
    names: &[String],
) -> Result<Vec<&'a SourceConfig>, AggregatorError> {
    if names.is_empty() {
        return Ok(config.sources.iter().collect());
    }

    names
        .iter()
        .map(|name| {
            config
                .source(name)
                .ok_or_else(|| AggregatorError::UnknownSource(name.clone()))
        })
        .collect()
}

/// Handles the --list-sources mode
fn handle_list_sources(config: &Config) {
    for source in &config.sources {
        println!(
            "{}\t{}\t{}",
            source.provider,
            source.default_address,
            source.logo.as_deref().unwrap_or("-")
        );
    }
}

/// Handles the --dry-run mode: shows the configuration and selector problems
fn handle_dry_run(config: &Config, selected: &[&SourceConfig]) {
    println!("=== Paged-Aggregator Dry Run ===\n");

    println!("User Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nFetcher:");
    println!("  Timeout: {}ms", config.fetcher.timeout_ms);
    println!("  Connect timeout: {}ms", config.fetcher.connect_timeout_ms());
    println!("  Max pages per traversal: {}", config.traversal.max_pages);

    let mut problems = 0;
    println!("\nSources ({}):", selected.len());
    for source in selected {
        println!("  - {} ({})", source.provider, source.default_address);
        match &source.next_link {
            Some(next) => println!("    next link: {}", next.selector),
            None => println!("    next link: none (single page)"),
        }

        let report = SelectorSource::new((*source).clone()).check_selectors();
        for problem in &report {
            println!("    ! {}", problem);
        }
        problems += report.len();
    }

    if problems == 0 {
        println!("\n✓ Configuration is valid");
    } else {
        println!("\n✗ {} selector problem(s) found", problems);
    }
}

/// Traverses every selected source and streams its articles to stdout
///
/// A failing source is logged and does not stop the remaining ones; the
/// process still exits with an error afterwards.
async fn handle_aggregate(
    config: &Config,
    selected: &[&SourceConfig],
    fetch_all: bool,
    start: Option<&str>,
) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::from_config(&config.fetcher, &config.user_agent)
        .map_err(AggregatorError::Http)?;
    let mut writer = JsonLinesWriter::new(std::io::stdout());
    let mut failed = Vec::new();

    for source in selected {
        let traversal = Traversal::new(fetcher.clone(), SelectorSource::new((*source).clone()))
            .with_config(&config.traversal);
        let mut pager = traversal.pager(fetch_all, start);

        tracing::info!("Aggregating {} from {}", source.provider, pager.start_address());

        let outcome = loop {
            match pager.next_article().await {
                Ok(Some(article)) => {
                    if let Err(e) = writer.write(&article) {
                        break Err(e);
                    }
                }
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        if let Err(e) = outcome {
            tracing::error!("Aggregation of {} failed: {}", source.provider, e);
            failed.push(source.provider.clone());
        }

        print_statistics(&source.provider, pager.stats());
    }

    tracing::info!("{} articles written", writer.written());

    if !failed.is_empty() {
        bail!("{} source(s) failed: {}", failed.len(), failed.join(", "));
    }

    Ok(())
}
