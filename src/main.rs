//! MkDocs site loader entry point
//!
//! Crawls a documentation site described by a TOML file and writes one JSON
//! document per page for the indexing pipeline.

use anyhow::Context;
use clap::Parser;
use mkdocs_site_loader::config::{load_config_with_hash, Config};
use mkdocs_site_loader::crawler::{crawl, crawl_blocking};
use mkdocs_site_loader::output::{write_all, JsonlWriter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// MkDocs site loader: turns a documentation site into indexable documents
///
/// Starting from the configured site URL, every reachable in-site page that
/// passes the section filters is fetched once and written as a JSON line.
#[derive(Parser, Debug)]
#[command(name = "mkdocs-site-loader")]
#[command(version)]
#[command(about = "Crawl a documentation site into JSON-lines documents", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Write documents here instead of the configured documents-path
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Fetch one page at a time with a blocking client
    #[arg(long)]
    sequential: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.documents_path));

    if cli.dry_run {
        print_dry_run(&config, &output);
        return Ok(());
    }

    let documents = if cli.sequential {
        let config = config.clone();
        tokio::task::spawn_blocking(move || crawl_blocking(&config))
            .await
            .context("Sequential crawl thread panicked")??
    } else {
        crawl(&config).await?
    };

    let mut writer = JsonlWriter::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let written = write_all(&mut writer, &documents)?;

    if !cli.quiet {
        println!("Wrote {} documents to {}", written, output.display());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("mkdocs_site_loader=info,warn"),
            1 => EnvFilter::new("mkdocs_site_loader=debug,info"),
            2 => EnvFilter::new("mkdocs_site_loader=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Prints the effective configuration for --dry-run
fn print_dry_run(config: &Config, output: &std::path::Path) {
    let site = &config.site;

    println!("=== MkDocs Site Loader Dry Run ===\n");

    println!("Site:");
    println!("  URL: {}", site.url);
    println!("  Start path: {}", site.start_path);
    if site.sections_filter.is_empty() {
        if site.allow_all_when_no_filter {
            println!("  Sections filter: none (all links followed)");
        } else {
            println!("  Sections filter: none (only the start page is loaded)");
        }
    } else {
        println!("  Sections filter: {}", site.sections_filter.join(", "));
    }
    if !site.sections_exclude.is_empty() {
        println!("  Excluded sections: {}", site.sections_exclude.join(", "));
    }
    if !site.metadata_filter.is_empty() {
        println!("  Dropped metadata: {}", site.metadata_filter.join(", "));
    }

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Request timeout: {}s", config.http.request_timeout_secs);
    println!("  Connect timeout: {}s", config.http.connect_timeout_secs);

    println!("\nCrawler:");
    println!("  Max in flight: {}", config.crawler.max_in_flight);
    match config.crawler.crawl_deadline_secs {
        Some(secs) => println!("  Deadline: {}s", secs),
        None => println!("  Deadline: none"),
    }

    println!("\nOutput: {}", output.display());
    println!("\n✓ Configuration is valid");
}
