//! Seoran main entry point
//!
//! This is the command-line interface for the Seoran page harvester.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use seoran::config::{load_config_with_hash, validate, Config};
use seoran::crawler::crawl;
use seoran::extract::{extract_directory, MIN_TEXT_LENGTH};
use seoran::output::{print_extraction_stats, print_report};
use seoran::url::resolve_scope;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Seoran: a polite, domain-bounded page harvester
///
/// Seoran crawls outward from a seed URL, stays inside a fixed set of
/// hostnames, and stores the HTML of every page it fetches for later
/// text processing.
#[derive(Parser, Debug)]
#[command(name = "seoran")]
#[command(version = "1.0.0")]
#[command(about = "A polite, domain-bounded page harvester", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl from a seed URL and save pages under the output directory
    Crawl(CrawlArgs),

    /// Extract plain text from previously saved pages
    Extract(ExtractArgs),
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// Absolute http/https URL to start from (overrides the config file)
    #[arg(value_name = "SEED")]
    seed: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum number of pages to fetch
    #[arg(long)]
    max_pages: Option<u32>,

    /// Hostname the crawl may visit (repeatable; default: the seed's hostname)
    #[arg(long = "allow-domain", value_name = "HOST")]
    allow_domains: Vec<String>,

    /// Seconds to wait between requests
    #[arg(long)]
    delay: Option<f64>,

    /// Directory where pages are saved
    #[arg(long)]
    output_dir: Option<String>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Directory of saved pages
    #[arg(long, default_value = "downloaded_pages")]
    input: PathBuf,

    /// Directory where extracted texts are written
    #[arg(long, default_value = "processed_texts")]
    output: PathBuf,

    /// Shortest text kept, in characters
    #[arg(long, default_value_t = MIN_TEXT_LENGTH)]
    min_length: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Crawl(args) => handle_crawl(args).await,
        Command::Extract(args) => handle_extract(args),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("seoran=info,warn"),
            1 => EnvFilter::new("seoran=debug,info"),
            2 => EnvFilter::new("seoran=trace,debug"),
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

/// Builds the effective configuration: file (if any), then command-line overrides
fn build_config(args: &CrawlArgs) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(seed) = &args.seed {
        config.crawler.seed_url = seed.clone();
    }
    if let Some(max_pages) = args.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if !args.allow_domains.is_empty() {
        config.crawler.allowed_domains = args.allow_domains.clone();
    }
    if let Some(delay) = args.delay {
        config.crawler.request_delay_seconds = delay;
    }
    if let Some(dir) = &args.output_dir {
        config.output.directory = dir.clone();
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let (seed, scope) = resolve_scope(&config.crawler.seed_url, &config.crawler.allowed_domains)?;

    println!("=== Seoran Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed: {}", seed);
    println!("  Allowed domains: {}", scope);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!(
        "  Delay between requests: {}s",
        config.crawler.request_delay_seconds
    );

    println!("\nFetch Limits:");
    println!("  Timeout: {}s", config.fetch.timeout_seconds);
    println!(
        "  Max content length: {} bytes",
        config.fetch.max_content_length
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);

    println!("\n✓ Configuration is valid");
    if !scope.in_scope(&seed) {
        println!("! The seed is outside the allowed domains and will not be fetched");
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(args: CrawlArgs) -> anyhow::Result<()> {
    let config = build_config(&args)?;

    if args.dry_run {
        return handle_dry_run(&config);
    }

    // Session-fatal errors (invalid seed, invalid limits) surface here
    match crawl(&config).await {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the extract subcommand
fn handle_extract(args: ExtractArgs) -> anyhow::Result<()> {
    tracing::info!(
        "Extracting text from {} into {}",
        args.input.display(),
        args.output.display()
    );

    let stats = extract_directory(&args.input, &args.output, args.min_length)
        .with_context(|| format!("Failed to extract pages under {}", args.input.display()))?;

    print_extraction_stats(&stats);
    Ok(())
}
