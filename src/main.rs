//! Site-Mirror main entry point
//!
//! This is the command-line interface for the Site-Mirror single-site
//! mirroring tool.

use anyhow::Context;
use clap::Parser;
use site_mirror::config::{load_config_with_hash, validate, Config};
use site_mirror::output::print_report;
use site_mirror::url::{map_to_local_path, page_index_path, parse_root_url, RootHost};
use site_mirror::Coordinator;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Site-Mirror: mirror a single website onto the local filesystem
///
/// Site-Mirror fetches the root page, saves it, downloads its stylesheets,
/// scripts, images and icons, then follows every same-host link until no
/// new pages are found. Assets already on disk are never fetched again.
#[derive(Parser, Debug)]
#[command(name = "site-mirror")]
#[command(version)]
#[command(about = "Mirror a single website onto the local filesystem", long_about = None)]
struct Cli {
    /// Root URL to mirror (http:// is assumed when no scheme is given)
    #[arg(value_name = "URL")]
    url: String,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output directory (overrides the configuration file)
    #[arg(short, long, value_name = "DIR")]
    output: Option<String>,

    /// Maximum number of pages to visit, 0 for no limit (overrides the
    /// configuration file)
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show where the root page would be saved without
    /// touching the network
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = load_effective_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config, &cli.url)
    } else {
        handle_mirror(config, config_hash, &cli.url).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_mirror=info,warn"),
            1 => EnvFilter::new("site_mirror=debug,info"),
            2 => EnvFilter::new("site_mirror=trace,debug"),
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

/// Loads the configuration file if one was given, then applies CLI overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<(Config, Option<String>)> {
    let (mut config, hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    if let Some(output) = &cli.output {
        config.output.directory = output.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }

    validate(&config).context("Invalid configuration")?;
    Ok((config, hash))
}

/// Handles the --dry-run mode: validates config and shows where the root
/// page would land
fn handle_dry_run(config: &Config, url: &str) -> anyhow::Result<()> {
    let root_url = parse_root_url(url).with_context(|| format!("Invalid root URL: {}", url))?;
    let root = RootHost::from_url(&root_url)?;
    let output_dir = Path::new(&config.output.directory);

    println!("=== Site-Mirror Dry Run ===\n");

    println!("Root:");
    println!("  URL: {}", root_url);
    println!("  Host: {}", root);

    println!("\nCrawler Configuration:");
    match config.crawler.max_pages {
        0 => println!("  Max pages: unbounded"),
        n => println!("  Max pages: {}", n),
    }
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout);

    println!("\nUser Agent:");
    println!("  {}", site_mirror::crawler::user_agent(&config.user_agent));

    println!("\nOutput:");
    println!("  Directory: {}", output_dir.display());
    println!("  Save .html pages: {}", config.output.save_file_pages);

    let destination = if root_url.path().ends_with(".html") {
        if config.output.save_file_pages {
            map_to_local_path(&root_url, output_dir, &root).display().to_string()
        } else {
            "(not saved, links followed only)".to_string()
        }
    } else {
        page_index_path(&root_url, output_dir, &root)
            .display()
            .to_string()
    };
    println!("  Root page: {}", destination);

    println!("\n✓ Configuration is valid");
    println!("✓ Would start mirroring from {}", root_url);

    Ok(())
}

/// Handles the main mirror operation
async fn handle_mirror(config: Config, config_hash: Option<String>, url: &str) -> anyhow::Result<()> {
    let mut coordinator = Coordinator::new(config, url)
        .with_context(|| format!("Cannot start mirroring {}", url))?;
    if let Some(hash) = config_hash {
        coordinator = coordinator.with_config_hash(hash);
    }

    match coordinator.run().await {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Mirror failed: {}", e);
            Err(e.into())
        }
    }
}
