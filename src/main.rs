//! Shelfscan main entry point
//!
//! This is the command-line interface for the Shelfscan catalog crawler and
//! book API.

use anyhow::Context;
use clap::{Parser, Subcommand};
use shelfscan::config::{load_config_with_hash, Config};
use shelfscan::crawler::{crawl, format_user_agent, WalkSettings};
use shelfscan::output::{print_statistics, print_table_statistics};
use shelfscan::server::serve;
use shelfscan::storage::BookTable;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Shelfscan: a book catalog crawler and query service
///
/// Shelfscan walks a paginated book catalog, writes one CSV row per book,
/// and serves that file as a small read-only JSON API.
#[derive(Parser, Debug)]
#[command(name = "shelfscan")]
#[command(version)]
#[command(about = "A book catalog crawler and query service", long_about = None)]
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
    /// Walk the catalog and write the record file
    Crawl {
        /// Path to TOML configuration file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,
    },

    /// Serve the record file over HTTP
    Serve {
        /// Path to TOML configuration file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,
    },

    /// Show statistics for the record file and exit
    Stats {
        /// Path to TOML configuration file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,
    },

    /// Validate config and show what would be crawled without crawling
    DryRun {
        /// Path to TOML configuration file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,
    },
}

impl Command {
    fn config_path(&self) -> &Path {
        match self {
            Self::Crawl { config }
            | Self::Serve { config }
            | Self::Stats { config }
            | Self::DryRun { config } => config,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let path = cli.command.config_path();
    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    match &cli.command {
        Command::Crawl { .. } => handle_crawl(&config).await,
        Command::Serve { .. } => serve(&config).await.context("server failed"),
        Command::Stats { .. } => {
            handle_stats(&config);
            Ok(())
        }
        Command::DryRun { .. } => handle_dry_run(&config),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG`, when set, replaces the verbosity flags.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("shelfscan=info,tower_http=info,warn"),
                1 => EnvFilter::new("shelfscan=debug,tower_http=debug,info"),
                2 => EnvFilter::new("shelfscan=trace,debug"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Validates the config and shows where the walk would start
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let settings = WalkSettings::from_config(&config.crawler)?;

    println!("=== Shelfscan Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Catalog: {}", config.crawler.catalog_url);
    println!("  Start page: {}", settings.start_url);
    println!("  Site root: {}", config.crawler.site_root);
    println!(
        "  Page delay: {}ms (+0..{}ms jitter)",
        config.crawler.page_delay_ms, config.crawler.page_delay_jitter_ms
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);

    println!("\nUser Agent:");
    println!("  {}", format_user_agent(&config.user_agent));

    println!("\nOutput:");
    println!("  Records: {}", config.output.records_path);

    println!("\nServer:");
    println!("  Bind address: {}", config.server.bind_address);

    println!("\n✓ Configuration is valid");
    println!("✓ Would start walking at {}", settings.start_url);

    Ok(())
}

/// Loads the record file and prints table statistics
fn handle_stats(config: &Config) {
    println!("Records: {}\n", config.output.records_path);

    let table = BookTable::load(Path::new(&config.output.records_path));
    print_table_statistics(&table.stats());
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} into {}",
        config.crawler.catalog_url,
        config.output.records_path
    );

    match crawl(config).await {
        Ok(stats) => {
            print_statistics(&stats);
            if stats.walk_state.is_aborted() {
                tracing::warn!("Crawl ended early; partial results were written");
            } else {
                tracing::info!("Crawl completed successfully");
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
