//! Dataset-Harvest main entry point
//!
//! This is the command-line interface for the Dataset-Harvest catalog walker.

use clap::Parser;
use dataset_harvest::config::{load_config, validate, Config};
use dataset_harvest::output::{emit_json, log_statistics, HarvestStatistics};
use dataset_harvest::Harvester;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Dataset-Harvest: a federated data catalog walker
///
/// Resolves a catalog (or catalog collection) into the dataset sites it lists,
/// fetches every site and prints the embedded JSON-LD together with every
/// failure as JSON.
#[derive(Parser, Debug)]
#[command(name = "dataset-harvest")]
#[command(version)]
#[command(about = "Harvest JSON-LD dataset metadata from federated data catalogs", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Catalog or catalog collection to start from (overrides the config)
    #[arg(long, value_name = "URL")]
    catalog: Option<String>,

    /// Deepest catalog nesting level to follow (overrides the config)
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Maximum requests in flight, 0 for no limit (overrides the config)
    #[arg(long, value_name = "N")]
    max_concurrent: Option<usize>,

    /// Do not log individual fetch failures; they are still reported in the output
    #[arg(long)]
    suppress_errors: bool,

    /// Write the JSON result to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Only resolve the catalog tree and print the dataset site URLs
    #[arg(long, conflicts_with_all = ["validate", "dry_run"])]
    resolve_only: bool,

    /// Check that the document at URL declares URL as its identifier
    #[arg(long, value_name = "URL", conflicts_with_all = ["resolve_only", "dry_run"])]
    validate: Option<String>,

    /// With --validate: the URL serves an HTML page with embedded JSON-LD
    #[arg(long, requires = "validate")]
    expect_html: bool,

    /// Print the effective configuration and exit
    #[arg(long, conflicts_with_all = ["resolve_only", "validate"])]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
        return Ok(ExitCode::SUCCESS);
    }

    let harvester = Harvester::from_config(&config)?;

    if let Some(url) = &cli.validate {
        return handle_validate(&harvester, url, cli.expect_html, &cli).await;
    }

    if cli.resolve_only {
        handle_resolve(&harvester, &config, &cli).await?;
    } else {
        handle_harvest(&harvester, &config, &cli).await?;
    }

    Ok(ExitCode::SUCCESS)
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries the JSON result.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("dataset_harvest=info,warn"),
            1 => EnvFilter::new("dataset_harvest=debug,info"),
            2 => EnvFilter::new("dataset_harvest=trace,debug"),
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

/// Loads the config file (or defaults) and applies command-line overrides
fn build_config(cli: &Cli) -> dataset_harvest::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if let Some(catalog) = &cli.catalog {
        config.harvest.root_catalog_url = catalog.clone();
    }
    if let Some(max_depth) = cli.max_depth {
        config.harvest.max_depth = max_depth;
    }
    if let Some(max_concurrent) = cli.max_concurrent {
        config.harvest.max_concurrent_requests = max_concurrent;
    }
    if cli.suppress_errors {
        config.harvest.suppress_errors = true;
    }

    validate(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Dataset-Harvest Dry Run ===\n");
    println!("{}", toml::to_string_pretty(config)?);
    println!("✓ Configuration is valid");
    println!(
        "✓ Would harvest from {}",
        config.harvest.root_catalog_url
    );
    Ok(())
}

/// Handles the --resolve-only mode: prints the resolved dataset site URLs
async fn handle_resolve(
    harvester: &Harvester,
    config: &Config,
    cli: &Cli,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Resolving catalog {}", config.harvest.root_catalog_url);
    let resolution = harvester.resolve(&config.harvest.root_catalog_url).await;
    tracing::info!(
        "Resolved {} dataset sites with {} errors",
        resolution.urls.len(),
        resolution.errors.len()
    );
    emit_json(&resolution, cli.output.as_deref())?;
    Ok(())
}

/// Handles the --validate mode; exits with failure when the identifier is wrong
async fn handle_validate(
    harvester: &Harvester,
    url: &str,
    expect_html: bool,
    cli: &Cli,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let outcome = harvester.validate_identifier(url, expect_html).await;
    emit_json(&outcome, cli.output.as_deref())?;

    if outcome.is_valid {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Handles the main harvest operation
async fn handle_harvest(
    harvester: &Harvester,
    config: &Config,
    cli: &Cli,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting harvest from {}", config.harvest.root_catalog_url);
    if harvester.limiter().is_bounded() {
        tracing::info!(
            "Limiting to {} concurrent requests",
            config.harvest.max_concurrent_requests
        );
    }

    let aggregate = harvester.aggregate(&config.harvest.root_catalog_url).await;

    log_statistics(&HarvestStatistics::from_aggregate(&aggregate));
    emit_json(&aggregate, cli.output.as_deref())?;

    Ok(())
}
