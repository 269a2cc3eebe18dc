//! ossindex: resolve vulnerability reports for package-urls.
//!
//! A caching, batching command-line client for the component-report service.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use ossindex_client::cli::{
    self, CacheAction, CacheKind, ClientOverrides, ConfigAction, OutputFormat, ReportConfig,
    exit_codes,
};
use ossindex_client::config::{ClientConfig, load_or_default, parse_duration};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ossindex")]
#[command(author = "Binarly.io")]
#[command(version)]
#[command(about = "Caching, batching client for component vulnerability reports", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  Vulnerable components found (with --fail-on-vuln)
    3  Error occurred

EXAMPLES:
    # Look up two components
    ossindex report pkg:npm/lodash@4.17.4 pkg:maven/commons-fileupload/commons-fileupload@1.3

    # CI check over a list of package-urls, with a persistent cache
    ossindex report --file purls.txt --cache directory --fail-on-vuln

    # Inspect the persistent cache
    ossindex cache stats")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "OSSINDEX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `report` subcommand
#[derive(Parser)]
struct ReportArgs {
    /// Package-urls to resolve
    coordinates: Vec<String>,

    /// Read additional package-urls from a file (one per line)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "summary")]
    format: OutputFormat,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Identifiers per request (1-1024)
    #[arg(long)]
    batch_size: Option<usize>,

    /// Report service base URL
    #[arg(long, env = "OSSINDEX_BASE_URL")]
    base_url: Option<String>,

    /// Cache backend
    #[arg(long)]
    cache: Option<CacheKind>,

    /// Directory for the persistent cache (implies --cache directory)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Cache expiry, e.g. 30m, 12h, 7d
    #[arg(long, value_parser = parse_expiry)]
    expire_after: Option<Duration>,

    /// Exit with code 1 if any component has known vulnerabilities
    #[arg(long)]
    fail_on_vuln: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve component reports
    Report(ReportArgs),

    /// Inspect or prune the persistent report cache
    Cache {
        /// Cache directory (defaults to the configured or per-user location)
        #[arg(long, global = true)]
        cache_dir: Option<PathBuf>,

        #[command(subcommand)]
        action: CacheCommand,
    },

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Sub-subcommands for the `cache` command
#[derive(Subcommand)]
enum CacheCommand {
    /// Show entry counts and disk usage
    Stats {
        /// Output format
        #[arg(long, default_value = "summary")]
        format: OutputFormat,
    },
    /// Remove every cached entry
    Clear,
    /// Remove the entries for specific package-urls
    Purge {
        /// Package-urls to purge
        #[arg(required = true)]
        coordinates: Vec<String>,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the JSON schema of the configuration file
    Schema {
        /// Write the schema to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print an example configuration file
    Example,
    /// Print the effective configuration (defaults merged with file)
    Show,
    /// Print config file search paths and the discovered file
    Path,
}

fn parse_expiry(value: &str) -> std::result::Result<Duration, String> {
    parse_duration(value).map_err(|e| e.message)
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .init();

    match run(cli) {
        Ok(code) => {
            if code != exit_codes::SUCCESS {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let (config, loaded_from) =
        load_or_default(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(path) = &loaded_from {
        tracing::info!("Loaded configuration from {}", path.display());
    }

    match cli.command {
        Commands::Report(args) => {
            let overrides = ClientOverrides {
                base_url: args.base_url,
                batch_size: args.batch_size,
                cache: args.cache,
                cache_dir: args.cache_dir,
                expire_after: args.expire_after,
            };
            let client_config: ClientConfig = overrides.apply(config);
            cli::run_report(
                &client_config,
                ReportConfig {
                    coordinates: args.coordinates,
                    file: args.file,
                    format: args.format,
                    output_file: args.output_file,
                    fail_on_vuln: args.fail_on_vuln,
                },
            )
        }

        Commands::Cache { cache_dir, action } => {
            let action = match action {
                CacheCommand::Stats { format } => CacheAction::Stats { format },
                CacheCommand::Clear => CacheAction::Clear,
                CacheCommand::Purge { coordinates } => CacheAction::Purge { coordinates },
            };
            cli::run_cache(&config, cache_dir, action)?;
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => {
            let action = match action {
                ConfigCommand::Schema { output } => ConfigAction::Schema { output },
                ConfigCommand::Example => ConfigAction::Example,
                ConfigCommand::Show => ConfigAction::Show,
                ConfigCommand::Path => ConfigAction::Path,
            };
            cli::run_config(&config, loaded_from.as_deref(), cli.config.as_deref(), action)?;
            Ok(exit_codes::SUCCESS)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "ossindex", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }
    }
}
