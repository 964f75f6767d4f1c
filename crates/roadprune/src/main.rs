//! Roadprune CLI - remove isolated nodes from a road network.
//!
//! Scans the road graph from candidate start nodes until one reaches a
//! strict majority of the network, then deletes every node it could not
//! reach along with the incident edges.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use roadprune::Candidates;
use tracing_subscriber::EnvFilter;

mod cli;

/// Roadprune: delete nodes unreachable from the bulk of a road network.
#[derive(Parser)]
#[command(name = "roadprune")]
#[command(version, about, long_about = None)]
struct Cli {
    /// `SQLite` database holding the road network (overrides the config file)
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Configuration file (defaults to ./roadprune.yaml when present)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Start the scan from this node id only; -1 searches automatically
    #[arg(
        short = 'i',
        long,
        value_name = "ID",
        default_value_t = Candidates::AUTO_SENTINEL,
        allow_negative_numbers = true
    )]
    start_id: i64,

    /// Show the nodes that would be deleted without deleting them
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Skip start nodes that lie in a component already rejected
    #[arg(long)]
    skip_seen: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = cli::prune::PruneArgs {
        db: cli.db,
        config: cli.config,
        candidates: Candidates::from_start_id(cli.start_id),
        dry_run: cli.dry_run,
        skip_seen: cli.skip_seen,
        json: cli.json,
    };

    match cli::prune::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}
