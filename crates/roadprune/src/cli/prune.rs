//! `roadprune` command implementation.

use std::path::PathBuf;

use roadprune::{Candidates, Error, PruneOptions, RoadDb, RoadPruner, RoadpruneConfig};

use super::display;

/// Arguments resolved from the command line.
pub struct PruneArgs {
    /// Database path from `--db`
    pub db: Option<PathBuf>,
    /// Config file from `--config`
    pub config: Option<PathBuf>,
    /// Start node selection from `--start-id`
    pub candidates: Candidates,
    /// `--dry-run`
    pub dry_run: bool,
    /// `--skip-seen`
    pub skip_seen: bool,
    /// `--json`
    pub json: bool,
}

/// Run the prune command.
pub fn run(args: &PruneArgs) -> Result<(), Error> {
    let config = match &args.config {
        Some(path) => RoadpruneConfig::load(path)?,
        None => RoadpruneConfig::discover(&std::env::current_dir()?)?,
    };

    let db_path = args.db.clone().or(config.database).ok_or_else(|| {
        Error::Config(
            "no database given; pass --db or set `database` in roadprune.yaml".to_string(),
        )
    })?;

    let db = RoadDb::open(&db_path, config.tables)?;
    let pruner = RoadPruner::new(
        db,
        PruneOptions {
            candidates: args.candidates,
            dry_run: args.dry_run,
            skip_seen: args.skip_seen,
        },
    );

    if args.json {
        let report = pruner.run()?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let report = pruner.run_with(display::print_attempt)?;
    display::print_report(&report);
    Ok(())
}
