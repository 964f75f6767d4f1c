//! Human-readable output for the prune command.

use colored::Colorize;
use roadprune::{NodeId, PruneAction, PruneReport, ScanAttempt, Verdict};

const MAX_DISPLAY_IDS: usize = 50;

/// Print one scan attempt as soon as it finishes.
pub fn print_attempt(attempt: &ScanAttempt) {
    println!(
        "[scan from node #{}]  reached: {}  unreached: {}",
        attempt.start.to_string().cyan(),
        attempt.reached.to_string().green(),
        attempt.unreached.to_string().yellow()
    );

    if attempt.verdict == Verdict::Rejected {
        println!(
            "  {}",
            "(reached no more nodes than it missed; trying next start node)".dimmed()
        );
    }
}

/// Print the deletion set and what was done with it.
pub fn print_report(report: &PruneReport) {
    println!();
    println!(
        "{} ({}):",
        "Isolated nodes".white().bold(),
        report.deletion_set.len().to_string().red().bold()
    );
    print_ids(&report.deletion_set);
    println!();

    match report.action {
        PruneAction::DryRun => {
            println!("{}", "Dry run: nothing was deleted.".yellow());
        }
        PruneAction::NothingToDelete => {
            println!("{}", "Graph is connected; nothing to delete.".green());
        }
        PruneAction::Deleted(stats) => {
            println!(
                "{} {} nodes and {} edges.",
                "Deleted".green().bold(),
                stats.nodes_deleted,
                stats.edges_deleted
            );
        }
    }
}

/// Print ids on one line, truncated after `MAX_DISPLAY_IDS`.
fn print_ids(ids: &[NodeId]) {
    if ids.is_empty() {
        println!("    {}", "(none)".dimmed());
        return;
    }

    let shown = ids
        .iter()
        .take(MAX_DISPLAY_IDS)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    println!("    {shown}");

    if ids.len() > MAX_DISPLAY_IDS {
        println!(
            "    {} ... and {} more",
            "•".dimmed(),
            ids.len() - MAX_DISPLAY_IDS
        );
    }
}
