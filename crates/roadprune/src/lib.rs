//! # Roadprune: isolated-node removal for road networks
//!
//! Roadprune loads a road-network graph from `SQLite`, finds the nodes that
//! cannot be reached from the bulk of the network, and deletes them together
//! with their edges.
//!
//! ## Pipeline
//!
//! 1. **Load** - read node ids and edges once ([`load_graph`])
//! 2. **Scan** - mark everything reachable from a start node ([`scan`])
//! 3. **Judge** - accept the scan only if it reached a strict majority,
//!    otherwise retry from the next candidate ([`PivotController`])
//! 4. **Prune** - delete the unreached nodes in one transaction ([`prune_nodes`]),
//!    unless this is a dry run
//!
//! ## Quick Start
//!
//! ```no_run
//! use roadprune::{PruneOptions, RoadDb, RoadPruner, TableNames};
//! use std::path::Path;
//!
//! let db = RoadDb::open(Path::new("roads.db"), TableNames::default())?;
//! let pruner = RoadPruner::new(db, PruneOptions { dry_run: true, ..Default::default() });
//!
//! let report = pruner.run()?;
//! println!("{} isolated nodes", report.deletion_set.len());
//! # Ok::<(), roadprune::Error>(())
//! ```

mod config;
mod db;
mod error;
mod graph;
mod pivot;
mod prune;
mod storage;
mod types;

pub use config::{RoadpruneConfig, CONFIG_FILE_NAME};
pub use db::{
    validate_identifier, RoadDb, TableNames, DEFAULT_EDGE_TABLE, DEFAULT_NODE_TABLE,
    MAX_IDENTIFIER_LENGTH,
};
pub use error::{Error, Result};
pub use graph::{load_graph, scan, Adjacency, LoadedGraph, VisitedSet};
pub use pivot::{Candidates, PivotController, PivotOptions, PivotOutcome};
pub use prune::prune_nodes;
pub use storage::StorageGateway;
pub use types::{
    Edge, NodeId, PruneAction, PruneReport, PruneStats, ScanAttempt, Verdict,
};

use std::time::Instant;

use tracing::{debug, info};

/// Options for one pruning run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneOptions {
    /// Candidate start nodes
    pub candidates: Candidates,
    /// Compute the deletion set but leave storage untouched
    pub dry_run: bool,
    /// Skip candidates inside components already rejected
    pub skip_seen: bool,
}

impl PruneOptions {
    fn pivot(self) -> PivotOptions {
        PivotOptions {
            candidates: self.candidates,
            skip_seen: self.skip_seen,
        }
    }
}

/// Finds and removes isolated nodes from a road network.
///
/// `RoadPruner` owns the storage gateway and runs the full
/// load-scan-judge-prune pipeline.
pub struct RoadPruner<G> {
    gateway: G,
    options: PruneOptions,
}

impl<G: StorageGateway> RoadPruner<G> {
    /// Create a pruner over `gateway`.
    pub fn new(gateway: G, options: PruneOptions) -> Self {
        Self { gateway, options }
    }

    /// The options this pruner runs with.
    pub fn options(&self) -> PruneOptions {
        self.options
    }

    /// Borrow the storage gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Give back the storage gateway.
    pub fn into_gateway(self) -> G {
        self.gateway
    }

    /// Run the pipeline once.
    ///
    /// # Errors
    ///
    /// Returns `Error::Load` if the graph cannot be read, `Error::EmptyGraph`
    /// if there are no nodes, `Error::RetryExhausted` if no start node
    /// reaches a majority, and `Error::Prune` if deletion fails.
    pub fn run(&self) -> Result<PruneReport> {
        self.run_with(|_| {})
    }

    /// Run the pipeline once, calling `observe` after every scan.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub fn run_with(&self, observe: impl FnMut(&ScanAttempt)) -> Result<PruneReport> {
        let start = Instant::now();

        let graph = load_graph(&self.gateway)?;
        let total_nodes = graph.node_count();
        info!(nodes = total_nodes, edges = graph.adjacency.edge_count(), "Graph loaded");

        let mut controller = PivotController::new(graph, self.options.pivot());
        let outcome = controller.run_with(observe)?;

        let action = if self.options.dry_run {
            info!(isolated = outcome.deletion_set.len(), "Dry run; not deleting");
            PruneAction::DryRun
        } else if outcome.deletion_set.is_empty() {
            PruneAction::NothingToDelete
        } else {
            PruneAction::Deleted(prune_nodes(&self.gateway, &outcome.deletion_set)?)
        };

        debug!(elapsed_ms = start.elapsed().as_millis(), "Run complete");

        Ok(PruneReport {
            total_nodes: outcome.total_nodes,
            attempts: outcome.attempts,
            deletion_set: outcome.deletion_set,
            action,
        })
    }
}
