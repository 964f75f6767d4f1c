//! Start-node selection with retry.
//!
//! A scan from a node inside an isolated pocket would classify the rest of
//! the network as isolated. The controller therefore judges every scan and
//! only accepts one whose start node reached a strict majority of the graph.
//! Rejected scans move on to the next candidate; the controller stops at the
//! first accepted scan or when candidates run out.

use std::collections::BTreeSet;

use tracing::{debug, info, trace, warn};

use crate::error::{Error, Result};
use crate::graph::{scan, LoadedGraph};
use crate::types::{NodeId, ScanAttempt, Verdict};

/// Which nodes to try as scan origins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Candidates {
    /// Every node id, ascending
    #[default]
    Auto,
    /// Only this node; no fallback if it is rejected
    Fixed(NodeId),
}

impl Candidates {
    /// Raw start id that selects automatic search.
    pub const AUTO_SENTINEL: i64 = -1;

    /// Interpret a raw start id: negative means automatic search.
    #[must_use]
    pub fn from_start_id(raw: i64) -> Self {
        if raw < 0 {
            Self::Auto
        } else {
            Self::Fixed(NodeId(raw))
        }
    }
}

/// Options controlling candidate iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PivotOptions {
    /// Candidate start nodes
    pub candidates: Candidates,
    /// Skip candidates that were reached by an earlier rejected scan.
    ///
    /// Such a candidate lies in a component already known to be a minority,
    /// so scanning from it again would be rejected too.
    pub skip_seen: bool,
}

/// Result of an accepted scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotOutcome {
    /// Number of nodes in the graph
    pub total_nodes: usize,
    /// Every scan performed, rejected ones first, accepted one last
    pub attempts: Vec<ScanAttempt>,
    /// Nodes not reached by the accepted scan, ascending
    pub deletion_set: Vec<NodeId>,
}

impl PivotOutcome {
    /// The accepted attempt.
    #[must_use]
    pub fn accepted(&self) -> Option<&ScanAttempt> {
        self.attempts.last().filter(|a| a.is_accepted())
    }
}

/// Drives scans from candidate start nodes until one is accepted.
///
/// Owns the loaded graph for the duration of the run; visited flags are
/// reset before every scan.
#[derive(Debug)]
pub struct PivotController {
    graph: LoadedGraph,
    options: PivotOptions,
}

impl PivotController {
    /// Create a controller over `graph`.
    #[must_use]
    pub fn new(graph: LoadedGraph, options: PivotOptions) -> Self {
        Self { graph, options }
    }

    /// Give the graph back, with the flags of the last scan still set.
    #[must_use]
    pub fn into_graph(self) -> LoadedGraph {
        self.graph
    }

    /// Scan candidates until one reaches a strict majority.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyGraph` if there are no nodes and
    /// `Error::RetryExhausted` if every candidate was rejected.
    pub fn run(&mut self) -> Result<PivotOutcome> {
        self.run_with(|_| {})
    }

    /// Like [`run`](Self::run), calling `observe` after every scan.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyGraph` if there are no nodes and
    /// `Error::RetryExhausted` if every candidate was rejected.
    pub fn run_with(&mut self, mut observe: impl FnMut(&ScanAttempt)) -> Result<PivotOutcome> {
        let total_nodes = self.graph.node_count();
        if total_nodes == 0 {
            return Err(Error::EmptyGraph);
        }

        let candidates = match self.options.candidates {
            Candidates::Auto => self.graph.node_ids(),
            Candidates::Fixed(start) => {
                if !self.graph.visited.contains(start) {
                    warn!(start = %start, "Fixed start node is not in the graph");
                }
                vec![start]
            }
        };

        let mut attempts = Vec::new();
        let mut seen: BTreeSet<NodeId> = BTreeSet::new();

        for start in candidates {
            if self.options.skip_seen && seen.contains(&start) {
                trace!(start = %start, "Skipping candidate inside a rejected component");
                continue;
            }

            self.graph.visited.reset();
            let reached = scan(start, &self.graph.adjacency, &mut self.graph.visited);
            let attempt = ScanAttempt::new(start, reached, total_nodes);
            observe(&attempt);
            attempts.push(attempt);

            match attempt.verdict {
                Verdict::Rejected => {
                    debug!(
                        start = %start,
                        reached = attempt.reached,
                        unreached = attempt.unreached,
                        "Start node does not reach a majority; retrying"
                    );
                    if self.options.skip_seen {
                        seen.extend(self.graph.visited.visited());
                    }
                }
                Verdict::Accepted => {
                    let deletion_set: Vec<NodeId> = self.graph.visited.unvisited().collect();
                    info!(
                        start = %start,
                        reached = attempt.reached,
                        isolated = deletion_set.len(),
                        attempts = attempts.len(),
                        "Accepted scan"
                    );
                    return Ok(PivotOutcome {
                        total_nodes,
                        attempts,
                        deletion_set,
                    });
                }
            }
        }

        Err(Error::RetryExhausted {
            attempts: attempts.len(),
        })
    }
}
