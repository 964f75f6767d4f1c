//! Loads the node set and adjacency from storage.

use tracing::{debug, warn};

use super::{Adjacency, VisitedSet};
use crate::error::{Error, Result};
use crate::storage::StorageGateway;
use crate::types::NodeId;

/// The graph as loaded for one run.
#[derive(Debug, Clone)]
pub struct LoadedGraph {
    /// One cleared flag per node in the node table
    pub visited: VisitedSet,
    /// Undirected neighbor lists from the edge table
    pub adjacency: Adjacency,
}

impl LoadedGraph {
    /// Number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.visited.len()
    }

    /// Node ids, ascending.
    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.visited.ids().collect()
    }
}

/// Read every node and edge from `gateway`.
///
/// An empty node table is not an error here; the pivot controller rejects it.
///
/// # Errors
///
/// Returns `Error::Load` naming the enumeration that failed.
pub fn load_graph<G: StorageGateway>(gateway: &G) -> Result<LoadedGraph> {
    let expected = gateway
        .count_nodes()
        .map_err(|e| Error::load("node count", e))?;
    let ids = gateway
        .list_node_ids()
        .map_err(|e| Error::load("node ids", e))?;
    let visited = VisitedSet::new(ids);

    if visited.len() != expected {
        warn!(
            counted = expected,
            listed = visited.len(),
            "Node count changed while loading; using the listed ids"
        );
    }

    let edges = gateway.list_edges().map_err(|e| Error::load("edges", e))?;
    let edge_rows = edges.len();
    let adjacency = Adjacency::from_edges(edges);

    let dangling = adjacency.dangling_endpoints(&visited).count();
    if dangling > 0 {
        debug!(dangling, "Edges reference ids missing from the node table");
    }

    debug!(
        nodes = visited.len(),
        edge_rows,
        self_loops = adjacency.self_loops_dropped(),
        "Loaded graph"
    );

    Ok(LoadedGraph { visited, adjacency })
}
