//! In-memory graph used for reachability analysis.
//!
//! This module provides:
//! - `VisitedSet` - the fixed node set with one visited flag per node
//! - `Adjacency` - undirected neighbor lists built from edge rows
//! - `load_graph` - builds both from a [`StorageGateway`](crate::StorageGateway)
//! - `scan` - marks every node reachable from a start node
//!
//! ## Design
//!
//! - Storage is the source of truth; the graph is loaded once per run
//! - Node ids are kept in a `BTreeMap` so every iteration is ascending
//! - Traversal uses an explicit work stack, never recursion

mod loader;
mod scan;

pub use loader::{load_graph, LoadedGraph};
pub use scan::scan;

use std::collections::{BTreeMap, HashMap};

use crate::types::{Edge, NodeId};

/// Visited flags keyed by node id.
///
/// The key set is fixed at construction: marking an unknown id is a no-op and
/// resetting only clears flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitedSet {
    flags: BTreeMap<NodeId, bool>,
}

impl VisitedSet {
    /// Create a set over `ids` with every flag cleared. Duplicates collapse.
    pub fn new(ids: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            flags: ids.into_iter().map(|id| (id, false)).collect(),
        }
    }

    /// Number of nodes in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether the set holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Whether `id` belongs to the graph.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.flags.contains_key(&id)
    }

    /// Whether `id` has been marked. Unknown ids are never visited.
    #[must_use]
    pub fn is_visited(&self, id: NodeId) -> bool {
        self.flags.get(&id).copied().unwrap_or(false)
    }

    /// Mark `id` visited.
    ///
    /// Returns `true` only if `id` is in the set and was not yet marked.
    pub fn mark(&mut self, id: NodeId) -> bool {
        match self.flags.get_mut(&id) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }

    /// Clear every flag, keeping the key set.
    pub fn reset(&mut self) {
        self.flags.values_mut().for_each(|flag| *flag = false);
    }

    /// All node ids, ascending.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.flags.keys().copied()
    }

    /// Marked node ids, ascending.
    pub fn visited(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.flags
            .iter()
            .filter(|(_, visited)| **visited)
            .map(|(id, _)| *id)
    }

    /// Unmarked node ids, ascending.
    pub fn unvisited(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.flags
            .iter()
            .filter(|(_, visited)| !**visited)
            .map(|(id, _)| *id)
    }

    /// Number of marked nodes.
    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.flags.values().filter(|visited| **visited).count()
    }
}

/// Undirected neighbor lists.
///
/// Every non-loop edge is recorded in both directions, so the relation is
/// symmetric however the edge was stored. Neighbor order follows edge order.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    neighbors: HashMap<NodeId, Vec<NodeId>>,
    self_loops_dropped: usize,
}

impl Adjacency {
    /// Build neighbor lists from edge rows, dropping self-loops.
    pub fn from_edges(edges: impl IntoIterator<Item = Edge>) -> Self {
        let mut adjacency = Self::default();
        for edge in edges {
            adjacency.insert(edge);
        }
        adjacency
    }

    /// Record one edge in both directions. Self-loops are counted and dropped.
    pub fn insert(&mut self, edge: Edge) {
        if edge.is_self_loop() {
            self.self_loops_dropped += 1;
            return;
        }
        self.neighbors
            .entry(edge.source)
            .or_default()
            .push(edge.target);
        self.neighbors
            .entry(edge.target)
            .or_default()
            .push(edge.source);
    }

    /// Neighbors of `id`, empty if it has none.
    #[must_use]
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.neighbors.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of ids with at least one neighbor.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Number of undirected edges kept (each stored twice internally).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.neighbors.values().map(Vec::len).sum::<usize>() / 2
    }

    /// Number of self-loop edges ignored while building.
    #[must_use]
    pub fn self_loops_dropped(&self) -> usize {
        self.self_loops_dropped
    }

    /// Ids that appear in some edge but are not keys of `nodes`.
    ///
    /// Such endpoints are never counted by a scan.
    pub fn dangling_endpoints<'a>(
        &'a self,
        nodes: &'a VisitedSet,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.neighbors.keys().copied().filter(|id| !nodes.contains(*id))
    }

    /// Whether every `a -> b` entry has a matching `b -> a` entry.
    ///
    /// One pass over all entries: `a -> b` counts up on the pair and `b -> a`
    /// counts down, so every pair must net to zero.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        let mut balance: HashMap<(NodeId, NodeId), i64> = HashMap::new();
        for (&a, list) in &self.neighbors {
            for &b in list {
                let (key, delta) = if a <= b { ((a, b), 1) } else { ((b, a), -1) };
                *balance.entry(key).or_default() += delta;
            }
        }
        balance.values().all(|&net| net == 0)
    }
}
