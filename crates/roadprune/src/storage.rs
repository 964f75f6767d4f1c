//! Storage abstraction consumed by the pruning pipeline.
//!
//! The graph lives in a relational store with one node table and one edge
//! table. [`RoadDb`](crate::RoadDb) is the `SQLite` implementation; tests
//! substitute in-memory doubles.

use crate::error::Result;
use crate::types::{Edge, NodeId};

/// Node/edge enumeration and row deletion.
///
/// Calls are synchronous and block until the store answers.
pub trait StorageGateway {
    /// Number of rows in the node table.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn count_nodes(&self) -> Result<usize>;

    /// Every node id, ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn list_node_ids(&self) -> Result<Vec<NodeId>>;

    /// Every edge row with both endpoints set.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn list_edges(&self) -> Result<Vec<Edge>>;

    /// Delete every edge with `node` as either endpoint, returning the row count.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete statement fails.
    fn delete_edges_touching(&self, node: NodeId) -> Result<usize>;

    /// Delete the node row itself, returning the row count (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns an error if the delete statement fails.
    fn delete_node(&self, node: NodeId) -> Result<usize>;

    /// Run `f` as one unit of work: commit if it returns `Ok`, roll back
    /// every change it made if it returns `Err`.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or a storage error if the unit of work
    /// cannot be started or committed.
    fn atomically<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Self) -> Result<T>;
}
