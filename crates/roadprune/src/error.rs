//! Error types for roadprune operations.
//!
//! Errors fall into three groups:
//!
//! - **Storage**: the database could not be opened, read, or written
//!   (`Database`, `Io`, `Load`, `Prune`)
//! - **Graph**: the graph cannot be pruned safely (`EmptyGraph`, `RetryExhausted`)
//! - **Input**: the configuration or arguments are invalid (`Config`)
//! - **Output**: the report could not be serialized (`Json`)
//!
//! A start node that only reaches a minority of the graph is not an error.
//! It is recorded as a rejected [`ScanAttempt`](crate::ScanAttempt) and the
//! next candidate is tried.

use thiserror::Error;

use crate::types::NodeId;

/// Result type for roadprune operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for roadprune operations.
///
/// Every variant terminates the run. None of them are retried beyond the
/// start-node retry loop itself.
#[derive(Debug, Error)]
pub enum Error {
    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Enumerating nodes or edges from storage failed
    #[error("failed to load {what} from storage")]
    Load {
        /// Which enumeration failed ("node count", "node ids", "edges")
        what: &'static str,
        /// Underlying storage error
        #[source]
        source: Box<Error>,
    },

    /// The node table is empty, so there is nothing to scan
    #[error("graph has no nodes")]
    EmptyGraph,

    /// No candidate start node reached a strict majority of the graph
    #[error("no start node reaches a majority of the graph ({attempts} candidate(s) tried)")]
    RetryExhausted {
        /// Number of candidates that were scanned and rejected
        attempts: usize,
    },

    /// Deleting a node or its incident edges failed; the batch was rolled back
    #[error("failed to delete node {node}; no rows were removed")]
    Prune {
        /// The node whose deletion failed
        node: NodeId,
        /// Underlying storage error
        #[source]
        source: Box<Error>,
    },

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),

    /// Serializing the report failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap a storage error raised while loading the graph.
    #[must_use]
    pub fn load(what: &'static str, source: Error) -> Self {
        Self::Load {
            what,
            source: Box::new(source),
        }
    }

    /// Wrap a storage error raised while deleting `node`.
    #[must_use]
    pub fn prune(node: NodeId, source: Error) -> Self {
        Self::Prune {
            node,
            source: Box::new(source),
        }
    }
}
