//! Deletion of isolated nodes.
//!
//! The whole deletion set is removed as one unit of work: for each node its
//! incident edges go first, then the node row. The first failure stops the
//! batch and every row already deleted in it is restored.

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::storage::StorageGateway;
use crate::types::{NodeId, PruneStats};

/// Delete `nodes` and every edge touching them, all or nothing.
///
/// An empty slice is a no-op and never opens a unit of work.
///
/// # Errors
///
/// Returns `Error::Prune` naming the first node whose deletion failed, or a
/// storage error if the unit of work cannot be started or committed. In both
/// cases storage is left as it was.
pub fn prune_nodes<G: StorageGateway>(gateway: &G, nodes: &[NodeId]) -> Result<PruneStats> {
    if nodes.is_empty() {
        info!("No isolated nodes; nothing to delete");
        return Ok(PruneStats::default());
    }

    let stats = gateway.atomically(|tx| {
        let mut stats = PruneStats::default();
        for &node in nodes {
            stats.edges_deleted += tx
                .delete_edges_touching(node)
                .map_err(|e| Error::prune(node, e))?;
            stats.nodes_deleted += tx.delete_node(node).map_err(|e| Error::prune(node, e))?;
            debug!(node = %node, "Deleted isolated node");
        }
        Ok(stats)
    })?;

    info!(
        nodes = stats.nodes_deleted,
        edges = stats.edges_deleted,
        "Deleted isolated nodes"
    );
    Ok(stats)
}
