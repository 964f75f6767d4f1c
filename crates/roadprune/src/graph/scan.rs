//! Reachability scan.

use super::{Adjacency, VisitedSet};
use crate::types::NodeId;

/// Mark every node reachable from `start` and return how many were newly marked.
///
/// Returns 0 without touching `visited` if `start` is not a node of the graph
/// or is already marked. Neighbors that are not nodes of the graph are
/// skipped. A node is pushed at most once, when it is marked, so cycles
/// terminate and the work stack never holds more than one entry per node.
pub fn scan(start: NodeId, adjacency: &Adjacency, visited: &mut VisitedSet) -> usize {
    if !visited.mark(start) {
        return 0;
    }

    let mut count = 1;
    let mut stack = vec![start];

    while let Some(node) = stack.pop() {
        for &next in adjacency.neighbors(node) {
            if visited.mark(next) {
                count += 1;
                stack.push(next);
            }
        }
    }

    count
}
