//! Domain types for road-network pruning.
//!
//! - **Storage rows**: `NodeId`, `Edge`
//! - **Scan results**: `Verdict`, `ScanAttempt`
//! - **Run results**: `PruneStats`, `PruneAction`, `PruneReport`

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Storage rows
// ============================================================================

/// A strongly-typed node (vertex) ID.
///
/// Ordered by the raw id so that candidate order and deletion-set order are
/// reproducible across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl NodeId {
    /// Extract the raw i64 value.
    #[must_use]
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An edge row as stored: the two endpoints of one road segment.
///
/// Direction is ignored once loaded; see [`Adjacency`](crate::Adjacency).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Node at the start of the segment
    pub source: NodeId,
    /// Node at the end of the segment
    pub target: NodeId,
}

impl Edge {
    /// Create an edge between two raw node ids.
    #[must_use]
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Whether both endpoints are the same node.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

// ============================================================================
// Scan results
// ============================================================================

/// Outcome of judging one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// The start node reached a strict majority; unreached nodes are isolated
    Accepted,
    /// The start node reached at most half the graph and was discarded
    Rejected,
}

impl Verdict {
    /// Judge a scan by its reached and unreached counts.
    ///
    /// A tie rejects: a start node must reach strictly more nodes than it
    /// leaves behind.
    #[must_use]
    pub fn judge(reached: usize, unreached: usize) -> Self {
        if unreached >= reached {
            Self::Rejected
        } else {
            Self::Accepted
        }
    }
}

/// One reachability scan from a candidate start node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanAttempt {
    /// Where the scan started
    pub start: NodeId,
    /// Nodes reached, including the start node
    pub reached: usize,
    /// Nodes left unvisited
    pub unreached: usize,
    /// Whether the scan was accepted
    pub verdict: Verdict,
}

impl ScanAttempt {
    /// Build an attempt from its counts, judging it on the way.
    #[must_use]
    pub fn new(start: NodeId, reached: usize, total: usize) -> Self {
        let unreached = total.saturating_sub(reached);
        Self {
            start,
            reached,
            unreached,
            verdict: Verdict::judge(reached, unreached),
        }
    }

    /// Whether this attempt was accepted.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.verdict == Verdict::Accepted
    }
}

// ============================================================================
// Run results
// ============================================================================

/// Rows removed by one prune batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneStats {
    /// Edge rows deleted
    pub edges_deleted: usize,
    /// Node rows deleted
    pub nodes_deleted: usize,
}

/// What a run did with its deletion set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PruneAction {
    /// The deletion set was removed from storage
    Deleted(PruneStats),
    /// Dry run: storage was left untouched
    DryRun,
    /// The graph is already connected; nothing was deleted
    NothingToDelete,
}

/// Full result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneReport {
    /// Number of nodes loaded from storage
    pub total_nodes: usize,
    /// Every scan performed, in order; the last one is accepted
    pub attempts: Vec<ScanAttempt>,
    /// Isolated node ids, ascending
    pub deletion_set: Vec<NodeId>,
    /// What happened to the deletion set
    pub action: PruneAction,
}

impl PruneReport {
    /// The accepted attempt, if the report holds one.
    #[must_use]
    pub fn accepted(&self) -> Option<&ScanAttempt> {
        self.attempts.iter().find(|a| a.is_accepted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::clear_majority(3, 2, Verdict::Accepted)]
    #[case::minority(2, 3, Verdict::Rejected)]
    #[case::tie(5, 5, Verdict::Rejected)]
    #[case::everything_reached(5, 0, Verdict::Accepted)]
    #[case::nothing_reached(0, 5, Verdict::Rejected)]
    #[case::empty(0, 0, Verdict::Rejected)]
    fn judge_requires_strict_majority(
        #[case] reached: usize,
        #[case] unreached: usize,
        #[case] expected: Verdict,
    ) {
        assert_eq!(Verdict::judge(reached, unreached), expected);
    }

    #[test]
    fn scan_attempt_derives_unreached_from_total() {
        let attempt = ScanAttempt::new(NodeId(1), 90, 100);

        assert_eq!(attempt.unreached, 10);
        assert!(attempt.is_accepted());
    }

    #[test]
    fn edge_detects_self_loop() {
        assert!(Edge::new(7, 7).is_self_loop());
        assert!(!Edge::new(7, 8).is_self_loop());
    }

    #[test]
    fn report_serializes_action_with_kind_tag() {
        let report = PruneReport {
            total_nodes: 5,
            attempts: vec![ScanAttempt::new(NodeId(1), 3, 5)],
            deletion_set: vec![NodeId(4), NodeId(5)],
            action: PruneAction::Deleted(PruneStats {
                edges_deleted: 1,
                nodes_deleted: 2,
            }),
        };

        let json = serde_json::to_value(&report).expect("report should serialize");

        assert_eq!(json["deletion_set"], serde_json::json!([4, 5]));
        assert_eq!(json["action"]["kind"], "deleted");
        assert_eq!(json["action"]["nodes_deleted"], 2);
        assert_eq!(json["attempts"][0]["verdict"], "accepted");
    }
}
