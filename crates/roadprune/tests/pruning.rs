//! End-to-end pruning tests against `SQLite` database files.
//!
//! These tests verify the full load-scan-judge-prune pipeline through the
//! public API:
//! - Deletion of isolated pockets
//! - Start-node retry and the fixed start override
//! - Dry runs
//! - All-or-nothing deletion

use roadprune::{
    Candidates, Error, NodeId, PruneAction, PruneOptions, RoadPruner, StorageGateway, Verdict,
};
use rstest::rstest;

mod common;
use common::{database_with, ids, open, path};

/// Node 1..=90 form the main network, 91..=100 an isolated pocket.
fn ninety_ten() -> (tempfile::TempDir, std::path::PathBuf) {
    let mut edges = path(1, 90);
    edges.extend(path(91, 10));
    database_with(&(1..=100).collect::<Vec<i64>>(), &edges)
}

/// Nodes 1..=10 form an isolated pocket listed first, 11..=100 the main network.
fn pocket_first() -> (tempfile::TempDir, std::path::PathBuf) {
    let mut edges = path(1, 10);
    edges.extend(path(11, 90));
    database_with(&(1..=100).collect::<Vec<i64>>(), &edges)
}

/// Every edge must have both endpoints in the node table.
fn assert_no_dangling_edges(db: &roadprune::RoadDb) {
    let nodes = db.list_node_ids().unwrap();
    for edge in db.list_edges().unwrap() {
        assert!(
            nodes.contains(&edge.source) && nodes.contains(&edge.target),
            "edge {edge:?} has an endpoint outside the node table"
        );
    }
}

// ============================================================================
// Deletion
// ============================================================================

#[test]
fn prunes_small_component_from_five_node_graph() {
    let (_dir, db_path) = database_with(&[1, 2, 3, 4, 5], &[(1, 2), (2, 3), (4, 5)]);

    let report = RoadPruner::new(open(&db_path), PruneOptions::default())
        .run()
        .expect("run should succeed");

    assert_eq!(report.total_nodes, 5);
    assert_eq!(report.deletion_set, ids([4, 5]));
    let db = open(&db_path);
    assert_eq!(db.list_node_ids().unwrap(), ids([1, 2, 3]));
    assert_no_dangling_edges(&db);
}

#[test]
fn pruned_graph_keeps_total_minus_deleted_nodes() {
    let (_dir, db_path) = ninety_ten();

    let report = RoadPruner::new(open(&db_path), PruneOptions::default())
        .run()
        .unwrap();

    assert_eq!(report.deletion_set, ids(91..=100));
    let db = open(&db_path);
    assert_eq!(db.count_nodes().unwrap(), 100 - report.deletion_set.len());
    assert_eq!(db.count_edges().unwrap(), 89);
    assert_no_dangling_edges(&db);
}

#[test]
fn self_loops_on_isolated_nodes_are_deleted_with_them() {
    let (_dir, db_path) = database_with(&[1, 2, 3, 4], &[(1, 2), (2, 3), (4, 4)]);

    let report = RoadPruner::new(open(&db_path), PruneOptions::default())
        .run()
        .unwrap();

    assert_eq!(report.deletion_set, ids([4]));
    assert_eq!(report.accepted().unwrap().reached, 3);
    let db = open(&db_path);
    assert_eq!(db.count_edges().unwrap(), 2);
}

// ============================================================================
// Start node retry
// ============================================================================

#[test]
fn auto_search_retries_until_majority_is_reached() {
    let (_dir, db_path) = pocket_first();

    let report = RoadPruner::new(open(&db_path), PruneOptions::default())
        .run()
        .unwrap();

    let rejected: Vec<_> = report
        .attempts
        .iter()
        .filter(|a| a.verdict == Verdict::Rejected)
        .collect();
    assert_eq!(rejected.len(), 10);
    assert!(rejected.iter().all(|a| a.reached == 10 && a.unreached == 90));
    assert_eq!(report.accepted().unwrap().start, NodeId(11));
    assert_eq!(report.deletion_set, ids(1..=10));
}

#[rstest]
#[case::inside_pocket(95)]
#[case::outside_graph(1000)]
fn fixed_start_that_fails_the_rule_deletes_nothing(#[case] start: i64) {
    let (_dir, db_path) = ninety_ten();
    let options = PruneOptions {
        candidates: Candidates::Fixed(NodeId(start)),
        ..PruneOptions::default()
    };

    let err = RoadPruner::new(open(&db_path), options).run().unwrap_err();

    assert!(matches!(err, Error::RetryExhausted { attempts: 1 }), "got {err:?}");
    assert_eq!(open(&db_path).count_nodes().unwrap(), 100);
}

#[test]
fn fixed_start_in_majority_is_accepted() {
    let (_dir, db_path) = ninety_ten();
    let options = PruneOptions {
        candidates: Candidates::Fixed(NodeId(42)),
        ..PruneOptions::default()
    };

    let report = RoadPruner::new(open(&db_path), options).run().unwrap();

    assert_eq!(report.attempts.len(), 1);
    assert_eq!(report.deletion_set, ids(91..=100));
}

#[test]
fn even_split_is_never_accepted() {
    let mut edges = path(1, 5);
    edges.extend(path(6, 5));
    let (_dir, db_path) = database_with(&(1..=10).collect::<Vec<i64>>(), &edges);

    let err = RoadPruner::new(open(&db_path), PruneOptions::default())
        .run()
        .unwrap_err();

    assert!(matches!(err, Error::RetryExhausted { attempts: 10 }));
    assert_eq!(open(&db_path).count_nodes().unwrap(), 10);
}

#[test]
fn empty_database_is_fatal() {
    let (_dir, db_path) = database_with(&[], &[]);

    let err = RoadPruner::new(open(&db_path), PruneOptions::default())
        .run()
        .unwrap_err();

    assert!(matches!(err, Error::EmptyGraph));
}

// ============================================================================
// Dry run
// ============================================================================

#[test]
fn dry_run_reports_same_set_without_deleting() {
    let (_dry_dir, dry_path) = pocket_first();
    let (_real_dir, real_path) = pocket_first();

    let dry = RoadPruner::new(
        open(&dry_path),
        PruneOptions {
            dry_run: true,
            ..PruneOptions::default()
        },
    )
    .run()
    .unwrap();
    let real = RoadPruner::new(open(&real_path), PruneOptions::default())
        .run()
        .unwrap();

    assert_eq!(dry.deletion_set, real.deletion_set);
    assert_eq!(dry.action, PruneAction::DryRun);
    let db = open(&dry_path);
    assert_eq!(db.count_nodes().unwrap(), 100);
    assert_eq!(db.count_edges().unwrap(), 98);
}

// ============================================================================
// Atomicity
// ============================================================================

#[test]
fn failed_deletion_rolls_back_the_whole_batch() {
    let (_dir, db_path) = ninety_ten();
    open(&db_path)
        .connection()
        .execute_batch(
            "CREATE TRIGGER refuse_delete BEFORE DELETE ON ways_vertices_pgr
             WHEN OLD.id = 97
             BEGIN SELECT RAISE(ABORT, 'node 97 is locked'); END;",
        )
        .unwrap();

    let err = RoadPruner::new(open(&db_path), PruneOptions::default())
        .run()
        .unwrap_err();

    assert!(matches!(err, Error::Prune { node: NodeId(97), .. }), "got {err:?}");
    let db = open(&db_path);
    assert_eq!(db.count_nodes().unwrap(), 100, "no node may be deleted");
    assert_eq!(db.count_edges().unwrap(), 98, "no edge may be deleted");
}

#[test]
fn missing_database_file_is_reported() {
    let dir = tempfile::TempDir::new().unwrap();

    let result = roadprune::RoadDb::open(&dir.path().join("nope.db"), Default::default());

    assert!(matches!(result, Err(Error::Database(_))));
}
