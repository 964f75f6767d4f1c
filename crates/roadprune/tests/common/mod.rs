//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use roadprune::{Edge, NodeId, RoadDb, TableNames};
use tempfile::TempDir;

/// Convert raw ids to `NodeId`s.
pub fn ids(raw: impl IntoIterator<Item = i64>) -> Vec<NodeId> {
    raw.into_iter().map(NodeId).collect()
}

/// Edges forming a simple path over `first..first + len`.
pub fn path(first: i64, len: i64) -> Vec<(i64, i64)> {
    (first + 1..first + len).map(|i| (i - 1, i)).collect()
}

/// Create a database file in a fresh temp dir holding the given graph.
pub fn database_with(nodes: &[i64], edges: &[(i64, i64)]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("should create temp dir");
    let path = dir.path().join("roads.db");

    let db = RoadDb::create(&path, TableNames::default()).expect("should create database");
    let edges: Vec<Edge> = edges.iter().map(|&(s, t)| Edge::new(s, t)).collect();
    db.seed(&ids(nodes.iter().copied()), &edges)
        .expect("should seed database");

    (dir, path)
}

/// Reopen a database created by `database_with`.
pub fn open(path: &Path) -> RoadDb {
    RoadDb::open(path, TableNames::default()).expect("should open database")
}

/// Run the roadprune binary in `dir` with `args`.
pub fn run_roadprune_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_roadprune"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute roadprune binary")
}
