//! `SQLite` storage layer for road networks.
//!
//! `RoadDb` owns a single connection and implements [`StorageGateway`] over
//! the node and edge tables described in `schema`. The tables are expected to
//! exist already; `RoadDb::create` builds them for fixtures and local setups.
//!
//! ## Module Structure
//!
//! - `schema` - Table names, identifier validation and fixture DDL

mod schema;

pub use schema::{
    validate_identifier, TableNames, DEFAULT_EDGE_TABLE, DEFAULT_NODE_TABLE, MAX_IDENTIFIER_LENGTH,
};

use std::path::Path;

use rusqlite::{params, Connection, OpenFlags};
use tracing::{debug, trace};

use crate::error::Result;
use crate::storage::StorageGateway;
use crate::types::{Edge, NodeId};

/// `SQLite` database holding one road network.
///
/// Statements are built from the validated [`TableNames`] once, at open time.
pub struct RoadDb {
    conn: Connection,
    tables: TableNames,
    sql: Statements,
}

/// SQL text for every gateway operation, specialised to the table names.
struct Statements {
    count_nodes: String,
    list_node_ids: String,
    list_edges: String,
    delete_edges_touching: String,
    delete_node: String,
    insert_node: String,
    insert_edge: String,
    count_edges: String,
}

impl Statements {
    fn for_tables(tables: &TableNames) -> Self {
        let nodes = &tables.nodes;
        let edges = &tables.edges;
        Self {
            count_nodes: format!(r#"SELECT COUNT(id) FROM "{nodes}""#),
            list_node_ids: format!(r#"SELECT id FROM "{nodes}" ORDER BY id"#),
            list_edges: format!(
                r#"SELECT source, target FROM "{edges}"
                   WHERE source IS NOT NULL AND target IS NOT NULL
                   ORDER BY rowid"#
            ),
            delete_edges_touching: format!(
                r#"DELETE FROM "{edges}" WHERE source = ?1 OR target = ?1"#
            ),
            delete_node: format!(r#"DELETE FROM "{nodes}" WHERE id = ?1"#),
            insert_node: format!(r#"INSERT INTO "{nodes}" (id) VALUES (?1)"#),
            insert_edge: format!(r#"INSERT INTO "{edges}" (source, target) VALUES (?1, ?2)"#),
            count_edges: format!(r#"SELECT COUNT(*) FROM "{edges}""#),
        }
    }
}

impl RoadDb {
    /// Open an existing database file for reading and writing.
    ///
    /// The file is never created: a missing database is reported as an error
    /// rather than silently scanned as an empty graph.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for invalid table names and `Error::Database`
    /// if the file cannot be opened.
    pub fn open(path: &Path, tables: TableNames) -> Result<Self> {
        tables.validate()?;
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        debug!(path = %path.display(), nodes = %tables.nodes, edges = %tables.edges, "Opened road database");
        Ok(Self::with_connection(conn, tables))
    }

    /// Open (creating if needed) a database file and ensure both tables exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for invalid table names and `Error::Database`
    /// if the file cannot be opened or the schema cannot be applied.
    pub fn create(path: &Path, tables: TableNames) -> Result<Self> {
        tables.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let db = Self::with_connection(conn, tables);
        db.create_schema()?;
        Ok(db)
    }

    /// Open a private in-memory database with both tables created.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for invalid table names and `Error::Database`
    /// if the schema cannot be applied.
    pub fn open_in_memory(tables: TableNames) -> Result<Self> {
        tables.validate()?;
        let db = Self::with_connection(Connection::open_in_memory()?, tables);
        db.create_schema()?;
        Ok(db)
    }

    fn with_connection(conn: Connection, tables: TableNames) -> Self {
        let sql = Statements::for_tables(&tables);
        Self { conn, tables, sql }
    }

    /// Create the node and edge tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::Database` if the DDL fails.
    pub fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch(&self.tables.schema_sql())?;
        Ok(())
    }

    /// The table names this database was opened with.
    #[must_use]
    pub fn tables(&self) -> &TableNames {
        &self.tables
    }

    /// Direct access to the underlying connection, for fixtures.
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    // === Fixture helpers ===

    /// Insert a node row.
    ///
    /// # Errors
    ///
    /// Returns `Error::Database` if the insert fails (e.g. duplicate id).
    pub fn insert_node(&self, id: NodeId) -> Result<()> {
        self.conn
            .prepare_cached(&self.sql.insert_node)?
            .execute([id.as_i64()])?;
        Ok(())
    }

    /// Insert an edge row, returning its `gid`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Database` if the insert fails.
    pub fn insert_edge(&self, edge: Edge) -> Result<i64> {
        self.conn
            .prepare_cached(&self.sql.insert_edge)?
            .execute(params![edge.source.as_i64(), edge.target.as_i64()])?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert many nodes and edges in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `Error::Database` if any insert fails; nothing is kept then.
    pub fn seed(&self, nodes: &[NodeId], edges: &[Edge]) -> Result<()> {
        self.atomically(|db| {
            for &node in nodes {
                db.insert_node(node)?;
            }
            for &edge in edges {
                db.insert_edge(edge)?;
            }
            Ok(())
        })
    }

    /// Number of rows in the edge table, including rows without endpoints.
    ///
    /// # Errors
    ///
    /// Returns `Error::Database` if the query fails.
    pub fn count_edges(&self) -> Result<usize> {
        let count: usize = self
            .conn
            .query_row(&self.sql.count_edges, [], |row| row.get(0))?;
        Ok(count)
    }
}

impl StorageGateway for RoadDb {
    fn count_nodes(&self) -> Result<usize> {
        let count: usize = self
            .conn
            .query_row(&self.sql.count_nodes, [], |row| row.get(0))?;
        Ok(count)
    }

    fn list_node_ids(&self) -> Result<Vec<NodeId>> {
        let mut stmt = self.conn.prepare(&self.sql.list_node_ids)?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0).map(NodeId))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    fn list_edges(&self) -> Result<Vec<Edge>> {
        let mut stmt = self.conn.prepare(&self.sql.list_edges)?;
        let edges = stmt
            .query_map([], |row| {
                Ok(Edge::new(row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(edges)
    }

    fn delete_edges_touching(&self, node: NodeId) -> Result<usize> {
        let deleted = self
            .conn
            .prepare_cached(&self.sql.delete_edges_touching)?
            .execute([node.as_i64()])?;
        trace!(node = %node, deleted, "Deleted incident edges");
        Ok(deleted)
    }

    fn delete_node(&self, node: NodeId) -> Result<usize> {
        let deleted = self
            .conn
            .prepare_cached(&self.sql.delete_node)?
            .execute([node.as_i64()])?;
        trace!(node = %node, deleted, "Deleted node");
        Ok(deleted)
    }

    fn atomically<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Self) -> Result<T>,
    {
        // Dropping the transaction without commit rolls it back.
        let tx = self.conn.unchecked_transaction()?;
        let out = f(self)?;
        tx.commit()?;
        Ok(out)
    }
}
