//! Table layout of the road-network database.
//!
//! The layout follows pgRouting's topology tables: a vertex table with an
//! `id` column and an edge table with `gid`, `source` and `target` columns.
//! Only the table names vary.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default vertex table name.
pub const DEFAULT_NODE_TABLE: &str = "ways_vertices_pgr";

/// Default edge table name.
pub const DEFAULT_EDGE_TABLE: &str = "ways";

/// Maximum identifier length accepted for table names.
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Names of the node and edge tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct TableNames {
    /// Vertex table (`id` column)
    pub nodes: String,
    /// Edge table (`gid`, `source`, `target` columns)
    pub edges: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            nodes: DEFAULT_NODE_TABLE.to_string(),
            edges: DEFAULT_EDGE_TABLE.to_string(),
        }
    }
}

impl TableNames {
    /// Check that both names are plain identifiers safe to splice into SQL.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the first offending table.
    pub fn validate(&self) -> Result<()> {
        validate_identifier(&self.nodes).map_err(|e| Error::Config(format!("node table: {e}")))?;
        validate_identifier(&self.edges).map_err(|e| Error::Config(format!("edge table: {e}")))?;
        if self.nodes == self.edges {
            return Err(Error::Config(format!(
                "node and edge tables must differ (both are '{}')",
                self.nodes
            )));
        }
        Ok(())
    }

    /// DDL creating both tables and the endpoint indexes.
    ///
    /// Production databases already carry these tables; this is used to
    /// build fixtures.
    #[must_use]
    pub(crate) fn schema_sql(&self) -> String {
        let nodes = &self.nodes;
        let edges = &self.edges;
        format!(
            r#"
-- Road network vertices
CREATE TABLE IF NOT EXISTS "{nodes}" (
    id INTEGER PRIMARY KEY
);

-- Road segments; source/target may be NULL before topology is built
CREATE TABLE IF NOT EXISTS "{edges}" (
    gid INTEGER PRIMARY KEY,
    source INTEGER,
    target INTEGER
);

CREATE INDEX IF NOT EXISTS "idx_{edges}_source" ON "{edges}"(source);
CREATE INDEX IF NOT EXISTS "idx_{edges}_target" ON "{edges}"(target);
"#
        )
    }
}

/// Validate a table identifier.
///
/// Requirements:
/// - 1-63 characters
/// - ASCII letters, digits and underscores only
/// - Does not start with a digit
///
/// # Errors
///
/// Returns a human-readable reason when the identifier is rejected.
pub fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("identifier cannot be empty".to_string());
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(format!(
            "identifier '{name}' is longer than {MAX_IDENTIFIER_LENGTH} characters"
        ));
    }

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(format!("identifier '{name}' cannot start with a digit"));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!(
            "identifier '{name}' may only contain letters, digits and underscores"
        ));
    }

    Ok(())
}
