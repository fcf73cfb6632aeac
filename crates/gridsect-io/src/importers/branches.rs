use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use gridsect_core::{Connection, Diagnostics};
use tracing::{debug, info};

use super::buses::parse_bus_number;
use crate::encoding::TextEncoding;
use crate::table::Table;

/// Column names shared by the line and transformer tables.
pub struct BranchColumns;

impl BranchColumns {
    pub const FROM: &'static str = "from_bus";
    pub const TO: &'static str = "to_bus";
}

/// Connections gathered from one or more branch tables.
///
/// Connections are unique and in order of first appearance across the
/// tables in the order they were added. Rows that fail to parse are
/// recorded as errors and skipped; callers should refuse to sectionalize
/// when [`Diagnostics::has_errors`] is set.
#[derive(Debug, Default)]
pub struct BranchLoad {
    pub connections: Vec<Connection>,
    pub rows: usize,
    pub duplicates: usize,
    pub diagnostics: Diagnostics,
    seen: HashSet<Connection>,
}

impl BranchLoad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the connections of `table`; `source` labels its diagnostics.
    pub fn extend_from_table(&mut self, table: &Table, source: &str) -> Result<()> {
        let from = table
            .require_column(BranchColumns::FROM)
            .with_context(|| format!("branch table {}", source))?;
        let to = table
            .require_column(BranchColumns::TO)
            .with_context(|| format!("branch table {}", source))?;

        for (idx, row) in table.rows().enumerate() {
            let line = idx + 1;
            self.rows += 1;
            let (a, b) = match (parse_bus_number(&row[from]), parse_bus_number(&row[to])) {
                (Ok(a), Ok(b)) => (a, b),
                (Err(err), _) | (_, Err(err)) => {
                    self.diagnostics.add_error_at_line(
                        "parse",
                        &format!("{}: {:#}", source, err),
                        line,
                    );
                    continue;
                }
            };
            let connection = Connection::new(a, b);
            if connection.is_self_loop() {
                self.diagnostics.add_warning_at_line(
                    "topology",
                    &format!("{}: self-loop on bus {}", source, a),
                    line,
                );
            }
            if self.seen.insert(connection) {
                self.connections.push(connection);
            } else {
                self.duplicates += 1;
                debug!(%connection, source, line, "duplicate connection ignored");
            }
        }
        Ok(())
    }
}

/// Read line/transformer tables in order and merge their connections.
pub fn load_connections(paths: &[impl AsRef<Path>], encoding: TextEncoding) -> Result<BranchLoad> {
    let mut load = BranchLoad::new();
    for path in paths {
        let path = path.as_ref();
        let table = Table::read(path, encoding)?;
        load.extend_from_table(&table, &path.display().to_string())?;
    }
    info!(
        rows = load.rows,
        connections = load.connections.len(),
        duplicates = load.duplicates,
        "loaded branch tables"
    );
    Ok(load)
}

/// Warn about boundary pairs that match no loaded connection.
///
/// A missing pair usually means a typo in the seed file: the tie it was
/// meant to cut is still in place.
pub fn audit_boundary(connections: &[Connection], boundary: &[Connection]) -> Diagnostics {
    let known: HashSet<&Connection> = connections.iter().collect();
    let mut diagnostics = Diagnostics::new();
    for pair in boundary {
        if !known.contains(pair) {
            diagnostics.add_warning_with_entity(
                "boundary",
                "boundary pair not present in branch tables",
                &format!("Connection {}", pair),
            );
        }
    }
    diagnostics
}
