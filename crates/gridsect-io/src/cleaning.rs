//! In-place fixes applied to the raw WECC tables before sectionalization.

use anyhow::{bail, Context, Result};
use gridsect_core::{Connection, Diagnostics, SectionError};
use tracing::info;

use crate::importers::branches::BranchColumns;
use crate::importers::buses::{bus_coordinates, parse_bus_number, BusColumns};
use crate::table::Table;

/// Columns added to branch tables by [`locate_branches`], in write order.
pub const LOCATION_COLUMNS: [&str; 4] = [
    "Latitude_from_bus",
    "Longitude_from_bus",
    "Latitude_to_bus",
    "Longitude_to_bus",
];

/// Strip the unit prefix from bus names and renumber buses from zero.
///
/// `BusName` becomes its second `-`-separated token (`GEN-ALPHA-1` becomes
/// `ALPHA`). Names without a `-` are left as they are and reported.
/// `BusNumber` is decremented by one; a bus numbered 0 cannot be shifted
/// and fails the whole table.
pub fn clean_bus_table(table: &mut Table) -> Result<Diagnostics> {
    let number = table.require_column(BusColumns::NUMBER)?;
    let name = table.require_column(BusColumns::NAME)?;
    let mut diagnostics = Diagnostics::new();

    for row in 0..table.len() {
        let line = row + 1;
        let bus = parse_bus_number(table.cell(row, number))
            .with_context(|| format!("{} in data row {}", BusColumns::NUMBER, line))?;
        let Some(shifted) = bus.value().checked_sub(1) else {
            bail!("bus 0 in data row {} cannot be renumbered from zero", line);
        };
        table.set_cell(row, number, shifted.to_string());

        let raw = table.cell(row, name).to_string();
        match raw.split('-').nth(1) {
            Some(stripped) => table.set_cell(row, name, stripped),
            None => diagnostics.add_warning_at_line(
                "clean",
                &format!("bus name '{}' has no '-' prefix; kept as is", raw),
                line,
            ),
        }
    }

    info!(
        buses = table.len(),
        warnings = diagnostics.warning_count(),
        "cleaned bus table"
    );
    Ok(diagnostics)
}

/// Copy from/to bus coordinates from the bus table onto every branch row.
///
/// Buses are matched by `BusNumber`. A branch endpoint missing from the bus
/// table fails with [`SectionError::MalformedConnection`].
pub fn locate_branches(branches: &mut Table, buses: &Table) -> Result<()> {
    let coordinates = bus_coordinates(buses)?;
    let from = branches.require_column(BranchColumns::FROM)?;
    let to = branches.require_column(BranchColumns::TO)?;
    let columns = LOCATION_COLUMNS.map(|column| branches.ensure_column(column));

    for row in 0..branches.len() {
        let line = row + 1;
        let a = parse_bus_number(branches.cell(row, from))
            .with_context(|| format!("{} in data row {}", BranchColumns::FROM, line))?;
        let b = parse_bus_number(branches.cell(row, to))
            .with_context(|| format!("{} in data row {}", BranchColumns::TO, line))?;

        let lookup = |bus| {
            coordinates.get(&bus).ok_or(SectionError::MalformedConnection {
                connection: Connection::new(a, b),
                bus,
            })
        };
        let start = lookup(a).with_context(|| format!("branch data row {}", line))?;
        let end = lookup(b).with_context(|| format!("branch data row {}", line))?;
        let values = [
            start.latitude.clone(),
            start.longitude.clone(),
            end.latitude.clone(),
            end.longitude.clone(),
        ];
        for (col, value) in columns.into_iter().zip(values) {
            branches.set_cell(row, col, value);
        }
    }

    info!(branches = branches.len(), "attached bus coordinates");
    Ok(())
}
