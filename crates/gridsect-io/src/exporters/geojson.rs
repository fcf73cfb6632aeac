use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use tracing::info;

use super::sections::write_json;
use crate::cleaning::LOCATION_COLUMNS;
use crate::importers::branches::BranchColumns;
use crate::importers::buses::parse_bus_number;
use crate::table::Table;

fn coordinate(raw: &str, column: &str, line: usize) -> Result<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        bail!("{} is empty in data row {}", column, line);
    }
    let value: f64 = raw
        .parse()
        .with_context(|| format!("{} '{}' in data row {}", column, raw, line))?;
    if !value.is_finite() {
        bail!("{} '{}' in data row {} is not a coordinate", column, raw, line);
    }
    Ok(value)
}

/// One `LineString` feature per branch row, in row order.
///
/// Needs the columns added by [`crate::cleaning::locate_branches`].
/// Coordinates are `[longitude, latitude]`, from bus first, and the
/// feature properties keep the row's own `from_bus`/`to_bus` order.
pub fn branch_lines(table: &Table) -> Result<Value> {
    let from = table.require_column(BranchColumns::FROM)?;
    let to = table.require_column(BranchColumns::TO)?;
    let mut location = [0; 4];
    for (slot, name) in location.iter_mut().zip(LOCATION_COLUMNS) {
        *slot = table
            .require_column(name)
            .context("branch table has no coordinates; run `branches locate` first")?;
    }

    let mut features = Vec::with_capacity(table.len());
    for (idx, row) in table.rows().enumerate() {
        let line = idx + 1;
        let from_bus = parse_bus_number(&row[from])
            .with_context(|| format!("{} in data row {}", BranchColumns::FROM, line))?;
        let to_bus = parse_bus_number(&row[to])
            .with_context(|| format!("{} in data row {}", BranchColumns::TO, line))?;
        let mut values = [0.0; 4];
        for ((value, &col), name) in values.iter_mut().zip(&location).zip(LOCATION_COLUMNS) {
            *value = coordinate(&row[col], name, line)?;
        }
        let [lat_from, lon_from, lat_to, lon_to] = values;
        features.push(json!({
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": [[lon_from, lat_from], [lon_to, lat_to]],
            },
            "properties": { "from_bus": from_bus, "to_bus": to_bus },
        }));
    }

    Ok(json!({ "type": "FeatureCollection", "features": features }))
}

/// Write the branch table as a GeoJSON `FeatureCollection`.
pub fn write_branch_lines(path: &Path, table: &Table) -> Result<()> {
    let collection = branch_lines(table)?;
    write_json(path, &collection)?;
    info!(path = %path.display(), features = table.len(), "wrote branch GeoJSON");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const HEADER: &str =
        "from_bus,to_bus,Latitude_from_bus,Longitude_from_bus,Latitude_to_bus,Longitude_to_bus\n";

    fn located(rows: &str) -> Table {
        Table::from_csv_str(&format!("{HEADER}{rows}")).unwrap()
    }

    #[test]
    fn features_follow_row_endpoint_order() {
        let table = located("1,3,34.1,-118.2,36.5,-120.0\n3,1,36.5,-120.0,34.1,-118.2\n");
        let collection = branch_lines(&table).unwrap();

        assert_eq!(collection["type"], "FeatureCollection");
        let forward = &collection["features"][0];
        assert_eq!(forward["geometry"]["type"], "LineString");
        assert_eq!(
            forward["geometry"]["coordinates"],
            json!([[-118.2, 34.1], [-120.0, 36.5]])
        );
        assert_eq!(forward["properties"], json!({ "from_bus": 1, "to_bus": 3 }));

        let reverse = &collection["features"][1];
        assert_eq!(
            reverse["geometry"]["coordinates"],
            json!([[-120.0, 36.5], [-118.2, 34.1]])
        );
        assert_eq!(reverse["properties"], json!({ "from_bus": 3, "to_bus": 1 }));
    }

    #[test]
    fn empty_location_cell_is_an_error() {
        let table = located("1,3,34.1,,36.5,-120.0\n");
        let err = branch_lines(&table).unwrap_err();
        assert!(format!("{err:#}").contains("Longitude_from_bus is empty in data row 1"));
    }

    #[test]
    fn unlocated_table_is_rejected() {
        let table = Table::from_csv_str("from_bus,to_bus\n1,2\n").unwrap();
        let err = branch_lines(&table).unwrap_err();
        assert!(format!("{err:#}").contains("branches locate"));
    }

    #[test]
    fn writes_a_parseable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("WECC_Trans.geojson");
        write_branch_lines(&path, &located("2,5,35.0,-119.9,36.5,-120.0\n")).unwrap();

        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["features"].as_array().unwrap().len(), 1);
    }
}
