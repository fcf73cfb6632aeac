use std::collections::{HashMap, HashSet};

use anyhow::{anyhow, bail, Context, Result};
use gridsect_core::BusId;

use crate::table::Table;

/// Column names of the WECC bus table.
pub struct BusColumns;

impl BusColumns {
    pub const NUMBER: &'static str = "BusNumber";
    pub const NAME: &'static str = "BusName";
    pub const LATITUDE: &'static str = "Latitude";
    pub const LONGITUDE: &'static str = "Longitude";
}

const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// Latitude/longitude cells, kept as written so they are copied verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    pub latitude: String,
    pub longitude: String,
}

/// Parse a bus number cell.
///
/// Accepts integral floats such as `13.0`, which spreadsheet exports
/// produce for integer columns that once held a blank. Floats beyond 2^53
/// are rejected since they no longer name a single integer.
pub fn parse_bus_number(raw: &str) -> Result<BusId> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<usize>() {
        return Ok(BusId::new(value));
    }
    let value: f64 = raw
        .parse()
        .map_err(|_| anyhow!("'{}' is not a bus number", raw))?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        bail!("'{}' is not a bus number", raw);
    }
    if value > MAX_EXACT_FLOAT {
        bail!("'{}' is too large to be a bus number", raw);
    }
    Ok(BusId::new(value as usize))
}

/// All bus numbers in the table; duplicates are an error.
pub fn bus_numbers(table: &Table) -> Result<HashSet<BusId>> {
    let col = table.require_column(BusColumns::NUMBER)?;
    let mut numbers = HashSet::with_capacity(table.len());
    for (idx, row) in table.rows().enumerate() {
        let bus = parse_bus_number(&row[col])
            .with_context(|| format!("{} in data row {}", BusColumns::NUMBER, idx + 1))?;
        if !numbers.insert(bus) {
            bail!("bus {} listed twice (data row {})", bus, idx + 1);
        }
    }
    Ok(numbers)
}

pub fn bus_coordinates(table: &Table) -> Result<HashMap<BusId, Coordinates>> {
    let number = table.require_column(BusColumns::NUMBER)?;
    let latitude = table.require_column(BusColumns::LATITUDE)?;
    let longitude = table.require_column(BusColumns::LONGITUDE)?;
    let mut coordinates = HashMap::with_capacity(table.len());
    for (idx, row) in table.rows().enumerate() {
        let bus = parse_bus_number(&row[number])
            .with_context(|| format!("{} in data row {}", BusColumns::NUMBER, idx + 1))?;
        coordinates.insert(
            bus,
            Coordinates {
                latitude: row[latitude].clone(),
                longitude: row[longitude].clone(),
            },
        );
    }
    Ok(coordinates)
}
