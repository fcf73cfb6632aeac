//! Readers for the bus table, the line/transformer tables and the seed file.

pub mod branches;
pub mod buses;
pub mod seeds;

pub use branches::{audit_boundary, load_connections, BranchColumns, BranchLoad};
pub use buses::{bus_coordinates, bus_numbers, parse_bus_number, BusColumns, Coordinates};
pub use seeds::{SectionSpec, SeedConfig};
