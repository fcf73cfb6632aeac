//! # gridsect-io: Grid Table I/O
//!
//! Reading and writing the flat files around sectionalization: the WECC bus
//! table, line and transformer tables, the seed file and the JSON results.
//!
//! ## Quick Start: Sectionalize From Files
//!
//! ```rust,no_run
//! use gridsect_core::sectionalize;
//! use gridsect_io::encoding::TextEncoding;
//! use gridsect_io::exporters::write_sections;
//! use gridsect_io::importers::{load_connections, SeedConfig};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = SeedConfig::load(Path::new("sections.toml"))?;
//!     let load = load_connections(&["WECC_Line.csv", "WECC_Trans.csv"], TextEncoding::Latin1)?;
//!     let result = sectionalize(load.connections, config.boundary(), config.seeds())?;
//!     write_sections(Path::new("network_section.json"), &result.sections)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`encoding`] - UTF-8 / ISO-8859-1 decoding and encoding
//! - [`table`] - Column-preserving CSV table
//! - [`importers`] - Bus numbers and coordinates, branch connections, seed file
//! - [`cleaning`] - Bus name/number cleanup and branch coordinate attachment
//! - [`exporters`] - Sections and pass-trace JSON, branch GeoJSON
//!
//! ## Error Handling
//!
//! Functions return `anyhow::Result` with context naming the file and data
//! row involved. Row-level problems that do not stop a load (unparseable
//! branch rows, self-loops, unprefixed bus names) are collected in
//! [`gridsect_core::Diagnostics`] instead.

pub mod cleaning;
pub mod encoding;
pub mod exporters;
pub mod importers;
pub mod table;

pub use encoding::TextEncoding;
pub use table::Table;
