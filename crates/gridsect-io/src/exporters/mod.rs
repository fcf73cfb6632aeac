//! Whole-file writers for sectionalization results and branch maps.

pub mod geojson;
pub mod sections;

pub use geojson::{branch_lines, write_branch_lines};
pub use sections::{write_json, write_sections, write_trace};
