use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use gridsect_core::{PassTrace, SectionMap};
use serde::Serialize;
use tracing::info;

/// Serialize `value` as pretty JSON, replacing whatever is at `path`.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

/// Write `{ "<section>": [bus, ...], ... }` in section order.
pub fn write_sections(path: &Path, sections: &SectionMap) -> Result<()> {
    write_json(path, sections)?;
    info!(
        path = %path.display(),
        sections = sections.len(),
        buses = sections.bus_count(),
        "wrote sections"
    );
    Ok(())
}

pub fn write_trace(path: &Path, trace: &[PassTrace]) -> Result<()> {
    write_json(path, trace)?;
    info!(path = %path.display(), passes = trace.len(), "wrote pass trace");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridsect_core::{sectionalize, BusId, Connection, SectionSeeds};

    #[test]
    fn sections_file_is_replaced_whole() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("network_section.json");
        fs::write(&path, "stale content that is much longer than the result").unwrap();

        let result = sectionalize(
            [(1, 2), (5, 6)].map(Connection::from),
            std::iter::empty(),
            SectionSeeds::new()
                .with_section("1", [BusId::new(1)])
                .with_section("2", [BusId::new(6)]),
        )
        .unwrap();
        write_sections(&path, &result.sections).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({ "1": [1, 2], "2": [6, 5] }));
    }

    #[test]
    fn trace_is_an_array_of_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("trace.json");
        let result = sectionalize(
            [(1, 2), (2, 3)].map(Connection::from),
            std::iter::empty(),
            SectionSeeds::new().with_section("A", [BusId::new(1)]),
        )
        .unwrap();
        write_trace(&path, &result.trace).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[1]["discoveries"][0]["root"], 2);
        assert_eq!(value[1]["discoveries"][0]["buses"], serde_json::json!([3]));
    }
}
