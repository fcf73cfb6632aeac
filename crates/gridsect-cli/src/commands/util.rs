use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use gridsect_core::Diagnostics;
use tracing::{error, warn};

/// Log every issue; fail when any of them is an error.
pub fn report_diagnostics(stage: &str, diagnostics: &Diagnostics) -> Result<()> {
    for issue in diagnostics.warnings() {
        warn!("{stage}: {issue}");
    }
    for issue in diagnostics.errors() {
        error!("{stage}: {issue}");
    }
    if diagnostics.has_errors() {
        bail!("{stage} found {}", diagnostics.summary());
    }
    Ok(())
}

/// Output path of an in-place table rewrite.
pub fn output_or_input(out: Option<&PathBuf>, input: &Path) -> PathBuf {
    out.cloned().unwrap_or_else(|| input.to_path_buf())
}

pub fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(",")
}
