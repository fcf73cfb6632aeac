use gridsect_cli::manifest::{record_manifest, ManifestTelemetry, Param};
use std::{
    env,
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::{debug, warn};

const TELEMETRY_ENV_KEYS: &[&str] = &[
    "GRIDSECT_ENV",
    "GRIDSECT_RELEASE_VERSION",
    "GITHUB_RUN_ID",
    "GITHUB_WORKFLOW",
    "GITHUB_JOB",
    "GITHUB_REF",
    "GITHUB_SHA",
];

fn collect_telemetry_env() -> Vec<Param> {
    TELEMETRY_ENV_KEYS
        .iter()
        .filter_map(|key| {
            env::var(key).ok().map(|value| Param {
                name: key.to_string(),
                value,
            })
        })
        .collect()
}

fn correlation_id() -> Option<String> {
    env::var("GRIDSECT_CORRELATION_ID")
        .or_else(|_| env::var("GITHUB_RUN_ID"))
        .ok()
}

/// Write a run manifest next to `out`, recording success or failure.
///
/// A manifest that cannot be written is logged and otherwise ignored so the
/// command's own result is what the caller sees.
pub fn record_run_timed(
    out: &Path,
    command: &str,
    params: &[(&str, &str)],
    inputs: &[PathBuf],
    start: Instant,
    result: &anyhow::Result<()>,
) {
    let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    let status = if result.is_ok() { "success" } else { "failure" };
    let telemetry = ManifestTelemetry {
        status: status.to_string(),
        duration_ms: Some(duration_ms),
        env: collect_telemetry_env(),
        correlation_id: correlation_id(),
    };
    match record_manifest(out, command, params, inputs, telemetry) {
        Ok(path) => debug!(manifest = %path.display(), status, "recorded run"),
        Err(err) => warn!("Failed to record run manifest: {err:#}"),
    }
}
