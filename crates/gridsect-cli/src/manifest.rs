use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Provenance record written as `run-<uuid>.json` next to a command's output.
#[derive(Debug, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub run_id: String,
    pub command: String,
    pub version: String,
    pub timestamp: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<Param>,
    pub params: Vec<Param>,
    pub inputs: Vec<InputDigest>,
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputDigest {
    pub path: String,
    /// Hex SHA-256 of the file; absent when it could not be read.
    pub sha256: Option<String>,
}

/// Run outcome and environment, filled in by the telemetry wrapper.
#[derive(Debug, Clone, Default)]
pub struct ManifestTelemetry {
    pub status: String,
    pub duration_ms: Option<u64>,
    pub env: Vec<Param>,
    pub correlation_id: Option<String>,
}

pub fn hash_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("hashing {}", path.display()))?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

pub fn record_manifest(
    output: &Path,
    command: &str,
    params: &[(&str, &str)],
    inputs: &[PathBuf],
    telemetry: ManifestTelemetry,
) -> Result<PathBuf> {
    let run_id = Uuid::new_v4().to_string();
    let dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    fs::create_dir_all(&dir)?;
    // A failed run may sit next to an earlier run's output; it is not ours.
    let outputs = if telemetry.status == "success" && output.exists() {
        vec![output.display().to_string()]
    } else {
        Vec::new()
    };
    let manifest = ManifestEntry {
        run_id: run_id.clone(),
        command: command.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
        status: telemetry.status,
        duration_ms: telemetry.duration_ms,
        correlation_id: telemetry.correlation_id,
        env: telemetry.env,
        params: params
            .iter()
            .map(|(k, v)| Param {
                name: k.to_string(),
                value: v.to_string(),
            })
            .collect(),
        inputs: inputs
            .iter()
            .map(|path| InputDigest {
                path: path.display().to_string(),
                sha256: hash_file(path).ok(),
            })
            .collect(),
        outputs,
    };
    let json = serde_json::to_string_pretty(&manifest)?;
    let path = dir.join(format!("run-{}.json", run_id));
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

pub fn read_manifest(path: &Path) -> Result<ManifestEntry> {
    let json = fs::read_to_string(path)?;
    let manifest = serde_json::from_str(&json)?;
    Ok(manifest)
}
