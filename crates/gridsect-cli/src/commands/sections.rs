use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use gridsect_cli::cli::SectionsCommands;
use gridsect_core::{check_bus_references, sectionalize};
use gridsect_io::exporters::{write_sections, write_trace};
use gridsect_io::importers::{audit_boundary, bus_numbers, load_connections, SeedConfig};
use gridsect_io::{Table, TextEncoding};
use tracing::info;

use crate::commands::telemetry::record_run_timed;
use crate::commands::util::{join_paths, report_diagnostics};

pub fn handle(command: &SectionsCommands) -> Result<()> {
    match command {
        SectionsCommands::Build {
            config,
            branches,
            buses,
            out,
            trace,
            encoding,
            no_manifest,
        } => {
            let start = Instant::now();
            let result = build(config, branches, buses.as_deref(), out, trace.as_deref(), *encoding);
            if !no_manifest {
                let mut inputs = vec![config.clone()];
                inputs.extend(branches.iter().cloned());
                inputs.extend(buses.iter().cloned());
                let branch_list = join_paths(branches);
                let config_param = config.display().to_string();
                let buses_param = buses
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_default();
                let encoding_param = encoding.to_string();
                record_run_timed(
                    out,
                    "sections build",
                    &[
                        ("config", &config_param),
                        ("branches", &branch_list),
                        ("buses", &buses_param),
                        ("encoding", &encoding_param),
                    ],
                    &inputs,
                    start,
                    &result,
                );
            }
            result
        }
    }
}

fn build(
    config_path: &Path,
    branches: &[PathBuf],
    buses: Option<&Path>,
    out: &Path,
    trace: Option<&Path>,
    encoding: TextEncoding,
) -> Result<()> {
    let config = SeedConfig::load(config_path)?;
    let load = load_connections(branches, encoding)?;
    report_diagnostics("branch tables", &load.diagnostics)?;

    let boundary = config.boundary();
    report_diagnostics("boundary", &audit_boundary(&load.connections, &boundary))?;

    if let Some(path) = buses {
        let table = Table::read(path, encoding)?;
        let known = bus_numbers(&table)?;
        report_diagnostics("seeds", &config.audit_buses(&known))?;
        check_bus_references(&load.connections, &known)
            .with_context(|| format!("checking branches against {}", path.display()))?;
    }

    let result = sectionalize(load.connections, boundary, config.seeds())?;
    for section in result.sections.iter() {
        info!(section = %section.name, buses = section.len(), "section complete");
    }
    info!(passes = result.passes(), "sectionalization finished");

    // The sections file goes last so a failed run never leaves one behind.
    if let Some(path) = trace {
        write_trace(path, &result.trace)?;
    }
    write_sections(out, &result.sections)?;
    Ok(())
}
