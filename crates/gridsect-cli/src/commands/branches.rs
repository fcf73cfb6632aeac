use std::time::Instant;

use anyhow::Result;
use gridsect_cli::cli::BranchesCommands;
use gridsect_io::cleaning::locate_branches;
use gridsect_io::exporters::write_branch_lines;
use gridsect_io::Table;
use tracing::info;

use crate::commands::telemetry::record_run_timed;
use crate::commands::util::output_or_input;

pub fn handle(command: &BranchesCommands) -> Result<()> {
    match command {
        BranchesCommands::Locate {
            input,
            buses,
            out,
            encoding,
        } => {
            let start = Instant::now();
            let target = output_or_input(out.as_ref(), input);
            let result = (|| -> Result<()> {
                let bus_table = Table::read(buses, *encoding)?;
                let mut branch_table = Table::read(input, *encoding)?;
                locate_branches(&mut branch_table, &bus_table)?;
                branch_table.write(&target, *encoding)?;
                info!(
                    path = %target.display(),
                    branches = branch_table.len(),
                    "wrote located branch table"
                );
                Ok(())
            })();
            record_run_timed(
                &target,
                "branches locate",
                &[
                    ("input", &input.display().to_string()),
                    ("buses", &buses.display().to_string()),
                    ("encoding", &encoding.to_string()),
                ],
                &[input.clone(), buses.clone()],
                start,
                &result,
            );
            result
        }
        BranchesCommands::Geojson {
            input,
            out,
            encoding,
        } => {
            let start = Instant::now();
            let target = out
                .clone()
                .unwrap_or_else(|| input.with_extension("geojson"));
            let result = (|| -> Result<()> {
                let table = Table::read(input, *encoding)?;
                write_branch_lines(&target, &table)
            })();
            record_run_timed(
                &target,
                "branches geojson",
                &[
                    ("input", &input.display().to_string()),
                    ("encoding", &encoding.to_string()),
                ],
                &[input.clone()],
                start,
                &result,
            );
            result
        }
    }
}
