use std::time::Instant;

use anyhow::Result;
use gridsect_cli::cli::BusesCommands;
use gridsect_io::cleaning::clean_bus_table;
use gridsect_io::Table;
use tracing::info;

use crate::commands::telemetry::record_run_timed;
use crate::commands::util::{output_or_input, report_diagnostics};

pub fn handle(command: &BusesCommands) -> Result<()> {
    match command {
        BusesCommands::Clean {
            input,
            out,
            encoding,
        } => {
            let start = Instant::now();
            let target = output_or_input(out.as_ref(), input);
            let result = (|| -> Result<()> {
                let mut table = Table::read(input, *encoding)?;
                let diagnostics = clean_bus_table(&mut table)?;
                report_diagnostics("bus cleaning", &diagnostics)?;
                table.write(&target, *encoding)?;
                info!(path = %target.display(), buses = table.len(), "wrote cleaned bus table");
                Ok(())
            })();
            record_run_timed(
                &target,
                "buses clean",
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
