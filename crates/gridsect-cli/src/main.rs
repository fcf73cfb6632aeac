use clap::Parser;
use gridsect_cli::cli::{Cli, Commands};
use std::process;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

mod commands;

use crate::commands::{branches, buses, graph, sections};

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let (label, result) = match &cli.command {
        Some(Commands::Sections { command }) => ("Sections", sections::handle(command)),
        Some(Commands::Buses { command }) => ("Buses", buses::handle(command)),
        Some(Commands::Branches { command }) => ("Branches", branches::handle(command)),
        Some(Commands::Graph { command }) => ("Graph", graph::handle(command)),
        None => {
            info!("No subcommand provided. Use `gridsect-cli --help` for more information.");
            return;
        }
    };

    match result {
        Ok(()) => info!("{label} command successful!"),
        Err(e) => {
            error!("{label} command failed: {e:#}");
            process::exit(1);
        }
    }
}
