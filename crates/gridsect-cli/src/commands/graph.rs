use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;
use gridsect_cli::cli::{GraphCommands, OutputFormat};
use gridsect_core::{find_islands, graph_stats, BusId, Connection, Island};
use gridsect_io::importers::{load_connections, SeedConfig};
use gridsect_io::TextEncoding;
use serde::Serialize;

use crate::commands::util::report_diagnostics;

#[derive(Serialize)]
struct IslandReport<'a> {
    #[serde(flatten)]
    island: &'a Island,
    seeded_by: Vec<String>,
}

pub fn handle(command: &GraphCommands) -> Result<()> {
    match command {
        GraphCommands::Stats {
            branches,
            encoding,
            format,
        } => {
            let connections = load(branches, *encoding)?;
            let stats = graph_stats(&connections);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                OutputFormat::Table => {
                    println!("Graph statistics:");
                    println!("  Buses         : {}", stats.bus_count);
                    println!("  Connections   : {}", stats.connection_count);
                    println!("  Components    : {}", stats.connected_components);
                    println!(
                        "  Degree [min/avg/max]: {}/{:.2}/{}",
                        stats.min_degree, stats.avg_degree, stats.max_degree
                    );
                }
            }
            Ok(())
        }
        GraphCommands::Islands {
            branches,
            config,
            emit,
            encoding,
            format,
        } => {
            let mut connections = load(branches, *encoding)?;
            let seeds = match config {
                Some(path) => {
                    let config = SeedConfig::load(path)?;
                    let cut: HashSet<Connection> = config.boundary().into_iter().collect();
                    connections.retain(|connection| !cut.contains(connection));
                    Some(config.seeds())
                }
                None => None,
            };

            let analysis = find_islands(&connections);
            let mut seeded_by = vec![Vec::new(); analysis.len()];
            for (name, buses) in seeds.iter().flat_map(|seeds| seeds.iter()) {
                let mut hit: Vec<usize> = buses
                    .iter()
                    .filter_map(|&bus| analysis.island_of(bus))
                    .collect();
                hit.sort_unstable();
                hit.dedup();
                for island in hit {
                    seeded_by[island].push(name.to_string());
                }
            }
            let reports: Vec<IslandReport> = analysis
                .islands
                .iter()
                .zip(seeded_by)
                .map(|(island, seeded_by)| IslandReport { island, seeded_by })
                .collect();

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
                OutputFormat::Table => {
                    for report in &reports {
                        let mut line = format!(
                            "Island {}: {} bus(es)",
                            report.island.island_id,
                            report.island.buses.len()
                        );
                        if seeds.is_some() {
                            if report.seeded_by.is_empty() {
                                line.push_str(" [unseeded]");
                            } else {
                                line.push_str(&format!(" [{}]", report.seeded_by.join(", ")));
                            }
                        }
                        println!("{line}");
                        if *emit {
                            println!("  {}", format_buses(&report.island.buses));
                        }
                    }
                }
            }
            Ok(())
        }
    }
}

fn load(branches: &[PathBuf], encoding: TextEncoding) -> Result<Vec<Connection>> {
    let load = load_connections(branches, encoding)?;
    report_diagnostics("branch tables", &load.diagnostics)?;
    Ok(load.connections)
}

fn format_buses(buses: &[BusId]) -> String {
    buses
        .iter()
        .map(BusId::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
