use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use gridsect_io::TextEncoding;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Partition the network into seeded sections
    Sections {
        #[command(subcommand)]
        command: SectionsCommands,
    },
    /// Bus table utilities
    Buses {
        #[command(subcommand)]
        command: BusesCommands,
    },
    /// Line/transformer table utilities
    Branches {
        #[command(subcommand)]
        command: BranchesCommands,
    },
    /// Graph utilities
    Graph {
        #[command(subcommand)]
        command: GraphCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum SectionsCommands {
    /// Grow each section from its seeds and write the partition as JSON
    Build {
        /// Seed file (TOML) listing sections and boundary pairs
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: PathBuf,
        /// Line and transformer tables (CSV with from_bus,to_bus), in order
        #[arg(long = "branches", required = true, num_args = 1.., value_hint = ValueHint::FilePath)]
        branches: Vec<PathBuf>,
        /// Bus table (CSV with BusNumber) used to check bus references
        #[arg(long, value_hint = ValueHint::FilePath)]
        buses: Option<PathBuf>,
        /// Output file for the sections mapping
        #[arg(short, long, default_value = "network_section.json")]
        out: PathBuf,
        /// Also write the per-pass expansion trace to this file
        #[arg(long)]
        trace: Option<PathBuf>,
        /// Text encoding of the CSV tables
        #[arg(long, default_value_t = TextEncoding::Latin1)]
        encoding: TextEncoding,
        /// Do not write a run manifest next to the output
        #[arg(long)]
        no_manifest: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum BusesCommands {
    /// Strip bus name prefixes and renumber buses from zero
    Clean {
        /// Bus table (CSV)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Output file (defaults to overwriting the input)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Text encoding of the table, also used for writing
        #[arg(long, default_value_t = TextEncoding::Latin1)]
        encoding: TextEncoding,
    },
}

#[derive(Subcommand, Debug)]
pub enum BranchesCommands {
    /// Attach from/to bus latitude and longitude to every branch row
    Locate {
        /// Line or transformer table (CSV)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Bus table providing BusNumber, Latitude, Longitude
        #[arg(long, value_hint = ValueHint::FilePath)]
        buses: PathBuf,
        /// Output file (defaults to overwriting the input)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Text encoding of both tables, also used for writing
        #[arg(long, default_value_t = TextEncoding::Latin1)]
        encoding: TextEncoding,
    },
    /// Export located branches as a GeoJSON LineString FeatureCollection
    Geojson {
        /// Branch table with coordinates from `branches locate`
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Output file (defaults to the input with a .geojson extension)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Text encoding of the branch table
        #[arg(long, default_value_t = TextEncoding::Latin1)]
        encoding: TextEncoding,
    },
}

#[derive(Subcommand, Debug)]
pub enum GraphCommands {
    /// Graph stats summary
    Stats {
        /// Line and transformer tables
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        branches: Vec<PathBuf>,
        #[arg(long, default_value_t = TextEncoding::Latin1)]
        encoding: TextEncoding,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Find islands, optionally after cutting boundary pairs from a seed file
    Islands {
        /// Line and transformer tables
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        branches: Vec<PathBuf>,
        /// Seed file: cut its boundary pairs and mark which sections seed each island
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: Option<PathBuf>,
        /// List member buses of every island
        #[arg(long)]
        emit: bool,
        #[arg(long, default_value_t = TextEncoding::Latin1)]
        encoding: TextEncoding,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

/// Output format for summaries printed to stdout.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text (default for interactive use)
    #[default]
    Table,
    /// JSON (pipe-friendly, structured)
    Json,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
