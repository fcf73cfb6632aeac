pub mod cli;
pub mod manifest;

pub use cli::{
    build_cli_command, BranchesCommands, BusesCommands, Cli, Commands, GraphCommands,
    OutputFormat, SectionsCommands,
};
