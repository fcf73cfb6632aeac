//! Error types for sectionalization.
//!
//! Callers outside this crate propagate [`SectionError`] through
//! `anyhow`, which keeps it available to `downcast_ref`.

use thiserror::Error;

use crate::{BusId, Connection};

/// Failures of [`crate::sectionalize`] and its precondition checks.
///
/// None of these carry a partial partition: a failed run produces nothing
/// that could be mistaken for a complete sections mapping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SectionError {
    /// Two sections list the same seed bus.
    #[error("bus {bus} is seeded in both section '{first}' and section '{second}'")]
    InconsistentSeeds {
        bus: BusId,
        first: String,
        second: String,
    },

    /// Two seed entries use the same section name.
    #[error("section '{name}' is defined more than once")]
    DuplicateSection { name: String },

    /// Expansion of one section reached a bus another section already owns,
    /// so the boundary set does not separate them.
    #[error("bus {bus} reached by section '{claimant}' already belongs to section '{owner}' (missing boundary connection?)")]
    ContestedBus {
        bus: BusId,
        owner: String,
        claimant: String,
    },

    /// Connections remain that no section frontier touches.
    #[error(
        "{} connection(s) unreachable from any seed; unseeded island(s): {}",
        .remaining,
        describe_islands(.islands)
    )]
    UnreachableComponent {
        remaining: usize,
        islands: Vec<Vec<BusId>>,
    },

    /// A connection references a bus that is missing from the bus table.
    #[error("connection {connection} references unknown bus {bus}")]
    MalformedConnection { connection: Connection, bus: BusId },
}

/// Convenience alias for sectionalizer results.
pub type SectionResult<T> = Result<T, SectionError>;

fn describe_islands(islands: &[Vec<BusId>]) -> String {
    const SHOWN: usize = 8;
    islands
        .iter()
        .map(|island| {
            let mut buses: Vec<String> = island.iter().take(SHOWN).map(|b| b.to_string()).collect();
            if island.len() > SHOWN {
                buses.push(format!("... +{}", island.len() - SHOWN));
            }
            format!("[{}]", buses.join(", "))
        })
        .collect::<Vec<_>>()
        .join(" ")
}
