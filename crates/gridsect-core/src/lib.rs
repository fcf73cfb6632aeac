//! # gridsect-core: Transmission Network Sectionalization
//!
//! Data model and algorithms for splitting a transmission network into named
//! sections grown from seed buses.
//!
//! ## Design Philosophy
//!
//! The network is reduced to what sectionalization needs:
//! - **Buses**: integer identifiers ([`BusId`])
//! - **Connections**: unordered bus pairs ([`Connection`]), one per line or
//!   transformer, with no multiplicity
//!
//! Sections are grown from their seeds by repeatedly absorbing every bus
//! directly connected to a current member, consuming each connection as it
//! is used. Boundary connections are removed up front so the sections they
//! separate never merge.
//!
//! ## Quick Start
//!
//! ```rust
//! use gridsect_core::*;
//!
//! let connections = [(1, 2), (2, 3), (3, 4), (5, 6)].map(Connection::from);
//! let seeds = SectionSeeds::new()
//!     .with_section("A", [BusId::new(1)])
//!     .with_section("B", [BusId::new(5)]);
//!
//! let result = sectionalize(connections, std::iter::empty(), seeds).unwrap();
//! assert_eq!(result.sections.get("A").unwrap().len(), 4);
//! assert_eq!(result.sections.get("B").unwrap().len(), 2);
//! ```
//!
//! ## Modules
//!
//! - [`sectionalize`](mod@sectionalize) - Seeded flood-fill partitioning
//! - [`graph_utils`] - Island detection and degree statistics
//! - [`diagnostics`] - Warning/error collection for data loading
//! - [`error`] - [`SectionError`] and [`SectionResult`]

use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use std::fmt;

pub mod diagnostics;
pub mod error;
pub mod graph_utils;
pub mod sectionalize;

pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{SectionError, SectionResult};
pub use graph_utils::{find_islands, graph_stats, GraphStats, Island, IslandAnalysis};
pub use sectionalize::{
    check_bus_references, sectionalize, Discovery, PassTrace, Sectionalization,
};

/// Identifier of a bus in the transmission network.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BusId(usize);

impl BusId {
    #[inline]
    pub fn new(value: usize) -> Self {
        BusId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for BusId {
    fn from(value: usize) -> Self {
        BusId(value)
    }
}

/// An undirected line or transformer between two buses.
///
/// Endpoints are stored sorted, so `Connection::new(a, b) == Connection::new(b, a)`.
/// Serialized as a two-element array `[low, high]`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(into = "[BusId; 2]", from = "[BusId; 2]")]
pub struct Connection {
    low: BusId,
    high: BusId,
}

impl Connection {
    pub fn new(a: BusId, b: BusId) -> Self {
        if a <= b {
            Connection { low: a, high: b }
        } else {
            Connection { low: b, high: a }
        }
    }

    #[inline]
    pub fn low(&self) -> BusId {
        self.low
    }

    #[inline]
    pub fn high(&self) -> BusId {
        self.high
    }

    pub fn endpoints(&self) -> (BusId, BusId) {
        (self.low, self.high)
    }

    pub fn touches(&self, bus: BusId) -> bool {
        self.low == bus || self.high == bus
    }

    /// The endpoint opposite `bus`, or `None` if `bus` is not an endpoint.
    /// A self-loop returns its own bus.
    pub fn other(&self, bus: BusId) -> Option<BusId> {
        if self.low == bus {
            Some(self.high)
        } else if self.high == bus {
            Some(self.low)
        } else {
            None
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.low == self.high
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

impl From<(usize, usize)> for Connection {
    fn from((a, b): (usize, usize)) -> Self {
        Connection::new(BusId(a), BusId(b))
    }
}

impl From<[BusId; 2]> for Connection {
    fn from([a, b]: [BusId; 2]) -> Self {
        Connection::new(a, b)
    }
}

impl From<Connection> for [BusId; 2] {
    fn from(connection: Connection) -> Self {
        [connection.low, connection.high]
    }
}

/// Initial seed buses for each section, in section order.
///
/// Order matters: sections are expanded in insertion order, which fixes the
/// pass trace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionSeeds {
    entries: Vec<(String, Vec<BusId>)>,
}

impl SectionSeeds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`SectionSeeds::push`].
    pub fn with_section(
        mut self,
        name: impl Into<String>,
        seeds: impl IntoIterator<Item = BusId>,
    ) -> Self {
        self.push(name, seeds);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, seeds: impl IntoIterator<Item = BusId>) {
        self.entries
            .push((name.into(), seeds.into_iter().collect()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[BusId])> {
        self.entries
            .iter()
            .map(|(name, seeds)| (name.as_str(), seeds.as_slice()))
    }

    /// Every seed bus across all sections.
    pub fn buses(&self) -> impl Iterator<Item = BusId> + '_ {
        self.entries.iter().flat_map(|(_, seeds)| seeds.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<(String, Vec<BusId>)> {
        self.entries
    }
}

/// A named group of buses, in the order they joined the section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: String,
    pub buses: Vec<BusId>,
}

impl Section {
    pub fn contains(&self, bus: BusId) -> bool {
        self.buses.contains(&bus)
    }

    pub fn len(&self) -> usize {
        self.buses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buses.is_empty()
    }
}

/// Final partition: sections in seed order.
///
/// Serializes as a JSON object keyed by section name, keeping section order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    sections: Vec<Section>,
}

impl SectionMap {
    pub(crate) fn from_sections(sections: Vec<Section>) -> Self {
        SectionMap { sections }
    }

    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Name of the section holding `bus`, if any.
    pub fn section_of(&self, bus: BusId) -> Option<&str> {
        self.sections
            .iter()
            .find(|section| section.contains(bus))
            .map(|section| section.name.as_str())
    }

    pub fn bus_count(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Reuse the current membership as seeds for another run.
    pub fn to_seeds(&self) -> SectionSeeds {
        self.sections
            .iter()
            .fold(SectionSeeds::new(), |seeds, section| {
                seeds.with_section(section.name.clone(), section.buses.iter().copied())
            })
    }
}

impl Serialize for SectionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in &self.sections {
            map.serialize_entry(&section.name, &section.buses)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_is_unordered() {
        let a = Connection::from((7, 3));
        let b = Connection::from((3, 7));
        assert_eq!(a, b);
        assert_eq!(a.endpoints(), (BusId::new(3), BusId::new(7)));
        assert_eq!(a.to_string(), "3-7");
    }

    #[test]
    fn connection_other_endpoint() {
        let c = Connection::from((1, 2));
        assert_eq!(c.other(BusId::new(1)), Some(BusId::new(2)));
        assert_eq!(c.other(BusId::new(2)), Some(BusId::new(1)));
        assert_eq!(c.other(BusId::new(9)), None);

        let looped = Connection::from((4, 4));
        assert!(looped.is_self_loop());
        assert_eq!(looped.other(BusId::new(4)), Some(BusId::new(4)));
    }

    #[test]
    fn connection_serializes_as_pair() {
        let c = Connection::from((132, 107));
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "[107,132]");
        let back: Connection = serde_json::from_str("[132,107]").unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn section_map_serializes_in_section_order() {
        let map = SectionMap::from_sections(vec![
            Section {
                name: "2".into(),
                buses: vec![BusId::new(28)],
            },
            Section {
                name: "1".into(),
                buses: vec![BusId::new(13), BusId::new(103)],
            },
        ]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"2":[28],"1":[13,103]}"#);
        assert_eq!(map.section_of(BusId::new(103)), Some("1"));
        assert_eq!(map.bus_count(), 3);
    }

    #[test]
    fn seeds_keep_insertion_order() {
        let seeds = SectionSeeds::new()
            .with_section("b", [BusId::new(2)])
            .with_section("a", [BusId::new(1)]);
        let names: Vec<&str> = seeds.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(seeds.buses().count(), 2);
    }
}
