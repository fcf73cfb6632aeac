//! Seeded flood-fill partitioning of a bus network.
//!
//! Each pass walks every section in seed order and, for every bus the
//! section held when the pass started, consumes all remaining connections
//! touching that bus and absorbs their far endpoints. Buses absorbed during
//! a pass act as roots only from the next pass on, so growth is layered like
//! a breadth-first search.
//!
//! The loop ends when the working set is empty. A pass that consumes
//! nothing while connections remain means some island has no seed, which is
//! reported as [`SectionError::UnreachableComponent`].

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{SectionError, SectionResult};
use crate::graph_utils::find_islands;
use crate::{BusId, Connection, Section, SectionMap, SectionSeeds};

/// Buses first reached from one root bus during one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discovery {
    pub section: String,
    pub root: BusId,
    /// Newly absorbed buses; empty when every far endpoint was already a member.
    pub buses: Vec<BusId>,
}

/// What a single expansion pass did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassTrace {
    pub pass: usize,
    pub consumed: usize,
    pub remaining: usize,
    pub discoveries: Vec<Discovery>,
}

/// Successful partition plus the pass-by-pass record of how it was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sectionalization {
    pub sections: SectionMap,
    pub trace: Vec<PassTrace>,
}

impl Sectionalization {
    pub fn passes(&self) -> usize {
        self.trace.len()
    }
}

/// Remaining, not yet consumed connections.
///
/// Connections keep their first-appearance order; `by_bus` lists indices in
/// ascending order so lookups return them in that same order.
struct WorkingSet {
    connections: Vec<Connection>,
    alive: Vec<bool>,
    by_bus: HashMap<BusId, Vec<usize>>,
    remaining: usize,
}

impl WorkingSet {
    fn new(
        connections: impl IntoIterator<Item = Connection>,
        boundary: &HashSet<Connection>,
    ) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        let mut by_bus: HashMap<BusId, Vec<usize>> = HashMap::new();
        for connection in connections {
            if boundary.contains(&connection) || !seen.insert(connection) {
                continue;
            }
            let idx = kept.len();
            kept.push(connection);
            by_bus.entry(connection.low()).or_default().push(idx);
            if !connection.is_self_loop() {
                by_bus.entry(connection.high()).or_default().push(idx);
            }
        }
        let remaining = kept.len();
        WorkingSet {
            alive: vec![true; kept.len()],
            connections: kept,
            by_bus,
            remaining,
        }
    }

    fn len(&self) -> usize {
        self.remaining
    }

    fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    /// Remove and return every live connection touching `bus`.
    fn take_touching(&mut self, bus: BusId) -> Vec<Connection> {
        let Some(indices) = self.by_bus.remove(&bus) else {
            return Vec::new();
        };
        let mut taken = Vec::with_capacity(indices.len());
        for idx in indices {
            if std::mem::replace(&mut self.alive[idx], false) {
                taken.push(self.connections[idx]);
            }
        }
        self.remaining -= taken.len();
        taken
    }

    fn live(&self) -> Vec<Connection> {
        self.connections
            .iter()
            .zip(&self.alive)
            .filter(|(_, alive)| **alive)
            .map(|(connection, _)| *connection)
            .collect()
    }
}

/// Partition every bus reachable from a seed into that seed's section.
///
/// `boundary` connections are dropped from `connections` before expansion
/// and are never traversed. Duplicate connections are ignored, as are
/// duplicate buses within one section's seed list.
///
/// # Errors
///
/// - [`SectionError::DuplicateSection`] if two seed entries share a name.
/// - [`SectionError::InconsistentSeeds`] if a bus seeds two sections.
/// - [`SectionError::ContestedBus`] if one section's expansion reaches a bus
///   owned by another section.
/// - [`SectionError::UnreachableComponent`] if connections remain that no
///   seed can reach.
pub fn sectionalize(
    connections: impl IntoIterator<Item = Connection>,
    boundary: impl IntoIterator<Item = Connection>,
    seeds: SectionSeeds,
) -> SectionResult<Sectionalization> {
    let (mut sections, mut owner) = seed_sections(seeds)?;
    let boundary: HashSet<Connection> = boundary.into_iter().collect();
    let mut working = WorkingSet::new(connections, &boundary);
    debug!(
        sections = sections.len(),
        connections = working.len(),
        boundary = boundary.len(),
        "starting sectionalization"
    );

    let mut trace = Vec::new();
    while !working.is_empty() {
        let pass = trace.len();
        let before = working.len();
        let mut discoveries = Vec::new();

        'sections: for idx in 0..sections.len() {
            let snapshot = sections[idx].buses.clone();
            for root in snapshot {
                let taken = working.take_touching(root);
                if taken.is_empty() {
                    continue;
                }
                let mut found = Vec::new();
                for connection in taken {
                    let far = connection.other(root).unwrap_or(root);
                    match owner.get(&far) {
                        Some(&holder) if holder == idx => {}
                        Some(&holder) => {
                            return Err(SectionError::ContestedBus {
                                bus: far,
                                owner: sections[holder].name.clone(),
                                claimant: sections[idx].name.clone(),
                            });
                        }
                        None => {
                            owner.insert(far, idx);
                            sections[idx].buses.push(far);
                            found.push(far);
                        }
                    }
                }
                trace!(pass, section = %sections[idx].name, %root, found = found.len());
                discoveries.push(Discovery {
                    section: sections[idx].name.clone(),
                    root,
                    buses: found,
                });
                if working.is_empty() {
                    break 'sections;
                }
            }
        }

        let consumed = before - working.len();
        if consumed == 0 {
            return Err(unreachable(&working));
        }
        debug!(pass, consumed, remaining = working.len(), "expansion pass finished");
        trace.push(PassTrace {
            pass,
            consumed,
            remaining: working.len(),
            discoveries,
        });
    }

    Ok(Sectionalization {
        sections: SectionMap::from_sections(sections),
        trace,
    })
}

fn seed_sections(seeds: SectionSeeds) -> SectionResult<(Vec<Section>, HashMap<BusId, usize>)> {
    let mut sections: Vec<Section> = Vec::with_capacity(seeds.len());
    let mut owner: HashMap<BusId, usize> = HashMap::new();
    for (name, buses) in seeds.into_entries() {
        if sections.iter().any(|section| section.name == name) {
            return Err(SectionError::DuplicateSection { name });
        }
        let idx = sections.len();
        let mut members = Vec::with_capacity(buses.len());
        for bus in buses {
            match owner.get(&bus) {
                Some(&holder) if holder == idx => {}
                Some(&holder) => {
                    return Err(SectionError::InconsistentSeeds {
                        bus,
                        first: sections[holder].name.clone(),
                        second: name,
                    });
                }
                None => {
                    owner.insert(bus, idx);
                    members.push(bus);
                }
            }
        }
        sections.push(Section {
            name,
            buses: members,
        });
    }
    Ok((sections, owner))
}

fn unreachable(working: &WorkingSet) -> SectionError {
    let analysis = find_islands(&working.live());
    SectionError::UnreachableComponent {
        remaining: working.len(),
        islands: analysis
            .islands
            .into_iter()
            .map(|island| island.buses)
            .collect(),
    }
}

/// Check that every endpoint of `connections` is a known bus.
///
/// Run against the bus table before [`sectionalize`]; the first offending
/// connection is reported.
pub fn check_bus_references<'a>(
    connections: impl IntoIterator<Item = &'a Connection>,
    known: &HashSet<BusId>,
) -> SectionResult<()> {
    for connection in connections {
        for bus in [connection.low(), connection.high()] {
            if !known.contains(&bus) {
                return Err(SectionError::MalformedConnection {
                    connection: *connection,
                    bus,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conns(pairs: &[(usize, usize)]) -> Vec<Connection> {
        pairs.iter().copied().map(Connection::from).collect()
    }

    fn bus(id: usize) -> BusId {
        BusId::new(id)
    }

    fn buses(ids: &[usize]) -> Vec<BusId> {
        ids.iter().copied().map(BusId::new).collect()
    }

    fn sorted(section: &Section) -> Vec<BusId> {
        let mut members = section.buses.clone();
        members.sort();
        members
    }

    fn seeds(entries: &[(&str, &[usize])]) -> SectionSeeds {
        entries.iter().fold(SectionSeeds::new(), |acc, (name, ids)| {
            acc.with_section(*name, buses(ids))
        })
    }

    #[test]
    fn two_sections_are_filled() {
        let result = sectionalize(
            conns(&[(1, 2), (2, 3), (3, 4), (5, 6)]),
            Vec::new(),
            seeds(&[("A", &[1]), ("B", &[5])]),
        )
        .unwrap();

        assert_eq!(sorted(result.sections.get("A").unwrap()), buses(&[1, 2, 3, 4]));
        assert_eq!(sorted(result.sections.get("B").unwrap()), buses(&[5, 6]));
    }

    #[test]
    fn missing_seed_is_unreachable() {
        let err = sectionalize(
            conns(&[(1, 2), (2, 3), (3, 4), (5, 6)]),
            Vec::new(),
            seeds(&[("A", &[1])]),
        )
        .unwrap_err();

        assert_eq!(
            err,
            SectionError::UnreachableComponent {
                remaining: 1,
                islands: vec![buses(&[5, 6])],
            }
        );
    }

    #[test]
    fn boundary_cuts_the_chain() {
        let err = sectionalize(
            conns(&[(1, 2), (2, 3), (3, 4), (5, 6)]),
            conns(&[(3, 2)]),
            seeds(&[("A", &[1]), ("B", &[5])]),
        )
        .unwrap_err();

        assert_eq!(
            err,
            SectionError::UnreachableComponent {
                remaining: 1,
                islands: vec![buses(&[3, 4])],
            }
        );
    }

    #[test]
    fn boundary_separates_adjacent_sections() {
        // WECC-style tie: two sections joined only through boundary lines.
        let result = sectionalize(
            conns(&[(13, 14), (14, 15), (15, 28), (28, 29), (13, 28)]),
            conns(&[(13, 28), (15, 28)]),
            seeds(&[("1", &[13]), ("2", &[28])]),
        )
        .unwrap();

        assert_eq!(sorted(result.sections.get("1").unwrap()), buses(&[13, 14, 15]));
        assert_eq!(sorted(result.sections.get("2").unwrap()), buses(&[28, 29]));
    }

    #[test]
    fn shared_seed_is_rejected_before_expansion() {
        let err = sectionalize(
            conns(&[(1, 2)]),
            Vec::new(),
            seeds(&[("A", &[1, 2]), ("B", &[2])]),
        )
        .unwrap_err();

        assert_eq!(
            err,
            SectionError::InconsistentSeeds {
                bus: bus(2),
                first: "A".into(),
                second: "B".into(),
            }
        );
    }

    #[test]
    fn duplicate_section_name_is_rejected() {
        let err = sectionalize(
            Vec::new(),
            Vec::new(),
            seeds(&[("A", &[1]), ("A", &[2])]),
        )
        .unwrap_err();
        assert_eq!(err, SectionError::DuplicateSection { name: "A".into() });
    }

    #[test]
    fn unseparated_sections_are_contested() {
        let err = sectionalize(
            conns(&[(1, 2), (2, 3)]),
            Vec::new(),
            seeds(&[("A", &[1]), ("B", &[3])]),
        )
        .unwrap_err();

        assert_eq!(
            err,
            SectionError::ContestedBus {
                bus: bus(2),
                owner: "A".into(),
                claimant: "B".into(),
            }
        );
    }

    #[test]
    fn growth_is_layered_per_pass() {
        // Chain 1-2-3-4: one new layer per pass.
        let result = sectionalize(
            conns(&[(3, 4), (2, 3), (1, 2)]),
            Vec::new(),
            seeds(&[("A", &[1])]),
        )
        .unwrap();

        assert_eq!(result.passes(), 3);
        assert_eq!(result.sections.get("A").unwrap().buses, buses(&[1, 2, 3, 4]));
        let found: Vec<Vec<BusId>> = result
            .trace
            .iter()
            .map(|pass| pass.discoveries.iter().flat_map(|d| d.buses.clone()).collect())
            .collect();
        assert_eq!(found, vec![buses(&[2]), buses(&[3]), buses(&[4])]);
    }

    #[test]
    fn trace_records_roots_in_order() {
        let result = sectionalize(
            conns(&[(1, 2), (1, 3), (2, 4), (3, 4), (10, 11)]),
            Vec::new(),
            seeds(&[("A", &[1]), ("B", &[10])]),
        )
        .unwrap();

        let first = &result.trace[0];
        assert_eq!(first.pass, 0);
        assert_eq!(first.discoveries[0].section, "A");
        assert_eq!(first.discoveries[0].root, bus(1));
        assert_eq!(first.discoveries[0].buses, buses(&[2, 3]));
        assert_eq!(first.discoveries[1].section, "B");
        assert_eq!(first.discoveries[1].buses, buses(&[11]));

        // Pass two: root 2 absorbs 4, so root 3 only closes the loop.
        let second = &result.trace[1];
        assert_eq!(second.discoveries.len(), 2);
        assert_eq!(second.discoveries[0].root, bus(2));
        assert_eq!(second.discoveries[0].buses, buses(&[4]));
        assert_eq!(second.discoveries[1].root, bus(3));
        assert!(second.discoveries[1].buses.is_empty());
        assert_eq!(second.consumed, 2);
        assert_eq!(second.remaining, 0);
    }

    #[test]
    fn cycle_edge_back_to_member_is_consumed_without_discovery() {
        let result = sectionalize(
            conns(&[(1, 2), (2, 3), (3, 1)]),
            Vec::new(),
            seeds(&[("A", &[1])]),
        )
        .unwrap();

        assert_eq!(result.passes(), 2);
        let last = result.trace.last().unwrap();
        assert_eq!(last.discoveries[0].root, bus(2));
        assert!(last.discoveries[0].buses.is_empty());
    }

    #[test]
    fn duplicates_and_reversed_pairs_collapse() {
        let result = sectionalize(
            conns(&[(1, 2), (2, 1), (1, 2)]),
            Vec::new(),
            seeds(&[("A", &[1])]),
        )
        .unwrap();
        assert_eq!(result.trace[0].consumed, 1);
        assert_eq!(result.sections.get("A").unwrap().buses, buses(&[1, 2]));
    }

    #[test]
    fn self_loop_on_member_is_consumed() {
        let result = sectionalize(
            conns(&[(1, 1), (1, 2)]),
            Vec::new(),
            seeds(&[("A", &[1])]),
        )
        .unwrap();
        assert_eq!(result.sections.get("A").unwrap().buses, buses(&[1, 2]));
    }

    #[test]
    fn duplicate_seed_within_section_is_collapsed() {
        let result = sectionalize(
            conns(&[(1, 2)]),
            Vec::new(),
            seeds(&[("A", &[1, 1])]),
        )
        .unwrap();
        assert_eq!(result.sections.get("A").unwrap().buses, buses(&[1, 2]));
    }

    #[test]
    fn empty_working_set_is_a_no_op() {
        let first = sectionalize(
            conns(&[(1, 2), (2, 3), (5, 6)]),
            Vec::new(),
            seeds(&[("A", &[1]), ("B", &[6])]),
        )
        .unwrap();

        let again = sectionalize(Vec::new(), Vec::new(), first.sections.to_seeds()).unwrap();
        assert_eq!(again.sections, first.sections);
        assert_eq!(again.passes(), 0);
    }

    #[test]
    fn sections_are_disjoint_and_complete() {
        // Three sections on a ring-of-rings, cut by boundary ties.
        let mut pairs = Vec::new();
        for base in [0usize, 100, 200] {
            for i in 0..10 {
                pairs.push((base + i, base + (i + 1) % 10));
                pairs.push((base + i, base + (i + 3) % 10));
            }
        }
        let ties = [(9, 100), (109, 200), (209, 0)];
        pairs.extend(ties);

        let result = sectionalize(
            conns(&pairs),
            conns(&ties),
            seeds(&[("north", &[0]), ("east", &[105]), ("south", &[200, 207])]),
        )
        .unwrap();

        let mut all = HashSet::new();
        for section in result.sections.iter() {
            assert_eq!(section.len(), 10);
            for member in &section.buses {
                assert!(all.insert(*member), "bus {member} in two sections");
            }
        }
        assert_eq!(all.len(), 30);
        assert_eq!(result.sections.section_of(bus(9)), Some("north"));
        assert_eq!(result.sections.section_of(bus(100)), Some("east"));
    }

    #[test]
    fn removals_and_passes_are_bounded() {
        let pairs: Vec<(usize, usize)> = (0..50).map(|i| (i, i + 1)).collect();
        let result = sectionalize(conns(&pairs), Vec::new(), seeds(&[("A", &[0])])).unwrap();

        let removed: usize = result.trace.iter().map(|pass| pass.consumed).sum();
        assert_eq!(removed, pairs.len());
        assert!(result.passes() <= 51);
    }

    #[test]
    fn seeds_without_connections_survive() {
        let result = sectionalize(
            conns(&[(1, 2)]),
            Vec::new(),
            seeds(&[("A", &[1]), ("empty", &[]), ("lonely", &[99])]),
        )
        .unwrap();
        assert!(result.sections.get("empty").unwrap().is_empty());
        assert_eq!(result.sections.get("lonely").unwrap().buses, buses(&[99]));
    }

    #[test]
    fn bus_references_are_checked() {
        let known: HashSet<BusId> = buses(&[1, 2, 3]).into_iter().collect();
        assert!(check_bus_references(&conns(&[(1, 2), (2, 3)]), &known).is_ok());

        let err = check_bus_references(&conns(&[(1, 2), (3, 7)]), &known).unwrap_err();
        assert_eq!(
            err,
            SectionError::MalformedConnection {
                connection: Connection::from((3, 7)),
                bus: bus(7),
            }
        );
    }
}
