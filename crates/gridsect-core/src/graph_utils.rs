use crate::{BusId, Connection};
use petgraph::graphmap::UnGraphMap;
use serde::Serialize;
use std::collections::{HashSet, VecDeque};

/// Summary statistics for a connection list (degree spread and component count).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub bus_count: usize,
    pub connection_count: usize,
    pub connected_components: usize,
    pub min_degree: usize,
    pub avg_degree: f64,
    pub max_degree: usize,
}

/// One connected component of the bus graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Island {
    pub island_id: usize,
    /// Member buses, ascending.
    pub buses: Vec<BusId>,
}

/// Islands numbered in order of their smallest bus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IslandAnalysis {
    pub islands: Vec<Island>,
}

impl IslandAnalysis {
    pub fn island_of(&self, bus: BusId) -> Option<usize> {
        self.islands
            .iter()
            .find(|island| island.buses.binary_search(&bus).is_ok())
            .map(|island| island.island_id)
    }

    pub fn len(&self) -> usize {
        self.islands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.islands.is_empty()
    }
}

fn build_graph(connections: &[Connection]) -> UnGraphMap<BusId, ()> {
    let mut graph = UnGraphMap::new();
    for connection in connections {
        graph.add_edge(connection.low(), connection.high(), ());
    }
    graph
}

/// Degree and component statistics; parallel connections count once.
pub fn graph_stats(connections: &[Connection]) -> GraphStats {
    let graph = build_graph(connections);
    let degrees: Vec<usize> = graph
        .nodes()
        .map(|node| graph.neighbors(node).count())
        .collect();
    let bus_count = degrees.len();
    let avg_degree = if bus_count == 0 {
        0.0
    } else {
        degrees.iter().sum::<usize>() as f64 / bus_count as f64
    };
    GraphStats {
        bus_count,
        connection_count: graph.edge_count(),
        connected_components: find_islands(connections).len(),
        min_degree: degrees.iter().copied().min().unwrap_or(0),
        avg_degree,
        max_degree: degrees.iter().copied().max().unwrap_or(0),
    }
}

/// Labels connected components (breadth-first search) of the graph induced by `connections`.
pub fn find_islands(connections: &[Connection]) -> IslandAnalysis {
    let graph = build_graph(connections);
    let mut starts: Vec<BusId> = graph.nodes().collect();
    starts.sort();

    let mut visited = HashSet::new();
    let mut islands = Vec::new();
    for start in starts {
        if visited.contains(&start) {
            continue;
        }
        let mut queue = VecDeque::new();
        queue.push_back(start);
        let mut members = Vec::new();
        while let Some(bus) = queue.pop_front() {
            if !visited.insert(bus) {
                continue;
            }
            members.push(bus);
            for neighbor in graph.neighbors(bus) {
                if !visited.contains(&neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        members.sort();
        islands.push(Island {
            island_id: islands.len(),
            buses: members,
        });
    }
    IslandAnalysis { islands }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conns(pairs: &[(usize, usize)]) -> Vec<Connection> {
        pairs.iter().copied().map(Connection::from).collect()
    }

    #[test]
    fn islands_are_ordered_by_smallest_bus() {
        let analysis = find_islands(&conns(&[(9, 8), (1, 3), (3, 2), (5, 4)]));
        let buses: Vec<Vec<usize>> = analysis
            .islands
            .iter()
            .map(|island| island.buses.iter().map(BusId::value).collect())
            .collect();
        assert_eq!(buses, vec![vec![1, 2, 3], vec![4, 5], vec![8, 9]]);
        assert_eq!(analysis.island_of(BusId::new(2)), Some(0));
        assert_eq!(analysis.island_of(BusId::new(9)), Some(2));
        assert_eq!(analysis.island_of(BusId::new(7)), None);
    }

    #[test]
    fn no_connections_no_islands() {
        assert!(find_islands(&[]).is_empty());
        let stats = graph_stats(&[]);
        assert_eq!(stats.bus_count, 0);
        assert_eq!(stats.avg_degree, 0.0);
    }

    #[test]
    fn stats_ignore_parallel_connections() {
        let stats = graph_stats(&conns(&[(1, 2), (2, 1), (2, 3), (7, 8)]));
        assert_eq!(stats.bus_count, 5);
        assert_eq!(stats.connection_count, 3);
        assert_eq!(stats.connected_components, 2);
        assert_eq!(stats.min_degree, 1);
        assert_eq!(stats.max_degree, 2);
        assert!((stats.avg_degree - 1.2).abs() < 1e-9);
    }
}
