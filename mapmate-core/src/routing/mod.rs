//! Path search over the campus graph and route post-processing

mod bfs;
pub mod dijkstra;
pub mod instructions;

use serde::{Deserialize, Serialize};

use crate::{CampusGraph, NodeId};

pub use bfs::find_path;
pub use dijkstra::find_shortest_path;

/// Which search decides the route
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingStrategy {
    /// Breadth-first search; edge distances are ignored for selection
    #[default]
    FewestHops,
    /// Dijkstra over edge distances
    ShortestDistance,
}

impl RoutingStrategy {
    /// Runs the selected search. Empty path means "no path".
    pub fn search(self, graph: &CampusGraph, start: &str, goal: &str) -> Vec<NodeId> {
        match self {
            RoutingStrategy::FewestHops => find_path(graph, start, goal),
            RoutingStrategy::ShortestDistance => find_shortest_path(graph, start, goal),
        }
    }
}

/// Sums the walking distance along a path, meters.
///
/// Each consecutive pair uses the first edge joining it in either direction;
/// pairs without a connecting edge add nothing. Paths shorter than two nodes
/// have zero length.
pub fn calculate_path_distance(graph: &CampusGraph, path: &[NodeId]) -> f64 {
    path.windows(2)
        .filter_map(|pair| graph.edge_between(&pair[0], &pair[1]))
        .map(|edge| edge.distance)
        .sum()
}
