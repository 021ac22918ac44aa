use std::collections::VecDeque;

use hashbrown::HashMap;
use log::{debug, trace};

use crate::{CampusGraph, NodeId};

/// Breadth-first search for the path with the fewest hops.
///
/// Neighbours are expanded in edge-list order, which fixes tie-breaking
/// between equally short candidates. Edge distances play no part in the
/// choice. Returns an empty path when either endpoint is not a graph node
/// or the two are disconnected.
pub fn find_path(graph: &CampusGraph, start: &str, goal: &str) -> Vec<NodeId> {
    if !graph.contains(start) || !graph.contains(goal) {
        debug!("Node {start} or {goal} not found in graph");
        return Vec::new();
    }

    let mut queue = VecDeque::new();
    // Visited set doubling as predecessor map
    let mut predecessors: HashMap<&str, Option<&str>> = HashMap::new();

    queue.push_back(start);
    predecessors.insert(start, None);

    while let Some(current) = queue.pop_front() {
        if current == goal {
            let path = reconstruct_path(&predecessors, goal);
            trace!("Path found: {}", path.join(" -> "));
            return path;
        }

        for neighbor in graph.neighbors(current) {
            if !predecessors.contains_key(neighbor) {
                predecessors.insert(neighbor, Some(current));
                queue.push_back(neighbor);
            }
        }
    }

    debug!("No path found between {start} and {goal}");
    Vec::new()
}

fn reconstruct_path(predecessors: &HashMap<&str, Option<&str>>, goal: &str) -> Vec<NodeId> {
    let mut path = vec![goal.to_string()];
    let mut current = goal;
    while let Some(&Some(prev)) = predecessors.get(current) {
        path.push(prev.to_string());
        current = prev;
    }
    path.reverse();
    path
}
