mod state;

use std::collections::BinaryHeap;

use hashbrown::HashMap;
use log::{debug, trace};

use crate::{CampusGraph, NodeId};
use state::State;

/// Dijkstra's algorithm over edge walking distances.
///
/// Returns the path with the smallest total distance, or an empty path when
/// either endpoint is not a graph node or no connection exists. Among equally
/// long paths the one discovered first (edge-list order) wins.
pub fn find_shortest_path(graph: &CampusGraph, start: &str, goal: &str) -> Vec<NodeId> {
    if !graph.contains(start) || !graph.contains(goal) {
        debug!("Node {start} or {goal} not found in graph");
        return Vec::new();
    }

    let mut space = SearchSpace::default();
    let start_idx = space.intern(start);
    let goal_idx = space.intern(goal);

    let mut heap = BinaryHeap::new();
    let mut seq = 0usize;
    space.distances[start_idx] = 0.0;
    heap.push(State {
        cost: 0.0,
        seq,
        node: start_idx,
    });

    while let Some(State { cost, node, .. }) = heap.pop() {
        // Skip if we've already settled this node with a better cost
        if space.settled[node] {
            continue;
        }
        space.settled[node] = true;

        if node == goal_idx {
            break;
        }

        let current = space.ids[node];
        for (neighbor, edge) in graph.incident_edges(current) {
            let next = space.intern(neighbor);
            let next_cost = cost + edge.distance;
            if next_cost < space.distances[next] {
                space.distances[next] = next_cost;
                space.predecessors[next] = Some(node);
                seq += 1;
                heap.push(State {
                    cost: next_cost,
                    seq,
                    node: next,
                });
            }
        }
    }

    if !space.settled[goal_idx] {
        debug!("No path found between {start} and {goal}");
        return Vec::new();
    }

    let mut path = vec![space.ids[goal_idx].to_string()];
    let mut current = goal_idx;
    while let Some(prev) = space.predecessors[current] {
        path.push(space.ids[prev].to_string());
        current = prev;
    }
    path.reverse();

    trace!(
        "Shortest path found ({:.1} m): {}",
        space.distances[goal_idx],
        path.join(" -> ")
    );
    path
}

/// Dense per-search indices for the node ids reached so far
#[derive(Default)]
struct SearchSpace<'a> {
    ids: Vec<&'a str>,
    index: HashMap<&'a str, usize>,
    distances: Vec<f64>,
    predecessors: Vec<Option<usize>>,
    settled: Vec<bool>,
}

impl<'a> SearchSpace<'a> {
    fn intern(&mut self, id: &'a str) -> usize {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.ids.len();
        self.ids.push(id);
        self.index.insert(id, idx);
        self.distances.push(f64::INFINITY);
        self.predecessors.push(None);
        self.settled.push(false);
        idx
    }
}
