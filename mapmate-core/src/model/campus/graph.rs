//! Immutable campus graph with adjacency index and nearest-node lookup

use geo::Point;
use hashbrown::HashMap;
use log::warn;

use super::components::{CampusEdge, CampusNode};
use crate::{GraphLoadError, NodeId};

/// Walkable campus graph.
///
/// Built once and never mutated afterwards, so a single instance can be
/// shared between concurrent requests behind an `Arc`. Reloading means
/// constructing a new graph and swapping the pointer.
#[derive(Debug, Clone, Default)]
pub struct CampusGraph {
    /// Nodes in source order; nearest-node ties resolve to the earliest one
    nodes: Vec<CampusNode>,
    node_index: HashMap<NodeId, usize>,
    edges: Vec<CampusEdge>,
    /// Incident edge indices per node, in edge-list order for both directions
    adjacency: HashMap<NodeId, Vec<usize>>,
}

impl CampusGraph {
    /// Graph without nodes or edges, used when loading fails
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the graph and its adjacency index in O(N + E)
    ///
    /// # Errors
    ///
    /// Returns [`GraphLoadError::DuplicateNode`] when two nodes share an id,
    /// [`GraphLoadError::InvalidDistance`] when an edge length is negative or
    /// not finite
    pub fn new(nodes: Vec<CampusNode>, edges: Vec<CampusEdge>) -> Result<Self, GraphLoadError> {
        let mut node_index = HashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            if node_index.insert(node.id.clone(), idx).is_some() {
                return Err(GraphLoadError::DuplicateNode(node.id.clone()));
            }
        }

        let mut adjacency: HashMap<NodeId, Vec<usize>> = HashMap::with_capacity(nodes.len());
        let mut dangling = 0usize;
        for (idx, edge) in edges.iter().enumerate() {
            // Dijkstra's settled check needs non-negative weights
            if !edge.distance.is_finite() || edge.distance < 0.0 {
                return Err(GraphLoadError::InvalidDistance {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    distance: edge.distance,
                });
            }
            if !node_index.contains_key(&edge.from) || !node_index.contains_key(&edge.to) {
                dangling += 1;
            }
            adjacency.entry(edge.from.clone()).or_default().push(idx);
            if edge.to != edge.from {
                adjacency.entry(edge.to.clone()).or_default().push(idx);
            }
        }

        if dangling > 0 {
            warn!("{dangling} edges reference node ids that are not present in the node list");
        }

        Ok(Self {
            nodes,
            node_index,
            edges,
            adjacency,
        })
    }

    pub fn node(&self, id: &str) -> Option<&CampusNode> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// All nodes in stored order
    pub fn nodes(&self) -> &[CampusNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[CampusEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edges touching `id` paired with the node on the other side
    pub fn incident_edges<'a>(
        &'a self,
        id: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a CampusEdge)> + 'a {
        self.adjacency
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter_map(move |&idx| {
                let edge = &self.edges[idx];
                edge.opposite(id).map(|other| (other, edge))
            })
    }

    /// Neighbouring node ids, both edge directions, in edge-list order
    pub fn neighbors<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.incident_edges(id).map(|(other, _)| other)
    }

    /// First edge joining `a` and `b` in either direction
    pub fn edge_between(&self, a: &str, b: &str) -> Option<&CampusEdge> {
        self.adjacency
            .get(a)?
            .iter()
            .map(|&idx| &self.edges[idx])
            .find(|edge| edge.connects(a, b))
    }

    /// Closest node to a planar point together with its distance in meters.
    ///
    /// Linear scan; on equal distance the node stored first wins.
    /// Returns `None` for an empty graph.
    pub fn nearest_node(&self, point: Point<f64>) -> Option<(&CampusNode, f64)> {
        let mut best: Option<(&CampusNode, f64)> = None;
        for node in &self.nodes {
            let distance = node.distance_to(point);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((node, distance)),
            }
        }
        best
    }
}
