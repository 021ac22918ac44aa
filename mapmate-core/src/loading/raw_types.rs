use serde::Deserialize;

use crate::{CampusEdge, CampusNode, DEFAULT_EDGE_DISTANCE, NodeId};

/// On-disk graph document: `{"nodes": [...], "edges": [...]}`
#[derive(Debug, Deserialize)]
pub(crate) struct RawGraph {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawNode {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawEdge {
    pub from: NodeId,
    pub to: NodeId,
    #[serde(default = "default_edge_distance")]
    pub distance: f64,
}

fn default_edge_distance() -> f64 {
    DEFAULT_EDGE_DISTANCE
}

impl From<RawNode> for CampusNode {
    fn from(raw: RawNode) -> Self {
        CampusNode {
            id: raw.id,
            x: raw.x,
            y: raw.y,
            name: raw.name,
        }
    }
}

impl From<RawEdge> for CampusEdge {
    fn from(raw: RawEdge) -> Self {
        CampusEdge {
            from: raw.from,
            to: raw.to,
            distance: raw.distance,
        }
    }
}
