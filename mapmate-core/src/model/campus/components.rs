//! Campus graph components - nodes and edges

use geo::Point;
use serde::Serialize;

use crate::NodeId;

/// Campus graph node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampusNode {
    /// Stable identifier used by clients and edges
    pub id: NodeId,
    /// Planar map coordinates in meters
    pub x: f64,
    pub y: f64,
    /// Optional display label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CampusNode {
    pub fn new(id: impl Into<NodeId>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            name: None,
        }
    }

    pub fn position(&self) -> Point<f64> {
        Point::new(self.x, self.y)
    }

    /// Straight-line distance to a planar point, meters
    pub fn distance_to(&self, point: Point<f64>) -> f64 {
        (self.x - point.x()).hypot(self.y - point.y())
    }
}

/// Campus graph edge (walkway segment), undirected
#[derive(Debug, Clone, PartialEq)]
pub struct CampusEdge {
    pub from: NodeId,
    pub to: NodeId,
    /// Walking distance in meters
    pub distance: f64,
}

impl CampusEdge {
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>, distance: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            distance,
        }
    }

    /// Whether this edge joins `a` and `b` in either direction
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }

    /// The endpoint opposite to `node`, if `node` is one of the endpoints
    pub fn opposite(&self, node: &str) -> Option<&str> {
        if self.from == node {
            Some(&self.to)
        } else if self.to == node {
            Some(&self.from)
        } else {
            None
        }
    }
}
