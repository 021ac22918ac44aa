use thiserror::Error;

use crate::NodeId;

/// Failure to build the campus graph from storage.
///
/// Never fatal for the service: callers fall back to an empty graph.
#[derive(Error, Debug)]
pub enum GraphLoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed graph data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),
    #[error("Edge {from} - {to} has invalid distance {distance}")]
    InvalidDistance {
        from: NodeId,
        to: NodeId,
        distance: f64,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavigationError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("No path found between {from} and {to}")]
    NoPathFound { from: NodeId, to: NodeId },
    #[error("No graph node near the requested coordinate")]
    NoNearbyNode,
}
