//! Campus walkway network model

pub mod components;
pub mod graph;

pub use components::{CampusEdge, CampusNode};
pub use graph::CampusGraph;
