//! Data model for campus navigation
//!
//! Contains types and structures for representing the walkable campus graph.

pub mod campus;

// Re-export of the main model structure
pub use campus::{CampusEdge, CampusGraph, CampusNode};
