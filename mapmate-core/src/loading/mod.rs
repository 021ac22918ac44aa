//! This module is responsible for reading the campus graph from storage
//! and building the immutable [`crate::CampusGraph`].

mod builder;
mod raw_types;

pub use builder::{graph_from_json_str, load_campus_graph, load_campus_graph_or_empty};
