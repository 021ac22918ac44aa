use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::{error, info};

use super::raw_types::RawGraph;
use crate::{CampusGraph, GraphLoadError};

/// Loads the campus graph from a JSON file
///
/// # Errors
///
/// Returns an error if the file is missing, is not valid graph JSON,
/// contains duplicate node ids or an edge with an invalid distance
pub fn load_campus_graph(path: &Path) -> Result<CampusGraph, GraphLoadError> {
    info!("Loading campus graph: {}", path.display());

    let file = File::open(path).map_err(|e| {
        GraphLoadError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to open graph file '{}': {}", path.display(), e),
        ))
    })?;
    let raw: RawGraph = serde_json::from_reader(BufReader::new(file))?;
    let graph = build_graph(raw)?;

    info!(
        "Campus graph loaded: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// Loads the campus graph, degrading to an empty graph on any failure.
///
/// With an empty graph every navigation request reports "no path", but the
/// service keeps running.
pub fn load_campus_graph_or_empty(path: &Path) -> CampusGraph {
    load_campus_graph(path).unwrap_or_else(|e| {
        error!("Campus graph unavailable, continuing with an empty graph: {e}");
        CampusGraph::empty()
    })
}

/// Parses a graph document held in memory
///
/// # Errors
///
/// Returns an error if the text is not valid graph JSON, contains
/// duplicate node ids or an edge with an invalid distance
pub fn graph_from_json_str(json: &str) -> Result<CampusGraph, GraphLoadError> {
    let raw: RawGraph = serde_json::from_str(json)?;
    build_graph(raw)
}

fn build_graph(raw: RawGraph) -> Result<CampusGraph, GraphLoadError> {
    let nodes = raw.nodes.into_iter().map(Into::into).collect();
    let edges = raw.edges.into_iter().map(Into::into).collect();
    CampusGraph::new(nodes, edges)
}
