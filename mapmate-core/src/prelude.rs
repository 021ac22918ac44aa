pub use crate::DEFAULT_EDGE_DISTANCE;

// Re-export key components
pub use crate::loading::{load_campus_graph, load_campus_graph_or_empty};
pub use crate::localization::{
    FallbackPosition, LocalizationResult, Localizer, LocalizerError, LocalizerMatch,
    LocalizerRegistry,
};
pub use crate::model::{CampusEdge, CampusGraph, CampusNode};
pub use crate::navigation::{
    DirectionStep, Directions, NavigationConfig, NavigationService, Position, Route,
};
pub use crate::projection::{Coordinate, CoordinateTransform};
pub use crate::routing::{
    RoutingStrategy, calculate_path_distance, find_path, find_shortest_path,
    instructions::generate_instructions,
};

// Error types
pub use crate::error::{GraphLoadError, NavigationError};

// Core types for the campus graph
pub use crate::NodeId;
