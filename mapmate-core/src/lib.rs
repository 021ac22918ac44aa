//! Campus localization and walking navigation engine.
//!
//! The crate is split the same way a request flows through it:
//! a [`localization::LocalizerRegistry`] turns a camera image into a planar
//! position, while [`navigation::NavigationService`] snaps endpoints onto the
//! [`model::CampusGraph`], searches a path and turns it into instructions.

pub mod error;
pub mod loading;
pub mod localization;
pub mod model;
pub mod navigation;
pub mod prelude;
pub mod projection;
pub mod routing;

pub use error::{GraphLoadError, NavigationError};
pub use loading::{load_campus_graph, load_campus_graph_or_empty};
pub use localization::{
    FallbackPosition, LocalizationResult, Localizer, LocalizerError, LocalizerMatch,
    LocalizerRegistry,
};
pub use model::{CampusEdge, CampusGraph, CampusNode};
pub use navigation::{NavigationConfig, NavigationService};
pub use projection::{Coordinate, CoordinateTransform};
pub use routing::{RoutingStrategy, calculate_path_distance, find_path, find_shortest_path};

/// Identifier of a campus graph node
pub type NodeId = String;

/// Walking distance assigned to edges that carry no explicit length, meters
pub const DEFAULT_EDGE_DISTANCE: f64 = 15.0;
