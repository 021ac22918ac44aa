//! Route orchestration: endpoint snapping, path search, distance, time
//! estimate and instructions.

use std::sync::Arc;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::routing::instructions::generate_instructions;
use crate::{
    CampusGraph, Coordinate, CoordinateTransform, NavigationError, NodeId, RoutingStrategy,
    calculate_path_distance,
};

/// Tunables shared by every routing entry point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Walking speed used for time estimates, meters per minute
    pub walking_speed_m_per_min: f64,
    pub strategy: RoutingStrategy,
    /// Reject GPS endpoints farther than this from any graph node, meters
    pub max_snap_distance_m: Option<f64>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            walking_speed_m_per_min: 60.0,
            strategy: RoutingStrategy::default(),
            max_snap_distance_m: None,
        }
    }
}

/// Route between two graph nodes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub path: Vec<NodeId>,
    pub distance_meters: f64,
    pub estimated_time_minutes: f64,
    pub instructions: Vec<String>,
}

/// One waypoint of a GPS route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionStep {
    pub lat: f64,
    pub lng: f64,
    pub instruction: String,
}

/// Route between two GPS coordinates, expressed back in GPS
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Directions {
    pub route: Vec<DirectionStep>,
    pub distance_meters: f64,
    pub estimated_time_minutes: f64,
}

/// Planar position of a GPS fix snapped to the graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub node_id: NodeId,
    /// Straight-line distance from the fix to `node_id`, meters
    pub distance_to_node: f64,
}

#[derive(Debug, Clone)]
pub struct NavigationService {
    graph: Arc<CampusGraph>,
    transform: CoordinateTransform,
    config: NavigationConfig,
}

impl NavigationService {
    pub fn new(
        graph: Arc<CampusGraph>,
        transform: CoordinateTransform,
        config: NavigationConfig,
    ) -> Self {
        info!(
            "Navigation service ready: {} nodes, {:?} routing at {} m/min",
            graph.node_count(),
            config.strategy,
            config.walking_speed_m_per_min
        );
        Self {
            graph,
            transform,
            config,
        }
    }

    pub fn graph(&self) -> &CampusGraph {
        &self.graph
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Same service over a freshly loaded graph
    pub fn with_graph(&self, graph: Arc<CampusGraph>) -> Self {
        Self::new(graph, self.transform, self.config.clone())
    }

    pub fn estimated_minutes(&self, distance_meters: f64) -> f64 {
        distance_meters / self.config.walking_speed_m_per_min
    }

    /// Routes between two node ids
    ///
    /// # Errors
    ///
    /// [`NavigationError::NodeNotFound`] when either id is unknown,
    /// [`NavigationError::NoPathFound`] when they are not connected
    pub fn navigate(&self, start: &str, destination: &str) -> Result<Route, NavigationError> {
        for id in [start, destination] {
            if !self.graph.contains(id) {
                return Err(NavigationError::NodeNotFound(id.to_string()));
            }
        }

        let path = self.config.strategy.search(&self.graph, start, destination);
        if path.is_empty() {
            return Err(NavigationError::NoPathFound {
                from: start.to_string(),
                to: destination.to_string(),
            });
        }

        let distance_meters = calculate_path_distance(&self.graph, &path);
        info!(
            "Route {start} -> {destination}: {} nodes, {distance_meters:.1} m",
            path.len()
        );

        Ok(Route {
            instructions: generate_instructions(&path),
            estimated_time_minutes: self.estimated_minutes(distance_meters),
            distance_meters,
            path,
        })
    }

    /// Routes between two GPS coordinates via their nearest graph nodes
    ///
    /// # Errors
    ///
    /// [`NavigationError::NoNearbyNode`] when an endpoint cannot be snapped,
    /// [`NavigationError::NoPathFound`] when the snapped nodes are not connected
    pub fn directions(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<Directions, NavigationError> {
        let start = self.locate(from)?;
        let goal = self.locate(to)?;
        debug!("Snapped endpoints to {} and {}", start.node_id, goal.node_id);

        let route = self.navigate(&start.node_id, &goal.node_id)?;

        // Instructions line up one-to-one with path nodes
        let steps = route
            .path
            .iter()
            .zip(route.instructions)
            .filter_map(|(id, instruction)| {
                let node = self.graph.node(id)?;
                let (lat, lng) = self.transform.to_geo(node.x, node.y);
                Some(DirectionStep {
                    lat,
                    lng,
                    instruction,
                })
            })
            .collect();

        Ok(Directions {
            route: steps,
            distance_meters: route.distance_meters,
            estimated_time_minutes: route.estimated_time_minutes,
        })
    }

    /// Converts a GPS fix into map coordinates and its nearest graph node
    ///
    /// # Errors
    ///
    /// [`NavigationError::NoNearbyNode`] on an empty graph or when the
    /// nearest node is beyond `max_snap_distance_m`
    pub fn locate(&self, coord: Coordinate) -> Result<Position, NavigationError> {
        let point = self.transform.project(coord);
        let (node, distance) = self
            .graph
            .nearest_node(point)
            .ok_or(NavigationError::NoNearbyNode)?;

        if let Some(max) = self.config.max_snap_distance_m {
            if distance > max {
                debug!(
                    "Nearest node {} is {distance:.1} m away (max: {max} m)",
                    node.id
                );
                return Err(NavigationError::NoNearbyNode);
            }
        }

        Ok(Position {
            x: point.x(),
            y: point.y(),
            node_id: node.id.clone(),
            distance_to_node: distance,
        })
    }
}
