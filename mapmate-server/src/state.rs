//! Shared application state

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use mapmate_core::{LocalizerRegistry, NavigationService, load_campus_graph};
use tracing::info;

use crate::error::ServerError;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    /// Swapped wholesale on reload; handlers keep their own `Arc` snapshot
    navigation: RwLock<Arc<NavigationService>>,
    localizers: LocalizerRegistry,
    graph_path: PathBuf,
}

impl AppState {
    pub fn new(
        navigation: NavigationService,
        localizers: LocalizerRegistry,
        graph_path: PathBuf,
    ) -> Self {
        Self {
            navigation: RwLock::new(Arc::new(navigation)),
            localizers,
            graph_path,
        }
    }

    /// Current navigation snapshot
    pub fn navigation(&self) -> Arc<NavigationService> {
        Arc::clone(&self.navigation.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn localizers(&self) -> &LocalizerRegistry {
        &self.localizers
    }

    /// Loads the graph file again and swaps it in.
    ///
    /// On failure the active graph stays in place.
    pub fn reload_graph(&self) -> Result<Arc<NavigationService>, ServerError> {
        let graph = load_campus_graph(&self.graph_path)?;
        let next = Arc::new(self.navigation().with_graph(Arc::new(graph)));

        *self
            .navigation
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::clone(&next);
        info!(
            "Campus graph reloaded from {}: {} nodes",
            self.graph_path.display(),
            next.graph().node_count()
        );
        Ok(next)
    }
}
