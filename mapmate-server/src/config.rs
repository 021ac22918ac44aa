//! Configuration loading for the MapMate server

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use mapmate_core::projection::CAMPUS_ORIGIN;
use mapmate_core::{Coordinate, FallbackPosition, NavigationConfig};
use serde::Deserialize;

use crate::error::ServerError;

/// Main configuration structure
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Listen address (default: 0.0.0.0:8000)
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,

    /// Campus graph JSON file
    #[serde(default = "default_graph_path")]
    pub graph_path: PathBuf,

    /// GPS reference point of the planar map frame
    #[serde(default = "default_origin")]
    pub origin: Coordinate,

    #[serde(default)]
    pub navigation: NavigationConfig,

    /// Reported when no localizer recognizes an image
    #[serde(default)]
    pub fallback: FallbackPosition,

    /// Localizers in priority order
    #[serde(default)]
    pub localizers: Vec<LocalizerConfig>,

    #[serde(default)]
    pub http: HttpConfig,
}

/// HTTP transport limits
#[derive(Clone, Debug, Deserialize)]
pub struct HttpConfig {
    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Requests processed at once (default: 256)
    #[serde(default = "default_concurrency_limit")]
    pub concurrency_limit: usize,

    /// Largest accepted request body; base64 photos are big (default: 16 MiB)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Reference-image localizer for one building
#[derive(Clone, Debug, Deserialize)]
pub struct LocalizerConfig {
    /// Building name reported on a match
    pub name: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub references: Vec<ReferenceImage>,
}

/// Known photo and the position it was taken from
#[derive(Clone, Debug, Deserialize)]
pub struct ReferenceImage {
    /// Hex SHA-256 of the encoded image bytes
    pub sha256: String,
    #[serde(default)]
    pub node_id: Option<String>,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub confidence: Option<f64>,
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}
fn default_graph_path() -> PathBuf {
    PathBuf::from("data/campus_graph.json")
}
fn default_origin() -> Coordinate {
    CAMPUS_ORIGIN
}
fn default_request_timeout() -> u64 {
    30
}
fn default_concurrency_limit() -> usize {
    256
}
fn default_max_body_bytes() -> usize {
    16 * 1024 * 1024
}
fn default_enabled() -> bool {
    true
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            request_timeout_secs: default_request_timeout(),
            concurrency_limit: default_concurrency_limit(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            graph_path: default_graph_path(),
            origin: default_origin(),
            navigation: NavigationConfig::default(),
            fallback: FallbackPosition::default(),
            localizers: Vec::new(),
            http: HttpConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ServerError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ServerError::Config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        let config: ServerConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ServerError> {
        let speed = self.navigation.walking_speed_m_per_min;
        if !(speed.is_finite() && speed > 0.0) {
            return Err(ServerError::Config(format!(
                "navigation.walking_speed_m_per_min must be positive, got {speed}"
            )));
        }
        if self.http.request_timeout_secs == 0 {
            return Err(ServerError::Config(
                "http.request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.http.concurrency_limit == 0 {
            return Err(ServerError::Config(
                "http.concurrency_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
