//! HTTP API handlers with Axum

use std::time::Duration;

use axum::{
    BoxError, Json, Router,
    error_handling::HandleErrorLayer,
    extract::{DefaultBodyLimit, Path, State},
    http::HeaderValue,
    routing::{get, post},
};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use mapmate_core::navigation::{Directions, Position, Route};
use mapmate_core::{CampusNode, Coordinate, LocalizationResult, NavigationError};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::config::HttpConfig;
use crate::error::ApiError;
use crate::state::SharedState;

/// Build the Axum router
///
/// `Router::layer` wraps every route separately, so the concurrency limit
/// uses one semaphore shared by all of them.
pub fn build_router(state: SharedState, http: &HttpConfig) -> Router {
    Router::new()
        .route("/localize", post(localize))
        .route("/locate", post(locate))
        .route("/navigate", post(navigate))
        .route("/get-directions", post(get_directions))
        .route("/nodes", get(list_nodes))
        .route("/nodes/{id}", get(node_info))
        .route("/health", get(health))
        .route("/admin/reload", post(reload_graph))
        .layer(DefaultBodyLimit::max(http.max_body_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(Duration::from_secs(http.request_timeout_secs))
                .layer(GlobalConcurrencyLimitLayer::new(http.concurrency_limit)),
        )
        .layer(cors_layer(&http.cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Internal(format!("Unhandled middleware error: {err}"))
    }
}

// ============ Localization ============

#[derive(Debug, Deserialize)]
pub struct LocalizeRequest {
    /// Base64 image, optionally as a `data:` URL
    image: String,
}

#[derive(Debug, Serialize)]
pub struct LocalizeResponse {
    pub success: bool,
    pub building: String,
    pub node_id: Option<String>,
    pub x: f64,
    pub y: f64,
    pub confidence: f64,
    pub location_name: String,
    pub method: String,
}

impl From<LocalizationResult> for LocalizeResponse {
    fn from(result: LocalizationResult) -> Self {
        let location_name = if result.success {
            result.building.clone()
        } else {
            "Unknown Location".to_string()
        };
        Self {
            success: result.success,
            building: result.building,
            node_id: result.node_id,
            x: result.x,
            y: result.y,
            confidence: result.confidence,
            location_name,
            method: result.method,
        }
    }
}

/// Strips an optional `data:image/...;base64,` prefix and decodes.
///
/// Line breaks and other ASCII whitespace are dropped first, so
/// MIME-wrapped payloads are accepted.
fn decode_image(encoded: &str) -> Result<Vec<u8>, ApiError> {
    let payload: String = encoded
        .split_once(',')
        .map_or(encoded, |(_, data)| data)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    BASE64
        .decode(payload)
        .map_err(|e| ApiError::BadRequest(format!("Invalid base64 image: {e}")))
}

async fn localize(
    State(state): State<SharedState>,
    Json(req): Json<LocalizeRequest>,
) -> Result<Json<LocalizeResponse>, ApiError> {
    let image = decode_image(&req.image)?;
    debug!("Localization request with {} image bytes", image.len());

    // Localizers may do heavy image work; keep it off the async workers
    let result = tokio::task::spawn_blocking(move || {
        state.localizers().detect_and_localize(&image)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Localization task failed: {e}")))?;

    Ok(Json(result.into()))
}

async fn locate(
    State(state): State<SharedState>,
    Json(coord): Json<Coordinate>,
) -> Result<Json<Position>, ApiError> {
    let position = state
        .navigation()
        .locate(coord)
        .map_err(ApiError::bad_request)?;
    Ok(Json(position))
}

// ============ Navigation ============

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    start_node: String,
    destination: String,
}

#[derive(Debug, Serialize)]
pub struct NavigateResponse {
    #[serde(flatten)]
    pub route: Route,
    pub success: bool,
}

async fn navigate(
    State(state): State<SharedState>,
    Json(req): Json<NavigateRequest>,
) -> Result<Json<NavigateResponse>, ApiError> {
    let route = state.navigation().navigate(&req.start_node, &req.destination)?;
    Ok(Json(NavigateResponse {
        route,
        success: true,
    }))
}

#[derive(Debug, Deserialize)]
pub struct DirectionsRequest {
    from_coord: Coordinate,
    to_coord: Coordinate,
}

async fn get_directions(
    State(state): State<SharedState>,
    Json(req): Json<DirectionsRequest>,
) -> Result<Json<Directions>, ApiError> {
    let directions = state
        .navigation()
        .directions(req.from_coord, req.to_coord)
        .map_err(ApiError::bad_request)?;
    Ok(Json(directions))
}

// ============ Graph inspection ============

async fn list_nodes(State(state): State<SharedState>) -> Json<Vec<CampusNode>> {
    Json(state.navigation().graph().nodes().to_vec())
}

async fn node_info(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<CampusNode>, ApiError> {
    let navigation = state.navigation();
    let node = navigation
        .graph()
        .node(&id)
        .cloned()
        .ok_or(NavigationError::NodeNotFound(id))?;
    Ok(Json(node))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub graph_loaded: bool,
    pub nodes_loaded: usize,
    pub edges_loaded: usize,
    pub localizers: Vec<String>,
    pub localization_available: bool,
}

async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let navigation = state.navigation();
    let graph = navigation.graph();
    let localizers: Vec<String> = state
        .localizers()
        .available()
        .into_iter()
        .map(str::to_string)
        .collect();

    Json(HealthResponse {
        status: if graph.is_empty() { "degraded" } else { "healthy" },
        graph_loaded: !graph.is_empty(),
        nodes_loaded: graph.node_count(),
        edges_loaded: graph.edge_count(),
        localization_available: !localizers.is_empty(),
        localizers,
    })
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub nodes_loaded: usize,
    pub edges_loaded: usize,
}

async fn reload_graph(State(state): State<SharedState>) -> Result<Json<ReloadResponse>, ApiError> {
    let navigation = tokio::task::spawn_blocking(move || state.reload_graph())
        .await
        .map_err(|e| ApiError::Internal(format!("Reload task failed: {e}")))??;

    Ok(Json(ReloadResponse {
        nodes_loaded: navigation.graph().node_count(),
        edges_loaded: navigation.graph().edge_count(),
    }))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use mapmate_core::loading::graph_from_json_str;
    use mapmate_core::{CoordinateTransform, FallbackPosition, NavigationConfig, NavigationService};
    use serde_json::{Value, json};
    use sha2::{Digest, Sha256};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{LocalizerConfig, ReferenceImage};
    use crate::localizers::build_registry;
    use crate::state::AppState;

    const GRAPH: &str = r#"{
        "nodes": [
            {"id": "A", "x": 0.0, "y": 0.0, "name": "Gate"},
            {"id": "B", "x": 10.0, "y": 0.0},
            {"id": "C", "x": 15.0, "y": 0.0},
            {"id": "D", "x": 900.0, "y": 900.0}
        ],
        "edges": [
            {"from": "A", "to": "B", "distance": 10.0},
            {"from": "B", "to": "C", "distance": 5.0}
        ]
    }"#;

    const LIBRARY_PHOTO: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3, 4];

    fn app_with(graph_json: &str, graph_path: PathBuf) -> Router {
        let graph = graph_from_json_str(graph_json).unwrap();
        let navigation = NavigationService::new(
            Arc::new(graph),
            CoordinateTransform::default(),
            NavigationConfig::default(),
        );
        let localizers = build_registry(
            FallbackPosition::default(),
            &[LocalizerConfig {
                name: "Library".to_string(),
                enabled: true,
                references: vec![ReferenceImage {
                    sha256: format!("{:x}", Sha256::digest(LIBRARY_PHOTO)),
                    node_id: Some("N64".to_string()),
                    x: 1240.0,
                    y: 780.0,
                    confidence: Some(0.9),
                }],
            }],
        );
        let state = Arc::new(AppState::new(navigation, localizers, graph_path));
        build_router(state, &HttpConfig::default())
    }

    fn app() -> Router {
        app_with(GRAPH, PathBuf::from("/nonexistent/graph.json"))
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_navigate_success() {
        let (status, body) = send(
            app(),
            "POST",
            "/navigate",
            Some(json!({"start_node": "A", "destination": "C"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["path"], json!(["A", "B", "C"]));
        assert_eq!(body["distance_meters"], json!(15.0));
        assert_eq!(body["estimated_time_minutes"], json!(0.25));
        assert_eq!(
            body["instructions"],
            json!(["Start at A", "Proceed to B", "Arrived at C"])
        );
        assert_eq!(body["success"], json!(true));
    }

    #[tokio::test]
    async fn test_navigate_unknown_node_and_no_path_are_404() {
        let (status, body) = send(
            app(),
            "POST",
            "/navigate",
            Some(json!({"start_node": "A", "destination": "Z"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], json!("Node not found: Z"));

        let (status, body) = send(
            app(),
            "POST",
            "/navigate",
            Some(json!({"start_node": "A", "destination": "D"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], json!("No path found between A and D"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let (status, _) = send(app(), "POST", "/navigate", Some(json!({"start": "A"}))).await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_get_directions() {
        let transform = CoordinateTransform::default();
        let (from_lat, from_lng) = transform.to_geo(1.0, 0.0);
        let (to_lat, to_lng) = transform.to_geo(14.0, 0.0);

        let (status, body) = send(
            app(),
            "POST",
            "/get-directions",
            Some(json!({
                "from_coord": {"lat": from_lat, "lng": from_lng},
                "to_coord": {"lat": to_lat, "lng": to_lng}
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["route"].as_array().unwrap().len(), 3);
        assert_eq!(body["route"][0]["instruction"], json!("Start at A"));
        assert_eq!(body["route"][2]["instruction"], json!("Arrived at C"));
        assert_eq!(body["distance_meters"], json!(15.0));
    }

    #[tokio::test]
    async fn test_get_directions_without_path_is_400() {
        let transform = CoordinateTransform::default();
        let (to_lat, to_lng) = transform.to_geo(900.0, 900.0);

        let (status, _) = send(
            app(),
            "POST",
            "/get-directions",
            Some(json!({
                "from_coord": {"lat": transform.origin.lat, "lng": transform.origin.lng},
                "to_coord": {"lat": to_lat, "lng": to_lng}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_localize_known_photo() {
        let image = format!("data:image/jpeg;base64,{}", BASE64.encode(LIBRARY_PHOTO));
        let (status, body) = send(app(), "POST", "/localize", Some(json!({"image": image}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["building"], json!("Library"));
        assert_eq!(body["location_name"], json!("Library"));
        assert_eq!(body["node_id"], json!("N64"));
        assert_eq!(body["confidence"], json!(0.9));
        assert_eq!(body["method"], json!("Library_CV"));
    }

    #[tokio::test]
    async fn test_localize_unknown_photo_falls_back() {
        let image = BASE64.encode([0xFF, 0xD8, 0xFF, 0x00]);
        let (status, body) = send(app(), "POST", "/localize", Some(json!({"image": image}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["building"], json!("Unknown"));
        assert_eq!(body["location_name"], json!("Unknown Location"));
        assert_eq!(body["node_id"], Value::Null);
        assert_eq!(body["x"], json!(1200.0));
        assert_eq!(body["y"], json!(200.0));
        assert_eq!(body["confidence"], json!(0.0));
    }

    #[tokio::test]
    async fn test_localize_rejects_invalid_base64() {
        let (status, body) = send(
            app(),
            "POST",
            "/localize",
            Some(json!({"image": "not base64!!"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid base64 image"));
    }

    #[test]
    fn test_decode_image_accepts_line_wrapped_payload() {
        let image: Vec<u8> = (0..=255u8).cycle().take(300).collect();
        let encoded = BASE64.encode(&image);
        let wrapped = encoded
            .as_bytes()
            .chunks(76)
            .map(|line| std::str::from_utf8(line).unwrap())
            .collect::<Vec<_>>()
            .join("\r\n");

        assert!(wrapped.contains('\n'));
        assert_eq!(decode_image(&wrapped).unwrap(), image);
        assert_eq!(
            decode_image(&format!("data:image/jpeg;base64,{wrapped}\n")).unwrap(),
            image
        );
    }

    struct SlowLocalizer;

    impl mapmate_core::Localizer for SlowLocalizer {
        fn name(&self) -> &str {
            "Slow"
        }

        fn localize(
            &self,
            _image: &[u8],
        ) -> Result<Option<mapmate_core::LocalizerMatch>, mapmate_core::LocalizerError> {
            std::thread::sleep(Duration::from_millis(800));
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_concurrency_limit_spans_all_routes() {
        let navigation = NavigationService::new(
            Arc::new(graph_from_json_str(GRAPH).unwrap()),
            CoordinateTransform::default(),
            NavigationConfig::default(),
        );
        let localizers = mapmate_core::LocalizerRegistry::new(FallbackPosition::default())
            .with_localizer(Box::new(SlowLocalizer));
        let state = Arc::new(AppState::new(navigation, localizers, PathBuf::new()));
        let http = HttpConfig {
            concurrency_limit: 1,
            ..HttpConfig::default()
        };
        let app = build_router(state, &http);

        let image = BASE64.encode(LIBRARY_PHOTO);
        let slow = tokio::spawn(send(
            app.clone(),
            "POST",
            "/localize",
            Some(json!({"image": image})),
        ));
        tokio::time::sleep(Duration::from_millis(100)).await;

        let started = std::time::Instant::now();
        let (status, _) = send(app, "GET", "/health", None).await;
        let waited = started.elapsed();

        assert_eq!(status, StatusCode::OK);
        assert!(
            waited >= Duration::from_millis(500),
            "/health answered after {waited:?} while /localize held the only slot"
        );

        let (status, body) = slow.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_locate_and_node_lookup() {
        let transform = CoordinateTransform::default();
        let (lat, lng) = transform.to_geo(9.0, 1.0);
        let (status, body) = send(app(), "POST", "/locate", Some(json!({"lat": lat, "lng": lng}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["node_id"], json!("B"));

        let (status, body) = send(app(), "GET", "/nodes/A", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], json!("Gate"));

        let (status, _) = send(app(), "GET", "/nodes/Z", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(app(), "GET", "/nodes", None).await;
        assert_eq!(body.as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_health_reports_graph_and_localizers() {
        let (status, body) = send(app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("healthy"));
        assert_eq!(body["graph_loaded"], json!(true));
        assert_eq!(body["nodes_loaded"], json!(4));
        assert_eq!(body["edges_loaded"], json!(2));
        assert_eq!(body["localizers"], json!(["Library"]));
        assert_eq!(body["localization_available"], json!(true));

        let empty = app_with(r#"{"nodes": [], "edges": []}"#, PathBuf::new());
        let (_, body) = send(empty, "GET", "/health", None).await;
        assert_eq!(body["status"], json!("degraded"));
        assert_eq!(body["graph_loaded"], json!(false));
    }

    #[tokio::test]
    async fn test_reload_failure_keeps_active_graph() {
        let app = app();
        let (status, _) = send(app.clone(), "POST", "/admin/reload", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (_, body) = send(app, "GET", "/health", None).await;
        assert_eq!(body["nodes_loaded"], json!(4));
    }

    #[tokio::test]
    async fn test_reload_swaps_in_new_graph() {
        let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../mapmate-core/tests/data/campus_graph.json");
        let app = app_with(r#"{"nodes": [], "edges": []}"#, fixture);

        let (status, body) = send(app.clone(), "POST", "/admin/reload", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nodes_loaded"], json!(5));

        let (status, _) = send(
            app,
            "POST",
            "/navigate",
            Some(json!({"start_node": "A", "destination": "C"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}
