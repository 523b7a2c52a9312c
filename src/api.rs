// ZeroPoint Node - REST API
// JSON over axum; generated artifacts are served as static files

use crate::archetype::{archetype_name, archetypes, describe};
use crate::config::GeneratorConfig;
use crate::gateway::{GatewayClassifier, GatewayKind};
use crate::harmonic::harmonic;
use crate::matrix::{HarmonicMatrix, MatrixRow};
use crate::universe::Universe;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GeneratorConfig>,
    pub classifier: Arc<GatewayClassifier>,
    pub matrix: Arc<HarmonicMatrix>,
}

impl AppState {
    pub fn new(config: GeneratorConfig) -> Self {
        let classifier = GatewayClassifier::new();
        let matrix = HarmonicMatrix::build(config.rows, config.cols, &classifier);

        AppState {
            config: Arc::new(config),
            classifier: Arc::new(classifier),
            matrix: Arc::new(matrix),
        }
    }
}

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Serialize)]
struct HarmonicResponse {
    a: i64,
    b: i64,
    result: u8,
    archetype: String,
}

#[derive(Serialize)]
struct GatewayInfo {
    kind: GatewayKind,
    label: &'static str,
    description: &'static str,
}

#[derive(Serialize)]
struct GatewayResponse {
    a: i64,
    b: i64,
    gateways: Vec<GatewayInfo>,
}

#[derive(Debug, Deserialize)]
pub struct MatrixQuery {
    /// Only cells whose row digit is `a`
    a: Option<i64>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/harmonic/:a/:b - Reduce a pair
async fn get_harmonic(Path((a, b)): Path<(i64, i64)>) -> impl IntoResponse {
    let result = harmonic(a, b);
    Json(ApiResponse::ok(HarmonicResponse {
        a,
        b,
        result,
        archetype: archetype_name(result as i64),
    }))
}

/// GET /api/archetypes - The whole table
async fn get_archetypes() -> impl IntoResponse {
    Json(ApiResponse::ok(archetypes().to_vec()))
}

/// GET /api/archetypes/:digit - One entry; outside 0-9 the digit labels itself
async fn get_archetype(Path(digit): Path<i64>) -> impl IntoResponse {
    Json(ApiResponse::ok(describe(digit)))
}

/// GET /api/gateways/:a/:b - Classify a pair
async fn get_gateways(
    State(state): State<AppState>,
    Path((a, b)): Path<(i64, i64)>,
) -> impl IntoResponse {
    let gateways = state
        .classifier
        .classify(a, b)
        .into_iter()
        .map(|kind| GatewayInfo {
            kind,
            label: kind.label(),
            description: kind.description(),
        })
        .collect();

    Json(ApiResponse::ok(GatewayResponse { a, b, gateways }))
}

/// GET /api/matrix - All cells, optionally one row (?a=N); 404 for a row outside the range
async fn get_matrix(
    State(state): State<AppState>,
    Query(query): Query<MatrixQuery>,
) -> impl IntoResponse {
    let rows: Vec<MatrixRow> = match query.a {
        Some(a) if !state.matrix.row_range.contains(a) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Vec<MatrixRow>>::err(format!(
                    "Row {} is outside {}",
                    a, state.matrix.row_range
                ))),
            )
                .into_response();
        }
        Some(a) => state.matrix.row(a).cloned().collect(),
        None => state.matrix.rows.clone(),
    };
    (StatusCode::OK, Json(ApiResponse::ok(rows))).into_response()
}

/// GET /api/universe - Universe document for the configured ranges
async fn get_universe(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(Universe::generate(&state.matrix)))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let artifacts = ServeDir::new(&state.config.output_dir);

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/harmonic/:a/:b", get(get_harmonic))
        .route("/archetypes", get(get_archetypes))
        .route("/archetypes/:digit", get(get_archetype))
        .route("/gateways/:a/:b", get(get_gateways))
        .route("/matrix", get(get_matrix))
        .route("/universe", get(get_universe))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .nest_service("/artifacts", artifacts)
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn app() -> Router {
        router(AppState::new(GeneratorConfig::default()))
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(app(), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "OK");
    }

    #[tokio::test]
    async fn test_harmonic() {
        let (status, body) = get_json(app(), "/api/harmonic/4/5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["result"], 9);
        assert_eq!(body["data"]["archetype"], "Completion");
    }

    #[tokio::test]
    async fn test_archetype_lookup_and_fallback() {
        let (status, body) = get_json(app(), "/api/archetypes/3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Resonance");

        let (status, body) = get_json(app(), "/api/archetypes/12").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["digit"], 12);
        assert_eq!(body["data"]["name"], "12");
        assert_eq!(body["data"]["meaning"], "12");
    }

    #[tokio::test]
    async fn test_gateways() {
        let (_, body) = get_json(app(), "/api/gateways/0/0").await;
        let kinds: Vec<&str> = body["data"]["gateways"]
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["kind"].as_str().unwrap())
            .collect();
        assert_eq!(kinds, vec!["void_gateway", "mirror_gate", "completion_gate"]);
    }

    #[tokio::test]
    async fn test_matrix_and_row_filter() {
        let (_, body) = get_json(app(), "/api/matrix").await;
        assert_eq!(body["data"].as_array().unwrap().len(), 100);

        let (_, body) = get_json(app(), "/api/matrix?a=7").await;
        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows.len(), 10);
        assert!(rows.iter().all(|r| r["a"] == 7));

        let (status, body) = get_json(app(), "/api/matrix?a=12").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_universe() {
        let (status, body) = get_json(app(), "/api/universe").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["vortex"]["circuit"], serde_json::json!([1, 2, 4, 8, 7, 5]));
    }
}
