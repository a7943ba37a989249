//! REST API for the tray fill service.
//!
//! Provides HTTP endpoints for the engineering frontend.
//! Uses Axum as the web framework and supports CORS.

use std::collections::HashSet;
use std::convert::Infallible;
use std::sync::OnceLock;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::{Any, CorsLayer};
use utoipa::{OpenApi, ToSchema};

use crate::config::{ApiConfig, RequestDefaults};
use crate::matrix::{MatrixCell, generate_matrix, recommend};
use crate::model::{CableSpec, PlacedCable, ValidationError};
use crate::optimizer::SolverConfig;
use crate::physics::{LayerMismatch, OverlapPair, PhysicsReport, inspect};
use crate::solver::{
    FailureKind, SolveEvent, SolveParams, SystemResult, TierFailure, TierResult,
    auto_solve_system_with_progress, solve_system_at_width, solve_system_with_progress,
};
use crate::types::Point2;

#[derive(Clone)]
struct ApiState {
    solver_config: SolverConfig,
    defaults: RequestDefaults,
}

static OPENAPI_DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>tray_fill API Docs</title>
        <link
            rel="stylesheet"
            href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css"
            integrity="sha384-wxLW6kwyHktdDGr6Pv1zgm/VGJh99lfUbzSn6HNHBENZlCN7W602k9VkGdxuFvPn"
            crossorigin="anonymous"
        />
    </head>
    <body>
        <div id="swagger-ui"></div>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"
            integrity="sha384-wmyclcVGX/WhUkdkATwhaK1X1JtiNrr2EoYJ+diV3vj4v6OC5yCeSu+yW13SYJep"
            crossorigin="anonymous"
        ></script>
        <script>
            window.onload = function () {
                window.ui = SwaggerUIBundle({
                    url: "/docs/openapi.json",
                    dom_id: "#swagger-ui",
                });
            };
        </script>
    </body>
    </html>"##;

fn openapi_doc() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_DOC.get_or_init(ApiDoc::openapi)
}

/// Request structure for the solve endpoints.
///
/// Omitted parameters fall back to the service defaults. `width` bypasses the
/// width search; `autoTiers` escalates the tier count until the system fits.
#[derive(Deserialize, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "cables": [
            { "id": "P-101", "diameter": 18.5, "system": "POWER", "fromNode": "ER-01" },
            { "id": "C-220", "diameter": 9.0, "system": "CTRL", "fromNode": "ER-01" }
        ],
        "numberOfTiers": 2,
        "maxHeightLimit": 60.0,
        "targetFillRatioPercent": 40.0,
        "includeMatrix": true
    })
)]
pub struct SolveRequest {
    pub cables: Vec<CableSpec>,
    #[serde(default)]
    pub number_of_tiers: Option<usize>,
    #[serde(default)]
    pub max_height_limit: Option<f64>,
    #[serde(default)]
    pub target_fill_ratio_percent: Option<f64>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub width: Option<f64>,
    #[serde(default)]
    pub include_matrix: Option<bool>,
    #[serde(default)]
    pub auto_tiers: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum SolveMode {
    Search,
    FixedWidth(f64),
    AutoTiers,
}

#[derive(Debug)]
struct ValidatedSolveRequest {
    cables: Vec<CableSpec>,
    params: SolveParams,
    mode: SolveMode,
    include_matrix: bool,
}

#[derive(Debug)]
enum SolveRequestValidationError {
    InvalidCable(ValidationError),
    InvalidParameters(ValidationError),
}

impl SolveRequest {
    fn into_validated(
        self,
        defaults: &RequestDefaults,
    ) -> Result<ValidatedSolveRequest, SolveRequestValidationError> {
        validate_cables(&self.cables).map_err(SolveRequestValidationError::InvalidCable)?;

        let params = SolveParams::new(
            self.number_of_tiers.unwrap_or(1),
            self.max_height_limit.unwrap_or(defaults.max_height_limit),
            self.target_fill_ratio_percent
                .unwrap_or(defaults.target_fill_ratio_percent),
        )
        .map_err(SolveRequestValidationError::InvalidParameters)?;

        let auto_tiers = self.auto_tiers.unwrap_or(false);
        let mode = match (self.width, auto_tiers) {
            (Some(_), true) => {
                return Err(SolveRequestValidationError::InvalidParameters(
                    ValidationError::InvalidConfiguration(
                        "width and autoTiers cannot be combined".to_string(),
                    ),
                ));
            }
            (Some(width), false) => {
                if !width.is_finite() || width <= 0.0 {
                    return Err(SolveRequestValidationError::InvalidParameters(
                        ValidationError::InvalidConfiguration(format!(
                            "width must be positive, got: {}",
                            width
                        )),
                    ));
                }
                SolveMode::FixedWidth(width)
            }
            (None, true) => SolveMode::AutoTiers,
            (None, false) => SolveMode::Search,
        };

        Ok(ValidatedSolveRequest {
            cables: self.cables,
            params,
            mode,
            include_matrix: self.include_matrix.unwrap_or(defaults.include_matrix),
        })
    }
}

/// Checks every cable and rejects duplicate ids.
fn validate_cables<'a>(
    cables: impl IntoIterator<Item = &'a CableSpec>,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for cable in cables {
        cable.validate()?;
        if !seen.insert(cable.id.as_str()) {
            return Err(ValidationError::InvalidIdentity(format!(
                "Duplicate cable id '{}'",
                cable.id
            )));
        }
    }
    Ok(())
}

impl ValidatedSolveRequest {
    fn run(self, config: &SolverConfig, on_event: impl FnMut(&SolveEvent)) -> SystemResult {
        let ValidatedSolveRequest {
            cables,
            params,
            mode,
            include_matrix,
        } = self;

        let result = match mode {
            SolveMode::Search => solve_system_with_progress(&cables, &params, config, on_event),
            SolveMode::AutoTiers => auto_solve_system_with_progress(&cables, &params, config, on_event),
            SolveMode::FixedWidth(width) => solve_system_at_width(&cables, &params, width, config),
        };

        if include_matrix {
            result.with_matrix(generate_matrix(&cables, &params, config))
        } else {
            result
        }
    }
}

/// Request structure for the matrix endpoint.
#[derive(Deserialize, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatrixRequest {
    pub cables: Vec<CableSpec>,
    #[serde(default)]
    pub max_height_limit: Option<f64>,
    #[serde(default)]
    pub target_fill_ratio_percent: Option<f64>,
}

/// Optimization matrix with the recommended cell.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatrixResponse {
    pub cells: Vec<Vec<MatrixCell>>,
    pub recommendation: Option<MatrixCell>,
}

/// Request structure for the validate endpoint.
#[derive(Deserialize, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub cables: Vec<PlacedCable>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub width: Option<f64>,
}

impl ValidateRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_cables(self.cables.iter().map(|placed| &placed.cable))?;
        if let Some(invalid) = self.cables.iter().find(|placed| !placed.center.is_finite()) {
            return Err(ValidationError::InvalidConfiguration(format!(
                "Cable '{}' has a non-finite center",
                invalid.id()
            )));
        }
        match self.width {
            Some(width) if !width.is_finite() || width <= 0.0 => {
                Err(ValidationError::InvalidConfiguration(format!(
                    "width must be positive, got: {}",
                    width
                )))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    error: String,
    details: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    details: impl Into<String>,
) -> Response {
    (status, Json(ErrorResponse::new(error, details))).into_response()
}

fn json_deserialize_error(err: JsonRejection) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid JSON data",
        err.to_string(),
    )
}

fn validation_error(details: impl Into<String>) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid cable data",
        details,
    )
}

fn parameter_error(details: impl Into<String>) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid solve parameters",
        details,
    )
}

fn worker_error(details: impl Into<String>) -> Response {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Solver worker failed",
        details,
    )
}

fn parse_solve_request(
    payload: Result<Json<SolveRequest>, JsonRejection>,
    defaults: &RequestDefaults,
) -> Result<ValidatedSolveRequest, Response> {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(err) => return Err(json_deserialize_error(err)),
    };

    match payload.into_validated(defaults) {
        Ok(validated) => Ok(validated),
        Err(SolveRequestValidationError::InvalidCable(err)) => Err(validation_error(err.to_string())),
        Err(SolveRequestValidationError::InvalidParameters(err)) => {
            Err(parameter_error(err.to_string()))
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(handle_solve, handle_solve_stream, handle_matrix, handle_validate),
    components(
        schemas(
            SolveRequest,
            MatrixRequest,
            MatrixResponse,
            ValidateRequest,
            ErrorResponse,
            CableSpec,
            PlacedCable,
            Point2,
            SystemResult,
            TierResult,
            TierFailure,
            FailureKind,
            MatrixCell,
            PhysicsReport,
            OverlapPair,
            LayerMismatch
        )
    ),
    tags((name = "tray-fill", description = "Endpoints for cable tray sizing"))
)]
struct ApiDoc;

/// Builds the application router with all endpoints.
fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/solve", post(handle_solve))
        .route("/solve_stream", post(handle_solve_stream))
        .route("/matrix", post(handle_matrix))
        .route("/validate", post(handle_validate))
        .route("/docs/openapi.json", get(serve_openapi_json))
        .route("/docs", get(serve_openapi_ui))
        .layer(cors)
        .with_state(state)
}

/// Starts the API server.
///
/// Configures CORS for cross-origin requests from the frontend.
/// Blocks until the server is terminated.
pub async fn start_api_server(
    config: ApiConfig,
    solver_config: SolverConfig,
    defaults: RequestDefaults,
) -> std::io::Result<()> {
    let app = router(ApiState {
        solver_config,
        defaults,
    });

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    println!(
        "🚀 Server running on http://{}:{}",
        config.display_host(),
        config.port()
    );
    if config.binds_to_all_interfaces() {
        println!("💡 Local access: http://localhost:{}", config.port());
    }
    println!("📐 API Endpoints:");
    println!("   - POST /solve");
    println!("   - POST /solve_stream");
    println!("   - POST /matrix");
    println!("   - POST /validate");
    println!("📑 Documentation:");
    println!("   - GET /docs");
    println!("   - GET /docs/openapi.json");

    axum::serve(listener, app).await
}

/// Handler for POST /solve endpoint.
///
/// Sizes a cable tray system for the given cables.
///
/// # Returns
/// JSON `SystemResult` with one entry per tier; failures are reported in the
/// body with `success: false`, not as an HTTP error
#[utoipa::path(
    post,
    path = "/solve",
    request_body = SolveRequest,
    responses(
        (status = 200, description = "Solve finished (check success)", body = SystemResult),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid cables or solve parameters",
            body = ErrorResponse
        )
    ),
    tag = "tray-fill"
)]
async fn handle_solve(
    State(state): State<ApiState>,
    payload: Result<Json<SolveRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match parse_solve_request(payload, &state.defaults) {
        Ok(request) => request,
        Err(response) => return response,
    };

    println!(
        "📥 New solve request: {} cables, {} tiers ({:?})",
        request.cables.len(),
        request.params.number_of_tiers,
        request.mode
    );

    let config = state.solver_config;
    let result = match tokio::task::spawn_blocking(move || request.run(&config, |_| {})).await {
        Ok(result) => result,
        Err(err) => {
            eprintln!("❌ Solve worker failed: {err}");
            return worker_error(err.to_string());
        }
    };

    println!(
        "📐 Result: width {} mm, {} tiers, success = {}",
        result.system_width,
        result.tier_count(),
        result.success
    );
    (StatusCode::OK, Json(result)).into_response()
}

/// Handler for POST /solve_stream endpoint (SSE).
///
/// Streams solve events in real-time as Server-Sent Events (text/event-stream).
/// The final message is the complete `SystemResult` under the event name `result`.
#[utoipa::path(
    post,
    path = "/solve_stream",
    request_body = SolveRequest,
    responses(
        (
            status = 200,
            description = "Streams solve events in real-time",
            content_type = "text/event-stream",
            body = String
        ),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid cables or solve parameters",
            body = ErrorResponse
        )
    ),
    tag = "tray-fill"
)]
async fn handle_solve_stream(
    State(state): State<ApiState>,
    payload: Result<Json<SolveRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match parse_solve_request(payload, &state.defaults) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let (tx, rx) = mpsc::channel::<Event>(32);
    let config = state.solver_config;

    tokio::task::spawn_blocking(move || {
        let result = request.run(&config, |evt| {
            if let Ok(json) = serde_json::to_string(evt) {
                // A closed receiver only drops the remaining events.
                let _ = tx.blocking_send(Event::default().data(json));
            }
        });
        if let Ok(json) = serde_json::to_string(&result) {
            let _ = tx.blocking_send(Event::default().event("result").data(json));
        }
    });

    let stream = ReceiverStream::new(rx).map(Ok::<_, Infallible>);
    Sse::new(stream)
        .keep_alive(
            KeepAlive::new()
                .interval(std::time::Duration::from_secs(10))
                .text("keep-alive"),
        )
        .into_response()
}

/// Handler for POST /matrix endpoint.
///
/// Evaluates every (tier count, width) combination and recommends the cell
/// with the smallest tray area that meets the target fill ratio.
#[utoipa::path(
    post,
    path = "/matrix",
    request_body = MatrixRequest,
    responses(
        (status = 200, description = "Optimization matrix", body = MatrixResponse),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid cables or parameters",
            body = ErrorResponse
        )
    ),
    tag = "tray-fill"
)]
async fn handle_matrix(
    State(state): State<ApiState>,
    payload: Result<Json<MatrixRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(err) => return json_deserialize_error(err),
    };
    if let Err(err) = validate_cables(&request.cables) {
        return validation_error(err.to_string());
    }
    let params = match SolveParams::new(
        1,
        request.max_height_limit.unwrap_or(state.defaults.max_height_limit),
        request
            .target_fill_ratio_percent
            .unwrap_or(state.defaults.target_fill_ratio_percent),
    ) {
        Ok(params) => params,
        Err(err) => return parameter_error(err.to_string()),
    };

    println!("📥 New matrix request: {} cables", request.cables.len());
    let config = state.solver_config;
    let cells = match tokio::task::spawn_blocking(move || {
        generate_matrix(&request.cables, &params, &config)
    })
    .await
    {
        Ok(cells) => cells,
        Err(err) => {
            eprintln!("❌ Matrix worker failed: {err}");
            return worker_error(err.to_string());
        }
    };

    let recommendation = recommend(&cells);
    (StatusCode::OK, Json(MatrixResponse { cells, recommendation })).into_response()
}

/// Handler for POST /validate endpoint.
///
/// Checks a placed-cable set against the physical placement rules.
#[utoipa::path(
    post,
    path = "/validate",
    request_body = ValidateRequest,
    responses(
        (status = 200, description = "Validation report", body = PhysicsReport),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid JSON or cable data", body = ErrorResponse)
    ),
    tag = "tray-fill"
)]
async fn handle_validate(
    State(state): State<ApiState>,
    payload: Result<Json<ValidateRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(err) => return json_deserialize_error(err),
    };
    if let Err(err) = request.validate() {
        return validation_error(err.to_string());
    }

    let report = inspect(&request.cables, request.width, &state.solver_config);
    (StatusCode::OK, Json(report)).into_response()
}

async fn serve_openapi_json(State(_state): State<ApiState>) -> impl IntoResponse {
    Json(openapi_doc())
}

async fn serve_openapi_ui(State(_state): State<ApiState>) -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SolveRequest {
        serde_json::from_str(json).expect("Should parse valid JSON")
    }

    #[test]
    fn openapi_doc_lists_expected_paths() {
        let doc = openapi_doc();
        let paths = &doc.paths.paths;
        for path in ["/solve", "/solve_stream", "/matrix", "/validate"] {
            assert!(
                paths.contains_key(path),
                "OpenAPI documentation is missing the {} path",
                path
            );
        }
    }

    #[test]
    fn openapi_doc_contains_key_schemas() {
        let doc = openapi_doc();
        let components = doc
            .components
            .as_ref()
            .expect("OpenAPI documentation contains no components");
        let schemas = &components.schemas;
        for name in ["SolveRequest", "SystemResult", "MatrixCell", "ErrorResponse"] {
            assert!(
                schemas.contains_key(name),
                "Expected schema '{}' is missing from the OpenAPI document",
                name
            );
        }
    }

    #[test]
    fn solve_request_applies_defaults() {
        let request = parse(r#"{ "cables": [{ "id": "A", "diameter": 10.0 }] }"#);
        let validated = request
            .into_validated(&RequestDefaults::default())
            .expect("Should validate successfully");

        assert_eq!(validated.params.number_of_tiers, 1);
        assert_eq!(validated.params.max_height_limit, 60.0);
        assert_eq!(validated.params.target_fill_ratio_percent, 60.0);
        assert_eq!(validated.mode, SolveMode::Search);
        assert!(!validated.include_matrix);
    }

    #[test]
    fn solve_request_selects_mode() {
        let fixed = parse(r#"{ "cables": [], "width": 300.0 }"#)
            .into_validated(&RequestDefaults::default())
            .unwrap();
        assert_eq!(fixed.mode, SolveMode::FixedWidth(300.0));

        let auto = parse(r#"{ "cables": [], "autoTiers": true }"#)
            .into_validated(&RequestDefaults::default())
            .unwrap();
        assert_eq!(auto.mode, SolveMode::AutoTiers);

        let both = parse(r#"{ "cables": [], "width": 300.0, "autoTiers": true }"#)
            .into_validated(&RequestDefaults::default());
        assert!(matches!(
            both,
            Err(SolveRequestValidationError::InvalidParameters(_))
        ));
    }

    #[test]
    fn solve_request_rejects_bad_cables() {
        let negative = parse(r#"{ "cables": [{ "id": "A", "diameter": -1.0 }] }"#)
            .into_validated(&RequestDefaults::default());
        assert!(matches!(
            negative,
            Err(SolveRequestValidationError::InvalidCable(ValidationError::InvalidDiameter(_)))
        ));

        let duplicate = parse(
            r#"{ "cables": [{ "id": "A", "diameter": 5.0 }, { "id": "A", "diameter": 6.0 }] }"#,
        )
        .into_validated(&RequestDefaults::default());
        assert!(matches!(
            duplicate,
            Err(SolveRequestValidationError::InvalidCable(ValidationError::InvalidIdentity(_)))
        ));
    }

    #[test]
    fn solve_request_rejects_bad_parameters() {
        for body in [
            r#"{ "cables": [], "numberOfTiers": 0 }"#,
            r#"{ "cables": [], "maxHeightLimit": 0.0 }"#,
            r#"{ "cables": [], "targetFillRatioPercent": 120.0 }"#,
            r#"{ "cables": [], "width": -5.0 }"#,
        ] {
            let result = parse(body).into_validated(&RequestDefaults::default());
            assert!(
                matches!(result, Err(SolveRequestValidationError::InvalidParameters(_))),
                "expected parameter error for {}",
                body
            );
        }
    }

    #[test]
    fn validated_request_runs_with_matrix() {
        let request = parse(
            r#"{
                "cables": [
                    { "id": "A", "diameter": 10.0 },
                    { "id": "B", "diameter": 12.0 }
                ],
                "includeMatrix": true
            }"#,
        )
        .into_validated(&RequestDefaults::default())
        .unwrap();

        let result = request.run(&SolverConfig::default(), |_| {});
        assert!(result.success);
        assert_eq!(result.optimization_matrix.map(|m| m.len()), Some(6));
    }

    #[test]
    fn validate_request_rejects_bad_cables() {
        let parse_validate = |json: &str| -> ValidateRequest {
            serde_json::from_str(json).expect("Should parse valid JSON")
        };

        let ok = parse_validate(
            r#"{ "cables": [{ "id": "A", "diameter": 10.0, "center": { "x": 15.0, "y": 5.0 },
                "layer": 1, "placementOrder": 1 }], "width": 100.0 }"#,
        );
        assert!(ok.validate().is_ok());

        let negative = parse_validate(
            r#"{ "cables": [{ "id": "A", "diameter": -4.0, "center": { "x": 15.0, "y": 5.0 },
                "layer": 1, "placementOrder": 1 }] }"#,
        );
        assert!(matches!(
            negative.validate(),
            Err(ValidationError::InvalidDiameter(_))
        ));

        let duplicate = parse_validate(
            r#"{ "cables": [
                { "id": "A", "diameter": 10.0, "center": { "x": 15.0, "y": 5.0 }, "layer": 1, "placementOrder": 1 },
                { "id": "A", "diameter": 10.0, "center": { "x": 25.0, "y": 5.0 }, "layer": 1, "placementOrder": 2 }
            ] }"#,
        );
        assert!(matches!(
            duplicate.validate(),
            Err(ValidationError::InvalidIdentity(_))
        ));

        let zero_width = parse_validate(r#"{ "cables": [], "width": 0.0 }"#);
        assert!(zero_width.validate().is_err());
    }

    #[test]
    fn system_result_serializes_camel_case() {
        let request = parse(r#"{ "cables": [{ "id": "A", "diameter": 10.0 }] }"#)
            .into_validated(&RequestDefaults::default())
            .unwrap();
        let result = request.run(&SolverConfig::default(), |_| {});
        let value = serde_json::to_value(&result).unwrap();

        assert!(value.get("systemWidth").is_some());
        assert!(value.get("maxHeightPerTier").is_some());
        assert!(value.get("optimizationMatrix").is_none());
        assert!(value["tiers"][0].get("fillRatio").is_some());
        assert_eq!(value["tiers"][0]["cables"][0]["placementOrder"], 1);
    }
}
