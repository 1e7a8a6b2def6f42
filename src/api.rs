//! REST API for the carton sizing service.
//!
//! Provides HTTP endpoints for communication with the frontend.
//! Uses Axum as the web framework and supports CORS.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::{
    Router,
    http::{StatusCode, Uri, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use std::sync::OnceLock;
use tower_http::cors::{Any, CorsLayer};
use utoipa::{OpenApi, ToSchema};

use crate::config::{ApiConfig, PlannerConfig};
use crate::model::{BasePanel, BoxPlan, FrontPanel, Item, SidePanel, ValidationError};
use crate::planner::{CartonRules, plan_box_checked, plan_items};
use crate::types::Dim3;

#[derive(Clone)]
struct ApiState {
    planner_config: PlannerConfig,
}

static OPENAPI_DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

// SRI hashes verified against https://unpkg.com/swagger-ui-dist@5.17.14/ on 2025-10-29.
const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>carton-sizer API Docs</title>
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
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-standalone-preset.js"
            integrity="sha384-2YH8WDRaj7V2OqU/trsmzSagmk/E2SutiCsGkdgoQwC9pNUJV1u/141DHB6jgs8t"
            crossorigin="anonymous"
        ></script>
        <script>
            window.onload = function () {
                const ui = SwaggerUIBundle({
                    url: "/docs/openapi.json",
                    dom_id: "#swagger-ui",
                    presets: [SwaggerUIBundle.presets.apis, SwaggerUIStandalonePreset],
                    layout: "StandaloneLayout",
                });
                window.ui = ui;
            };
        </script>
    </body>
    </html>"##;

fn openapi_doc() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_DOC.get_or_init(ApiDoc::openapi)
}

/// Embedded Web Assets (HTML, CSS, JS)
#[derive(RustEmbed)]
#[folder = "web/"]
struct WebAssets;

/// Request structure for the single-item plan endpoint.
///
/// The three rule fields override the configured defaults when present;
/// absent or `null` fields fall back to the server configuration.
#[derive(Deserialize, ToSchema)]
#[schema(
    example = json!({
        "dims": [100.0, 50.0, 30.0],
        "fit_tolerance": 5.0,
        "material_thickness": 3.0,
        "flap_ratio": 0.2
    })
)]
pub struct PlanRequest {
    #[schema(value_type = [f64; 3], example = json!([100.0, 50.0, 30.0]))]
    pub dims: (f64, f64, f64),
    #[serde(default)]
    #[schema(nullable = true)]
    pub fit_tolerance: Option<f64>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub material_thickness: Option<f64>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub flap_ratio: Option<f64>,
}

/// Request structure for the batch plan endpoint.
///
/// All items are planned with the same rules.
#[derive(Deserialize, ToSchema)]
#[schema(
    example = json!({
        "items": [
            { "id": 1, "dims": [100.0, 50.0, 30.0] },
            { "id": 2, "dims": [20.0, 20.0, 20.0] }
        ],
        "flap_ratio": 0.25
    })
)]
pub struct PlanBatchRequest {
    pub items: Vec<Item>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub fit_tolerance: Option<f64>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub material_thickness: Option<f64>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub flap_ratio: Option<f64>,
}

/// Applies per-request rule overrides onto the configured defaults.
fn apply_rule_overrides(
    mut rules: CartonRules,
    fit_tolerance: Option<f64>,
    material_thickness: Option<f64>,
    flap_ratio: Option<f64>,
) -> CartonRules {
    if let Some(value) = fit_tolerance {
        rules.fit_tolerance = value;
    }
    if let Some(value) = material_thickness {
        rules.material_thickness = value;
    }
    if let Some(value) = flap_ratio {
        rules.flap_ratio = value;
    }
    rules
}

/// Response structure for a single-item plan.
///
/// # Fields
/// * `rules` - The effective rules the plan was derived with
/// * `plan` - The complete set of derived carton dimensions
#[derive(Serialize, ToSchema)]
pub struct PlanResponse {
    pub rules: CartonRules,
    pub plan: BoxPlan,
}

/// Response structure for the batch endpoint.
#[derive(Serialize, ToSchema)]
pub struct PlanBatchResponse {
    pub rules: CartonRules,
    pub results: Vec<PlannedItemResponse>,
}

/// Single planned item in the batch response.
///
/// # Fields
/// * `id` - Item ID from the request
/// * `dims` - Item dimensions (height, width, length)
/// * `plan` - The derived carton dimensions for this item
#[derive(Serialize, ToSchema)]
pub struct PlannedItemResponse {
    pub id: usize,
    #[schema(value_type = [f64; 3], example = json!([100.0, 50.0, 30.0]))]
    pub dims: (f64, f64, f64),
    pub plan: BoxPlan,
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
        "Invalid input data",
        details,
    )
}

fn unwrap_json_payload<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    match payload {
        Ok(Json(payload)) => Ok(payload),
        Err(err) => Err(json_deserialize_error(err)),
    }
}

impl PlanResponse {
    /// Creates a PlanResponse from the effective rules and a plan.
    pub fn from_plan(rules: CartonRules, plan: BoxPlan) -> Self {
        Self { rules, plan }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(handle_plan, handle_plan_batch),
    components(
        schemas(
            PlanRequest,
            PlanBatchRequest,
            PlanResponse,
            PlanBatchResponse,
            PlannedItemResponse,
            ErrorResponse,
            Item,
            Dim3,
            BoxPlan,
            BasePanel,
            SidePanel,
            FrontPanel,
            CartonRules
        )
    ),
    tags((name = "sizing", description = "Endpoints for carton sizing"))
)]
struct ApiDoc;

/// Starts the API server.
///
/// Configures CORS for cross-origin requests from the frontend.
/// Blocks until the server is terminated.
pub async fn start_api_server(config: ApiConfig, planner_config: PlannerConfig) {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let state = ApiState { planner_config };

    let app = Router::new()
        // API endpoints
        .route("/plan", post(handle_plan))
        .route("/plan/batch", post(handle_plan_batch))
        // API documentation
        .route("/docs/openapi.json", get(serve_openapi_json))
        .route("/docs", get(serve_openapi_ui))
        // Web-UI (embedded)
        .route("/", get(serve_index))
        .route("/{*path}", get(serve_static))
        .layer(cors)
        .with_state(state);

    let addr = config.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            panic!("❌ Could not bind API server to {}: {}", addr, err);
        }
    };

    let display_host = config.display_host().to_string();
    println!(
        "🚀 Server running on http://{}:{}",
        display_host,
        config.port()
    );
    if config.binds_to_all_interfaces() && config.uses_default_host() {
        println!("💡 Local access: http://localhost:{}", config.port());
    }
    println!("📦 API Endpoints:");
    println!("   - POST /plan");
    println!("   - POST /plan/batch");
    println!("📑 Documentation:");
    println!("   - GET /docs");
    println!("   - GET /docs/openapi.json");
    println!("🌐 Web-UI: http://{}:{}", display_host, config.port());

    if let Err(err) = axum::serve(listener, app).await {
        eprintln!("❌ API server terminated with an error: {err}");
    }
}

/// Handler for POST /plan endpoint.
///
/// Takes item dimensions and optional rule overrides and responds with the
/// complete carton plan: internal and external dimensions, flap lengths and
/// the three cut panels.
///
/// # Parameters
/// * `payload` - JSON payload with item dimensions and optional rule overrides
///
/// # Returns
/// JSON response with the effective rules and the derived plan
#[utoipa::path(
    post,
    path = "/plan",
    request_body = PlanRequest,
    responses(
        (status = 200, description = "Successfully planned a carton", body = PlanResponse),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid dimensions or rules",
            body = ErrorResponse
        )
    ),
    tag = "sizing"
)]
async fn handle_plan(
    State(state): State<ApiState>,
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match unwrap_json_payload(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let rules = apply_rule_overrides(
        state.planner_config.carton_rules(),
        request.fit_tolerance,
        request.material_thickness,
        request.flap_ratio,
    );

    println!("📥 New plan request: dims {:?}", request.dims);
    let plan = match plan_box_checked(Dim3::from_tuple(request.dims), rules) {
        Ok(plan) => plan,
        Err(err) => return validation_error(err.to_string()),
    };
    println!(
        "📦 Result: external {:?}, panels ready",
        plan.external.as_tuple()
    );

    let response = PlanResponse::from_plan(rules, plan);
    (StatusCode::OK, Json(response)).into_response()
}

/// Handler for POST /plan/batch endpoint.
///
/// Plans one carton per item with a shared set of rules. Items are
/// independent of each other; ids from the request are echoed back.
#[utoipa::path(
    post,
    path = "/plan/batch",
    request_body = PlanBatchRequest,
    responses(
        (status = 200, description = "Successfully planned all cartons", body = PlanBatchResponse),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid dimensions or rules",
            body = ErrorResponse
        )
    ),
    tag = "sizing"
)]
async fn handle_plan_batch(
    State(state): State<ApiState>,
    payload: Result<Json<PlanBatchRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match unwrap_json_payload(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    if request.items.is_empty() {
        return validation_error("At least one item must be specified");
    }

    let items = match request
        .items
        .into_iter()
        .map(|item| Item::new(item.id, item.dims))
        .collect::<Result<Vec<_>, ValidationError>>()
    {
        Ok(items) => items,
        Err(err) => return validation_error(err.to_string()),
    };

    let rules = apply_rule_overrides(
        state.planner_config.carton_rules(),
        request.fit_tolerance,
        request.material_thickness,
        request.flap_ratio,
    );
    if let Err(err) = rules.validate() {
        return validation_error(err.to_string());
    }

    println!("📥 New batch request: {} items", items.len());
    let planned = plan_items(items, rules);
    println!("📦 Result: {} plans", planned.len());

    let response = PlanBatchResponse {
        rules,
        results: planned
            .into_iter()
            .map(|entry| PlannedItemResponse {
                id: entry.item.id,
                dims: entry.item.dims,
                plan: entry.plan,
            })
            .collect(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// Serves the index.html main page
async fn serve_index() -> Response {
    match WebAssets::get("index.html") {
        Some(content) => Html(content.data).into_response(),
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

/// Serves static assets (JS, CSS, etc.)
async fn serve_static(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    match WebAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], content.data).into_response()
        }
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

async fn serve_openapi_json(State(_state): State<ApiState>) -> impl IntoResponse {
    Json(openapi_doc())
}

async fn serve_openapi_ui(State(_state): State<ApiState>) -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}
