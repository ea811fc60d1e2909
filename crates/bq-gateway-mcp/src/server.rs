// crates/bq-gateway-mcp/src/server.rs
// ============================================================================
// Module: Gateway Server
// Description: HTTP routes and MCP JSON-RPC transports for the gateway.
// Purpose: Expose warehouse operations over HTTP GET, `/mcp`, and stdio.
// Dependencies: bq-gateway-bigquery, bq-gateway-config, axum, tokio
// ============================================================================

//! ## Overview
//! The gateway server exposes every operation twice over HTTP: as a GET route
//! whose path segments carry the parameters, and as an MCP tool reachable via
//! JSON-RPC 2.0 at `POST /mcp`. The stdio transport serves the same JSON-RPC
//! surface with Content-Length framing. All paths route through
//! [`crate::tools::ToolRouter`] and record one audit event per request.
//!
//! Business rejections are successful responses carrying `{"error": ...}`.
//! Warehouse faults become HTTP 502 with `{"detail": ...}` on the GET routes
//! and JSON-RPC error `-32020` on the MCP surface.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Instant;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use bq_gateway_bigquery::BigQueryClient;
use bq_gateway_config::GatewayConfig;
use bq_gateway_config::ServerTransport;
use bq_gateway_contract::CapabilityCatalog;
use bq_gateway_contract::capability_catalog;
use bq_gateway_core::CreateModelParams;
use bq_gateway_core::DatasetListParams;
use bq_gateway_core::Dispatcher;
use bq_gateway_core::OperationName;
use bq_gateway_core::OperationRequest;
use bq_gateway_core::OperationResult;
use bq_gateway_core::PredictParams;
use bq_gateway_core::QueryParams;
use bq_gateway_core::SharedWarehouseClient;
use bq_gateway_core::TableListParams;
use bq_gateway_core::TableSchemaParams;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;

use crate::audit::GatewayAuditEvent;
use crate::audit::GatewayAuditEventParams;
use crate::audit::GatewayMethod;
use crate::audit::RequestOutcome;
use crate::audit::SharedAuditSink;
use crate::audit::audit_sink_from_config;
use crate::tools::ToolDefinition;
use crate::tools::ToolError;
use crate::tools::ToolRouter;

/// MCP protocol revision reported by `initialize`.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";
/// JSON-RPC protocol version.
const JSONRPC_VERSION: &str = "2.0";

// ============================================================================
// SECTION: Gateway Server
// ============================================================================

/// Gateway server instance.
pub struct GatewayServer {
    /// Configured transport.
    transport: ServerTransport,
    /// Resolved HTTP bind address (HTTP transport only).
    bind: Option<SocketAddr>,
    /// Shared handler state.
    state: Arc<ServerState>,
}

impl GatewayServer {
    /// Builds a server backed by the BigQuery REST client.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayServerError`] when configuration is invalid or the
    /// client cannot be built.
    pub fn from_config(mut config: GatewayConfig) -> Result<Self, GatewayServerError> {
        config.validate().map_err(|err| GatewayServerError::Config(err.to_string()))?;
        let client = BigQueryClient::from_config(&config.warehouse)
            .map_err(|err| GatewayServerError::Init(err.to_string()))?;
        Self::with_client(config, client.into_shared())
    }

    /// Builds a server over an injected warehouse client.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayServerError`] when configuration is invalid or the
    /// audit sink cannot be opened.
    pub fn with_client(
        mut config: GatewayConfig,
        client: SharedWarehouseClient,
    ) -> Result<Self, GatewayServerError> {
        config.validate().map_err(|err| GatewayServerError::Config(err.to_string()))?;
        let audit = audit_sink_from_config(&config.server.audit)
            .map_err(|err| GatewayServerError::Init(format!("audit sink: {err}")))?;
        let dispatcher =
            Dispatcher::new(client, config.safety_filter(), config.dispatch_policy());
        let catalog = capability_catalog(&config.capabilities);
        let bind = match config.server.transport {
            ServerTransport::Http => {
                let addr = config
                    .server
                    .bind_addr()
                    .map_err(|err| GatewayServerError::Config(err.to_string()))?;
                emit_bind_warning(addr);
                Some(addr)
            }
            ServerTransport::Stdio => None,
        };
        let state = Arc::new(ServerState {
            router: ToolRouter::new(dispatcher),
            audit,
            max_body_bytes: config.server.max_body_bytes,
            initialize: initialize_result(&catalog),
            catalog,
            next_request: AtomicU64::new(1),
        });
        Ok(Self {
            transport: config.server.transport,
            bind,
            state,
        })
    }

    /// Returns the configured transport.
    #[must_use]
    pub const fn transport(&self) -> ServerTransport {
        self.transport
    }

    /// Returns the HTTP bind address, if the transport listens on one.
    #[must_use]
    pub const fn bind_addr(&self) -> Option<SocketAddr> {
        self.bind
    }

    /// Returns the HTTP application (operation routes, `/mcp`, `/capabilities`).
    #[must_use]
    pub fn http_router(&self) -> Router {
        build_router(Arc::clone(&self.state))
    }

    /// Serves requests using the configured transport.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayServerError`] when the server fails.
    pub async fn serve(self) -> Result<(), GatewayServerError> {
        match (self.transport, self.bind) {
            (ServerTransport::Stdio, _) => {
                let reader = tokio::io::BufReader::new(tokio::io::stdin());
                self.serve_framed(reader, tokio::io::stdout()).await
            }
            (ServerTransport::Http, Some(addr)) => serve_http(self.state, addr).await,
            (ServerTransport::Http, None) => {
                Err(GatewayServerError::Config("bind address required".to_string()))
            }
        }
    }

    /// Serves Content-Length framed JSON-RPC until the reader is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayServerError`] on malformed framing or I/O failure.
    pub async fn serve_framed<R, W>(
        &self,
        mut reader: R,
        mut writer: W,
    ) -> Result<(), GatewayServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        loop {
            let response = match read_framed(&mut reader, self.state.max_body_bytes).await? {
                None => return Ok(()),
                Some(Frame::Oversized) => {
                    Some(reject_oversized(&self.state, ServerTransport::Stdio))
                }
                Some(Frame::Payload(bytes)) => {
                    handle_jsonrpc(&self.state, ServerTransport::Stdio, &bytes).await
                }
            };
            let Some((_, response)) = response else {
                continue;
            };
            let payload = serde_json::to_vec(&response).map_err(|_| {
                GatewayServerError::Transport("json-rpc serialization failed".to_string())
            })?;
            write_framed(&mut writer, &payload).await?;
        }
    }
}

// ============================================================================
// SECTION: Shared State
// ============================================================================

/// Shared server state for all handlers.
struct ServerState {
    /// Tool router for request dispatch.
    router: ToolRouter,
    /// Audit sink for request events.
    audit: SharedAuditSink,
    /// Maximum allowed request body size.
    max_body_bytes: usize,
    /// Precomputed `initialize` result.
    initialize: Value,
    /// Capability catalog served at `/capabilities`.
    catalog: CapabilityCatalog,
    /// Counter for HTTP route request identifiers.
    next_request: AtomicU64,
}

impl ServerState {
    /// Allocates a request identifier for routes without a JSON-RPC id.
    fn next_request_id(&self) -> String {
        format!("http-{}", self.next_request.fetch_add(1, Ordering::Relaxed))
    }

    /// Emits the audit event for a finished request.
    fn record(&self, transport: ServerTransport, audit: RequestAudit, started: Instant) {
        self.audit.record(&GatewayAuditEvent::new(GatewayAuditEventParams {
            request_id: audit.request_id,
            transport,
            method: audit.method,
            operation: audit.operation,
            outcome: audit.outcome,
            error_kind: audit.error_kind,
            latency: started.elapsed(),
        }));
    }
}

/// Audit fields collected while a request is handled.
struct RequestAudit {
    /// Request identifier when known.
    request_id: Option<String>,
    /// Request surface classification.
    method: GatewayMethod,
    /// Targeted operation when known.
    operation: Option<OperationName>,
    /// Outcome so far.
    outcome: RequestOutcome,
    /// Error kind label when not ok.
    error_kind: Option<&'static str>,
}

impl RequestAudit {
    /// Starts an audit record with an ok outcome.
    const fn new(method: GatewayMethod) -> Self {
        Self {
            request_id: None,
            method,
            operation: None,
            outcome: RequestOutcome::Ok,
            error_kind: None,
        }
    }

    /// Marks the request as failed.
    const fn fail(&mut self, kind: &'static str) {
        self.outcome = RequestOutcome::Error;
        self.error_kind = Some(kind);
    }

    /// Classifies a dispatch outcome.
    fn observe(&mut self, result: &Result<OperationResult, ToolError>) {
        match result {
            Ok(OperationResult::Success(_)) => {}
            Ok(OperationResult::Rejected(rejection)) => {
                self.outcome = RequestOutcome::Rejected;
                self.error_kind = Some(rejection.kind.as_str());
            }
            Err(err) => self.fail(err.kind()),
        }
    }
}

// ============================================================================
// SECTION: HTTP Transport
// ============================================================================

/// Serves HTTP requests until the listener fails.
async fn serve_http(state: Arc<ServerState>, addr: SocketAddr) -> Result<(), GatewayServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|_| GatewayServerError::Transport("http bind failed".to_string()))?;
    axum::serve(listener, build_router(state))
        .await
        .map_err(|_| GatewayServerError::Transport("http server failed".to_string()))
}

/// Builds the axum router over shared state.
fn build_router(state: Arc<ServerState>) -> Router {
    let body_limit = state.max_body_bytes;
    Router::new()
        .route("/mcp", post(handle_mcp))
        .route("/capabilities", get(handle_capabilities))
        .route("/get_data_from_bigquery/{query}", get(get_data))
        .route("/get_project_list_from_bigquery", get(get_project_list))
        .route("/get_dataset_list_from_bigquery/{project_id}", get(get_dataset_list))
        .route("/get_table_list_from_bigquery/{project_id}/{dataset_id}", get(get_table_list))
        .route(
            "/get_table_schema_from_bigquery/{project_id}/{dataset_id}/{table_id}",
            get(get_table_schema),
        )
        .route(
            "/create_logistic_reg_model_by_bigquery_ml/{model_name}/{project_id}/{dataset_id}/\
             {train_table_id}/{target_variable}",
            get(create_model),
        )
        .route(
            "/predict_by_bigquery_ml/{model_name}/{project_id}/{dataset_id}/{test_table_id}/{id}",
            get(predict),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Handles HTTP JSON-RPC requests.
async fn handle_mcp(State(state): State<Arc<ServerState>>, bytes: Bytes) -> Response {
    match handle_jsonrpc(&state, ServerTransport::Http, &bytes).await {
        Some((status, response)) => (status, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Serves the capability catalog.
async fn handle_capabilities(State(state): State<Arc<ServerState>>) -> Response {
    let started = Instant::now();
    let mut audit = RequestAudit::new(GatewayMethod::Capabilities);
    audit.request_id = Some(state.next_request_id());
    let response = (StatusCode::OK, Json(state.catalog.clone())).into_response();
    state.record(ServerTransport::Http, audit, started);
    response
}

/// `GET /get_data_from_bigquery/{query}`.
async fn get_data(State(state): State<Arc<ServerState>>, Path(query): Path<String>) -> Response {
    run_route(
        &state,
        OperationRequest::RunQuery(QueryParams {
            query,
        }),
    )
    .await
}

/// `GET /get_project_list_from_bigquery`.
async fn get_project_list(State(state): State<Arc<ServerState>>) -> Response {
    run_route(&state, OperationRequest::ListProjects).await
}

/// `GET /get_dataset_list_from_bigquery/{project_id}`.
async fn get_dataset_list(
    State(state): State<Arc<ServerState>>,
    Path(project_id): Path<String>,
) -> Response {
    run_route(
        &state,
        OperationRequest::ListDatasets(DatasetListParams {
            project_id,
        }),
    )
    .await
}

/// `GET /get_table_list_from_bigquery/{project_id}/{dataset_id}`.
async fn get_table_list(
    State(state): State<Arc<ServerState>>,
    Path((project_id, dataset_id)): Path<(String, String)>,
) -> Response {
    run_route(
        &state,
        OperationRequest::ListTables(TableListParams {
            project_id,
            dataset_id,
        }),
    )
    .await
}

/// `GET /get_table_schema_from_bigquery/{project_id}/{dataset_id}/{table_id}`.
async fn get_table_schema(
    State(state): State<Arc<ServerState>>,
    Path((project_id, dataset_id, table_id)): Path<(String, String, String)>,
) -> Response {
    run_route(
        &state,
        OperationRequest::DescribeSchema(TableSchemaParams {
            project_id,
            dataset_id,
            table_id,
        }),
    )
    .await
}

/// Path segments of the model training route.
#[derive(Debug, Deserialize)]
struct CreateModelPath {
    /// Model name.
    model_name: String,
    /// Project id.
    project_id: String,
    /// Dataset id.
    dataset_id: String,
    /// Training table id.
    train_table_id: String,
    /// Label column.
    target_variable: String,
}

/// `GET /create_logistic_reg_model_by_bigquery_ml/...`.
async fn create_model(
    State(state): State<Arc<ServerState>>,
    Path(path): Path<CreateModelPath>,
) -> Response {
    run_route(
        &state,
        OperationRequest::CreateModel(CreateModelParams {
            model_name: path.model_name,
            project_id: path.project_id,
            dataset_id: path.dataset_id,
            train_table_id: path.train_table_id,
            target_variable: path.target_variable,
        }),
    )
    .await
}

/// Path segments of the prediction route.
#[derive(Debug, Deserialize)]
struct PredictPath {
    /// Model name.
    model_name: String,
    /// Project id.
    project_id: String,
    /// Dataset id.
    dataset_id: String,
    /// Table with rows to score.
    test_table_id: String,
    /// Row identifier column.
    id: String,
}

/// Query string of the prediction route.
#[derive(Debug, Deserialize)]
struct PredictQuery {
    /// Maximum number of predictions.
    limit: i64,
}

/// `GET /predict_by_bigquery_ml/...?limit=`.
async fn predict(
    State(state): State<Arc<ServerState>>,
    Path(path): Path<PredictPath>,
    Query(query): Query<PredictQuery>,
) -> Response {
    run_route(
        &state,
        OperationRequest::Predict(PredictParams {
            model_name: path.model_name,
            project_id: path.project_id,
            dataset_id: path.dataset_id,
            test_table_id: path.test_table_id,
            id: path.id,
            limit: query.limit,
        }),
    )
    .await
}

/// Dispatches a route request and renders the HTTP response.
async fn run_route(state: &ServerState, request: OperationRequest) -> Response {
    let started = Instant::now();
    let mut audit = RequestAudit::new(GatewayMethod::HttpRoute);
    audit.request_id = Some(state.next_request_id());
    audit.operation = Some(request.operation());
    let outcome = state.router.dispatch(request).await;
    audit.observe(&outcome);
    let body = outcome.and_then(|result| result.to_json().map_err(|_| ToolError::Serialization));
    let response = match body {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(err) => {
            audit.fail(err.kind());
            route_error(&err)
        }
    };
    state.record(ServerTransport::Http, audit, started);
    response
}

/// Maps a route failure to an HTTP status with a `{detail}` body.
fn route_error(error: &ToolError) -> Response {
    let status = match error {
        ToolError::Warehouse(_) => StatusCode::BAD_GATEWAY,
        ToolError::UnknownTool => StatusCode::NOT_FOUND,
        ToolError::InvalidParams(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ToolError::Internal(_) | ToolError::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(json!({
            "detail": error.to_string(),
        })),
    )
        .into_response()
}

/// Warns when the HTTP transport listens beyond loopback.
fn emit_bind_warning(addr: SocketAddr) {
    if !addr.ip().is_loopback() {
        let _ = writeln!(
            std::io::stderr(),
            "bq-gateway: WARNING: listening on non-loopback address {addr} without \
             authentication; restrict network access to trusted callers"
        );
    }
}

// ============================================================================
// SECTION: JSON-RPC Handling
// ============================================================================

/// Incoming JSON-RPC request payload.
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    /// JSON-RPC protocol version.
    jsonrpc: String,
    /// Request identifier (absent for notifications).
    #[serde(default)]
    id: Value,
    /// Method name.
    method: String,
    /// Optional parameters payload.
    params: Option<Value>,
}

/// JSON-RPC response envelope.
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    /// JSON-RPC protocol version.
    jsonrpc: &'static str,
    /// Request identifier.
    id: Value,
    /// Successful result payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    /// Error payload when the request fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC error payload.
#[derive(Debug, Serialize)]
struct JsonRpcError {
    /// Error code.
    code: i64,
    /// Human-readable error message.
    message: String,
}

/// Tool call parameters for JSON-RPC requests.
#[derive(Debug, Deserialize)]
struct ToolCallParams {
    /// Tool name.
    name: String,
    /// Raw JSON arguments.
    #[serde(default)]
    arguments: Value,
}

/// Tool list response payload.
#[derive(Debug, Serialize)]
struct ToolListResult {
    /// Registered tool definitions.
    tools: Vec<ToolDefinition>,
}

/// Tool call response payload.
#[derive(Debug, Serialize)]
struct ToolCallResult {
    /// Tool output content.
    content: Vec<ToolContent>,
}

/// Tool output payloads for JSON-RPC responses.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ToolContent {
    /// JSON tool output.
    Json {
        /// JSON payload.
        json: Value,
    },
}

/// Builds the `initialize` result from catalog metadata.
fn initialize_result(catalog: &CapabilityCatalog) -> Value {
    json!({
        "protocolVersion": MCP_PROTOCOL_VERSION,
        "capabilities": {
            "tools": { "listChanged": false },
        },
        "serverInfo": {
            "name": catalog.name,
            "version": catalog.contract_version,
        },
        "instructions": catalog.description,
    })
}

/// Parses, dispatches, and audits one JSON-RPC payload.
///
/// Returns `None` for notifications, which get no response.
async fn handle_jsonrpc(
    state: &ServerState,
    transport: ServerTransport,
    bytes: &[u8],
) -> Option<(StatusCode, JsonRpcResponse)> {
    if bytes.len() > state.max_body_bytes {
        return Some(reject_oversized(state, transport));
    }
    let started = Instant::now();
    let mut audit = RequestAudit::new(GatewayMethod::Invalid);
    let response = match serde_json::from_slice::<JsonRpcRequest>(bytes) {
        Ok(request) => handle_request(state, &mut audit, request).await,
        Err(_) => {
            audit.fail("invalid_request");
            Some(protocol_error(
                Value::Null,
                StatusCode::BAD_REQUEST,
                -32600,
                "invalid json-rpc request",
            ))
        }
    };
    state.record(transport, audit, started);
    response
}

/// Rejects a payload above the configured body limit.
fn reject_oversized(
    state: &ServerState,
    transport: ServerTransport,
) -> (StatusCode, JsonRpcResponse) {
    let mut audit = RequestAudit::new(GatewayMethod::Invalid);
    audit.fail("body_too_large");
    state.record(transport, audit, Instant::now());
    protocol_error(Value::Null, StatusCode::PAYLOAD_TOO_LARGE, -32070, "request body too large")
}

/// Dispatches a parsed JSON-RPC request.
async fn handle_request(
    state: &ServerState,
    audit: &mut RequestAudit,
    request: JsonRpcRequest,
) -> Option<(StatusCode, JsonRpcResponse)> {
    audit.method = GatewayMethod::from_jsonrpc(&request.method);
    if !request.id.is_null() {
        audit.request_id = Some(request.id.to_string());
    }
    if request.jsonrpc != JSONRPC_VERSION {
        audit.fail("invalid_request");
        return Some(protocol_error(
            request.id,
            StatusCode::BAD_REQUEST,
            -32600,
            "invalid json-rpc version",
        ));
    }
    if request.id.is_null() && request.method.starts_with("notifications/") {
        return None;
    }
    let id = request.id;
    let response = match request.method.as_str() {
        "initialize" => success(id, state.initialize.clone()),
        "tools/list" => match serde_json::to_value(ToolListResult {
            tools: state.router.list_tools(),
        }) {
            Ok(value) => success(id, value),
            Err(_) => {
                audit.fail(ToolError::Serialization.kind());
                jsonrpc_error(id, ToolError::Serialization)
            }
        },
        "tools/call" => call_tool(state, audit, id, request.params).await,
        _ => {
            audit.fail("method_not_found");
            protocol_error(id, StatusCode::BAD_REQUEST, -32601, "method not found")
        }
    };
    Some(response)
}

/// Executes `tools/call` and wraps the operation envelope as tool content.
async fn call_tool(
    state: &ServerState,
    audit: &mut RequestAudit,
    id: Value,
    params: Option<Value>,
) -> (StatusCode, JsonRpcResponse) {
    let Ok(call) = serde_json::from_value::<ToolCallParams>(params.unwrap_or(Value::Null)) else {
        audit.fail("invalid_params");
        return protocol_error(id, StatusCode::BAD_REQUEST, -32602, "invalid tool params");
    };
    audit.operation = OperationName::parse(&call.name);
    let outcome = state.router.handle_tool_call(&call.name, call.arguments).await;
    audit.observe(&outcome);
    let content = outcome
        .and_then(|result| result.to_json().map_err(|_| ToolError::Serialization))
        .and_then(|json| {
            serde_json::to_value(ToolCallResult {
                content: vec![ToolContent::Json {
                    json,
                }],
            })
            .map_err(|_| ToolError::Serialization)
        });
    match content {
        Ok(value) => success(id, value),
        Err(err) => {
            audit.fail(err.kind());
            jsonrpc_error(id, err)
        }
    }
}

/// Builds a successful JSON-RPC response.
fn success(id: Value, result: Value) -> (StatusCode, JsonRpcResponse) {
    (
        StatusCode::OK,
        JsonRpcResponse {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Some(result),
            error: None,
        },
    )
}

/// Builds a protocol-level JSON-RPC error response.
fn protocol_error(
    id: Value,
    status: StatusCode,
    code: i64,
    message: &str,
) -> (StatusCode, JsonRpcResponse) {
    (
        status,
        JsonRpcResponse {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.to_string(),
            }),
        },
    )
}

/// Builds a JSON-RPC error response for a tool failure.
fn jsonrpc_error(id: Value, error: ToolError) -> (StatusCode, JsonRpcResponse) {
    let (status, code, message) = match error {
        ToolError::UnknownTool => (StatusCode::BAD_REQUEST, -32601, "unknown tool".to_string()),
        ToolError::InvalidParams(message) => (StatusCode::BAD_REQUEST, -32602, message),
        ToolError::Warehouse(err) => (StatusCode::OK, -32020, err.to_string()),
        ToolError::Internal(message) => (StatusCode::OK, -32050, message),
        ToolError::Serialization => (StatusCode::OK, -32060, "serialization failed".to_string()),
    };
    (
        status,
        JsonRpcResponse {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
            }),
        },
    )
}

// ============================================================================
// SECTION: Framing Helpers
// ============================================================================

/// One framed stdio message.
#[derive(Debug, PartialEq, Eq)]
enum Frame {
    /// Payload within the size limit.
    Payload(Vec<u8>),
    /// Payload above the size limit (already drained from the reader).
    Oversized,
}

/// Reads a framed stdio payload using MCP Content-Length headers.
///
/// Returns `None` when the reader is closed between messages.
async fn read_framed<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    max_body_bytes: usize,
) -> Result<Option<Frame>, GatewayServerError> {
    let mut content_length: Option<usize> = None;
    let mut headers_seen = false;
    let mut line = String::new();
    loop {
        line.clear();
        let bytes = reader
            .read_line(&mut line)
            .await
            .map_err(|_| GatewayServerError::Transport("stdio read failed".to_string()))?;
        if bytes == 0 {
            if headers_seen {
                return Err(GatewayServerError::Transport("stdio closed mid-frame".to_string()));
            }
            return Ok(None);
        }
        headers_seen = true;
        if line.trim().is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':')
            && name.trim().eq_ignore_ascii_case("content-length")
        {
            let parsed = value.trim().parse::<usize>().map_err(|_| {
                GatewayServerError::Transport("invalid content length".to_string())
            })?;
            content_length = Some(parsed);
        }
    }
    let len = content_length
        .ok_or_else(|| GatewayServerError::Transport("missing content length".to_string()))?;
    if len > max_body_bytes {
        let expected = u64::try_from(len)
            .map_err(|_| GatewayServerError::Transport("invalid content length".to_string()))?;
        let drained = tokio::io::copy(&mut (&mut *reader).take(expected), &mut tokio::io::sink())
            .await
            .map_err(|_| GatewayServerError::Transport("stdio read failed".to_string()))?;
        if drained != expected {
            return Err(GatewayServerError::Transport("stdio closed mid-frame".to_string()));
        }
        return Ok(Some(Frame::Oversized));
    }
    let mut buf = vec![0u8; len];
    reader
        .read_exact(&mut buf)
        .await
        .map_err(|_| GatewayServerError::Transport("stdio read failed".to_string()))?;
    Ok(Some(Frame::Payload(buf)))
}

/// Writes a framed stdio payload using MCP Content-Length headers.
async fn write_framed<W: AsyncWrite + Unpin>(
    writer: &mut W,
    payload: &[u8],
) -> Result<(), GatewayServerError> {
    let header = format!("Content-Length: {}\r\n\r\n", payload.len());
    writer
        .write_all(header.as_bytes())
        .await
        .map_err(|_| GatewayServerError::Transport("stdio write failed".to_string()))?;
    writer
        .write_all(payload)
        .await
        .map_err(|_| GatewayServerError::Transport("stdio write failed".to_string()))?;
    writer
        .flush()
        .await
        .map_err(|_| GatewayServerError::Transport("stdio write failed".to_string()))
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Gateway server errors.
#[derive(Debug, thiserror::Error)]
pub enum GatewayServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
