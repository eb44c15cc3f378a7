//! MCP server transports and protocol handling.
//!
//! JSON-RPC 2.0 request/response types, the protocol method handlers
//! (initialize, tools/list, tools/call), and the two transports that feed
//! them: an actix-web HTTP server and a line-based STDIO loop. The method
//! handlers are transport-agnostic; each transport only parses requests and
//! writes responses.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use actix_web::{
    App, HttpResponse, HttpServer, Result as ActixResult,
    middleware::{Compress, DefaultHeaders},
    web,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

use crate::core::config::{ServerConfig, ToolsetSelection};
use crate::core::registry::ToolRegistry;
use crate::tools;

/// MCP protocol revision implemented by this server.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC error code: method not found (also used for unknown tools).
const METHOD_NOT_FOUND: i32 = -32601;
/// JSON-RPC error code: invalid params.
const INVALID_PARAMS: i32 = -32602;
/// JSON-RPC error code: parse error.
const PARSE_ERROR: i32 = -32700;

/// Server identity reported in MCP initialize responses. Shared across all
/// worker threads in HTTP mode.
#[derive(Clone)]
pub struct AppState {
    pub server_name: String,
    pub server_version: String,
}

/// JSON-RPC 2.0 request. `id` is `None` for notifications, which never get
/// a response.
#[derive(Deserialize, Debug)]
pub struct McpRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    params: Option<Value>,
}

/// JSON-RPC 2.0 response: exactly one of `result` and `error` is present.
#[derive(Serialize, Debug)]
pub struct McpResponse {
    jsonrpc: String,
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Serialize, Debug)]
pub struct McpError {
    code: i32,
    message: String,
}

impl McpResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        McpResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Option<Value>, code: i32, message: String) -> Self {
        McpResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(McpError { code, message }),
        }
    }
}

/// Build the tool registry for the configured toolsets.
pub fn initialize_tools(selection: ToolsetSelection) -> Arc<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    if selection.includes_calculator() {
        tools::calculator::register(&mut registry);
    }
    if selection.includes_demo() {
        tools::demo::register(&mut registry);
    }
    info!(tools = registry.tools().len(), "tool registry initialized");
    Arc::new(registry)
}

/// Route a parsed JSON-RPC request to the matching MCP method handler.
///
/// Shared by both transports; everything here is synchronous because every
/// tool handler is a pure function.
pub fn handle_request(state: &AppState, registry: &ToolRegistry, request: &McpRequest) -> McpResponse {
    match request.method.as_str() {
        "initialize" => handle_initialize(state, request.id.clone()),
        "tools/list" => handle_tools_list(registry, request.id.clone()),
        "tools/call" => handle_tools_call(registry, request.id.clone(), request.params.clone()),
        other => McpResponse::failure(
            request.id.clone(),
            METHOD_NOT_FOUND,
            format!("Method not found: {other}"),
        ),
    }
}

/// MCP initialize: protocol version, capabilities, and server identity.
fn handle_initialize(state: &AppState, id: Option<Value>) -> McpResponse {
    McpResponse::success(
        id,
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": state.server_name,
                "version": state.server_version
            }
        }),
    )
}

/// MCP tools/list: every registered tool with its input schema.
fn handle_tools_list(registry: &ToolRegistry, id: Option<Value>) -> McpResponse {
    McpResponse::success(id, json!({ "tools": registry.tools() }))
}

/// MCP tools/call: look up the named tool and run it.
///
/// Operation error strings are successful results from the protocol's point
/// of view and are relayed verbatim (`isError: false`); only a call that
/// could not run at all (malformed arguments) reports `isError: true`.
fn handle_tools_call(registry: &ToolRegistry, id: Option<Value>, params: Option<Value>) -> McpResponse {
    let Some(params) = params else {
        return McpResponse::failure(id, INVALID_PARAMS, "Invalid params".to_string());
    };

    let tool_name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
    let arguments = params
        .get("arguments")
        .cloned()
        .unwrap_or_else(|| json!({}));

    match registry.invoke(tool_name, arguments) {
        Some(Ok(result)) => {
            debug!(tool = tool_name, "tool call succeeded");
            McpResponse::success(
                id,
                json!({
                    "content": [{ "type": "text", "text": content_text(&result) }],
                    "isError": false
                }),
            )
        }
        Some(Err(message)) => {
            warn!(tool = tool_name, %message, "tool call failed");
            McpResponse::success(
                id,
                json!({
                    "content": [{ "type": "text", "text": format!("Error: {message}") }],
                    "isError": true
                }),
            )
        }
        None => McpResponse::failure(
            id,
            METHOD_NOT_FOUND,
            format!("Unknown tool: {tool_name}"),
        ),
    }
}

/// Render a tool result as the text of an MCP content item. String results
/// (timestamps, upper-cased text, operation error messages) pass through
/// verbatim; everything else is compact JSON.
fn content_text(result: &Value) -> String {
    match result.as_str() {
        Some(text) => text.to_string(),
        None => result.to_string(),
    }
}

/// Health check endpoint for load balancers and monitoring.
async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "calculator-mcp-server"
    })))
}

/// Total requests processed since startup.
async fn metrics_handler(counter: web::Data<AtomicU64>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "requests_total": counter.load(Ordering::Relaxed),
        "status": "ok"
    })))
}

/// Server-Sent Events endpoint for tools discovery.
async fn sse_tools_discovery(registry: web::Data<Arc<ToolRegistry>>) -> ActixResult<HttpResponse> {
    use actix_web::http::header;

    let payload = json!({
        "tools": registry.tools(),
        "count": registry.tools().len()
    });
    let sse_data = format!("data: {payload}\n\n");

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(header::CacheControl(vec![
            header::CacheDirective::NoCache,
            header::CacheDirective::NoStore,
            header::CacheDirective::MustRevalidate,
        ]))
        // Disable nginx buffering so events stream through unbuffered
        .insert_header(("x-accel-buffering", "no"))
        .body(sse_data))
}

/// HTTP JSON-RPC endpoint.
async fn mcp_handler(
    state: web::Data<AppState>,
    registry: web::Data<Arc<ToolRegistry>>,
    counter: web::Data<AtomicU64>,
    request: web::Json<McpRequest>,
) -> ActixResult<HttpResponse> {
    counter.fetch_add(1, Ordering::Relaxed);
    let response = handle_request(&state, &registry, &request);
    Ok(HttpResponse::Ok().json(response))
}

/// Run the server in HTTP mode.
///
/// Worker count defaults to the CPU count capped at 16 and can be
/// overridden via `WORKER_THREADS`. Connection limits and timeouts are
/// tuned for high-traffic deployments.
pub async fn run_server_http(config: ServerConfig) -> std::io::Result<()> {
    use std::time::Duration;

    let bind_addr = config.bind_addr();

    let app_state = web::Data::new(AppState {
        server_name: config.name.clone(),
        server_version: config.version.clone(),
    });
    let tool_registry = web::Data::new(initialize_tools(config.toolsets));
    let request_count = web::Data::new(AtomicU64::new(0));

    let workers = std::env::var("WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or_else(|| num_cpus::get().clamp(1, 16));

    info!(
        name = %config.name,
        version = %config.version,
        %bind_addr,
        workers,
        "MCP server starting (HTTP mode)"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(tool_registry.clone())
            .app_data(request_count.clone())
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("X-Frame-Options", "DENY"))
                    .add(("X-XSS-Protection", "1; mode=block")),
            )
            .route("/health", web::get().to(health))
            .route("/metrics", web::get().to(metrics_handler))
            .route("/sse", web::get().to(sse_tools_discovery))
            .route("/mcp", web::post().to(mcp_handler))
            .route("/", web::post().to(mcp_handler))
            .route("/", web::get().to(health))
    })
    .workers(workers)
    .max_connections(10000)
    .max_connection_rate(1000)
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_secs(30))
    .client_disconnect_timeout(Duration::from_secs(2))
    .shutdown_timeout(10)
    .bind(&bind_addr)?
    .run()
    .await
}

/// Run the server in STDIO mode.
///
/// Reads line-delimited JSON-RPC requests from stdin and writes responses
/// to stdout, one per line. All diagnostics go to stderr so the protocol
/// stream stays clean. Notifications (requests without an id) are skipped.
pub async fn run_server_stdio(config: ServerConfig) -> std::io::Result<()> {
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};

    info!(
        name = %config.name,
        version = %config.version,
        "MCP server starting (STDIO mode)"
    );

    let registry = initialize_tools(config.toolsets);
    let state = AppState {
        server_name: config.name,
        server_version: config.version,
    };

    let stdin = tokio::io::stdin();
    let mut lines = BufReader::with_capacity(8192, stdin).lines();
    let stdout = tokio::io::stdout();
    let mut stdout = BufWriter::with_capacity(8192, stdout);

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<McpRequest>(&line) {
            Ok(request) => {
                if request.id.is_none() {
                    // Notification; "notifications/initialized" included.
                    debug!(method = %request.method, "skipping notification");
                    continue;
                }
                handle_request(&state, &registry, &request)
            }
            Err(e) => {
                warn!(%e, "failed to parse request line");
                // Respond only when an id can be recovered from the line.
                let Some(id) = serde_json::from_str::<Value>(&line)
                    .ok()
                    .and_then(|partial| partial.get("id").cloned())
                else {
                    continue;
                };
                McpResponse::failure(Some(id), PARSE_ERROR, format!("Parse error: {e}"))
            }
        };

        let response_json = match serde_json::to_string(&response) {
            Ok(j) => j,
            Err(e) => {
                error!(%e, "failed to serialize response");
                continue;
            }
        };
        stdout.write_all(response_json.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        // Flush per response for low latency.
        stdout.flush().await?;
    }

    Ok(())
}
