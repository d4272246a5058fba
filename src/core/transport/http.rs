//! HTTP transport implementation.
//!
//! Plain HTTP endpoints with JSON responses, so chat front-ends and standard
//! clients (curl, browsers) can call tools without speaking a protocol.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State, rejection::BytesRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::{HttpConfig, TransportError, TransportResult};
use crate::core::GatewayServer;
use crate::domains::calls::{RawRequest, ResultEnvelope};

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        self.config.address()
    }

    /// Build the router serving `server`.
    pub fn router(&self, server: GatewayServer) -> Router {
        let mut app = Router::new()
            .route("/mcp/call", post(handle_call))
            .route("/mcp/test/{tool_name}", post(handle_direct))
            .route("/mcp/tools", get(list_tools))
            .route("/health", get(health_check))
            .route("/", get(root_handler))
            .with_state(server)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(DefaultBodyLimit::max(self.config.body_limit)),
            );

        // Add CORS if enabled
        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        app
    }

    /// Run the HTTP transport until Ctrl-C.
    pub async fn run(self, server: GatewayServer) -> TransportResult<()> {
        let addr = self.address();
        let app = self.router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!("Ready - {} (CORS {})", self.config.description(), cors_status);
        info!("  → Call:   POST /mcp/call");
        info!("  → Test:   POST /mcp/test/{{tool_name}}");
        info!("  → Tools:  GET /mcp/tools");
        info!("  → Health: GET /health");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Root handler - provides server info.
async fn root_handler(State(server): State<GatewayServer>) -> impl IntoResponse {
    Json(server.info())
}

/// Health check endpoint.
async fn health_check(State(server): State<GatewayServer>) -> impl IntoResponse {
    Json(server.health().await)
}

async fn list_tools(State(server): State<GatewayServer>) -> impl IntoResponse {
    Json(server.list_tools())
}

/// Generic tool call in any supported body encoding.
async fn handle_call(
    State(server): State<GatewayServer>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => return rejected_body(&server, None, rejection),
    };
    let raw = RawRequest::from_parts(&headers, body);
    let (status, envelope) = server.call(&raw).await;
    (status, Json(envelope)).into_response()
}

/// Direct invocation with a strict JSON body.
async fn handle_direct(
    State(server): State<GatewayServer>,
    Path(tool_name): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    match body {
        Ok(body) => Json(server.invoke_direct(&tool_name, &body).await).into_response(),
        Err(rejection) => rejected_body(&server, Some(tool_name), rejection),
    }
}

/// Answer an unreadable body with a failure envelope, keeping the
/// rejection's status code (413 for an oversized body).
fn rejected_body(
    server: &GatewayServer,
    tool: Option<String>,
    rejection: BytesRejection,
) -> Response {
    let status = rejection.status();
    let limit = server.config().transport.body_limit;
    warn!(%status, limit, "Rejected request body: {}", rejection.body_text());

    let error = if status == StatusCode::PAYLOAD_TOO_LARGE {
        "request body too large"
    } else {
        "request body unreadable"
    };
    let detail = format!("{} (body limit: {} bytes)", rejection.body_text(), limit);
    (status, Json(ResultEnvelope::failure(tool, error, detail))).into_response()
}
