//! Gateway server and lifecycle management.
//!
//! [`GatewayServer`] owns the frozen tool registry and the call pipeline
//! (normalizer and dispatcher). The HTTP transport holds a clone of it as
//! router state; every method here is transport-agnostic.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool
//! and registered through [`register_builtin_tools`]. A custom registry can
//! be passed to [`GatewayServer::new`] instead.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};

use super::config::Config;
use super::error::Result;
use super::transport::HttpTransport;
use crate::domains::calls::{CallError, Dispatcher, Normalizer, RawRequest, ResultEnvelope};
use crate::domains::tools::{ToolRegistry, register_builtin_tools};

/// Reachability of the upstream chat-UI API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamStatus {
    Connected,
    Disconnected,
    NotConfigured,
}

impl UpstreamStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::NotConfigured => "not_configured",
        }
    }
}

/// Build the client used for the upstream probe.
fn probe_client(timeout_secs: u64) -> reqwest::Client {
    match reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            warn!(
                "Could not build upstream client with a {}s timeout, probing without one: {}",
                timeout_secs, e
            );
            reqwest::Client::new()
        }
    }
}

/// The gateway server.
#[derive(Clone)]
pub struct GatewayServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Converts raw request bodies into canonical calls.
    normalizer: Normalizer,

    /// Runs canonical calls against the registry.
    dispatcher: Dispatcher,

    /// Client for the upstream health probe.
    http_client: reqwest::Client,
}

impl GatewayServer {
    /// Create a gateway over an already-populated registry.
    ///
    /// The registry is frozen from here on: it is only ever read.
    pub fn new(config: Config, registry: ToolRegistry) -> Self {
        let config = Arc::new(config);
        let normalizer = Normalizer::new(config.diagnostics.body_preview_limit);
        let dispatcher = Dispatcher::new(Arc::new(registry));

        let http_client = probe_client(config.upstream.timeout_secs);

        info!("Gateway initialized with {} tools", dispatcher.registry().len());

        Self {
            config,
            normalizer,
            dispatcher,
            http_client,
        }
    }

    /// Create a gateway with the built-in tools registered.
    pub fn with_builtin_tools(config: Config) -> Result<Self> {
        let mut registry = ToolRegistry::new();
        register_builtin_tools(&mut registry)?;
        Ok(Self::new(config, registry))
    }

    /// Serve the gateway over HTTP until shutdown.
    pub async fn serve(self) -> Result<()> {
        let transport = HttpTransport::new(self.config.transport.clone());
        transport.run(self).await?;
        Ok(())
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn registry(&self) -> &ToolRegistry {
        self.dispatcher.registry()
    }

    /// List all registered tools.
    pub fn list_tools(&self) -> Value {
        let tools: Vec<Value> = self
            .registry()
            .iter()
            .map(|t| {
                json!({
                    "name": t.name(),
                    "description": t.description(),
                    "parameters": t.parameters().iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
                })
            })
            .collect();

        json!({
            "total": tools.len(),
            "tools": tools,
        })
    }

    /// Handle a generic tool call from a raw request.
    ///
    /// Returns the HTTP status alongside the envelope: `400 Bad Request` when
    /// no tool name could be recovered, `200 OK` otherwise.
    #[instrument(skip_all, fields(content_type = ?raw.content_type(), body_len = raw.body().len()))]
    pub async fn call(&self, raw: &RawRequest) -> (StatusCode, ResultEnvelope) {
        match self.normalizer.normalize(raw) {
            Ok(call) => (StatusCode::OK, self.dispatcher.dispatch(call).await),
            Err(e) => {
                let status = if matches!(e, CallError::MissingToolName { .. }) {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::OK
                };
                warn!(error = %e, "Could not normalize call");
                (status, e.into())
            }
        }
    }

    /// Invoke a tool directly with a strict JSON body.
    pub async fn invoke_direct(&self, tool_name: &str, body: &[u8]) -> ResultEnvelope {
        self.dispatcher.invoke_direct_raw(tool_name, body).await
    }

    /// Probe the upstream `/health` endpoint.
    pub async fn upstream_status(&self) -> UpstreamStatus {
        let Some(url) = self.config.upstream.health_url() else {
            return UpstreamStatus::NotConfigured;
        };

        let mut request = self.http_client.get(&url);
        if let Some(key) = &self.config.upstream.api_key {
            request = request.bearer_auth(key);
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => UpstreamStatus::Connected,
            Ok(response) => {
                debug!("Upstream {} answered {}", url, response.status());
                UpstreamStatus::Disconnected
            }
            Err(e) => {
                debug!("Upstream {} unreachable: {}", url, e);
                UpstreamStatus::Disconnected
            }
        }
    }

    /// Health report for the gateway and its upstream.
    pub async fn health(&self) -> Value {
        let upstream = self.upstream_status().await;
        json!({
            "mcp_server": "healthy",
            "upstream": upstream.as_str(),
            "tools_loaded": self.registry().len(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Server info for the root endpoint.
    pub fn info(&self) -> Value {
        json!({
            "name": self.name(),
            "version": self.version(),
            "transport": "HTTP",
            "tools_loaded": self.registry().len(),
            "endpoints": {
                "call": "POST /mcp/call",
                "test": "POST /mcp/test/{tool_name}",
                "tools": "GET /mcp/tools",
                "health": "GET /health"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::{ToolDescriptor, ToolError};

    fn server() -> GatewayServer {
        GatewayServer::with_builtin_tools(Config::default()).unwrap()
    }

    #[test]
    fn test_list_tools() {
        let tools = server().list_tools();
        assert_eq!(tools["total"], 3);
        let names: Vec<&str> = tools["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["add", "current_time", "echo"]);
        assert_eq!(tools["tools"][0]["parameters"], json!(["a", "b"]));
    }

    #[tokio::test]
    async fn test_call_statuses() {
        let server = server();

        let raw = RawRequest::new(
            Some("application/json"),
            r#"{"tool":"add","parameters":{"a":2,"b":3}}"#,
        );
        let (status, envelope) = server.call(&raw).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(envelope, ResultEnvelope::success("add", json!(5)));

        let raw = RawRequest::new(Some("application/json"), r#"{"foo":"bar"}"#);
        let (status, envelope) = server.call(&raw).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(envelope.tool(), None);

        let raw = RawRequest::new(Some("application/json"), r#"{"tool":"nope"}"#);
        let (status, envelope) = server.call(&raw).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!envelope.is_success());
    }

    #[tokio::test]
    async fn test_custom_registry() {
        let mut registry = ToolRegistry::new();
        registry
            .register(ToolDescriptor::from_fn("ping", |_| async {
                Ok::<_, ToolError>(json!("pong"))
            }))
            .unwrap();
        let server = GatewayServer::new(Config::default(), registry);

        let envelope = server.invoke_direct("ping", b"").await;
        assert_eq!(envelope, ResultEnvelope::success("ping", json!("pong")));
        assert_eq!(server.info()["tools_loaded"], 1);
    }

    #[tokio::test]
    async fn test_health_without_upstream() {
        let health = server().health().await;
        assert_eq!(health["mcp_server"], "healthy");
        assert_eq!(health["upstream"], "not_configured");
        assert_eq!(health["tools_loaded"], 3);
        assert!(health["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_probe_client_honours_timeout() {
        let client = probe_client(1);
        let started = std::time::Instant::now();
        // 10.255.255.1 is non-routable, so only the timeout ends the request
        let _ = client.get("http://10.255.255.1/health").send().await;
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_disconnected() {
        let mut config = Config::default();
        // Port 9 (discard) on localhost is not expected to run an HTTP server
        config.upstream.base_url = Some("http://127.0.0.1:9".to_string());
        config.upstream.timeout_secs = 1;
        let server = GatewayServer::with_builtin_tools(config).unwrap();
        assert_eq!(server.upstream_status().await, UpstreamStatus::Disconnected);
    }
}
