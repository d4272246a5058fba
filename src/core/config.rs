//! Configuration management for the gateway.
//!
//! Values come from defaults, optionally overridden by `MCP_`-prefixed
//! environment variables (a `.env` file is loaded first when present).

use super::transport::HttpConfig;
use crate::domains::calls::DEFAULT_PREVIEW_LIMIT;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Main configuration structure for the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// HTTP transport configuration.
    pub transport: HttpConfig,

    /// Request diagnostics configuration.
    pub diagnostics: DiagnosticsConfig,

    /// Upstream chat-UI API probed by the health endpoint.
    pub upstream: UpstreamConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for request diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Number of raw body characters included in diagnostic records.
    pub body_preview_limit: usize,
}

/// Configuration for the upstream chat-UI API.
#[derive(Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL, e.g. `http://localhost:8080`. `None` disables the probe.
    pub base_url: Option<String>,

    /// Optional bearer token sent with the probe.
    pub api_key: Option<String>,

    /// Probe timeout in seconds.
    pub timeout_secs: u64,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            body_preview_limit: DEFAULT_PREVIEW_LIMIT,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_secs: 5,
        }
    }
}

impl UpstreamConfig {
    /// URL of the upstream health endpoint, if an upstream is configured.
    pub fn health_url(&self) -> Option<String> {
        self.base_url
            .as_deref()
            .map(|base| format!("{}/health", base.trim_end_matches('/')))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "mcp-gateway".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: HttpConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
            upstream: UpstreamConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_UPSTREAM_URL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = HttpConfig::from_env();

        if let Ok(limit) = std::env::var("MCP_DIAGNOSTIC_PREVIEW") {
            match limit.parse() {
                Ok(limit) => config.diagnostics.body_preview_limit = limit,
                Err(_) => warn!("Ignoring invalid MCP_DIAGNOSTIC_PREVIEW value: {}", limit),
            }
        }

        // Upstream probe
        match std::env::var("MCP_UPSTREAM_URL") {
            Ok(url) if !url.trim().is_empty() => {
                info!("Upstream health probe enabled: {}", url);
                config.upstream.base_url = Some(url);
            }
            _ => warn!("MCP_UPSTREAM_URL not set - upstream health will report not_configured"),
        }

        if let Ok(api_key) = std::env::var("MCP_UPSTREAM_API_KEY") {
            config.upstream.api_key = Some(api_key);
        }

        if let Ok(timeout) = std::env::var("MCP_UPSTREAM_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(timeout) => config.upstream.timeout_secs = timeout,
                Err(_) => warn!("Ignoring invalid MCP_UPSTREAM_TIMEOUT_SECS value: {}", timeout),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.name, "mcp-gateway");
        assert_eq!(config.transport.address(), "127.0.0.1:8888");
        assert_eq!(config.diagnostics.body_preview_limit, 200);
        assert!(config.upstream.base_url.is_none());
        assert_eq!(config.upstream.timeout_secs, 5);
    }

    #[test]
    fn test_upstream_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_UPSTREAM_URL", "http://localhost:3000/");
            std::env::set_var("MCP_UPSTREAM_TIMEOUT_SECS", "12");
        }
        let config = Config::from_env();
        assert_eq!(
            config.upstream.health_url().as_deref(),
            Some("http://localhost:3000/health")
        );
        assert_eq!(config.upstream.timeout_secs, 12);
        unsafe {
            std::env::remove_var("MCP_UPSTREAM_URL");
            std::env::remove_var("MCP_UPSTREAM_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_transport_and_preview_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_HTTP_PORT", "9100");
            std::env::set_var("MCP_HTTP_CORS", "false");
            std::env::set_var("MCP_DIAGNOSTIC_PREVIEW", "64");
        }
        let config = Config::from_env();
        assert_eq!(config.transport.port, 9100);
        assert!(!config.transport.enable_cors);
        assert_eq!(config.diagnostics.body_preview_limit, 64);
        unsafe {
            std::env::remove_var("MCP_HTTP_PORT");
            std::env::remove_var("MCP_HTTP_CORS");
            std::env::remove_var("MCP_DIAGNOSTIC_PREVIEW");
        }
    }

    #[test]
    fn test_invalid_numbers_keep_defaults() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_UPSTREAM_TIMEOUT_SECS", "soon");
            std::env::set_var("MCP_DIAGNOSTIC_PREVIEW", "-3");
        }
        let config = Config::from_env();
        assert_eq!(config.upstream.timeout_secs, 5);
        assert_eq!(config.diagnostics.body_preview_limit, 200);
        unsafe {
            std::env::remove_var("MCP_UPSTREAM_TIMEOUT_SECS");
            std::env::remove_var("MCP_DIAGNOSTIC_PREVIEW");
        }
    }

    #[test]
    fn test_api_key_redacted_in_debug() {
        let upstream = UpstreamConfig {
            base_url: Some("http://localhost:3000".to_string()),
            api_key: Some("super_secret_key".to_string()),
            timeout_secs: 5,
        };
        let debug_str = format!("{:?}", upstream);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_key"));
    }

    #[test]
    fn test_health_url_absent_without_base() {
        assert!(UpstreamConfig::default().health_url().is_none());
    }
}
