//! MCP Tool Gateway Library
//!
//! A tolerant HTTP gateway between chat front-ends and a registry of named
//! tools. Tool calls arrive in whatever encoding the front-end produces
//! (JSON, form fields, mislabelled bodies), are normalized into a canonical
//! `{tool, parameters}` call, dispatched, and answered with a uniform
//! success/error envelope.
//!
//! # Architecture
//!
//! - **core**: Configuration, error handling, the gateway server and HTTP transport
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: Tool handlers, descriptors and the registry
//!   - **calls**: Normalization, dispatch, diagnostics and the result envelope
//!
//! # Example
//!
//! ```rust,no_run
//! use mcp_gateway::core::{Config, GatewayServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = GatewayServer::with_builtin_tools(config)?;
//!     server.serve().await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, GatewayServer, Result};
