//! Transport layer for the gateway.
//!
//! The gateway is served over HTTP only:
//! - `POST /mcp/call` - tool calls in any supported encoding
//! - `POST /mcp/test/{tool_name}` - direct invocation with a strict JSON body
//! - `GET /mcp/tools`, `GET /health`, `GET /` - discovery and status

mod config;
mod error;
pub mod http;

pub use config::HttpConfig;
pub use error::{TransportError, TransportResult};
pub use http::HttpTransport;
