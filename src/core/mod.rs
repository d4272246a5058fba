//! Core module containing shared infrastructure components.
//!
//! Configuration, error handling, the gateway server, and the HTTP
//! transport.

pub mod config;
pub mod error;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use server::{GatewayServer, UpstreamStatus};
pub use transport::{HttpConfig, HttpTransport};
