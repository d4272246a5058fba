//! Error types and handling for the gateway.
//!
//! Failures that happen while serving a call never reach this type: they are
//! turned into a failure envelope by the dispatcher. What remains are the
//! errors that stop the gateway from starting or serving.

use thiserror::Error;

use super::transport::TransportError;
use crate::domains::tools::RegistryError;

/// A specialized Result type for gateway operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the gateway.
#[derive(Debug, Error)]
pub enum Error {
    /// Error building the tool registry.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Error in the HTTP transport.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_convert() {
        let err: Error = RegistryError::DuplicateTool("echo".to_string()).into();
        assert!(matches!(err, Error::Registry(_)));
        assert!(err.to_string().starts_with("Registry error:"));

        let err: Error = TransportError::http("connection reset").into();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(err.to_string(), "Transport error: HTTP error: connection reset");
    }
}
