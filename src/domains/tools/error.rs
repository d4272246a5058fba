//! Tool-specific error types.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors a tool handler can return from `invoke`.
///
/// Handlers own their argument validation, so most failures surface as
/// `InvalidArguments`. Anything else is an execution
/// failure, optionally carrying the underlying cause so the dispatcher can
/// render a full trace.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Parameters were supplied but could not be accepted.
    #[error("invalid parameters: {0}")]
    InvalidArguments(String),

    /// The tool ran and failed.
    #[error("{message}")]
    ExecutionFailed {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The tool panicked while running.
    #[error("tool panicked: {0}")]
    Panicked(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "execution failed" error without an underlying cause.
    pub fn execution_failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new "execution failed" error wrapping its cause.
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ExecutionFailed {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Errors raised while building the tool registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A tool with this name was already registered.
    #[error("duplicate tool: '{0}' is already registered")]
    DuplicateTool(String),

    /// Tool names must be non-empty.
    #[error("tool name must not be empty")]
    EmptyName,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_with_source_keeps_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = ToolError::with_source("could not read project", io);

        assert_eq!(err.to_string(), "could not read project");
        let cause = err.source().expect("source should be kept");
        assert_eq!(cause.to_string(), "no such file");
    }

    #[test]
    fn test_invalid_arguments_message() {
        let err = ToolError::invalid_arguments("missing field `b`");
        assert_eq!(err.to_string(), "invalid parameters: missing field `b`");
    }
}
