//! Call-level error types.

use std::error::Error as _;
use std::fmt::Write as _;

use thiserror::Error;

use crate::domains::tools::{ToolDescriptor, ToolError};

/// Errors that end a tool call with a `Failure` envelope.
#[derive(Debug, Error)]
pub enum CallError {
    /// No tool name could be recovered from any supported request shape.
    #[error("no tool name provided")]
    MissingToolName { detail: String },

    /// The tool name was recovered but nothing is registered under it.
    #[error("tool not found")]
    ToolNotFound { tool: String, available: Vec<String> },

    /// The tool's own logic failed.
    #[error("{message}")]
    HandlerExecution {
        tool: String,
        message: String,
        trace: String,
    },

    /// The diagnostics endpoint received a body it could not accept.
    #[error("invalid request body")]
    InvalidBody { tool: String, reason: String },
}

impl CallError {
    /// Create a "tool not found" error listing what is available.
    pub fn tool_not_found<'a>(
        tool: impl Into<String>,
        available: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self::ToolNotFound {
            tool: tool.into(),
            available: available.into_iter().map(str::to_string).collect(),
        }
    }

    /// Wrap a handler failure with a trace of its cause chain and the
    /// declared versus received parameter shape.
    pub fn handler_execution(
        descriptor: &ToolDescriptor,
        received: &[String],
        error: &ToolError,
    ) -> Self {
        let mut trace = format!("Error executing tool '{}': {}", descriptor.name(), error);

        let mut source = error.source();
        while let Some(cause) = source {
            let _ = write!(trace, "\n  caused by: {}", cause);
            source = cause.source();
        }

        let _ = write!(trace, "\n  error kind: {:?}", error);
        let _ = write!(
            trace,
            "\n  declared parameters: {}",
            descriptor.parameter_summary()
        );
        let received = if received.is_empty() {
            "(none)".to_string()
        } else {
            received.join(", ")
        };
        let _ = write!(trace, "\n  received parameters: {}", received);

        Self::HandlerExecution {
            tool: descriptor.name().to_string(),
            message: error.to_string(),
            trace,
        }
    }

    /// The tool name, when one was identified before the failure.
    pub fn tool(&self) -> Option<&str> {
        match self {
            Self::MissingToolName { .. } => None,
            Self::ToolNotFound { tool, .. }
            | Self::HandlerExecution { tool, .. }
            | Self::InvalidBody { tool, .. } => Some(tool),
        }
    }

    /// Diagnostic text for the envelope's `detail` field.
    pub fn detail(&self) -> String {
        match self {
            Self::MissingToolName { detail } => detail.clone(),
            Self::ToolNotFound { tool, available } => format!(
                "Tool '{}' not found. Available tools: [{}]",
                tool,
                available.join(", ")
            ),
            Self::HandlerExecution { trace, .. } => trace.clone(),
            Self::InvalidBody { tool, reason } => format!(
                "Could not read the body for tool '{}': {}. \
                 Expected a JSON object of the form {{\"parameters\": {{...}}}}",
                tool, reason
            ),
        }
    }
}

/// A sub-field of a request failed to decode.
///
/// Never surfaced as a failure on its own: the field degrades to an empty
/// value and the problem is only recorded in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed {field}: {reason}")]
pub struct MalformedEncoding {
    pub field: &'static str,
    pub reason: String,
}

impl MalformedEncoding {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}
