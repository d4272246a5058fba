//! The uniform response wrapper returned for every tool call.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::CallError;

/// Result of a single tool call, as sent on the wire.
///
/// Serializes as `{"status":"success","tool":..,"result":..}` or
/// `{"status":"error","tool":..|null,"error":..,"detail":..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ResultEnvelope {
    #[serde(rename = "success")]
    Success { tool: String, result: Value },

    #[serde(rename = "error")]
    Failure {
        tool: Option<String>,
        error: String,
        detail: String,
    },
}

impl ResultEnvelope {
    pub fn success(tool: impl Into<String>, result: Value) -> Self {
        Self::Success {
            tool: tool.into(),
            result,
        }
    }

    pub fn failure(
        tool: Option<String>,
        error: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::Failure {
            tool,
            error: error.into(),
            detail: detail.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn tool(&self) -> Option<&str> {
        match self {
            Self::Success { tool, .. } => Some(tool),
            Self::Failure { tool, .. } => tool.as_deref(),
        }
    }
}

impl From<CallError> for ResultEnvelope {
    fn from(err: CallError) -> Self {
        Self::failure(err.tool().map(str::to_string), err.to_string(), err.detail())
    }
}
