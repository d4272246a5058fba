//! Direct tool invocation for debugging.
//!
//! Skips request normalization entirely: the tool name comes from the URL and
//! the body must be a strict JSON object `{"parameters": {...}}`. If a tool
//! works here but not through the generic endpoint, the problem is in how the
//! front-end encodes its calls rather than in the tool.

use serde_json::Value;
use tracing::{info, instrument, warn};

use super::dispatcher::Dispatcher;
use super::envelope::ResultEnvelope;
use super::error::CallError;
use super::normalizer::CanonicalCall;
use crate::domains::tools::Parameters;

/// Read the parameters of a direct call from a strict JSON body.
///
/// An empty body means no parameters. Any other body must be a JSON object;
/// its `parameters` field, when present and not null, must be an object too.
/// Other top-level fields are ignored.
pub fn parse_direct_body(tool_name: &str, body: &[u8]) -> Result<Parameters, CallError> {
    let invalid = |reason: String| CallError::InvalidBody {
        tool: tool_name.to_string(),
        reason,
    };

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Parameters::new());
    }

    let value: Value = serde_json::from_slice(body).map_err(|e| invalid(e.to_string()))?;
    let Value::Object(mut object) = value else {
        return Err(invalid("body is not a JSON object".to_string()));
    };

    match object.remove("parameters") {
        None | Some(Value::Null) => Ok(Parameters::new()),
        Some(Value::Object(parameters)) => Ok(parameters),
        Some(_) => Err(invalid("'parameters' is not a JSON object".to_string())),
    }
}

impl Dispatcher {
    /// Invoke a tool directly with known-good parameters.
    ///
    /// Same envelope and the same total-catch guarantee as [`Dispatcher::dispatch`].
    #[instrument(skip_all, fields(tool = %tool_name))]
    pub async fn invoke_direct(&self, tool_name: &str, parameters: Parameters) -> ResultEnvelope {
        info!("Direct invocation via diagnostics surface");
        self.dispatch(CanonicalCall::new(tool_name, parameters)).await
    }

    /// Parse a strict JSON body and invoke the tool directly.
    pub async fn invoke_direct_raw(&self, tool_name: &str, body: &[u8]) -> ResultEnvelope {
        match parse_direct_body(tool_name, body) {
            Ok(parameters) => self.invoke_direct(tool_name, parameters).await,
            Err(e) => {
                warn!(tool = %tool_name, error = %e, detail = %e.detail(), "Rejected direct call body");
                e.into()
            }
        }
    }
}
