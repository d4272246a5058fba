//! Tool dispatch.
//!
//! The dispatcher is the boundary between the gateway and tool code. It
//! resolves the canonical call against the registry, runs the handler, and
//! turns every outcome (including a panic inside the handler) into a
//! [`ResultEnvelope`].

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::envelope::ResultEnvelope;
use super::error::CallError;
use super::normalizer::CanonicalCall;
use crate::domains::tools::{ToolError, ToolRegistry, panic_message};

/// Dispatches canonical calls to registered tools.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    /// Create a dispatcher over a frozen registry.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run a call and wrap the outcome in an envelope.
    ///
    /// Never fails and never panics because of the handler: every failure
    /// becomes a `Failure` envelope carrying the tool name.
    #[instrument(skip_all, fields(tool = %call.tool))]
    pub async fn dispatch(&self, call: CanonicalCall) -> ResultEnvelope {
        let tool = call.tool.clone();
        match self.execute(call).await {
            Ok(result) => {
                info!("Tool executed successfully");
                ResultEnvelope::success(tool, result)
            }
            Err(e) => {
                warn!(error = %e, "Tool call failed");
                e.into()
            }
        }
    }

    /// Run a call, returning the raw result or the failure.
    pub async fn execute(&self, call: CanonicalCall) -> Result<Value, CallError> {
        let CanonicalCall { tool, parameters } = call;

        let Some(descriptor) = self.registry.lookup(&tool) else {
            warn!("Unknown tool requested: {}", tool);
            return Err(CallError::tool_not_found(tool, self.registry.list_names()));
        };

        let received: Vec<String> = parameters.keys().cloned().collect();
        info!(
            declared = %descriptor.parameter_summary(),
            received = ?received,
            "Invoking tool"
        );

        let outcome = AssertUnwindSafe(descriptor.handler().invoke(parameters))
            .catch_unwind()
            .await;

        let error = match outcome {
            Ok(Ok(result)) => return Ok(result),
            Ok(Err(e)) => e,
            Err(payload) => ToolError::Panicked(panic_message(payload)),
        };

        Err(CallError::handler_execution(descriptor, &received, &error))
    }
}
