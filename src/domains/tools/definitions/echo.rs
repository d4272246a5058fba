//! Echo tool definition.
//!
//! Returns the parameters it was called with. Useful for checking what the
//! gateway actually delivered after normalization.

use serde_json::Value;
use tracing::info;

use crate::domains::tools::{Parameters, ToolDescriptor, ToolError, ToolHandler};

/// Echo tool - returns its parameters unchanged.
pub struct EchoTool;

impl EchoTool {
    /// Tool name as registered in the gateway.
    pub const NAME: &'static str = "echo";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Return the received parameters unchanged. Accepts any parameters.";

    /// Build the registry descriptor for this tool.
    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(Self::NAME, Self).with_description(Self::DESCRIPTION)
    }
}

#[async_trait::async_trait]
impl ToolHandler for EchoTool {
    async fn invoke(&self, parameters: Parameters) -> Result<Value, ToolError> {
        info!("Echo tool called with {} parameter(s)", parameters.len());
        Ok(Value::Object(parameters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_echo_returns_parameters() {
        let params = json!({ "x": 1, "nested": { "y": [1, 2] } });
        let result = EchoTool
            .invoke(params.as_object().cloned().unwrap())
            .await
            .unwrap();
        assert_eq!(result, params);
    }

    #[tokio::test]
    async fn test_echo_empty() {
        let result = EchoTool.invoke(Parameters::new()).await.unwrap();
        assert_eq!(result, json!({}));
    }
}
