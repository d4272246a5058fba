//! Add tool definition.
//!
//! Sums two numbers. Integer inputs produce an integer result so that
//! `{"a": 2, "b": 3}` answers `5`, not `5.0`.

use serde::Deserialize;
use serde_json::{Number, Value};
use tracing::{info, instrument};

use crate::domains::tools::{
    Parameters, ToolDescriptor, ToolError, ToolHandler, ToolParameter, parse_parameters,
};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the add tool.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddParams {
    pub a: Number,
    pub b: Number,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Add tool - returns `a + b`.
pub struct AddTool;

impl AddTool {
    /// Tool name as registered in the gateway.
    pub const NAME: &'static str = "add";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Add two numbers and return the sum.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(a = %params.a, b = %params.b))]
    pub fn execute(params: &AddParams) -> Result<Value, ToolError> {
        info!("Add tool called");

        if let (Some(a), Some(b)) = (params.a.as_i64(), params.b.as_i64()) {
            return a
                .checked_add(b)
                .map(Value::from)
                .ok_or_else(|| ToolError::execution_failed(format!("{} + {} overflows", a, b)));
        }

        // as_f64 is always Some for numbers parsed without arbitrary precision
        let a = params.a.as_f64().unwrap_or_default();
        let b = params.b.as_f64().unwrap_or_default();
        Number::from_f64(a + b)
            .map(Value::Number)
            .ok_or_else(|| ToolError::execution_failed("sum is not a finite number"))
    }

    /// Build the registry descriptor for this tool.
    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(Self::NAME, Self)
            .with_description(Self::DESCRIPTION)
            .with_parameters([ToolParameter::required("a"), ToolParameter::required("b")])
    }
}

#[async_trait::async_trait]
impl ToolHandler for AddTool {
    async fn invoke(&self, parameters: Parameters) -> Result<Value, ToolError> {
        let params: AddParams = parse_parameters(parameters)?;
        Self::execute(&params)
    }
}

// ============================================================================
// Tests
// ============================================================================
