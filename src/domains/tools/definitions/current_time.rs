//! Current time tool definition.

use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::domains::tools::{
    Parameters, ToolDescriptor, ToolError, ToolHandler, ToolParameter, parse_parameters,
};

/// Parameters for the current time tool.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurrentTimeParams {
    /// Optional `strftime` pattern. RFC 3339 when absent.
    #[serde(default)]
    pub format: Option<String>,
}

/// Current time tool - reports the server's UTC clock.
pub struct CurrentTimeTool;

impl CurrentTimeTool {
    pub const NAME: &'static str = "current_time";

    pub const DESCRIPTION: &'static str =
        "Return the current UTC time, as RFC 3339 or formatted with an optional strftime pattern.";

    #[instrument(skip_all)]
    pub fn execute(params: &CurrentTimeParams) -> Result<Value, ToolError> {
        info!("Current time tool called");
        let now = Utc::now();

        let formatted = match params.format.as_deref() {
            None => now.to_rfc3339_opts(SecondsFormat::Secs, true),
            Some(pattern) => {
                // chrono reports bad patterns as a fmt::Error while rendering
                let mut out = String::new();
                std::fmt::write(&mut out, format_args!("{}", now.format(pattern))).map_err(
                    |_| ToolError::invalid_arguments(format!("invalid time format '{}'", pattern)),
                )?;
                out
            }
        };

        Ok(json!({
            "utc": formatted,
            "unix": now.timestamp(),
        }))
    }

    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(Self::NAME, Self)
            .with_description(Self::DESCRIPTION)
            .with_parameter(ToolParameter::optional("format"))
    }
}

#[async_trait::async_trait]
impl ToolHandler for CurrentTimeTool {
    async fn invoke(&self, parameters: Parameters) -> Result<Value, ToolError> {
        let params: CurrentTimeParams = parse_parameters(parameters)?;
        Self::execute(&params)
    }
}
