//! Tool definitions module.
//!
//! Built-in tools registered at startup. Each tool is defined in its own
//! file and exposes a `descriptor()` used by [`register_builtin_tools`].

pub mod add;
pub mod current_time;
pub mod echo;

pub use add::{AddParams, AddTool};
pub use current_time::{CurrentTimeParams, CurrentTimeTool};
pub use echo::EchoTool;

use super::error::RegistryError;
use super::registry::ToolRegistry;

/// Register every built-in tool.
///
/// This is the central place where built-in tools are registered.
/// When adding a new tool, add it here.
pub fn register_builtin_tools(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry
        .register(EchoTool::descriptor())?
        .register(AddTool::descriptor())?
        .register(CurrentTimeTool::descriptor())?;
    Ok(())
}
