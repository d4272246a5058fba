//! Tools domain module.
//!
//! Tools are named operations a chat front-end can invoke through the
//! gateway. Each one implements [`ToolHandler`] and is registered with a
//! [`ToolDescriptor`] in the [`ToolRegistry`] at startup.
//!
//! ## Architecture
//!
//! - `definitions/` - Built-in tool implementations (one file per tool)
//! - `handlers.rs` - Handler trait, closure adapters, parameter parsing
//! - `registry.rs` - Descriptors and the name-to-tool registry
//! - `error.rs` - Tool and registry error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Implement `ToolHandler` and a `descriptor()` constructor
//! 3. Register it in `definitions::register_builtin_tools`
//!
//! Tools can also be registered from outside the crate with
//! [`ToolDescriptor::from_fn`] or [`ToolDescriptor::from_blocking_fn`].

pub mod definitions;
mod error;
mod handlers;
mod registry;

pub use definitions::register_builtin_tools;
pub use error::{RegistryError, ToolError};
pub use handlers::{BlockingFnTool, FnTool, Parameters, ToolHandler, parse_parameters};
pub(crate) use handlers::panic_message;
pub use registry::{ToolDescriptor, ToolParameter, ToolRegistry};
