//! Tool Registry - central registration and lookup for all tools.
//!
//! The registry is filled once at startup and then shared behind an `Arc`.
//! After that point nothing holds a mutable reference to it, so concurrent
//! lookups from in-flight requests need no locking.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::error::{RegistryError, ToolError};
use super::handlers::{BlockingFnTool, FnTool, Parameters, ToolHandler};

// ============================================================================
// Tool Descriptor
// ============================================================================

/// A parameter a tool declares it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolParameter {
    pub name: String,
    pub required: bool,
}

impl ToolParameter {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
        }
    }
}

impl fmt::Display for ToolParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.required {
            write!(f, "{} (required)", self.name)
        } else {
            write!(f, "{} (optional)", self.name)
        }
    }
}

/// A registered tool: its name, description, declared parameters and handler.
#[derive(Clone)]
pub struct ToolDescriptor {
    name: String,
    description: String,
    parameters: Vec<ToolParameter>,
    handler: Arc<dyn ToolHandler>,
}

impl ToolDescriptor {
    /// Create a descriptor around a handler.
    pub fn new(name: impl Into<String>, handler: impl ToolHandler + 'static) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            parameters: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    /// Create a descriptor from an async closure.
    pub fn from_fn<F, Fut>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Parameters) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
    {
        Self::new(name, FnTool::new(func))
    }

    /// Create a descriptor from a blocking closure, run on the blocking pool.
    pub fn from_blocking_fn<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Parameters) -> Result<Value, ToolError> + Send + Sync + 'static,
    {
        Self::new(name, BlockingFnTool::new(func))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_parameter(mut self, parameter: ToolParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_parameters(mut self, parameters: impl IntoIterator<Item = ToolParameter>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Declared parameters, in declaration order.
    pub fn parameters(&self) -> &[ToolParameter] {
        &self.parameters
    }

    pub fn handler(&self) -> &Arc<dyn ToolHandler> {
        &self.handler
    }

    /// One-line rendering of the declared shape, used in diagnostics.
    pub fn parameter_summary(&self) -> String {
        if self.parameters.is_empty() {
            return "(none)".to_string();
        }
        self.parameters
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - maps tool names to descriptors.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolDescriptor>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Fails if the name is empty or already taken.
    pub fn register(&mut self, descriptor: ToolDescriptor) -> Result<&mut Self, RegistryError> {
        if descriptor.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.tools.contains_key(&descriptor.name) {
            return Err(RegistryError::DuplicateTool(descriptor.name));
        }

        debug!(
            tool = %descriptor.name,
            parameters = %descriptor.parameter_summary(),
            "Registered tool"
        );
        self.tools.insert(descriptor.name.clone(), descriptor);
        Ok(self)
    }

    /// Look up a tool by its exact name.
    pub fn lookup(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    /// All registered tool names, sorted.
    pub fn list_names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Iterate over descriptors in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.values()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn noop(name: &str) -> ToolDescriptor {
        ToolDescriptor::from_fn(name, |_| async { Ok::<_, ToolError>(Value::Null) })
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry
            .register(noop("list_projects").with_description("List all projects"))
            .unwrap();

        let tool = registry.lookup("list_projects").unwrap();
        assert_eq!(tool.name(), "list_projects");
        assert_eq!(tool.description(), "List all projects");
        assert!(registry.lookup("List_Projects").is_none());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(noop("echo")).unwrap();

        let err = registry.register(noop("echo")).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateTool(ref name) if name == "echo"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut registry = ToolRegistry::new();
        assert!(matches!(
            registry.register(noop("")),
            Err(RegistryError::EmptyName)
        ));
    }

    #[test]
    fn test_list_names_sorted() {
        let mut registry = ToolRegistry::new();
        registry
            .register(noop("write_code"))
            .unwrap()
            .register(noop("create_project"))
            .unwrap()
            .register(noop("read_code"))
            .unwrap();

        assert_eq!(
            registry.list_names(),
            vec!["create_project", "read_code", "write_code"]
        );
    }

    #[test]
    fn test_parameter_summary_keeps_order() {
        let tool = noop("write_code").with_parameters([
            ToolParameter::required("project"),
            ToolParameter::required("filename"),
            ToolParameter::optional("language"),
        ]);
        assert_eq!(
            tool.parameter_summary(),
            "project (required), filename (required), language (optional)"
        );
        assert_eq!(noop("list_projects").parameter_summary(), "(none)");
    }

    #[tokio::test]
    async fn test_blocking_descriptor() {
        let mut registry = ToolRegistry::new();
        registry
            .register(ToolDescriptor::from_blocking_fn("count", |p: Parameters| {
                Ok(json!(p.len()))
            }))
            .unwrap();

        let mut params = Parameters::new();
        params.insert("x".into(), json!(1));
        let result = registry
            .lookup("count")
            .unwrap()
            .handler()
            .invoke(params)
            .await
            .unwrap();
        assert_eq!(result, json!(1));
    }

    #[tokio::test]
    async fn test_concurrent_lookups_share_registry() {
        let mut registry = ToolRegistry::new();
        registry
            .register(ToolDescriptor::from_fn("echo", |p: Parameters| async move {
                Ok::<_, ToolError>(Value::Object(p))
            }))
            .unwrap();
        let registry = Arc::new(registry);

        let mut handles = Vec::new();
        for i in 0..8 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                let tool = registry.lookup("echo").unwrap();
                let mut params = Parameters::new();
                params.insert("i".into(), json!(i));
                tool.handler().invoke(params).await.unwrap()
            }));
        }

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.await.unwrap(), json!({ "i": i }));
        }
    }
}
