//! Tool handler contract and adapters.
//!
//! Every tool exposes a single capability: take a parameter mapping, return a
//! JSON value or a [`ToolError`]. Argument validation belongs to the handler;
//! the dispatcher never inspects parameters against the declared shape.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ToolError;

/// Parameters passed to a tool, keyed by parameter name.
pub type Parameters = serde_json::Map<String, Value>;

/// Trait implemented by every callable tool.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool with the given parameters.
    async fn invoke(&self, parameters: Parameters) -> Result<Value, ToolError>;
}

/// Deserialize a parameter mapping into a typed struct.
///
/// Combine with `#[serde(deny_unknown_fields)]` on `T` to reject parameters
/// the tool does not declare.
pub fn parse_parameters<T: DeserializeOwned>(parameters: Parameters) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(parameters))
        .map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

// ============================================================================
// Closure adapters
// ============================================================================

/// Adapter turning an async closure into a [`ToolHandler`].
pub struct FnTool<F> {
    func: F,
}

impl<F> FnTool<F> {
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait::async_trait]
impl<F, Fut> ToolHandler for FnTool<F>
where
    F: Fn(Parameters) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
{
    async fn invoke(&self, parameters: Parameters) -> Result<Value, ToolError> {
        (self.func)(parameters).await
    }
}

/// Adapter for synchronous handlers that may block (file system, subprocesses).
///
/// The closure runs on tokio's blocking pool so a slow handler never stalls
/// the worker threads serving other requests.
pub struct BlockingFnTool<F> {
    func: Arc<F>,
}

impl<F> BlockingFnTool<F> {
    pub fn new(func: F) -> Self {
        Self {
            func: Arc::new(func),
        }
    }
}

#[async_trait::async_trait]
impl<F> ToolHandler for BlockingFnTool<F>
where
    F: Fn(Parameters) -> Result<Value, ToolError> + Send + Sync + 'static,
{
    async fn invoke(&self, parameters: Parameters) -> Result<Value, ToolError> {
        let func = Arc::clone(&self.func);
        match tokio::task::spawn_blocking(move || func(parameters)).await {
            Ok(result) => result,
            Err(e) if e.is_panic() => Err(ToolError::Panicked(panic_message(e.into_panic()))),
            Err(e) => Err(ToolError::internal(format!("blocking task failed: {}", e))),
        }
    }
}

/// Extract a readable message from a panic payload.
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct ProjectParams {
        name: String,
        #[serde(default)]
        description: String,
    }

    fn params(value: Value) -> Parameters {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn test_parse_parameters_typed() {
        let parsed: ProjectParams = parse_parameters(params(json!({ "name": "demo" }))).unwrap();
        assert_eq!(parsed.name, "demo");
        assert_eq!(parsed.description, "");
    }

    #[test]
    fn test_parse_parameters_rejects_unknown() {
        let err = parse_parameters::<ProjectParams>(params(json!({ "name": "demo", "extra": 1 })))
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert!(err.to_string().contains("extra"));
    }

    #[test]
    fn test_parse_parameters_missing_field() {
        let err = parse_parameters::<ProjectParams>(Parameters::new()).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[tokio::test]
    async fn test_fn_tool_invokes_closure() {
        let tool = FnTool::new(|p: Parameters| async move { Ok::<_, ToolError>(json!(p.len())) });
        let result = tool.invoke(params(json!({ "a": 1, "b": 2 }))).await.unwrap();
        assert_eq!(result, json!(2));
    }

    #[tokio::test]
    async fn test_blocking_tool_returns_result() {
        let tool = BlockingFnTool::new(|p: Parameters| {
            std::thread::sleep(std::time::Duration::from_millis(5));
            Ok(Value::Object(p))
        });
        let result = tool.invoke(params(json!({ "x": 1 }))).await.unwrap();
        assert_eq!(result, json!({ "x": 1 }));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_blocking_tool_leaves_runtime_free() {
        let slow = BlockingFnTool::new(|_: Parameters| {
            std::thread::sleep(std::time::Duration::from_millis(200));
            Ok(json!("slow"))
        });
        let fast = FnTool::new(|_: Parameters| async { Ok::<_, ToolError>(json!("fast")) });
        let finished = std::sync::Mutex::new(Vec::new());

        // The slow call is polled first; on a single-threaded runtime the
        // fast call can only finish first if the sleep runs off this thread.
        tokio::join!(
            async {
                let result = slow.invoke(Parameters::new()).await.unwrap();
                finished.lock().unwrap().push(result);
            },
            async {
                let result = fast.invoke(Parameters::new()).await.unwrap();
                finished.lock().unwrap().push(result);
            },
        );

        assert_eq!(*finished.lock().unwrap(), vec![json!("fast"), json!("slow")]);
    }

    #[tokio::test]
    async fn test_blocking_tool_panic_becomes_error() {
        let tool = BlockingFnTool::new(|_: Parameters| -> Result<Value, ToolError> {
            panic!("disk on fire")
        });
        let err = tool.invoke(Parameters::new()).await.unwrap_err();
        match err {
            ToolError::Panicked(msg) => assert_eq!(msg, "disk on fire"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_panic_message_from_string() {
        let payload: Box<dyn Any + Send> = Box::new(String::from("boom"));
        assert_eq!(panic_message(payload), "boom");
    }
}
