//! The [`Tool`] contract and the name-keyed [`ToolRegistry`].
//!
//! Handlers in this crate wrap a shared `FilesystemGateway`; the registry
//! only knows them by name and schema.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use dirgate_types::GatewayError;
use tracing::debug;

/// Failure reported back to the caller of a tool.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// No tool is registered under this name.
    #[error("tool not found: {0}")]
    NotFound(String),

    /// Arguments missing, of the wrong JSON type, or rejected by the gateway.
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    /// Anything else that went wrong while running the handler.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// No allowed directory could serve the path.
    #[error("not found: {0}")]
    FileNotFound(String),

    /// The gateway was built with no allowed directories.
    #[error("filesystem access is disabled")]
    Disabled,
}

impl From<GatewayError> for ToolError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotEnabled => Self::Disabled,
            GatewayError::InvalidArgument { .. } => Self::InvalidArgs(err.to_string()),
            GatewayError::ResolutionFailed { .. } => Self::FileNotFound(err.to_string()),
            other => Self::ExecutionFailed(other.to_string()),
        }
    }
}

/// A named handler taking a JSON object and returning a JSON value.
///
/// Gateway-backed handlers hold an `Arc<FilesystemGateway>` and run the
/// blocking filesystem call off the async executor:
///
/// ```rust,ignore
/// use std::sync::Arc;
///
/// use async_trait::async_trait;
/// use dirgate_fs::FilesystemGateway;
/// use dirgate_tools::registry::{Tool, ToolError};
///
/// struct StatTool {
///     gateway: Arc<FilesystemGateway>,
/// }
///
/// #[async_trait]
/// impl Tool for StatTool {
///     fn name(&self) -> &str { "stat_file" }
///     fn description(&self) -> &str { "Size and kind of a path in the allowed directories" }
///     fn parameters(&self) -> serde_json::Value {
///         serde_json::json!({
///             "type": "object",
///             "properties": { "path": { "type": "string" } },
///             "required": ["path"]
///         })
///     }
///     async fn execute(&self, args: serde_json::Value) -> Result<serde_json::Value, ToolError> {
///         let path = args["path"].as_str().unwrap_or_default().to_owned();
///         let gw = Arc::clone(&self.gateway);
///         let stat = tokio::task::spawn_blocking(move || gw.stat(&path))
///             .await
///             .map_err(|e| ToolError::ExecutionFailed(e.to_string()))??;
///         Ok(serde_json::json!({
///             "size": stat.value.size,
///             "is_dir": stat.value.is_dir,
///             "directory": stat.root.display().to_string(),
///         }))
///     }
/// }
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Registry key; also the `function.name` in schemas.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema of the argument object.
    fn parameters(&self) -> serde_json::Value;

    async fn execute(&self, args: serde_json::Value) -> Result<serde_json::Value, ToolError>;
}

/// Registry of available tools, indexed by name.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Add `tool`, replacing any earlier tool of the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        debug!(tool = %name, "registering tool");
        self.tools.insert(name, tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Registered names in ascending order.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// One function-calling schema per tool, ordered like [`list`](Self::list):
    ///
    /// ```json
    /// {
    ///   "type": "function",
    ///   "function": { "name": "...", "description": "...", "parameters": { ... } }
    /// }
    /// ```
    pub fn schemas(&self) -> Vec<serde_json::Value> {
        self.list()
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| {
                serde_json::json!({
                    "type": "function",
                    "function": {
                        "name": tool.name(),
                        "description": tool.description(),
                        "parameters": tool.parameters(),
                    }
                })
            })
            .collect()
    }

    /// Run the tool registered as `name`.
    pub async fn execute(
        &self,
        name: &str,
        args: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        debug!(tool = %name, "executing tool");
        tool.execute(args).await
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Reports the byte length of `text`.
    struct ByteLenTool;

    #[async_trait]
    impl Tool for ByteLenTool {
        fn name(&self) -> &str {
            "byte_len"
        }

        fn description(&self) -> &str {
            "Length of a string in bytes"
        }

        fn parameters(&self) -> serde_json::Value {
            json!({
                "type": "object",
                "properties": { "text": { "type": "string" } },
                "required": ["text"]
            })
        }

        async fn execute(&self, args: serde_json::Value) -> Result<serde_json::Value, ToolError> {
            let text = args["text"]
                .as_str()
                .ok_or_else(|| ToolError::InvalidArgs("'text' must be a string".into()))?;
            Ok(json!({ "bytes": text.len() }))
        }
    }

    #[tokio::test]
    async fn execute_dispatches_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(ByteLenTool));

        let out = registry.execute("byte_len", json!({"text": "héllo"})).await.unwrap();
        assert_eq!(out["bytes"], 6);

        let err = registry.execute("byte_len", json!({"text": 5})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgs(_)));
    }

    #[tokio::test]
    async fn execute_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.execute("nope", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(ref n) if n == "nope"));
    }

    #[test]
    fn schemas_use_function_format() {
        let mut registry = ToolRegistry::default();
        registry.register(Arc::new(ByteLenTool));
        let schemas = registry.schemas();
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0]["type"], "function");
        assert_eq!(schemas[0]["function"]["name"], "byte_len");
        assert_eq!(schemas[0]["function"]["parameters"]["required"][0], "text");
    }

    #[test]
    fn register_replaces_same_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(ByteLenTool));
        registry.register(Arc::new(ByteLenTool));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.list(), vec!["byte_len".to_string()]);
    }

    #[test]
    fn gateway_errors_map_to_tool_errors() {
        assert!(matches!(
            ToolError::from(GatewayError::NotEnabled),
            ToolError::Disabled
        ));

        let err = ToolError::from(GatewayError::InvalidArgument {
            operation: "read_file",
            reason: "path must not be empty".into(),
        });
        assert!(matches!(err, ToolError::InvalidArgs(_)));

        let err = ToolError::from(GatewayError::ResolutionFailed {
            operation: "read_file",
            path: "x.txt".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        });
        match err {
            ToolError::FileNotFound(msg) => assert!(msg.contains("x.txt")),
            other => panic!("expected FileNotFound, got: {other:?}"),
        }
    }
}
