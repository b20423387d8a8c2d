use async_trait::async_trait;
use interchain_migrate::Error as MigrateError;
use serde::{Deserialize, Serialize};
use serde_json::{Error as SerdeJsonError, Value};
use thiserror::Error;

/// Errors that can occur during tool execution.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The provided input parameters were invalid or malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The tool failed to execute its operation.
    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    /// Failed to serialize or deserialize data.
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
}

impl ToolError {
    /// Wraps a failed transform of `subject`, keeping its location in the message.
    pub fn migration_failed(subject: &str, err: &MigrateError) -> Self {
        match err.location() {
            Some(location) => Self::ExecutionFailed(format!("{subject}:{location}: {err}")),
            None => Self::ExecutionFailed(format!("{subject}: {err}")),
        }
    }
}

/// Result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Input parameters provided to a tool for execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInput {
    /// JSON value containing the tool-specific parameters.
    pub params: Value,
}

/// Output returned by a tool after execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Whether the tool execution succeeded.
    pub success: bool,
    /// Human-readable message describing the result.
    pub message: String,
    /// Optional JSON data containing tool-specific output.
    pub data: Option<Value>,
}

impl ToolOutput {
    /// Creates a successful output with the given message and associated data.
    pub fn success_with_data<T: Into<String>>(message: T, data: Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

/// Trait for implementing executable tools that can be invoked by the system.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the unique identifier for this tool.
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of what this tool does and its parameters.
    fn description(&self) -> &'static str;

    /// Returns the JSON schema of the parameters accepted by [`Tool::execute`].
    ///
    /// # Examples
    ///
    /// ```text
    /// {
    ///   "type": "object",
    ///   "properties": { "filePath": { "type": "string" } },
    ///   "required": ["filePath"]
    /// }
    /// ```
    fn input_schema(&self) -> Value;

    /// Executes the tool with the provided input parameters.
    ///
    /// # Errors
    ///
    /// Returns a `ToolError` if the input is invalid or execution fails.
    async fn execute(&self, input: ToolInput) -> ToolResult<ToolOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use interchain_migrate::transform;
    use serde_json::{Value as JsonValue, json};

    /// Tests that a failed transform keeps its source location in the message.
    ///
    /// # Panics
    /// Panics if the subject or location is missing from the message.
    #[test]
    fn test_migration_failed_carries_location() {
        let err = transform("const = 1;").unwrap_err();
        let tool_err = ToolError::migration_failed("src/app.ts", &err);

        let message = tool_err.to_string();
        assert!(message.starts_with("Tool execution failed: src/app.ts:1:"), "{message}");
        assert!(message.contains("syntax error"));
    }

    // Mock tool for testing the trait
    struct MockTool;

    #[async_trait]
    impl Tool for MockTool {
        fn name(&self) -> &'static str {
            "mock_tool"
        }

        fn description(&self) -> &'static str {
            "A mock tool for testing"
        }

        fn input_schema(&self) -> Value {
            json!({ "type": "object" })
        }

        async fn execute(&self, input: ToolInput) -> ToolResult<ToolOutput> {
            if input.params.get("fail").and_then(JsonValue::as_bool) == Some(true) {
                Err(ToolError::ExecutionFailed("intentional failure".to_owned()))
            } else {
                Ok(ToolOutput::success_with_data("mock executed", input.params))
            }
        }
    }

    /// Tests that a tool is callable through the trait.
    ///
    /// # Panics
    /// Panics if the mock tool fails or loses its data.
    #[tokio::test]
    async fn test_tool_trait_implementation() {
        let tool = MockTool;
        assert_eq!(tool.name(), "mock_tool");
        assert_eq!(tool.description(), "A mock tool for testing");

        let input = ToolInput { params: json!({}) };
        let output = tool.execute(input).await.unwrap();
        assert!(output.success);
        assert_eq!(output.data, Some(json!({})));
    }

    /// Tests that tool failures surface as errors.
    ///
    /// # Panics
    /// Panics if the failure is not an execution error.
    #[tokio::test]
    async fn test_tool_trait_error_handling() {
        let tool = MockTool;
        let input = ToolInput {
            params: json!({"fail": true}),
        };
        let result = tool.execute(input).await;
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ToolError::ExecutionFailed(_)));
    }
}
