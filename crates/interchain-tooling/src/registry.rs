//! Tool registry for managing available tools.

use std::convert::AsRef;
use std::path::PathBuf;
use std::sync::Arc;

use interchain_migrate::TransformOptions;

use crate::{MigrateFileTool, PreviewMigrationTool, Tool};

type ToolList = Arc<Vec<Arc<dyn Tool>>>;

/// Registry for managing available tools
#[derive(Clone)]
pub struct ToolRegistry {
    tools: ToolList,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: Arc::new(Vec::new()),
        }
    }

    /// Registry with the file migration and preview tools.
    #[must_use]
    pub fn with_migration_tools(root_dir: impl Into<PathBuf>, options: &TransformOptions) -> Self {
        Self::new()
            .with_tool(Arc::new(
                MigrateFileTool::new(root_dir).with_options(options.clone()),
            ))
            .with_tool(Arc::new(PreviewMigrationTool::new(options.clone())))
    }

    /// Add a tool to the registry
    #[must_use]
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        Arc::make_mut(&mut self.tools).push(tool);
        self
    }

    /// Get a tool by name, if it exists
    #[must_use]
    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools
            .iter()
            .find(|tool_ref| tool_ref.name() == name)
            .cloned()
    }

    /// List all available tools
    #[must_use]
    pub fn list_tools(&self) -> Vec<&dyn Tool> {
        self.tools.iter().map(AsRef::as_ref).collect()
    }

    /// Get number of registered tools
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
