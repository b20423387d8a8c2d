//! In-place migration of one file below a root directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use interchain_migrate::TransformOptions;
use serde::{Deserialize, Serialize};
use serde_json::{Value, from_value, json};
use tokio::fs;
use tracing::info;

use crate::migration::{migrate, migration_data, summary};
use crate::{Tool, ToolError, ToolInput, ToolOutput, ToolResult};

/// Arguments for file migration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrateFileArgs {
    /// Path to the file, relative to the root directory
    pub file_path: String,
}

/// Tool that rewrites a CosmJS source file to InterchainJS.
///
/// The file is only overwritten after a successful transform that changed
/// something. A failed transform leaves it untouched.
pub struct MigrateFileTool {
    /// Root directory to constrain file access (for sandboxing)
    root_dir: PathBuf,
    options: TransformOptions,
    write_back: bool,
}

impl MigrateFileTool {
    /// Create a new `MigrateFileTool` with the given root directory.
    ///
    /// All file paths will be resolved relative to this root directory.
    #[must_use]
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            options: TransformOptions::default(),
            write_back: true,
        }
    }

    /// Transform settings; the dialect is still picked per file extension.
    #[must_use]
    pub fn with_options(mut self, options: TransformOptions) -> Self {
        self.options = options;
        self
    }

    /// Whether results are written back to disk.
    #[must_use]
    pub fn with_write_back(mut self, write_back: bool) -> Self {
        self.write_back = write_back;
        self
    }

    /// Resolve a path relative to the root directory and validate it's within bounds.
    ///
    /// # Errors
    /// Returns error if path escapes the root directory or file doesn't exist
    fn resolve_path(&self, path: &str) -> ToolResult<PathBuf> {
        let full_path = self.root_dir.join(path);

        let canonical_root = self
            .root_dir
            .canonicalize()
            .map_err(|err| ToolError::InvalidInput(format!("Invalid root directory: {err}")))?;

        if !full_path.is_file() {
            return Err(ToolError::InvalidInput(format!("File does not exist: {path}")));
        }

        let canonical_path = full_path
            .canonicalize()
            .map_err(|err| ToolError::InvalidInput(format!("Invalid path '{path}': {err}")))?;

        if !canonical_path.starts_with(&canonical_root) {
            return Err(ToolError::InvalidInput(format!(
                "Path '{path}' is outside the allowed directory"
            )));
        }

        Ok(canonical_path)
    }

    fn parse_args(params: Value) -> ToolResult<MigrateFileArgs> {
        if let Some(arr) = params.as_array() {
            // Positional form: [path]
            let path = arr.first().and_then(Value::as_str).ok_or_else(|| {
                ToolError::InvalidInput("First argument (filePath) must be a string".to_owned())
            })?;
            return Ok(MigrateFileArgs {
                file_path: path.to_owned(),
            });
        }

        from_value(params).map_err(|err| ToolError::InvalidInput(format!("Invalid arguments: {err}")))
    }
}

#[async_trait]
impl Tool for MigrateFileTool {
    fn name(&self) -> &'static str {
        "migrateToInterchainjs"
    }

    fn description(&self) -> &'static str {
        "Migrates a TypeScript or JavaScript file from CosmJS to InterchainJS: rewrites \
         imports, wallet and client construction, and signAndBroadcast calls. Returns the \
         migrated code and any warnings that need manual review."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "filePath": {
                    "type": "string",
                    "description": "Path of the file to migrate, relative to the workspace root"
                }
            },
            "required": ["filePath"]
        })
    }

    async fn execute(&self, input: ToolInput) -> ToolResult<ToolOutput> {
        let args = Self::parse_args(input.params)?;
        let full_path = self.resolve_path(&args.file_path)?;

        let source = fs::read_to_string(&full_path).await.map_err(|err| {
            ToolError::ExecutionFailed(format!("Failed to read file '{}': {err}", args.file_path))
        })?;

        let options = self.options.clone().for_path(Path::new(&args.file_path));
        let migration = migrate(&args.file_path, source, options).await?;

        let written = self.write_back && migration.changed;
        if written {
            fs::write(&full_path, &migration.code).await.map_err(|err| {
                ToolError::ExecutionFailed(format!("Failed to write file '{}': {err}", args.file_path))
            })?;
            info!(path = %args.file_path, warnings = migration.diagnostics.len(), "migrated file");
        }

        let mut data = migration_data(&migration)?;
        data["written"] = Value::Bool(written);
        Ok(ToolOutput::success_with_data(
            summary(&args.file_path, &migration),
            data,
        ))
    }
}
