//! Migration of source text passed inline, without touching the filesystem.

use async_trait::async_trait;
use interchain_migrate::{Dialect, TransformOptions};
use serde::{Deserialize, Serialize};
use serde_json::{Value, from_value, json};

use crate::migration::{migrate, migration_data, summary};
use crate::{Tool, ToolError, ToolInput, ToolOutput, ToolResult};

const SUBJECT: &str = "<inline>";

/// Arguments for a migration preview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewMigrationArgs {
    /// Source text to migrate
    pub code: String,
    /// Grammar of `code` (default: typescript)
    #[serde(default)]
    pub dialect: Option<Dialect>,
}

/// Tool that migrates source text and returns the result.
pub struct PreviewMigrationTool {
    options: TransformOptions,
}

impl PreviewMigrationTool {
    /// Create a preview tool using `options` for every call.
    #[must_use]
    pub fn new(options: TransformOptions) -> Self {
        Self { options }
    }
}

impl Default for PreviewMigrationTool {
    fn default() -> Self {
        Self::new(TransformOptions::default())
    }
}

#[async_trait]
impl Tool for PreviewMigrationTool {
    fn name(&self) -> &'static str {
        "previewInterchainjsMigration"
    }

    fn description(&self) -> &'static str {
        "Shows how a CosmJS snippet would look after migration to InterchainJS, \
         without writing anything. Returns the migrated code and any warnings."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "code": { "type": "string", "description": "Source text to migrate" },
                "dialect": {
                    "type": "string",
                    "enum": ["typescript", "tsx", "javascript"],
                    "description": "Grammar of the source text"
                }
            },
            "required": ["code"]
        })
    }

    async fn execute(&self, input: ToolInput) -> ToolResult<ToolOutput> {
        let args: PreviewMigrationArgs = if let Some(arr) = input.params.as_array() {
            // Handle positional arguments: [code, dialect?]
            let code = arr.first().and_then(Value::as_str).ok_or_else(|| {
                ToolError::InvalidInput("First argument (code) must be a string".to_owned())
            })?;
            let dialect = arr
                .get(1)
                .map(|value| from_value(value.clone()))
                .transpose()
                .map_err(|err| ToolError::InvalidInput(format!("Invalid dialect: {err}")))?;
            PreviewMigrationArgs {
                code: code.to_owned(),
                dialect,
            }
        } else {
            from_value(input.params)
                .map_err(|err| ToolError::InvalidInput(format!("Invalid arguments: {err}")))?
        };

        let mut options = self.options.clone();
        if let Some(dialect) = args.dialect {
            options.dialect = dialect;
        }
        SUBJECT.clone_into(&mut options.file_name);

        let migration = migrate(SUBJECT, args.code, options).await?;
        Ok(ToolOutput::success_with_data(
            summary("the snippet", &migration),
            migration_data(&migration)?,
        ))
    }
}
