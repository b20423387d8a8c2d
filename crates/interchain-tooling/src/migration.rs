use interchain_migrate::{Migration, TransformOptions, transform_with};
use serde_json::{Value, json, to_value};
use tokio::task;

use crate::{ToolError, ToolResult};

/// Runs the transform on the blocking pool; parsing large files is CPU bound.
pub(crate) async fn migrate(subject: &str, source: String, options: TransformOptions) -> ToolResult<Migration> {
    task::spawn_blocking(move || transform_with(&source, &options))
        .await
        .map_err(|err| ToolError::ExecutionFailed(format!("Migration task failed: {err}")))?
        .map_err(|err| ToolError::migration_failed(subject, &err))
}

/// JSON payload shared by the migration tools.
pub(crate) fn migration_data(migration: &Migration) -> ToolResult<Value> {
    Ok(json!({
        "code": migration.code,
        "diagnostics": to_value(&migration.diagnostics)?,
        "changed": migration.changed,
    }))
}

/// One-line summary used as the tool message.
pub(crate) fn summary(subject: &str, migration: &Migration) -> String {
    let warnings = migration.diagnostics.len();
    if migration.changed {
        format!("Migrated {subject} to InterchainJS ({warnings} warning(s))")
    } else {
        format!("No CosmJS usage rewritten in {subject} ({warnings} warning(s))")
    }
}
