//! Tool layer around the CosmJS to InterchainJS migrator.
//!
//! This crate provides:
//! - Tool trait and registry for managing available tools
//! - `MigrateFileTool`, which migrates a file in place below a root directory
//! - `PreviewMigrationTool`, which migrates source text passed inline
#![cfg_attr(
    test,
    allow(
        dead_code,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        clippy::missing_errors_doc,
        clippy::print_stdout,
        clippy::print_stderr,
        reason = "Allow for tests"
    )
)]

/// File migration tool.
mod migrate_tool;
/// Transform invocation shared by the tools.
mod migration;
/// Inline preview tool.
mod preview_tool;
/// Tool registry for managing available tools.
mod registry;
/// Core abstractions shared by all tools.
mod tool;

pub use migrate_tool::{MigrateFileArgs, MigrateFileTool};
pub use preview_tool::{PreviewMigrationArgs, PreviewMigrationTool};
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolError, ToolInput, ToolOutput, ToolResult};
