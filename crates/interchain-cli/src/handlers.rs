//! Command handlers. Each returns the process exit code.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use interchain_migrate::Diagnostic;
use interchain_tooling::{MigrateFileTool, Tool as _, ToolInput, ToolRegistry};
use serde::Deserialize;
use serde_json::{from_value, json};
use tracing::info;

use crate::config::Config;

/// The `data` payload of a migration tool call.
#[derive(Debug, Deserialize)]
struct Report {
    code: String,
    diagnostics: Vec<Diagnostic>,
    changed: bool,
    #[serde(default)]
    written: bool,
}

/// Migrate each file in place, or print the results with `dry_run`.
pub async fn handle_migrate(config: &Config, files: &[PathBuf], dry_run: bool) -> ExitCode {
    let tool = migrate_tool(config, !dry_run && config.tool.write_back);
    let mut failures = 0_usize;

    for file in files {
        match migrate_file(&tool, &config.tool.root_dir, file).await {
            Ok((message, report)) => {
                print_diagnostics(file, &report.diagnostics);
                if dry_run {
                    print_status(&message);
                    print_stdout(&report.code);
                } else {
                    print_stdout(&format!("{message}\n"));
                    if report.changed && !report.written {
                        info!(path = %file.display(), "write-back disabled, file left unchanged");
                    }
                }
            }
            Err(err) => {
                print_error(file, &err);
                failures += 1;
            }
        }
    }

    exit_code(failures == 0)
}

/// Report the files a migration would change, without writing anything.
pub async fn handle_check(config: &Config, files: &[PathBuf]) -> ExitCode {
    let tool = migrate_tool(config, false);
    let mut pending = 0_usize;
    let mut failures = 0_usize;

    for file in files {
        match migrate_file(&tool, &config.tool.root_dir, file).await {
            Ok((_, report)) => {
                print_diagnostics(file, &report.diagnostics);
                if report.changed {
                    print_stdout(&format!("would migrate: {}\n", file.display()));
                    pending += 1;
                }
            }
            Err(err) => {
                print_error(file, &err);
                failures += 1;
            }
        }
    }

    print_stdout(&format!(
        "{pending} of {} file(s) would be migrated\n",
        files.len()
    ));
    exit_code(pending == 0 && failures == 0)
}

/// List the registered tools.
pub fn handle_tools(config: &Config) -> ExitCode {
    let registry = ToolRegistry::with_migration_tools(&config.tool.root_dir, &config.transform);
    for tool in registry.list_tools() {
        print_stdout(&format!("{}\n    {}\n", tool.name(), tool.description()));
    }
    ExitCode::SUCCESS
}

fn migrate_tool(config: &Config, write_back: bool) -> MigrateFileTool {
    MigrateFileTool::new(&config.tool.root_dir)
        .with_options(config.transform.clone())
        .with_write_back(write_back)
}

async fn migrate_file(tool: &MigrateFileTool, root: &Path, file: &Path) -> Result<(String, Report)> {
    let file_path = tool_path(root, file)?;
    let output = tool
        .execute(ToolInput {
            params: json!({ "filePath": file_path }),
        })
        .await?;
    let data = output.data.context("Migration returned no data")?;
    let report = from_value(data).context("Malformed migration output")?;
    Ok((output.message, report))
}

/// Command-line paths are relative to the working directory; the tool wants
/// them relative to its root.
fn tool_path(root: &Path, file: &Path) -> Result<String> {
    let canonical_root = root
        .canonicalize()
        .with_context(|| format!("Invalid root directory {}", root.display()))?;
    let canonical = file
        .canonicalize()
        .with_context(|| format!("File does not exist: {}", file.display()))?;
    // Paths outside the root stay absolute and are rejected by the tool.
    Ok(canonical.strip_prefix(&canonical_root).map_or_else(
        |_| canonical.display().to_string(),
        |relative| relative.display().to_string(),
    ))
}

const fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[allow(clippy::print_stdout, reason = "Command output")]
fn print_stdout(text: &str) {
    print!("{text}");
}

#[allow(clippy::print_stderr, reason = "Command output")]
fn print_status(message: &str) {
    eprintln!("{message}");
}

#[allow(clippy::print_stderr, reason = "Diagnostics go to stderr")]
fn print_diagnostics(file: &Path, diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        if diagnostic.location.is_some() {
            eprintln!("{}:{diagnostic}", file.display());
        } else {
            eprintln!("{}: {diagnostic}", file.display());
        }
    }
}

#[allow(clippy::print_stderr, reason = "Errors go to stderr")]
fn print_error(file: &Path, err: &anyhow::Error) {
    eprintln!("error: {}: {err:#}", file.display());
}
