//! The fixed rule sequence applied to one file.

use std::thread;

use serde::Serialize;
use swc_common::{GLOBALS, Globals};
use tracing::debug;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{Error, Result};
use crate::nesting::check_nesting;
use crate::options::TransformOptions;
use crate::rules::{BroadcastRule, ClientRule, ImportRule, ImportTable, Rule, RuleContext, WalletRule};
use crate::syntax::parse;

static COSMJS_TABLE: ImportTable = ImportTable::cosmjs();

/// Minimum stack for the transform thread. Parsing and traversal recurse once
/// per nesting level.
const WORKER_STACK_SIZE: usize = 64 * 1024 * 1024;
/// Extra stack reserved per allowed nesting level beyond the minimum.
const STACK_PER_LEVEL: usize = 64 * 1024;

fn worker_stack_size(max_depth: usize) -> usize {
    WORKER_STACK_SIZE.max(max_depth.saturating_mul(STACK_PER_LEVEL))
}

/// Outcome of a successful transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Migration {
    /// Printed output.
    pub code: String,
    /// Advisory findings, in the order they were recorded.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether any rule rewrote something.
    pub changed: bool,
}

/// Runs the import, wallet, client and broadcast rules, in that order, over
/// one source text.
///
/// Later rules match the original class names at call sites, so the import
/// rule only touches declarations.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'t> {
    table: &'t ImportTable,
}

impl Default for Pipeline<'static> {
    fn default() -> Self {
        Self::new(&COSMJS_TABLE)
    }
}

impl<'t> Pipeline<'t> {
    /// Uses `table` for import rewriting.
    pub const fn new(table: &'t ImportTable) -> Self {
        Self { table }
    }

    /// Transforms `source` on a dedicated thread sized for `options.max_depth`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for invalid input, [`Error::Transform`] when
    /// nesting exceeds `max_depth` or a rule aborts, [`Error::Emit`] if
    /// printing fails and [`Error::Worker`] if the thread cannot run. No
    /// output is produced in any of these cases.
    pub fn run(&self, source: &str, options: &TransformOptions) -> Result<Migration> {
        thread::scope(|scope| {
            let worker = thread::Builder::new()
                .name("interchain-transform".to_owned())
                .stack_size(worker_stack_size(options.max_depth))
                .spawn_scoped(scope, || self.run_here(source, options))
                .map_err(|err| Error::Worker(format!("failed to spawn transform thread: {err}")))?;
            worker
                .join()
                .unwrap_or_else(|_| Err(Error::Worker("transform thread panicked".to_owned())))
        })
    }

    fn run_here(&self, source: &str, options: &TransformOptions) -> Result<Migration> {
        check_nesting(source, options.max_depth)?;
        GLOBALS.set(&Globals::default(), || {
            let mut tree = parse(&options.file_name, source, options.dialect)?;
            let mut diagnostics = Diagnostics::default();

            let rewrites = {
                let (module, source_cx) = tree.split();
                let mut cx = RuleContext::new(source_cx, options, &mut diagnostics);
                let mut import = ImportRule::new(self.table);
                let rules: [&mut dyn Rule; 4] = [
                    &mut import,
                    &mut WalletRule,
                    &mut ClientRule,
                    &mut BroadcastRule,
                ];

                for rule in rules {
                    let before = cx.rewrites();
                    rule.apply(module, &mut cx)
                        .map_err(|err| err.into_transform_error(rule.name()))?;
                    debug!(
                        rule = rule.name(),
                        rewrites = cx.rewrites() - before,
                        "rule finished"
                    );
                }
                cx.rewrites()
            };

            let code = tree.print()?;
            let diagnostics = diagnostics.into_vec();
            debug!(
                file = %options.file_name,
                rewrites,
                diagnostics = diagnostics.len(),
                "transform finished"
            );
            Ok(Migration {
                code,
                diagnostics,
                changed: rewrites > 0,
            })
        })
    }
}

/// Transforms `source` with default options.
///
/// # Errors
///
/// See [`transform_with`].
pub fn transform(source: &str) -> Result<Migration> {
    transform_with(source, &TransformOptions::default())
}

/// Transforms `source` with the CosmJS to InterchainJS table.
///
/// # Errors
///
/// Returns a parse error for invalid input and a transform error when a rule
/// aborts. Diagnostics never cause an error.
pub fn transform_with(source: &str, options: &TransformOptions) -> Result<Migration> {
    Pipeline::default().run(source, options)
}
