use swc_common::{GLOBALS, Globals};

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::options::TransformOptions;
use crate::rules::{Rule, RuleContext, RuleError};
use crate::syntax::parse;

/// Result of running a single rule over a snippet.
pub(crate) struct RuleRun {
    pub output: String,
    pub diagnostics: Vec<Diagnostic>,
    pub rewrites: usize,
}

impl RuleRun {
    pub fn kinds(&self) -> Vec<DiagnosticKind> {
        self.diagnostics.iter().map(|diagnostic| diagnostic.kind).collect()
    }
}

pub(crate) fn run_rule<R: Rule>(code: &str, rule: &mut R) -> Result<RuleRun, RuleError> {
    run_rule_with(code, rule, &TransformOptions::default())
}

pub(crate) fn run_rule_with<R: Rule>(
    code: &str,
    rule: &mut R,
    options: &TransformOptions,
) -> Result<RuleRun, RuleError> {
    GLOBALS.set(&Globals::default(), || {
        let mut tree = parse(&options.file_name, code, options.dialect).unwrap();
        let mut diagnostics = Diagnostics::default();
        let rewrites = {
            let (module, source) = tree.split();
            let mut cx = RuleContext::new(source, options, &mut diagnostics);
            rule.apply(module, &mut cx)?;
            cx.rewrites()
        };
        Ok(RuleRun {
            output: tree.print().unwrap(),
            diagnostics: diagnostics.into_vec(),
            rewrites,
        })
    })
}

/// Parses and prints `code` so it can be compared with printer output.
pub(crate) fn normalize(code: &str) -> String {
    GLOBALS.set(&Globals::default(), || {
        parse("expected.ts", code, TransformOptions::default().dialect)
            .unwrap()
            .print()
            .unwrap()
    })
}

/// Strips all whitespace, for assertions that should not depend on layout.
pub(crate) fn squash(code: &str) -> String {
    code.chars().filter(|ch| !ch.is_whitespace()).collect()
}
