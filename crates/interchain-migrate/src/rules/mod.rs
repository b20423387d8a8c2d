//! Rewrite rules applied by the migration pipeline.
//!
//! The import rule works on the top-level module items. The three call-site
//! rules share [`CallVisitor`], which walks the module post-order, bounds
//! the nesting depth and hands every call expression to the rule.

/// `signAndBroadcast` envelope unwrapping and fee placeholder.
mod broadcast;
/// `connectWithSigner` default options.
mod client;
/// Static CosmJS to InterchainJS import mapping.
mod import_table;
/// Import declaration rewriting and merging.
mod imports;
/// AST matching and construction helpers.
mod shapes;
/// `fromMnemonic` options restructuring.
mod wallet;

pub(crate) use broadcast::BroadcastRule;
pub(crate) use client::ClientRule;
pub use import_table::{FamilyRule, ImportTable, ModuleRule, SymbolRule};
pub(crate) use imports::ImportRule;
pub(crate) use wallet::WalletRule;

use swc_common::{Span, Spanned as _};
use swc_ecma_ast::{CallExpr, Expr, JSXElement, Module, Stmt};
use swc_ecma_visit::{VisitMut, VisitMutWith as _};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{Location, TransformError, TransformErrorKind};
use crate::options::TransformOptions;
use crate::syntax::SourceContext;

/// State shared by every rule during one transform call.
pub(crate) struct RuleContext<'a> {
    pub(crate) source: SourceContext<'a>,
    pub(crate) options: &'a TransformOptions,
    diagnostics: &'a mut Diagnostics,
    rewrites: usize,
}

impl<'a> RuleContext<'a> {
    pub(crate) fn new(
        source: SourceContext<'a>,
        options: &'a TransformOptions,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Self {
            source,
            options,
            diagnostics,
            rewrites: 0,
        }
    }

    pub(crate) fn warn(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn record_rewrite(&mut self) {
        self.rewrites += 1;
    }

    pub(crate) fn rewrites(&self) -> usize {
        self.rewrites
    }
}

/// Failure raised inside a rule; the pipeline attaches the rule name.
#[derive(Debug)]
pub(crate) struct RuleError {
    pub(crate) kind: TransformErrorKind,
    pub(crate) location: Option<Location>,
}

impl RuleError {
    pub(crate) fn into_transform_error(self, rule: &'static str) -> TransformError {
        TransformError {
            rule,
            kind: self.kind,
            location: self.location,
        }
    }
}

/// One step of the migration pipeline.
pub(crate) trait Rule {
    /// Name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Rewrites `module` in place.
    fn apply(&mut self, module: &mut Module, cx: &mut RuleContext<'_>) -> Result<(), RuleError>;
}

/// A rule that only looks at call expressions.
pub(crate) trait CallRule {
    /// Inspects one call, rewriting it when it has the recognized shape.
    fn rewrite_call(&mut self, call: &mut CallExpr, cx: &mut RuleContext<'_>);
}

/// Runs a [`CallRule`] over every call in `module`.
pub(crate) fn run_call_rule<R: CallRule>(
    rule: &mut R,
    module: &mut Module,
    cx: &mut RuleContext<'_>,
) -> Result<(), RuleError> {
    let limit = cx.options.max_depth;
    let mut visitor = CallVisitor {
        rule,
        cx,
        depth: 0,
        limit,
        overflow: None,
    };
    module.visit_mut_with(&mut visitor);

    match visitor.overflow {
        Some(span) => Err(RuleError {
            kind: TransformErrorKind::DepthExceeded { limit },
            location: visitor.cx.source.locate(span),
        }),
        None => Ok(()),
    }
}

struct CallVisitor<'r, 'c, 'a, R> {
    rule: &'r mut R,
    cx: &'c mut RuleContext<'a>,
    depth: usize,
    limit: usize,
    overflow: Option<Span>,
}

impl<R> CallVisitor<'_, '_, '_, R> {
    /// Returns whether traversal may continue below a node at `span`.
    fn enter(&mut self, span: Span) -> bool {
        self.depth += 1;
        if self.overflow.is_some() {
            return false;
        }
        if self.depth > self.limit {
            self.overflow = Some(span);
            return false;
        }
        true
    }
}

impl<R: CallRule> VisitMut for CallVisitor<'_, '_, '_, R> {
    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        if self.enter(expr.span()) {
            expr.visit_mut_children_with(self);
        }
        self.depth -= 1;
    }

    fn visit_mut_stmt(&mut self, stmt: &mut Stmt) {
        if self.enter(stmt.span()) {
            stmt.visit_mut_children_with(self);
        }
        self.depth -= 1;
    }

    fn visit_mut_jsx_element(&mut self, element: &mut JSXElement) {
        if self.enter(element.span) {
            element.visit_mut_children_with(self);
        }
        self.depth -= 1;
    }

    fn visit_mut_call_expr(&mut self, call: &mut CallExpr) {
        call.visit_mut_children_with(self);
        if self.overflow.is_none() {
            self.rule.rewrite_call(call, self.cx);
        }
    }
}
