use core::mem;

use swc_common::DUMMY_SP;
use swc_ecma_ast::{
    Expr, ExprStmt, Ident, ImportDecl, ImportDefaultSpecifier, ImportNamedSpecifier, ImportPhase,
    ImportSpecifier, ImportStarAsSpecifier, Lit, Module, ModuleDecl, ModuleExportName, ModuleItem,
    Stmt,
};
use tracing::debug;

use super::shapes::{literal_text, str_node};
use super::{ImportTable, ModuleRule, Rule, RuleContext, RuleError, SymbolRule};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::error::{Location, TransformErrorKind};

/// Retargets mapped import declarations and merges the results per
/// destination module and type-only flag.
///
/// Only declarations are touched; identifiers at use sites keep their names.
pub(crate) struct ImportRule<'t> {
    table: &'t ImportTable,
}

impl<'t> ImportRule<'t> {
    pub(crate) const fn new(table: &'t ImportTable) -> Self {
        Self { table }
    }
}

enum Outcome {
    Kept(ImportDecl),
    Replaced,
}

/// The declaration a specifier came from.
#[derive(Clone, Copy)]
struct Origin<'p> {
    path: &'p str,
    type_only: bool,
    location: Option<Location>,
}

impl Rule for ImportRule<'_> {
    fn name(&self) -> &'static str {
        "import"
    }

    fn apply(&mut self, module: &mut Module, cx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        let mut pending = PendingImports::default();
        let mut replaced = 0_usize;
        let mut body = Vec::with_capacity(module.body.len());

        for item in mem::take(&mut module.body) {
            match item {
                ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                    match self.rewrite(import, &mut pending, cx)? {
                        Outcome::Kept(import) => {
                            body.push(ModuleItem::ModuleDecl(ModuleDecl::Import(import)));
                        }
                        Outcome::Replaced => replaced += 1,
                    }
                }
                other => body.push(other),
            }
        }

        if replaced > 0 {
            debug!(replaced, pending = pending.len(), "rewrote import declarations");
            pending.flush_into(&mut body, cx)?;
            cx.record_rewrite();
        }
        module.body = body;
        Ok(())
    }
}

impl ImportRule<'_> {
    fn rewrite(
        &self,
        import: ImportDecl,
        pending: &mut PendingImports,
        cx: &mut RuleContext<'_>,
    ) -> Result<Outcome, RuleError> {
        let path = literal_text(&import.src).unwrap_or_default().to_owned();
        let origin = Origin {
            path: &path,
            type_only: import.type_only,
            location: cx.source.locate(import.span),
        };

        if let Some(rule) = self.table.module(&path) {
            return self.rewrite_mapped(import, rule, origin, pending, cx);
        }

        if let Some(target) = self.table.family_path(&path) {
            cx.warn(
                Diagnostic::warning(
                    DiagnosticKind::HeuristicPath,
                    format!("Assuming generic mapping for '{path}' to '{target}'. Verify correctness."),
                )
                .at(origin.location),
            );
            retarget(import, &target, origin, pending, cx)?;
            return Ok(Outcome::Replaced);
        }

        if self.table.in_migrated_scope(&path) {
            cx.warn(
                Diagnostic::warning(
                    DiagnosticKind::UnmappedModule,
                    format!("No import mapping found for '{path}'. Manual migration may be required."),
                )
                .at(origin.location),
            );
        }
        Ok(Outcome::Kept(import))
    }

    fn rewrite_mapped(
        &self,
        import: ImportDecl,
        rule: &ModuleRule,
        origin: Origin<'_>,
        pending: &mut PendingImports,
        cx: &mut RuleContext<'_>,
    ) -> Result<Outcome, RuleError> {
        if import.specifiers.is_empty() {
            let Some(fallback) = rule.fallback else {
                return Ok(Outcome::Kept(import));
            };
            pending.add_side_effect(fallback);
            return Ok(Outcome::Replaced);
        }

        if self.stays_in_place(&import, rule, origin) {
            for specifier in &import.specifiers {
                cx.warn(match specifier {
                    ImportSpecifier::Named(named) => unmapped_symbol(export_name(named), origin),
                    ImportSpecifier::Default(_) => unmapped_default(origin),
                    ImportSpecifier::Namespace(namespace) => unmapped_namespace(&namespace.local.sym, origin),
                });
            }
            return Ok(Outcome::Kept(import));
        }

        for specifier in import.specifiers {
            match specifier {
                ImportSpecifier::Named(named) => place_named(named, rule, origin, pending, cx),
                ImportSpecifier::Default(default) => {
                    let target = self.default_target(rule, origin, cx);
                    pending
                        .group(&target, origin.type_only)
                        .set_default(default.local, origin.location)?;
                }
                ImportSpecifier::Namespace(namespace) => {
                    let target = match rule.fallback {
                        Some(fallback) => fallback,
                        None => {
                            cx.warn(unmapped_namespace(&namespace.local.sym, origin));
                            origin.path
                        }
                    };
                    pending.add_namespace(target, origin.type_only, namespace);
                }
            }
        }
        Ok(Outcome::Replaced)
    }

    /// True when no specifier of a mapped import would leave its module.
    fn stays_in_place(&self, import: &ImportDecl, rule: &ModuleRule, origin: Origin<'_>) -> bool {
        rule.fallback.is_none()
            && import.specifiers.iter().all(|specifier| match specifier {
                ImportSpecifier::Named(named) => rule.symbol(export_name(named)).is_none(),
                ImportSpecifier::Default(_) => self.table.family_path(origin.path).is_none(),
                ImportSpecifier::Namespace(_) => true,
            })
    }

    fn default_target(&self, rule: &ModuleRule, origin: Origin<'_>, cx: &mut RuleContext<'_>) -> String {
        if let Some(fallback) = rule.fallback {
            return fallback.to_owned();
        }

        if let Some(target) = self.table.family_path(origin.path) {
            cx.warn(
                Diagnostic::warning(
                    DiagnosticKind::AmbiguousDefaultImport,
                    format!("Default import from '{}' might need manual adjustment.", origin.path),
                )
                .at(origin.location),
            );
            cx.warn(
                Diagnostic::warning(
                    DiagnosticKind::HeuristicPath,
                    format!(
                        "Assuming generic mapping for '{}' to '{target}'. Verify correctness.",
                        origin.path
                    ),
                )
                .at(origin.location),
            );
            return target;
        }

        cx.warn(unmapped_default(origin));
        origin.path.to_owned()
    }
}

fn unmapped_symbol(name: &str, origin: Origin<'_>) -> Diagnostic {
    Diagnostic::warning(
        DiagnosticKind::UnmappedSymbol,
        format!(
            "No specific or general mapping for import '{name}' from '{}'. Keeping original.",
            origin.path
        ),
    )
    .at(origin.location)
}

fn unmapped_default(origin: Origin<'_>) -> Diagnostic {
    Diagnostic::warning(
        DiagnosticKind::UnmappedSymbol,
        format!("No mapping for default import from '{}'. Keeping original.", origin.path),
    )
    .at(origin.location)
}

fn unmapped_namespace(local: &str, origin: Origin<'_>) -> Diagnostic {
    Diagnostic::warning(
        DiagnosticKind::UnmappedSymbol,
        format!(
            "No module-wide mapping for namespace import '{local}' from '{}'. Keeping original.",
            origin.path
        ),
    )
    .at(origin.location)
}

/// Resolves one named specifier: explicit removal, explicit move or rename,
/// module fallback, and finally the original module with a warning.
fn place_named(
    named: ImportNamedSpecifier,
    rule: &ModuleRule,
    origin: Origin<'_>,
    pending: &mut PendingImports,
    cx: &mut RuleContext<'_>,
) {
    let imported = export_name(&named).to_owned();
    let (target, rename, type_only) = match rule.symbol(&imported) {
        Some(SymbolRule::Remove) => {
            debug!(symbol = %imported, module = origin.path, "dropping obsolete import");
            return;
        }
        Some(SymbolRule::Move(module)) => (module, None, origin.type_only),
        Some(SymbolRule::Rename {
            module,
            name,
            type_only,
        }) => (module, name, type_only.unwrap_or(origin.type_only)),
        None => {
            if let Some(fallback) = rule.fallback {
                (fallback, None, origin.type_only)
            } else {
                cx.warn(unmapped_symbol(&imported, origin));
                (origin.path, None, origin.type_only)
            }
        }
    };

    pending
        .group(target, type_only)
        .add_named(retarget_specifier(named, rename, type_only));
}

/// Moves every specifier of `import` to `target` unchanged.
fn retarget(
    import: ImportDecl,
    target: &str,
    origin: Origin<'_>,
    pending: &mut PendingImports,
    cx: &mut RuleContext<'_>,
) -> Result<(), RuleError> {
    if import.specifiers.is_empty() {
        pending.add_side_effect(target);
        return Ok(());
    }

    for specifier in import.specifiers {
        match specifier {
            ImportSpecifier::Named(named) => pending
                .group(target, origin.type_only)
                .add_named(retarget_specifier(named, None, origin.type_only)),
            ImportSpecifier::Default(default) => {
                cx.warn(
                    Diagnostic::warning(
                        DiagnosticKind::AmbiguousDefaultImport,
                        format!("Default import from '{}' might need manual adjustment.", origin.path),
                    )
                    .at(origin.location),
                );
                pending
                    .group(target, origin.type_only)
                    .set_default(default.local, origin.location)?;
            }
            ImportSpecifier::Namespace(namespace) => {
                pending.add_namespace(target, origin.type_only, namespace);
            }
        }
    }
    Ok(())
}

/// Name the specifier imports from its module (`A` in `import { A as B }`).
fn export_name(specifier: &ImportNamedSpecifier) -> &str {
    match &specifier.imported {
        Some(ModuleExportName::Ident(ident)) => &ident.sym,
        Some(ModuleExportName::Str(name)) => literal_text(name).unwrap_or_default(),
        None => &specifier.local.sym,
    }
}

fn same_binding(left: &ImportNamedSpecifier, right: &ImportNamedSpecifier) -> bool {
    left.local.sym == right.local.sym && export_name(left) == export_name(right)
}

/// Applies a rename to a specifier. An alias stays the local binding; an
/// unaliased import binds the new name.
fn retarget_specifier(
    named: ImportNamedSpecifier,
    rename: Option<&str>,
    group_type_only: bool,
) -> ImportNamedSpecifier {
    let ImportNamedSpecifier {
        span,
        local,
        imported,
        is_type_only,
    } = named;
    // `import type { type X }` is rejected by TypeScript.
    let is_type_only = is_type_only && !group_type_only;

    let Some(new_name) = rename else {
        return ImportNamedSpecifier {
            span,
            local,
            imported,
            is_type_only,
        };
    };

    if imported.is_some() {
        let imported = (new_name != &*local.sym)
            .then(|| ModuleExportName::Ident(Ident::new_no_ctxt(new_name.into(), DUMMY_SP)));
        ImportNamedSpecifier {
            span,
            local,
            imported,
            is_type_only,
        }
    } else {
        ImportNamedSpecifier {
            span,
            local: Ident {
                sym: new_name.into(),
                ..local
            },
            imported: None,
            is_type_only,
        }
    }
}

fn import_decl(module: &str, type_only: bool, specifiers: Vec<ImportSpecifier>) -> ImportDecl {
    ImportDecl {
        span: DUMMY_SP,
        specifiers,
        src: Box::new(str_node(module)),
        type_only,
        with: None,
        phase: ImportPhase::Evaluation,
    }
}

fn default_conflict(module: &str, existing: &str, incoming: &str, location: Option<Location>) -> RuleError {
    RuleError {
        kind: TransformErrorKind::DefaultImportConflict {
            module: module.to_owned(),
            existing: existing.to_owned(),
            incoming: incoming.to_owned(),
        },
        location,
    }
}

/// Imports collected during one pass, flushed once at the end.
#[derive(Default)]
struct PendingImports {
    groups: Vec<PendingImport>,
    standalone: Vec<ImportDecl>,
    /// Which list each new declaration went to, in first-seen order.
    order: Vec<Slot>,
}

#[derive(Clone, Copy)]
enum Slot {
    Group,
    Standalone,
}

/// One destination declaration, keyed by module path and type-only flag.
struct PendingImport {
    module: String,
    type_only: bool,
    default: Option<Ident>,
    named: Vec<ImportNamedSpecifier>,
}

impl PendingImports {
    fn len(&self) -> usize {
        self.order.len()
    }

    fn group(&mut self, module: &str, type_only: bool) -> &mut PendingImport {
        let index = match self
            .groups
            .iter()
            .position(|group| group.module == module && group.type_only == type_only)
        {
            Some(index) => index,
            None => {
                self.groups.push(PendingImport {
                    module: module.to_owned(),
                    type_only,
                    default: None,
                    named: vec![],
                });
                self.order.push(Slot::Group);
                self.groups.len() - 1
            }
        };
        &mut self.groups[index]
    }

    /// Namespace imports cannot share a declaration with named specifiers.
    fn add_namespace(&mut self, module: &str, type_only: bool, namespace: ImportStarAsSpecifier) {
        self.standalone.push(import_decl(
            module,
            type_only,
            vec![ImportSpecifier::Namespace(namespace)],
        ));
        self.order.push(Slot::Standalone);
    }

    fn add_side_effect(&mut self, module: &str) {
        if !self
            .standalone
            .iter()
            .any(|import| import.specifiers.is_empty() && literal_text(&import.src) == Some(module))
        {
            self.standalone.push(import_decl(module, false, vec![]));
            self.order.push(Slot::Standalone);
        }
    }

    /// Merges groups into matching untouched imports and inserts the rest,
    /// in first-seen order, ahead of the other module items.
    fn flush_into(self, body: &mut Vec<ModuleItem>, cx: &RuleContext<'_>) -> Result<(), RuleError> {
        let mut groups = self.groups.into_iter();
        let mut standalone = self.standalone.into_iter();
        let mut created = Vec::with_capacity(self.order.len());

        for slot in self.order {
            match slot {
                Slot::Group => {
                    let Some(group) = groups.next() else { continue };
                    let existing = body.iter_mut().find_map(|item| match item {
                        ModuleItem::ModuleDecl(ModuleDecl::Import(import))
                            if group.can_merge_into(import) =>
                        {
                            Some(import)
                        }
                        _ => None,
                    });
                    match existing {
                        Some(import) => {
                            let location = cx.source.locate(import.span);
                            group.merge_into(import, location)?;
                        }
                        None => created.push(group.into_decl()),
                    }
                }
                Slot::Standalone => created.extend(standalone.next()),
            }
        }

        let tail = body.split_off(directive_prologue_len(body));
        body.extend(
            created
                .into_iter()
                .map(|import| ModuleItem::ModuleDecl(ModuleDecl::Import(import))),
        );
        body.extend(tail);
        Ok(())
    }
}

impl PendingImport {
    fn set_default(&mut self, local: Ident, location: Option<Location>) -> Result<(), RuleError> {
        match &self.default {
            None => {
                self.default = Some(local);
                Ok(())
            }
            Some(existing) if existing.sym == local.sym => Ok(()),
            Some(existing) => Err(default_conflict(&self.module, &existing.sym, &local.sym, location)),
        }
    }

    /// Adds a specifier unless the same binding is present; a value import
    /// wins over a type-only one.
    fn add_named(&mut self, specifier: ImportNamedSpecifier) {
        match self
            .named
            .iter_mut()
            .find(|existing| same_binding(existing, &specifier))
        {
            Some(existing) => existing.is_type_only &= specifier.is_type_only,
            None => self.named.push(specifier),
        }
    }

    fn can_merge_into(&self, import: &ImportDecl) -> bool {
        literal_text(&import.src) == Some(self.module.as_str())
            && import.type_only == self.type_only
            && !import
                .specifiers
                .iter()
                .any(|specifier| matches!(specifier, ImportSpecifier::Namespace(_)))
    }

    fn merge_into(self, import: &mut ImportDecl, location: Option<Location>) -> Result<(), RuleError> {
        if let Some(local) = self.default {
            let existing = import.specifiers.iter().find_map(|specifier| match specifier {
                ImportSpecifier::Default(default) => Some(default.local.sym.clone()),
                _ => None,
            });
            match existing {
                Some(existing) if existing != local.sym => {
                    return Err(default_conflict(&self.module, &existing, &local.sym, location));
                }
                Some(_) => {}
                None => import.specifiers.insert(
                    0,
                    ImportSpecifier::Default(ImportDefaultSpecifier {
                        span: DUMMY_SP,
                        local,
                    }),
                ),
            }
        }

        for specifier in self.named {
            let duplicate = import.specifiers.iter_mut().find_map(|existing| match existing {
                ImportSpecifier::Named(existing) if same_binding(existing, &specifier) => Some(existing),
                _ => None,
            });
            match duplicate {
                Some(existing) => existing.is_type_only &= specifier.is_type_only,
                None => import.specifiers.push(ImportSpecifier::Named(specifier)),
            }
        }
        Ok(())
    }

    fn into_decl(self) -> ImportDecl {
        let mut specifiers = Vec::with_capacity(self.named.len() + 1);
        if let Some(local) = self.default {
            specifiers.push(ImportSpecifier::Default(ImportDefaultSpecifier {
                span: DUMMY_SP,
                local,
            }));
        }
        specifiers.extend(self.named.into_iter().map(ImportSpecifier::Named));
        import_decl(&self.module, self.type_only, specifiers)
    }
}

/// Number of leading directive statements such as `"use client";`.
fn directive_prologue_len(body: &[ModuleItem]) -> usize {
    body.iter()
        .take_while(|item| {
            matches!(
                item,
                ModuleItem::Stmt(Stmt::Expr(ExprStmt { expr, .. })) if matches!(&**expr, Expr::Lit(Lit::Str(_)))
            )
        })
        .count()
}
