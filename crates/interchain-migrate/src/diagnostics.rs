//! Advisory diagnostics collected while migrating a file.
//!
//! Diagnostics never abort a transform. They flag places where the output
//! compiles but a developer should double-check the result.

use core::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Location;

/// How serious a diagnostic is. Every diagnostic emitted today is a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Manual review is recommended.
    Warning,
}

/// What a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// An imported symbol has no migration rule and was kept at its module.
    UnmappedSymbol,
    /// A `@cosmjs/*` module has no table entry; the import was left as is.
    UnmappedModule,
    /// A default import from the generated-types family needs a manual check.
    AmbiguousDefaultImport,
    /// A module path was derived by prefix substitution.
    HeuristicPath,
    /// Wallet options other than `prefix` were dropped.
    DroppedWalletOption,
    /// A `signAndBroadcast` call could not be rewritten safely.
    BroadcastNotRewritten,
}

impl DiagnosticKind {
    /// Stable kebab-case code for this kind.
    pub const fn code(self) -> &'static str {
        match self {
            Self::UnmappedSymbol => "unmapped-symbol",
            Self::UnmappedModule => "unmapped-module",
            Self::AmbiguousDefaultImport => "ambiguous-default-import",
            Self::HeuristicPath => "heuristic-path",
            Self::DroppedWalletOption => "dropped-wallet-option",
            Self::BroadcastNotRewritten => "broadcast-not-rewritten",
        }
    }
}

/// A single advisory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Always [`Severity::Warning`].
    pub severity: Severity,
    /// Category of the finding.
    pub kind: DiagnosticKind,
    /// Human-readable explanation.
    pub message: String,
    /// Where in the input the finding applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Diagnostic {
    /// Creates a warning without a location.
    pub fn warning<T: Into<String>>(kind: DiagnosticKind, message: T) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            message: message.into(),
            location: None,
        }
    }

    /// Attaches a location.
    #[must_use]
    pub fn at(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }
}

impl Display for Diagnostic {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        if let Some(location) = self.location {
            write!(formatter, "{location}: ")?;
        }
        write!(formatter, "warning[{}]: {}", self.kind.code(), self.message)
    }
}

/// Ordered diagnostics for one transform call.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        debug!(kind = diagnostic.kind.code(), "{}", diagnostic.message);
        self.entries.push(diagnostic);
    }

    pub(crate) fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
