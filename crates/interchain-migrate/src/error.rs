use core::fmt::{Display, Formatter, Result as FmtResult};
use core::result::Result as CoreResult;
use std::io::Error as IoError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for migration operations.
pub type Result<T> = CoreResult<T, Error>;

/// A 1-based line/column position in the input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number, starting at 1.
    pub column: usize,
}

impl Display for Location {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        write!(formatter, "{}:{}", self.line, self.column)
    }
}

/// The input text is not valid source for the selected dialect.
#[derive(Debug, Clone, Error)]
#[error("syntax error: {message}")]
pub struct ParseError {
    /// Parser message.
    pub message: String,
    /// Where the parser gave up, when known.
    pub location: Option<Location>,
}

/// Reasons a rule can refuse to process a module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformErrorKind {
    /// Traversal went deeper than the configured limit.
    #[error("nesting deeper than {limit} levels")]
    DepthExceeded {
        /// Configured maximum depth.
        limit: usize,
    },

    /// Two different default bindings would share one import declaration.
    #[error("conflicting default imports `{existing}` and `{incoming}` from `{module}`")]
    DefaultImportConflict {
        /// Destination module of the merged declaration.
        module: String,
        /// Default binding already present.
        existing: String,
        /// Default binding that could not be merged.
        incoming: String,
    },
}

/// A rule failed; the whole file transform is aborted.
#[derive(Debug, Clone, Error)]
#[error("{rule} rule failed: {kind}")]
pub struct TransformError {
    /// Name of the failing rule.
    pub rule: &'static str,
    /// What went wrong.
    pub kind: TransformErrorKind,
    /// Location of the offending node, when known.
    pub location: Option<Location>,
}

/// Category of an [`Error`], exposed to callers that report failures as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// See [`ParseError`].
    Parse,
    /// See [`TransformError`].
    Transform,
    /// Printing the rewritten module failed.
    Emit,
    /// The transform thread could not be run.
    Worker,
}

/// Errors that abort a migration. No partial output is produced.
#[derive(Debug, Error)]
pub enum Error {
    /// The source could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A rewrite rule failed.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// The rewritten module could not be printed.
    #[error("failed to print transformed source: {0}")]
    Emit(#[from] IoError),

    /// The transform thread could not be started or did not finish.
    #[error("transform worker failed: {0}")]
    Worker(String),
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(_) => ErrorKind::Parse,
            Self::Transform(_) => ErrorKind::Transform,
            Self::Emit(_) => ErrorKind::Emit,
            Self::Worker(_) => ErrorKind::Worker,
        }
    }

    /// Returns the source location the error points at, if any.
    pub fn location(&self) -> Option<Location> {
        match self {
            Self::Parse(err) => err.location,
            Self::Transform(err) => err.location,
            Self::Emit(_) | Self::Worker(_) => None,
        }
    }
}
