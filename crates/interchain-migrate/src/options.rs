//! Per-call transform settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::syntax::Dialect;

/// Default bound on expression/statement nesting during traversal.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Variable name the broadcast rule expects the signing client to be bound to.
pub const DEFAULT_SIGNING_CLIENT_BINDING: &str = "signingClient";

/// Settings for one call to [`transform_with`](crate::transform_with).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Grammar used to parse the input.
    pub dialect: Dialect,
    /// Maximum traversal depth before the transform aborts.
    pub max_depth: usize,
    /// Receiver name matched by the broadcast rule.
    pub signing_client_binding: String,
    /// Name reported by the parser for the input.
    #[serde(skip)]
    pub file_name: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            signing_client_binding: DEFAULT_SIGNING_CLIENT_BINDING.to_owned(),
            file_name: "input.ts".to_owned(),
        }
    }
}

impl TransformOptions {
    /// Uses the dialect and name implied by `path`.
    #[must_use]
    pub fn for_path(mut self, path: &Path) -> Self {
        self.dialect = Dialect::from_path(path);
        self.file_name = path.display().to_string();
        self
    }
}
