//! Source-to-source migration of CosmJS code to InterchainJS.
//!
//! [`transform`] parses one TypeScript or JavaScript file, rewrites it with a
//! fixed sequence of rules and prints the result:
//! - import declarations are retargeted and merged per destination module
//! - `DirectSecp256k1HdWallet.fromMnemonic` becomes `Secp256k1HDWallet.fromMnemonic`
//! - `SigningStargateClient.connectWithSigner` becomes `SigningClient.connectWithSigner`
//! - `signAndBroadcast` message envelopes are unwrapped and the fee is replaced
//!   by a placeholder
//!
//! Matching is purely syntactic. Places that need a human are reported as
//! [`Diagnostic`]s next to the output; they never fail the transform.
#![cfg_attr(
    test,
    allow(
        dead_code,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        clippy::missing_errors_doc,
        reason = "Allow for tests"
    )
)]

/// Advisory findings.
mod diagnostics;
/// Error types and result definitions.
pub mod error;
/// Bracket depth bound applied before parsing.
mod nesting;
/// Per-call settings.
mod options;
/// The rule sequence.
mod pipeline;
/// Rewrite rules and the import mapping table.
mod rules;
/// Parsing and printing.
mod syntax;
#[cfg(test)]
mod test_utils;

pub use diagnostics::{Diagnostic, DiagnosticKind, Severity};
pub use error::{Error, ErrorKind, Location, ParseError, Result, TransformError, TransformErrorKind};
pub use options::{DEFAULT_MAX_DEPTH, DEFAULT_SIGNING_CLIENT_BINDING, TransformOptions};
pub use pipeline::{Migration, Pipeline, transform, transform_with};
pub use rules::{FamilyRule, ImportTable, ModuleRule, SymbolRule};
pub use syntax::{Dialect, SourceTree, parse};
