//! Parsing source text into an SWC module and printing it back.

use std::io::{Error as IoError, ErrorKind as IoErrorKind};
use std::path::Path;

use serde::{Deserialize, Serialize};
use swc_common::comments::SingleThreadedComments;
use swc_common::sync::Lrc;
use swc_common::{FileName, SourceFile, SourceMap, Span, Spanned as _};
use swc_ecma_ast::{EsVersion, Module};
use swc_ecma_codegen::text_writer::JsWriter;
use swc_ecma_codegen::{Config as CodegenConfig, Emitter};
use swc_ecma_parser::error::Error as SwcParseError;
use swc_ecma_parser::{EsSyntax, Syntax, TsSyntax, parse_file_as_module};

use crate::error::{Error, Location, ParseError};

/// Source language accepted by the parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// TypeScript without JSX.
    #[default]
    TypeScript,
    /// TypeScript with JSX.
    Tsx,
    /// Modern JavaScript with JSX enabled.
    JavaScript,
}

impl Dialect {
    /// Picks the dialect from a file extension, defaulting to TypeScript.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("tsx") => Self::Tsx,
            Some("js" | "jsx" | "mjs" | "cjs") => Self::JavaScript,
            _ => Self::TypeScript,
        }
    }

    fn syntax(self) -> Syntax {
        match self {
            Self::TypeScript | Self::Tsx => Syntax::Typescript(TsSyntax {
                tsx: matches!(self, Self::Tsx),
                decorators: true,
                dts: false,
                no_early_errors: true,
                disallow_ambiguous_jsx_like: false,
            }),
            Self::JavaScript => Syntax::Es(EsSyntax {
                jsx: true,
                ..EsSyntax::default()
            }),
        }
    }
}

/// A parsed file: the module plus everything needed to print it again.
pub struct SourceTree {
    source_map: Lrc<SourceMap>,
    file: Lrc<SourceFile>,
    comments: SingleThreadedComments,
    module: Module,
}

/// Read-only view of the source shared with the rewrite rules.
#[derive(Clone, Copy)]
pub(crate) struct SourceContext<'a> {
    pub(crate) comments: &'a SingleThreadedComments,
    source_map: &'a SourceMap,
    file: &'a SourceFile,
}

impl SourceContext<'_> {
    /// Maps a span from the original input to a line/column pair.
    ///
    /// Synthesized spans do not belong to the input and yield `None`.
    pub(crate) fn locate(&self, span: Span) -> Option<Location> {
        locate(self.source_map, self.file, span)
    }
}

impl SourceTree {
    /// The parsed module.
    pub fn module(&self) -> &Module {
        &self.module
    }

    pub(crate) fn split(&mut self) -> (&mut Module, SourceContext<'_>) {
        let context = SourceContext {
            comments: &self.comments,
            source_map: &self.source_map,
            file: &self.file,
        };
        (&mut self.module, context)
    }

    /// Prints the module, including comments, with `\n` line endings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Emit`] if code generation fails.
    pub fn print(self) -> Result<String, Error> {
        let mut buf = vec![];
        {
            let writer = JsWriter::new(Lrc::clone(&self.source_map), "\n", &mut buf, None);
            let mut emitter = Emitter {
                cfg: CodegenConfig::default(),
                cm: Lrc::clone(&self.source_map),
                comments: Some(&self.comments),
                wr: writer,
            };
            emitter.emit_module(&self.module)?;
        }

        String::from_utf8(buf).map_err(|err| Error::Emit(IoError::new(IoErrorKind::InvalidData, err)))
    }
}

/// Parses `source` as a module.
///
/// Recoverable syntax errors are reported too: the first one becomes the
/// returned [`ParseError`].
///
/// # Errors
///
/// Returns a [`ParseError`] carrying the parser message and location.
pub fn parse(file_name: &str, source: &str, dialect: Dialect) -> Result<SourceTree, ParseError> {
    let source_map = Lrc::new(SourceMap::default());
    let file = source_map.new_source_file(
        Lrc::new(FileName::Custom(file_name.to_owned())),
        source.to_owned(),
    );
    let comments = SingleThreadedComments::default();

    let mut recovered = vec![];
    let parsed = parse_file_as_module(
        &file,
        dialect.syntax(),
        EsVersion::Es2022,
        Some(&comments),
        &mut recovered,
    );

    let module = match parsed {
        Ok(module) => module,
        Err(err) => return Err(parse_error(&source_map, &file, &err)),
    };
    if let Some(err) = recovered.first() {
        return Err(parse_error(&source_map, &file, err));
    }

    Ok(SourceTree {
        source_map,
        file,
        comments,
        module,
    })
}

fn parse_error(source_map: &SourceMap, file: &SourceFile, err: &SwcParseError) -> ParseError {
    ParseError {
        message: err.kind().msg().into_owned(),
        location: locate(source_map, file, err.span()),
    }
}

fn locate(source_map: &SourceMap, file: &SourceFile, span: Span) -> Option<Location> {
    if span.is_dummy() || span.lo < file.start_pos || span.lo > file.end_pos {
        return None;
    }
    let loc = source_map.lookup_char_pos(span.lo);
    Some(Location {
        line: loc.line,
        column: loc.col.0 + 1,
    })
}
