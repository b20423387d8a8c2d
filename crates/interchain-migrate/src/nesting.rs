//! Bracket nesting bound checked on the raw text, before the parser recurses
//! into it.
//!
//! The scan skips comments, string literals and template text, and tracks
//! `${ ... }` substitutions. Regular expression literals are not recognized;
//! an unbalanced bracket inside one only shifts the count by one.

use core::iter::Peekable;
use core::str::Chars;

use crate::error::{Location, TransformError, TransformErrorKind};

/// Reported as the failing rule when the pre-parse bound is exceeded.
pub(crate) const NESTING_CHECK: &str = "nesting";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Frame {
    Bracket,
    /// Inside a template literal, outside any substitution.
    Template,
    /// Inside a `${ ... }` substitution.
    Substitution,
}

#[derive(Clone, Copy)]
enum Mode {
    Code,
    LineComment,
    BlockComment,
    Quoted(char),
}

/// Characters with their 1-based position.
struct Cursor<'s> {
    chars: Peekable<Chars<'s>>,
    line: usize,
    column: usize,
}

impl Cursor<'_> {
    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Consumes the next character if it is `expected`.
    fn eat(&mut self, expected: char) -> bool {
        let matched = self.chars.peek() == Some(&expected);
        if matched {
            self.advance();
        }
        matched
    }

    fn location(&self) -> Location {
        Location {
            line: self.line,
            column: self.column,
        }
    }
}

struct Scanner {
    stack: Vec<Frame>,
    mode: Mode,
}

impl Scanner {
    fn step(&mut self, ch: char, cursor: &mut Cursor<'_>) {
        match self.mode {
            Mode::LineComment => {
                if ch == '\n' {
                    self.mode = Mode::Code;
                }
            }
            Mode::BlockComment => {
                if ch == '*' && cursor.eat('/') {
                    self.mode = Mode::Code;
                }
            }
            Mode::Quoted(quote) => self.quoted(quote, ch, cursor),
            Mode::Code if self.stack.last() == Some(&Frame::Template) => self.template(ch, cursor),
            Mode::Code => self.code(ch, cursor),
        }
    }

    fn quoted(&mut self, quote: char, ch: char, cursor: &mut Cursor<'_>) {
        match ch {
            '\\' => {
                cursor.advance();
            }
            // Unterminated literals end at the line break.
            '\n' => self.mode = Mode::Code,
            _ if ch == quote => self.mode = Mode::Code,
            _ => {}
        }
    }

    fn template(&mut self, ch: char, cursor: &mut Cursor<'_>) {
        match ch {
            '\\' => {
                cursor.advance();
            }
            '`' => {
                self.stack.pop();
            }
            '$' if cursor.eat('{') => self.stack.push(Frame::Substitution),
            _ => {}
        }
    }

    fn code(&mut self, ch: char, cursor: &mut Cursor<'_>) {
        match ch {
            '/' if cursor.eat('/') => self.mode = Mode::LineComment,
            '/' if cursor.eat('*') => self.mode = Mode::BlockComment,
            '\'' | '"' => self.mode = Mode::Quoted(ch),
            '`' => self.stack.push(Frame::Template),
            '(' | '[' | '{' => self.stack.push(Frame::Bracket),
            ')' | ']' | '}' => {
                self.stack.pop();
            }
            _ => {}
        }
    }
}

/// Fails when brackets, template literals and substitutions nest deeper than
/// `limit`.
pub(crate) fn check_nesting(source: &str, limit: usize) -> Result<(), TransformError> {
    let mut cursor = Cursor {
        chars: source.chars().peekable(),
        line: 1,
        column: 0,
    };
    let mut scanner = Scanner {
        stack: vec![],
        mode: Mode::Code,
    };

    while let Some(ch) = cursor.advance() {
        scanner.step(ch, &mut cursor);
        if scanner.stack.len() > limit {
            return Err(TransformError {
                rule: NESTING_CHECK,
                kind: TransformErrorKind::DepthExceeded { limit },
                location: Some(cursor.location()),
            });
        }
    }
    Ok(())
}
