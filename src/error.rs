//! Centralised error hierarchy for the **Lox interpreter**.
//!
//! The scanner, parser and resolver report through [`LoxError`], whose
//! variants all render with a `[line L, col C]` prefix.  Runtime failures
//! carry their own [`RuntimeError`] type: the evaluator returns them through
//! `?` and they never mix with the compile-time list.
//!
//! The module **does not** print diagnostics itself.

use std::fmt;

use log::info;
use serde::Serialize;
use thiserror::Error;

use crate::token::{Token, TokenType};

/// Compile-time diagnostic: everything that stops a program before it runs.
///
/// The `col` in each rendering is the character offset of the offending
/// lexeme from the start of the source, not its position within the line.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoxError {
    /// Lexical (scanner) error with source position.
    #[error("[line {line}, col {offset}] {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,

        /// 0‑based character offset of the offending character.
        offset: usize,
    },

    /// Syntactic (parser) error, positioned at the offending token.
    #[error("[line {line}, col {offset}] Error{location}: {message}")]
    Parse {
        message: String,
        location: Location,
        line: usize,
        offset: usize,
    },

    /// Static‑analysis failure reported by the resolver.
    #[error("[line {line}, col {offset}] Error{location}: {message}")]
    Resolve {
        message: String,
        location: Location,
        line: usize,
        offset: usize,
    },
}

/// Where a parse or resolve error points: a concrete lexeme or the end of
/// input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Lexeme(String),
    End,
}

impl Location {
    fn of(token: &Token) -> Self {
        match token.token_type {
            TokenType::EOF => Location::End,
            _ => Location::Lexeme(token.lexeme.clone()),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Lexeme(lexeme) => write!(f, " at '{}'", lexeme),
            Location::End => write!(f, " at end"),
        }
    }
}

impl LoxError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, offset: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        LoxError::Lex {
            message,
            line,
            offset,
        }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: line={}, msg={}", token.line(), message);

        LoxError::Parse {
            message,
            location: Location::of(token),
            line: token.line(),
            offset: token.span.offset,
        }
    }

    /// Helper constructor for the **resolver**.
    pub fn resolve<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Resolve error: line={}, msg={}", token.line(), message);

        LoxError::Resolve {
            message,
            location: Location::of(token),
            line: token.line(),
            offset: token.span.offset,
        }
    }

    /// 1‑based source line.
    pub fn line(&self) -> usize {
        match self {
            LoxError::Lex { line, .. }
            | LoxError::Parse { line, .. }
            | LoxError::Resolve { line, .. } => *line,
        }
    }

    /// Character offset from the start of the source.
    pub fn offset(&self) -> usize {
        match self {
            LoxError::Lex { offset, .. }
            | LoxError::Parse { offset, .. }
            | LoxError::Resolve { offset, .. } => *offset,
        }
    }

    /// Flatten into the `{message, line, column}` shape used by structured
    /// consumers.  `column` carries the same offset as the message.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic {
            message: self.to_string(),
            line: self.line(),
            column: self.offset(),
        }
    }
}

/// A failure raised while evaluating a program.  Rendered as the message
/// followed by a `[line L]` companion line.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}\n[line {line}]")]
pub struct RuntimeError {
    pub message: String,
    pub line: usize,
}

impl RuntimeError {
    /// Build an error positioned at `token`.
    pub fn new<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Runtime error: line={}, msg={}", token.line(), message);

        RuntimeError {
            message,
            line: token.line(),
        }
    }
}

/// Compile-time diagnostic in serialisable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

/// Runtime diagnostic in serialisable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeDiagnostic {
    pub message: String,
    pub line: usize,
}

impl From<&RuntimeError> for RuntimeDiagnostic {
    fn from(err: &RuntimeError) -> Self {
        RuntimeDiagnostic {
            message: err.message.clone(),
            line: err.line,
        }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, LoxError>;
