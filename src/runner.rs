//! Pipeline façade: scanner → parser → resolver → interpreter.
//!
//! Each stage runs only when the one before it produced no diagnostics.
//! Lexical errors skip parsing, syntax errors skip resolution, and resolver
//! errors skip evaluation.  The first runtime error ends evaluation and is
//! returned next to everything printed before it.

use log::{debug, info};
use serde::Serialize;

use crate::ast::Stmt;
use crate::error::{Diagnostic, LoxError, RuntimeDiagnostic, RuntimeError};
use crate::interpreter::Interpreter;
use crate::parser::{ParseOutcome, Parser};
use crate::resolver::{Resolution, Resolver};
use crate::scanner;
use crate::token::Token;

/// Everything one pass over a source text produced.
#[derive(Debug, Default)]
pub struct Run {
    pub tokens: Vec<Token>,
    pub statements: Vec<Stmt>,

    /// Lines printed by the program, in order.
    pub output: Vec<String>,

    /// Lexical, syntax and resolver errors, whichever stage stopped the run.
    pub parse_errors: Vec<LoxError>,

    pub runtime_error: Option<RuntimeError>,
}

impl Run {
    /// `true` when the run stopped before evaluation.
    pub fn had_compile_error(&self) -> bool {
        !self.parse_errors.is_empty()
    }

    pub fn had_runtime_error(&self) -> bool {
        self.runtime_error.is_some()
    }

    /// Flatten into a serialisable summary.
    pub fn report(&self) -> RunReport {
        RunReport {
            tokens: self.tokens.clone(),
            output: self.output.clone(),
            parse_errors: self.parse_errors.iter().map(LoxError::to_diagnostic).collect(),
            runtime_error: self.runtime_error.as_ref().map(RuntimeDiagnostic::from),
        }
    }
}

/// Serialisable view of a [`Run`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub tokens: Vec<Token>,
    pub output: Vec<String>,
    pub parse_errors: Vec<Diagnostic>,
    pub runtime_error: Option<RuntimeDiagnostic>,
}

/// An interpreter kept alive across several sources, so that globals
/// defined by one `run` are visible to the next.
pub struct Session {
    interpreter: Interpreter,
    next_id: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Session {
            interpreter: Interpreter::new(),
            next_id: 0,
        }
    }

    /// Session whose interpreter stops at `max_depth` nested calls.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Session {
            interpreter: Interpreter::new().with_max_depth(max_depth),
            next_id: 0,
        }
    }

    pub fn run(&mut self, source: &str) -> Run {
        info!("Running {} bytes of source", source.len());

        let mut run = Run {
            tokens: scanner::scan(source),
            ..Run::default()
        };

        run.parse_errors = scanner::lexical_errors(&run.tokens);
        if run.had_compile_error() {
            debug!("Stopping after {} lexical error(s)", run.parse_errors.len());
            return run;
        }

        let ParseOutcome {
            statements,
            errors,
            next_id,
        } = Parser::new(&run.tokens).starting_at(self.next_id).parse();

        self.next_id = next_id;
        run.statements = statements;
        run.parse_errors = errors;

        if run.had_compile_error() {
            debug!("Stopping after {} syntax error(s)", run.parse_errors.len());
            return run;
        }

        let Resolution { locals, errors } = Resolver::new().resolve(&run.statements);

        run.parse_errors = errors;
        if run.had_compile_error() {
            debug!("Stopping after {} resolve error(s)", run.parse_errors.len());
            return run;
        }

        self.interpreter.resolve(locals);

        let (output, runtime_error) = self.interpreter.interpret(&run.statements);
        run.output = output;
        run.runtime_error = runtime_error;

        run
    }
}

/// Run `source` against a fresh global environment.
pub fn run(source: &str) -> Run {
    Session::new().run(source)
}
