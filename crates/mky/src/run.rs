//! Public entry point for running source text.
//!
//! `Interpreter` wires an evaluator to a global environment and runs the
//! whole pipeline: parse, include pre-pass, macro passes, evaluation.
//! Parse failures come back as the collected diagnostics; runtime errors
//! come back as the resulting `Error` value.

use std::path::PathBuf;

use crate::{
    diagnostics::{ParseError, Severity},
    env::Scope,
    eval::Evaluator,
    io::{InputReader, OutputWriter, SourceLoader},
    parser::parse_source,
    value::Value,
};

pub struct Interpreter {
    env: Scope,
    evaluator: Evaluator,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// An interpreter on the real stdout/stdin/filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self {
            env: Scope::new(),
            evaluator: Evaluator::new(),
        }
    }

    /// An interpreter with custom host collaborators.
    #[must_use]
    pub fn with_parts(
        out: Box<dyn OutputWriter>,
        input: Box<dyn InputReader>,
        loader: Box<dyn SourceLoader>,
    ) -> Self {
        Self {
            env: Scope::new(),
            evaluator: Evaluator::with_parts(out, input, loader),
        }
    }

    /// The global environment; persistent across `run` calls.
    #[must_use]
    pub fn env(&self) -> &Scope {
        &self.env
    }

    #[must_use]
    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn evaluator_mut(&mut self) -> &mut Evaluator {
        &mut self.evaluator
    }

    /// Parses and evaluates `source`.
    ///
    /// Error-grade diagnostics abort before evaluation and are returned;
    /// warning-grade diagnostics go to stderr and execution proceeds. A
    /// runtime failure is the returned `Error` value.
    pub fn run(&mut self, source: &str, filename: &str) -> Result<Value, Vec<ParseError>> {
        let (program, diagnostics) = parse_source(source, filename);
        if diagnostics.iter().any(|error| error.severity == Severity::Error) {
            return Err(diagnostics);
        }
        for warning in &diagnostics {
            eprint!("{}", warning.render(source));
        }

        let saved_dir = self.evaluator.linker_mut().begin(PathBuf::from(filename));
        let (_, value) = self.evaluator.run_parsed(program, &self.env);
        self.evaluator.linker_mut().finish(saved_dir);
        Ok(value)
    }
}

/// Renders an `Error` value the way the host prints fatal failures.
#[must_use]
pub fn render_runtime_error(value: &Value) -> Option<String> {
    let Value::Error(error) = value else {
        return None;
    };
    Some(format!(
        "Runtime Error: {}, at {}:{}, in file {}",
        error.message, error.data.row, error.data.column, error.data.filename
    ))
}
