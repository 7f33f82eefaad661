//! Persistent REPL sessions.
//!
//! A session keeps one interpreter alive across lines so variables,
//! functions and macros accumulate. Lines starting with `--` are session
//! commands; everything else is source text. REPL sessions run with
//! non-fatal errors by default so failures can be inspected as values
//! with `error?` and `string`.

use crate::{
    diagnostics::ParseError,
    env::Scope,
    io::{InputReader, OutputWriter, SourceLoader},
    run::Interpreter,
    settings,
    value::Value,
};

/// Console prompt header.
pub const PROMPT: &str = ">> ";

/// What one submitted line produced.
#[derive(Debug)]
pub enum ReplOutcome {
    /// Blank input; nothing to do.
    Empty,
    /// A `--` command was handled; the message describes the outcome.
    Command(String),
    /// The line parsed with errors.
    ParseErrors(Vec<ParseError>),
    /// The line evaluated to this value.
    Value(Value),
}

pub struct ReplSession {
    interpreter: Interpreter,
}

impl Default for ReplSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplSession {
    #[must_use]
    pub fn new() -> Self {
        settings::set_fatal_errors(false);
        Self {
            interpreter: Interpreter::new(),
        }
    }

    #[must_use]
    pub fn with_parts(
        out: Box<dyn OutputWriter>,
        input: Box<dyn InputReader>,
        loader: Box<dyn SourceLoader>,
    ) -> Self {
        settings::set_fatal_errors(false);
        Self {
            interpreter: Interpreter::with_parts(out, input, loader),
        }
    }

    /// The session's global environment.
    #[must_use]
    pub fn env(&self) -> &Scope {
        self.interpreter.env()
    }

    /// Executes one submitted line: a `--` command or source text.
    pub fn execute(&mut self, line: &str) -> ReplOutcome {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ReplOutcome::Empty;
        }
        if trimmed.starts_with("--") {
            return ReplOutcome::Command(self.handle_command(trimmed));
        }

        match self.interpreter.run(line, "REPL") {
            Ok(value) => ReplOutcome::Value(value),
            Err(errors) => ReplOutcome::ParseErrors(errors),
        }
    }

    fn handle_command(&mut self, command: &str) -> String {
        let mut words = command.split_whitespace();
        match (words.next(), words.next()) {
            (Some("--list"), _) => {
                let linker = self.interpreter.evaluator().linker();
                format!(
                    "root: {}\ncurrent: {}",
                    linker.root().display(),
                    linker.current_dir().display()
                )
            }
            (Some("--on"), Some(flag)) => Self::toggle(flag, true),
            (Some("--off"), Some(flag)) => Self::toggle(flag, false),
            (Some("--on" | "--off"), None) => "usage: --on <flag> / --off <flag>".to_owned(),
            _ => format!("unknown command: {command}"),
        }
    }

    fn toggle(flag: &str, enabled: bool) -> String {
        let state = if enabled { "on" } else { "off" };
        match flag {
            "nicer" => {
                settings::set_nicer(enabled);
                format!("nicer is now {state}")
            }
            "fatalErrors" => {
                settings::set_fatal_errors(enabled);
                format!("fatalErrors is now {state}")
            }
            _ => format!("unknown flag: {flag}"),
        }
    }
}
