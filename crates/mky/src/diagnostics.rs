//! Parse diagnostics and their rendered form.
//!
//! Errors are accumulated by the parser and printed after parsing with a
//! few lines of surrounding source so the offending row is easy to spot.

use std::fmt::{self, Write as _};
use std::path::Path;

use strum::Display;

use crate::token::TokenData;

/// How many source lines to show around the offending row.
const LINES_AROUND: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Severity {
    Warning,
    Error,
}

/// A single parser diagnostic with its source location.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub severity: Severity,
    pub data: TokenData,
}

impl ParseError {
    #[must_use]
    pub fn error(message: impl Into<String>, data: TokenData) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            data,
        }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>, data: TokenData) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Warning,
            data,
        }
    }

    /// Renders this diagnostic with numbered context lines from `source`.
    #[must_use]
    pub fn render(&self, source: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Parser {}: {}, at {}:{}, in file {}",
            self.severity, self.message, self.data.row, self.data.column, self.data.filename
        );

        let basename = Path::new(self.data.filename.as_ref())
            .file_name()
            .map_or_else(|| self.data.filename.to_string(), |name| name.to_string_lossy().into_owned());
        let _ = writeln!(out, "[{basename}]");

        let normalized = source.replace('\r', "");
        let lines: Vec<&str> = normalized.lines().collect();
        let row = self.data.row as usize;
        let top = row.saturating_sub(LINES_AROUND);
        let bottom = row.saturating_add(LINES_AROUND - 1).min(lines.len());
        for number in (top + 1)..=bottom {
            let line = lines.get(number - 1).copied().unwrap_or_default();
            let _ = write!(out, "| {number:<3} {line}");
            if number == row {
                out.push_str("    <-- over here");
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parser {}: {}, at {}:{}, in file {}",
            self.severity, self.message, self.data.row, self.data.column, self.data.filename
        )
    }
}

/// Renders every diagnostic in `errors` against `source`.
#[must_use]
pub fn render_all(errors: &[ParseError], source: &str) -> String {
    let mut out = String::new();
    for error in errors {
        out.push_str(&error.render(source));
        out.push('\n');
    }
    out
}
