//! Runtime toggles shared by the parser, printer, and evaluator.
//!
//! Both flags are thread-local so REPL sessions and tests on different
//! threads never observe each other's configuration.

use std::cell::Cell;

thread_local! {
    /// Selects the source-like AST rendering instead of the parenthesized
    /// precedence-debug form.
    static NICER: Cell<bool> = const { Cell::new(false) };
    /// When set, `Error` values abort the enclosing program or function.
    /// When clear, errors flow through evaluation as ordinary values.
    static FATAL_ERRORS: Cell<bool> = const { Cell::new(true) };
}

#[must_use]
pub fn nicer() -> bool {
    NICER.with(Cell::get)
}

pub fn set_nicer(enabled: bool) {
    NICER.with(|flag| flag.set(enabled));
}

#[must_use]
pub fn fatal_errors() -> bool {
    FATAL_ERRORS.with(Cell::get)
}

pub fn set_fatal_errors(enabled: bool) {
    FATAL_ERRORS.with(|flag| flag.set(enabled));
}
