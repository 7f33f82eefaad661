//! Behavioral tests for `ReplSession`: state persists across lines,
//! `--` commands toggle runtime flags, and errors stay inspectable.

use mky::{EmptyInput, MapLoader, NullOutput, ReplOutcome, ReplSession, Value};

fn session() -> ReplSession {
    ReplSession::with_parts(Box::new(NullOutput), Box::new(EmptyInput), Box::new(MapLoader::new()))
}

fn value_of(outcome: ReplOutcome) -> Value {
    match outcome {
        ReplOutcome::Value(value) => value,
        other => panic!("expected a value outcome, got {other:?}"),
    }
}

#[test]
fn blank_lines_do_nothing() {
    let mut session = session();
    assert!(matches!(session.execute("   "), ReplOutcome::Empty));
}

#[test]
fn variables_persist_across_lines() {
    let mut session = session();
    session.execute("let x = 42");
    let value = value_of(session.execute("x + 1"));
    assert!(matches!(value, Value::Integer(v) if (v - 43.0).abs() < 1e-9));
}

#[test]
fn functions_persist_across_lines() {
    let mut session = session();
    session.execute("let double = fn(x) { x * 2 }");
    let value = value_of(session.execute("double(21)"));
    assert!(matches!(value, Value::Integer(v) if (v - 42.0).abs() < 1e-9));
}

#[test]
fn repl_errors_are_values_by_default() {
    let mut session = session();
    let value = value_of(session.execute("error?(5 + true)"));
    assert!(matches!(value, Value::Boolean(true)));

    // The failed expression does not poison the session.
    let value = value_of(session.execute("1 + 1"));
    assert!(matches!(value, Value::Integer(v) if (v - 2.0).abs() < 1e-9));
}

#[test]
fn fatal_errors_can_be_toggled_on() {
    let mut session = session();
    session.execute("--on fatalErrors");
    let value = value_of(session.execute("5 + true\n99"));
    assert!(matches!(value, Value::Error(_)), "fatal mode should abort the line");

    session.execute("--off fatalErrors");
    let value = value_of(session.execute("5 + true\n99"));
    assert!(matches!(value, Value::Integer(v) if (v - 99.0).abs() < 1e-9));
}

#[test]
fn list_command_prints_directories() {
    let mut session = session();
    let ReplOutcome::Command(message) = session.execute("--list") else {
        panic!("expected a command outcome");
    };
    assert!(message.contains("root:"));
    assert!(message.contains("current:"));
}

#[test]
fn toggle_commands_acknowledge() {
    let mut session = session();
    let ReplOutcome::Command(message) = session.execute("--on nicer") else {
        panic!("expected a command outcome");
    };
    assert_eq!(message, "nicer is now on");
    let ReplOutcome::Command(message) = session.execute("--off nicer") else {
        panic!("expected a command outcome");
    };
    assert_eq!(message, "nicer is now off");
}

#[test]
fn unknown_commands_and_flags_report() {
    let mut session = session();
    let ReplOutcome::Command(message) = session.execute("--bogus") else {
        panic!("expected a command outcome");
    };
    assert!(message.contains("unknown command"));

    let ReplOutcome::Command(message) = session.execute("--on wat") else {
        panic!("expected a command outcome");
    };
    assert!(message.contains("unknown flag"));
}

#[test]
fn parse_errors_come_back_as_diagnostics() {
    let mut session = session();
    let ReplOutcome::ParseErrors(errors) = session.execute("let = 1") else {
        panic!("expected parse errors");
    };
    assert!(!errors.is_empty());
}

#[test]
fn macros_defined_in_one_line_expand_in_later_lines() {
    let mut session = session();
    session.execute("let unless = macro(c, a, b) { quote(if (!(unquote(c))) { unquote(a) } else { unquote(b) }) }");
    let value = value_of(session.execute("unless(false, 1, 2)"));
    assert!(matches!(value, Value::Integer(v) if (v - 1.0).abs() < 1e-9));
}
