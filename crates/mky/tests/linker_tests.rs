//! Linker tests: include/import resolution, isolation, and circular
//! dependency safety, served from an in-memory loader.

use mky::{EmptyInput, Interpreter, MapLoader, NullOutput, Value, render_runtime_error, settings};
use pretty_assertions::assert_eq;

fn interpreter_with(files: &[(&str, &str)]) -> Interpreter {
    settings::set_fatal_errors(true);
    let mut loader = MapLoader::new();
    for (path, source) in files {
        loader.insert(*path, *source);
    }
    let mut interpreter = Interpreter::with_parts(Box::new(NullOutput), Box::new(EmptyInput), Box::new(loader));
    interpreter.evaluator_mut().linker_mut().set_root("/mky");
    interpreter
}

fn assert_integer(value: &Value, expected: f64) {
    match value {
        Value::Integer(actual) => {
            assert!((actual - expected).abs() < 1e-9, "got {actual}, want {expected}");
        }
        other => panic!("not an integer: {other:?}"),
    }
}

#[test]
fn include_merges_into_the_current_environment() {
    let mut interpreter = interpreter_with(&[("/app/util.mky", "let helper = fn(x) { x * 2 }")]);
    let value = interpreter
        .run("include(\"util.mky\")\nhelper(21)", "/app/main.mky")
        .expect("source should parse");
    assert_integer(&value, 42.0);
}

#[test]
fn included_macros_are_visible_at_expansion_time() {
    let files = [(
        "/app/macros.mky",
        "let double_it = macro(x) { quote(unquote(x) * 2) }",
    )];
    let mut interpreter = interpreter_with(&files);
    let value = interpreter
        .run("include(\"macros.mky\")\ndouble_it(4)", "/app/main.mky")
        .expect("source should parse");
    assert_integer(&value, 8.0);
}

#[test]
fn bare_names_resolve_under_the_library_root() {
    let files = [("/mky/lib/std/std.mky", "let double = fn(x) { x * 2 }")];
    let mut interpreter = interpreter_with(&files);
    let value = interpreter
        .run("let std = import(\"std\")\nstd.double(21)", "/app/main.mky")
        .expect("source should parse");
    assert_integer(&value, 42.0);
}

#[test]
fn import_returns_an_isolated_module() {
    let files = [("/mky/lib/std/std.mky", "let double = fn(x) { x * 2 }")];
    let mut interpreter = interpreter_with(&files);
    let value = interpreter
        .run("let std = import(\"std\")\ndouble(2)", "/app/main.mky")
        .expect("source should parse");
    assert!(
        matches!(&value, Value::Error(error) if error.message == "identifier not found: double"),
        "got {value:?}"
    );
}

#[test]
fn include_is_relative_to_the_including_file() {
    let files = [
        ("/app/nested/inner.mky", "let from_inner = 7"),
        ("/app/nested/outer.mky", "include(\"inner.mky\")\nlet from_outer = from_inner + 1"),
    ];
    let mut interpreter = interpreter_with(&files);
    let value = interpreter
        .run("include(\"nested/outer.mky\")\nfrom_outer", "/app/main.mky")
        .expect("source should parse");
    assert_integer(&value, 8.0);
}

#[test]
fn circular_includes_are_safe() {
    let files = [("/app/b.mky", "include(\"a.mky\")\nlet b1 = 5")];
    let mut interpreter = interpreter_with(&files);
    let value = interpreter
        .run("include(\"b.mky\")\nlet out = b1 + 1\nout", "/app/a.mky")
        .expect("source should parse");
    assert_integer(&value, 6.0);
}

#[test]
fn mutually_including_files_both_load() {
    let files = [
        ("/app/a.mky", "include(\"b.mky\")\nlet a1 = 1"),
        ("/app/b.mky", "include(\"a.mky\")\nlet b1 = 2"),
    ];
    let mut interpreter = interpreter_with(&files);
    let value = interpreter
        .run("include(\"a.mky\")\na1 + b1", "/app/main.mky")
        .expect("source should parse");
    assert_integer(&value, 3.0);
}

#[test]
fn missing_files_fail_to_compile() {
    let mut interpreter = interpreter_with(&[]);
    let value = interpreter
        .run("include(\"nope.mky\")", "/app/main.mky")
        .expect("source should parse");
    let rendered = render_runtime_error(&value).expect("should be an error");
    assert!(rendered.contains("Failed to compile file"), "got {rendered}");
    assert!(rendered.contains("nope.mky"), "got {rendered}");
}

#[test]
fn parse_failures_in_linked_files_fail_to_compile() {
    let files = [("/app/bad.mky", "let = broken")];
    let mut interpreter = interpreter_with(&files);
    let value = interpreter
        .run("include(\"bad.mky\")", "/app/main.mky")
        .expect("source should parse");
    assert!(
        matches!(&value, Value::Error(error) if error.message.starts_with("Failed to compile file")),
        "got {value:?}"
    );
}

#[test]
fn runtime_errors_in_included_files_propagate() {
    let files = [("/app/boom.mky", "missing_name")];
    let mut interpreter = interpreter_with(&files);
    let value = interpreter
        .run("include(\"boom.mky\")", "/app/main.mky")
        .expect("source should parse");
    assert!(
        matches!(&value, Value::Error(error) if error.message == "identifier not found: missing_name"),
        "got {value:?}"
    );
}

#[test]
fn imported_modules_keep_their_body() {
    let files = [("/mky/lib/std/std.mky", "let x = 1\nlet y = 2")];
    let mut interpreter = interpreter_with(&files);
    let value = interpreter
        .run("import(\"std\")", "/app/main.mky")
        .expect("source should parse");
    let Value::Module(module) = &value else {
        panic!("expected module, got {value:?}");
    };
    assert_eq!(module.body.statements.len(), 2);
}
