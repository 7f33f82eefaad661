//! Quote/unquote and the macro expansion pre-pass.

use mky::{
    CollectStringOutput, EmptyInput, Evaluator, Interpreter, MapLoader, NullOutput, Scope, Statement, Value, macros,
    parse_source, settings,
};
use pretty_assertions::assert_eq;

fn run(source: &str) -> Value {
    settings::set_fatal_errors(true);
    let mut interpreter =
        Interpreter::with_parts(Box::new(NullOutput), Box::new(EmptyInput), Box::new(MapLoader::new()));
    interpreter.run(source, "macro_test.mky").expect("source should parse")
}

/// Runs the definition and expansion passes only, returning the rewritten
/// program's debug rendering.
fn expand(source: &str) -> String {
    settings::set_nicer(false);
    settings::set_fatal_errors(true);
    let (mut program, errors) = parse_source(source, "macro_test.mky");
    assert!(errors.is_empty(), "parse errors: {errors:?}");

    let env = Scope::new();
    macros::define_macros(&mut program, &env);
    let mut evaluator = Evaluator::with_parts(Box::new(NullOutput), Box::new(EmptyInput), Box::new(MapLoader::new()));
    let expanded = macros::expand_macros(&mut evaluator, program, &env).expect("expansion should succeed");
    expanded.to_string()
}

#[test]
fn quote_reifies_its_argument() {
    settings::set_nicer(false);
    let value = run("quote(5 + 8)");
    let Value::Quote(node) = value else {
        panic!("expected quote, got {value:?}");
    };
    assert_eq!(node.to_string(), "(5 + 8)");
}

#[test]
fn quote_does_not_evaluate() {
    settings::set_nicer(false);
    let value = run("quote(foobar + barfoo)");
    let Value::Quote(node) = value else {
        panic!("expected quote, got {value:?}");
    };
    assert_eq!(node.to_string(), "(foobar + barfoo)");
}

#[test]
fn unquote_evaluates_inside_quote() {
    settings::set_nicer(false);
    let cases = [
        ("quote(unquote(4))", "4"),
        ("quote(unquote(4 + 4))", "8"),
        ("quote(8 + unquote(4 + 4))", "(8 + 8)"),
        ("quote(unquote(4 + 4) + 8)", "(8 + 8)"),
        ("let foobar = 8\nquote(unquote(foobar))", "8"),
        ("quote(unquote(true))", "true"),
        ("quote(unquote(true == false))", "false"),
        ("quote(unquote(quote(4 + 4)))", "(4 + 4)"),
        (
            "let quotedInfixExpression = quote(4 + 4)\nquote(unquote(4 + 4) + unquote(quotedInfixExpression))",
            "(8 + (4 + 4))",
        ),
    ];
    for (input, expected) in cases {
        let value = run(input);
        let Value::Quote(node) = value else {
            panic!("expected quote for {input}, got {value:?}");
        };
        assert_eq!(node.to_string(), expected, "input: {input}");
    }
}

#[test]
fn unquoted_strings_embed_as_null() {
    settings::set_nicer(false);
    let value = run("quote(unquote(\"text\"))");
    let Value::Quote(node) = value else {
        panic!("expected quote, got {value:?}");
    };
    assert_eq!(node.to_string(), "null");
}

#[test]
fn macro_definitions_are_collected_and_removed() {
    let source = "let number = 1\nlet function = fn(x, y) { x + y }\nlet mymacro = macro(x, y) { x + y }";
    let (mut program, errors) = parse_source(source, "macro_test.mky");
    assert!(errors.is_empty());

    let env = Scope::new();
    macros::define_macros(&mut program, &env);

    assert_eq!(program.statements.len(), 2);
    assert!(env.get("number").is_none(), "only macros get stored in the pass");
    assert!(env.get("function").is_none());
    assert!(matches!(env.get("mymacro"), Some(Value::Macro(_))));
}

#[test]
fn unless_macro_expands_to_an_inverted_if() {
    let source = "let unless = macro(c, a, b) { quote(if (!(unquote(c))) { unquote(a) } else { unquote(b) }) }\nunless(10 > 5, write(\"not\"), write(\"greater\"))";
    assert_eq!(
        expand(source),
        "[if (!(10 > 5)) { write(\"not\") } else { write(\"greater\") }]"
    );
}

#[test]
fn infix_macro_arguments_substitute_unevaluated() {
    let source = "let reverse = macro(a, b) { quote(unquote(b) - unquote(a)) }\nreverse(2 + 2, 10 - 5)";
    assert_eq!(expand(source), "[((10 - 5) - (2 + 2))]");
}

#[test]
fn expanded_unless_runs_the_right_branch() {
    settings::set_fatal_errors(true);
    let out = CollectStringOutput::new();
    let buffer = out.buffer();
    let mut interpreter = Interpreter::with_parts(Box::new(out), Box::new(EmptyInput), Box::new(MapLoader::new()));
    let source = "let unless = macro(c, a, b) { quote(if (!(unquote(c))) { unquote(a) } else { unquote(b) }) }\nunless(10 > 5, write(\"not\"), write(\"greater\"))";
    interpreter.run(source, "macro_test.mky").expect("source should parse");
    assert_eq!(buffer.borrow().as_str(), "greater");
}

#[test]
fn macros_must_return_quotes() {
    assert!(matches!(
        run("let m = macro() { 1 }\nm()"),
        Value::Error(error) if error.message == "Only support returning ast node from macros"
    ));
}

#[test]
fn macro_statements_do_not_survive_to_runtime() {
    let (mut program, _) = parse_source("let m = macro(x) { quote(unquote(x)) }\n1", "macro_test.mky");
    let env = Scope::new();
    macros::define_macros(&mut program, &env);
    assert!(
        !program
            .statements
            .iter()
            .any(|statement| matches!(statement, Statement::Let { .. })),
    );
}
