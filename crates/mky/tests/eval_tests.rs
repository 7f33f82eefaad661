//! End-to-end evaluator tests: arithmetic, control flow, closures,
//! indexing, aggregates, prototype dispatch, sentinels and error modes.

use mky::{CollectStringOutput, EmptyInput, Interpreter, MapLoader, NullOutput, QueueInput, Value, settings};

fn interpreter() -> Interpreter {
    Interpreter::with_parts(Box::new(NullOutput), Box::new(EmptyInput), Box::new(MapLoader::new()))
}

fn run(source: &str) -> Value {
    settings::set_fatal_errors(true);
    interpreter().run(source, "eval_test.mky").expect("source should parse")
}

fn run_nonfatal(source: &str) -> Value {
    settings::set_fatal_errors(false);
    let value = interpreter().run(source, "eval_test.mky").expect("source should parse");
    settings::set_fatal_errors(true);
    value
}

fn run_with_output(source: &str) -> (Value, String) {
    settings::set_fatal_errors(true);
    let out = CollectStringOutput::new();
    let buffer = out.buffer();
    let mut interpreter = Interpreter::with_parts(Box::new(out), Box::new(EmptyInput), Box::new(MapLoader::new()));
    let value = interpreter.run(source, "eval_test.mky").expect("source should parse");
    let text = buffer.borrow().clone();
    (value, text)
}

fn assert_integer(value: &Value, expected: f64) {
    match value {
        Value::Integer(actual) => {
            assert!((actual - expected).abs() < 1e-9, "got {actual}, want {expected}");
        }
        other => panic!("not an integer: {other:?}"),
    }
}

fn assert_boolean(value: &Value, expected: bool) {
    match value {
        Value::Boolean(actual) => assert_eq!(*actual, expected),
        other => panic!("not a boolean: {other:?}"),
    }
}

fn assert_null(value: &Value) {
    assert!(matches!(value, Value::Null), "not null: {value:?}");
}

fn assert_string(value: &Value, expected: &str) {
    match value {
        Value::Str(actual) => assert_eq!(actual.as_str(), expected),
        other => panic!("not a string: {other:?}"),
    }
}

fn assert_error(value: &Value, expected: &str) {
    match value {
        Value::Error(actual) => assert_eq!(actual.message, expected),
        other => panic!("not an error: {other:?}"),
    }
}

#[test]
fn integer_arithmetic() {
    let cases = [
        ("5", 5.0),
        ("-10", -10.0),
        ("+5", 5.0),
        ("-10.5", -10.5),
        ("1.5 + 2.5", 4.0),
        ("3.2 * 3", 9.6),
        ("4 / 2.0", 2.0),
        ("5.0 % 2.0", 1.0),
        ("7 % 3", 1.0),
        ("5 + 5 + 5 + 5 - 10", 10.0),
        ("2 * 2 * 2 * 2 * 2", 32.0),
        ("-50 + 100 + -50", 0.0),
        ("5 * 2 + 10", 20.0),
        ("5 + 2 * 10", 25.0),
        ("20 + 2 * -10", 0.0),
        ("50 / 2 * 2 + 10", 60.0),
        ("2 * (5 + 10)", 30.0),
        ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50.0),
    ];
    for (input, expected) in cases {
        assert_integer(&run(input), expected);
    }
}

#[test]
fn boolean_expressions() {
    let cases = [
        ("true", true),
        ("1 < 2", true),
        ("1 > 2", false),
        ("1 <= 1", true),
        ("2 >= 3", false),
        ("1 == 1", true),
        ("1 != 1", false),
        ("true == true", true),
        ("true != false", true),
        ("1 < 2 == true", true),
        // Mixed equality compares truthiness when a boolean is involved.
        ("1 == true", true),
        ("1 == false", false),
        ("0 == true", false),
        ("0 == false", true),
        ("5 == \"5\"", false),
    ];
    for (input, expected) in cases {
        assert_boolean(&run(input), expected);
    }
}

#[test]
fn bang_inverts_truthiness() {
    let cases = [
        ("!true", false),
        ("!false", true),
        ("!5", false),
        ("!0", true),
        ("!null", true),
        ("!!5", true),
        ("bool!(0) == !!(0)", true),
        ("bool!(\"\") == !!(\"\")", true),
    ];
    for (input, expected) in cases {
        assert_boolean(&run(input), expected);
    }
}

#[test]
fn if_else_chains() {
    assert_integer(&run("if true { 10 }"), 10.0);
    assert_null(&run("if false { 10 }"));
    assert_integer(&run("if 1 { 10 }"), 10.0);
    assert_null(&run("if 0 { 10 }"));
    assert_integer(&run("if (1 > 2) { 10 } else { 20 }"), 20.0);
    assert_integer(&run("if 1 > 2 { 1 } else if 1 == 2 { 20 } else { 14 }"), 14.0);
    assert_integer(&run("if 1 > 2 { 1 } else if 1 != 2 { 20 } else { 14 }"), 20.0);
}

#[test]
fn gates_short_circuit_except_xor() {
    assert_boolean(&run("1 < 2 and 2 < 3"), true);
    assert_boolean(&run("false and missing()"), false);
    assert_boolean(&run("true or missing()"), true);
    assert_boolean(&run("0 or 3"), true);
    assert_boolean(&run("true !| true"), false);
    assert_boolean(&run("true xor 0"), true);
    // xor evaluates both sides.
    assert_error(&run("false xor missing()"), "identifier not found: missing");
}

#[test]
fn let_bindings_and_lookup() {
    assert_integer(&run("let a = 5\na"), 5.0);
    assert_integer(&run("let a = 5 * 5\na"), 25.0);
    assert_integer(&run("let a = 5\nlet b = a\nlet c = a + b + 5\nc"), 15.0);
    assert_null(&run("let a"));
}

#[test]
fn assignment_updates_existing_bindings() {
    assert_integer(&run("let a = 1\na = 2\na"), 2.0);
    assert_integer(&run("let a = 0\nlet b = 0\na = b = 3\na + b"), 6.0);
    assert_error(&run("b = 1"), "identifier not found: b");
}

#[test]
fn assignment_through_closures_mutates_the_defining_frame() {
    let source = "let counter = fn() {\n  let n = 0\n  fn() {\n    n = n + 1\n    n\n  }\n}\nlet inc = counter()\ninc()\ninc()\ninc()";
    assert_integer(&run(source), 3.0);
}

#[test]
fn closure_capture() {
    assert_integer(&run("let mk = fn(x) { fn(y) { x + y } }\nlet add2 = mk(2)\nadd2(3)"), 5.0);
    assert_integer(&run("let mk = fn(x) { fn(y) { x + y } }\nlet add2 = mk(2)\nadd2(4)"), 6.0);
}

#[test]
fn function_application() {
    assert_integer(&run("let identity = fn(x) { x }\nidentity(5)"), 5.0);
    assert_integer(&run("let add = fn(x, y) { x + y }\nadd(5 + 5, add(5, 5))"), 20.0);
    assert_integer(&run("fn(x) { x * 2 }(4)"), 8.0);
}

#[test]
fn function_arguments_pad_with_null_and_extras_are_ignored() {
    assert_null(&run("let f = fn(a, b) { b }\nf(1)"));
    assert_integer(&run("let f = fn(a) { a }\nf(1, 2, 3)"), 1.0);
}

#[test]
fn return_unwinds_to_the_nearest_function() {
    assert_integer(&run("let f = fn() { return 10\n5 }\nf()"), 10.0);
    assert_integer(&run("let f = fn() { if true { if true { return 9 } }\n1 }\nf()"), 9.0);
    assert_integer(&run("return 7\n5"), 7.0);
}

#[test]
fn string_operations() {
    assert_string(&run("\"foo\" + \"bar\""), "foobar");
    assert_string(&run("\"ab\" * 3"), "ababab");
    assert_boolean(&run("\"a\" == \"a\""), true);
    assert_boolean(&run("\"a\" != \"b\""), true);
    assert_error(&run("\"a\" - \"b\""), "unknown operation: STRING - STRING");
}

#[test]
fn string_indexing_is_character_based() {
    assert_string(&run("\"hello\"[1]"), "e");
    assert_string(&run("\"hello\"[-1]"), "o");
    assert_string(&run("\"hello\"[1:3]"), "el");
    assert_string(&run("\"hello\"[:]"), "hello");
    assert_string(&run("\"héllo\"[1]"), "é");
    assert_error(&run("\"abc\"[5]"), "index out of range: 5");
}

#[test]
fn array_literals_and_indexing() {
    assert_integer(&run("[1, 2 * 2, 3 + 3][1]"), 4.0);
    assert_integer(&run("let xs = [1, 2, 3]\nxs[-1]"), 3.0);
    assert_boolean(&run("let xs = [1, 2, 3]\nxs[-1] == xs[__len(xs) - 1]"), true);
    assert_boolean(&run("let xs = [4, 5, 6]\nxs[1:3][0] == xs[1]"), true);
    assert_error(&run("[1, 2, 3][3]"), "index out of range: 3");
    assert_error(&run("[1][\"a\"]"), "unusable as index: STRING");
    assert_error(&run("[1, 2, 3][1:0]"), "startIndex larger than endIndex");
    assert_error(&run("5[0]"), "index operator not supported: INTEGER");
}

#[test]
fn slices_copy_but_element_assignment_mutates() {
    assert_integer(&run("let xs = [1, 2, 3]\nlet ys = xs[:]\nys[0] = 9\nxs[0]"), 1.0);
    let value = run("let a = [1, 2, 3]\na[1] = 99\na");
    let Value::Array(elements) = &value else {
        panic!("expected array, got {value:?}");
    };
    let elements = elements.borrow();
    assert_integer(&elements[1], 99.0);
    assert_integer(&run("let grid = [[1, 2], [3, 4]]\ngrid[1][0] = 99\ngrid[1][0]"), 99.0);
}

#[test]
fn arrays_have_reference_semantics() {
    assert_integer(&run("let a = [1, 2]\nlet b = a\nb.push(3)\n__len(a)"), 3.0);
}

#[test]
fn array_arithmetic_mutates_in_place() {
    let value = run("let a = [1, 2, 3]\na + [10, 20]\na");
    let Value::Array(elements) = &value else {
        panic!("expected array, got {value:?}");
    };
    let elements = elements.borrow();
    assert_integer(&elements[0], 11.0);
    assert_integer(&elements[1], 22.0);
    assert_integer(&elements[2], 3.0);
    drop(elements);

    assert_integer(&run("let a = [1, 2]\na * 10\na[0]"), 10.0);
    assert_integer(&run("let a = [1, 2]\n(a + 1)[1]"), 3.0);
}

#[test]
fn hash_literals_and_lookup() {
    assert_integer(&run("let m = { \"k\": 1 }\nm[\"k\"]"), 1.0);
    assert_null(&run("let m = { \"k\": 1 }\nm[\"missing\"]"));
    assert_string(&run("let h = {1: \"one\", true: \"yes\"}\nh[1] + h[true]"), "oneyes");
    assert_error(&run("{[1]: 2}"), "unusable as hash key: ARRAY");
    assert_error(&run("{}[[]]"), "unusable as hash key: ARRAY");
}

#[test]
fn hash_dot_access_reads_string_members() {
    assert_integer(&run("let h = { \"k\": 5 }\nh.k"), 5.0);
    assert_null(&run("let h = {}\nh.missing"));
    // Prototype methods win over members of the same name.
    assert_integer(&run("let h = { \"length\": 99 }\nh.length"), 1.0);
}

#[test]
fn prototype_methods() {
    assert_integer(&run("let x = 21\nx.double"), 42.0);
    assert_integer(&run("\"hello\".length"), 5.0);
    assert_integer(&run("[1, 2, 3].length"), 3.0);
    assert_integer(&run("let a = [1]\na.push(2, 3)\na.length"), 3.0);
    assert_integer(&run("let a = [1, 2, 3]\na.pop()"), 3.0);
    assert_boolean(
        &run("let a = [1, 2, 3]\nlet popped = a.pop(2)\npopped.length == 2 and a.length == 1"),
        true,
    );
    assert_error(&run("let a = [1]\na.pop(5)"), "array index out of bounds");
    assert_integer(&run("let h = {1: 2, 3: 4}\nh.length"), 2.0);
    assert_integer(&run("let h = {1: 2, 3: 4}\nh.keys[1]"), 3.0);
    assert_integer(&run("let h = {1: 2, 3: 4}\nh.values[0]"), 2.0);
    assert_error(&run("5.missing"), "unknown operation: INTEGER.missing");
}

#[test]
fn loop_builtin_consumes_break() {
    assert_integer(&run("let n = 0\n__loop(fn(t) { if t == 5 { break }\nn = n + 1 })\nn"), 5.0);
    assert_integer(&run("let n = 0\n__loop() fn(t) { if t == 2 { break }\nn = n + 1 }\nn"), 2.0);
}

#[test]
fn while_builtin_reevaluates_its_condition() {
    assert_integer(&run("let i = 0\n__while(fn() { i < 4 }, fn() { i = i + 1 })\ni"), 4.0);
    assert_integer(
        &run("let i = 0\n__while(fn() { true }, fn() { i = i + 1\nif i == 3 { break } })\ni"),
        3.0,
    );
}

#[test]
fn modules_are_isolated_namespaces() {
    assert_integer(&run("let m = module { let x = 5\nlet get = fn() { x } }\nm.x + m.get()"), 10.0);
    assert_error(&run("let m = module { let x = 5 }\nx"), "identifier not found: x");
    assert_error(&run("let m = module { let x = 5 }\nm.y"), "identifier not found: y");
}

#[test]
fn fatal_errors_abort_evaluation() {
    assert_error(&run("5 + true"), "type mismatch: INTEGER + BOOLEAN");
    assert_error(&run("5 + true\n5"), "type mismatch: INTEGER + BOOLEAN");
    assert_error(&run("true + false"), "unknown operation: BOOLEAN + BOOLEAN");
    assert_error(&run("-true"), "unknown operation: -BOOLEAN");
    assert_error(&run("foobar"), "identifier not found: foobar");
    assert_error(&run("let x = 5\nx()"), "not a function: INTEGER");
    assert_error(&run("let a = [1, 2]\na[:] = 5"), "invalid assignment target");
}

#[test]
fn nonfatal_mode_treats_errors_as_values() {
    assert_boolean(&run_nonfatal("error?(5 + true)"), true);
    assert_boolean(&run_nonfatal("error?(5)"), false);
    assert_string(&run_nonfatal("string(5 + true)"), "type mismatch: INTEGER + BOOLEAN");
    // The program keeps going past the failure.
    assert_integer(&run_nonfatal("let x = 5 + true\n42"), 42.0);
    // panic! aborts even in non-fatal mode.
    assert_error(&run_nonfatal("panic!(\"boom\")\n42"), "boom");
}

#[test]
fn check_builtins() {
    assert_boolean(&run("null?(null)"), true);
    assert_boolean(&run("null?(0)"), false);
    assert_boolean(&run("error?(5)"), false);
}

#[test]
fn cast_builtins() {
    assert_string(&run("typeof(1)"), "INTEGER");
    assert_string(&run("typeof(\"s\")"), "STRING");
    assert_string(&run("typeof([])"), "ARRAY");
    assert_string(&run("typeof({})"), "HASH");
    assert_string(&run("typeof(null)"), "NULL");
    assert_integer(&run("number!(\"12.5\")"), 12.5);
    assert_integer(&run("number!(true)"), 1.0);
    assert_integer(&run("number!(7)"), 7.0);
    assert_error(&run("number!(\"abc\")"), "casting to number not successful. got=abc");
    assert_string(&run("string(12.5)"), "12.5");
    assert_string(&run("string(null)"), "null");
}

#[test]
fn collection_builtins() {
    assert_integer(&run("__len(\"hello\")"), 5.0);
    assert_integer(&run("__len([1, 2, 3])"), 3.0);
    assert_integer(&run("__len({1: 2})"), 1.0);
    assert_error(&run("__len(5)"), "argument to `__len` not supported. got INTEGER");
    assert_integer(&run("__len(__keys({1: 2, 3: 4}))"), 2.0);
    assert_integer(&run("let h = {}\n__set(h, \"k\", 5)\nh[\"k\"]"), 5.0);
    assert_integer(&run("let a = [1, 2]\n__set(a, -1, 9)\na[1]"), 9.0);
    assert_integer(&run("let a = [1]\npush(a, 2, 3)\n__len(a)"), 3.0);
    assert_boolean(&run("let a = [1]\nlet r = append(a, 2)\nnull?(r) and __len(a) == 2"), true);
}

#[test]
fn range_builtin() {
    assert_integer(&run("__len(range(5))"), 5.0);
    assert_integer(&run("range(5)[0]"), 0.0);
    assert_integer(&run("range(2, 5)[0]"), 2.0);
    assert_integer(&run("__len(range(2, 5))"), 3.0);
    assert_integer(&run("range(5, 0, -2)[1]"), 3.0);
    assert_error(&run("range(1, 5, 0)"), "prohibited value: range step must not be zero");
}

#[test]
fn format_builtin() {
    assert_string(&run("__format(\"{} + {} = {}\", 1, 2, 3)"), "1 + 2 = 3");
    assert_string(&run("__format(\"no placeholders\", 9)"), "no placeholders");
    assert_string(&run("__format(\"{} and {}\", 1)"), "1 and ");
}

#[test]
fn write_builtins_join_with_spaces() {
    let (_, output) = run_with_output("write(1, \"a\")\nwriteLine(2)");
    assert_eq!(output, "1 a2\n");
}

#[test]
fn print_statements_echo_their_value() {
    let (value, output) = run_with_output("5 + 5;");
    assert_integer(&value, 10.0);
    assert_eq!(output, "10\n");

    let (_, quiet) = run_with_output("5 + 5");
    assert_eq!(quiet, "");
}

#[test]
fn take_reads_queued_input() {
    settings::set_fatal_errors(true);
    let out = CollectStringOutput::new();
    let buffer = out.buffer();
    let mut interpreter = Interpreter::with_parts(
        Box::new(out),
        Box::new(QueueInput::new(["hello"])),
        Box::new(MapLoader::new()),
    );
    let value = interpreter.run("take(\"name\")", "eval_test.mky").expect("source should parse");
    assert_string(&value, "hello");
    assert_eq!(buffer.borrow().as_str(), "name> ");
}

#[test]
fn exact_arity_builtins_reject_extra_arguments() {
    let one_arg_cases = [
        "typeof(1, 2)",
        "__len([1], 2)",
        "__keys({}, 1)",
        "bool!(1, 2)",
        "string(1, 2)",
        "number!(1, 2)",
        "null?(1, 2)",
        "error?(1, 2)",
        "__loop(fn(t) { break }, 2)",
    ];
    for input in one_arg_cases {
        assert_error(&run(input), "wrong number of arguments. got=2, expected=1");
    }

    assert_error(&run("__set({}, 1, 2, 3)"), "wrong number of arguments. got=4, expected=3");
    assert_error(
        &run("__while(fn() { false }, fn() { 1 }, 3)"),
        "wrong number of arguments. got=3, expected=2",
    );
}

#[test]
fn take_rejects_more_than_one_argument() {
    assert_error(&run("take(\"a\", \"b\")"), "wrong number of arguments. got=2, expected=0/1");
    assert_error(&run("takeLine(\"a\", \"b\")"), "wrong number of arguments. got=2, expected=0/1");
}

#[test]
fn numbers_display_without_trailing_zeros() {
    let (_, output) = run_with_output("writeLine(1.50)\nwriteLine(3.0)\nwriteLine(0.25)");
    assert_eq!(output, "1.5\n3\n0.25\n");
}

#[test]
fn let_shadows_without_touching_outer_frames() {
    let source = "let x = 1\nlet f = fn() { let x = 2\nx }\nf() + x";
    assert_integer(&run(source), 3.0);
}

#[test]
fn time_builtin_returns_a_number() {
    match run("__time()") {
        Value::Integer(millis) => assert!(millis > 0.0),
        other => panic!("not an integer: {other:?}"),
    }
}
