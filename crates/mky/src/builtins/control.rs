//! Looping primitives and `panic!`.
//!
//! `__loop` and `__while` are the only places that consume the `Break`
//! sentinel; everything between the `break` expression and the loop lets
//! it bubble through untouched.

use crate::{
    builtins::wrong_number_of_arguments,
    env::Scope,
    eval::Evaluator,
    token::Token,
    value::Value,
};

/// `__loop(fn(t) { … })` calls the body with the iteration count until
/// the body breaks or a fatal error escapes.
pub(super) fn loop_builtin(ev: &mut Evaluator, token: &Token, env: &Scope, args: &[Value]) -> Value {
    if args.len() != 1 {
        return wrong_number_of_arguments(token, args.len(), "1");
    }
    let body = &args[0];
    if !matches!(body, Value::Function(_) | Value::Builtin(_)) {
        return Value::error(token.data.clone(), format!("not a function: {}", body.kind()));
    }

    let mut iteration = 0.0;
    loop {
        let result = ev.apply_function(token, body.clone(), vec![Value::Integer(iteration)], env);
        if matches!(result, Value::Break) {
            return Value::Null;
        }
        if result.is_aborting() {
            return result;
        }
        iteration += 1.0;
    }
}

/// `__while(fn() { cond }, fn() { body })` re-evaluates the condition
/// callable before every pass.
pub(super) fn while_builtin(ev: &mut Evaluator, token: &Token, env: &Scope, args: &[Value]) -> Value {
    if args.len() != 2 {
        return wrong_number_of_arguments(token, args.len(), "2");
    }
    for callable in &args[..2] {
        if !matches!(callable, Value::Function(_) | Value::Builtin(_)) {
            return Value::error(token.data.clone(), format!("not a function: {}", callable.kind()));
        }
    }

    loop {
        let condition = ev.apply_function(token, args[0].clone(), Vec::new(), env);
        if condition.is_aborting() {
            return condition;
        }
        if !condition.is_truthy() {
            return Value::Null;
        }

        let result = ev.apply_function(token, args[1].clone(), Vec::new(), env);
        if matches!(result, Value::Break) {
            return Value::Null;
        }
        if result.is_aborting() {
            return result;
        }
    }
}

/// `panic!(message)` raises an error that aborts regardless of the
/// `fatalErrors` flag.
pub(super) fn panic_builtin(token: &Token, args: &[Value]) -> Value {
    let message = args.first().map_or_else(|| "panic!".to_owned(), Value::inspect);
    Value::fatal_error(token.data.clone(), message)
}
