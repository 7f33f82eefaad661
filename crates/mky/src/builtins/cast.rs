//! Conversions: `typeof`, `bool!`, `string`, `number!`.

use crate::{builtins::wrong_number_of_arguments, token::Token, value::Value};

pub(super) fn type_of(token: &Token, args: &[Value]) -> Value {
    if args.len() != 1 {
        return wrong_number_of_arguments(token, args.len(), "1");
    }
    Value::string(args[0].kind().to_string())
}

pub(super) fn to_bool(token: &Token, args: &[Value]) -> Value {
    if args.len() != 1 {
        return wrong_number_of_arguments(token, args.len(), "1");
    }
    match &args[0] {
        value @ Value::Boolean(_) => value.clone(),
        value => Value::Boolean(value.is_truthy()),
    }
}

/// `string` renders any value; an error value renders as its message so
/// non-fatal code can read failures.
pub(super) fn as_string(token: &Token, args: &[Value]) -> Value {
    if args.len() != 1 {
        return wrong_number_of_arguments(token, args.len(), "1");
    }
    match &args[0] {
        Value::Error(error) => Value::string(error.message.clone()),
        value @ Value::Str(_) => value.clone(),
        value => Value::string(value.inspect()),
    }
}

pub(super) fn to_number(token: &Token, args: &[Value]) -> Value {
    if args.len() != 1 {
        return wrong_number_of_arguments(token, args.len(), "1");
    }
    match &args[0] {
        value @ Value::Integer(_) => value.clone(),
        Value::Boolean(value) => Value::Integer(if *value { 1.0 } else { 0.0 }),
        Value::Str(text) => match text.as_str().trim().parse::<f64>() {
            Ok(value) => Value::Integer(value),
            Err(_) => Value::error(
                token.data.clone(),
                format!("casting to number not successful. got={}", text.as_str()),
            ),
        },
        other => Value::error(
            token.data.clone(),
            format!("argument to `number!` not supported. got {}", other.kind()),
        ),
    }
}
