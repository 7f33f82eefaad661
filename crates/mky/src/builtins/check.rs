//! Predicates over values: `null?` and `error?`.
//!
//! `error?` is the non-fatal mode's inspection tool: when errors travel
//! as values it is the only way user code can tell one apart.

use crate::{builtins::wrong_number_of_arguments, token::Token, value::Value};

pub(super) fn is_null(token: &Token, args: &[Value]) -> Value {
    if args.len() != 1 {
        return wrong_number_of_arguments(token, args.len(), "1");
    }
    Value::Boolean(matches!(args[0], Value::Null))
}

pub(super) fn is_error(token: &Token, args: &[Value]) -> Value {
    if args.len() != 1 {
        return wrong_number_of_arguments(token, args.len(), "1");
    }
    Value::Boolean(matches!(args[0], Value::Error(_)))
}
