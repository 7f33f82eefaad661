//! Per-kind method tables behind `.` dispatch.
//!
//! The registry is built once at startup; adding a method means adding a
//! `BuiltinFunction` variant, its implementation here, and one `method`
//! entry below. The evaluator binds the receiver as `this` in the call
//! environment before invoking, which is where every implementation reads
//! it back from.

use std::sync::LazyLock;

use ahash::AHashMap;

use crate::{
    args::{ArgParser, ArgSlot},
    builtins::{Builtin, BuiltinFunction, this_value},
    env::Scope,
    token::Token,
    value::{Kind, Value},
};

static REGISTRY: LazyLock<AHashMap<Kind, AHashMap<&'static str, Builtin>>> = LazyLock::new(|| {
    use BuiltinFunction as B;
    let mut registry = AHashMap::new();

    registry.insert(
        Kind::Integer,
        AHashMap::from_iter([("double", Builtin::method(B::IntDouble, 0, false, true))]),
    );
    registry.insert(
        Kind::Str,
        AHashMap::from_iter([("length", Builtin::method(B::StrLength, 0, false, true))]),
    );
    registry.insert(
        Kind::Array,
        AHashMap::from_iter([
            ("length", Builtin::method(B::ArrayLength, 0, false, true)),
            ("push", Builtin::method(B::ArrayPush, 1, true, false)),
            ("pop", Builtin::method(B::ArrayPop, 1, false, false)),
        ]),
    );
    registry.insert(
        Kind::Hash,
        AHashMap::from_iter([
            ("length", Builtin::method(B::HashLength, 0, false, true)),
            ("keys", Builtin::method(B::HashKeys, 0, false, true)),
            ("values", Builtin::method(B::HashValues, 0, false, true)),
        ]),
    );

    registry
});

/// Finds the prototype method `name` for values of `kind`.
#[must_use]
pub fn lookup(kind: Kind, name: &str) -> Option<Builtin> {
    REGISTRY.get(&kind)?.get(name).copied()
}

pub(crate) fn int_double(token: &Token, env: &Scope) -> Value {
    let this = match this_value(token, env) {
        Ok(this) => this,
        Err(error) => return error,
    };
    match this {
        Value::Integer(value) => Value::Integer(value * 2.0),
        other => Value::error(token.data.clone(), format!("`double` not supported on {}", other.kind())),
    }
}

pub(crate) fn str_length(token: &Token, env: &Scope) -> Value {
    let this = match this_value(token, env) {
        Ok(this) => this,
        Err(error) => return error,
    };
    match this {
        Value::Str(text) => Value::Integer(text.as_str().len() as f64),
        other => Value::error(token.data.clone(), format!("`length` not supported on {}", other.kind())),
    }
}

pub(crate) fn array_length(token: &Token, env: &Scope) -> Value {
    let this = match this_value(token, env) {
        Ok(this) => this,
        Err(error) => return error,
    };
    match this {
        Value::Array(elements) => Value::Integer(elements.borrow().len() as f64),
        other => Value::error(token.data.clone(), format!("`length` not supported on {}", other.kind())),
    }
}

/// Appends every argument; returns `null`.
pub(crate) fn array_push(token: &Token, env: &Scope, args: &[Value]) -> Value {
    let this = match this_value(token, env) {
        Ok(this) => this,
        Err(error) => return error,
    };
    let elements = match this {
        Value::Array(elements) => elements,
        other => return Value::error(token.data.clone(), format!("`push` not supported on {}", other.kind())),
    };

    let parser = ArgParser::new([ArgSlot::any_var_args()]);
    let parsed = match parser.parse(args) {
        Ok(parsed) => parsed,
        Err(error) => return Value::error(token.data.clone(), error.message),
    };
    elements
        .borrow_mut()
        .extend(parsed.into_iter().flatten().cloned());
    Value::Null
}

/// Removes the last `n` elements (default 1). Called without an argument
/// it returns the popped element itself, otherwise the popped array.
pub(crate) fn array_pop(token: &Token, env: &Scope, args: &[Value]) -> Value {
    let this = match this_value(token, env) {
        Ok(this) => this,
        Err(error) => return error,
    };
    let elements = match this {
        Value::Array(elements) => elements,
        other => return Value::error(token.data.clone(), format!("`pop` not supported on {}", other.kind())),
    };

    let parser = ArgParser::new([ArgSlot::optional(&[Kind::Integer])]);
    let parsed = match parser.parse(args) {
        Ok(parsed) => parsed,
        Err(error) => return Value::error(token.data.clone(), error.message),
    };
    let amount = match parsed[0] {
        Some(Value::Integer(value)) => value.trunc() as i64,
        _ => 1,
    };

    let mut elements = elements.borrow_mut();
    let length = elements.len() as i64;
    if amount < 0 || amount > length {
        return Value::error(token.data.clone(), "array index out of bounds");
    }
    let removed: Vec<Value> = elements.split_off((length - amount) as usize);
    drop(elements);

    if args.is_empty() {
        removed.into_iter().next().unwrap_or(Value::Null)
    } else {
        Value::array(removed)
    }
}

pub(crate) fn hash_length(token: &Token, env: &Scope) -> Value {
    let this = match this_value(token, env) {
        Ok(this) => this,
        Err(error) => return error,
    };
    match this {
        Value::Hash(storage) => Value::Integer(storage.borrow().len() as f64),
        other => Value::error(token.data.clone(), format!("`length` not supported on {}", other.kind())),
    }
}

pub(crate) fn hash_keys(token: &Token, env: &Scope) -> Value {
    let this = match this_value(token, env) {
        Ok(this) => this,
        Err(error) => return error,
    };
    match this {
        Value::Hash(storage) => {
            let keys = storage.borrow().values().map(|pair| pair.key.clone()).collect();
            Value::array(keys)
        }
        other => Value::error(token.data.clone(), format!("`keys` not supported on {}", other.kind())),
    }
}

pub(crate) fn hash_values(token: &Token, env: &Scope) -> Value {
    let this = match this_value(token, env) {
        Ok(this) => this,
        Err(error) => return error,
    };
    match this {
        Value::Hash(storage) => {
            let values = storage.borrow().values().map(|pair| pair.value.clone()).collect();
            Value::array(values)
        }
        other => Value::error(token.data.clone(), format!("`values` not supported on {}", other.kind())),
    }
}
