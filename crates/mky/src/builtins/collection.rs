//! Collection primitives: `__len`, `__keys`, `__set`, `push`, `append`,
//! `range`.

use crate::{
    args::{ArgParser, ArgSlot},
    builtins::wrong_number_of_arguments,
    token::Token,
    value::{HashPair, Kind, Value},
};

pub(super) fn len(token: &Token, args: &[Value]) -> Value {
    if args.len() != 1 {
        return wrong_number_of_arguments(token, args.len(), "1");
    }
    match &args[0] {
        Value::Str(text) => Value::Integer(text.as_str().len() as f64),
        Value::Array(elements) => Value::Integer(elements.borrow().len() as f64),
        Value::Hash(storage) => Value::Integer(storage.borrow().len() as f64),
        other => Value::error(
            token.data.clone(),
            format!("argument to `__len` not supported. got {}", other.kind()),
        ),
    }
}

pub(super) fn keys(token: &Token, args: &[Value]) -> Value {
    if args.len() != 1 {
        return wrong_number_of_arguments(token, args.len(), "1");
    }
    match &args[0] {
        Value::Hash(storage) => {
            let keys = storage.borrow().values().map(|pair| pair.key.clone()).collect();
            Value::array(keys)
        }
        other => Value::error(
            token.data.clone(),
            format!("argument to `__keys` not supported. got {}", other.kind()),
        ),
    }
}

/// `__set(collection, key, value)`, the primitive behind index assignment.
pub(super) fn set(token: &Token, args: &[Value]) -> Value {
    if args.len() != 3 {
        return wrong_number_of_arguments(token, args.len(), "3");
    }
    match (&args[0], &args[1]) {
        (Value::Array(elements), Value::Integer(index)) => {
            let mut elements = elements.borrow_mut();
            let length = elements.len() as i64;
            let mut position = index.trunc() as i64;
            if position < 0 {
                position += length;
            }
            if position < 0 || position >= length {
                return Value::error(token.data.clone(), format!("index out of range: {index}"));
            }
            elements[position as usize] = args[2].clone();
            Value::Null
        }
        (Value::Array(_), other) => Value::error(token.data.clone(), format!("unusable as index: {}", other.kind())),
        (Value::Hash(storage), key) => {
            let Some(hash_key) = key.hash_key() else {
                return Value::error(token.data.clone(), format!("unusable as hash key: {}", key.kind()));
            };
            storage.borrow_mut().insert(
                hash_key,
                HashPair {
                    key: key.clone(),
                    value: args[2].clone(),
                },
            );
            Value::Null
        }
        (other, _) => Value::error(
            token.data.clone(),
            format!("argument to `__set` not supported. got {}", other.kind()),
        ),
    }
}

pub(super) fn push(token: &Token, args: &[Value]) -> Value {
    append_values(token, args, "push")
}

/// `append` mutates the array in place and returns `null`, same as `push`.
pub(super) fn append(token: &Token, args: &[Value]) -> Value {
    append_values(token, args, "append")
}

fn append_values(token: &Token, args: &[Value], name: &str) -> Value {
    let Some((target, rest)) = args.split_first() else {
        return wrong_number_of_arguments(token, 0, "1+");
    };
    match target {
        Value::Array(elements) => {
            elements.borrow_mut().extend(rest.iter().cloned());
            Value::Null
        }
        other => Value::error(
            token.data.clone(),
            format!("argument to `{name}` not supported. got {}", other.kind()),
        ),
    }
}

/// `range(end)`, `range(start, end)` or `range(start, end, step)`.
pub(super) fn range(token: &Token, args: &[Value]) -> Value {
    let parser = ArgParser::new([
        ArgSlot::required(&[Kind::Integer]),
        ArgSlot::optional(&[Kind::Integer]),
        ArgSlot::optional(&[Kind::Integer]),
    ]);
    let parsed = match parser.parse(args) {
        Ok(parsed) => parsed,
        Err(error) => return Value::error(token.data.clone(), error.message),
    };

    let first = match parsed[0] {
        Some(Value::Integer(value)) => *value,
        _ => unreachable!("slot is declared INTEGER"),
    };
    let second = parsed.get(1).and_then(|slot| match slot {
        Some(Value::Integer(value)) => Some(*value),
        _ => None,
    });
    let step = parsed.get(2).and_then(|slot| match slot {
        Some(Value::Integer(value)) => Some(*value),
        _ => None,
    });

    let (start, end) = match second {
        Some(end) => (first, end),
        None => (0.0, first),
    };
    let step = step.unwrap_or(1.0);
    if step == 0.0 {
        return Value::error(token.data.clone(), "prohibited value: range step must not be zero");
    }

    let mut values = Vec::new();
    let mut current = start;
    if step > 0.0 {
        while current < end {
            values.push(Value::Integer(current));
            current += step;
        }
    } else {
        while current > end {
            values.push(Value::Integer(current));
            current += step;
        }
    }
    Value::array(values)
}
