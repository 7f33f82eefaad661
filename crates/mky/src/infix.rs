//! The infix operator table.
//!
//! Dispatch is keyed on the left operand's kind, then the operator. A
//! handler that cannot type-match yields `None`, which falls through to
//! generic equality, and failing that to a `type mismatch` /
//! `unknown operation` error. Gate operators short-circuit in the
//! evaluator and never reach this table.

use std::rc::Rc;

use crate::{
    token::{Token, TokenKind},
    value::{StrValue, Value, value_eq},
};

/// Applies `left operator right`, producing a value or an error value.
pub fn eval_operator(token: &Token, operator: TokenKind, left: &Value, right: &Value) -> Value {
    if let Some(result) = kind_handler(token, operator, left, right) {
        return result;
    }

    match operator {
        TokenKind::Eq => Value::Boolean(value_eq(left, right)),
        TokenKind::NotEq => Value::Boolean(!value_eq(left, right)),
        _ if left.kind() != right.kind() => Value::error(
            token.data.clone(),
            format!("type mismatch: {} {} {}", left.kind(), operator, right.kind()),
        ),
        _ => Value::error(
            token.data.clone(),
            format!("unknown operation: {} {} {}", left.kind(), operator, right.kind()),
        ),
    }
}

fn kind_handler(token: &Token, operator: TokenKind, left: &Value, right: &Value) -> Option<Value> {
    match left {
        Value::Integer(value) => integer_op(operator, *value, right),
        Value::Str(text) => string_op(operator, text, right),
        Value::Array(elements) => array_op(token, operator, elements, right),
        _ => None,
    }
}

fn integer_op(operator: TokenKind, left: f64, right: &Value) -> Option<Value> {
    let Value::Integer(right) = right else {
        return None;
    };
    let right = *right;

    let result = match operator {
        TokenKind::Plus => Value::Integer(left + right),
        TokenKind::Minus => Value::Integer(left - right),
        TokenKind::Asterisk => Value::Integer(left * right),
        TokenKind::Slash => Value::Integer(left / right),
        // Modulo truncates both operands to whole numbers first.
        TokenKind::Percent => Value::Integer(left.trunc() % right.trunc()),
        TokenKind::Lt => Value::Boolean(left < right),
        TokenKind::Le => Value::Boolean(left <= right),
        TokenKind::Gt => Value::Boolean(left > right),
        TokenKind::Ge => Value::Boolean(left >= right),
        TokenKind::Eq => Value::Boolean(left == right),
        TokenKind::NotEq => Value::Boolean(left != right),
        _ => return None,
    };
    Some(result)
}

fn string_op(operator: TokenKind, left: &Rc<StrValue>, right: &Value) -> Option<Value> {
    match (operator, right) {
        (TokenKind::Plus, Value::Str(right)) => {
            let mut combined = String::with_capacity(left.as_str().len() + right.as_str().len());
            combined.push_str(left.as_str());
            combined.push_str(right.as_str());
            Some(Value::string(combined))
        }
        (TokenKind::Asterisk, Value::Integer(count)) => {
            let count = if count.is_sign_negative() { 0 } else { *count as usize };
            Some(Value::string(left.as_str().repeat(count)))
        }
        (TokenKind::Eq, Value::Str(right)) => Some(Value::Boolean(left.as_str() == right.as_str())),
        (TokenKind::NotEq, Value::Str(right)) => Some(Value::Boolean(left.as_str() != right.as_str())),
        _ => None,
    }
}

/// Array arithmetic mutates the left operand in place and returns it:
/// pairwise against another array (stopping at the shorter length) or
/// broadcast against a number.
fn array_op(
    token: &Token,
    operator: TokenKind,
    left: &Rc<std::cell::RefCell<Vec<Value>>>,
    right: &Value,
) -> Option<Value> {
    if !matches!(
        operator,
        TokenKind::Plus | TokenKind::Minus | TokenKind::Asterisk | TokenKind::Slash | TokenKind::Percent
    ) {
        return None;
    }

    match right {
        Value::Array(right_elements) => {
            // Copy the right side out first so `a + a` does not alias the
            // mutable borrow below.
            let rhs: Vec<Value> = right_elements.borrow().clone();
            let mut lhs = left.borrow_mut();
            let limit = lhs.len().min(rhs.len());
            for index in 0..limit {
                let element = lhs[index].clone();
                lhs[index] = eval_operator(token, operator, &element, &rhs[index]);
            }
            drop(lhs);
            Some(Value::Array(Rc::clone(left)))
        }
        Value::Integer(_) => {
            let mut lhs = left.borrow_mut();
            for index in 0..lhs.len() {
                let element = lhs[index].clone();
                lhs[index] = eval_operator(token, operator, &element, right);
            }
            drop(lhs);
            Some(Value::Array(Rc::clone(left)))
        }
        _ => None,
    }
}
