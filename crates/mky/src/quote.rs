//! `quote` and `unquote`, the quasi-quotation half of the macro system.
//!
//! `quote(expr)` reifies `expr` as a value, but first rewrites every
//! `unquote(arg)` sub-call inside it with the AST embedding of `arg`'s
//! evaluated result. Both names are call-site special forms intercepted
//! by the evaluator, not ordinary functions.

use std::rc::Rc;

use crate::{
    ast::{Expression, Node as _},
    env::Scope,
    eval::Evaluator,
    modify,
    token::{Token, TokenKind},
    value::{Value, format_float},
};

pub(crate) fn eval_quote(ev: &mut Evaluator, call_token: &Token, arguments: &[Expression], env: &Scope) -> Value {
    if arguments.len() != 1 {
        return Value::fatal_error(
            call_token.data.clone(),
            format!("quote only takes one argument. got={}", arguments.len()),
        );
    }
    let node = eval_unquote_calls(ev, arguments[0].clone(), env);
    Value::Quote(Rc::new(node))
}

/// `unquote` outside of a quote simply evaluates its argument.
pub(crate) fn eval_unquote(ev: &mut Evaluator, call_token: &Token, arguments: &[Expression], env: &Scope) -> Value {
    if arguments.is_empty() {
        return Value::fatal_error(call_token.data.clone(), "unquote only takes one argument. got=0");
    }
    ev.eval_expression(&arguments[0], env)
}

fn eval_unquote_calls(ev: &mut Evaluator, quoted: Expression, env: &Scope) -> Expression {
    modify::modify_expression(quoted, &mut |node| {
        let Expression::Call {
            token,
            function,
            arguments,
        } = &node
        else {
            return node;
        };
        if function.token_literal() != "unquote" || arguments.len() != 1 {
            return node;
        }

        let unquoted = ev.eval_expression(&arguments[0], env);
        value_to_expression(&unquoted, token)
    })
}

/// Embeds an evaluated value back into the AST: numbers and booleans
/// become literals, quotes splice their node in, anything else is `null`.
fn value_to_expression(value: &Value, at: &Token) -> Expression {
    match value {
        Value::Integer(number) => Expression::Integer {
            token: Token::new(TokenKind::Int, format_float(*number), at.data.clone()),
            value: *number,
        },
        Value::Boolean(value) => {
            let (kind, literal) = if *value {
                (TokenKind::True, "true")
            } else {
                (TokenKind::False, "false")
            };
            Expression::Boolean {
                token: Token::new(kind, literal, at.data.clone()),
                value: *value,
            }
        }
        Value::Quote(node) => (**node).clone(),
        _ => Expression::Null {
            token: Token::new(TokenKind::Null, "null", at.data.clone()),
        },
    }
}
