//! The compile-time macro pre-pass, run after parsing and before
//! evaluation.
//!
//! The definition pass collects `let name = macro(…) { … }` statements
//! into the environment and removes them from the program; the expansion
//! pass rewrites every call of a defined macro with the quote its body
//! evaluates to.

use std::rc::Rc;

use crate::{
    ast::{Expression, Program},
    env::Scope,
    eval::Evaluator,
    modify,
    value::{MacroValue, Value},
};

/// Collects macro definitions into `env` and strips them from `program`.
pub fn define_macros(program: &mut Program, env: &Scope) {
    program.statements.retain(|statement| {
        let crate::ast::Statement::Let { name, value, .. } = statement else {
            return true;
        };
        let Expression::MacroLit { parameters, body, .. } = value else {
            return true;
        };
        env.store(
            name.value.clone(),
            Value::Macro(Rc::new(MacroValue {
                parameters: parameters.clone(),
                body: body.clone(),
                env: env.clone(),
            })),
        );
        false
    });
}

/// Expands every call of a macro defined in `env`.
///
/// Each argument expression is wrapped in a quote and bound to the macro's
/// parameter; the body then runs at expansion time and must itself produce
/// a quote, whose node replaces the call site.
pub fn expand_macros(ev: &mut Evaluator, program: Program, env: &Scope) -> Result<Program, Value> {
    let mut failure: Option<Value> = None;

    let expanded = modify::modify_program(program, &mut |node| {
        if failure.is_some() {
            return node;
        }
        let Expression::Call {
            token,
            function,
            arguments,
        } = &node
        else {
            return node;
        };
        let Expression::Identifier(name) = function.as_ref() else {
            return node;
        };
        let Some(Value::Macro(macro_value)) = env.get(&name.value) else {
            return node;
        };

        let macro_env = macro_value.env.enclose();
        for (index, parameter) in macro_value.parameters.iter().enumerate() {
            let argument = arguments.get(index).cloned().unwrap_or(Expression::Null {
                token: token.clone(),
            });
            macro_env.store(parameter.value.clone(), Value::Quote(Rc::new(argument)));
        }

        let evaluated = match ev.eval_block(&macro_value.body, &macro_env) {
            Value::Return(inner) => *inner,
            other => other,
        };
        match evaluated {
            Value::Quote(quoted) => (*quoted).clone(),
            _ => {
                failure = Some(Value::fatal_error(
                    token.data.clone(),
                    "Only support returning ast node from macros",
                ));
                node
            }
        }
    });

    match failure {
        Some(error) => Err(error),
        None => Ok(expanded),
    }
}
