//! Structural AST rewriting used by macro expansion and the include pass.
//!
//! The walk is depth-first: children of the fixed composite shapes are
//! rewritten before the modifier sees the parent, so a replacement returned
//! for a node never gets re-walked.

use crate::ast::{BlockStatement, Expression, Program, Statement};

pub fn modify_program(program: Program, modifier: &mut impl FnMut(Expression) -> Expression) -> Program {
    Program {
        statements: program
            .statements
            .into_iter()
            .map(|statement| modify_statement(statement, modifier))
            .collect(),
    }
}

pub fn modify_block(block: BlockStatement, modifier: &mut impl FnMut(Expression) -> Expression) -> BlockStatement {
    BlockStatement {
        token: block.token,
        statements: block
            .statements
            .into_iter()
            .map(|statement| modify_statement(statement, modifier))
            .collect(),
    }
}

pub fn modify_statement(statement: Statement, modifier: &mut impl FnMut(Expression) -> Expression) -> Statement {
    match statement {
        Statement::Let { token, name, value } => Statement::Let {
            token,
            name,
            value: modify_expression(value, modifier),
        },
        Statement::Return { token, value } => Statement::Return {
            token,
            value: value.map(|value| modify_expression(value, modifier)),
        },
        Statement::Expression { token, expression } => Statement::Expression {
            token,
            expression: modify_expression(expression, modifier),
        },
        Statement::Print { token, expression } => Statement::Print {
            token,
            expression: modify_expression(expression, modifier),
        },
        Statement::Block(block) => Statement::Block(modify_block(block, modifier)),
    }
}

pub fn modify_expression(expression: Expression, modifier: &mut impl FnMut(Expression) -> Expression) -> Expression {
    let expression = match expression {
        Expression::Prefix { token, operator, right } => Expression::Prefix {
            token,
            operator,
            right: Box::new(modify_expression(*right, modifier)),
        },
        Expression::Infix {
            token,
            operator,
            left,
            right,
        } => Expression::Infix {
            token,
            operator,
            left: Box::new(modify_expression(*left, modifier)),
            right: Box::new(modify_expression(*right, modifier)),
        },
        Expression::If {
            token,
            condition,
            consequence,
            alternative,
        } => Expression::If {
            token,
            condition: Box::new(modify_expression(*condition, modifier)),
            consequence: modify_block(consequence, modifier),
            alternative: alternative.map(|block| modify_block(block, modifier)),
        },
        Expression::Function { token, parameters, body } => Expression::Function {
            token,
            parameters,
            body: modify_block(body, modifier),
        },
        Expression::Call {
            token,
            function,
            arguments,
        } => Expression::Call {
            token,
            function: Box::new(modify_expression(*function, modifier)),
            arguments: arguments
                .into_iter()
                .map(|argument| modify_expression(argument, modifier))
                .collect(),
        },
        Expression::Array { token, elements } => Expression::Array {
            token,
            elements: elements
                .into_iter()
                .map(|element| modify_expression(element, modifier))
                .collect(),
        },
        Expression::HashLiteral { token, pairs } => Expression::HashLiteral {
            token,
            pairs: pairs
                .into_iter()
                .map(|(key, value)| (modify_expression(key, modifier), modify_expression(value, modifier)))
                .collect(),
        },
        Expression::Index {
            token,
            left,
            start,
            end,
            has_range,
        } => Expression::Index {
            token,
            left: Box::new(modify_expression(*left, modifier)),
            start: start.map(|start| Box::new(modify_expression(*start, modifier))),
            end: end.map(|end| Box::new(modify_expression(*end, modifier))),
            has_range,
        },
        Expression::Module { token, body } => Expression::Module {
            token,
            body: modify_block(body, modifier),
        },
        Expression::MacroLit { token, parameters, body } => Expression::MacroLit {
            token,
            parameters,
            body: modify_block(body, modifier),
        },
        leaf => leaf,
    };
    modifier(expression)
}
