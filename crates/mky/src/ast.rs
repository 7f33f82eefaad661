//! AST node definitions and their two rendered forms.
//!
//! Statements and expressions are closed sum types so evaluation and the
//! macro rewriter can match exhaustively. Every node keeps the token that
//! began it for diagnostics.
//!
//! Rendering honors the `nicer` runtime flag: the default form wraps every
//! composite in parentheses (and the program in brackets) so precedence is
//! visible, the nicer form reads like source text.

use std::fmt::{self, Write as _};

use crate::{settings, token::Token};

/// Common surface shared by every AST node.
pub trait Node {
    /// The literal text of the token that began this node.
    fn token_literal(&self) -> &str;
}

/// An identifier expression, also used for function and macro parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
}

impl Node for Identifier {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// A braced statement list.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Statement>,
}

impl Node for BlockStatement {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{ ")?;
        for statement in &self.statements {
            write!(f, "{statement} ")?;
        }
        f.write_str("}")
    }
}

/// The root node: a list of top-level statements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Node for Program {
    fn token_literal(&self) -> &str {
        self.statements.first().map_or("", Node::token_literal)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if settings::nicer() {
            for (index, statement) in self.statements.iter().enumerate() {
                if index > 0 {
                    f.write_char('\n')?;
                }
                write!(f, "{statement}")?;
            }
            Ok(())
        } else {
            f.write_char('[')?;
            for statement in &self.statements {
                write!(f, "{statement}")?;
            }
            f.write_char(']')
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `let name = value`. The parser synthesizes a `null` value when the
    /// initializer is omitted.
    Let {
        token: Token,
        name: Identifier,
        value: Expression,
    },
    /// `return` with an optional value.
    Return { token: Token, value: Option<Expression> },
    /// A bare expression terminated by a newline.
    Expression { token: Token, expression: Expression },
    /// An expression terminated by `;`; the result is echoed when run.
    Print { token: Token, expression: Expression },
    Block(BlockStatement),
}

impl Node for Statement {
    fn token_literal(&self) -> &str {
        match self {
            Self::Let { token, .. } | Self::Return { token, .. } | Self::Expression { token, .. } | Self::Print { token, .. } => {
                &token.literal
            }
            Self::Block(block) => block.token_literal(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Let { name, value, .. } => {
                if settings::nicer() {
                    write!(f, "let {name} = {value};")
                } else {
                    write!(f, "(let ({name}) = ({value});)")
                }
            }
            Self::Return { value, .. } => {
                let rendered = match value {
                    Some(value) => format!("return {value};"),
                    None => "return;".to_owned(),
                };
                if settings::nicer() {
                    f.write_str(&rendered)
                } else {
                    write!(f, "({rendered})")
                }
            }
            Self::Expression { expression, .. } => write!(f, "{expression}"),
            Self::Print { expression, .. } => {
                if settings::nicer() {
                    write!(f, "{expression};")
                } else {
                    write!(f, "({expression};)")
                }
            }
            Self::Block(block) => write!(f, "{block}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    /// Numeric literal. All numbers are doubles.
    Integer { token: Token, value: f64 },
    Str { token: Token, value: String },
    Boolean { token: Token, value: bool },
    Null { token: Token },
    Break { token: Token },
    Prefix {
        token: Token,
        operator: crate::token::TokenKind,
        right: Box<Expression>,
    },
    Infix {
        token: Token,
        operator: crate::token::TokenKind,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// `if`/`else`. An `else if` chain is lowered into an alternative block
    /// holding a single nested `If` expression.
    If {
        token: Token,
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    Function {
        token: Token,
        parameters: Vec<Identifier>,
        body: BlockStatement,
    },
    Call {
        token: Token,
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
    Array { token: Token, elements: Vec<Expression> },
    HashLiteral {
        token: Token,
        pairs: Vec<(Expression, Expression)>,
    },
    /// `target[start]` or `target[start:end]` when `has_range` is set;
    /// either slice endpoint may be omitted.
    Index {
        token: Token,
        left: Box<Expression>,
        start: Option<Box<Expression>>,
        end: Option<Box<Expression>>,
        has_range: bool,
    },
    Module { token: Token, body: BlockStatement },
    MacroLit {
        token: Token,
        parameters: Vec<Identifier>,
        body: BlockStatement,
    },
}

impl Node for Expression {
    fn token_literal(&self) -> &str {
        match self {
            Self::Identifier(identifier) => identifier.token_literal(),
            Self::Integer { token, .. }
            | Self::Str { token, .. }
            | Self::Boolean { token, .. }
            | Self::Null { token }
            | Self::Break { token }
            | Self::Prefix { token, .. }
            | Self::Infix { token, .. }
            | Self::If { token, .. }
            | Self::Function { token, .. }
            | Self::Call { token, .. }
            | Self::Array { token, .. }
            | Self::HashLiteral { token, .. }
            | Self::Index { token, .. }
            | Self::Module { token, .. }
            | Self::MacroLit { token, .. } => &token.literal,
        }
    }
}

impl Expression {
    /// The token that began this expression.
    #[must_use]
    pub fn token(&self) -> &Token {
        match self {
            Self::Identifier(identifier) => &identifier.token,
            Self::Integer { token, .. }
            | Self::Str { token, .. }
            | Self::Boolean { token, .. }
            | Self::Null { token }
            | Self::Break { token }
            | Self::Prefix { token, .. }
            | Self::Infix { token, .. }
            | Self::If { token, .. }
            | Self::Function { token, .. }
            | Self::Call { token, .. }
            | Self::Array { token, .. }
            | Self::HashLiteral { token, .. }
            | Self::Index { token, .. }
            | Self::Module { token, .. }
            | Self::MacroLit { token, .. } => token,
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[impl fmt::Display], separator: &str) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(identifier) => write!(f, "{identifier}"),
            Self::Integer { token, .. } | Self::Null { token } | Self::Break { token } | Self::Boolean { token, .. } => {
                f.write_str(&token.literal)
            }
            Self::Str { value, .. } => write!(f, "\"{value}\""),
            Self::Prefix { operator, right, .. } => {
                if settings::nicer() {
                    write!(f, "{operator}{right}")
                } else {
                    write!(f, "({operator}{right})")
                }
            }
            Self::Infix { operator, left, right, .. } => {
                if settings::nicer() {
                    if *operator == crate::token::TokenKind::Dot {
                        write!(f, "{left}.{right}")
                    } else {
                        write!(f, "{left} {operator} {right}")
                    }
                } else {
                    write!(f, "({left} {operator} {right})")
                }
            }
            Self::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                write!(f, "if {condition} {consequence}")?;
                if let Some(alternative) = alternative {
                    write!(f, " else {alternative}")?;
                }
                Ok(())
            }
            Self::Function { parameters, body, .. } => {
                f.write_str("fn(")?;
                write_joined(f, parameters, ", ")?;
                write!(f, ") {body}")
            }
            Self::Call { function, arguments, .. } => {
                write!(f, "{function}(")?;
                write_joined(f, arguments, ", ")?;
                f.write_char(')')
            }
            Self::Array { elements, .. } => {
                f.write_char('[')?;
                write_joined(f, elements, ", ")?;
                f.write_char(']')
            }
            Self::HashLiteral { pairs, .. } => {
                f.write_char('{')?;
                for (index, (key, value)) in pairs.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_char('}')
            }
            Self::Index {
                left,
                start,
                end,
                has_range,
                ..
            } => {
                let open = if settings::nicer() { "" } else { "(" };
                let close = if settings::nicer() { "" } else { ")" };
                write!(f, "{open}{left}[")?;
                if let Some(start) = start {
                    write!(f, "{start}")?;
                }
                if *has_range {
                    f.write_char(':')?;
                    if let Some(end) = end {
                        write!(f, "{end}")?;
                    }
                }
                write!(f, "]{close}")
            }
            Self::Module { body, .. } => write!(f, "module {body}"),
            Self::MacroLit { parameters, body, .. } => {
                f.write_str("macro(")?;
                write_joined(f, parameters, ", ")?;
                write!(f, ") {body}")
            }
        }
    }
}
