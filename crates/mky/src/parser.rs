//! Pratt parser: token stream in, `Program` out.
//!
//! Every token kind gets a precedence level and optional prefix/infix
//! handling; dispatch is a match on the kind rather than registered
//! handler maps so the compiler checks coverage. Errors are collected
//! rather than aborting the parse, which means subtrees past a failure
//! may be dropped.

use crate::{
    ast::{BlockStatement, Expression, Identifier, Program, Statement},
    diagnostics::ParseError,
    lexer::Lexer,
    token::{Token, TokenData, TokenKind},
};

/// Binding strength, lowest first. `Dot` binds the tightest so member
/// access wins over calls and indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Assign,
    Gate,
    Equal,
    Compare,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
    Dot,
}

fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Assign => Precedence::Assign,
        TokenKind::And | TokenKind::Or | TokenKind::Xor => Precedence::Gate,
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equal,
        TokenKind::Lt | TokenKind::Gt | TokenKind::Le | TokenKind::Ge => Precedence::Compare,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk | TokenKind::Slash | TokenKind::Percent => Precedence::Product,
        TokenKind::Lparen => Precedence::Call,
        TokenKind::Lbracket => Precedence::Index,
        TokenKind::Dot => Precedence::Dot,
        _ => Precedence::Lowest,
    }
}

pub struct Parser {
    lexer: Lexer,
    current: Token,
    peek: Token,
    errors: Vec<ParseError>,
}

/// Parses `source` in one call, returning the program and any diagnostics.
#[must_use]
pub fn parse_source(source: &str, filename: &str) -> (Program, Vec<ParseError>) {
    let mut parser = Parser::new(Lexer::new(source, filename));
    let program = parser.parse_program();
    (program, parser.into_errors())
}

impl Parser {
    #[must_use]
    pub fn new(lexer: Lexer) -> Self {
        let placeholder = Token::new(TokenKind::Eof, "", TokenData::new("".into(), 0, 0));
        let mut parser = Self {
            lexer,
            current: placeholder.clone(),
            peek: placeholder,
            errors: Vec::new(),
        };
        // Fill both current and peek.
        parser.next_token();
        parser.next_token();
        parser
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    fn next_token(&mut self) {
        self.current = std::mem::replace(&mut self.peek, self.lexer.next_token());
    }

    fn current_is(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    fn peek_precedence(&self) -> Precedence {
        precedence_of(self.peek.kind)
    }

    fn current_precedence(&self) -> Precedence {
        precedence_of(self.current.kind)
    }

    /// Advances when the peek token matches, otherwise records an error.
    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(kind) {
            self.next_token();
            true
        } else {
            self.errors.push(ParseError::error(
                format!("expected next token to be {kind}, got {} instead", self.peek.kind),
                self.peek.data.clone(),
            ));
            false
        }
    }

    fn skip_peek_newlines(&mut self) {
        while self.peek_is(TokenKind::Newline) {
            self.next_token();
        }
    }

    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();
        while !self.current_is(TokenKind::Eof) {
            if self.current_is(TokenKind::Newline) {
                self.next_token();
                continue;
            }
            if let Some(statement) = self.parse_statement() {
                program.statements.push(statement);
            }
            self.next_token();
        }
        program
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    /// `let IDENT [= EXPR]`. A missing initializer binds `null`.
    fn parse_let_statement(&mut self) -> Option<Statement> {
        let token = self.current.clone();
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = Identifier {
            token: self.current.clone(),
            value: self.current.literal.clone(),
        };

        let value = if self.peek_is(TokenKind::Assign) {
            self.next_token();
            self.next_token();
            self.parse_expression(Precedence::Lowest)?
        } else {
            Expression::Null {
                token: Token::new(TokenKind::Null, "null", name.token.data.clone()),
            }
        };

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }
        Some(Statement::Let { token, name, value })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        let token = self.current.clone();
        let value = if matches!(
            self.peek.kind,
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::Eof | TokenKind::Rbrace
        ) {
            None
        } else {
            self.next_token();
            Some(self.parse_expression(Precedence::Lowest)?)
        };

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }
        Some(Statement::Return { token, value })
    }

    /// A trailing `;` turns the statement into a print statement; a bare
    /// expression must end at a newline, `}` or end of input, anything else
    /// is recorded as a warning.
    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let token = self.current.clone();
        let expression = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
            return Some(Statement::Print { token, expression });
        }
        if !matches!(
            self.peek.kind,
            TokenKind::Newline | TokenKind::Eof | TokenKind::Rbrace
        ) {
            self.errors.push(ParseError::warning(
                format!("expected newline or `;` after expression, got {} instead", self.peek.kind),
                self.peek.data.clone(),
            ));
        }
        Some(Statement::Expression { token, expression })
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;

        while !self.peek_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            self.next_token();
            left = self.parse_infix(left)?;
        }
        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.current.kind {
            TokenKind::Ident => Some(Expression::Identifier(Identifier {
                token: self.current.clone(),
                value: self.current.literal.clone(),
            })),
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::Str => Some(Expression::Str {
                token: self.current.clone(),
                value: self.current.literal.clone(),
            }),
            TokenKind::True | TokenKind::False => Some(Expression::Boolean {
                token: self.current.clone(),
                value: self.current_is(TokenKind::True),
            }),
            TokenKind::Null => Some(Expression::Null {
                token: self.current.clone(),
            }),
            TokenKind::Break => Some(Expression::Break {
                token: self.current.clone(),
            }),
            // Stray gate/percent/assign tokens in prefix position still
            // parse; the evaluator rejects the resulting node.
            TokenKind::Bang
            | TokenKind::Minus
            | TokenKind::Plus
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::Xor
            | TokenKind::Percent
            | TokenKind::Assign => self.parse_prefix_expression(),
            TokenKind::Lparen => self.parse_grouped_expression(),
            TokenKind::If => self.parse_if_expression(),
            TokenKind::Function => self.parse_function_literal(),
            TokenKind::HashMark => self.parse_block_lambda(),
            TokenKind::Module => self.parse_module_expression(),
            TokenKind::Lbracket => self.parse_array_literal(),
            TokenKind::Lbrace => self.parse_hash_literal(),
            TokenKind::Macro => self.parse_macro_literal(),
            _ => {
                self.errors.push(ParseError::error(
                    format!("no prefix parse function for {} found", self.current.kind),
                    self.current.data.clone(),
                ));
                None
            }
        }
    }

    fn parse_infix(&mut self, left: Expression) -> Option<Expression> {
        match self.current.kind {
            TokenKind::Lparen => self.parse_call_expression(left),
            TokenKind::Lbracket => self.parse_index_expression(left),
            TokenKind::Dot => self.parse_dot_expression(left),
            TokenKind::Assign => self.parse_assign_expression(left),
            _ => self.parse_infix_expression(left),
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        match token.literal.parse::<f64>() {
            Ok(value) => Some(Expression::Integer { token, value }),
            Err(_) => {
                self.errors.push(ParseError::error(
                    format!("could not parse {:?} as number", token.literal),
                    token.data,
                ));
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        let operator = token.kind;
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expression::Prefix {
            token,
            operator,
            right: Box::new(right),
        })
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.current.clone();
        let operator = token.kind;
        let precedence = self.current_precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix {
            token,
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Assignment parses its right side from the bottom of the ladder, so
    /// `a = b = c` nests to the right.
    fn parse_assign_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.current.clone();
        self.next_token();
        let right = self.parse_expression(Precedence::Lowest)?;
        Some(Expression::Infix {
            token,
            operator: TokenKind::Assign,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_dot_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.current.clone();
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let right = Expression::Identifier(Identifier {
            token: self.current.clone(),
            value: self.current.literal.clone(),
        });
        Some(Expression::Infix {
            token,
            operator: TokenKind::Dot,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let expression = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::Rparen) {
            return None;
        }
        Some(expression)
    }

    /// `if COND { … } [else { … } | else if …]`. The condition needs no
    /// parentheses, both branches need braces, and `else if` is lowered
    /// into an alternative block holding the nested `if`.
    fn parse_if_expression(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::Lbrace) {
            return None;
        }
        let consequence = self.parse_block_statement();

        let mut alternative = None;
        if self.peek_is(TokenKind::Else) {
            self.next_token();
            if self.peek_is(TokenKind::If) {
                self.next_token();
                let nested_token = self.current.clone();
                let nested = self.parse_if_expression()?;
                alternative = Some(BlockStatement {
                    token: nested_token.clone(),
                    statements: vec![Statement::Expression {
                        token: nested_token,
                        expression: nested,
                    }],
                });
            } else {
                if !self.expect_peek(TokenKind::Lbrace) {
                    return None;
                }
                alternative = Some(self.parse_block_statement());
            }
        }

        Some(Expression::If {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_block_statement(&mut self) -> BlockStatement {
        let token = self.current.clone();
        let mut statements = Vec::new();
        self.next_token();

        while !self.current_is(TokenKind::Rbrace) && !self.current_is(TokenKind::Eof) {
            if self.current_is(TokenKind::Newline) {
                self.next_token();
                continue;
            }
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }
        BlockStatement { token, statements }
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        if !self.expect_peek(TokenKind::Lparen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;
        if !self.expect_peek(TokenKind::Lbrace) {
            return None;
        }
        let body = self.parse_block_statement();
        Some(Expression::Function { token, parameters, body })
    }

    /// `#{ … }` is sugar for a zero-parameter function literal.
    fn parse_block_lambda(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        if !self.expect_peek(TokenKind::Lbrace) {
            return None;
        }
        let body = self.parse_block_statement();
        Some(Expression::Function {
            token,
            parameters: Vec::new(),
            body,
        })
    }

    fn parse_macro_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        if !self.expect_peek(TokenKind::Lparen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;
        if !self.expect_peek(TokenKind::Lbrace) {
            return None;
        }
        let body = self.parse_block_statement();
        Some(Expression::MacroLit { token, parameters, body })
    }

    fn parse_module_expression(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        if !self.expect_peek(TokenKind::Lbrace) {
            return None;
        }
        let body = self.parse_block_statement();
        Some(Expression::Module { token, body })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut parameters = Vec::new();
        if self.peek_is(TokenKind::Rparen) {
            self.next_token();
            return Some(parameters);
        }

        self.next_token();
        parameters.push(self.current_identifier()?);

        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            if self.peek_is(TokenKind::Rparen) {
                break;
            }
            self.next_token();
            parameters.push(self.current_identifier()?);
        }

        if !self.expect_peek(TokenKind::Rparen) {
            return None;
        }
        Some(parameters)
    }

    fn current_identifier(&mut self) -> Option<Identifier> {
        if self.current_is(TokenKind::Ident) {
            Some(Identifier {
                token: self.current.clone(),
                value: self.current.literal.clone(),
            })
        } else {
            self.errors.push(ParseError::error(
                format!("expected parameter name, got {} instead", self.current.kind),
                self.current.data.clone(),
            ));
            None
        }
    }

    /// After the closing paren a `#` or `fn` token starts one trailing
    /// block argument: `loop(10) #{ … }` reads as `loop(10, #{ … })`.
    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let token = self.current.clone();
        let mut arguments = self.parse_expression_list(TokenKind::Rparen)?;

        if self.peek_is(TokenKind::HashMark) || self.peek_is(TokenKind::Function) {
            self.next_token();
            arguments.push(self.parse_expression(Precedence::Lowest)?);
        }

        Some(Expression::Call {
            token,
            function: Box::new(function),
            arguments,
        })
    }

    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut list = Vec::new();
        self.skip_peek_newlines();
        if self.peek_is(end) {
            self.next_token();
            return Some(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.skip_peek_newlines();
            if self.peek_is(end) {
                break;
            }
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.skip_peek_newlines();
        if !self.expect_peek(end) {
            return None;
        }
        Some(list)
    }

    fn parse_array_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        let elements = self.parse_expression_list(TokenKind::Rbracket)?;
        Some(Expression::Array { token, elements })
    }

    /// `{ key: value, … }` with arbitrary expression keys. Newlines inside
    /// the braces are insignificant.
    fn parse_hash_literal(&mut self) -> Option<Expression> {
        let token = self.current.clone();
        let mut pairs = Vec::new();

        self.skip_peek_newlines();
        while !self.peek_is(TokenKind::Rbrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;
            if !self.expect_peek(TokenKind::Colon) {
                return None;
            }
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));

            self.skip_peek_newlines();
            if !self.peek_is(TokenKind::Rbrace) && !self.expect_peek(TokenKind::Comma) {
                return None;
            }
            self.skip_peek_newlines();
        }

        if !self.expect_peek(TokenKind::Rbrace) {
            return None;
        }
        Some(Expression::HashLiteral { token, pairs })
    }

    /// Inside `[]`: a bare expression is element access, a `:` makes it a
    /// range with optional endpoints.
    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.current.clone();
        let mut start = None;
        let mut end = None;
        let mut has_range = false;

        if self.peek_is(TokenKind::Colon) {
            self.next_token();
            has_range = true;
        } else {
            self.next_token();
            start = Some(Box::new(self.parse_expression(Precedence::Lowest)?));
            if self.peek_is(TokenKind::Colon) {
                self.next_token();
                has_range = true;
            }
        }

        if has_range && !self.peek_is(TokenKind::Rbracket) {
            self.next_token();
            end = Some(Box::new(self.parse_expression(Precedence::Lowest)?));
        }

        if !self.expect_peek(TokenKind::Rbracket) {
            return None;
        }
        Some(Expression::Index {
            token,
            left: Box::new(left),
            start,
            end,
            has_range,
        })
    }
}
