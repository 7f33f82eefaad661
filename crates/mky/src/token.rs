//! Token kinds and source locations produced by the lexer.

use std::rc::Rc;

use strum::{Display, IntoStaticStr};

/// Every token kind the lexer can emit.
///
/// The strum `Display` form is what parser diagnostics print: operator
/// kinds render as their glyph, everything else as an uppercase tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum TokenKind {
    #[strum(serialize = "ILLEGAL")]
    Illegal,
    #[strum(serialize = "EOF")]
    Eof,
    #[strum(serialize = "NEWLINE")]
    Newline,

    // Identifiers + literals
    #[strum(serialize = "IDENT")]
    Ident,
    #[strum(serialize = "INT")]
    Int,
    #[strum(serialize = "STRING")]
    Str,

    // Operators
    #[strum(serialize = "=")]
    Assign,
    #[strum(serialize = "+")]
    Plus,
    #[strum(serialize = "-")]
    Minus,
    #[strum(serialize = "!")]
    Bang,
    #[strum(serialize = "*")]
    Asterisk,
    #[strum(serialize = "/")]
    Slash,
    #[strum(serialize = "%")]
    Percent,

    // Comparison
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    NotEq,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = ">=")]
    Ge,

    // Gates. `&&`, `||` and `!|` lex to the same kinds as the word forms.
    #[strum(serialize = "and")]
    And,
    #[strum(serialize = "or")]
    Or,
    #[strum(serialize = "xor")]
    Xor,

    // Delimiters
    #[strum(serialize = ".")]
    Dot,
    #[strum(serialize = "#")]
    HashMark,
    #[strum(serialize = ",")]
    Comma,
    #[strum(serialize = ";")]
    Semicolon,
    #[strum(serialize = ":")]
    Colon,
    #[strum(serialize = "(")]
    Lparen,
    #[strum(serialize = ")")]
    Rparen,
    #[strum(serialize = "{{")]
    Lbrace,
    #[strum(serialize = "}}")]
    Rbrace,
    #[strum(serialize = "[")]
    Lbracket,
    #[strum(serialize = "]")]
    Rbracket,

    // Keywords
    #[strum(serialize = "FUNCTION")]
    Function,
    #[strum(serialize = "LET")]
    Let,
    #[strum(serialize = "TRUE")]
    True,
    #[strum(serialize = "FALSE")]
    False,
    #[strum(serialize = "IF")]
    If,
    #[strum(serialize = "ELSE")]
    Else,
    #[strum(serialize = "RETURN")]
    Return,
    #[strum(serialize = "NULL")]
    Null,
    #[strum(serialize = "BREAK")]
    Break,
    #[strum(serialize = "MACRO")]
    Macro,
    #[strum(serialize = "MODULE")]
    Module,
}

/// Source location attached to every token and diagnostic.
///
/// Rows are 1-based; columns reset to 1 at each newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenData {
    pub filename: Rc<str>,
    pub row: u32,
    pub column: u32,
}

impl TokenData {
    #[must_use]
    pub fn new(filename: Rc<str>, row: u32, column: u32) -> Self {
        Self { filename, row, column }
    }
}

/// A lexed token: kind, the literal text it was read from, and where.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub data: TokenData,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, literal: impl Into<String>, data: TokenData) -> Self {
        Self {
            kind,
            literal: literal.into(),
            data,
        }
    }
}

/// Maps an identifier to its keyword kind, or `Ident` if it is not a keyword.
#[must_use]
pub fn lookup_ident(ident: &str) -> TokenKind {
    match ident {
        "fn" => TokenKind::Function,
        "let" => TokenKind::Let,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "return" => TokenKind::Return,
        "null" => TokenKind::Null,
        "break" => TokenKind::Break,
        "macro" => TokenKind::Macro,
        "module" => TokenKind::Module,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "xor" => TokenKind::Xor,
        _ => TokenKind::Ident,
    }
}
