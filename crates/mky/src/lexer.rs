//! Single-pass lexer with one character of lookahead.
//!
//! Whitespace and `//` comments are skipped, runs of `\n`/`\r` collapse to
//! one `NEWLINE` token, and row/column counters track every character so
//! tokens carry exact source locations.

use std::rc::Rc;

use crate::token::{Token, TokenData, TokenKind, lookup_ident};

pub struct Lexer {
    chars: Vec<char>,
    /// Index of `ch` in `chars`.
    position: usize,
    /// Index one past `ch`.
    read_position: usize,
    /// Current character, `'\0'` once input is exhausted.
    ch: char,

    row: u32,
    column: u32,
    filename: Rc<str>,
}

impl Lexer {
    #[must_use]
    pub fn new(input: &str, filename: &str) -> Self {
        let mut lexer = Self {
            chars: input.chars().collect(),
            position: 0,
            read_position: 0,
            ch: '\0',
            row: 1,
            column: 0,
            filename: Rc::from(filename),
        };
        lexer.read_char();
        lexer
    }

    /// Advances to the next character, updating row/column bookkeeping.
    fn read_char(&mut self) {
        if self.ch == '\n' {
            self.row += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        self.ch = self.chars.get(self.read_position).copied().unwrap_or('\0');
        self.position = self.read_position;
        self.read_position += 1;
    }

    fn peek_char(&self) -> char {
        self.chars.get(self.read_position).copied().unwrap_or('\0')
    }

    fn data(&self) -> TokenData {
        TokenData::new(Rc::clone(&self.filename), self.row, self.column)
    }

    /// Produces the next token. At end of input this returns `EOF` forever.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let (kind, literal) = match self.ch {
            '=' => {
                if self.peek_char() == '=' {
                    self.read_char();
                    (TokenKind::Eq, "==".to_owned())
                } else {
                    (TokenKind::Assign, "=".to_owned())
                }
            }
            '\n' | '\r' => {
                // Collapse the whole newline run into one token.
                while self.peek_char() == '\n' || self.peek_char() == '\r' {
                    self.read_char();
                }
                (TokenKind::Newline, "\n".to_owned())
            }
            '.' => (TokenKind::Dot, ".".to_owned()),
            '+' => (TokenKind::Plus, "+".to_owned()),
            '-' => (TokenKind::Minus, "-".to_owned()),
            '*' => (TokenKind::Asterisk, "*".to_owned()),
            '/' => (TokenKind::Slash, "/".to_owned()),
            '#' => (TokenKind::HashMark, "#".to_owned()),
            '%' => (TokenKind::Percent, "%".to_owned()),
            '&' => {
                if self.peek_char() == '&' {
                    self.read_char();
                    (TokenKind::And, "and".to_owned())
                } else {
                    (TokenKind::Illegal, "&".to_owned())
                }
            }
            '|' => {
                if self.peek_char() == '|' {
                    self.read_char();
                    (TokenKind::Or, "or".to_owned())
                } else {
                    (TokenKind::Illegal, "|".to_owned())
                }
            }
            '!' => match self.peek_char() {
                '=' => {
                    self.read_char();
                    (TokenKind::NotEq, "!=".to_owned())
                }
                '|' => {
                    self.read_char();
                    (TokenKind::Xor, "xor".to_owned())
                }
                _ => (TokenKind::Bang, "!".to_owned()),
            },
            '<' => {
                if self.peek_char() == '=' {
                    self.read_char();
                    (TokenKind::Le, "<=".to_owned())
                } else {
                    (TokenKind::Lt, "<".to_owned())
                }
            }
            '>' => {
                if self.peek_char() == '=' {
                    self.read_char();
                    (TokenKind::Ge, ">=".to_owned())
                } else {
                    (TokenKind::Gt, ">".to_owned())
                }
            }
            '"' => (TokenKind::Str, self.read_string('"')),
            '\'' => (TokenKind::Str, self.read_string('\'')),
            ';' => (TokenKind::Semicolon, ";".to_owned()),
            ':' => (TokenKind::Colon, ":".to_owned()),
            '(' => (TokenKind::Lparen, "(".to_owned()),
            ')' => (TokenKind::Rparen, ")".to_owned()),
            ',' => (TokenKind::Comma, ",".to_owned()),
            '{' => (TokenKind::Lbrace, "{".to_owned()),
            '}' => (TokenKind::Rbrace, "}".to_owned()),
            '[' => (TokenKind::Lbracket, "[".to_owned()),
            ']' => (TokenKind::Rbracket, "]".to_owned()),
            '\0' => (TokenKind::Eof, String::new()),
            ch => {
                if is_letter_start(ch) {
                    let data = self.data();
                    let literal = self.read_identifier();
                    let kind = lookup_ident(&literal);
                    return Token::new(kind, literal, data);
                }
                if ch.is_ascii_digit() {
                    let data = self.data();
                    let literal = self.read_number();
                    return Token::new(TokenKind::Int, literal, data);
                }
                (TokenKind::Illegal, ch.to_string())
            }
        };

        let token = Token::new(kind, literal, self.data());
        self.read_char();
        token
    }

    /// Eats spaces, tabs and `//` line comments.
    fn skip_whitespace(&mut self) {
        loop {
            if self.ch == ' ' || self.ch == '\t' {
                self.read_char();
                continue;
            }
            if self.ch == '/' && self.peek_char() == '/' {
                self.read_char();
                self.read_char();
                while self.ch != '\n' && self.ch != '\r' && self.ch != '\0' {
                    self.read_char();
                }
                continue;
            }
            break;
        }
    }

    fn read_identifier(&mut self) -> String {
        let start = self.position;
        while is_letter(self.ch) {
            self.read_char();
        }
        self.chars[start..self.position].iter().collect()
    }

    /// Reads `[0-9]+ ( '.' [0-9]+ )?`.
    ///
    /// A trailing dot not followed by a digit is left alone so `x.field`
    /// lexes as an identifier, a dot, and another identifier.
    fn read_number(&mut self) -> String {
        let start = self.position;
        while self.ch.is_ascii_digit() {
            self.read_char();
        }
        if self.ch == '.' && self.peek_char().is_ascii_digit() {
            self.read_char();
            while self.ch.is_ascii_digit() {
                self.read_char();
            }
        }
        self.chars[start..self.position].iter().collect()
    }

    /// Reads a string body up to `terminator` or end of input, resolving
    /// the `\n`, `\t`, `\"` and `\'` escapes.
    fn read_string(&mut self, terminator: char) -> String {
        let mut out = String::new();
        loop {
            self.read_char();
            match self.ch {
                '\0' => break,
                ch if ch == terminator => break,
                '\\' => match self.peek_char() {
                    'n' => {
                        out.push('\n');
                        self.read_char();
                    }
                    't' => {
                        out.push('\t');
                        self.read_char();
                    }
                    '"' => {
                        out.push('"');
                        self.read_char();
                    }
                    '\'' => {
                        out.push('\'');
                        self.read_char();
                    }
                    _ => out.push('\\'),
                },
                ch => out.push(ch),
            }
        }
        out
    }
}

/// Identifiers start with `[A-Za-z_]`.
fn is_letter_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

/// Identifier continuation characters: `[A-Za-z_?!$]`.
fn is_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '?' || ch == '!' || ch == '$'
}
