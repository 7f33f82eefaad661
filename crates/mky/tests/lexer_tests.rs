//! Token-level tests for the lexer: kinds, literals, positions,
//! comments, strings and the multi-character operators.

use mky::{Lexer, TokenKind};
use pretty_assertions::assert_eq;

fn kinds_and_literals(input: &str) -> Vec<(TokenKind, String)> {
    let mut lexer = Lexer::new(input, "lexer_test.mky");
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push((token.kind, token.literal));
        if done {
            break;
        }
    }
    tokens
}

#[test]
fn lexes_a_representative_program() {
    let input = "let five = 5\nlet add = fn(x, y) { x + y }\nfive <= 10 != true";
    let expected = vec![
        (TokenKind::Let, "let"),
        (TokenKind::Ident, "five"),
        (TokenKind::Assign, "="),
        (TokenKind::Int, "5"),
        (TokenKind::Newline, "\n"),
        (TokenKind::Let, "let"),
        (TokenKind::Ident, "add"),
        (TokenKind::Assign, "="),
        (TokenKind::Function, "fn"),
        (TokenKind::Lparen, "("),
        (TokenKind::Ident, "x"),
        (TokenKind::Comma, ","),
        (TokenKind::Ident, "y"),
        (TokenKind::Rparen, ")"),
        (TokenKind::Lbrace, "{"),
        (TokenKind::Ident, "x"),
        (TokenKind::Plus, "+"),
        (TokenKind::Ident, "y"),
        (TokenKind::Rbrace, "}"),
        (TokenKind::Newline, "\n"),
        (TokenKind::Ident, "five"),
        (TokenKind::Le, "<="),
        (TokenKind::Int, "10"),
        (TokenKind::NotEq, "!="),
        (TokenKind::True, "true"),
        (TokenKind::Eof, ""),
    ];
    let expected: Vec<(TokenKind, String)> = expected.into_iter().map(|(kind, lit)| (kind, lit.to_owned())).collect();
    assert_eq!(kinds_and_literals(input), expected);
}

#[test]
fn gate_operators_lex_to_word_forms() {
    let tokens = kinds_and_literals("a && b || c !| d and e or f xor g");
    let gates: Vec<&(TokenKind, String)> = tokens
        .iter()
        .filter(|(kind, _)| matches!(kind, TokenKind::And | TokenKind::Or | TokenKind::Xor))
        .collect();
    assert_eq!(gates.len(), 6);
    assert_eq!(gates[0], &(TokenKind::And, "and".to_owned()));
    assert_eq!(gates[1], &(TokenKind::Or, "or".to_owned()));
    assert_eq!(gates[2], &(TokenKind::Xor, "xor".to_owned()));
}

#[test]
fn lone_ampersand_and_pipe_are_illegal() {
    let tokens = kinds_and_literals("a & b | c");
    let illegal: Vec<_> = tokens.iter().filter(|(kind, _)| *kind == TokenKind::Illegal).collect();
    assert_eq!(illegal.len(), 2);
}

#[test]
fn newline_runs_collapse_to_one_token() {
    let tokens = kinds_and_literals("1\n\n\r\n\n2");
    let newlines = tokens.iter().filter(|(kind, _)| *kind == TokenKind::Newline).count();
    assert_eq!(newlines, 1);
}

#[test]
fn line_comments_are_whitespace() {
    let tokens = kinds_and_literals("1 // ignored to end of line\n2");
    let kinds: Vec<TokenKind> = tokens.iter().map(|(kind, _)| *kind).collect();
    assert_eq!(
        kinds,
        vec![TokenKind::Int, TokenKind::Newline, TokenKind::Int, TokenKind::Eof]
    );
}

#[test]
fn strings_support_both_quotes_and_escapes() {
    let tokens = kinds_and_literals(r#""a\tb" 'c\nd' "q\"q" 'p\'p'"#);
    let strings: Vec<&String> = tokens
        .iter()
        .filter(|(kind, _)| *kind == TokenKind::Str)
        .map(|(_, literal)| literal)
        .collect();
    assert_eq!(strings, vec!["a\tb", "c\nd", "q\"q", "p'p"]);
}

#[test]
fn numbers_keep_fractions_but_not_trailing_dots() {
    let tokens = kinds_and_literals("1.5 2.fn0");
    assert_eq!(tokens[0], (TokenKind::Int, "1.5".to_owned()));
    // `2.` followed by a non-digit lexes as the number then a dot.
    assert_eq!(tokens[1], (TokenKind::Int, "2".to_owned()));
    assert_eq!(tokens[2].0, TokenKind::Dot);
}

#[test]
fn identifiers_allow_marker_suffixes() {
    let tokens = kinds_and_literals("error? bool! _tmp my$var");
    assert_eq!(tokens[0], (TokenKind::Ident, "error?".to_owned()));
    assert_eq!(tokens[1], (TokenKind::Ident, "bool!".to_owned()));
    assert_eq!(tokens[2], (TokenKind::Ident, "_tmp".to_owned()));
    assert_eq!(tokens[3], (TokenKind::Ident, "my$var".to_owned()));
}

#[test]
fn keywords_are_recognized() {
    let tokens = kinds_and_literals("let fn if else return true false null break macro module");
    let kinds: Vec<TokenKind> = tokens.iter().map(|(kind, _)| *kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Let,
            TokenKind::Function,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::Return,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Null,
            TokenKind::Break,
            TokenKind::Macro,
            TokenKind::Module,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn rows_and_columns_track_the_source() {
    let mut lexer = Lexer::new("ab\n  cd", "pos.mky");
    let first = lexer.next_token();
    assert_eq!((first.data.row, first.data.column), (1, 1));

    let newline = lexer.next_token();
    assert_eq!(newline.kind, TokenKind::Newline);

    let second = lexer.next_token();
    assert_eq!(second.kind, TokenKind::Ident);
    assert_eq!((second.data.row, second.data.column), (2, 3));
    assert_eq!(second.data.filename.as_ref(), "pos.mky");
}

#[test]
fn eof_repeats_forever() {
    let mut lexer = Lexer::new("1", "eof.mky");
    assert_eq!(lexer.next_token().kind, TokenKind::Int);
    for _ in 0..3 {
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }
}
