//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Numeric literals (integers, decimals and exponents)
//! - String literals with escape sequences, and template literals
//! - Operators and punctuation
//! - Comments
//! - Error cases

use super::{
    lexer::{tokenize, unescape},
    tokens::TokenKind,
};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source.to_string(), Some("test.pan".to_string()))
        .unwrap()
        .iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    let source = "now set proc struct class new if elif else while for in is and or yeet nope true false";

    assert_eq!(
        kinds(source),
        vec![
            TokenKind::Now,
            TokenKind::Set,
            TokenKind::Proc,
            TokenKind::Struct,
            TokenKind::Class,
            TokenKind::New,
            TokenKind::If,
            TokenKind::Elif,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::For,
            TokenKind::In,
            TokenKind::Is,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Yeet,
            TokenKind::Nope,
            TokenKind::True,
            TokenKind::False,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let source = "foo num baz_123 _underscore CamelCase größe".to_string();
    let tokens = tokenize(source, Some("test.pan".to_string())).unwrap();

    let values: Vec<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(
        values,
        vec!["foo", "num", "baz_123", "_underscore", "CamelCase", "größe", "EOF"]
    );
    assert!(tokens[..6].iter().all(|t| t.kind == TokenKind::Identifier));
}

#[test]
fn test_tokenize_numbers() {
    let source = "42 3.14 0 30e100 124.623E-12 1e+3".to_string();
    let tokens = tokenize(source, Some("test.pan".to_string())).unwrap();

    let values: Vec<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(
        values,
        vec!["42", "3.14", "0", "30e100", "124.623E-12", "1e+3", "EOF"]
    );
    assert!(tokens[..6].iter().all(|t| t.kind == TokenKind::Number));
}

#[test]
fn test_tokenize_strings() {
    let source = r#""hello" "two words" "esc\"aped\n""#.to_string();
    let tokens = tokenize(source, Some("test.pan".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].value, "two words");
    assert_eq!(tokens[2].value, "esc\"aped\n");
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_string_span_covers_quotes() {
    let tokens = tokenize(r#"  "abc""#.to_string(), None).unwrap();

    assert_eq!(tokens[0].span.start.0, 2);
    assert_eq!(tokens[0].span.end.0, 7);
    assert_eq!(*tokens[0].span.start.1, "shell");
}

#[test]
fn test_tokenize_template() {
    let tokens = tokenize("`total: #{a + 1}!`".to_string(), None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Template);
    assert_eq!(tokens[0].value, "total: #{a + 1}!");
}

#[test]
fn test_tokenize_operators() {
    let source = "+ - * / // % ^ == != < <= > >= = += -= ++ -- ! && || -> C= C< ? : . , ;";

    assert_eq!(
        kinds(source),
        vec![
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::SlashSlash,
            TokenKind::Percent,
            TokenKind::Caret,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::LessEquals,
            TokenKind::Greater,
            TokenKind::GreaterEquals,
            TokenKind::Assignment,
            TokenKind::PlusEquals,
            TokenKind::MinusEquals,
            TokenKind::PlusPlus,
            TokenKind::MinusMinus,
            TokenKind::Not,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Arrow,
            TokenKind::Subset,
            TokenKind::ProperSubset,
            TokenKind::Question,
            TokenKind::Colon,
            TokenKind::Dot,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_delimiters() {
    assert_eq!(
        kinds("( ) [ ] { }"),
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_comments() {
    let source = "print(0); $ yay\n$ whole line\nx++;";

    assert_eq!(
        kinds(source),
        vec![
            TokenKind::Identifier,
            TokenKind::OpenParen,
            TokenKind::Number,
            TokenKind::CloseParen,
            TokenKind::Semicolon,
            TokenKind::Identifier,
            TokenKind::PlusPlus,
            TokenKind::Semicolon,
            TokenKind::EOF,
        ]
    );
}
#[test]
fn test_subset_operators_take_priority() {
    assert_eq!(
        kinds("C=5"),
        vec![TokenKind::Subset, TokenKind::Number, TokenKind::EOF]
    );
    assert_eq!(
        kinds("C<x"),
        vec![TokenKind::ProperSubset, TokenKind::Identifier, TokenKind::EOF]
    );
    assert_eq!(
        kinds("C = 5"),
        vec![
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Number,
            TokenKind::EOF,
        ]
    );
    assert_eq!(
        kinds("Cx C"),
        vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::EOF]
    );
}

#[test]
fn test_tokenize_declaration() {
    assert_eq!(
        kinds("now x: [num] = [1, 2];"),
        vec![
            TokenKind::Now,
            TokenKind::Identifier,
            TokenKind::Colon,
            TokenKind::OpenBracket,
            TokenKind::Identifier,
            TokenKind::CloseBracket,
            TokenKind::Assignment,
            TokenKind::OpenBracket,
            TokenKind::Number,
            TokenKind::Comma,
            TokenKind::Number,
            TokenKind::CloseBracket,
            TokenKind::Semicolon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_token_positions() {
    let tokens = tokenize("now x".to_string(), Some("test.pan".to_string())).unwrap();

    assert_eq!(tokens[0].span.start.0, 0);
    assert_eq!(tokens[0].span.end.0, 3);
    assert_eq!(tokens[1].span.start.0, 4);
    assert_eq!(tokens[2].span.start.0, 5);
}

#[test]
fn test_unrecognised_token() {
    let result = tokenize("now x: num = #;".to_string(), Some("test.pan".to_string()));

    let error = result.unwrap_err();
    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().map(|p| p.0), Some(13));
}

#[test]
fn test_unterminated_string_is_rejected() {
    let result = tokenize("\"never closed".to_string(), None);

    assert!(result.is_err());
}

#[test]
fn test_empty_source() {
    assert_eq!(kinds(""), vec![TokenKind::EOF]);
    assert_eq!(kinds("   $ only a comment"), vec![TokenKind::EOF]);
}

#[test]
fn test_unescape() {
    assert_eq!(unescape(r"a\tb"), "a\tb");
    assert_eq!(unescape(r"back\\slash"), "back\\slash");
    assert_eq!(unescape(r"\q"), "\\q");
}
