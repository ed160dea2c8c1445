//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::Position;
use std::rc::Rc;

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        Position(10, Rc::new("test.pan".to_string())),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::UnrecognisedToken { token } if token == "@"
    ));
}

#[test]
fn test_error_position() {
    let pos = Position(42, Rc::new("test.pan".to_string()));
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        pos.clone(),
    );

    assert_eq!(error.get_position().map(|p| p.0), Some(42));
}

#[test]
fn test_unpositioned_error() {
    let error = Error::unpositioned(ErrorImpl::NumberParseError {
        token: "1e999999".to_string(),
    });

    assert!(error.get_position().is_none());
    assert_eq!(error.get_error_name(), "NumberParseError");
}

#[test]
fn test_semantic_error_message() {
    let error = Error::semantic("Identifier x already declared", None);

    assert_eq!(error.get_error_name(), "SemanticError");
    assert_eq!(error.message(), "Identifier x already declared");
    assert_eq!(error.to_string(), "Identifier x already declared");
}

#[test]
fn test_semantic_errors_differ_only_by_message() {
    let a = Error::semantic("Expected a number", None);
    let b = Error::semantic("Expected a boolean", None);

    assert_eq!(a.get_error_name(), b.get_error_name());
    assert_ne!(a, b);
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        Position(0, Rc::new("test.pan".to_string())),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "}".to_string(),
        },
        Position(0, Rc::new("test.pan".to_string())),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert!(tip.contains("`}`")),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_detailed_token_error_display() {
    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: "5".to_string(),
            message: "expected identifier".to_string(),
        },
        Position(3, Rc::new("test.pan".to_string())),
    );

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
    assert_eq!(error.message(), "unexpected token (expected identifier): \"5\"");
}
