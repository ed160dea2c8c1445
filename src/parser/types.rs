//! Type annotation parsing.
//!
//! This module handles parsing of type annotations. It supports:
//!
//! - Named types (`num`, `bool`, `string`, struct and class names)
//! - List types `[T]`
//! - Function types `(A, B) -> R`
//! - Procedure types `(A, B)`
//!
//! Similar to expression parsing, each annotation form is dispatched through
//! a handler table keyed by its opening token.

use std::collections::HashMap;

use crate::{ast::types::TypeAnnotation, errors::errors::Error, lexer::tokens::TokenKind};

use super::parser::Parser;

/// Type alias for type annotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeAnnotation, Error>;

/// Type alias for type annotation lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Initializes the type parsing lookup table.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_nud(TokenKind::OpenBracket, parse_list_type);
    parser.type_nud(TokenKind::OpenParen, parse_signature_type);
}

pub fn parse_symbol_type(parser: &mut Parser) -> Result<TypeAnnotation, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    Ok(TypeAnnotation::Symbol {
        name: token.value,
        span: token.span,
    })
}

pub fn parse_list_type(parser: &mut Parser) -> Result<TypeAnnotation, Error> {
    let start = parser.expect(TokenKind::OpenBracket)?.span.start;
    let base = parse_type(parser)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(TypeAnnotation::List {
        base: Box::new(base),
        span: parser.span_from(start),
    })
}

pub fn parse_signature_type(parser: &mut Parser) -> Result<TypeAnnotation, Error> {
    let start = parser.expect(TokenKind::OpenParen)?.span.start;

    let mut parameters = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        parameters.push(parse_type(parser)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != TokenKind::CloseParen {
            return Err(parser.unexpected());
        }
    }
    parser.expect(TokenKind::CloseParen)?;

    if parser.current_token_kind() != TokenKind::Arrow {
        return Ok(TypeAnnotation::Procedure {
            parameters,
            span: parser.span_from(start),
        });
    }

    parser.advance();
    let return_type = parse_type(parser)?;

    Ok(TypeAnnotation::Function {
        parameters,
        return_type: Box::new(return_type),
        span: parser.span_from(start),
    })
}

pub fn parse_type(parser: &mut Parser) -> Result<TypeAnnotation, Error> {
    let token_kind = parser.current_token_kind();
    match parser.get_type_nud_lookup().get(&token_kind) {
        Some(handler) => {
            let handler = *handler;
            handler(parser)
        }
        None => Err(parser.unexpected_detailed("expected a type")),
    }
}
