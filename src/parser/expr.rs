use crate::{
    ast::{
        ast::Expr,
        expressions::{
            BinaryExpr, BinaryOp, BoolExpr, CallExpr, ConditionalExpr, IndexExpr, ListExpr,
            MemberExpr, NumberExpr, StringExpr, SymbolExpr, TemplateExpr, TemplatePart, UnaryExpr,
            UnaryOp,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::{tokenize_at, unescape},
        tokens::TokenKind,
    },
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected()),
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let token_bp = *parser
            .get_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);
        if token_bp <= bp {
            break;
        }

        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => break,
        };

        left = led(parser, left, token_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance();

    match token.kind {
        TokenKind::Number => match token.value.parse::<f64>() {
            Ok(value) => Ok(Expr::Number(NumberExpr {
                value,
                span: token.span,
            })),
            Err(_) => Err(Error::new(
                ErrorImpl::NumberParseError { token: token.value },
                token.span.start,
            )),
        },
        TokenKind::Identifier => Ok(Expr::Symbol(SymbolExpr {
            value: token.value,
            span: token.span,
        })),
        TokenKind::String => Ok(Expr::String(StringExpr {
            value: token.value,
            span: token.span,
        })),
        TokenKind::True | TokenKind::False => Ok(Expr::Bool(BoolExpr {
            value: token.kind == TokenKind::True,
            span: token.span,
        })),
        _ => Err(Error::new(
            ErrorImpl::UnexpectedToken { token: token.value },
            token.span.start,
        )),
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance();
    let operator = BinaryOp::from_token(operator_token.kind).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: operator_token.value.clone(),
            },
            operator_token.span.start.clone(),
        )
    })?;

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: right.get_span().end.clone(),
        },
        left: Box::new(left),
        operator,
        right: Box::new(right),
    }))
}

/// `^` is right-associative, so its right side binds one level looser.
pub fn parse_power_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let right = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Binary(BinaryExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: right.get_span().end.clone(),
        },
        left: Box::new(left),
        operator: BinaryOp::Power,
        right: Box::new(right),
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance();
    let operator = match operator_token.kind {
        TokenKind::Dash => UnaryOp::Negate,
        TokenKind::Not => UnaryOp::Not,
        TokenKind::PlusPlus => UnaryOp::Increment,
        _ => UnaryOp::Decrement,
    };
    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Unary(UnaryExpr {
        span: Span {
            start: operator_token.span.start.clone(),
            end: operand.get_span().end.clone(),
        },
        operator,
        operand: Box::new(operand),
        postfix: false,
    }))
}

pub fn parse_postfix_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance();
    let operator = if operator_token.kind == TokenKind::PlusPlus {
        UnaryOp::Increment
    } else {
        UnaryOp::Decrement
    };

    Ok(Expr::Unary(UnaryExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: operator_token.span.end.clone(),
        },
        operator,
        operand: Box::new(left),
        postfix: true,
    }))
}

pub fn parse_conditional_expr(
    parser: &mut Parser,
    test: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    parser.advance();
    let consequent = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Colon)?;
    let alternate = parse_expr(parser, BindingPower::Default)?;

    Ok(Expr::Conditional(ConditionalExpr {
        span: Span {
            start: test.get_span().start.clone(),
            end: alternate.get_span().end.clone(),
        },
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate: Box::new(alternate),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// Parses a comma separated list of expressions up to `close`, consuming it.
pub fn parse_expr_list(parser: &mut Parser, close: TokenKind) -> Result<Vec<Expr>, Error> {
    let mut items = vec![];

    while parser.current_token_kind() != close {
        items.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != close {
            return Err(parser.unexpected());
        }
    }

    parser.expect(close)?;
    Ok(items)
}

pub fn parse_list_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start;
    let elements = parse_expr_list(parser, TokenKind::CloseBracket)?;

    Ok(Expr::List(ListExpr {
        elements,
        span: parser.span_from(start),
    }))
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let arguments = parse_expr_list(parser, TokenKind::CloseParen)?;

    Ok(Expr::Call(CallExpr {
        span: parser.span_from(left.get_span().start.clone()),
        callee: Box::new(left),
        arguments,
    }))
}

pub fn parse_index_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let index = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(Expr::Index(IndexExpr {
        span: parser.span_from(left.get_span().start.clone()),
        list: Box::new(left),
        index: Box::new(index),
    }))
}

pub fn parse_member_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let error = parser.unexpected_detailed("expected field name after `.`");
    let field = parser.expect_error(TokenKind::Identifier, Some(error))?;

    Ok(Expr::Member(MemberExpr {
        span: parser.span_from(left.get_span().start.clone()),
        object: Box::new(left),
        field: field.value,
    }))
}

/// `new S(args)` is sugar for the constructor call `S(args)`.
pub fn parse_new_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start;
    let name = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::OpenParen)?;
    let arguments = parse_expr_list(parser, TokenKind::CloseParen)?;

    Ok(Expr::Call(CallExpr {
        span: parser.span_from(start),
        callee: Box::new(Expr::Symbol(SymbolExpr {
            value: name.value,
            span: name.span,
        })),
        arguments,
    }))
}

pub fn parse_template_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance();
    let raw = token.value.as_str();
    // Skip the opening backtick
    let base = token.span.start.0 as usize + 1;

    let mut parts = vec![];
    let mut rest = 0;

    while let Some(open) = raw[rest..].find("#{") {
        let open = rest + open;
        let inner_start = open + 2;
        let close = match raw[inner_start..].find('}') {
            Some(close) => inner_start + close,
            None => {
                return Err(Error::new(
                    ErrorImpl::UnexpectedTokenDetailed {
                        token: token.value.clone(),
                        message: String::from("unterminated `#{` in template"),
                    },
                    token.span.start.clone(),
                ))
            }
        };

        if open > rest {
            parts.push(TemplatePart::Text(unescape(&raw[rest..open])));
        }

        let tokens = tokenize_at(
            raw[inner_start..close].to_string(),
            parser.get_file(),
            base + inner_start,
        )?;
        let mut inner = Parser::new(tokens, parser.get_file());
        let expr = parse_expr(&mut inner, BindingPower::Default)?;
        if inner.has_tokens() {
            return Err(inner.unexpected());
        }
        parts.push(TemplatePart::Interpolation(expr));

        rest = close + 1;
    }

    if rest < raw.len() {
        parts.push(TemplatePart::Text(unescape(&raw[rest..])));
    }

    Ok(Expr::Template(TemplateExpr {
        parts,
        span: token.span,
    }))
}
