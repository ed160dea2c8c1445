use crate::{
    ast::{
        ast::{Expr, Stmt},
        expressions::{BinaryOp, UnaryOp},
        statements::{
            AssignOp, AssignmentStmt, BlockStmt, CallStmt, ElseBranch, FieldDecl, FnDeclStmt,
            ForEachStmt, ForStmt, IfStmt, IncrementStmt, NopeStmt, ObjectDeclStmt, ObjectKind,
            Parameter, ProcDeclStmt, VarDeclStmt, WhileStmt, YeetStmt,
        },
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(handler) = parser.get_stmt_lookup().get(&parser.current_token_kind()) {
        let handler = *handler;
        return handler(parser);
    }

    if starts_fn_decl(parser) {
        return parse_fn_decl_stmt(parser);
    }

    parse_simple_stmt(parser)
}

/// A function declaration opens with its return type: `num f(`, `[num] f(`
/// or `(num) -> num f(`.
fn starts_fn_decl(parser: &Parser) -> bool {
    match parser.current_token_kind() {
        TokenKind::Identifier => parser.peek(1).kind == TokenKind::Identifier,
        TokenKind::OpenBracket | TokenKind::OpenParen => true,
        _ => false,
    }
}

/// Assignments, increments and calls.
fn parse_simple_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.get_position();
    let expr = parse_expr(parser, BindingPower::Default)?;

    let operator = match parser.current_token_kind() {
        TokenKind::Assignment => Some(AssignOp::Assign),
        TokenKind::PlusEquals => Some(AssignOp::AddAssign),
        TokenKind::MinusEquals => Some(AssignOp::SubAssign),
        _ => None,
    };

    let stmt = if let Some(operator) = operator {
        parser.advance();
        let value = parse_expr(parser, BindingPower::Default)?;
        parser.expect(TokenKind::Semicolon)?;
        Stmt::Assignment(AssignmentStmt {
            target: expr,
            operator,
            value,
            span: parser.span_from(start),
        })
    } else {
        match expr {
            Expr::Unary(unary)
                if matches!(unary.operator, UnaryOp::Increment | UnaryOp::Decrement) =>
            {
                parser.expect(TokenKind::Semicolon)?;
                Stmt::Increment(IncrementStmt {
                    target: *unary.operand,
                    decrement: unary.operator == UnaryOp::Decrement,
                    prefix: !unary.postfix,
                    span: parser.span_from(start),
                })
            }
            call @ Expr::Call(_) => {
                parser.expect(TokenKind::Semicolon)?;
                Stmt::Call(CallStmt {
                    call,
                    span: parser.span_from(start),
                })
            }
            _ => {
                return Err(
                    parser.unexpected_detailed("expected an assignment, increment or call")
                )
            }
        }
    };

    Ok(stmt)
}

pub fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;

    let mut body = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected_detailed("expected `}`"));
        }
        body.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(BlockStmt {
        body,
        span: parser.span_from(start),
    })
}

/// `now x: T = e;` or `set x: T = e;`, semicolon included.
pub fn parse_var_decl(parser: &mut Parser) -> Result<VarDeclStmt, Error> {
    let start_token = parser.advance();
    let is_constant = start_token.kind == TokenKind::Set;

    let error = parser.unexpected_detailed("expected identifier during variable declaration");
    let identifier = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let error = parser.unexpected_detailed("expected `:` and a type after the variable name");
    parser.expect_error(TokenKind::Colon, Some(error))?;
    let explicit_type = parse_type(parser)?;

    let error = parser.unexpected_detailed("expected `=` and an initializer");
    parser.expect_error(TokenKind::Assignment, Some(error))?;
    let assigned_value = parse_expr(parser, BindingPower::Default)?;

    parser.expect(TokenKind::Semicolon)?;

    Ok(VarDeclStmt {
        identifier,
        is_constant,
        explicit_type,
        assigned_value,
        span: parser.span_from(start_token.span.start),
    })
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::VarDecl(parse_var_decl(parser)?))
}

fn parse_parameters(parser: &mut Parser) -> Result<Vec<Parameter>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseParen {
        let start = parser.get_position();
        let ty = parse_type(parser)?;
        let name = parser.expect(TokenKind::Identifier)?.value;
        parameters.push(Parameter {
            name,
            ty,
            span: parser.span_from(start),
        });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != TokenKind::CloseParen {
            return Err(parser.unexpected());
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(parameters)
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.get_position();
    let return_type = parse_type(parser)?;

    let error = parser.unexpected_detailed("expected function name after return type");
    let identifier = parser.expect_error(TokenKind::Identifier, Some(error))?.value;
    let parameters = parse_parameters(parser)?;
    let body = parse_block(parser)?;

    Ok(Stmt::FnDecl(FnDeclStmt {
        identifier,
        parameters,
        return_type,
        body,
        span: parser.span_from(start),
    }))
}

pub fn parse_proc_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;

    let identifier = parser.expect(TokenKind::Identifier)?.value;
    let parameters = parse_parameters(parser)?;
    let body = parse_block(parser)?;

    Ok(Stmt::ProcDecl(ProcDeclStmt {
        identifier,
        parameters,
        body,
        span: parser.span_from(start),
    }))
}

pub fn parse_object_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start_token = parser.advance();
    let kind = if start_token.kind == TokenKind::Struct {
        ObjectKind::Struct
    } else {
        ObjectKind::Class
    };

    let name = parser.expect(TokenKind::Identifier)?.value;

    parser.expect(TokenKind::OpenCurly)?;

    let mut fields = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        let field_start = parser.get_position();
        let field_name = parser.expect(TokenKind::Identifier)?.value;
        parser.expect(TokenKind::Colon)?;
        let ty = parse_type(parser)?;
        fields.push(FieldDecl {
            name: field_name,
            ty,
            span: parser.span_from(field_start),
        });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Stmt::ObjectDecl(ObjectDeclStmt {
        kind,
        name,
        fields,
        span: parser.span_from(start_token.span.start),
    }))
}

fn parse_if(parser: &mut Parser) -> Result<IfStmt, Error> {
    // Current token is `if` or `elif`
    let start = parser.advance().span.start;

    let condition = parse_expr(parser, BindingPower::Default)?;
    let then_body = parse_block(parser)?;

    let else_body = match parser.current_token_kind() {
        TokenKind::Elif => Some(ElseBranch::If(Box::new(parse_if(parser)?))),
        TokenKind::Else => {
            parser.advance();
            Some(ElseBranch::Block(parse_block(parser)?))
        }
        _ => None,
    };

    Ok(IfStmt {
        condition,
        then_body,
        else_body,
        span: parser.span_from(start),
    })
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::If(parse_if(parser)?))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;

    let condition = parse_expr(parser, BindingPower::Default)?;
    let body = parse_block(parser)?;

    Ok(Stmt::While(WhileStmt {
        condition,
        body,
        span: parser.span_from(start),
    }))
}

/// Both loop forms open with a declaration:
/// `for (now i: num = 0; test; increment)` and `for (now k: T = e; j in source)`.
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;
    parser.expect(TokenKind::OpenParen)?;

    if !matches!(parser.current_token_kind(), TokenKind::Now | TokenKind::Set) {
        return Err(parser.unexpected_detailed("expected a declaration to open the loop"));
    }
    let declaration = parse_var_decl(parser)?;

    let test = parse_expr(parser, BindingPower::Default)?;

    if parser.current_token_kind() == TokenKind::CloseParen {
        if let Expr::Binary(binary) = test {
            if let (BinaryOp::In, Expr::Symbol(iterator)) = (binary.operator, &*binary.left) {
                let iterator_name = iterator.value.clone();
                let iterator_span = iterator.span.clone();
                parser.advance();
                let body = parse_block(parser)?;

                return Ok(Stmt::ForEach(ForEachStmt {
                    production: declaration,
                    iterator: iterator_name,
                    iterator_span,
                    source: *binary.right,
                    body,
                    span: parser.span_from(start),
                }));
            }
        }
        return Err(parser.unexpected_detailed("expected `;` and an increment"));
    }

    parser.expect(TokenKind::Semicolon)?;
    let increment = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;
    let body = parse_block(parser)?;

    Ok(Stmt::For(ForStmt {
        iterator: declaration,
        test,
        increment,
        body,
        span: parser.span_from(start),
    }))
}

pub fn parse_yeet_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Yeet(YeetStmt {
        value,
        span: parser.span_from(start),
    }))
}

pub fn parse_nope_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Nope(NopeStmt {
        span: parser.span_from(start),
    }))
}
