use crate::Span;

use super::{
    expressions::{
        BinaryExpr, BoolExpr, CallExpr, ConditionalExpr, IndexExpr, ListExpr, MemberExpr,
        NumberExpr, StringExpr, SymbolExpr, TemplateExpr, UnaryExpr,
    },
    statements::{
        AssignmentStmt, CallStmt, FnDeclStmt, ForEachStmt, ForStmt, IfStmt, IncrementStmt,
        NopeStmt, ObjectDeclStmt, ProcDeclStmt, VarDeclStmt, WhileStmt, YeetStmt,
    },
};

/// The root of an untyped tree, as produced by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl(VarDeclStmt),
    FnDecl(FnDeclStmt),
    ProcDecl(ProcDeclStmt),
    ObjectDecl(ObjectDeclStmt),
    Assignment(AssignmentStmt),
    Increment(IncrementStmt),
    Call(CallStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    ForEach(ForEachStmt),
    Yeet(YeetStmt),
    Nope(NopeStmt),
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::VarDecl(s) => &s.span,
            Stmt::FnDecl(s) => &s.span,
            Stmt::ProcDecl(s) => &s.span,
            Stmt::ObjectDecl(s) => &s.span,
            Stmt::Assignment(s) => &s.span,
            Stmt::Increment(s) => &s.span,
            Stmt::Call(s) => &s.span,
            Stmt::If(s) => &s.span,
            Stmt::While(s) => &s.span,
            Stmt::For(s) => &s.span,
            Stmt::ForEach(s) => &s.span,
            Stmt::Yeet(s) => &s.span,
            Stmt::Nope(s) => &s.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(NumberExpr),
    String(StringExpr),
    Bool(BoolExpr),
    Template(TemplateExpr),
    Symbol(SymbolExpr),
    List(ListExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Conditional(ConditionalExpr),
    Index(IndexExpr),
    Member(MemberExpr),
    Call(CallExpr),
}

impl Expr {
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Number(e) => &e.span,
            Expr::String(e) => &e.span,
            Expr::Bool(e) => &e.span,
            Expr::Template(e) => &e.span,
            Expr::Symbol(e) => &e.span,
            Expr::List(e) => &e.span,
            Expr::Binary(e) => &e.span,
            Expr::Unary(e) => &e.span,
            Expr::Conditional(e) => &e.span,
            Expr::Index(e) => &e.span,
            Expr::Member(e) => &e.span,
            Expr::Call(e) => &e.span,
        }
    }
}
