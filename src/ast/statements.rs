use crate::Span;

use super::{ast::Expr, types::TypeAnnotation};

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub body: Vec<super::ast::Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub identifier: String,
    pub is_constant: bool,
    pub explicit_type: TypeAnnotation,
    pub assigned_value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeAnnotation,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDeclStmt {
    pub identifier: String,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeAnnotation,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcDeclStmt {
    pub identifier: String,
    pub parameters: Vec<Parameter>,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Struct,
    Class,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeAnnotation,
    pub span: Span,
}

/// `struct` and `class` declarations share one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDeclStmt {
    pub kind: ObjectKind,
    pub name: String,
    pub fields: Vec<FieldDecl>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
}

impl AssignOp {
    pub fn lexeme(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStmt {
    pub target: Expr,
    pub operator: AssignOp,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncrementStmt {
    pub target: Expr,
    /// `true` for `--`, `false` for `++`.
    pub decrement: bool,
    pub prefix: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallStmt {
    pub call: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElseBranch {
    Block(BlockStmt),
    If(Box<IfStmt>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_body: BlockStmt,
    pub else_body: Option<ElseBranch>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: BlockStmt,
    pub span: Span,
}

/// `for (now i: num = 0; test; increment) { .. }`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub iterator: VarDeclStmt,
    pub test: Expr,
    pub increment: Expr,
    pub body: BlockStmt,
    pub span: Span,
}

/// `for (now k: num = e; j in source) { .. }`
#[derive(Debug, Clone, PartialEq)]
pub struct ForEachStmt {
    pub production: VarDeclStmt,
    pub iterator: String,
    pub iterator_span: Span,
    pub source: Expr,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YeetStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NopeStmt {
    pub span: Span,
}
