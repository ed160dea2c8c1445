//! Typed tree definitions.
//!
//! The analyzer produces this tree from the untyped one. Every expression
//! carries its resolved type and every name has been replaced by the entity
//! it refers to, so later passes never consult a scope again.
//!
//! The optimizer rewrites this tree and the generator walks it to produce
//! JavaScript.

use std::rc::Rc;

use crate::ast::{
    expressions::{BinaryOp, UnaryOp},
    statements::AssignOp,
};

use super::{
    entities::{Function, Procedure, Variable},
    stdlib::BuiltinMethod,
    types::{ObjectId, Type, TypeTable},
};

#[derive(Debug, Clone, PartialEq)]
pub struct TypedProgram {
    pub statements: Vec<TypedStmt>,
    pub types: TypeTable,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedBlock {
    pub statements: Vec<TypedStmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedStmt {
    VarDecl {
        variable: Rc<Variable>,
        initializer: TypedExpr,
    },
    FnDecl {
        function: Rc<Function>,
        body: TypedBlock,
    },
    ProcDecl {
        procedure: Rc<Procedure>,
        body: TypedBlock,
    },
    ObjectDecl(ObjectId),
    Assignment {
        target: TypedExpr,
        operator: AssignOp,
        value: TypedExpr,
    },
    Increment {
        target: TypedExpr,
        decrement: bool,
        prefix: bool,
    },
    Call(TypedCall),
    If(TypedIf),
    While {
        test: TypedExpr,
        body: TypedBlock,
    },
    For {
        iterator: Rc<Variable>,
        initializer: TypedExpr,
        test: TypedExpr,
        increment: TypedExpr,
        body: TypedBlock,
    },
    ForEach {
        iterator: Rc<Variable>,
        source: TypedExpr,
        production: Rc<Variable>,
        production_value: TypedExpr,
        body: TypedBlock,
    },
    Yeet(Option<TypedExpr>),
    Nope,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedIf {
    pub test: TypedExpr,
    pub consequent: TypedBlock,
    pub alternate: Option<TypedElse>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedElse {
    Block(TypedBlock),
    If(Box<TypedIf>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Callee {
    Function(Rc<Function>),
    Procedure(Rc<Procedure>),
    /// A struct or class type used as its own constructor.
    Constructor(Type),
    Method {
        receiver: Box<TypedExpr>,
        method: BuiltinMethod,
    },
    /// Any other expression of function or procedure type.
    Value(Box<TypedExpr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedCall {
    pub callee: Callee,
    pub arguments: Vec<TypedExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedTemplatePart {
    Text(String),
    Interpolation(TypedExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedExpr {
    Number(f64),
    Bool(bool),
    String(String),
    Template(Vec<TypedTemplatePart>),
    Variable(Rc<Variable>),
    Function(Rc<Function>),
    Procedure(Rc<Procedure>),
    List {
        elements: Vec<TypedExpr>,
        ty: Type,
    },
    Binary {
        operator: BinaryOp,
        left: Box<TypedExpr>,
        right: Box<TypedExpr>,
        ty: Type,
    },
    Unary {
        operator: UnaryOp,
        operand: Box<TypedExpr>,
        postfix: bool,
        ty: Type,
    },
    Conditional {
        test: Box<TypedExpr>,
        consequent: Box<TypedExpr>,
        alternate: Box<TypedExpr>,
        ty: Type,
    },
    Index {
        list: Box<TypedExpr>,
        index: Box<TypedExpr>,
        ty: Type,
    },
    Member {
        object: Box<TypedExpr>,
        field: String,
        ty: Type,
    },
    Call {
        call: TypedCall,
        ty: Type,
    },
}

impl TypedExpr {
    pub fn ty(&self) -> Type {
        match self {
            TypedExpr::Number(_) => Type::Num,
            TypedExpr::Bool(_) => Type::Bool,
            TypedExpr::String(_) | TypedExpr::Template(_) => Type::String,
            TypedExpr::Variable(variable) => variable.ty.clone(),
            TypedExpr::Function(function) => function.signature(),
            TypedExpr::Procedure(procedure) => procedure.signature(),
            TypedExpr::List { ty, .. }
            | TypedExpr::Binary { ty, .. }
            | TypedExpr::Unary { ty, .. }
            | TypedExpr::Conditional { ty, .. }
            | TypedExpr::Index { ty, .. }
            | TypedExpr::Member { ty, .. }
            | TypedExpr::Call { ty, .. } => ty.clone(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            TypedExpr::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedExpr::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The variable a place expression ultimately reads from.
    pub fn root_variable(&self) -> Option<&Rc<Variable>> {
        match self {
            TypedExpr::Variable(variable) => Some(variable),
            TypedExpr::Index { list, .. } => list.root_variable(),
            TypedExpr::Member { object, .. } => object.root_variable(),
            _ => None,
        }
    }

    pub fn is_place(&self) -> bool {
        matches!(
            self,
            TypedExpr::Variable(_) | TypedExpr::Index { .. } | TypedExpr::Member { .. }
        )
    }
}
