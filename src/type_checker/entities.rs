use std::rc::Rc;

use super::types::Type;

/// Ids below this are handed out to standard library entities.
pub const FIRST_USER_ID: usize = 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub id: usize,
    pub name: String,
    pub ty: Type,
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub id: usize,
    pub name: String,
    pub parameters: Vec<Rc<Variable>>,
    pub return_type: Type,
}

impl Function {
    pub fn signature(&self) -> Type {
        Type::Function {
            parameters: self.parameters.iter().map(|p| p.ty.clone()).collect(),
            return_type: Box::new(self.return_type.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Procedure {
    pub id: usize,
    pub name: String,
    pub parameters: Vec<Rc<Variable>>,
    /// Accepts any number of arguments of any type.
    pub variadic: bool,
    pub builtin: bool,
}

impl Procedure {
    pub fn signature(&self) -> Type {
        Type::Procedure {
            parameters: self.parameters.iter().map(|p| p.ty.clone()).collect(),
        }
    }
}

/// Anything a name can be bound to.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Variable(Rc<Variable>),
    Function(Rc<Function>),
    Procedure(Rc<Procedure>),
    Type(Type),
}

impl Entity {
    pub fn kind(&self) -> &'static str {
        match self {
            Entity::Variable(_) => "variable",
            Entity::Function(_) => "function",
            Entity::Procedure(_) => "procedure",
            Entity::Type(_) => "type",
        }
    }
}
