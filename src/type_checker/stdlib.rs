//! Names every program can see without declaring them.
//!
//! The [`Stdlib`] is an immutable value built once per compilation and
//! handed to the analyzer, which seeds its root scope from it. Methods on
//! lists and strings are not scope entries; they are looked up by receiver
//! type when a member is called.

use std::{collections::HashMap, rc::Rc};

use super::{
    entities::{Entity, Procedure},
    types::Type,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinMethod {
    Length,
    Add,
    Preadd,
    InsertAt,
    SymbolCount,
}

impl BuiltinMethod {
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinMethod::Length => "length",
            BuiltinMethod::Add => "add",
            BuiltinMethod::Preadd => "preadd",
            BuiltinMethod::InsertAt => "insertAt",
            BuiltinMethod::SymbolCount => "symbolcount",
        }
    }

    /// Parameter types when called on a receiver of type `receiver`.
    pub fn parameters(&self, receiver: &Type) -> Vec<Type> {
        let element = receiver.element_type().cloned();
        match (self, element) {
            (BuiltinMethod::Add | BuiltinMethod::Preadd, Some(element)) => vec![element],
            (BuiltinMethod::InsertAt, Some(element)) => vec![Type::Num, element],
            _ => vec![],
        }
    }

    /// `None` for methods that are called for their effect.
    pub fn return_type(&self) -> Option<Type> {
        match self {
            BuiltinMethod::Length | BuiltinMethod::SymbolCount => Some(Type::Num),
            BuiltinMethod::Add | BuiltinMethod::Preadd | BuiltinMethod::InsertAt => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Stdlib {
    globals: Vec<(&'static str, Entity)>,
    list_methods: HashMap<&'static str, BuiltinMethod>,
    string_methods: HashMap<&'static str, BuiltinMethod>,
}

impl Default for Stdlib {
    fn default() -> Self {
        Stdlib::new()
    }
}

impl Stdlib {
    pub fn new() -> Self {
        let print = Procedure {
            id: 0,
            name: String::from("print"),
            parameters: vec![],
            variadic: true,
            builtin: true,
        };
        let skrrt = Procedure {
            id: 1,
            name: String::from("skrrt"),
            parameters: vec![],
            variadic: false,
            builtin: true,
        };

        let globals = vec![
            ("num", Entity::Type(Type::Num)),
            ("bool", Entity::Type(Type::Bool)),
            ("string", Entity::Type(Type::String)),
            ("print", Entity::Procedure(Rc::new(print))),
            ("skrrt", Entity::Procedure(Rc::new(skrrt))),
        ];

        let list_methods = [
            BuiltinMethod::Length,
            BuiltinMethod::Add,
            BuiltinMethod::Preadd,
            BuiltinMethod::InsertAt,
        ]
        .into_iter()
        .map(|method| (method.name(), method))
        .collect();

        let string_methods = [BuiltinMethod::SymbolCount]
            .into_iter()
            .map(|method| (method.name(), method))
            .collect();

        Stdlib {
            globals,
            list_methods,
            string_methods,
        }
    }

    pub fn globals(&self) -> impl Iterator<Item = (&str, &Entity)> {
        self.globals.iter().map(|(name, entity)| (*name, entity))
    }

    /// The method `name` on a receiver of type `receiver`, if there is one.
    pub fn method(&self, receiver: &Type, name: &str) -> Option<BuiltinMethod> {
        match receiver {
            Type::List(_) => self.list_methods.get(name).copied(),
            Type::String => self.string_methods.get(name).copied(),
            _ => None,
        }
    }
}
