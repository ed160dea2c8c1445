use std::{collections::HashMap, rc::Rc};

use tracing::trace;

use crate::{errors::errors::Error, Span};

use super::{
    entities::{Entity, Function, Procedure},
    stdlib::Stdlib,
};

/// The function or procedure whose body is being analyzed.
#[derive(Debug, Clone, PartialEq)]
pub enum Subroutine {
    Function(Rc<Function>),
    Procedure(Rc<Procedure>),
}

/// Flags a child scope changes relative to its parent.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    in_loop: Option<bool>,
    subroutine: Option<Subroutine>,
}

impl Overrides {
    pub fn none() -> Self {
        Overrides::default()
    }

    pub fn looping() -> Self {
        Overrides {
            in_loop: Some(true),
            subroutine: None,
        }
    }

    /// A subroutine body is never inside the loop that surrounds the declaration.
    pub fn subroutine(subroutine: Subroutine) -> Self {
        Overrides {
            in_loop: Some(false),
            subroutine: Some(subroutine),
        }
    }
}

/// One lexical scope. Scopes only ever look upward, so a child borrows its
/// parent for as long as the child is alive.
#[derive(Debug)]
pub struct Context<'a> {
    parent: Option<&'a Context<'a>>,
    locals: HashMap<String, Entity>,
    in_loop: bool,
    subroutine: Option<Subroutine>,
}

impl Context<'static> {
    pub fn root(stdlib: &Stdlib) -> Self {
        let locals = stdlib
            .globals()
            .map(|(name, entity)| (String::from(name), entity.clone()))
            .collect();

        Context {
            parent: None,
            locals,
            in_loop: false,
            subroutine: None,
        }
    }
}

impl<'a> Context<'a> {
    pub fn child(&self, overrides: Overrides) -> Context<'_> {
        Context {
            parent: Some(self),
            locals: HashMap::new(),
            in_loop: overrides.in_loop.unwrap_or(self.in_loop),
            subroutine: overrides.subroutine.or_else(|| self.subroutine.clone()),
        }
    }

    /// Whether `name` is visible from this scope.
    pub fn declares(&self, name: &str) -> bool {
        self.locals.contains_key(name) || self.parent.is_some_and(|parent| parent.declares(name))
    }

    /// Binds `name` here. Names may not shadow anything visible.
    pub fn bind(&mut self, name: &str, entity: Entity, span: &Span) -> Result<(), Error> {
        if self.declares(name) {
            return Err(Error::semantic(
                format!("Identifier {} already declared", name),
                Some(span.start.clone()),
            ));
        }

        trace!(name, kind = entity.kind(), "bind");
        self.locals.insert(String::from(name), entity);
        Ok(())
    }

    pub fn resolve(&self, name: &str, span: &Span) -> Result<Entity, Error> {
        match self.lookup(name) {
            Some(entity) => {
                trace!(name, kind = entity.kind(), "resolve");
                Ok(entity.clone())
            }
            None => Err(Error::semantic(
                format!("Identifier {} not declared", name),
                Some(span.start.clone()),
            )),
        }
    }

    fn lookup(&self, name: &str) -> Option<&Entity> {
        match self.locals.get(name) {
            Some(entity) => Some(entity),
            None => self.parent.and_then(|parent| parent.lookup(name)),
        }
    }

    /// Only this scope's own bindings.
    pub fn local(&self, name: &str) -> Option<&Entity> {
        self.locals.get(name)
    }

    pub fn in_loop(&self) -> bool {
        self.in_loop
    }

    pub fn in_function(&self) -> bool {
        matches!(self.subroutine, Some(Subroutine::Function(_)))
    }

    pub fn subroutine(&self) -> Option<&Subroutine> {
        self.subroutine.as_ref()
    }
}
