//! Main generator module.
//!
//! This module contains the [`Generator`] that holds the state of one
//! translation: the name table, the lines written so far and the current
//! indentation. Statements write lines; expressions return strings.

use std::collections::HashMap;

use tracing::debug;

use crate::type_checker::{
    typed_ast::TypedProgram,
    types::{ObjectId, TypeTable},
};

use super::stmt::gen_statement;

const INDENT: &str = "  ";

/// What a generated name stands for. Entities and object types are numbered
/// from separate id spaces, so both are keys here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum NameKey {
    Entity(usize),
    Object(ObjectId),
}

/// State of one translation to JavaScript.
///
/// Every user-declared name is emitted as `name_n`, where `n` counts the
/// distinct entities seen so far. Pandemonium names can collide with
/// JavaScript reserved words; suffixed names cannot.
pub struct Generator<'a> {
    /// Object types of the program being generated
    pub types: &'a TypeTable,

    names: HashMap<NameKey, usize>,
    output: Vec<String>,
    indent: usize,
}

impl<'a> Generator<'a> {
    pub fn new(types: &'a TypeTable) -> Self {
        Generator {
            types,
            names: HashMap::new(),
            output: Vec::new(),
            indent: 0,
        }
    }

    fn name(&mut self, key: NameKey, name: &str) -> String {
        let next = self.names.len() + 1;
        let suffix = *self.names.entry(key).or_insert(next);
        format!("{}_{}", name, suffix)
    }

    /// The JavaScript name of the variable, function or procedure `id`.
    pub fn entity_name(&mut self, id: usize, name: &str) -> String {
        self.name(NameKey::Entity(id), name)
    }

    /// The JavaScript class name of object type `id`.
    pub fn object_name(&mut self, id: ObjectId) -> String {
        let types = self.types;
        self.name(NameKey::Object(id), &types.object(id).name)
    }

    /// Writes one line at the current indentation.
    pub fn emit(&mut self, line: impl AsRef<str>) {
        self.output
            .push(format!("{}{}", INDENT.repeat(self.indent), line.as_ref()));
    }

    /// Runs `body` one level deeper.
    pub fn indented(&mut self, body: impl FnOnce(&mut Self)) {
        self.indent += 1;
        body(self);
        self.indent -= 1;
    }

    pub fn finish(self) -> String {
        self.output.join("\n")
    }
}

/// Translates `program` to JavaScript source, one statement per line.
pub fn generate(program: &TypedProgram) -> String {
    let mut generator = Generator::new(&program.types);

    for statement in &program.statements {
        gen_statement(&mut generator, statement);
    }

    debug!(
        lines = generator.output.len(),
        names = generator.names.len(),
        "generated"
    );

    generator.finish()
}
