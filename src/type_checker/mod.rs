//! Semantic analysis.
//!
//! This module checks an untyped [`Program`](crate::ast::ast::Program) and
//! produces a [`TypedProgram`](typed_ast::TypedProgram) while:
//!
//! - Resolving every name through a chain of lexical scopes
//! - Computing the type of every expression
//! - Enforcing the typing rules of each statement and operator
//! - Checking call arity and argument assignability
//! - Rejecting misplaced `yeet` and `nope`
//!
//! Analysis stops at the first error.

pub mod context;
pub mod entities;
pub mod stdlib;
pub mod type_checker;
pub mod typed_ast;
pub mod types;

#[cfg(test)]
mod tests;
