//! Optimization over the typed tree.
//!
//! The optimizer is a pure function from one [`TypedProgram`] to another:
//! it never fails and running it twice gives the same result as running it
//! once.
//!
//! [`TypedProgram`]: crate::type_checker::typed_ast::TypedProgram

pub mod optimizer;
