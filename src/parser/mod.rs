//! Parser module for building the untyped tree.
//!
//! This module contains the parser that transforms a stream of tokens
//! into an untyped `Program`. It uses a Pratt parser for expressions
//! with proper operator precedence and handles:
//!
//! - Statement parsing (declarations, assignments, control flow)
//! - Expression parsing (binary and unary ops, calls, literals, templates)
//! - Type annotation parsing
//! - Error reporting at the first malformed token
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
