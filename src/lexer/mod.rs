//! Lexical analysis module for the compiler.
//!
//! This module contains the lexer (tokenizer) that converts Pandemonium
//! source into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using an ordered table of regex patterns
//! - Recognition of keywords, identifiers, literals, and operators
//! - String escapes and raw template literals
//! - Token position tracking for error reporting
//! - `$` comments and whitespace

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
