//! Error types and error handling for the compiler.
//!
//! This module defines the error type shared by every compilation stage:
//!
//! - Lexer and parser failures, carrying the offending token
//! - The uniform semantic error raised by the analyzer, distinguished only by its message
//! - An optional source position for diagnostics
//!
//! Every stage stops at its first error; there is no recovery.

pub mod errors;

#[cfg(test)]
mod tests;
