//! Code generation module.
//!
//! This module translates the typed tree into JavaScript source. It handles:
//!
//! - Statements, written line by line with two-space indentation
//! - Expressions, returned as strings
//! - Naming, so every Pandemonium entity gets a unique JavaScript name
//! - Built-in procedures and methods, mapped to their JavaScript equivalents

pub mod compiler;
pub mod expr;
pub mod stdlib;
pub mod stmt;
