#![allow(clippy::module_inception)]

use std::rc::Rc;

use tracing::debug;

use crate::{
    errors::errors::{Error, ErrorTip},
    optimizer::optimizer::OptimizerConfig,
};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod optimizer;
pub mod parser;
pub mod type_checker;

extern crate regex;

#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// The stage at which [`compile`] stops and what it renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputKind {
    Tokens,
    Ast,
    Analyzed,
    Optimized,
    Js,
}

/// Runs the pipeline up to `output` and renders that stage as text.
///
/// `config` only affects [`OutputKind::Js`]; the `Optimized` stage always
/// runs the optimizer.
pub fn compile(
    source: &str,
    file: Option<String>,
    output: OutputKind,
    config: &OptimizerConfig,
) -> Result<String, Error> {
    let tokens = lexer::lexer::tokenize(source.to_string(), file.clone())?;
    debug!(count = tokens.len(), "tokenized");
    if output == OutputKind::Tokens {
        return Ok(format!("{:#?}", tokens));
    }

    let file = Rc::new(file.unwrap_or_else(|| String::from("shell")));
    let (_, program) = parser::parser::parse(tokens, file);
    let program = program?;
    debug!(statements = program.statements.len(), "parsed");
    if output == OutputKind::Ast {
        return Ok(format!("{:#?}", program));
    }

    let stdlib = type_checker::stdlib::Stdlib::new();
    let analyzed = type_checker::type_checker::type_check(program, &stdlib)?;
    debug!(statements = analyzed.statements.len(), "analyzed");
    if output == OutputKind::Analyzed {
        return Ok(format!("{:#?}", analyzed));
    }

    let optimized = if config.enabled || output == OutputKind::Optimized {
        optimizer::optimizer::optimize(analyzed)
    } else {
        analyzed
    };
    if output == OutputKind::Optimized {
        return Ok(format!("{:#?}", optimized));
    }

    Ok(compiler::compiler::generate(&optimized))
}

/// Finds the line holding `position` (a byte offset into `content`).
///
/// Returns the 1-based line number, the line's text and the offset of
/// `position` within that line. Offsets past the end clamp to the last line.
pub fn get_line_at_position(content: &str, position: u32) -> (usize, String, usize) {
    let pos = position as usize;

    let mut start = 0;
    let mut line_number = 1;
    let mut last = (1, String::new(), 0);

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return (line_number, line.to_string(), pos - start);
        }

        last = (line_number, line.to_string(), line.trim_end_matches('\n').len());
        start = end;
        line_number += 1;
    }

    last
}

/// Renders `error` as a caret diagnostic against `source`.
pub fn render_error(error: &Error, source: &str) -> String {
    /*
        Error: message
        -> final.pan
           |
        20 | now a: num = #;
           | -------------^
    */

    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        out.push_str(&format!(
            "Error: {} ({})\n",
            error.get_error_name(),
            error.get_tip()
        ));
    }

    let position = match error.get_position() {
        Some(position) => position,
        None => return out,
    };

    let (line, line_text, line_pos) = get_line_at_position(source, position.0);

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    out.push_str(&format!("-> {}:{}:{}\n", position.1, line, line_pos + 1));
    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    out
}

pub fn display_error(error: &Error, source: &str) {
    eprint!("{}", render_error(error, source));
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string.chars().take_while(|c| *c == ' ').count();

    (String::from(&string[start..]), start)
}
