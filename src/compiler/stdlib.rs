//! Standard library translation.
//!
//! Built-in procedures and methods have no declaration in the generated
//! program; each call is replaced by the JavaScript that does the same thing.

use crate::type_checker::{entities::Procedure, stdlib::BuiltinMethod};

/// The JavaScript value standing in for a built-in procedure used as a value.
pub fn builtin_value(procedure: &Procedure) -> &'static str {
    match procedure.name.as_str() {
        "skrrt" => "process.exit",
        _ => "console.log",
    }
}

/// A call to a built-in procedure, given already generated arguments.
pub fn gen_builtin_call(procedure: &Procedure, arguments: &[String]) -> String {
    match procedure.name.as_str() {
        "skrrt" => String::from("process.exit()"),
        _ => format!("console.log({})", arguments.join(", ")),
    }
}

pub fn gen_method_call(method: BuiltinMethod, receiver: &str, arguments: &[String]) -> String {
    match (method, arguments) {
        (BuiltinMethod::Length, _) => format!("({}).length", receiver),
        (BuiltinMethod::SymbolCount, _) => format!("[...{}].length", receiver),
        (BuiltinMethod::Add, _) => format!("{}.push({})", receiver, arguments.join(", ")),
        (BuiltinMethod::Preadd, _) => format!("{}.unshift({})", receiver, arguments.join(", ")),
        (BuiltinMethod::InsertAt, [index, value]) => {
            format!("{}.splice({}, 0, {})", receiver, index, value)
        }
        (BuiltinMethod::InsertAt, _) => format!("{}.splice({})", receiver, arguments.join(", ")),
    }
}
