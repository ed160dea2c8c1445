use crate::{
    ast::expressions::BinaryOp,
    type_checker::typed_ast::{Callee, TypedCall, TypedExpr, TypedTemplatePart},
};

use super::{
    compiler::Generator,
    stdlib::{builtin_value, gen_builtin_call, gen_method_call},
};

pub fn gen_expression(generator: &mut Generator, expr: &TypedExpr) -> String {
    match expr {
        TypedExpr::Number(value) => format_number(*value),
        TypedExpr::Bool(value) => value.to_string(),
        TypedExpr::String(value) => quote(value),
        TypedExpr::Template(parts) => gen_template(generator, parts),
        TypedExpr::Variable(variable) => generator.entity_name(variable.id, &variable.name),
        TypedExpr::Function(function) => generator.entity_name(function.id, &function.name),
        TypedExpr::Procedure(procedure) if procedure.builtin => {
            String::from(builtin_value(procedure))
        }
        TypedExpr::Procedure(procedure) => generator.entity_name(procedure.id, &procedure.name),
        TypedExpr::List { elements, .. } => {
            let elements = gen_expressions(generator, elements);
            format!("[{}]", elements.join(","))
        }
        TypedExpr::Binary {
            operator,
            left,
            right,
            ..
        } => gen_binary(generator, *operator, left, right),
        TypedExpr::Unary {
            operator,
            operand,
            postfix,
            ..
        } => {
            let operand = gen_expression(generator, operand);
            let operator = operator.lexeme();
            if *postfix {
                format!("({}){}", operand, operator)
            } else {
                format!("{}({})", operator, operand)
            }
        }
        TypedExpr::Conditional {
            test,
            consequent,
            alternate,
            ..
        } => {
            let test = gen_expression(generator, test);
            let consequent = gen_expression(generator, consequent);
            let alternate = gen_expression(generator, alternate);
            format!("({} ? {} : {})", test, consequent, alternate)
        }
        TypedExpr::Index { list, index, .. } => {
            let list = gen_expression(generator, list);
            let index = gen_expression(generator, index);
            format!("{}[{}]", list, index)
        }
        TypedExpr::Member { object, field, .. } => {
            let object = gen_expression(generator, object);
            format!("({}[{}])", object, quote(field))
        }
        TypedExpr::Call { call, .. } => gen_call(generator, call),
    }
}

fn gen_expressions(generator: &mut Generator, exprs: &[TypedExpr]) -> Vec<String> {
    exprs
        .iter()
        .map(|expr| gen_expression(generator, expr))
        .collect()
}

pub fn gen_call(generator: &mut Generator, call: &TypedCall) -> String {
    match &call.callee {
        Callee::Procedure(procedure) if procedure.builtin => {
            let arguments = gen_expressions(generator, &call.arguments);
            gen_builtin_call(procedure, &arguments)
        }
        Callee::Method { receiver, method } => {
            let receiver = gen_expression(generator, receiver);
            let arguments = gen_expressions(generator, &call.arguments);
            gen_method_call(*method, &receiver, &arguments)
        }
        Callee::Constructor(ty) => {
            let name = match ty.object_id() {
                Some(id) => generator.object_name(id),
                None => generator.types.describe(ty),
            };
            let arguments = gen_expressions(generator, &call.arguments);
            format!("new {}({})", name, arguments.join(", "))
        }
        Callee::Function(function) => {
            let callee = generator.entity_name(function.id, &function.name);
            gen_plain_call(generator, callee, &call.arguments)
        }
        Callee::Procedure(procedure) => {
            let callee = generator.entity_name(procedure.id, &procedure.name);
            gen_plain_call(generator, callee, &call.arguments)
        }
        Callee::Value(value) => {
            let callee = gen_expression(generator, value);
            gen_plain_call(generator, callee, &call.arguments)
        }
    }
}

fn gen_plain_call(generator: &mut Generator, callee: String, arguments: &[TypedExpr]) -> String {
    let arguments = gen_expressions(generator, arguments);
    format!("{}({})", callee, arguments.join(", "))
}

fn gen_binary(
    generator: &mut Generator,
    operator: BinaryOp,
    left: &TypedExpr,
    right: &TypedExpr,
) -> String {
    let left_js = gen_expression(generator, left);
    let right_js = gen_expression(generator, right);

    match operator {
        BinaryOp::FloorDivide => format!("Math.floor(({} / {}))", left_js, right_js),
        BinaryOp::In => format!("{}.includes({})", right_js, left_js),
        BinaryOp::Subset => format!("{}.every((e) => {}.includes(e))", left_js, right_js),
        BinaryOp::ProperSubset => format!(
            "({}.every((e) => {}.includes(e)) && {}.length < {}.length)",
            left_js, right_js, left_js, right_js
        ),
        // JavaScript rejects a unary expression as the base of `**`.
        BinaryOp::Power if is_signed(left) => format!("(({}) ** {})", left_js, right_js),
        _ => format!("({} {} {})", left_js, js_operator(operator), right_js),
    }
}

fn is_signed(expr: &TypedExpr) -> bool {
    match expr {
        TypedExpr::Unary { postfix, .. } => !postfix,
        TypedExpr::Number(value) => value.is_sign_negative() && *value != 0.0,
        _ => false,
    }
}

fn js_operator(operator: BinaryOp) -> &'static str {
    match operator {
        BinaryOp::Equals | BinaryOp::Is => "===",
        BinaryOp::NotEquals => "!==",
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
        BinaryOp::Power => "**",
        other => other.lexeme(),
    }
}

fn gen_template(generator: &mut Generator, parts: &[TypedTemplatePart]) -> String {
    let mut out = String::from("`");

    for part in parts {
        match part {
            TypedTemplatePart::Text(text) => {
                out.push_str(
                    &text
                        .replace('\\', "\\\\")
                        .replace('`', "\\`")
                        .replace("${", "\\${"),
                );
            }
            TypedTemplatePart::Interpolation(expr) => {
                let expr = gen_expression(generator, expr);
                out.push_str(&format!("${{{}}}", expr));
            }
        }
    }

    out.push('`');
    out
}

/// A double-quoted JavaScript string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');

    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }

    out.push('"');
    out
}

/// Formats `value` the way JavaScript's `String(value)` does.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return String::from("NaN");
    }
    if value.is_infinite() {
        return String::from(if value > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if value == 0.0 {
        return String::from("0");
    }

    if (1e-6..1e21).contains(&value.abs()) {
        return value.to_string();
    }

    let exponential = format!("{:e}", value);
    match exponential.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => exponential,
    }
}
