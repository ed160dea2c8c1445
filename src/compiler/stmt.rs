use std::rc::Rc;

use crate::type_checker::{
    entities::Variable,
    typed_ast::{TypedBlock, TypedElse, TypedIf, TypedStmt},
    types::ObjectId,
};

use super::{
    compiler::Generator,
    expr::{gen_call, gen_expression, quote},
};

pub fn gen_statement(generator: &mut Generator, statement: &TypedStmt) {
    match statement {
        TypedStmt::VarDecl {
            variable,
            initializer,
        } => {
            let name = variable_name(generator, variable);
            let value = gen_expression(generator, initializer);
            generator.emit(format!("let {} = {};", name, value));
        }
        TypedStmt::FnDecl { function, body } => {
            let name = generator.entity_name(function.id, &function.name);
            gen_subroutine(generator, name, &function.parameters, body);
        }
        TypedStmt::ProcDecl { procedure, body } => {
            let name = generator.entity_name(procedure.id, &procedure.name);
            gen_subroutine(generator, name, &procedure.parameters, body);
        }
        TypedStmt::ObjectDecl(id) => gen_object(generator, *id),
        TypedStmt::Assignment {
            target,
            operator,
            value,
        } => {
            let target = gen_expression(generator, target);
            let value = gen_expression(generator, value);
            generator.emit(format!("{} {} {};", target, operator.lexeme(), value));
        }
        TypedStmt::Increment {
            target,
            decrement,
            prefix,
        } => {
            let target = gen_expression(generator, target);
            let operator = if *decrement { "--" } else { "++" };
            if *prefix {
                generator.emit(format!("{}{};", operator, target));
            } else {
                generator.emit(format!("{}{};", target, operator));
            }
        }
        TypedStmt::Call(call) => {
            let call = gen_call(generator, call);
            generator.emit(format!("{};", call));
        }
        TypedStmt::If(stmt) => {
            let test = gen_expression(generator, &stmt.test);
            generator.emit(format!("if ({}) {{", test));
            gen_if_rest(generator, stmt);
        }
        TypedStmt::While { test, body } => {
            let test = gen_expression(generator, test);
            generator.emit(format!("while ({}) {{", test));
            gen_block(generator, body);
            generator.emit("}");
        }
        TypedStmt::For {
            iterator,
            initializer,
            test,
            increment,
            body,
        } => {
            let iterator = variable_name(generator, iterator);
            let initializer = gen_expression(generator, initializer);
            let test = gen_expression(generator, test);
            let increment = gen_expression(generator, increment);
            generator.emit(format!(
                "for (let {} = {}; {}; {}) {{",
                iterator, initializer, test, increment
            ));
            gen_block(generator, body);
            generator.emit("}");
        }
        TypedStmt::ForEach {
            iterator,
            source,
            production,
            production_value,
            body,
        } => {
            let iterator = variable_name(generator, iterator);
            let source = gen_expression(generator, source);
            generator.emit(format!("for (let {} of {}) {{", iterator, source));
            generator.indented(|generator| {
                let production = variable_name(generator, production);
                let value = gen_expression(generator, production_value);
                generator.emit(format!("let {} = {};", production, value));
            });
            gen_block(generator, body);
            generator.emit("}");
        }
        TypedStmt::Yeet(Some(value)) => {
            let value = gen_expression(generator, value);
            generator.emit(format!("return {};", value));
        }
        TypedStmt::Yeet(None) => generator.emit("return;"),
        TypedStmt::Nope => generator.emit("break;"),
    }
}

fn variable_name(generator: &mut Generator, variable: &Variable) -> String {
    generator.entity_name(variable.id, &variable.name)
}

fn gen_block(generator: &mut Generator, block: &TypedBlock) {
    generator.indented(|generator| {
        for statement in &block.statements {
            gen_statement(generator, statement);
        }
    });
}

/// Everything after the `if (...) {` line of a conditional chain.
fn gen_if_rest(generator: &mut Generator, stmt: &TypedIf) {
    gen_block(generator, &stmt.consequent);

    match &stmt.alternate {
        None => generator.emit("}"),
        Some(TypedElse::Block(block)) => {
            generator.emit("} else {");
            gen_block(generator, block);
            generator.emit("}");
        }
        Some(TypedElse::If(nested)) => {
            let test = gen_expression(generator, &nested.test);
            generator.emit(format!("}} else if ({}) {{", test));
            gen_if_rest(generator, nested);
        }
    }
}

fn gen_subroutine(
    generator: &mut Generator,
    name: String,
    parameters: &[Rc<Variable>],
    body: &TypedBlock,
) {
    let parameters = parameters
        .iter()
        .map(|parameter| variable_name(generator, parameter))
        .collect::<Vec<_>>();

    generator.emit(format!("function {}({}) {{", name, parameters.join(", ")));
    gen_block(generator, body);
    generator.emit("}");
}

/// Structs and classes both become a JavaScript class whose constructor
/// takes the fields in declaration order.
fn gen_object(generator: &mut Generator, id: ObjectId) {
    let types = generator.types;
    let object = types.object(id);
    let name = generator.object_name(id);

    // Field names are only used through string keys, so constructor
    // parameters get positional names.
    let parameters = object
        .fields
        .iter()
        .enumerate()
        .map(|(position, field)| format!("{}_{}", field.name, position + 1))
        .collect::<Vec<_>>();

    generator.emit(format!("class {} {{", name));
    generator.indented(|generator| {
        generator.emit(format!("constructor({}) {{", parameters.join(", ")));
        generator.indented(|generator| {
            for (field, parameter) in object.fields.iter().zip(&parameters) {
                generator.emit(format!("this[{}] = {};", quote(&field.name), parameter));
            }
        });
        generator.emit("}");
    });
    generator.emit("}");
}
