use std::{collections::HashSet, rc::Rc};

use tracing::debug;

use crate::{
    ast::{
        ast::{Expr, Program, Stmt},
        expressions::{
            BinaryExpr, CallExpr, ConditionalExpr, IndexExpr, ListExpr, MemberExpr,
            OperatorClass, TemplatePart, UnaryExpr, UnaryOp,
        },
        statements::{
            AssignOp, AssignmentStmt, BlockStmt, ElseBranch, FnDeclStmt, ForEachStmt, ForStmt,
            IfStmt, IncrementStmt, ObjectDeclStmt, Parameter, ProcDeclStmt, VarDeclStmt,
            YeetStmt,
        },
        types::TypeAnnotation,
    },
    errors::errors::Error,
    optimizer::optimizer::fold,
    Span,
};

use super::{
    context::{Context, Overrides, Subroutine},
    entities::{Entity, Function, Procedure, Variable, FIRST_USER_ID},
    stdlib::Stdlib,
    typed_ast::{
        Callee, TypedBlock, TypedCall, TypedElse, TypedExpr, TypedIf, TypedProgram, TypedStmt,
        TypedTemplatePart,
    },
    types::{Field, ObjectId, Type, TypeTable},
};

fn error(message: impl Into<String>, span: &Span) -> Error {
    Error::semantic(message, Some(span.start.clone()))
}

/// The value of `expr` when it is built from numeric literals alone.
fn constant_number(expr: &TypedExpr) -> Option<f64> {
    match expr {
        TypedExpr::Number(value) => Some(*value),
        TypedExpr::Unary {
            operator: UnaryOp::Negate,
            operand,
            ..
        } => constant_number(operand).map(|value| -value),
        TypedExpr::Binary {
            operator,
            left,
            right,
            ..
        } => fold(*operator, constant_number(left)?, constant_number(right)?)?.as_number(),
        _ => None,
    }
}

/// What a call resolves to before its arguments are checked.
struct CallTarget {
    callee: Callee,
    /// `None` accepts any arguments.
    parameters: Option<Vec<Type>>,
    /// `None` for procedures.
    return_type: Option<Type>,
}

/// Analyzes a program, stopping at the first semantic error.
pub fn type_check(program: Program, stdlib: &Stdlib) -> Result<TypedProgram, Error> {
    let mut type_checker = TypeChecker::new(stdlib);
    let mut root = Context::root(stdlib);

    let statements = type_checker.check_stmts(&mut root, &program.statements)?;
    debug!(
        statements = statements.len(),
        objects = type_checker.types.len(),
        "type checked"
    );

    Ok(TypedProgram {
        statements,
        types: type_checker.types,
    })
}

#[derive(Debug)]
pub struct TypeChecker<'s> {
    stdlib: &'s Stdlib,
    types: TypeTable,
    next_id: usize,
}

impl<'s> TypeChecker<'s> {
    pub fn new(stdlib: &'s Stdlib) -> Self {
        TypeChecker {
            stdlib,
            types: TypeTable::new(),
            next_id: FIRST_USER_ID,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Struct and class names are registered before any statement of the
    /// sequence is checked, so they may be mentioned ahead of their
    /// declaration.
    fn check_stmts(
        &mut self,
        context: &mut Context<'_>,
        statements: &[Stmt],
    ) -> Result<Vec<TypedStmt>, Error> {
        for statement in statements {
            if let Stmt::ObjectDecl(decl) = statement {
                self.hoist(context, decl)?;
            }
        }

        statements
            .iter()
            .map(|statement| self.check_stmt(context, statement))
            .collect()
    }

    fn hoist(&mut self, context: &mut Context<'_>, decl: &ObjectDeclStmt) -> Result<ObjectId, Error> {
        let id = self.types.declare(&decl.name, decl.kind);
        context.bind(&decl.name, Entity::Type(self.types.type_of(id)), &decl.span)?;
        Ok(id)
    }

    fn check_block(
        &mut self,
        context: &mut Context<'_>,
        block: &BlockStmt,
    ) -> Result<TypedBlock, Error> {
        Ok(TypedBlock {
            statements: self.check_stmts(context, &block.body)?,
        })
    }

    fn check_stmt(&mut self, context: &mut Context<'_>, statement: &Stmt) -> Result<TypedStmt, Error> {
        match statement {
            Stmt::VarDecl(decl) => {
                let (variable, initializer) = self.check_var_decl(context, decl)?;
                Ok(TypedStmt::VarDecl {
                    variable,
                    initializer,
                })
            }
            Stmt::FnDecl(decl) => self.check_fn_decl(context, decl),
            Stmt::ProcDecl(decl) => self.check_proc_decl(context, decl),
            Stmt::ObjectDecl(decl) => self.check_object_decl(context, decl),
            Stmt::Assignment(assignment) => self.check_assignment(context, assignment),
            Stmt::Increment(increment) => self.check_increment(context, increment),
            Stmt::Call(stmt) => match &stmt.call {
                Expr::Call(call) => {
                    let (call, _) = self.check_call(context, call)?;
                    Ok(TypedStmt::Call(call))
                }
                _ => Err(error("Call of non-function or non-constructor", &stmt.span)),
            },
            Stmt::If(stmt) => Ok(TypedStmt::If(self.check_if(context, stmt)?)),
            Stmt::While(stmt) => {
                let test = self.check_expr(context, &stmt.condition, None)?;
                self.expect_boolean(&test.ty(), stmt.condition.get_span())?;

                let mut child = context.child(Overrides::looping());
                let body = self.check_block(&mut child, &stmt.body)?;

                Ok(TypedStmt::While { test, body })
            }
            Stmt::For(stmt) => self.check_for(context, stmt),
            Stmt::ForEach(stmt) => self.check_for_each(context, stmt),
            Stmt::Yeet(stmt) => self.check_yeet(context, stmt),
            Stmt::Nope(stmt) => {
                if !context.in_loop() {
                    return Err(error("Nope can only appear in a loop", &stmt.span));
                }
                Ok(TypedStmt::Nope)
            }
        }
    }

    /// The variable is bound only after its initializer is checked, so an
    /// initializer cannot mention the name being declared.
    fn check_var_decl(
        &mut self,
        context: &mut Context<'_>,
        decl: &VarDeclStmt,
    ) -> Result<(Rc<Variable>, TypedExpr), Error> {
        let ty = self.resolve_type(context, &decl.explicit_type)?;

        let initializer = match &decl.assigned_value {
            Expr::List(list) if list.elements.is_empty() => {
                if ty.element_type().is_none() {
                    return Err(error("List type expected", decl.explicit_type.get_span()));
                }
                TypedExpr::List {
                    elements: vec![],
                    ty: ty.clone(),
                }
            }
            value => {
                let initializer = self.check_expr(context, value, Some(&ty))?;
                self.expect_same(&ty, &initializer.ty(), value.get_span())?;
                initializer
            }
        };

        let variable = Rc::new(Variable {
            id: self.next_id(),
            name: decl.identifier.clone(),
            ty,
            read_only: decl.is_constant,
        });
        context.bind(&decl.identifier, Entity::Variable(variable.clone()), &decl.span)?;

        Ok((variable, initializer))
    }

    fn check_parameters(
        &mut self,
        context: &Context<'_>,
        parameters: &[Parameter],
    ) -> Result<Vec<Rc<Variable>>, Error> {
        parameters
            .iter()
            .map(|parameter| -> Result<Rc<Variable>, Error> {
                Ok(Rc::new(Variable {
                    id: self.next_id(),
                    name: parameter.name.clone(),
                    ty: self.resolve_type(context, &parameter.ty)?,
                    read_only: false,
                }))
            })
            .collect()
    }

    fn bind_parameters(
        context: &mut Context<'_>,
        variables: &[Rc<Variable>],
        parameters: &[Parameter],
    ) -> Result<(), Error> {
        for (variable, parameter) in variables.iter().zip(parameters) {
            context.bind(
                &variable.name,
                Entity::Variable(variable.clone()),
                &parameter.span,
            )?;
        }
        Ok(())
    }

    /// The name is bound before the body is checked so the body may recurse.
    fn check_fn_decl(&mut self, context: &mut Context<'_>, decl: &FnDeclStmt) -> Result<TypedStmt, Error> {
        let return_type = self.resolve_type(context, &decl.return_type)?;
        let parameters = self.check_parameters(context, &decl.parameters)?;

        let function = Rc::new(Function {
            id: self.next_id(),
            name: decl.identifier.clone(),
            parameters,
            return_type,
        });
        context.bind(&decl.identifier, Entity::Function(function.clone()), &decl.span)?;
        debug!(
            name = %function.name,
            signature = %self.types.describe(&function.signature()),
            "declared function"
        );

        let mut child = context.child(Overrides::subroutine(Subroutine::Function(
            function.clone(),
        )));
        Self::bind_parameters(&mut child, &function.parameters, &decl.parameters)?;
        let body = self.check_block(&mut child, &decl.body)?;

        Ok(TypedStmt::FnDecl { function, body })
    }

    fn check_proc_decl(
        &mut self,
        context: &mut Context<'_>,
        decl: &ProcDeclStmt,
    ) -> Result<TypedStmt, Error> {
        let parameters = self.check_parameters(context, &decl.parameters)?;

        let procedure = Rc::new(Procedure {
            id: self.next_id(),
            name: decl.identifier.clone(),
            parameters,
            variadic: false,
            builtin: false,
        });
        context.bind(&decl.identifier, Entity::Procedure(procedure.clone()), &decl.span)?;
        debug!(
            name = %procedure.name,
            signature = %self.types.describe(&procedure.signature()),
            "declared procedure"
        );

        let mut child = context.child(Overrides::subroutine(Subroutine::Procedure(
            procedure.clone(),
        )));
        Self::bind_parameters(&mut child, &procedure.parameters, &decl.parameters)?;
        let body = self.check_block(&mut child, &decl.body)?;

        Ok(TypedStmt::ProcDecl { procedure, body })
    }

    fn check_object_decl(
        &mut self,
        context: &mut Context<'_>,
        decl: &ObjectDeclStmt,
    ) -> Result<TypedStmt, Error> {
        let hoisted = match context.local(&decl.name) {
            Some(Entity::Type(ty)) => ty.object_id(),
            _ => None,
        };
        let id = match hoisted {
            Some(id) => id,
            None => self.hoist(context, decl)?,
        };

        let mut fields = Vec::with_capacity(decl.fields.len());
        for field in &decl.fields {
            fields.push(Field {
                name: field.name.clone(),
                ty: self.resolve_type(context, &field.ty)?,
            });
        }

        let mut seen = HashSet::new();
        for field in &decl.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(error("Fields must be distinct", &field.span));
            }
        }

        // Only a field of exactly this type is rejected; `[S]` and mutual
        // references go through.
        for (field, ast) in fields.iter().zip(&decl.fields) {
            if field.ty.object_id() == Some(id) {
                return Err(error(
                    "Struct and class types must not be recursive",
                    &ast.span,
                ));
            }
        }

        self.types.complete(id, fields);
        debug!(name = %decl.name, kind = ?decl.kind, %id, "declared object type");

        Ok(TypedStmt::ObjectDecl(id))
    }

    fn check_assignment(
        &mut self,
        context: &Context<'_>,
        stmt: &AssignmentStmt,
    ) -> Result<TypedStmt, Error> {
        let target = self.check_expr(context, &stmt.target, None)?;
        if !target.is_place() {
            return Err(error("Invalid assignment target", stmt.target.get_span()));
        }

        let target_type = target.ty();
        let value = self.check_expr(context, &stmt.value, Some(&target_type))?;

        if stmt.operator != AssignOp::Assign {
            self.expect_number(&target_type, stmt.target.get_span())?;
        }
        self.expect_assignable(&value.ty(), &target_type, stmt.value.get_span())?;
        self.expect_writable(&target, &stmt.span)?;

        Ok(TypedStmt::Assignment {
            target,
            operator: stmt.operator,
            value,
        })
    }

    fn check_increment(
        &mut self,
        context: &Context<'_>,
        stmt: &IncrementStmt,
    ) -> Result<TypedStmt, Error> {
        let target = self.check_expr(context, &stmt.target, None)?;
        self.expect_numeric_place(&target, stmt.target.get_span())?;

        Ok(TypedStmt::Increment {
            target,
            decrement: stmt.decrement,
            prefix: stmt.prefix,
        })
    }

    fn check_if(&mut self, context: &Context<'_>, stmt: &IfStmt) -> Result<TypedIf, Error> {
        let test = self.check_expr(context, &stmt.condition, None)?;
        self.expect_boolean(&test.ty(), stmt.condition.get_span())?;

        let mut child = context.child(Overrides::none());
        let consequent = self.check_block(&mut child, &stmt.then_body)?;

        let alternate = match &stmt.else_body {
            None => None,
            Some(ElseBranch::Block(block)) => {
                let mut child = context.child(Overrides::none());
                Some(TypedElse::Block(self.check_block(&mut child, block)?))
            }
            Some(ElseBranch::If(nested)) => {
                Some(TypedElse::If(Box::new(self.check_if(context, nested)?)))
            }
        };

        Ok(TypedIf {
            test,
            consequent,
            alternate,
        })
    }

    /// `for (now i: num = 0; i < n and ok; i++)`. The loop test must be a
    /// binary expression whose two operands are both boolean.
    fn check_for(&mut self, context: &Context<'_>, stmt: &ForStmt) -> Result<TypedStmt, Error> {
        let decl = &stmt.iterator;
        let ty = self.resolve_type(context, &decl.explicit_type)?;
        let initializer = self.check_expr(context, &decl.assigned_value, Some(&ty))?;
        self.expect_number(&initializer.ty(), decl.assigned_value.get_span())?;
        self.expect_same(&ty, &initializer.ty(), decl.explicit_type.get_span())?;

        let iterator = Rc::new(Variable {
            id: self.next_id(),
            name: decl.identifier.clone(),
            ty,
            read_only: decl.is_constant,
        });

        let mut child = context.child(Overrides::looping());
        child.bind(&iterator.name, Entity::Variable(iterator.clone()), &decl.span)?;

        let test = self.check_expr(&child, &stmt.test, None)?;
        let test_span = stmt.test.get_span();
        match &test {
            TypedExpr::Binary { left, right, .. } => {
                self.expect_boolean(&left.ty(), test_span)?;
                self.expect_boolean(&right.ty(), test_span)?;
            }
            other => self.expect_boolean(&other.ty(), test_span)?,
        }

        let increment = self.check_expr(&child, &stmt.increment, None)?;
        self.expect_number(&increment.ty(), stmt.increment.get_span())?;

        let body = self.check_block(&mut child, &stmt.body)?;

        Ok(TypedStmt::For {
            iterator,
            initializer,
            test,
            increment,
            body,
        })
    }

    /// `for (now k: T = e; j in source)`. The iterator `j` is read-only and
    /// visible to the production declaration and the body.
    fn check_for_each(
        &mut self,
        context: &Context<'_>,
        stmt: &ForEachStmt,
    ) -> Result<TypedStmt, Error> {
        let source = self.check_expr(context, &stmt.source, None)?;
        let element = self.expect_list(&source.ty(), stmt.source.get_span())?;

        let iterator = Rc::new(Variable {
            id: self.next_id(),
            name: stmt.iterator.clone(),
            ty: element,
            read_only: true,
        });

        let mut child = context.child(Overrides::looping());
        child.bind(
            &stmt.iterator,
            Entity::Variable(iterator.clone()),
            &stmt.iterator_span,
        )?;

        let (production, production_value) = self.check_var_decl(&mut child, &stmt.production)?;
        let body = self.check_block(&mut child, &stmt.body)?;

        Ok(TypedStmt::ForEach {
            iterator,
            source,
            production,
            production_value,
            body,
        })
    }

    fn check_yeet(&mut self, context: &Context<'_>, stmt: &YeetStmt) -> Result<TypedStmt, Error> {
        match (&stmt.value, context.subroutine()) {
            (Some(value), Some(Subroutine::Function(function))) => {
                let return_type = function.return_type.clone();
                let value_typed = self.check_expr(context, value, Some(&return_type))?;
                self.expect_assignable(&value_typed.ty(), &return_type, value.get_span())?;
                Ok(TypedStmt::Yeet(Some(value_typed)))
            }
            (None, Some(Subroutine::Procedure(_))) => Ok(TypedStmt::Yeet(None)),
            (Some(_), Some(Subroutine::Procedure(_))) => {
                Err(error("Cannot yeet a value from a procedure", &stmt.span))
            }
            (None, Some(Subroutine::Function(_))) => {
                Err(error("Functions must yeet a value", &stmt.span))
            }
            _ => Err(error("Yeet can only appear in a function", &stmt.span)),
        }
    }

    /// `expected` is the type the surrounding construct wants. It is how an
    /// empty list literal gets a type.
    fn check_expr(
        &mut self,
        context: &Context<'_>,
        expr: &Expr,
        expected: Option<&Type>,
    ) -> Result<TypedExpr, Error> {
        match expr {
            Expr::Number(number) => Ok(TypedExpr::Number(number.value)),
            Expr::String(string) => Ok(TypedExpr::String(string.value.clone())),
            Expr::Bool(boolean) => Ok(TypedExpr::Bool(boolean.value)),
            Expr::Template(template) => {
                let mut parts = Vec::with_capacity(template.parts.len());
                for part in &template.parts {
                    parts.push(match part {
                        TemplatePart::Text(text) => TypedTemplatePart::Text(text.clone()),
                        TemplatePart::Interpolation(expr) => {
                            TypedTemplatePart::Interpolation(self.check_expr(context, expr, None)?)
                        }
                    });
                }
                Ok(TypedExpr::Template(parts))
            }
            Expr::Symbol(symbol) => match context.resolve(&symbol.value, &symbol.span)? {
                Entity::Variable(variable) => Ok(TypedExpr::Variable(variable)),
                Entity::Function(function) => Ok(TypedExpr::Function(function)),
                Entity::Procedure(procedure) => Ok(TypedExpr::Procedure(procedure)),
                Entity::Type(_) => Err(error(
                    format!("Expected a value, found type {}", symbol.value),
                    &symbol.span,
                )),
            },
            Expr::List(list) => self.check_list(context, list, expected),
            Expr::Binary(binary) => self.check_binary(context, binary),
            Expr::Unary(unary) => self.check_unary(context, unary),
            Expr::Conditional(conditional) => {
                self.check_conditional(context, conditional, expected)
            }
            Expr::Index(index) => self.check_index(context, index),
            Expr::Member(member) => {
                let object = self.check_expr(context, &member.object, None)?;
                self.check_member(object, member)
            }
            Expr::Call(call) => match self.check_call(context, call)? {
                (call, Some(ty)) => Ok(TypedExpr::Call { call, ty }),
                (_, None) => Err(error("Procedures do not return a value", &call.span)),
            },
        }
    }

    fn check_list(
        &mut self,
        context: &Context<'_>,
        list: &ListExpr,
        expected: Option<&Type>,
    ) -> Result<TypedExpr, Error> {
        let Some(first) = list.elements.first() else {
            return match expected {
                Some(ty @ Type::List(_)) => Ok(TypedExpr::List {
                    elements: vec![],
                    ty: ty.clone(),
                }),
                _ => Err(error("Cannot infer the type of an empty list", &list.span)),
            };
        };

        let hint = expected.and_then(Type::element_type);
        let first = self.check_expr(context, first, hint)?;
        let element_type = first.ty();

        let mut elements = vec![first];
        for element in &list.elements[1..] {
            let typed = self.check_expr(context, element, hint)?;
            if !self.types.is_equivalent(&element_type, &typed.ty()) {
                return Err(error(
                    "Not all elements have the same type",
                    element.get_span(),
                ));
            }
            elements.push(typed);
        }

        Ok(TypedExpr::List {
            elements,
            ty: Type::list_of(element_type),
        })
    }

    fn check_binary(&mut self, context: &Context<'_>, binary: &BinaryExpr) -> Result<TypedExpr, Error> {
        let class = binary.operator.class();

        let left = self.check_expr(context, &binary.left, None)?;
        let left_type = left.ty();
        let hint = match class {
            OperatorClass::Equality | OperatorClass::ListComparison => Some(&left_type),
            _ => None,
        };
        let right = self.check_expr(context, &binary.right, hint)?;
        let right_type = right.ty();

        let (left_span, right_span) = (binary.left.get_span(), binary.right.get_span());
        let ty = match class {
            OperatorClass::Arithmetic => {
                self.expect_number(&left_type, left_span)?;
                self.expect_same(&left_type, &right_type, right_span)?;
                Type::Num
            }
            OperatorClass::Relational => {
                self.expect_number(&left_type, left_span)?;
                self.expect_same(&left_type, &right_type, right_span)?;
                Type::Bool
            }
            OperatorClass::Equality => {
                self.expect_same(&left_type, &right_type, right_span)?;
                Type::Bool
            }
            OperatorClass::Logical => {
                self.expect_boolean(&left_type, left_span)?;
                self.expect_boolean(&right_type, right_span)?;
                Type::Bool
            }
            OperatorClass::ListComparison => {
                self.expect_list(&left_type, left_span)?;
                self.expect_list(&right_type, right_span)?;
                Type::Bool
            }
            OperatorClass::Membership => {
                let element = self.expect_list(&right_type, right_span)?;
                self.expect_same(&element, &left_type, left_span)?;
                Type::Bool
            }
        };

        Ok(TypedExpr::Binary {
            operator: binary.operator,
            left: Box::new(left),
            right: Box::new(right),
            ty,
        })
    }

    fn check_unary(&mut self, context: &Context<'_>, unary: &UnaryExpr) -> Result<TypedExpr, Error> {
        let operand = self.check_expr(context, &unary.operand, None)?;
        let span = unary.operand.get_span();

        let ty = match unary.operator {
            UnaryOp::Not => {
                self.expect_boolean(&operand.ty(), span)?;
                Type::Bool
            }
            UnaryOp::Negate => {
                self.expect_number(&operand.ty(), span)?;
                Type::Num
            }
            UnaryOp::Increment | UnaryOp::Decrement => {
                self.expect_numeric_place(&operand, span)?;
                Type::Num
            }
        };

        Ok(TypedExpr::Unary {
            operator: unary.operator,
            operand: Box::new(operand),
            postfix: unary.postfix,
            ty,
        })
    }

    fn check_conditional(
        &mut self,
        context: &Context<'_>,
        conditional: &ConditionalExpr,
        expected: Option<&Type>,
    ) -> Result<TypedExpr, Error> {
        let test = self.check_expr(context, &conditional.test, None)?;
        self.expect_boolean(&test.ty(), conditional.test.get_span())?;

        let consequent = self.check_expr(context, &conditional.consequent, expected)?;
        let ty = consequent.ty();
        let alternate = self.check_expr(context, &conditional.alternate, Some(expected.unwrap_or(&ty)))?;
        self.expect_same(&ty, &alternate.ty(), conditional.alternate.get_span())?;

        Ok(TypedExpr::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            ty,
        })
    }

    fn check_index(&mut self, context: &Context<'_>, index: &IndexExpr) -> Result<TypedExpr, Error> {
        let list = self.check_expr(context, &index.list, None)?;
        let ty = self.expect_list(&list.ty(), index.list.get_span())?;

        let position = self.check_expr(context, &index.index, None)?;
        // Indices built from literals alone must be whole; others only numeric.
        let integral = match constant_number(&position) {
            Some(value) => value.fract() == 0.0,
            None => position.ty() == Type::Num,
        };
        if !integral {
            return Err(error(
                "Lists can only be indexed into by integers",
                index.index.get_span(),
            ));
        }

        Ok(TypedExpr::Index {
            list: Box::new(list),
            index: Box::new(position),
            ty,
        })
    }

    fn check_member(&self, object: TypedExpr, member: &MemberExpr) -> Result<TypedExpr, Error> {
        let id = match object.ty() {
            Type::Struct(id) | Type::Class(id) => id,
            _ => return Err(error("No such field", &member.span)),
        };

        let declared = self.types.object(id);
        if !declared.complete {
            return Err(error(
                format!("Type {} used before its declaration", declared.name),
                &member.span,
            ));
        }

        let ty = match declared.field(&member.field) {
            Some(field) => field.ty.clone(),
            None => return Err(error("No such field", &member.span)),
        };

        Ok(TypedExpr::Member {
            object: Box::new(object),
            field: member.field.clone(),
            ty,
        })
    }

    /// Returns the checked call and, unless it calls a procedure, its result type.
    fn check_call(
        &mut self,
        context: &Context<'_>,
        call: &CallExpr,
    ) -> Result<(TypedCall, Option<Type>), Error> {
        let target = self.check_callee(context, call)?;

        let arguments = match &target.parameters {
            None => call
                .arguments
                .iter()
                .map(|argument| self.check_expr(context, argument, None))
                .collect::<Result<Vec<_>, _>>()?,
            Some(parameters) => {
                if parameters.len() != call.arguments.len() {
                    return Err(error(
                        format!(
                            "{} argument(s) required but {} passed",
                            parameters.len(),
                            call.arguments.len()
                        ),
                        &call.span,
                    ));
                }

                let mut arguments = Vec::with_capacity(parameters.len());
                for (argument, parameter) in call.arguments.iter().zip(parameters) {
                    let typed = self.check_expr(context, argument, Some(parameter))?;
                    self.expect_assignable(&typed.ty(), parameter, argument.get_span())?;
                    arguments.push(typed);
                }
                arguments
            }
        };

        Ok((
            TypedCall {
                callee: target.callee,
                arguments,
            },
            target.return_type,
        ))
    }

    fn check_callee(&mut self, context: &Context<'_>, call: &CallExpr) -> Result<CallTarget, Error> {
        match &*call.callee {
            Expr::Symbol(symbol) => match context.resolve(&symbol.value, &symbol.span)? {
                Entity::Type(ty) => {
                    let Some(id) = ty.object_id() else {
                        return Err(error("Call of non-function or non-constructor", &call.span));
                    };
                    let object = self.types.object(id);
                    if !object.complete {
                        return Err(error(
                            format!("Type {} used before its declaration", object.name),
                            &symbol.span,
                        ));
                    }

                    Ok(CallTarget {
                        parameters: Some(object.fields.iter().map(|f| f.ty.clone()).collect()),
                        callee: Callee::Constructor(ty.clone()),
                        return_type: Some(ty),
                    })
                }
                Entity::Function(function) => Ok(CallTarget {
                    parameters: Some(function.parameters.iter().map(|p| p.ty.clone()).collect()),
                    return_type: Some(function.return_type.clone()),
                    callee: Callee::Function(function),
                }),
                Entity::Procedure(procedure) => Ok(CallTarget {
                    parameters: if procedure.variadic {
                        None
                    } else {
                        Some(procedure.parameters.iter().map(|p| p.ty.clone()).collect())
                    },
                    return_type: None,
                    callee: Callee::Procedure(procedure),
                }),
                Entity::Variable(variable) => {
                    Self::value_callee(TypedExpr::Variable(variable), &call.span)
                }
            },
            Expr::Member(member) => {
                let receiver = self.check_expr(context, &member.object, None)?;
                let receiver_type = receiver.ty();

                match self.stdlib.method(&receiver_type, &member.field) {
                    Some(method) => Ok(CallTarget {
                        callee: Callee::Method {
                            receiver: Box::new(receiver),
                            method,
                        },
                        parameters: Some(method.parameters(&receiver_type)),
                        return_type: method.return_type(),
                    }),
                    None => {
                        let value = self.check_member(receiver, member)?;
                        Self::value_callee(value, &call.span)
                    }
                }
            }
            other => {
                let value = self.check_expr(context, other, None)?;
                Self::value_callee(value, &call.span)
            }
        }
    }

    fn value_callee(value: TypedExpr, span: &Span) -> Result<CallTarget, Error> {
        match value.ty() {
            Type::Function {
                parameters,
                return_type,
            } => Ok(CallTarget {
                callee: Callee::Value(Box::new(value)),
                parameters: Some(parameters),
                return_type: Some(*return_type),
            }),
            Type::Procedure { parameters } => Ok(CallTarget {
                callee: Callee::Value(Box::new(value)),
                parameters: Some(parameters),
                return_type: None,
            }),
            _ => Err(error("Call of non-function or non-constructor", span)),
        }
    }

    fn resolve_type(&self, context: &Context<'_>, annotation: &TypeAnnotation) -> Result<Type, Error> {
        match annotation {
            TypeAnnotation::Symbol { name, span } => match context.resolve(name, span)? {
                Entity::Type(ty) => Ok(ty),
                _ => Err(error("Type expected", span)),
            },
            TypeAnnotation::List { base, .. } => Ok(Type::list_of(self.resolve_type(context, base)?)),
            TypeAnnotation::Function {
                parameters,
                return_type,
                ..
            } => Ok(Type::Function {
                parameters: self.resolve_types(context, parameters)?,
                return_type: Box::new(self.resolve_type(context, return_type)?),
            }),
            TypeAnnotation::Procedure { parameters, .. } => Ok(Type::Procedure {
                parameters: self.resolve_types(context, parameters)?,
            }),
        }
    }

    fn resolve_types(
        &self,
        context: &Context<'_>,
        annotations: &[TypeAnnotation],
    ) -> Result<Vec<Type>, Error> {
        annotations
            .iter()
            .map(|annotation| self.resolve_type(context, annotation))
            .collect()
    }

    fn expect_number(&self, ty: &Type, span: &Span) -> Result<(), Error> {
        match ty {
            Type::Num => Ok(()),
            _ => Err(error("Expected a number", span)),
        }
    }

    fn expect_boolean(&self, ty: &Type, span: &Span) -> Result<(), Error> {
        match ty {
            Type::Bool => Ok(()),
            _ => Err(error("Expected a boolean", span)),
        }
    }

    /// Returns the element type.
    fn expect_list(&self, ty: &Type, span: &Span) -> Result<Type, Error> {
        match ty {
            Type::List(element) => Ok((**element).clone()),
            _ => Err(error("List expected", span)),
        }
    }

    fn expect_same(&self, a: &Type, b: &Type, span: &Span) -> Result<(), Error> {
        if self.types.is_equivalent(a, b) {
            Ok(())
        } else {
            Err(error("Operands do not have the same type", span))
        }
    }

    fn expect_assignable(&self, from: &Type, to: &Type, span: &Span) -> Result<(), Error> {
        if self.types.is_assignable(from, to) {
            Ok(())
        } else {
            Err(error(
                format!(
                    "Cannot assign a {} to a {}",
                    self.types.describe(from),
                    self.types.describe(to)
                ),
                span,
            ))
        }
    }

    /// Subscript and member targets are as writable as the variable they
    /// start from.
    fn expect_writable(&self, target: &TypedExpr, span: &Span) -> Result<(), Error> {
        match target.root_variable() {
            Some(variable) if variable.read_only => Err(error(
                format!("Cannot assign to constant {}", variable.name),
                span,
            )),
            _ => Ok(()),
        }
    }

    fn expect_numeric_place(&self, target: &TypedExpr, span: &Span) -> Result<(), Error> {
        if !target.is_place() {
            return Err(error("Invalid assignment target", span));
        }
        self.expect_number(&target.ty(), span)?;
        self.expect_writable(target, span)
    }
}
