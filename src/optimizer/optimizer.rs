//! Tree rewrites over the typed program.
//!
//! Every rule is applied bottom-up: children are optimized first, then the
//! rule for the parent node looks at the already reduced children. A
//! statement may rewrite to zero or more statements, which are spliced into
//! the enclosing sequence.
//!
//! Rules:
//!
//! - `x = x` is removed; `x += 1` and `x -= 1` become increments
//! - Numeric operations over two literals are folded
//! - Algebraic identities with one literal side (`x + 0`, `1 * x`, `0 - x`, ...)
//! - `and`/`or` with a literal side, `!` on a literal
//! - `if` and `? :` with a literal test keep only the taken branch
//! - `while false` and iteration over an empty literal list are removed
//! - Statements after `nope` in the same sequence are dropped

use tracing::{debug, trace};

use crate::{
    ast::{
        expressions::{BinaryOp, UnaryOp},
        statements::AssignOp,
    },
    type_checker::{
        typed_ast::{
            Callee, TypedBlock, TypedCall, TypedElse, TypedExpr, TypedIf, TypedProgram, TypedStmt,
            TypedTemplatePart,
        },
        types::Type,
    },
};

/// Configuration for the optimizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizerConfig {
    pub enabled: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        OptimizerConfig::all()
    }
}

impl OptimizerConfig {
    pub fn all() -> Self {
        OptimizerConfig { enabled: true }
    }

    pub fn none() -> Self {
        OptimizerConfig { enabled: false }
    }
}

/// Statistics from one optimizer run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptimizerStats {
    /// Literal operations replaced by their result
    pub constants_folded: usize,
    /// Identity and short-circuit rewrites
    pub identities_applied: usize,
    /// `+= 1` and `-= 1` turned into increments
    pub steps_reduced: usize,
    /// Conditionals collapsed to their taken branch
    pub branches_eliminated: usize,
    /// Loops that can never run their body
    pub loops_eliminated: usize,
    /// Self-assignments and statements after `nope`
    pub statements_removed: usize,
}

pub fn optimize(program: TypedProgram) -> TypedProgram {
    optimize_with_stats(program).0
}

pub fn optimize_with_stats(program: TypedProgram) -> (TypedProgram, OptimizerStats) {
    let mut optimizer = Optimizer::new();
    let statements = optimizer.optimize_stmts(program.statements);

    debug!(
        constants_folded = optimizer.stats.constants_folded,
        identities_applied = optimizer.stats.identities_applied,
        steps_reduced = optimizer.stats.steps_reduced,
        branches_eliminated = optimizer.stats.branches_eliminated,
        loops_eliminated = optimizer.stats.loops_eliminated,
        statements_removed = optimizer.stats.statements_removed,
        "optimized"
    );

    (
        TypedProgram {
            statements,
            types: program.types,
        },
        optimizer.stats,
    )
}

/// Applies the arithmetic meaning of `operator` to two literals.
pub(crate) fn fold(operator: BinaryOp, a: f64, b: f64) -> Option<TypedExpr> {
    Some(match operator {
        BinaryOp::Plus => TypedExpr::Number(a + b),
        BinaryOp::Minus => TypedExpr::Number(a - b),
        BinaryOp::Times => TypedExpr::Number(a * b),
        BinaryOp::Divide => TypedExpr::Number(a / b),
        BinaryOp::FloorDivide => TypedExpr::Number((a / b).floor()),
        BinaryOp::Modulo => TypedExpr::Number(a % b),
        BinaryOp::Power => TypedExpr::Number(a.powf(b)),
        BinaryOp::Less => TypedExpr::Bool(a < b),
        BinaryOp::LessEquals => TypedExpr::Bool(a <= b),
        BinaryOp::Greater => TypedExpr::Bool(a > b),
        BinaryOp::GreaterEquals => TypedExpr::Bool(a >= b),
        BinaryOp::Equals | BinaryOp::Is => TypedExpr::Bool(a == b),
        BinaryOp::NotEquals => TypedExpr::Bool(a != b),
        _ => return None,
    })
}

#[derive(Debug, Default)]
pub struct Optimizer {
    stats: OptimizerStats,
}

impl Optimizer {
    pub fn new() -> Self {
        Optimizer::default()
    }

    pub fn stats(&self) -> &OptimizerStats {
        &self.stats
    }

    pub fn optimize_block(&mut self, block: TypedBlock) -> TypedBlock {
        TypedBlock {
            statements: self.optimize_stmts(block.statements),
        }
    }

    /// Nothing after a `nope` in the same sequence can run.
    pub fn optimize_stmts(&mut self, statements: Vec<TypedStmt>) -> Vec<TypedStmt> {
        let total = statements.len();
        let mut result = Vec::with_capacity(total);

        for (index, statement) in statements.into_iter().enumerate() {
            result.extend(self.optimize_stmt(statement));

            if matches!(result.last(), Some(TypedStmt::Nope)) {
                let dropped = total - index - 1;
                if dropped > 0 {
                    trace!(dropped, "dropped statements after nope");
                    self.stats.statements_removed += dropped;
                }
                break;
            }
        }

        result
    }

    pub fn optimize_stmt(&mut self, statement: TypedStmt) -> Vec<TypedStmt> {
        match statement {
            TypedStmt::VarDecl {
                variable,
                initializer,
            } => vec![TypedStmt::VarDecl {
                variable,
                initializer: self.optimize_expr(initializer),
            }],
            TypedStmt::FnDecl { function, body } => vec![TypedStmt::FnDecl {
                function,
                body: self.optimize_block(body),
            }],
            TypedStmt::ProcDecl { procedure, body } => vec![TypedStmt::ProcDecl {
                procedure,
                body: self.optimize_block(body),
            }],
            TypedStmt::ObjectDecl(id) => vec![TypedStmt::ObjectDecl(id)],
            TypedStmt::Assignment {
                target,
                operator,
                value,
            } => self.optimize_assignment(target, operator, value),
            TypedStmt::Increment {
                target,
                decrement,
                prefix,
            } => vec![TypedStmt::Increment {
                target: self.optimize_expr(target),
                decrement,
                prefix,
            }],
            TypedStmt::Call(call) => vec![TypedStmt::Call(self.optimize_call(call))],
            TypedStmt::If(stmt) => self.optimize_if(stmt),
            TypedStmt::While { test, body } => {
                let test = self.optimize_expr(test);
                if test.as_bool() == Some(false) {
                    trace!("removed while false");
                    self.stats.loops_eliminated += 1;
                    return vec![];
                }

                vec![TypedStmt::While {
                    test,
                    body: self.optimize_block(body),
                }]
            }
            TypedStmt::For {
                iterator,
                initializer,
                test,
                increment,
                body,
            } => vec![TypedStmt::For {
                iterator,
                initializer: self.optimize_expr(initializer),
                test: self.optimize_expr(test),
                increment: self.optimize_expr(increment),
                body: self.optimize_block(body),
            }],
            TypedStmt::ForEach {
                iterator,
                source,
                production,
                production_value,
                body,
            } => {
                let source = self.optimize_expr(source);
                if matches!(&source, TypedExpr::List { elements, .. } if elements.is_empty()) {
                    trace!("removed iteration over an empty list");
                    self.stats.loops_eliminated += 1;
                    return vec![];
                }

                vec![TypedStmt::ForEach {
                    iterator,
                    source,
                    production,
                    production_value: self.optimize_expr(production_value),
                    body: self.optimize_block(body),
                }]
            }
            TypedStmt::Yeet(value) => vec![TypedStmt::Yeet(value.map(|v| self.optimize_expr(v)))],
            TypedStmt::Nope => vec![TypedStmt::Nope],
        }
    }

    fn optimize_assignment(
        &mut self,
        target: TypedExpr,
        operator: AssignOp,
        value: TypedExpr,
    ) -> Vec<TypedStmt> {
        let target = self.optimize_expr(target);
        let value = self.optimize_expr(value);

        let self_assignment = operator == AssignOp::Assign
            && matches!(
                (&target, &value),
                (TypedExpr::Variable(a), TypedExpr::Variable(b)) if a.id == b.id
            );
        if self_assignment {
            trace!("removed self-assignment");
            self.stats.statements_removed += 1;
            return vec![];
        }

        let unit_step = value.as_number() == Some(1.0);
        match operator {
            AssignOp::AddAssign | AssignOp::SubAssign if unit_step => {
                self.stats.steps_reduced += 1;
                vec![TypedStmt::Increment {
                    target,
                    decrement: operator == AssignOp::SubAssign,
                    prefix: false,
                }]
            }
            _ => vec![TypedStmt::Assignment {
                target,
                operator,
                value,
            }],
        }
    }

    /// A literal test keeps only the taken branch, spliced into the
    /// enclosing sequence.
    fn optimize_if(&mut self, stmt: TypedIf) -> Vec<TypedStmt> {
        let test = self.optimize_expr(stmt.test);

        match test.as_bool() {
            Some(true) => {
                self.stats.branches_eliminated += 1;
                self.optimize_block(stmt.consequent).statements
            }
            Some(false) => {
                self.stats.branches_eliminated += 1;
                match stmt.alternate {
                    None => vec![],
                    Some(TypedElse::Block(block)) => self.optimize_block(block).statements,
                    Some(TypedElse::If(nested)) => self.optimize_if(*nested),
                }
            }
            None => vec![TypedStmt::If(TypedIf {
                test,
                consequent: self.optimize_block(stmt.consequent),
                alternate: self.optimize_else(stmt.alternate),
            })],
        }
    }

    fn optimize_else(&mut self, alternate: Option<TypedElse>) -> Option<TypedElse> {
        match alternate? {
            TypedElse::Block(block) => Some(TypedElse::Block(self.optimize_block(block))),
            TypedElse::If(nested) => {
                // A chained conditional may collapse to a plain sequence.
                let mut statements = self.optimize_if(*nested);
                match statements.pop() {
                    Some(TypedStmt::If(chained)) if statements.is_empty() => {
                        Some(TypedElse::If(Box::new(chained)))
                    }
                    Some(last) => {
                        statements.push(last);
                        Some(TypedElse::Block(TypedBlock { statements }))
                    }
                    None => None,
                }
            }
        }
    }

    fn optimize_call(&mut self, call: TypedCall) -> TypedCall {
        let callee = match call.callee {
            Callee::Method { receiver, method } => Callee::Method {
                receiver: Box::new(self.optimize_expr(*receiver)),
                method,
            },
            Callee::Value(value) => Callee::Value(Box::new(self.optimize_expr(*value))),
            other => other,
        };

        TypedCall {
            callee,
            arguments: self.optimize_exprs(call.arguments),
        }
    }

    fn optimize_exprs(&mut self, exprs: Vec<TypedExpr>) -> Vec<TypedExpr> {
        exprs
            .into_iter()
            .map(|expr| self.optimize_expr(expr))
            .collect()
    }

    pub fn optimize_expr(&mut self, expr: TypedExpr) -> TypedExpr {
        match expr {
            TypedExpr::Template(parts) => TypedExpr::Template(
                parts
                    .into_iter()
                    .map(|part| match part {
                        TypedTemplatePart::Interpolation(expr) => {
                            TypedTemplatePart::Interpolation(self.optimize_expr(expr))
                        }
                        text => text,
                    })
                    .collect(),
            ),
            TypedExpr::List { elements, ty } => TypedExpr::List {
                elements: self.optimize_exprs(elements),
                ty,
            },
            TypedExpr::Binary {
                operator,
                left,
                right,
                ty,
            } => {
                let left = self.optimize_expr(*left);
                let right = self.optimize_expr(*right);
                self.optimize_binary(operator, left, right, ty)
            }
            TypedExpr::Unary {
                operator,
                operand,
                postfix,
                ty,
            } => {
                let operand = self.optimize_expr(*operand);
                if operator == UnaryOp::Not {
                    if let Some(value) = operand.as_bool() {
                        self.stats.constants_folded += 1;
                        return TypedExpr::Bool(!value);
                    }
                }

                TypedExpr::Unary {
                    operator,
                    operand: Box::new(operand),
                    postfix,
                    ty,
                }
            }
            TypedExpr::Conditional {
                test,
                consequent,
                alternate,
                ty,
            } => {
                let test = self.optimize_expr(*test);
                match test.as_bool() {
                    Some(true) => {
                        self.stats.branches_eliminated += 1;
                        self.optimize_expr(*consequent)
                    }
                    Some(false) => {
                        self.stats.branches_eliminated += 1;
                        self.optimize_expr(*alternate)
                    }
                    None => TypedExpr::Conditional {
                        test: Box::new(test),
                        consequent: Box::new(self.optimize_expr(*consequent)),
                        alternate: Box::new(self.optimize_expr(*alternate)),
                        ty,
                    },
                }
            }
            TypedExpr::Index { list, index, ty } => TypedExpr::Index {
                list: Box::new(self.optimize_expr(*list)),
                index: Box::new(self.optimize_expr(*index)),
                ty,
            },
            TypedExpr::Member { object, field, ty } => TypedExpr::Member {
                object: Box::new(self.optimize_expr(*object)),
                field,
                ty,
            },
            TypedExpr::Call { call, ty } => TypedExpr::Call {
                call: self.optimize_call(call),
                ty,
            },
            TypedExpr::Number(_)
            | TypedExpr::Bool(_)
            | TypedExpr::String(_)
            | TypedExpr::Variable(_)
            | TypedExpr::Function(_)
            | TypedExpr::Procedure(_) => expr,
        }
    }

    fn identity(&mut self, result: TypedExpr) -> TypedExpr {
        self.stats.identities_applied += 1;
        result
    }

    fn optimize_binary(
        &mut self,
        operator: BinaryOp,
        left: TypedExpr,
        right: TypedExpr,
        ty: Type,
    ) -> TypedExpr {
        match (operator, left.as_bool(), right.as_bool()) {
            (BinaryOp::And, Some(true), _) | (BinaryOp::Or, Some(false), _) => {
                return self.identity(right)
            }
            (BinaryOp::And, _, Some(true)) | (BinaryOp::Or, _, Some(false)) => {
                return self.identity(left)
            }
            (BinaryOp::And, Some(false), _) | (BinaryOp::And, _, Some(false)) => {
                return self.identity(TypedExpr::Bool(false))
            }
            (BinaryOp::Or, Some(true), _) | (BinaryOp::Or, _, Some(true)) => {
                return self.identity(TypedExpr::Bool(true))
            }
            _ => {}
        }

        match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => {
                if let Some(folded) = fold(operator, a, b) {
                    trace!(%operator, a, b, "folded");
                    self.stats.constants_folded += 1;
                    return folded;
                }
            }
            (Some(a), None) => match operator {
                BinaryOp::Plus if a == 0.0 => return self.identity(right),
                BinaryOp::Times if a == 1.0 => return self.identity(right),
                BinaryOp::Minus if a == 0.0 => {
                    return self.identity(TypedExpr::Unary {
                        operator: UnaryOp::Negate,
                        operand: Box::new(right),
                        postfix: false,
                        ty: Type::Num,
                    })
                }
                BinaryOp::Power if a == 1.0 => return self.identity(TypedExpr::Number(1.0)),
                BinaryOp::Times | BinaryOp::Divide if a == 0.0 => {
                    return self.identity(TypedExpr::Number(0.0))
                }
                _ => {}
            },
            (None, Some(b)) => match operator {
                BinaryOp::Plus | BinaryOp::Minus if b == 0.0 => return self.identity(left),
                BinaryOp::Times | BinaryOp::Divide if b == 1.0 => return self.identity(left),
                BinaryOp::Times if b == 0.0 => return self.identity(TypedExpr::Number(0.0)),
                BinaryOp::Power if b == 0.0 => return self.identity(TypedExpr::Number(1.0)),
                _ => {}
            },
            (None, None) => {}
        }

        TypedExpr::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
            ty,
        }
    }
}
