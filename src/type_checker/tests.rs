//! Unit tests for the type checker module.
//!
//! This module contains tests for:
//! - Type equivalence, assignability and descriptions
//! - Scope binding and resolution
//! - Accepted programs and the typed tree they produce
//! - Every semantic error the analyzer reports

use std::rc::Rc;

use super::{
    context::{Context, Overrides, Subroutine},
    entities::{Entity, Procedure, Variable},
    stdlib::{BuiltinMethod, Stdlib},
    type_checker::type_check,
    typed_ast::{Callee, TypedExpr, TypedProgram, TypedStmt},
    types::{Field, ObjectId, Type, TypeTable},
};
use crate::{
    ast::statements::ObjectKind, errors::errors::Error, lexer::lexer::tokenize,
    parser::parser::parse, Position, Span,
};

fn analyze(source: &str) -> Result<TypedProgram, Error> {
    let tokens = tokenize(source.to_string(), None)?;
    let (_, program) = parse(tokens, Rc::new(String::from("shell")));
    type_check(program?, &Stdlib::new())
}

fn error_of(source: &str) -> String {
    analyze(source).unwrap_err().message()
}

fn null_span() -> Span {
    Span {
        start: Position::null(),
        end: Position::null(),
    }
}

fn function(parameters: Vec<Type>, return_type: Type) -> Type {
    Type::Function {
        parameters,
        return_type: Box::new(return_type),
    }
}

fn object(table: &mut TypeTable, name: &str, kind: ObjectKind, fields: Vec<(&str, Type)>) -> Type {
    let id = table.declare(name, kind);
    let fields = fields
        .into_iter()
        .map(|(name, ty)| Field {
            name: name.to_string(),
            ty,
        })
        .collect();
    table.complete(id, fields);
    table.type_of(id)
}

#[test]
fn test_primitive_equivalence() {
    let table = TypeTable::new();
    assert!(table.is_equivalent(&Type::Num, &Type::Num));
    assert!(table.is_equivalent(&Type::Bool, &Type::Bool));
    assert!(table.is_equivalent(&Type::String, &Type::String));
    assert!(!table.is_equivalent(&Type::Num, &Type::Bool));
    assert!(!table.is_assignable(&Type::String, &Type::Num));
}

#[test]
fn test_nested_list_equivalence() {
    let table = TypeTable::new();
    let deep = |base: Type| Type::list_of(Type::list_of(Type::list_of(base)));

    assert!(table.is_equivalent(&deep(Type::Num), &deep(Type::Num)));
    assert!(!table.is_equivalent(&deep(Type::Num), &deep(Type::Bool)));
    assert!(!table.is_equivalent(&deep(Type::Num), &Type::list_of(Type::list_of(Type::Num))));
    assert!(table.is_assignable(&deep(Type::String), &deep(Type::String)));
}

#[test]
fn test_structs_are_structurally_equivalent_but_nominally_assignable() {
    let mut table = TypeTable::new();
    let s = object(&mut table, "S", ObjectKind::Struct, vec![("x", Type::Num)]);
    let t = object(&mut table, "T", ObjectKind::Struct, vec![("x", Type::Num)]);

    assert!(table.is_equivalent(&s, &t));
    assert!(!table.is_assignable(&s, &t));

    // Same name, different shape.
    let other_s = object(&mut table, "S", ObjectKind::Struct, vec![("y", Type::Bool)]);
    assert!(!table.is_equivalent(&s, &other_s));
    assert!(table.is_assignable(&s, &other_s));
}

#[test]
fn test_struct_field_order_matters() {
    let mut table = TypeTable::new();
    let a = object(
        &mut table,
        "A",
        ObjectKind::Struct,
        vec![("x", Type::Num), ("y", Type::Bool)],
    );
    let b = object(
        &mut table,
        "B",
        ObjectKind::Struct,
        vec![("y", Type::Bool), ("x", Type::Num)],
    );

    assert!(!table.is_equivalent(&a, &b));
}

#[test]
fn test_classes_are_only_equivalent_to_themselves() {
    let mut table = TypeTable::new();
    let c = object(&mut table, "C", ObjectKind::Class, vec![("x", Type::Num)]);
    let d = object(&mut table, "D", ObjectKind::Class, vec![("x", Type::Num)]);

    assert!(table.is_equivalent(&c, &c));
    assert!(!table.is_equivalent(&c, &d));
    assert!(!table.is_assignable(&c, &d));
}

#[test]
fn test_mutually_referencing_structs_compare_in_finite_time() {
    let mut table = TypeTable::new();
    let a = table.declare("A", ObjectKind::Struct);
    let b = table.declare("B", ObjectKind::Struct);
    let c = table.declare("C", ObjectKind::Struct);
    let d = table.declare("D", ObjectKind::Struct);

    let field = |ty: Type| {
        vec![Field {
            name: "next".to_string(),
            ty: Type::list_of(ty),
        }]
    };
    table.complete(a, field(Type::Struct(b)));
    table.complete(b, field(Type::Struct(a)));
    table.complete(c, field(Type::Struct(d)));
    table.complete(d, field(Type::Struct(c)));

    assert!(table.is_equivalent(&Type::Struct(a), &Type::Struct(c)));
    assert!(table.is_equivalent(&Type::Struct(b), &Type::Struct(d)));
}

#[test]
fn test_function_and_procedure_relations() {
    let table = TypeTable::new();
    let f = function(vec![Type::Num, Type::Bool], Type::String);

    assert!(table.is_equivalent(&f, &function(vec![Type::Num, Type::Bool], Type::String)));
    assert!(!table.is_equivalent(&f, &function(vec![Type::Num], Type::String)));
    assert!(!table.is_equivalent(&f, &function(vec![Type::Num, Type::Bool], Type::Num)));
    assert!(table.is_assignable(&f, &function(vec![Type::Num, Type::Bool], Type::String)));
    assert!(!table.is_assignable(&f, &function(vec![Type::Bool, Type::Bool], Type::String)));

    let p = Type::Procedure {
        parameters: vec![Type::Num],
    };
    assert!(table.is_assignable(&p, &p));
    assert!(!table.is_equivalent(&p, &function(vec![Type::Num], Type::Num)));
    assert!(!table.is_assignable(&p, &Type::Procedure { parameters: vec![] }));
}

#[test]
fn test_describe() {
    let mut table = TypeTable::new();
    let point = object(&mut table, "Point", ObjectKind::Struct, vec![]);

    assert_eq!(table.describe(&Type::Num), "num");
    assert_eq!(table.describe(&Type::list_of(Type::list_of(Type::Bool))), "[[bool]]");
    assert_eq!(table.describe(&point), "Point");
    assert_eq!(
        table.describe(&function(vec![Type::Num, point], Type::String)),
        "(num, Point)->string"
    );
    assert_eq!(
        table.describe(&Type::Procedure {
            parameters: vec![Type::Num]
        }),
        "(num)"
    );
}

#[test]
fn test_context_bind_and_resolve() {
    let stdlib = Stdlib::new();
    let mut root = Context::root(&stdlib);
    let variable = Rc::new(Variable {
        id: 1024,
        name: "x".to_string(),
        ty: Type::Num,
        read_only: false,
    });

    assert!(root.declares("print"));
    assert!(!root.declares("x"));
    root.bind("x", Entity::Variable(variable.clone()), &null_span())
        .unwrap();

    let child = root.child(Overrides::none());
    assert_eq!(
        child.resolve("x", &null_span()).unwrap(),
        Entity::Variable(variable)
    );
    assert_eq!(
        child.resolve("num", &null_span()).unwrap(),
        Entity::Type(Type::Num)
    );
    assert_eq!(
        child.resolve("y", &null_span()).unwrap_err().message(),
        "Identifier y not declared"
    );
}

#[test]
fn test_context_rejects_shadowing() {
    let stdlib = Stdlib::new();
    let mut root = Context::root(&stdlib);
    root.bind("x", Entity::Type(Type::Num), &null_span()).unwrap();

    let mut child = root.child(Overrides::none());
    let error = child
        .bind("x", Entity::Type(Type::Bool), &null_span())
        .unwrap_err();
    assert_eq!(error.message(), "Identifier x already declared");

    let error = child
        .bind("print", Entity::Type(Type::Bool), &null_span())
        .unwrap_err();
    assert_eq!(error.message(), "Identifier print already declared");
}

#[test]
fn test_context_flags() {
    let stdlib = Stdlib::new();
    let root = Context::root(&stdlib);
    assert!(!root.in_loop());
    assert!(!root.in_function());

    let looping = root.child(Overrides::looping());
    let nested = looping.child(Overrides::none());
    assert!(nested.in_loop());

    let procedure = Rc::new(Procedure {
        id: 1024,
        name: "p".to_string(),
        parameters: vec![],
        variadic: false,
        builtin: false,
    });
    let body = nested.child(Overrides::subroutine(Subroutine::Procedure(procedure)));
    assert!(!body.in_loop());
    assert!(!body.in_function());
    assert!(matches!(body.subroutine(), Some(Subroutine::Procedure(_))));
}

#[test]
fn test_stdlib_methods() {
    let stdlib = Stdlib::new();
    let numbers = Type::list_of(Type::Num);

    assert_eq!(stdlib.method(&numbers, "length"), Some(BuiltinMethod::Length));
    assert_eq!(stdlib.method(&numbers, "symbolcount"), None);
    assert_eq!(stdlib.method(&Type::String, "symbolcount"), Some(BuiltinMethod::SymbolCount));
    assert_eq!(stdlib.method(&Type::Num, "length"), None);
    assert_eq!(
        BuiltinMethod::InsertAt.parameters(&numbers),
        vec![Type::Num, Type::Num]
    );
    assert_eq!(BuiltinMethod::Add.return_type(), None);
}

#[test]
fn test_variable_declaration_is_typed() {
    let program = analyze("now x: num = 1; set y: bool = true;").unwrap();

    match &program.statements[0] {
        TypedStmt::VarDecl {
            variable,
            initializer,
        } => {
            assert_eq!(variable.id, 1024);
            assert_eq!(variable.name, "x");
            assert_eq!(variable.ty, Type::Num);
            assert!(!variable.read_only);
            assert_eq!(*initializer, TypedExpr::Number(1.0));
        }
        other => panic!("expected a declaration, got {:?}", other),
    }
    match &program.statements[1] {
        TypedStmt::VarDecl { variable, .. } => assert!(variable.read_only),
        other => panic!("expected a declaration, got {:?}", other),
    }
}

#[test]
fn test_empty_list_takes_declared_type() {
    let program = analyze("now xs: [[num]] = [];").unwrap();

    match &program.statements[0] {
        TypedStmt::VarDecl { initializer, .. } => assert_eq!(
            *initializer,
            TypedExpr::List {
                elements: vec![],
                ty: Type::list_of(Type::list_of(Type::Num)),
            }
        ),
        other => panic!("expected a declaration, got {:?}", other),
    }

    assert!(analyze("now xs: [[num]] = [[], [1]];").is_ok());
    assert!(analyze("struct Node { value: num, children: [Node] } now n: Node = Node(1, []);").is_ok());
}

#[test]
fn test_recursive_function() {
    let source = "
        num fact(num n) {
            if n <= 1 { yeet 1; }
            yeet n * fact(n - 1);
        }
        print(fact(5));
    ";
    assert!(analyze(source).is_ok());
}

#[test]
fn test_calls_resolve_their_callee() {
    let source = "
        struct P { x: num, y: num }
        now p: P = new P(1, 2);
        now xs: [num] = [1, 2];
        xs.add(3);
        print(p.x, xs.length());
    ";
    let program = analyze(source).unwrap();

    match &program.statements[1] {
        TypedStmt::VarDecl { initializer, .. } => match initializer {
            TypedExpr::Call { call, ty } => {
                assert_eq!(call.callee, Callee::Constructor(Type::Struct(ObjectId(0))));
                assert_eq!(*ty, Type::Struct(ObjectId(0)));
            }
            other => panic!("expected a call, got {:?}", other),
        },
        other => panic!("expected a declaration, got {:?}", other),
    }
    match &program.statements[3] {
        TypedStmt::Call(call) => assert!(matches!(
            call.callee,
            Callee::Method {
                method: BuiltinMethod::Add,
                ..
            }
        )),
        other => panic!("expected a call, got {:?}", other),
    }
    match &program.statements[4] {
        TypedStmt::Call(call) => {
            assert!(matches!(&call.callee, Callee::Procedure(p) if p.builtin && p.name == "print"));
            assert_eq!(call.arguments.len(), 2);
        }
        other => panic!("expected a call, got {:?}", other),
    }
}

#[test]
fn test_function_values() {
    let source = "
        num twice(num x) { yeet x * 2; }
        now f: (num) -> num = twice;
        print(f(2));
        proc greet(string name) { print(name); yeet; }
        now g: (string) = greet;
        g(\"hi\");
    ";
    assert!(analyze(source).is_ok());
}

#[test]
fn test_struct_equivalence_and_assignability_differ() {
    let shapes = "struct S { x: num } struct T { x: num } ";

    assert!(analyze(&format!("{}now s: S = T(1);", shapes)).is_ok());
    assert_eq!(
        error_of(&format!("{}now s: S = S(1); now t: T = T(1); s = t;", shapes)),
        "Cannot assign a T to a S"
    );
}

#[test]
fn test_mutually_referencing_structs() {
    let source = "
        struct A { b: [B] }
        struct B { a: [A] }
        now a: A = A([]);
        now b: B = B([a]);
    ";
    assert!(analyze(source).is_ok());
}

#[test]
fn test_indirectly_recursive_structs() {
    assert!(analyze("struct A { b: B } struct B { a: A }").is_ok());
    assert!(analyze("struct S { next: [S] } now s: S = S([]); now t: S = S([s]);").is_ok());
}

#[test]
fn test_loops() {
    let source = "
        for (now i: num = 0; i < 3 and true; i++) { print(i); }
        for (now k: num = j * 2; j in [1, 2, 3]) { print(k); }
        while true { nope; }
    ";
    assert!(analyze(source).is_ok());
}

#[test]
fn test_other_expressions() {
    let source = "
        now x: num = true ? 1 : 2;
        now s: string = `sum #{x + 1}`;
        now b: bool = 1 in [1, 2] and [1] C= [1, 2] or !false;
        now xs: [num] = [1, 2];
        xs[0] = -x;
        xs[1] += 2;
        print(s.symbolcount(), 2 ^ 3 // 1 % 2, x == 1, x != 2, b is true);
    ";
    assert!(analyze(source).is_ok());
}

#[test]
fn test_semantic_error_position() {
    let error = analyze("now x: num = 1;\nx = true;").unwrap_err();
    assert_eq!(error.get_error_name(), "SemanticError");
    assert_eq!(error.get_position().unwrap().0, 20);
}

#[test]
fn test_declaration_errors() {
    assert_eq!(
        error_of("now x: num = 1; now x: num = 2;"),
        "Identifier x already declared"
    );
    assert_eq!(error_of("print(y);"), "Identifier y not declared");
    assert_eq!(error_of("now x: num = x;"), "Identifier x not declared");
    assert_eq!(
        error_of("now x: num = \"hi\";"),
        "Operands do not have the same type"
    );
    assert_eq!(error_of("now x: foo = 1;"), "Identifier foo not declared");
    assert_eq!(error_of("now y: num = 1; now x: y = 1;"), "Type expected");
    assert_eq!(error_of("now x: num = [];"), "List type expected");
    assert_eq!(error_of("print([]);"), "Cannot infer the type of an empty list");
    assert_eq!(
        error_of("now x: num = num;"),
        "Expected a value, found type num"
    );
    assert_eq!(
        error_of("num f(num a, num a) { yeet a; }"),
        "Identifier a already declared"
    );
}

#[test]
fn test_object_declaration_errors() {
    assert_eq!(
        error_of("struct P { x: num, x: num }"),
        "Fields must be distinct"
    );
    assert_eq!(
        error_of("struct S { s: S }"),
        "Struct and class types must not be recursive"
    );
    assert_eq!(
        error_of("class C { next: C }"),
        "Struct and class types must not be recursive"
    );
    assert_eq!(
        error_of("struct P { x: num } now p: P = P(1); print(p.y);"),
        "No such field"
    );
    assert_eq!(
        error_of("proc p(S s) { print(s.x); } struct S { x: num }"),
        "Type S used before its declaration"
    );
    assert_eq!(
        error_of("now s: S = S(1); struct S { x: num }"),
        "Type S used before its declaration"
    );
}

#[test]
fn test_assignment_errors() {
    assert_eq!(
        error_of("set x: num = 1; x = 2;"),
        "Cannot assign to constant x"
    );
    assert_eq!(
        error_of("set x: num = 1; x++;"),
        "Cannot assign to constant x"
    );
    assert_eq!(
        error_of("now x: num = 1; x = true;"),
        "Cannot assign a bool to a num"
    );
    assert_eq!(
        error_of("now s: string = \"a\"; s += \"b\";"),
        "Expected a number"
    );
    assert_eq!(error_of("5++;"), "Invalid assignment target");
    assert_eq!(
        error_of("num f() { yeet 1; } f = f;"),
        "Invalid assignment target"
    );
    assert_eq!(
        error_of("for (now k: num = 1; j in [1]) { j = 2; }"),
        "Cannot assign to constant j"
    );
    assert_eq!(
        error_of("set xs: [num] = [1]; xs[0] = 2;"),
        "Cannot assign to constant xs"
    );
    assert_eq!(
        error_of("struct P { x: num } set p: P = P(1); p.x++;"),
        "Cannot assign to constant p"
    );
    assert!(analyze("now xs: [num] = [1]; xs[0] = 2;").is_ok());
}

#[test]
fn test_control_flow_errors() {
    assert_eq!(error_of("if 1 { }"), "Expected a boolean");
    assert_eq!(error_of("while 0 { }"), "Expected a boolean");
    assert_eq!(error_of("nope;"), "Nope can only appear in a loop");
    assert_eq!(
        error_of("while true { proc p() { nope; } }"),
        "Nope can only appear in a loop"
    );
    assert_eq!(error_of("yeet 1;"), "Yeet can only appear in a function");
    assert_eq!(error_of("num f() { yeet; }"), "Functions must yeet a value");
    assert_eq!(
        error_of("proc p() { yeet 1; }"),
        "Cannot yeet a value from a procedure"
    );
    assert_eq!(
        error_of("num f() { yeet true; }"),
        "Cannot assign a bool to a num"
    );
    assert_eq!(
        error_of("for (now i: num = 0; i < 3; i++) { }"),
        "Expected a boolean"
    );
    assert_eq!(
        error_of("for (now i: bool = true; true and true; i++) { }"),
        "Expected a number"
    );
    assert_eq!(
        error_of("for (now k: num = 1; j in 5) { }"),
        "List expected"
    );
}

#[test]
fn test_operator_errors() {
    assert_eq!(
        error_of("now x: num = 1 + true;"),
        "Operands do not have the same type"
    );
    assert_eq!(error_of("now b: bool = true < 1;"), "Expected a number");
    assert_eq!(error_of("now b: bool = 1 and true;"), "Expected a boolean");
    assert_eq!(error_of("now b: bool = 1 C= [1];"), "List expected");
    assert_eq!(
        error_of("now b: bool = true in [1];"),
        "Operands do not have the same type"
    );
    assert_eq!(
        error_of("now b: bool = 1 == \"1\";"),
        "Operands do not have the same type"
    );
    assert_eq!(error_of("now x: num = -true;"), "Expected a number");
    assert_eq!(error_of("now b: bool = !1;"), "Expected a boolean");
    assert_eq!(
        error_of("now x: num = true ? 1 : \"no\";"),
        "Operands do not have the same type"
    );
}

#[test]
fn test_computed_list_indices() {
    assert!(analyze("now xs: [num] = [1, 2]; print(xs[2 - 1], xs[3 // 2], xs[-1 + 1]);").is_ok());
    assert!(analyze("now xs: [num] = [1, 2]; now i: num = 0.5; print(xs[i], xs[i * 2]);").is_ok());
}

#[test]
fn test_list_errors() {
    assert_eq!(
        error_of("now xs: [num] = [1, true];"),
        "Not all elements have the same type"
    );
    assert_eq!(
        error_of("now xs: [num] = [1]; print(xs[1.5]);"),
        "Lists can only be indexed into by integers"
    );
    assert_eq!(
        error_of("now xs: [num] = [1]; print(xs[true]);"),
        "Lists can only be indexed into by integers"
    );
    assert_eq!(
        error_of("now xs: [num] = [1]; print(xs[1.5 + 1]);"),
        "Lists can only be indexed into by integers"
    );
    assert_eq!(
        error_of("now xs: [num] = [1]; print(xs[-(3 / 2)]);"),
        "Lists can only be indexed into by integers"
    );
    assert_eq!(error_of("now n: num = 1; print(n[0]);"), "List expected");
}

#[test]
fn test_call_errors() {
    assert_eq!(
        error_of("num f(num x) { yeet x; } print(f());"),
        "1 argument(s) required but 0 passed"
    );
    assert_eq!(
        error_of("num f(num x) { yeet x; } print(f(true));"),
        "Cannot assign a bool to a num"
    );
    assert_eq!(
        error_of("now x: num = 1; x();"),
        "Call of non-function or non-constructor"
    );
    assert_eq!(
        error_of("proc p() { } now x: num = p();"),
        "Procedures do not return a value"
    );
    assert_eq!(
        error_of("now xs: [num] = [1]; print(xs.add(2));"),
        "Procedures do not return a value"
    );
    assert_eq!(
        error_of("now xs: [num] = [1]; xs.add(true);"),
        "Cannot assign a bool to a num"
    );
    assert_eq!(
        error_of("skrrt(1);"),
        "0 argument(s) required but 1 passed"
    );
}
