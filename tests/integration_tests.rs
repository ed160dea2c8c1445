//! Integration tests for end-to-end compilation.
//!
//! These tests drive the public `compile` entry point through every stage,
//! from source text to JavaScript, and check that each stage's failures
//! surface as the first error.

use pandemonium::{compile, optimizer::optimizer::OptimizerConfig, render_error, OutputKind};

fn to_js(source: &str) -> String {
    compile(source, Some(String::from("test.pan")), OutputKind::Js, &OptimizerConfig::all()).unwrap()
}

fn to_unoptimized_js(source: &str) -> String {
    compile(source, Some(String::from("test.pan")), OutputKind::Js, &OptimizerConfig::none()).unwrap()
}

#[test]
fn test_compile_simple_program() {
    assert_eq!(to_js("now x: num = 42; print(x);"), "let x_1 = 42;\nconsole.log(x_1);");
}

#[test]
fn test_compile_recursive_function() {
    let source = "
        $ classic recursion
        num fact(num n) {
            if n <= 1 { yeet 1; }
            yeet n * fact(n - 1);
        }
        print(fact(5));
    ";
    assert_eq!(
        to_js(source),
        [
            "function fact_1(n_2) {",
            "  if ((n_2 <= 1)) {",
            "    return 1;",
            "  }",
            "  return (n_2 * fact_1((n_2 - 1)));",
            "}",
            "console.log(fact_1(5));",
        ]
        .join("\n")
    );
}

#[test]
fn test_compile_program_with_objects_and_loops() {
    let source = "
        struct Point { x: num y: num }
        class Counter { count: num }

        proc bump(Counter c) {
            c.count += 1;
        }

        now points: [Point] = [];
        for (now i: num = 0; i < 3 and true; i++) {
            points.add(Point(i, i * 2));
        }

        now counter: Counter = new Counter(0);
        for (now p: Point = q; q in points) {
            if p.x > 1 { nope; }
            bump(counter);
        }
        print(`counted #{counter.count}`);
    ";
    assert_eq!(
        to_js(source),
        [
            "class Point_1 {",
            "  constructor(x_1, y_2) {",
            "    this[\"x\"] = x_1;",
            "    this[\"y\"] = y_2;",
            "  }",
            "}",
            "class Counter_2 {",
            "  constructor(count_1) {",
            "    this[\"count\"] = count_1;",
            "  }",
            "}",
            "function bump_3(c_4) {",
            "  (c_4[\"count\"])++;",
            "}",
            "let points_5 = [];",
            "for (let i_6 = 0; (i_6 < 3); (i_6)++) {",
            "  points_5.push(new Point_1(i_6, (i_6 * 2)));",
            "}",
            "let counter_7 = new Counter_2(0);",
            "for (let q_8 of points_5) {",
            "  let p_9 = q_8;",
            "  if (((p_9[\"x\"]) > 1)) {",
            "    break;",
            "  }",
            "  bump_3(counter_7);",
            "}",
            "console.log(`counted ${(counter_7[\"count\"])}`);",
        ]
        .join("\n")
    );
}

#[test]
fn test_optimizer_can_be_disabled() {
    let source = "now x: num = 2 + 3; x += 1; while false { print(x); }";

    assert_eq!(to_js(source), "let x_1 = 5;\nx_1++;");
    assert_eq!(
        to_unoptimized_js(source),
        ["let x_1 = (2 + 3);", "x_1 += 1;", "while (false) {", "  console.log(x_1);", "}"].join("\n")
    );
}

#[test]
fn test_intermediate_stages() {
    let source = "now x: num = 1 + 2;";
    let config = OptimizerConfig::none();

    let tokens = compile(source, None, OutputKind::Tokens, &config).unwrap();
    assert!(tokens.contains("Identifier"));

    let ast = compile(source, None, OutputKind::Ast, &config).unwrap();
    assert!(ast.contains("VarDecl"));

    let analyzed = compile(source, None, OutputKind::Analyzed, &config).unwrap();
    assert!(analyzed.contains("Binary"));

    // The optimized stage always runs the optimizer.
    let optimized = compile(source, None, OutputKind::Optimized, &config).unwrap();
    assert!(!optimized.contains("Binary"));
    assert!(optimized.contains("Number(\n"));
}

#[test]
fn test_lexer_error() {
    let error = compile("now x: num = #;", None, OutputKind::Js, &OptimizerConfig::all()).unwrap_err();
    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().unwrap().0, 13);
}

#[test]
fn test_parser_error() {
    let error = compile("now x: num = 1", None, OutputKind::Js, &OptimizerConfig::all()).unwrap_err();
    assert!(error.get_error_name().starts_with("UnexpectedToken"));

    let error = compile("1 + 2;", None, OutputKind::Js, &OptimizerConfig::all()).unwrap_err();
    assert!(error.get_error_name().starts_with("UnexpectedToken"));
}

#[test]
fn test_semantic_error() {
    let source = "now x: num = 1;\nnow x: num = 2;\n";
    let error = compile(source, Some(String::from("main.pan")), OutputKind::Js, &OptimizerConfig::all())
        .unwrap_err();

    assert_eq!(error.get_error_name(), "SemanticError");
    assert_eq!(error.message(), "Identifier x already declared");

    let rendered = render_error(&error, source);
    assert!(rendered.contains("-> main.pan:2:5"));
    assert!(rendered.contains("2 | now x: num = 2;"));
}

#[test]
fn test_first_error_wins() {
    let source = "print(y);\nnow z: bool = 1;";
    let error = compile(source, None, OutputKind::Js, &OptimizerConfig::all()).unwrap_err();
    assert_eq!(error.message(), "Identifier y not declared");
}
