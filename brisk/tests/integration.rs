//! Integration tests for the Brisk interpreter
//!
//! Tests the full pipeline including:
//! - Lexing and parsing source text
//! - Evaluation against fresh and shared environments
//! - Error objects for runtime failures
//! - Canonical rendering of programs and values

use brisk::interp::{Interpreter, Object};
use brisk::lexer::{tokenize, Lexer, TokenKind};
use brisk::parser::{parse, Parser};
use brisk::Environment;

/// Helper to evaluate a program in a fresh environment
fn eval_source(source: &str) -> Object {
    let (program, errors) = parse(source);
    assert!(errors.is_empty(), "parse errors for {source}: {errors:?}");
    brisk::eval(&program, &Environment::new().into_ref())
}

/// Helper to check for a runtime error with a given message
fn eval_error(source: &str) -> String {
    match eval_source(source) {
        Object::Error(message) => message,
        other => panic!("expected an error from {source}, got {other}"),
    }
}

// ============================================
// Integers and arithmetic
// ============================================

#[test]
fn test_integer_literals_evaluate_to_themselves() {
    for n in [0, 1, 42, 1_000_000, i64::MAX] {
        assert_eq!(eval_source(&format!("{n};")), Object::Integer(n));
    }
}

#[test]
fn test_negative_literals_via_prefix() {
    assert_eq!(eval_source("-9223372036854775807;"), Object::Integer(-i64::MAX));
}

#[test]
fn test_division_by_zero_is_an_error_value() {
    assert_eq!(eval_error("1 / 0;"), "division by zero");
    assert_eq!(eval_error("var a = 5; a % (a - 5);"), "division by zero");
}

// ============================================
// Bindings and functions
// ============================================

#[test]
fn test_binding() {
    assert_eq!(eval_source("var x = 5; x + 1;"), Object::Integer(6));
    assert_eq!(eval_error("y;"), "identifier not found: y");
}

#[test]
fn test_function_call() {
    assert_eq!(
        eval_source("func(a, b) { return a + b; }(2, 3);"),
        Object::Integer(5)
    );
}

#[test]
fn test_closures_capture_defining_scope() {
    let source = "
        var makeAdder = func(x) { return func(y) { return x + y; }; };
        var addTwo = makeAdder(2);
        addTwo(3);
    ";
    assert_eq!(eval_source(source), Object::Integer(5));
}

#[test]
fn test_shadowing_leaves_outer_binding() {
    let env = Environment::new().into_ref();
    let (program, errors) = parse("var x = 1; func() { var x = 2; return x; }();");
    assert!(errors.is_empty());

    assert_eq!(brisk::eval(&program, &env), Object::Integer(2));
    assert_eq!(env.borrow().get("x"), Some(Object::Integer(1)));
}

#[test]
fn test_higher_order_functions() {
    let source = "
        var map = func(arr, f) {
            var iter = func(arr, acc) {
                if (len(arr) == 0) {
                    acc
                } else {
                    iter(rest(arr), push(acc, f(first(arr))));
                }
            };
            iter(arr, []);
        };
        var reduce = func(arr, initial, f) {
            var iter = func(arr, result) {
                if (len(arr) == 0) {
                    result
                } else {
                    iter(rest(arr), f(result, first(arr)));
                }
            };
            iter(arr, initial);
        };
        var doubled = map([1, 2, 3, 4], func(x) { x * 2 });
        reduce(doubled, 0, func(a, b) { a + b });
    ";
    assert_eq!(eval_source(source), Object::Integer(20));
}

#[test]
fn test_deep_recursion_within_limit() {
    let source = "
        var count = func(n) { if (n == 0) { 0 } else { 1 + count(n - 1) } };
        count(2000);
    ";
    assert_eq!(eval_source(source), Object::Integer(2000));
}

#[test]
fn test_runaway_recursion_is_an_error_value() {
    let source = "var down = func(n) { down(n - 1) }; down(0);";
    assert_eq!(eval_error(source), "stack overflow: too deep recursion");
}

// ============================================
// Arrays and dictionaries
// ============================================

#[test]
fn test_array_indexing() {
    assert_eq!(eval_source("[1, 2, 3][1];"), Object::Integer(2));
    assert_eq!(eval_source("[1, 2][5];"), Object::Null);
}

#[test]
fn test_dictionary_indexing() {
    assert_eq!(eval_source(r#"{"a": 1}["a"];"#), Object::Integer(1));
    assert_eq!(eval_source(r#"{"a": 1}["b"];"#), Object::Null);
}

#[test]
fn test_dictionary_rendering_keeps_insertion_order() {
    let result = eval_source(r#"{"z": 1, "a": [true, if (false) { 1 }], 3: "x"}"#);
    insta::assert_snapshot!(result, @"{z: 1, a: [true, null], 3: x}");
}

#[test]
fn test_builtins_over_collections() {
    let source = r#"
        var people = {"alice": 31, "bob": 27};
        [len(people), keys(people), values(people), last(keys(people))];
    "#;
    assert_eq!(
        eval_source(source).to_string(),
        "[2, [alice, bob], [31, 27], bob]"
    );
}

// ============================================
// Rendering and parsing
// ============================================

#[test]
fn test_rendered_program_reparses_to_same_tree() {
    let source = "
        var apply = func(f, x) { f(x) };
        var table = {\"k\": [1, 2 * 3], true: !false};
        if (apply(func(n) { n >= 2 }, 3)) { return table[\"k\"][1] % 4; } else { -1 }
    ";
    let (first, errors) = parse(source);
    assert!(errors.is_empty());
    let (second, errors) = parse(&first.to_string());
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(first, second);
}

#[test]
fn test_parser_accepts_token_vector() {
    let tokens = tokenize("var a = [1, 2]; a[0]");
    let mut parser = Parser::new(tokens.into_iter());
    let program = parser.parse_program();
    assert!(parser.errors().is_empty());
    assert_eq!(
        brisk::eval(&program, &Environment::new().into_ref()),
        Object::Integer(1)
    );
}

#[test]
fn test_parse_errors_are_ordered() {
    let (_, errors) = parse("var x 5; )");
    let messages: Vec<_> = errors.iter().map(|e| e.to_string()).collect();
    assert_eq!(
        messages,
        [
            "expected next token to be =, got INT instead",
            "no prefix parse function for ) found",
        ]
    );
}

#[test]
fn test_deeply_nested_parentheses_evaluate() {
    let depth = 4000;
    let source = format!("{}41 + 1{};", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(eval_source(&source), Object::Integer(42));

    let depth = 2000;
    let source = format!("{}0{};", "(1 + ".repeat(depth), ")".repeat(depth));
    assert_eq!(eval_source(&source), Object::Integer(depth as i64));
}

#[test]
fn test_lexer_returns_eof_forever() {
    let mut lexer = Lexer::new("x");
    assert_eq!(lexer.next_token().kind, TokenKind::Ident);
    for _ in 0..3 {
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }
}

// ============================================
// Environments
// ============================================

#[test]
fn test_fresh_environments_give_identical_results() {
    let (program, errors) = parse(
        "var counter = func(n) { if (n > 0) { counter(n - 1) } else { \"done\" } }; counter(10);",
    );
    assert!(errors.is_empty());

    let first = brisk::eval(&program, &Environment::new().into_ref());
    let second = brisk::eval(&program, &Environment::new().into_ref());
    assert_eq!(first, second);
    assert_eq!(first, Object::string("done"));
}

#[test]
fn test_environments_are_independent() {
    let env_a = Environment::new().into_ref();
    let env_b = Environment::new().into_ref();
    let mut interp = Interpreter::new();

    let (define, _) = parse("var shared = 1;");
    let (read, _) = parse("shared;");
    interp.eval_program(&define, &env_a);

    assert_eq!(interp.eval_program(&read, &env_a), Some(Object::Integer(1)));
    assert_eq!(
        interp.eval_program(&read, &env_b),
        Some(Object::Error("identifier not found: shared".into()))
    );
}

#[test]
fn test_run_source_surfaces_errors() {
    let env = Environment::new().into_ref();
    assert!(matches!(
        brisk::run_source("var = 1;", &env),
        Err(brisk::Error::Parse(errors)) if errors.len() == 2
    ));
    assert!(matches!(
        brisk::run_source("1 + true;", &env),
        Err(brisk::Error::Runtime(message)) if message == "type mismatch: INTEGER + BOOLEAN"
    ));
    assert_eq!(
        brisk::run_source("var z = 3; z * z;", &env).unwrap(),
        Some(Object::Integer(9))
    );
}
