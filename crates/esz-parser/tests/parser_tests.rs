use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use esz_common::DiagnosticCategory;
use esz_common::diagnostics::diagnostic_codes;
use esz_parser::ast::*;
use esz_parser::{ParseError, ParseOutput, ParserOptions, ParserState};
use num_bigint::BigInt;

fn script(source: &str) -> ParseOutput<Program> {
    ParserState::new(ParserOptions::default())
        .parse_script(source)
        .unwrap_or_else(|e| panic!("{source:?} failed: {e}"))
}

fn script_error(source: &str) -> ParseError {
    match ParserState::new(ParserOptions::default()).parse_script(source) {
        Ok(_) => panic!("{source:?} parsed without error"),
        Err(error) => error,
    }
}

fn expression(source: &str) -> Expression {
    ParserState::new(ParserOptions::default())
        .parse_expression(source)
        .unwrap_or_else(|e| panic!("{source:?} failed: {e}"))
        .root
}

fn expression_statement(statement: &Statement) -> &Expression {
    match statement {
        Statement::Expression(s) => &s.expression,
        other => panic!("expected expression statement, got {:?}", other.kind()),
    }
}

// =============================================================================
// ASI
// =============================================================================

#[test]
fn test_asi_postfix_update_on_next_line() {
    let output = script("a++\nb++");
    let body = output.root.body();
    assert_eq!(body.len(), 2);
    for statement in body.iter() {
        match expression_statement(statement) {
            Expression::Update(update) => {
                assert!(!update.prefix);
                assert_eq!(update.operator, UpdateOperator::Increment);
            }
            other => panic!("expected update, got {:?}", other.kind()),
        }
    }
}

#[test]
fn test_asi_prefix_update_after_line_break() {
    let output = script("a\n++b");
    let body = output.root.body();
    assert_eq!(body.len(), 2);
    match expression_statement(&body[1]) {
        Expression::Update(update) => assert!(update.prefix),
        other => panic!("expected update, got {:?}", other.kind()),
    }
}

#[test]
fn test_asi_restricted_return() {
    let output = script("function f() { return\na }");
    let Statement::FunctionDeclaration(f) = &output.root.body()[0] else {
        panic!("expected function declaration");
    };
    let body = &f.body.body;
    assert_eq!(body.len(), 2);
    match &body[0] {
        Statement::Return(ret) => assert!(ret.argument.is_none()),
        other => panic!("expected return, got {:?}", other.kind()),
    }
    assert!(matches!(expression_statement(&body[1]), Expression::Identifier(_)));
}

#[test]
fn test_asi_newline_after_throw_is_an_error() {
    let error = script_error("throw\nnew Error()");
    assert_eq!(error.code, diagnostic_codes::ILLEGAL_NEWLINE_AFTER_THROW);
}

#[test]
fn test_asi_missing_semicolon_on_same_line() {
    let error = script_error("a b");
    assert_eq!(error.code, diagnostic_codes::UNEXPECTED_TOKEN);
    assert_eq!(error.message, "Unexpected token 'b'");
    assert_eq!((error.line, error.column), (0, 2));
}

#[test]
fn test_asi_before_close_brace_and_eof() {
    let output = script("{ a } b");
    assert_eq!(output.root.body().len(), 2);
}

// =============================================================================
// Precedence
// =============================================================================

#[test]
fn test_precedence_unary_operand() {
    match expression("a + -b") {
        Expression::Binary(binary) => {
            assert_eq!(binary.operator, BinaryOperator::Add);
            match &binary.right {
                Expression::Unary(unary) => assert_eq!(unary.operator, UnaryOperator::Minus),
                other => panic!("expected unary, got {:?}", other.kind()),
            }
        }
        other => panic!("expected binary, got {:?}", other.kind()),
    }
}

#[test]
fn test_precedence_multiplicative_binds_tighter() {
    match expression("a + b * c") {
        Expression::Binary(binary) => {
            assert_eq!(binary.operator, BinaryOperator::Add);
            assert!(matches!(&binary.right, Expression::Binary(b) if b.operator == BinaryOperator::Multiply));
        }
        other => panic!("expected binary, got {:?}", other.kind()),
    }
}

#[test]
fn test_exponent_is_right_associative() {
    match expression("a ** b ** c") {
        Expression::Binary(binary) => {
            assert_eq!(binary.operator, BinaryOperator::Exponent);
            assert!(matches!(binary.left, Expression::Identifier(_)));
            assert!(matches!(&binary.right, Expression::Binary(b) if b.operator == BinaryOperator::Exponent));
        }
        other => panic!("expected binary, got {:?}", other.kind()),
    }
}

#[test]
fn test_unary_before_exponent_is_an_error() {
    let error = script_error("-a ** 2");
    assert_eq!(error.code, diagnostic_codes::UNARY_BEFORE_EXPONENTIATION);
    // Parenthesized is fine.
    script("(-a) ** 2");
}

#[test]
fn test_nullish_mixed_with_logical_is_an_error() {
    let error = script_error("a ?? b && c");
    assert_eq!(error.code, diagnostic_codes::MIXED_NULLISH_COALESCING);
    assert_eq!(error.category, DiagnosticCategory::Early);
    assert_eq!(script_error("a || b ?? c").code, diagnostic_codes::MIXED_NULLISH_COALESCING);
}

#[test]
fn test_parenthesized_nullish_is_allowed() {
    match expression("(a ?? b) && c") {
        Expression::Logical(logical) => {
            assert_eq!(logical.operator, LogicalOperator::And);
            assert!(matches!(
                &logical.left,
                Expression::Logical(l) if l.operator == LogicalOperator::NullishCoalescing
            ));
        }
        other => panic!("expected logical, got {:?}", other.kind()),
    }
}

#[test]
fn test_in_is_suppressed_in_for_init() {
    let output = script("for ((a in b); ;);\nfor (a in b);");
    let body = output.root.body();
    assert!(matches!(body[0], Statement::For(_)));
    assert!(matches!(body[1], Statement::ForIn(_)));
}

#[test]
fn test_conditional_and_assignment() {
    match expression("x = a ? b : c") {
        Expression::Assignment(assignment) => {
            assert_eq!(assignment.operator, AssignmentOperator::Assign);
            assert!(matches!(assignment.left, Pattern::Identifier(_)));
            assert!(matches!(assignment.right, Expression::Conditional(_)));
        }
        other => panic!("expected assignment, got {:?}", other.kind()),
    }
}

// =============================================================================
// Numerics
// =============================================================================

fn literal(source: &str) -> Literal {
    match expression(source) {
        Expression::Literal(literal) => *literal,
        other => panic!("expected literal, got {:?}", other.kind()),
    }
}

#[test]
fn test_bigint_hex_with_separators() {
    let lit = literal("0xfedc_ba98_7654_3210n");
    let expected: BigInt = "18364758544493064720".parse().unwrap();
    assert!(matches!(lit.value, LiteralValue::BigInt(ref value) if *value == expected));
    assert_eq!(lit.raw.as_str(), "0xfedc_ba98_7654_3210n");
}

#[test]
fn test_non_octal_decimal_in_sloppy_mode() {
    assert_eq!(literal("018.1").as_number(), Some(18.1));
    assert_eq!(literal("010").as_number(), Some(8.0));
}

#[test]
fn test_non_octal_decimal_bigint_is_lexical_error() {
    let error = ParserState::new(ParserOptions::default())
        .parse_expression("018.1n")
        .unwrap_err();
    assert_eq!(error.category, DiagnosticCategory::Lexical);
}

#[test]
fn test_legacy_octal_in_strict_mode() {
    let error = script_error("'use strict'; 010");
    assert_eq!(error.code, diagnostic_codes::OCTAL_LITERALS_NOT_ALLOWED_IN_STRICT_MODE);
    let error = script_error("'use strict'; 08");
    assert_eq!(error.code, diagnostic_codes::DECIMALS_WITH_LEADING_ZERO_IN_STRICT_MODE);
}

// =============================================================================
// Hoisting
// =============================================================================

#[test]
fn test_hoisting_nested_var_and_function() {
    let output = script("function p(){ if (true) { var x; } function q(){} }");
    let Statement::FunctionDeclaration(p) = &output.root.body()[0] else {
        panic!("expected function declaration");
    };
    let vars: Vec<_> = p.hoisting.var_names.iter().map(|a| a.as_str()).collect();
    let functions: Vec<_> = p.hoisting.function_declarations.iter().map(|a| a.as_str()).collect();
    assert_eq!(vars, ["x"]);
    assert_eq!(functions, ["q"]);

    let Statement::FunctionDeclaration(q) = &p.body.body[1] else {
        panic!("expected nested function declaration");
    };
    assert!(q.hoisting.is_empty());

    let top = output.root.hoisting();
    assert!(top.declares_function("p"));
    assert!(!top.declares_var("x"));
}

#[test]
fn test_hoisting_skips_nested_functions_and_collects_loops() {
    let output = script("for (var i = 0; i < 1; i++) { try {} catch (e) { var y; } }\nlet z;\nvar f = function () { var inner; };");
    let hoisting = output.root.hoisting();
    let vars: Vec<_> = hoisting.var_names.iter().map(|a| a.as_str()).collect();
    assert_eq!(vars, ["i", "y", "f"]);
    let lexical: Vec<_> = hoisting.lexical_names.iter().map(|a| a.as_str()).collect();
    assert_eq!(lexical, ["z"]);
}

#[test]
fn test_redeclaration_of_lexical_name() {
    let error = script_error("let a; var a;");
    assert_eq!(error.code, diagnostic_codes::IDENTIFIER_ALREADY_DECLARED);
    assert_eq!(error.message, "Identifier 'a' has already been declared");
    script("var a; var a; function b() {} function b() {}");
}

// =============================================================================
// Directives and strictness
// =============================================================================

#[test]
fn test_use_strict_directive() {
    let output = script("'use strict'; a");
    assert!(output.root.is_strict());
    assert!(matches!(output.root.body()[0], Statement::Directive(_)));

    let output = script("a; 'use strict'");
    assert!(!output.root.is_strict());
}

#[test]
fn test_use_strict_with_non_simple_parameters() {
    let error = script_error("function f(a = 1) { 'use strict'; }");
    assert_eq!(error.code, diagnostic_codes::USE_STRICT_WITH_NON_SIMPLE_PARAMETERS);
}

#[test]
fn test_use_strict_revalidates_function_name() {
    let error = script_error("function eval() { 'use strict'; }");
    assert_eq!(error.code, diagnostic_codes::UNEXPECTED_EVAL_OR_ARGUMENTS);
}

#[test]
fn test_use_strict_revalidates_duplicate_parameters() {
    script("function f(a, a) {}");
    let error = script_error("function f(a, a) { 'use strict'; }");
    assert_eq!(error.code, diagnostic_codes::DUPLICATE_PARAMETER);
}

// =============================================================================
// Tolerant mode
// =============================================================================

#[test]
fn test_duplicate_proto_is_recorded_in_tolerant_mode() {
    let source = "x = { __proto__: a, __proto__: b }";
    let output = ParserState::new(ParserOptions::default().with_tolerant(true))
        .parse_script(source)
        .unwrap();
    assert_eq!(output.root.body().len(), 1);
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].code, diagnostic_codes::DUPLICATE_PROTO);

    let error = script_error(source);
    assert_eq!(error.code, diagnostic_codes::DUPLICATE_PROTO);
    assert_eq!(error.message, output.diagnostics[0].message);
}

#[test]
fn test_duplicate_proto_allowed_in_pattern() {
    script("({ __proto__: a, __proto__: b } = c)");
}

#[test]
fn test_tolerant_mode_resynchronizes_at_statement_boundary() {
    let output = ParserState::new(ParserOptions::default().with_tolerant(true))
        .parse_script("var a = ;\nvar b = 1;\nc(")
        .unwrap();
    assert!(output.diagnostics.len() >= 2);
    assert!(
        output
            .root
            .body()
            .iter()
            .any(|s| matches!(s, Statement::VariableDeclaration(_)))
    );
    let starts: Vec<_> = output.diagnostics.iter().map(|d| d.range.start).collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
}

// =============================================================================
// Arrow functions
// =============================================================================

fn arrow(source: &str) -> Box<ArrowFunction> {
    match expression(source) {
        Expression::ArrowFunction(arrow) => arrow,
        other => panic!("{source:?}: expected arrow, got {:?}", other.kind()),
    }
}

#[test]
fn test_arrow_parameters_take_defaults() {
    for source in ["(a = 1) => a", "(a = 1) => {}", "async (a = 1) => a"] {
        let func = arrow(source);
        assert!(matches!(func.params[0], Pattern::Assignment(_)), "{source:?}");
    }
    let func = arrow("(a, b = 1) => a");
    assert!(matches!(func.params[0], Pattern::Identifier(_)));
    assert!(matches!(func.params[1], Pattern::Assignment(_)));
    let func = arrow("({a} = {}) => a");
    match &func.params[0] {
        Pattern::Assignment(assignment) => assert!(matches!(assignment.left, Pattern::Object(_))),
        other => panic!("expected default, got {other:?}"),
    }
}

#[test]
fn test_async_as_arrow_parameter() {
    let func = arrow("async => 1");
    assert!(!func.is_async);
    match &func.params[..] {
        [Pattern::Identifier(id)] => assert_eq!(id.name, "async"),
        other => panic!("expected one identifier parameter, got {other:?}"),
    }
    match expression("x = async => async") {
        Expression::Assignment(assignment) => {
            assert!(matches!(assignment.right, Expression::ArrowFunction(_)));
        }
        other => panic!("expected assignment, got {:?}", other.kind()),
    }
    assert!(arrow("async a => a").is_async);
}

#[test]
fn test_in_operator_inside_closures_in_for_init() {
    script("for (var f = () => { return 'a' in b; }; ;) break;");
    script("for (var f = function () { return 'a' in b; }; ;) break;");
    script("for (var a = (b in c); ;) break;");
}

// =============================================================================
// Identifiers
// =============================================================================

#[test]
fn test_id_start_characters_outside_xid() {
    for name in ["\u{309B}", "\u{037A}", "\u{0E33}", "\u{FC5E}", "a\u{FF9E}"] {
        script(&format!("var {name};"));
    }
    script(r"var \u309B\u309C;");
}

// =============================================================================
// Tokens, comments and observers
// =============================================================================

#[test]
fn test_tokens_and_comments_are_collected() {
    let options = ParserOptions::default().with_tokens(true).with_comments(true);
    let output = ParserState::new(options)
        .parse_script("/* lead */ a = 1; // tail")
        .unwrap();
    let tokens = output.tokens.unwrap();
    let raws: Vec<_> = tokens.iter().map(|t| t.raw.as_str()).collect();
    assert_eq!(raws, ["a", "=", "1", ";"]);
    let comments = output.comments.unwrap();
    assert_eq!(comments.len(), 2);
}

#[test]
fn test_regex_token_is_recorded_once() {
    let options = ParserOptions::default().with_tokens(true);
    let output = ParserState::new(options).parse_script("x = /a+/g").unwrap();
    let tokens = output.tokens.unwrap();
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[2].raw.as_str(), "/a+/g");
}

#[test]
fn test_node_observer_sees_every_node() {
    let identifiers = Arc::new(AtomicUsize::new(0));
    let total = Arc::new(AtomicUsize::new(0));
    let options = {
        let identifiers = Arc::clone(&identifiers);
        let total = Arc::clone(&total);
        ParserOptions::default().with_node_observer(move |kind, range| {
            assert!(range.end >= range.start);
            total.fetch_add(1, Ordering::Relaxed);
            if kind == NodeKind::Identifier {
                identifiers.fetch_add(1, Ordering::Relaxed);
            }
        })
    };
    ParserState::new(options).parse_script("a + b;").unwrap();
    assert_eq!(identifiers.load(Ordering::Relaxed), 2);
    // Script, statement, binary, two identifiers.
    assert_eq!(total.load(Ordering::Relaxed), 5);
}

// =============================================================================
// Stability and resources
// =============================================================================

const STABILITY_SOURCE: &str = r#"
label: for (const [k, { v = 1, ...rest }] of entries) {
    if (k in rest) continue label;
    async function* gen(a, b = a ?? 2) { yield* await b; }
}
class A extends B { #x = 1; static { this.y = new.target; } get z() { return this.#x; } }
const t = tag`a${1}b${x => x ** 2}c`;
var o = { a, [b]: c, ...d, e() {}, async *f() {} }, r = /[a-z]+/giu;
"#;

#[test]
fn test_repeat_parse_is_stable() {
    let mut parser = ParserState::new(ParserOptions::default());
    let first = parser.parse_script(STABILITY_SOURCE).unwrap();
    let second = parser.parse_script(STABILITY_SOURCE).unwrap();
    let first_kinds = NodeRef::from(&first.root).descendants_kinds();
    let second_kinds = NodeRef::from(&second.root).descendants_kinds();
    assert!(first_kinds.len() > 40);
    assert_eq!(first_kinds, second_kinds);
}

#[test]
fn test_parser_is_reusable_after_error() {
    let mut parser = ParserState::new(ParserOptions::default());
    assert!(parser.parse_script("let let = 1").is_err());
    let output = parser.parse_script("let a = 1").unwrap();
    assert!(output.diagnostics.is_empty());
    assert_eq!(output.root.body().len(), 1);
}

#[test]
fn test_concurrent_parsers_agree() {
    use rayon::prelude::*;

    let expected = NodeRef::from(&script(STABILITY_SOURCE).root).descendants_kinds();
    let results: Vec<Vec<NodeKind>> = (0..16)
        .into_par_iter()
        .map(|_| {
            let output = ParserState::new(ParserOptions::default())
                .parse_script(STABILITY_SOURCE)
                .unwrap();
            NodeRef::from(&output.root).descendants_kinds()
        })
        .collect();
    assert!(results.iter().all(|kinds| *kinds == expected));
}

#[test]
fn test_trees_can_be_shared_across_threads() {
    let output = script("a = [1, 2, 3]");
    let root = Arc::new(output.root);
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let root = Arc::clone(&root);
            std::thread::spawn(move || {
                let _ = root.base().user_data.set(i);
                NodeRef::from(&*root).descendants_kinds().len()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), NodeRef::from(&*root).descendants_kinds().len());
    }
    assert!(root.base().user_data.is_set());
}

/// Run `f` on a thread with a stack large enough for unoptimized builds.
fn with_large_stack<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap()
}

#[test]
fn test_deep_nesting_hits_limit() {
    with_large_stack(|| {
        let depth = 5_000;
        let source = format!("{}a{}", "(".repeat(depth), ")".repeat(depth));
        let options = ParserOptions::default().with_max_assignment_depth(200);
        let error = ParserState::new(options).parse_script(&source).unwrap_err();
        assert_eq!(error.code, diagnostic_codes::MAXIMUM_NESTING_DEPTH_EXCEEDED);

        let shallow = format!("{}a{}", "(".repeat(50), ")".repeat(50));
        script(&shallow);
    });
}

#[test]
fn test_deep_array_nesting_with_default_limit() {
    with_large_stack(|| {
        let depth = 100_000;
        let source = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let error = ParserState::new(ParserOptions::default()).parse_script(&source).unwrap_err();
        assert_eq!(error.code, diagnostic_codes::MAXIMUM_NESTING_DEPTH_EXCEEDED);
    });
}

/// Run `f` on a thread with the platform's usual 2 MiB stack.
fn with_small_stack<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    std::thread::Builder::new()
        .stack_size(2 << 20)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap()
}

#[test]
fn test_nesting_at_the_default_limit_fits_a_small_stack() {
    with_small_stack(|| {
        let depth = 400;
        script(&format!("{}{}", "[".repeat(depth), "]".repeat(depth)));
        script(&format!("{}a{}", "(".repeat(depth / 2), ")".repeat(depth / 2)));
        script(&format!("{}{}", "function f() {".repeat(depth / 4), "}".repeat(depth / 4)));
        let source = format!("{}{}", "[".repeat(100_000), "]".repeat(100_000));
        let error = ParserState::new(ParserOptions::default()).parse_script(&source).unwrap_err();
        assert_eq!(error.code, diagnostic_codes::MAXIMUM_NESTING_DEPTH_EXCEEDED);
    });
}

#[test]
fn test_long_new_chain_hits_limit() {
    with_small_stack(|| {
        let source = format!("{}x", "new ".repeat(100_000));
        let error = script_error(&source);
        assert_eq!(error.code, diagnostic_codes::MAXIMUM_NESTING_DEPTH_EXCEEDED);
        script(&format!("{}x", "new ".repeat(100)));
    });
}

#[test]
fn test_long_binary_chain_on_a_small_stack() {
    with_small_stack(|| {
        let source = format!("a{}", " ** a".repeat(100_000));
        let error = script_error(&source);
        assert_eq!(error.code, diagnostic_codes::MAXIMUM_NESTING_DEPTH_EXCEEDED);
        script(&format!("a{}", " + a".repeat(100_000)));
    });
}
