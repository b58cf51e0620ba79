//! Early errors and context-dependent restrictions.

use esz_common::diagnostics::diagnostic_codes;
use esz_parser::{ParseError, ParserOptions, ParserState};

fn script_error(source: &str) -> ParseError {
    match ParserState::new(ParserOptions::default()).parse_script(source) {
        Ok(_) => panic!("{source:?} parsed without error"),
        Err(error) => error,
    }
}

fn module_error(source: &str) -> ParseError {
    match ParserState::new(ParserOptions::default()).parse_module(source) {
        Ok(_) => panic!("{source:?} parsed without error"),
        Err(error) => error,
    }
}

fn assert_script_ok(source: &str) {
    if let Err(error) = ParserState::new(ParserOptions::default()).parse_script(source) {
        panic!("{source:?} failed: {error}");
    }
}

fn assert_script_errors(cases: &[(&str, u32)]) {
    for &(source, code) in cases {
        let error = script_error(source);
        assert_eq!(
            error.code, code,
            "{source:?}: expected {code}, got {} ({})",
            error.code, error.message
        );
    }
}

#[test]
fn test_jump_statement_errors() {
    assert_script_errors(&[
        ("break;", diagnostic_codes::ILLEGAL_BREAK),
        ("continue;", diagnostic_codes::ILLEGAL_CONTINUE),
        ("switch (a) { case 1: continue; }", diagnostic_codes::ILLEGAL_CONTINUE),
        ("while (1) { a: { continue a; } }", diagnostic_codes::CONTINUE_TARGET_NOT_ITERATION),
        ("while (1) break b;", diagnostic_codes::UNDEFINED_LABEL),
        ("a: a: ;", diagnostic_codes::DUPLICATE_LABEL),
        ("return 1;", diagnostic_codes::ILLEGAL_RETURN),
    ]);
    assert_script_ok("a: while (1) { b: for (;;) { continue a; } break a; }");
    assert_script_ok("a: { break a; }");
    assert_script_ok("switch (a) { case 1: break; }");
}

#[test]
fn test_labels_do_not_cross_function_boundaries() {
    let error = script_error("a: while (1) { (function () { break a; }); }");
    assert_eq!(error.code, diagnostic_codes::UNDEFINED_LABEL);
    assert_eq!(error.message, "Undefined label 'a'");
}

#[test]
fn test_return_outside_function_option() {
    let options = ParserOptions::default().with_allow_return_outside_function(true);
    let output = ParserState::new(options).parse_script("return 1;").unwrap();
    assert_eq!(output.root.body().len(), 1);
}

#[test]
fn test_strict_mode_errors() {
    assert_script_errors(&[
        ("'use strict'; with (a) {}", diagnostic_codes::WITH_IN_STRICT_MODE),
        ("'use strict'; delete x;", diagnostic_codes::DELETE_OF_UNQUALIFIED_IDENTIFIER),
        ("'use strict'; delete (x);", diagnostic_codes::DELETE_OF_UNQUALIFIED_IDENTIFIER),
        ("'use strict'; eval = 1;", diagnostic_codes::INVALID_ASSIGNMENT_TARGET_IN_STRICT_MODE),
        ("'use strict'; arguments++;", diagnostic_codes::INVALID_ASSIGNMENT_TARGET_IN_STRICT_MODE),
        ("'use strict'; var eval;", diagnostic_codes::UNEXPECTED_EVAL_OR_ARGUMENTS),
        ("'use strict'; var interface;", diagnostic_codes::UNEXPECTED_STRICT_RESERVED_WORD),
        ("'use strict'; '\\07';", diagnostic_codes::OCTAL_ESCAPES_NOT_ALLOWED_IN_STRICT_MODE),
        ("'use strict'; if (a) function f() {}", diagnostic_codes::FUNCTION_IN_SINGLE_STATEMENT_CONTEXT),
        ("function f() { 'use strict'; var yield; }", diagnostic_codes::UNEXPECTED_STRICT_RESERVED_WORD),
    ]);
    assert_script_ok("with (a) {}");
    assert_script_ok("delete x; eval = 1; var interface, yield;");
    assert_script_ok("if (a) function f() {}");
}

#[test]
fn test_octal_escape_before_use_strict_directive() {
    let error = script_error("function f() { '\\07'; 'use strict'; }");
    assert_eq!(error.code, diagnostic_codes::OCTAL_ESCAPES_NOT_ALLOWED_IN_STRICT_MODE);
}

#[test]
fn test_reserved_words() {
    assert_script_errors(&[
        ("var if;", diagnostic_codes::UNEXPECTED_RESERVED_WORD),
        ("let let = 1;", diagnostic_codes::LET_IN_LEXICAL_BINDING),
        ("function* g() { var yield; }", diagnostic_codes::UNEXPECTED_RESERVED_WORD),
        ("async function f() { var await; }", diagnostic_codes::UNEXPECTED_RESERVED_WORD),
        ("var \\u0069f;", diagnostic_codes::KEYWORD_CONTAINS_ESCAPE),
    ]);
    assert_script_ok("var await, async, of, get, set, let;");
}

#[test]
fn test_declaration_errors() {
    assert_script_errors(&[
        ("let a; let a;", diagnostic_codes::IDENTIFIER_ALREADY_DECLARED),
        ("const a = 1; function a() {}", diagnostic_codes::IDENTIFIER_ALREADY_DECLARED),
        ("{ function a() {} let a; }", diagnostic_codes::IDENTIFIER_ALREADY_DECLARED),
        ("try {} catch ([e]) { var e; }", diagnostic_codes::IDENTIFIER_ALREADY_DECLARED),
        ("const a;", diagnostic_codes::MISSING_INITIALIZER_IN_DECLARATION),
        ("var [a];", diagnostic_codes::MISSING_INITIALIZER_IN_DECLARATION),
        ("if (a) const b = 1;", diagnostic_codes::LEXICAL_DECLARATION_IN_SINGLE_STATEMENT),
        ("while (a) let [b] = c;", diagnostic_codes::LEXICAL_DECLARATION_IN_SINGLE_STATEMENT),
    ]);
    // Annex B: simple catch parameters may be redeclared by `var`.
    assert_script_ok("try {} catch (e) { var e; }");
    assert_script_ok("{ function a() {} function a() {} }");
}

#[test]
fn test_assignment_target_errors() {
    assert_script_errors(&[
        ("1 = a;", diagnostic_codes::INVALID_LEFT_HAND_SIDE_IN_ASSIGNMENT),
        ("a() = 1;", diagnostic_codes::INVALID_LEFT_HAND_SIDE_IN_ASSIGNMENT),
        ("++a();", diagnostic_codes::INVALID_LEFT_HAND_SIDE_IN_ASSIGNMENT),
        ("[a + b] = c;", diagnostic_codes::INVALID_DESTRUCTURING_TARGET),
        ("({ a: 1 } = b);", diagnostic_codes::INVALID_DESTRUCTURING_TARGET),
        ("[...a, b] = c;", diagnostic_codes::REST_ELEMENT_MUST_BE_LAST),
        ("[...a = 1] = c;", diagnostic_codes::REST_ELEMENT_WITH_INITIALIZER),
        ("[...a,] = c;", diagnostic_codes::INVALID_REST_TRAILING_COMMA),
        ("for (a + b of c);", diagnostic_codes::INVALID_LEFT_HAND_SIDE_IN_FOR_LOOP),
        ("({ a = 1 });", diagnostic_codes::INVALID_SHORTHAND_PROPERTY_INITIALIZER),
    ]);
    assert_script_ok("[a, [b.c], { d: e[0] = 1 }, ...f] = g;");
    assert_script_ok("({ a = 1 } = b);");
    assert_script_ok("(a) = 1; [(a)] = b;");
    assert_script_ok("for ([a, b] of c);");
}

#[test]
fn test_for_head_errors() {
    assert_script_errors(&[
        ("for (let a = 1 of b);", diagnostic_codes::FOR_LOOP_HEAD_INITIALIZER),
        ("for (let a, b of c);", diagnostic_codes::FOR_LOOP_HEAD_MULTIPLE_BINDINGS),
        ("for await (a of b);", diagnostic_codes::FOR_AWAIT_OUTSIDE_ASYNC),
    ]);
    // Annex B keeps sloppy `var` initializers in for-in.
    assert_script_ok("for (var a = 1 in b);");
    assert_script_ok("async function f() { for await (const a of b); }");
    assert_script_ok("for (let in a);");
}

#[test]
fn test_function_errors() {
    assert_script_errors(&[
        ("function f(a = 1) { 'use strict'; }", diagnostic_codes::USE_STRICT_WITH_NON_SIMPLE_PARAMETERS),
        ("function f(a, [a]) {}", diagnostic_codes::DUPLICATE_PARAMETER),
        ("(a, a) => 1;", diagnostic_codes::DUPLICATE_PARAMETER),
        ("function* g(a = yield) {}", diagnostic_codes::YIELD_IN_PARAMETERS),
        ("async function f(a = await 1) {}", diagnostic_codes::AWAIT_IN_PARAMETERS),
        ("async function f() { async (a = await 1) => 1; }", diagnostic_codes::AWAIT_IN_PARAMETERS),
        ("({ get a(b) {} });", diagnostic_codes::GETTER_MUST_NOT_HAVE_PARAMETERS),
        ("({ set a() {} });", diagnostic_codes::SETTER_MUST_HAVE_ONE_PARAMETER),
        ("({ set a(...b) {} });", diagnostic_codes::SETTER_PARAMETER_IS_REST),
        ("new.target;", diagnostic_codes::NEW_TARGET_OUTSIDE_FUNCTION),
        ("() => new.target;", diagnostic_codes::NEW_TARGET_OUTSIDE_FUNCTION),
        ("function f() { super.a; }", diagnostic_codes::SUPER_NOT_ALLOWED),
        ("({ a() { super(); } });", diagnostic_codes::SUPER_NOT_ALLOWED),
    ]);
    assert_script_ok("function f() { return () => new.target; }");
    assert_script_ok("({ a() { return () => super.b; } });");
    assert_script_ok("function f(a, a) {}");
}

#[test]
fn test_arrow_line_terminator() {
    let error = script_error("(a)\n=> a");
    assert_eq!(error.code, diagnostic_codes::NEW_LINE_BEFORE_ARROW);
    let error = script_error("async a\n=> a");
    assert_eq!(error.code, diagnostic_codes::NEW_LINE_BEFORE_ARROW);
}

#[test]
fn test_optional_chain_errors() {
    assert_script_errors(&[
        ("a?.b`c`;", diagnostic_codes::OPTIONAL_CHAIN_TEMPLATE),
        ("new a?.b();", diagnostic_codes::OPTIONAL_CHAIN_FROM_NEW),
        ("a?.b = 1;", diagnostic_codes::INVALID_LEFT_HAND_SIDE_IN_ASSIGNMENT),
    ]);
    assert_script_ok("a?.b?.[c]?.(d).e;");
}

#[test]
fn test_statement_errors() {
    assert_script_errors(&[
        ("try {}", diagnostic_codes::MISSING_CATCH_OR_FINALLY),
        ("switch (a) { default: default: }", diagnostic_codes::MULTIPLE_DEFAULTS_IN_SWITCH),
        ("import a from 'b';", diagnostic_codes::STATEMENT_OUTSIDE_MODULE),
        ("import.meta;", diagnostic_codes::IMPORT_META_OUTSIDE_MODULE),
    ]);
    assert_script_ok("import('a'); import('a', { with: {} });");
}

#[test]
fn test_regular_expression_errors() {
    let error = script_error("/(/;");
    assert_eq!(error.code, diagnostic_codes::INVALID_REGULAR_EXPRESSION);
    let error = script_error("/a/gg;");
    assert_eq!(error.code, diagnostic_codes::INVALID_REGEXP_FLAGS);
    let error = script_error("/\\p{Nope}/u;");
    assert_eq!(error.code, diagnostic_codes::INVALID_REGULAR_EXPRESSION);
    assert_script_ok("/\\p{Nope}/; /\\p{Lu}/u;");
}

#[test]
fn test_module_context_errors() {
    let cases = [
        ("var interface;", diagnostic_codes::UNEXPECTED_STRICT_RESERVED_WORD),
        ("010;", diagnostic_codes::OCTAL_LITERALS_NOT_ALLOWED_IN_STRICT_MODE),
        ("function f() { var await; }", diagnostic_codes::UNEXPECTED_RESERVED_WORD),
        ("var a; let a;", diagnostic_codes::IDENTIFIER_ALREADY_DECLARED),
        ("function a() {} function a() {}", diagnostic_codes::IDENTIFIER_ALREADY_DECLARED),
        ("{ export var a; }", diagnostic_codes::IMPORT_EXPORT_NOT_AT_TOP_LEVEL),
        ("<!-- a", diagnostic_codes::UNEXPECTED_TOKEN),
    ];
    for (source, code) in cases {
        let error = module_error(source);
        assert_eq!(error.code, code, "{source:?}: got {}", error.message);
    }
}
