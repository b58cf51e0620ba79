//! Entry points of the root crate.

use std::time::Duration;

use esz::ast::{Expression, NodeKind, NodeRef, Statement};
use esz::{
    DiagnosticCategory, ParserOptions, RegexErrorKind, SyntaxKind, TranslateOptions,
    diagnostic_codes,
};
use rayon::prelude::*;

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn test_parse_script_and_module() {
    let script = esz::parse_script("var a = 1; a += 2;", ParserOptions::default()).unwrap();
    assert!(!script.root.is_module());
    assert_eq!(script.root.body().len(), 2);
    assert!(script.diagnostics.is_empty());

    let module = esz::parse_module("export const b = 2;", ParserOptions::default()).unwrap();
    assert!(module.root.is_module());
    assert!(module.root.is_strict());
}

#[test]
fn test_parse_expression() {
    let output = esz::parse_expression("a ? b : c", ParserOptions::default()).unwrap();
    assert!(matches!(output.root, Expression::Conditional(_)));

    let error = esz::parse_expression("a b", ParserOptions::default()).unwrap_err();
    assert_eq!(error.code, diagnostic_codes::UNEXPECTED_TOKEN);
}

#[test]
fn test_error_display_is_one_based() {
    let error = esz::parse_script("var a;\nvar 1;", ParserOptions::default()).unwrap_err();
    assert_eq!(error.line, 1);
    assert!(error.to_string().starts_with("Line 2: "), "{error}");
}

#[test]
fn test_tolerant_parse_returns_tree_and_diagnostics() {
    let options = ParserOptions::default().with_tolerant(true);
    let output = esz::parse_script("({ __proto__: 1, __proto__: 2 });", options).unwrap();
    assert_eq!(output.root.body().len(), 1);
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].category, DiagnosticCategory::Early);

    let error = esz::parse_script("({ __proto__: 1, __proto__: 2 });", ParserOptions::default())
        .unwrap_err();
    assert_eq!(error.code, output.diagnostics[0].code);
    assert_eq!(error.message, output.diagnostics[0].message);
}

#[test]
fn test_diagnostics_serialize() {
    let options = ParserOptions::default().with_tolerant(true);
    let output = esz::parse_script("({ __proto__: 1, __proto__: 2 });", options).unwrap();
    let json = serde_json::to_value(&output.diagnostics).unwrap();
    let first = &json[0];
    assert_eq!(first["code"], output.diagnostics[0].code);
    assert!(first["message"].is_string());
    assert!(first["line"].is_u64());
}

#[test]
fn test_parses_in_parallel() {
    let sources: Vec<String> = (0..32)
        .map(|i| format!("function f{i}(a, b = {i}) {{ return a * b + {i}; }}"))
        .collect();
    let counts: Vec<usize> = sources
        .par_iter()
        .map(|source| {
            let output = esz::parse_script(source, ParserOptions::default()).unwrap();
            NodeRef::from(&output.root).descendants_kinds().len()
        })
        .collect();
    assert!(counts.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn test_hoisting_through_root_api() {
    let output = esz::parse_script(
        "function p() { if (true) { var x; } function q() {} }",
        ParserOptions::default(),
    )
    .unwrap();
    let Statement::FunctionDeclaration(p) = &output.root.body()[0] else {
        panic!("expected function declaration");
    };
    assert!(p.hoisting.declares_var("x"));
    assert!(p.hoisting.declares_function("q"));
    assert_eq!(
        NodeRef::from(&output.root.body()[0]).kind(),
        NodeKind::FunctionDeclaration
    );
}

// =============================================================================
// Tokenizing
// =============================================================================

fn kinds(source: &str) -> Vec<SyntaxKind> {
    esz::tokenize(source, ParserOptions::default())
        .unwrap()
        .root
        .iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_slash_disambiguation() {
    assert_eq!(
        kinds("a / b"),
        [SyntaxKind::Identifier, SyntaxKind::SlashToken, SyntaxKind::Identifier]
    );
    assert_eq!(
        kinds("x = /b/g"),
        [
            SyntaxKind::Identifier,
            SyntaxKind::EqualsToken,
            SyntaxKind::RegularExpressionLiteral
        ]
    );
    assert_eq!(
        kinds("if (a) /b/.test(c)")[4],
        SyntaxKind::RegularExpressionLiteral
    );
}

#[test]
fn test_tokenize_templates() {
    assert_eq!(
        kinds("`a${b}c${d}e`"),
        [
            SyntaxKind::TemplateHead,
            SyntaxKind::Identifier,
            SyntaxKind::TemplateMiddle,
            SyntaxKind::Identifier,
            SyntaxKind::TemplateTail
        ]
    );
}

#[test]
fn test_tokenize_comments_and_errors() {
    let options = ParserOptions::default().with_comments(true);
    let output = esz::tokenize("a // one\n/* two */ b", options).unwrap();
    assert_eq!(output.root.len(), 2);
    assert_eq!(output.comments.map(|c| c.len()), Some(2));
    assert!(output.tokens.is_none());

    let error = esz::tokenize("'abc", ParserOptions::default()).unwrap_err();
    assert_eq!(error.code, diagnostic_codes::UNTERMINATED_STRING_LITERAL);
    assert_eq!(error.category, DiagnosticCategory::Lexical);

    let tolerant = esz::tokenize("'abc", ParserOptions::default().with_tolerant(true)).unwrap();
    assert_eq!(tolerant.root.len(), 1);
    assert_eq!(tolerant.diagnostics.len(), 1);
}

// =============================================================================
// Regex translation
// =============================================================================

#[test]
fn test_translate_astral_range() {
    let translated = esz::translate_regexp("[💩-💫]", "u", &TranslateOptions::default()).unwrap();
    let regex = translated.compile().unwrap();
    for matching in ["💩", "💪", "💫"] {
        assert!(regex.is_match(matching), "{matching} should match");
    }
    for other in ["a", "💬"] {
        assert!(!regex.is_match(other), "{other} should not match");
    }
}

#[test]
fn test_translate_duplicate_group_names_across_alternatives() {
    let translated =
        esz::translate_regexp(r"(?<y>\d{4})-\d\d|\d\d/(?<y>\d{4})", "", &TranslateOptions::default())
            .unwrap();
    assert_eq!(translated.group_indices("y").len(), 2);
}

#[test]
fn test_translate_errors() {
    let options = TranslateOptions::default();
    let syntax = esz::translate_regexp("(", "", &options).unwrap_err();
    assert_eq!(syntax.kind(), RegexErrorKind::Syntax);

    let unsupported = esz::translate_regexp(r"(?<=a)b", "", &options).unwrap_err();
    assert_eq!(unsupported.kind(), RegexErrorKind::Unsupported);

    let pattern = "(?:a|b)".repeat(2_000);
    let timeout = esz::translate_regexp(&pattern, "", &options.with_timeout(Duration::ZERO))
        .unwrap_err();
    assert_eq!(timeout.kind(), RegexErrorKind::Timeout);
}

// =============================================================================
// Tracing
// =============================================================================

#[test]
fn test_init_tracing_without_environment_is_a_no_op() {
    esz::tracing_config::init_tracing();
    let output = esz::parse_script("a;", ParserOptions::default()).unwrap();
    assert_eq!(output.root.body().len(), 1);
}
