//! Regular expression literals and generic tree traversal.

use std::time::Duration;

use esz_common::DiagnosticCategory;
use esz_common::diagnostics::diagnostic_codes;
use esz_parser::ast::*;
use esz_parser::{ParseOutput, ParserOptions, ParserState};

fn parse_with(options: ParserOptions, source: &str) -> ParseOutput<Program> {
    ParserState::new(options)
        .parse_script(source)
        .unwrap_or_else(|e| panic!("{source:?} failed: {e}"))
}

fn regexp_literal(program: &Program) -> &RegExpLiteral {
    let Some(Statement::Expression(statement)) = program.body().first() else {
        panic!("expected an expression statement");
    };
    match &statement.expression {
        Expression::Literal(literal) => match &literal.value {
            LiteralValue::RegExp(regexp) => regexp,
            _ => panic!("expected a regex literal"),
        },
        other => panic!("expected literal, got {:?}", other.kind()),
    }
}

fn adapting() -> ParserOptions {
    ParserOptions::default().with_adapt_regexp(true)
}

// =============================================================================
// Regular expression literals
// =============================================================================

#[test]
fn test_regexp_is_not_translated_by_default() {
    let output = parse_with(ParserOptions::default(), "/a+b/gi;");
    let regexp = regexp_literal(&output.root);
    assert_eq!(regexp.pattern.as_str(), "a+b");
    assert_eq!(regexp.flags.as_str(), "gi");
    assert!(regexp.translated.is_none());
}

#[test]
fn test_regexp_translation() {
    let output = parse_with(adapting(), r"/(?<year>\d{4})-(?<month>\d\d)/u;");
    let regexp = regexp_literal(&output.root);
    let translated = regexp.translated.as_ref().expect("translated");
    assert_eq!(translated.capture_count, 2);
    assert_eq!(translated.group_index("year"), Some(1));
    assert_eq!(translated.group_index("month"), Some(2));

    let compiled = translated.compile().expect("compiles");
    let captures = compiled.captures("on 2024-10").expect("matches");
    assert_eq!(captures.get(1).map(|m| m.as_str()), Some("2024"));
}

#[test]
fn test_astral_class_range_in_unicode_mode() {
    let output = parse_with(adapting(), "/[💩-💫]/u;");
    let translated = regexp_literal(&output.root)
        .translated
        .as_ref()
        .expect("translated");
    let compiled = translated.compile().expect("compiles");
    assert!(compiled.is_match("💪"));
    assert!(!compiled.is_match("💨"));
}

#[test]
fn test_untranslatable_regexp_is_recorded() {
    let output = parse_with(adapting(), r"/(a)\1/;");
    assert!(regexp_literal(&output.root).translated.is_none());
    assert_eq!(output.diagnostics.len(), 1);
    let diagnostic = &output.diagnostics[0];
    assert_eq!(diagnostic.code, diagnostic_codes::CANNOT_TRANSLATE_REGULAR_EXPRESSION);
    assert_eq!(diagnostic.category, DiagnosticCategory::Regex);
}

#[test]
fn test_required_translation_fails_the_parse() {
    let options = adapting().with_require_regexp_adaptation(true);
    let error = match ParserState::new(options).parse_script(r"/(a)\1/;") {
        Ok(_) => panic!("backreference translated"),
        Err(error) => error,
    };
    assert_eq!(error.code, diagnostic_codes::CANNOT_TRANSLATE_REGULAR_EXPRESSION);
    assert_eq!(error.category, DiagnosticCategory::Regex);
}

#[test]
fn test_translation_timeout() {
    let options = adapting().with_regex_timeout(Duration::ZERO);
    let source = format!("/{}/;", "(?:a|b)".repeat(2_000));
    let output = parse_with(options, &source);
    assert!(regexp_literal(&output.root).translated.is_none());
    let codes: Vec<u32> = output.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, [diagnostic_codes::REGULAR_EXPRESSION_TIMEOUT]);
}

#[test]
fn test_invalid_pattern_is_an_error_even_when_adapting() {
    let error = match ParserState::new(adapting()).parse_script("/(?<n>a)(?<n>b)/;") {
        Ok(_) => panic!("duplicate group name accepted"),
        Err(error) => error,
    };
    assert_eq!(error.code, diagnostic_codes::INVALID_REGULAR_EXPRESSION);
}

// =============================================================================
// NodeRef
// =============================================================================

#[test]
fn test_descendant_kinds_in_source_order() {
    let output = parse_with(ParserOptions::default(), "a + b;");
    let kinds = NodeRef::from(&output.root).descendants_kinds();
    assert_eq!(
        kinds,
        [
            NodeKind::Script,
            NodeKind::Expression,
            NodeKind::Binary,
            NodeKind::Identifier,
            NodeKind::Identifier
        ]
    );
}

#[test]
fn test_children_skip_absent_parts() {
    let output = parse_with(ParserOptions::default(), "function f() { return; }");
    let statement = &output.root.body()[0];
    let function = NodeRef::from(statement);
    assert_eq!(function.kind(), NodeKind::FunctionDeclaration);
    let children: Vec<NodeKind> = function.children().iter().map(|c| c.kind()).collect();
    assert_eq!(children, [NodeKind::Identifier, NodeKind::FunctionBody]);

    let kinds = function.descendants_kinds();
    assert_eq!(kinds.last(), Some(&NodeKind::Return));
}

#[test]
fn test_child_ranges_nest_within_parents() {
    let source = "for (const [a, { b = 1 }] of list) { if (a) label: x = `t${b}`; }";
    let output = parse_with(ParserOptions::default(), source);
    let mut stack = vec![NodeRef::from(&output.root)];
    let mut visited = 0;
    while let Some(node) = stack.pop() {
        visited += 1;
        let range = node.range();
        for child in node.children() {
            let inner = child.range();
            assert!(
                inner.start >= range.start && inner.end <= range.end,
                "{:?} {inner:?} escapes {:?} {range:?}",
                child.kind(),
                node.kind()
            );
            stack.push(child);
        }
    }
    assert!(visited > 15);
}
