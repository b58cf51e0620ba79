//! Import and export declarations, module-only restrictions.

use esz_common::diagnostics::diagnostic_codes;
use esz_parser::ast::*;
use esz_parser::{ParseError, ParseOutput, ParserOptions, ParserState};

fn module(source: &str) -> ParseOutput<Program> {
    ParserState::new(ParserOptions::default())
        .parse_module(source)
        .unwrap_or_else(|e| panic!("{source:?} failed: {e}"))
}

fn module_error(source: &str) -> ParseError {
    match ParserState::new(ParserOptions::default()).parse_module(source) {
        Ok(_) => panic!("{source:?} parsed without error"),
        Err(error) => error,
    }
}

// =============================================================================
// Imports
// =============================================================================

#[test]
fn test_import_clause_forms() {
    let output = module(
        "import a, { b as c, 'd e' as f, g } from 'm';\nimport * as ns from 'n';\nimport 'side-effect';",
    );
    assert!(output.root.is_module());
    let body = output.root.body();
    assert_eq!(body.len(), 3);

    let Statement::Import(first) = &body[0] else {
        panic!("expected import, got {:?}", body[0].kind());
    };
    let locals: Vec<&str> = first.specifiers.iter().map(|s| s.local().name.as_str()).collect();
    assert_eq!(locals, ["a", "c", "f", "g"]);
    assert!(matches!(first.specifiers[0], ImportClause::Default(_)));
    match &first.specifiers[2] {
        ImportClause::Named(named) => {
            assert!(matches!(named.imported, ModuleExportName::Literal(_)));
            assert_eq!(named.imported.name(), "d e");
        }
        _ => panic!("expected named import"),
    }
    assert_eq!(first.source.as_str(), Some("m"));

    let Statement::Import(second) = &body[1] else {
        panic!("expected import");
    };
    assert!(matches!(second.specifiers[0], ImportClause::Namespace(_)));

    let Statement::Import(third) = &body[2] else {
        panic!("expected import");
    };
    assert!(third.specifiers.is_empty());

    let hoisting = output.root.hoisting();
    for name in ["a", "c", "f", "g", "ns"] {
        assert!(
            hoisting.lexical_names.iter().any(|n| n.as_str() == name),
            "{name} should be a lexical binding"
        );
    }
}

#[test]
fn test_import_attributes() {
    let output = module("import data from './data.json' with { type: 'json' };");
    let Statement::Import(import) = &output.root.body()[0] else {
        panic!("expected import");
    };
    assert_eq!(import.attributes.len(), 1);
    assert_eq!(import.attributes[0].key.name(), "type");
    assert_eq!(import.attributes[0].value.as_str(), Some("json"));
}

#[test]
fn test_duplicate_import_attribute() {
    let error = module_error("import a from 'b' with { type: 'json', 'type': 'css' };");
    assert_eq!(error.code, diagnostic_codes::DUPLICATE_IMPORT_ATTRIBUTE);
    assert_eq!(error.message, "Import attribute has duplicate key 'type'");
}

#[test]
fn test_import_binding_errors() {
    let cases: &[(&str, u32)] = &[
        ("import { 'a' } from 'm';", diagnostic_codes::UNEXPECTED_TOKEN),
        ("import a, b from 'm';", diagnostic_codes::UNEXPECTED_TOKEN),
        ("import a from 'm'; let a;", diagnostic_codes::IDENTIFIER_ALREADY_DECLARED),
        ("import { a, b as a } from 'm';", diagnostic_codes::IDENTIFIER_ALREADY_DECLARED),
        ("function f() { import a from 'm'; }", diagnostic_codes::IMPORT_EXPORT_NOT_AT_TOP_LEVEL),
    ];
    for &(source, code) in cases {
        let error = module_error(source);
        assert_eq!(error.code, code, "{source:?}: got {} ({})", error.code, error.message);
    }
}

#[test]
fn test_import_declaration_is_module_only() {
    let result = ParserState::new(ParserOptions::default()).parse_script("import a from 'm';");
    assert!(result.is_err());
}

// =============================================================================
// Exports
// =============================================================================

#[test]
fn test_export_named_specifiers() {
    let output = module("var a, b; export { a, b as c, a as 'd e' };");
    let Statement::ExportNamed(export) = &output.root.body()[1] else {
        panic!("expected export");
    };
    assert!(export.declaration.is_none());
    assert!(export.source.is_none());
    let pairs: Vec<(&str, &str)> = export
        .specifiers
        .iter()
        .map(|s| (s.local.name(), s.exported.name()))
        .collect();
    assert_eq!(pairs, [("a", "a"), ("b", "c"), ("a", "d e")]);
}

#[test]
fn test_export_declarations() {
    let output = module(
        "export var a = 1;\nexport let b;\nexport const c = 2;\nexport function d() {}\nexport async function e() {}\nexport class F {}",
    );
    let body = output.root.body();
    assert_eq!(body.len(), 6);
    for statement in body.iter() {
        match statement {
            Statement::ExportNamed(export) => assert!(export.declaration.is_some()),
            other => panic!("expected named export, got {:?}", other.kind()),
        }
    }
    assert!(output.root.hoisting().declares_function("d"));
}

#[test]
fn test_export_default_forms() {
    let cases = [
        "export default function () {}",
        "export default function named() {}",
        "export default async function () {}",
        "export default class {}",
        "export default a = 1;",
        "export default (1, 2);",
    ];
    for source in cases {
        let output = module(source);
        assert!(
            matches!(output.root.body()[0], Statement::ExportDefault(_)),
            "{source:?}"
        );
    }

    let output = module("export default function () {}");
    let Statement::ExportDefault(export) = &output.root.body()[0] else {
        panic!("expected default export");
    };
    match &export.declaration {
        ExportDefaultKind::Function(function) => assert!(function.id.is_none()),
        _ => panic!("expected function"),
    }
}

#[test]
fn test_export_all() {
    let output = module("export * from 'a';\nexport * as ns from 'b';\nexport * as 'x y' from 'c';");
    let exported: Vec<Option<&str>> = output
        .root
        .body()
        .iter()
        .map(|statement| match statement {
            Statement::ExportAll(all) => all.exported.as_ref().map(ModuleExportName::name),
            other => panic!("expected export all, got {:?}", other.kind()),
        })
        .collect();
    assert_eq!(exported, [None, Some("ns"), Some("x y")]);
}

#[test]
fn test_reexport_allows_string_and_reserved_locals() {
    let output = module("export { 'a b' as c, default, if as d } from 'm';");
    let Statement::ExportNamed(export) = &output.root.body()[0] else {
        panic!("expected export");
    };
    assert_eq!(export.specifiers.len(), 3);
    assert_eq!(export.source.as_ref().and_then(Literal::as_str), Some("m"));
}

#[test]
fn test_local_export_rejects_string_and_reserved_names() {
    for source in ["export { 'a' };", "export { default };", "export { if };"] {
        let error = module_error(source);
        assert_eq!(error.code, diagnostic_codes::UNEXPECTED_TOKEN, "{source:?}");
    }
}

#[test]
fn test_duplicate_exports() {
    let cases = [
        ("export default 1; export default 2;", "default"),
        ("var a; export { a }; export { a };", "a"),
        ("export var a; var b; export { b as a };", "a"),
        ("export function f() {} export let f2; export { f2 as f };", "f"),
        ("export * as ns from 'm'; var ns; export { ns };", "ns"),
    ];
    for (source, name) in cases {
        let error = module_error(source);
        assert_eq!(error.code, diagnostic_codes::DUPLICATE_EXPORT, "{source:?}");
        assert_eq!(error.message, format!("Duplicate export of '{name}'"));
    }
}

#[test]
fn test_export_of_undeclared_name() {
    let error = module_error("export { missing };");
    assert_eq!(error.code, diagnostic_codes::EXPORT_NOT_DEFINED);
    assert_eq!(error.message, "Export 'missing' is not defined in module");

    // Declarations after the export still count.
    module("export { a, f, C }; var a; function f() {} class C {}");
    module("import x from 'm'; export { x };");
}

#[test]
fn test_undefined_exports_in_tolerant_mode() {
    let output = ParserState::new(ParserOptions::default().with_tolerant(true))
        .parse_module("export { b, a };")
        .unwrap_or_else(|e| panic!("tolerant parse failed: {e}"));
    let names: Vec<&str> = output
        .diagnostics
        .iter()
        .filter(|d| d.code == diagnostic_codes::EXPORT_NOT_DEFINED)
        .map(|d| d.message.as_str())
        .collect();
    assert_eq!(
        names,
        [
            "Export 'b' is not defined in module",
            "Export 'a' is not defined in module"
        ]
    );
}

// =============================================================================
// Module context
// =============================================================================

#[test]
fn test_top_level_await() {
    let output = module("await fetch(url);");
    let Statement::Expression(statement) = &output.root.body()[0] else {
        panic!("expected expression statement");
    };
    assert!(matches!(statement.expression, Expression::Await(_)));

    // In a script `await` is an ordinary identifier.
    let script = ParserState::new(ParserOptions::default())
        .parse_script("var await = 1;")
        .unwrap_or_else(|e| panic!("script failed: {e}"));
    assert_eq!(script.root.body().len(), 1);
}

#[test]
fn test_import_meta() {
    let output = module("import.meta.url;");
    let Statement::Expression(statement) = &output.root.body()[0] else {
        panic!("expected expression statement");
    };
    let Expression::Member(member) = &statement.expression else {
        panic!("expected member expression");
    };
    match &member.object {
        Expression::MetaProperty(meta) => {
            assert_eq!(meta.meta.name.as_str(), "import");
            assert_eq!(meta.property.name.as_str(), "meta");
        }
        other => panic!("expected meta property, got {:?}", other.kind()),
    }
}

#[test]
fn test_module_is_strict() {
    let output = module("x = 1;");
    assert!(output.root.is_strict());
    assert_eq!(
        module_error("with (a) {}").code,
        diagnostic_codes::WITH_IN_STRICT_MODE
    );
    assert_eq!(
        module_error("var eval;").code,
        diagnostic_codes::UNEXPECTED_EVAL_OR_ARGUMENTS
    );
}
