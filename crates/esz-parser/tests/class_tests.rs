//! Class bodies: methods, fields, static blocks and private names.

use esz_common::diagnostics::diagnostic_codes;
use esz_parser::ast::*;
use esz_parser::{ParseOutput, ParserOptions, ParserState};

fn script(source: &str) -> ParseOutput<Program> {
    ParserState::new(ParserOptions::default())
        .parse_script(source)
        .unwrap_or_else(|e| panic!("{source:?} failed: {e}"))
}

fn class_body(output: &ParseOutput<Program>) -> &NodeList<ClassElement> {
    match &output.root.body()[0] {
        Statement::ClassDeclaration(class) => &class.body.body,
        other => panic!("expected class declaration, got {:?}", other.kind()),
    }
}

fn assert_errors(cases: &[(&str, u32)]) {
    for &(source, code) in cases {
        match ParserState::new(ParserOptions::default()).parse_script(source) {
            Ok(_) => panic!("{source:?} parsed without error"),
            Err(error) => assert_eq!(
                error.code, code,
                "{source:?}: expected {code}, got {} ({})",
                error.code, error.message
            ),
        }
    }
}

// =============================================================================
// Elements
// =============================================================================

#[test]
fn test_class_element_kinds() {
    let output = script(
        "class A extends B {\n  constructor() { super(); }\n  static async *gen() {}\n  get x() { return 1; }\n  set x(v) {}\n  y = 1;\n  static z;\n  #p = 2;\n  static { this.z = 3; }\n  ['computed']() {}\n}",
    );
    let elements = class_body(&output);
    assert_eq!(elements.len(), 9);

    let methods: Vec<(MethodKind, bool)> = elements
        .iter()
        .filter_map(|element| match element {
            ClassElement::Method(method) => Some((method.kind, method.is_static)),
            _ => None,
        })
        .collect();
    assert_eq!(
        methods,
        [
            (MethodKind::Constructor, false),
            (MethodKind::Method, true),
            (MethodKind::Get, false),
            (MethodKind::Set, false),
            (MethodKind::Method, false),
        ]
    );

    let ClassElement::Method(generator) = &elements[1] else {
        panic!("expected method");
    };
    assert!(generator.value.is_async);
    assert!(generator.value.is_generator);

    let fields: Vec<bool> = elements
        .iter()
        .filter_map(|element| match element {
            ClassElement::Property(field) => Some(field.value.is_some()),
            _ => None,
        })
        .collect();
    assert_eq!(fields, [true, false, true]);
    assert!(matches!(elements[7], ClassElement::StaticBlock(_)));
}

#[test]
fn test_modifier_names_as_keys() {
    let output = script("class A { static() {} get() {} set = 1; async; static static() {} }");
    let elements = class_body(&output);
    assert_eq!(elements.len(), 5);
    let ClassElement::Method(first) = &elements[0] else {
        panic!("expected method");
    };
    assert_eq!(first.key.static_name(), Some("static"));
    assert!(!first.is_static);
    let ClassElement::Method(last) = &elements[4] else {
        panic!("expected method");
    };
    assert!(last.is_static);
    assert_eq!(last.key.static_name(), Some("static"));
}

#[test]
fn test_class_code_is_strict() {
    assert_errors(&[
        ("class A { m() { with (a) {} } }", diagnostic_codes::WITH_IN_STRICT_MODE),
        ("class A { m(eval) {} }", diagnostic_codes::UNEXPECTED_EVAL_OR_ARGUMENTS),
    ]);
    // The code around the class stays sloppy.
    script("class A {} with (a) {}");
}

#[test]
fn test_class_expression_name_is_optional() {
    let output = script("(class {}); (class Named extends Base {});");
    assert_eq!(output.root.body().len(), 2);
    assert_errors(&[("class {}", diagnostic_codes::UNEXPECTED_TOKEN)]);
}

// =============================================================================
// Constructors and special names
// =============================================================================

#[test]
fn test_constructor_errors() {
    assert_errors(&[
        ("class A { constructor() {} constructor() {} }", diagnostic_codes::DUPLICATE_CONSTRUCTOR),
        ("class A { get constructor() {} }", diagnostic_codes::INVALID_CONSTRUCTOR_KIND),
        ("class A { set constructor(v) {} }", diagnostic_codes::INVALID_CONSTRUCTOR_KIND),
        ("class A { async constructor() {} }", diagnostic_codes::INVALID_CONSTRUCTOR_KIND),
        ("class A { *constructor() {} }", diagnostic_codes::INVALID_CONSTRUCTOR_KIND),
        ("class A { constructor = 1; }", diagnostic_codes::FIELD_NAMED_CONSTRUCTOR),
        ("class A { 'constructor'; }", diagnostic_codes::FIELD_NAMED_CONSTRUCTOR),
        ("class A { static prototype() {} }", diagnostic_codes::STATIC_PROTOTYPE),
        ("class A { static prototype = 1; }", diagnostic_codes::STATIC_PROTOTYPE),
    ]);

    let message = match ParserState::new(ParserOptions::default())
        .parse_script("class A { get constructor() {} }")
    {
        Ok(_) => panic!("getter constructor accepted"),
        Err(error) => error.message,
    };
    assert_eq!(message, "Class constructor may not be a getter");

    // Static and computed names are not constructors.
    script("class A { constructor() {} static constructor() {} ['constructor']() {} }");
    script("class A { prototype() {} static ['prototype']() {} }");
}

#[test]
fn test_super_placement() {
    assert_errors(&[
        ("class A { constructor() { super(); } }", diagnostic_codes::SUPER_NOT_ALLOWED),
        ("class A extends B { m() { super(); } }", diagnostic_codes::SUPER_NOT_ALLOWED),
        ("function f() { super.x; }", diagnostic_codes::SUPER_NOT_ALLOWED),
    ]);
    script("class A extends B { constructor() { super(); } m() { return super.m(); } }");
    script("class A { m() { return super.toString(); } static s() { super.x; } }");
    script("class A extends B { x = super.y; }");
}

// =============================================================================
// Private names
// =============================================================================

#[test]
fn test_private_names_resolve_within_class() {
    let output = script(
        "class A {\n  #x = 1;\n  #m() { return this.#x; }\n  static has(o) { return #x in o; }\n  get #a() { return 1; }\n  set #a(v) {}\n}",
    );
    let elements = class_body(&output);
    let ClassElement::Property(field) = &elements[0] else {
        panic!("expected field");
    };
    match &field.key {
        PropertyKey::PrivateIdentifier(private) => assert_eq!(private.name.as_str(), "x"),
        _ => panic!("expected private key"),
    }
}

#[test]
fn test_private_names_resolve_in_enclosing_class() {
    script("class Outer { #secret; m() { return class { read(o) { return o.#secret; } }; } }");
    // Used before its declaration.
    script("class A { m() { return this.#later; } #later; }");
}

#[test]
fn test_private_name_errors() {
    assert_errors(&[
        ("class A { #x; #x; }", diagnostic_codes::DUPLICATE_PRIVATE_NAME),
        ("class A { #x; #x() {} }", diagnostic_codes::DUPLICATE_PRIVATE_NAME),
        ("class A { get #a() {} static set #a(v) {} }", diagnostic_codes::DUPLICATE_PRIVATE_NAME),
        ("class A { m() { this.#missing; } }", diagnostic_codes::UNDECLARED_PRIVATE_NAME),
        ("this.#x;", diagnostic_codes::UNDECLARED_PRIVATE_NAME),
        ("class A { #constructor; }", diagnostic_codes::PRIVATE_NAME_CONSTRUCTOR),
        ("class A { #x; m() { delete this.#x; } }", diagnostic_codes::DELETE_PRIVATE_FIELD),
    ]);

    let error = match ParserState::new(ParserOptions::default())
        .parse_script("class A { m() { this.#missing; } }")
    {
        Ok(_) => panic!("undeclared private name accepted"),
        Err(error) => error,
    };
    assert_eq!(
        error.message,
        "Private field '#missing' must be declared in an enclosing class"
    );
}

// =============================================================================
// Field initializers and static blocks
// =============================================================================

#[test]
fn test_arguments_in_field_initializers() {
    assert_errors(&[
        ("class A { x = arguments; }", diagnostic_codes::ARGUMENTS_IN_CLASS_FIELD),
        ("class A { x = () => arguments; }", diagnostic_codes::ARGUMENTS_IN_CLASS_FIELD),
        ("class A { static { arguments; } }", diagnostic_codes::ARGUMENTS_IN_CLASS_FIELD),
    ]);
    script("class A { x = function () { return arguments; }; }");
    script("class A { m() { return arguments; } }");
}

#[test]
fn test_static_block_scope() {
    let output = script("class A { static { var a = 1; let b; function c() {} } }");
    let ClassElement::StaticBlock(block) = &class_body(&output)[0] else {
        panic!("expected static block");
    };
    assert_eq!(block.body.len(), 3);
    let names: Vec<&str> = block.hoisting.var_names.iter().map(|n| n.as_str()).collect();
    assert_eq!(names, ["a"]);
    assert!(block.hoisting.declares_function("c"));

    assert_errors(&[
        ("class A { static { return; } }", diagnostic_codes::ILLEGAL_RETURN),
        ("class A { static { let a; var a; } }", diagnostic_codes::IDENTIFIER_ALREADY_DECLARED),
    ]);
}
