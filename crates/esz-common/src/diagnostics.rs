//! Diagnostic types and message lookup shared by the scanner, parser and
//! regex translator.
//!
//! Every diagnostic has a stable numeric code and a message template with
//! `{0}`, `{1}`, ... placeholders. Codes are grouped by category:
//!
//! | Range | Category |
//! |-------|----------|
//! | 1xxx  | [`DiagnosticCategory::Lexical`] |
//! | 2xxx  | [`DiagnosticCategory::Syntax`] |
//! | 3xxx  | [`DiagnosticCategory::Early`] |
//! | 4xxx  | [`DiagnosticCategory::Regex`] |

use crate::position::{Location, Position, Range};
use serde::Serialize;
use std::fmt;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCategory {
    /// Malformed tokens: bad escapes, unterminated literals, bad numerics.
    Lexical,
    /// Token sequences the grammar does not accept.
    Syntax,
    /// Static-semantics errors on otherwise grammatical input.
    Early,
    /// A valid regular expression the host engine cannot express.
    Regex,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiagnosticCategory::Lexical => "lexical",
            DiagnosticCategory::Syntax => "syntax",
            DiagnosticCategory::Early => "early",
            DiagnosticCategory::Regex => "regex",
        })
    }
}

/// A single recorded problem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub message: String,
    pub range: Range,
    /// 0-based line of `range.start`.
    pub line: u32,
    /// 0-based byte column of `range.start`.
    pub column: u32,
}

impl Diagnostic {
    /// Build a diagnostic for `code`, taking the category from the message table.
    #[must_use]
    pub fn new(code: u32, message: String, range: Range, start: Position) -> Self {
        Diagnostic {
            category: get_diagnostic_category(code).unwrap_or(DiagnosticCategory::Syntax),
            code,
            message,
            range,
            line: start.line,
            column: start.column,
        }
    }

    /// Build a diagnostic from a code and its template arguments.
    #[must_use]
    pub fn from_code(code: u32, args: &[&str], range: Range, start: Position) -> Self {
        let message = get_message_template(code)
            .map(|template| format_message(template, args))
            .unwrap_or_default();
        Diagnostic::new(code, message, range, start)
    }

    #[must_use]
    pub fn at_location(code: u32, args: &[&str], range: Range, location: Location) -> Self {
        Diagnostic::from_code(code, args, range, location.start)
    }

    #[must_use]
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line {}, column {}: {} (ES{})",
            self.line + 1,
            self.column + 1,
            self.message,
            self.code
        )
    }
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}

/// Get the category for a diagnostic code.
#[must_use]
pub fn get_diagnostic_category(code: u32) -> Option<DiagnosticCategory> {
    get_diagnostic_message(code).map(|m| m.category)
}

// =============================================================================
// Message Data
// =============================================================================

macro_rules! define_diagnostics {
    ($($name:ident = $code:literal, $category:ident, $message:literal;)*) => {
        pub mod diagnostic_codes {
            $(pub const $name: u32 = $code;)*
        }

        pub mod diagnostic_messages {
            $(pub const $name: &str = $message;)*
        }

        pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
            $(DiagnosticMessage {
                code: $code,
                category: DiagnosticCategory::$category,
                message: $message,
            },)*
        ];
    };
}

define_diagnostics! {
    // Lexical
    INVALID_OR_UNEXPECTED_TOKEN = 1001, Lexical, "Invalid or unexpected token";
    UNTERMINATED_STRING_LITERAL = 1002, Lexical, "Unterminated string literal.";
    UNTERMINATED_TEMPLATE_LITERAL = 1003, Lexical, "Unterminated template literal.";
    UNTERMINATED_COMMENT = 1004, Lexical, "Unterminated comment.";
    UNTERMINATED_REGEXP_LITERAL = 1005, Lexical, "Unterminated regular expression literal.";
    INVALID_REGEXP_FLAGS = 1006, Lexical, "Invalid regular expression flags '{0}'.";
    INVALID_HEXADECIMAL_ESCAPE_SEQUENCE = 1007, Lexical, "Invalid hexadecimal escape sequence.";
    INVALID_UNICODE_ESCAPE_SEQUENCE = 1008, Lexical, "Invalid Unicode escape sequence.";
    UNICODE_ESCAPE_OUT_OF_RANGE = 1009, Lexical, "An extended Unicode escape value must be between 0x0 and 0x10FFFF inclusive.";
    INVALID_ESCAPED_IDENTIFIER_CHARACTER = 1010, Lexical, "Invalid escaped character in identifier.";
    NUMERIC_SEPARATORS_NOT_ALLOWED_HERE = 1011, Lexical, "Numeric separators are not allowed here.";
    MULTIPLE_CONSECUTIVE_NUMERIC_SEPARATORS = 1012, Lexical, "Multiple consecutive numeric separators are not permitted.";
    IDENTIFIER_DIRECTLY_AFTER_NUMERIC_LITERAL = 1013, Lexical, "An identifier or keyword cannot immediately follow a numeric literal.";
    DIGIT_EXPECTED = 1014, Lexical, "Digit expected.";
    HEXADECIMAL_DIGIT_EXPECTED = 1015, Lexical, "Hexadecimal digit expected.";
    INVALID_BIGINT_LITERAL = 1016, Lexical, "Invalid BigInt literal.";
    OCTAL_LITERALS_NOT_ALLOWED_IN_STRICT_MODE = 1017, Lexical, "Octal literals are not allowed in strict mode.";
    OCTAL_ESCAPES_NOT_ALLOWED_IN_STRICT_MODE = 1018, Lexical, "Octal escape sequences are not allowed in strict mode.";
    OCTAL_ESCAPES_NOT_ALLOWED_IN_TEMPLATES = 1019, Lexical, "Octal escape sequences are not allowed in template strings.";
    KEYWORD_CONTAINS_ESCAPE = 1020, Lexical, "Keywords cannot contain escape characters.";
    INVALID_CHARACTER = 1021, Lexical, "Invalid character.";
    DECIMALS_WITH_LEADING_ZERO_IN_STRICT_MODE = 1022, Lexical, "Decimals with leading zeros are not allowed in strict mode.";
    UNTERMINATED_JSX_STRING = 1023, Lexical, "Unterminated string in JSX attribute.";

    // Syntax
    UNEXPECTED_TOKEN = 2001, Syntax, "Unexpected token {0}";
    UNEXPECTED_END_OF_INPUT = 2002, Syntax, "Unexpected end of input";
    EXPECTED = 2003, Syntax, "'{0}' expected.";
    IDENTIFIER_EXPECTED = 2004, Syntax, "Identifier expected.";
    EXPRESSION_EXPECTED = 2005, Syntax, "Expression expected.";
    INVALID_LEFT_HAND_SIDE_IN_ASSIGNMENT = 2007, Syntax, "Invalid left-hand side in assignment";
    INVALID_LEFT_HAND_SIDE_IN_FOR_LOOP = 2008, Syntax, "Invalid left-hand side in for-{0} loop";
    INVALID_DESTRUCTURING_TARGET = 2009, Syntax, "Invalid destructuring assignment target";
    ILLEGAL_NEWLINE_AFTER_THROW = 2010, Syntax, "Illegal newline after throw";
    MISSING_CATCH_OR_FINALLY = 2011, Syntax, "Missing catch or finally after try";
    MULTIPLE_DEFAULTS_IN_SWITCH = 2012, Syntax, "More than one default clause in switch statement";
    REST_ELEMENT_MUST_BE_LAST = 2013, Syntax, "Rest element must be last element";
    REST_ELEMENT_WITH_INITIALIZER = 2014, Syntax, "Rest elements cannot have a default value";
    INVALID_SHORTHAND_PROPERTY_INITIALIZER = 2015, Syntax, "Invalid shorthand property initializer";
    MISSING_INITIALIZER_IN_DECLARATION = 2016, Syntax, "Missing initializer in {0} declaration";
    FOR_LOOP_HEAD_INITIALIZER = 2017, Syntax, "for-{0} loop variable declaration may not have an initializer.";
    FOR_LOOP_HEAD_MULTIPLE_BINDINGS = 2018, Syntax, "Invalid left-hand side in for-{0} loop: Must have a single binding.";
    OPTIONAL_CHAIN_TEMPLATE = 2025, Syntax, "Invalid tagged template on optional chain";
    OPTIONAL_CHAIN_FROM_NEW = 2026, Syntax, "Invalid optional chain from new expression";
    MAXIMUM_NESTING_DEPTH_EXCEEDED = 2027, Syntax, "Maximum nesting depth exceeded";
    LEXICAL_DECLARATION_IN_SINGLE_STATEMENT = 2028, Syntax, "Lexical declaration cannot appear in a single-statement context";
    STATEMENT_OUTSIDE_MODULE = 2030, Syntax, "Cannot use {0} statement outside a module";
    IMPORT_EXPORT_NOT_AT_TOP_LEVEL = 2031, Syntax, "'import' and 'export' may only appear at the top level";
    INVALID_REGULAR_EXPRESSION = 2032, Syntax, "Invalid regular expression: /{0}/{1}: {2}";
    GETTER_MUST_NOT_HAVE_PARAMETERS = 2033, Syntax, "Getter must not have any formal parameters.";
    SETTER_MUST_HAVE_ONE_PARAMETER = 2034, Syntax, "Setter must have exactly one formal parameter.";
    SETTER_PARAMETER_IS_REST = 2035, Syntax, "Setter function argument must not be a rest parameter";
    UNARY_BEFORE_EXPONENTIATION = 2046, Syntax, "Unary operator used immediately before exponentiation expression. Parenthesis must be used to disambiguate operator precedence";
    FOR_AWAIT_OUTSIDE_ASYNC = 2051, Syntax, "for await is only valid in async functions and the top level bodies of modules";
    JSX_CLOSING_TAG_MISMATCH = 2052, Syntax, "Expected corresponding JSX closing tag for '{0}'";
    JSX_ADJACENT_ELEMENTS = 2053, Syntax, "Adjacent JSX elements must be wrapped in an enclosing tag";
    INVALID_REST_TRAILING_COMMA = 2054, Syntax, "A rest element may not have a trailing comma";
    NEW_LINE_BEFORE_ARROW = 2055, Syntax, "Line terminator not permitted before arrow";
    INVALID_CONTINUATION_TOKEN = 2056, Syntax, "Unexpected template continuation";
    JSX_EMPTY_ATTRIBUTE_EXPRESSION = 2057, Syntax, "JSX attributes must only be assigned a non-empty expression";

    // Early
    UNEXPECTED_STRICT_RESERVED_WORD = 3001, Early, "Unexpected strict mode reserved word";
    UNEXPECTED_EVAL_OR_ARGUMENTS = 3002, Early, "Unexpected eval or arguments in strict mode";
    DELETE_OF_UNQUALIFIED_IDENTIFIER = 3003, Early, "Delete of an unqualified identifier in strict mode.";
    WITH_IN_STRICT_MODE = 3004, Early, "Strict mode code may not include a with statement";
    FUNCTION_IN_SINGLE_STATEMENT_CONTEXT = 3005, Early, "In strict mode code, functions can only be declared at top level or inside a block.";
    DUPLICATE_PARAMETER = 3006, Early, "Duplicate parameter name not allowed in this context";
    USE_STRICT_WITH_NON_SIMPLE_PARAMETERS = 3007, Early, "Illegal 'use strict' directive in function with non-simple parameter list";
    IDENTIFIER_ALREADY_DECLARED = 3008, Early, "Identifier '{0}' has already been declared";
    LET_IN_LEXICAL_BINDING = 3009, Early, "let is disallowed as a lexically bound name";
    DUPLICATE_PROTO = 3010, Early, "Duplicate __proto__ fields are not allowed in object literals";
    MIXED_NULLISH_COALESCING = 3011, Early, "Cannot mix '??' with '&&' or '||' without parentheses";
    UNEXPECTED_RESERVED_WORD = 3012, Early, "Unexpected reserved word";
    DUPLICATE_EXPORT = 3013, Early, "Duplicate export of '{0}'";
    EXPORT_NOT_DEFINED = 3014, Early, "Export '{0}' is not defined in module";
    ILLEGAL_BREAK = 3019, Early, "Illegal break statement";
    ILLEGAL_CONTINUE = 3020, Early, "Illegal continue statement: no surrounding iteration statement";
    UNDEFINED_LABEL = 3021, Early, "Undefined label '{0}'";
    DUPLICATE_LABEL = 3022, Early, "Label '{0}' has already been declared";
    ILLEGAL_RETURN = 3023, Early, "Illegal return statement";
    CONTINUE_TARGET_NOT_ITERATION = 3024, Early, "Illegal continue statement: '{0}' does not denote an iteration statement";
    NEW_TARGET_OUTSIDE_FUNCTION = 3037, Early, "new.target expression is not allowed here";
    IMPORT_META_OUTSIDE_MODULE = 3038, Early, "Cannot use 'import.meta' outside a module";
    SUPER_NOT_ALLOWED = 3039, Early, "'super' keyword unexpected here";
    DUPLICATE_CONSTRUCTOR = 3040, Early, "A class may only have one constructor";
    INVALID_CONSTRUCTOR_KIND = 3041, Early, "Class constructor may not be {0}";
    FIELD_NAMED_CONSTRUCTOR = 3042, Early, "Classes may not have a field named 'constructor'";
    STATIC_PROTOTYPE = 3043, Early, "Classes may not have a static property named 'prototype'";
    DUPLICATE_PRIVATE_NAME = 3044, Early, "Identifier '#{0}' has already been declared";
    UNDECLARED_PRIVATE_NAME = 3045, Early, "Private field '#{0}' must be declared in an enclosing class";
    DELETE_PRIVATE_FIELD = 3046, Early, "Private fields can not be deleted";
    PRIVATE_NAME_CONSTRUCTOR = 3047, Early, "Classes may not have a private field named '#constructor'";
    MALFORMED_EXPORT_NAME = 3048, Early, "An export name cannot include a lone surrogate";
    YIELD_IN_PARAMETERS = 3049, Early, "Yield expression not allowed in formal parameter";
    AWAIT_IN_PARAMETERS = 3050, Early, "Illegal await-expression in formal parameters of async function";
    DUPLICATE_IMPORT_ATTRIBUTE = 3051, Early, "Import attribute has duplicate key '{0}'";
    ARGUMENTS_IN_CLASS_FIELD = 3059, Early, "'arguments' is not allowed in class field initializer or static initialization block";
    INVALID_ASSIGNMENT_TARGET_IN_STRICT_MODE = 3060, Early, "Assignment to '{0}' is not allowed in strict mode";

    // Regex
    CANNOT_TRANSLATE_REGULAR_EXPRESSION = 4001, Regex, "Cannot translate regular expression /{0}/{1}: {2}";
    REGULAR_EXPRESSION_TIMEOUT = 4002, Regex, "Regular expression translation timed out: /{0}/{1}";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_message_fills_placeholders_in_order() {
        let text = format_message(diagnostic_messages::INVALID_REGULAR_EXPRESSION, &["a(", "u", "Unterminated group"]);
        assert_eq!(text, "Invalid regular expression: /a(/u: Unterminated group");
    }

    #[test]
    fn codes_are_unique_and_match_category_ranges() {
        let mut seen = rustc_hash::FxHashSet::default();
        for entry in DIAGNOSTIC_MESSAGES {
            assert!(seen.insert(entry.code), "duplicate code {}", entry.code);
            let expected = match entry.code / 1000 {
                1 => DiagnosticCategory::Lexical,
                2 => DiagnosticCategory::Syntax,
                3 => DiagnosticCategory::Early,
                4 => DiagnosticCategory::Regex,
                _ => panic!("code {} outside known ranges", entry.code),
            };
            assert_eq!(entry.category, expected, "code {}", entry.code);
        }
    }

    #[test]
    fn from_code_takes_category_from_table() {
        let diag = Diagnostic::from_code(
            diagnostic_codes::DUPLICATE_PROTO,
            &[],
            Range::new(10, 19),
            Position::new(0, 10),
        );
        assert_eq!(diag.category, DiagnosticCategory::Early);
        assert_eq!(diag.message, diagnostic_messages::DUPLICATE_PROTO);
        assert_eq!(diag.to_string(), format!("Line 1, column 11: {} (ES3010)", diag.message));
    }

    #[test]
    fn diagnostics_serialize_with_position_fields() {
        let diag = Diagnostic::from_code(
            diagnostic_codes::UNEXPECTED_TOKEN,
            &["'}'"],
            Range::new(3, 4),
            Position::new(1, 2),
        );
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["category"], "Syntax");
        assert_eq!(json["code"], 2001);
        assert_eq!(json["line"], 1);
        assert_eq!(json["column"], 2);
        assert_eq!(json["range"]["start"], 3);
        assert_eq!(json["message"], "Unexpected token '}'");
    }
}
