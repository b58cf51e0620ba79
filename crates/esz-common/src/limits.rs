//! Centralized limits and thresholds for the esz front end.
//!
//! Shared constants for recursion depths, deadlines and size ceilings.
//! Each of these is a default; callers can override the per-parse values
//! through `ParserOptions` and `TranslateOptions`.
//!
//! # Categories
//!
//! - **Recursion Depths**: Limits to prevent stack overflow in the recursive-descent parser
//! - **Deadlines**: Wall-clock limits on work whose cost depends on input shape
//! - **Capacity Limits**: Maximum sizes handed to the host regex engine

use std::time::Duration;

// =============================================================================
// Recursion Depth Limits (Parser)
// =============================================================================

/// Maximum nesting depth of assignment expressions and statements.
///
/// Every nested parenthesized expression, array/object literal, function body,
/// block or template substitution enters one level of this counter. When the
/// ceiling is hit the parser reports "Maximum nesting depth exceeded" instead
/// of overflowing the native stack.
///
/// # ECMAScript example
///
/// ```javascript
/// // Pathologically nested parentheses:
/// x = ((((((((((((((((((((((((1 /* ... hundreds of levels ... */))))))))))));
///
/// // Deeply nested array literals:
/// [[[[[[[[[[[[[[[[[[[[[[[[[[[[[[ /* ... */ ]]]]]]]]]]]]]]]]]]]]]]]]]]]]]];
/// ```
///
/// The parser grows its stack on the heap when it runs low, so this ceiling
/// bounds work and tree depth rather than the native stack.
pub const MAX_ASSIGNMENT_DEPTH: u32 = 512;

/// Remaining native stack below which the parser switches to a fresh
/// heap-allocated segment.
pub const PARSER_STACK_RED_ZONE: usize = 128 * 1024;

/// Size of each heap-allocated stack segment the parser grows into.
pub const PARSER_STACK_SEGMENT: usize = 2 * 1024 * 1024;

// =============================================================================
// Deadlines (Regex translation)
// =============================================================================

/// Default wall-clock budget for translating a single regular expression.
///
/// The translator checks the deadline while parsing the pattern, while
/// building code point sets and while emitting, so a crafted pattern with
/// huge class unions or repetition counts fails with a `Timeout` error rather
/// than stalling the parse.
pub const DEFAULT_REGEX_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// Capacity Limits (Regex translation)
// =============================================================================

/// Compiled-program size limit passed to the host regex builder.
///
/// Mirrors the host engine's own default so a translated pattern that compiles
/// standalone also compiles here.
pub const MAX_REGEX_SIZE: usize = 10 * (1 << 20);

/// Largest `{n,m}` bound accepted before the translator reports the pattern as
/// unsupported. The host rejects repetition counts above this.
pub const MAX_REGEX_REPETITION: u32 = 1_000;
