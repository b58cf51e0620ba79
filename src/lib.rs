//! esz: an ECMAScript front end.
//!
//! Turns source text into a typed syntax tree, checking early errors,
//! strict mode and hoisting in the same pass. Regular expression literals
//! can be translated for the `regex` crate.
//!
//! The work happens in the member crates; this crate is the entry point:
//!
//! - [`parse_script`], [`parse_module`], [`parse_expression`]
//! - [`tokenize`] for a token list without a tree
//! - [`translate_regexp`] for a standalone pattern
//! - [`tracing_config::init_tracing`] to install a subscriber from `ESZ_LOG`

use esz_scanner::ScannerState;

// Diagnostics, positions and interned strings
pub use esz_common::diagnostics::{self, diagnostic_codes};
pub use esz_common::{Atom, Diagnostic, DiagnosticCategory, Location, Position, Range, limits};

// Tokens
pub use esz_scanner::{Comment, CommentKind, SyntaxKind, Token, TokenFlags, TokenValue};

// Regex translation
pub use esz_regexp::{RegexError, RegexErrorKind, RegexFlags, TranslateOptions, TranslatedRegex};

// Syntax tree and parser
pub use esz_parser::ast;
pub use esz_parser::{
    HoistingScope, NodeObserver, ParseError, ParseOutput, ParserOptions, ParserState,
};

pub mod tracing_config;

/// Parse `source` as a script.
pub fn parse_script(
    source: &str,
    options: ParserOptions,
) -> Result<ParseOutput<ast::Program>, ParseError> {
    ParserState::new(options).parse_script(source)
}

/// Parse `source` as a module: strict, with imports, exports and top-level
/// `await`.
pub fn parse_module(
    source: &str,
    options: ParserOptions,
) -> Result<ParseOutput<ast::Program>, ParseError> {
    ParserState::new(options).parse_module(source)
}

/// Parse `source` as a single expression.
pub fn parse_expression(
    source: &str,
    options: ParserOptions,
) -> Result<ParseOutput<ast::Expression>, ParseError> {
    ParserState::new(options).parse_expression(source)
}

/// Scan `source` into tokens without building a tree.
///
/// Whether `/` starts a regular expression is decided from the previous
/// token. Lexical errors abort unless `options.tolerant` is set, in which case
/// they are returned in `diagnostics`. Comments are collected when
/// `options.comments` is set. The token list ends before the end-of-file
/// token.
pub fn tokenize(source: &str, options: ParserOptions) -> Result<ParseOutput<Vec<Token>>, ParseError> {
    let _span = tracing::debug_span!("tokenize", len = source.len()).entered();
    let mut scanner = ScannerState::new(source);
    scanner.set_regex_detection(true);
    scanner.set_collect_comments(options.comments);

    let mut tokens = Vec::new();
    loop {
        let token = scanner.lex();
        if !options.tolerant
            && let Some(diagnostic) = scanner.diagnostics().first()
        {
            return Err(ParseError::from(diagnostic.clone()));
        }
        if token.kind == SyntaxKind::EndOfFileToken {
            break;
        }
        tokens.push(token);
    }
    tracing::debug!(count = tokens.len(), "tokenized");

    let comments = options.comments.then(|| scanner.take_comments());
    Ok(ParseOutput {
        root: tokens,
        diagnostics: scanner.take_diagnostics(),
        tokens: None,
        comments,
    })
}

/// Validate an ECMAScript pattern and translate it for the `regex` crate.
pub fn translate_regexp(
    pattern: &str,
    flags: &str,
    options: &TranslateOptions,
) -> Result<TranslatedRegex, RegexError> {
    esz_regexp::translate(pattern, flags, options)
}
