//! ECMAScript parser and syntax tree for the esz front end.
//!
//! This crate provides:
//! - `ast` - Node structs, `NodeKind`, `NodeList` and the `NodeRef` view
//! - `HoistingScope` - Names a function or program body hoists
//! - `ParserOptions` - Per-call configuration
//! - `ParserState` - Recursive-descent parser producing `ParseOutput`
//!
//! Regular expression literals are validated with `esz_regexp` and, when
//! `ParserOptions::adapt_regexp` is set, translated for the `regex` crate.

pub mod ast;

mod error;
pub use error::ParseError;

pub mod hoisting;
pub use hoisting::HoistingScope;

pub mod options;
pub use options::{NodeObserver, ParserOptions};

pub mod parser;
pub use parser::{ParseOutput, ParserState};

pub use esz_common::{Diagnostic, DiagnosticCategory, Location, Position, Range};
pub use esz_scanner::{Comment, CommentKind, Token};
