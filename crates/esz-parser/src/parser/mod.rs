//! Recursive-descent parser.
//!
//! `ParserState` is split across files by grammar area, all as
//! `impl ParserState` blocks:
//! - `state`: token plumbing, diagnostics, lookahead, entry points
//! - `scope`: declarations, labels, private names
//! - `state_statements`: statements and declarations
//! - `state_expressions`: precedence climbing and primary expressions
//! - `state_patterns`: binding patterns and expression-to-pattern reinterpretation
//! - `state_functions`: functions, arrows, parameters, directive prologues
//! - `state_classes`: class bodies
//! - `state_modules`: import/export
//! - `state_jsx`: JSX elements

pub mod state;

mod scope;
mod state_classes;
mod state_expressions;
mod state_functions;
mod state_jsx;
mod state_modules;
mod state_patterns;
mod state_statements;

pub use state::{ParseOutput, ParserState};
