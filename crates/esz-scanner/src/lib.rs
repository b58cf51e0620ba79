//! ECMAScript scanner/tokenizer for the esz front end.
//!
//! This crate provides the lexical analysis phase:
//! - `char_codes` - Character classification over generated Unicode tables
//! - `SyntaxKind` - Token kinds
//! - `Token` - Owned tokens with decoded values
//! - `ScannerState` - Tokenizer state machine

pub mod char_codes;

pub mod syntax_kind;
pub use syntax_kind::{SyntaxKind, TokenType, text_to_keyword};

pub mod token;
pub use token::{
    Comment, CommentKind, InvalidEscape, RegexValue, TemplateValue, Token, TokenFlags, TokenValue,
};

pub mod scanner_impl;
pub use scanner_impl::{ScannerSnapshot, ScannerState};

mod scan_jsx;
mod scan_literals;
mod scan_numeric;

pub use scan_jsx::decode_jsx_entities;
pub use scan_literals::valid_regexp_flags;
pub use scan_numeric::{biguint_to_f64, radix_digits_to_f64};
