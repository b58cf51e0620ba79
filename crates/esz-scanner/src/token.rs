//! Tokens and comments produced by the scanner.

use crate::syntax_kind::{SyntaxKind, TokenType};
use bitflags::bitflags;
use esz_common::{Atom, Location, Position, Range};
use num_bigint::BigInt;
use serde::Serialize;

bitflags! {
    /// Facts about a token that the parser needs after the fact.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TokenFlags: u16 {
        /// A line terminator appeared between the previous token and this one.
        const PRECEDING_LINE_BREAK = 1 << 0;
        /// The identifier was written with `\u` escapes.
        const UNICODE_ESCAPE = 1 << 1;
        /// Legacy octal integer literal such as `017`.
        const LEGACY_OCTAL = 1 << 2;
        /// Decimal literal with a leading zero such as `08` or `018.1`.
        const NON_OCTAL_DECIMAL = 1 << 3;
        /// The string contains a legacy octal escape or `\8`/`\9`.
        const OCTAL_ESCAPE = 1 << 4;
        /// An escaped lone surrogate was decoded to U+FFFD.
        const LONE_SURROGATE = 1 << 5;
        /// A template contains an escape with no cooked value.
        const INVALID_ESCAPE = 1 << 6;
        /// The literal uses `_` separators.
        const CONTAINS_SEPARATOR = 1 << 7;
        /// The token could not be finished (unterminated literal or comment).
        const UNTERMINATED = 1 << 8;
    }
}

/// Undecoded regular expression literal.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegexValue {
    pub pattern: Atom,
    pub flags: Atom,
    /// Host-dialect pattern, filled in only when translation was requested.
    pub translated: Option<Atom>,
}

/// An escape in a template that has no cooked value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct InvalidEscape {
    pub code: u32,
    pub range: Range,
    pub position: Position,
}

/// Template chunk text.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TemplateValue {
    /// `None` when the chunk contains an invalid escape.
    pub cooked: Option<Atom>,
    pub raw: Atom,
    pub invalid_escape: Option<InvalidEscape>,
}

/// Decoded token value.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub enum TokenValue {
    #[default]
    None,
    Number(f64),
    #[serde(serialize_with = "serialize_bigint")]
    BigInt(BigInt),
    /// Identifier name or string contents with escapes decoded.
    String(Atom),
    Boolean(bool),
    Regex(Box<RegexValue>),
    Template(Box<TemplateValue>),
}

fn serialize_bigint<S: serde::Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

/// A single token. Tokens own their text and never borrow from the scanner.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: Range,
    pub location: Location,
    /// Source text of the token, interned.
    pub raw: Atom,
    pub value: TokenValue,
    #[serde(skip)]
    pub flags: TokenFlags,
}

impl Token {
    pub fn eof(offset: u32, position: Position) -> Token {
        Token {
            kind: SyntaxKind::EndOfFileToken,
            range: Range::new(offset, offset),
            location: Location::new(position, position),
            raw: Atom::default(),
            value: TokenValue::None,
            flags: TokenFlags::empty(),
        }
    }

    #[inline]
    pub fn token_type(&self) -> TokenType {
        self.kind.token_type()
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    #[inline]
    pub fn start(&self) -> u32 {
        self.range.start
    }

    #[inline]
    pub fn end(&self) -> u32 {
        self.range.end
    }

    /// Identifier name, string contents or keyword text.
    pub fn string_value(&self) -> &str {
        match &self.value {
            TokenValue::String(s) => s.as_str(),
            _ => self.raw.as_str(),
        }
    }

    pub fn number_value(&self) -> Option<f64> {
        match self.value {
            TokenValue::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn template_value(&self) -> Option<&TemplateValue> {
        match &self.value {
            TokenValue::Template(t) => Some(t),
            _ => None,
        }
    }

    pub fn regex_value(&self) -> Option<&RegexValue> {
        match &self.value {
            TokenValue::Regex(r) => Some(r),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum CommentKind {
    Line,
    Block,
    /// `<!--` or a line-leading `-->` in script code.
    Html,
    /// `#!` at the very start of the source.
    Hashbang,
}

/// A comment collected while skipping trivia.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub kind: CommentKind,
    /// Comment text without its delimiters.
    pub value: String,
    pub range: Range,
    pub location: Location,
}
