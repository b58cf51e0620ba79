//! JSX scanning.
//!
//! JSX needs different lexical rules in three places: element children
//! (text runs), tag and attribute names (which may contain `-`) and attribute
//! string values (no escapes, may span lines). The parser switches into
//! these explicitly; the scanner never guesses it is inside JSX.

use crate::char_codes::is_identifier_part;
use crate::scanner_impl::{CurlyKind, ScannerState};
use crate::syntax_kind::SyntaxKind;
use crate::token::{Token, TokenFlags, TokenValue};
use esz_common::diagnostics::diagnostic_codes;

impl ScannerState {
    /// Scan the next token inside JSX element children: `{`, `<`, or a run
    /// of text up to either of them.
    pub fn scan_jsx_child(&mut self) -> Token {
        self.begin_token();
        let kind = match self.peek() {
            None => SyntaxKind::EndOfFileToken,
            Some(b'{') => {
                self.pos += 1;
                self.curly_stack.push(CurlyKind::Brace);
                SyntaxKind::OpenBraceToken
            }
            Some(b'<') => {
                self.pos += 1;
                SyntaxKind::LessThanToken
            }
            Some(_) => {
                let start = self.pos;
                let end = self
                    .source
                    .as_bytes()
                    .get(start..)
                    .and_then(|rest| memchr::memchr2(b'{', b'<', rest))
                    .map_or(self.source.len(), |offset| start + offset);
                self.track_lines(start, end);
                self.pos = end;
                let text = self.source.get(start..end).unwrap_or("");
                let decoded = decode_jsx_entities(text);
                self.token_value = TokenValue::String(self.interner.intern_owned(decoded));
                SyntaxKind::JsxText
            }
        };
        self.finish_token(kind)
    }

    /// Extend an identifier-like token with `-` separated parts, as in
    /// `data-value` or `aria-label`.
    pub fn rescan_jsx_identifier(&mut self, token: &Token) -> Token {
        let plain_start = self
            .char_at(token.range.start as usize)
            .is_some_and(|c| c == '-' || is_identifier_part(c as u32));
        if !token.kind.is_identifier_name() || !plain_start {
            return token.clone();
        }
        self.reset_to_token(token);
        self.begin_token();
        while let Some(c) = self.char_at(self.pos) {
            if c != '-' && !is_identifier_part(c as u32) {
                break;
            }
            self.pos += c.len_utf8();
        }
        let text = self.source.get(self.token_start..self.pos).unwrap_or("");
        self.token_value = TokenValue::String(self.interner.intern(text));
        self.finish_token(SyntaxKind::Identifier)
    }

    /// Re-scan a string token as a JSX attribute value: no escapes, line
    /// terminators allowed, HTML entities decoded.
    pub fn rescan_jsx_attribute_value(&mut self, token: &Token) -> Token {
        if token.kind != SyntaxKind::StringLiteral {
            return token.clone();
        }
        self.reset_to_token(token);
        self.begin_token();
        let Some(quote) = self.peek() else {
            return self.finish_token(SyntaxKind::EndOfFileToken);
        };
        self.pos += 1;
        let body_start = self.pos;
        let close = self
            .source
            .as_bytes()
            .get(body_start..)
            .and_then(|rest| memchr::memchr(quote, rest))
            .map(|offset| body_start + offset);
        let body_end = match close {
            Some(end) => {
                self.track_lines(body_start, end);
                self.pos = end + 1;
                end
            }
            None => {
                let end = self.source.len();
                self.track_lines(body_start, end);
                self.pos = end;
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error_at_token(diagnostic_codes::UNTERMINATED_JSX_STRING, &[]);
                end
            }
        };
        let text = self.source.get(body_start..body_end).unwrap_or("");
        let decoded = decode_jsx_entities(text);
        self.token_value = TokenValue::String(self.interner.intern_owned(decoded));
        self.finish_token(SyntaxKind::StringLiteral)
    }

    /// Split a `>`-prefixed compound token (`>>`, `>=`, ...) so a JSX tag
    /// can close with a single `>`.
    pub fn split_greater_than(&mut self, token: &Token) -> Token {
        self.reset_to_token(token);
        self.begin_token();
        if self.peek() == Some(b'>') {
            self.pos += 1;
            return self.finish_token(SyntaxKind::GreaterThanToken);
        }
        token.clone()
    }
}

/// Decode the HTML character references JSX text may contain. Unknown
/// references are kept verbatim.
pub fn decode_jsx_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let decoded = after.find(';').filter(|&semi| semi <= 10).and_then(|semi| {
            let name = &after[..semi];
            decode_entity(name).map(|c| (c, semi))
        });
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(number) = name.strip_prefix('#') {
        let value = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        return char::from_u32(value);
    }
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{00A0}',
        "copy" => '\u{00A9}',
        "reg" => '\u{00AE}',
        "hellip" => '\u{2026}',
        "mdash" => '\u{2014}',
        "ndash" => '\u{2013}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201C}',
        "rdquo" => '\u{201D}',
        "middot" => '\u{00B7}',
        "times" => '\u{00D7}',
        "bull" => '\u{2022}',
        "trade" => '\u{2122}',
        "euro" => '\u{20AC}',
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities_decode() {
        assert_eq!(decode_jsx_entities("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(decode_jsx_entities("&#65;&#x42;"), "AB");
        assert_eq!(decode_jsx_entities("&unknown; & done"), "&unknown; & done");
    }

    #[test]
    fn child_text_stops_at_brace_and_tag() {
        let mut scanner = ScannerState::new("hello\n world{x}</a>");
        let text = scanner.scan_jsx_child();
        assert_eq!(text.kind, SyntaxKind::JsxText);
        assert_eq!(text.string_value(), "hello\n world");
        assert_eq!(text.location.end.line, 1);
        assert_eq!(scanner.scan_jsx_child().kind, SyntaxKind::OpenBraceToken);
        assert_eq!(scanner.lex().kind, SyntaxKind::Identifier);
        assert_eq!(scanner.lex().kind, SyntaxKind::CloseBraceToken);
        assert_eq!(scanner.scan_jsx_child().kind, SyntaxKind::LessThanToken);
    }

    #[test]
    fn dashed_names() {
        let mut scanner = ScannerState::new("data-foo-bar=");
        let first = scanner.lex();
        let name = scanner.rescan_jsx_identifier(&first);
        assert_eq!(name.raw.as_str(), "data-foo-bar");
        assert_eq!(scanner.lex().kind, SyntaxKind::EqualsToken);
    }

    #[test]
    fn attribute_strings_have_no_escapes() {
        let mut scanner = ScannerState::new(r#""a\nb &quot;""#);
        let token = scanner.lex();
        let value = scanner.rescan_jsx_attribute_value(&token);
        assert_eq!(value.string_value(), "a\\nb \"");
    }

    #[test]
    fn greater_than_splits() {
        let mut scanner = ScannerState::new(">>x");
        let token = scanner.lex();
        assert_eq!(token.kind, SyntaxKind::GreaterThanGreaterThanToken);
        let split = scanner.split_greater_than(&token);
        assert_eq!(split.kind, SyntaxKind::GreaterThanToken);
        assert_eq!(scanner.lex().kind, SyntaxKind::GreaterThanToken);
    }
}
