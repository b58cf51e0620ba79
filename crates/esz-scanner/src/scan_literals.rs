//! String, template and regular expression literal scanning.

use crate::char_codes::{self, is_high_surrogate, is_identifier_part, is_low_surrogate};
use crate::scanner_impl::{CurlyKind, ScannerState};
use crate::syntax_kind::SyntaxKind;
use crate::token::{InvalidEscape, RegexValue, TemplateValue, TokenFlags, TokenValue};
use esz_common::Range;
use esz_common::diagnostics::diagnostic_codes;

/// Where an escape sequence appears; templates have no legacy octal escapes.
#[derive(Clone, Copy, PartialEq, Eq)]
enum EscapeContext {
    String,
    Template,
}

impl ScannerState {
    pub(crate) fn scan_string(&mut self, quote: u8) -> SyntaxKind {
        self.pos += 1;
        let mut value = String::new();
        let mut chunk_start = self.pos;
        loop {
            let Some(b) = self.peek() else {
                self.push_chunk(&mut value, chunk_start, self.pos);
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error_at_token(diagnostic_codes::UNTERMINATED_STRING_LITERAL, &[]);
                break;
            };
            if b == quote {
                self.push_chunk(&mut value, chunk_start, self.pos);
                self.pos += 1;
                break;
            }
            match b {
                b'\\' => {
                    self.push_chunk(&mut value, chunk_start, self.pos);
                    self.pos += 1;
                    if let Some(invalid) = self.scan_escape(&mut value, EscapeContext::String) {
                        self.error_span(
                            invalid.code,
                            &[],
                            invalid.range.start as usize,
                            invalid.range.end as usize,
                        );
                    }
                    chunk_start = self.pos;
                }
                b'\n' | b'\r' => {
                    self.push_chunk(&mut value, chunk_start, self.pos);
                    self.token_flags |= TokenFlags::UNTERMINATED;
                    self.error_at_token(diagnostic_codes::UNTERMINATED_STRING_LITERAL, &[]);
                    break;
                }
                0xE2 if self.line_terminator_len(self.pos).is_some() => {
                    // LS and PS are allowed unescaped in string literals.
                    self.pos += 3;
                    self.new_line(self.pos);
                }
                _ => self.pos += 1,
            }
        }
        self.token_value = TokenValue::String(self.interner.intern_owned(value));
        SyntaxKind::StringLiteral
    }

    #[inline]
    fn push_chunk(&self, out: &mut String, start: usize, end: usize) {
        if let Some(chunk) = self.source.get(start..end) {
            out.push_str(chunk);
        }
    }

    /// Decode one escape sequence. The current position is just after the
    /// backslash. Returns the problem when the escape is malformed; the
    /// caller decides whether that is an error or an uncooked template.
    fn scan_escape(&mut self, out: &mut String, context: EscapeContext) -> Option<InvalidEscape> {
        let escape_start = self.pos - 1;
        let Some(b) = self.peek() else {
            return None;
        };
        match b {
            b'n' => self.push_simple(out, '\n'),
            b't' => self.push_simple(out, '\t'),
            b'r' => self.push_simple(out, '\r'),
            b'b' => self.push_simple(out, '\u{0008}'),
            b'f' => self.push_simple(out, '\u{000C}'),
            b'v' => self.push_simple(out, '\u{000B}'),
            b'\r' | b'\n' => {
                let len = self.line_terminator_len(self.pos).unwrap_or(1);
                self.pos += len;
                self.new_line(self.pos);
            }
            b'x' => {
                self.pos += 1;
                let hi = self.peek().and_then(|b| (b as char).to_digit(16));
                let lo = self.peek_at(1).and_then(|b| (b as char).to_digit(16));
                match (hi, lo) {
                    (Some(hi), Some(lo)) => {
                        self.pos += 2;
                        out.push(char::from((hi * 16 + lo) as u8));
                    }
                    _ => {
                        return Some(self.invalid_escape(
                            diagnostic_codes::INVALID_HEXADECIMAL_ESCAPE_SEQUENCE,
                            escape_start,
                        ));
                    }
                }
            }
            b'u' => {
                self.pos += 1;
                match self.scan_unicode_escape_digits() {
                    Ok(cp) => self.push_code_unit_escape(out, cp),
                    Err(code) => return Some(self.invalid_escape(code, escape_start)),
                }
            }
            b'0' if !matches!(self.peek_at(1), Some(b'0'..=b'9')) => {
                self.push_simple(out, '\0');
            }
            b'0'..=b'7' => {
                if context == EscapeContext::Template {
                    self.pos += 1;
                    return Some(self.invalid_escape(
                        diagnostic_codes::OCTAL_ESCAPES_NOT_ALLOWED_IN_TEMPLATES,
                        escape_start,
                    ));
                }
                self.token_flags |= TokenFlags::OCTAL_ESCAPE;
                let max_digits = if b <= b'3' { 3 } else { 2 };
                let mut value: u32 = 0;
                let mut digits = 0;
                while digits < max_digits {
                    match self.peek() {
                        Some(d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            self.pos += 1;
                            digits += 1;
                        }
                        _ => break,
                    }
                }
                out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            b'8' | b'9' => {
                if context == EscapeContext::Template {
                    self.pos += 1;
                    return Some(self.invalid_escape(
                        diagnostic_codes::OCTAL_ESCAPES_NOT_ALLOWED_IN_TEMPLATES,
                        escape_start,
                    ));
                }
                self.token_flags |= TokenFlags::OCTAL_ESCAPE;
                self.push_simple(out, b as char);
            }
            _ => {
                let Some(c) = self.char_at(self.pos) else {
                    self.pos += 1;
                    return None;
                };
                self.pos += c.len_utf8();
                let cp = c as u32;
                if cp == char_codes::LINE_SEPARATOR || cp == char_codes::PARAGRAPH_SEPARATOR {
                    // Line continuation.
                    self.new_line(self.pos);
                } else {
                    out.push(c);
                }
            }
        }
        None
    }

    #[inline]
    fn push_simple(&mut self, out: &mut String, c: char) {
        self.pos += 1;
        out.push(c);
    }

    fn invalid_escape(&self, code: u32, escape_start: usize) -> InvalidEscape {
        InvalidEscape {
            code,
            range: Range::new(escape_start as u32, self.pos.max(escape_start + 1) as u32),
            position: self.position_of(escape_start),
        }
    }

    /// Push a code unit decoded from `\u`, pairing surrogate escapes.
    fn push_code_unit_escape(&mut self, out: &mut String, cp: u32) {
        if is_high_surrogate(cp) && self.starts_with_at(self.pos, "\\u") {
            let resume = self.pos;
            self.pos += 2;
            match self.scan_unicode_escape_digits() {
                Ok(low) if is_low_surrogate(low) => {
                    let combined = char_codes::combine_surrogates(cp, low);
                    out.push(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
                    return;
                }
                _ => self.pos = resume,
            }
        }
        match char::from_u32(cp) {
            Some(c) => out.push(c),
            None => {
                self.token_flags |= TokenFlags::LONE_SURROGATE;
                out.push(char::REPLACEMENT_CHARACTER);
            }
        }
    }

    /// Scan a template chunk. The current position is just after the opening
    /// backtick (`head`) or the `}` closing a substitution.
    pub(crate) fn scan_template(&mut self, head: bool) -> SyntaxKind {
        let chunk_begin = self.pos;
        let mut cooked = String::new();
        let mut chunk_start = self.pos;
        let mut invalid: Option<InvalidEscape> = None;
        let mut saw_cr = false;
        let (kind, chunk_end) = loop {
            let Some(b) = self.peek() else {
                self.push_chunk(&mut cooked, chunk_start, self.pos);
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error_at_token(diagnostic_codes::UNTERMINATED_TEMPLATE_LITERAL, &[]);
                let kind = if head {
                    SyntaxKind::NoSubstitutionTemplateLiteral
                } else {
                    SyntaxKind::TemplateTail
                };
                break (kind, self.pos);
            };
            match b {
                b'`' => {
                    self.push_chunk(&mut cooked, chunk_start, self.pos);
                    let end = self.pos;
                    self.pos += 1;
                    let kind = if head {
                        SyntaxKind::NoSubstitutionTemplateLiteral
                    } else {
                        SyntaxKind::TemplateTail
                    };
                    break (kind, end);
                }
                b'$' if self.peek_at(1) == Some(b'{') => {
                    self.push_chunk(&mut cooked, chunk_start, self.pos);
                    let end = self.pos;
                    self.pos += 2;
                    self.curly_stack.push(CurlyKind::TemplateSubstitution);
                    let kind = if head {
                        SyntaxKind::TemplateHead
                    } else {
                        SyntaxKind::TemplateMiddle
                    };
                    break (kind, end);
                }
                b'\\' => {
                    self.push_chunk(&mut cooked, chunk_start, self.pos);
                    self.pos += 1;
                    if self.peek() == Some(b'\r') {
                        saw_cr = true;
                    }
                    if let Some(problem) = self.scan_escape(&mut cooked, EscapeContext::Template) {
                        invalid.get_or_insert(problem);
                    }
                    chunk_start = self.pos;
                }
                b'\r' => {
                    saw_cr = true;
                    self.push_chunk(&mut cooked, chunk_start, self.pos);
                    cooked.push('\n');
                    let len = self.line_terminator_len(self.pos).unwrap_or(1);
                    self.pos += len;
                    self.new_line(self.pos);
                    chunk_start = self.pos;
                }
                b'\n' => {
                    self.pos += 1;
                    self.new_line(self.pos);
                }
                0xE2 if self.line_terminator_len(self.pos).is_some() => {
                    self.pos += 3;
                    self.new_line(self.pos);
                }
                _ => self.pos += 1,
            }
        };

        let raw_text = self.source.get(chunk_begin..chunk_end).unwrap_or("");
        let raw = if saw_cr {
            let normalized = raw_text.replace("\r\n", "\n").replace('\r', "\n");
            self.interner.intern_owned(normalized)
        } else {
            self.interner.intern(raw_text)
        };
        let cooked = if invalid.is_some() {
            self.token_flags |= TokenFlags::INVALID_ESCAPE;
            None
        } else {
            Some(self.interner.intern_owned(cooked))
        };
        self.token_value = TokenValue::Template(Box::new(TemplateValue {
            cooked,
            raw,
            invalid_escape: invalid,
        }));
        kind
    }

    /// Scan a regex literal body and flags. The current position is at `/`.
    pub(crate) fn scan_regexp_body(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        let mut in_class = false;
        let body_end = loop {
            if self.line_terminator_len(self.pos).is_some() || self.is_at_end() {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error_at_token(diagnostic_codes::UNTERMINATED_REGEXP_LITERAL, &[]);
                break self.pos;
            }
            let Some(c) = self.char_at(self.pos) else {
                self.pos += 1;
                continue;
            };
            self.pos += c.len_utf8();
            match c {
                '\\' => {
                    if self.line_terminator_len(self.pos).is_some() || self.is_at_end() {
                        continue;
                    }
                    let width = self.char_at(self.pos).map_or(1, char::len_utf8);
                    self.pos += width;
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => break self.pos - 1,
                _ => {}
            }
        };

        let flags_start = self.pos;
        while let Some(c) = self.char_at(self.pos) {
            if c == '\\' || !is_identifier_part(c as u32) {
                break;
            }
            self.pos += c.len_utf8();
        }
        if self.peek() == Some(b'\\') {
            // Escapes are never allowed in flags; swallow them into the flags text.
            while let Some(c) = self.char_at(self.pos) {
                if c != '\\' && !is_identifier_part(c as u32) {
                    break;
                }
                self.pos += c.len_utf8();
            }
        }
        let flags_text = self.source.get(flags_start..self.pos).unwrap_or("");
        if !self.token_flags.contains(TokenFlags::UNTERMINATED) && !valid_regexp_flags(flags_text) {
            let flags_owned = flags_text.to_string();
            self.error_span(
                diagnostic_codes::INVALID_REGEXP_FLAGS,
                &[&flags_owned],
                flags_start,
                self.pos,
            );
        }
        let pattern_text = self.source.get(start + 1..body_end.max(start + 1)).unwrap_or("");
        let pattern = self.interner.intern(pattern_text);
        let flags_text = self.source.get(flags_start..self.pos).unwrap_or("");
        let flags = self.interner.intern(flags_text);
        self.token_value = TokenValue::Regex(Box::new(RegexValue {
            pattern,
            flags,
            translated: None,
        }));
        SyntaxKind::RegularExpressionLiteral
    }
}

/// Only `dgimsuvy`, each at most once, and never both `u` and `v`.
pub fn valid_regexp_flags(flags: &str) -> bool {
    let mut seen = 0u8;
    for c in flags.chars() {
        let bit = match c {
            'd' => 1 << 0,
            'g' => 1 << 1,
            'i' => 1 << 2,
            'm' => 1 << 3,
            's' => 1 << 4,
            'u' => 1 << 5,
            'v' => 1 << 6,
            'y' => 1 << 7,
            _ => return false,
        };
        if seen & bit != 0 {
            return false;
        }
        seen |= bit;
    }
    seen & (1 << 5 | 1 << 6) != (1 << 5 | 1 << 6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    fn lex_one(source: &str) -> (Token, ScannerState) {
        let mut scanner = ScannerState::new(source);
        let token = scanner.lex();
        (token, scanner)
    }

    #[test]
    fn string_escapes_decode() {
        let (token, scanner) = lex_one(r#""a\tb\x41B\u{43}\0""#);
        assert_eq!(token.string_value(), "a\tbABC\0");
        assert!(scanner.diagnostics().is_empty());
    }

    #[test]
    fn surrogate_escape_pairs_combine() {
        let (token, _) = lex_one(r#""\uD83D\uDCA9""#);
        assert_eq!(token.string_value(), "\u{1F4A9}");
        assert!(!token.flags.contains(TokenFlags::LONE_SURROGATE));
    }

    #[test]
    fn lone_surrogate_escape_is_flagged() {
        let (token, scanner) = lex_one(r#""\uD83Dx""#);
        assert_eq!(token.string_value(), "\u{FFFD}x");
        assert!(token.flags.contains(TokenFlags::LONE_SURROGATE));
        assert!(scanner.diagnostics().is_empty());
    }

    #[test]
    fn legacy_octal_escapes_are_flagged() {
        let (token, _) = lex_one(r#""\101\8""#);
        assert_eq!(token.string_value(), "A8");
        assert!(token.flags.contains(TokenFlags::OCTAL_ESCAPE));
        let (token, _) = lex_one(r#""\0""#);
        assert!(!token.flags.contains(TokenFlags::OCTAL_ESCAPE));
    }

    #[test]
    fn line_continuation_is_dropped() {
        let (token, scanner) = lex_one("'a\\\r\nb'");
        assert_eq!(token.string_value(), "ab");
        assert_eq!(token.location.end.line, 1);
        assert!(scanner.diagnostics().is_empty());
    }

    #[test]
    fn unterminated_string_reports() {
        let (token, scanner) = lex_one("'abc\n'");
        assert!(token.flags.contains(TokenFlags::UNTERMINATED));
        assert_eq!(
            scanner.diagnostics()[0].code,
            diagnostic_codes::UNTERMINATED_STRING_LITERAL
        );
    }

    #[test]
    fn malformed_hex_escape_reports() {
        let (_, scanner) = lex_one(r#""\xZZ""#);
        assert_eq!(
            scanner.diagnostics()[0].code,
            diagnostic_codes::INVALID_HEXADECIMAL_ESCAPE_SEQUENCE
        );
    }

    #[test]
    fn template_with_substitutions() {
        let mut scanner = ScannerState::new("`a${ {b:1} }c${d}e`");
        let head = scanner.lex();
        assert_eq!(head.kind, SyntaxKind::TemplateHead);
        assert_eq!(head.template_value().unwrap().cooked.as_deref(), Some("a"));
        assert_eq!(scanner.lex().kind, SyntaxKind::OpenBraceToken);
        scanner.lex();
        scanner.lex();
        scanner.lex();
        assert_eq!(scanner.lex().kind, SyntaxKind::CloseBraceToken);
        let middle = scanner.lex();
        assert_eq!(middle.kind, SyntaxKind::TemplateMiddle);
        assert_eq!(middle.template_value().unwrap().raw.as_str(), "c");
        assert_eq!(scanner.lex().kind, SyntaxKind::Identifier);
        let tail = scanner.lex();
        assert_eq!(tail.kind, SyntaxKind::TemplateTail);
        assert_eq!(tail.template_value().unwrap().cooked.as_deref(), Some("e"));
    }

    #[test]
    fn template_invalid_escape_has_no_cooked_value() {
        let (token, scanner) = lex_one(r"`\unicode and \u{55}`");
        let value = token.template_value().unwrap();
        assert_eq!(value.cooked, None);
        assert_eq!(value.raw.as_str(), r"\unicode and \u{55}");
        assert!(value.invalid_escape.is_some());
        // The parser decides whether this is an error.
        assert!(scanner.diagnostics().is_empty());
    }

    #[test]
    fn template_raw_normalizes_carriage_returns() {
        let (token, _) = lex_one("`a\r\nb\rc`");
        let value = token.template_value().unwrap();
        assert_eq!(value.raw.as_str(), "a\nb\nc");
        assert_eq!(value.cooked.as_deref(), Some("a\nb\nc"));
    }

    #[test]
    fn regexp_class_may_contain_slash() {
        let mut scanner = ScannerState::new("/[/]\\//gu");
        let slash = scanner.lex();
        assert_eq!(slash.kind, SyntaxKind::SlashToken);
        let token = scanner.rescan_slash_as_regexp(&slash);
        assert_eq!(token.kind, SyntaxKind::RegularExpressionLiteral);
        let value = token.regex_value().unwrap();
        assert_eq!(value.pattern.as_str(), "[/]\\/");
        assert_eq!(value.flags.as_str(), "gu");
        assert!(scanner.diagnostics().is_empty());
    }

    #[test]
    fn regexp_flags_are_validated() {
        assert!(valid_regexp_flags("dgimsuy"));
        assert!(valid_regexp_flags("v"));
        assert!(!valid_regexp_flags("gg"));
        assert!(!valid_regexp_flags("uv"));
        assert!(!valid_regexp_flags("x"));

        let mut scanner = ScannerState::new("/a/gx");
        let slash = scanner.lex();
        scanner.rescan_slash_as_regexp(&slash);
        assert_eq!(scanner.diagnostics()[0].code, diagnostic_codes::INVALID_REGEXP_FLAGS);
    }

    #[test]
    fn unterminated_regexp_reports() {
        let mut scanner = ScannerState::new("/abc\n/");
        let slash = scanner.lex();
        let token = scanner.rescan_slash_as_regexp(&slash);
        assert!(token.flags.contains(TokenFlags::UNTERMINATED));
        assert_eq!(
            scanner.diagnostics()[0].code,
            diagnostic_codes::UNTERMINATED_REGEXP_LITERAL
        );
    }
}
