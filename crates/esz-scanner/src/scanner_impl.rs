//! Scanner implementation.
//!
//! The scanner works over UTF-8 source text with byte offsets. Each call to
//! [`ScannerState::lex`] skips trivia and returns one owned [`Token`]; the
//! scanner itself keeps no token history beyond what it needs to decide the
//! next token (template nesting and whether a `/` may start a regex).
//!
//! In parser mode `/` and `/=` are always punctuators: the parser knows when
//! it is in an expression-start position and calls
//! [`ScannerState::rescan_slash_as_regexp`]. Standalone tokenization enables
//! regex detection, which uses the previous token instead.

use crate::char_codes::{self, is_identifier_part, is_identifier_start, is_white_space};
use crate::syntax_kind::{SyntaxKind, text_to_keyword};
use crate::token::{Comment, CommentKind, Token, TokenFlags, TokenValue};
use esz_common::diagnostics::{Diagnostic, diagnostic_codes};
use esz_common::{Atom, Interner, Location, Position, Range};
use memchr::{memchr3, memmem};
use std::sync::Arc;

/// What a `{` on the curly stack was opened by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CurlyKind {
    Brace,
    TemplateSubstitution,
}

/// Snapshot of scanner state for parser lookahead.
#[derive(Clone, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    line: u32,
    line_start: usize,
    preceding_line_break: bool,
    curly_stack: Vec<CurlyKind>,
    paren_stack: Vec<bool>,
    last_kind: Option<SyntaxKind>,
    regex_allowed: bool,
    comments_len: usize,
    diagnostics_len: usize,
}

/// Scanner state: the source text, the current position and the context the
/// next token depends on.
pub struct ScannerState {
    pub(crate) source: Arc<str>,
    pub(crate) pos: usize,
    pub(crate) line: u32,
    pub(crate) line_start: usize,
    pub(crate) token_start: usize,
    pub(crate) token_start_position: Position,
    pub(crate) token_flags: TokenFlags,
    pub(crate) token_value: TokenValue,
    preceding_line_break: bool,
    pub(crate) curly_stack: Vec<CurlyKind>,
    paren_stack: Vec<bool>,
    last_kind: Option<SyntaxKind>,
    regex_allowed: bool,
    detect_regex: bool,
    module: bool,
    collect_comments: bool,
    comments: Vec<Comment>,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) interner: Interner,
}

impl ScannerState {
    pub fn new(source: impl Into<Arc<str>>) -> Self {
        ScannerState {
            source: source.into(),
            pos: 0,
            line: 0,
            line_start: 0,
            token_start: 0,
            token_start_position: Position::default(),
            token_flags: TokenFlags::empty(),
            token_value: TokenValue::None,
            preceding_line_break: false,
            curly_stack: Vec::new(),
            paren_stack: Vec::new(),
            last_kind: None,
            regex_allowed: true,
            detect_regex: false,
            module: false,
            collect_comments: false,
            comments: Vec::new(),
            diagnostics: Vec::new(),
            interner: Interner::new(),
        }
    }

    /// Replace the source and reset all per-source state, keeping settings.
    pub fn set_text(&mut self, source: impl Into<Arc<str>>) {
        self.source = source.into();
        self.pos = 0;
        self.line = 0;
        self.line_start = 0;
        self.token_start = 0;
        self.token_start_position = Position::default();
        self.token_flags = TokenFlags::empty();
        self.token_value = TokenValue::None;
        self.preceding_line_break = false;
        self.curly_stack.clear();
        self.paren_stack.clear();
        self.last_kind = None;
        self.regex_allowed = true;
        self.comments.clear();
        self.diagnostics.clear();
        self.interner.clear();
    }

    /// Module code disables HTML-like comments.
    pub fn set_module(&mut self, module: bool) {
        self.module = module;
    }

    pub fn set_collect_comments(&mut self, collect: bool) {
        self.collect_comments = collect;
    }

    /// Let `lex` decide regex-vs-division from the previous token.
    pub fn set_regex_detection(&mut self, detect: bool) {
        self.detect_regex = detect;
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn source_arc(&self) -> &Arc<str> {
        &self.source
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Position of the current offset.
    #[inline]
    pub fn position(&self) -> Position {
        Position::new(self.line, (self.pos - self.line_start) as u32)
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.preceding_line_break
    }

    pub fn interner_mut(&mut self) -> &mut Interner {
        &mut self.interner
    }

    pub fn intern(&mut self, text: &str) -> Atom {
        self.interner.intern(text)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn take_comments(&mut self) -> Vec<Comment> {
        std::mem::take(&mut self.comments)
    }

    pub fn save_state(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            line: self.line,
            line_start: self.line_start,
            preceding_line_break: self.preceding_line_break,
            curly_stack: self.curly_stack.clone(),
            paren_stack: self.paren_stack.clone(),
            last_kind: self.last_kind,
            regex_allowed: self.regex_allowed,
            comments_len: self.comments.len(),
            diagnostics_len: self.diagnostics.len(),
        }
    }

    pub fn restore_state(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.line = snapshot.line;
        self.line_start = snapshot.line_start;
        self.preceding_line_break = snapshot.preceding_line_break;
        self.curly_stack = snapshot.curly_stack;
        self.paren_stack = snapshot.paren_stack;
        self.last_kind = snapshot.last_kind;
        self.regex_allowed = snapshot.regex_allowed;
        self.comments.truncate(snapshot.comments_len);
        self.diagnostics.truncate(snapshot.diagnostics_len);
    }

    /// Move the scanner to `offset`, which lies at `column` on `line`.
    pub fn reset(&mut self, offset: usize, line: u32, column: u32) {
        self.pos = offset.min(self.source.len());
        self.line = line;
        self.line_start = self.pos.saturating_sub(column as usize);
        self.preceding_line_break = false;
    }

    // =========================================================================
    // Character access
    // =========================================================================

    #[inline]
    pub(crate) fn byte_at(&self, pos: usize) -> Option<u8> {
        self.source.as_bytes().get(pos).copied()
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<u8> {
        self.byte_at(self.pos)
    }

    #[inline]
    pub(crate) fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.byte_at(self.pos + ahead)
    }

    #[inline]
    pub(crate) fn char_at(&self, pos: usize) -> Option<char> {
        self.source.get(pos..).and_then(|rest| rest.chars().next())
    }

    #[inline]
    pub(crate) fn starts_with_at(&self, pos: usize, needle: &str) -> bool {
        self.source
            .as_bytes()
            .get(pos..)
            .is_some_and(|rest| rest.starts_with(needle.as_bytes()))
    }

    /// Record a line terminator ending just before `next_line_start`.
    #[inline]
    pub(crate) fn new_line(&mut self, next_line_start: usize) {
        self.line += 1;
        self.line_start = next_line_start;
    }

    /// Width in bytes of a line terminator at `pos`, if there is one.
    #[inline]
    pub(crate) fn line_terminator_len(&self, pos: usize) -> Option<usize> {
        match self.byte_at(pos)? {
            b'\n' => Some(1),
            b'\r' => Some(if self.byte_at(pos + 1) == Some(b'\n') { 2 } else { 1 }),
            0xE2 if self.byte_at(pos + 1) == Some(0x80)
                && matches!(self.byte_at(pos + 2), Some(0xA8 | 0xA9)) =>
            {
                Some(3)
            }
            _ => None,
        }
    }

    /// Count line terminators in `[from, to)`, updating line bookkeeping.
    pub(crate) fn track_lines(&mut self, from: usize, to: usize) -> bool {
        let mut found = false;
        let mut pos = from;
        while pos < to {
            let bytes = self.source.as_bytes();
            let Some(offset) = bytes.get(pos..to).and_then(|s| memchr3(b'\n', b'\r', 0xE2, s)) else {
                break;
            };
            pos += offset;
            match self.line_terminator_len(pos) {
                Some(len) => {
                    pos += len;
                    self.new_line(pos);
                    found = true;
                }
                None => pos += 1,
            }
        }
        found
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub(crate) fn position_of(&self, offset: usize) -> Position {
        if offset >= self.line_start {
            Position::new(self.line, (offset - self.line_start) as u32)
        } else {
            self.token_start_position
        }
    }

    pub(crate) fn error_span(&mut self, code: u32, args: &[&str], start: usize, end: usize) {
        let position = self.position_of(start);
        let end = end.max(start);
        self.diagnostics.push(Diagnostic::from_code(
            code,
            args,
            Range::new(start as u32, end as u32),
            position,
        ));
    }

    pub(crate) fn error_at_token(&mut self, code: u32, args: &[&str]) {
        let (start, end) = (self.token_start, self.pos.max(self.token_start + 1));
        let end = end.min(self.source.len()).max(start);
        self.diagnostics.push(Diagnostic::from_code(
            code,
            args,
            Range::new(start as u32, end as u32),
            self.token_start_position,
        ));
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    /// Scan the next token.
    pub fn lex(&mut self) -> Token {
        self.preceding_line_break = false;
        self.skip_trivia();
        self.begin_token();
        let kind = self.scan_token();
        self.finish_token(kind)
    }

    pub(crate) fn begin_token(&mut self) {
        self.token_start = self.pos;
        self.token_start_position = self.position();
        self.token_flags = if self.preceding_line_break {
            TokenFlags::PRECEDING_LINE_BREAK
        } else {
            TokenFlags::empty()
        };
        self.token_value = TokenValue::None;
    }

    pub(crate) fn finish_token(&mut self, kind: SyntaxKind) -> Token {
        let start = self.token_start;
        let end = self.pos.max(start);
        let raw = self
            .source
            .get(start..end)
            .map(|text| self.interner.intern(text))
            .unwrap_or_default();
        let value = std::mem::take(&mut self.token_value);
        let value = match (kind, value) {
            (SyntaxKind::TrueKeyword, _) => TokenValue::Boolean(true),
            (SyntaxKind::FalseKeyword, _) => TokenValue::Boolean(false),
            (_, value) => value,
        };

        if kind == SyntaxKind::CloseParenToken {
            let opened_by_statement = self.paren_stack.pop().unwrap_or(false);
            self.regex_allowed = opened_by_statement;
        } else {
            self.regex_allowed = regex_allowed_after(kind);
        }
        if kind == SyntaxKind::OpenParenToken {
            self.paren_stack.push(matches!(
                self.last_kind,
                Some(
                    SyntaxKind::IfKeyword
                        | SyntaxKind::WhileKeyword
                        | SyntaxKind::ForKeyword
                        | SyntaxKind::WithKeyword
                )
            ));
        }
        self.last_kind = Some(kind);

        Token {
            kind,
            range: Range::new(start as u32, end as u32),
            location: Location::new(self.token_start_position, self.position()),
            raw,
            value,
            flags: self.token_flags,
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            let Some(b) = self.peek() else {
                return;
            };
            match b {
                b' ' | b'\t' | 0x0B | 0x0C => self.pos += 1,
                b'\n' | b'\r' => {
                    let len = self.line_terminator_len(self.pos).unwrap_or(1);
                    self.pos += len;
                    self.new_line(self.pos);
                    self.preceding_line_break = true;
                }
                b'/' => match self.peek_at(1) {
                    Some(b'/') => self.skip_line_comment(2, CommentKind::Line),
                    Some(b'*') => self.skip_block_comment(),
                    _ => return,
                },
                b'<' if !self.module && self.starts_with_at(self.pos, "<!--") => {
                    self.skip_line_comment(4, CommentKind::Html);
                }
                b'-' if !self.module
                    && (self.preceding_line_break || self.last_kind.is_none())
                    && self.starts_with_at(self.pos, "-->") =>
                {
                    self.skip_line_comment(3, CommentKind::Html);
                }
                b'#' if self.pos == 0 && self.peek_at(1) == Some(b'!') => {
                    self.skip_line_comment(2, CommentKind::Hashbang);
                }
                b if b >= 0x80 => {
                    let Some(c) = self.char_at(self.pos) else {
                        return;
                    };
                    let cp = c as u32;
                    if is_white_space(cp) {
                        self.pos += c.len_utf8();
                    } else if cp == char_codes::LINE_SEPARATOR || cp == char_codes::PARAGRAPH_SEPARATOR {
                        self.pos += c.len_utf8();
                        self.new_line(self.pos);
                        self.preceding_line_break = true;
                    } else {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    /// Skip a comment running to the end of the line. `opener` is the byte
    /// length of the comment's opening delimiter.
    fn skip_line_comment(&mut self, opener: usize, kind: CommentKind) {
        let start = self.pos;
        let start_position = self.position();
        let body_start = start + opener;
        let bytes = self.source.as_bytes();
        let mut end = bytes.len();
        let mut search = body_start.min(end);
        while let Some(offset) = bytes.get(search..).and_then(|s| memchr3(b'\n', b'\r', 0xE2, s)) {
            let candidate = search + offset;
            if self.line_terminator_len(candidate).is_some() {
                end = candidate;
                break;
            }
            search = candidate + 1;
        }
        self.pos = end;
        if self.collect_comments {
            let value = self.source.get(body_start.min(end)..end).unwrap_or("").to_string();
            self.comments.push(Comment {
                kind,
                value,
                range: Range::new(start as u32, end as u32),
                location: Location::new(start_position, self.position()),
            });
        }
    }

    fn skip_block_comment(&mut self) {
        let start = self.pos;
        let start_position = self.position();
        self.token_start_position = start_position;
        let body_start = start + 2;
        let bytes = self.source.as_bytes();
        let (body_end, end) = match bytes.get(body_start..).and_then(|s| memmem::find(s, b"*/")) {
            Some(offset) => (body_start + offset, body_start + offset + 2),
            None => (bytes.len(), bytes.len()),
        };
        if self.track_lines(body_start, body_end) {
            self.preceding_line_break = true;
        }
        self.pos = end;
        if body_end == end {
            self.diagnostics.push(Diagnostic::from_code(
                diagnostic_codes::UNTERMINATED_COMMENT,
                &[],
                Range::new(start as u32, end as u32),
                start_position,
            ));
        }
        if self.collect_comments {
            let value = self.source.get(body_start..body_end).unwrap_or("").to_string();
            self.comments.push(Comment {
                kind: CommentKind::Block,
                value,
                range: Range::new(start as u32, end as u32),
                location: Location::new(start_position, self.position()),
            });
        }
    }

    fn scan_token(&mut self) -> SyntaxKind {
        let Some(b) = self.peek() else {
            return SyntaxKind::EndOfFileToken;
        };
        match b {
            b'{' => {
                self.pos += 1;
                self.curly_stack.push(CurlyKind::Brace);
                SyntaxKind::OpenBraceToken
            }
            b'}' => {
                self.pos += 1;
                match self.curly_stack.pop() {
                    Some(CurlyKind::TemplateSubstitution) => self.scan_template(false),
                    _ => SyntaxKind::CloseBraceToken,
                }
            }
            b'(' => self.single(SyntaxKind::OpenParenToken),
            b')' => self.single(SyntaxKind::CloseParenToken),
            b'[' => self.single(SyntaxKind::OpenBracketToken),
            b']' => self.single(SyntaxKind::CloseBracketToken),
            b';' => self.single(SyntaxKind::SemicolonToken),
            b',' => self.single(SyntaxKind::CommaToken),
            b':' => self.single(SyntaxKind::ColonToken),
            b'~' => self.single(SyntaxKind::TildeToken),
            b'@' => self.single(SyntaxKind::AtToken),
            b'.' => match self.peek_at(1) {
                Some(b'0'..=b'9') => self.scan_number(),
                Some(b'.') if self.peek_at(2) == Some(b'.') => {
                    self.pos += 3;
                    SyntaxKind::DotDotDotToken
                }
                _ => self.single(SyntaxKind::DotToken),
            },
            b'?' => match self.peek_at(1) {
                Some(b'.') if !matches!(self.peek_at(2), Some(b'0'..=b'9')) => {
                    self.pos += 2;
                    SyntaxKind::QuestionDotToken
                }
                Some(b'?') => {
                    if self.peek_at(2) == Some(b'=') {
                        self.pos += 3;
                        SyntaxKind::QuestionQuestionEqualsToken
                    } else {
                        self.pos += 2;
                        SyntaxKind::QuestionQuestionToken
                    }
                }
                _ => self.single(SyntaxKind::QuestionToken),
            },
            b'<' => match (self.peek_at(1), self.peek_at(2)) {
                (Some(b'<'), Some(b'=')) => self.advance_by(3, SyntaxKind::LessThanLessThanEqualsToken),
                (Some(b'<'), _) => self.advance_by(2, SyntaxKind::LessThanLessThanToken),
                (Some(b'='), _) => self.advance_by(2, SyntaxKind::LessThanEqualsToken),
                _ => self.single(SyntaxKind::LessThanToken),
            },
            b'>' => match (self.peek_at(1), self.peek_at(2), self.peek_at(3)) {
                (Some(b'>'), Some(b'>'), Some(b'=')) => {
                    self.advance_by(4, SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken)
                }
                (Some(b'>'), Some(b'>'), _) => {
                    self.advance_by(3, SyntaxKind::GreaterThanGreaterThanGreaterThanToken)
                }
                (Some(b'>'), Some(b'='), _) => {
                    self.advance_by(3, SyntaxKind::GreaterThanGreaterThanEqualsToken)
                }
                (Some(b'>'), _, _) => self.advance_by(2, SyntaxKind::GreaterThanGreaterThanToken),
                (Some(b'='), _, _) => self.advance_by(2, SyntaxKind::GreaterThanEqualsToken),
                _ => self.single(SyntaxKind::GreaterThanToken),
            },
            b'=' => match (self.peek_at(1), self.peek_at(2)) {
                (Some(b'='), Some(b'=')) => self.advance_by(3, SyntaxKind::EqualsEqualsEqualsToken),
                (Some(b'='), _) => self.advance_by(2, SyntaxKind::EqualsEqualsToken),
                (Some(b'>'), _) => self.advance_by(2, SyntaxKind::EqualsGreaterThanToken),
                _ => self.single(SyntaxKind::EqualsToken),
            },
            b'!' => match (self.peek_at(1), self.peek_at(2)) {
                (Some(b'='), Some(b'=')) => {
                    self.advance_by(3, SyntaxKind::ExclamationEqualsEqualsToken)
                }
                (Some(b'='), _) => self.advance_by(2, SyntaxKind::ExclamationEqualsToken),
                _ => self.single(SyntaxKind::ExclamationToken),
            },
            b'+' => match self.peek_at(1) {
                Some(b'+') => self.advance_by(2, SyntaxKind::PlusPlusToken),
                Some(b'=') => self.advance_by(2, SyntaxKind::PlusEqualsToken),
                _ => self.single(SyntaxKind::PlusToken),
            },
            b'-' => match self.peek_at(1) {
                Some(b'-') => self.advance_by(2, SyntaxKind::MinusMinusToken),
                Some(b'=') => self.advance_by(2, SyntaxKind::MinusEqualsToken),
                _ => self.single(SyntaxKind::MinusToken),
            },
            b'*' => match (self.peek_at(1), self.peek_at(2)) {
                (Some(b'*'), Some(b'=')) => {
                    self.advance_by(3, SyntaxKind::AsteriskAsteriskEqualsToken)
                }
                (Some(b'*'), _) => self.advance_by(2, SyntaxKind::AsteriskAsteriskToken),
                (Some(b'='), _) => self.advance_by(2, SyntaxKind::AsteriskEqualsToken),
                _ => self.single(SyntaxKind::AsteriskToken),
            },
            b'/' => {
                if self.detect_regex && self.regex_allowed {
                    return self.scan_regexp_body();
                }
                match self.peek_at(1) {
                    Some(b'=') => self.advance_by(2, SyntaxKind::SlashEqualsToken),
                    _ => self.single(SyntaxKind::SlashToken),
                }
            }
            b'%' => match self.peek_at(1) {
                Some(b'=') => self.advance_by(2, SyntaxKind::PercentEqualsToken),
                _ => self.single(SyntaxKind::PercentToken),
            },
            b'&' => match (self.peek_at(1), self.peek_at(2)) {
                (Some(b'&'), Some(b'=')) => {
                    self.advance_by(3, SyntaxKind::AmpersandAmpersandEqualsToken)
                }
                (Some(b'&'), _) => self.advance_by(2, SyntaxKind::AmpersandAmpersandToken),
                (Some(b'='), _) => self.advance_by(2, SyntaxKind::AmpersandEqualsToken),
                _ => self.single(SyntaxKind::AmpersandToken),
            },
            b'|' => match (self.peek_at(1), self.peek_at(2)) {
                (Some(b'|'), Some(b'=')) => self.advance_by(3, SyntaxKind::BarBarEqualsToken),
                (Some(b'|'), _) => self.advance_by(2, SyntaxKind::BarBarToken),
                (Some(b'='), _) => self.advance_by(2, SyntaxKind::BarEqualsToken),
                _ => self.single(SyntaxKind::BarToken),
            },
            b'^' => match self.peek_at(1) {
                Some(b'=') => self.advance_by(2, SyntaxKind::CaretEqualsToken),
                _ => self.single(SyntaxKind::CaretToken),
            },
            b'\'' | b'"' => self.scan_string(b),
            b'`' => {
                self.pos += 1;
                self.scan_template(true)
            }
            b'0'..=b'9' => self.scan_number(),
            b'#' => self.scan_private_identifier(),
            b'\\' => self.scan_identifier(),
            b'a'..=b'z' | b'A'..=b'Z' | b'$' | b'_' => self.scan_identifier(),
            _ => {
                if let Some(c) = self.char_at(self.pos)
                    && b >= 0x80
                    && is_identifier_start(c as u32)
                {
                    return self.scan_identifier();
                }
                let width = self.char_at(self.pos).map_or(1, char::len_utf8);
                self.pos += width;
                self.error_at_token(diagnostic_codes::INVALID_CHARACTER, &[]);
                SyntaxKind::Unknown
            }
        }
    }

    #[inline]
    fn single(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        kind
    }

    #[inline]
    fn advance_by(&mut self, width: usize, kind: SyntaxKind) -> SyntaxKind {
        self.pos += width;
        kind
    }

    // =========================================================================
    // Identifiers
    // =========================================================================

    /// Decode `\u` escape digits at the current position (just after `\u`).
    /// Returns the code point or the diagnostic code describing the failure.
    pub(crate) fn scan_unicode_escape_digits(&mut self) -> Result<u32, u32> {
        if self.peek() == Some(b'{') {
            self.pos += 1;
            let digits_start = self.pos;
            let mut value: u32 = 0;
            let mut overflow = false;
            while let Some(b) = self.peek() {
                let Some(digit) = (b as char).to_digit(16) else {
                    break;
                };
                value = value.saturating_mul(16).saturating_add(digit);
                if value > char_codes::MAX_CODE_POINT {
                    overflow = true;
                }
                self.pos += 1;
            }
            if self.pos == digits_start || self.peek() != Some(b'}') {
                return Err(diagnostic_codes::INVALID_UNICODE_ESCAPE_SEQUENCE);
            }
            self.pos += 1;
            if overflow {
                return Err(diagnostic_codes::UNICODE_ESCAPE_OUT_OF_RANGE);
            }
            return Ok(value);
        }
        let mut value = 0;
        for _ in 0..4 {
            let Some(digit) = self.peek().and_then(|b| (b as char).to_digit(16)) else {
                return Err(diagnostic_codes::INVALID_UNICODE_ESCAPE_SEQUENCE);
            };
            value = value * 16 + digit;
            self.pos += 1;
        }
        Ok(value)
    }

    /// Scan an identifier escape `\uXXXX` at the current position.
    fn scan_identifier_escape(&mut self, must_start: bool) -> Option<char> {
        let escape_start = self.pos;
        if self.peek_at(1) != Some(b'u') {
            self.pos += 1;
            self.error_span(
                diagnostic_codes::INVALID_UNICODE_ESCAPE_SEQUENCE,
                &[],
                escape_start,
                self.pos,
            );
            return None;
        }
        self.pos += 2;
        match self.scan_unicode_escape_digits() {
            Ok(cp) => {
                let valid = if must_start {
                    is_identifier_start(cp)
                } else {
                    is_identifier_part(cp)
                };
                if !valid {
                    self.error_span(
                        diagnostic_codes::INVALID_ESCAPED_IDENTIFIER_CHARACTER,
                        &[],
                        escape_start,
                        self.pos,
                    );
                    return None;
                }
                char::from_u32(cp)
            }
            Err(code) => {
                self.error_span(code, &[], escape_start, self.pos);
                None
            }
        }
    }

    /// Scan identifier characters from the current position. Returns the
    /// decoded name when escapes were present.
    pub(crate) fn scan_identifier_chars(&mut self) -> Option<String> {
        let name_start = self.pos;
        let mut cooked: Option<String> = None;
        let mut first = true;
        loop {
            let Some(b) = self.peek() else {
                break;
            };
            if b.is_ascii_alphanumeric() || b == b'$' || b == b'_' {
                if first && b.is_ascii_digit() {
                    break;
                }
                if let Some(cooked) = cooked.as_mut() {
                    cooked.push(b as char);
                }
                self.pos += 1;
            } else if b == b'\\' {
                let cooked = cooked.get_or_insert_with(|| {
                    self.source.get(name_start..self.pos).unwrap_or("").to_string()
                });
                self.token_flags |= TokenFlags::UNICODE_ESCAPE;
                if let Some(c) = self.scan_identifier_escape(first) {
                    cooked.push(c);
                }
            } else if b >= 0x80 {
                let Some(c) = self.char_at(self.pos) else {
                    break;
                };
                let ok = if first {
                    is_identifier_start(c as u32)
                } else {
                    is_identifier_part(c as u32)
                };
                if !ok {
                    break;
                }
                if let Some(cooked) = cooked.as_mut() {
                    cooked.push(c);
                }
                self.pos += c.len_utf8();
            } else {
                break;
            }
            first = false;
        }
        cooked
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        let cooked = self.scan_identifier_chars();
        if self.pos == start {
            // A lone backslash that did not form an escape.
            self.pos += 1;
            return SyntaxKind::Unknown;
        }
        match cooked {
            Some(name) => {
                self.token_value = TokenValue::String(self.interner.intern_owned(name));
                SyntaxKind::Identifier
            }
            None => {
                let text = self.source.get(start..self.pos).unwrap_or("");
                let kind = text_to_keyword(text).unwrap_or(SyntaxKind::Identifier);
                self.token_value = TokenValue::String(self.interner.intern(text));
                kind
            }
        }
    }

    fn scan_private_identifier(&mut self) -> SyntaxKind {
        self.pos += 1;
        let name_start = self.pos;
        let starts_name = match self.peek() {
            Some(b'\\') => true,
            Some(_) => self.char_at(self.pos).is_some_and(|c| is_identifier_start(c as u32)),
            None => false,
        };
        if !starts_name {
            self.error_at_token(diagnostic_codes::INVALID_CHARACTER, &[]);
            return SyntaxKind::Unknown;
        }
        let cooked = self.scan_identifier_chars();
        let name = match cooked {
            Some(name) => self.interner.intern_owned(name),
            None => {
                let text = self.source.get(name_start..self.pos).unwrap_or("");
                self.interner.intern(text)
            }
        };
        self.token_value = TokenValue::String(name);
        SyntaxKind::PrivateIdentifier
    }

    /// Re-scan a `/` or `/=` token as a regular expression literal.
    pub fn rescan_slash_as_regexp(&mut self, token: &Token) -> Token {
        self.reset_to_token(token);
        self.scan_regexp()
    }

    /// Rewind to the start of `token`, keeping its line-break flag.
    pub(crate) fn reset_to_token(&mut self, token: &Token) {
        self.pos = token.range.start as usize;
        self.line = token.location.start.line;
        self.line_start = self.pos.saturating_sub(token.location.start.column as usize);
        self.preceding_line_break = token.has_preceding_line_break();
    }

    /// Scan a regular expression literal starting at the current `/`.
    pub fn scan_regexp(&mut self) -> Token {
        self.begin_token();
        let kind = if self.peek() == Some(b'/') {
            self.scan_regexp_body()
        } else {
            self.scan_token()
        };
        self.finish_token(kind)
    }
}

/// Whether a `/` after a token of this kind starts a regular expression.
fn regex_allowed_after(kind: SyntaxKind) -> bool {
    match kind {
        SyntaxKind::Identifier
        | SyntaxKind::PrivateIdentifier
        | SyntaxKind::NumericLiteral
        | SyntaxKind::BigIntLiteral
        | SyntaxKind::StringLiteral
        | SyntaxKind::RegularExpressionLiteral
        | SyntaxKind::NoSubstitutionTemplateLiteral
        | SyntaxKind::TemplateTail
        | SyntaxKind::ThisKeyword
        | SyntaxKind::SuperKeyword
        | SyntaxKind::TrueKeyword
        | SyntaxKind::FalseKeyword
        | SyntaxKind::NullKeyword
        | SyntaxKind::CloseBracketToken
        | SyntaxKind::CloseParenToken
        | SyntaxKind::PlusPlusToken
        | SyntaxKind::MinusMinusToken => false,
        SyntaxKind::YieldKeyword | SyntaxKind::AwaitKeyword | SyntaxKind::OfKeyword => true,
        kind if kind.is_identifier_like() => false,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<SyntaxKind> {
        let mut scanner = ScannerState::new(source);
        let mut out = Vec::new();
        loop {
            let token = scanner.lex();
            if token.kind == SyntaxKind::EndOfFileToken {
                break;
            }
            out.push(token.kind);
        }
        out
    }

    #[test]
    fn punctuators_use_longest_match() {
        assert_eq!(
            kinds(">>>= ?. ?? ??= ... => **="),
            vec![
                SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken,
                SyntaxKind::QuestionDotToken,
                SyntaxKind::QuestionQuestionToken,
                SyntaxKind::QuestionQuestionEqualsToken,
                SyntaxKind::DotDotDotToken,
                SyntaxKind::EqualsGreaterThanToken,
                SyntaxKind::AsteriskAsteriskEqualsToken,
            ]
        );
    }

    #[test]
    fn question_dot_before_digit_is_conditional() {
        assert_eq!(
            kinds("a?.5:b"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::QuestionToken,
                SyntaxKind::NumericLiteral,
                SyntaxKind::ColonToken,
                SyntaxKind::Identifier,
            ]
        );
    }

    #[test]
    fn line_break_flag_tracks_trivia() {
        let mut scanner = ScannerState::new("a /* x\n */ b\nc");
        assert!(!scanner.lex().has_preceding_line_break());
        let b = scanner.lex();
        assert!(b.has_preceding_line_break());
        assert_eq!(b.location.start, Position::new(1, 4));
        let c = scanner.lex();
        assert!(c.has_preceding_line_break());
        assert_eq!(c.location.start, Position::new(2, 0));
    }

    #[test]
    fn crlf_counts_as_one_line() {
        let mut scanner = ScannerState::new("a\r\nb\u{2028}c");
        scanner.lex();
        assert_eq!(scanner.lex().location.start, Position::new(1, 0));
        assert_eq!(scanner.lex().location.start, Position::new(2, 0));
    }

    #[test]
    fn save_and_restore_rewinds_diagnostics() {
        let mut scanner = ScannerState::new("a \u{0001} b");
        scanner.lex();
        let snapshot = scanner.save_state();
        assert_eq!(scanner.lex().kind, SyntaxKind::Unknown);
        assert_eq!(scanner.diagnostics().len(), 1);
        scanner.restore_state(snapshot);
        assert!(scanner.diagnostics().is_empty());
        assert_eq!(scanner.lex().kind, SyntaxKind::Unknown);
    }

    #[test]
    fn escaped_keyword_is_an_identifier() {
        let mut scanner = ScannerState::new("\\u0069f");
        let token = scanner.lex();
        assert_eq!(token.kind, SyntaxKind::Identifier);
        assert_eq!(token.string_value(), "if");
        assert!(token.flags.contains(TokenFlags::UNICODE_ESCAPE));
    }

    #[test]
    fn html_comments_only_in_scripts() {
        assert_eq!(kinds("a <!-- b\n--> c\nd"), vec![SyntaxKind::Identifier, SyntaxKind::Identifier]);
        let mut scanner = ScannerState::new("a <!-- b");
        scanner.set_module(true);
        assert_eq!(scanner.lex().kind, SyntaxKind::Identifier);
        assert_eq!(scanner.lex().kind, SyntaxKind::LessThanToken);
    }

    #[test]
    fn hashbang_is_a_comment() {
        let mut scanner = ScannerState::new("#!/usr/bin/env node\nx");
        scanner.set_collect_comments(true);
        assert_eq!(scanner.lex().kind, SyntaxKind::Identifier);
        assert_eq!(scanner.comments()[0].kind, CommentKind::Hashbang);
        assert_eq!(scanner.comments()[0].value, "/usr/bin/env node");
    }

    #[test]
    fn regex_detection_follows_previous_token() {
        let mut scanner = ScannerState::new("a / b; if (x) /re/g.test(y)");
        scanner.set_regex_detection(true);
        let mut seen = Vec::new();
        loop {
            let token = scanner.lex();
            if token.kind == SyntaxKind::EndOfFileToken {
                break;
            }
            seen.push(token.kind);
        }
        assert_eq!(seen[1], SyntaxKind::SlashToken);
        assert!(seen.contains(&SyntaxKind::RegularExpressionLiteral));
    }
}
