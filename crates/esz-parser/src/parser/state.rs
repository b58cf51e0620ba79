//! Parser state: token plumbing, diagnostics, context and entry points.
//!
//! Grammar productions live in the sibling `state_*` modules as further
//! `impl ParserState` blocks.

use bitflags::bitflags;
use esz_common::diagnostics::diagnostic_codes;
use esz_common::{Atom, Diagnostic, Location, Position, Range, limits};
use esz_scanner::{Comment, ScannerState, SyntaxKind, Token, TokenValue};
use rustc_hash::{FxHashMap, FxHashSet};

use super::scope::{Label, PrivateScope, Scope};
use crate::ast::{Expression, NodeBase, NodeKind, Program};
use crate::error::{PResult, ParseError, ParseFailure};
use crate::options::ParserOptions;

bitflags! {
    /// Grammar parameters and function-level facts threaded through descent.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub(crate) struct ContextFlags: u32 {
        /// Inside a generator body: `yield` is an operator.
        const YIELD = 1 << 0;
        /// Inside an async body or module top level: `await` is an operator.
        const AWAIT = 1 << 1;
        /// `return` is allowed.
        const RETURN = 1 << 2;
        /// `new.target` is allowed.
        const NEW_TARGET = 1 << 3;
        /// `super.x` and `super[x]` are allowed.
        const SUPER_PROPERTY = 1 << 4;
        /// `super(...)` is allowed.
        const SUPER_CALL = 1 << 5;
        /// Field initializer or static block: `arguments` is forbidden.
        const CLASS_FIELD = 1 << 6;
        /// Static block: `await` is reserved.
        const STATIC_BLOCK = 1 << 7;
        /// Formal parameters: `yield`/`await` expressions are forbidden.
        const PARAMETERS = 1 << 8;
        /// `for` head before `in`/`of`: `in` is not a binary operator.
        const DISALLOW_IN = 1 << 9;
    }
}

/// Start of a node under construction.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Marker {
    pub(crate) offset: u32,
    pub(crate) position: Position,
}

/// Object-literal forms that are only valid once the literal is reinterpreted
/// as a pattern. Reported when the enclosing assignment expression finishes
/// without that happening.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct CoverErrors {
    /// `{ a = 1 }` shorthand initializer.
    pub(crate) shorthand_init: Option<(Range, Position)>,
    /// Second `__proto__: value` in one literal.
    pub(crate) duplicate_proto: Option<(Range, Position)>,
}

/// Function-level state swapped out while parsing a nested function body.
pub(crate) struct SavedFunctionState {
    context: ContextFlags,
    strict: bool,
    labels: Vec<Label>,
    in_iteration: u32,
    in_switch: u32,
    scopes_len: usize,
    /// Lengths of the position lists; a nested body's entries are dropped.
    positions_len: (usize, usize, usize),
}

/// Result of one parse call.
#[derive(Debug)]
pub struct ParseOutput<T> {
    pub root: T,
    /// Recorded diagnostics in source order. Non-empty only in tolerant mode,
    /// or for regex translation failures that were not required to succeed.
    pub diagnostics: Vec<Diagnostic>,
    /// Present when `ParserOptions::tokens` is set.
    pub tokens: Option<Vec<Token>>,
    /// Present when `ParserOptions::comments` is set.
    pub comments: Option<Vec<Comment>>,
}

/// Recursive-descent parser over one source text at a time.
///
/// A `ParserState` may be reused sequentially; every parse call resets the
/// scanner and all per-source state.
pub struct ParserState {
    pub(crate) scanner: ScannerState,
    pub(crate) options: ParserOptions,
    /// Current token.
    pub(crate) current: Token,
    /// End of the last consumed token.
    pub(crate) prev_end: u32,
    pub(crate) prev_end_position: Position,
    /// Scanner diagnostics already turned into parser diagnostics.
    lex_errors_seen: usize,
    pub(crate) diagnostics: Vec<Diagnostic>,
    tokens: Vec<Token>,

    pub(crate) module: bool,
    pub(crate) strict: bool,
    pub(crate) context: ContextFlags,
    depth: u32,

    pub(crate) labels: Vec<Label>,
    pub(crate) in_iteration: u32,
    pub(crate) in_switch: u32,

    pub(crate) scopes: Vec<Scope>,
    pub(crate) private_scopes: Vec<PrivateScope>,
    pub(crate) undefined_exports: FxHashMap<Atom, (Range, Position)>,
    pub(crate) exported_names: FxHashSet<Atom>,

    pub(crate) cover: CoverErrors,
    /// Ranges of expressions written inside parentheses.
    pub(crate) parenthesized: FxHashSet<Range>,
    /// Starts of spread elements followed by a comma.
    pub(crate) spread_with_trailing_comma: FxHashSet<u32>,
    /// Start of the assignment expression being parsed; a `(` or identifier
    /// there may begin an arrow function.
    pub(crate) potential_arrow_at: u32,
    /// Starts of `yield` expressions, in source order.
    pub(crate) yield_positions: Vec<Marker>,
    /// Starts of `await` expressions, in source order.
    pub(crate) await_positions: Vec<Marker>,
    /// Starts of `await` used as an identifier, in source order.
    pub(crate) await_identifier_positions: Vec<Marker>,
}

impl ParserState {
    pub fn new(options: ParserOptions) -> Self {
        let mut scanner = ScannerState::new("");
        scanner.set_collect_comments(options.comments);
        ParserState {
            scanner,
            options,
            current: Token::eof(0, Position::default()),
            prev_end: 0,
            prev_end_position: Position::default(),
            lex_errors_seen: 0,
            diagnostics: Vec::new(),
            tokens: Vec::new(),
            module: false,
            strict: false,
            context: ContextFlags::empty(),
            depth: 0,
            labels: Vec::new(),
            in_iteration: 0,
            in_switch: 0,
            scopes: Vec::new(),
            private_scopes: Vec::new(),
            undefined_exports: FxHashMap::default(),
            exported_names: FxHashSet::default(),
            cover: CoverErrors::default(),
            parenthesized: FxHashSet::default(),
            spread_with_trailing_comma: FxHashSet::default(),
            potential_arrow_at: u32::MAX,
            yield_positions: Vec::new(),
            await_positions: Vec::new(),
            await_identifier_positions: Vec::new(),
        }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    /// Parse `source` as a script.
    pub fn parse_script(&mut self, source: &str) -> Result<ParseOutput<Program>, ParseError> {
        let _span = tracing::debug_span!("parse_script", len = source.len()).entered();
        self.reset(source, false);
        let result = self.parse_program();
        self.finish(result)
    }

    /// Parse `source` as a module: strict, with `import`/`export` and
    /// top-level `await`.
    pub fn parse_module(&mut self, source: &str) -> Result<ParseOutput<Program>, ParseError> {
        let _span = tracing::debug_span!("parse_module", len = source.len()).entered();
        self.reset(source, true);
        let result = self.parse_program();
        self.finish(result)
    }

    /// Parse `source` as a single expression, in sloppy script context.
    pub fn parse_expression(&mut self, source: &str) -> Result<ParseOutput<Expression>, ParseError> {
        let _span = tracing::debug_span!("parse_expression", len = source.len()).entered();
        self.reset(source, false);
        let result = self.parse_standalone_expression();
        self.finish(result)
    }

    fn parse_standalone_expression(&mut self) -> PResult<Expression> {
        self.next_token()?;
        self.push_scope(super::scope::ScopeFlags::TOP);
        let expression = self.parse_sequence_expression();
        self.scopes.clear();
        let expression = expression?;
        if !self.is_token(SyntaxKind::EndOfFileToken) {
            return Err(self.unexpected());
        }
        Ok(expression)
    }

    fn reset(&mut self, source: &str, module: bool) {
        self.scanner.set_text(source);
        self.scanner.set_module(module);
        self.scanner.set_collect_comments(self.options.comments);
        self.scanner.set_regex_detection(false);
        self.current = Token::eof(0, Position::default());
        self.prev_end = 0;
        self.prev_end_position = Position::default();
        self.lex_errors_seen = 0;
        self.diagnostics.clear();
        self.tokens.clear();
        self.module = module;
        self.strict = module;
        self.context = if module {
            ContextFlags::AWAIT
        } else {
            ContextFlags::empty()
        };
        if self.options.allow_return_outside_function {
            self.context |= ContextFlags::RETURN;
        }
        self.depth = 0;
        self.labels.clear();
        self.in_iteration = 0;
        self.in_switch = 0;
        self.scopes.clear();
        self.private_scopes.clear();
        self.undefined_exports.clear();
        self.exported_names.clear();
        self.cover = CoverErrors::default();
        self.parenthesized.clear();
        self.spread_with_trailing_comma.clear();
        self.potential_arrow_at = u32::MAX;
        self.yield_positions.clear();
        self.await_positions.clear();
        self.await_identifier_positions.clear();
    }

    fn finish<T>(&mut self, result: PResult<T>) -> Result<ParseOutput<T>, ParseError> {
        match result {
            Ok(root) => {
                let mut diagnostics = std::mem::take(&mut self.diagnostics);
                diagnostics.sort_by_key(|d| d.range.start);
                if !diagnostics.is_empty() {
                    tracing::debug!(count = diagnostics.len(), "parse finished with diagnostics");
                }
                Ok(ParseOutput {
                    root,
                    diagnostics,
                    tokens: self.options.tokens.then(|| std::mem::take(&mut self.tokens)),
                    comments: self.options.comments.then(|| self.scanner.take_comments()),
                })
            }
            Err(ParseFailure(diagnostic)) => {
                tracing::debug!(code = diagnostic.code, line = diagnostic.line, "parse failed");
                Err(ParseError::from(*diagnostic))
            }
        }
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    #[inline]
    pub(crate) fn kind(&self) -> SyntaxKind {
        self.current.kind
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.current.kind == kind
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.current.range.start
    }

    /// Move to the next token without checking it for lexical errors.
    pub(crate) fn advance(&mut self) {
        self.prev_end = self.current.range.end;
        self.prev_end_position = self.current.location.end;
        self.current = self.scanner.lex();
        self.record_token();
    }

    /// Move to the next token, reporting any lexical errors it carries.
    pub(crate) fn next_token(&mut self) -> PResult<()> {
        self.advance();
        self.check_lexical_errors()
    }

    /// Consume the current token if it has the given kind.
    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> PResult<bool> {
        if self.current.kind == kind {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> PResult<()> {
        if self.current.kind == kind {
            self.next_token()
        } else {
            Err(self.unexpected())
        }
    }

    /// Replace the current token with a re-scanned version of itself.
    pub(crate) fn replace_current(&mut self, token: Token) -> PResult<()> {
        if self.options.tokens
            && let Some(last) = self.tokens.last_mut()
            && last.range.start == token.range.start
        {
            *last = token.clone();
        }
        self.current = token;
        self.check_lexical_errors()
    }

    /// Re-scan the current `/` or `/=` as a regular expression literal.
    pub(crate) fn rescan_regexp(&mut self) -> PResult<()> {
        let token = self.scanner.rescan_slash_as_regexp(&self.current);
        self.replace_current(token)
    }

    /// Re-scan the current identifier-like token as a JSX name, which may
    /// contain `-`.
    pub(crate) fn rescan_jsx_identifier(&mut self) -> PResult<()> {
        let token = self.scanner.rescan_jsx_identifier(&self.current);
        self.replace_current(token)
    }

    /// Re-scan `>>`, `>=` and friends as a single `>`.
    pub(crate) fn split_greater_than(&mut self) -> PResult<()> {
        let token = self.scanner.split_greater_than(&self.current);
        self.replace_current(token)
    }

    /// Move past the `=` of a JSX attribute. A string value is scanned with
    /// JSX rules: no escapes, line breaks allowed.
    pub(crate) fn next_jsx_attribute_value(&mut self) -> PResult<()> {
        let snapshot = self.scanner.save_state();
        self.advance();
        if self.current.kind != SyntaxKind::StringLiteral {
            return self.check_lexical_errors();
        }
        // Drop whatever the ordinary string rules reported.
        self.scanner.restore_state(snapshot);
        let token = self.scanner.rescan_jsx_attribute_value(&self.current);
        self.replace_current(token)
    }

    /// Move past the current token into JSX children.
    pub(crate) fn next_jsx_child(&mut self) -> PResult<()> {
        self.prev_end = self.current.range.end;
        self.prev_end_position = self.current.location.end;
        self.current = self.scanner.scan_jsx_child();
        self.record_token();
        self.check_lexical_errors()
    }

    fn record_token(&mut self) {
        if self.options.tokens && self.current.kind != SyntaxKind::EndOfFileToken {
            self.tokens.push(self.current.clone());
        }
    }

    fn check_lexical_errors(&mut self) -> PResult<()> {
        let diagnostics = self.scanner.diagnostics();
        if diagnostics.len() <= self.lex_errors_seen {
            return Ok(());
        }
        let fresh: Vec<Diagnostic> = diagnostics[self.lex_errors_seen..].to_vec();
        self.lex_errors_seen = diagnostics.len();
        for diagnostic in fresh {
            self.report(diagnostic)?;
        }
        Ok(())
    }

    /// Run `f` and rewind the scanner and current token afterwards.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let snapshot = self.scanner.save_state();
        let current = self.current.clone();
        let prev_end = self.prev_end;
        let prev_end_position = self.prev_end_position;
        let tokens_len = self.tokens.len();

        let result = f(self);

        self.scanner.restore_state(snapshot);
        self.current = current;
        self.prev_end = prev_end;
        self.prev_end_position = prev_end_position;
        self.tokens.truncate(tokens_len);
        result
    }

    pub(crate) fn peek_kind(&mut self) -> SyntaxKind {
        self.look_ahead(|p| {
            p.advance();
            p.current.kind
        })
    }

    /// Kind of the next token and whether a line break precedes it.
    pub(crate) fn peek_kind_on_same_line(&mut self) -> Option<SyntaxKind> {
        self.look_ahead(|p| {
            p.advance();
            (!p.current.has_preceding_line_break()).then_some(p.current.kind)
        })
    }

    /// Name carried by an identifier-like token.
    pub(crate) fn token_name(token: &Token) -> Atom {
        match &token.value {
            TokenValue::String(name) => name.clone(),
            _ => token.raw.clone(),
        }
    }

    pub(crate) fn current_name(&self) -> Atom {
        Self::token_name(&self.current)
    }

    // =========================================================================
    // Automatic semicolon insertion
    // =========================================================================

    pub(crate) fn can_insert_semicolon(&self) -> bool {
        matches!(
            self.current.kind,
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || self.current.has_preceding_line_break()
    }

    pub(crate) fn consume_semicolon(&mut self) -> PResult<()> {
        if self.eat(SyntaxKind::SemicolonToken)? || self.can_insert_semicolon() {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Record `diagnostic` in tolerant mode, otherwise stop with it.
    pub(crate) fn report(&mut self, diagnostic: Diagnostic) -> PResult<()> {
        if self.options.tolerant {
            self.diagnostics.push(diagnostic);
            Ok(())
        } else {
            Err(diagnostic.into())
        }
    }

    pub(crate) fn tolerate(
        &mut self,
        code: u32,
        args: &[&str],
        range: Range,
        position: Position,
    ) -> PResult<()> {
        self.report(Diagnostic::from_code(code, args, range, position))
    }

    pub(crate) fn tolerate_at(&mut self, code: u32, args: &[&str], base: &NodeBase) -> PResult<()> {
        self.report(Diagnostic::at_location(code, args, base.range, base.location))
    }

    pub(crate) fn tolerate_at_token(&mut self, code: u32, args: &[&str]) -> PResult<()> {
        let diagnostic = self.diagnostic_at_token(code, args);
        self.report(diagnostic)
    }

    /// Record a diagnostic that never stops the parse.
    pub(crate) fn record(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn diagnostic_at_token(&self, code: u32, args: &[&str]) -> Diagnostic {
        Diagnostic::at_location(code, args, self.current.range, self.current.location)
    }

    pub(crate) fn error_at_token(&self, code: u32, args: &[&str]) -> ParseFailure {
        self.diagnostic_at_token(code, args).into()
    }

    pub(crate) fn error_at(&self, code: u32, args: &[&str], base: &NodeBase) -> ParseFailure {
        Diagnostic::at_location(code, args, base.range, base.location).into()
    }

    /// Error for the current token in a position where it does not belong.
    pub(crate) fn unexpected(&self) -> ParseFailure {
        if self.current.kind == SyntaxKind::EndOfFileToken {
            return self.error_at_token(diagnostic_codes::UNEXPECTED_END_OF_INPUT, &[]);
        }
        let text = format!("'{}'", self.current.raw);
        self.error_at_token(diagnostic_codes::UNEXPECTED_TOKEN, &[&text])
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    #[inline]
    pub(crate) fn start(&self) -> Marker {
        Marker {
            offset: self.current.range.start,
            position: self.current.location.start,
        }
    }

    /// Base for a node spanning from `start` to the end of the last consumed
    /// token.
    pub(crate) fn finish_node(&self, kind: NodeKind, start: Marker) -> NodeBase {
        let range = Range::new(start.offset, self.prev_end.max(start.offset));
        let location = Location::new(start.position, self.prev_end_position);
        self.node_at(kind, range, location)
    }

    /// Base for a node with an explicit extent.
    pub(crate) fn node_at(&self, kind: NodeKind, range: Range, location: Location) -> NodeBase {
        if let Some(observer) = &self.options.on_node_created {
            observer(kind, range);
        }
        NodeBase::new(range, location)
    }

    /// Base for a node covering exactly the current token.
    pub(crate) fn node_at_token(&self, kind: NodeKind) -> NodeBase {
        self.node_at(kind, self.current.range, self.current.location)
    }

    /// Base for a node copied from an existing node's extent.
    pub(crate) fn node_like(&self, kind: NodeKind, base: &NodeBase) -> NodeBase {
        self.node_at(kind, base.range, base.location)
    }

    // =========================================================================
    // Context
    // =========================================================================

    /// Run `f` one nesting level deeper, failing past `max_assignment_depth`.
    pub(crate) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= self.options.max_assignment_depth {
            tracing::debug!(depth = self.depth, pos = self.token_pos(), "nesting limit reached");
            return Err(self.error_at_token(diagnostic_codes::MAXIMUM_NESTING_DEPTH_EXCEEDED, &[]));
        }
        self.depth += 1;
        let result =
            stacker::maybe_grow(limits::PARSER_STACK_RED_ZONE, limits::PARSER_STACK_SEGMENT, || f(self));
        self.depth -= 1;
        result
    }

    #[inline]
    pub(crate) fn has_context(&self, flags: ContextFlags) -> bool {
        self.context.intersects(flags)
    }

    /// Run `f` with `set` added to and `clear` removed from the context.
    pub(crate) fn with_context<T>(
        &mut self,
        set: ContextFlags,
        clear: ContextFlags,
        f: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        let saved = self.context;
        self.context = (self.context - clear) | set;
        let result = f(self);
        self.context = saved;
        result
    }

    /// Run `f` with `in` allowed as a binary operator.
    pub(crate) fn allow_in<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        self.with_context(ContextFlags::empty(), ContextFlags::DISALLOW_IN, f)
    }

    pub(crate) fn in_allowed(&self) -> bool {
        !self.context.contains(ContextFlags::DISALLOW_IN)
    }

    /// Swap in a fresh function-level state. Strictness is inherited.
    pub(crate) fn enter_function(&mut self, context: ContextFlags) -> SavedFunctionState {
        let saved = SavedFunctionState {
            context: self.context,
            strict: self.strict,
            labels: std::mem::take(&mut self.labels),
            in_iteration: self.in_iteration,
            in_switch: self.in_switch,
            scopes_len: self.scopes.len(),
            positions_len: (
                self.yield_positions.len(),
                self.await_positions.len(),
                self.await_identifier_positions.len(),
            ),
        };
        self.context = context;
        self.in_iteration = 0;
        self.in_switch = 0;
        saved
    }

    pub(crate) fn exit_function(&mut self, saved: SavedFunctionState) {
        self.context = saved.context;
        self.strict = saved.strict;
        self.labels = saved.labels;
        self.in_iteration = saved.in_iteration;
        self.in_switch = saved.in_switch;
        self.scopes.truncate(saved.scopes_len);
        let (yields, awaits, await_identifiers) = saved.positions_len;
        self.yield_positions.truncate(yields);
        self.await_positions.truncate(awaits);
        self.await_identifier_positions.truncate(await_identifiers);
    }

    /// Run `f` inside a fresh function-level state.
    pub(crate) fn with_function<T>(
        &mut self,
        context: ContextFlags,
        f: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        let saved = self.enter_function(context);
        let result = f(self);
        self.exit_function(saved);
        result
    }

    /// Record a parse failure and skip to the next statement boundary.
    pub(crate) fn recover(&mut self, failure: ParseFailure, statement_start: u32) {
        let ParseFailure(diagnostic) = failure;
        tracing::trace!(code = diagnostic.code, pos = diagnostic.range.start, "recovering");
        self.diagnostics.push(*diagnostic);
        self.cover = CoverErrors::default();
        loop {
            match self.current.kind {
                SyntaxKind::EndOfFileToken | SyntaxKind::CloseBraceToken => break,
                SyntaxKind::SemicolonToken => {
                    self.skip_token();
                    break;
                }
                kind if is_statement_keyword(kind) && self.current.has_preceding_line_break() => break,
                _ => self.skip_token(),
            }
        }
        if self.current.range.start == statement_start && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            self.skip_token();
        }
        tracing::trace!(pos = self.token_pos(), "resynchronized");
    }

    /// Advance during recovery; lexical errors are recorded, never raised.
    fn skip_token(&mut self) {
        self.advance();
        let diagnostics = self.scanner.diagnostics();
        if diagnostics.len() > self.lex_errors_seen {
            let fresh = diagnostics[self.lex_errors_seen..].to_vec();
            self.lex_errors_seen = diagnostics.len();
            self.diagnostics.extend(fresh);
        }
    }
}

fn is_statement_keyword(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::VarKeyword
            | SyntaxKind::LetKeyword
            | SyntaxKind::ConstKeyword
            | SyntaxKind::FunctionKeyword
            | SyntaxKind::ClassKeyword
            | SyntaxKind::IfKeyword
            | SyntaxKind::ForKeyword
            | SyntaxKind::WhileKeyword
            | SyntaxKind::DoKeyword
            | SyntaxKind::ReturnKeyword
            | SyntaxKind::ThrowKeyword
            | SyntaxKind::TryKeyword
            | SyntaxKind::SwitchKeyword
            | SyntaxKind::BreakKeyword
            | SyntaxKind::ContinueKeyword
            | SyntaxKind::ImportKeyword
            | SyntaxKind::ExportKeyword
    )
}
