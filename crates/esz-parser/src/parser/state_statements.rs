//! Parser state - statement and declaration parsing methods

use esz_common::diagnostics::diagnostic_codes;
use esz_common::{Location, Position, Range};
use esz_scanner::{SyntaxKind, TokenFlags};

use super::scope::{BindingKind, Label, ScopeFlags};
use super::state::{ContextFlags, Marker, ParserState};
use crate::ast::{
    BlockStatement, BreakStatement, CatchClause, ContinueStatement, DebuggerStatement, Directive,
    DoWhileStatement, EmptyStatement, Expression, ExpressionStatement, ForHead, ForInStatement,
    ForInit, ForOfStatement, ForStatement, IfStatement, LabeledStatement, Literal, LiteralValue,
    Module, NodeKind, NodeList, Pattern, Program, ReturnStatement, Script, Statement,
    SwitchCase, SwitchStatement, ThrowStatement, TryStatement, VariableDeclaration,
    VariableDeclarator, VariableKind, WhileStatement, WithStatement,
};
use crate::error::PResult;

/// Where a statement appears. Declarations are only allowed in lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StatementContext {
    /// Directly in the program body.
    TopLevel,
    /// Block, function body, switch case or static block.
    List,
    /// Consequent or alternate of `if`.
    If,
    /// Body of a labeled statement.
    Label,
    /// Body of a loop or `with`.
    Single,
}

impl StatementContext {
    fn is_list(self) -> bool {
        matches!(self, StatementContext::TopLevel | StatementContext::List)
    }
}

/// Statements of a body together with what its directive prologue declared.
pub(crate) struct BodyStatements {
    pub(crate) statements: Vec<Statement>,
    /// Location of a `"use strict"` directive.
    pub(crate) use_strict: Option<(Range, Position)>,
}

impl ParserState {
    // =========================================================================
    // Program
    // =========================================================================

    pub(crate) fn parse_program(&mut self) -> PResult<Program> {
        self.next_token()?;
        self.push_scope(ScopeFlags::TOP);
        let body = self.parse_body_statements(
            |kind| kind == SyntaxKind::EndOfFileToken,
            true,
            StatementContext::TopLevel,
        );
        let body = match body {
            Ok(body) => body,
            Err(failure) => {
                self.scopes.clear();
                return Err(failure);
            }
        };
        if self.module {
            self.check_undefined_exports()?;
        }
        let hoisting = self.pop_scope();
        let range = Range::new(0, self.current.range.end);
        let location = Location::new(Position::default(), self.current.location.end);
        let statements = NodeList::from(body.statements);
        let program = if self.module {
            Program::Module(Box::new(Module {
                base: self.node_at(NodeKind::Module, range, location),
                body: statements,
                hoisting,
            }))
        } else {
            Program::Script(Box::new(Script {
                base: self.node_at(NodeKind::Script, range, location),
                body: statements,
                strict: self.strict,
                hoisting,
            }))
        };
        Ok(program)
    }

    // =========================================================================
    // Statement lists
    // =========================================================================

    /// Parse statements until `is_end` matches the current token, recovering
    /// from errors in tolerant mode. With `directives`, a leading run of
    /// string-literal statements becomes the directive prologue.
    pub(crate) fn parse_body_statements(
        &mut self,
        is_end: impl Fn(SyntaxKind) -> bool,
        directives: bool,
        context: StatementContext,
    ) -> PResult<BodyStatements> {
        let mut statements = Vec::new();
        let mut use_strict = None;
        let mut in_prologue = directives;
        // Prologue strings with octal escapes, checked once "use strict" shows up.
        let mut octal_directives: Vec<(Range, Location)> = Vec::new();

        while !is_end(self.current.kind) && !self.is_token(SyntaxKind::EndOfFileToken) {
            let statement_start = self.token_pos();
            let octal = self.is_token(SyntaxKind::StringLiteral)
                && self.current.flags.contains(TokenFlags::OCTAL_ESCAPE);
            let octal_at = (self.current.range, self.current.location);
            let statement = match self.parse_statement_list_item(context) {
                Ok(statement) => statement,
                Err(failure) if self.options.tolerant => {
                    self.recover(failure, statement_start);
                    in_prologue = false;
                    continue;
                }
                Err(failure) => return Err(failure),
            };

            if !in_prologue {
                statements.push(statement);
                continue;
            }
            match into_directive(statement) {
                Ok(directive) => {
                    if directive.is_use_strict() {
                        if use_strict.is_none() {
                            use_strict = Some((directive.base.range, directive.base.location.start));
                        }
                        if !self.strict {
                            self.strict = true;
                            for (range, location) in octal_directives.drain(..) {
                                self.tolerate(
                                    diagnostic_codes::OCTAL_ESCAPES_NOT_ALLOWED_IN_STRICT_MODE,
                                    &[],
                                    range,
                                    location.start,
                                )?;
                            }
                        }
                    } else if octal && !self.strict {
                        octal_directives.push((octal_at.0, octal_at.1));
                    }
                    statements.push(Statement::Directive(Box::new(directive)));
                }
                Err(statement) => {
                    in_prologue = false;
                    statements.push(statement);
                }
            }
        }
        Ok(BodyStatements {
            statements,
            use_strict,
        })
    }

    /// Statement or declaration inside a statement list.
    pub(crate) fn parse_statement_list_item(&mut self, context: StatementContext) -> PResult<Statement> {
        self.nested(|p| p.parse_statement_inner(context))
    }

    /// Statement in a single-statement position such as a loop body.
    pub(crate) fn parse_statement(&mut self, context: StatementContext) -> PResult<Statement> {
        self.nested(|p| p.parse_statement_inner(context))
    }

    fn parse_statement_inner(&mut self, context: StatementContext) -> PResult<Statement> {
        let start = self.start();
        tracing::trace!(pos = start.offset, kind = ?self.kind(), "parse_statement");
        match self.kind() {
            SyntaxKind::OpenBraceToken => {
                let block = self.with_block_scope(ScopeFlags::empty(), |p| p.parse_block())?;
                Ok(Statement::Block(Box::new(block)))
            }
            SyntaxKind::SemicolonToken => {
                self.next_token()?;
                Ok(Statement::Empty(Box::new(EmptyStatement {
                    base: self.finish_node(NodeKind::Empty, start),
                })))
            }
            SyntaxKind::VarKeyword => self.parse_variable_statement(start, VariableKind::Var),
            SyntaxKind::ConstKeyword => {
                if !context.is_list() {
                    return Err(self.error_at_token(
                        diagnostic_codes::LEXICAL_DECLARATION_IN_SINGLE_STATEMENT,
                        &[],
                    ));
                }
                self.parse_variable_statement(start, VariableKind::Const)
            }
            SyntaxKind::LetKeyword if self.is_let_declaration(!context.is_list()) => {
                if !context.is_list() {
                    return Err(self.error_at_token(
                        diagnostic_codes::LEXICAL_DECLARATION_IN_SINGLE_STATEMENT,
                        &[],
                    ));
                }
                self.parse_variable_statement(start, VariableKind::Let)
            }
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(start, false, context),
            SyntaxKind::AsyncKeyword
                if self.peek_kind_on_same_line() == Some(SyntaxKind::FunctionKeyword) =>
            {
                if !context.is_list() {
                    return Err(self.unexpected());
                }
                self.next_token()?;
                self.parse_function_declaration(start, true, context)
            }
            SyntaxKind::ClassKeyword => {
                if !context.is_list() {
                    return Err(self.unexpected());
                }
                let class = self.parse_class(start, true)?;
                Ok(Statement::ClassDeclaration(Box::new(class)))
            }
            SyntaxKind::IfKeyword => self.parse_if_statement(start),
            SyntaxKind::ForKeyword => self.parse_for_statement(start),
            SyntaxKind::WhileKeyword => self.parse_while_statement(start),
            SyntaxKind::DoKeyword => self.parse_do_statement(start),
            SyntaxKind::ReturnKeyword => self.parse_return_statement(start),
            SyntaxKind::BreakKeyword => self.parse_break_statement(start),
            SyntaxKind::ContinueKeyword => self.parse_continue_statement(start),
            SyntaxKind::ThrowKeyword => self.parse_throw_statement(start),
            SyntaxKind::TryKeyword => self.parse_try_statement(start),
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(start),
            SyntaxKind::WithKeyword => self.parse_with_statement(start),
            SyntaxKind::DebuggerKeyword => {
                self.next_token()?;
                self.consume_semicolon()?;
                Ok(Statement::Debugger(Box::new(DebuggerStatement {
                    base: self.finish_node(NodeKind::Debugger, start),
                })))
            }
            SyntaxKind::ImportKeyword
                if !matches!(
                    self.peek_kind(),
                    SyntaxKind::OpenParenToken | SyntaxKind::DotToken
                ) =>
            {
                self.check_module_item("import", context)?;
                self.parse_import_declaration(start)
            }
            SyntaxKind::ExportKeyword => {
                self.check_module_item("export", context)?;
                self.parse_export_declaration(start)
            }
            _ => self.parse_expression_or_labeled_statement(start, context),
        }
    }

    fn check_module_item(&mut self, keyword: &str, context: StatementContext) -> PResult<()> {
        if !self.module {
            return Err(self.error_at_token(diagnostic_codes::STATEMENT_OUTSIDE_MODULE, &[keyword]));
        }
        if context != StatementContext::TopLevel {
            return Err(self.error_at_token(diagnostic_codes::IMPORT_EXPORT_NOT_AT_TOP_LEVEL, &[]));
        }
        Ok(())
    }

    /// `let` starts a lexical declaration rather than an identifier
    /// expression. In single-statement positions only `let [` does.
    pub(crate) fn is_let_declaration(&mut self, single_statement: bool) -> bool {
        if !self.is_token(SyntaxKind::LetKeyword) {
            return false;
        }
        match self.peek_kind() {
            SyntaxKind::OpenBracketToken => true,
            _ if single_statement => false,
            SyntaxKind::OpenBraceToken => true,
            SyntaxKind::InKeyword | SyntaxKind::InstanceOfKeyword => false,
            kind => kind.is_identifier_like() || kind.is_keyword(),
        }
    }

    // =========================================================================
    // Blocks and declarations
    // =========================================================================

    /// `{ ... }` in the current scope; callers open a block scope if needed.
    pub(crate) fn parse_block(&mut self) -> PResult<BlockStatement> {
        let start = self.start();
        self.expect(SyntaxKind::OpenBraceToken)?;
        let body = self.parse_body_statements(
            |kind| kind == SyntaxKind::CloseBraceToken,
            false,
            StatementContext::List,
        )?;
        self.expect(SyntaxKind::CloseBraceToken)?;
        Ok(BlockStatement {
            base: self.finish_node(NodeKind::Block, start),
            body: NodeList::from(body.statements),
        })
    }

    fn parse_variable_statement(&mut self, start: Marker, kind: VariableKind) -> PResult<Statement> {
        let declarations = self.parse_variable_declarators(kind, false)?;
        self.consume_semicolon()?;
        Ok(Statement::VariableDeclaration(Box::new(VariableDeclaration {
            base: self.finish_node(NodeKind::VariableDeclaration, start),
            kind,
            declarations: NodeList::from(declarations),
        })))
    }

    /// `var|let|const` declaration without a trailing semicolon.
    pub(crate) fn parse_variable_declaration(
        &mut self,
        start: Marker,
        kind: VariableKind,
        in_for_head: bool,
    ) -> PResult<VariableDeclaration> {
        let declarations = self.parse_variable_declarators(kind, in_for_head)?;
        Ok(VariableDeclaration {
            base: self.finish_node(NodeKind::VariableDeclaration, start),
            kind,
            declarations: NodeList::from(declarations),
        })
    }

    /// The keyword and its declarators. In a `for` head, missing initializers
    /// are left for the caller to judge.
    fn parse_variable_declarators(
        &mut self,
        kind: VariableKind,
        in_for_head: bool,
    ) -> PResult<Vec<VariableDeclarator>> {
        self.next_token()?;
        let binding = if kind.is_lexical() {
            BindingKind::Lexical
        } else {
            BindingKind::Var
        };
        let mut declarations = Vec::new();
        loop {
            let declarator_start = self.start();
            let id = self.parse_binding_target(binding)?;
            if kind.is_lexical() {
                let mut names = Vec::new();
                id.bound_names(&mut names);
                if let Some(name) = names.iter().find(|name| name.name.as_str() == "let") {
                    self.tolerate_at(diagnostic_codes::LET_IN_LEXICAL_BINDING, &[], &name.base)?;
                }
            }
            let init = if self.eat(SyntaxKind::EqualsToken)? {
                Some(self.parse_assignment_expression()?)
            } else {
                if !in_for_head {
                    self.check_declarator_initializer(kind, &id)?;
                }
                None
            };
            declarations.push(VariableDeclarator {
                base: self.finish_node(NodeKind::VariableDeclarator, declarator_start),
                id,
                init,
            });
            if !self.eat(SyntaxKind::CommaToken)? {
                break;
            }
        }
        Ok(declarations)
    }

    fn check_declarator_initializer(&mut self, kind: VariableKind, id: &Pattern) -> PResult<()> {
        if kind == VariableKind::Const {
            return self.tolerate_at(
                diagnostic_codes::MISSING_INITIALIZER_IN_DECLARATION,
                &["const"],
                id.base(),
            );
        }
        if !matches!(id, Pattern::Identifier(_)) {
            return self.tolerate_at(
                diagnostic_codes::MISSING_INITIALIZER_IN_DECLARATION,
                &["destructuring"],
                id.base(),
            );
        }
        Ok(())
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    fn parse_if_statement(&mut self, start: Marker) -> PResult<Statement> {
        self.next_token()?;
        let test = self.parse_parenthesized_condition()?;
        let consequent = self.parse_statement(StatementContext::If)?;
        let alternate = if self.eat(SyntaxKind::ElseKeyword)? {
            Some(self.parse_statement(StatementContext::If)?)
        } else {
            None
        };
        Ok(Statement::If(Box::new(IfStatement {
            base: self.finish_node(NodeKind::If, start),
            test,
            consequent,
            alternate,
        })))
    }

    fn parse_parenthesized_condition(&mut self) -> PResult<Expression> {
        self.expect(SyntaxKind::OpenParenToken)?;
        let test = self.allow_in(|p| p.parse_sequence_expression())?;
        self.expect(SyntaxKind::CloseParenToken)?;
        Ok(test)
    }

    /// Parse a loop body with iteration tracking.
    fn parse_loop_body(&mut self) -> PResult<Statement> {
        self.in_iteration += 1;
        let body = self.parse_statement(StatementContext::Single);
        self.in_iteration -= 1;
        body
    }

    fn parse_while_statement(&mut self, start: Marker) -> PResult<Statement> {
        let labels = self.labels_for(start.offset);
        self.next_token()?;
        let test = self.parse_parenthesized_condition()?;
        let body = self.parse_loop_body()?;
        Ok(Statement::While(Box::new(WhileStatement {
            base: self.finish_node(NodeKind::While, start),
            test,
            body,
            labels,
        })))
    }

    fn parse_do_statement(&mut self, start: Marker) -> PResult<Statement> {
        let labels = self.labels_for(start.offset);
        self.next_token()?;
        let body = self.parse_loop_body()?;
        self.expect(SyntaxKind::WhileKeyword)?;
        let test = self.parse_parenthesized_condition()?;
        // The semicolon after do-while is always optional.
        self.eat(SyntaxKind::SemicolonToken)?;
        Ok(Statement::DoWhile(Box::new(DoWhileStatement {
            base: self.finish_node(NodeKind::DoWhile, start),
            body,
            test,
            labels,
        })))
    }

    fn parse_for_statement(&mut self, start: Marker) -> PResult<Statement> {
        let labels = self.labels_for(start.offset);
        self.next_token()?;
        let await_token = if self.is_token(SyntaxKind::AwaitKeyword) {
            if !self.has_context(ContextFlags::AWAIT) {
                return Err(self.error_at_token(diagnostic_codes::FOR_AWAIT_OUTSIDE_ASYNC, &[]));
            }
            let at = (self.current.range, self.current.location);
            self.next_token()?;
            Some(at)
        } else {
            None
        };
        self.expect(SyntaxKind::OpenParenToken)?;
        self.with_block_scope(ScopeFlags::empty(), |p| {
            p.parse_for_rest(start, labels, await_token)
        })
    }

    fn parse_for_rest(
        &mut self,
        start: Marker,
        labels: crate::ast::LabelSet,
        await_token: Option<(Range, Location)>,
    ) -> PResult<Statement> {
        let init_start = self.start();

        if self.is_token(SyntaxKind::SemicolonToken) {
            if let Some((range, location)) = await_token {
                return Err(esz_common::Diagnostic::at_location(
                    diagnostic_codes::UNEXPECTED_TOKEN,
                    &["'await'"],
                    range,
                    location,
                )
                .into());
            }
            return self.parse_for_loop(start, labels, None);
        }

        let declaration_kind = match self.kind() {
            SyntaxKind::VarKeyword => Some(VariableKind::Var),
            SyntaxKind::ConstKeyword => Some(VariableKind::Const),
            SyntaxKind::LetKeyword if self.is_let_declaration(false) => Some(VariableKind::Let),
            _ => None,
        };

        if let Some(kind) = declaration_kind {
            let declaration = self.with_context(ContextFlags::DISALLOW_IN, ContextFlags::empty(), |p| {
                p.parse_variable_declaration(init_start, kind, true)
            })?;
            let head_kind = match self.kind() {
                SyntaxKind::InKeyword => Some("in"),
                SyntaxKind::OfKeyword => Some("of"),
                _ => None,
            };
            if let Some(head) = head_kind {
                self.check_for_head_declaration(&declaration, head)?;
                let left = ForHead::VariableDeclaration(Box::new(declaration));
                return self.parse_for_in_of(start, labels, left, head == "of", await_token);
            }
            for declarator in &declaration.declarations {
                if declarator.init.is_none() {
                    self.check_declarator_initializer(kind, &declarator.id)?;
                }
            }
            self.reject_for_await(await_token)?;
            let init = ForInit::VariableDeclaration(Box::new(declaration));
            return self.parse_for_loop(start, labels, Some(init));
        }

        let starts_with_let = self.is_token(SyntaxKind::LetKeyword);
        let starts_with_async = self.is_token(SyntaxKind::AsyncKeyword);
        let saved_cover = std::mem::take(&mut self.cover);
        let expression = self.with_context(ContextFlags::DISALLOW_IN, ContextFlags::empty(), |p| {
            p.parse_sequence_expression_covered()
        });
        let pending = std::mem::replace(&mut self.cover, saved_cover);
        let expression = expression?;

        let is_of = self.is_token(SyntaxKind::OfKeyword);
        if is_of || self.is_token(SyntaxKind::InKeyword) {
            if is_of && starts_with_let {
                return Err(self.unexpected());
            }
            if is_of
                && starts_with_async
                && await_token.is_none()
                && matches!(&expression, Expression::Identifier(id) if id.name.as_str() == "async")
                && expression.range().start == init_start.offset
            {
                return Err(self.unexpected());
            }
            let head = if is_of { "of" } else { "in" };
            let target = self.expression_to_for_head(expression, head)?;
            return self.parse_for_in_of(start, labels, ForHead::Pattern(target), is_of, await_token);
        }

        self.report_cover_errors(pending)?;
        self.reject_for_await(await_token)?;
        self.parse_for_loop(start, labels, Some(ForInit::Expression(expression)))
    }

    fn reject_for_await(&mut self, await_token: Option<(Range, Location)>) -> PResult<()> {
        match await_token {
            Some((range, location)) => Err(esz_common::Diagnostic::at_location(
                diagnostic_codes::UNEXPECTED_TOKEN,
                &["'await'"],
                range,
                location,
            )
            .into()),
            None => Ok(()),
        }
    }

    fn check_for_head_declaration(&mut self, declaration: &VariableDeclaration, head: &str) -> PResult<()> {
        if declaration.declarations.len() > 1 {
            return self.tolerate_at(
                diagnostic_codes::FOR_LOOP_HEAD_MULTIPLE_BINDINGS,
                &[head],
                &declaration.base,
            );
        }
        let Some(declarator) = declaration.declarations.first() else {
            return Ok(());
        };
        if declarator.init.is_some() {
            // Annex B keeps `for (var x = 1 in o)` in sloppy scripts.
            let legacy = head == "in"
                && !self.strict
                && declaration.kind == VariableKind::Var
                && matches!(declarator.id, Pattern::Identifier(_));
            if !legacy {
                return self.tolerate_at(
                    diagnostic_codes::FOR_LOOP_HEAD_INITIALIZER,
                    &[head],
                    &declarator.base,
                );
            }
        }
        Ok(())
    }

    fn parse_for_loop(
        &mut self,
        start: Marker,
        labels: crate::ast::LabelSet,
        init: Option<ForInit>,
    ) -> PResult<Statement> {
        self.expect(SyntaxKind::SemicolonToken)?;
        let test = if self.is_token(SyntaxKind::SemicolonToken) {
            None
        } else {
            Some(self.allow_in(|p| p.parse_sequence_expression())?)
        };
        self.expect(SyntaxKind::SemicolonToken)?;
        let update = if self.is_token(SyntaxKind::CloseParenToken) {
            None
        } else {
            Some(self.allow_in(|p| p.parse_sequence_expression())?)
        };
        self.expect(SyntaxKind::CloseParenToken)?;
        let body = self.parse_loop_body()?;
        Ok(Statement::For(Box::new(ForStatement {
            base: self.finish_node(NodeKind::For, start),
            init,
            test,
            update,
            body,
            labels,
        })))
    }

    fn parse_for_in_of(
        &mut self,
        start: Marker,
        labels: crate::ast::LabelSet,
        left: ForHead,
        is_of: bool,
        await_token: Option<(Range, Location)>,
    ) -> PResult<Statement> {
        if !is_of {
            self.reject_for_await(await_token)?;
        }
        self.next_token()?;
        let right = if is_of {
            self.allow_in(|p| p.parse_assignment_expression())?
        } else {
            self.allow_in(|p| p.parse_sequence_expression())?
        };
        self.expect(SyntaxKind::CloseParenToken)?;
        let body = self.parse_loop_body()?;
        let statement = if is_of {
            Statement::ForOf(Box::new(ForOfStatement {
                base: self.finish_node(NodeKind::ForOf, start),
                left,
                right,
                body,
                is_await: await_token.is_some(),
                labels,
            }))
        } else {
            Statement::ForIn(Box::new(ForInStatement {
                base: self.finish_node(NodeKind::ForIn, start),
                left,
                right,
                body,
                labels,
            }))
        };
        Ok(statement)
    }

    fn parse_return_statement(&mut self, start: Marker) -> PResult<Statement> {
        if !self.has_context(ContextFlags::RETURN) {
            self.tolerate_at_token(diagnostic_codes::ILLEGAL_RETURN, &[])?;
        }
        self.next_token()?;
        let argument = if self.is_token(SyntaxKind::SemicolonToken) || self.can_insert_semicolon() {
            None
        } else {
            Some(self.allow_in(|p| p.parse_sequence_expression())?)
        };
        self.consume_semicolon()?;
        Ok(Statement::Return(Box::new(ReturnStatement {
            base: self.finish_node(NodeKind::Return, start),
            argument,
        })))
    }

    /// Optional label after `break`/`continue`, on the same line.
    fn parse_jump_label(&mut self) -> PResult<Option<crate::ast::Identifier>> {
        if self.current.kind.is_identifier_like() && !self.current.has_preceding_line_break() {
            Ok(Some(self.parse_identifier_reference()?))
        } else {
            Ok(None)
        }
    }

    fn parse_break_statement(&mut self, start: Marker) -> PResult<Statement> {
        let keyword = (self.current.range, self.current.location);
        self.next_token()?;
        let label = self.parse_jump_label()?;
        match &label {
            Some(label) => {
                if self.find_label(label.name.as_str()).is_none() {
                    self.tolerate_at(
                        diagnostic_codes::UNDEFINED_LABEL,
                        &[label.name.as_str()],
                        &label.base,
                    )?;
                }
            }
            None => {
                if self.in_iteration == 0 && self.in_switch == 0 {
                    self.tolerate(diagnostic_codes::ILLEGAL_BREAK, &[], keyword.0, keyword.1.start)?;
                }
            }
        }
        self.consume_semicolon()?;
        Ok(Statement::Break(Box::new(BreakStatement {
            base: self.finish_node(NodeKind::Break, start),
            label,
        })))
    }

    fn parse_continue_statement(&mut self, start: Marker) -> PResult<Statement> {
        let keyword = (self.current.range, self.current.location);
        self.next_token()?;
        let label = self.parse_jump_label()?;
        if self.in_iteration == 0 {
            self.tolerate(diagnostic_codes::ILLEGAL_CONTINUE, &[], keyword.0, keyword.1.start)?;
        } else if let Some(label) = &label {
            match self.find_label(label.name.as_str()).map(|found| found.is_loop) {
                None => self.tolerate_at(
                    diagnostic_codes::UNDEFINED_LABEL,
                    &[label.name.as_str()],
                    &label.base,
                )?,
                Some(false) => self.tolerate_at(
                    diagnostic_codes::CONTINUE_TARGET_NOT_ITERATION,
                    &[label.name.as_str()],
                    &label.base,
                )?,
                Some(true) => {}
            }
        }
        self.consume_semicolon()?;
        Ok(Statement::Continue(Box::new(ContinueStatement {
            base: self.finish_node(NodeKind::Continue, start),
            label,
        })))
    }

    fn parse_throw_statement(&mut self, start: Marker) -> PResult<Statement> {
        self.next_token()?;
        if self.current.has_preceding_line_break() {
            return Err(self.error_at_token(diagnostic_codes::ILLEGAL_NEWLINE_AFTER_THROW, &[]));
        }
        let argument = self.allow_in(|p| p.parse_sequence_expression())?;
        self.consume_semicolon()?;
        Ok(Statement::Throw(Box::new(ThrowStatement {
            base: self.finish_node(NodeKind::Throw, start),
            argument,
        })))
    }

    fn parse_try_statement(&mut self, start: Marker) -> PResult<Statement> {
        self.next_token()?;
        let block = self.with_block_scope(ScopeFlags::empty(), |p| p.parse_block())?;
        let handler = if self.is_token(SyntaxKind::CatchKeyword) {
            Some(self.parse_catch_clause()?)
        } else {
            None
        };
        let finalizer = if self.eat(SyntaxKind::FinallyKeyword)? {
            Some(self.with_block_scope(ScopeFlags::empty(), |p| p.parse_block())?)
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            return Err(self.error_at_token(diagnostic_codes::MISSING_CATCH_OR_FINALLY, &[]));
        }
        Ok(Statement::Try(Box::new(TryStatement {
            base: self.finish_node(NodeKind::Try, start),
            block,
            handler,
            finalizer,
        })))
    }

    fn parse_catch_clause(&mut self) -> PResult<CatchClause> {
        let start = self.start();
        self.next_token()?;
        if !self.eat(SyntaxKind::OpenParenToken)? {
            let body = self.with_block_scope(ScopeFlags::empty(), |p| p.parse_block())?;
            return Ok(CatchClause {
                base: self.finish_node(NodeKind::CatchClause, start),
                param: None,
                body,
            });
        }
        let simple = self.current.kind.is_identifier_like();
        let flags = if simple {
            ScopeFlags::SIMPLE_CATCH
        } else {
            ScopeFlags::empty()
        };
        // The catch body shares the parameter's scope.
        self.with_block_scope(flags, |p| {
            let binding = if simple {
                BindingKind::SimpleCatch
            } else {
                BindingKind::Lexical
            };
            let param = p.parse_binding_target(binding)?;
            p.expect(SyntaxKind::CloseParenToken)?;
            let body = p.parse_block()?;
            Ok(CatchClause {
                base: p.finish_node(NodeKind::CatchClause, start),
                param: Some(param),
                body,
            })
        })
    }

    fn parse_switch_statement(&mut self, start: Marker) -> PResult<Statement> {
        let labels = self.labels_for(start.offset);
        self.next_token()?;
        let discriminant = self.parse_parenthesized_condition()?;
        self.expect(SyntaxKind::OpenBraceToken)?;
        self.in_switch += 1;
        let cases = self.with_block_scope(ScopeFlags::empty(), |p| p.parse_switch_cases());
        self.in_switch -= 1;
        let cases = cases?;
        self.expect(SyntaxKind::CloseBraceToken)?;
        Ok(Statement::Switch(Box::new(SwitchStatement {
            base: self.finish_node(NodeKind::Switch, start),
            discriminant,
            cases: NodeList::from(cases),
            labels,
        })))
    }

    fn parse_switch_cases(&mut self) -> PResult<Vec<SwitchCase>> {
        let mut cases = Vec::new();
        let mut seen_default = false;
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            let case_start = self.start();
            let test = match self.kind() {
                SyntaxKind::CaseKeyword => {
                    self.next_token()?;
                    Some(self.allow_in(|p| p.parse_sequence_expression())?)
                }
                SyntaxKind::DefaultKeyword => {
                    if seen_default {
                        self.tolerate_at_token(diagnostic_codes::MULTIPLE_DEFAULTS_IN_SWITCH, &[])?;
                    }
                    seen_default = true;
                    self.next_token()?;
                    None
                }
                _ => return Err(self.unexpected()),
            };
            self.expect(SyntaxKind::ColonToken)?;
            let consequent = self.parse_body_statements(
                |kind| {
                    matches!(
                        kind,
                        SyntaxKind::CaseKeyword
                            | SyntaxKind::DefaultKeyword
                            | SyntaxKind::CloseBraceToken
                    )
                },
                false,
                StatementContext::List,
            )?;
            cases.push(SwitchCase {
                base: self.finish_node(NodeKind::SwitchCase, case_start),
                test,
                consequent: NodeList::from(consequent.statements),
            });
        }
        Ok(cases)
    }

    fn parse_with_statement(&mut self, start: Marker) -> PResult<Statement> {
        if self.strict {
            self.tolerate_at_token(diagnostic_codes::WITH_IN_STRICT_MODE, &[])?;
        }
        self.next_token()?;
        let object = self.parse_parenthesized_condition()?;
        let body = self.parse_statement(StatementContext::Single)?;
        Ok(Statement::With(Box::new(WithStatement {
            base: self.finish_node(NodeKind::With, start),
            object,
            body,
        })))
    }

    // =========================================================================
    // Expression and labeled statements
    // =========================================================================

    fn parse_expression_or_labeled_statement(
        &mut self,
        start: Marker,
        context: StatementContext,
    ) -> PResult<Statement> {
        let starts_with_identifier = self.current.kind.is_identifier_like();
        let expression = self.parse_sequence_expression()?;

        if starts_with_identifier
            && self.is_token(SyntaxKind::ColonToken)
            && let Expression::Identifier(label) = expression
        {
            return self.parse_labeled_statement(start, *label, context);
        }

        self.consume_semicolon()?;
        Ok(Statement::Expression(Box::new(ExpressionStatement {
            base: self.finish_node(NodeKind::Expression, start),
            expression,
        })))
    }

    fn parse_labeled_statement(
        &mut self,
        start: Marker,
        label: crate::ast::Identifier,
        context: StatementContext,
    ) -> PResult<Statement> {
        self.next_token()?;
        if self.find_label(label.name.as_str()).is_some() {
            self.tolerate_at(
                diagnostic_codes::DUPLICATE_LABEL,
                &[label.name.as_str()],
                &label.base,
            )?;
        }
        let body_start = self.token_pos();
        let is_loop = matches!(
            self.kind(),
            SyntaxKind::ForKeyword | SyntaxKind::WhileKeyword | SyntaxKind::DoKeyword
        );
        // Labels chained directly onto this one label the same statement.
        for outer in self.labels.iter_mut().rev() {
            if outer.statement_start != start.offset {
                break;
            }
            outer.statement_start = body_start;
            outer.is_loop = is_loop;
        }
        self.labels.push(Label {
            name: label.name.clone(),
            is_loop,
            statement_start: body_start,
        });
        let body_context = match context {
            StatementContext::TopLevel | StatementContext::List | StatementContext::Label => {
                StatementContext::Label
            }
            other => other,
        };
        let body = self.parse_statement(body_context);
        self.labels.pop();
        let body = body?;
        Ok(Statement::Labeled(Box::new(LabeledStatement {
            base: self.finish_node(NodeKind::Labeled, start),
            label,
            body,
        })))
    }
}

/// Turn a string-literal expression statement into a directive.
fn into_directive(statement: Statement) -> Result<Directive, Statement> {
    let is_directive = match &statement {
        Statement::Expression(expression_statement) => match &expression_statement.expression {
            Expression::Literal(literal) => {
                matches!(literal.value, LiteralValue::String(_))
                    && literal.base.range.start == expression_statement.base.range.start
            }
            _ => false,
        },
        _ => false,
    };
    if !is_directive {
        return Err(statement);
    }
    let Statement::Expression(expression_statement) = statement else {
        return Err(statement);
    };
    let ExpressionStatement { base, expression } = *expression_statement;
    match expression {
        Expression::Literal(literal) => {
            let literal: Literal = *literal;
            let raw = literal.raw.as_str();
            let directive = esz_common::Atom::new(raw.get(1..raw.len().saturating_sub(1)).unwrap_or(""));
            Ok(Directive {
                base,
                expression: literal,
                directive,
            })
        }
        expression => Err(Statement::Expression(Box::new(ExpressionStatement { base, expression }))),
    }
}
