//! Parser state - functions, methods, arrow functions and parameter lists

use esz_common::diagnostics::diagnostic_codes;
use esz_common::{Atom, Position, Range};
use esz_scanner::SyntaxKind;
use esz_scanner::syntax_kind::is_strict_mode_reserved_word_text;
use rustc_hash::FxHashSet;

use super::scope::{BindingKind, ScopeFlags};
use super::state::{ContextFlags, Marker, ParserState};
use super::state_statements::StatementContext;
use crate::ast::{
    ArrowBody, ArrowFunction, Expression, Function, FunctionBody, Identifier, NodeKind, NodeList,
    Pattern, PropertyKind, Statement,
};
use crate::error::PResult;
use crate::hoisting::HoistingScope;

/// Syntactic form of a function, for parameter rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FunctionKind {
    Declaration,
    Expression,
    Method,
    Getter,
    Setter,
}

impl FunctionKind {
    fn is_method(self) -> bool {
        matches!(self, FunctionKind::Method | FunctionKind::Getter | FunctionKind::Setter)
    }
}

impl From<PropertyKind> for FunctionKind {
    fn from(kind: PropertyKind) -> Self {
        match kind {
            PropertyKind::Init => FunctionKind::Method,
            PropertyKind::Get => FunctionKind::Getter,
            PropertyKind::Set => FunctionKind::Setter,
        }
    }
}

/// A parsed body before it is attached to its function node.
struct ParsedBody {
    body: FunctionBody,
    use_strict: Option<(Range, Position)>,
    /// Strict only because of its own directive.
    became_strict: bool,
}

impl ParserState {
    // =========================================================================
    // Declarations and expressions
    // =========================================================================

    /// `function` declaration; `async` has already been consumed.
    pub(crate) fn parse_function_declaration(
        &mut self,
        start: Marker,
        is_async: bool,
        context: StatementContext,
    ) -> PResult<Statement> {
        if !matches!(context, StatementContext::TopLevel | StatementContext::List) {
            if self.strict || context == StatementContext::Single {
                return Err(self.error_at_token(
                    diagnostic_codes::FUNCTION_IN_SINGLE_STATEMENT_CONTEXT,
                    &[],
                ));
            }
            if is_async || self.peek_kind() == SyntaxKind::AsteriskToken {
                return Err(self.unexpected());
            }
        }
        let function = if context == StatementContext::If {
            // Annex B: a function in an `if` clause behaves as if in a block.
            self.with_block_scope(ScopeFlags::empty(), |p| {
                p.parse_function_declaration_node(start, is_async, false)
            })?
        } else {
            self.parse_function_declaration_node(start, is_async, false)?
        };
        Ok(Statement::FunctionDeclaration(Box::new(function)))
    }

    /// Function declaration node. The name is optional only after
    /// `export default`.
    pub(crate) fn parse_function_declaration_node(
        &mut self,
        start: Marker,
        is_async: bool,
        name_optional: bool,
    ) -> PResult<Function> {
        self.expect(SyntaxKind::FunctionKeyword)?;
        let is_generator = self.eat(SyntaxKind::AsteriskToken)?;
        let id = if name_optional && self.is_token(SyntaxKind::OpenParenToken) {
            None
        } else {
            let id = self.parse_binding_identifier(BindingKind::None)?;
            self.declare_function(&id.name, !is_async && !is_generator, id.base.range, id.base.location.start)?;
            Some(id)
        };
        self.parse_function_rest(
            start,
            id,
            FunctionKind::Declaration,
            is_async,
            is_generator,
            ContextFlags::empty(),
        )
    }

    /// `function` expression; `async` has already been consumed.
    pub(crate) fn parse_function_expression(&mut self, start: Marker, is_async: bool) -> PResult<Expression> {
        self.expect(SyntaxKind::FunctionKeyword)?;
        let is_generator = self.eat(SyntaxKind::AsteriskToken)?;
        let id = if self.is_token(SyntaxKind::OpenParenToken) {
            None
        } else {
            // The name is checked against the function's own yield/await.
            let mut own = ContextFlags::empty();
            own.set(ContextFlags::YIELD, is_generator);
            own.set(ContextFlags::AWAIT, is_async);
            let id = self.with_context(own, ContextFlags::YIELD | ContextFlags::AWAIT, |p| {
                p.parse_binding_identifier(BindingKind::None)
            })?;
            Some(id)
        };
        let function = self.parse_function_rest(
            start,
            id,
            FunctionKind::Expression,
            is_async,
            is_generator,
            ContextFlags::empty(),
        )?;
        Ok(Expression::Function(Box::new(function)))
    }

    /// Method value in an object literal, starting at `(`.
    pub(crate) fn parse_object_method(
        &mut self,
        kind: PropertyKind,
        is_async: bool,
        is_generator: bool,
    ) -> PResult<Function> {
        let start = self.start();
        self.parse_function_rest(
            start,
            None,
            FunctionKind::from(kind),
            is_async,
            is_generator,
            ContextFlags::SUPER_PROPERTY,
        )
    }

    /// Method value in a class body, starting at `(`.
    pub(crate) fn parse_class_method(
        &mut self,
        kind: FunctionKind,
        is_async: bool,
        is_generator: bool,
        extra: ContextFlags,
    ) -> PResult<Function> {
        let start = self.start();
        self.parse_function_rest(start, None, kind, is_async, is_generator, extra)
    }

    /// Parameters and body, in a fresh function context.
    fn parse_function_rest(
        &mut self,
        start: Marker,
        id: Option<Identifier>,
        kind: FunctionKind,
        is_async: bool,
        is_generator: bool,
        extra: ContextFlags,
    ) -> PResult<Function> {
        let mut flags = ContextFlags::RETURN | ContextFlags::NEW_TARGET | extra;
        flags.set(ContextFlags::YIELD, is_generator);
        flags.set(ContextFlags::AWAIT, is_async);
        let node_kind = if kind == FunctionKind::Declaration {
            NodeKind::FunctionDeclaration
        } else {
            NodeKind::Function
        };

        self.with_function(flags, |p| {
            p.push_scope(ScopeFlags::FUNCTION);
            let params = p.parse_formal_parameters()?;
            p.check_accessor_parameters(kind, &params)?;
            let parsed = p.parse_function_body()?;
            let simple = params.iter().all(|param| matches!(param, Pattern::Identifier(_)));
            p.check_parameters(&params, &parsed, simple, kind.is_method())?;
            if parsed.became_strict
                && let Some(id) = &id
            {
                p.check_strict_binding_name(id)?;
            }
            let hoisting: HoistingScope = p.pop_scope();
            Ok(Function {
                base: p.finish_node(node_kind, start),
                id,
                params: NodeList::from(params),
                body: parsed.body,
                is_async,
                is_generator,
                strict: p.strict,
                hoisting,
            })
        })
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// `( params )`, declaring every bound name as a parameter.
    fn parse_formal_parameters(&mut self) -> PResult<Vec<Pattern>> {
        self.expect(SyntaxKind::OpenParenToken)?;
        let params = self.with_context(ContextFlags::PARAMETERS, ContextFlags::DISALLOW_IN, |p| {
            let mut params = Vec::new();
            while !p.is_token(SyntaxKind::CloseParenToken) {
                if p.is_token(SyntaxKind::DotDotDotToken) {
                    let rest_start = p.start();
                    p.next_token()?;
                    let argument = p.parse_binding_target(BindingKind::Param)?;
                    match p.kind() {
                        SyntaxKind::CloseParenToken => {}
                        SyntaxKind::EqualsToken => {
                            return Err(p.error_at_token(
                                diagnostic_codes::REST_ELEMENT_WITH_INITIALIZER,
                                &[],
                            ));
                        }
                        SyntaxKind::CommaToken => {
                            let code = if p.peek_kind() == SyntaxKind::CloseParenToken {
                                diagnostic_codes::INVALID_REST_TRAILING_COMMA
                            } else {
                                diagnostic_codes::REST_ELEMENT_MUST_BE_LAST
                            };
                            return Err(p.error_at_token(code, &[]));
                        }
                        _ => return Err(p.unexpected()),
                    }
                    params.push(p.rest_element(rest_start, argument));
                    break;
                }
                params.push(p.parse_binding_element(BindingKind::Param)?);
                if !p.is_token(SyntaxKind::CloseParenToken) {
                    p.expect(SyntaxKind::CommaToken)?;
                }
            }
            Ok(params)
        })?;
        self.expect(SyntaxKind::CloseParenToken)?;
        Ok(params)
    }

    fn check_accessor_parameters(&mut self, kind: FunctionKind, params: &[Pattern]) -> PResult<()> {
        match kind {
            FunctionKind::Getter if !params.is_empty() => {
                self.tolerate_at(diagnostic_codes::GETTER_MUST_NOT_HAVE_PARAMETERS, &[], params[0].base())
            }
            FunctionKind::Setter => match params {
                [Pattern::Rest(rest)] => {
                    self.tolerate_at(diagnostic_codes::SETTER_PARAMETER_IS_REST, &[], &rest.base)
                }
                [_] => Ok(()),
                [] => self.tolerate(
                    diagnostic_codes::SETTER_MUST_HAVE_ONE_PARAMETER,
                    &[],
                    Range::new(self.prev_end, self.prev_end),
                    self.prev_end_position,
                ),
                [_, extra, ..] => {
                    self.tolerate_at(diagnostic_codes::SETTER_MUST_HAVE_ONE_PARAMETER, &[], extra.base())
                }
            },
            _ => Ok(()),
        }
    }

    /// Rules that depend on the body: `"use strict"` needs simple parameters,
    /// strict code rechecks names, and duplicates are rejected unless the
    /// list is simple and sloppy in a plain function.
    fn check_parameters(
        &mut self,
        params: &[Pattern],
        parsed: &ParsedBody,
        simple: bool,
        unique: bool,
    ) -> PResult<()> {
        if let Some((range, position)) = parsed.use_strict
            && !simple
        {
            self.tolerate(
                diagnostic_codes::USE_STRICT_WITH_NON_SIMPLE_PARAMETERS,
                &[],
                range,
                position,
            )?;
        }
        let mut names = Vec::new();
        for param in params {
            param.bound_names(&mut names);
        }
        if parsed.became_strict {
            for name in &names {
                self.check_strict_binding_name(name)?;
            }
        }
        if self.strict || !simple || unique {
            self.check_duplicate_parameters(&names)?;
        }
        Ok(())
    }

    fn check_duplicate_parameters(&mut self, names: &[&Identifier]) -> PResult<()> {
        let mut seen: FxHashSet<&Atom> = FxHashSet::default();
        for name in names {
            if !seen.insert(&name.name) {
                self.tolerate_at(diagnostic_codes::DUPLICATE_PARAMETER, &[], &name.base)?;
            }
        }
        Ok(())
    }

    /// Names that only become errors once a body turns out to be strict.
    fn check_strict_binding_name(&mut self, id: &Identifier) -> PResult<()> {
        let name = id.name.as_str();
        if matches!(name, "eval" | "arguments") {
            return self.tolerate_at(diagnostic_codes::UNEXPECTED_EVAL_OR_ARGUMENTS, &[], &id.base);
        }
        if is_strict_mode_reserved_word_text(name) {
            return self.tolerate_at(diagnostic_codes::UNEXPECTED_STRICT_RESERVED_WORD, &[], &id.base);
        }
        Ok(())
    }

    // =========================================================================
    // Bodies
    // =========================================================================

    /// `{ ... }` with a directive prologue.
    fn parse_function_body(&mut self) -> PResult<ParsedBody> {
        let start = self.start();
        let was_strict = self.strict;
        self.expect(SyntaxKind::OpenBraceToken)?;
        let statements = self.parse_body_statements(
            |kind| kind == SyntaxKind::CloseBraceToken,
            true,
            StatementContext::List,
        )?;
        self.expect(SyntaxKind::CloseBraceToken)?;
        Ok(ParsedBody {
            body: FunctionBody {
                base: self.finish_node(NodeKind::FunctionBody, start),
                body: NodeList::from(statements.statements),
            },
            use_strict: statements.use_strict,
            became_strict: self.strict && !was_strict,
        })
    }

    // =========================================================================
    // Arrow functions
    // =========================================================================

    /// Arrow function at `=>` with parameters already converted.
    pub(crate) fn parse_arrow_function(
        &mut self,
        start: Marker,
        params: Vec<Pattern>,
        is_async: bool,
    ) -> PResult<Expression> {
        self.expect(SyntaxKind::EqualsGreaterThanToken)?;
        let inherited = self.context
            & (ContextFlags::CLASS_FIELD
                | ContextFlags::STATIC_BLOCK
                | ContextFlags::SUPER_PROPERTY
                | ContextFlags::SUPER_CALL
                | ContextFlags::NEW_TARGET);
        let disallow_in = self.context & ContextFlags::DISALLOW_IN;
        let mut flags = inherited;
        flags.set(ContextFlags::AWAIT, is_async);
        let concise = !self.is_token(SyntaxKind::OpenBraceToken);
        if concise {
            flags |= disallow_in;
        } else {
            flags |= ContextFlags::RETURN;
        }

        self.with_function(flags, |p| {
            p.push_scope(ScopeFlags::FUNCTION | ScopeFlags::ARROW);
            let mut names = Vec::new();
            for param in &params {
                param.bound_names(&mut names);
            }
            for name in &names {
                p.declare_name(&name.name, BindingKind::Param, name.base.range, name.base.location.start)?;
            }
            p.check_duplicate_parameters(&names)?;

            let body = if concise {
                ArrowBody::Expression(p.parse_assignment_expression()?)
            } else {
                let parsed = p.parse_function_body()?;
                let simple = params.iter().all(|param| matches!(param, Pattern::Identifier(_)));
                if let Some((range, position)) = parsed.use_strict
                    && !simple
                {
                    p.tolerate(
                        diagnostic_codes::USE_STRICT_WITH_NON_SIMPLE_PARAMETERS,
                        &[],
                        range,
                        position,
                    )?;
                }
                if parsed.became_strict {
                    for name in &names {
                        p.check_strict_binding_name(name)?;
                    }
                }
                ArrowBody::Block(Box::new(parsed.body))
            };
            let hoisting = p.pop_scope();
            Ok(Expression::ArrowFunction(Box::new(ArrowFunction {
                base: p.finish_node(NodeKind::ArrowFunction, start),
                params: NodeList::from(params),
                body,
                is_async,
                strict: p.strict,
                hoisting,
            })))
        })
    }
}
