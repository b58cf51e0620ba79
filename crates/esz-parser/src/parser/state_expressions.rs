//! Parser state - expression parsing methods
//!
//! Precedence climbing from sequence expressions down to primaries. Array and
//! object literals, parenthesized lists and `async(...)` calls are parsed as
//! expressions first and reinterpreted as patterns or arrow parameters by
//! `state_patterns` once the following token decides.

use esz_common::diagnostics::diagnostic_codes;
use esz_common::{Diagnostic, Location, Range};
use esz_regexp::{RegexErrorKind, TranslateOptions, TranslatedRegex};
use esz_scanner::{SyntaxKind, Token, TokenFlags, TokenValue, text_to_keyword, valid_regexp_flags};
use num_bigint::BigInt;

use super::state::{ContextFlags, CoverErrors, Marker, ParserState};
use super::state_patterns::PatternTarget;
use crate::ast::{
    Argument, ArrayElement, ArrayExpression, AssignmentExpression, AssignmentOperator,
    AwaitExpression, BinaryExpression, CallExpression, ChainExpression, ConditionalExpression,
    Expression, Identifier, ImportExpression, InfixOperator, Literal, LiteralValue,
    LogicalExpression, LogicalOperator, MemberExpression, MemberProperty, MetaProperty,
    NewExpression, NodeKind, NodeList, ObjectExpression, ObjectMember, Pattern,
    PrivateIdentifier, Property, PropertyKey, PropertyKind, RegExpLiteral, SequenceExpression,
    SpreadElement, Super, TaggedTemplate, TemplateElement, TemplateLiteral, ThisExpression,
    UnaryExpression, UnaryOperator, UpdateExpression, UpdateOperator, YieldExpression,
};
use crate::error::PResult;

/// Contents of `( ... )` before `=>` decides between a parenthesized
/// expression and arrow parameters.
struct ParenthesizedItems {
    items: Vec<Expression>,
    /// `...target`, already a rest element.
    rest: Option<Pattern>,
    trailing_comma: Option<(Range, Location)>,
}

/// Call arguments, kept in cover form for `async (...)`.
pub(crate) struct ArgumentList {
    pub(crate) items: Vec<Argument>,
    pub(crate) trailing_comma: bool,
}

impl ParserState {
    // =========================================================================
    // Cover errors
    // =========================================================================

    /// Report object-literal-only forms left pending by a finished expression.
    pub(crate) fn report_cover_errors(&mut self, pending: CoverErrors) -> PResult<()> {
        if let Some((range, position)) = pending.shorthand_init {
            self.tolerate(
                diagnostic_codes::INVALID_SHORTHAND_PROPERTY_INITIALIZER,
                &[],
                range,
                position,
            )?;
        }
        if let Some((range, position)) = pending.duplicate_proto {
            self.tolerate(diagnostic_codes::DUPLICATE_PROTO, &[], range, position)?;
        }
        Ok(())
    }

    /// Drop pending cover errors inside `range`, which became a pattern.
    pub(crate) fn clear_cover_within(&mut self, range: Range) {
        let inside = |entry: &Option<(Range, esz_common::Position)>| {
            entry.is_some_and(|(at, _)| range.start <= at.start && at.end <= range.end)
        };
        if inside(&self.cover.shorthand_init) {
            self.cover.shorthand_init = None;
        }
        if inside(&self.cover.duplicate_proto) {
            self.cover.duplicate_proto = None;
        }
    }

    /// Run `f` with its own cover errors, reporting whatever is left pending.
    fn own_cover<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let saved = std::mem::take(&mut self.cover);
        let result = f(self);
        let pending = std::mem::replace(&mut self.cover, saved);
        let value = result?;
        self.report_cover_errors(pending)?;
        Ok(value)
    }

    pub(crate) fn is_parenthesized(&self, expression: &Expression) -> bool {
        self.parenthesized.contains(&expression.range())
    }

    /// An arrow function that no operator may extend.
    fn is_bare_arrow(&self, expression: &Expression) -> bool {
        matches!(expression, Expression::ArrowFunction(_)) && !self.is_parenthesized(expression)
    }

    // =========================================================================
    // Sequence and assignment
    // =========================================================================

    /// Comma-separated expression.
    pub(crate) fn parse_sequence_expression(&mut self) -> PResult<Expression> {
        self.own_cover(|p| p.parse_sequence_expression_covered())
    }

    /// Comma-separated expression whose cover errors stay pending.
    pub(crate) fn parse_sequence_expression_covered(&mut self) -> PResult<Expression> {
        let start = self.start();
        let first = self.parse_assignment_expression_covered()?;
        if !self.is_token(SyntaxKind::CommaToken) {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.eat(SyntaxKind::CommaToken)? {
            expressions.push(self.parse_assignment_expression_covered()?);
        }
        Ok(Expression::Sequence(Box::new(SequenceExpression {
            base: self.finish_node(NodeKind::Sequence, start),
            expressions: NodeList::from(expressions),
        })))
    }

    pub(crate) fn parse_assignment_expression(&mut self) -> PResult<Expression> {
        self.own_cover(|p| p.parse_assignment_expression_covered())
    }

    /// Assignment expression whose cover errors stay pending for an
    /// enclosing literal that may still become a pattern.
    pub(crate) fn parse_assignment_expression_covered(&mut self) -> PResult<Expression> {
        self.nested(|p| p.parse_assignment_inner())
    }

    fn parse_assignment_inner(&mut self) -> PResult<Expression> {
        if self.is_token(SyntaxKind::YieldKeyword) && self.has_context(ContextFlags::YIELD) {
            return self.parse_yield_expression();
        }
        let start = self.start();
        self.potential_arrow_at = start.offset;
        let left = self.parse_conditional_expression()?;
        if self.is_bare_arrow(&left) {
            return Ok(left);
        }
        let Some(operator) = AssignmentOperator::from_token(self.kind()) else {
            return Ok(left);
        };
        let target = if operator == AssignmentOperator::Assign {
            self.expression_to_pattern(left, PatternTarget::Assignment)?
        } else {
            self.expression_to_simple_target(left)?
        };
        self.next_token()?;
        let right = self.parse_assignment_expression()?;
        Ok(Expression::Assignment(Box::new(AssignmentExpression {
            base: self.finish_node(NodeKind::Assignment, start),
            operator,
            left: target,
            right,
        })))
    }

    fn parse_yield_expression(&mut self) -> PResult<Expression> {
        let start = self.start();
        if self.has_context(ContextFlags::PARAMETERS) {
            self.tolerate_at_token(diagnostic_codes::YIELD_IN_PARAMETERS, &[])?;
        }
        self.yield_positions.push(start);
        self.next_token()?;
        let mut delegate = false;
        let mut argument = None;
        if !self.current.has_preceding_line_break() {
            delegate = self.eat(SyntaxKind::AsteriskToken)?;
            if delegate || self.starts_expression() {
                argument = Some(self.parse_assignment_expression()?);
            }
        }
        Ok(Expression::Yield(Box::new(YieldExpression {
            base: self.finish_node(NodeKind::Yield, start),
            argument,
            delegate,
        })))
    }

    /// Whether the current token can begin an expression.
    fn starts_expression(&self) -> bool {
        match self.kind() {
            SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::TemplateHead
            | SyntaxKind::PrivateIdentifier
            | SyntaxKind::OpenParenToken
            | SyntaxKind::OpenBracketToken
            | SyntaxKind::OpenBraceToken
            | SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::TildeToken
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken
            | SyntaxKind::SlashToken
            | SyntaxKind::SlashEqualsToken
            | SyntaxKind::ThisKeyword
            | SyntaxKind::SuperKeyword
            | SyntaxKind::NewKeyword
            | SyntaxKind::FunctionKeyword
            | SyntaxKind::ClassKeyword
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::DeleteKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::ImportKeyword => true,
            SyntaxKind::LessThanToken => self.options.jsx,
            kind => kind.is_identifier_like(),
        }
    }

    // =========================================================================
    // Conditional and binary
    // =========================================================================

    fn parse_conditional_expression(&mut self) -> PResult<Expression> {
        let start = self.start();
        let test = self.parse_binary_expression(0)?;
        if self.is_bare_arrow(&test) || !self.is_token(SyntaxKind::QuestionToken) {
            return Ok(test);
        }
        self.next_token()?;
        let consequent = self.allow_in(|p| p.parse_assignment_expression())?;
        self.expect(SyntaxKind::ColonToken)?;
        let alternate = self.parse_assignment_expression()?;
        Ok(Expression::Conditional(Box::new(ConditionalExpression {
            base: self.finish_node(NodeKind::Conditional, start),
            test,
            consequent,
            alternate,
        })))
    }

    fn parse_binary_expression(&mut self, min_precedence: u8) -> PResult<Expression> {
        let start = self.start();
        let left = self.parse_binary_operand()?;
        if self.is_bare_arrow(&left) {
            return Ok(left);
        }
        self.parse_binary_rest(start, left, min_precedence)
    }

    /// Unary expression, or `#x` when it is the left operand of `in`.
    fn parse_binary_operand(&mut self) -> PResult<Expression> {
        if self.is_token(SyntaxKind::PrivateIdentifier) {
            let name = self.parse_private_identifier()?;
            self.use_private_name(&name.name, name.base.range, name.base.location.start)?;
            if !self.is_token(SyntaxKind::InKeyword) || !self.in_allowed() {
                return Err(self.unexpected());
            }
            return Ok(Expression::PrivateIdentifier(Box::new(name)));
        }
        self.parse_unary_expression()
    }

    fn parse_binary_rest(
        &mut self,
        start: Marker,
        mut left: Expression,
        min_precedence: u8,
    ) -> PResult<Expression> {
        while let Some(operator) = InfixOperator::from_token(self.kind(), self.in_allowed()) {
            let precedence = operator.precedence();
            if precedence <= min_precedence {
                break;
            }
            if operator.is_right_associative()
                && matches!(left, Expression::Unary(_) | Expression::Await(_))
                && !self.is_parenthesized(&left)
            {
                return Err(self.error_at_token(diagnostic_codes::UNARY_BEFORE_EXPONENTIATION, &[]));
            }
            self.next_token()?;
            let right_start = self.start();
            let right = self.parse_binary_operand()?;
            if let Expression::PrivateIdentifier(name) = &right {
                let text = format!("'#{}'", name.name);
                return Err(self.error_at(diagnostic_codes::UNEXPECTED_TOKEN, &[&text], &name.base));
            }
            // `??` binds no tighter than `&&` on its right so mixing is caught.
            let right_min = match operator {
                InfixOperator::Logical(LogicalOperator::NullishCoalescing) => {
                    InfixOperator::Logical(LogicalOperator::And).precedence()
                }
                _ if operator.is_right_associative() => precedence - 1,
                _ => precedence,
            };
            let right = self.nested(|p| p.parse_binary_rest(right_start, right, right_min))?;
            left = match operator {
                InfixOperator::Binary(operator) => Expression::Binary(Box::new(BinaryExpression {
                    base: self.finish_node(NodeKind::Binary, start),
                    operator,
                    left,
                    right,
                })),
                InfixOperator::Logical(operator) => Expression::Logical(Box::new(LogicalExpression {
                    base: self.finish_node(NodeKind::Logical, start),
                    operator,
                    left,
                    right,
                })),
            };
            let mixed = match operator {
                InfixOperator::Logical(LogicalOperator::NullishCoalescing) => matches!(
                    self.kind(),
                    SyntaxKind::BarBarToken | SyntaxKind::AmpersandAmpersandToken
                ),
                InfixOperator::Logical(_) => self.is_token(SyntaxKind::QuestionQuestionToken),
                InfixOperator::Binary(_) => false,
            };
            if mixed {
                self.tolerate_at_token(diagnostic_codes::MIXED_NULLISH_COALESCING, &[])?;
            }
        }
        Ok(left)
    }

    // =========================================================================
    // Unary and update
    // =========================================================================

    fn parse_unary_expression(&mut self) -> PResult<Expression> {
        let start = self.start();
        if let Some(operator) = UnaryOperator::from_token(self.kind()) {
            self.next_token()?;
            let argument = self.nested(|p| p.parse_unary_expression())?;
            if operator == UnaryOperator::Delete {
                self.check_delete_argument(&argument)?;
            }
            return Ok(Expression::Unary(Box::new(UnaryExpression {
                base: self.finish_node(NodeKind::Unary, start),
                operator,
                argument,
            })));
        }
        if self.is_token(SyntaxKind::AwaitKeyword) && self.has_context(ContextFlags::AWAIT) {
            if self.has_context(ContextFlags::PARAMETERS) {
                self.tolerate_at_token(diagnostic_codes::AWAIT_IN_PARAMETERS, &[])?;
            }
            self.await_positions.push(start);
            self.next_token()?;
            let argument = self.nested(|p| p.parse_unary_expression())?;
            return Ok(Expression::Await(Box::new(AwaitExpression {
                base: self.finish_node(NodeKind::Await, start),
                argument,
            })));
        }
        self.parse_update_expression()
    }

    fn check_delete_argument(&mut self, argument: &Expression) -> PResult<()> {
        match argument {
            Expression::Identifier(id) if self.strict => self.tolerate_at(
                diagnostic_codes::DELETE_OF_UNQUALIFIED_IDENTIFIER,
                &[],
                &id.base,
            ),
            Expression::Member(member)
                if matches!(member.property, MemberProperty::PrivateIdentifier(_)) =>
            {
                self.tolerate_at(diagnostic_codes::DELETE_PRIVATE_FIELD, &[], &member.base)
            }
            Expression::Chain(chain) => self.check_delete_argument(&chain.expression),
            _ => Ok(()),
        }
    }

    fn parse_update_expression(&mut self) -> PResult<Expression> {
        let start = self.start();
        if let Some(operator) = update_operator(self.kind()) {
            self.next_token()?;
            let argument = self.nested(|p| p.parse_unary_expression())?;
            self.check_simple_target(&argument)?;
            return Ok(Expression::Update(Box::new(UpdateExpression {
                base: self.finish_node(NodeKind::Update, start),
                operator,
                prefix: true,
                argument,
            })));
        }
        let expression = self.parse_left_hand_side_expression()?;
        if self.is_bare_arrow(&expression) || self.current.has_preceding_line_break() {
            return Ok(expression);
        }
        let Some(operator) = update_operator(self.kind()) else {
            return Ok(expression);
        };
        self.check_simple_target(&expression)?;
        self.next_token()?;
        Ok(Expression::Update(Box::new(UpdateExpression {
            base: self.finish_node(NodeKind::Update, start),
            operator,
            prefix: false,
            argument: expression,
        })))
    }

    /// Operand of `++`, `--` or a compound assignment.
    fn check_simple_target(&mut self, expression: &Expression) -> PResult<()> {
        match expression {
            Expression::Identifier(id) => self.check_assignment_name(id),
            Expression::Member(_) => Ok(()),
            other => self.tolerate_at(
                diagnostic_codes::INVALID_LEFT_HAND_SIDE_IN_ASSIGNMENT,
                &[],
                other.base(),
            ),
        }
    }

    /// `eval` and `arguments` cannot be assigned in strict code.
    pub(crate) fn check_assignment_name(&mut self, id: &Identifier) -> PResult<()> {
        if self.strict && matches!(id.name.as_str(), "eval" | "arguments") {
            return self.tolerate_at(
                diagnostic_codes::INVALID_ASSIGNMENT_TARGET_IN_STRICT_MODE,
                &[id.name.as_str()],
                &id.base,
            );
        }
        Ok(())
    }

    /// Target of a compound assignment: identifier or member only.
    fn expression_to_simple_target(&mut self, expression: Expression) -> PResult<Pattern> {
        match expression {
            Expression::Identifier(id) => {
                self.check_assignment_name(&id)?;
                Ok(Pattern::Identifier(id))
            }
            Expression::Member(member) => Ok(Pattern::Member(member)),
            other => Err(self.error_at(
                diagnostic_codes::INVALID_LEFT_HAND_SIDE_IN_ASSIGNMENT,
                &[],
                other.base(),
            )),
        }
    }

    // =========================================================================
    // Calls, members and `new`
    // =========================================================================

    pub(crate) fn parse_left_hand_side_expression(&mut self) -> PResult<Expression> {
        let start = self.start();
        let expression = match self.kind() {
            SyntaxKind::NewKeyword => self.nested(|p| p.parse_new_expression())?,
            SyntaxKind::SuperKeyword => self.parse_super()?,
            SyntaxKind::ImportKeyword => self.parse_import_expression()?,
            _ => self.parse_primary_expression()?,
        };
        if self.is_bare_arrow(&expression) {
            return Ok(expression);
        }
        self.parse_call_tail(start, expression, true)
    }

    /// Member accesses, calls and tagged templates after `expression`.
    /// Without `allow_call` (a `new` callee) only member accesses and tagged
    /// templates are taken.
    fn parse_call_tail(
        &mut self,
        start: Marker,
        mut expression: Expression,
        allow_call: bool,
    ) -> PResult<Expression> {
        let mut in_chain = false;
        loop {
            expression = match self.kind() {
                SyntaxKind::DotToken => {
                    self.next_token()?;
                    let property = self.parse_member_name()?;
                    self.member(start, expression, property, false)
                }
                SyntaxKind::QuestionDotToken => {
                    if !allow_call {
                        return Err(self.error_at_token(diagnostic_codes::OPTIONAL_CHAIN_FROM_NEW, &[]));
                    }
                    in_chain = true;
                    self.next_token()?;
                    match self.kind() {
                        SyntaxKind::OpenParenToken => {
                            let arguments = self.parse_arguments(false)?;
                            self.call(start, expression, arguments.items, true)
                        }
                        SyntaxKind::OpenBracketToken => {
                            let property = self.parse_computed_member()?;
                            self.member(start, expression, property, true)
                        }
                        kind if kind.is_template() => {
                            return Err(self.error_at_token(diagnostic_codes::OPTIONAL_CHAIN_TEMPLATE, &[]));
                        }
                        _ => {
                            let property = self.parse_member_name()?;
                            self.member(start, expression, property, true)
                        }
                    }
                }
                SyntaxKind::OpenBracketToken => {
                    let property = self.parse_computed_member()?;
                    self.member(start, expression, property, false)
                }
                SyntaxKind::OpenParenToken if allow_call => {
                    let arguments = self.parse_arguments(false)?;
                    self.call(start, expression, arguments.items, false)
                }
                SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                    if in_chain {
                        return Err(self.error_at_token(diagnostic_codes::OPTIONAL_CHAIN_TEMPLATE, &[]));
                    }
                    let quasi = self.parse_template_literal(true)?;
                    Expression::TaggedTemplate(Box::new(TaggedTemplate {
                        base: self.finish_node(NodeKind::TaggedTemplate, start),
                        tag: expression,
                        quasi,
                    }))
                }
                _ => break,
            };
        }
        if in_chain {
            expression = Expression::Chain(Box::new(ChainExpression {
                base: self.finish_node(NodeKind::Chain, start),
                expression,
            }));
        }
        Ok(expression)
    }

    fn member(
        &self,
        start: Marker,
        object: Expression,
        property: MemberProperty,
        optional: bool,
    ) -> Expression {
        Expression::Member(Box::new(MemberExpression {
            base: self.finish_node(NodeKind::Member, start),
            object,
            property,
            optional,
        }))
    }

    fn call(
        &self,
        start: Marker,
        callee: Expression,
        arguments: Vec<Argument>,
        optional: bool,
    ) -> Expression {
        Expression::Call(Box::new(CallExpression {
            base: self.finish_node(NodeKind::Call, start),
            callee,
            arguments: NodeList::from(arguments),
            optional,
        }))
    }

    /// Property name after `.` or `?.`.
    fn parse_member_name(&mut self) -> PResult<MemberProperty> {
        if self.is_token(SyntaxKind::PrivateIdentifier) {
            let name = self.parse_private_identifier()?;
            self.use_private_name(&name.name, name.base.range, name.base.location.start)?;
            return Ok(MemberProperty::PrivateIdentifier(Box::new(name)));
        }
        Ok(MemberProperty::Identifier(Box::new(self.parse_identifier_name()?)))
    }

    fn parse_computed_member(&mut self) -> PResult<MemberProperty> {
        self.expect(SyntaxKind::OpenBracketToken)?;
        let property = self.allow_in(|p| p.parse_sequence_expression())?;
        self.expect(SyntaxKind::CloseBracketToken)?;
        Ok(MemberProperty::Computed(property))
    }

    /// `( args )`. With `covered`, cover errors stay pending so the list can
    /// still become arrow parameters.
    pub(crate) fn parse_arguments(&mut self, covered: bool) -> PResult<ArgumentList> {
        self.expect(SyntaxKind::OpenParenToken)?;
        let mut items = Vec::new();
        let mut trailing_comma = false;
        self.allow_in(|p| {
            while !p.is_token(SyntaxKind::CloseParenToken) {
                let item_start = p.start();
                let spread = p.eat(SyntaxKind::DotDotDotToken)?;
                let expression = if covered {
                    p.parse_assignment_expression_covered()?
                } else {
                    p.parse_assignment_expression()?
                };
                let followed_by_comma = p.is_token(SyntaxKind::CommaToken);
                items.push(if spread {
                    if followed_by_comma {
                        p.spread_with_trailing_comma.insert(item_start.offset);
                    }
                    Argument::Spread(Box::new(SpreadElement {
                        base: p.finish_node(NodeKind::Spread, item_start),
                        argument: expression,
                    }))
                } else {
                    Argument::Expression(expression)
                });
                if p.is_token(SyntaxKind::CloseParenToken) {
                    break;
                }
                p.expect(SyntaxKind::CommaToken)?;
                trailing_comma = p.is_token(SyntaxKind::CloseParenToken);
            }
            Ok(())
        })?;
        self.expect(SyntaxKind::CloseParenToken)?;
        Ok(ArgumentList {
            items,
            trailing_comma,
        })
    }

    fn parse_new_expression(&mut self) -> PResult<Expression> {
        let start = self.start();
        let keyword = (self.current.range, self.current.location);
        self.next_token()?;
        if self.is_token(SyntaxKind::DotToken) {
            let meta = Identifier {
                base: self.node_at(NodeKind::Identifier, keyword.0, keyword.1),
                name: esz_common::Atom::new("new"),
            };
            self.next_token()?;
            let property = self.parse_meta_property_name("target")?;
            if !self.has_context(ContextFlags::NEW_TARGET) {
                let range = Range::new(start.offset, self.prev_end);
                self.tolerate(
                    diagnostic_codes::NEW_TARGET_OUTSIDE_FUNCTION,
                    &[],
                    range,
                    start.position,
                )?;
            }
            return Ok(Expression::MetaProperty(Box::new(MetaProperty {
                base: self.finish_node(NodeKind::MetaProperty, start),
                meta,
                property,
            })));
        }
        let callee_start = self.start();
        let callee = match self.kind() {
            SyntaxKind::NewKeyword => self.nested(|p| p.parse_new_expression())?,
            SyntaxKind::SuperKeyword => self.parse_super()?,
            SyntaxKind::ImportKeyword => return Err(self.unexpected()),
            _ => self.parse_primary_expression()?,
        };
        let callee = self.parse_call_tail(callee_start, callee, false)?;
        let arguments = if self.is_token(SyntaxKind::OpenParenToken) {
            self.parse_arguments(false)?.items
        } else {
            Vec::new()
        };
        Ok(Expression::New(Box::new(NewExpression {
            base: self.finish_node(NodeKind::New, start),
            callee,
            arguments: NodeList::from(arguments),
        })))
    }

    /// The fixed name after `new.` or `import.`.
    fn parse_meta_property_name(&mut self, expected: &str) -> PResult<Identifier> {
        let matches = self.is_token(SyntaxKind::Identifier)
            && !self.current.flags.contains(TokenFlags::UNICODE_ESCAPE)
            && self.current.raw.as_str() == expected;
        if !matches {
            return Err(self.unexpected());
        }
        self.parse_identifier_name()
    }

    fn parse_super(&mut self) -> PResult<Expression> {
        let base = self.node_at_token(NodeKind::Super);
        self.next_token()?;
        let allowed = match self.kind() {
            SyntaxKind::OpenParenToken => self.has_context(ContextFlags::SUPER_CALL),
            SyntaxKind::DotToken | SyntaxKind::OpenBracketToken => {
                self.has_context(ContextFlags::SUPER_PROPERTY)
            }
            _ => return Err(self.error_at(diagnostic_codes::SUPER_NOT_ALLOWED, &[], &base)),
        };
        if !allowed {
            self.tolerate_at(diagnostic_codes::SUPER_NOT_ALLOWED, &[], &base)?;
        }
        Ok(Expression::Super(Box::new(Super { base })))
    }

    /// `import(...)` or `import.meta`.
    fn parse_import_expression(&mut self) -> PResult<Expression> {
        let start = self.start();
        let keyword = (self.current.range, self.current.location);
        self.next_token()?;
        match self.kind() {
            SyntaxKind::DotToken => {
                let meta = Identifier {
                    base: self.node_at(NodeKind::Identifier, keyword.0, keyword.1),
                    name: esz_common::Atom::new("import"),
                };
                self.next_token()?;
                let property = self.parse_meta_property_name("meta")?;
                if !self.module {
                    let range = Range::new(start.offset, self.prev_end);
                    self.tolerate(
                        diagnostic_codes::IMPORT_META_OUTSIDE_MODULE,
                        &[],
                        range,
                        start.position,
                    )?;
                }
                Ok(Expression::MetaProperty(Box::new(MetaProperty {
                    base: self.finish_node(NodeKind::MetaProperty, start),
                    meta,
                    property,
                })))
            }
            SyntaxKind::OpenParenToken => {
                self.next_token()?;
                let (source, options) = self.allow_in(|p| {
                    let source = p.parse_assignment_expression()?;
                    let mut options = None;
                    if p.eat(SyntaxKind::CommaToken)? && !p.is_token(SyntaxKind::CloseParenToken) {
                        options = Some(p.parse_assignment_expression()?);
                        p.eat(SyntaxKind::CommaToken)?;
                    }
                    Ok((source, options))
                })?;
                self.expect(SyntaxKind::CloseParenToken)?;
                Ok(Expression::Import(Box::new(ImportExpression {
                    base: self.finish_node(NodeKind::Import, start),
                    source,
                    options,
                })))
            }
            _ => Err(self.unexpected()),
        }
    }

    // =========================================================================
    // Primary expressions
    // =========================================================================

    fn parse_primary_expression(&mut self) -> PResult<Expression> {
        let start = self.start();
        let can_be_arrow = start.offset == self.potential_arrow_at;
        match self.kind() {
            SyntaxKind::ThisKeyword => {
                let base = self.node_at_token(NodeKind::This);
                self.next_token()?;
                Ok(Expression::This(Box::new(ThisExpression { base })))
            }
            SyntaxKind::NullKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::StringLiteral => Ok(Expression::Literal(Box::new(self.parse_literal()?))),
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken => self.parse_regexp_literal(),
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                let template = self.parse_template_literal(false)?;
                Ok(Expression::Template(Box::new(template)))
            }
            SyntaxKind::OpenParenToken => self.parse_parenthesized_expression(can_be_arrow),
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::FunctionKeyword => self.parse_function_expression(start, false),
            SyntaxKind::ClassKeyword => {
                let class = self.parse_class(start, false)?;
                Ok(Expression::Class(Box::new(class)))
            }
            SyntaxKind::AsyncKeyword => self.parse_async_primary(start, can_be_arrow),
            SyntaxKind::LessThanToken if self.options.jsx => self.parse_jsx_expression(),
            kind if kind.is_identifier_like() => {
                let id = self.parse_identifier_reference()?;
                if can_be_arrow && self.is_token(SyntaxKind::EqualsGreaterThanToken) {
                    return self.parse_single_parameter_arrow(start, id);
                }
                Ok(Expression::Identifier(Box::new(id)))
            }
            _ => Err(self.unexpected()),
        }
    }

    /// `x => ...` with `x` already parsed and `=>` current.
    fn parse_single_parameter_arrow(&mut self, start: Marker, id: Identifier) -> PResult<Expression> {
        if self.current.has_preceding_line_break() {
            return Err(self.error_at_token(diagnostic_codes::NEW_LINE_BEFORE_ARROW, &[]));
        }
        let range = id.base.range;
        let params =
            self.arrow_params_from_items(range, vec![Expression::Identifier(Box::new(id))], None, false)?;
        self.parse_arrow_function(start, params, false)
    }

    /// `async function`, `async x => ...`, `async (...) => ...`, a call to
    /// a function named `async`, or the plain identifier.
    fn parse_async_primary(&mut self, start: Marker, can_be_arrow: bool) -> PResult<Expression> {
        let next = self.peek_kind_on_same_line();
        if next == Some(SyntaxKind::FunctionKeyword) {
            self.next_token()?;
            return self.parse_function_expression(start, true);
        }
        if can_be_arrow && next.is_some_and(SyntaxKind::is_identifier_like) {
            let arrow_follows = self.look_ahead(|p| {
                p.advance();
                p.advance();
                p.is_token(SyntaxKind::EqualsGreaterThanToken)
            });
            if arrow_follows {
                self.next_token()?;
                let param = self.parse_identifier_reference()?;
                if param.name.as_str() == "await" {
                    self.tolerate_at(diagnostic_codes::UNEXPECTED_RESERVED_WORD, &[], &param.base)?;
                }
                if self.current.has_preceding_line_break() {
                    return Err(self.error_at_token(diagnostic_codes::NEW_LINE_BEFORE_ARROW, &[]));
                }
                let range = param.base.range;
                let params = self.arrow_params_from_items(
                    range,
                    vec![Expression::Identifier(Box::new(param))],
                    None,
                    true,
                )?;
                return self.parse_arrow_function(start, params, true);
            }
        }
        let callee = self.parse_identifier_reference()?;
        if can_be_arrow && self.is_token(SyntaxKind::EqualsGreaterThanToken) {
            return self.parse_single_parameter_arrow(start, callee);
        }
        if !(can_be_arrow && next == Some(SyntaxKind::OpenParenToken)) {
            return Ok(Expression::Identifier(Box::new(callee)));
        }

        let open = self.start();
        let arguments = self.parse_arguments(true)?;
        if self.is_token(SyntaxKind::EqualsGreaterThanToken) {
            if self.current.has_preceding_line_break() {
                return Err(self.error_at_token(diagnostic_codes::NEW_LINE_BEFORE_ARROW, &[]));
            }
            let range = Range::new(open.offset, self.prev_end);
            let mut items = Vec::with_capacity(arguments.items.len());
            let mut rest = None;
            let count = arguments.items.len();
            for (index, argument) in arguments.items.into_iter().enumerate() {
                match argument {
                    Argument::Expression(expression) => items.push(expression),
                    Argument::Spread(spread) => {
                        if index + 1 != count || arguments.trailing_comma {
                            let code = if index + 1 != count {
                                diagnostic_codes::REST_ELEMENT_MUST_BE_LAST
                            } else {
                                diagnostic_codes::INVALID_REST_TRAILING_COMMA
                            };
                            return Err(self.error_at(code, &[], &spread.base));
                        }
                        let SpreadElement { base, argument } = *spread;
                        let target = self.expression_to_pattern(argument, PatternTarget::Parameter)?;
                        rest = Some(self.rest_element_like(&base, target));
                    }
                }
            }
            let params = self.arrow_params_from_items(range, items, rest, true)?;
            return self.parse_arrow_function(start, params, true);
        }
        Ok(self.call(start, Expression::Identifier(Box::new(callee)), arguments.items, false))
    }

    /// `( ... )`: arrow parameters when `=>` follows, otherwise a
    /// parenthesized expression whose range excludes the parentheses.
    fn parse_parenthesized_expression(&mut self, can_be_arrow: bool) -> PResult<Expression> {
        let start = self.start();
        self.next_token()?;
        let inner_start = self.start();
        let group = self.allow_in(|p| p.parse_parenthesized_items())?;
        let close = (self.current.range, self.current.location);
        self.expect(SyntaxKind::CloseParenToken)?;

        if can_be_arrow && self.is_token(SyntaxKind::EqualsGreaterThanToken) {
            if self.current.has_preceding_line_break() {
                return Err(self.error_at_token(diagnostic_codes::NEW_LINE_BEFORE_ARROW, &[]));
            }
            let range = Range::new(start.offset, self.prev_end);
            let params = self.arrow_params_from_items(range, group.items, group.rest, false)?;
            return self.parse_arrow_function(start, params, false);
        }

        if let Some(rest) = group.rest {
            let base = rest.base();
            let range = Range::new(base.range.start, base.range.start + 3);
            return Err(Diagnostic::from_code(
                diagnostic_codes::UNEXPECTED_TOKEN,
                &["'...'"],
                range,
                base.location.start,
            )
            .into());
        }
        if group.items.is_empty() || group.trailing_comma.is_some() {
            return Err(Diagnostic::at_location(
                diagnostic_codes::UNEXPECTED_TOKEN,
                &["')'"],
                close.0,
                close.1,
            )
            .into());
        }

        let mut items = group.items;
        let expression = if items.len() == 1 {
            items.remove(0)
        } else {
            let (end, end_position) = match items.last() {
                Some(last) => (last.range().end, last.base().location.end),
                None => (inner_start.offset, inner_start.position),
            };
            let base = self.node_at(
                NodeKind::Sequence,
                Range::new(inner_start.offset, end),
                Location::new(inner_start.position, end_position),
            );
            Expression::Sequence(Box::new(SequenceExpression {
                base,
                expressions: NodeList::from(items),
            }))
        };
        self.parenthesized.insert(expression.range());
        Ok(expression)
    }

    fn parse_parenthesized_items(&mut self) -> PResult<ParenthesizedItems> {
        let mut items = Vec::new();
        let mut rest = None;
        let mut trailing_comma = None;
        while !self.is_token(SyntaxKind::CloseParenToken) {
            if !items.is_empty() {
                let comma = (self.current.range, self.current.location);
                self.expect(SyntaxKind::CommaToken)?;
                if self.is_token(SyntaxKind::CloseParenToken) {
                    trailing_comma = Some(comma);
                    break;
                }
            }
            if self.is_token(SyntaxKind::DotDotDotToken) {
                let marker = self.start();
                self.next_token()?;
                let target = self.parse_binding_target(super::scope::BindingKind::None)?;
                match self.kind() {
                    SyntaxKind::CloseParenToken => {}
                    SyntaxKind::EqualsToken => {
                        return Err(self.error_at_token(
                            diagnostic_codes::REST_ELEMENT_WITH_INITIALIZER,
                            &[],
                        ));
                    }
                    SyntaxKind::CommaToken => {
                        let code = if self.peek_kind() == SyntaxKind::CloseParenToken {
                            diagnostic_codes::INVALID_REST_TRAILING_COMMA
                        } else {
                            diagnostic_codes::REST_ELEMENT_MUST_BE_LAST
                        };
                        return Err(self.error_at_token(code, &[]));
                    }
                    _ => return Err(self.unexpected()),
                }
                rest = Some(self.rest_element(marker, target));
                break;
            }
            items.push(self.parse_assignment_expression_covered()?);
        }
        Ok(ParenthesizedItems {
            items,
            rest,
            trailing_comma,
        })
    }

    /// Reinterpret a parenthesized list as arrow parameters. `range` covers
    /// the list; `yield`/`await` expressions inside it are not allowed.
    pub(crate) fn arrow_params_from_items(
        &mut self,
        range: Range,
        items: Vec<Expression>,
        rest: Option<Pattern>,
        is_async: bool,
    ) -> PResult<Vec<Pattern>> {
        let within = |marker: &&Marker| range.start <= marker.offset && marker.offset < range.end;
        if let Some(marker) = self.yield_positions.iter().find(within).copied() {
            self.tolerate(diagnostic_codes::YIELD_IN_PARAMETERS, &[], range, marker.position)?;
        }
        if let Some(marker) = self.await_positions.iter().find(within).copied() {
            self.tolerate(diagnostic_codes::AWAIT_IN_PARAMETERS, &[], range, marker.position)?;
        }
        if is_async
            && let Some(marker) = self.await_identifier_positions.iter().find(within).copied()
        {
            let at = Range::new(marker.offset, marker.offset + 5);
            self.tolerate(diagnostic_codes::UNEXPECTED_RESERVED_WORD, &[], at, marker.position)?;
        }
        self.clear_cover_within(range);

        let mut params = Vec::with_capacity(items.len() + usize::from(rest.is_some()));
        for item in items {
            params.push(self.expression_to_parameter(item)?);
        }
        params.extend(rest);
        Ok(params)
    }

    // =========================================================================
    // Literals
    // =========================================================================

    /// Null, boolean, numeric, bigint or string literal.
    pub(crate) fn parse_literal(&mut self) -> PResult<Literal> {
        let token = self.current.clone();
        let value = match token.kind {
            SyntaxKind::NullKeyword => LiteralValue::Null,
            SyntaxKind::TrueKeyword => LiteralValue::Boolean(true),
            SyntaxKind::FalseKeyword => LiteralValue::Boolean(false),
            SyntaxKind::NumericLiteral => {
                if self.strict {
                    if token.flags.contains(TokenFlags::LEGACY_OCTAL) {
                        self.tolerate_at_token(
                            diagnostic_codes::OCTAL_LITERALS_NOT_ALLOWED_IN_STRICT_MODE,
                            &[],
                        )?;
                    } else if token.flags.contains(TokenFlags::NON_OCTAL_DECIMAL) {
                        self.tolerate_at_token(
                            diagnostic_codes::DECIMALS_WITH_LEADING_ZERO_IN_STRICT_MODE,
                            &[],
                        )?;
                    }
                }
                LiteralValue::Number(token.number_value().unwrap_or(f64::NAN))
            }
            SyntaxKind::BigIntLiteral => match &token.value {
                TokenValue::BigInt(value) => LiteralValue::BigInt(value.clone()),
                _ => LiteralValue::BigInt(BigInt::default()),
            },
            SyntaxKind::StringLiteral => {
                if self.strict && token.flags.contains(TokenFlags::OCTAL_ESCAPE) {
                    self.tolerate_at_token(
                        diagnostic_codes::OCTAL_ESCAPES_NOT_ALLOWED_IN_STRICT_MODE,
                        &[],
                    )?;
                }
                LiteralValue::String(Self::token_name(&token))
            }
            _ => return Err(self.unexpected()),
        };
        let base = self.node_at_token(NodeKind::Literal);
        self.next_token()?;
        Ok(Literal {
            base,
            value,
            raw: token.raw,
        })
    }

    fn parse_regexp_literal(&mut self) -> PResult<Expression> {
        self.rescan_regexp()?;
        let token = self.current.clone();
        let Some(regex) = token.regex_value() else {
            return Err(self.unexpected());
        };
        let (pattern, flags) = (regex.pattern.clone(), regex.flags.clone());
        let base = self.node_at_token(NodeKind::Literal);
        let translated = self.check_regexp(&token, pattern.as_str(), flags.as_str())?;
        self.next_token()?;
        Ok(Expression::Literal(Box::new(Literal {
            base,
            value: LiteralValue::RegExp(RegExpLiteral {
                pattern,
                flags,
                translated,
            }),
            raw: token.raw,
        })))
    }

    /// Validate a regex literal and, when asked to, translate it. Translation
    /// failures are only fatal with `require_regexp_adaptation`.
    fn check_regexp(
        &mut self,
        token: &Token,
        pattern: &str,
        flags: &str,
    ) -> PResult<Option<Box<TranslatedRegex>>> {
        if token.flags.contains(TokenFlags::UNTERMINATED) || !valid_regexp_flags(flags) {
            // Already reported by the scanner.
            return Ok(None);
        }
        if let Err(error) = esz_regexp::validate(pattern, flags) {
            let detail = error.detail();
            self.report(Diagnostic::at_location(
                diagnostic_codes::INVALID_REGULAR_EXPRESSION,
                &[pattern, flags, &detail],
                token.range,
                token.location,
            ))?;
            return Ok(None);
        }
        if !self.options.adapt_regexp {
            return Ok(None);
        }
        let options = TranslateOptions::default().with_timeout(self.options.regex_timeout);
        match esz_regexp::translate(pattern, flags, &options) {
            Ok(translated) => {
                tracing::trace!(pattern, flags, "regex translated");
                Ok(Some(Box::new(translated)))
            }
            Err(error) => {
                tracing::trace!(pattern, flags, kind = ?error.kind(), "regex translation failed");
                let detail = error.detail();
                let (code, fatal) = match error.kind() {
                    RegexErrorKind::Syntax => (diagnostic_codes::INVALID_REGULAR_EXPRESSION, true),
                    RegexErrorKind::Unsupported => (
                        diagnostic_codes::CANNOT_TRANSLATE_REGULAR_EXPRESSION,
                        self.options.require_regexp_adaptation,
                    ),
                    RegexErrorKind::Timeout => (
                        diagnostic_codes::REGULAR_EXPRESSION_TIMEOUT,
                        self.options.require_regexp_adaptation,
                    ),
                };
                let diagnostic = Diagnostic::at_location(
                    code,
                    &[pattern, flags, &detail],
                    token.range,
                    token.location,
                );
                if fatal {
                    self.report(diagnostic)?;
                } else {
                    self.record(diagnostic);
                }
                Ok(None)
            }
        }
    }

    /// Template literal starting at the current template token.
    pub(crate) fn parse_template_literal(&mut self, tagged: bool) -> PResult<TemplateLiteral> {
        let start = self.start();
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        loop {
            let tail = matches!(
                self.kind(),
                SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateTail
            );
            quasis.push(self.template_element(tagged, tail)?);
            self.next_token()?;
            if tail {
                break;
            }
            expressions.push(self.allow_in(|p| p.parse_sequence_expression())?);
            if !matches!(self.kind(), SyntaxKind::TemplateMiddle | SyntaxKind::TemplateTail) {
                return Err(self.unexpected());
            }
        }
        Ok(TemplateLiteral {
            base: self.finish_node(NodeKind::TemplateLiteral, start),
            quasis: NodeList::from(quasis),
            expressions: NodeList::from(expressions),
        })
    }

    fn template_element(&mut self, tagged: bool, tail: bool) -> PResult<TemplateElement> {
        let Some(value) = self.current.template_value().cloned() else {
            return Err(self.unexpected());
        };
        if !tagged && let Some(escape) = value.invalid_escape {
            self.tolerate(escape.code, &[], escape.range, escape.position)?;
        }
        Ok(TemplateElement {
            base: self.node_at_token(NodeKind::TemplateElement),
            cooked: value.cooked,
            raw: value.raw,
            tail,
        })
    }

    fn parse_array_literal(&mut self) -> PResult<Expression> {
        let start = self.start();
        self.next_token()?;
        let elements = self.allow_in(|p| {
            let mut elements = Vec::new();
            while !p.is_token(SyntaxKind::CloseBracketToken) {
                if p.eat(SyntaxKind::CommaToken)? {
                    elements.push(ArrayElement::Hole);
                    continue;
                }
                let element_start = p.start();
                let element = if p.eat(SyntaxKind::DotDotDotToken)? {
                    let argument = p.parse_assignment_expression_covered()?;
                    if p.is_token(SyntaxKind::CommaToken) {
                        p.spread_with_trailing_comma.insert(element_start.offset);
                    }
                    ArrayElement::Spread(Box::new(SpreadElement {
                        base: p.finish_node(NodeKind::Spread, element_start),
                        argument,
                    }))
                } else {
                    ArrayElement::Expression(p.parse_assignment_expression_covered()?)
                };
                elements.push(element);
                if !p.is_token(SyntaxKind::CloseBracketToken) {
                    p.expect(SyntaxKind::CommaToken)?;
                }
            }
            Ok(elements)
        })?;
        self.expect(SyntaxKind::CloseBracketToken)?;
        Ok(Expression::Array(Box::new(ArrayExpression {
            base: self.finish_node(NodeKind::Array, start),
            elements: NodeList::from(elements),
        })))
    }

    fn parse_object_literal(&mut self) -> PResult<Expression> {
        let start = self.start();
        self.next_token()?;
        let properties = self.allow_in(|p| {
            let mut properties = Vec::new();
            let mut has_proto = false;
            while !p.is_token(SyntaxKind::CloseBraceToken) {
                properties.push(p.parse_object_member(&mut has_proto)?);
                if !p.is_token(SyntaxKind::CloseBraceToken) {
                    p.expect(SyntaxKind::CommaToken)?;
                }
            }
            Ok(properties)
        })?;
        self.expect(SyntaxKind::CloseBraceToken)?;
        Ok(Expression::Object(Box::new(ObjectExpression {
            base: self.finish_node(NodeKind::Object, start),
            properties: NodeList::from(properties),
        })))
    }

    /// Whether a `get`/`set`/`async`/`static` word is a modifier rather
    /// than a property name of its own.
    pub(crate) fn is_modifier_followed_by_name(&mut self) -> bool {
        !matches!(
            self.peek_kind(),
            SyntaxKind::OpenParenToken
                | SyntaxKind::CommaToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::ColonToken
                | SyntaxKind::EqualsToken
                | SyntaxKind::SemicolonToken
                | SyntaxKind::EndOfFileToken
        )
    }

    fn parse_object_member(&mut self, has_proto: &mut bool) -> PResult<ObjectMember> {
        let start = self.start();
        if self.eat(SyntaxKind::DotDotDotToken)? {
            let argument = self.parse_assignment_expression_covered()?;
            if self.is_token(SyntaxKind::CommaToken) {
                self.spread_with_trailing_comma.insert(start.offset);
            }
            return Ok(ObjectMember::Spread(Box::new(SpreadElement {
                base: self.finish_node(NodeKind::Spread, start),
                argument,
            })));
        }

        let mut is_async = false;
        let mut is_generator = false;
        let mut kind = PropertyKind::Init;
        if self.is_token(SyntaxKind::AsyncKeyword)
            && self.is_modifier_followed_by_name()
            && self.peek_kind_on_same_line().is_some()
        {
            is_async = true;
            self.next_token()?;
        }
        if self.eat(SyntaxKind::AsteriskToken)? {
            is_generator = true;
        }
        if !is_async
            && !is_generator
            && matches!(self.kind(), SyntaxKind::GetKeyword | SyntaxKind::SetKeyword)
            && self.is_modifier_followed_by_name()
        {
            kind = if self.is_token(SyntaxKind::GetKeyword) {
                PropertyKind::Get
            } else {
                PropertyKind::Set
            };
            self.next_token()?;
        }

        let key_token = self.current.clone();
        let key = self.parse_property_key(false)?;

        if is_async || is_generator || kind != PropertyKind::Init || self.is_token(SyntaxKind::OpenParenToken)
        {
            let value = self.parse_object_method(kind, is_async, is_generator)?;
            return Ok(ObjectMember::Property(Box::new(Property {
                base: self.finish_node(NodeKind::Property, start),
                key,
                value: Expression::Function(Box::new(value)),
                kind,
                method: kind == PropertyKind::Init,
                shorthand: false,
            })));
        }

        if self.eat(SyntaxKind::ColonToken)? {
            if !key.is_computed() && key.static_name() == Some("__proto__") {
                if *has_proto && self.cover.duplicate_proto.is_none() {
                    let base = key.base();
                    self.cover.duplicate_proto = Some((base.range, base.location.start));
                }
                *has_proto = true;
            }
            let value = self.parse_assignment_expression_covered()?;
            return Ok(ObjectMember::Property(Box::new(Property {
                base: self.finish_node(NodeKind::Property, start),
                key,
                value,
                kind,
                method: false,
                shorthand: false,
            })));
        }

        // Shorthand `{ a }` or cover-only `{ a = 1 }`.
        let PropertyKey::Identifier(key_id) = &key else {
            return Err(self.unexpected());
        };
        if !key_token.kind.is_identifier_like() {
            return Err(Diagnostic::at_location(
                diagnostic_codes::UNEXPECTED_TOKEN,
                &[&format!("'{}'", key_token.raw)],
                key_token.range,
                key_token.location,
            )
            .into());
        }
        self.check_identifier(&key_token, false)?;
        let id = Identifier {
            base: self.node_like(NodeKind::Identifier, &key_id.base),
            name: key_id.name.clone(),
        };
        let value = if self.is_token(SyntaxKind::EqualsToken) {
            if self.cover.shorthand_init.is_none() {
                self.cover.shorthand_init = Some((self.current.range, self.current.location.start));
            }
            self.next_token()?;
            let right = self.parse_assignment_expression()?;
            Expression::Assignment(Box::new(AssignmentExpression {
                base: self.finish_node(NodeKind::Assignment, start),
                operator: AssignmentOperator::Assign,
                left: Pattern::Identifier(Box::new(id)),
                right,
            }))
        } else {
            Expression::Identifier(Box::new(id))
        };
        Ok(ObjectMember::Property(Box::new(Property {
            base: self.finish_node(NodeKind::Property, start),
            key,
            value,
            kind,
            method: false,
            shorthand: true,
        })))
    }

    /// Property name in an object literal or class body.
    pub(crate) fn parse_property_key(&mut self, allow_private: bool) -> PResult<PropertyKey> {
        match self.kind() {
            SyntaxKind::OpenBracketToken => {
                self.next_token()?;
                let expression = self.allow_in(|p| p.parse_assignment_expression())?;
                self.expect(SyntaxKind::CloseBracketToken)?;
                Ok(PropertyKey::Computed(expression))
            }
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral => {
                Ok(PropertyKey::Literal(Box::new(self.parse_literal()?)))
            }
            SyntaxKind::PrivateIdentifier if allow_private => {
                Ok(PropertyKey::PrivateIdentifier(Box::new(self.parse_private_identifier()?)))
            }
            kind if kind.is_identifier_name() => {
                Ok(PropertyKey::Identifier(Box::new(self.parse_identifier_name()?)))
            }
            _ => Err(self.unexpected()),
        }
    }

    // =========================================================================
    // Identifiers
    // =========================================================================

    /// Reject identifiers that are reserved in the current context. Binding
    /// positions additionally reject `eval`/`arguments` in strict code.
    pub(crate) fn check_identifier(&mut self, token: &Token, binding: bool) -> PResult<()> {
        let name = Self::token_name(token);
        let escaped_keyword = if token.flags.contains(TokenFlags::UNICODE_ESCAPE) {
            text_to_keyword(name.as_str())
        } else {
            None
        };
        let kind = escaped_keyword.unwrap_or(token.kind);
        let escaped = escaped_keyword.is_some();
        let diagnostic = |code| Diagnostic::at_location(code, &[], token.range, token.location);

        if kind.is_reserved_word() {
            let code = if escaped {
                diagnostic_codes::KEYWORD_CONTAINS_ESCAPE
            } else {
                diagnostic_codes::UNEXPECTED_RESERVED_WORD
            };
            return self.report(diagnostic(code));
        }
        match kind {
            SyntaxKind::YieldKeyword if self.strict || self.has_context(ContextFlags::YIELD) => {
                let code = if escaped {
                    diagnostic_codes::KEYWORD_CONTAINS_ESCAPE
                } else if self.strict {
                    diagnostic_codes::UNEXPECTED_STRICT_RESERVED_WORD
                } else {
                    diagnostic_codes::UNEXPECTED_RESERVED_WORD
                };
                self.report(diagnostic(code))?;
            }
            SyntaxKind::AwaitKeyword => {
                self.await_identifier_positions.push(Marker {
                    offset: token.range.start,
                    position: token.location.start,
                });
                if self.module || self.has_context(ContextFlags::AWAIT | ContextFlags::STATIC_BLOCK) {
                    let code = if escaped {
                        diagnostic_codes::KEYWORD_CONTAINS_ESCAPE
                    } else {
                        diagnostic_codes::UNEXPECTED_RESERVED_WORD
                    };
                    self.report(diagnostic(code))?;
                }
            }
            kind if kind.is_strict_mode_reserved_word() && self.strict => {
                let code = if escaped {
                    diagnostic_codes::KEYWORD_CONTAINS_ESCAPE
                } else {
                    diagnostic_codes::UNEXPECTED_STRICT_RESERVED_WORD
                };
                self.report(diagnostic(code))?;
            }
            _ => {}
        }
        let name = name.as_str();
        if binding && self.strict && matches!(name, "eval" | "arguments") {
            self.report(diagnostic(diagnostic_codes::UNEXPECTED_EVAL_OR_ARGUMENTS))?;
        }
        if !binding && name == "arguments" && self.has_context(ContextFlags::CLASS_FIELD) {
            self.report(diagnostic(diagnostic_codes::ARGUMENTS_IN_CLASS_FIELD))?;
        }
        Ok(())
    }

    /// Identifier in a reference position.
    pub(crate) fn parse_identifier_reference(&mut self) -> PResult<Identifier> {
        if !self.current.kind.is_identifier_like() {
            return Err(self.unexpected());
        }
        let token = self.current.clone();
        self.check_identifier(&token, false)?;
        let base = self.node_at_token(NodeKind::Identifier);
        self.next_token()?;
        Ok(Identifier {
            base,
            name: Self::token_name(&token),
        })
    }

    /// Any identifier name, reserved words included.
    pub(crate) fn parse_identifier_name(&mut self) -> PResult<Identifier> {
        if !self.current.kind.is_identifier_name() {
            return Err(self.unexpected());
        }
        let base = self.node_at_token(NodeKind::Identifier);
        let name = self.current_name();
        self.next_token()?;
        Ok(Identifier { base, name })
    }

    pub(crate) fn parse_private_identifier(&mut self) -> PResult<PrivateIdentifier> {
        if !self.is_token(SyntaxKind::PrivateIdentifier) {
            return Err(self.unexpected());
        }
        let base = self.node_at_token(NodeKind::PrivateIdentifier);
        let name = self.current_name();
        self.next_token()?;
        Ok(PrivateIdentifier { base, name })
    }
}

fn update_operator(kind: SyntaxKind) -> Option<UpdateOperator> {
    match kind {
        SyntaxKind::PlusPlusToken => Some(UpdateOperator::Increment),
        SyntaxKind::MinusMinusToken => Some(UpdateOperator::Decrement),
        _ => None,
    }
}
