//! Parser state - binding patterns and expression-to-pattern conversion

use esz_common::diagnostics::diagnostic_codes;
use esz_scanner::SyntaxKind;

use super::scope::BindingKind;
use super::state::{Marker, ParserState};
use crate::ast::{
    ArrayElement, ArrayPattern, AssignmentOperator, AssignmentPattern, AssignmentProperty,
    Expression, Identifier, NodeBase, NodeKind, NodeList, ObjectMember, ObjectPattern,
    ObjectPatternProperty, Pattern, PropertyKey, PropertyKind, RestElement,
};
use crate::error::PResult;

/// What a reinterpreted expression is about to become.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PatternTarget {
    /// Left side of `=`.
    Assignment,
    /// Left side of `for (... in|of ...)`.
    ForHead(&'static str),
    /// Arrow function parameter.
    Parameter,
}

impl ParserState {
    // =========================================================================
    // Binding patterns
    // =========================================================================

    /// Identifier, object pattern or array pattern in a declaration.
    pub(crate) fn parse_binding_target(&mut self, kind: BindingKind) -> PResult<Pattern> {
        match self.kind() {
            SyntaxKind::OpenBracketToken => self.nested(|p| p.parse_array_binding_pattern(kind)),
            SyntaxKind::OpenBraceToken => self.nested(|p| p.parse_object_binding_pattern(kind)),
            _ => Ok(Pattern::Identifier(Box::new(self.parse_binding_identifier(kind)?))),
        }
    }

    /// Binding target with an optional default value.
    pub(crate) fn parse_binding_element(&mut self, kind: BindingKind) -> PResult<Pattern> {
        let start = self.start();
        let target = self.parse_binding_target(kind)?;
        if !self.eat(SyntaxKind::EqualsToken)? {
            return Ok(target);
        }
        let right = self.allow_in(|p| p.parse_assignment_expression())?;
        Ok(Pattern::Assignment(Box::new(AssignmentPattern {
            base: self.finish_node(NodeKind::AssignmentPattern, start),
            left: target,
            right,
        })))
    }

    pub(crate) fn parse_binding_identifier(&mut self, kind: BindingKind) -> PResult<Identifier> {
        if self.current.kind.is_reserved_word() {
            return Err(self.error_at_token(diagnostic_codes::UNEXPECTED_RESERVED_WORD, &[]));
        }
        if !self.current.kind.is_identifier_like() {
            return Err(self.unexpected());
        }
        let token = self.current.clone();
        self.check_identifier(&token, true)?;
        let name = Self::token_name(&token);
        self.declare_name(&name, kind, token.range, token.location.start)?;
        let base = self.node_at_token(NodeKind::Identifier);
        self.next_token()?;
        Ok(Identifier { base, name })
    }

    fn parse_array_binding_pattern(&mut self, kind: BindingKind) -> PResult<Pattern> {
        let start = self.start();
        self.next_token()?;
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken) {
            if self.eat(SyntaxKind::CommaToken)? {
                elements.push(None);
                continue;
            }
            if self.is_token(SyntaxKind::DotDotDotToken) {
                let rest_start = self.start();
                self.next_token()?;
                let argument = self.parse_binding_target(kind)?;
                self.check_binding_rest_end(SyntaxKind::CloseBracketToken)?;
                elements.push(Some(self.rest_element(rest_start, argument)));
                break;
            }
            elements.push(Some(self.parse_binding_element(kind)?));
            if !self.is_token(SyntaxKind::CloseBracketToken) {
                self.expect(SyntaxKind::CommaToken)?;
            }
        }
        self.expect(SyntaxKind::CloseBracketToken)?;
        Ok(Pattern::Array(Box::new(ArrayPattern {
            base: self.finish_node(NodeKind::ArrayPattern, start),
            elements: NodeList::from(elements),
        })))
    }

    fn parse_object_binding_pattern(&mut self, kind: BindingKind) -> PResult<Pattern> {
        let start = self.start();
        self.next_token()?;
        let mut properties = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            let property_start = self.start();
            if self.eat(SyntaxKind::DotDotDotToken)? {
                let argument = Pattern::Identifier(Box::new(self.parse_binding_identifier(kind)?));
                self.check_binding_rest_end(SyntaxKind::CloseBraceToken)?;
                properties.push(ObjectPatternProperty::Rest(Box::new(RestElement {
                    base: self.finish_node(NodeKind::RestElement, property_start),
                    argument,
                })));
                break;
            }
            properties.push(ObjectPatternProperty::Property(Box::new(
                self.parse_binding_property(property_start, kind)?,
            )));
            if !self.is_token(SyntaxKind::CloseBraceToken) {
                self.expect(SyntaxKind::CommaToken)?;
            }
        }
        self.expect(SyntaxKind::CloseBraceToken)?;
        Ok(Pattern::Object(Box::new(ObjectPattern {
            base: self.finish_node(NodeKind::ObjectPattern, start),
            properties: NodeList::from(properties),
        })))
    }

    fn parse_binding_property(&mut self, start: Marker, kind: BindingKind) -> PResult<AssignmentProperty> {
        let key_token = self.current.clone();
        if key_token.kind.is_identifier_like()
            && !matches!(self.peek_kind(), SyntaxKind::ColonToken)
        {
            let id = self.parse_binding_identifier(kind)?;
            let key = PropertyKey::Identifier(Box::new(Identifier {
                base: self.node_like(NodeKind::Identifier, &id.base),
                name: id.name.clone(),
            }));
            let mut value = Pattern::Identifier(Box::new(id));
            if self.eat(SyntaxKind::EqualsToken)? {
                let right = self.allow_in(|p| p.parse_assignment_expression())?;
                value = Pattern::Assignment(Box::new(AssignmentPattern {
                    base: self.finish_node(NodeKind::AssignmentPattern, start),
                    left: value,
                    right,
                }));
            }
            return Ok(AssignmentProperty {
                base: self.finish_node(NodeKind::Property, start),
                key,
                value,
                shorthand: true,
            });
        }
        let key = self.parse_property_key(false)?;
        self.expect(SyntaxKind::ColonToken)?;
        let value = self.parse_binding_element(kind)?;
        Ok(AssignmentProperty {
            base: self.finish_node(NodeKind::Property, start),
            key,
            value,
            shorthand: false,
        })
    }

    /// A binding rest element must close its pattern.
    fn check_binding_rest_end(&mut self, close: SyntaxKind) -> PResult<()> {
        match self.kind() {
            kind if kind == close => Ok(()),
            SyntaxKind::EqualsToken => {
                Err(self.error_at_token(diagnostic_codes::REST_ELEMENT_WITH_INITIALIZER, &[]))
            }
            SyntaxKind::CommaToken => {
                let code = if self.peek_kind() == close {
                    diagnostic_codes::INVALID_REST_TRAILING_COMMA
                } else {
                    diagnostic_codes::REST_ELEMENT_MUST_BE_LAST
                };
                Err(self.error_at_token(code, &[]))
            }
            _ => Err(self.unexpected()),
        }
    }

    pub(crate) fn rest_element(&self, start: Marker, argument: Pattern) -> Pattern {
        Pattern::Rest(Box::new(RestElement {
            base: self.finish_node(NodeKind::RestElement, start),
            argument,
        }))
    }

    /// Rest element taking over the extent of a spread element.
    pub(crate) fn rest_element_like(&self, spread: &NodeBase, argument: Pattern) -> Pattern {
        Pattern::Rest(Box::new(RestElement {
            base: self.node_like(NodeKind::RestElement, spread),
            argument,
        }))
    }

    // =========================================================================
    // Expression reinterpretation
    // =========================================================================

    /// Left side of `for (x in|of ...)` given as an expression.
    pub(crate) fn expression_to_for_head(
        &mut self,
        expression: Expression,
        head: &'static str,
    ) -> PResult<Pattern> {
        self.expression_to_pattern(expression, PatternTarget::ForHead(head))
    }

    /// Reinterpret a parsed expression as a destructuring target.
    pub(crate) fn expression_to_pattern(
        &mut self,
        expression: Expression,
        target: PatternTarget,
    ) -> PResult<Pattern> {
        self.convert_expression(expression, target, true)
    }

    /// Reinterpret one item of a parenthesized list as an arrow parameter,
    /// where `name = default` is allowed.
    pub(crate) fn expression_to_parameter(&mut self, expression: Expression) -> PResult<Pattern> {
        self.convert_element(expression, PatternTarget::Parameter)
    }

    fn convert_expression(
        &mut self,
        expression: Expression,
        target: PatternTarget,
        top_level: bool,
    ) -> PResult<Pattern> {
        let parenthesized = self.is_parenthesized(&expression);
        match expression {
            Expression::Identifier(id) => {
                if target == PatternTarget::Parameter {
                    if parenthesized {
                        return Err(self.invalid_target(&id.base, target, top_level));
                    }
                    self.check_parameter_name(&id)?;
                } else {
                    self.check_assignment_name(&id)?;
                }
                Ok(Pattern::Identifier(id))
            }
            Expression::Member(member) if target != PatternTarget::Parameter => {
                Ok(Pattern::Member(member))
            }
            Expression::Object(object) if !parenthesized => {
                self.clear_cover_within(object.base.range);
                let base = self.node_like(NodeKind::ObjectPattern, &object.base);
                let members = object.properties.into_vec();
                let count = members.len();
                let mut properties = Vec::with_capacity(count);
                for (index, member) in members.into_iter().enumerate() {
                    properties.push(self.convert_object_member(member, target, index + 1 == count)?);
                }
                Ok(Pattern::Object(Box::new(ObjectPattern {
                    base,
                    properties: NodeList::from(properties),
                })))
            }
            Expression::Array(array) if !parenthesized => {
                self.clear_cover_within(array.base.range);
                let base = self.node_like(NodeKind::ArrayPattern, &array.base);
                let items = array.elements.into_vec();
                let count = items.len();
                let mut elements = Vec::with_capacity(count);
                for (index, element) in items.into_iter().enumerate() {
                    elements.push(self.convert_array_element(element, target, index + 1 == count)?);
                }
                Ok(Pattern::Array(Box::new(ArrayPattern {
                    base,
                    elements: NodeList::from(elements),
                })))
            }
            other => Err(self.invalid_target(other.base(), target, top_level)),
        }
    }

    fn invalid_target(
        &self,
        base: &NodeBase,
        target: PatternTarget,
        top_level: bool,
    ) -> crate::error::ParseFailure {
        match target {
            PatternTarget::Assignment if top_level => {
                self.error_at(diagnostic_codes::INVALID_LEFT_HAND_SIDE_IN_ASSIGNMENT, &[], base)
            }
            PatternTarget::ForHead(head) if top_level => {
                self.error_at(diagnostic_codes::INVALID_LEFT_HAND_SIDE_IN_FOR_LOOP, &[head], base)
            }
            _ => self.error_at(diagnostic_codes::INVALID_DESTRUCTURING_TARGET, &[], base),
        }
    }

    /// Element of a pattern, where `target = default` is allowed.
    fn convert_element(&mut self, expression: Expression, target: PatternTarget) -> PResult<Pattern> {
        let parenthesized = self.is_parenthesized(&expression);
        match expression {
            Expression::Assignment(assignment)
                if assignment.operator == AssignmentOperator::Assign && !parenthesized =>
            {
                let assignment = *assignment;
                if target == PatternTarget::Parameter {
                    self.check_parameter_pattern(&assignment.left)?;
                }
                Ok(Pattern::Assignment(Box::new(AssignmentPattern {
                    base: self.node_like(NodeKind::AssignmentPattern, &assignment.base),
                    left: assignment.left,
                    right: assignment.right,
                })))
            }
            other => self.convert_expression(other, target, false),
        }
    }

    fn convert_array_element(
        &mut self,
        element: ArrayElement,
        target: PatternTarget,
        is_last: bool,
    ) -> PResult<Option<Pattern>> {
        match element {
            ArrayElement::Hole => Ok(None),
            ArrayElement::Expression(expression) => Ok(Some(self.convert_element(expression, target)?)),
            ArrayElement::Spread(spread) => {
                self.check_spread_is_last(&spread.base, is_last)?;
                if matches!(spread.argument, Expression::Assignment(_)) {
                    return Err(self.error_at(
                        diagnostic_codes::REST_ELEMENT_WITH_INITIALIZER,
                        &[],
                        spread.argument.base(),
                    ));
                }
                let spread = *spread;
                let argument = self.convert_expression(spread.argument, target, false)?;
                Ok(Some(self.rest_element_like(&spread.base, argument)))
            }
        }
    }

    fn convert_object_member(
        &mut self,
        member: ObjectMember,
        target: PatternTarget,
        is_last: bool,
    ) -> PResult<ObjectPatternProperty> {
        match member {
            ObjectMember::Spread(spread) => {
                self.check_spread_is_last(&spread.base, is_last)?;
                let spread = *spread;
                let argument = match spread.argument {
                    Expression::Identifier(_) | Expression::Member(_) => {
                        self.convert_expression(spread.argument, target, false)?
                    }
                    other => {
                        return Err(self.error_at(
                            diagnostic_codes::INVALID_DESTRUCTURING_TARGET,
                            &[],
                            other.base(),
                        ));
                    }
                };
                Ok(ObjectPatternProperty::Rest(Box::new(RestElement {
                    base: self.node_like(NodeKind::RestElement, &spread.base),
                    argument,
                })))
            }
            ObjectMember::Property(property) => {
                if property.method || property.kind != PropertyKind::Init {
                    return Err(self.error_at(
                        diagnostic_codes::INVALID_DESTRUCTURING_TARGET,
                        &[],
                        &property.base,
                    ));
                }
                let property = *property;
                let value = self.convert_element(property.value, target)?;
                Ok(ObjectPatternProperty::Property(Box::new(AssignmentProperty {
                    base: self.node_like(NodeKind::Property, &property.base),
                    key: property.key,
                    value,
                    shorthand: property.shorthand,
                })))
            }
        }
    }

    /// A rest element must be last and must not be followed by a comma.
    fn check_spread_is_last(&mut self, spread: &NodeBase, is_last: bool) -> PResult<()> {
        if !is_last {
            return Err(self.error_at(diagnostic_codes::REST_ELEMENT_MUST_BE_LAST, &[], spread));
        }
        if self.spread_with_trailing_comma.contains(&spread.range.start) {
            return Err(self.error_at(diagnostic_codes::INVALID_REST_TRAILING_COMMA, &[], spread));
        }
        Ok(())
    }

    fn check_parameter_name(&mut self, id: &Identifier) -> PResult<()> {
        if self.strict && matches!(id.name.as_str(), "eval" | "arguments") {
            return self.tolerate_at(diagnostic_codes::UNEXPECTED_EVAL_OR_ARGUMENTS, &[], &id.base);
        }
        Ok(())
    }

    /// A target converted for assignment that ends up among parameters may
    /// not contain member expressions.
    fn check_parameter_pattern(&mut self, pattern: &Pattern) -> PResult<()> {
        match pattern {
            Pattern::Identifier(id) => self.check_parameter_name(id),
            Pattern::Member(member) => Err(self.error_at(
                diagnostic_codes::INVALID_DESTRUCTURING_TARGET,
                &[],
                &member.base,
            )),
            Pattern::Object(object) => {
                for property in &object.properties {
                    match property {
                        ObjectPatternProperty::Property(p) => self.check_parameter_pattern(&p.value)?,
                        ObjectPatternProperty::Rest(rest) => self.check_parameter_pattern(&rest.argument)?,
                    }
                }
                Ok(())
            }
            Pattern::Array(array) => {
                for element in array.elements.iter().flatten() {
                    self.check_parameter_pattern(element)?;
                }
                Ok(())
            }
            Pattern::Assignment(assignment) => self.check_parameter_pattern(&assignment.left),
            Pattern::Rest(rest) => self.check_parameter_pattern(&rest.argument),
        }
    }
}
