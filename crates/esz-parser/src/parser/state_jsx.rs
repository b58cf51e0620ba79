//! Parser state - JSX elements and fragments
//!
//! Tags and attributes are read with the ordinary scanner, re-scanning names
//! so they may contain `-`. Children are read with the scanner's JSX child
//! mode, which yields text runs, `{` and `<`.

use esz_common::diagnostics::diagnostic_codes;
use esz_common::{Location, Range};
use esz_scanner::{SyntaxKind, TokenFlags};

use super::state::{Marker, ParserState};
use crate::ast::{
    Expression, JsxAttribute, JsxAttributeItem, JsxAttributeName, JsxAttributeValue, JsxChild,
    JsxClosingElement, JsxClosingFragment, JsxElement, JsxElementName, JsxEmptyExpression,
    JsxExpression, JsxExpressionContainer, JsxFragment, JsxIdentifier, JsxMemberExpression,
    JsxMemberObject, JsxNamespacedName, JsxOpeningElement, JsxOpeningFragment,
    JsxSpreadAttribute, JsxText, NodeKind, NodeList,
};
use crate::error::PResult;

/// An element or a fragment.
enum JsxNode {
    Element(JsxElement),
    Fragment(JsxFragment),
}

fn is_greater_than(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::GreaterThanToken
            | SyntaxKind::GreaterThanEqualsToken
            | SyntaxKind::GreaterThanGreaterThanToken
            | SyntaxKind::GreaterThanGreaterThanGreaterThanToken
            | SyntaxKind::GreaterThanGreaterThanEqualsToken
            | SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken
    )
}

impl ParserState {
    // =========================================================================
    // Roots
    // =========================================================================

    /// JSX element or fragment in expression position, at `<`.
    pub(crate) fn parse_jsx_expression(&mut self) -> PResult<Expression> {
        let start = self.start();
        self.expect(SyntaxKind::LessThanToken)?;
        let node = self.nested(|p| p.parse_jsx_node(start, false))?;

        if self.is_token(SyntaxKind::LessThanToken) {
            let next = self.peek_kind();
            if next.is_identifier_name() || next == SyntaxKind::GreaterThanToken {
                return Err(self.error_at_token(diagnostic_codes::JSX_ADJACENT_ELEMENTS, &[]));
            }
        }

        Ok(match node {
            JsxNode::Element(element) => Expression::JsxElement(Box::new(element)),
            JsxNode::Fragment(fragment) => Expression::JsxFragment(Box::new(fragment)),
        })
    }

    /// Element or fragment after its `<`. `in_children` selects how the
    /// token after the final `>` is scanned.
    fn parse_jsx_node(&mut self, start: Marker, in_children: bool) -> PResult<JsxNode> {
        if self.is_token(SyntaxKind::GreaterThanToken) {
            return self.parse_jsx_fragment(start, in_children).map(JsxNode::Fragment);
        }
        self.parse_jsx_element(start, in_children).map(JsxNode::Element)
    }

    fn parse_jsx_element(&mut self, start: Marker, in_children: bool) -> PResult<JsxElement> {
        let name = self.parse_jsx_element_name()?;
        let attributes = self.parse_jsx_attributes()?;
        let self_closing = self.eat(SyntaxKind::SlashToken)?;

        if self_closing {
            self.finish_jsx_tag(in_children)?;
            let opening = JsxOpeningElement {
                base: self.finish_node(NodeKind::JsxOpeningElement, start),
                name,
                attributes: NodeList::from(attributes),
                self_closing: true,
            };
            return Ok(JsxElement {
                base: self.finish_node(NodeKind::JsxElement, start),
                opening,
                children: NodeList::empty(),
                closing: None,
            });
        }

        self.finish_jsx_tag(true)?;
        let opening = JsxOpeningElement {
            base: self.finish_node(NodeKind::JsxOpeningElement, start),
            name,
            attributes: NodeList::from(attributes),
            self_closing: false,
        };

        let (children, closing_start) = self.parse_jsx_children()?;
        let expected = opening.name.qualified_name();
        if is_greater_than(self.kind()) {
            return Err(self.error_at_token(diagnostic_codes::JSX_CLOSING_TAG_MISMATCH, &[&expected]));
        }
        let closing_name = self.parse_jsx_element_name()?;
        if closing_name.qualified_name() != expected {
            self.tolerate_at(
                diagnostic_codes::JSX_CLOSING_TAG_MISMATCH,
                &[&expected],
                closing_name.base(),
            )?;
        }
        self.finish_jsx_tag(in_children)?;
        let closing = JsxClosingElement {
            base: self.finish_node(NodeKind::JsxClosingElement, closing_start),
            name: closing_name,
        };

        Ok(JsxElement {
            base: self.finish_node(NodeKind::JsxElement, start),
            opening,
            children: NodeList::from(children),
            closing: Some(closing),
        })
    }

    fn parse_jsx_fragment(&mut self, start: Marker, in_children: bool) -> PResult<JsxFragment> {
        self.finish_jsx_tag(true)?;
        let opening = JsxOpeningFragment {
            base: self.finish_node(NodeKind::JsxOpeningFragment, start),
        };

        let (children, closing_start) = self.parse_jsx_children()?;
        if !is_greater_than(self.kind()) {
            return Err(self.error_at_token(diagnostic_codes::JSX_CLOSING_TAG_MISMATCH, &["<>"]));
        }
        self.finish_jsx_tag(in_children)?;
        let closing = JsxClosingFragment {
            base: self.finish_node(NodeKind::JsxClosingFragment, closing_start),
        };

        Ok(JsxFragment {
            base: self.finish_node(NodeKind::JsxFragment, start),
            opening,
            children: NodeList::from(children),
            closing,
        })
    }

    /// Consume the `>` ending a tag, splitting `>>` and `>=` when needed.
    fn finish_jsx_tag(&mut self, into_children: bool) -> PResult<()> {
        if !is_greater_than(self.kind()) {
            return Err(self.unexpected());
        }
        if !self.is_token(SyntaxKind::GreaterThanToken) {
            self.split_greater_than()?;
        }
        if into_children {
            self.next_jsx_child()
        } else {
            self.next_token()
        }
    }

    // =========================================================================
    // Names
    // =========================================================================

    fn parse_jsx_identifier(&mut self) -> PResult<JsxIdentifier> {
        if !self.kind().is_identifier_name() {
            return Err(self.unexpected());
        }
        self.rescan_jsx_identifier()?;
        // JSX names take no escapes, and an empty name would never advance.
        if self.current.range.start == self.current.range.end
            || self.current.flags.contains(TokenFlags::UNICODE_ESCAPE)
            || self.current.raw.as_str().starts_with('\\')
        {
            return Err(self.unexpected());
        }
        let base = self.node_at_token(NodeKind::JsxIdentifier);
        let name = self.current_name();
        self.next_token()?;
        Ok(JsxIdentifier { base, name })
    }

    fn parse_jsx_element_name(&mut self) -> PResult<JsxElementName> {
        let start = self.start();
        let first = self.parse_jsx_identifier()?;

        if self.eat(SyntaxKind::ColonToken)? {
            let name = self.parse_jsx_identifier()?;
            return Ok(JsxElementName::Namespaced(Box::new(JsxNamespacedName {
                base: self.finish_node(NodeKind::JsxNamespacedName, start),
                namespace: first,
                name,
            })));
        }
        if !self.is_token(SyntaxKind::DotToken) {
            return Ok(JsxElementName::Identifier(Box::new(first)));
        }

        let mut object = JsxMemberObject::Identifier(Box::new(first));
        loop {
            self.expect(SyntaxKind::DotToken)?;
            let property = self.parse_jsx_identifier()?;
            let member = JsxMemberExpression {
                base: self.finish_node(NodeKind::JsxMemberExpression, start),
                object,
                property,
            };
            if !self.is_token(SyntaxKind::DotToken) {
                return Ok(JsxElementName::Member(Box::new(member)));
            }
            object = JsxMemberObject::Member(Box::new(member));
        }
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    fn parse_jsx_attributes(&mut self) -> PResult<Vec<JsxAttributeItem>> {
        let mut attributes = Vec::new();
        while !self.is_token(SyntaxKind::SlashToken) && !is_greater_than(self.kind()) {
            let attribute = if self.is_token(SyntaxKind::OpenBraceToken) {
                JsxAttributeItem::Spread(Box::new(self.parse_jsx_spread_attribute()?))
            } else {
                JsxAttributeItem::Attribute(Box::new(self.parse_jsx_attribute()?))
            };
            attributes.push(attribute);
        }
        Ok(attributes)
    }

    fn parse_jsx_spread_attribute(&mut self) -> PResult<JsxSpreadAttribute> {
        let start = self.start();
        self.expect(SyntaxKind::OpenBraceToken)?;
        self.expect(SyntaxKind::DotDotDotToken)?;
        let argument = self.allow_in(|p| p.parse_assignment_expression())?;
        self.expect(SyntaxKind::CloseBraceToken)?;
        Ok(JsxSpreadAttribute {
            base: self.finish_node(NodeKind::JsxSpreadAttribute, start),
            argument,
        })
    }

    fn parse_jsx_attribute(&mut self) -> PResult<JsxAttribute> {
        let start = self.start();
        let first = self.parse_jsx_identifier()?;
        let name = if self.eat(SyntaxKind::ColonToken)? {
            let name = self.parse_jsx_identifier()?;
            JsxAttributeName::Namespaced(Box::new(JsxNamespacedName {
                base: self.finish_node(NodeKind::JsxNamespacedName, start),
                namespace: first,
                name,
            }))
        } else {
            JsxAttributeName::Identifier(Box::new(first))
        };

        let value = if self.is_token(SyntaxKind::EqualsToken) {
            self.next_jsx_attribute_value()?;
            Some(self.parse_jsx_attribute_value()?)
        } else {
            None
        };

        Ok(JsxAttribute {
            base: self.finish_node(NodeKind::JsxAttribute, start),
            name,
            value,
        })
    }

    fn parse_jsx_attribute_value(&mut self) -> PResult<JsxAttributeValue> {
        match self.kind() {
            SyntaxKind::StringLiteral => Ok(JsxAttributeValue::Literal(Box::new(self.parse_literal()?))),
            SyntaxKind::OpenBraceToken => {
                let container = self.parse_jsx_expression_container(false)?;
                if matches!(container.expression, JsxExpression::Empty(_)) {
                    self.tolerate_at(
                        diagnostic_codes::JSX_EMPTY_ATTRIBUTE_EXPRESSION,
                        &[],
                        &container.base,
                    )?;
                }
                Ok(JsxAttributeValue::ExpressionContainer(Box::new(container)))
            }
            SyntaxKind::LessThanToken => {
                let start = self.start();
                self.next_token()?;
                Ok(match self.nested(|p| p.parse_jsx_node(start, false))? {
                    JsxNode::Element(element) => JsxAttributeValue::Element(Box::new(element)),
                    JsxNode::Fragment(fragment) => JsxAttributeValue::Fragment(Box::new(fragment)),
                })
            }
            _ => Err(self.unexpected()),
        }
    }

    /// `{ expression }` or `{}`; `in_children` selects how the token after
    /// `}` is scanned.
    fn parse_jsx_expression_container(&mut self, in_children: bool) -> PResult<JsxExpressionContainer> {
        let start = self.start();
        self.expect(SyntaxKind::OpenBraceToken)?;
        let expression = if self.is_token(SyntaxKind::CloseBraceToken) {
            let range = Range::new(self.prev_end, self.token_pos());
            let location = Location::new(self.prev_end_position, self.current.location.start);
            JsxExpression::Empty(Box::new(JsxEmptyExpression {
                base: self.node_at(NodeKind::JsxEmptyExpression, range, location),
            }))
        } else {
            JsxExpression::Expression(self.allow_in(|p| p.parse_assignment_expression())?)
        };

        if !self.is_token(SyntaxKind::CloseBraceToken) {
            return Err(self.unexpected());
        }
        if in_children {
            self.next_jsx_child()?;
        } else {
            self.next_token()?;
        }
        Ok(JsxExpressionContainer {
            base: self.finish_node(NodeKind::JsxExpressionContainer, start),
            expression,
        })
    }

    // =========================================================================
    // Children
    // =========================================================================

    /// Children up to and including `</`. Returns them with the marker of the
    /// closing tag.
    fn parse_jsx_children(&mut self) -> PResult<(Vec<JsxChild>, Marker)> {
        let mut children = Vec::new();
        loop {
            match self.kind() {
                SyntaxKind::JsxText => {
                    let base = self.node_at_token(NodeKind::JsxText);
                    let value = self.current_name();
                    let raw = self.current.raw.clone();
                    self.next_jsx_child()?;
                    children.push(JsxChild::Text(Box::new(JsxText { base, value, raw })));
                }
                SyntaxKind::OpenBraceToken => {
                    let container = self.parse_jsx_expression_container(true)?;
                    children.push(JsxChild::ExpressionContainer(Box::new(container)));
                }
                SyntaxKind::LessThanToken => {
                    let start = self.start();
                    self.next_token()?;
                    if self.eat(SyntaxKind::SlashToken)? {
                        return Ok((children, start));
                    }
                    children.push(match self.nested(|p| p.parse_jsx_node(start, true))? {
                        JsxNode::Element(element) => JsxChild::Element(Box::new(element)),
                        JsxNode::Fragment(fragment) => JsxChild::Fragment(Box::new(fragment)),
                    });
                }
                _ => return Err(self.unexpected()),
            }
        }
    }
}
