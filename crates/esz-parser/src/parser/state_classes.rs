//! Parser state - class declarations, expressions and class bodies

use esz_common::diagnostics::diagnostic_codes;
use esz_scanner::SyntaxKind;

use super::scope::{BindingKind, PrivateNameKind, ScopeFlags};
use super::state::{ContextFlags, Marker, ParserState};
use super::state_functions::FunctionKind;
use super::state_statements::StatementContext;
use crate::ast::{
    Class, ClassBody, ClassElement, MethodDefinition, MethodKind, NodeKind, NodeList,
    PropertyDefinition, PropertyKey, StaticBlock,
};
use crate::error::PResult;

/// Modifiers seen before a class element's key.
#[derive(Clone, Copy, Debug, Default)]
struct ElementModifiers {
    is_static: bool,
    is_async: bool,
    is_generator: bool,
    accessor: Option<MethodKind>,
}

impl ElementModifiers {
    fn is_plain(self) -> bool {
        !self.is_async && !self.is_generator && self.accessor.is_none()
    }
}

impl ParserState {
    /// Class declaration or expression starting at `class`.
    pub(crate) fn parse_class(&mut self, start: Marker, is_declaration: bool) -> PResult<Class> {
        self.parse_class_node(start, is_declaration, false)
    }

    /// Class node; `name_optional` only after `export default`.
    pub(crate) fn parse_class_node(
        &mut self,
        start: Marker,
        is_declaration: bool,
        name_optional: bool,
    ) -> PResult<Class> {
        self.expect(SyntaxKind::ClassKeyword)?;
        // All parts of a class are strict code.
        let was_strict = self.strict;
        self.strict = true;
        let result = self.parse_class_rest(start, is_declaration, name_optional);
        self.strict = was_strict;
        result
    }

    fn parse_class_rest(
        &mut self,
        start: Marker,
        is_declaration: bool,
        name_optional: bool,
    ) -> PResult<Class> {
        let names_class = self.current.kind.is_identifier_like()
            && !self.is_token(SyntaxKind::ExtendsKeyword);
        let id = if names_class {
            let kind = if is_declaration {
                BindingKind::Lexical
            } else {
                BindingKind::None
            };
            Some(self.parse_binding_identifier(kind)?)
        } else if is_declaration && !name_optional {
            return Err(self.unexpected());
        } else {
            None
        };

        let super_class = if self.eat(SyntaxKind::ExtendsKeyword)? {
            Some(self.nested(|p| p.parse_left_hand_side_expression())?)
        } else {
            None
        };

        let body_start = self.start();
        self.expect(SyntaxKind::OpenBraceToken)?;
        self.enter_class_body();
        let elements = self.parse_class_elements(super_class.is_some());
        let exited = self.exit_class_body();
        let elements = elements?;
        exited?;
        self.expect(SyntaxKind::CloseBraceToken)?;
        let body = ClassBody {
            base: self.finish_node(NodeKind::ClassBody, body_start),
            body: NodeList::from(elements),
        };

        let kind = if is_declaration {
            NodeKind::ClassDeclaration
        } else {
            NodeKind::Class
        };
        Ok(Class {
            base: self.finish_node(kind, start),
            id,
            super_class,
            body,
        })
    }

    fn parse_class_elements(&mut self, derived: bool) -> PResult<Vec<ClassElement>> {
        let mut elements = Vec::new();
        let mut has_constructor = false;
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            if self.eat(SyntaxKind::SemicolonToken)? {
                continue;
            }
            elements.push(self.parse_class_element(derived, &mut has_constructor)?);
        }
        Ok(elements)
    }

    fn parse_class_element(&mut self, derived: bool, has_constructor: &mut bool) -> PResult<ClassElement> {
        let start = self.start();
        let mut modifiers = ElementModifiers::default();

        if self.is_token(SyntaxKind::StaticKeyword) {
            if self.peek_kind() == SyntaxKind::OpenBraceToken {
                self.next_token()?;
                return self.parse_static_block(start);
            }
            if self.is_modifier_followed_by_name() {
                modifiers.is_static = true;
                self.next_token()?;
            }
        }
        if self.is_token(SyntaxKind::AsyncKeyword)
            && self.is_modifier_followed_by_name()
            && self.peek_kind_on_same_line().is_some()
        {
            modifiers.is_async = true;
            self.next_token()?;
        }
        if self.eat(SyntaxKind::AsteriskToken)? {
            modifiers.is_generator = true;
        }
        if modifiers.is_plain()
            && matches!(self.kind(), SyntaxKind::GetKeyword | SyntaxKind::SetKeyword)
            && self.is_modifier_followed_by_name()
        {
            modifiers.accessor = Some(if self.is_token(SyntaxKind::GetKeyword) {
                MethodKind::Get
            } else {
                MethodKind::Set
            });
            self.next_token()?;
        }

        let key = self.parse_property_key(true)?;
        let name = if key.is_computed() {
            None
        } else {
            key.static_name().map(str::to_owned)
        };
        let is_private = matches!(key, PropertyKey::PrivateIdentifier(_));

        if modifiers.is_static && !is_private && name.as_deref() == Some("prototype") {
            self.tolerate_at(diagnostic_codes::STATIC_PROTOTYPE, &[], key.base())?;
        }

        if !modifiers.is_plain() || self.is_token(SyntaxKind::OpenParenToken) {
            return self.parse_class_method_element(start, key, modifiers, name, derived, has_constructor);
        }
        self.parse_class_field(start, key, modifiers.is_static, name)
    }

    fn parse_class_method_element(
        &mut self,
        start: Marker,
        key: PropertyKey,
        modifiers: ElementModifiers,
        name: Option<String>,
        derived: bool,
        has_constructor: &mut bool,
    ) -> PResult<ClassElement> {
        let is_constructor = !modifiers.is_static
            && !matches!(key, PropertyKey::PrivateIdentifier(_))
            && name.as_deref() == Some("constructor");
        let mut kind = modifiers.accessor.unwrap_or(MethodKind::Method);

        if is_constructor {
            let invalid = match kind {
                MethodKind::Get => Some("a getter"),
                MethodKind::Set => Some("a setter"),
                _ if modifiers.is_async => Some("an async method"),
                _ if modifiers.is_generator => Some("a generator"),
                _ => None,
            };
            match invalid {
                Some(what) => {
                    self.tolerate_at(diagnostic_codes::INVALID_CONSTRUCTOR_KIND, &[what], key.base())?;
                }
                None => {
                    if *has_constructor {
                        self.tolerate_at(diagnostic_codes::DUPLICATE_CONSTRUCTOR, &[], key.base())?;
                    }
                    *has_constructor = true;
                    kind = MethodKind::Constructor;
                }
            }
        }

        if let PropertyKey::PrivateIdentifier(private) = &key {
            let private_kind = match kind {
                MethodKind::Get => PrivateNameKind::Getter,
                MethodKind::Set => PrivateNameKind::Setter,
                _ => PrivateNameKind::Method,
            };
            let (name, range, position) = (private.name.clone(), private.base.range, private.base.location.start);
            self.declare_private_name(&name, private_kind, modifiers.is_static, range, position)?;
        }

        let mut extra = ContextFlags::SUPER_PROPERTY;
        if kind == MethodKind::Constructor && derived {
            extra |= ContextFlags::SUPER_CALL;
        }
        let function_kind = match kind {
            MethodKind::Get => FunctionKind::Getter,
            MethodKind::Set => FunctionKind::Setter,
            MethodKind::Constructor | MethodKind::Method => FunctionKind::Method,
        };
        let value = self.parse_class_method(function_kind, modifiers.is_async, modifiers.is_generator, extra)?;
        Ok(ClassElement::Method(Box::new(MethodDefinition {
            base: self.finish_node(NodeKind::MethodDefinition, start),
            key,
            value: Box::new(value),
            kind,
            is_static: modifiers.is_static,
        })))
    }

    fn parse_class_field(
        &mut self,
        start: Marker,
        key: PropertyKey,
        is_static: bool,
        name: Option<String>,
    ) -> PResult<ClassElement> {
        match &key {
            PropertyKey::PrivateIdentifier(private) => {
                let (name, range, position) = (private.name.clone(), private.base.range, private.base.location.start);
                self.declare_private_name(&name, PrivateNameKind::Field, is_static, range, position)?;
            }
            _ if name.as_deref() == Some("constructor") => {
                self.tolerate_at(diagnostic_codes::FIELD_NAMED_CONSTRUCTOR, &[], key.base())?;
            }
            _ => {}
        }
        let value = if self.eat(SyntaxKind::EqualsToken)? {
            let flags = ContextFlags::CLASS_FIELD | ContextFlags::SUPER_PROPERTY | ContextFlags::NEW_TARGET;
            Some(self.with_function(flags, |p| {
                p.push_scope(ScopeFlags::FUNCTION);
                p.parse_assignment_expression()
            })?)
        } else {
            None
        };
        self.consume_semicolon()?;
        Ok(ClassElement::Property(Box::new(PropertyDefinition {
            base: self.finish_node(NodeKind::PropertyDefinition, start),
            key,
            value,
            is_static,
        })))
    }

    /// `static { ... }` after `static`.
    fn parse_static_block(&mut self, start: Marker) -> PResult<ClassElement> {
        let flags = ContextFlags::CLASS_FIELD
            | ContextFlags::STATIC_BLOCK
            | ContextFlags::SUPER_PROPERTY
            | ContextFlags::NEW_TARGET;
        let (statements, hoisting) = self.with_function(flags, |p| {
            p.push_scope(ScopeFlags::STATIC_BLOCK);
            p.expect(SyntaxKind::OpenBraceToken)?;
            let body = p.parse_body_statements(
                |kind| kind == SyntaxKind::CloseBraceToken,
                false,
                StatementContext::List,
            )?;
            p.expect(SyntaxKind::CloseBraceToken)?;
            Ok((body.statements, p.pop_scope()))
        })?;
        Ok(ClassElement::StaticBlock(Box::new(StaticBlock {
            base: self.finish_node(NodeKind::StaticBlock, start),
            body: NodeList::from(statements),
            hoisting,
        })))
    }
}
