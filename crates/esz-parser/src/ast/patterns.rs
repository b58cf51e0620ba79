//! Binding and assignment patterns.

use super::{Expression, Identifier, MemberExpression, NodeBase, NodeKind, NodeList, PropertyKey};

#[derive(Debug)]
pub enum Pattern {
    Identifier(Box<Identifier>),
    /// Only in assignment targets, never in bindings.
    Member(Box<MemberExpression>),
    Object(Box<ObjectPattern>),
    Array(Box<ArrayPattern>),
    Assignment(Box<AssignmentPattern>),
    Rest(Box<RestElement>),
}

impl Pattern {
    pub fn base(&self) -> &NodeBase {
        match self {
            Pattern::Identifier(p) => &p.base,
            Pattern::Member(p) => &p.base,
            Pattern::Object(p) => &p.base,
            Pattern::Array(p) => &p.base,
            Pattern::Assignment(p) => &p.base,
            Pattern::Rest(p) => &p.base,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Pattern::Identifier(_) => NodeKind::Identifier,
            Pattern::Member(_) => NodeKind::Member,
            Pattern::Object(_) => NodeKind::ObjectPattern,
            Pattern::Array(_) => NodeKind::ArrayPattern,
            Pattern::Assignment(_) => NodeKind::AssignmentPattern,
            Pattern::Rest(_) => NodeKind::RestElement,
        }
    }

    /// Identifiers bound by this pattern, in source order.
    pub fn bound_names<'a>(&'a self, out: &mut Vec<&'a Identifier>) {
        match self {
            Pattern::Identifier(id) => out.push(id),
            Pattern::Member(_) => {}
            Pattern::Object(object) => {
                for property in &object.properties {
                    match property {
                        ObjectPatternProperty::Property(p) => p.value.bound_names(out),
                        ObjectPatternProperty::Rest(rest) => rest.argument.bound_names(out),
                    }
                }
            }
            Pattern::Array(array) => {
                for element in array.elements.iter().flatten() {
                    element.bound_names(out);
                }
            }
            Pattern::Assignment(assign) => assign.left.bound_names(out),
            Pattern::Rest(rest) => rest.argument.bound_names(out),
        }
    }
}

/// `key: value` or shorthand `key` inside an object pattern.
#[derive(Debug)]
pub struct AssignmentProperty {
    pub base: NodeBase,
    pub key: PropertyKey,
    pub value: Pattern,
    pub shorthand: bool,
}

#[derive(Debug)]
pub enum ObjectPatternProperty {
    Property(Box<AssignmentProperty>),
    Rest(Box<RestElement>),
}

#[derive(Debug)]
pub struct ObjectPattern {
    pub base: NodeBase,
    pub properties: NodeList<ObjectPatternProperty>,
}

#[derive(Debug)]
pub struct ArrayPattern {
    pub base: NodeBase,
    /// `None` marks an elision.
    pub elements: NodeList<Option<Pattern>>,
}

#[derive(Debug)]
pub struct AssignmentPattern {
    pub base: NodeBase,
    pub left: Pattern,
    pub right: Expression,
}

#[derive(Debug)]
pub struct RestElement {
    pub base: NodeBase,
    pub argument: Pattern,
}
