//! JSX nodes.

use esz_common::Atom;

use super::{Expression, Literal, NodeBase, NodeList};

#[derive(Debug)]
pub struct JsxIdentifier {
    pub base: NodeBase,
    pub name: Atom,
}

/// `ns:name`.
#[derive(Debug)]
pub struct JsxNamespacedName {
    pub base: NodeBase,
    pub namespace: JsxIdentifier,
    pub name: JsxIdentifier,
}

#[derive(Debug)]
pub enum JsxMemberObject {
    Identifier(Box<JsxIdentifier>),
    Member(Box<JsxMemberExpression>),
}

/// `a.b.c` as a tag name.
#[derive(Debug)]
pub struct JsxMemberExpression {
    pub base: NodeBase,
    pub object: JsxMemberObject,
    pub property: JsxIdentifier,
}

#[derive(Debug)]
pub enum JsxElementName {
    Identifier(Box<JsxIdentifier>),
    Namespaced(Box<JsxNamespacedName>),
    Member(Box<JsxMemberExpression>),
}

impl JsxElementName {
    pub fn base(&self) -> &NodeBase {
        match self {
            JsxElementName::Identifier(id) => &id.base,
            JsxElementName::Namespaced(ns) => &ns.base,
            JsxElementName::Member(member) => &member.base,
        }
    }

    /// Tag name as written, used to match opening and closing tags.
    pub fn qualified_name(&self) -> String {
        match self {
            JsxElementName::Identifier(id) => id.name.to_string(),
            JsxElementName::Namespaced(ns) => format!("{}:{}", ns.namespace.name, ns.name.name),
            JsxElementName::Member(member) => member_name(member),
        }
    }
}

fn member_name(member: &JsxMemberExpression) -> String {
    let object = match &member.object {
        JsxMemberObject::Identifier(id) => id.name.to_string(),
        JsxMemberObject::Member(inner) => member_name(inner),
    };
    format!("{object}.{}", member.property.name)
}

#[derive(Debug)]
pub struct JsxEmptyExpression {
    pub base: NodeBase,
}

#[derive(Debug)]
pub enum JsxExpression {
    Expression(Expression),
    Empty(Box<JsxEmptyExpression>),
}

/// `{ expression }` in an attribute value or among children.
#[derive(Debug)]
pub struct JsxExpressionContainer {
    pub base: NodeBase,
    pub expression: JsxExpression,
}

#[derive(Debug)]
pub enum JsxAttributeName {
    Identifier(Box<JsxIdentifier>),
    Namespaced(Box<JsxNamespacedName>),
}

#[derive(Debug)]
pub enum JsxAttributeValue {
    Literal(Box<Literal>),
    ExpressionContainer(Box<JsxExpressionContainer>),
    Element(Box<JsxElement>),
    Fragment(Box<JsxFragment>),
}

#[derive(Debug)]
pub struct JsxAttribute {
    pub base: NodeBase,
    pub name: JsxAttributeName,
    pub value: Option<JsxAttributeValue>,
}

/// `{...props}` in an opening tag.
#[derive(Debug)]
pub struct JsxSpreadAttribute {
    pub base: NodeBase,
    pub argument: Expression,
}

#[derive(Debug)]
pub enum JsxAttributeItem {
    Attribute(Box<JsxAttribute>),
    Spread(Box<JsxSpreadAttribute>),
}

#[derive(Debug)]
pub struct JsxOpeningElement {
    pub base: NodeBase,
    pub name: JsxElementName,
    pub attributes: NodeList<JsxAttributeItem>,
    pub self_closing: bool,
}

#[derive(Debug)]
pub struct JsxClosingElement {
    pub base: NodeBase,
    pub name: JsxElementName,
}

#[derive(Debug)]
pub struct JsxOpeningFragment {
    pub base: NodeBase,
}

#[derive(Debug)]
pub struct JsxClosingFragment {
    pub base: NodeBase,
}

/// Text between tags with HTML entities decoded.
#[derive(Debug)]
pub struct JsxText {
    pub base: NodeBase,
    pub value: Atom,
    pub raw: Atom,
}

#[derive(Debug)]
pub enum JsxChild {
    Text(Box<JsxText>),
    Element(Box<JsxElement>),
    Fragment(Box<JsxFragment>),
    ExpressionContainer(Box<JsxExpressionContainer>),
}

#[derive(Debug)]
pub struct JsxElement {
    pub base: NodeBase,
    pub opening: JsxOpeningElement,
    pub children: NodeList<JsxChild>,
    /// `None` for a self-closing element.
    pub closing: Option<JsxClosingElement>,
}

#[derive(Debug)]
pub struct JsxFragment {
    pub base: NodeBase,
    pub opening: JsxOpeningFragment,
    pub children: NodeList<JsxChild>,
    pub closing: JsxClosingFragment,
}
