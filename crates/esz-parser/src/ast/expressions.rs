//! Expression nodes.

use esz_common::Atom;
use esz_regexp::TranslatedRegex;
use num_bigint::BigInt;

use super::{
    ArrowFunction, AssignmentOperator, BinaryOperator, Class, Function, JsxElement, JsxFragment,
    LogicalOperator, NodeBase, NodeKind, NodeList, Pattern, UnaryOperator, UpdateOperator,
};

#[derive(Debug)]
pub enum Expression {
    Identifier(Box<Identifier>),
    /// Only as the left operand of `#x in obj`.
    PrivateIdentifier(Box<PrivateIdentifier>),
    Literal(Box<Literal>),
    Template(Box<TemplateLiteral>),
    TaggedTemplate(Box<TaggedTemplate>),
    This(Box<ThisExpression>),
    Super(Box<Super>),
    Array(Box<ArrayExpression>),
    Object(Box<ObjectExpression>),
    Function(Box<Function>),
    ArrowFunction(Box<ArrowFunction>),
    Class(Box<Class>),
    Member(Box<MemberExpression>),
    Call(Box<CallExpression>),
    New(Box<NewExpression>),
    Chain(Box<ChainExpression>),
    Update(Box<UpdateExpression>),
    Unary(Box<UnaryExpression>),
    Binary(Box<BinaryExpression>),
    Logical(Box<LogicalExpression>),
    Conditional(Box<ConditionalExpression>),
    Assignment(Box<AssignmentExpression>),
    Sequence(Box<SequenceExpression>),
    Yield(Box<YieldExpression>),
    Await(Box<AwaitExpression>),
    MetaProperty(Box<MetaProperty>),
    Import(Box<ImportExpression>),
    JsxElement(Box<JsxElement>),
    JsxFragment(Box<JsxFragment>),
}

impl Expression {
    pub fn base(&self) -> &NodeBase {
        match self {
            Expression::Identifier(e) => &e.base,
            Expression::PrivateIdentifier(e) => &e.base,
            Expression::Literal(e) => &e.base,
            Expression::Template(e) => &e.base,
            Expression::TaggedTemplate(e) => &e.base,
            Expression::This(e) => &e.base,
            Expression::Super(e) => &e.base,
            Expression::Array(e) => &e.base,
            Expression::Object(e) => &e.base,
            Expression::Function(e) => &e.base,
            Expression::ArrowFunction(e) => &e.base,
            Expression::Class(e) => &e.base,
            Expression::Member(e) => &e.base,
            Expression::Call(e) => &e.base,
            Expression::New(e) => &e.base,
            Expression::Chain(e) => &e.base,
            Expression::Update(e) => &e.base,
            Expression::Unary(e) => &e.base,
            Expression::Binary(e) => &e.base,
            Expression::Logical(e) => &e.base,
            Expression::Conditional(e) => &e.base,
            Expression::Assignment(e) => &e.base,
            Expression::Sequence(e) => &e.base,
            Expression::Yield(e) => &e.base,
            Expression::Await(e) => &e.base,
            Expression::MetaProperty(e) => &e.base,
            Expression::Import(e) => &e.base,
            Expression::JsxElement(e) => &e.base,
            Expression::JsxFragment(e) => &e.base,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Expression::Identifier(_) => NodeKind::Identifier,
            Expression::PrivateIdentifier(_) => NodeKind::PrivateIdentifier,
            Expression::Literal(_) => NodeKind::Literal,
            Expression::Template(_) => NodeKind::TemplateLiteral,
            Expression::TaggedTemplate(_) => NodeKind::TaggedTemplate,
            Expression::This(_) => NodeKind::This,
            Expression::Super(_) => NodeKind::Super,
            Expression::Array(_) => NodeKind::Array,
            Expression::Object(_) => NodeKind::Object,
            Expression::Function(_) => NodeKind::Function,
            Expression::ArrowFunction(_) => NodeKind::ArrowFunction,
            Expression::Class(_) => NodeKind::Class,
            Expression::Member(_) => NodeKind::Member,
            Expression::Call(_) => NodeKind::Call,
            Expression::New(_) => NodeKind::New,
            Expression::Chain(_) => NodeKind::Chain,
            Expression::Update(_) => NodeKind::Update,
            Expression::Unary(_) => NodeKind::Unary,
            Expression::Binary(_) => NodeKind::Binary,
            Expression::Logical(_) => NodeKind::Logical,
            Expression::Conditional(_) => NodeKind::Conditional,
            Expression::Assignment(_) => NodeKind::Assignment,
            Expression::Sequence(_) => NodeKind::Sequence,
            Expression::Yield(_) => NodeKind::Yield,
            Expression::Await(_) => NodeKind::Await,
            Expression::MetaProperty(_) => NodeKind::MetaProperty,
            Expression::Import(_) => NodeKind::Import,
            Expression::JsxElement(_) => NodeKind::JsxElement,
            Expression::JsxFragment(_) => NodeKind::JsxFragment,
        }
    }

    pub fn range(&self) -> esz_common::Range {
        self.base().range
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Expression::Identifier(id) => Some(id),
            _ => None,
        }
    }
}

// =============================================================================
// Names and literals
// =============================================================================

#[derive(Debug)]
pub struct Identifier {
    pub base: NodeBase,
    /// Name with escapes decoded.
    pub name: Atom,
}

/// `#name`; `name` excludes the `#`.
#[derive(Debug)]
pub struct PrivateIdentifier {
    pub base: NodeBase,
    pub name: Atom,
}

#[derive(Debug)]
pub struct RegExpLiteral {
    pub pattern: Atom,
    pub flags: Atom,
    /// Present when translation was requested and succeeded.
    pub translated: Option<Box<TranslatedRegex>>,
}

#[derive(Debug)]
pub enum LiteralValue {
    Null,
    Boolean(bool),
    Number(f64),
    BigInt(BigInt),
    String(Atom),
    RegExp(RegExpLiteral),
}

#[derive(Debug)]
pub struct Literal {
    pub base: NodeBase,
    pub value: LiteralValue,
    /// Source text of the literal.
    pub raw: Atom,
}

impl Literal {
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            LiteralValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.value {
            LiteralValue::Number(n) => Some(n),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct TemplateElement {
    pub base: NodeBase,
    /// `None` in a tagged template chunk with an invalid escape.
    pub cooked: Option<Atom>,
    pub raw: Atom,
    pub tail: bool,
}

#[derive(Debug)]
pub struct TemplateLiteral {
    pub base: NodeBase,
    pub quasis: NodeList<TemplateElement>,
    pub expressions: NodeList<Expression>,
}

#[derive(Debug)]
pub struct TaggedTemplate {
    pub base: NodeBase,
    pub tag: Expression,
    pub quasi: TemplateLiteral,
}

#[derive(Debug)]
pub struct ThisExpression {
    pub base: NodeBase,
}

#[derive(Debug)]
pub struct Super {
    pub base: NodeBase,
}

// =============================================================================
// Array and object literals
// =============================================================================

#[derive(Debug)]
pub struct SpreadElement {
    pub base: NodeBase,
    pub argument: Expression,
}

#[derive(Debug)]
pub enum ArrayElement {
    Expression(Expression),
    Spread(Box<SpreadElement>),
    /// Elision, as in `[a, , b]`.
    Hole,
}

#[derive(Debug)]
pub struct ArrayExpression {
    pub base: NodeBase,
    pub elements: NodeList<ArrayElement>,
}

#[derive(Debug)]
pub enum PropertyKey {
    Identifier(Box<Identifier>),
    PrivateIdentifier(Box<PrivateIdentifier>),
    Literal(Box<Literal>),
    Computed(Expression),
}

impl PropertyKey {
    pub fn is_computed(&self) -> bool {
        matches!(self, PropertyKey::Computed(_))
    }

    /// Static name of an identifier, string or numeric key.
    pub fn static_name(&self) -> Option<&str> {
        match self {
            PropertyKey::Identifier(id) => Some(id.name.as_str()),
            PropertyKey::Literal(lit) => match &lit.value {
                LiteralValue::String(s) => Some(s.as_str()),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn base(&self) -> &NodeBase {
        match self {
            PropertyKey::Identifier(id) => &id.base,
            PropertyKey::PrivateIdentifier(id) => &id.base,
            PropertyKey::Literal(lit) => &lit.base,
            PropertyKey::Computed(expr) => expr.base(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

#[derive(Debug)]
pub struct Property {
    pub base: NodeBase,
    pub key: PropertyKey,
    pub value: Expression,
    pub kind: PropertyKind,
    pub method: bool,
    pub shorthand: bool,
}

#[derive(Debug)]
pub enum ObjectMember {
    Property(Box<Property>),
    Spread(Box<SpreadElement>),
}

#[derive(Debug)]
pub struct ObjectExpression {
    pub base: NodeBase,
    pub properties: NodeList<ObjectMember>,
}

// =============================================================================
// Member access and calls
// =============================================================================

#[derive(Debug)]
pub enum MemberProperty {
    Identifier(Box<Identifier>),
    PrivateIdentifier(Box<PrivateIdentifier>),
    Computed(Expression),
}

#[derive(Debug)]
pub struct MemberExpression {
    pub base: NodeBase,
    pub object: Expression,
    pub property: MemberProperty,
    /// Written `?.`.
    pub optional: bool,
}

impl MemberExpression {
    pub fn is_computed(&self) -> bool {
        matches!(self.property, MemberProperty::Computed(_))
    }
}

#[derive(Debug)]
pub enum Argument {
    Expression(Expression),
    Spread(Box<SpreadElement>),
}

#[derive(Debug)]
pub struct CallExpression {
    pub base: NodeBase,
    pub callee: Expression,
    pub arguments: NodeList<Argument>,
    pub optional: bool,
}

#[derive(Debug)]
pub struct NewExpression {
    pub base: NodeBase,
    pub callee: Expression,
    pub arguments: NodeList<Argument>,
}

/// Wraps an optional chain such as `a?.b.c()`.
#[derive(Debug)]
pub struct ChainExpression {
    pub base: NodeBase,
    pub expression: Expression,
}

// =============================================================================
// Operators
// =============================================================================

#[derive(Debug)]
pub struct UpdateExpression {
    pub base: NodeBase,
    pub operator: UpdateOperator,
    pub prefix: bool,
    pub argument: Expression,
}

#[derive(Debug)]
pub struct UnaryExpression {
    pub base: NodeBase,
    pub operator: UnaryOperator,
    pub argument: Expression,
}

#[derive(Debug)]
pub struct BinaryExpression {
    pub base: NodeBase,
    pub operator: BinaryOperator,
    pub left: Expression,
    pub right: Expression,
}

#[derive(Debug)]
pub struct LogicalExpression {
    pub base: NodeBase,
    pub operator: LogicalOperator,
    pub left: Expression,
    pub right: Expression,
}

#[derive(Debug)]
pub struct ConditionalExpression {
    pub base: NodeBase,
    pub test: Expression,
    pub consequent: Expression,
    pub alternate: Expression,
}

#[derive(Debug)]
pub struct AssignmentExpression {
    pub base: NodeBase,
    pub operator: AssignmentOperator,
    pub left: Pattern,
    pub right: Expression,
}

#[derive(Debug)]
pub struct SequenceExpression {
    pub base: NodeBase,
    pub expressions: NodeList<Expression>,
}

#[derive(Debug)]
pub struct YieldExpression {
    pub base: NodeBase,
    pub argument: Option<Expression>,
    pub delegate: bool,
}

#[derive(Debug)]
pub struct AwaitExpression {
    pub base: NodeBase,
    pub argument: Expression,
}

/// `new.target` or `import.meta`.
#[derive(Debug)]
pub struct MetaProperty {
    pub base: NodeBase,
    pub meta: Identifier,
    pub property: Identifier,
}

/// Dynamic `import(source, options?)`.
#[derive(Debug)]
pub struct ImportExpression {
    pub base: NodeBase,
    pub source: Expression,
    pub options: Option<Expression>,
}
