//! Uniform borrowed view over tree nodes.
//!
//! `NodeRef` has one variant per node struct. It is the only place that knows
//! the child order of every node; tree walkers and consumers go through
//! [`NodeRef::for_each_child`] / [`NodeRef::children`].

use smallvec::SmallVec;

use super::*;

type Visit<'v, 'a> = &'v mut dyn FnMut(NodeRef<'a>);

#[derive(Clone, Copy, Debug)]
pub enum NodeRef<'a> {
    Script(&'a Script),
    Module(&'a Module),

    Block(&'a BlockStatement),
    Empty(&'a EmptyStatement),
    ExpressionStatement(&'a ExpressionStatement),
    Directive(&'a Directive),
    If(&'a IfStatement),
    Labeled(&'a LabeledStatement),
    Break(&'a BreakStatement),
    Continue(&'a ContinueStatement),
    With(&'a WithStatement),
    Switch(&'a SwitchStatement),
    SwitchCase(&'a SwitchCase),
    Return(&'a ReturnStatement),
    Throw(&'a ThrowStatement),
    Try(&'a TryStatement),
    CatchClause(&'a CatchClause),
    While(&'a WhileStatement),
    DoWhile(&'a DoWhileStatement),
    For(&'a ForStatement),
    ForIn(&'a ForInStatement),
    ForOf(&'a ForOfStatement),
    Debugger(&'a DebuggerStatement),
    VariableDeclaration(&'a VariableDeclaration),
    VariableDeclarator(&'a VariableDeclarator),
    FunctionDeclaration(&'a Function),
    ClassDeclaration(&'a Class),

    ImportDeclaration(&'a ImportDeclaration),
    ImportSpecifier(&'a ImportSpecifier),
    ImportDefaultSpecifier(&'a ImportDefaultSpecifier),
    ImportNamespaceSpecifier(&'a ImportNamespaceSpecifier),
    ImportAttribute(&'a ImportAttribute),
    ExportNamedDeclaration(&'a ExportNamedDeclaration),
    ExportDefaultDeclaration(&'a ExportDefaultDeclaration),
    ExportAllDeclaration(&'a ExportAllDeclaration),
    ExportSpecifier(&'a ExportSpecifier),

    Identifier(&'a Identifier),
    PrivateIdentifier(&'a PrivateIdentifier),
    Literal(&'a Literal),
    TemplateLiteral(&'a TemplateLiteral),
    TemplateElement(&'a TemplateElement),
    TaggedTemplate(&'a TaggedTemplate),
    This(&'a ThisExpression),
    Super(&'a Super),
    Array(&'a ArrayExpression),
    Object(&'a ObjectExpression),
    Property(&'a Property),
    Spread(&'a SpreadElement),
    Function(&'a Function),
    ArrowFunction(&'a ArrowFunction),
    Class(&'a Class),
    Member(&'a MemberExpression),
    Call(&'a CallExpression),
    New(&'a NewExpression),
    Chain(&'a ChainExpression),
    Update(&'a UpdateExpression),
    Unary(&'a UnaryExpression),
    Binary(&'a BinaryExpression),
    Logical(&'a LogicalExpression),
    Conditional(&'a ConditionalExpression),
    Assignment(&'a AssignmentExpression),
    Sequence(&'a SequenceExpression),
    Yield(&'a YieldExpression),
    Await(&'a AwaitExpression),
    MetaProperty(&'a MetaProperty),
    Import(&'a ImportExpression),
    FunctionBody(&'a FunctionBody),

    ArrayPattern(&'a ArrayPattern),
    ObjectPattern(&'a ObjectPattern),
    AssignmentProperty(&'a AssignmentProperty),
    AssignmentPattern(&'a AssignmentPattern),
    RestElement(&'a RestElement),

    ClassBody(&'a ClassBody),
    MethodDefinition(&'a MethodDefinition),
    PropertyDefinition(&'a PropertyDefinition),
    StaticBlock(&'a StaticBlock),

    JsxElement(&'a JsxElement),
    JsxFragment(&'a JsxFragment),
    JsxOpeningElement(&'a JsxOpeningElement),
    JsxClosingElement(&'a JsxClosingElement),
    JsxOpeningFragment(&'a JsxOpeningFragment),
    JsxClosingFragment(&'a JsxClosingFragment),
    JsxAttribute(&'a JsxAttribute),
    JsxSpreadAttribute(&'a JsxSpreadAttribute),
    JsxExpressionContainer(&'a JsxExpressionContainer),
    JsxEmptyExpression(&'a JsxEmptyExpression),
    JsxText(&'a JsxText),
    JsxIdentifier(&'a JsxIdentifier),
    JsxMemberExpression(&'a JsxMemberExpression),
    JsxNamespacedName(&'a JsxNamespacedName),
}

impl<'a> NodeRef<'a> {
    pub fn kind(self) -> NodeKind {
        match self {
            NodeRef::Script(_) => NodeKind::Script,
            NodeRef::Module(_) => NodeKind::Module,
            NodeRef::Block(_) => NodeKind::Block,
            NodeRef::Empty(_) => NodeKind::Empty,
            NodeRef::ExpressionStatement(_) => NodeKind::Expression,
            NodeRef::Directive(_) => NodeKind::Directive,
            NodeRef::If(_) => NodeKind::If,
            NodeRef::Labeled(_) => NodeKind::Labeled,
            NodeRef::Break(_) => NodeKind::Break,
            NodeRef::Continue(_) => NodeKind::Continue,
            NodeRef::With(_) => NodeKind::With,
            NodeRef::Switch(_) => NodeKind::Switch,
            NodeRef::SwitchCase(_) => NodeKind::SwitchCase,
            NodeRef::Return(_) => NodeKind::Return,
            NodeRef::Throw(_) => NodeKind::Throw,
            NodeRef::Try(_) => NodeKind::Try,
            NodeRef::CatchClause(_) => NodeKind::CatchClause,
            NodeRef::While(_) => NodeKind::While,
            NodeRef::DoWhile(_) => NodeKind::DoWhile,
            NodeRef::For(_) => NodeKind::For,
            NodeRef::ForIn(_) => NodeKind::ForIn,
            NodeRef::ForOf(_) => NodeKind::ForOf,
            NodeRef::Debugger(_) => NodeKind::Debugger,
            NodeRef::VariableDeclaration(_) => NodeKind::VariableDeclaration,
            NodeRef::VariableDeclarator(_) => NodeKind::VariableDeclarator,
            NodeRef::FunctionDeclaration(_) => NodeKind::FunctionDeclaration,
            NodeRef::ClassDeclaration(_) => NodeKind::ClassDeclaration,
            NodeRef::ImportDeclaration(_) => NodeKind::ImportDeclaration,
            NodeRef::ImportSpecifier(_) => NodeKind::ImportSpecifier,
            NodeRef::ImportDefaultSpecifier(_) => NodeKind::ImportDefaultSpecifier,
            NodeRef::ImportNamespaceSpecifier(_) => NodeKind::ImportNamespaceSpecifier,
            NodeRef::ImportAttribute(_) => NodeKind::ImportAttribute,
            NodeRef::ExportNamedDeclaration(_) => NodeKind::ExportNamedDeclaration,
            NodeRef::ExportDefaultDeclaration(_) => NodeKind::ExportDefaultDeclaration,
            NodeRef::ExportAllDeclaration(_) => NodeKind::ExportAllDeclaration,
            NodeRef::ExportSpecifier(_) => NodeKind::ExportSpecifier,
            NodeRef::Identifier(_) => NodeKind::Identifier,
            NodeRef::PrivateIdentifier(_) => NodeKind::PrivateIdentifier,
            NodeRef::Literal(_) => NodeKind::Literal,
            NodeRef::TemplateLiteral(_) => NodeKind::TemplateLiteral,
            NodeRef::TemplateElement(_) => NodeKind::TemplateElement,
            NodeRef::TaggedTemplate(_) => NodeKind::TaggedTemplate,
            NodeRef::This(_) => NodeKind::This,
            NodeRef::Super(_) => NodeKind::Super,
            NodeRef::Array(_) => NodeKind::Array,
            NodeRef::Object(_) => NodeKind::Object,
            NodeRef::Property(_) | NodeRef::AssignmentProperty(_) => NodeKind::Property,
            NodeRef::Spread(_) => NodeKind::Spread,
            NodeRef::Function(_) => NodeKind::Function,
            NodeRef::ArrowFunction(_) => NodeKind::ArrowFunction,
            NodeRef::Class(_) => NodeKind::Class,
            NodeRef::Member(_) => NodeKind::Member,
            NodeRef::Call(_) => NodeKind::Call,
            NodeRef::New(_) => NodeKind::New,
            NodeRef::Chain(_) => NodeKind::Chain,
            NodeRef::Update(_) => NodeKind::Update,
            NodeRef::Unary(_) => NodeKind::Unary,
            NodeRef::Binary(_) => NodeKind::Binary,
            NodeRef::Logical(_) => NodeKind::Logical,
            NodeRef::Conditional(_) => NodeKind::Conditional,
            NodeRef::Assignment(_) => NodeKind::Assignment,
            NodeRef::Sequence(_) => NodeKind::Sequence,
            NodeRef::Yield(_) => NodeKind::Yield,
            NodeRef::Await(_) => NodeKind::Await,
            NodeRef::MetaProperty(_) => NodeKind::MetaProperty,
            NodeRef::Import(_) => NodeKind::Import,
            NodeRef::FunctionBody(_) => NodeKind::FunctionBody,
            NodeRef::ArrayPattern(_) => NodeKind::ArrayPattern,
            NodeRef::ObjectPattern(_) => NodeKind::ObjectPattern,
            NodeRef::AssignmentPattern(_) => NodeKind::AssignmentPattern,
            NodeRef::RestElement(_) => NodeKind::RestElement,
            NodeRef::ClassBody(_) => NodeKind::ClassBody,
            NodeRef::MethodDefinition(_) => NodeKind::MethodDefinition,
            NodeRef::PropertyDefinition(_) => NodeKind::PropertyDefinition,
            NodeRef::StaticBlock(_) => NodeKind::StaticBlock,
            NodeRef::JsxElement(_) => NodeKind::JsxElement,
            NodeRef::JsxFragment(_) => NodeKind::JsxFragment,
            NodeRef::JsxOpeningElement(_) => NodeKind::JsxOpeningElement,
            NodeRef::JsxClosingElement(_) => NodeKind::JsxClosingElement,
            NodeRef::JsxOpeningFragment(_) => NodeKind::JsxOpeningFragment,
            NodeRef::JsxClosingFragment(_) => NodeKind::JsxClosingFragment,
            NodeRef::JsxAttribute(_) => NodeKind::JsxAttribute,
            NodeRef::JsxSpreadAttribute(_) => NodeKind::JsxSpreadAttribute,
            NodeRef::JsxExpressionContainer(_) => NodeKind::JsxExpressionContainer,
            NodeRef::JsxEmptyExpression(_) => NodeKind::JsxEmptyExpression,
            NodeRef::JsxText(_) => NodeKind::JsxText,
            NodeRef::JsxIdentifier(_) => NodeKind::JsxIdentifier,
            NodeRef::JsxMemberExpression(_) => NodeKind::JsxMemberExpression,
            NodeRef::JsxNamespacedName(_) => NodeKind::JsxNamespacedName,
        }
    }

    pub fn base(self) -> &'a NodeBase {
        match self {
            NodeRef::Script(n) => &n.base,
            NodeRef::Module(n) => &n.base,
            NodeRef::Block(n) => &n.base,
            NodeRef::Empty(n) => &n.base,
            NodeRef::ExpressionStatement(n) => &n.base,
            NodeRef::Directive(n) => &n.base,
            NodeRef::If(n) => &n.base,
            NodeRef::Labeled(n) => &n.base,
            NodeRef::Break(n) => &n.base,
            NodeRef::Continue(n) => &n.base,
            NodeRef::With(n) => &n.base,
            NodeRef::Switch(n) => &n.base,
            NodeRef::SwitchCase(n) => &n.base,
            NodeRef::Return(n) => &n.base,
            NodeRef::Throw(n) => &n.base,
            NodeRef::Try(n) => &n.base,
            NodeRef::CatchClause(n) => &n.base,
            NodeRef::While(n) => &n.base,
            NodeRef::DoWhile(n) => &n.base,
            NodeRef::For(n) => &n.base,
            NodeRef::ForIn(n) => &n.base,
            NodeRef::ForOf(n) => &n.base,
            NodeRef::Debugger(n) => &n.base,
            NodeRef::VariableDeclaration(n) => &n.base,
            NodeRef::VariableDeclarator(n) => &n.base,
            NodeRef::FunctionDeclaration(n) | NodeRef::Function(n) => &n.base,
            NodeRef::ClassDeclaration(n) | NodeRef::Class(n) => &n.base,
            NodeRef::ImportDeclaration(n) => &n.base,
            NodeRef::ImportSpecifier(n) => &n.base,
            NodeRef::ImportDefaultSpecifier(n) => &n.base,
            NodeRef::ImportNamespaceSpecifier(n) => &n.base,
            NodeRef::ImportAttribute(n) => &n.base,
            NodeRef::ExportNamedDeclaration(n) => &n.base,
            NodeRef::ExportDefaultDeclaration(n) => &n.base,
            NodeRef::ExportAllDeclaration(n) => &n.base,
            NodeRef::ExportSpecifier(n) => &n.base,
            NodeRef::Identifier(n) => &n.base,
            NodeRef::PrivateIdentifier(n) => &n.base,
            NodeRef::Literal(n) => &n.base,
            NodeRef::TemplateLiteral(n) => &n.base,
            NodeRef::TemplateElement(n) => &n.base,
            NodeRef::TaggedTemplate(n) => &n.base,
            NodeRef::This(n) => &n.base,
            NodeRef::Super(n) => &n.base,
            NodeRef::Array(n) => &n.base,
            NodeRef::Object(n) => &n.base,
            NodeRef::Property(n) => &n.base,
            NodeRef::Spread(n) => &n.base,
            NodeRef::ArrowFunction(n) => &n.base,
            NodeRef::Member(n) => &n.base,
            NodeRef::Call(n) => &n.base,
            NodeRef::New(n) => &n.base,
            NodeRef::Chain(n) => &n.base,
            NodeRef::Update(n) => &n.base,
            NodeRef::Unary(n) => &n.base,
            NodeRef::Binary(n) => &n.base,
            NodeRef::Logical(n) => &n.base,
            NodeRef::Conditional(n) => &n.base,
            NodeRef::Assignment(n) => &n.base,
            NodeRef::Sequence(n) => &n.base,
            NodeRef::Yield(n) => &n.base,
            NodeRef::Await(n) => &n.base,
            NodeRef::MetaProperty(n) => &n.base,
            NodeRef::Import(n) => &n.base,
            NodeRef::FunctionBody(n) => &n.base,
            NodeRef::ArrayPattern(n) => &n.base,
            NodeRef::ObjectPattern(n) => &n.base,
            NodeRef::AssignmentProperty(n) => &n.base,
            NodeRef::AssignmentPattern(n) => &n.base,
            NodeRef::RestElement(n) => &n.base,
            NodeRef::ClassBody(n) => &n.base,
            NodeRef::MethodDefinition(n) => &n.base,
            NodeRef::PropertyDefinition(n) => &n.base,
            NodeRef::StaticBlock(n) => &n.base,
            NodeRef::JsxElement(n) => &n.base,
            NodeRef::JsxFragment(n) => &n.base,
            NodeRef::JsxOpeningElement(n) => &n.base,
            NodeRef::JsxClosingElement(n) => &n.base,
            NodeRef::JsxOpeningFragment(n) => &n.base,
            NodeRef::JsxClosingFragment(n) => &n.base,
            NodeRef::JsxAttribute(n) => &n.base,
            NodeRef::JsxSpreadAttribute(n) => &n.base,
            NodeRef::JsxExpressionContainer(n) => &n.base,
            NodeRef::JsxEmptyExpression(n) => &n.base,
            NodeRef::JsxText(n) => &n.base,
            NodeRef::JsxIdentifier(n) => &n.base,
            NodeRef::JsxMemberExpression(n) => &n.base,
            NodeRef::JsxNamespacedName(n) => &n.base,
        }
    }

    pub fn range(self) -> esz_common::Range {
        self.base().range
    }

    /// Direct children in source order. Absent optional children are skipped.
    pub fn children(self) -> SmallVec<[NodeRef<'a>; 4]> {
        let mut out = SmallVec::new();
        self.for_each_child(|child| out.push(child));
        out
    }

    /// Kinds of this node and all its descendants, depth-first pre-order.
    pub fn descendants_kinds(self) -> Vec<NodeKind> {
        let mut kinds = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            kinds.push(node.kind());
            let mut children = node.children();
            children.reverse();
            stack.extend(children);
        }
        kinds
    }

    pub fn for_each_child<F: FnMut(NodeRef<'a>)>(self, mut f: F) {
        self.visit_children(&mut f);
    }

    fn visit_children(self, f: Visit<'_, 'a>) {
        match self {
            NodeRef::Script(n) => statements(&n.body, f),
            NodeRef::Module(n) => statements(&n.body, f),
            NodeRef::Block(n) => statements(&n.body, f),
            NodeRef::Empty(_) | NodeRef::Debugger(_) => {}
            NodeRef::ExpressionStatement(n) => f((&n.expression).into()),
            NodeRef::Directive(n) => f(NodeRef::Literal(&n.expression)),
            NodeRef::If(n) => {
                f((&n.test).into());
                f((&n.consequent).into());
                if let Some(alternate) = &n.alternate {
                    f(alternate.into());
                }
            }
            NodeRef::Labeled(n) => {
                f(NodeRef::Identifier(&n.label));
                f((&n.body).into());
            }
            NodeRef::Break(n) => {
                if let Some(label) = &n.label {
                    f(NodeRef::Identifier(label));
                }
            }
            NodeRef::Continue(n) => {
                if let Some(label) = &n.label {
                    f(NodeRef::Identifier(label));
                }
            }
            NodeRef::With(n) => {
                f((&n.object).into());
                f((&n.body).into());
            }
            NodeRef::Switch(n) => {
                f((&n.discriminant).into());
                for case in &n.cases {
                    f(NodeRef::SwitchCase(case));
                }
            }
            NodeRef::SwitchCase(n) => {
                if let Some(test) = &n.test {
                    f(test.into());
                }
                statements(&n.consequent, f);
            }
            NodeRef::Return(n) => {
                if let Some(argument) = &n.argument {
                    f(argument.into());
                }
            }
            NodeRef::Throw(n) => f((&n.argument).into()),
            NodeRef::Try(n) => {
                f(NodeRef::Block(&n.block));
                if let Some(handler) = &n.handler {
                    f(NodeRef::CatchClause(handler));
                }
                if let Some(finalizer) = &n.finalizer {
                    f(NodeRef::Block(finalizer));
                }
            }
            NodeRef::CatchClause(n) => {
                if let Some(param) = &n.param {
                    f(param.into());
                }
                f(NodeRef::Block(&n.body));
            }
            NodeRef::While(n) => {
                f((&n.test).into());
                f((&n.body).into());
            }
            NodeRef::DoWhile(n) => {
                f((&n.body).into());
                f((&n.test).into());
            }
            NodeRef::For(n) => {
                match &n.init {
                    Some(ForInit::VariableDeclaration(decl)) => f(NodeRef::VariableDeclaration(decl)),
                    Some(ForInit::Expression(expr)) => f(expr.into()),
                    None => {}
                }
                if let Some(test) = &n.test {
                    f(test.into());
                }
                if let Some(update) = &n.update {
                    f(update.into());
                }
                f((&n.body).into());
            }
            NodeRef::ForIn(n) => {
                for_head(&n.left, f);
                f((&n.right).into());
                f((&n.body).into());
            }
            NodeRef::ForOf(n) => {
                for_head(&n.left, f);
                f((&n.right).into());
                f((&n.body).into());
            }
            NodeRef::VariableDeclaration(n) => {
                for declarator in &n.declarations {
                    f(NodeRef::VariableDeclarator(declarator));
                }
            }
            NodeRef::VariableDeclarator(n) => {
                f((&n.id).into());
                if let Some(init) = &n.init {
                    f(init.into());
                }
            }
            NodeRef::FunctionDeclaration(n) | NodeRef::Function(n) => {
                if let Some(id) = &n.id {
                    f(NodeRef::Identifier(id));
                }
                for param in &n.params {
                    f(param.into());
                }
                f(NodeRef::FunctionBody(&n.body));
            }
            NodeRef::ClassDeclaration(n) | NodeRef::Class(n) => {
                if let Some(id) = &n.id {
                    f(NodeRef::Identifier(id));
                }
                if let Some(super_class) = &n.super_class {
                    f(super_class.into());
                }
                f(NodeRef::ClassBody(&n.body));
            }

            NodeRef::ImportDeclaration(n) => {
                for specifier in &n.specifiers {
                    f(match specifier {
                        ImportClause::Default(s) => NodeRef::ImportDefaultSpecifier(s),
                        ImportClause::Namespace(s) => NodeRef::ImportNamespaceSpecifier(s),
                        ImportClause::Named(s) => NodeRef::ImportSpecifier(s),
                    });
                }
                f(NodeRef::Literal(&n.source));
                attributes(&n.attributes, f);
            }
            NodeRef::ImportSpecifier(n) => {
                f((&n.imported).into());
                f(NodeRef::Identifier(&n.local));
            }
            NodeRef::ImportDefaultSpecifier(n) => f(NodeRef::Identifier(&n.local)),
            NodeRef::ImportNamespaceSpecifier(n) => f(NodeRef::Identifier(&n.local)),
            NodeRef::ImportAttribute(n) => {
                f((&n.key).into());
                f(NodeRef::Literal(&n.value));
            }
            NodeRef::ExportNamedDeclaration(n) => {
                if let Some(declaration) = &n.declaration {
                    f(declaration.into());
                }
                for specifier in &n.specifiers {
                    f(NodeRef::ExportSpecifier(specifier));
                }
                if let Some(source) = &n.source {
                    f(NodeRef::Literal(source));
                }
                attributes(&n.attributes, f);
            }
            NodeRef::ExportDefaultDeclaration(n) => f(match &n.declaration {
                ExportDefaultKind::Function(function) => NodeRef::FunctionDeclaration(function),
                ExportDefaultKind::Class(class) => NodeRef::ClassDeclaration(class),
                ExportDefaultKind::Expression(expr) => expr.into(),
            }),
            NodeRef::ExportAllDeclaration(n) => {
                if let Some(exported) = &n.exported {
                    f(exported.into());
                }
                f(NodeRef::Literal(&n.source));
                attributes(&n.attributes, f);
            }
            NodeRef::ExportSpecifier(n) => {
                f((&n.local).into());
                f((&n.exported).into());
            }

            NodeRef::Identifier(_)
            | NodeRef::PrivateIdentifier(_)
            | NodeRef::Literal(_)
            | NodeRef::TemplateElement(_)
            | NodeRef::This(_)
            | NodeRef::Super(_)
            | NodeRef::JsxOpeningFragment(_)
            | NodeRef::JsxClosingFragment(_)
            | NodeRef::JsxEmptyExpression(_)
            | NodeRef::JsxText(_)
            | NodeRef::JsxIdentifier(_) => {}

            NodeRef::TemplateLiteral(n) => template(n, f),
            NodeRef::TaggedTemplate(n) => {
                f((&n.tag).into());
                f(NodeRef::TemplateLiteral(&n.quasi));
            }
            NodeRef::Array(n) => {
                for element in &n.elements {
                    match element {
                        ArrayElement::Expression(expr) => f(expr.into()),
                        ArrayElement::Spread(spread) => f(NodeRef::Spread(spread)),
                        ArrayElement::Hole => {}
                    }
                }
            }
            NodeRef::Object(n) => {
                for member in &n.properties {
                    f(match member {
                        ObjectMember::Property(p) => NodeRef::Property(p),
                        ObjectMember::Spread(s) => NodeRef::Spread(s),
                    });
                }
            }
            NodeRef::Property(n) => {
                property_key(&n.key, f);
                // Shorthand `{a}` stores the same name as key and value.
                if !n.shorthand {
                    f((&n.value).into());
                } else if let Expression::Assignment(_) = n.value {
                    f((&n.value).into());
                }
            }
            NodeRef::Spread(n) => f((&n.argument).into()),
            NodeRef::ArrowFunction(n) => {
                for param in &n.params {
                    f(param.into());
                }
                match &n.body {
                    ArrowBody::Block(body) => f(NodeRef::FunctionBody(body)),
                    ArrowBody::Expression(expr) => f(expr.into()),
                }
            }
            NodeRef::Member(n) => {
                f((&n.object).into());
                match &n.property {
                    MemberProperty::Identifier(id) => f(NodeRef::Identifier(id)),
                    MemberProperty::PrivateIdentifier(id) => f(NodeRef::PrivateIdentifier(id)),
                    MemberProperty::Computed(expr) => f(expr.into()),
                }
            }
            NodeRef::Call(n) => {
                f((&n.callee).into());
                arguments(&n.arguments, f);
            }
            NodeRef::New(n) => {
                f((&n.callee).into());
                arguments(&n.arguments, f);
            }
            NodeRef::Chain(n) => f((&n.expression).into()),
            NodeRef::Update(n) => f((&n.argument).into()),
            NodeRef::Unary(n) => f((&n.argument).into()),
            NodeRef::Binary(n) => {
                f((&n.left).into());
                f((&n.right).into());
            }
            NodeRef::Logical(n) => {
                f((&n.left).into());
                f((&n.right).into());
            }
            NodeRef::Conditional(n) => {
                f((&n.test).into());
                f((&n.consequent).into());
                f((&n.alternate).into());
            }
            NodeRef::Assignment(n) => {
                f((&n.left).into());
                f((&n.right).into());
            }
            NodeRef::Sequence(n) => {
                for expr in &n.expressions {
                    f(expr.into());
                }
            }
            NodeRef::Yield(n) => {
                if let Some(argument) = &n.argument {
                    f(argument.into());
                }
            }
            NodeRef::Await(n) => f((&n.argument).into()),
            NodeRef::MetaProperty(n) => {
                f(NodeRef::Identifier(&n.meta));
                f(NodeRef::Identifier(&n.property));
            }
            NodeRef::Import(n) => {
                f((&n.source).into());
                if let Some(options) = &n.options {
                    f(options.into());
                }
            }
            NodeRef::FunctionBody(n) => statements(&n.body, f),

            NodeRef::ArrayPattern(n) => {
                for element in n.elements.iter().flatten() {
                    f(element.into());
                }
            }
            NodeRef::ObjectPattern(n) => {
                for property in &n.properties {
                    f(match property {
                        ObjectPatternProperty::Property(p) => NodeRef::AssignmentProperty(p),
                        ObjectPatternProperty::Rest(r) => NodeRef::RestElement(r),
                    });
                }
            }
            NodeRef::AssignmentProperty(n) => {
                if !n.shorthand {
                    property_key(&n.key, f);
                }
                f((&n.value).into());
            }
            NodeRef::AssignmentPattern(n) => {
                f((&n.left).into());
                f((&n.right).into());
            }
            NodeRef::RestElement(n) => f((&n.argument).into()),

            NodeRef::ClassBody(n) => {
                for element in &n.body {
                    f(match element {
                        ClassElement::Method(m) => NodeRef::MethodDefinition(m),
                        ClassElement::Property(p) => NodeRef::PropertyDefinition(p),
                        ClassElement::StaticBlock(b) => NodeRef::StaticBlock(b),
                    });
                }
            }
            NodeRef::MethodDefinition(n) => {
                property_key(&n.key, f);
                f(NodeRef::Function(&n.value));
            }
            NodeRef::PropertyDefinition(n) => {
                property_key(&n.key, f);
                if let Some(value) = &n.value {
                    f(value.into());
                }
            }
            NodeRef::StaticBlock(n) => statements(&n.body, f),

            NodeRef::JsxElement(n) => {
                f(NodeRef::JsxOpeningElement(&n.opening));
                jsx_children(&n.children, f);
                if let Some(closing) = &n.closing {
                    f(NodeRef::JsxClosingElement(closing));
                }
            }
            NodeRef::JsxFragment(n) => {
                f(NodeRef::JsxOpeningFragment(&n.opening));
                jsx_children(&n.children, f);
                f(NodeRef::JsxClosingFragment(&n.closing));
            }
            NodeRef::JsxOpeningElement(n) => {
                f((&n.name).into());
                for attribute in &n.attributes {
                    f(match attribute {
                        JsxAttributeItem::Attribute(a) => NodeRef::JsxAttribute(a),
                        JsxAttributeItem::Spread(s) => NodeRef::JsxSpreadAttribute(s),
                    });
                }
            }
            NodeRef::JsxClosingElement(n) => f((&n.name).into()),
            NodeRef::JsxAttribute(n) => {
                f(match &n.name {
                    JsxAttributeName::Identifier(id) => NodeRef::JsxIdentifier(id),
                    JsxAttributeName::Namespaced(ns) => NodeRef::JsxNamespacedName(ns),
                });
                match &n.value {
                    Some(JsxAttributeValue::Literal(lit)) => f(NodeRef::Literal(lit)),
                    Some(JsxAttributeValue::ExpressionContainer(c)) => {
                        f(NodeRef::JsxExpressionContainer(c))
                    }
                    Some(JsxAttributeValue::Element(e)) => f(NodeRef::JsxElement(e)),
                    Some(JsxAttributeValue::Fragment(e)) => f(NodeRef::JsxFragment(e)),
                    None => {}
                }
            }
            NodeRef::JsxSpreadAttribute(n) => f((&n.argument).into()),
            NodeRef::JsxExpressionContainer(n) => match &n.expression {
                JsxExpression::Expression(expr) => f(expr.into()),
                JsxExpression::Empty(empty) => f(NodeRef::JsxEmptyExpression(empty)),
            },
            NodeRef::JsxMemberExpression(n) => {
                f(match &n.object {
                    JsxMemberObject::Identifier(id) => NodeRef::JsxIdentifier(id),
                    JsxMemberObject::Member(m) => NodeRef::JsxMemberExpression(m),
                });
                f(NodeRef::JsxIdentifier(&n.property));
            }
            NodeRef::JsxNamespacedName(n) => {
                f(NodeRef::JsxIdentifier(&n.namespace));
                f(NodeRef::JsxIdentifier(&n.name));
            }
        }
    }
}

fn statements<'a>(list: &'a NodeList<Statement>, f: Visit<'_, 'a>) {
    for statement in list {
        f(statement.into());
    }
}

fn arguments<'a>(list: &'a NodeList<Argument>, f: Visit<'_, 'a>) {
    for argument in list {
        f(match argument {
            Argument::Expression(expr) => expr.into(),
            Argument::Spread(spread) => NodeRef::Spread(spread),
        });
    }
}

fn attributes<'a>(list: &'a NodeList<ImportAttribute>, f: Visit<'_, 'a>) {
    for attribute in list {
        f(NodeRef::ImportAttribute(attribute));
    }
}

fn for_head<'a>(head: &'a ForHead, f: Visit<'_, 'a>) {
    match head {
        ForHead::VariableDeclaration(decl) => f(NodeRef::VariableDeclaration(decl)),
        ForHead::Pattern(pattern) => f(pattern.into()),
    }
}

fn property_key<'a>(key: &'a PropertyKey, f: Visit<'_, 'a>) {
    f(match key {
        PropertyKey::Identifier(id) => NodeRef::Identifier(id),
        PropertyKey::PrivateIdentifier(id) => NodeRef::PrivateIdentifier(id),
        PropertyKey::Literal(lit) => NodeRef::Literal(lit),
        PropertyKey::Computed(expr) => expr.into(),
    });
}

/// Quasis and expressions interleaved in source order.
fn template<'a>(n: &'a TemplateLiteral, f: Visit<'_, 'a>) {
    let mut expressions = n.expressions.iter();
    for quasi in &n.quasis {
        f(NodeRef::TemplateElement(quasi));
        if let Some(expr) = expressions.next() {
            f(expr.into());
        }
    }
}

fn jsx_children<'a>(children: &'a NodeList<JsxChild>, f: Visit<'_, 'a>) {
    for child in children {
        f(match child {
            JsxChild::Text(t) => NodeRef::JsxText(t),
            JsxChild::Element(e) => NodeRef::JsxElement(e),
            JsxChild::Fragment(e) => NodeRef::JsxFragment(e),
            JsxChild::ExpressionContainer(c) => NodeRef::JsxExpressionContainer(c),
        });
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl<'a> From<&'a Program> for NodeRef<'a> {
    fn from(program: &'a Program) -> Self {
        match program {
            Program::Script(s) => NodeRef::Script(s),
            Program::Module(m) => NodeRef::Module(m),
        }
    }
}

impl<'a> From<&'a Statement> for NodeRef<'a> {
    fn from(statement: &'a Statement) -> Self {
        match statement {
            Statement::Block(s) => NodeRef::Block(s),
            Statement::Empty(s) => NodeRef::Empty(s),
            Statement::Expression(s) => NodeRef::ExpressionStatement(s),
            Statement::Directive(s) => NodeRef::Directive(s),
            Statement::If(s) => NodeRef::If(s),
            Statement::Labeled(s) => NodeRef::Labeled(s),
            Statement::Break(s) => NodeRef::Break(s),
            Statement::Continue(s) => NodeRef::Continue(s),
            Statement::With(s) => NodeRef::With(s),
            Statement::Switch(s) => NodeRef::Switch(s),
            Statement::Return(s) => NodeRef::Return(s),
            Statement::Throw(s) => NodeRef::Throw(s),
            Statement::Try(s) => NodeRef::Try(s),
            Statement::While(s) => NodeRef::While(s),
            Statement::DoWhile(s) => NodeRef::DoWhile(s),
            Statement::For(s) => NodeRef::For(s),
            Statement::ForIn(s) => NodeRef::ForIn(s),
            Statement::ForOf(s) => NodeRef::ForOf(s),
            Statement::Debugger(s) => NodeRef::Debugger(s),
            Statement::VariableDeclaration(s) => NodeRef::VariableDeclaration(s),
            Statement::FunctionDeclaration(s) => NodeRef::FunctionDeclaration(s),
            Statement::ClassDeclaration(s) => NodeRef::ClassDeclaration(s),
            Statement::Import(s) => NodeRef::ImportDeclaration(s),
            Statement::ExportNamed(s) => NodeRef::ExportNamedDeclaration(s),
            Statement::ExportDefault(s) => NodeRef::ExportDefaultDeclaration(s),
            Statement::ExportAll(s) => NodeRef::ExportAllDeclaration(s),
        }
    }
}

impl<'a> From<&'a Expression> for NodeRef<'a> {
    fn from(expression: &'a Expression) -> Self {
        match expression {
            Expression::Identifier(e) => NodeRef::Identifier(e),
            Expression::PrivateIdentifier(e) => NodeRef::PrivateIdentifier(e),
            Expression::Literal(e) => NodeRef::Literal(e),
            Expression::Template(e) => NodeRef::TemplateLiteral(e),
            Expression::TaggedTemplate(e) => NodeRef::TaggedTemplate(e),
            Expression::This(e) => NodeRef::This(e),
            Expression::Super(e) => NodeRef::Super(e),
            Expression::Array(e) => NodeRef::Array(e),
            Expression::Object(e) => NodeRef::Object(e),
            Expression::Function(e) => NodeRef::Function(e),
            Expression::ArrowFunction(e) => NodeRef::ArrowFunction(e),
            Expression::Class(e) => NodeRef::Class(e),
            Expression::Member(e) => NodeRef::Member(e),
            Expression::Call(e) => NodeRef::Call(e),
            Expression::New(e) => NodeRef::New(e),
            Expression::Chain(e) => NodeRef::Chain(e),
            Expression::Update(e) => NodeRef::Update(e),
            Expression::Unary(e) => NodeRef::Unary(e),
            Expression::Binary(e) => NodeRef::Binary(e),
            Expression::Logical(e) => NodeRef::Logical(e),
            Expression::Conditional(e) => NodeRef::Conditional(e),
            Expression::Assignment(e) => NodeRef::Assignment(e),
            Expression::Sequence(e) => NodeRef::Sequence(e),
            Expression::Yield(e) => NodeRef::Yield(e),
            Expression::Await(e) => NodeRef::Await(e),
            Expression::MetaProperty(e) => NodeRef::MetaProperty(e),
            Expression::Import(e) => NodeRef::Import(e),
            Expression::JsxElement(e) => NodeRef::JsxElement(e),
            Expression::JsxFragment(e) => NodeRef::JsxFragment(e),
        }
    }
}

impl<'a> From<&'a Pattern> for NodeRef<'a> {
    fn from(pattern: &'a Pattern) -> Self {
        match pattern {
            Pattern::Identifier(p) => NodeRef::Identifier(p),
            Pattern::Member(p) => NodeRef::Member(p),
            Pattern::Object(p) => NodeRef::ObjectPattern(p),
            Pattern::Array(p) => NodeRef::ArrayPattern(p),
            Pattern::Assignment(p) => NodeRef::AssignmentPattern(p),
            Pattern::Rest(p) => NodeRef::RestElement(p),
        }
    }
}

impl<'a> From<&'a ModuleExportName> for NodeRef<'a> {
    fn from(name: &'a ModuleExportName) -> Self {
        match name {
            ModuleExportName::Identifier(id) => NodeRef::Identifier(id),
            ModuleExportName::Literal(lit) => NodeRef::Literal(lit),
        }
    }
}

impl<'a> From<&'a JsxElementName> for NodeRef<'a> {
    fn from(name: &'a JsxElementName) -> Self {
        match name {
            JsxElementName::Identifier(id) => NodeRef::JsxIdentifier(id),
            JsxElementName::Namespaced(ns) => NodeRef::JsxNamespacedName(ns),
            JsxElementName::Member(m) => NodeRef::JsxMemberExpression(m),
        }
    }
}
