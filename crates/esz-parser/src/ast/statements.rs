//! Program and statement nodes.

use esz_common::Atom;

use super::{
    Class, Expression, Function, Identifier, LabelSet, Literal, NodeBase, NodeKind, NodeList,
    Pattern,
};
use super::{ExportAllDeclaration, ExportDefaultDeclaration, ExportNamedDeclaration, ImportDeclaration};
use crate::hoisting::HoistingScope;

// =============================================================================
// Program
// =============================================================================

#[derive(Debug)]
pub enum Program {
    Script(Box<Script>),
    Module(Box<Module>),
}

impl Program {
    pub fn base(&self) -> &NodeBase {
        match self {
            Program::Script(script) => &script.base,
            Program::Module(module) => &module.base,
        }
    }

    pub fn body(&self) -> &NodeList<Statement> {
        match self {
            Program::Script(script) => &script.body,
            Program::Module(module) => &module.body,
        }
    }

    pub fn hoisting(&self) -> &HoistingScope {
        match self {
            Program::Script(script) => &script.hoisting,
            Program::Module(module) => &module.hoisting,
        }
    }

    /// Modules are always strict.
    pub fn is_strict(&self) -> bool {
        match self {
            Program::Script(script) => script.strict,
            Program::Module(_) => true,
        }
    }

    pub fn is_module(&self) -> bool {
        matches!(self, Program::Module(_))
    }
}

#[derive(Debug)]
pub struct Script {
    pub base: NodeBase,
    pub body: NodeList<Statement>,
    pub strict: bool,
    pub hoisting: HoistingScope,
}

#[derive(Debug)]
pub struct Module {
    pub base: NodeBase,
    pub body: NodeList<Statement>,
    pub hoisting: HoistingScope,
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Debug)]
pub enum Statement {
    Block(Box<BlockStatement>),
    Empty(Box<EmptyStatement>),
    Expression(Box<ExpressionStatement>),
    Directive(Box<Directive>),
    If(Box<IfStatement>),
    Labeled(Box<LabeledStatement>),
    Break(Box<BreakStatement>),
    Continue(Box<ContinueStatement>),
    With(Box<WithStatement>),
    Switch(Box<SwitchStatement>),
    Return(Box<ReturnStatement>),
    Throw(Box<ThrowStatement>),
    Try(Box<TryStatement>),
    While(Box<WhileStatement>),
    DoWhile(Box<DoWhileStatement>),
    For(Box<ForStatement>),
    ForIn(Box<ForInStatement>),
    ForOf(Box<ForOfStatement>),
    Debugger(Box<DebuggerStatement>),
    VariableDeclaration(Box<VariableDeclaration>),
    FunctionDeclaration(Box<Function>),
    ClassDeclaration(Box<Class>),
    Import(Box<ImportDeclaration>),
    ExportNamed(Box<ExportNamedDeclaration>),
    ExportDefault(Box<ExportDefaultDeclaration>),
    ExportAll(Box<ExportAllDeclaration>),
}

impl Statement {
    pub fn base(&self) -> &NodeBase {
        match self {
            Statement::Block(s) => &s.base,
            Statement::Empty(s) => &s.base,
            Statement::Expression(s) => &s.base,
            Statement::Directive(s) => &s.base,
            Statement::If(s) => &s.base,
            Statement::Labeled(s) => &s.base,
            Statement::Break(s) => &s.base,
            Statement::Continue(s) => &s.base,
            Statement::With(s) => &s.base,
            Statement::Switch(s) => &s.base,
            Statement::Return(s) => &s.base,
            Statement::Throw(s) => &s.base,
            Statement::Try(s) => &s.base,
            Statement::While(s) => &s.base,
            Statement::DoWhile(s) => &s.base,
            Statement::For(s) => &s.base,
            Statement::ForIn(s) => &s.base,
            Statement::ForOf(s) => &s.base,
            Statement::Debugger(s) => &s.base,
            Statement::VariableDeclaration(s) => &s.base,
            Statement::FunctionDeclaration(s) => &s.base,
            Statement::ClassDeclaration(s) => &s.base,
            Statement::Import(s) => &s.base,
            Statement::ExportNamed(s) => &s.base,
            Statement::ExportDefault(s) => &s.base,
            Statement::ExportAll(s) => &s.base,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Statement::Block(_) => NodeKind::Block,
            Statement::Empty(_) => NodeKind::Empty,
            Statement::Expression(_) => NodeKind::Expression,
            Statement::Directive(_) => NodeKind::Directive,
            Statement::If(_) => NodeKind::If,
            Statement::Labeled(_) => NodeKind::Labeled,
            Statement::Break(_) => NodeKind::Break,
            Statement::Continue(_) => NodeKind::Continue,
            Statement::With(_) => NodeKind::With,
            Statement::Switch(_) => NodeKind::Switch,
            Statement::Return(_) => NodeKind::Return,
            Statement::Throw(_) => NodeKind::Throw,
            Statement::Try(_) => NodeKind::Try,
            Statement::While(_) => NodeKind::While,
            Statement::DoWhile(_) => NodeKind::DoWhile,
            Statement::For(_) => NodeKind::For,
            Statement::ForIn(_) => NodeKind::ForIn,
            Statement::ForOf(_) => NodeKind::ForOf,
            Statement::Debugger(_) => NodeKind::Debugger,
            Statement::VariableDeclaration(_) => NodeKind::VariableDeclaration,
            Statement::FunctionDeclaration(_) => NodeKind::FunctionDeclaration,
            Statement::ClassDeclaration(_) => NodeKind::ClassDeclaration,
            Statement::Import(_) => NodeKind::ImportDeclaration,
            Statement::ExportNamed(_) => NodeKind::ExportNamedDeclaration,
            Statement::ExportDefault(_) => NodeKind::ExportDefaultDeclaration,
            Statement::ExportAll(_) => NodeKind::ExportAllDeclaration,
        }
    }

    /// The label set of an iteration or `switch` statement.
    pub fn labels(&self) -> Option<&LabelSet> {
        match self {
            Statement::Switch(s) => Some(&s.labels),
            Statement::While(s) => Some(&s.labels),
            Statement::DoWhile(s) => Some(&s.labels),
            Statement::For(s) => Some(&s.labels),
            Statement::ForIn(s) => Some(&s.labels),
            Statement::ForOf(s) => Some(&s.labels),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct BlockStatement {
    pub base: NodeBase,
    pub body: NodeList<Statement>,
}

#[derive(Debug)]
pub struct EmptyStatement {
    pub base: NodeBase,
}

#[derive(Debug)]
pub struct ExpressionStatement {
    pub base: NodeBase,
    pub expression: Expression,
}

/// A string literal statement in a directive prologue.
#[derive(Debug)]
pub struct Directive {
    pub base: NodeBase,
    pub expression: Literal,
    /// Source text between the quotes, escapes left undecoded.
    pub directive: Atom,
}

impl Directive {
    pub fn is_use_strict(&self) -> bool {
        self.directive.as_str() == "use strict"
    }
}

#[derive(Debug)]
pub struct IfStatement {
    pub base: NodeBase,
    pub test: Expression,
    pub consequent: Statement,
    pub alternate: Option<Statement>,
}

#[derive(Debug)]
pub struct LabeledStatement {
    pub base: NodeBase,
    pub label: Identifier,
    pub body: Statement,
}

#[derive(Debug)]
pub struct BreakStatement {
    pub base: NodeBase,
    pub label: Option<Identifier>,
}

#[derive(Debug)]
pub struct ContinueStatement {
    pub base: NodeBase,
    pub label: Option<Identifier>,
}

#[derive(Debug)]
pub struct WithStatement {
    pub base: NodeBase,
    pub object: Expression,
    pub body: Statement,
}

#[derive(Debug)]
pub struct SwitchStatement {
    pub base: NodeBase,
    pub discriminant: Expression,
    pub cases: NodeList<SwitchCase>,
    pub labels: LabelSet,
}

#[derive(Debug)]
pub struct SwitchCase {
    pub base: NodeBase,
    /// `None` for `default:`.
    pub test: Option<Expression>,
    pub consequent: NodeList<Statement>,
}

#[derive(Debug)]
pub struct ReturnStatement {
    pub base: NodeBase,
    pub argument: Option<Expression>,
}

#[derive(Debug)]
pub struct ThrowStatement {
    pub base: NodeBase,
    pub argument: Expression,
}

#[derive(Debug)]
pub struct TryStatement {
    pub base: NodeBase,
    pub block: BlockStatement,
    pub handler: Option<CatchClause>,
    pub finalizer: Option<BlockStatement>,
}

#[derive(Debug)]
pub struct CatchClause {
    pub base: NodeBase,
    pub param: Option<Pattern>,
    pub body: BlockStatement,
}

#[derive(Debug)]
pub struct WhileStatement {
    pub base: NodeBase,
    pub test: Expression,
    pub body: Statement,
    pub labels: LabelSet,
}

#[derive(Debug)]
pub struct DoWhileStatement {
    pub base: NodeBase,
    pub body: Statement,
    pub test: Expression,
    pub labels: LabelSet,
}

#[derive(Debug)]
pub enum ForInit {
    VariableDeclaration(Box<VariableDeclaration>),
    Expression(Expression),
}

#[derive(Debug)]
pub struct ForStatement {
    pub base: NodeBase,
    pub init: Option<ForInit>,
    pub test: Option<Expression>,
    pub update: Option<Expression>,
    pub body: Statement,
    pub labels: LabelSet,
}

/// Left side of `for-in` / `for-of`.
#[derive(Debug)]
pub enum ForHead {
    VariableDeclaration(Box<VariableDeclaration>),
    Pattern(Pattern),
}

#[derive(Debug)]
pub struct ForInStatement {
    pub base: NodeBase,
    pub left: ForHead,
    pub right: Expression,
    pub body: Statement,
    pub labels: LabelSet,
}

#[derive(Debug)]
pub struct ForOfStatement {
    pub base: NodeBase,
    pub left: ForHead,
    pub right: Expression,
    pub body: Statement,
    pub is_await: bool,
    pub labels: LabelSet,
}

#[derive(Debug)]
pub struct DebuggerStatement {
    pub base: NodeBase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
        }
    }

    pub fn is_lexical(self) -> bool {
        self != VariableKind::Var
    }
}

#[derive(Debug)]
pub struct VariableDeclaration {
    pub base: NodeBase,
    pub kind: VariableKind,
    pub declarations: NodeList<VariableDeclarator>,
}

#[derive(Debug)]
pub struct VariableDeclarator {
    pub base: NodeBase,
    pub id: Pattern,
    pub init: Option<Expression>,
}
